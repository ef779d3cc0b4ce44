//! Schematic layout of a radial build.
//!
//! Each layer becomes a colored rectangle whose width follows its thickness,
//! widened as needed to fit its label. Rectangles are placed side by side in
//! stacking order.

mod annotate;
mod description;
mod engine;
mod palette;
mod render;
pub mod wrap;

pub use annotate::{AnnotatedBuild, AnnotatedLayer};
pub use description::LayoutDescription;
pub use engine::{Layout, LayoutConfig, LayoutEngine, LayoutEntry};
pub use palette::Palette;
pub use render::{file_stem, DrawingSurface, SvgSurface};
