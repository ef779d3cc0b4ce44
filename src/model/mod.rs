mod build;
mod color;
mod layer;

pub use build::{RadialBuild, PLASMA_CELL, VACUUM_CELL};
pub use color::Color;
pub use layer::{Constituent, Layer, Thickness};
