pub mod error;
mod export;
pub mod geometry;
pub mod layout;
pub mod material;
pub mod math;
pub mod model;
pub mod operations;
pub mod parastell;

pub use error::{RadialBuildError, Result};
