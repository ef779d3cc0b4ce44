mod aabb;
mod region;
mod store;
pub mod surface;

pub use aabb::Aabb;
pub use region::Region;
pub use store::{CellData, CellId, GeometryStore, SurfaceData, SurfaceId};
pub use surface::{BoundaryType, Sense, Sphere, Surface, SurfaceKind, ZTorus};
