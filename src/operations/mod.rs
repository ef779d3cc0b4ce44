mod assemble_cells;
mod bound_geometry;
mod build_surfaces;
mod toroidal_model;

pub use assemble_cells::{AssembleCells, CellAssembly, Tally};
pub use bound_geometry::{BoundGeometry, Closure, ClosureParams, BOUNDING_SURFACE};
pub use build_surfaces::{BuildSurfaces, PlasmaShape, StackEntry, SurfaceStack, PLASMA_SURFACE};
pub use toroidal_model::{GeometryBundle, ToroidalModel};
