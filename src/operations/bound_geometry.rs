use crate::error::{GeometryError, Result};
use crate::geometry::{Aabb, BoundaryType, CellId, GeometryStore, Region, Sphere, SurfaceId};
use crate::math::Point3;
use crate::model::VACUUM_CELL;

/// Name of the enclosing vacuum sphere.
pub const BOUNDING_SURFACE: &str = "bounding_sphere";

/// Parameters controlling the enclosing escape boundary.
#[derive(Debug, Clone, Copy)]
pub struct ClosureParams {
    /// Added to the bounding-box diagonal to get the sphere radius.
    pub margin: f64,
}

impl Default for ClosureParams {
    fn default() -> Self {
        Self { margin: 100.0 }
    }
}

/// The escape region added around a set of cells.
#[derive(Debug, Clone, Copy)]
pub struct Closure {
    /// The vacuum sphere.
    pub surface: SurfaceId,
    /// The escape cell between the outermost layer and the sphere.
    pub cell: CellId,
    /// Bounding box of the enclosed cells.
    pub bounds: Aabb,
    /// Radius of the vacuum sphere.
    pub radius: f64,
}

/// Encloses a set of cells in a vacuum sphere and fills the gap with an
/// escape cell.
///
/// The sphere is centered at the origin with radius equal to the diagonal of
/// the cells' bounding box plus a margin, so it contains the box from any
/// center inside it.
pub struct BoundGeometry {
    cells: Vec<CellId>,
    outermost: SurfaceId,
    params: ClosureParams,
}

impl BoundGeometry {
    /// Creates a new `BoundGeometry` operation.
    #[must_use]
    pub fn new(cells: Vec<CellId>, outermost: SurfaceId) -> Self {
        Self {
            cells,
            outermost,
            params: ClosureParams::default(),
        }
    }

    /// Sets custom closure parameters.
    #[must_use]
    pub fn with_params(mut self, params: ClosureParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the operation, adding the sphere and the escape cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the cells have no finite bounding box or the
    /// resulting radius is degenerate.
    pub fn execute(&self, store: &mut GeometryStore) -> Result<Closure> {
        let mut bounds = Aabb::empty();
        for &cell in &self.cells {
            let region_bounds = store.cell(cell)?.region.bounding_box(store)?;
            bounds = bounds.union(&region_bounds);
        }
        if bounds.is_empty() || !bounds.is_finite() {
            return Err(GeometryError::Unbounded.into());
        }

        let radius = bounds.diagonal() + self.params.margin;
        let surface = store.add_surface(
            BOUNDING_SURFACE,
            Sphere::new(Point3::origin(), radius)?,
            BoundaryType::Vacuum,
        );
        let region = Region::inside(surface).and(Region::outside(self.outermost));
        let cell = store.add_cell(VACUUM_CELL, region, None);
        tracing::debug!(radius, diagonal = bounds.diagonal(), "closed geometry");

        Ok(Closure {
            surface,
            cell,
            bounds,
            radius,
        })
    }
}
