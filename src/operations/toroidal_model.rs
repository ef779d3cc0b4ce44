use super::{
    AssembleCells, BoundGeometry, BuildSurfaces, ClosureParams, PlasmaShape, SurfaceStack, Tally,
};
use crate::error::Result;
use crate::geometry::{Aabb, CellId, GeometryStore};
use crate::material::{MaterialId, MaterialStore};
use crate::math::Point3;
use crate::model::{RadialBuild, PLASMA_CELL, VACUUM_CELL};

/// Geometry, materials and tallies derived from one radial build.
#[derive(Debug)]
pub struct GeometryBundle {
    /// Arena holding every surface and cell of the model.
    pub store: GeometryStore,
    /// Cells keyed by name: `plasma_cell`, the physical layers in stacking
    /// order, then `vac_cell`.
    pub cells: Vec<(String, CellId)>,
    /// Distinct materials filling cells, in order of first use.
    pub materials: Vec<MaterialId>,
    /// Measurement regions requested by the build.
    pub tallies: Vec<Tally>,
    /// Nested surfaces of the build.
    pub stack: SurfaceStack,
    /// Bounding box of every cell except `vac_cell`.
    pub bounds: Aabb,
}

impl GeometryBundle {
    /// Looks up a cell by name.
    #[must_use]
    pub fn cell(&self, name: &str) -> Option<CellId> {
        self.cells
            .iter()
            .find(|(cell_name, _)| cell_name == name)
            .map(|&(_, id)| id)
    }

    /// The plasma cell.
    #[must_use]
    pub fn plasma_cell(&self) -> Option<CellId> {
        self.cell(PLASMA_CELL)
    }

    /// The escape cell.
    #[must_use]
    pub fn vacuum_cell(&self) -> Option<CellId> {
        self.cell(VACUUM_CELL)
    }

    /// Cell names in order.
    pub fn cell_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Returns every cell containing `point`.
    ///
    /// Inside the vacuum sphere and off the surfaces, a closed geometry
    /// yields exactly one cell.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell or surface is missing from the store.
    pub fn cells_containing(&self, point: &Point3) -> Result<Vec<CellId>> {
        let mut found = Vec::new();
        for &(_, id) in &self.cells {
            if self.store.cell(id)?.region.contains(point, &self.store)? {
                found.push(id);
            }
        }
        Ok(found)
    }

    /// Returns the unique cell containing `point`, or `None` if the point is
    /// outside the model or claimed ambiguously.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell or surface is missing from the store.
    pub fn find_cell(&self, point: &Point3) -> Result<Option<CellId>> {
        let found = self.cells_containing(point)?;
        Ok(match found.as_slice() {
            [id] => Some(*id),
            _ => None,
        })
    }
}

/// Builds a closed toroidal transport model from a radial build.
///
/// Runs the geometry path in order: nested surfaces, material-filled cells
/// and tallies, then the vacuum closure. Any failure aborts the whole build
/// and no bundle is returned.
pub struct ToroidalModel<'a> {
    build: &'a RadialBuild,
    shape: PlasmaShape,
    closure: ClosureParams,
}

impl<'a> ToroidalModel<'a> {
    /// Creates a new `ToroidalModel` operation.
    #[must_use]
    pub fn new(build: &'a RadialBuild, shape: PlasmaShape) -> Self {
        Self {
            build,
            shape,
            closure: ClosureParams::default(),
        }
    }

    /// Sets custom closure parameters.
    #[must_use]
    pub fn with_closure(mut self, closure: ClosureParams) -> Self {
        self.closure = closure;
        self
    }

    /// Executes the build against a material store.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for degenerate radii or missing
    /// thicknesses, and a resolution error for unknown material names.
    pub fn execute(&self, materials: &MaterialStore) -> Result<GeometryBundle> {
        let mut store = GeometryStore::new();
        let stack = BuildSurfaces::new(self.build, self.shape).execute(&mut store)?;
        let assembly = AssembleCells::new(self.build, &stack, materials).execute(&mut store)?;

        let mut cells = Vec::with_capacity(assembly.layers.len() + 2);
        cells.push((PLASMA_CELL.to_owned(), assembly.plasma));
        cells.extend(assembly.layers);

        let enclosed = cells.iter().map(|&(_, id)| id).collect();
        let closure = BoundGeometry::new(enclosed, stack.outermost())
            .with_params(self.closure)
            .execute(&mut store)?;
        cells.push((VACUUM_CELL.to_owned(), closure.cell));

        tracing::info!(
            layers = self.build.len(),
            cells = cells.len(),
            tallies = assembly.tallies.len(),
            materials = assembly.materials.len(),
            bounding_radius = closure.radius,
            "built toroidal model"
        );

        Ok(GeometryBundle {
            store,
            cells,
            materials: assembly.materials,
            tallies: assembly.tallies,
            stack,
            bounds: closure.bounds,
        })
    }
}
