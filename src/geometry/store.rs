use slotmap::SlotMap;

use super::surface::{BoundaryType, SurfaceKind};
use super::Region;
use crate::error::GeometryError;
use crate::material::MaterialId;

slotmap::new_key_type! {
    /// Unique identifier for a surface in the geometry store.
    pub struct SurfaceId;
}

slotmap::new_key_type! {
    /// Unique identifier for a cell in the geometry store.
    pub struct CellId;
}

/// Data associated with a surface.
#[derive(Debug, Clone)]
pub struct SurfaceData {
    /// Sequential 1-based number used in exported geometry.
    pub number: u32,
    /// Name of the surface, usually the layer it bounds.
    pub name: String,
    /// The surface shape.
    pub kind: SurfaceKind,
    /// Boundary condition applied at the surface.
    pub boundary: BoundaryType,
}

/// Data associated with a cell.
///
/// A cell is a region filled with a material, or void when `fill` is `None`.
#[derive(Debug, Clone)]
pub struct CellData {
    /// Sequential 1-based number used in exported geometry.
    pub number: u32,
    /// Name of the cell.
    pub name: String,
    /// The region the cell occupies.
    pub region: Region,
    /// The material filling the cell.
    pub fill: Option<MaterialId>,
}

/// Central arena that owns the surfaces and cells of one geometry build.
///
/// Regions reference surfaces by typed ID (generational index), so cells can
/// share surfaces without self-referential structures.
#[derive(Debug, Default)]
pub struct GeometryStore {
    surfaces: SlotMap<SurfaceId, SurfaceData>,
    cells: SlotMap<CellId, CellData>,
    surface_order: Vec<SurfaceId>,
    cell_order: Vec<CellId>,
}

impl GeometryStore {
    /// Creates a new, empty geometry store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Surface operations ---

    /// Inserts a surface and returns its ID.
    pub fn add_surface(
        &mut self,
        name: impl Into<String>,
        kind: impl Into<SurfaceKind>,
        boundary: BoundaryType,
    ) -> SurfaceId {
        let number = next_number(self.surface_order.len());
        let id = self.surfaces.insert(SurfaceData {
            number,
            name: name.into(),
            kind: kind.into(),
            boundary,
        });
        self.surface_order.push(id);
        id
    }

    /// Returns a reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface(&self, id: SurfaceId) -> Result<&SurfaceData, GeometryError> {
        self.surfaces
            .get(id)
            .ok_or_else(|| GeometryError::EntityNotFound("surface".into()))
    }

    /// Iterates surfaces in insertion order.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceData)> {
        self.surface_order
            .iter()
            .filter_map(|&id| self.surfaces.get(id).map(|data| (id, data)))
    }

    /// Returns the number of surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    // --- Cell operations ---

    /// Inserts a cell and returns its ID.
    pub fn add_cell(
        &mut self,
        name: impl Into<String>,
        region: Region,
        fill: Option<MaterialId>,
    ) -> CellId {
        let number = next_number(self.cell_order.len());
        let id = self.cells.insert(CellData {
            number,
            name: name.into(),
            region,
            fill,
        });
        self.cell_order.push(id);
        id
    }

    /// Returns a reference to the cell data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn cell(&self, id: CellId) -> Result<&CellData, GeometryError> {
        self.cells
            .get(id)
            .ok_or_else(|| GeometryError::EntityNotFound("cell".into()))
    }

    /// Iterates cells in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &CellData)> {
        self.cell_order
            .iter()
            .filter_map(|&id| self.cells.get(id).map(|data| (id, data)))
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

fn next_number(len: usize) -> u32 {
    u32::try_from(len + 1).unwrap_or(u32::MAX)
}
