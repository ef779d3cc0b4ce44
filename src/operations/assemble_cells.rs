use super::SurfaceStack;
use crate::error::Result;
use crate::geometry::{CellId, GeometryStore};
use crate::material::{MaterialId, MaterialStore};
use crate::model::{RadialBuild, PLASMA_CELL};

/// A named request to score quantities inside one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    /// Tally name, `<layer>_tally`.
    pub name: String,
    /// Name of the scored cell.
    pub cell_name: String,
    /// The scored cell.
    pub cell: CellId,
    /// Requested quantity identifiers, e.g. `heating` or `tbr`.
    pub scores: Vec<String>,
}

/// Cells, tallies and materials produced for a surface stack.
#[derive(Debug, Clone)]
pub struct CellAssembly {
    /// The void plasma cell.
    pub plasma: CellId,
    /// Layer cells keyed by layer name, in stacking order.
    pub layers: Vec<(String, CellId)>,
    /// One tally per layer with scores.
    pub tallies: Vec<Tally>,
    /// Distinct materials filling cells, in order of first use.
    pub materials: Vec<MaterialId>,
}

/// Binds each region of a surface stack to its layer's material.
///
/// Layers without a material name become void cells. Every material name is
/// resolved before the first cell is added, so a resolution failure leaves
/// the store without any of this build's cells.
pub struct AssembleCells<'a> {
    build: &'a RadialBuild,
    stack: &'a SurfaceStack,
    materials: &'a MaterialStore,
}

impl<'a> AssembleCells<'a> {
    /// Creates a new `AssembleCells` operation.
    #[must_use]
    pub fn new(
        build: &'a RadialBuild,
        stack: &'a SurfaceStack,
        materials: &'a MaterialStore,
    ) -> Self {
        Self {
            build,
            stack,
            materials,
        }
    }

    /// Executes the operation, adding the plasma cell and one cell per stack
    /// entry to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer's material name cannot be resolved.
    pub fn execute(&self, store: &mut GeometryStore) -> Result<CellAssembly> {
        let mut fills = Vec::with_capacity(self.stack.entries.len());
        for entry in &self.stack.entries {
            let layer = &self.build.layers()[entry.layer_index];
            let fill = layer
                .material_name()
                .map(|name| self.materials.resolve(name))
                .transpose()?;
            fills.push(fill);
        }

        let plasma = store.add_cell(PLASMA_CELL, self.stack.plasma_region.clone(), None);

        let mut layers = Vec::with_capacity(fills.len());
        let mut tallies = Vec::new();
        let mut materials = Vec::new();
        for (entry, fill) in self.stack.entries.iter().zip(fills) {
            let layer = &self.build.layers()[entry.layer_index];
            let cell = store.add_cell(layer.name(), entry.region.clone(), fill);
            tracing::debug!(
                layer = layer.name(),
                material = layer.material_name().unwrap_or("void"),
                "assembled cell"
            );

            if let Some(id) = fill {
                if !materials.contains(&id) {
                    materials.push(id);
                }
            }

            if !layer.scores().is_empty() {
                let tally = Tally {
                    name: format!("{}_tally", layer.name()),
                    cell_name: layer.name().to_owned(),
                    cell,
                    scores: layer.scores().to_vec(),
                };
                tracing::debug!(tally = %tally.name, scores = ?tally.scores, "added tally");
                tallies.push(tally);
            }

            layers.push((layer.name().to_owned(), cell));
        }

        Ok(CellAssembly {
            plasma,
            layers,
            tallies,
            materials,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{RadialBuildError, ResolutionError};
    use crate::material::Material;
    use crate::model::Layer;
    use crate::operations::{BuildSurfaces, PlasmaShape};

    fn materials() -> MaterialStore {
        let mut store = MaterialStore::new();
        store.insert(Material::new("RAFM").with_density(7.8));
        store.insert(Material::new("W").with_density(19.35));
        store
    }

    fn assemble(
        build: &RadialBuild,
        materials: &MaterialStore,
    ) -> Result<(GeometryStore, CellAssembly)> {
        let mut store = GeometryStore::new();
        let stack = BuildSurfaces::new(build, PlasmaShape::new(800.0, 100.0, 300.0))
            .execute(&mut store)?;
        let cells = AssembleCells::new(build, &stack, materials).execute(&mut store)?;
        Ok((store, cells))
    }

    #[test]
    fn cells_carry_resolved_materials() {
        let build = RadialBuild::new(vec![
            Layer::new("sol").with_thickness(5.0),
            Layer::new("fw").with_thickness(4.0).with_material("RAFM"),
            Layer::new("armor").with_thickness(0.2).with_material("RAFM"),
            Layer::new("shield").with_thickness(20.0).with_material("W"),
        ])
        .unwrap();
        let materials = materials();
        let (store, cells) = assemble(&build, &materials).unwrap();

        assert!(store.cell(cells.plasma).unwrap().fill.is_none());
        let names: Vec<_> = cells.layers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["sol", "fw", "armor", "shield"]);
        assert!(store.cell(cells.layers[0].1).unwrap().fill.is_none());
        let fw_fill = store.cell(cells.layers[1].1).unwrap().fill.unwrap();
        assert_eq!(materials.get(fw_fill).unwrap().name, "RAFM");
        assert_eq!(cells.materials.len(), 2);
    }

    #[test]
    fn scored_layers_get_exactly_one_tally() {
        let build = RadialBuild::new(vec![
            Layer::new("fw")
                .with_thickness(4.0)
                .with_scores(["heating"]),
            Layer::new("breeder").with_thickness(50.0),
        ])
        .unwrap();
        let (_, cells) = assemble(&build, &materials()).unwrap();
        assert_eq!(cells.tallies.len(), 1);
        let tally = &cells.tallies[0];
        assert_eq!(tally.name, "fw_tally");
        assert_eq!(tally.cell, cells.layers[0].1);
        assert_eq!(tally.scores, ["heating"]);
    }

    #[test]
    fn logical_layers_never_get_cells_or_tallies() {
        let build = RadialBuild::new(vec![Layer::new("gap")
            .with_thickness(0.0)
            .with_scores(["heating"])])
        .unwrap();
        let (store, cells) = assemble(&build, &materials()).unwrap();
        assert!(cells.layers.is_empty());
        assert!(cells.tallies.is_empty());
        assert_eq!(store.cell_count(), 1);
    }

    #[test]
    fn unknown_material_aborts_before_adding_cells() {
        let build = RadialBuild::new(vec![
            Layer::new("fw").with_thickness(4.0).with_material("RAFM"),
            Layer::new("breeder").with_thickness(50.0).with_material("PbLi"),
        ])
        .unwrap();
        let mut store = GeometryStore::new();
        let stack = BuildSurfaces::new(&build, PlasmaShape::new(800.0, 100.0, 300.0))
            .execute(&mut store)
            .unwrap();
        let err = AssembleCells::new(&build, &stack, &materials())
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            RadialBuildError::Resolution(ResolutionError::MaterialNotFound { name }) if name == "PbLi"
        ));
        assert_eq!(store.cell_count(), 0);
    }
}
