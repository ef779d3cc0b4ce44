use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Layer;
use crate::error::ConfigError;

/// Cell name reserved for the plasma region.
pub const PLASMA_CELL: &str = "plasma_cell";

/// Cell name reserved for the bounding escape region.
pub const VACUUM_CELL: &str = "vac_cell";

/// The ordered stack of layers, innermost (plasma side) first.
///
/// Order is the stacking order and is preserved by every consumer. Layer
/// names are unique, non-empty and distinct from the reserved cell names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct RadialBuild {
    layers: Vec<Layer>,
}

impl RadialBuild {
    /// Creates a build from layers listed innermost first.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer name is empty, reserved or repeated, or
    /// if a declared thickness is negative or not finite.
    pub fn new(layers: Vec<Layer>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(layers.len());
        for layer in &layers {
            layer.validate()?;
            if layer.name() == PLASMA_CELL || layer.name() == VACUUM_CELL {
                return Err(ConfigError::ReservedLayerName(layer.name().to_owned()));
            }
            if !seen.insert(layer.name()) {
                return Err(ConfigError::DuplicateLayer(layer.name().to_owned()));
            }
        }
        Ok(Self { layers })
    }

    /// Returns the layers in stacking order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Iterates the layers in stacking order.
    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    /// Iterates the layers that occupy radial space.
    pub fn physical_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.thickness().is_physical())
    }

    /// Looks up a layer by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the build has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total declared thickness of all layers.
    #[must_use]
    pub fn total_thickness(&self) -> f64 {
        self.layers
            .iter()
            .filter_map(|l| l.thickness().value())
            .sum()
    }
}

impl TryFrom<Vec<Layer>> for RadialBuild {
    type Error = ConfigError;

    fn try_from(layers: Vec<Layer>) -> Result<Self, Self::Error> {
        Self::new(layers)
    }
}

impl From<RadialBuild> for Vec<Layer> {
    fn from(build: RadialBuild) -> Self {
        build.layers
    }
}

impl<'a> IntoIterator for &'a RadialBuild {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let build = RadialBuild::new(vec![
            Layer::new("sol").with_thickness(5.0),
            Layer::new("fw").with_thickness(4.0),
            Layer::new("gap").with_thickness(0.0),
        ])
        .unwrap();
        let names: Vec<_> = build.iter().map(Layer::name).collect();
        assert_eq!(names, ["sol", "fw", "gap"]);
        assert_eq!(build.physical_layers().count(), 2);
        assert!((build.total_thickness() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = RadialBuild::new(vec![Layer::new("fw"), Layer::new("fw")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLayer(name) if name == "fw"));
    }

    #[test]
    fn reserved_names_are_rejected() {
        assert!(matches!(
            RadialBuild::new(vec![Layer::new(VACUUM_CELL)]),
            Err(ConfigError::ReservedLayerName(_))
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            RadialBuild::new(vec![Layer::new("")]),
            Err(ConfigError::EmptyLayerName)
        ));
    }

    #[test]
    fn empty_build_is_valid() {
        let build = RadialBuild::new(Vec::new()).unwrap();
        assert!(build.is_empty());
    }
}
