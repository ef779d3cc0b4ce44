//! Material store and name-based material resolution.
//!
//! The store is an arena of [`Material`] records addressed by [`MaterialId`].
//! Layers refer to materials by name only; [`MaterialStore::resolve`] turns a
//! name into a handle and fails loudly when the name is missing or ambiguous.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use slotmap::SlotMap;

use crate::error::{ResolutionError, Result};

slotmap::new_key_type! {
    /// Unique identifier for a material in the material store.
    pub struct MaterialId;
}

/// A material definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Name used to resolve the material from a layer.
    pub name: String,
    /// Mass density in g/cm3, if known.
    pub density: Option<f64>,
    /// Nuclide (or element) fractions keyed by nuclide name.
    pub nuclides: BTreeMap<String, f64>,
}

impl Material {
    /// Creates a material with no density and no nuclides.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            density: None,
            nuclides: BTreeMap::new(),
        }
    }

    /// Sets the mass density in g/cm3.
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    /// Adds a nuclide fraction.
    #[must_use]
    pub fn with_nuclide(mut self, nuclide: impl Into<String>, fraction: f64) -> Self {
        self.nuclides.insert(nuclide.into(), fraction);
        self
    }
}

/// Library entry as written by mixed-material databases:
/// `{ "density": 7.8, "comp": { "Fe56": 0.9, ... } }`.
#[derive(Debug, Deserialize)]
struct MaterialRecord {
    #[serde(default)]
    density: Option<f64>,
    #[serde(default)]
    comp: BTreeMap<String, f64>,
}

/// Arena of materials queried by name.
#[derive(Debug, Default)]
pub struct MaterialStore {
    materials: SlotMap<MaterialId, Material>,
}

impl MaterialStore {
    /// Creates a new, empty material store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON material library keyed by material name.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: BTreeMap<String, MaterialRecord> = serde_json::from_str(json)?;
        let mut store = Self::new();
        for (name, record) in records {
            store.insert(Material {
                name,
                density: record.density,
                nuclides: record.comp,
            });
        }
        tracing::debug!(count = store.len(), "loaded material library");
        Ok(store)
    }

    /// Reads and parses a JSON material library from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Inserts a material and returns its ID.
    ///
    /// Duplicate names are accepted here; resolving such a name fails.
    pub fn insert(&mut self, material: Material) -> MaterialId {
        self.materials.insert(material)
    }

    /// Returns the material for `id`, if it belongs to this store.
    #[must_use]
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Iterates all materials.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter()
    }

    /// Returns the number of materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns `true` if the store holds no materials.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Resolves a material name to its handle.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::EmptyName`] for an empty name,
    /// [`ResolutionError::MaterialNotFound`] if no material has that name and
    /// [`ResolutionError::AmbiguousMaterial`] if several do.
    pub fn resolve(&self, name: &str) -> std::result::Result<MaterialId, ResolutionError> {
        if name.is_empty() {
            return Err(ResolutionError::EmptyName);
        }
        let mut matches = self
            .materials
            .iter()
            .filter(|(_, m)| m.name == name)
            .map(|(id, _)| id);
        let Some(first) = matches.next() else {
            return Err(ResolutionError::MaterialNotFound {
                name: name.to_owned(),
            });
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(ResolutionError::AmbiguousMaterial {
                name: name.to_owned(),
                count: extra + 1,
            });
        }
        Ok(first)
    }
}
