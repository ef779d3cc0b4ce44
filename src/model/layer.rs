use serde::{Deserialize, Serialize};

use super::Color;
use crate::error::ConfigError;

/// Radial thickness of a layer.
///
/// Zero thickness is a distinct state, not a value every consumer has to
/// compare against: a [`Thickness::Logical`] layer has no geometry but is
/// still laid out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Thickness {
    /// No thickness given. Valid for layout only.
    #[default]
    Unset,
    /// Declared thickness of exactly zero.
    Logical,
    /// Positive radial extent.
    Physical(f64),
}

impl Thickness {
    /// Classifies a declared thickness value.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        if value == 0.0 {
            Self::Logical
        } else {
            Self::Physical(value)
        }
    }

    /// Returns the declared value, with `0.0` for logical layers.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Unset => None,
            Self::Logical => Some(0.0),
            Self::Physical(t) => Some(t),
        }
    }

    /// Returns `true` if the layer occupies radial space.
    #[must_use]
    pub fn is_physical(self) -> bool {
        matches!(self, Self::Physical(_))
    }
}

/// One entry of a layer's composition summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constituent {
    /// Material name as displayed.
    pub material: String,
    /// Volume fraction, `1.0` meaning the whole layer.
    pub fraction: f64,
}

/// One named radial slice of the build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayerRecord", into = "LayerRecord")]
pub struct Layer {
    name: String,
    thickness: Thickness,
    composition: Vec<Constituent>,
    material_name: Option<String>,
    color: Option<Color>,
    description: Option<String>,
    scores: Vec<String>,
}

impl Layer {
    /// Creates a layer with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thickness: Thickness::Unset,
            composition: Vec::new(),
            material_name: None,
            color: None,
            description: None,
            scores: Vec::new(),
        }
    }

    /// Sets the declared thickness. Zero makes the layer logical.
    ///
    /// The value is checked when the layer joins a [`RadialBuild`](super::RadialBuild).
    #[must_use]
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Thickness::from_value(thickness);
        self
    }

    /// Appends a composition entry.
    #[must_use]
    pub fn with_constituent(mut self, material: impl Into<String>, fraction: f64) -> Self {
        self.composition.push(Constituent {
            material: material.into(),
            fraction,
        });
        self
    }

    /// Sets the name of the material filling this layer's cell.
    #[must_use]
    pub fn with_material(mut self, material_name: impl Into<String>) -> Self {
        self.material_name = Some(material_name.into());
        self
    }

    /// Sets an explicit display color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds measurement quantities to score in this layer. Repeats are ignored.
    #[must_use]
    pub fn with_scores<I, S>(mut self, scores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for score in scores {
            let score = score.into();
            if !self.scores.contains(&score) {
                self.scores.push(score);
            }
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn thickness(&self) -> Thickness {
        self.thickness
    }

    #[must_use]
    pub fn composition(&self) -> &[Constituent] {
        &self.composition
    }

    #[must_use]
    pub fn material_name(&self) -> Option<&str> {
        self.material_name.as_deref()
    }

    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn scores(&self) -> &[String] {
        &self.scores
    }

    /// Checks the fields that builder methods accept unchecked.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyLayerName);
        }
        if let Thickness::Physical(t) = self.thickness {
            if !t.is_finite() || t < 0.0 {
                return Err(ConfigError::InvalidThickness {
                    layer: self.name.clone(),
                    value: t,
                });
            }
        }
        Ok(())
    }
}

/// Serialized form of a [`Layer`].
///
/// Composition goes last so it serializes as a trailing array of tables.
#[derive(Debug, Serialize, Deserialize)]
struct LayerRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    material_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    scores: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    composition: Vec<Constituent>,
}

impl TryFrom<LayerRecord> for Layer {
    type Error = ConfigError;

    fn try_from(record: LayerRecord) -> Result<Self, Self::Error> {
        let mut layer = Self::new(record.name).with_scores(record.scores);
        if let Some(t) = record.thickness {
            layer = layer.with_thickness(t);
        }
        layer.composition = record.composition;
        layer.material_name = record.material_name;
        layer.color = record.color;
        layer.description = record.description;
        layer.validate()?;
        Ok(layer)
    }
}

impl From<Layer> for LayerRecord {
    fn from(layer: Layer) -> Self {
        Self {
            name: layer.name,
            thickness: layer.thickness.value(),
            material_name: layer.material_name,
            color: layer.color,
            description: layer.description,
            scores: layer.scores,
            composition: layer.composition,
        }
    }
}
