//! Import of angle-resolved builds in the parastell format.
//!
//! A parastell build gives every component a thickness matrix indexed by
//! toroidal angle (`phi`) then poloidal angle (`theta`). Sampling it at one
//! angle pair yields an ordinary [`RadialBuild`].

use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{ConfigError, Result};
use crate::math::TOLERANCE;
use crate::model::{Layer, RadialBuild};

/// One component of a parastell build.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParastellComponent {
    #[serde(skip)]
    pub name: String,
    /// Thickness in cm, `thickness_matrix[phi_index][theta_index]`.
    pub thickness_matrix: Vec<Vec<f64>>,
    /// Material tag of the component, kept as the layer description.
    #[serde(default)]
    pub h5m_tag: Option<String>,
}

/// An angle-resolved radial build.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParastellBuild {
    /// Toroidal angles, in degrees.
    pub phi_list: Vec<f64>,
    /// Poloidal angles, in degrees.
    pub theta_list: Vec<f64>,
    /// Components, innermost first.
    #[serde(deserialize_with = "ordered_components")]
    pub radial_build: Vec<ParastellComponent>,
}

impl ParastellBuild {
    /// Parses a build from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid parastell build.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a build from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Samples the build at one `(phi, theta)` pair.
    ///
    /// Both angles must appear in the corresponding angle list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AngleNotFound`] for an unknown angle,
    /// [`ConfigError::MalformedThicknessMatrix`] if a matrix does not cover
    /// the angle grid, or the usual layer validation errors.
    pub fn sample(&self, phi: f64, theta: f64) -> Result<RadialBuild> {
        let phi_index = angle_index(&self.phi_list, phi, "phi")?;
        let theta_index = angle_index(&self.theta_list, theta, "theta")?;

        let mut layers = Vec::with_capacity(self.radial_build.len());
        for component in &self.radial_build {
            let thickness = component
                .thickness_matrix
                .get(phi_index)
                .and_then(|row| row.get(theta_index))
                .copied()
                .ok_or_else(|| ConfigError::MalformedThicknessMatrix(component.name.clone()))?;
            let mut layer = Layer::new(&component.name).with_thickness(thickness);
            if let Some(tag) = &component.h5m_tag {
                layer = layer.with_description(tag);
            }
            layers.push(layer);
        }
        tracing::debug!(phi, theta, layers = layers.len(), "sampled parastell build");
        Ok(RadialBuild::new(layers)?)
    }
}

fn angle_index(
    angles: &[f64],
    value: f64,
    axis: &'static str,
) -> std::result::Result<usize, ConfigError> {
    angles
        .iter()
        .position(|a| (a - value).abs() <= TOLERANCE)
        .ok_or(ConfigError::AngleNotFound { axis, value })
}

/// Reads the component map keeping document order.
fn ordered_components<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<ParastellComponent>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ComponentsVisitor;

    impl<'de> Visitor<'de> for ComponentsVisitor {
        type Value = Vec<ParastellComponent>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of component name to component")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut map: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut components = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, mut component)) =
                map.next_entry::<String, ParastellComponent>()?
            {
                component.name = name;
                components.push(component);
            }
            Ok(components)
        }
    }

    deserializer.deserialize_map(ComponentsVisitor)
}
