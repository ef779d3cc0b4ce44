use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{file_stem, LayoutConfig};
use crate::error::Result;
use crate::model::RadialBuild;

/// Human-editable record of a layout: the options and the layers, in order.
///
/// Serialized as TOML with a `[layout]` table followed by one `[[layers]]`
/// table per layer, so reloading reproduces the same build and options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutDescription {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub layers: RadialBuild,
}

impl LayoutDescription {
    #[must_use]
    pub fn new(layout: LayoutConfig, layers: RadialBuild) -> Self {
        Self { layout, layers }
    }

    /// Serializes the description as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented in TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Parses a TOML description, validating the options and layers.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML, a layer is invalid,
    /// or an option fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let description: Self = toml::from_str(text)?;
        description.layout.validate()?;
        Ok(description)
    }

    /// Reads a description from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Writes the description to `<title without spaces>.toml` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let text = self.to_toml_string()?;
        let path = dir
            .as_ref()
            .join(format!("{}.toml", file_stem(&self.layout.title)));
        std::fs::write(&path, text)?;
        Ok(path)
    }

    #[must_use]
    pub fn into_parts(self) -> (LayoutConfig, RadialBuild) {
        (self.layout, self.layers)
    }
}
