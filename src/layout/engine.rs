use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::wrap::{composition_summary, wrap_text};
use super::{AnnotatedBuild, LayoutDescription, Palette};
use crate::error::{ConfigError, Result};
use crate::math::Point2;
use crate::model::{Color, Layer, RadialBuild};

/// Options controlling the schematic layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Figure title, also the output file stem once spaces are removed.
    pub title: String,
    /// Colors for the layers without an explicit color, in layer order.
    /// When absent, colors are drawn at random from the built-in palette.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<Color>>,
    /// Maximum characters per label line.
    pub max_characters: usize,
    /// Upper bound on a layer's drawn width; unbounded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_thickness: Option<f64>,
    /// Figure size in inches, width then height.
    pub size: [f64; 2],
    /// Unit printed after each thickness.
    pub unit: String,
    /// Drawn width of one label line.
    pub line_height: f64,
    /// Extra blank lines reserved around each label.
    pub padding_lines: usize,
    /// Canvas height per label character.
    pub char_to_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title: "Radial Build".to_owned(),
            colors: None,
            max_characters: 35,
            max_thickness: None,
            size: [8.0, 4.0],
            unit: "cm".to_owned(),
            line_height: 8.0,
            padding_lines: 1,
            char_to_height: 1.15,
        }
    }
}

impl LayoutConfig {
    /// Checks that every option is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] naming the first bad option.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |option, reason: &str| ConfigError::InvalidOption {
            option,
            reason: reason.to_owned(),
        };
        if self.max_characters == 0 {
            return Err(invalid("max_characters", "must be at least 1"));
        }
        if let Some(max) = self.max_thickness {
            if !max.is_finite() || max <= 0.0 {
                return Err(invalid("max_thickness", "must be positive and finite"));
            }
        }
        if self.size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(invalid("size", "both dimensions must be positive"));
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(invalid("line_height", "must be positive and finite"));
        }
        if !self.char_to_height.is_finite() || self.char_to_height <= 0.0 {
            return Err(invalid("char_to_height", "must be positive and finite"));
        }
        if self.colors.as_ref().is_some_and(Vec::is_empty) {
            return Err(invalid("colors", "color list must not be empty"));
        }
        Ok(())
    }

    /// Canvas height shared by every rectangle.
    #[must_use]
    pub fn canvas_height(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let chars = self.max_characters as f64;
        self.char_to_height * chars
    }
}

/// One rectangle of the schematic.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEntry {
    pub name: String,
    /// Lower-left corner.
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub color: Color,
    /// Center of the label text.
    pub label_anchor: Point2,
}

/// A computed schematic: rectangles laid side by side, innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: String,
    /// Canvas height.
    pub height: f64,
    /// Sum of every entry width.
    pub total_width: f64,
    /// Figure size in inches.
    pub size: [f64; 2],
    pub entries: Vec<LayoutEntry>,
}

impl Layout {
    /// Looks up an entry by layer name.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&LayoutEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Computes schematic layouts of radial builds.
///
/// The engine owns its palette and random source. Each call to
/// [`LayoutEngine::layout`] starts from the full palette, so layouts are
/// independent of one another; a seeded engine is fully reproducible.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    palette: Palette,
    rng: StdRng,
}

impl LayoutEngine {
    /// Creates an engine seeded from system entropy.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: LayoutConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            palette: Palette::builtin(),
            rng: StdRng::from_entropy(),
        })
    }

    /// Replaces the random source with one seeded from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The engine's options.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Assigns a color to every layer of `build`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured colors or the palette cannot cover
    /// the uncolored layers.
    pub fn annotate<'b>(&mut self, build: &'b RadialBuild) -> Result<AnnotatedBuild<'b>> {
        let annotated = match &self.config.colors {
            Some(colors) => AnnotatedBuild::assign_in_order(build, colors)?,
            None => {
                let mut palette = self.palette.clone();
                AnnotatedBuild::assign(build, &mut palette, &mut self.rng)?
            }
        };
        Ok(annotated)
    }

    /// Builds the label text of a layer.
    #[must_use]
    pub fn layer_label(&self, layer: &Layer) -> String {
        let width = self.config.max_characters;
        let mut parts = Vec::with_capacity(3);
        parts.push(match layer.thickness().value() {
            Some(t) => format!("{}: {t} {}", layer.name(), self.config.unit),
            None => layer.name().to_owned(),
        });
        if let Some(summary) = composition_summary(layer.composition(), width) {
            parts.push(summary);
        }
        if let Some(description) = layer.description() {
            parts.push(wrap_text(description, width));
        }
        parts.join("\n").trim_end().to_owned()
    }

    /// Drawn width of a layer given its label.
    ///
    /// Returns the width and whether `max_thickness` capped it.
    #[must_use]
    pub fn display_width(&self, layer: &Layer, label: &str) -> (f64, bool) {
        let lines = label.lines().count().max(1) + self.config.padding_lines;
        #[allow(clippy::cast_precision_loss)]
        let min_width = lines as f64 * self.config.line_height;
        let declared = layer
            .thickness()
            .value()
            .unwrap_or(self.config.line_height);
        let width = declared.max(min_width);
        match self.config.max_thickness {
            Some(max) if width > max => (max, true),
            _ => (width, false),
        }
    }

    /// Lays out every layer of `build` side by side.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette cannot cover the uncolored layers.
    pub fn layout(&mut self, build: &RadialBuild) -> Result<Layout> {
        let annotated = self.annotate(build)?;
        Ok(self.layout_annotated(&annotated))
    }

    fn layout_annotated(&self, annotated: &AnnotatedBuild<'_>) -> Layout {
        let height = self.config.canvas_height();
        let mut total_width = 0.0;
        let mut entries = Vec::with_capacity(annotated.layers().len());
        for a in annotated.layers() {
            let label = self.layer_label(a.layer);
            let (width, capped) = self.display_width(a.layer, &label);
            if capped {
                tracing::warn!(
                    layer = a.layer.name(),
                    width,
                    "layer width capped by max_thickness"
                );
            }
            entries.push(LayoutEntry {
                name: a.layer.name().to_owned(),
                origin: Point2::new(total_width, 0.0),
                width,
                height,
                label_anchor: Point2::new(total_width + width / 2.0 + 1.0, height / 2.0),
                label,
                color: a.color,
            });
            total_width += width;
        }
        tracing::info!(
            title = %self.config.title,
            layers = entries.len(),
            total_width,
            "computed layout"
        );
        Layout {
            title: self.config.title.clone(),
            height,
            total_width,
            size: self.config.size,
            entries,
        }
    }

    /// Lays out `build` and writes the SVG figure into `dir`, plus the TOML
    /// layout description when `with_description` is set.
    ///
    /// Both documents are rendered before any file is written, and a failed
    /// write removes the files already written. Returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns an error if layout fails or a file cannot be written.
    pub fn plot_to_dir(
        &mut self,
        build: &RadialBuild,
        dir: impl AsRef<Path>,
        with_description: bool,
    ) -> Result<Vec<PathBuf>> {
        let annotated = self.annotate(build)?;
        let layout = self.layout_annotated(&annotated);
        let svg = layout.to_svg();
        let description = if with_description {
            let description = LayoutDescription::new(self.config.clone(), annotated.to_build()?);
            Some(description.to_toml_string()?)
        } else {
            None
        };

        let dir = dir.as_ref();
        let stem = super::file_stem(&self.config.title);
        let svg_path = dir.join(format!("{stem}.svg"));
        std::fs::write(&svg_path, svg)?;
        let mut written = vec![svg_path];
        if let Some(toml) = description {
            let toml_path = dir.join(format!("{stem}.toml"));
            if let Err(err) = std::fs::write(&toml_path, toml) {
                for path in &written {
                    let _ = std::fs::remove_file(path);
                }
                return Err(err.into());
            }
            written.push(toml_path);
        }
        Ok(written)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutConfig::default())
            .unwrap()
            .with_seed(11)
    }

    #[test]
    fn label_holds_thickness_composition_and_description() {
        let layer = Layer::new("FW")
            .with_thickness(4.0)
            .with_constituent("MF82H", 0.34)
            .with_constituent("He", 0.66)
            .with_description("first wall");
        assert_eq!(
            engine().layer_label(&layer),
            "FW: 4 cm\nMF82H: 34.0%, He: 66.0%\nfirst wall"
        );
    }

    #[test]
    fn unset_thickness_label_is_name_only() {
        assert_eq!(engine().layer_label(&Layer::new("gap")), "gap");
    }

    #[test]
    fn thin_layers_get_legible_width() {
        let engine = engine();
        let layer = Layer::new("gap").with_thickness(0.0);
        let label = engine.layer_label(&layer);
        let (width, capped) = engine.display_width(&layer, &label);
        assert_relative_eq!(width, 16.0);
        assert!(!capped);
    }

    #[test]
    fn thick_layers_keep_their_thickness() {
        let engine = engine();
        let layer = Layer::new("shield").with_thickness(50.0);
        let label = engine.layer_label(&layer);
        assert_relative_eq!(engine.display_width(&layer, &label).0, 50.0);
    }

    #[test]
    fn max_thickness_caps_width() {
        let config = LayoutConfig {
            max_thickness: Some(30.0),
            ..LayoutConfig::default()
        };
        let engine = LayoutEngine::new(config).unwrap();
        let layer = Layer::new("shield").with_thickness(50.0);
        let label = engine.layer_label(&layer);
        assert_eq!(engine.display_width(&layer, &label), (30.0, true));
    }

    #[test]
    fn rectangles_are_contiguous() {
        let build = RadialBuild::new(vec![
            Layer::new("sol").with_thickness(5.0),
            Layer::new("fw").with_thickness(20.0),
            Layer::new("gap"),
        ])
        .unwrap();
        let layout = engine().layout(&build).unwrap();
        let mut x = 0.0;
        for entry in &layout.entries {
            assert_relative_eq!(entry.origin.x, x);
            assert_relative_eq!(entry.height, layout.height);
            x += entry.width;
        }
        assert_relative_eq!(layout.total_width, x);
        assert_relative_eq!(layout.height, 1.15 * 35.0);
        let fw = layout.entry("fw").unwrap();
        assert_relative_eq!(fw.label_anchor.x, 16.0 + 10.0 + 1.0);
    }

    #[test]
    fn zero_max_characters_is_rejected() {
        let config = LayoutConfig {
            max_characters: 0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            LayoutEngine::new(config),
            Err(ConfigError::InvalidOption {
                option: "max_characters",
                ..
            })
        ));
    }

    #[test]
    fn seeded_engines_agree() {
        let build = RadialBuild::new(vec![Layer::new("a"), Layer::new("b")]).unwrap();
        let first = engine().layout(&build).unwrap();
        let second = engine().layout(&build).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn plot_writes_svg_and_description() {
        let build = RadialBuild::new(vec![Layer::new("sol").with_thickness(5.0)]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let written = engine().plot_to_dir(&build, dir.path(), true).unwrap();
        assert_eq!(
            written,
            [dir.path().join("RadialBuild.svg"), dir.path().join("RadialBuild.toml")]
        );
        assert!(written.iter().all(|p| p.exists()));
    }

    fn narrow_engine(max_thickness: Option<f64>) -> LayoutEngine {
        let config = LayoutConfig {
            max_characters: 10,
            max_thickness,
            ..LayoutConfig::default()
        };
        LayoutEngine::new(config).unwrap()
    }

    fn armour_gap() -> Layer {
        Layer::new("gap")
            .with_thickness(0.0)
            .with_description("first wall armour tile gap")
    }

    #[test]
    fn wrapped_lines_widen_thin_layers() {
        let engine = narrow_engine(None);
        let layer = armour_gap();
        let label = engine.layer_label(&layer);
        assert_eq!(label, "gap: 0 cm\nfirst wall\narmour\ntile gap");
        let (width, capped) = engine.display_width(&layer, &label);
        assert_relative_eq!(width, (4.0 + 1.0) * 8.0);
        assert!(!capped);
    }

    #[test]
    fn max_thickness_wins_over_label_minimum() {
        let engine = narrow_engine(Some(24.0));
        let layer = armour_gap();
        let label = engine.layer_label(&layer);
        assert_eq!(engine.display_width(&layer, &label), (24.0, true));
    }

    #[test]
    fn configured_colors_keep_layer_order() {
        let listed = vec![Color::rgb(1, 0, 0), Color::rgb(0, 1, 0), Color::rgb(0, 0, 1)];
        let config = LayoutConfig {
            colors: Some(listed.clone()),
            ..LayoutConfig::default()
        };
        let build =
            RadialBuild::new(vec![Layer::new("a"), Layer::new("b"), Layer::new("c")]).unwrap();
        for seed in 0..10 {
            let layout = LayoutEngine::new(config.clone())
                .unwrap()
                .with_seed(seed)
                .layout(&build)
                .unwrap();
            let colors: Vec<_> = layout.entries.iter().map(|e| e.color).collect();
            assert_eq!(colors, listed, "seed {seed}");
        }
    }

    #[test]
    fn failed_description_write_removes_svg() {
        let build = RadialBuild::new(vec![Layer::new("sol").with_thickness(5.0)]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("RadialBuild.toml")).unwrap();
        assert!(engine().plot_to_dir(&build, dir.path(), true).is_err());
        assert!(!dir.path().join("RadialBuild.svg").exists());
    }
}
