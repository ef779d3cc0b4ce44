use rand::Rng;

use super::Palette;
use crate::error::{ConfigError, LayoutError};
use crate::model::{Color, Layer, RadialBuild};

/// A layer paired with the color it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedLayer<'a> {
    pub layer: &'a Layer,
    pub color: Color,
}

/// A build whose every layer has a display color.
///
/// The source build is borrowed, never modified. Use
/// [`AnnotatedBuild::to_build`] to obtain an owned build carrying the colors.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBuild<'a> {
    layers: Vec<AnnotatedLayer<'a>>,
}

impl<'a> AnnotatedBuild<'a> {
    /// Assigns colors to every layer of `build`.
    ///
    /// Explicit layer colors are kept and withdrawn from `palette` first;
    /// each remaining layer then draws a distinct color from what is left.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PaletteExhausted`] if the palette cannot cover
    /// every uncolored layer. Nothing is drawn in that case.
    pub fn assign<R: Rng + ?Sized>(
        build: &'a RadialBuild,
        palette: &mut Palette,
        rng: &mut R,
    ) -> Result<Self, LayoutError> {
        for color in build.iter().filter_map(Layer::color) {
            palette.reserve(color);
        }
        let uncolored = build.iter().filter(|l| l.color().is_none()).count();
        let mut drawn = palette.draw_many(uncolored, rng)?.into_iter();

        let mut layers = Vec::with_capacity(build.len());
        for layer in build {
            let color = match layer.color() {
                Some(color) => color,
                None => drawn.next().ok_or(LayoutError::PaletteExhausted {
                    requested: uncolored,
                    available: 0,
                })?,
            };
            layers.push(AnnotatedLayer { layer, color });
        }
        Ok(Self { layers })
    }

    /// Assigns `colors` in order to the layers of `build` that have no
    /// explicit color: the first uncolored layer takes `colors[0]`, the next
    /// `colors[1]`, and so on. Explicit layer colors are kept.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PaletteExhausted`] if `colors` is shorter than
    /// the number of uncolored layers.
    pub fn assign_in_order(
        build: &'a RadialBuild,
        colors: &[Color],
    ) -> Result<Self, LayoutError> {
        let uncolored = build.iter().filter(|l| l.color().is_none()).count();
        let exhausted = || LayoutError::PaletteExhausted {
            requested: uncolored,
            available: colors.len(),
        };
        if colors.len() < uncolored {
            return Err(exhausted());
        }
        let mut listed = colors.iter().copied();

        let mut layers = Vec::with_capacity(build.len());
        for layer in build {
            let color = match layer.color() {
                Some(color) => color,
                None => listed.next().ok_or_else(exhausted)?,
            };
            layers.push(AnnotatedLayer { layer, color });
        }
        Ok(Self { layers })
    }

    /// The annotated layers in stacking order.
    #[must_use]
    pub fn layers(&self) -> &[AnnotatedLayer<'a>] {
        &self.layers
    }

    /// Returns an owned copy of the build with every color made explicit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the source build was itself invalid.
    pub fn to_build(&self) -> Result<RadialBuild, ConfigError> {
        RadialBuild::new(
            self.layers
                .iter()
                .map(|a| a.layer.clone().with_color(a.color))
                .collect(),
        )
    }
}
