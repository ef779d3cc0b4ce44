use rand::Rng;

use crate::error::LayoutError;
use crate::model::Color;

/// Built-in palette of distinguishable fills (hex codes from the XKCD color
/// survey).
const BUILTIN: [&str; 48] = [
    "#ACC2D9", "#56AE57", "#B2996E", "#A8FF04", "#69D84F", "#894585", "#70B23F", "#D4FFFF",
    "#65AB7C", "#952E8F", "#FCFC81", "#A5A391", "#388004", "#4C9085", "#5E9B8A", "#EFB435",
    "#D99B82", "#0A5F38", "#0C06F7", "#61DE2A", "#3778BF", "#2242C7", "#533CC6", "#9BB53C",
    "#05FFA6", "#1F6357", "#017374", "#0CB577", "#FF0789", "#AFA88B", "#08787F", "#DD85D7",
    "#A6C875", "#A7FFB5", "#C2B709", "#E78EA5", "#966EBD", "#CCAD60", "#AC86A8", "#947E94",
    "#983FB2", "#FF63E9", "#B2FBA5", "#63B365", "#8EE53F", "#B7E1A1", "#FF6F52", "#BDF8A3",
];

/// The colors still available for automatic assignment.
///
/// Each draw removes the drawn color, so automatically assigned colors never
/// repeat. The palette owns no random state; callers pass the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    available: Vec<Color>,
}

impl Palette {
    /// Creates a palette from `colors`, dropping repeats.
    #[must_use]
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        let mut available = Vec::new();
        for color in colors {
            if !available.contains(&color) {
                available.push(color);
            }
        }
        Self { available }
    }

    /// The built-in palette.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN.iter().filter_map(|hex| hex.parse().ok()))
    }

    /// Number of colors left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Returns `true` if `color` can still be drawn.
    #[must_use]
    pub fn contains(&self, color: Color) -> bool {
        self.available.contains(&color)
    }

    /// Marks `color` as used so it is never drawn.
    pub fn reserve(&mut self, color: Color) {
        self.available.retain(|&c| c != color);
    }

    /// Removes and returns a random remaining color.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PaletteExhausted`] if no color is left.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Color, LayoutError> {
        if self.available.is_empty() {
            return Err(LayoutError::PaletteExhausted {
                requested: 1,
                available: 0,
            });
        }
        let index = rng.gen_range(0..self.available.len());
        Ok(self.available.swap_remove(index))
    }

    /// Draws `count` distinct colors, or none at all if fewer remain.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::PaletteExhausted`] if fewer than `count` colors
    /// remain; the palette is left unchanged.
    pub fn draw_many<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Color>, LayoutError> {
        if count > self.available.len() {
            return Err(LayoutError::PaletteExhausted {
                requested: count,
                available: self.available.len(),
            });
        }
        (0..count).map(|_| self.draw(rng)).collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::builtin()
    }
}
