use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::Layout;
use crate::error::Result;
use crate::math::Point2;
use crate::model::Color;

/// Pixels per inch of the rendered figure.
const DPI: f64 = 200.0;

/// Fraction of each figure dimension kept free around the plot.
const MARGIN: f64 = 0.05;

const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// A sink for the primitives of a schematic, in layout coordinates.
pub trait DrawingSurface {
    /// Fills an axis-aligned rectangle with `origin` as its lower-left corner.
    fn rectangle(&mut self, origin: Point2, width: f64, height: f64, fill: Color);

    /// Places possibly multi-line text centered on `anchor`, reading upward.
    fn label(&mut self, anchor: Point2, text: &str);

    /// Sets the figure title.
    fn title(&mut self, text: &str);
}

impl Layout {
    /// Draws every rectangle, then every label, then the title.
    pub fn draw<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        for entry in &self.entries {
            surface.rectangle(entry.origin, entry.width, entry.height, entry.color);
        }
        for entry in &self.entries {
            surface.label(entry.label_anchor, &entry.label);
        }
        surface.title(&self.title);
    }

    /// Renders the layout as an SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut surface = SvgSurface::new(self.total_width, self.height, self.size);
        self.draw(&mut surface);
        surface.finish()
    }

    /// Writes the SVG figure to `<title without spaces>.svg` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_svg(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let svg = self.to_svg();
        let path = dir.as_ref().join(format!("{}.svg", file_stem(&self.title)));
        std::fs::write(&path, svg)?;
        Ok(path)
    }
}

/// Output file stem for a figure title: spaces and characters that are not
/// portable in file names are dropped.
#[must_use]
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .filter(|c| !c.is_whitespace() && !RESERVED_CHARS.contains(c))
        .collect();
    if stem.is_empty() {
        "radial_build".to_owned()
    } else {
        stem
    }
}

/// SVG document builder mapping layout coordinates onto a fixed-size figure.
#[derive(Debug)]
pub struct SvgSurface {
    body: String,
    pixel_width: f64,
    pixel_height: f64,
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
    font_size: f64,
}

impl SvgSurface {
    /// Creates a surface showing `[0, data_width] x [0, data_height]` on a
    /// figure of `size` inches.
    #[must_use]
    pub fn new(data_width: f64, data_height: f64, size: [f64; 2]) -> Self {
        let pixel_width = size[0] * DPI;
        let pixel_height = size[1] * DPI;
        let offset_x = pixel_width * MARGIN;
        let offset_y = pixel_height * MARGIN;
        let plot_width = pixel_width - 2.0 * offset_x;
        let plot_height = pixel_height - 2.0 * offset_y;
        let scale_x = if data_width > 0.0 { plot_width / data_width } else { 1.0 };
        let scale_y = if data_height > 0.0 { plot_height / data_height } else { 1.0 };
        Self {
            body: String::new(),
            pixel_width,
            pixel_height,
            scale_x,
            scale_y,
            offset_x,
            offset_y,
            font_size: (pixel_height / 60.0).max(6.0),
        }
    }

    fn to_pixel(&self, p: Point2) -> (f64, f64) {
        (
            self.offset_x + p.x * self.scale_x,
            self.pixel_height - self.offset_y - p.y * self.scale_y,
        )
    }

    /// Closes the document and returns its text.
    #[must_use]
    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">\n  <rect width=\"100%\" height=\"100%\" fill=\"white\" />\n{body}</svg>\n",
            w = self.pixel_width,
            h = self.pixel_height,
            body = self.body
        )
    }
}

impl DrawingSurface for SvgSurface {
    fn rectangle(&mut self, origin: Point2, width: f64, height: f64, fill: Color) {
        let (x, y) = self.to_pixel(Point2::new(origin.x, origin.y + height));
        let _ = writeln!(
            self.body,
            "  <rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{fill}\" stroke=\"black\" stroke-width=\"1\" />",
            width * self.scale_x,
            height * self.scale_y
        );
    }

    fn label(&mut self, anchor: Point2, text: &str) {
        let (x, y) = self.to_pixel(anchor);
        let lines: Vec<&str> = text.lines().collect();
        #[allow(clippy::cast_precision_loss)]
        let first_dy = -(lines.len().saturating_sub(1) as f64) * 0.6;
        let _ = writeln!(
            self.body,
            "  <text transform=\"translate({x:.2} {y:.2}) rotate(-90)\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"{:.1}\">",
            self.font_size
        );
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { first_dy } else { 1.2 };
            let _ = writeln!(
                self.body,
                "    <tspan x=\"0\" dy=\"{dy:.2}em\">{}</tspan>",
                escape(line)
            );
        }
        self.body.push_str("  </text>\n");
    }

    fn title(&mut self, text: &str) {
        let _ = writeln!(
            self.body,
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"{:.1}\">{}</text>",
            self.pixel_width / 2.0,
            self.offset_y * 0.8,
            self.font_size * 1.5,
            escape(text)
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layout::LayoutEntry;

    #[derive(Default)]
    struct Recorder {
        rectangles: Vec<(Point2, f64, f64, Color)>,
        labels: Vec<String>,
        title: Option<String>,
    }

    impl DrawingSurface for Recorder {
        fn rectangle(&mut self, origin: Point2, width: f64, height: f64, fill: Color) {
            self.rectangles.push((origin, width, height, fill));
        }

        fn label(&mut self, _anchor: Point2, text: &str) {
            self.labels.push(text.to_owned());
        }

        fn title(&mut self, text: &str) {
            self.title = Some(text.to_owned());
        }
    }

    fn layout() -> Layout {
        let entry = |name: &str, x: f64, color| LayoutEntry {
            name: name.to_owned(),
            origin: Point2::new(x, 0.0),
            width: 16.0,
            height: 40.25,
            label: format!("{name}: 5 cm\nW: 100.0%"),
            color,
            label_anchor: Point2::new(x + 9.0, 20.125),
        };
        Layout {
            title: "Inboard <HCPB>".to_owned(),
            height: 40.25,
            total_width: 32.0,
            size: [8.0, 4.0],
            entries: vec![
                entry("sol", 0.0, Color::rgb(255, 0, 0)),
                entry("fw", 16.0, Color::rgb(0, 0, 255)),
            ],
        }
    }

    #[test]
    fn draw_visits_every_entry() {
        let mut recorder = Recorder::default();
        layout().draw(&mut recorder);
        assert_eq!(recorder.rectangles.len(), 2);
        assert_eq!(recorder.rectangles[1].3, Color::rgb(0, 0, 255));
        assert_eq!(recorder.labels[0], "sol: 5 cm\nW: 100.0%");
        assert_eq!(recorder.title.as_deref(), Some("Inboard <HCPB>"));
    }

    #[test]
    fn svg_contains_fills_and_escaped_text() {
        let svg = layout().to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"1600\" height=\"800\""));
        assert!(svg.contains("fill=\"#FF0000\""));
        assert!(svg.contains("fill=\"#0000FF\""));
        assert!(svg.contains(">Inboard &lt;HCPB&gt;</text>"));
        assert_eq!(svg.matches("<tspan").count(), 4);
    }

    #[test]
    fn stem_drops_spaces_and_separators() {
        assert_eq!(file_stem("Radial Build"), "RadialBuild");
        assert_eq!(file_stem("a/b: c"), "abc");
        assert_eq!(file_stem("   "), "radial_build");
    }

    #[test]
    fn write_svg_uses_title_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = layout().write_svg(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("InboardHCPB.svg"));
        assert!(std::fs::read_to_string(path).unwrap().ends_with("</svg>\n"));
    }
}
