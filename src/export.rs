//! XML export of a geometry bundle.
//!
//! The document holds three sections: materials (numbered in order of first
//! use), geometry (surfaces and cells with half-space region expressions)
//! and tallies (cell filters with their scores).

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{ResolutionError, Result};
use crate::geometry::Surface;
use crate::material::MaterialStore;
use crate::operations::GeometryBundle;

impl GeometryBundle {
    /// Renders the bundle as an XML model description.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced cell, surface or material is missing.
    pub fn to_xml(&self, materials: &MaterialStore) -> Result<String> {
        let mut out = String::from("<?xml version='1.0' encoding='utf-8'?>\n<model>\n");

        out.push_str("  <materials>\n");
        for (index, &id) in self.materials.iter().enumerate() {
            let material = materials.get(id).ok_or_else(|| ResolutionError::MaterialNotFound {
                name: format!("#{}", index + 1),
            })?;
            let _ = write!(
                out,
                "    <material id=\"{}\" name=\"{}\"",
                index + 1,
                escape(&material.name)
            );
            if material.nuclides.is_empty() && material.density.is_none() {
                out.push_str(" />\n");
                continue;
            }
            out.push_str(">\n");
            if let Some(density) = material.density {
                let _ = writeln!(out, "      <density units=\"g/cm3\" value=\"{density}\" />");
            }
            for (nuclide, fraction) in &material.nuclides {
                let _ = writeln!(
                    out,
                    "      <nuclide name=\"{}\" ao=\"{fraction}\" />",
                    escape(nuclide)
                );
            }
            out.push_str("    </material>\n");
        }
        out.push_str("  </materials>\n");

        out.push_str("  <geometry>\n");
        for (_, surface) in self.store.surfaces() {
            let coeffs = surface
                .kind
                .coefficients()
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(
                out,
                "    <surface id=\"{}\" name=\"{}\" type=\"{}\" coeffs=\"{coeffs}\" boundary=\"{}\" />",
                surface.number,
                escape(&surface.name),
                surface.kind.type_name(),
                surface.boundary.as_str()
            );
        }
        for (_, cell) in self.store.cells() {
            let fill = match cell.fill {
                Some(id) => self
                    .materials
                    .iter()
                    .position(|&m| m == id)
                    .map_or_else(|| "void".to_owned(), |i| (i + 1).to_string()),
                None => "void".to_owned(),
            };
            let _ = writeln!(
                out,
                "    <cell id=\"{}\" name=\"{}\" material=\"{fill}\" region=\"{}\" universe=\"0\" />",
                cell.number,
                escape(&cell.name),
                cell.region.expression(&self.store)?
            );
        }
        out.push_str("  </geometry>\n");

        out.push_str("  <tallies>\n");
        for (index, tally) in self.tallies.iter().enumerate() {
            let cell = self.store.cell(tally.cell)?;
            let _ = writeln!(
                out,
                "    <filter id=\"{0}\" type=\"cell\" bins=\"{1}\" />\n    <tally id=\"{0}\" name=\"{2}\">\n      <filters>{0}</filters>\n      <scores>{3}</scores>\n    </tally>",
                index + 1,
                cell.number,
                escape(&tally.name),
                escape(&tally.scores.join(" "))
            );
        }
        out.push_str("  </tallies>\n</model>\n");
        Ok(out)
    }

    /// Writes [`GeometryBundle::to_xml`] to `path`.
    ///
    /// The document is rendered completely before the file is created.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn write_xml(&self, materials: &MaterialStore, path: impl AsRef<Path>) -> Result<()> {
        let xml = self.to_xml(materials)?;
        std::fs::write(path, xml)?;
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
