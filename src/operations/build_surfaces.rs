use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::geometry::{BoundaryType, GeometryStore, Region, SurfaceId, ZTorus};
use crate::math::{Point3, TOLERANCE};
use crate::model::{RadialBuild, Thickness};

/// Name of the surface bounding the plasma.
pub const PLASMA_SURFACE: &str = "plasma_surface";

/// Fixed dimensions of the plasma torus the build is stacked on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlasmaShape {
    /// Distance from the Z axis to the plasma center (`a`).
    pub major_radius: f64,
    /// Plasma semi-axis along Z (`b`).
    pub minor_radius_z: f64,
    /// Plasma semi-axis in the XY plane (`c`).
    pub minor_radius_xy: f64,
}

impl PlasmaShape {
    /// Creates a plasma shape.
    #[must_use]
    pub fn new(major_radius: f64, minor_radius_z: f64, minor_radius_xy: f64) -> Self {
        Self {
            major_radius,
            minor_radius_z,
            minor_radius_xy,
        }
    }

    /// Checks that every radius is positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DegenerateRadius`] naming the first bad radius.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (name, value) in [
            ("major_radius", self.major_radius),
            ("minor_radius_z", self.minor_radius_z),
            ("minor_radius_xy", self.minor_radius_xy),
        ] {
            if !value.is_finite() || value < TOLERANCE {
                return Err(ConfigError::DegenerateRadius { name, value });
            }
        }
        Ok(())
    }
}

/// A constructed layer boundary and the region it closes.
#[derive(Debug, Clone)]
pub struct StackEntry {
    /// Index of the source layer in the build.
    pub layer_index: usize,
    /// Outer boundary of the layer.
    pub surface: SurfaceId,
    /// Interior of `surface` minus the interior of the previous surface.
    pub region: Region,
    /// Minor radius along Z after this layer.
    pub minor_radius_z: f64,
    /// Minor radius in the XY plane after this layer.
    pub minor_radius_xy: f64,
}

/// The nested toroidal surfaces of a build, plasma first.
#[derive(Debug, Clone)]
pub struct SurfaceStack {
    /// The plasma boundary.
    pub plasma_surface: SurfaceId,
    /// Interior of the plasma boundary.
    pub plasma_region: Region,
    /// One entry per layer with physical thickness, in stacking order.
    pub entries: Vec<StackEntry>,
}

impl SurfaceStack {
    /// The last constructed surface, which bounds the escape region.
    #[must_use]
    pub fn outermost(&self) -> SurfaceId {
        self.entries
            .last()
            .map_or(self.plasma_surface, |entry| entry.surface)
    }
}

/// Accumulates layer thicknesses into nested Z-axis tori.
///
/// Starting from the plasma minor radii, every layer with physical thickness
/// grows both minor radii by its thickness and closes a new surface. Logical
/// (zero-thickness) layers leave the accumulator untouched.
pub struct BuildSurfaces<'a> {
    build: &'a RadialBuild,
    shape: PlasmaShape,
}

impl<'a> BuildSurfaces<'a> {
    /// Creates a new `BuildSurfaces` operation.
    #[must_use]
    pub fn new(build: &'a RadialBuild, shape: PlasmaShape) -> Self {
        Self { build, shape }
    }

    /// Executes the operation, adding one surface per physical layer plus the
    /// plasma surface to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the plasma radii are degenerate, a layer has no
    /// thickness, or a layer fails to grow the radii.
    pub fn execute(&self, store: &mut GeometryStore) -> Result<SurfaceStack> {
        self.shape.validate()?;
        let a = self.shape.major_radius;
        let mut b = self.shape.minor_radius_z;
        let mut c = self.shape.minor_radius_xy;

        let plasma_surface = store.add_surface(
            PLASMA_SURFACE,
            ZTorus::new(Point3::origin(), a, b, c)?,
            BoundaryType::Transmission,
        );
        let plasma_region = Region::inside(plasma_surface);

        let mut previous = plasma_surface;
        let mut entries = Vec::new();
        for (layer_index, layer) in self.build.iter().enumerate() {
            let thickness = match layer.thickness() {
                Thickness::Unset => {
                    return Err(ConfigError::MissingThickness(layer.name().to_owned()).into())
                }
                Thickness::Logical => {
                    tracing::debug!(layer = layer.name(), "logical layer, no surface");
                    continue;
                }
                Thickness::Physical(t) => t,
            };

            b = grown_radius("minor_radius_z", b, thickness)?;
            c = grown_radius("minor_radius_xy", c, thickness)?;
            let surface = store.add_surface(
                layer.name(),
                ZTorus::new(Point3::origin(), a, b, c)?,
                BoundaryType::Transmission,
            );
            tracing::debug!(
                layer = layer.name(),
                minor_radius_z = b,
                minor_radius_xy = c,
                "constructed layer surface"
            );

            entries.push(StackEntry {
                layer_index,
                surface,
                region: Region::inside(surface).and(Region::outside(previous)),
                minor_radius_z: b,
                minor_radius_xy: c,
            });
            previous = surface;
        }

        Ok(SurfaceStack {
            plasma_surface,
            plasma_region,
            entries,
        })
    }
}

/// Grows a minor radius by `thickness`, rejecting steps that overflow or are
/// lost to rounding.
fn grown_radius(
    name: &'static str,
    radius: f64,
    thickness: f64,
) -> std::result::Result<f64, ConfigError> {
    let grown = radius + thickness;
    if grown.is_finite() && grown > radius {
        Ok(grown)
    } else {
        Err(ConfigError::DegenerateRadius { name, value: grown })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::RadialBuildError;
    use crate::model::Layer;

    fn shape() -> PlasmaShape {
        PlasmaShape::new(1000.0, 100.0, 100.0)
    }

    fn build() -> RadialBuild {
        RadialBuild::new(vec![
            Layer::new("sol").with_thickness(5.0),
            Layer::new("fw").with_thickness(4.0),
            Layer::new("bogus").with_thickness(0.0),
            Layer::new("shield").with_thickness(20.0),
        ])
        .unwrap()
    }

    #[test]
    fn one_surface_per_physical_layer() {
        let mut store = GeometryStore::new();
        let stack = BuildSurfaces::new(&build(), shape())
            .execute(&mut store)
            .unwrap();
        assert_eq!(stack.entries.len(), 3);
        assert_eq!(store.surface_count(), 4);
        let indices: Vec<_> = stack.entries.iter().map(|e| e.layer_index).collect();
        assert_eq!(indices, [0, 1, 3]);
    }

    #[test]
    fn radii_accumulate_past_logical_layers() {
        let mut store = GeometryStore::new();
        let stack = BuildSurfaces::new(&build(), shape())
            .execute(&mut store)
            .unwrap();
        let radii: Vec<_> = stack.entries.iter().map(|e| e.minor_radius_xy).collect();
        assert_eq!(radii, [105.0, 109.0, 129.0]);
        let outer = store.surface(stack.outermost()).unwrap();
        assert_eq!(outer.name, "shield");
    }

    #[test]
    fn layer_region_is_between_neighbouring_surfaces() {
        let mut store = GeometryStore::new();
        let stack = BuildSurfaces::new(&build(), shape())
            .execute(&mut store)
            .unwrap();
        let fw = &stack.entries[1].region;
        // fw spans minor radius 105..109 on the outboard midplane.
        assert!(fw.contains(&Point3::new(1107.0, 0.0, 0.0), &store).unwrap());
        assert!(!fw.contains(&Point3::new(1103.0, 0.0, 0.0), &store).unwrap());
        assert!(!fw.contains(&Point3::new(1111.0, 0.0, 0.0), &store).unwrap());
    }

    #[test]
    fn all_logical_build_has_only_plasma_surface() {
        let build = RadialBuild::new(vec![Layer::new("gap").with_thickness(0.0)]).unwrap();
        let mut store = GeometryStore::new();
        let stack = BuildSurfaces::new(&build, shape())
            .execute(&mut store)
            .unwrap();
        assert!(stack.entries.is_empty());
        assert_eq!(stack.outermost(), stack.plasma_surface);
    }

    #[test]
    fn unset_thickness_is_a_configuration_error() {
        let build = RadialBuild::new(vec![Layer::new("breeder")]).unwrap();
        let mut store = GeometryStore::new();
        let err = BuildSurfaces::new(&build, shape())
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            RadialBuildError::Config(ConfigError::MissingThickness(name)) if name == "breeder"
        ));
    }

    #[test]
    fn degenerate_plasma_radius_is_rejected() {
        let mut store = GeometryStore::new();
        let err = BuildSurfaces::new(&build(), PlasmaShape::new(1000.0, 0.0, 100.0))
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            RadialBuildError::Config(ConfigError::DegenerateRadius {
                name: "minor_radius_z",
                ..
            })
        ));
        assert_eq!(store.surface_count(), 0);
    }

    #[test]
    fn vanishing_thickness_is_rejected() {
        let build = RadialBuild::new(vec![Layer::new("film").with_thickness(1e-15)]).unwrap();
        let mut store = GeometryStore::new();
        let err = BuildSurfaces::new(&build, PlasmaShape::new(800.0, 100.0, 100.0))
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            RadialBuildError::Config(ConfigError::DegenerateRadius {
                name: "minor_radius_z",
                ..
            })
        ));
    }

    #[test]
    fn overflowing_radius_is_a_configuration_error() {
        let build = RadialBuild::new(vec![
            Layer::new("inner").with_thickness(f64::MAX),
            Layer::new("outer").with_thickness(f64::MAX),
        ])
        .unwrap();
        let mut store = GeometryStore::new();
        let err = BuildSurfaces::new(&build, shape())
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            RadialBuildError::Config(ConfigError::DegenerateRadius { value, .. }) if value.is_infinite()
        ));
    }
}
