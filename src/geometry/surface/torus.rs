use crate::error::{GeometryError, Result};
use crate::geometry::Aabb;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Surface;

/// A torus whose symmetry axis is parallel to Z, with an elliptical tube.
///
/// Defined by a center, a major radius `a` (axis to tube center), the tube
/// semi-axis `b` along Z and the tube semi-axis `c` in the XY plane.
///
/// `f(x, y, z) = (z - z0)^2 / b^2 + (sqrt((x - x0)^2 + (y - y0)^2) - a)^2 / c^2 - 1`
///
/// Parametrically, with `u` around the Z axis and `v` around the tube:
/// `P(u, v) = center + (a + c*cos(v)) * (cos(u), sin(u), 0) + b*sin(v) * z`.
#[derive(Debug, Clone)]
pub struct ZTorus {
    center: Point3,
    major_radius: f64,
    minor_radius_z: f64,
    minor_radius_xy: f64,
}

impl ZTorus {
    /// Creates a new Z-axis torus.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the torus
    /// * `major_radius` - Distance from the axis to the tube center (`a`)
    /// * `minor_radius_z` - Tube semi-axis parallel to Z (`b`)
    /// * `minor_radius_xy` - Tube semi-axis perpendicular to Z (`c`)
    ///
    /// # Errors
    ///
    /// Returns an error if any radius is non-positive or not finite.
    pub fn new(
        center: Point3,
        major_radius: f64,
        minor_radius_z: f64,
        minor_radius_xy: f64,
    ) -> Result<Self> {
        for (label, value) in [
            ("major radius", major_radius),
            ("minor radius (z)", minor_radius_z),
            ("minor radius (xy)", minor_radius_xy),
        ] {
            if !value.is_finite() || value < TOLERANCE {
                return Err(GeometryError::Degenerate(format!(
                    "torus {label} must be positive, got {value}"
                ))
                .into());
            }
        }

        Ok(Self {
            center,
            major_radius,
            minor_radius_z,
            minor_radius_xy,
        })
    }

    /// Returns the center of the torus.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the major radius `a`.
    #[must_use]
    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    /// Returns the tube semi-axis along Z (`b`).
    #[must_use]
    pub fn minor_radius_z(&self) -> f64 {
        self.minor_radius_z
    }

    /// Returns the tube semi-axis in the XY plane (`c`).
    #[must_use]
    pub fn minor_radius_xy(&self) -> f64 {
        self.minor_radius_xy
    }
}

impl Surface for ZTorus {
    fn evaluate(&self, point: &Point3) -> f64 {
        let d = point - self.center;
        let rho = (d.x * d.x + d.y * d.y).sqrt() - self.major_radius;
        (d.z * d.z) / (self.minor_radius_z * self.minor_radius_z)
            + (rho * rho) / (self.minor_radius_xy * self.minor_radius_xy)
            - 1.0
    }

    fn interior_bounds(&self) -> Aabb {
        let reach = self.major_radius + self.minor_radius_xy;
        let half = Vector3::new(reach, reach, self.minor_radius_z);
        Aabb::new(self.center - half, self.center + half)
    }

    fn type_name(&self) -> &'static str {
        "z-torus"
    }

    fn coefficients(&self) -> Vec<f64> {
        vec![
            self.center.x,
            self.center.y,
            self.center.z,
            self.major_radius,
            self.minor_radius_z,
            self.minor_radius_xy,
        ]
    }
}
