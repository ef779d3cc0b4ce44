use crate::error::{GeometryError, Result};
use crate::geometry::Aabb;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Surface;

/// A spherical surface in 3D space.
///
/// `f(p) = |p - center|^2 - r^2`
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or not finite.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "sphere radius must be positive, got {radius}"
            ))
            .into());
        }
        Ok(Self { center, radius })
    }

    /// Returns the center of the sphere.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Sphere {
    fn evaluate(&self, point: &Point3) -> f64 {
        (point - self.center).norm_squared() - self.radius * self.radius
    }

    fn interior_bounds(&self) -> Aabb {
        let half = Vector3::repeat(self.radius);
        Aabb::new(self.center - half, self.center + half)
    }

    fn type_name(&self) -> &'static str {
        "sphere"
    }

    fn coefficients(&self) -> Vec<f64> {
        vec![self.center.x, self.center.y, self.center.z, self.radius]
    }
}
