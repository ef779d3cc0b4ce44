mod sphere;
mod torus;

pub use sphere::Sphere;
pub use torus::ZTorus;

use serde::{Deserialize, Serialize};

use super::Aabb;
use crate::math::Point3;

/// Sign of a half-space relative to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    /// Points where the surface function is negative (the interior).
    Negative,
    /// Points where the surface function is positive (the exterior).
    Positive,
}

/// Transport boundary condition carried by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryType {
    /// Particles cross the surface freely.
    #[default]
    Transmission,
    /// Particles leaving through the surface are killed.
    Vacuum,
}

impl BoundaryType {
    /// Returns the lowercase keyword used in exported geometry.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transmission => "transmission",
            Self::Vacuum => "vacuum",
        }
    }
}

/// Trait for closed quadric-like surfaces given by an implicit function.
pub trait Surface {
    /// Evaluates the implicit surface function at `point`.
    ///
    /// Negative inside, zero on the surface, positive outside.
    fn evaluate(&self, point: &Point3) -> f64;

    /// Bounding box of the interior (negative half-space).
    fn interior_bounds(&self) -> Aabb;

    /// Keyword naming the surface type in exported geometry.
    fn type_name(&self) -> &'static str;

    /// Coefficients describing the surface in exported geometry.
    fn coefficients(&self) -> Vec<f64>;

    /// Returns the sense of `point` relative to the surface.
    ///
    /// Points exactly on the surface are reported as [`Sense::Positive`].
    fn sense_of(&self, point: &Point3) -> Sense {
        if self.evaluate(point) < 0.0 {
            Sense::Negative
        } else {
            Sense::Positive
        }
    }
}

/// A concrete surface stored in the geometry arena.
#[derive(Debug, Clone)]
pub enum SurfaceKind {
    ZTorus(ZTorus),
    Sphere(Sphere),
}

impl Surface for SurfaceKind {
    fn evaluate(&self, point: &Point3) -> f64 {
        match self {
            Self::ZTorus(t) => t.evaluate(point),
            Self::Sphere(s) => s.evaluate(point),
        }
    }

    fn interior_bounds(&self) -> Aabb {
        match self {
            Self::ZTorus(t) => t.interior_bounds(),
            Self::Sphere(s) => s.interior_bounds(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::ZTorus(t) => t.type_name(),
            Self::Sphere(s) => s.type_name(),
        }
    }

    fn coefficients(&self) -> Vec<f64> {
        match self {
            Self::ZTorus(t) => t.coefficients(),
            Self::Sphere(s) => s.coefficients(),
        }
    }
}

impl From<ZTorus> for SurfaceKind {
    fn from(torus: ZTorus) -> Self {
        Self::ZTorus(torus)
    }
}

impl From<Sphere> for SurfaceKind {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}
