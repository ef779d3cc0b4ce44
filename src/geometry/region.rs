use std::fmt::Write as _;

use super::surface::{Sense, Surface};
use super::{Aabb, GeometryStore, SurfaceId};
use crate::error::Result;
use crate::math::Point3;

/// A boolean combination of surface half-spaces.
///
/// Regions only reference surfaces by ID; evaluating them requires the
/// [`GeometryStore`] that owns those surfaces.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// One side of a single surface.
    Halfspace { surface: SurfaceId, sense: Sense },
    /// Points belonging to every operand.
    Intersection(Vec<Region>),
    /// Points not belonging to the operand.
    Complement(Box<Region>),
}

impl Region {
    /// The interior (negative half-space) of `surface`.
    #[must_use]
    pub fn inside(surface: SurfaceId) -> Self {
        Self::Halfspace {
            surface,
            sense: Sense::Negative,
        }
    }

    /// The exterior (positive half-space) of `surface`.
    #[must_use]
    pub fn outside(surface: SurfaceId) -> Self {
        Self::Halfspace {
            surface,
            sense: Sense::Positive,
        }
    }

    /// Intersects `self` with `other`, flattening nested intersections.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut operands = match self {
            Self::Intersection(ops) => ops,
            region => vec![region],
        };
        match other {
            Self::Intersection(ops) => operands.extend(ops),
            region => operands.push(region),
        }
        Self::Intersection(operands)
    }

    /// Complements `self`.
    #[must_use]
    pub fn complement(self) -> Self {
        match self {
            Self::Complement(inner) => *inner,
            region => Self::Complement(Box::new(region)),
        }
    }

    /// Returns `true` if `point` lies in the region.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced surface is missing from the store.
    pub fn contains(&self, point: &Point3, store: &GeometryStore) -> Result<bool> {
        match self {
            Self::Halfspace { surface, sense } => {
                let data = store.surface(*surface)?;
                Ok(data.kind.sense_of(point) == *sense)
            }
            Self::Intersection(ops) => {
                for op in ops {
                    if !op.contains(point, store)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Complement(inner) => Ok(!inner.contains(point, store)?),
        }
    }

    /// Conservative axis-aligned bounds of the region.
    ///
    /// Exteriors and complements are unbounded; intersections take the
    /// overlap of their operands' bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced surface is missing from the store.
    pub fn bounding_box(&self, store: &GeometryStore) -> Result<Aabb> {
        match self {
            Self::Halfspace {
                surface,
                sense: Sense::Negative,
            } => Ok(store.surface(*surface)?.kind.interior_bounds()),
            Self::Halfspace {
                sense: Sense::Positive,
                ..
            }
            | Self::Complement(_) => Ok(Aabb::infinite()),
            Self::Intersection(ops) => {
                let mut bounds = Aabb::infinite();
                for op in ops {
                    bounds = bounds.intersection(&op.bounding_box(store)?);
                }
                Ok(bounds)
            }
        }
    }

    /// Formats the region in half-space notation using surface numbers,
    /// e.g. `-2 +1` or `~(-3 +1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced surface is missing from the store.
    pub fn expression(&self, store: &GeometryStore) -> Result<String> {
        let mut out = String::new();
        self.write_expression(&mut out, store)?;
        Ok(out)
    }

    fn write_expression(&self, out: &mut String, store: &GeometryStore) -> Result<()> {
        match self {
            Self::Halfspace { surface, sense } => {
                let sign = match sense {
                    Sense::Negative => '-',
                    Sense::Positive => '+',
                };
                let _ = write!(out, "{sign}{}", store.surface(*surface)?.number);
            }
            Self::Intersection(ops) => {
                for (i, op) in ops.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let grouped = matches!(op, Self::Intersection(_));
                    if grouped {
                        out.push('(');
                    }
                    op.write_expression(out, store)?;
                    if grouped {
                        out.push(')');
                    }
                }
            }
            Self::Complement(inner) => {
                out.push_str("~(");
                inner.write_expression(out, store)?;
                out.push(')');
            }
        }
        Ok(())
    }
}
