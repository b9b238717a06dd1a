use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::{MultiPolygonSet, SphericalPolygon};

/// Union of any number of polygons, folded in the given order.
///
/// The first polygon seeds the accumulator; disjoint parts are preserved as
/// separate components.
pub struct MultiUnion<'a> {
    polygons: &'a [SphericalPolygon],
}

impl<'a> MultiUnion<'a> {
    /// Creates a new `MultiUnion` operation.
    #[must_use]
    pub fn new(polygons: &'a [SphericalPolygon]) -> Self {
        Self { polygons }
    }

    /// Executes the union.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::EmptyInputSet` for zero operands, or an error
    /// from a pairwise step.
    pub fn execute(&self) -> Result<MultiPolygonSet> {
        let Some((first, rest)) = self.polygons.split_first() else {
            return Err(OperationError::EmptyInputSet {
                operation: "multi-union",
            }
            .into());
        };
        let mut acc = MultiPolygonSet::from(first.clone());
        for polygon in rest {
            acc.absorb(polygon.clone())?;
        }
        debug!(
            operands = self.polygons.len(),
            components = acc.len(),
            "multi-union done"
        );
        Ok(acc)
    }
}

/// Intersection of any number of polygons, folded pairwise.
///
/// Stops as soon as an intermediate result is empty.
pub struct MultiIntersect<'a> {
    polygons: &'a [SphericalPolygon],
}

impl<'a> MultiIntersect<'a> {
    /// Creates a new `MultiIntersect` operation.
    #[must_use]
    pub fn new(polygons: &'a [SphericalPolygon]) -> Self {
        Self { polygons }
    }

    /// Executes the intersection.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::EmptyInputSet` for zero operands, or an error
    /// from a pairwise step.
    pub fn execute(&self) -> Result<MultiPolygonSet> {
        let Some((first, rest)) = self.polygons.split_first() else {
            return Err(OperationError::EmptyInputSet {
                operation: "multi-intersection",
            }
            .into());
        };
        let mut acc = MultiPolygonSet::from(first.clone());
        for (i, polygon) in rest.iter().enumerate() {
            if acc.is_empty() {
                debug!(after = i + 1, "multi-intersection empty, stopping early");
                break;
            }
            acc = acc.intersect_polygon(polygon)?;
        }
        Ok(acc)
    }
}
