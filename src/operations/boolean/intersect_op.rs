use crate::error::Result;
use crate::geometry::{MultiPolygonSet, SphericalPolygon};

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the intersection of two polygons.
pub struct Intersect<'a> {
    polygon_a: &'a SphericalPolygon,
    polygon_b: &'a SphericalPolygon,
}

impl<'a> Intersect<'a> {
    /// Creates a new `Intersect` operation.
    #[must_use]
    pub fn new(polygon_a: &'a SphericalPolygon, polygon_b: &'a SphericalPolygon) -> Self {
        Self {
            polygon_a,
            polygon_b,
        }
    }

    /// Executes the intersection. Disjoint operands give the empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub fn execute(&self) -> Result<MultiPolygonSet> {
        let pieces = boolean_execute(self.polygon_a, self.polygon_b, BooleanOp::Intersect)?;
        Ok(MultiPolygonSet::from_components(pieces))
    }
}
