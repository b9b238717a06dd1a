use crate::error::Result;
use crate::geometry::{MultiPolygonSet, SphericalPolygon};

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the union of two polygons.
pub struct Union<'a> {
    polygon_a: &'a SphericalPolygon,
    polygon_b: &'a SphericalPolygon,
}

impl<'a> Union<'a> {
    /// Creates a new `Union` operation.
    #[must_use]
    pub fn new(polygon_a: &'a SphericalPolygon, polygon_b: &'a SphericalPolygon) -> Self {
        Self {
            polygon_a,
            polygon_b,
        }
    }

    /// Executes the union. Disjoint operands give a two-component set.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub fn execute(&self) -> Result<MultiPolygonSet> {
        let pieces = boolean_execute(self.polygon_a, self.polygon_b, BooleanOp::Union)?;
        Ok(MultiPolygonSet::from_components(pieces))
    }
}
