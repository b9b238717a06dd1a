use crate::error::Result;
use crate::operations::boolean::{boolean_execute, BooleanOp};

use super::{SkyPoint, SphericalPolygon};

/// A region made of disjoint simple polygons.
///
/// This is what a union of polygons that do not all touch looks like; the
/// empty set has no components. Components that meet only at a point are
/// kept separate.
#[derive(Debug, Clone, Default)]
pub struct MultiPolygonSet {
    components: Vec<SphericalPolygon>,
}

impl MultiPolygonSet {
    /// Returns the empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps components already known to be disjoint, dropping empty ones.
    pub(crate) fn from_components(components: Vec<SphericalPolygon>) -> Self {
        Self {
            components: components.into_iter().filter(|c| !c.is_empty()).collect(),
        }
    }

    /// Returns the components.
    #[must_use]
    pub fn components(&self) -> &[SphericalPolygon] {
        &self.components
    }

    /// Consumes the set and returns its components.
    #[must_use]
    pub fn into_components(self) -> Vec<SphericalPolygon> {
        self.components
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the set has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Inside point of every component, in component order.
    #[must_use]
    pub fn inside_points(&self) -> Vec<SkyPoint> {
        self.components
            .iter()
            .filter_map(|c| c.inside().copied())
            .collect()
    }

    /// Returns `true` if any component contains `point`.
    #[must_use]
    pub fn contains_point(&self, point: &SkyPoint) -> bool {
        self.components.iter().any(|c| c.contains_point(point))
    }

    /// Returns `true` if any component shares a point with `polygon`.
    #[must_use]
    pub fn intersects_poly(&self, polygon: &SphericalPolygon) -> bool {
        self.components.iter().any(|c| c.intersects_poly(polygon))
    }

    /// Returns `true` if any components of the two sets share a point.
    #[must_use]
    pub fn intersects_set(&self, other: &MultiPolygonSet) -> bool {
        other.components.iter().any(|c| self.intersects_poly(c))
    }

    /// Returns `true` if the arc `from -> to` touches any component boundary.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the arc is undefined.
    pub fn intersects_arc(&self, from: &SkyPoint, to: &SkyPoint) -> Result<bool> {
        for component in &self.components {
            if component.intersects_arc(from, to)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Total area in steradians.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.components.iter().map(SphericalPolygon::area).sum()
    }

    /// Fraction of this set's area covered by `other`; zero for an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the intersection cannot be computed.
    pub fn overlap(&self, other: &MultiPolygonSet) -> Result<f64> {
        let area = self.area();
        if area <= 0.0 {
            return Ok(0.0);
        }
        let shared = self.intersection(other)?.area();
        Ok((shared / area).clamp(0.0, 1.0))
    }

    /// Returns `true` if both sets have the same components, in any order,
    /// compared with [`SphericalPolygon::same_points_as`].
    #[must_use]
    pub fn same_points_as(&self, other: &MultiPolygonSet) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut matched = vec![false; other.len()];
        self.components.iter().all(|ours| {
            let found = other
                .components
                .iter()
                .enumerate()
                .find(|(j, theirs)| !matched[*j] && ours.same_points_as(theirs));
            match found {
                Some((j, _)) => {
                    matched[j] = true;
                    true
                }
                None => false,
            }
        })
    }

    /// Union of two sets.
    ///
    /// Holes are filled, as for
    /// [`SphericalPolygon::union`](super::SphericalPolygon::union).
    ///
    /// # Errors
    ///
    /// Returns an error if a pairwise union fails.
    pub fn union(&self, other: &MultiPolygonSet) -> Result<MultiPolygonSet> {
        let mut result = self.clone();
        for component in &other.components {
            result.absorb(component.clone())?;
        }
        Ok(result)
    }

    /// Intersection of two sets, as pairwise component intersections.
    ///
    /// # Errors
    ///
    /// Returns an error if a pairwise intersection fails.
    pub fn intersection(&self, other: &MultiPolygonSet) -> Result<MultiPolygonSet> {
        let mut pieces = Vec::new();
        for component in &other.components {
            pieces.extend(self.intersect_polygon(component)?.components);
        }
        Ok(Self { components: pieces })
    }

    /// Intersection of every component with one polygon.
    pub(crate) fn intersect_polygon(&self, polygon: &SphericalPolygon) -> Result<MultiPolygonSet> {
        let mut pieces = Vec::new();
        for component in &self.components {
            if component.intersects_poly(polygon) {
                pieces.extend(boolean_execute(component, polygon, BooleanOp::Intersect)?);
            }
        }
        Ok(Self { components: pieces })
    }

    /// Adds a polygon to the set, merging it with every component it joins
    /// into a single loop.
    ///
    /// A merge can bridge components that were apart, so the scan restarts
    /// until nothing more merges.
    pub(crate) fn absorb(&mut self, polygon: SphericalPolygon) -> Result<()> {
        if polygon.is_empty() {
            return Ok(());
        }
        let mut merged = polygon;
        loop {
            let mut changed = false;
            let mut i = 0;
            while i < self.components.len() {
                if self.components[i].intersects_poly(&merged) {
                    let mut pieces =
                        boolean_execute(&self.components[i], &merged, BooleanOp::Union)?;
                    if pieces.len() == 1 {
                        if let Some(single) = pieces.pop() {
                            merged = single;
                        }
                        self.components.remove(i);
                        changed = true;
                        continue;
                    }
                }
                i += 1;
            }
            if !changed {
                break;
            }
        }
        self.components.push(merged);
        Ok(())
    }
}

impl From<SphericalPolygon> for MultiPolygonSet {
    fn from(polygon: SphericalPolygon) -> Self {
        Self::from_components(vec![polygon])
    }
}
