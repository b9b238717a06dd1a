use crate::error::{GeometryError, Result};
use crate::math::{Vector3, TOLERANCE};

use super::SkyPoint;

/// The minor (shorter) great-circle arc between two points.
///
/// The endpoints are never coincident or antipodal, so the containing great
/// circle, and its unit `normal = start x end`, are always defined.
#[derive(Debug, Clone, Copy)]
pub struct GreatCircleArc {
    start: SkyPoint,
    end: SkyPoint,
    normal: Vector3,
}

impl GreatCircleArc {
    /// Creates a new arc.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the endpoints coincide or are
    /// antipodal.
    pub fn new(start: SkyPoint, end: SkyPoint) -> Result<Self> {
        if start.approx_eq(&end) {
            return Err(GeometryError::Degenerate(format!(
                "zero-length arc at {start}"
            ))
            .into());
        }
        if start.is_antipodal_to(&end) {
            return Err(GeometryError::Degenerate(format!(
                "arc endpoints {start} and {end} are antipodal"
            ))
            .into());
        }
        let normal = start.vector().cross(end.vector()).normalize();
        Ok(Self { start, end, normal })
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &SkyPoint {
        &self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &SkyPoint {
        &self.end
    }

    /// Returns the unit normal of the containing great circle.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Arc length in radians.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.separation(&self.end)
    }

    /// Returns the point halfway along the arc.
    #[must_use]
    pub fn midpoint(&self) -> SkyPoint {
        SkyPoint::from_unit((self.start.vector() + self.end.vector()).normalize())
    }

    /// Returns `true` if `point` lies on the arc, endpoints included.
    #[must_use]
    pub fn contains_point(&self, point: &SkyPoint) -> bool {
        if point.approx_eq(&self.start) || point.approx_eq(&self.end) {
            return true;
        }
        let v = point.vector();
        self.normal.dot(v).abs() < TOLERANCE && self.spans(v)
    }

    /// Returns `true` if the two arcs share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &GreatCircleArc) -> bool {
        self.intersection_point(other).is_some()
    }

    /// Returns a point common to both arcs, if any.
    ///
    /// Shared endpoints and endpoints touching the other arc are reported
    /// first; otherwise the proper crossing of the two arcs, if one exists.
    /// Arcs on (nearly) the same great circle that only overlap in their
    /// interiors report one of the overlapping endpoints.
    #[must_use]
    pub fn intersection_point(&self, other: &GreatCircleArc) -> Option<SkyPoint> {
        for a in [&self.start, &self.end] {
            for b in [&other.start, &other.end] {
                if a.approx_eq(b) {
                    return Some(*a);
                }
            }
        }
        for p in [&other.start, &other.end] {
            if self.contains_point(p) {
                return Some(*p);
            }
        }
        for p in [&self.start, &self.end] {
            if other.contains_point(p) {
                return Some(*p);
            }
        }
        self.crossing_point(other)
    }

    /// The crossing of the two arcs' great circles, if it lies on both arcs.
    ///
    /// The circles meet at two antipodal points `+-(n1 x n2)`; at most one of
    /// them lies on a minor arc. The sign is chosen from `self`, and
    /// `n2 x n1 = -(n1 x n2)` exactly, so swapping the operands yields the
    /// bit-identical point.
    pub(crate) fn crossing_point(&self, other: &GreatCircleArc) -> Option<SkyPoint> {
        let c = self.normal.cross(&other.normal);
        let len = c.norm();
        if len < TOLERANCE {
            return None;
        }
        let mut x = c / len;
        if x.dot(&(self.start.vector() + self.end.vector())) < 0.0 {
            x = -x;
        }
        (self.spans(&x) && other.spans(&x)).then(|| SkyPoint::from_unit(x))
    }

    /// For `v` on the great circle: whether it falls between the endpoints.
    fn spans(&self, v: &Vector3) -> bool {
        self.start.vector().cross(v).dot(&self.normal) >= -TOLERANCE
            && v.cross(self.end.vector()).dot(&self.normal) >= -TOLERANCE
    }
}
