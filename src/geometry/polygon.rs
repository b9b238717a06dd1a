use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{GeometryError, Result};
use crate::math::spherical::{any_perpendicular, left_area, path_crosses_edge};
use crate::math::{Vector3, MIN_AREA, TOLERANCE};
use crate::operations::boolean::{boolean_execute, BooleanOp};

use super::interior::interior_point;
use super::{GreatCircleArc, SkyPoint};

/// Relative offset of the probe used to decide which side of an edge is
/// the interior.
const PROBE_OFFSET: f64 = 1e-6;

/// A closed region on the unit sphere bounded by great-circle arcs.
///
/// The boundary is a simple closed curve; the last point connects back to the
/// first. Because a closed curve splits the sphere into two regions, the
/// polygon also carries an `inside` point that selects one of them.
///
/// Boundaries are stored counter-clockwise around the interior (interior on
/// the left, seen from outside the sphere). Input of either winding is
/// accepted and normalized on construction.
///
/// A polygon with no points is the empty set: it has no inside point,
/// contains nothing, intersects nothing and has zero area.
#[derive(Debug, Clone, Default)]
pub struct SphericalPolygon {
    points: Vec<SkyPoint>,
    arcs: Vec<GreatCircleArc>,
    inside: Option<SkyPoint>,
}

impl SphericalPolygon {
    /// Returns the empty polygon.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a polygon from boundary points and a point strictly inside.
    ///
    /// A repeated closing point and consecutive duplicates are dropped.
    ///
    /// # Errors
    ///
    /// - `GeometryError::Degenerate` for fewer than three distinct points,
    ///   antipodal neighbours, or a boundary enclosing no area.
    /// - `GeometryError::InvariantViolation` if the boundary crosses or
    ///   touches itself, or `inside` lies on the boundary.
    pub fn new(points: Vec<SkyPoint>, inside: SkyPoint) -> Result<Self> {
        let mut points = clean_ring(points);
        let mut arcs = build_arcs(&points)?;
        check_simple(&arcs)?;
        if arcs.iter().any(|arc| arc.contains_point(&inside)) {
            return Err(GeometryError::InvariantViolation(format!(
                "inside point {inside} lies on the boundary"
            ))
            .into());
        }
        if !interior_is_left(&points, &arcs, &inside) {
            points.reverse();
            arcs = build_arcs(&points)?;
        }
        let polygon = Self {
            points,
            arcs,
            inside: Some(inside),
        };
        if polygon.area() < MIN_AREA {
            return Err(GeometryError::Degenerate("polygon encloses no area".into()).into());
        }
        Ok(polygon)
    }

    /// Creates a polygon from boundary points alone.
    ///
    /// The enclosed region is taken to be the one that fits in a hemisphere;
    /// an inside point is computed for it.
    ///
    /// # Errors
    ///
    /// As [`SphericalPolygon::new`], plus `GeometryError::Degenerate` when the
    /// boundary does not fit in a hemisphere.
    pub fn from_points(points: Vec<SkyPoint>) -> Result<Self> {
        let points = clean_ring(points);
        check_simple(&build_arcs(&points)?)?;
        let inside = interior_point(&points)?;
        Self::new(points, inside)
    }

    /// Creates a polygon from `(longitude, latitude)` pairs in degrees.
    ///
    /// # Errors
    ///
    /// As [`SphericalPolygon::from_points`], plus
    /// `GeometryError::ParameterOutOfRange` for invalid coordinates.
    pub fn from_lonlat_deg(coords: &[(f64, f64)]) -> Result<Self> {
        let points = coords
            .iter()
            .map(|&(lon, lat)| SkyPoint::from_lonlat_deg(lon, lat))
            .collect::<Result<Vec<_>>>()?;
        Self::from_points(points)
    }

    /// Wraps a counter-clockwise ring produced by a set operation.
    ///
    /// The ring is trusted to be simple. Its left side may be larger than a
    /// hemisphere; the inside point then comes from beside the longest arc.
    pub(crate) fn from_ccw_ring(points: Vec<SkyPoint>) -> Result<Self> {
        let points = clean_ring(points);
        let arcs = build_arcs(&points)?;
        let inside = match interior_point(&points) {
            Ok(candidate)
                if !arcs.iter().any(|arc| arc.contains_point(&candidate))
                    && interior_is_left(&points, &arcs, &candidate) =>
            {
                candidate
            }
            _ => probe_left_of(longest_arc(&arcs)),
        };
        Ok(Self {
            points,
            arcs,
            inside: Some(inside),
        })
    }

    /// Returns `true` for the empty polygon.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the boundary points, counter-clockwise around the interior.
    #[must_use]
    pub fn points(&self) -> &[SkyPoint] {
        &self.points
    }

    /// Returns the boundary arcs; arc `i` runs from point `i` to point `i + 1`.
    #[must_use]
    pub fn arcs(&self) -> &[GreatCircleArc] {
        &self.arcs
    }

    /// Returns the inside point, `None` for the empty polygon.
    #[must_use]
    pub fn inside(&self) -> Option<&SkyPoint> {
        self.inside.as_ref()
    }

    /// Returns the boundary as `(longitude, latitude)` pairs in degrees.
    #[must_use]
    pub fn to_lonlat_deg(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(SkyPoint::to_lonlat_deg).collect()
    }

    /// Returns `true` if `point` is inside the polygon or on its boundary.
    #[must_use]
    pub fn contains_point(&self, point: &SkyPoint) -> bool {
        let Some(inside) = &self.inside else {
            return false;
        };
        if self.arcs.iter().any(|arc| arc.contains_point(point)) {
            return true;
        }
        !crosses_odd(&self.points, point.vector(), inside.vector())
    }

    /// Returns `true` if the two polygons share any point.
    ///
    /// Covers boundary crossings and touches as well as one polygon lying
    /// wholly inside the other.
    #[must_use]
    pub fn intersects_poly(&self, other: &SphericalPolygon) -> bool {
        let (Some(inside), Some(other_inside)) = (&self.inside, &other.inside) else {
            return false;
        };
        if self.caps_disjoint(other) {
            return false;
        }
        let crossing = self
            .arcs
            .iter()
            .any(|a| other.arcs.iter().any(|b| a.intersects(b)));
        crossing || self.contains_point(other_inside) || other.contains_point(inside)
    }

    /// Returns `true` if the arc `from -> to` touches the boundary.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the arc is undefined.
    pub fn intersects_arc(&self, from: &SkyPoint, to: &SkyPoint) -> Result<bool> {
        if self.is_empty() {
            return Ok(false);
        }
        let probe = GreatCircleArc::new(*from, *to)?;
        Ok(self.arcs.iter().any(|arc| arc.intersects(&probe)))
    }

    /// Area in steradians: the sum of interior angles minus `(n - 2) pi`.
    #[must_use]
    pub fn area(&self) -> f64 {
        let ring: Vec<Vector3> = self.points.iter().map(|p| *p.vector()).collect();
        left_area(&ring)
    }

    /// Fraction of this polygon's area covered by `other`.
    ///
    /// Asymmetric: `a.overlap(b)` is `area(a & b) / area(a)`. Zero when
    /// either polygon is empty or they are disjoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the intersection cannot be computed.
    pub fn overlap(&self, other: &SphericalPolygon) -> Result<f64> {
        let area = self.area();
        if area < MIN_AREA || !self.intersects_poly(other) {
            return Ok(0.0);
        }
        let shared: f64 = boolean_execute(self, other, BooleanOp::Intersect)?
            .iter()
            .map(SphericalPolygon::area)
            .sum();
        Ok((shared / area).clamp(0.0, 1.0))
    }

    /// Union of two polygons.
    ///
    /// A single polygon cannot hold a disconnected union; in that case the
    /// component with the largest area is returned. Use
    /// [`MultiPolygonSet`](super::MultiPolygonSet) to keep every component.
    ///
    /// Holes cannot be represented: when the union encloses an uncovered
    /// window, the window is filled, so the result can cover more than the
    /// two operands.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary walk fails.
    pub fn union(&self, other: &SphericalPolygon) -> Result<SphericalPolygon> {
        let pieces = boolean_execute(self, other, BooleanOp::Union)?;
        if pieces.len() > 1 {
            tracing::warn!(
                components = pieces.len(),
                "disjoint union collapsed to its largest component"
            );
        }
        Ok(largest(pieces))
    }

    /// Intersection of two polygons; empty when they are disjoint.
    ///
    /// Non-convex inputs can intersect in several pieces; the largest is
    /// returned, as for [`SphericalPolygon::union`].
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary walk fails.
    pub fn intersection(&self, other: &SphericalPolygon) -> Result<SphericalPolygon> {
        let pieces = boolean_execute(self, other, BooleanOp::Intersect)?;
        if pieces.len() > 1 {
            tracing::warn!(
                components = pieces.len(),
                "intersection collapsed to its largest component"
            );
        }
        Ok(largest(pieces))
    }

    /// Returns `true` if both boundaries visit the same points in the same
    /// cyclic order, regardless of starting point and direction.
    #[must_use]
    pub fn same_points_as(&self, other: &SphericalPolygon) -> bool {
        let n = self.points.len();
        if n != other.points.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        let ours = &self.points;
        let theirs = &other.points;
        (0..n)
            .filter(|&offset| theirs[offset].approx_eq(&ours[0]))
            .any(|offset| {
                let forward = (0..n).all(|i| ours[i].approx_eq(&theirs[(offset + i) % n]));
                let backward = (0..n).all(|i| ours[i].approx_eq(&theirs[(offset + n - i) % n]));
                forward || backward
            })
    }

    /// A spherical cap `(center, radius)` enclosing the polygon, when the
    /// vertices fit in a cap smaller than a hemisphere.
    ///
    /// Returns `None` for the empty polygon and for regions larger than a
    /// hemisphere.
    #[must_use]
    pub fn bounding_cap(&self) -> Option<(SkyPoint, f64)> {
        let sum: Vector3 = self.points.iter().map(SkyPoint::vector).sum();
        let center = SkyPoint::from_vector(sum).ok()?;
        let radius = self
            .points
            .iter()
            .map(|p| center.separation(p))
            .fold(0.0, f64::max);
        // A boundary inside the cap splits the sphere into the part in the
        // cap, smaller than a hemisphere, and the rest.
        (radius < FRAC_PI_2 && self.area() < TAU).then_some((center, radius))
    }

    /// Cheap rejection test on bounding caps.
    pub(crate) fn caps_disjoint(&self, other: &SphericalPolygon) -> bool {
        match (self.bounding_cap(), other.bounding_cap()) {
            (Some((c1, r1)), Some((c2, r2))) => c1.separation(&c2) > r1 + r2 + TOLERANCE,
            _ => false,
        }
    }
}

/// Returns the piece with the largest area, or the empty polygon.
fn largest(pieces: Vec<SphericalPolygon>) -> SphericalPolygon {
    pieces
        .into_iter()
        .map(|p| (p.area(), p))
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, p)| p)
        .unwrap_or_default()
}

/// Drops consecutive duplicate points and a repeated closing point.
fn clean_ring(points: Vec<SkyPoint>) -> Vec<SkyPoint> {
    let mut ring: Vec<SkyPoint> = Vec::with_capacity(points.len());
    for point in points {
        if ring.last().is_some_and(|last| last.approx_eq(&point)) {
            continue;
        }
        ring.push(point);
    }
    while ring.len() > 1 && ring[0].approx_eq(&ring[ring.len() - 1]) {
        ring.pop();
    }
    ring
}

/// Builds the closing sequence of arcs for a cleaned ring.
fn build_arcs(points: &[SkyPoint]) -> Result<Vec<GreatCircleArc>> {
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::Degenerate(format!(
            "a polygon needs at least 3 distinct points, got {n}"
        ))
        .into());
    }
    (0..n)
        .map(|i| GreatCircleArc::new(points[i], points[(i + 1) % n]))
        .collect()
}

/// Rejects boundaries that cross, touch, or fold back on themselves.
fn check_simple(arcs: &[GreatCircleArc]) -> Result<()> {
    let n = arcs.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let violation = if j == i + 1 || (i == 0 && j == n - 1) {
                // `first` ends where `second` starts.
                let (first, second) = if j == i + 1 {
                    (&arcs[i], &arcs[j])
                } else {
                    (&arcs[j], &arcs[i])
                };
                first.contains_point(second.end()) || second.contains_point(first.start())
            } else {
                arcs[i].intersects(&arcs[j])
            };
            if violation {
                return Err(GeometryError::InvariantViolation(format!(
                    "boundary arcs {i} and {j} intersect"
                ))
                .into());
            }
        }
    }
    Ok(())
}

/// Parity of proper crossings between the path `from -> to` and the ring.
///
/// Nearly antipodal endpoints have no well-defined minor arc, so the path is
/// routed through a point a quarter turn away from `to`.
fn crosses_odd(ring: &[SkyPoint], from: &Vector3, to: &Vector3) -> bool {
    if from.dot(to) < -1.0 + 1e-6 {
        let via = any_perpendicular(to);
        return crosses_odd(ring, from, &via) ^ crosses_odd(ring, &via, to);
    }
    let n = ring.len();
    let crossings = (0..n)
        .filter(|&i| path_crosses_edge(from, to, ring[i].vector(), ring[(i + 1) % n].vector()))
        .count();
    crossings % 2 == 1
}

fn longest_arc(arcs: &[GreatCircleArc]) -> &GreatCircleArc {
    arcs.iter()
        .max_by(|a, b| a.length().total_cmp(&b.length()))
        .unwrap_or(&arcs[0])
}

/// A point just to the left of an arc's midpoint.
fn probe_left_of(arc: &GreatCircleArc) -> SkyPoint {
    let mid = arc.midpoint();
    let offset = arc.normal() * (arc.length() * PROBE_OFFSET);
    SkyPoint::from_unit((mid.vector() + offset).normalize())
}

/// Whether `inside` lies on the left of the ring's direction of travel.
fn interior_is_left(points: &[SkyPoint], arcs: &[GreatCircleArc], inside: &SkyPoint) -> bool {
    let probe = probe_left_of(longest_arc(arcs));
    !crosses_odd(points, probe.vector(), inside.vector())
}
