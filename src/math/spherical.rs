//! Vector primitives on the unit sphere.
//!
//! Everything here works on raw unit [`Vector3`]s; the checked point type
//! lives in [`crate::geometry::SkyPoint`].
use std::f64::consts::{PI, TAU};

use super::{Point2, Vector3, TOLERANCE};

/// Converts equatorial (longitude, latitude) in degrees to a unit vector.
#[must_use]
pub fn lonlat_to_vector(lon_deg: f64, lat_deg: f64) -> Vector3 {
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Converts a unit vector to (longitude, latitude) in degrees.
///
/// Longitude is normalized to `[0, 360)`, latitude lies in `[-90, 90]`.
#[must_use]
pub fn vector_to_lonlat(v: &Vector3) -> (f64, f64) {
    let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
    if v.x.abs() < TOLERANCE && v.y.abs() < TOLERANCE {
        return (0.0, lat);
    }
    let lon = v.y.atan2(v.x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    let lon = if lon >= 360.0 { 0.0 } else { lon };
    (lon, lat)
}

/// Angular separation between two unit vectors, in radians.
///
/// Uses `atan2(|a x b|, a . b)`, which stays accurate for both tiny and
/// near-antipodal separations.
#[must_use]
pub fn separation(a: &Vector3, b: &Vector3) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Orientation predicate: the triple product `(a x b) . c`.
///
/// Positive when `c` lies to the left of the directed great circle `a -> b`
/// (seen from outside the sphere).
#[must_use]
pub fn orient(a: &Vector3, b: &Vector3, c: &Vector3) -> f64 {
    a.cross(b).dot(c)
}

/// Signed turning angle at `v` when travelling `u -> v -> w` along great
/// circles, in `(-pi, pi]`. Left turns are positive.
#[must_use]
pub fn turning_angle(u: &Vector3, v: &Vector3, w: &Vector3) -> f64 {
    let t_in = u.cross(v).cross(v);
    let t_out = v.cross(w).cross(v);
    t_in.cross(&t_out).dot(v).atan2(t_in.dot(&t_out))
}

/// Area (steradians) of the region to the left of a closed ring.
///
/// Gauss-Bonnet on the unit sphere: the interior angles of the left region
/// are `pi - turning`, so the spherical excess is `2 pi - sum(turning)`.
/// Returns 0 for fewer than three vertices.
#[must_use]
pub fn left_area(ring: &[Vector3]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let interior: f64 = (0..n)
        .map(|i| PI - turning_angle(&ring[(i + n - 1) % n], &ring[i], &ring[(i + 1) % n]))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let excess = interior - (n - 2) as f64 * PI;
    excess.clamp(0.0, 2.0 * TAU)
}

/// Returns `true` when the path `p -> q` properly crosses the edge `a -> b`.
///
/// Both are minor arcs. Edge endpoints lying exactly on the great circle of
/// the path count as being on its right (half-open rule), so a path through a
/// shared vertex is counted exactly once. Path endpoints lying on the edge's
/// great circle never count as crossings.
#[must_use]
pub fn path_crosses_edge(p: &Vector3, q: &Vector3, a: &Vector3, b: &Vector3) -> bool {
    let n = p.cross(q);
    if (n.dot(a) > 0.0) == (n.dot(b) > 0.0) {
        return false;
    }
    let m = a.cross(b);
    if m.dot(p) * m.dot(q) >= 0.0 {
        return false;
    }
    // The two great circles meet at +-x. The path and the edge each pass
    // through exactly one of them; it must be the same one.
    let x = n.cross(&m);
    (x.dot(&(p + q)) > 0.0) == (x.dot(&(a + b)) > 0.0)
}

/// Returns a unit vector perpendicular to `v`.
#[must_use]
pub fn any_perpendicular(v: &Vector3) -> Vector3 {
    let axis = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vector3::x()
    } else if v.y.abs() <= v.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&axis).normalize()
}

/// Gnomonic (tangent-plane) projection centred on a unit vector.
///
/// Great circles map to straight lines, so a spherical polygon that fits in
/// the open hemisphere around the centre maps to a planar polygon with the
/// same topology.
#[derive(Debug, Clone)]
pub struct GnomonicFrame {
    center: Vector3,
    east: Vector3,
    north: Vector3,
}

impl GnomonicFrame {
    /// Builds the frame. Returns `None` for a zero-length centre.
    #[must_use]
    pub fn new(center: &Vector3) -> Option<Self> {
        let len = center.norm();
        if len < TOLERANCE {
            return None;
        }
        let center = center / len;
        let helper = if center.z.abs() > 0.9 {
            Vector3::x()
        } else {
            Vector3::z()
        };
        let east = helper.cross(&center).normalize();
        let north = center.cross(&east);
        Some(Self {
            center,
            east,
            north,
        })
    }

    /// Returns the frame centre.
    #[must_use]
    pub fn center(&self) -> &Vector3 {
        &self.center
    }

    /// Projects a unit vector onto the tangent plane.
    ///
    /// Returns `None` for points on or behind the horizon.
    #[must_use]
    pub fn project(&self, v: &Vector3) -> Option<Point2> {
        let d = v.dot(&self.center);
        if d <= TOLERANCE {
            return None;
        }
        let s = v / d;
        Some(Point2::new(s.dot(&self.east), s.dot(&self.north)))
    }

    /// Maps a tangent-plane point back to the unit sphere.
    #[must_use]
    pub fn unproject(&self, p: &Point2) -> Vector3 {
        (self.center + self.east * p.x + self.north * p.y).normalize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ll(lon: f64, lat: f64) -> Vector3 {
        lonlat_to_vector(lon, lat)
    }

    #[test]
    fn lonlat_roundtrip_normalizes_longitude() {
        let v = ll(-30.0, 45.0);
        let (lon, lat) = vector_to_lonlat(&v);
        assert_abs_diff_eq!(lon, 330.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn pole_has_zero_longitude() {
        let (lon, lat) = vector_to_lonlat(&Vector3::z());
        assert_abs_diff_eq!(lon, 0.0);
        assert_abs_diff_eq!(lat, 90.0, epsilon = 1e-12);
    }

    #[test]
    fn separation_small_and_antipodal() {
        let a = ll(10.0, 0.0);
        let b = ll(10.0, 1e-6);
        assert_abs_diff_eq!(separation(&a, &b), 1e-6_f64.to_radians(), epsilon = 1e-15);
        assert_abs_diff_eq!(separation(&a, &-a), PI, epsilon = 1e-12);
    }

    #[test]
    fn orient_sign_matches_left_side() {
        // Travelling east along the equator, north is on the left.
        let a = ll(0.0, 0.0);
        let b = ll(1.0, 0.0);
        assert!(orient(&a, &b, &ll(0.5, 1.0)) > 0.0);
        assert!(orient(&a, &b, &ll(0.5, -1.0)) < 0.0);
    }

    #[test]
    fn turning_angle_left_and_right() {
        let u = ll(0.0, 0.0);
        let v = ll(1.0, 0.0);
        let left = turning_angle(&u, &v, &ll(1.0, 1.0));
        let right = turning_angle(&u, &v, &ll(1.0, -1.0));
        let straight = turning_angle(&u, &v, &ll(2.0, 0.0));
        assert_abs_diff_eq!(left, PI / 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(right, -PI / 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(straight, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn octant_left_area() {
        // Counter-clockwise octant: one eighth of the sphere.
        let ring = [Vector3::x(), Vector3::y(), Vector3::z()];
        assert_abs_diff_eq!(left_area(&ring), PI / 2.0, epsilon = 1e-12);

        // Clockwise: the left region is the complement.
        let ring = [Vector3::x(), Vector3::z(), Vector3::y()];
        assert_abs_diff_eq!(left_area(&ring), 4.0 * PI - PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn path_crossing_detects_antipodal_miss() {
        let p = ll(0.0, -1.0);
        let q = ll(0.0, 1.0);
        assert!(path_crosses_edge(&p, &q, &ll(-1.0, 0.0), &ll(1.0, 0.0)));
        // Same great circles, but the edge sits on the far side of the sphere.
        assert!(!path_crosses_edge(&p, &q, &ll(179.0, 0.0), &ll(181.0, 0.0)));
        // Edge does not reach the path.
        assert!(!path_crosses_edge(&p, &q, &ll(1.0, 0.0), &ll(2.0, 0.0)));
    }

    #[test]
    fn path_through_shared_vertex_counts_once() {
        let p = ll(0.0, -1.0);
        let q = ll(0.0, 1.0);
        let v = ll(0.0, 0.0);
        let hits = [
            path_crosses_edge(&p, &q, &ll(-1.0, 0.0), &v),
            path_crosses_edge(&p, &q, &v, &ll(1.0, 0.0)),
        ];
        assert_eq!(hits.iter().filter(|h| **h).count(), 1);
    }

    #[test]
    fn perpendicular_is_unit_and_orthogonal() {
        let v = ll(37.0, -12.0);
        let p = any_perpendicular(&v);
        assert_abs_diff_eq!(p.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.dot(&v), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn gnomonic_roundtrip_and_horizon() {
        let frame = GnomonicFrame::new(&ll(120.0, 30.0)).unwrap();
        let v = ll(121.0, 31.0);
        let p = frame.project(&v).unwrap();
        let back = frame.unproject(&p);
        assert_abs_diff_eq!(separation(&v, &back), 0.0, epsilon = 1e-12);
        assert!(frame.project(&ll(300.0, -30.0)).is_none());
        assert!(GnomonicFrame::new(&Vector3::zeros()).is_none());
    }
}
