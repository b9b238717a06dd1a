use std::f64::consts::TAU;

use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{SkyPoint, SphericalPolygon};
use crate::math::spherical::left_area;
use crate::math::{Vector3, MIN_AREA};

use super::assemble::{assemble_loops, remove_collinear};
use super::classify::classify_fragment;
use super::select::{should_keep_fragment, BooleanOp, KeepDecision};
use super::split::{collect_split_points, split_boundary, PolygonSource};

/// Executes a set operation on two polygons.
///
/// Orchestrates the full pipeline: split point collection, splitting,
/// classification, selection, and loop assembly. The result is a list of
/// disjoint polygons; it is empty when nothing remains.
///
/// Loops that enclose each other bound a single region with holes. Holes
/// are not representable, so such a region is returned with its holes
/// filled and a warning is logged.
///
/// # Errors
///
/// Returns `OperationError::Failed` if the kept fragments cannot be joined
/// into closed loops.
pub fn boolean_execute(
    a: &SphericalPolygon,
    b: &SphericalPolygon,
    op: BooleanOp,
) -> Result<Vec<SphericalPolygon>> {
    // Step 1: empty operands and bounding-cap early-out
    if a.is_empty() || b.is_empty() {
        return Ok(handle_empty(a, b, op));
    }
    if a.caps_disjoint(b) {
        return Ok(handle_disjoint(a, b, op));
    }

    // Step 2: split points on both boundaries
    let (cuts_a, cuts_b) = collect_split_points(a, b);

    // Step 3: split, classify, select
    let mut kept = Vec::new();
    let mut total = 0_usize;
    for (polygon, other, cuts, source) in [
        (a, b, &cuts_a, PolygonSource::A),
        (b, a, &cuts_b, PolygonSource::B),
    ] {
        for fragment in split_boundary(polygon, cuts, source) {
            total += 1;
            let classification = classify_fragment(&fragment, other);
            if should_keep_fragment(fragment.source, classification, op) == KeepDecision::Keep {
                kept.push(fragment);
            }
        }
    }
    debug!(?op, fragments = total, kept = kept.len(), "fragments selected");

    // Step 4: assemble loops into polygons
    let loops = assemble_loops(&kept)?;
    let mut boundaries = Vec::with_capacity(loops.len());
    for ring in loops {
        if let Some(polygon) = loop_to_polygon(ring)? {
            boundaries.push(polygon);
        }
    }

    // Step 5: fill holes
    let result = fill_holes(boundaries);
    debug!(?op, components = result.len(), "boolean result assembled");

    Ok(result)
}

fn handle_empty(a: &SphericalPolygon, b: &SphericalPolygon, op: BooleanOp) -> Vec<SphericalPolygon> {
    match op {
        BooleanOp::Union => [a, b]
            .into_iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect(),
        BooleanOp::Intersect => Vec::new(),
    }
}

fn handle_disjoint(
    a: &SphericalPolygon,
    b: &SphericalPolygon,
    op: BooleanOp,
) -> Vec<SphericalPolygon> {
    match op {
        BooleanOp::Union => vec![a.clone(), b.clone()],
        BooleanOp::Intersect => Vec::new(),
    }
}

/// Turns an assembled loop into a polygon with the loop's left side as its
/// interior.
///
/// Returns `None` for slivers, including inverted ones whose left side is
/// the whole sphere but a sliver.
fn loop_to_polygon(ring: Vec<SkyPoint>) -> Result<Option<SphericalPolygon>> {
    let ring = remove_collinear(ring);
    if ring.len() < 3 {
        return Ok(None);
    }
    let vectors: Vec<Vector3> = ring.iter().map(|p| *p.vector()).collect();
    let area = left_area(&vectors);
    if area < MIN_AREA || 2.0 * TAU - area < MIN_AREA {
        return Ok(None);
    }
    SphericalPolygon::from_ccw_ring(ring).map(Some)
}

/// Returns `true` if every vertex of `inner` lies in `outer`.
fn encloses(outer: &SphericalPolygon, inner: &SphericalPolygon) -> bool {
    inner.points().iter().all(|p| outer.contains_point(p))
}

/// Resolves assembled loops into disjoint simple polygons.
///
/// An outer boundary and the boundaries of its holes each lie on the other's
/// interior side, so mutually enclosing loops are grouped. Each group keeps
/// its smallest loop, the outer boundary with the holes filled. Loops that
/// end up inside a filled hole are covered and dropped.
fn fill_holes(loops: Vec<SphericalPolygon>) -> Vec<SphericalPolygon> {
    let n = loops.len();
    let mut group: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if group[i] != group[j]
                && encloses(&loops[i], &loops[j])
                && encloses(&loops[j], &loops[i])
            {
                let (keep, merge) = (group[i], group[j]);
                for g in &mut group {
                    if *g == merge {
                        *g = keep;
                    }
                }
            }
        }
    }

    let mut filled: Vec<SphericalPolygon> = Vec::new();
    for leader in 0..n {
        let members: Vec<usize> = (0..n).filter(|&i| group[i] == leader).collect();
        let Some(&outer) = members
            .iter()
            .min_by(|&&a, &&b| loops[a].area().total_cmp(&loops[b].area()))
        else {
            continue;
        };
        if members.len() > 1 {
            let holes_area: f64 = members
                .iter()
                .filter(|&&i| i != outer)
                .map(|&i| 2.0 * TAU - loops[i].area())
                .sum();
            warn!(
                holes = members.len() - 1,
                holes_area, "filling holes; holes are not representable"
            );
        }
        filled.push(loops[outer].clone());
    }

    let covered: Vec<bool> = (0..filled.len())
        .map(|i| (0..filled.len()).any(|j| j != i && encloses(&filled[j], &filled[i])))
        .collect();
    filled
        .into_iter()
        .zip(covered)
        .filter_map(|(polygon, covered)| (!covered).then_some(polygon))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(lon: f64, lat: f64, dlon: f64, dlat: f64) -> SphericalPolygon {
        SphericalPolygon::from_lonlat_deg(&[
            (lon, lat),
            (lon + dlon, lat),
            (lon + dlon, lat + dlat),
            (lon, lat + dlat),
        ])
        .unwrap()
    }

    fn total_area(pieces: &[SphericalPolygon]) -> f64 {
        pieces.iter().map(SphericalPolygon::area).sum()
    }

    #[test]
    fn union_overlapping_squares() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(1.0, 1.0, 2.0, 2.0);
        let result = boolean_execute(&a, &b, BooleanOp::Union).unwrap();
        assert_eq!(result.len(), 1);
        // Six input corners plus two crossings.
        assert_eq!(result[0].points().len(), 8);

        let shared = boolean_execute(&a, &b, BooleanOp::Intersect).unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].points().len(), 4);
        assert_relative_eq!(
            result[0].area(),
            a.area() + b.area() - shared[0].area(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn union_is_commutative() {
        let a = rect(10.0, 20.0, 0.3, 0.2);
        let b = rect(10.1, 20.05, 0.4, 0.3);
        let ab = boolean_execute(&a, &b, BooleanOp::Union).unwrap();
        let ba = boolean_execute(&b, &a, BooleanOp::Union).unwrap();
        assert_eq!(ab.len(), 1);
        assert!(ab[0].same_points_as(&ba[0]));
    }

    #[test]
    fn self_union_and_intersection_are_identity() {
        let a = rect(5.0, 5.0, 1.0, 1.0);
        for op in [BooleanOp::Union, BooleanOp::Intersect] {
            let result = boolean_execute(&a, &a, op).unwrap();
            assert_eq!(result.len(), 1);
            assert!(result[0].same_points_as(&a));
        }
    }

    #[test]
    fn containment_returns_outer_or_inner() {
        let outer = rect(0.0, 0.0, 4.0, 4.0);
        let inner = rect(1.0, 1.0, 1.0, 1.0);
        let union = boolean_execute(&outer, &inner, BooleanOp::Union).unwrap();
        assert_eq!(union.len(), 1);
        assert!(union[0].same_points_as(&outer));
        let shared = boolean_execute(&inner, &outer, BooleanOp::Intersect).unwrap();
        assert_eq!(shared.len(), 1);
        assert!(shared[0].same_points_as(&inner));
    }

    #[test]
    fn disjoint_operands() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(3.0, 0.0, 1.0, 1.0);
        let union = boolean_execute(&a, &b, BooleanOp::Union).unwrap();
        assert_eq!(union.len(), 2);
        assert_relative_eq!(total_area(&union), a.area() + b.area(), epsilon = 1e-15);
        assert!(boolean_execute(&a, &b, BooleanOp::Intersect)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn shared_edge_merges() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.0, 1.0, 1.0);
        let union = boolean_execute(&a, &b, BooleanOp::Union).unwrap();
        assert_eq!(union.len(), 1);
        assert_relative_eq!(union[0].area(), a.area() + b.area(), epsilon = 1e-12);
        assert!(boolean_execute(&a, &b, BooleanOp::Intersect)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn corner_touch_stays_two_pieces() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 1.0, 1.0, 1.0);
        let union = boolean_execute(&a, &b, BooleanOp::Union).unwrap();
        assert_eq!(union.len(), 2);
    }

    #[test]
    fn empty_operands() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let empty = SphericalPolygon::empty();
        let union = boolean_execute(&empty, &a, BooleanOp::Union).unwrap();
        assert_eq!(union.len(), 1);
        assert!(union[0].same_points_as(&a));
        assert!(boolean_execute(&a, &empty, BooleanOp::Intersect)
            .unwrap()
            .is_empty());
        assert!(boolean_execute(&empty, &empty, BooleanOp::Union)
            .unwrap()
            .is_empty());
    }

    fn complement_of_octant() -> SphericalPolygon {
        let p = |lon, lat| SkyPoint::from_lonlat_deg(lon, lat).unwrap();
        SphericalPolygon::new(vec![p(0.0, 0.0), p(90.0, 0.0), p(0.0, 90.0)], p(200.0, -30.0))
            .unwrap()
    }

    fn wide_quad(lon: f64) -> SphericalPolygon {
        SphericalPolygon::from_lonlat_deg(&[
            (lon, -60.0),
            (lon + 110.0, -60.0),
            (lon + 110.0, 60.0),
            (lon, 60.0),
        ])
        .unwrap()
    }

    #[test]
    fn large_region_survives_self_operations() {
        let big = complement_of_octant();
        assert!(big.area() > TAU);
        for op in [BooleanOp::Union, BooleanOp::Intersect] {
            let result = boolean_execute(&big, &big, op).unwrap();
            assert_eq!(result.len(), 1);
            assert!(result[0].same_points_as(&big));
            assert_relative_eq!(result[0].area(), big.area(), epsilon = 1e-12);
        }
    }

    #[test]
    fn large_region_absorbs_nested_square() {
        let big = complement_of_octant();
        let small = rect(200.0, -30.0, 1.0, 1.0);
        let union = boolean_execute(&big, &small, BooleanOp::Union).unwrap();
        assert_eq!(union.len(), 1);
        assert!(union[0].same_points_as(&big));
        let shared = boolean_execute(&small, &big, BooleanOp::Intersect).unwrap();
        assert_eq!(shared.len(), 1);
        assert!(shared[0].same_points_as(&small));
    }

    #[test]
    fn union_larger_than_hemisphere() {
        let a = wide_quad(0.0);
        let b = wide_quad(90.0);
        assert!(a.area() < TAU && b.area() < TAU);

        let union = boolean_execute(&a, &b, BooleanOp::Union).unwrap();
        let shared = boolean_execute(&a, &b, BooleanOp::Intersect).unwrap();
        assert_eq!(union.len(), 1);
        assert_eq!(shared.len(), 1);
        assert!(union[0].area() > TAU);
        assert_relative_eq!(
            union[0].area(),
            a.area() + b.area() - shared[0].area(),
            max_relative = 1e-9
        );
        assert!(shared[0].area() < a.area().min(b.area()));
        assert!(union[0].contains_point(a.inside().unwrap()));
        assert!(union[0].contains_point(b.inside().unwrap()));

        let flipped = boolean_execute(&b, &a, BooleanOp::Union).unwrap();
        assert!(union[0].same_points_as(&flipped[0]));
    }

    #[test]
    fn ring_around_hole_fills_the_hole() {
        // Four bars framing a window: their union encloses an uncovered hole.
        let bars = [
            rect(0.0, 0.0, 3.0, 1.0),
            rect(2.0, 0.0, 1.0, 3.0),
            rect(0.0, 2.0, 3.0, 1.0),
            rect(0.0, 0.0, 1.0, 3.0),
        ];
        let mut acc = bars[0].clone();
        for bar in &bars[1..] {
            let mut pieces = boolean_execute(&acc, bar, BooleanOp::Union).unwrap();
            assert_eq!(pieces.len(), 1);
            acc = pieces.remove(0);
        }
        // The outer boundary survives; the hole is filled.
        assert_eq!(acc.points().len(), 4);
        assert!(acc.contains_point(&SkyPoint::from_lonlat_deg(1.5, 1.5).unwrap()));
    }
}
