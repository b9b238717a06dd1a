//! Finding a point strictly inside a closed boundary.
//!
//! The boundary is projected gnomonically around its vertex centroid, where
//! it becomes a simple planar polygon. A constrained Delaunay triangulation
//! of that polygon is flood-filled from the outer face; the largest interior
//! triangle's centroid is mapped back to the sphere.
use std::collections::{HashMap, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{GeometryError, Result};
use crate::math::spherical::GnomonicFrame;
use crate::math::{Point2, Vector3, TOLERANCE};

use super::SkyPoint;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Finds a point strictly inside the smaller region bounded by `ring`.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the ring does not fit in an open
/// hemisphere or encloses no area.
pub(crate) fn interior_point(ring: &[SkyPoint]) -> Result<SkyPoint> {
    if ring.len() < 3 {
        return Err(GeometryError::Degenerate(
            "interior point needs at least 3 boundary points".into(),
        )
        .into());
    }

    let sum: Vector3 = ring.iter().map(SkyPoint::vector).sum();
    let frame = GnomonicFrame::new(&sum).ok_or_else(|| {
        GeometryError::Degenerate("boundary vertices are balanced around the sphere".into())
    })?;

    let mut planar = Vec::with_capacity(ring.len());
    for point in ring {
        let projected = frame.project(point.vector()).ok_or_else(|| {
            GeometryError::Degenerate(
                "boundary does not fit in a hemisphere; supply an inside point".into(),
            )
        })?;
        planar.push(SpadePoint2::new(projected.x, projected.y));
    }

    let mut cdt = Cdt::new();
    insert_constraint_loop(&mut cdt, &planar)?;
    let interior = classify_interior_faces(&cdt);

    let mut best: Option<(f64, Point2)> = None;
    for face in cdt.inner_faces() {
        if !interior.contains_key(&face.fix().index()) {
            continue;
        }
        let [a, b, c] = face.vertices().map(|v| v.position());
        let area = ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() * 0.5;
        if best.as_ref().map_or(true, |(best_area, _)| area > *best_area) {
            let centroid = Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0);
            best = Some((area, centroid));
        }
    }

    match best {
        Some((area, centroid)) if area > TOLERANCE * TOLERANCE => {
            Ok(SkyPoint::from_unit(frame.unproject(&centroid)))
        }
        _ => Err(GeometryError::Degenerate("boundary encloses no area".into()).into()),
    }
}

/// Inserts a closed polygon as constraint edges into the CDT.
fn insert_constraint_loop(cdt: &mut Cdt, points: &[SpadePoint2<f64>]) -> Result<()> {
    let mut handles = Vec::with_capacity(points.len());
    for &pt in points {
        let h = cdt.insert(pt).map_err(|e: InsertionError| {
            GeometryError::Degenerate(format!("cannot triangulate boundary: {e}"))
        })?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(GeometryError::InvariantViolation(
                "boundary crosses itself in projection".into(),
            )
            .into());
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}

/// Flood-fills the CDT from the outer face; each constraint edge crossed
/// toggles inside/outside. Returns interior face indices with their depth.
fn classify_interior_faces(cdt: &Cdt) -> HashMap<usize, u32> {
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            if let Some(neighbor) = edge.rev().face().as_inner() {
                let n_idx = neighbor.fix().index();
                if depth_map.contains_key(&n_idx) {
                    continue;
                }
                let new_depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depth_map.insert(n_idx, new_depth);
                queue.push_back((neighbor.fix(), new_depth));
            }
        }
    }

    depth_map.retain(|_, depth| *depth % 2 == 1);
    depth_map
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::spherical::path_crosses_edge;

    fn ring(coords: &[(f64, f64)]) -> Vec<SkyPoint> {
        coords
            .iter()
            .map(|&(lon, lat)| SkyPoint::from_lonlat_deg(lon, lat).unwrap())
            .collect()
    }

    fn crossings(ring: &[SkyPoint], from: &SkyPoint, to: &SkyPoint) -> usize {
        (0..ring.len())
            .filter(|&i| {
                path_crosses_edge(
                    from.vector(),
                    to.vector(),
                    ring[i].vector(),
                    ring[(i + 1) % ring.len()].vector(),
                )
            })
            .count()
    }

    #[test]
    fn square_interior_is_near_center() {
        let square = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let inside = interior_point(&square).unwrap();
        let (lon, lat) = inside.to_lonlat_deg();
        assert!(lon > 0.0 && lon < 1.0, "lon={lon}");
        assert!(lat > 0.0 && lat < 1.0, "lat={lat}");
    }

    #[test]
    fn concave_interior_is_inside() {
        // A "C" shape whose vertex centroid falls in the notch.
        let c_shape = ring(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (3.0, 2.0),
            (3.0, 3.0),
            (0.0, 3.0),
        ]);
        let inside = interior_point(&c_shape).unwrap();
        // A point far outside must be separated from it by an odd number of edges.
        let outside = SkyPoint::from_lonlat_deg(-5.0, -5.0).unwrap();
        assert_eq!(crossings(&c_shape, &inside, &outside) % 2, 1);
    }

    #[test]
    fn winding_does_not_matter() {
        let mut quad = ring(&[(10.0, 10.0), (10.5, 10.0), (10.6, 10.4), (10.1, 10.5)]);
        let far = SkyPoint::from_lonlat_deg(0.0, 0.0).unwrap();
        let a = interior_point(&quad).unwrap();
        quad.reverse();
        let b = interior_point(&quad).unwrap();
        assert_eq!(crossings(&quad, &a, &far) % 2, 1);
        assert_eq!(crossings(&quad, &b, &far) % 2, 1);
    }

    #[test]
    fn hemisphere_spanning_ring_rejected() {
        let wide = ring(&[(0.0, 0.0), (120.0, 0.0), (240.0, 0.0)]);
        assert!(interior_point(&wide).is_err());
    }

    #[test]
    fn collinear_ring_rejected() {
        let line = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert!(interior_point(&line).is_err());
    }
}
