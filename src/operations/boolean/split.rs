use crate::geometry::{SkyPoint, SphericalPolygon};

/// Which polygon a fragment originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonSource {
    A,
    B,
}

/// A piece of a boundary arc between two consecutive split points.
#[derive(Debug, Clone, Copy)]
pub struct ArcFragment {
    pub start: SkyPoint,
    pub end: SkyPoint,
    pub source: PolygonSource,
}

/// Split points for every boundary arc of both polygons.
///
/// An arc is split where it properly crosses an arc of the other polygon and
/// where a vertex of the other polygon lies on it. Crossing points are
/// computed once and pushed to both arcs, so both boundaries share the
/// bit-identical point.
pub fn collect_split_points(
    a: &SphericalPolygon,
    b: &SphericalPolygon,
) -> (Vec<Vec<SkyPoint>>, Vec<Vec<SkyPoint>>) {
    let mut cuts_a = vec![Vec::new(); a.arcs().len()];
    let mut cuts_b = vec![Vec::new(); b.arcs().len()];

    for (i, arc_a) in a.arcs().iter().enumerate() {
        for (j, arc_b) in b.arcs().iter().enumerate() {
            if let Some(x) = arc_a.crossing_point(arc_b) {
                cuts_a[i].push(x);
                cuts_b[j].push(x);
            }
        }
    }

    for (arcs, cuts, vertices) in [
        (a.arcs(), &mut cuts_a, b.points()),
        (b.arcs(), &mut cuts_b, a.points()),
    ] {
        for (arc, arc_cuts) in arcs.iter().zip(cuts.iter_mut()) {
            arc_cuts.extend(vertices.iter().filter(|v| arc.contains_point(v)).copied());
        }
    }

    (cuts_a, cuts_b)
}

/// Splits every boundary arc of `polygon` at its split points.
///
/// `cuts[i]` holds the split points of arc `i`; points coinciding with an
/// endpoint or with each other are ignored. Fragments come out in boundary
/// order.
pub fn split_boundary(
    polygon: &SphericalPolygon,
    cuts: &[Vec<SkyPoint>],
    source: PolygonSource,
) -> Vec<ArcFragment> {
    let mut fragments = Vec::with_capacity(polygon.arcs().len());

    for (arc, arc_cuts) in polygon.arcs().iter().zip(cuts) {
        let start = *arc.start();
        let end = *arc.end();

        let mut stops: Vec<(f64, SkyPoint)> = arc_cuts
            .iter()
            .filter(|c| !c.approx_eq(&start) && !c.approx_eq(&end))
            .map(|c| (start.separation(c), *c))
            .collect();
        stops.sort_by(|x, y| x.0.total_cmp(&y.0));
        stops.dedup_by(|later, earlier| later.1.approx_eq(&earlier.1));

        let mut from = start;
        for (_, stop) in stops {
            fragments.push(ArcFragment {
                start: from,
                end: stop,
                source,
            });
            from = stop;
        }
        fragments.push(ArcFragment {
            start: from,
            end,
            source,
        });
    }

    fragments
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(lon: f64, lat: f64, size: f64) -> SphericalPolygon {
        SphericalPolygon::from_lonlat_deg(&[
            (lon, lat),
            (lon + size, lat),
            (lon + size, lat + size),
            (lon, lat + size),
        ])
        .unwrap()
    }

    #[test]
    fn overlapping_squares_split_twice_each() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);
        let (cuts_a, cuts_b) = collect_split_points(&a, &b);
        assert_eq!(cuts_a.iter().map(Vec::len).sum::<usize>(), 2);
        assert_eq!(cuts_b.iter().map(Vec::len).sum::<usize>(), 2);

        let fragments = split_boundary(&a, &cuts_a, PolygonSource::A);
        assert_eq!(fragments.len(), 6);
        assert!(fragments.iter().all(|f| f.source == PolygonSource::A));
    }

    #[test]
    fn fragments_form_a_chain() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);
        let (cuts_a, _) = collect_split_points(&a, &b);
        let fragments = split_boundary(&a, &cuts_a, PolygonSource::A);
        let n = fragments.len();
        for i in 0..n {
            assert!(fragments[i].end.approx_eq(&fragments[(i + 1) % n].start));
        }
    }

    #[test]
    fn vertex_on_edge_splits() {
        // B's corner sits in the middle of A's bottom edge.
        let a = square(0.0, 0.0, 2.0);
        let b = SphericalPolygon::from_lonlat_deg(&[(1.0, 0.0), (3.0, -1.0), (3.0, 1.0)]).unwrap();
        let (cuts_a, _) = collect_split_points(&a, &b);
        let fragments = split_boundary(&a, &cuts_a, PolygonSource::A);
        let corner = SkyPoint::from_lonlat_deg(1.0, 0.0).unwrap();
        assert!(fragments.iter().any(|f| f.end.approx_eq(&corner)));
    }

    #[test]
    fn no_cuts_keeps_arcs() {
        let a = square(0.0, 0.0, 1.0);
        let cuts = vec![Vec::new(); a.arcs().len()];
        assert_eq!(split_boundary(&a, &cuts, PolygonSource::B).len(), 4);
    }
}
