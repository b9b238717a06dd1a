use crate::geometry::SphericalPolygon;
use crate::math::spherical::orient;

use super::split::ArcFragment;

/// Classification of a boundary fragment relative to the other polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentClassification {
    Inside,
    Outside,
    /// The fragment runs along the other polygon's boundary.
    /// `same_direction` is true when both boundaries traverse it the same
    /// way, i.e. both interiors lie on the same side.
    OnBoundary { same_direction: bool },
}

/// Classifies a fragment by its midpoint.
///
/// Fragments never cross the other boundary (they were split at every
/// crossing), so the midpoint decides for the whole fragment.
#[must_use]
pub fn classify_fragment(
    fragment: &ArcFragment,
    other: &SphericalPolygon,
) -> FragmentClassification {
    let mid = fragment
        .start
        .midpoint(&fragment.end)
        .unwrap_or(fragment.start);

    let along = other.arcs().iter().find(|arc| {
        arc.contains_point(&mid)
            && arc.contains_point(&fragment.start)
            && arc.contains_point(&fragment.end)
    });
    if let Some(arc) = along {
        let direction = orient(fragment.start.vector(), fragment.end.vector(), arc.normal());
        return FragmentClassification::OnBoundary {
            same_direction: direction > 0.0,
        };
    }

    if other.contains_point(&mid) {
        FragmentClassification::Inside
    } else {
        FragmentClassification::Outside
    }
}
