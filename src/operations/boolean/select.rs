use super::classify::FragmentClassification;
use super::split::PolygonSource;

/// The type of set operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersect,
}

/// Decision about whether to keep a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepDecision {
    Keep,
    Discard,
}

/// Determines whether a boundary fragment belongs to the result, based on
/// where it lies relative to the other polygon.
///
/// | Fragment | vs other polygon        | Union   | Intersect |
/// |----------|-------------------------|---------|-----------|
/// | from A   | OUTSIDE B               | keep    | discard   |
/// | from A   | INSIDE B                | discard | keep      |
/// | from B   | OUTSIDE A               | keep    | discard   |
/// | from B   | INSIDE A                | discard | keep      |
/// | from A   | ON boundary, same way   | keep    | keep      |
/// | from A   | ON boundary, opposite   | discard | discard   |
/// | from B   | ON boundary             | discard | discard   |
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn should_keep_fragment(
    source: PolygonSource,
    classification: FragmentClassification,
    op: BooleanOp,
) -> KeepDecision {
    use FragmentClassification::{Inside, OnBoundary, Outside};

    match (source, classification, op) {
        // Fragment from A, classified vs B
        (PolygonSource::A, Outside, BooleanOp::Union) => KeepDecision::Keep,
        (PolygonSource::A, Outside, BooleanOp::Intersect) => KeepDecision::Discard,
        (PolygonSource::A, Inside, BooleanOp::Union) => KeepDecision::Discard,
        (PolygonSource::A, Inside, BooleanOp::Intersect) => KeepDecision::Keep,

        // Fragment from B, classified vs A
        (PolygonSource::B, Outside, BooleanOp::Union) => KeepDecision::Keep,
        (PolygonSource::B, Outside, BooleanOp::Intersect) => KeepDecision::Discard,
        (PolygonSource::B, Inside, BooleanOp::Union) => KeepDecision::Discard,
        (PolygonSource::B, Inside, BooleanOp::Intersect) => KeepDecision::Keep,

        // Shared boundary: one copy from A when both interiors are on the
        // same side, nothing when they face each other.
        (PolygonSource::A, OnBoundary { same_direction }, _) => {
            if same_direction {
                KeepDecision::Keep
            } else {
                KeepDecision::Discard
            }
        }
        (PolygonSource::B, OnBoundary { .. }, _) => KeepDecision::Discard,
    }
}
