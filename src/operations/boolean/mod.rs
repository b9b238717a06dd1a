//! Set operations on spherical polygons.
//!
//! Union and intersection share one pipeline: split both boundaries at their
//! mutual crossings, classify every fragment against the other polygon, keep
//! fragments by a decision table, and walk the kept fragments into closed
//! loops.
mod assemble;
mod classify;
mod engine;
mod intersect_op;
mod multi;
mod select;
mod split;
mod union;

pub(crate) use engine::boolean_execute;
pub use intersect_op::Intersect;
pub use multi::{MultiIntersect, MultiUnion};
pub use select::BooleanOp;
pub use union::Union;
