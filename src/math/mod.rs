pub mod spherical;

/// 2D point type (tangent-plane coordinates).
pub type Point2 = nalgebra::Point2<f64>;

/// 3D vector type. Points on the sphere are unit vectors of this type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Angles are in radians, so two points closer than this on the unit sphere
/// (about 20 micro-arcseconds) are the same point.
pub const TOLERANCE: f64 = 1e-10;

/// Turning angle below which a vertex is treated as lying on a straight arc.
pub const COLLINEAR_TOLERANCE: f64 = 1e-9;

/// Areas (steradians) below this are treated as empty.
pub const MIN_AREA: f64 = 1e-18;
