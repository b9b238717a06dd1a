//! Points, arcs and regions on the unit sphere.
mod arc;
mod interior;
mod multi_polygon;
mod point;
mod polygon;

pub use arc::GreatCircleArc;
pub use multi_polygon::MultiPolygonSet;
pub use point::SkyPoint;
pub use polygon::SphericalPolygon;
