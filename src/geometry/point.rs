use std::f64::consts::PI;
use std::fmt;

use crate::error::{GeometryError, Result};
use crate::math::spherical::{lonlat_to_vector, separation, vector_to_lonlat};
use crate::math::{Vector3, TOLERANCE};

/// A point on the unit sphere.
///
/// Stored as a unit vector; (longitude, latitude) in degrees is a view.
/// Equality is tolerance based, see [`SkyPoint::approx_eq`].
#[derive(Debug, Clone, Copy)]
pub struct SkyPoint {
    xyz: Vector3,
}

impl SkyPoint {
    /// Creates a point from equatorial coordinates in degrees.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` for non-finite input or a
    /// latitude outside `[-90, 90]`.
    pub fn from_lonlat_deg(lon: f64, lat: f64) -> Result<Self> {
        if !lon.is_finite() {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "longitude",
                value: lon,
                min: f64::MIN,
                max: f64::MAX,
            }
            .into());
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "latitude",
                value: lat,
                min: -90.0,
                max: 90.0,
            }
            .into());
        }
        Ok(Self {
            xyz: lonlat_to_vector(lon, lat),
        })
    }

    /// Creates a point from any non-zero vector, normalizing it.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` for a zero or non-finite vector.
    pub fn from_vector(v: Vector3) -> Result<Self> {
        let len = v.norm();
        if !len.is_finite() || len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self { xyz: v / len })
    }

    /// Wraps a vector the caller already knows to be unit length.
    pub(crate) fn from_unit(xyz: Vector3) -> Self {
        Self { xyz }
    }

    /// Returns the unit vector.
    #[must_use]
    pub fn vector(&self) -> &Vector3 {
        &self.xyz
    }

    /// Returns `(longitude, latitude)` in degrees, longitude in `[0, 360)`.
    #[must_use]
    pub fn to_lonlat_deg(&self) -> (f64, f64) {
        vector_to_lonlat(&self.xyz)
    }

    /// Angular separation in radians.
    #[must_use]
    pub fn separation(&self, other: &SkyPoint) -> f64 {
        separation(&self.xyz, &other.xyz)
    }

    /// Returns `true` if the two points are closer than [`TOLERANCE`] radians.
    #[must_use]
    pub fn approx_eq(&self, other: &SkyPoint) -> bool {
        self.separation(other) < TOLERANCE
    }

    /// Returns `true` if the two points are antipodal within tolerance.
    #[must_use]
    pub fn is_antipodal_to(&self, other: &SkyPoint) -> bool {
        self.separation(other) > PI - TOLERANCE
    }

    /// The diametrically opposite point.
    #[must_use]
    pub fn antipode(&self) -> SkyPoint {
        Self { xyz: -self.xyz }
    }

    /// Midpoint of the minor arc to `other`, or `None` for antipodal points.
    #[must_use]
    pub fn midpoint(&self, other: &SkyPoint) -> Option<SkyPoint> {
        let sum = self.xyz + other.xyz;
        let len = sum.norm();
        (len > TOLERANCE).then(|| Self { xyz: sum / len })
    }
}

impl fmt::Display for SkyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lon, lat) = self.to_lonlat_deg();
        write!(f, "({lon:.8}, {lat:.8})")
    }
}
