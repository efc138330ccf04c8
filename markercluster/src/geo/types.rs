//! Core geographic types shared across the crate.

use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced by geographic validation and conversion.
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Invalid latitude: {0} (must be finite and within [-90, 90])")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("Invalid longitude: {0} (must be finite and within [-180, 180])")]
    InvalidLongitude(f64),
}

/// A validated geographic point in WGS84 degrees.
///
/// Construction goes through [`GeoPoint::new`], which rejects non-finite or
/// out-of-range values, so a `GeoPoint` held anywhere in the crate is always
/// usable in projection math without re-checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Create a validated geographic point.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a point from values already known to be near-valid, clamping
    /// float drift back into range instead of erroring.
    ///
    /// Used for centroids coming out of projection math, where weighted
    /// averages of valid points can land a few ulps outside the bounds.
    pub(crate) fn clamped(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(MIN_LAT, MAX_LAT),
            longitude: longitude.clamp(MIN_LON, MAX_LON),
        }
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// The visible map viewport: center plus angular span.
///
/// Supplied by the host map widget on every viewport change. The crate only
/// derives values from a region, it never mutates one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Latitude of the viewport center in degrees.
    pub latitude: f64,
    /// Longitude of the viewport center in degrees.
    pub longitude: f64,
    /// North-south span of the viewport in degrees.
    pub latitude_delta: f64,
    /// East-west span of the viewport in degrees.
    pub longitude_delta: f64,
}

impl Region {
    /// Create a new region.
    pub fn new(latitude: f64, longitude: f64, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude,
            longitude,
            latitude_delta,
            longitude_delta,
        }
    }
}

/// An axis-aligned longitude/latitude bounding box used to query the
/// spatial index.
///
/// Invariant: `xmin <= xmax` and `ymin <= ymax`. [`envelope_from_region`]
/// upholds this even for regions whose naive bounds would cross ±180°/±90°.
///
/// [`envelope_from_region`]: super::envelope_from_region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Western bound (minimum longitude) in degrees.
    pub xmin: f64,
    /// Southern bound (minimum latitude) in degrees.
    pub ymin: f64,
    /// Eastern bound (maximum longitude) in degrees.
    pub xmax: f64,
    /// Northern bound (maximum latitude) in degrees.
    pub ymax: f64,
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.4}, {:.4}] x [{:.4}, {:.4}]",
            self.xmin, self.xmax, self.ymin, self.ymax
        )
    }
}
