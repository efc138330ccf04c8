//! Marker input conversion.
//!
//! Callers supply an ordered list of [`RawMarker`]s (coordinate plus
//! arbitrary associated data). Before clustering, each is converted into a
//! typed [`MarkerRecord`] that carries a validated coordinate and a stable
//! back-reference to its position in the input list, so a leaf in the
//! cluster output can be re-associated with the caller's original marker.
//!
//! Conversion fails fast per marker: a missing or out-of-range coordinate is
//! an error for that marker, never a silent drop. The controller treats a
//! failure anywhere in the set as a whole-set failure and degrades to
//! unclustered pass-through rather than masking the bad input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{GeoError, GeoPoint};

/// Errors produced by marker conversion.
#[derive(Debug, Error, PartialEq)]
pub enum MarkerError {
    /// A marker's coordinate failed validation.
    #[error("Marker {index} has an invalid coordinate: {source}")]
    InvalidCoordinate {
        /// Position of the offending marker in the input list.
        index: usize,
        #[source]
        source: GeoError,
    },
}

/// A caller-supplied marker: a coordinate plus whatever associated data the
/// application wants carried along.
///
/// Coordinates are raw floats here on purpose. Validation happens in
/// [`MarkerRecord::from_raw`], the single typed conversion step, instead of
/// being re-checked at every access site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawMarker {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Arbitrary associated data, opaque to this crate.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub properties: serde_json::Value,
}

impl RawMarker {
    /// Create a marker with no associated data.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            properties: serde_json::Value::Null,
        }
    }
}

/// One input point, validated, with a stable back-reference to its source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerRecord {
    /// Validated coordinate.
    pub coordinate: GeoPoint,
    /// Position of the source marker in the caller's input list.
    pub original_index: usize,
}

impl MarkerRecord {
    /// Convert a single raw marker, failing fast on a bad coordinate.
    pub fn from_raw(raw: &RawMarker, index: usize) -> Result<Self, MarkerError> {
        let coordinate = GeoPoint::new(raw.latitude, raw.longitude)
            .map_err(|source| MarkerError::InvalidCoordinate { index, source })?;
        Ok(Self {
            coordinate,
            original_index: index,
        })
    }
}

/// Convert a whole marker list, preserving input order.
///
/// Returns the first conversion error encountered; the caller decides the
/// degradation policy (the controller falls back to pass-through).
pub fn convert_markers(raw: &[RawMarker]) -> Result<Vec<MarkerRecord>, MarkerError> {
    raw.iter()
        .enumerate()
        .map(|(index, marker)| MarkerRecord::from_raw(marker, index))
        .collect()
}
