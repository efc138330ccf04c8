//! Viewport geometry math.
//!
//! Pure functions that turn the host map's visible [`Region`] into the two
//! values the clustering pipeline needs: a fractional Web Mercator zoom level
//! and a lon/lat [`Envelope`] for the spatial-index query.

mod types;

pub use types::{Envelope, GeoError, GeoPoint, Region, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Smallest longitude delta used for zoom derivation.
///
/// A degenerate region (`longitude_delta <= 0`, NaN, or infinite) is an
/// upstream contract violation; clamping here keeps `-inf`/NaN out of the
/// index query instead of propagating an error for every malformed event.
pub const MIN_LONGITUDE_DELTA: f64 = 1e-9;

/// Tile size in pixels assumed by the Web Mercator zoom formula.
const TILE_SIZE_PX: f64 = 256.0;

/// Derive the fractional zoom level for a viewport region.
///
/// `zoom = log2(360 * screen_width_px / 256 / longitude_delta)`, the standard
/// Web Mercator relation between angular span and pixel span. The screen
/// width is an explicit argument so callers on any display feed their own
/// value rather than this crate reading ambient environment state.
///
/// The result is always finite: a non-positive or non-finite
/// `longitude_delta` is clamped to [`MIN_LONGITUDE_DELTA`].
pub fn zoom_from_region(region: &Region, screen_width_px: f64) -> f64 {
    let delta = if region.longitude_delta.is_finite() && region.longitude_delta > 0.0 {
        region.longitude_delta
    } else {
        MIN_LONGITUDE_DELTA
    };
    (360.0 * screen_width_px / TILE_SIZE_PX / delta).log2()
}

/// Derive the query envelope for a viewport region.
///
/// Half-spans are taken from the deltas, then each bound is clamped:
/// a longitude bound past ±180° is reflected around the opposite sign, and a
/// latitude bound past ±90° likewise. A `longitude_delta` below -180 is
/// normalized by adding 360 before the half-span is computed.
///
/// The reflection is a known approximation: a region that genuinely spans
/// the antimeridian gets a bounded but geometrically wrong box rather than a
/// correctly split one. Kept intentionally to match observed behavior;
/// see `test_wraparound_near_antimeridian`, which pins it.
///
/// The output always satisfies `xmin <= xmax` and `ymin <= ymax`.
pub fn envelope_from_region(region: &Region) -> Envelope {
    let lat_offset = region.latitude_delta / 2.0;
    let lon_delta = if region.longitude_delta < -180.0 {
        360.0 + region.longitude_delta
    } else {
        region.longitude_delta
    };
    let lon_offset = lon_delta / 2.0;

    let xmin = min_lon_by_offset(region.longitude, lon_offset);
    let ymin = min_lat_by_offset(region.latitude, lat_offset);
    let xmax = max_lon_by_offset(region.longitude, lon_offset);
    let ymax = max_lat_by_offset(region.latitude, lat_offset);

    // The reflection can invert a degenerate box; restore the ordering
    // invariant the index query relies on.
    Envelope {
        xmin: xmin.min(xmax),
        ymin: ymin.min(ymax),
        xmax: xmin.max(xmax),
        ymax: ymin.max(ymax),
    }
}

fn min_lat_by_offset(lat: f64, offset: f64) -> f64 {
    let value = lat - offset;
    if value < -90.0 {
        -(90.0 + offset)
    } else {
        value
    }
}

fn max_lat_by_offset(lat: f64, offset: f64) -> f64 {
    let value = lat + offset;
    if value > 90.0 {
        -(90.0 - offset)
    } else {
        value
    }
}

fn min_lon_by_offset(lon: f64, offset: f64) -> f64 {
    let value = lon - offset;
    if value < -180.0 {
        -(180.0 + offset)
    } else {
        value
    }
}

fn max_lon_by_offset(lon: f64, offset: f64) -> f64 {
    let value = lon + offset;
    if value > 180.0 {
        -(180.0 - offset)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zoom_for_demo_region_at_360px() {
        // Central Poland viewport from the demo app: 8.5° span on a 360px
        // screen lands between zoom 5 and 6.
        let region = Region::new(52.5, 19.2, 8.5, 8.5);
        let zoom = zoom_from_region(&region, 360.0);

        // log2(360 * 360 / 256 / 8.5) = log2(59.56) ~ 5.90
        assert!((zoom - 5.8965).abs() < 0.001, "zoom was {}", zoom);
        assert_eq!(zoom.floor(), 5.0);
    }

    #[test]
    fn test_zoom_is_finite_for_degenerate_delta() {
        for delta in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let region = Region::new(0.0, 0.0, 1.0, delta);
            let zoom = zoom_from_region(&region, 360.0);
            assert!(zoom.is_finite(), "delta {} produced {}", delta, zoom);
        }
    }

    #[test]
    fn test_envelope_for_simple_region() {
        let region = Region::new(52.5, 19.2, 8.5, 8.5);
        let env = envelope_from_region(&region);

        assert!((env.xmin - 14.95).abs() < 1e-9);
        assert!((env.xmax - 23.45).abs() < 1e-9);
        assert!((env.ymin - 48.25).abs() < 1e-9);
        assert!((env.ymax - 56.75).abs() < 1e-9);
    }

    #[test]
    fn test_wraparound_near_antimeridian() {
        // Pins the reflect-style clamp: the eastern bound at 179.9 + 0.5
        // reflects to -(180 - 0.5) instead of exceeding 180.
        let region = Region::new(0.0, 179.9, 1.0, 1.0);
        let env = envelope_from_region(&region);

        assert!(env.xmax <= 180.0);
        assert!(env.xmin <= env.xmax);
        assert!((env.xmin - (-179.5)).abs() < 1e-9);
        assert!((env.xmax - 179.4).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_near_pole() {
        let region = Region::new(89.5, 0.0, 2.0, 1.0);
        let env = envelope_from_region(&region);

        assert!(env.ymax <= 90.0);
        assert!(env.ymin <= env.ymax);
    }

    #[test]
    fn test_negative_longitude_delta_normalized() {
        // Some map widgets report the span as delta - 360 when panning
        // across the antimeridian.
        let region = Region::new(0.0, 0.0, 1.0, -359.0);
        let env = envelope_from_region(&region);

        assert!((env.xmax - env.xmin - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(52.5, 19.2).is_ok());
        assert_eq!(
            GeoPoint::new(91.0, 0.0).unwrap_err(),
            GeoError::InvalidLatitude(91.0)
        );
        assert_eq!(
            GeoPoint::new(0.0, 181.0).unwrap_err(),
            GeoError::InvalidLongitude(181.0)
        );
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    proptest! {
        #[test]
        fn prop_zoom_decreases_with_delta(
            delta_a in 0.001f64..360.0,
            delta_b in 0.001f64..360.0,
        ) {
            // Distinct enough that log2 cannot round to the same float.
            prop_assume!(delta_b > delta_a * 1.001);
            let ra = Region::new(0.0, 0.0, 1.0, delta_a);
            let rb = Region::new(0.0, 0.0, 1.0, delta_b);
            prop_assert!(
                zoom_from_region(&ra, 360.0) > zoom_from_region(&rb, 360.0)
            );
        }

        #[test]
        fn prop_envelope_bounds_ordered(
            lat in -90.0f64..90.0,
            lon in -180.0f64..180.0,
            lat_delta in 0.0f64..180.0,
            lon_delta in 0.0f64..360.0,
        ) {
            let region = Region::new(lat, lon, lat_delta, lon_delta);
            let env = envelope_from_region(&region);
            prop_assert!(env.xmin <= env.xmax);
            prop_assert!(env.ymin <= env.ymax);
        }
    }
}
