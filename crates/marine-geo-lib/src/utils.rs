//! Utility functions for Web Mercator conversions and angle normalisation

use geo::Coord;

/// Web Mercator bounds in meters (EPSG:3857)
pub const EARTH_MERCATOR_MAX: f64 = 20037508.34;

/// Maximum latitude that can be represented in Web Mercator
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Ground resolution (meters per pixel) of a 256px tile at zoom level 0
pub const RESOLUTION_AT_ZOOM_0: f64 = 156543.03392804097;

/// Precomputed constant: EARTH_MERCATOR_MAX / 180.0
const LON_TO_X_FACTOR: f64 = EARTH_MERCATOR_MAX / 180.0;

/// Precomputed constant: EARTH_MERCATOR_MAX / PI
const Y_FACTOR: f64 = EARTH_MERCATOR_MAX / std::f64::consts::PI;

/// Precomputed constant: 180.0 / EARTH_MERCATOR_MAX
const X_TO_LON_FACTOR: f64 = 180.0 / EARTH_MERCATOR_MAX;

/// Precomputed constant: PI / EARTH_MERCATOR_MAX
const Y_TO_LAT_FACTOR: f64 = std::f64::consts::PI / EARTH_MERCATOR_MAX;

/// Convert WGS84 (lon, lat) in degrees to Web Mercator (x, y) in meters
///
/// Latitude is clamped to the range Web Mercator can represent.
#[inline(always)]
pub fn lon_lat_to_mercator(lon_lat: Coord<f64>) -> Coord<f64> {
    let lat = lon_lat.y.clamp(-MAX_LATITUDE, MAX_LATITUDE);

    let x = lon_lat.x * LON_TO_X_FACTOR;

    let lat_rad = lat.to_radians();
    let y = (lat_rad.tan() + (1.0 / lat_rad.cos())).ln() * Y_FACTOR;

    Coord { x, y }
}

/// Convert Web Mercator (x, y) in meters to WGS84 (lon, lat) in degrees
#[inline(always)]
pub fn mercator_to_lon_lat(xy: Coord<f64>) -> Coord<f64> {
    let lon = xy.x * X_TO_LON_FACTOR;
    let lat = (std::f64::consts::FRAC_PI_2 - 2.0 * ((-xy.y * Y_TO_LAT_FACTOR).exp()).atan())
        .to_degrees();
    Coord { x: lon, y: lat }
}

/// Wrap a longitude in degrees into the range (-180, 180].
///
/// The antimeridian is reported as +180, never -180.
#[inline]
pub fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 540.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

/// Map zoom level at which one pixel covers `resolution` Web Mercator meters
#[inline]
pub fn zoom_for_resolution(resolution: f64) -> f64 {
    (RESOLUTION_AT_ZOOM_0 / resolution).log2()
}
