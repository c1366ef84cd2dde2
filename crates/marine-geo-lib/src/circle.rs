//! Geographic circles approximated as closed rings of (lon, lat) points

use crate::utils;
use geo::Coord;
use std::f64::consts::TAU;

/// Radius of the sphere used for circle generation (meters)
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Default number of sides for a circle polygon
pub const DEFAULT_SIDES: usize = 64;

/// Fewest sides that still make a polygon
pub const MIN_SIDES: usize = 3;

/// A circle on the ground, built on demand for rendering and never stored
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircleDescriptor {
    /// Center as (lon, lat) degrees
    pub center: Coord<f64>,
    /// Radius in meters
    pub radius_meters: f64,
    /// Number of sides of the approximating polygon
    pub sides: usize,
}

impl CircleDescriptor {
    /// Circle with the default side count
    pub fn new(center: Coord<f64>, radius_meters: f64) -> Self {
        Self {
            center,
            radius_meters,
            sides: DEFAULT_SIDES,
        }
    }

    /// Set the side count
    pub fn with_sides(mut self, sides: usize) -> Self {
        self.sides = sides;
        self
    }

    /// Closed ring of `sides + 1` points
    pub fn ring(&self) -> Vec<Coord<f64>> {
        create_geographic_circle(self.center, self.radius_meters, self.sides)
    }
}

/// Point reached by travelling `distance_meters` from `origin` along `bearing`
/// (radians clockwise from north) on a sphere of radius [`EARTH_RADIUS_METERS`].
///
/// Input and output are (lon, lat) degrees; the output longitude is wrapped
/// into (-180, 180].
#[inline]
pub fn destination_point(origin: Coord<f64>, distance_meters: f64, bearing: f64) -> Coord<f64> {
    let angular = distance_meters / EARTH_RADIUS_METERS;
    let lat1 = origin.y.to_radians();
    let lon1 = origin.x.to_radians();

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_d, cos_d) = angular.sin_cos();
    let (sin_b, cos_b) = bearing.sin_cos();

    let lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * cos_b).asin();
    let lon2 = lon1 + (sin_b * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2.sin());

    Coord {
        x: utils::normalize_longitude(lon2.to_degrees()),
        y: lat2.to_degrees(),
    }
}

/// Approximate a circle of `radius_meters` around `center` (lon, lat degrees).
///
/// Returns `sides + 1` points; the last point is an exact copy of the first so
/// the ring is closed. Side counts below [`MIN_SIDES`] are raised to it.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn create_geographic_circle(
    center: Coord<f64>,
    radius_meters: f64,
    sides: usize,
) -> Vec<Coord<f64>> {
    let sides = if sides < MIN_SIDES {
        tracing::warn!(
            "Circle needs at least {} sides, got {}; using {}",
            MIN_SIDES,
            sides,
            MIN_SIDES
        );
        MIN_SIDES
    } else {
        sides
    };

    let mut ring = Vec::with_capacity(sides + 1);
    for i in 0..sides {
        let bearing = TAU * i as f64 / sides as f64;
        ring.push(destination_point(center, radius_meters, bearing));
    }
    // Bearing 2π is bearing 0
    ring.push(ring[0]);

    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const PLYMOUTH_SOUND: Coord<f64> = Coord {
        x: -4.1427,
        y: 50.3455,
    };

    #[test]
    fn test_ring_is_closed_exactly() {
        for sides in [3, 4, 7, 64, 128] {
            for radius in [1.0, 250.0, 1000.0, 50_000.0] {
                let ring = create_geographic_circle(PLYMOUTH_SOUND, radius, sides);
                assert_eq!(ring.len(), sides + 1);
                assert_eq!(ring[0], ring[sides]);
            }
        }
    }

    #[test]
    fn test_default_descriptor_has_64_sides() {
        let circle = CircleDescriptor::new(PLYMOUTH_SOUND, 500.0);
        assert_eq!(circle.sides, DEFAULT_SIDES);
        assert_eq!(circle.ring().len(), 65);
    }

    #[test]
    fn test_three_sides_is_a_triangle() {
        let ring = CircleDescriptor::new(PLYMOUTH_SOUND, 500.0)
            .with_sides(3)
            .ring();
        assert_eq!(ring.len(), 4);
        assert_ne!(ring[0], ring[1]);
        assert_ne!(ring[1], ring[2]);
        assert_ne!(ring[0], ring[2]);
    }

    #[test]
    fn test_too_few_sides_are_raised() {
        let ring = create_geographic_circle(PLYMOUTH_SOUND, 500.0, 1);
        assert_eq!(ring.len(), MIN_SIDES + 1);
    }

    #[test]
    fn test_zero_radius_collapses_to_center() {
        let ring = create_geographic_circle(PLYMOUTH_SOUND, 0.0, 16);
        for point in ring {
            assert!((point.x - PLYMOUTH_SOUND.x).abs() < 1e-10);
            assert!((point.y - PLYMOUTH_SOUND.y).abs() < 1e-10);
        }
    }

    #[test]
    fn test_bearing_north() {
        let north = destination_point(PLYMOUTH_SOUND, 1000.0, 0.0);
        assert!(north.y > PLYMOUTH_SOUND.y);
        assert!((north.x - PLYMOUTH_SOUND.x).abs() < 1e-10);
    }

    #[test]
    fn test_bearing_east() {
        let east = destination_point(PLYMOUTH_SOUND, 1000.0, FRAC_PI_2);
        assert!(east.x > PLYMOUTH_SOUND.x);
        // Great circles heading east drift very slightly south of the parallel
        assert!((east.y - PLYMOUTH_SOUND.y).abs() < 1e-4);
    }

    #[test]
    fn test_distance_matches_radius() {
        let north = destination_point(PLYMOUTH_SOUND, 1000.0, 0.0);
        let dlat = (north.y - PLYMOUTH_SOUND.y).to_radians();
        assert!((dlat * EARTH_RADIUS_METERS - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_points_stay_in_range_across_antimeridian() {
        let center = Coord { x: 179.999, y: 0.0 };
        let ring = create_geographic_circle(center, 5000.0, 32);
        for point in ring {
            assert!(point.x > -180.0 && point.x <= 180.0);
            assert!(point.y > -90.0 && point.y < 90.0);
        }
    }
}
