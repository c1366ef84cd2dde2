//! Forward/inverse projection pairs injected into the parser and feature assembler

use crate::utils;
use geo::Coord;

/// A map projection between WGS84 (lon, lat) degrees and a map's coordinate space.
///
/// The core never hardcodes the target projection; callers hand one in.
pub trait Projection {
    /// Forward: (lon, lat) degrees -> projected (x, y)
    fn forward(&self, lon_lat: Coord<f64>) -> Coord<f64>;

    /// Inverse: projected (x, y) -> (lon, lat) degrees
    fn inverse(&self, projected: Coord<f64>) -> Coord<f64>;
}

impl<P: Projection + ?Sized> Projection for &P {
    fn forward(&self, lon_lat: Coord<f64>) -> Coord<f64> {
        (**self).forward(lon_lat)
    }

    fn inverse(&self, projected: Coord<f64>) -> Coord<f64> {
        (**self).inverse(projected)
    }
}

/// Spherical Web Mercator (EPSG:3857), the projection used by slippy map tiles
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    #[inline]
    fn forward(&self, lon_lat: Coord<f64>) -> Coord<f64> {
        utils::lon_lat_to_mercator(lon_lat)
    }

    #[inline]
    fn inverse(&self, projected: Coord<f64>) -> Coord<f64> {
        utils::mercator_to_lon_lat(projected)
    }
}

/// Passthrough projection: the map works directly in (lon, lat) degrees
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Projection for Identity {
    #[inline]
    fn forward(&self, lon_lat: Coord<f64>) -> Coord<f64> {
        lon_lat
    }

    #[inline]
    fn inverse(&self, projected: Coord<f64>) -> Coord<f64> {
        projected
    }
}

/// A projection built from a pair of plain functions
#[derive(Clone, Copy)]
pub struct ProjectionFns<F, I> {
    pub forward: F,
    pub inverse: I,
}

impl<F, I> Projection for ProjectionFns<F, I>
where
    F: Fn(Coord<f64>) -> Coord<f64>,
    I: Fn(Coord<f64>) -> Coord<f64>,
{
    fn forward(&self, lon_lat: Coord<f64>) -> Coord<f64> {
        (self.forward)(lon_lat)
    }

    fn inverse(&self, projected: Coord<f64>) -> Coord<f64> {
        (self.inverse)(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_passthrough() {
        let c = Coord { x: -3.5, y: 54.0 };
        assert_eq!(Identity.forward(c), c);
        assert_eq!(Identity.inverse(c), c);
    }

    #[test]
    fn test_web_mercator_inverse_undoes_forward() {
        let c = Coord { x: 1.2, y: 52.6 };
        let back = WebMercator.inverse(WebMercator.forward(c));
        assert!((back.x - c.x).abs() < 1e-9);
        assert!((back.y - c.y).abs() < 1e-9);
    }

    #[test]
    fn test_projection_fns() {
        let shifted = ProjectionFns {
            forward: |c: Coord<f64>| Coord { x: c.x + 10.0, y: c.y },
            inverse: |c: Coord<f64>| Coord { x: c.x - 10.0, y: c.y },
        };
        let c = Coord { x: 1.0, y: 2.0 };
        assert_eq!(shifted.forward(c), Coord { x: 11.0, y: 2.0 });
        assert_eq!(shifted.inverse(shifted.forward(c)), c);
    }

    #[test]
    fn test_reference_forwards() {
        let projection = WebMercator;
        let by_ref: &dyn Projection = &projection;
        let c = Coord { x: 0.0, y: 0.0 };
        assert_eq!(by_ref.forward(c), projection.forward(c));
    }
}
