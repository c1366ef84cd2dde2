//! Axis-aligned bounding boxes in map coordinates

use geo::{BoundingRect, Coord, Geometry, Rect};

/// Bounding box `[min_x, min_y, max_x, max_y]` in projected map coordinates.
///
/// An extent is only usable when all four values are finite. The empty extent
/// is the sentinel `[+inf, +inf, -inf, -inf]`, which extends to anything.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The empty sentinel extent
    pub fn empty() -> Self {
        Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    /// Extent of a geometry, or `None` for an empty one
    pub fn of_geometry(geometry: &Geometry<f64>) -> Option<Self> {
        geometry.bounding_rect().map(Self::from_rect)
    }

    #[inline]
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// True when all four components are finite
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }

    /// Grow this extent to cover `other`
    pub fn extend(&mut self, other: &Extent) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Rect<f64>> for Extent {
    fn from(rect: Rect<f64>) -> Self {
        Self::from_rect(rect)
    }
}

/// Anything that can report the extent of its geometry
pub trait HasExtent {
    /// Extent in map coordinates; [`Extent::empty`] when there is no geometry
    fn extent(&self) -> Extent;
}

impl HasExtent for Geometry<f64> {
    fn extent(&self) -> Extent {
        Extent::of_geometry(self).unwrap_or_else(Extent::empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};

    #[test]
    fn test_empty_extent_is_invalid() {
        assert!(!Extent::empty().is_valid());
        assert!(!Extent::default().is_valid());
    }

    #[test]
    fn test_nan_and_infinity_are_invalid() {
        assert!(!Extent::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
        assert!(!Extent::new(0.0, 0.0, f64::INFINITY, 1.0).is_valid());
        assert!(Extent::new(0.0, 0.0, 1.0, 1.0).is_valid());
    }

    #[test]
    fn test_extend_from_empty() {
        let mut extent = Extent::empty();
        extent.extend(&Extent::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(extent.as_array(), [1.0, 2.0, 3.0, 4.0]);

        extent.extend(&Extent::new(-1.0, 3.0, 2.0, 10.0));
        assert_eq!(extent.as_array(), [-1.0, 2.0, 3.0, 10.0]);
    }

    #[test]
    fn test_extend_with_empty_is_noop() {
        let mut extent = Extent::new(1.0, 2.0, 3.0, 4.0);
        extent.extend(&Extent::empty());
        assert_eq!(extent.as_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_geometry_extent() {
        let polygon = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        let extent = Geometry::Polygon(polygon).extent();
        assert_eq!(extent.as_array(), [0.0, 0.0, 4.0, 2.0]);
        assert_eq!(extent.center(), Coord { x: 2.0, y: 1.0 });
        assert_eq!(extent.width(), 4.0);
        assert_eq!(extent.height(), 2.0);
    }

    #[test]
    fn test_empty_geometry_extent_is_sentinel() {
        let empty = Geometry::LineString(LineString::<f64>::new(vec![]));
        assert!(Extent::of_geometry(&empty).is_none());
        assert!(!empty.extent().is_valid());
    }
}
