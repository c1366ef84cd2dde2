//! View fitting
//!
//! Positions a map so a site's features are visible. Whatever goes wrong
//! (no extent, a non-finite extent, or the map refusing to fit) the map ends up
//! centred on the UK at a fixed zoom, so it is always in a displayable state.

use crate::{Extent, GeoError, HasExtent, Projection, Result, utils};
use geo::{Coord, Geometry};

/// Fallback center (lon, lat): the geographic center of the UK
pub const DEFAULT_CENTER_LON_LAT: Coord<f64> = Coord { x: -3.5, y: 54.0 };

/// Fallback zoom level
pub const DEFAULT_ZOOM: f64 = 12.0;

/// Options for fitting a view to an extent
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitOptions {
    /// Padding in pixels: top, right, bottom, left
    pub padding: [f64; 4],
    /// Stop small sites zooming in too far
    pub max_zoom: f64,
    /// Stop large sites zooming out too far
    pub min_zoom: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: [100.0; 4],
            max_zoom: 14.0,
            min_zoom: 8.0,
        }
    }
}

/// Caller overrides, merged key by key over [`FitOptions::default`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FitOverrides {
    pub padding: Option<[f64; 4]>,
    pub max_zoom: Option<f64>,
    pub min_zoom: Option<f64>,
}

impl FitOptions {
    /// Shallow merge: each override that is set replaces the matching option
    pub fn merged(self, overrides: &FitOverrides) -> Self {
        Self {
            padding: overrides.padding.unwrap_or(self.padding),
            max_zoom: overrides.max_zoom.unwrap_or(self.max_zoom),
            min_zoom: overrides.min_zoom.unwrap_or(self.min_zoom),
        }
    }
}

/// The view of a map that can be fitted, recentred and zoomed
pub trait MapView {
    /// Fit the view to `extent` (map coordinates)
    fn fit(&mut self, extent: &Extent, options: &FitOptions) -> Result<()>;

    /// Center the view on a point in map coordinates
    fn set_center(&mut self, center: Coord<f64>);

    fn set_zoom(&mut self, zoom: f64);
}

/// How a fit request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// The map was fitted to the extent
    Fitted,
    /// The map was reset to the default UK view
    Fallback,
}

/// Fit `map` to `extent`, falling back to the default UK view when the extent
/// is missing or not finite, or when the map fails to fit.
///
/// `projection` maps the fallback center into the map's coordinates.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn fit_map_to_extent<M, P>(
    map: &mut M,
    extent: Option<&Extent>,
    overrides: &FitOverrides,
    projection: &P,
) -> FitOutcome
where
    M: MapView + ?Sized,
    P: Projection + ?Sized,
{
    let options = FitOptions::default().merged(overrides);

    let result = match extent {
        Some(extent) if extent.is_valid() => map.fit(extent, &options),
        Some(extent) => Err(GeoError::InvalidViewport(format!(
            "extent {:?} is not finite",
            extent.as_array()
        ))),
        None => Err(GeoError::InvalidViewport("no extent to fit".to_string())),
    };

    match result {
        Ok(()) => FitOutcome::Fitted,
        Err(err) => {
            tracing::warn!("Could not fit map to extent, using default view: {}", err);
            map.set_center(projection.forward(DEFAULT_CENTER_LON_LAT));
            map.set_zoom(DEFAULT_ZOOM);
            FitOutcome::Fallback
        }
    }
}

/// Fit `map` to a geometry's extent
pub fn fit_map_to_geometry<M, P>(
    map: &mut M,
    geometry: Option<&Geometry<f64>>,
    overrides: &FitOverrides,
    projection: &P,
) -> FitOutcome
where
    M: MapView + ?Sized,
    P: Projection + ?Sized,
{
    let extent = geometry.and_then(Extent::of_geometry);
    fit_map_to_extent(map, extent.as_ref(), overrides, projection)
}

/// Fit `map` to everything in a vector source
pub fn fit_map_to_all_features<M, S, P>(
    map: &mut M,
    source: &S,
    overrides: &FitOverrides,
    projection: &P,
) -> FitOutcome
where
    M: MapView + ?Sized,
    S: HasExtent + ?Sized,
    P: Projection + ?Sized,
{
    let extent = source.extent();
    fit_map_to_extent(map, Some(&extent), overrides, projection)
}

/// A map view with no renderer behind it, in Web Mercator meters.
///
/// Used to work out the center and zoom a browser map would show.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessView {
    /// Viewport size in pixels
    width: f64,
    height: f64,
    center: Option<Coord<f64>>,
    zoom: Option<f64>,
}

impl HeadlessView {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            center: None,
            zoom: None,
        }
    }

    #[inline]
    pub fn center(&self) -> Option<Coord<f64>> {
        self.center
    }

    #[inline]
    pub fn zoom(&self) -> Option<f64> {
        self.zoom
    }

    /// Meters per pixel at the current zoom
    pub fn resolution(&self) -> Option<f64> {
        self.zoom.map(|zoom| utils::RESOLUTION_AT_ZOOM_0 / zoom.exp2())
    }
}

impl MapView for HeadlessView {
    fn fit(&mut self, extent: &Extent, options: &FitOptions) -> Result<()> {
        if !extent.is_valid() {
            return Err(GeoError::InvalidViewport(format!(
                "extent {:?} is not finite",
                extent.as_array()
            )));
        }
        if !(options.min_zoom <= options.max_zoom) {
            return Err(GeoError::InvalidViewport(format!(
                "min zoom {} is above max zoom {}",
                options.min_zoom, options.max_zoom
            )));
        }

        let [top, right, bottom, left] = options.padding;
        let available_width = self.width - left - right;
        let available_height = self.height - top - bottom;
        if !(available_width > 0.0 && available_height > 0.0) {
            return Err(GeoError::InvalidViewport(format!(
                "{}x{} viewport leaves no room inside padding {:?}",
                self.width, self.height, options.padding
            )));
        }

        let fit_resolution =
            (extent.width() / available_width).max(extent.height() / available_height);
        let zoom = if fit_resolution > 0.0 {
            utils::zoom_for_resolution(fit_resolution)
        } else {
            // A single point: zoom as far as allowed
            options.max_zoom
        };
        let zoom = zoom.clamp(options.min_zoom, options.max_zoom);

        // Shift the center so the extent sits in the middle of the padded area
        let resolution = utils::RESOLUTION_AT_ZOOM_0 / zoom.exp2();
        let mut center = extent.center();
        center.x -= (left - right) / 2.0 * resolution;
        center.y += (top - bottom) / 2.0 * resolution;

        self.center = Some(center);
        self.zoom = Some(zoom);

        tracing::trace!(
            "Fitted view to extent {:?}: center ({:.1}, {:.1}), zoom {:.2}",
            extent.as_array(),
            center.x,
            center.y,
            zoom
        );
        Ok(())
    }

    fn set_center(&mut self, center: Coord<f64>) {
        self.center = Some(center);
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = Some(zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Identity, VectorSource, WebMercator};
    use geo::{LineString, Point, Polygon};

    /// Records calls and can be told to fail
    #[derive(Default)]
    struct RecordingView {
        fail: bool,
        fitted: Option<(Extent, FitOptions)>,
        center: Option<Coord<f64>>,
        zoom: Option<f64>,
    }

    impl MapView for RecordingView {
        fn fit(&mut self, extent: &Extent, options: &FitOptions) -> Result<()> {
            if self.fail {
                return Err(GeoError::InvalidViewport("renderer not ready".to_string()));
            }
            self.fitted = Some((*extent, *options));
            Ok(())
        }

        fn set_center(&mut self, center: Coord<f64>) {
            self.center = Some(center);
        }

        fn set_zoom(&mut self, zoom: f64) {
            self.zoom = Some(zoom);
        }
    }

    fn assert_fallback(view: &RecordingView, outcome: FitOutcome) {
        assert_eq!(outcome, FitOutcome::Fallback);
        assert_eq!(view.center, Some(Coord { x: -3.5, y: 54.0 }));
        assert_eq!(view.zoom, Some(12.0));
        assert!(view.fitted.is_none());
    }

    #[test]
    fn test_default_options() {
        let options = FitOptions::default();
        assert_eq!(options.padding, [100.0, 100.0, 100.0, 100.0]);
        assert_eq!(options.max_zoom, 14.0);
        assert_eq!(options.min_zoom, 8.0);
    }

    #[test]
    fn test_overrides_merge_per_key() {
        let overrides = FitOverrides {
            max_zoom: Some(16.0),
            ..FitOverrides::default()
        };
        let options = FitOptions::default().merged(&overrides);
        assert_eq!(options.max_zoom, 16.0);
        assert_eq!(options.min_zoom, 8.0);
        assert_eq!(options.padding, [100.0; 4]);
    }

    #[test]
    fn test_valid_extent_is_fitted_with_merged_options() {
        let mut view = RecordingView::default();
        let extent = Extent::new(0.0, 0.0, 10.0, 10.0);
        let overrides = FitOverrides {
            padding: Some([10.0, 20.0, 30.0, 40.0]),
            ..FitOverrides::default()
        };

        let outcome = fit_map_to_extent(&mut view, Some(&extent), &overrides, &Identity);
        assert_eq!(outcome, FitOutcome::Fitted);

        let (fitted_extent, options) = view.fitted.unwrap();
        assert_eq!(fitted_extent, extent);
        assert_eq!(options.padding, [10.0, 20.0, 30.0, 40.0]);
        assert_eq!(options.max_zoom, 14.0);
        assert!(view.center.is_none());
    }

    #[test]
    fn test_non_finite_extents_fall_back() {
        for extent in [
            Extent::empty(),
            Extent::new(f64::NAN, 0.0, 1.0, 1.0),
            Extent::new(0.0, f64::NEG_INFINITY, 1.0, 1.0),
        ] {
            let mut view = RecordingView::default();
            let outcome =
                fit_map_to_extent(&mut view, Some(&extent), &FitOverrides::default(), &Identity);
            assert_fallback(&view, outcome);
        }
    }

    #[test]
    fn test_missing_extent_falls_back() {
        let mut view = RecordingView::default();
        let outcome = fit_map_to_extent(&mut view, None, &FitOverrides::default(), &Identity);
        assert_fallback(&view, outcome);
    }

    #[test]
    fn test_failing_fit_falls_back() {
        let mut view = RecordingView {
            fail: true,
            ..RecordingView::default()
        };
        let extent = Extent::new(0.0, 0.0, 10.0, 10.0);
        let outcome =
            fit_map_to_extent(&mut view, Some(&extent), &FitOverrides::default(), &Identity);
        assert_fallback(&view, outcome);
    }

    #[test]
    fn test_fallback_center_is_projected() {
        let mut view = RecordingView::default();
        fit_map_to_extent(&mut view, None, &FitOverrides::default(), &WebMercator);
        assert_eq!(view.center, Some(WebMercator.forward(DEFAULT_CENTER_LON_LAT)));
    }

    #[test]
    fn test_fit_to_geometry() {
        let mut view = RecordingView::default();
        let polygon = Geometry::Polygon(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 3.0), (0.0, 0.0)]),
            vec![],
        ));
        let outcome = fit_map_to_geometry(&mut view, Some(&polygon), &FitOverrides::default(), &Identity);
        assert_eq!(outcome, FitOutcome::Fitted);
        assert_eq!(view.fitted.unwrap().0.as_array(), [0.0, 0.0, 2.0, 3.0]);

        let mut view = RecordingView::default();
        let outcome = fit_map_to_geometry(&mut view, None, &FitOverrides::default(), &Identity);
        assert_fallback(&view, outcome);
    }

    #[test]
    fn test_fit_to_empty_source_falls_back() {
        let mut view = RecordingView::default();
        let source: VectorSource<Geometry<f64>> = VectorSource::new();
        let outcome = fit_map_to_all_features(&mut view, &source, &FitOverrides::default(), &Identity);
        assert_fallback(&view, outcome);
    }

    #[test]
    fn test_fit_to_source() {
        let mut view = RecordingView::default();
        let mut source = VectorSource::new();
        source.add_features([
            Geometry::Point(Point::new(1.0, 1.0)),
            Geometry::Point(Point::new(5.0, 3.0)),
        ]);
        let outcome = fit_map_to_all_features(&mut view, &source, &FitOverrides::default(), &Identity);
        assert_eq!(outcome, FitOutcome::Fitted);
        assert_eq!(view.fitted.unwrap().0.as_array(), [1.0, 1.0, 5.0, 3.0]);
    }

    #[test]
    fn test_headless_small_site_hits_max_zoom() {
        let mut view = HeadlessView::new(800.0, 600.0);
        let extent = Extent::new(-1000.0, 6_500_000.0, 0.0, 6_501_000.0);
        view.fit(&extent, &FitOptions::default()).unwrap();

        assert_eq!(view.zoom(), Some(14.0));
        assert_eq!(view.center(), Some(extent.center()));
    }

    #[test]
    fn test_headless_large_site_hits_min_zoom() {
        let mut view = HeadlessView::new(800.0, 600.0);
        let extent = Extent::new(0.0, 0.0, 2_000_000.0, 2_000_000.0);
        view.fit(&extent, &FitOptions::default()).unwrap();
        assert_eq!(view.zoom(), Some(8.0));
    }

    #[test]
    fn test_headless_zoom_between_limits() {
        let mut view = HeadlessView::new(800.0, 600.0);
        // 400px of usable height over 200km
        let extent = Extent::new(0.0, 0.0, 100_000.0, 200_000.0);
        view.fit(&extent, &FitOptions::default()).unwrap();

        let zoom = view.zoom().unwrap();
        assert!(zoom > 8.0 && zoom < 14.0);
        assert!((view.resolution().unwrap() - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_headless_point_uses_max_zoom() {
        let mut view = HeadlessView::new(800.0, 600.0);
        let extent = Extent::new(5.0, 5.0, 5.0, 5.0);
        view.fit(&extent, &FitOptions::default()).unwrap();
        assert_eq!(view.zoom(), Some(14.0));
    }

    #[test]
    fn test_headless_asymmetric_padding_shifts_center() {
        let mut view = HeadlessView::new(800.0, 600.0);
        let extent = Extent::new(0.0, 0.0, 100.0, 100.0);
        let options = FitOptions {
            padding: [0.0, 0.0, 0.0, 200.0],
            ..FitOptions::default()
        };
        view.fit(&extent, &options).unwrap();

        let center = view.center().unwrap();
        let resolution = view.resolution().unwrap();
        assert!((center.x - (50.0 - 100.0 * resolution)).abs() < 1e-9);
        assert!((center.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_headless_padding_larger_than_viewport_falls_back() {
        let mut view = HeadlessView::new(150.0, 150.0);
        let extent = Extent::new(0.0, 0.0, 100.0, 100.0);
        assert!(view.fit(&extent, &FitOptions::default()).is_err());

        let outcome =
            fit_map_to_extent(&mut view, Some(&extent), &FitOverrides::default(), &Identity);
        assert_eq!(outcome, FitOutcome::Fallback);
        assert_eq!(view.center(), Some(DEFAULT_CENTER_LON_LAT));
        assert_eq!(view.zoom(), Some(DEFAULT_ZOOM));
    }
}
