//! Feature assembly
//!
//! Builds renderable geometry from parsed coordinates. The map library's
//! constructors and projection are injected through [`MapModules`], so the
//! assembly logic never depends on a concrete renderer.

use crate::circle::{self, DEFAULT_SIDES};
use crate::coordinates::MIN_POLYGON_POINTS;
use crate::{Extent, GeoError, HasExtent, Projection, Result, WebMercator};
use geo::{Coord, Geometry, LineString, MapCoords, Polygon};
use serde_json::{Map, Value};

/// Constructors for the map library's polygon and feature types
pub trait FeatureFactory {
    /// The renderer's feature type; ownership passes to the caller
    type Feature;

    /// Build a polygon from a closed exterior ring
    fn create_polygon(&self, ring: LineString<f64>) -> Polygon<f64> {
        Polygon::new(ring, vec![])
    }

    /// Wrap a geometry (already in map coordinates) in a feature
    fn create_feature(
        &self,
        geometry: Geometry<f64>,
        properties: Option<Map<String, Value>>,
    ) -> Self::Feature;
}

/// A geometry in map coordinates with optional GeoJSON properties
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    pub geometry: Geometry<f64>,
    pub properties: Option<Map<String, Value>>,
}

impl MapFeature {
    /// Export as a GeoJSON feature, mapping every coordinate through `to_output`
    /// (for example a projection's inverse to get back to lon/lat).
    pub fn to_geojson(
        &self,
        to_output: impl Fn(Coord<f64>) -> Coord<f64> + Copy,
    ) -> geojson::Feature {
        let geometry = self.geometry.map_coords(to_output);
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&geometry))),
            id: None,
            properties: self.properties.clone(),
            foreign_members: None,
        }
    }
}

impl HasExtent for MapFeature {
    fn extent(&self) -> Extent {
        self.geometry.extent()
    }
}

/// Default factory producing [`MapFeature`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoFeatures;

impl FeatureFactory for GeoFeatures {
    type Feature = MapFeature;

    fn create_feature(
        &self,
        geometry: Geometry<f64>,
        properties: Option<Map<String, Value>>,
    ) -> MapFeature {
        MapFeature {
            geometry,
            properties,
        }
    }
}

/// Reads features out of a GeoJSON feature list into map coordinates
pub trait FeatureReader {
    fn read_features<P, F>(&self, features: &[Value], projection: &P, factory: &F) -> Vec<F::Feature>
    where
        P: Projection + ?Sized,
        F: FeatureFactory + ?Sized;
}

/// [`FeatureReader`] for RFC 7946 GeoJSON features in (lon, lat) order
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonReader;

impl GeoJsonReader {
    fn read_feature(value: &Value) -> Result<(Geometry<f64>, Option<Map<String, Value>>)> {
        let feature = geojson::Feature::try_from(value.clone())
            .map_err(|e| GeoError::InvalidGeoJson(e.to_string()))?;
        let geometry = feature
            .geometry
            .ok_or_else(|| GeoError::InvalidGeoJson("feature has no geometry".to_string()))?;
        let geometry = Geometry::<f64>::try_from(geometry)
            .map_err(|e| GeoError::InvalidGeoJson(e.to_string()))?;
        Ok((geometry, feature.properties))
    }
}

impl FeatureReader for GeoJsonReader {
    fn read_features<P, F>(&self, features: &[Value], projection: &P, factory: &F) -> Vec<F::Feature>
    where
        P: Projection + ?Sized,
        F: FeatureFactory + ?Sized,
    {
        features
            .iter()
            .enumerate()
            .filter_map(|(index, value)| match Self::read_feature(value) {
                Ok((geometry, properties)) => {
                    let projected = geometry.map_coords(|c| projection.forward(c));
                    Some(factory.create_feature(projected, properties))
                }
                Err(err) => {
                    tracing::debug!("Skipping GeoJSON feature {}: {}", index, err);
                    None
                }
            })
            .collect()
    }
}

/// Number of distinct vertices, counting no further than the polygon minimum
pub(crate) fn distinct_vertices(coordinates: &[Coord<f64>]) -> usize {
    let mut seen: Vec<Coord<f64>> = Vec::with_capacity(MIN_POLYGON_POINTS);
    for coord in coordinates {
        if !seen.contains(coord) {
            seen.push(*coord);
            if seen.len() == MIN_POLYGON_POINTS {
                break;
            }
        }
    }
    seen.len()
}

/// The map library capabilities the assembler needs: a projection pair and
/// feature constructors
#[derive(Debug, Clone, Default)]
pub struct MapModules<P = WebMercator, F = GeoFeatures> {
    pub projection: P,
    pub factory: F,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<P: Projection, F: FeatureFactory> MapModules<P, F> {
    pub fn new(projection: P, factory: F) -> Self {
        Self {
            projection,
            factory,
        }
    }

    /// Circle feature around `center` (map coordinates) with the given diameter
    /// in meters, using [`DEFAULT_SIDES`] sides
    pub fn create_circle_feature(&self, center: Coord<f64>, diameter_meters: f64) -> F::Feature {
        self.create_circle_feature_with_sides(center, diameter_meters, DEFAULT_SIDES)
    }

    /// Circle feature with an explicit side count
    pub fn create_circle_feature_with_sides(
        &self,
        center: Coord<f64>,
        diameter_meters: f64,
        sides: usize,
    ) -> F::Feature {
        let center_lon_lat = self.projection.inverse(center);
        let radius = diameter_meters / 2.0;

        let ring: Vec<Coord<f64>> = circle::create_geographic_circle(center_lon_lat, radius, sides)
            .into_iter()
            .map(|c| self.projection.forward(c))
            .collect();

        let polygon = self.factory.create_polygon(LineString::new(ring));
        self.factory.create_feature(Geometry::Polygon(polygon), None)
    }

    /// Polygon feature from map coordinates, closing the ring if needed.
    ///
    /// Returns `None` unless the ring has at least three distinct vertices
    /// before closure.
    pub fn create_polygon_feature(&self, coordinates: &[Coord<f64>]) -> Option<F::Feature> {
        let open = match coordinates {
            [first, .., last] if first == last => &coordinates[..coordinates.len() - 1],
            _ => coordinates,
        };

        let distinct = distinct_vertices(open);
        if distinct < MIN_POLYGON_POINTS {
            tracing::debug!(
                "Polygon needs at least {} distinct points, got {}",
                MIN_POLYGON_POINTS,
                distinct
            );
            return None;
        }

        let mut ring = open.to_vec();
        ring.push(open[0]);

        let polygon = self.factory.create_polygon(LineString::new(ring));
        Some(self.factory.create_feature(Geometry::Polygon(polygon), None))
    }

    /// Features from a GeoJSON feature collection, read by `format` into this
    /// bundle's projection. Anything without a `features` array yields nothing.
    pub fn create_features_from_geojson<R: FeatureReader + ?Sized>(
        &self,
        format: &R,
        geojson: &Value,
    ) -> Vec<F::Feature> {
        match geojson.get("features").and_then(Value::as_array) {
            Some(features) => format.read_features(features, &self.projection, &self.factory),
            None => {
                tracing::debug!("GeoJSON has no features array");
                Vec::new()
            }
        }
    }
}
