//! Site descriptions as captured by the exemption forms, and the features they draw

use crate::coordinates::{self, CoordinateSystem, RawCoordinate};
use crate::features;
use crate::{FeatureFactory, GeoError, GeoJsonReader, MapModules, Projection, Result};
use serde_json::Value;

/// How the user described the site
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "siteType", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum SiteDetails {
    /// A center point and a width (diameter) in meters
    Circle {
        coordinate_system: String,
        center: RawCoordinate,
        #[cfg_attr(
            feature = "serde",
            serde(default, deserialize_with = "coordinates::text_or_number")
        )]
        width: Option<String>,
    },
    /// Three or more boundary points
    Polygon {
        coordinate_system: String,
        coordinates: Vec<RawCoordinate>,
    },
    /// GeoJSON produced from an uploaded shapefile or KML file
    FileUpload { geo_json: Value },
}

/// Build the features for a site, reporting why nothing could be drawn.
///
/// Circles use `circle_sides` sides. An uploaded file with no usable features
/// yields an empty list rather than an error.
pub fn try_build_site_features<P, F>(
    site: &SiteDetails,
    modules: &MapModules<P, F>,
    circle_sides: usize,
) -> Result<Vec<F::Feature>>
where
    P: Projection,
    F: FeatureFactory,
{
    match site {
        SiteDetails::Circle {
            coordinate_system,
            center,
            width,
        } => {
            let system: CoordinateSystem = coordinate_system.parse()?;
            let center =
                coordinates::try_parse_single_coordinate(system, center, &modules.projection)?;
            let width = coordinates::number(width, "width")?;
            if width <= 0.0 {
                return Err(GeoError::InvalidNumber {
                    field: "width",
                    value: width.to_string(),
                });
            }
            Ok(vec![modules.create_circle_feature_with_sides(
                center,
                width,
                circle_sides,
            )])
        }
        SiteDetails::Polygon {
            coordinate_system,
            coordinates: points,
        } => {
            let system: CoordinateSystem = coordinate_system.parse()?;
            let points =
                coordinates::try_parse_multiple_coordinates(system, points, &modules.projection)?;
            let feature = modules
                .create_polygon_feature(&points)
                .ok_or(GeoError::TooFewPoints {
                    min: coordinates::MIN_POLYGON_POINTS,
                    actual: features::distinct_vertices(&points),
                })?;
            Ok(vec![feature])
        }
        SiteDetails::FileUpload { geo_json } => {
            Ok(modules.create_features_from_geojson(&GeoJsonReader, geo_json))
        }
    }
}

/// Build the features for a site; empty when the input fails closed
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn build_site_features<P, F>(
    site: &SiteDetails,
    modules: &MapModules<P, F>,
    circle_sides: usize,
) -> Vec<F::Feature>
where
    P: Projection,
    F: FeatureFactory,
{
    try_build_site_features(site, modules, circle_sides).unwrap_or_else(|err| {
        tracing::debug!("No features for site: {}", err);
        Vec::new()
    })
}
