//! Marine Geo Library - Coordinate Handling for Exemption Site Maps
//!
//! This library turns the coordinates a user enters for a marine licensing exemption
//! site (or the GeoJSON produced from an uploaded file) into map features, and
//! positions a map so those features are visible.
//!
//! # Architecture
//!
//! - **[`osgb36_to_wgs84`]**: OSGB36 national grid to WGS84 conversion
//! - **[`create_geographic_circle`]**: circle approximation on the sphere
//! - **[`parse_coordinates`]**: raw form input to projected points, failing closed
//! - **[`MapModules`]**: feature assembly over an injected projection and feature factory
//! - **[`fit_map_to_extent`]**: view fitting with a fixed UK fallback
//!
//! Every operation is a pure function of its arguments plus the injected map and
//! projection dependencies. Nothing here performs I/O or holds global state.

mod circle;
mod coordinates;
mod datum;
mod extent;
mod features;
mod projection;
mod site;
mod source;
pub mod utils;
mod view;

// Public API exports
pub use circle::{
    CircleDescriptor, DEFAULT_SIDES, EARTH_RADIUS_METERS, MIN_SIDES, create_geographic_circle,
    destination_point,
};
pub use coordinates::{
    CoordinateInput, CoordinateSystem, MIN_POLYGON_POINTS, ParsedCoordinates, RawCoordinate,
    parse_coordinates, parse_multiple_coordinates, parse_single_coordinate,
    try_parse_multiple_coordinates, try_parse_single_coordinate,
};
pub use datum::osgb36_to_wgs84;
pub use extent::{Extent, HasExtent};
pub use features::{
    FeatureFactory, FeatureReader, GeoFeatures, GeoJsonReader, MapFeature, MapModules,
};
pub use projection::{Identity, Projection, ProjectionFns, WebMercator};
pub use site::{SiteDetails, build_site_features, try_build_site_features};
pub use source::VectorSource;
pub use view::{
    DEFAULT_CENTER_LON_LAT, DEFAULT_ZOOM, FitOptions, FitOutcome, FitOverrides, HeadlessView,
    MapView, fit_map_to_all_features, fit_map_to_extent, fit_map_to_geometry,
};

/// Error types for coordinate parsing and map assembly
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("Unknown coordinate system: {0}")]
    UnknownCoordinateSystem(String),

    #[error("Missing coordinate field: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Coordinates do not match the {expected} coordinate system")]
    SystemMismatch { expected: CoordinateSystem },

    #[error("Too few points: expected at least {min}, got {actual}")]
    TooFewPoints { min: usize, actual: usize },

    #[error("Point {index} is invalid: {source}")]
    InvalidPoint {
        index: usize,
        #[source]
        source: Box<GeoError>,
    },

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),
}

pub type Result<T> = std::result::Result<T, GeoError>;
