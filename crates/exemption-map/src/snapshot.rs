//! Map snapshots: the features drawn for a site plus the view a browser map
//! would settle on

use crate::settings::{InputKind, Settings};
use marine_geo_lib::{
    DEFAULT_CENTER_LON_LAT, DEFAULT_ZOOM, FitOutcome, HeadlessView, MapFeature, MapModules,
    Projection, SiteDetails, VectorSource, fit_map_to_all_features, try_build_site_features,
};
use serde::Serialize;
use serde_json::Value;

/// Error types for the command line tool
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the map ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    /// Center as [lon, lat] degrees
    pub center: [f64; 2],
    pub zoom: f64,
    /// False when the view fell back to the default UK view
    pub fitted: bool,
}

/// Features (in lon/lat) and view for one site
#[derive(Debug, Clone, Serialize)]
pub struct MapSnapshot {
    pub view: ViewSnapshot,
    pub features: geojson::FeatureCollection,
}

/// Parse the input file's contents according to its kind
pub fn parse_input(kind: InputKind, contents: &str) -> Result<SiteDetails, CliError> {
    Ok(match kind {
        InputKind::Site => serde_json::from_str(contents)?,
        InputKind::Geojson => SiteDetails::FileUpload {
            geo_json: serde_json::from_str::<Value>(contents)?,
        },
    })
}

/// Draw the site's features onto a headless Web Mercator map and fit the view
pub fn build_snapshot(site: &SiteDetails, settings: &Settings) -> MapSnapshot {
    #[cfg(feature = "profiling")]
    profiling::scope!("snapshot::build_snapshot");

    let modules: MapModules = MapModules::default();

    let mut source = VectorSource::new();
    match try_build_site_features(site, &modules, settings.sides) {
        Ok(features) => source.add_features(features),
        Err(err) => tracing::warn!("Site rejected: {}", err),
    }
    if source.is_empty() {
        tracing::warn!("No features could be drawn for this site");
    } else {
        tracing::info!("Drew {} feature(s)", source.len());
    }

    let mut view = HeadlessView::new(
        settings.viewport_width as f64,
        settings.viewport_height as f64,
    );
    let outcome = fit_map_to_all_features(
        &mut view,
        &source,
        &settings.fit_overrides(),
        &modules.projection,
    );

    let center = view
        .center()
        .map(|c| modules.projection.inverse(c))
        .unwrap_or(DEFAULT_CENTER_LON_LAT);

    MapSnapshot {
        view: ViewSnapshot {
            center: [center.x, center.y],
            zoom: view.zoom().unwrap_or(DEFAULT_ZOOM),
            fitted: outcome == FitOutcome::Fitted,
        },
        features: geojson::FeatureCollection {
            bbox: None,
            features: source
                .features()
                .iter()
                .map(|feature: &MapFeature| feature.to_geojson(|c| modules.projection.inverse(c)))
                .collect(),
            foreign_members: None,
        },
    }
}
