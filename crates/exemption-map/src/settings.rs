use clap::{Parser, ValueEnum};
use marine_geo_lib::{DEFAULT_SIDES, FitOverrides};
use std::path::PathBuf;

/// What the input file holds
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A site description: circle, polygon or uploaded file, as JSON
    Site,
    /// A bare GeoJSON feature collection from the file conversion service
    Geojson,
}

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Exemption Map - Render a marine licensing exemption site to a fitted map snapshot
pub struct Settings {
    /// Input file to render
    #[clap(value_name = "FILE")]
    pub input: PathBuf,

    /// What the input file holds
    #[clap(short, long, value_enum, default_value = "site")]
    pub kind: InputKind,

    /// Write the snapshot to this file instead of stdout
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Map viewport width in pixels
    #[clap(long, default_value = "1024")]
    pub viewport_width: u32,

    /// Map viewport height in pixels
    #[clap(long, default_value = "768")]
    pub viewport_height: u32,

    /// Padding around the site in pixels, applied to all sides (default: 100)
    #[clap(long)]
    pub padding: Option<f64>,

    /// Highest zoom level the map may fit to (default: 14)
    #[clap(long)]
    pub max_zoom: Option<f64>,

    /// Lowest zoom level the map may fit to (default: 8)
    #[clap(long)]
    pub min_zoom: Option<f64>,

    /// Number of sides used to draw circular sites
    #[clap(long, default_value_t = DEFAULT_SIDES)]
    pub sides: usize,

    /// Pretty-print the JSON output
    #[clap(long, default_value = "false")]
    pub pretty: bool,
}

impl Settings {
    /// Parse from the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Fit options the user asked for; unset ones keep their defaults
    pub fn fit_overrides(&self) -> FitOverrides {
        FitOverrides {
            padding: self.padding.map(|p| [p; 4]),
            max_zoom: self.max_zoom,
            min_zoom: self.min_zoom,
        }
    }
}
