//! Exemption Map - Command Line Front End
//!
//! Reads a site description (or an uploaded file's GeoJSON), draws it with
//! `marine-geo-lib`, fits a headless map view to it, and writes the result as a
//! JSON snapshot.

pub mod logging;
pub mod settings;
mod snapshot;

pub use settings::{InputKind, Settings};
pub use snapshot::{CliError, MapSnapshot, ViewSnapshot, build_snapshot, parse_input};

use std::fs;
use std::io::{self, Write};

/// Read the input, build the snapshot and write it out
pub fn run(settings: &Settings) -> Result<(), CliError> {
    let contents = fs::read_to_string(&settings.input).map_err(|source| CliError::Io {
        path: settings.input.display().to_string(),
        source,
    })?;

    let site = parse_input(settings.kind, &contents)?;
    let snapshot = build_snapshot(&site, settings);

    let json = if settings.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };

    match &settings.output {
        Some(path) => fs::write(path, json).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json).map_err(|source| CliError::Io {
                path: "<stdout>".to_string(),
                source,
            })
        }
    }
}
