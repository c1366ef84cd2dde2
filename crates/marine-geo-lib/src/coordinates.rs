//! Raw coordinate input parsing
//!
//! Form fields arrive as strings, in either WGS84 (latitude/longitude) or
//! OSGB36 (eastings/northings). Parsing fails closed: the public entry points
//! return `None` rather than an error so the calling page can show a validation
//! message. The `try_*` variants carry the reason, including which point of a
//! batch was rejected.

use crate::{GeoError, Projection, Result, datum};
use geo::Coord;
use std::fmt;
use std::str::FromStr;

/// Minimum number of points for a polygon site
pub const MIN_POLYGON_POINTS: usize = 3;

/// Declared coordinate system of a site's coordinates.
///
/// Parsed case-insensitively, from text and from serde alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum CoordinateSystem {
    Wgs84,
    Osgb36,
}

impl CoordinateSystem {
    /// Case-insensitive parse, `None` for anything unrecognised
    pub fn parse(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl FromStr for CoordinateSystem {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("wgs84") {
            Ok(Self::Wgs84)
        } else if trimmed.eq_ignore_ascii_case("osgb36") {
            Ok(Self::Osgb36)
        } else {
            Err(GeoError::UnknownCoordinateSystem(s.to_string()))
        }
    }
}

impl TryFrom<String> for CoordinateSystem {
    type Error = GeoError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CoordinateSystem> for String {
    fn from(system: CoordinateSystem) -> Self {
        system.to_string()
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wgs84 => write!(f, "WGS84"),
            Self::Osgb36 => write!(f, "OSGB36"),
        }
    }
}

/// One point as entered in the form, fields still as text
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawCoordinate {
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")
    )]
    pub latitude: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")
    )]
    pub longitude: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")
    )]
    pub eastings: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")
    )]
    pub northings: Option<String>,
}

impl RawCoordinate {
    pub fn wgs84(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            ..Self::default()
        }
    }

    pub fn osgb36(eastings: impl Into<String>, northings: impl Into<String>) -> Self {
        Self {
            eastings: Some(eastings.into()),
            northings: Some(northings.into()),
            ..Self::default()
        }
    }

    fn has_wgs84_fields(&self) -> bool {
        present(&self.latitude) && present(&self.longitude)
    }

    fn has_osgb36_fields(&self) -> bool {
        present(&self.eastings) && present(&self.northings)
    }
}

/// Form fields may be posted as numbers by API clients
#[cfg(feature = "serde")]
pub(crate) fn text_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(f64),
    }

    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }),
    )
}

/// Either a single point or a list of points
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CoordinateInput {
    Multiple(Vec<RawCoordinate>),
    Single(RawCoordinate),
}

/// Projected output matching the shape of the input
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCoordinates {
    Single(Coord<f64>),
    Multiple(Vec<Coord<f64>>),
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

pub(crate) fn number(field: &Option<String>, name: &'static str) -> Result<f64> {
    let text = field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(GeoError::MissingField(name))?;

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(GeoError::InvalidNumber {
            field: name,
            value: text.to_string(),
        }),
    }
}

/// Parse one point, reporting why it was rejected
pub fn try_parse_single_coordinate<P: Projection + ?Sized>(
    system: CoordinateSystem,
    raw: &RawCoordinate,
    projection: &P,
) -> Result<Coord<f64>> {
    let lon_lat = match system {
        CoordinateSystem::Wgs84 => {
            if !raw.has_wgs84_fields() && raw.has_osgb36_fields() {
                return Err(GeoError::SystemMismatch { expected: system });
            }
            let latitude = number(&raw.latitude, "latitude")?;
            let longitude = number(&raw.longitude, "longitude")?;
            Coord {
                x: longitude,
                y: latitude,
            }
        }
        CoordinateSystem::Osgb36 => {
            if !raw.has_osgb36_fields() && raw.has_wgs84_fields() {
                return Err(GeoError::SystemMismatch { expected: system });
            }
            let eastings = number(&raw.eastings, "eastings")?;
            let northings = number(&raw.northings, "northings")?;
            datum::osgb36_to_wgs84(eastings, northings)
        }
    };

    Ok(projection.forward(lon_lat))
}

/// Parse one point into map coordinates, `None` if it is missing, malformed or
/// does not carry the fields of the declared system
pub fn parse_single_coordinate<P: Projection + ?Sized>(
    system: CoordinateSystem,
    raw: &RawCoordinate,
    projection: &P,
) -> Option<Coord<f64>> {
    try_parse_single_coordinate(system, raw, projection)
        .inspect_err(|err| tracing::debug!("Rejected {} coordinate: {}", system, err))
        .ok()
}

/// Parse a polygon's points, reporting the first point that failed
pub fn try_parse_multiple_coordinates<P: Projection + ?Sized>(
    system: CoordinateSystem,
    raws: &[RawCoordinate],
    projection: &P,
) -> Result<Vec<Coord<f64>>> {
    if raws.len() < MIN_POLYGON_POINTS {
        return Err(GeoError::TooFewPoints {
            min: MIN_POLYGON_POINTS,
            actual: raws.len(),
        });
    }

    raws.iter()
        .enumerate()
        .map(|(index, raw)| {
            try_parse_single_coordinate(system, raw, projection).map_err(|source| {
                GeoError::InvalidPoint {
                    index,
                    source: Box::new(source),
                }
            })
        })
        .collect()
}

/// Parse a polygon's points. Any bad point rejects the whole batch, as does a
/// batch shorter than three points.
pub fn parse_multiple_coordinates<P: Projection + ?Sized>(
    system: CoordinateSystem,
    raws: &[RawCoordinate],
    projection: &P,
) -> Option<Vec<Coord<f64>>> {
    try_parse_multiple_coordinates(system, raws, projection)
        .inspect_err(|err| tracing::debug!("Rejected {} coordinates: {}", system, err))
        .ok()
}

/// Boundary entry point: normalises the coordinate system string, then parses
/// a single point or a list of points.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_coordinates<P: Projection + ?Sized>(
    system: &str,
    input: &CoordinateInput,
    projection: &P,
) -> Option<ParsedCoordinates> {
    let Some(system) = CoordinateSystem::parse(system) else {
        tracing::debug!("Unrecognised coordinate system {:?}", system);
        return None;
    };

    match input {
        CoordinateInput::Single(raw) => {
            parse_single_coordinate(system, raw, projection).map(ParsedCoordinates::Single)
        }
        CoordinateInput::Multiple(raws) => {
            parse_multiple_coordinates(system, raws, projection).map(ParsedCoordinates::Multiple)
        }
    }
}
