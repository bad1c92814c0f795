pub mod geojson;

use elevation_profile_protocol::Coordinate;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::model::ProfileInput;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}, coordinate {index}: expected [lon, lat, elevation, distance]")]
    InvalidCoordinate { line: usize, index: usize },
    #[error("unsupported geometry type {0:?}")]
    UnsupportedGeometry(String),
    #[error("unable to detect input format")]
    UnknownFormat,
}

/// Auto-detect the input shape and build a [`ProfileInput`].
///
/// Detection strategy:
/// 1. An object with `"lines"` is a full profile input, read through its
///    serde derive.
/// 2. An object with a `"type"` is GeoJSON.
/// 3. An array of coordinates is a single line.
/// 4. An array of coordinate arrays is a list of lines.
pub fn parse_auto(data: &[u8]) -> Result<ProfileInput, InputError> {
    let value: Value = serde_json::from_slice(data)?;

    let input = match &value {
        Value::Object(obj) if obj.contains_key("lines") => ProfileInput::deserialize(&value)?,
        Value::Object(obj) if obj.contains_key("type") => geojson::parse_geojson(&value)?,
        Value::Array(items) => match items.first() {
            None => ProfileInput::default(),
            Some(first) if is_coordinate_like(first) => {
                ProfileInput::from_lines(vec![parse_line(&value, 0)?])
            }
            Some(Value::Array(_)) => ProfileInput::from_lines(parse_lines(&value)?),
            Some(_) => return Err(InputError::UnknownFormat),
        },
        _ => return Err(InputError::UnknownFormat),
    };

    debug!(
        lines = input.lines.len(),
        samples = input.sample_count(),
        points = input.points.len(),
        "parsed profile input"
    );
    Ok(input)
}

/// An array of lines, each an array of coordinates.
pub(crate) fn parse_lines(value: &Value) -> Result<Vec<Vec<Coordinate>>, InputError> {
    let Some(lines) = value.as_array() else {
        return Err(InputError::UnknownFormat);
    };
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| parse_line(line, i))
        .collect()
}

/// An array of coordinates. `line` only feeds error messages.
pub(crate) fn parse_line(value: &Value, line: usize) -> Result<Vec<Coordinate>, InputError> {
    let Some(coordinates) = value.as_array() else {
        return Err(InputError::UnknownFormat);
    };
    coordinates
        .iter()
        .enumerate()
        .map(|(index, c)| {
            parse_coordinate(c).ok_or(InputError::InvalidCoordinate { line, index })
        })
        .collect()
}

/// `[lon, lat, elevation, distance, ...]`; components past the fourth
/// are ignored.
pub(crate) fn parse_coordinate(value: &Value) -> Option<Coordinate> {
    let components = value.as_array()?;
    if components.len() < 4 {
        return None;
    }
    let mut c = [0.0; 4];
    for (slot, component) in c.iter_mut().zip(components) {
        *slot = component.as_f64()?;
    }
    Some(Coordinate(c))
}

fn is_coordinate_like(value: &Value) -> bool {
    value
        .as_array()
        .and_then(|c| c.first())
        .is_some_and(Value::is_number)
}
