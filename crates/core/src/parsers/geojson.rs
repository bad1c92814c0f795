use serde_json::Value;

use super::{InputError, parse_coordinate, parse_line};
use crate::model::ProfileInput;

/// Build an input from a GeoJSON object whose positions carry elevation
/// and distance as third and fourth components.
///
/// `LineString` and `MultiLineString` geometries become lines, in document
/// order; `Point` and `MultiPoint` geometries become standalone points.
/// `Feature`, `FeatureCollection` and `GeometryCollection` are walked
/// recursively.
pub fn parse_geojson(value: &Value) -> Result<ProfileInput, InputError> {
    let mut input = ProfileInput::default();
    collect(value, &mut input)?;
    Ok(input)
}

fn collect(value: &Value, input: &mut ProfileInput) -> Result<(), InputError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(InputError::UnknownFormat)?;
    let coordinates = || value.get("coordinates").ok_or(InputError::UnknownFormat);

    match kind {
        "FeatureCollection" => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .ok_or(InputError::UnknownFormat)?;
            for feature in features {
                collect(feature, input)?;
            }
        }
        "Feature" => match value.get("geometry") {
            Some(Value::Null) | None => {}
            Some(geometry) => collect(geometry, input)?,
        },
        "GeometryCollection" => {
            let geometries = value
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or(InputError::UnknownFormat)?;
            for geometry in geometries {
                collect(geometry, input)?;
            }
        }
        "LineString" => {
            let line = parse_line(coordinates()?, input.lines.len())?;
            input.lines.push(line);
        }
        "MultiLineString" => {
            let lines = coordinates()?.as_array().ok_or(InputError::UnknownFormat)?;
            for line in lines {
                let line = parse_line(line, input.lines.len())?;
                input.lines.push(line);
            }
        }
        "Point" => {
            let point = parse_coordinate(coordinates()?).ok_or(InputError::InvalidCoordinate {
                line: input.lines.len(),
                index: input.points.len(),
            })?;
            input.points.push(point);
        }
        "MultiPoint" => {
            let points = parse_line(coordinates()?, input.lines.len())?;
            input.points.extend(points);
        }
        other => return Err(InputError::UnsupportedGeometry(other.to_string())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_auto;
    use elevation_profile_protocol::Coordinate;

    #[test]
    fn line_string() {
        let json = br#"{
            "type": "LineString",
            "coordinates": [[7.0, 46.0, 500.0, 0.0], [7.1, 46.0, 520.0, 80.0]]
        }"#;
        let input = parse_auto(json).unwrap_or_default();
        assert_eq!(input.lines.len(), 1);
        assert_eq!(input.lines[0][1], Coordinate::new(7.1, 46.0, 520.0, 80.0));
    }

    #[test]
    fn feature_collection_mixes_lines_and_points() {
        let json = br#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {
                    "type": "MultiLineString",
                    "coordinates": [
                        [[7.0, 46.0, 500.0, 0.0], [7.1, 46.0, 520.0, 80.0]],
                        [[7.2, 46.0, 530.0, 200.0]]
                    ]
                }},
                {"type": "Feature", "properties": {"name": "hut"}, "geometry": {
                    "type": "Point", "coordinates": [7.1, 46.0, 520.0, 80.0]
                }},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]
        }"#;
        let input = parse_auto(json).unwrap_or_default();
        assert_eq!(input.lines.len(), 2);
        assert_eq!(input.sample_count(), 3);
        assert_eq!(input.points, vec![Coordinate::new(7.1, 46.0, 520.0, 80.0)]);
    }

    #[test]
    fn two_dimensional_positions_are_rejected() {
        let json = br#"{"type": "LineString", "coordinates": [[7.0, 46.0]]}"#;
        assert!(matches!(
            parse_auto(json),
            Err(InputError::InvalidCoordinate { line: 0, index: 0 })
        ));
    }

    #[test]
    fn polygons_are_unsupported() {
        let json = br#"{"type": "Polygon", "coordinates": []}"#;
        assert!(matches!(
            parse_auto(json),
            Err(InputError::UnsupportedGeometry(kind)) if kind == "Polygon"
        ));
    }
}
