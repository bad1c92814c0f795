use elevation_profile_protocol::Coordinate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::segments::LabeledSegment;

/// Everything the host hands the core; a new value triggers a full rebuild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileInput {
    /// Disjoint lines of `[lon, lat, elevation, distance]` coordinates.
    pub lines: Vec<Vec<Coordinate>>,
    /// Standalone coordinates marked individually; not part of the buffer.
    pub points: Vec<Coordinate>,
    /// Per-line simplification tolerance in meters; `0` disables it.
    /// `null` reads as `0`.
    #[serde(deserialize_with = "null_as_zero")]
    pub tolerance: f64,
    /// Sparse labels styling the elevation line.
    pub line_segments: Option<Vec<LabeledSegment>>,
    /// Sparse labels drawn as bands along the distance axis.
    pub x_axis_segments: Option<Vec<LabeledSegment>>,
}

impl ProfileInput {
    pub fn from_lines(lines: Vec<Vec<Coordinate>>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    pub fn sample_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
