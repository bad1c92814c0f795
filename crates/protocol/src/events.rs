use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::types::{Coordinate, Point};

/// Labels covering the sample under the pointer, one per segment
/// collection. `None` means the sample sits in an unlabeled run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentLabels {
    pub line: Option<SharedStr>,
    pub axis: Option<SharedStr>,
}

/// Events emitted to the host as the pointer moves over the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    /// The pointer resolved to a sample.
    Over {
        /// Input coordinate of the matched sample.
        coordinate: Coordinate,
        /// Screen-space position of the matched sample.
        position: Point,
        /// Present only when the host supplied segment collections.
        #[serde(skip_serializing_if = "Option::is_none")]
        segments: Option<SegmentLabels>,
    },
    /// The pointer left the interactive area.
    Out,
}
