use elevation_profile_protocol::{Coordinate, SharedStr};
use serde::{Deserialize, Serialize};

use crate::model::{Sample, SampleBuffer};
use crate::segments::{SegmentError, SegmentPartition};

/// Sample resolved from a pointer position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub coordinate: Coordinate,
    /// One entry per partition passed to [`correlate`], in the same order.
    pub labels: Vec<Option<SharedStr>>,
}

/// Leftmost insertion point for `x` in the buffer, clamped to the last
/// index. `None` only for an empty buffer.
pub fn lower_bound(buffer: &SampleBuffer, x: f64) -> Option<usize> {
    let last = buffer.len().checked_sub(1)?;
    Some(buffer.samples().partition_point(|s| s.x() < x).min(last))
}

/// Resolve a distance to a sample and the labels covering it.
///
/// Always takes the lower-bound candidate; the two samples straddling `x`
/// are not compared by distance. If that candidate is a gap the result is
/// `Ok(None)`, with no search across the gap for a real neighbour, so hosts
/// see the occasional miss at line boundaries. The same holds at the ends
/// of the buffer: a leading empty line misses every query at or below the
/// first distance, and a trailing empty line misses every query past the
/// last one, since the clamp lands on its gap.
///
/// An `Err` means a partition failed to cover a real sample, which is a
/// defect in the partition, not a miss.
pub fn correlate(
    x: f64,
    buffer: &SampleBuffer,
    partitions: &[&SegmentPartition],
) -> Result<Option<Hit>, SegmentError> {
    let Some(index) = lower_bound(buffer, x) else {
        return Ok(None);
    };
    let Some(&Sample::Point {
        x: sx,
        y,
        coordinate,
    }) = buffer.get(index)
    else {
        return Ok(None);
    };

    let labels = partitions
        .iter()
        .map(|p| p.label_at(index).map(Option::<&SharedStr>::cloned))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Hit {
        index,
        x: sx,
        y,
        coordinate,
        labels,
    }))
}
