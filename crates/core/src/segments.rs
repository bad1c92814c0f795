//! Segment annotation: turns a sparse list of caller-labeled index ranges
//! into a complete, gap-respecting partition of the sample buffer.
//!
//! Every range uses an inclusive `end`, in normalization, lookup and
//! rendering alike.

use elevation_profile_protocol::SharedStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::model::GapSet;

/// A `[start, end, label]` range over buffer indices, `end` inclusive.
///
/// Serialized as a JSON triple so host payloads like
/// `[[1, 3, "steep"]]` deserialize directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSegment", into = "RawSegment")]
pub struct LabeledSegment {
    pub start: usize,
    pub end: usize,
    pub value: Option<SharedStr>,
}

type RawSegment = (usize, usize, Option<SharedStr>);

impl From<RawSegment> for LabeledSegment {
    fn from((start, end, value): RawSegment) -> Self {
        Self { start, end, value }
    }
}

impl From<LabeledSegment> for RawSegment {
    fn from(segment: LabeledSegment) -> Self {
        (segment.start, segment.end, segment.value)
    }
}

impl LabeledSegment {
    pub fn new(start: usize, end: usize, value: Option<SharedStr>) -> Self {
        Self { start, end, value }
    }

    pub fn labeled(start: usize, end: usize, label: &str) -> Self {
        Self::new(start, end, Some(SharedStr::from(label)))
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentError {
    #[error("index {index} is not covered by the segment partition")]
    Uncovered { index: usize },
    #[error("segment {start}..={end} touches the gap at index {gap}")]
    TouchesGap { start: usize, end: usize, gap: usize },
    #[error("segment {start}..={end} overlaps or precedes the previous segment")]
    OutOfOrder { start: usize, end: usize },
    #[error("segment {start}..={end} exceeds buffer length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// Sorted, disjoint, gap-free runs covering every non-gap buffer index
/// exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPartition(Vec<LabeledSegment>);

impl SegmentPartition {
    /// Normalize `raw` against a buffer of `len` samples with `gaps`.
    ///
    /// Single pass over the raw list with a cursor:
    /// - unlabeled stretches between raw ranges become `None` runs, trimmed
    ///   past leading/trailing gaps and split at interior gaps;
    /// - a raw range with an endpoint on a gap loses its label; its indices
    ///   fall into the next `None` fill;
    /// - a raw range crossing a gap is truncated before that gap, and the
    ///   remainder falls into the next `None` fill;
    /// - ranges that are inverted, start past the buffer, or overlap an
    ///   earlier range are skipped. `end` is clamped to the buffer.
    pub fn normalize(raw: &[LabeledSegment], len: usize, gaps: &GapSet) -> Self {
        let mut out = Vec::with_capacity(raw.len() * 2 + gaps.len() + 1);
        let mut cursor = 0;

        for segment in raw {
            if segment.start > segment.end || segment.start >= len || segment.start < cursor {
                debug!(
                    start = segment.start,
                    end = segment.end,
                    cursor,
                    len,
                    "skipping malformed segment"
                );
                continue;
            }
            let end = segment.end.min(len - 1);
            if gaps.contains(segment.start) || gaps.contains(end) {
                debug!(
                    start = segment.start,
                    end, "dropping label with an endpoint on a gap"
                );
                continue;
            }

            push_runs(&mut out, cursor, segment.start, gaps);

            let labeled_end = gaps.first_in(segment.start, end).map_or(end, |gap| gap - 1);
            out.push(LabeledSegment::new(
                segment.start,
                labeled_end,
                segment.value.clone(),
            ));
            cursor = labeled_end + 1;
        }

        push_runs(&mut out, cursor, len, gaps);
        Self(out)
    }

    pub fn segments(&self) -> &[LabeledSegment] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledSegment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label of the run containing `index`.
    ///
    /// Every non-gap index is covered by construction, so an `Err` here is
    /// a defect in the partition rather than a lookup miss.
    pub fn label_at(&self, index: usize) -> Result<Option<&SharedStr>, SegmentError> {
        let pos = self.0.partition_point(|s| s.start <= index);
        match pos.checked_sub(1).and_then(|i| self.0.get(i)) {
            Some(segment) if segment.contains(index) => Ok(segment.value.as_ref()),
            _ => {
                error!(index, runs = self.0.len(), "segment partition does not cover index");
                Err(SegmentError::Uncovered { index })
            }
        }
    }

    /// Verify the partition invariants against the buffer it was built for.
    pub fn check(&self, len: usize, gaps: &GapSet) -> Result<(), SegmentError> {
        let mut next = 0;
        for segment in &self.0 {
            let (start, end) = (segment.start, segment.end);
            if start > end || start < next {
                return Err(SegmentError::OutOfOrder { start, end });
            }
            if end >= len {
                return Err(SegmentError::OutOfBounds { start, end, len });
            }
            if let Some(gap) = gaps.first_in(start, end) {
                return Err(SegmentError::TouchesGap { start, end, gap });
            }
            if let Some(index) = (next..start).find(|&i| !gaps.contains(i)) {
                return Err(SegmentError::Uncovered { index });
            }
            next = end + 1;
        }
        match (next..len).find(|&i| !gaps.contains(i)) {
            Some(index) => Err(SegmentError::Uncovered { index }),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a SegmentPartition {
    type Item = &'a LabeledSegment;
    type IntoIter = std::slice::Iter<'a, LabeledSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Append unlabeled runs covering the non-gap indices of `from..to`.
fn push_runs(out: &mut Vec<LabeledSegment>, from: usize, to: usize, gaps: &GapSet) {
    let mut start = from;
    while start < to {
        match gaps.first_in(start, to - 1) {
            Some(gap) => {
                if gap > start {
                    out.push(LabeledSegment::new(start, gap - 1, None));
                }
                start = gap + 1;
            }
            None => {
                out.push(LabeledSegment::new(start, to - 1, None));
                break;
            }
        }
    }
}
