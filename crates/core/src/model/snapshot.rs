use elevation_profile_protocol::{Coordinate, SegmentLabels};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::correlate::{Hit, correlate};
use crate::domain::Domains;
use crate::model::{ProfileInput, SampleBuffer};
use crate::segments::{LabeledSegment, SegmentError, SegmentPartition};
use crate::simplify::simplify_line;

/// Immutable result of one rebuild.
///
/// Readers only ever see a complete snapshot; an input change produces a
/// new one instead of patching this in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    buffer: SampleBuffer,
    domains: Domains,
    points: Vec<Coordinate>,
    line_segments: Option<SegmentPartition>,
    x_axis_segments: Option<SegmentPartition>,
}

/// Rebuild everything derived from `input`. See [`ProfileSnapshot::update`].
pub fn update(input: &ProfileInput) -> Result<ProfileSnapshot, SegmentError> {
    ProfileSnapshot::update(input)
}

impl ProfileSnapshot {
    /// Simplify each line, flatten into a gap-aware buffer, compute domains
    /// and normalize both segment collections against that buffer.
    ///
    /// Segment indices address the final, simplified buffer. A partition
    /// that fails its own invariants aborts this rebuild only.
    pub fn update(input: &ProfileInput) -> Result<Self, SegmentError> {
        let tolerance = if input.tolerance.is_finite() {
            input.tolerance.max(0.0)
        } else {
            0.0
        };

        let buffer = if tolerance > 0.0 {
            let lines: Vec<Vec<Coordinate>> = input
                .lines
                .iter()
                .map(|line| simplify_line(line, tolerance))
                .collect();
            SampleBuffer::build(&lines)
        } else {
            SampleBuffer::build(&input.lines)
        };

        let domains = Domains::compute(&buffer);
        let line_segments = normalize_checked(input.line_segments.as_deref(), &buffer, "line")?;
        let x_axis_segments =
            normalize_checked(input.x_axis_segments.as_deref(), &buffer, "x-axis")?;

        debug!(
            lines = input.lines.len(),
            input_samples = input.sample_count(),
            samples = buffer.len(),
            gaps = buffer.gaps().len(),
            tolerance,
            "rebuilt profile snapshot"
        );

        Ok(Self {
            buffer,
            domains,
            points: input.points.clone(),
            line_segments,
            x_axis_segments,
        })
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn line_segments(&self) -> Option<&SegmentPartition> {
        self.line_segments.as_ref()
    }

    pub fn x_axis_segments(&self) -> Option<&SegmentPartition> {
        self.x_axis_segments.as_ref()
    }

    /// Correlate a distance against the buffer and both partitions.
    ///
    /// The labels are `None` when the host supplied no segment collection
    /// at all.
    pub fn correlate(
        &self,
        x: f64,
    ) -> Result<Option<(Hit, Option<SegmentLabels>)>, SegmentError> {
        let partitions: Vec<&SegmentPartition> = [self.line_segments(), self.x_axis_segments()]
            .into_iter()
            .flatten()
            .collect();

        let Some(hit) = correlate(x, &self.buffer, &partitions)? else {
            return Ok(None);
        };

        let segments = (!partitions.is_empty()).then(|| {
            let mut labels = hit.labels.iter().cloned();
            let line = self.line_segments.as_ref().and_then(|_| labels.next()).flatten();
            let axis = self.x_axis_segments.as_ref().and_then(|_| labels.next()).flatten();
            SegmentLabels { line, axis }
        });
        Ok(Some((hit, segments)))
    }
}

fn normalize_checked(
    raw: Option<&[LabeledSegment]>,
    buffer: &SampleBuffer,
    which: &str,
) -> Result<Option<SegmentPartition>, SegmentError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let partition = SegmentPartition::normalize(raw, buffer.len(), buffer.gaps());
    if let Err(err) = partition.check(buffer.len(), buffer.gaps()) {
        error!(which, %err, "normalized segment partition is inconsistent");
        return Err(err);
    }
    debug!(which, raw = raw.len(), runs = partition.len(), "normalized segments");
    Ok(Some(partition))
}
