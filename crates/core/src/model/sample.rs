use elevation_profile_protocol::Coordinate;
use serde::{Deserialize, Serialize};

/// One entry of the plotted series.
///
/// Line breaks are an explicit variant rather than a NaN elevation, so every
/// consumer has to decide what a gap means for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Sample {
    Point {
        /// Distance along the track (independent axis).
        x: f64,
        /// Elevation (dependent axis).
        y: f64,
        coordinate: Coordinate,
    },
    /// Break between two input lines. `x` repeats the last real sample's
    /// distance so the break sorts at the right horizontal position.
    Gap { x: f64 },
}

impl Sample {
    pub fn from_coordinate(coordinate: Coordinate) -> Self {
        Sample::Point {
            x: coordinate.distance(),
            y: coordinate.elevation(),
            coordinate,
        }
    }

    pub fn x(&self) -> f64 {
        match *self {
            Sample::Point { x, .. } | Sample::Gap { x } => x,
        }
    }

    pub fn y(&self) -> Option<f64> {
        match *self {
            Sample::Point { y, .. } => Some(y),
            Sample::Gap { .. } => None,
        }
    }

    pub fn coordinate(&self) -> Option<&Coordinate> {
        match self {
            Sample::Point { coordinate, .. } => Some(coordinate),
            Sample::Gap { .. } => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Sample::Gap { .. })
    }
}

/// Sorted buffer indices occupied by gap markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapSet(Vec<usize>);

impl GapSet {
    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    /// First gap index in `start..=end`, if any.
    pub fn first_in(&self, start: usize, end: usize) -> Option<usize> {
        let pos = self.0.partition_point(|&g| g < start);
        self.0.get(pos).copied().filter(|&g| g <= end)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for GapSet {
    fn from(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }
}

/// Flat, gap-aware sample series built from one or more input lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
    gaps: GapSet,
}

impl SampleBuffer {
    /// Flatten `lines` into one buffer, inserting exactly one gap marker
    /// between consecutive lines.
    ///
    /// Empty lines still contribute their gap marker, so two adjacent gaps
    /// are possible. A gap repeats the distance of the last real sample
    /// appended before it, or `0.0` when there is none yet.
    pub fn build<L>(lines: &[L]) -> Self
    where
        L: AsRef<[Coordinate]>,
    {
        let total: usize = lines.iter().map(|l| l.as_ref().len()).sum();
        let mut samples = Vec::with_capacity(total + lines.len().saturating_sub(1));
        let mut gaps = Vec::with_capacity(lines.len().saturating_sub(1));
        let mut last_x = 0.0;

        for (i, line) in lines.iter().enumerate() {
            for coordinate in line.as_ref() {
                let sample = Sample::from_coordinate(*coordinate);
                last_x = sample.x();
                samples.push(sample);
            }
            if i + 1 < lines.len() {
                gaps.push(samples.len());
                samples.push(Sample::Gap { x: last_x });
            }
        }

        Self {
            samples,
            gaps: GapSet(gaps),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn gaps(&self) -> &GapSet {
        &self.gaps
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximal gap-free index runs `(start, end)` with inclusive `end`.
    pub fn runs(&self) -> Vec<(usize, usize)> {
        let mut runs = Vec::with_capacity(self.gaps.len() + 1);
        let mut start = 0;
        for &gap in self.gaps.as_slice() {
            if gap > start {
                runs.push((start, gap - 1));
            }
            start = gap + 1;
        }
        if start < self.samples.len() {
            runs.push((start, self.samples.len() - 1));
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(elevation: f64, distance: f64) -> Coordinate {
        Coordinate::new(0.0, 0.0, elevation, distance)
    }

    #[test]
    fn single_line_has_no_gaps() {
        let lines = vec![vec![coord(10.0, 0.0), coord(20.0, 5.0), coord(15.0, 10.0)]];
        let buffer = SampleBuffer::build(&lines);
        assert_eq!(buffer.len(), 3);
        assert!(buffer.gaps().is_empty());
        assert_eq!(buffer.get(1).and_then(Sample::y), Some(20.0));
    }

    #[test]
    fn gap_between_two_lines() {
        let lines = vec![
            vec![coord(1.0, 0.0), coord(2.0, 1.0)],
            vec![coord(3.0, 2.0), coord(4.0, 3.0), coord(5.0, 4.0)],
        ];
        let buffer = SampleBuffer::build(&lines);
        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.gaps().as_slice(), &[2]);
        let gap = buffer.get(2).copied();
        assert_eq!(gap, Some(Sample::Gap { x: 1.0 }));
    }

    #[test]
    fn length_is_samples_plus_separators() {
        for n_lines in 0..6usize {
            let lines: Vec<Vec<Coordinate>> = (0..n_lines)
                .map(|i| (0..i + 1).map(|j| coord(0.0, j as f64)).collect())
                .collect();
            let expected: usize =
                lines.iter().map(Vec::len).sum::<usize>() + n_lines.saturating_sub(1);
            let buffer = SampleBuffer::build(&lines);
            assert_eq!(buffer.len(), expected);
            assert_eq!(buffer.gaps().len(), n_lines.saturating_sub(1));
            for (i, sample) in buffer.samples().iter().enumerate() {
                assert_eq!(sample.is_gap(), buffer.gaps().contains(i));
            }
        }
    }

    #[test]
    fn empty_input_yields_empty_buffer() {
        let lines: Vec<Vec<Coordinate>> = Vec::new();
        let buffer = SampleBuffer::build(&lines);
        assert!(buffer.is_empty());
        assert!(buffer.runs().is_empty());
    }

    #[test]
    fn empty_line_still_contributes_gap() {
        let lines = vec![vec![coord(1.0, 0.0)], vec![], vec![coord(2.0, 5.0)]];
        let buffer = SampleBuffer::build(&lines);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.gaps().as_slice(), &[1, 2]);
        assert_eq!(buffer.get(2).map(Sample::x), Some(0.0));
        assert_eq!(buffer.runs(), vec![(0, 0), (3, 3)]);
    }

    #[test]
    fn gap_set_first_in_range() {
        let gaps = GapSet::from(vec![7, 2]);
        assert_eq!(gaps.first_in(0, 10), Some(2));
        assert_eq!(gaps.first_in(3, 6), None);
        assert_eq!(gaps.first_in(3, 7), Some(7));
    }
}
