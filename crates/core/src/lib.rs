//! Core of the elevation profile: turns host input into an immutable
//! snapshot, answers pointer queries against it and renders it into
//! protocol commands.

pub mod chart;
pub mod config;
pub mod correlate;
pub mod domain;
pub mod model;
pub mod parsers;
pub mod scale;
pub mod segments;
pub mod simplify;
pub mod svg;
pub mod views;

use thiserror::Error;

pub use chart::{ChartLayout, ProfileChart};
pub use config::ChartConfig;
pub use model::{ProfileInput, ProfileSnapshot, update};
pub use parsers::{InputError, parse_auto};
pub use segments::{LabeledSegment, SegmentError, SegmentPartition};

/// Any failure between raw host bytes and a rendered chart.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("input: {0}")]
    Input(#[from] InputError),
    #[error("segments: {0}")]
    Segments(#[from] SegmentError),
}

/// Parse `data` and build the snapshot in one step.
pub fn load(data: &[u8]) -> Result<ProfileSnapshot, ProfileError> {
    let input = parse_auto(data)?;
    Ok(update(&input)?)
}
