pub mod input;
pub mod sample;
pub mod snapshot;

pub use input::ProfileInput;
pub use sample::{GapSet, Sample, SampleBuffer};
pub use snapshot::{ProfileSnapshot, update};
