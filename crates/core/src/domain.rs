use serde::{Deserialize, Serialize};

use crate::model::{Sample, SampleBuffer};

/// Closed `[min, max]` range of one plotted dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn include(self, value: f64) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    /// Range a renderer falls back to when a dimension has no data.
    pub fn default_range() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Extents of distance (`x`) and elevation (`y`) over real samples.
///
/// Either side is `None` when the buffer holds no real sample; renderers
/// degrade to [`Extent::default_range`] instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Domains {
    pub x: Option<Extent>,
    pub y: Option<Extent>,
}

impl Domains {
    pub fn compute(buffer: &SampleBuffer) -> Self {
        let mut x: Option<Extent> = None;
        let mut y: Option<Extent> = None;
        for sample in buffer.samples() {
            if let Sample::Point { x: sx, y: sy, .. } = *sample {
                if sx.is_finite() {
                    x = Some(x.map_or(Extent::new(sx, sx), |e| e.include(sx)));
                }
                if sy.is_finite() {
                    y = Some(y.map_or(Extent::new(sy, sy), |e| e.include(sy)));
                }
            }
        }
        Self { x, y }
    }

    pub fn x_or_default(&self) -> Extent {
        self.x.unwrap_or_else(Extent::default_range)
    }

    pub fn y_or_default(&self) -> Extent {
        self.y.unwrap_or_else(Extent::default_range)
    }
}
