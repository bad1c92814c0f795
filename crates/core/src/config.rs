use serde::{Deserialize, Serialize};

/// Space between the viewport edge and the plot area, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 20.0,
            left: 40.0,
        }
    }
}

/// Target spacing between ticks in logical pixels; the tick count per axis
/// is the plot extent divided by this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickSize {
    pub x: f64,
    pub y: f64,
}

impl Default for TickSize {
    fn default() -> Self {
        Self { x: 100.0, y: 40.0 }
    }
}

/// Presentation settings for the chart view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub margin: Margin,
    pub tick_size: TickSize,
    /// Use the dark palette when serializing to SVG.
    pub dark: bool,
}

impl ChartConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}
