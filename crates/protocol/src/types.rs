use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Size of the drawing surface in logical pixels.
///
/// Resize observation belongs to the host; it hands the core a fresh
/// viewport whenever the surface changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One GPS-derived coordinate: `[lon, lat, elevation, distance]`.
///
/// Serialized as a plain 4-element array so host payloads round-trip
/// unchanged through pointer events. Deserialization accepts longer
/// arrays and ignores components past the fourth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct Coordinate(pub [f64; 4]);

impl Coordinate {
    pub fn new(lon: f64, lat: f64, elevation: f64, distance: f64) -> Self {
        Self([lon, lat, elevation, distance])
    }

    pub fn lon(&self) -> f64 {
        self.0[0]
    }

    pub fn lat(&self) -> f64 {
        self.0[1]
    }

    /// Elevation in meters; the plotted `y`.
    pub fn elevation(&self) -> f64 {
        self.0[2]
    }

    /// Cumulative distance along the track in meters; the plotted `x`.
    pub fn distance(&self) -> f64 {
        self.0[3]
    }
}

impl From<[f64; 4]> for Coordinate {
    fn from(values: [f64; 4]) -> Self {
        Self(values)
    }
}

impl TryFrom<Vec<f64>> for Coordinate {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lon, lat, elevation, distance, ..] => {
                Ok(Self::new(*lon, *lat, *elevation, *distance))
            }
            _ => Err(format!(
                "expected [lon, lat, elevation, distance], got {} components",
                values.len()
            )),
        }
    }
}
