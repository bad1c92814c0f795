use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for a chart. Renderers consume
/// this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a text label.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<SharedStr>,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Stroke an open polyline through `points`, in order. Curve
    /// interpolation between points is up to the renderer.
    DrawPolyline {
        points: Vec<Point>,
        color: ThemeToken,
        width: f64,
        label: Option<SharedStr>,
    },

    /// Fill the closed polygon described by `points`.
    FillPolygon { points: Vec<Point>, color: ThemeToken },

    /// Draw a circle, filled with `color` and optionally outlined.
    DrawCircle {
        center: Point,
        radius: f64,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Begin a logical group (e.g. the axes or the pointer overlay).
    /// Renderers may use this for batching or layer separation.
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
