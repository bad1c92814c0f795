use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    // Axes and grid
    AxisLine,
    AxisText,
    GridLine,

    // Profile
    ProfileArea,
    ProfileLine,
    SegmentLine,
    SegmentBand,
    SegmentText,
    PointMarker,

    // Pointer overlay
    PointerHighlight,
    PointerLine,
    PointerCircle,
}
