pub mod commands;
pub mod events;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use events::{PointerEvent, SegmentLabels};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use types::{Coordinate, Point, Rect, Viewport};
