//! View transforms: snapshot + layout in, `Vec<RenderCommand>` out.

pub mod axis;
pub mod profile;

use elevation_profile_protocol::{Point, RenderCommand, SharedStr};

use crate::chart::ChartLayout;
use crate::model::ProfileSnapshot;

/// Render the whole chart: grid and axes, the profile itself, and the
/// pointer overlay when `pointer` is set.
pub fn render_profile(
    snapshot: &ProfileSnapshot,
    layout: &ChartLayout,
    pointer: Option<Point>,
) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(snapshot.buffer().len() / 8 + 64);

    commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from("elevation-profile"),
        label: None,
    });
    commands.extend(axis::render_grid(layout));
    commands.extend(profile::render_area(snapshot, layout));
    commands.extend(profile::render_line(snapshot, layout));
    commands.extend(axis::render_axes(layout));
    commands.extend(profile::render_axis_segments(snapshot, layout));
    commands.extend(profile::render_points(snapshot, layout));
    if let Some(pointer) = pointer {
        commands.extend(profile::render_pointer(snapshot, layout, pointer));
    }
    commands.push(RenderCommand::EndGroup);

    commands
}
