use elevation_profile_protocol::{Point, RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::chart::ChartLayout;

const TICK_LENGTH: f64 = 6.0;
const FONT_SIZE: f64 = 10.0;
const X_LABEL_OFFSET: f64 = 15.0;
const Y_LABEL_OFFSET: f64 = 8.0;

/// Grid lines behind the profile, one per tick on each axis.
pub fn render_grid(layout: &ChartLayout) -> Vec<RenderCommand> {
    let plot = layout.plot;
    let mut commands = Vec::with_capacity(layout.x_ticks + layout.y_ticks + 2);

    for value in layout.y.ticks(layout.y_ticks) {
        let y = layout.y.apply(value);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(plot.x, y),
            to: Point::new(plot.x + plot.w, y),
            color: ThemeToken::GridLine,
            width: 0.5,
        });
    }
    for value in layout.x.ticks(layout.x_ticks) {
        let x = layout.x.apply(value);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, plot.y),
            to: Point::new(x, plot.y + plot.h),
            color: ThemeToken::GridLine,
            width: 0.5,
        });
    }

    commands
}

/// Distance axis along the bottom and elevation axis on the left, with
/// tick marks and labels.
pub fn render_axes(layout: &ChartLayout) -> Vec<RenderCommand> {
    let plot = layout.plot;
    let baseline = layout.baseline();
    let mut commands = Vec::with_capacity(4 * (layout.x_ticks + layout.y_ticks) + 2);

    commands.push(RenderCommand::DrawLine {
        from: Point::new(plot.x, baseline),
        to: Point::new(plot.x + plot.w, baseline),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });
    for value in layout.x.ticks(layout.x_ticks) {
        let x = layout.x.apply(value);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, baseline),
            to: Point::new(x, baseline + TICK_LENGTH),
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, baseline + X_LABEL_OFFSET),
            text: SharedStr::from(format_distance(value).as_str()),
            color: ThemeToken::AxisText,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    commands.push(RenderCommand::DrawLine {
        from: Point::new(plot.x, plot.y),
        to: Point::new(plot.x, baseline),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });
    for value in layout.y.ticks(layout.y_ticks) {
        let y = layout.y.apply(value);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(plot.x - TICK_LENGTH, y),
            to: Point::new(plot.x, y),
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(plot.x - Y_LABEL_OFFSET, y + 3.0),
            text: SharedStr::from(format_distance(value).as_str()),
            color: ThemeToken::AxisText,
            font_size: FONT_SIZE,
            align: TextAlign::Right,
        });
    }

    commands
}

/// Format a length in meters: plain meters below 1000, kilometers from
/// there on. Negative values always stay in meters.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", trim_number(meters))
    } else {
        format!("{} km", trim_number(meters / 1000.0))
    }
}

/// At most two decimals, without trailing zeros.
fn trim_number(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
