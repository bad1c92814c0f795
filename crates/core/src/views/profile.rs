use elevation_profile_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::chart::ChartLayout;
use crate::model::{ProfileSnapshot, Sample, SampleBuffer};

const LINE_WIDTH: f64 = 1.5;
const SEGMENT_LINE_WIDTH: f64 = 2.5;
const HIGHLIGHT_WIDTH: f64 = 2.0;
const BAND_HEIGHT: f64 = 6.0;
const BAND_MIN_WIDTH: f64 = 1.0;
const BAND_LABEL_MIN_WIDTH: f64 = 30.0;
const FONT_SIZE: f64 = 10.0;
const POINT_RADIUS: f64 = 4.0;
const POINTER_RADIUS: f64 = 5.0;

/// Pixel positions of the real samples in `start..=end`. Gaps and
/// non-finite values are skipped.
fn project_range(
    buffer: &SampleBuffer,
    layout: &ChartLayout,
    start: usize,
    end: usize,
) -> Vec<Point> {
    buffer
        .samples()
        .get(start..=end)
        .unwrap_or_default()
        .iter()
        .filter_map(|sample| match *sample {
            Sample::Point { x, y, .. } if x.is_finite() && y.is_finite() => {
                Some(layout.project(x, y))
            }
            _ => None,
        })
        .collect()
}

/// One filled polygon per gap-free run, closed along the baseline.
pub fn render_area(snapshot: &ProfileSnapshot, layout: &ChartLayout) -> Vec<RenderCommand> {
    let baseline = layout.baseline();
    snapshot
        .buffer()
        .runs()
        .into_iter()
        .filter_map(|(start, end)| {
            let mut points = project_range(snapshot.buffer(), layout, start, end);
            let (first, last) = (points.first()?.x, points.last()?.x);
            if points.len() < 2 {
                return None;
            }
            points.push(Point::new(last, baseline));
            points.push(Point::new(first, baseline));
            Some(RenderCommand::FillPolygon {
                points,
                color: ThemeToken::ProfileArea,
            })
        })
        .collect()
}

/// The elevation line, split at gaps.
///
/// With line segments, each partition run becomes its own polyline,
/// extended to the next sample so adjacent runs join up. Labeled runs are
/// styled as segments and carry their label.
pub fn render_line(snapshot: &ProfileSnapshot, layout: &ChartLayout) -> Vec<RenderCommand> {
    let buffer = snapshot.buffer();
    let Some(partition) = snapshot.line_segments() else {
        return plain_runs(buffer, layout, ThemeToken::ProfileLine, LINE_WIDTH);
    };

    partition
        .iter()
        .filter_map(|segment| {
            let joins_next = buffer
                .get(segment.end + 1)
                .is_some_and(|sample| !sample.is_gap());
            let end = if joins_next { segment.end + 1 } else { segment.end };
            let points = project_range(buffer, layout, segment.start, end);
            if points.is_empty() {
                return None;
            }
            let (color, width) = match segment.value {
                Some(_) => (ThemeToken::SegmentLine, SEGMENT_LINE_WIDTH),
                None => (ThemeToken::ProfileLine, LINE_WIDTH),
            };
            Some(RenderCommand::DrawPolyline {
                points,
                color,
                width,
                label: segment.value.clone(),
            })
        })
        .collect()
}

fn plain_runs(
    buffer: &SampleBuffer,
    layout: &ChartLayout,
    color: ThemeToken,
    width: f64,
) -> Vec<RenderCommand> {
    buffer
        .runs()
        .into_iter()
        .map(|(start, end)| project_range(buffer, layout, start, end))
        .filter(|points| !points.is_empty())
        .map(|points| RenderCommand::DrawPolyline {
            points,
            color,
            width,
            label: None,
        })
        .collect()
}

/// Bands just above the distance axis for labeled x-axis segments.
pub fn render_axis_segments(
    snapshot: &ProfileSnapshot,
    layout: &ChartLayout,
) -> Vec<RenderCommand> {
    let Some(partition) = snapshot.x_axis_segments() else {
        return Vec::new();
    };
    let buffer = snapshot.buffer();
    let baseline = layout.baseline();
    let mut commands = Vec::new();

    for segment in partition {
        let Some(label) = &segment.value else {
            continue;
        };
        let (Some(from), Some(to)) = (buffer.get(segment.start), buffer.get(segment.end)) else {
            continue;
        };
        let x0 = layout.x.apply(from.x());
        let x1 = layout.x.apply(to.x());
        let width = (x1 - x0).max(BAND_MIN_WIDTH);
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x0, baseline - BAND_HEIGHT, width, BAND_HEIGHT),
            color: ThemeToken::SegmentBand,
            border_color: None,
            label: Some(label.clone()),
        });
        if width >= BAND_LABEL_MIN_WIDTH {
            commands.push(RenderCommand::DrawText {
                position: Point::new(x0 + width / 2.0, baseline - BAND_HEIGHT - 3.0),
                text: label.clone(),
                color: ThemeToken::SegmentText,
                font_size: FONT_SIZE,
                align: TextAlign::Center,
            });
        }
    }

    commands
}

/// Markers for standalone points.
pub fn render_points(snapshot: &ProfileSnapshot, layout: &ChartLayout) -> Vec<RenderCommand> {
    snapshot
        .points()
        .iter()
        .filter(|c| c.distance().is_finite() && c.elevation().is_finite())
        .map(|c| RenderCommand::DrawCircle {
            center: layout.project(c.distance(), c.elevation()),
            radius: POINT_RADIUS,
            color: ThemeToken::PointMarker,
            border_color: Some(ThemeToken::Background),
        })
        .collect()
}

/// Highlight of the line up to the pointer, the vertical pointer line and
/// the pointer circle. Nothing is drawn while `pointer.x <= 0`.
pub fn render_pointer(
    snapshot: &ProfileSnapshot,
    layout: &ChartLayout,
    pointer: Point,
) -> Vec<RenderCommand> {
    if pointer.x.is_nan() || pointer.x <= 0.0 {
        return Vec::new();
    }
    let plot = layout.plot;
    let mut commands = vec![
        RenderCommand::BeginGroup {
            id: SharedStr::from("pointer"),
            label: None,
        },
        RenderCommand::SetClip {
            rect: Rect::new(plot.x, plot.y, (pointer.x - plot.x).max(0.0), plot.h),
        },
    ];
    commands.extend(plain_runs(
        snapshot.buffer(),
        layout,
        ThemeToken::PointerHighlight,
        HIGHLIGHT_WIDTH,
    ));
    commands.push(RenderCommand::ClearClip);
    commands.push(RenderCommand::DrawLine {
        from: Point::new(pointer.x, plot.y),
        to: Point::new(pointer.x, layout.baseline()),
        color: ThemeToken::PointerLine,
        width: 1.0,
    });
    commands.push(RenderCommand::DrawCircle {
        center: pointer,
        radius: POINTER_RADIUS,
        color: ThemeToken::PointerCircle,
        border_color: Some(ThemeToken::Background),
    });
    commands.push(RenderCommand::EndGroup);

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::model::{ProfileInput, update};
    use crate::segments::LabeledSegment;
    use elevation_profile_protocol::{Coordinate, Viewport};

    fn two_lines() -> ProfileInput {
        let c = |e: f64, d: f64| Coordinate::new(7.0, 46.0, e, d);
        ProfileInput::from_lines(vec![
            vec![c(500.0, 0.0), c(510.0, 100.0)],
            vec![c(600.0, 250.0), c(620.0, 300.0), c(610.0, 400.0)],
        ])
    }

    fn render(input: ProfileInput) -> (ProfileSnapshot, ChartLayout) {
        let snapshot = update(&input).unwrap_or_default();
        let layout = ChartLayout::new(
            snapshot.domains(),
            &ChartConfig::default(),
            Viewport::new(440.0, 240.0),
        )
        .unwrap_or_else(|| unreachable!("viewport leaves room to plot"));
        (snapshot, layout)
    }

    fn polylines(cmds: &[RenderCommand]) -> Vec<(usize, ThemeToken, Option<&str>)> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::DrawPolyline {
                    points,
                    color,
                    label,
                    ..
                } => Some((points.len(), *color, label.as_deref())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn area_and_line_split_at_gaps() {
        let (snapshot, layout) = render(two_lines());
        let area = render_area(&snapshot, &layout);
        assert_eq!(area.len(), 2);
        let RenderCommand::FillPolygon { points, .. } = &area[1] else {
            unreachable!("area is made of polygons");
        };
        // Three samples plus two baseline corners.
        assert_eq!(points.len(), 5);
        assert!(points[3..].iter().all(|p| (p.y - layout.baseline()).abs() < 1e-9));

        let line = render_line(&snapshot, &layout);
        assert_eq!(
            polylines(&line),
            vec![
                (2, ThemeToken::ProfileLine, None),
                (3, ThemeToken::ProfileLine, None)
            ]
        );
    }

    #[test]
    fn labeled_runs_are_styled_and_joined() {
        let input = ProfileInput {
            line_segments: Some(vec![LabeledSegment::labeled(3, 3, "steep")]),
            ..two_lines()
        };
        let (snapshot, layout) = render(input);
        let line = render_line(&snapshot, &layout);
        // [0,1] null, [3,3] steep joined to 4, [4,5] null.
        assert_eq!(
            polylines(&line),
            vec![
                (2, ThemeToken::ProfileLine, None),
                (2, ThemeToken::SegmentLine, Some("steep")),
                (2, ThemeToken::ProfileLine, None),
            ]
        );
    }

    #[test]
    fn axis_bands_only_for_labeled_segments() {
        let input = ProfileInput {
            x_axis_segments: Some(vec![LabeledSegment::labeled(3, 5, "bridge")]),
            ..two_lines()
        };
        let (snapshot, layout) = render(input);
        let cmds = render_axis_segments(&snapshot, &layout);
        let bands: Vec<&Rect> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect { rect, .. } => Some(rect),
                _ => None,
            })
            .collect();
        assert_eq!(bands.len(), 1);
        assert!((bands[0].x - layout.x.apply(250.0)).abs() < 1e-9);
        assert!((bands[0].w - (layout.x.apply(400.0) - layout.x.apply(250.0))).abs() < 1e-9);
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawText {
                color: ThemeToken::SegmentText,
                ..
            }
        )));
    }

    #[test]
    fn standalone_points_become_circles() {
        let input = ProfileInput {
            points: vec![Coordinate::new(7.0, 46.0, 560.0, 200.0)],
            ..two_lines()
        };
        let (snapshot, layout) = render(input);
        let cmds = render_points(&snapshot, &layout);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(
            cmds[0],
            RenderCommand::DrawCircle {
                color: ThemeToken::PointMarker,
                ..
            }
        ));
    }

    #[test]
    fn pointer_overlay_clips_highlight() {
        let (snapshot, layout) = render(two_lines());
        let pointer = layout.project(250.0, 600.0);
        let cmds = render_pointer(&snapshot, &layout, pointer);
        let clip = cmds.iter().find_map(|c| match c {
            RenderCommand::SetClip { rect } => Some(*rect),
            _ => None,
        });
        assert_eq!(
            clip,
            Some(Rect::new(
                layout.plot.x,
                layout.plot.y,
                pointer.x - layout.plot.x,
                layout.plot.h
            ))
        );
        let highlights = polylines(&cmds)
            .into_iter()
            .filter(|(_, color, _)| *color == ThemeToken::PointerHighlight)
            .count();
        assert_eq!(highlights, 2);
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawLine {
                color: ThemeToken::PointerLine,
                ..
            }
        )));
        assert!(matches!(cmds.last(), Some(RenderCommand::EndGroup)));
    }

    #[test]
    fn pointer_at_origin_draws_nothing() {
        let (snapshot, layout) = render(two_lines());
        assert!(render_pointer(&snapshot, &layout, Point::new(0.0, 10.0)).is_empty());
    }

    #[test]
    fn empty_snapshot_has_no_profile() {
        let (snapshot, layout) = render(ProfileInput::default());
        assert!(render_area(&snapshot, &layout).is_empty());
        assert!(render_line(&snapshot, &layout).is_empty());
        let overlay = render_pointer(&snapshot, &layout, Point::new(100.0, 10.0));
        assert!(polylines(&overlay).is_empty());
        assert!(overlay.iter().any(|c| matches!(c, RenderCommand::DrawCircle { .. })));
    }
}
