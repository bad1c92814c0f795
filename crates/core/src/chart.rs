//! Interactive chart state: binds a snapshot to a viewport and turns
//! pointer positions into host events.

use elevation_profile_protocol::{Point, Rect, RenderCommand, Viewport};
use tracing::trace;

use crate::config::ChartConfig;
use crate::domain::Domains;
use crate::model::ProfileSnapshot;
use crate::scale::LinearScale;
use crate::segments::SegmentError;
use crate::views;

pub use elevation_profile_protocol::PointerEvent;

/// Tick count the elevation domain is rounded for, independent of the
/// viewport's own tick density.
const Y_NICE_COUNT: usize = 10;

/// Pixel-space geometry of one chart at one viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub viewport: Viewport,
    /// Area inside the margins.
    pub plot: Rect,
    /// Distance → horizontal pixels.
    pub x: LinearScale,
    /// Elevation → vertical pixels, domain rounded to tick boundaries.
    pub y: LinearScale,
    pub x_ticks: usize,
    pub y_ticks: usize,
}

impl ChartLayout {
    /// `None` when the margins leave no room to plot.
    pub fn new(domains: &Domains, config: &ChartConfig, viewport: Viewport) -> Option<Self> {
        let m = config.margin;
        let plot = Rect::new(
            m.left,
            m.top,
            viewport.width - m.left - m.right,
            viewport.height - m.top - m.bottom,
        );
        if !(plot.w > 0.0 && plot.h > 0.0) {
            return None;
        }

        let x_ticks = tick_count(viewport.width, config.tick_size.x);
        let y_ticks = tick_count(viewport.height, config.tick_size.y);
        let x = LinearScale::from_extent(domains.x_or_default(), (plot.x, plot.x + plot.w));
        let y = LinearScale::from_extent(domains.y_or_default(), (plot.y + plot.h, plot.y))
            .nice(Y_NICE_COUNT);

        Some(Self {
            viewport,
            plot,
            x,
            y,
            x_ticks,
            y_ticks,
        })
    }

    /// Vertical pixel of the plot's bottom edge, where the area fill ends.
    pub fn baseline(&self) -> f64 {
        self.plot.y + self.plot.h
    }

    pub fn project(&self, distance: f64, elevation: f64) -> Point {
        Point::new(self.x.apply(distance), self.y.apply(elevation))
    }
}

fn tick_count(extent_px: f64, tick_px: f64) -> usize {
    if tick_px > 0.0 && extent_px.is_finite() {
        ((extent_px / tick_px) as usize).clamp(1, 100)
    } else {
        1
    }
}

/// A snapshot on screen, plus the pointer position last resolved on it.
#[derive(Debug, Clone)]
pub struct ProfileChart {
    snapshot: ProfileSnapshot,
    config: ChartConfig,
    viewport: Viewport,
    layout: Option<ChartLayout>,
    pointer: Option<Point>,
}

impl ProfileChart {
    pub fn new(snapshot: ProfileSnapshot, config: ChartConfig, viewport: Viewport) -> Self {
        let layout = ChartLayout::new(snapshot.domains(), &config, viewport);
        Self {
            snapshot,
            config,
            viewport,
            layout,
            pointer: None,
        }
    }

    /// Swap in a freshly built snapshot. The pointer is cleared since its
    /// sample may no longer exist.
    pub fn set_snapshot(&mut self, snapshot: ProfileSnapshot) {
        self.snapshot = snapshot;
        self.pointer = None;
        self.layout = ChartLayout::new(self.snapshot.domains(), &self.config, self.viewport);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout = ChartLayout::new(self.snapshot.domains(), &self.config, viewport);
        self.pointer = None;
    }

    pub fn snapshot(&self) -> &ProfileSnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn layout(&self) -> Option<&ChartLayout> {
        self.layout.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Resolve a horizontal pointer position (pixels) to a sample.
    ///
    /// `Ok(None)` is a miss: empty chart, or the candidate was a gap. The
    /// pointer state is left as it was in that case.
    pub fn pointer_move(&mut self, pixel_x: f64) -> Result<Option<PointerEvent>, SegmentError> {
        let Some(layout) = self.layout else {
            return Ok(None);
        };
        let distance = layout.x.invert(pixel_x);
        let Some((hit, segments)) = self.snapshot.correlate(distance)? else {
            trace!(pixel_x, distance, "pointer missed");
            return Ok(None);
        };

        let position = layout.project(hit.x, hit.y);
        self.pointer = Some(position);
        trace!(pixel_x, index = hit.index, "pointer over sample");
        Ok(Some(PointerEvent::Over {
            coordinate: hit.coordinate,
            position,
            segments,
        }))
    }

    pub fn pointer_out(&mut self) -> PointerEvent {
        self.pointer = None;
        PointerEvent::Out
    }

    pub fn render(&self) -> Vec<RenderCommand> {
        match &self.layout {
            Some(layout) => views::render_profile(&self.snapshot, layout, self.pointer),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProfileInput, update};
    use crate::segments::LabeledSegment;
    use elevation_profile_protocol::{Coordinate, SegmentLabels};

    fn snapshot(input: ProfileInput) -> ProfileSnapshot {
        update(&input).unwrap_or_default()
    }

    fn ramp() -> ProfileInput {
        let line = (0..=10)
            .map(|i| {
                let i = f64::from(i);
                Coordinate::new(7.0, 46.0, 400.0 + i * 10.0, i * 100.0)
            })
            .collect();
        ProfileInput::from_lines(vec![line])
    }

    #[test]
    fn layout_maps_domain_into_margins() {
        let chart = ProfileChart::new(
            snapshot(ramp()),
            ChartConfig::default(),
            Viewport::new(440.0, 240.0),
        );
        let layout = chart.layout().copied().expect("viewport leaves room to plot");
        assert_eq!(layout.plot, Rect::new(40.0, 20.0, 380.0, 200.0));
        assert!((layout.x.apply(0.0) - 40.0).abs() < 1e-9);
        assert!((layout.x.apply(1000.0) - 420.0).abs() < 1e-9);
        assert!((layout.baseline() - 220.0).abs() < 1e-9);
        assert_eq!(layout.x_ticks, 4);
        assert_eq!(layout.y_ticks, 6);
    }

    #[test]
    fn elevation_domain_rounds_for_ten_ticks_at_any_height() {
        let line = [412.0, 440.0, 468.0]
            .iter()
            .zip([0.0, 50.0, 100.0])
            .map(|(&elevation, distance)| Coordinate::new(7.0, 46.0, elevation, distance))
            .collect();
        let chart = ProfileChart::new(
            snapshot(ProfileInput::from_lines(vec![line])),
            ChartConfig::default(),
            Viewport::new(440.0, 80.0),
        );
        let layout = chart.layout().copied().expect("viewport leaves room to plot");
        assert_eq!(layout.y_ticks, 2);
        let (low, high) = layout.y.domain;
        assert!((low - 410.0).abs() < 1e-9, "low = {low}");
        assert!((high - 470.0).abs() < 1e-9, "high = {high}");
    }

    #[test]
    fn too_small_viewport_has_no_layout() {
        let chart = ProfileChart::new(
            snapshot(ramp()),
            ChartConfig::default(),
            Viewport::new(50.0, 30.0),
        );
        assert!(chart.layout().is_none());
        assert!(chart.render().is_empty());
    }

    #[test]
    fn pointer_move_emits_over_event() {
        let mut chart =
            ProfileChart::new(snapshot(ramp()), ChartConfig::default(), Viewport::new(440.0, 240.0));
        // 250 m sits between samples at 200 m and 300 m; lower bound is 300 m.
        let px = chart.layout().map(|l| l.x.apply(250.0)).unwrap_or_default();
        let event = chart.pointer_move(px).ok().flatten();
        let Some(PointerEvent::Over {
            coordinate,
            position,
            segments,
        }) = event
        else {
            unreachable!("expected an over event");
        };
        assert_eq!(coordinate, Coordinate::new(7.0, 46.0, 430.0, 300.0));
        assert!((position.x - 154.0).abs() < 1e-9);
        assert_eq!(segments, None);
        assert_eq!(chart.pointer(), Some(position));
    }

    #[test]
    fn pointer_out_resets_state() {
        let mut chart =
            ProfileChart::new(snapshot(ramp()), ChartConfig::default(), Viewport::new(440.0, 240.0));
        let _ = chart.pointer_move(100.0);
        assert!(chart.pointer().is_some());
        assert_eq!(chart.pointer_out(), PointerEvent::Out);
        assert!(chart.pointer().is_none());
    }

    #[test]
    fn pointer_event_carries_both_labels() {
        let input = ProfileInput {
            line_segments: Some(vec![LabeledSegment::labeled(0, 4, "steep")]),
            x_axis_segments: Some(vec![]),
            ..ramp()
        };
        let mut chart =
            ProfileChart::new(snapshot(input), ChartConfig::default(), Viewport::new(440.0, 240.0));
        let event = chart.pointer_move(40.0).ok().flatten();
        let segments = match event {
            Some(PointerEvent::Over { segments, .. }) => segments,
            _ => None,
        };
        assert_eq!(
            segments,
            Some(SegmentLabels {
                line: Some("steep".into()),
                axis: None,
            })
        );
    }

    #[test]
    fn empty_snapshot_degrades_to_default_range() {
        let mut chart = ProfileChart::new(
            ProfileSnapshot::default(),
            ChartConfig::default(),
            Viewport::new(440.0, 240.0),
        );
        assert_eq!(chart.layout().map(|l| l.x.domain), Some((0.0, 1.0)));
        assert_eq!(chart.pointer_move(100.0), Ok(None));
        assert!(!chart.render().is_empty());
    }

    #[test]
    fn new_snapshot_clears_pointer() {
        let mut chart =
            ProfileChart::new(snapshot(ramp()), ChartConfig::default(), Viewport::new(440.0, 240.0));
        let _ = chart.pointer_move(200.0);
        chart.set_snapshot(snapshot(ramp()));
        assert!(chart.pointer().is_none());
        assert!(chart.layout().is_some());
    }
}
