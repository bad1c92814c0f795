//! Integration test: parse a route from disk, build the snapshot, move a
//! pointer across the chart and serialize the result to SVG.

use elevation_profile_core::domain::Extent;
use elevation_profile_core::model::Sample;
use elevation_profile_core::svg::render_svg;
use elevation_profile_core::{
    ChartConfig, LabeledSegment, ProfileChart, ProfileInput, SegmentPartition, load, parse_auto,
    update,
};
use elevation_profile_protocol::{
    Coordinate, PointerEvent, RenderCommand, SegmentLabels, Viewport,
};

const ROUTE_JSON: &[u8] = include_bytes!("fixtures/alpine-route.json");
const ROUTE_GEOJSON: &[u8] = include_bytes!("fixtures/alpine-route.geojson");

fn route_chart() -> ProfileChart {
    let snapshot = load(ROUTE_JSON).expect("fixture loads");
    ProfileChart::new(snapshot, ChartConfig::default(), Viewport::new(440.0, 240.0))
}

fn spans(partition: Option<&SegmentPartition>) -> Vec<(usize, usize, Option<String>)> {
    partition
        .map(|p| {
            p.iter()
                .map(|s| (s.start, s.end, s.value.as_ref().map(ToString::to_string)))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn fixture_builds_gap_aware_snapshot() {
    let snapshot = load(ROUTE_JSON).expect("fixture loads");
    let buffer = snapshot.buffer();

    assert_eq!(buffer.len(), 6 + 1 + 4);
    assert_eq!(buffer.gaps().as_slice(), &[6]);
    assert!(matches!(buffer.get(6), Some(Sample::Gap { x }) if *x == 500.0));
    assert_eq!(snapshot.domains().x, Some(Extent::new(0.0, 950.0)));
    assert_eq!(snapshot.domains().y, Some(Extent::new(1200.0, 1500.0)));
    assert_eq!(snapshot.points().len(), 1);

    assert_eq!(
        spans(snapshot.line_segments()),
        vec![
            (0, 1, None),
            (2, 4, Some("steep".to_string())),
            (5, 5, None),
            (7, 9, Some("climb".to_string())),
            (10, 10, None),
        ]
    );
    assert_eq!(
        spans(snapshot.x_axis_segments()),
        vec![(0, 5, None), (7, 10, Some("Ridge".to_string()))]
    );
}

#[test]
fn geojson_and_plain_json_agree() {
    let plain = load(ROUTE_JSON).expect("fixture loads");
    let geo = load(ROUTE_GEOJSON).expect("geojson fixture loads");
    assert_eq!(plain.buffer(), geo.buffer());
    assert_eq!(plain.domains(), geo.domains());
    assert_eq!(plain.points(), geo.points());
    assert!(geo.line_segments().is_none());
}

#[test]
fn pointer_reports_sample_and_both_labels() {
    let mut chart = route_chart();
    let layout = *chart.layout().expect("viewport leaves room to plot");

    let event = chart
        .pointer_move(layout.x.apply(700.0))
        .expect("partitions are consistent");
    let Some(PointerEvent::Over {
        coordinate,
        position,
        segments,
    }) = event
    else {
        unreachable!("expected an over event");
    };
    assert_eq!(coordinate, Coordinate::new(7.0093, 46.2027, 1460.0, 750.0));
    assert!((position.x - layout.x.apply(750.0)).abs() < 1e-9);
    assert!((position.y - layout.y.apply(1460.0)).abs() < 1e-9);
    assert_eq!(
        segments,
        Some(SegmentLabels {
            line: Some("climb".into()),
            axis: Some("Ridge".into()),
        })
    );

    let json = serde_json::to_value(chart.pointer_out()).expect("event serializes");
    assert_eq!(json, serde_json::json!({ "type": "out" }));
    assert!(chart.pointer().is_none());
}

#[test]
fn over_event_json_shape() {
    let mut chart = route_chart();
    let layout = *chart.layout().expect("viewport leaves room to plot");
    let event = chart
        .pointer_move(layout.x.apply(0.0))
        .expect("partitions are consistent")
        .expect("hit at the start of the route");
    let json = serde_json::to_value(&event).expect("event serializes");
    assert_eq!(json["type"], "over");
    assert_eq!(json["coordinate"], serde_json::json!([7.0, 46.2, 1200.0, 0.0]));
    assert_eq!(json["segments"]["line"], serde_json::Value::Null);
    assert_eq!(json["segments"]["axis"], serde_json::Value::Null);
}

#[test]
fn render_and_serialize_to_svg() {
    let mut chart = route_chart();
    let layout = *chart.layout().expect("viewport leaves room to plot");
    chart
        .pointer_move(layout.x.apply(300.0))
        .expect("partitions are consistent");

    let commands = chart.render();
    assert!(
        commands
            .iter()
            .any(|c| matches!(c, RenderCommand::SetClip { .. }))
    );
    let areas = commands
        .iter()
        .filter(|c| matches!(c, RenderCommand::FillPolygon { .. }))
        .count();
    assert_eq!(areas, 2);

    let svg = render_svg(&commands, 440.0, 240.0, false);
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    for label in ["steep", "climb", "Ridge"] {
        assert!(svg.contains(label), "missing {label}");
    }
    assert!(svg.contains("1 km") || svg.contains("800 m"));

    let json = serde_json::to_string(&commands).expect("commands serialize");
    assert!(json.contains("DrawPolyline"));
}

#[test]
fn single_line_of_three() {
    let input = ProfileInput::from_lines(vec![vec![
        Coordinate::new(0.0, 0.0, 10.0, 0.0),
        Coordinate::new(0.0, 0.0, 20.0, 5.0),
        Coordinate::new(0.0, 0.0, 15.0, 10.0),
    ]]);
    let snapshot = update(&input).expect("no segments to check");
    assert_eq!(snapshot.buffer().len(), 3);
    assert!(snapshot.buffer().gaps().is_empty());
    assert_eq!(snapshot.domains().x, Some(Extent::new(0.0, 10.0)));
    assert_eq!(snapshot.domains().y, Some(Extent::new(10.0, 20.0)));
}

#[test]
fn two_lines_with_steep_segment() {
    let input = parse_auto(
        br#"{
            "lines": [
                [[0, 0, 10, 0], [0, 0, 12, 1]],
                [[0, 0, 14, 2], [0, 0, 16, 3], [0, 0, 18, 4]]
            ],
            "lineSegments": [[1, 3, "steep"]]
        }"#,
    )
    .expect("input parses");
    let snapshot = update(&input).expect("partition is consistent");
    assert_eq!(snapshot.buffer().len(), 6);
    assert_eq!(snapshot.buffer().gaps().as_slice(), &[2]);
    assert_eq!(
        spans(snapshot.line_segments()),
        vec![
            (0, 0, None),
            (1, 1, Some("steep".to_string())),
            (3, 5, None),
        ]
    );
    let partition = snapshot.line_segments().expect("segments supplied");
    assert!(partition.iter().all(|s| !s.contains(2)));
    for index in [0, 1, 3, 4, 5] {
        assert!(partition.label_at(index).is_ok());
    }
}

#[test]
fn overlapping_and_out_of_range_segments_are_dropped() {
    let input = ProfileInput {
        line_segments: Some(vec![
            LabeledSegment::labeled(0, 5, "first"),
            LabeledSegment::labeled(3, 7, "overlap"),
            LabeledSegment::labeled(40, 50, "beyond"),
        ]),
        ..parse_auto(ROUTE_JSON).expect("fixture parses")
    };
    let snapshot = update(&input).expect("partition is consistent");
    let labels: Vec<Option<String>> = spans(snapshot.line_segments())
        .into_iter()
        .map(|(_, _, label)| label)
        .collect();
    assert_eq!(labels, vec![Some("first".to_string()), None]);
}
