use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};

use machine_gantt::config::TimelineConfig;
use machine_gantt::io::parse_schedule;
use machine_gantt::model::hover::TooltipPhase;
use machine_gantt::model::{
    HighlightMode, HitTarget, PanDirection, Preset, TimelineController, TimelineEvent,
};

const PAYLOAD: &str = r##"{
    "machines": ["R1", {"id": "R2", "name": "Lathe"}],
    "items": [
        {"id": "A", "machine": "R1", "start": "2025-01-01T00:00:00Z", "end": "2025-01-01T02:00:00Z",
         "workOrder": "WO1", "salesOrder": "SO1", "status": "planned"},
        {"id": "B", "machine": "R2", "start": "2025-01-01T04:00:00Z", "end": "2025-01-01T07:00:00Z",
         "workOrder": "WO1", "salesOrder": "SO2", "status": "actual"},
        {"id": "C", "machine": "R2", "start": "2025-01-01T09:00:00Z", "end": "2025-01-01T10:00:00Z",
         "workOrder": "WO2", "salesOrder": "SO1", "status": "incomplete", "color": "#ff8800"},
        {"id": "D", "machine": "R1", "start": "not a date", "end": "2025-01-01T10:00:00Z"}
    ]
}"##;

fn loaded() -> (TimelineController, Instant) {
    let config = TimelineConfig {
        timezone: "UTC".into(),
        default_preset: Preset::Day,
        ..Default::default()
    };
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap();
    let t0 = Instant::now();
    let schedule = parse_schedule(PAYLOAD).unwrap();
    let mut controller = TimelineController::new(&config, now);
    controller.apply(
        TimelineEvent::DataReplaced {
            resources: schedule.machines,
            items: schedule.items,
        },
        t0,
    );
    controller.apply(
        TimelineEvent::Resized {
            track_width: 2400.0,
            viewport_height: 400.0,
        },
        t0,
    );
    (controller, t0)
}

fn click(controller: &mut TimelineController, id: &str, t: Instant) {
    controller.apply(TimelineEvent::PointerDown { x: 20.0 }, t);
    controller.apply(
        TimelineEvent::PointerReleased {
            target: HitTarget::Bar(id.into()),
        },
        t,
    );
}

fn highlighted(controller: &TimelineController) -> Option<Vec<String>> {
    let highlight = controller.highlight();
    highlight.ids().map(|ids| {
        let mut ids: Vec<String> = ids.iter().cloned().collect();
        ids.sort();
        ids
    })
}

#[test]
fn two_hour_item_on_a_day_view() {
    let (controller, _) = loaded();
    let frame = controller.frame();

    assert_eq!(frame.rows.len(), 2);
    assert_eq!(frame.rows[0].resource.name, "R1");
    assert_eq!(frame.rows[1].resource.name, "Lathe");

    // D has an unparseable start and is not drawn.
    let r1: Vec<_> = frame.rows[0].bars.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(r1, vec!["A"]);
    let a = &frame.rows[0].bars[0];
    assert_eq!((a.x, a.width), (0.0, 200.0));

    let c = &frame.rows[1].bars[1];
    assert_eq!(c.id, "C");
    assert!(c.hatch);
    assert_eq!(c.color, egui::Color32::from_rgb(0xff, 0x88, 0x00));

    let majors: Vec<f64> = frame.ticks.major.iter().take(4).map(|t| t.x).collect();
    assert_eq!(majors, vec![0.0, 600.0, 1200.0, 1800.0]);
}

#[test]
fn clicking_the_same_bar_cycles_relations() {
    let (mut controller, t0) = loaded();

    click(&mut controller, "A", t0);
    assert_eq!(controller.selection().mode, HighlightMode::WorkOrder);
    assert_eq!(highlighted(&controller), Some(vec!["A".into(), "B".into()]));

    click(&mut controller, "A", t0);
    assert_eq!(controller.selection().mode, HighlightMode::SalesOrder);
    assert_eq!(highlighted(&controller), Some(vec!["A".into(), "C".into()]));

    click(&mut controller, "A", t0);
    assert_eq!(controller.selection().selected, None);
    assert_eq!(highlighted(&controller), None);
}

#[test]
fn escape_clears_selection() {
    let (mut controller, t0) = loaded();
    click(&mut controller, "B", t0);
    assert!(controller.highlight().is_active());
    controller.apply(TimelineEvent::Escape, t0);
    assert!(!controller.highlight().is_active());
}

#[test]
fn tooltip_survives_the_gap_to_the_tooltip() {
    let (mut controller, t0) = loaded();
    controller.apply(
        TimelineEvent::BarEntered {
            item_id: "B".into(),
            anchor: (450.0, 40.0),
        },
        t0,
    );
    assert_eq!(controller.tooltip_phase(), TooltipPhase::ShownOverBar);

    controller.apply(TimelineEvent::BarLeft { item_id: "B".into() }, t0);
    assert_eq!(controller.tooltip_phase(), TooltipPhase::PendingHide);

    let t1 = t0 + Duration::from_millis(50);
    controller.apply(TimelineEvent::TooltipEntered, t1);
    controller.apply(TimelineEvent::Tick, t0 + Duration::from_millis(500));
    assert_eq!(controller.tooltip_phase(), TooltipPhase::ShownOverTooltip);

    let t2 = t0 + Duration::from_millis(600);
    controller.apply(TimelineEvent::TooltipLeft, t2);
    controller.apply(TimelineEvent::Tick, t2 + Duration::from_millis(99));
    assert_eq!(controller.tooltip_phase(), TooltipPhase::PendingHide);
    controller.apply(TimelineEvent::Tick, t2 + Duration::from_millis(100));
    assert_eq!(controller.tooltip_phase(), TooltipPhase::Hidden);
}

#[test]
fn highlighted_bars_gate_the_tooltip() {
    let (mut controller, t0) = loaded();
    click(&mut controller, "A", t0);
    controller.apply(
        TimelineEvent::BarEntered {
            item_id: "C".into(),
            anchor: (0.0, 0.0),
        },
        t0,
    );
    assert!(controller.tooltip().is_none());
    controller.apply(
        TimelineEvent::BarEntered {
            item_id: "B".into(),
            anchor: (0.0, 0.0),
        },
        t0,
    );
    assert_eq!(controller.tooltip().map(|t| t.item_id.as_str()), Some("B"));
}

#[test]
fn navigation_round_trip() {
    let (mut controller, _) = loaded();
    let home = controller.window();

    controller.pan_by(PanDirection::Later);
    controller.pan_by(PanDirection::Later);
    assert_eq!(controller.window().start_ms, home.start_ms + 2 * home.span_ms());

    controller.set_preset(Preset::Week);
    controller.snap_to_today(Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap());
    // 2025-01-01 is a Wednesday; the week starts Monday 2024-12-30.
    let monday = Utc.with_ymd_and_hms(2024, 12, 30, 0, 0, 0).unwrap();
    assert_eq!(controller.window().start_ms, monday.timestamp_millis());
    assert_eq!(controller.preset(), Preset::Week);
}
