use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::calendar;

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Pointer travel below this many pixels is a click, not a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// The visible time range, `start_ms < end_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    /// Bounds are reordered if needed and an empty range widened to 1ms.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        let (start_ms, end_ms) = if end_ms < start_ms {
            (end_ms, start_ms)
        } else {
            (start_ms, end_ms)
        };
        Self {
            start_ms,
            end_ms: end_ms.max(start_ms + 1),
        }
    }

    pub fn span_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    pub fn center_ms(&self) -> i64 {
        self.start_ms + self.span_ms() / 2
    }

    pub fn contains(&self, ms: i64) -> bool {
        ms >= self.start_ms && ms < self.end_ms
    }

    pub fn shifted(&self, delta_ms: i64) -> Self {
        Self {
            start_ms: self.start_ms + delta_ms,
            end_ms: self.end_ms + delta_ms,
        }
    }

    /// A window of `span_ms` centred on `center_ms`.
    pub fn centered(center_ms: i64, span_ms: i64) -> Self {
        let start_ms = center_ms - span_ms / 2;
        Self::new(start_ms, start_ms + span_ms)
    }
}

/// Named zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Preset {
    #[serde(rename = "day")]
    Day,
    #[default]
    #[serde(rename = "3day")]
    ThreeDay,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Day, Preset::ThreeDay, Preset::Week, Preset::Month];

    /// Fixed span used when switching presets around a center.
    pub fn span_ms(self) -> i64 {
        match self {
            Preset::Day => DAY_MS,
            Preset::ThreeDay => 3 * DAY_MS,
            Preset::Week => 7 * DAY_MS,
            Preset::Month => 30 * DAY_MS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::Day => "Day",
            Preset::ThreeDay => "3 days",
            Preset::Week => "Week",
            Preset::Month => "Month",
        }
    }

    /// The calendar-anchored window containing `now_ms` in `tz`.
    pub fn anchored_window(self, tz: Tz, now_ms: i64) -> TimeWindow {
        let today = calendar::local_date(tz, now_ms);
        let (start, end) = match self {
            Preset::Day => (today, today + Duration::days(1)),
            Preset::ThreeDay => {
                let yesterday = today - Duration::days(1);
                (yesterday, yesterday + Duration::days(3))
            }
            Preset::Week => {
                let monday = calendar::monday_of(today);
                (monday, monday + Duration::days(7))
            }
            Preset::Month => {
                let first = calendar::first_of_month(today);
                (first, calendar::add_months(first, 1))
            }
        };
        TimeWindow::new(
            calendar::start_of_day(tz, start),
            calendar::start_of_day(tz, end),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Earlier,
    Later,
}

impl PanDirection {
    pub fn sign(self) -> i64 {
        match self {
            PanDirection::Earlier => -1,
            PanDirection::Later => 1,
        }
    }
}

/// Snapshot taken when a pointer goes down on the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPan {
    origin_x: f64,
    snapshot: TimeWindow,
    track_width: f64,
    dragging: bool,
}

impl DragPan {
    pub fn begin(origin_x: f64, snapshot: TimeWindow, track_width: f64) -> Self {
        Self {
            origin_x,
            snapshot,
            track_width: track_width.max(1.0),
            dragging: false,
        }
    }

    /// Window for the pointer at `x`, always derived from the snapshot.
    /// Returns `None` while the gesture is still below the drag threshold.
    pub fn window_at(&mut self, x: f64) -> Option<TimeWindow> {
        let dx = x - self.origin_x;
        if !self.dragging && dx.abs() < DRAG_THRESHOLD_PX {
            return None;
        }
        self.dragging = true;
        let ms_per_px = self.snapshot.span_ms() as f64 / self.track_width;
        // Dragging right reveals earlier time.
        let delta_ms = (-dx * ms_per_px).round() as i64;
        Some(self.snapshot.shifted(delta_ms))
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

/// Owns the visible window and its preset.
#[derive(Debug, Clone)]
pub struct WindowManager {
    window: TimeWindow,
    preset: Preset,
    tz: Tz,
}

impl WindowManager {
    /// Starts snapped to the calendar window around `now_ms`.
    pub fn new(preset: Preset, tz: Tz, now_ms: i64) -> Self {
        Self {
            window: preset.anchored_window(tz, now_ms),
            preset,
            tz,
        }
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Zoom to `preset` keeping the current center instant in place.
    pub fn set_preset(&mut self, preset: Preset) {
        let center = self.window.center_ms();
        self.preset = preset;
        self.window = TimeWindow::centered(center, preset.span_ms());
    }

    pub fn snap_to_today(&mut self, now_ms: i64) {
        self.window = self.preset.anchored_window(self.tz, now_ms);
    }

    /// Shift by exactly one current span.
    pub fn pan_by(&mut self, direction: PanDirection) {
        self.window = self.window.shifted(direction.sign() * self.window.span_ms());
    }

    pub fn set_window(&mut self, window: TimeWindow) {
        self.window = window;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chrono_tz::Europe::Copenhagen;

    fn ms(y: i32, mo: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap().timestamp_millis()
    }

    #[test]
    fn pan_round_trip_is_exact() {
        let mut wm = WindowManager::new(Preset::Week, Copenhagen, ms(2025, 5, 14, 10));
        let before = wm.window();
        wm.pan_by(PanDirection::Later);
        assert_eq!(wm.window().start_ms, before.end_ms);
        wm.pan_by(PanDirection::Earlier);
        assert_eq!(wm.window(), before);
    }

    #[test]
    fn preset_change_keeps_center() {
        let mut wm = WindowManager::new(Preset::Day, Copenhagen, ms(2025, 5, 14, 10));
        let center = wm.window().center_ms();
        wm.set_preset(Preset::Month);
        assert_eq!(wm.window().span_ms(), 30 * DAY_MS);
        assert_eq!(wm.window().center_ms(), center);
        wm.set_preset(Preset::ThreeDay);
        assert_eq!(wm.window().center_ms(), center);
    }

    #[test]
    fn snap_uses_facility_calendar() {
        // 23:30 UTC on Jan 1 is already Jan 2 in Copenhagen.
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 23, 30, 0).unwrap().timestamp_millis();
        let day = Preset::Day.anchored_window(Copenhagen, now);
        assert_eq!(day.start_ms, ms(2025, 1, 1, 23));
        assert_eq!(day.span_ms(), DAY_MS);

        let three = Preset::ThreeDay.anchored_window(Copenhagen, now);
        assert_eq!(three.start_ms, ms(2024, 12, 31, 23));
        assert_eq!(three.span_ms(), 3 * DAY_MS);

        // Jan 2 2025 is a Thursday; the week starts Monday Dec 30.
        let week = Preset::Week.anchored_window(Copenhagen, now);
        assert_eq!(week.start_ms, ms(2024, 12, 29, 23));

        let month = Preset::Month.anchored_window(Copenhagen, now);
        assert_eq!(month.start_ms, ms(2024, 12, 31, 23));
        assert_eq!(month.end_ms, ms(2025, 1, 31, 23));
    }

    #[test]
    fn drag_uses_snapshot_and_inverted_sign() {
        let snapshot = TimeWindow::new(0, DAY_MS);
        let mut drag = DragPan::begin(100.0, snapshot, 2400.0);
        assert_eq!(drag.window_at(102.0), None);
        assert!(!drag.is_dragging());

        // 100px at 2400px/day is one hour; right drag moves earlier.
        let moved = drag.window_at(200.0).unwrap();
        assert_eq!(moved, snapshot.shifted(-HOUR_MS));
        assert!(drag.is_dragging());

        // Once dragging, small deltas still apply and never compound.
        let back = drag.window_at(101.0).unwrap();
        assert_eq!(back, snapshot.shifted(-HOUR_MS / 100));
        let home = drag.window_at(100.0).unwrap();
        assert_eq!(home, snapshot);
    }

    #[test]
    fn window_constructor_normalizes() {
        let w = TimeWindow::new(10, 5);
        assert_eq!((w.start_ms, w.end_ms), (5, 10));
        let empty = TimeWindow::new(7, 7);
        assert_eq!(empty.span_ms(), 1);
    }
}
