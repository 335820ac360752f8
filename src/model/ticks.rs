//! Gridline and header label planning.

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;

use super::calendar;
use super::scale::TimeScale;
use super::window::{Preset, TimeWindow};

/// Smallest gap between month-view day labels.
pub const MONTH_MIN_LABEL_GAP_PX: f64 = 26.0;
/// Rough glyph width used to estimate label extents.
pub const LABEL_CHAR_PX: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Every `n` local clock hours, aligned to local midnight.
    Hours(u32),
    /// Every `n` local calendar days.
    Days(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAlign {
    /// Left edge at the tick.
    Left,
    /// Centred between the tick and the next one.
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub ms: i64,
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub x: f64,
    pub text: String,
    pub align: LabelAlign,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickPlan {
    pub major: Vec<Tick>,
    pub minor: Vec<Tick>,
    pub labels: Vec<TickLabel>,
}

/// Per-preset gridline intervals and label format.
#[derive(Debug, Clone, Copy)]
pub struct TickSpec {
    pub major: Step,
    pub minor: Option<Step>,
    pub label_format: &'static str,
    pub align: LabelAlign,
}

impl Preset {
    pub fn tick_spec(self) -> TickSpec {
        match self {
            Preset::Day => TickSpec {
                major: Step::Hours(6),
                minor: Some(Step::Hours(1)),
                label_format: "%H:%M",
                align: LabelAlign::Left,
            },
            Preset::ThreeDay => TickSpec {
                major: Step::Days(1),
                minor: Some(Step::Hours(3)),
                label_format: "%a %d %b",
                align: LabelAlign::Center,
            },
            Preset::Week => TickSpec {
                major: Step::Days(1),
                minor: Some(Step::Hours(6)),
                label_format: "%a %d.%m",
                align: LabelAlign::Center,
            },
            Preset::Month => TickSpec {
                major: Step::Days(1),
                minor: None,
                label_format: "%d",
                align: LabelAlign::Center,
            },
        }
    }
}

/// Plan gridlines and labels for `window` drawn with `scale`.
pub fn plan_ticks(window: TimeWindow, preset: Preset, tz: Tz, scale: &TimeScale) -> TickPlan {
    let spec = preset.tick_spec();
    let base = base_date(window, preset, tz);

    let major_ms = step_instants(spec.major, tz, base, window);
    let minor = match spec.minor {
        Some(step) => step_instants(step, tz, base, window)
            .into_iter()
            .filter(|ms| major_ms.binary_search(ms).is_err())
            .map(|ms| Tick { ms, x: scale.to_x(ms as f64) })
            .collect(),
        None => Vec::new(),
    };
    let major: Vec<Tick> = major_ms
        .iter()
        .map(|&ms| Tick { ms, x: scale.to_x(ms as f64) })
        .collect();

    let mut labels: Vec<TickLabel> = major
        .iter()
        .map(|tick| {
            let text = calendar::instant(tick.ms)
                .with_timezone(&tz)
                .format(spec.label_format)
                .to_string();
            let x = match spec.align {
                LabelAlign::Left => tick.x,
                LabelAlign::Center => {
                    let next = next_instant(spec.major, tz, tick.ms);
                    (tick.x + scale.to_x(next as f64)) / 2.0
                }
            };
            TickLabel {
                x,
                text,
                align: spec.align,
            }
        })
        .collect();

    if preset == Preset::Month {
        labels = thin_month_labels(labels, &major, scale.width());
    }

    TickPlan {
        major,
        minor,
        labels,
    }
}

/// Keep every `stride`-th label so neighbours never overlap, and drop the
/// last one if it would run past the right edge.
fn thin_month_labels(labels: Vec<TickLabel>, major: &[Tick], width: f64) -> Vec<TickLabel> {
    let day_px = match major {
        [a, b, ..] => (b.x - a.x).abs(),
        _ => return labels,
    };
    let stride = label_stride(day_px, MONTH_MIN_LABEL_GAP_PX);
    let mut kept: Vec<TickLabel> = labels.into_iter().step_by(stride).collect();
    if let Some(last) = kept.last() {
        if last.x + label_width(&last.text) / 2.0 > width {
            kept.pop();
        }
    }
    kept
}

/// How many ticks to advance between labels for a given tick spacing.
pub fn label_stride(tick_gap_px: f64, min_gap_px: f64) -> usize {
    if tick_gap_px.is_nan() || tick_gap_px <= 0.0 {
        return 1;
    }
    (min_gap_px / tick_gap_px).ceil().max(1.0) as usize
}

pub fn label_width(text: &str) -> f64 {
    text.chars().count() as f64 * LABEL_CHAR_PX
}

fn base_date(window: TimeWindow, preset: Preset, tz: Tz) -> NaiveDate {
    let first = calendar::local_date(tz, window.start_ms);
    match preset {
        Preset::Month => calendar::first_of_month(first),
        _ => first,
    }
}

fn step_instants(step: Step, tz: Tz, base: NaiveDate, window: TimeWindow) -> Vec<i64> {
    let mut out = Vec::new();
    let mut date = base;
    match step {
        Step::Days(n) => loop {
            let ms = calendar::start_of_day(tz, date);
            if ms > window.end_ms {
                break;
            }
            if ms >= window.start_ms {
                out.push(ms);
            }
            date += Duration::days(n.max(1));
        },
        Step::Hours(n) => loop {
            if calendar::start_of_day(tz, date) > window.end_ms {
                break;
            }
            for hour in (0..24).step_by(n.max(1) as usize) {
                if let Some(ms) = calendar::at_local_hour(tz, date, hour) {
                    if ms >= window.start_ms && ms <= window.end_ms {
                        out.push(ms);
                    }
                }
            }
            date += Duration::days(1);
        },
    }
    out
}

fn next_instant(step: Step, tz: Tz, ms: i64) -> i64 {
    match step {
        Step::Days(n) => calendar::shift_days(tz, ms, n),
        Step::Hours(n) => ms + n as i64 * 3_600_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};
    use chrono_tz::{Europe::Copenhagen, UTC};

    fn utc_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap().timestamp_millis()
    }

    #[test]
    fn day_ticks_align_to_clock_hours() {
        // Window starts at an odd minute; gridlines still land on whole hours.
        let window = TimeWindow::new(utc_ms(2025, 1, 1, 3, 17), utc_ms(2025, 1, 2, 3, 17));
        let scale = TimeScale::for_window(window, 2400.0);
        let plan = plan_ticks(window, Preset::Day, UTC, &scale);

        let hours: Vec<u32> = plan
            .major
            .iter()
            .map(|t| calendar::instant(t.ms).hour())
            .collect();
        assert_eq!(hours, vec![6, 12, 18, 0]);
        assert_eq!(plan.minor.len(), 24 - 4);
        assert!(plan.minor.iter().all(|t| calendar::instant(t.ms).minute() == 0));

        assert_eq!(plan.labels[0].text, "06:00");
        assert_eq!(plan.labels[0].align, LabelAlign::Left);
        assert_eq!(plan.labels[0].x, plan.major[0].x);
    }

    #[test]
    fn week_labels_are_centred_on_days() {
        let tz = Copenhagen;
        let window = Preset::Week.anchored_window(tz, utc_ms(2025, 1, 8, 12, 0));
        let scale = TimeScale::for_window(window, 700.0);
        let plan = plan_ticks(window, Preset::Week, tz, &scale);

        assert_eq!(plan.major.len(), 8);
        assert_eq!(plan.major[0].x, 0.0);
        assert_eq!(plan.labels[0].text, "Mon 06.01");
        assert!((plan.labels[0].x - 50.0).abs() < 1e-9);
        assert_eq!(plan.labels[0].align, LabelAlign::Center);
    }

    #[test]
    fn month_labels_thin_out_and_respect_right_edge() {
        let tz = Copenhagen;
        let window = Preset::Month.anchored_window(tz, utc_ms(2025, 1, 15, 12, 0));
        // 31 days over 310px is 10px per day, so every third day is labelled.
        let scale = TimeScale::for_window(window, 310.0);
        let plan = plan_ticks(window, Preset::Month, tz, &scale);

        assert_eq!(plan.major.len(), 32);
        assert!(plan.minor.is_empty());
        let texts: Vec<&str> = plan.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(&texts[..3], &["01", "04", "07"]);
        for pair in plan.labels.windows(2) {
            assert!(pair[1].x - pair[0].x >= MONTH_MIN_LABEL_GAP_PX);
        }
        let last = plan.labels.last().unwrap();
        assert!(last.x + label_width(&last.text) / 2.0 <= 310.0);
    }

    #[test]
    fn month_ticks_start_from_month_base() {
        let tz = UTC;
        let window = TimeWindow::new(utc_ms(2025, 1, 10, 12, 0), utc_ms(2025, 1, 13, 12, 0));
        let scale = TimeScale::for_window(window, 300.0);
        let plan = plan_ticks(window, Preset::Month, tz, &scale);
        let days: Vec<i64> = plan.major.iter().map(|t| t.ms).collect();
        assert_eq!(
            days,
            vec![utc_ms(2025, 1, 11, 0, 0), utc_ms(2025, 1, 12, 0, 0), utc_ms(2025, 1, 13, 0, 0)]
        );
    }

    #[test]
    fn stride_is_at_least_one() {
        assert_eq!(label_stride(100.0, 26.0), 1);
        assert_eq!(label_stride(10.0, 26.0), 3);
        assert_eq!(label_stride(0.0, 26.0), 1);
    }
}
