use std::collections::{HashMap, HashSet};

use egui::Color32;

use super::scale::TimeScale;
use super::schedule::{ItemStatus, Resource, ScheduleItem};

/// Narrowest bar drawn, so zero-length items stay clickable.
pub const MIN_BAR_PX: f64 = 4.0;

/// Fill style for a status category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle {
    pub color: Color32,
    /// Diagonal stripes for provisional or problem states.
    pub hatch: bool,
}

impl ItemStatus {
    pub fn style(self) -> BarStyle {
        match self {
            ItemStatus::Planned => BarStyle {
                color: Color32::from_rgb(66, 133, 244),
                hatch: false,
            },
            ItemStatus::Actual => BarStyle {
                color: Color32::from_rgb(52, 168, 83),
                hatch: false,
            },
            ItemStatus::Incomplete => BarStyle {
                color: Color32::from_rgb(251, 140, 0),
                hatch: true,
            },
            ItemStatus::NotAccepted => BarStyle {
                color: Color32::from_rgb(229, 57, 53),
                hatch: true,
            },
            ItemStatus::Current => BarStyle {
                color: Color32::from_rgb(0, 188, 212),
                hatch: false,
            },
            ItemStatus::Frozen => BarStyle {
                color: Color32::from_rgb(120, 125, 140),
                hatch: false,
            },
        }
    }
}

/// Screen geometry for one schedule item.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutBar {
    pub id: String,
    pub x: f64,
    pub width: f64,
    pub start_ms: i64,
    pub end_ms: i64,
    pub color: Color32,
    pub hatch: bool,
    pub status: ItemStatus,
    pub work_order: Option<String>,
    pub sales_order: Option<String>,
    pub label: String,
}

impl LaidOutBar {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.x && x <= self.right()
    }
}

/// Bars grouped by resource id.
#[derive(Debug, Clone, Default)]
pub struct BarLayout {
    rows: HashMap<String, Vec<LaidOutBar>>,
}

impl BarLayout {
    /// Bars of one resource; empty for resources without valid items.
    pub fn bars_for(&self, resource_id: &str) -> &[LaidOutBar] {
        self.rows.get(resource_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bar_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn into_rows(self) -> HashMap<String, Vec<LaidOutBar>> {
        self.rows
    }
}

/// Lay out the items belonging to `resources`.
///
/// Items without a start or end, items on unknown resources and items whose
/// status is not in `visible` are skipped.
pub fn layout_bars(
    items: &[ScheduleItem],
    resources: &[Resource],
    scale: &TimeScale,
    visible: &HashSet<ItemStatus>,
) -> BarLayout {
    let mut rows: HashMap<String, Vec<(i64, i64, &ScheduleItem)>> = resources
        .iter()
        .map(|r| (r.id.clone(), Vec::new()))
        .collect();

    for item in items {
        if !visible.contains(&item.status) {
            continue;
        }
        let Some((start_ms, end_ms)) = item.span_ms() else {
            continue;
        };
        if let Some(row) = rows.get_mut(&item.resource_id) {
            row.push((start_ms, end_ms, item));
        }
    }

    let rows = rows
        .into_iter()
        .map(|(resource_id, mut entries)| {
            // Stable: equal starts keep input order.
            entries.sort_by_key(|(start_ms, _, _)| *start_ms);
            let bars = entries
                .into_iter()
                .map(|(start_ms, end_ms, item)| lay_out_item(item, start_ms, end_ms, scale))
                .collect();
            (resource_id, bars)
        })
        .collect();

    BarLayout { rows }
}

fn lay_out_item(item: &ScheduleItem, start_ms: i64, end_ms: i64, scale: &TimeScale) -> LaidOutBar {
    let x = scale.to_x(start_ms as f64);
    let width = (scale.to_x(end_ms as f64) - x).max(MIN_BAR_PX);
    let style = item.status.style();
    let color = item
        .explicit_color
        .as_deref()
        .and_then(|hex| Color32::from_hex(hex.trim()).ok())
        .unwrap_or(style.color);

    LaidOutBar {
        id: item.id.clone(),
        x,
        width,
        start_ms,
        end_ms,
        color,
        hatch: style.hatch,
        status: item.status,
        work_order: item.work_order.clone(),
        sales_order: item.sales_order.clone(),
        label: item.display_label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn all_statuses() -> HashSet<ItemStatus> {
        ItemStatus::ALL.into_iter().collect()
    }

    fn item(id: &str, resource: &str, start_h: u32, end_h: u32) -> ScheduleItem {
        let mut item = ScheduleItem::new(id, resource);
        item.start = Some(Utc.with_ymd_and_hms(2025, 1, 1, start_h, 0, 0).unwrap());
        item.end = Some(Utc.with_ymd_and_hms(2025, 1, 1, end_h, 0, 0).unwrap());
        item
    }

    fn day_scale() -> TimeScale {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().timestamp_millis();
        let end = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap().timestamp_millis();
        TimeScale::new(start, end, 2400.0)
    }

    #[test]
    fn two_hour_item_on_day_window() {
        let resources = vec![Resource::new("R1", "Press 1")];
        let layout = layout_bars(&[item("A", "R1", 0, 2)], &resources, &day_scale(), &all_statuses());
        let bars = layout.bars_for("R1");
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].x, 0.0);
        assert_eq!(bars[0].width, 200.0);
    }

    #[test]
    fn zero_length_items_get_minimum_width() {
        let resources = vec![Resource::new("R1", "Press 1")];
        let layout = layout_bars(&[item("A", "R1", 5, 5)], &resources, &day_scale(), &all_statuses());
        assert_eq!(layout.bars_for("R1")[0].width, MIN_BAR_PX);
    }

    #[test]
    fn invalid_and_foreign_items_are_skipped() {
        let resources = vec![Resource::new("R1", "Press 1"), Resource::new("R2", "Press 2")];
        let mut unscheduled = item("B", "R1", 1, 2);
        unscheduled.end = None;
        let items = vec![item("A", "R1", 3, 4), unscheduled, item("C", "R9", 1, 2)];
        let layout = layout_bars(&items, &resources, &day_scale(), &all_statuses());
        assert_eq!(layout.bars_for("R1").len(), 1);
        assert!(layout.bars_for("R2").is_empty());
        assert!(layout.bars_for("R9").is_empty());
        assert_eq!(layout.bar_count(), 1);
    }

    #[test]
    fn sorted_by_start_with_stable_ties() {
        let resources = vec![Resource::new("R1", "Press 1")];
        let items = vec![item("late", "R1", 8, 9), item("tie1", "R1", 2, 3), item("tie2", "R1", 2, 5)];
        let layout = layout_bars(&items, &resources, &day_scale(), &all_statuses());
        let ids: Vec<&str> = layout.bars_for("R1").iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["tie1", "tie2", "late"]);
    }

    #[test]
    fn explicit_color_beats_status_table() {
        let resources = vec![Resource::new("R1", "Press 1")];
        let mut painted = item("A", "R1", 1, 2);
        painted.status = ItemStatus::NotAccepted;
        painted.explicit_color = Some("#102030".into());
        let mut bogus = item("B", "R1", 3, 4);
        bogus.explicit_color = Some("not a color".into());

        let layout = layout_bars(&[painted, bogus], &resources, &day_scale(), &all_statuses());
        let bars = layout.bars_for("R1");
        assert_eq!(bars[0].color, Color32::from_rgb(0x10, 0x20, 0x30));
        assert!(bars[0].hatch);
        assert_eq!(bars[1].color, ItemStatus::Actual.style().color);
    }

    #[test]
    fn hidden_statuses_are_filtered() {
        let resources = vec![Resource::new("R1", "Press 1")];
        let mut planned = item("A", "R1", 1, 2);
        planned.status = ItemStatus::Planned;
        let visible: HashSet<ItemStatus> = [ItemStatus::Actual].into_iter().collect();
        let layout = layout_bars(&[planned, item("B", "R1", 3, 4)], &resources, &day_scale(), &visible);
        let ids: Vec<&str> = layout.bars_for("R1").iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["B"]);
    }
}
