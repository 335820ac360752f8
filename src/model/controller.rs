//! Single state container for the timeline, driven by discrete events.

use std::collections::HashSet;
use std::time::Instant;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::hover::{TooltipContent, TooltipPhase, TooltipState};
use super::layout::{layout_bars, LaidOutBar};
use super::relation::{Highlight, RelationIndex, SelectionState};
use super::rows::{visible_rows, Debounced, RowRange};
use super::scale::TimeScale;
use super::schedule::{ItemStatus, Resource, ScheduleItem};
use super::ticks::{plan_ticks, TickPlan};
use super::window::{DragPan, PanDirection, Preset, TimeWindow, WindowManager};
use crate::config::TimelineConfig;

/// What the pointer was over when a gesture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Bar(String),
    Background,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    /// Wholesale replacement of the schedule.
    DataReplaced {
        resources: Vec<Resource>,
        items: Vec<ScheduleItem>,
    },
    PresetChanged(Preset),
    /// Which statuses are drawn and whether unrelated bars hide while a
    /// relation is highlighted.
    FiltersChanged {
        visible_statuses: Vec<ItemStatus>,
        hide_unrelated: bool,
    },
    PanBy(PanDirection),
    SnapToToday {
        now: DateTime<Utc>,
    },
    Resized {
        track_width: f64,
        viewport_height: f64,
    },
    Scrolled {
        scroll_top: f64,
    },
    PointerDown {
        x: f64,
    },
    PointerMoved {
        x: f64,
    },
    PointerReleased {
        target: HitTarget,
    },
    BarEntered {
        item_id: String,
        anchor: (f64, f64),
    },
    BarLeft {
        item_id: String,
    },
    TooltipEntered,
    TooltipLeft,
    Escape,
    /// Advance timers.
    Tick,
}

/// A materialized row and its bars.
#[derive(Debug, Clone)]
pub struct RowView<'a> {
    pub index: usize,
    pub resource: &'a Resource,
    /// Offset of the row's top edge within the scrollable content.
    pub top: f64,
    pub bars: Vec<LaidOutBar>,
}

#[derive(Debug, Clone)]
pub struct TooltipView<'a> {
    pub content: &'a TooltipContent,
    pub item: &'a ScheduleItem,
    pub resource_name: &'a str,
}

/// Everything a rendering surface needs for one paint.
#[derive(Debug, Clone)]
pub struct TimelineFrame<'a> {
    pub window: TimeWindow,
    pub preset: Preset,
    pub tz: Tz,
    pub scale: TimeScale,
    pub ticks: TickPlan,
    pub row_range: Option<RowRange>,
    pub rows: Vec<RowView<'a>>,
    pub row_height: f64,
    pub content_height: f64,
    pub scroll_top: f64,
    pub highlight: Highlight,
    pub tooltip: Option<TooltipView<'a>>,
}

impl TimelineFrame<'_> {
    /// Topmost bar under a point in content coordinates.
    pub fn bar_at(&self, x: f64, y: f64) -> Option<&LaidOutBar> {
        if y < 0.0 {
            return None;
        }
        let index = (y / self.row_height).floor() as usize;
        let row = self.rows.iter().find(|row| row.index == index)?;
        row.bars.iter().rev().find(|bar| bar.contains_x(x))
    }

    /// Whether a bar renders at full emphasis.
    pub fn is_emphasized(&self, bar: &LaidOutBar) -> bool {
        self.highlight.includes(&bar.id)
    }

    /// Track x of the "now" marker, if `now` falls inside the window.
    pub fn now_x(&self, now: DateTime<Utc>) -> Option<f64> {
        let ms = now.timestamp_millis();
        self.window
            .contains(ms)
            .then(|| self.scale.to_x(ms as f64))
    }
}

#[derive(Debug, Clone)]
pub struct TimelineController {
    window: WindowManager,
    resources: Vec<Resource>,
    items: Vec<ScheduleItem>,
    relations: RelationIndex,
    selection: SelectionState,
    tooltip: TooltipState,
    drag: Option<DragPan>,
    scroll_top: f64,
    viewport_height: Debounced<f64>,
    track_width: f64,
    visible_statuses: HashSet<ItemStatus>,
    hide_unrelated: bool,
    row_height: f64,
    overscan: usize,
}

impl TimelineController {
    pub fn new(config: &TimelineConfig, now: DateTime<Utc>) -> Self {
        Self {
            window: WindowManager::new(config.default_preset, config.tz(), now.timestamp_millis()),
            resources: Vec::new(),
            items: Vec::new(),
            relations: RelationIndex::default(),
            selection: SelectionState::default(),
            tooltip: TooltipState::new(config.hover_grace()),
            drag: None,
            scroll_top: 0.0,
            viewport_height: Debounced::new(0.0, config.viewport_debounce()),
            track_width: 1.0,
            visible_statuses: config.visible_set(),
            hide_unrelated: config.highlight_hides_unrelated,
            row_height: config.row_height.max(1.0),
            overscan: config.overscan,
        }
    }

    /// Apply one input event. Events are processed strictly one at a time.
    pub fn apply(&mut self, event: TimelineEvent, now: Instant) {
        match event {
            TimelineEvent::DataReplaced { resources, items } => self.replace_data(resources, items),
            TimelineEvent::PresetChanged(preset) => {
                self.window.set_preset(preset);
                tracing::debug!(?preset, window = ?self.window.window(), "preset changed");
            }
            TimelineEvent::FiltersChanged {
                visible_statuses,
                hide_unrelated,
            } => {
                self.visible_statuses = visible_statuses.into_iter().collect();
                self.hide_unrelated = hide_unrelated;
            }
            TimelineEvent::PanBy(direction) => self.window.pan_by(direction),
            TimelineEvent::SnapToToday { now } => self.window.snap_to_today(now.timestamp_millis()),
            TimelineEvent::Resized {
                track_width,
                viewport_height,
            } => {
                self.track_width = track_width.max(1.0);
                let viewport_height = viewport_height.max(0.0);
                // The first measurement is taken as-is; later ones settle first.
                if *self.viewport_height.get() <= 0.0 {
                    self.viewport_height.force(viewport_height);
                } else {
                    self.viewport_height.set(viewport_height, now);
                }
                self.scroll_top = self.clamp_scroll(self.scroll_top);
            }
            TimelineEvent::Scrolled { scroll_top } => self.scroll_top = self.clamp_scroll(scroll_top),
            TimelineEvent::PointerDown { x } => {
                self.drag = Some(DragPan::begin(x, self.window.window(), self.track_width));
            }
            TimelineEvent::PointerMoved { x } => {
                if let Some(window) = self.drag.as_mut().and_then(|drag| drag.window_at(x)) {
                    self.window.set_window(window);
                }
            }
            TimelineEvent::PointerReleased { target } => {
                let Some(drag) = self.drag.take() else {
                    return;
                };
                if drag.is_dragging() {
                    return;
                }
                match target {
                    HitTarget::Bar(id) if self.relations.contains(&id) => self.selection.click(&id),
                    _ => self.selection.clear(),
                }
            }
            TimelineEvent::BarEntered { item_id, anchor } => {
                let highlight = self.highlight();
                self.tooltip.enter_bar(&item_id, anchor, &highlight);
            }
            TimelineEvent::BarLeft { item_id } => self.tooltip.leave_bar(&item_id, now),
            TimelineEvent::TooltipEntered => self.tooltip.enter_tooltip(),
            TimelineEvent::TooltipLeft => self.tooltip.leave_tooltip(now),
            TimelineEvent::Escape => self.selection.clear(),
            TimelineEvent::Tick => {
                if self.viewport_height.poll(now) {
                    self.scroll_top = self.clamp_scroll(self.scroll_top);
                }
                self.tooltip.poll(now);
            }
        }
    }

    pub fn pan_by(&mut self, direction: PanDirection) {
        self.apply(TimelineEvent::PanBy(direction), Instant::now());
    }

    pub fn snap_to_today(&mut self, now: DateTime<Utc>) {
        self.apply(TimelineEvent::SnapToToday { now }, Instant::now());
    }

    pub fn set_preset(&mut self, preset: Preset) {
        self.apply(TimelineEvent::PresetChanged(preset), Instant::now());
    }

    fn replace_data(&mut self, resources: Vec<Resource>, items: Vec<ScheduleItem>) {
        self.relations = RelationIndex::build(&items);
        self.resources = resources;
        self.items = items;
        // A replaced item set invalidates any selection, even if the id survives.
        self.selection.clear();
        let stale_tooltip = self
            .tooltip
            .content()
            .is_some_and(|tip| !self.relations.contains(&tip.item_id));
        if stale_tooltip {
            self.tooltip.hide_now();
        }
        self.scroll_top = self.clamp_scroll(self.scroll_top);
        tracing::debug!(
            resources = self.resources.len(),
            items = self.items.len(),
            "schedule replaced"
        );
    }

    fn clamp_scroll(&self, scroll_top: f64) -> f64 {
        let max = (self.content_height() - *self.viewport_height.get()).max(0.0);
        scroll_top.clamp(0.0, max)
    }

    pub fn content_height(&self) -> f64 {
        self.resources.len() as f64 * self.row_height
    }

    pub fn window(&self) -> TimeWindow {
        self.window.window()
    }

    pub fn preset(&self) -> Preset {
        self.window.preset()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn tooltip_phase(&self) -> TooltipPhase {
        self.tooltip.phase()
    }

    pub fn tooltip(&self) -> Option<&TooltipContent> {
        self.tooltip.content()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some_and(|drag| drag.is_dragging())
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn items(&self) -> &[ScheduleItem] {
        &self.items
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> f64 {
        *self.viewport_height.get()
    }

    pub fn highlight(&self) -> Highlight {
        Highlight::resolve(&self.relations, &self.selection)
    }

    /// Earliest pending timer, for scheduling a wake-up.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.viewport_height.deadline(), self.tooltip.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn scale(&self) -> TimeScale {
        TimeScale::for_window(self.window.window(), self.track_width)
    }

    /// Derive the geometry for the current state.
    pub fn frame(&self) -> TimelineFrame<'_> {
        let window = self.window.window();
        let scale = self.scale();
        let ticks = plan_ticks(window, self.window.preset(), self.window.timezone(), &scale);
        let highlight = self.highlight();

        let row_range = visible_rows(
            self.scroll_top,
            *self.viewport_height.get(),
            self.row_height,
            self.resources.len(),
            self.overscan,
        );

        let rows = match row_range {
            Some(range) => {
                let slice = &self.resources[range.first..=range.last];
                let mut layout = layout_bars(&self.items, slice, &scale, &self.visible_statuses).into_rows();
                range
                    .iter()
                    .zip(slice)
                    .map(|(index, resource)| {
                        let mut bars = layout.remove(&resource.id).unwrap_or_default();
                        if self.hide_unrelated {
                            bars.retain(|bar| highlight.includes(&bar.id));
                        }
                        RowView {
                            index,
                            resource,
                            top: index as f64 * self.row_height,
                            bars,
                        }
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        let tooltip = self.tooltip.content().and_then(|content| {
            let item = self.items.iter().find(|item| item.id == content.item_id)?;
            let resource_name = self
                .resources
                .iter()
                .find(|r| r.id == item.resource_id)
                .map_or(item.resource_id.as_str(), |r| r.name.as_str());
            Some(TooltipView {
                content,
                item,
                resource_name,
            })
        });

        TimelineFrame {
            window,
            preset: self.window.preset(),
            tz: self.window.timezone(),
            scale,
            ticks,
            row_range,
            rows,
            row_height: self.row_height,
            content_height: self.content_height(),
            scroll_top: self.scroll_top,
            highlight,
            tooltip,
        }
    }
}
