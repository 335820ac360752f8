//! Tooltip hover state with a grace period between bar and tooltip.

use std::time::{Duration, Instant};

use super::relation::Highlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    Hidden,
    PendingHide,
    ShownOverBar,
    ShownOverTooltip,
}

/// What the tooltip shows and where it was anchored.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub item_id: String,
    pub anchor_x: f64,
    pub anchor_y: f64,
}

/// The tooltip is dismissed only once the pointer is neither over the bar
/// nor over the tooltip and the grace delay has run out.
#[derive(Debug, Clone)]
pub struct TooltipState {
    content: Option<TooltipContent>,
    hovered_bar: Option<String>,
    over_tooltip: bool,
    hide_at: Option<Instant>,
    grace: Duration,
}

impl TooltipState {
    pub fn new(grace: Duration) -> Self {
        Self {
            content: None,
            hovered_bar: None,
            over_tooltip: false,
            hide_at: None,
            grace,
        }
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    pub fn phase(&self) -> TooltipPhase {
        match (&self.content, self.hide_at) {
            (None, _) => TooltipPhase::Hidden,
            (Some(_), Some(_)) => TooltipPhase::PendingHide,
            (Some(_), None) if self.over_tooltip => TooltipPhase::ShownOverTooltip,
            (Some(_), None) => TooltipPhase::ShownOverBar,
        }
    }

    /// Returns `false` when the bar is gated out by an active highlight.
    pub fn enter_bar(&mut self, item_id: &str, anchor: (f64, f64), highlight: &Highlight) -> bool {
        if highlight.is_active() && !highlight.includes(item_id) {
            return false;
        }
        self.hovered_bar = Some(item_id.to_string());
        self.hide_at = None;
        self.content = Some(TooltipContent {
            item_id: item_id.to_string(),
            anchor_x: anchor.0,
            anchor_y: anchor.1,
        });
        true
    }

    /// Leaving a bar other than the hovered one is ignored.
    pub fn leave_bar(&mut self, item_id: &str, now: Instant) {
        if self.hovered_bar.as_deref() != Some(item_id) {
            return;
        }
        self.hovered_bar = None;
        self.schedule_hide(now);
    }

    pub fn enter_tooltip(&mut self) {
        if self.content.is_some() {
            self.over_tooltip = true;
            self.hide_at = None;
        }
    }

    pub fn leave_tooltip(&mut self, now: Instant) {
        if !self.over_tooltip {
            return;
        }
        self.over_tooltip = false;
        self.schedule_hide(now);
    }

    /// Fire the pending hide if it is due. Returns `true` if the tooltip
    /// was dismissed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(due) if due <= now && self.hovered_bar.is_none() && !self.over_tooltip => {
                self.hide_now();
                true
            }
            _ => false,
        }
    }

    pub fn hide_now(&mut self) {
        self.content = None;
        self.hovered_bar = None;
        self.over_tooltip = false;
        self.hide_at = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.hide_at
    }

    fn schedule_hide(&mut self, now: Instant) {
        if self.content.is_some() && self.hovered_bar.is_none() && !self.over_tooltip {
            self.hide_at = Some(now + self.grace);
        }
    }
}
