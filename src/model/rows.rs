//! Row virtualization: only rows near the viewport are laid out.

use std::time::{Duration, Instant};

/// Inclusive range of materialized rows plus the blank space around them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowRange {
    pub first: usize,
    pub last: usize,
    pub leading_px: f64,
    pub trailing_px: f64,
}

impl RowRange {
    pub fn count(&self) -> usize {
        self.last + 1 - self.first
    }

    pub fn contains(&self, row: usize) -> bool {
        row >= self.first && row <= self.last
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Rows to materialize for the given scroll state, or `None` without rows.
pub fn visible_rows(
    scroll_top: f64,
    viewport_height: f64,
    row_height: f64,
    row_count: usize,
    overscan: usize,
) -> Option<RowRange> {
    if row_count == 0 {
        return None;
    }
    let row_height = row_height.max(1.0);
    let scroll_top = scroll_top.max(0.0);
    let viewport_height = viewport_height.max(0.0);

    let first_visible = (scroll_top / row_height).floor() as usize;
    let visible_count = (viewport_height / row_height).ceil() as usize;

    let last_row = row_count - 1;
    let first = first_visible.saturating_sub(overscan).min(last_row);
    let last = first_visible
        .saturating_add(visible_count)
        .saturating_add(overscan)
        .min(last_row);

    Some(RowRange {
        first,
        last,
        leading_px: first as f64 * row_height,
        trailing_px: (last_row - last) as f64 * row_height,
    })
}

/// Holds a value back until it stops changing for `delay`.
/// A newer value replaces any pending one.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    value: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(value: T, delay: Duration) -> Self {
        Self {
            value,
            pending: None,
            delay,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T, now: Instant) {
        if self.pending.is_none() && value == self.value {
            return;
        }
        self.pending = Some((value, now + self.delay));
    }

    /// Replace the value immediately, dropping anything pending.
    pub fn force(&mut self, value: T) {
        self.value = value;
        self.pending = None;
    }

    /// Apply the pending value if its delay has passed. Returns `true` when
    /// the settled value changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some((value, due)) if due <= now => {
                let changed = value != self.value;
                self.value = value;
                changed
            }
            still_pending => {
                self.pending = still_pending;
                false
            }
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }
}
