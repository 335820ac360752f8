use super::window::TimeWindow;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Linear mapping between epoch milliseconds and track pixels.
///
/// Stateless: rebuild it whenever the window or the track width changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start_ms: f64,
    end_ms: f64,
    width_px: f64,
}

impl TimeScale {
    /// Widths below one pixel (an unmeasured viewport) are clamped to 1.
    pub fn new(start_ms: i64, end_ms: i64, width_px: f64) -> Self {
        let width_px = if width_px.is_finite() { width_px.max(1.0) } else { 1.0 };
        let end_ms = end_ms.max(start_ms + 1);
        Self {
            start_ms: start_ms as f64,
            end_ms: end_ms as f64,
            width_px,
        }
    }

    pub fn for_window(window: TimeWindow, width_px: f64) -> Self {
        Self::new(window.start_ms, window.end_ms, width_px)
    }

    pub fn width(&self) -> f64 {
        self.width_px
    }

    pub fn span_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    /// Pixel offset of an instant. Not clamped: off-screen instants map
    /// outside `[0, width]`.
    pub fn to_x(&self, timestamp_ms: f64) -> f64 {
        (timestamp_ms - self.start_ms) * self.width_px / self.span_ms()
    }

    pub fn to_timestamp(&self, x: f64) -> f64 {
        self.start_ms + x * self.span_ms() / self.width_px
    }

    /// Milliseconds covered by one pixel.
    pub fn ms_per_px(&self) -> f64 {
        self.span_ms() / self.width_px
    }

    pub fn pixels_per_hour(&self) -> f64 {
        self.width_px * MS_PER_HOUR / self.span_ms()
    }
}
