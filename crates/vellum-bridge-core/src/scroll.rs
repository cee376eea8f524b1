//! Caret visibility arithmetic.
//!
//! All inputs come from asynchronous script probes plus the native scroll
//! position; the computation itself is pure so it can be tested without a
//! runtime.

/// Pixels shaved off the line height to approximate the glyph's visible box.
pub const CURSOR_HEIGHT_DEFLATION: i32 = 4;

/// A point in the host scroll surface's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Inputs to one caret visibility computation.
#[derive(Debug, Clone, Copy)]
pub struct CaretMetrics {
    /// Height of the visible region (client height probe).
    pub visible_height: i32,
    /// Line height in pixels; falls back to the mirrored value when the
    /// probe returns nothing usable.
    pub line_height: i32,
    /// Caret Y offset relative to the visible region. Negative when the
    /// caret sits above it.
    pub caret_y: i32,
    /// Current vertical scroll offset of the host surface.
    pub scroll_y: f64,
}

/// Compute the vertical scroll target that keeps the caret visible.
///
/// Returns `None` when the caret is already inside the visible region and no
/// adjustment is needed. The horizontal offset is never changed.
pub fn scroll_adjustment(metrics: &CaretMetrics) -> Option<f64> {
    let cursor_height = metrics.line_height - CURSOR_HEIGHT_DEFLATION;
    if metrics.caret_y + cursor_height > metrics.visible_height {
        // Caret ran past the bottom edge; scroll down far enough that the
        // full line fits.
        Some(f64::from(metrics.caret_y + metrics.line_height - metrics.visible_height) + metrics.scroll_y)
    } else if metrics.caret_y < 0 {
        // Caret is above the visible region; scroll up, clamped at the top.
        Some((metrics.scroll_y + f64::from(metrics.caret_y)).max(0.0))
    } else {
        None
    }
}
