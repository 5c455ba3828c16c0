//! Scroll offset and dragger geometry
//!
//! Pure calculations mapping container/content metrics to dragger size and
//! position, in both directions:
//! - native scroll offset → dragger offset (scroll events, refresh)
//! - dragger offset → native scroll offset (pointer drags)
//!
//! The two directions are exact inverses so a drag and the scroll events it
//! causes never pull the dragger apart. Values stay unrounded here; rounding
//! happens once, when a pixel value is written (see [`px`]).

use crate::dom::ElementMetrics;

/// Scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Y,
    X,
}

impl Axis {
    /// Short name used in log output
    pub fn name(&self) -> &'static str {
        match self {
            Axis::Y => "y",
            Axis::X => "x",
        }
    }
}

/// Live metrics of one axis, read from the container and content elements
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisMetrics {
    /// Visible size of the container (the dragger track length)
    pub container_client: f64,
    /// Visible size of the content element
    pub content_client: f64,
    /// Full scrollable size of the content element
    pub content_scroll: f64,
    /// Current native scroll offset of the content element
    pub scroll_offset: f64,
}

impl AxisMetrics {
    /// Pick one axis out of container and content element metrics.
    pub fn from_elements(axis: Axis, container: &ElementMetrics, content: &ElementMetrics) -> Self {
        match axis {
            Axis::Y => Self {
                container_client: container.client_height,
                content_client: content.client_height,
                content_scroll: content.scroll_height,
                scroll_offset: content.scroll_top,
            },
            Axis::X => Self {
                container_client: container.client_width,
                content_client: content.client_width,
                content_scroll: content.scroll_width,
                scroll_offset: content.scroll_left,
            },
        }
    }

    /// Number of pixels the content can scroll (may be zero or negative)
    pub fn scrollable_distance(&self) -> f64 {
        self.content_scroll - self.container_client
    }
}

/// Per-axis scrollbar state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisState {
    /// Position of the dragger along the track in px
    pub bar_offset: f64,
    /// Length of the dragger in px (0 when no scrolling is needed)
    pub bar_base_size: f64,
    /// Pointer offset inside the dragger when the drag started
    pub bar_click_offset: f64,
    /// Scroll position as a fraction of the scrollable distance (0.0 to 1.0)
    pub scroll_percent: f64,
    /// Native scroll offset in px
    pub scroll_offset: f64,
    /// Visible size divided by full scrollable size, at most 1.0
    pub visible_ratio: f64,
}

impl AxisState {
    /// Whether the content overflows and the dragger is shown
    pub fn is_scrollable(&self) -> bool {
        self.visible_ratio < 1.0
    }

    /// Distance the dragger can travel along the track
    pub fn track_travel(&self, metrics: &AxisMetrics) -> f64 {
        (metrics.container_client - self.bar_base_size).max(0.0)
    }

    /// `visible_ratio = content_client / content_scroll`, clamped to 1.0.
    pub fn compute_visible_ratio(&mut self, metrics: &AxisMetrics) {
        self.visible_ratio = if metrics.content_scroll > 0.0 {
            (metrics.content_client / metrics.content_scroll).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    /// Dragger length proportional to the visible ratio, 0 when nothing scrolls.
    pub fn compute_bar_base_size(&mut self, metrics: &AxisMetrics) {
        self.bar_base_size = if self.is_scrollable() {
            (metrics.container_client * self.visible_ratio).max(0.0)
        } else {
            0.0
        };
    }

    /// Scroll → dragger: derive the dragger offset from the native scroll offset.
    pub fn compute_bar_offset_from_scroll(&mut self, metrics: &AxisMetrics) {
        self.scroll_offset = metrics.scroll_offset;
        self.scroll_percent = ratio(metrics.scroll_offset, metrics.scrollable_distance());
        self.bar_offset = self.track_travel(metrics) * self.scroll_percent;
    }

    /// Drag: place the dragger under the pointer, keeping the grab point fixed.
    ///
    /// `pointer` is relative to the container's leading edge. The result is
    /// clamped so the dragger never leaves the track.
    pub fn compute_bar_offset_from_drag(&mut self, pointer: f64, metrics: &AxisMetrics) {
        let unclamped = pointer - self.bar_click_offset;
        self.bar_offset = if unclamped.is_finite() {
            unclamped.clamp(0.0, self.track_travel(metrics))
        } else {
            0.0
        };
    }

    /// Dragger → scroll: inverse of [`Self::compute_bar_offset_from_scroll`].
    pub fn compute_scroll_from_bar(&mut self, metrics: &AxisMetrics) {
        self.scroll_percent = ratio(self.bar_offset, self.track_travel(metrics));
        self.scroll_offset = self.scroll_percent * metrics.scrollable_distance().max(0.0);
    }

    /// Full pass: ratio, base size, then scroll-derived offset.
    pub fn recompute(&mut self, metrics: &AxisMetrics) {
        self.compute_visible_ratio(metrics);
        self.compute_bar_base_size(metrics);
        self.compute_bar_offset_from_scroll(metrics);
    }
}

/// `value / total` clamped to `[0, 1]`; 0 when the total is not positive.
fn ratio(value: f64, total: f64) -> f64 {
    if total > 0.0 && value.is_finite() {
        (value / total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Whether a wheel event must be suppressed to keep an outer scroll area still.
///
/// True when the content is already at its start and the wheel moves up, or
/// already at its end and the wheel moves down.
pub fn blocks_parent_scroll(state: &AxisState, metrics: &AxisMetrics, delta: f64) -> bool {
    if !state.is_scrollable() {
        return false;
    }

    let at_start = metrics.scroll_offset <= 0.0;
    let at_end = metrics.scroll_offset >= metrics.scrollable_distance();

    (at_start && delta < 0.0) || (at_end && delta > 0.0)
}

/// Format a length as a whole-pixel CSS value.
pub fn px(value: f64) -> String {
    let rounded = if value.is_finite() { value.round() } else { 0.0 };
    format!("{}px", rounded as i64)
}
