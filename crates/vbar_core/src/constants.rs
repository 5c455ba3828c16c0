//! Centralized constants for vbar_core
//!
//! Default option values and the fixed pixel estimates used when the
//! environment can't be measured.

// =============================================================================
// Rate limiting (milliseconds)
// =============================================================================

/// Throttle interval for the native scroll channel
pub const DEFAULT_SCROLL_THROTTLE_MS: u64 = 10;

/// Throttle interval for the drag-move channel
pub const DEFAULT_DRAGGER_THROTTLE_MS: u64 = 10;

/// Debounce delay for window resize refreshes
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 100;

/// Throttle interval for content mutation refreshes
pub const DEFAULT_OBSERVER_THROTTLE_MS: u64 = 100;

/// Longest interval or delay an option may ask for (about 49 days)
pub const MAX_INTERVAL_MS: u64 = u32::MAX as u64;

// =============================================================================
// Transient visual states (milliseconds)
// =============================================================================

/// How long the scrolling-phantom class outlives the last scroll
pub const DEFAULT_SCROLLING_PHANTOM_DELAY_MS: u64 = 1000;

/// How long the dragging-phantom class outlives the end of a drag
pub const DEFAULT_DRAGGING_PHANTOM_DELAY_MS: u64 = 1000;

/// Added to the scroll throttle before the scrolling class is cleared,
/// so a steady stream of throttled scrolls keeps the class on
pub const SCROLLING_CLASS_GRACE_MS: u64 = 5;

// =============================================================================
// Native scrollbar hiding (pixels)
// =============================================================================

/// Width hidden past the container edge when the native scrollbar reports
/// zero width (overlay or hidden scrollbars)
pub const FALLBACK_SCROLLBAR_WIDTH: f64 = 20.0;

/// Right padding added to content when overlay scrollbars are overridden
pub const OVERLAY_SCROLLBAR_PADDING: f64 = 20.0;

// =============================================================================
// Class names
// =============================================================================

pub const CONTAINER_CLASS: &str = "vb";
pub const CONTAINER_VISIBLE_CLASS: &str = "vb-visible";
pub const CONTAINER_INVISIBLE_CLASS: &str = "vb-invisible";
pub const CONTAINER_SCROLLING_CLASS: &str = "vb-scrolling";
pub const CONTAINER_SCROLLING_PHANTOM_CLASS: &str = "vb-scrolling-phantom";
pub const CONTAINER_DRAGGING_CLASS: &str = "vb-dragging";
pub const CONTAINER_DRAGGING_PHANTOM_CLASS: &str = "vb-dragging-phantom";
pub const CONTENT_CLASS: &str = "vb-content";
pub const DRAGGER_CLASS: &str = "vb-dragger";
pub const DRAGGER_STYLER_CLASS: &str = "vb-dragger-styler";

/// Prefix for every message reported to the host console
pub const LOG_PREFIX: &str = "[vbar]";
