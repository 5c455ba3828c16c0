//! Host document abstraction.
//!
//! Everything an instance reads from or writes to the document goes through
//! [`Dom`]. The browser backend lives in `vbar_web`; [`crate::MemoryDom`]
//! implements the same trait in memory for headless hosts and tests.

use std::fmt::Debug;
use std::hash::Hash;

use web_time::Instant;

use crate::error::Result;
use crate::event::{Channel, Target};
use crate::probe::UserAgent;

/// Size and scroll metrics of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementMetrics {
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

/// Bounding box relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }
}

/// Inline style properties the scrollbar touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    Position,
    Overflow,
    OverflowX,
    OverflowY,
    BoxSizing,
    Display,
    Height,
    Top,
    MarginRight,
    PaddingRight,
    UserSelect,
}

impl StyleProperty {
    /// CSS property name.
    pub fn css_name(&self) -> &'static str {
        match self {
            StyleProperty::Position => "position",
            StyleProperty::Overflow => "overflow",
            StyleProperty::OverflowX => "overflow-x",
            StyleProperty::OverflowY => "overflow-y",
            StyleProperty::BoxSizing => "box-sizing",
            StyleProperty::Display => "display",
            StyleProperty::Height => "height",
            StyleProperty::Top => "top",
            StyleProperty::MarginRight => "margin-right",
            StyleProperty::PaddingRight => "padding-right",
            StyleProperty::UserSelect => "user-select",
        }
    }

    /// Whether older engines only understand a vendor-prefixed form.
    pub fn needs_vendor_prefixes(&self) -> bool {
        matches!(self, StyleProperty::BoxSizing | StyleProperty::UserSelect)
    }
}

/// Element whose inline style is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTarget<N> {
    Node(N),
    /// The document body
    Body,
}

/// Document operations used by the scrollbar core.
///
/// Implementations own node identity: `Node` is a cheap handle that stays
/// valid for as long as the element is alive in the host document.
pub trait Dom {
    type Node: Copy + Eq + Hash + Debug;

    /// Current time of the host clock.
    fn now(&self) -> Instant;

    /// Element children of `node`, in document order.
    ///
    /// The handles stay held until passed to [`Dom::release`].
    fn element_children(&mut self, node: Self::Node) -> Vec<Self::Node>;

    /// Create a detached element, held like a child handle.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node>;

    /// The core keeps no reference to `node` any more; the host may forget
    /// the handle and let the element go.
    fn release(&mut self, node: Self::Node);

    /// Mark `container` as having had its scrollbar destroyed, then release
    /// it. The mark must not keep the element alive.
    fn retire(&mut self, container: Self::Node);

    fn is_retired(&self, container: Self::Node) -> bool;

    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    fn remove_child(&mut self, parent: Self::Node, child: Self::Node);

    fn metrics(&self, node: Self::Node) -> ElementMetrics;

    fn bounding_rect(&self, node: Self::Node) -> Rect;

    fn set_scroll_top(&mut self, node: Self::Node, value: f64);

    fn set_scroll_left(&mut self, node: Self::Node, value: f64);

    /// Set an inline style; `None` removes it.
    fn set_style(
        &mut self,
        target: StyleTarget<Self::Node>,
        property: StyleProperty,
        value: Option<&str>,
    );

    fn add_class(&mut self, node: Self::Node, class: &str);

    fn remove_class(&mut self, node: Self::Node, class: &str);

    /// Start delivering `channel` events from `target` to the instance bound
    /// to `owner`.
    fn add_listener(&mut self, owner: Self::Node, target: Target<Self::Node>, channel: Channel);

    fn remove_listener(&mut self, owner: Self::Node, target: Target<Self::Node>, channel: Channel);

    /// Watch `content` for child and text changes on behalf of `owner`.
    ///
    /// Returns false when the environment has no mutation observation.
    fn observe_mutations(&mut self, owner: Self::Node, content: Self::Node) -> bool;

    fn disconnect_mutations(&mut self, owner: Self::Node);

    fn user_agent(&self) -> UserAgent;

    /// Width of a native vertical scrollbar inside `parent`; 0 for overlay or
    /// hidden scrollbars.
    fn native_scrollbar_width(&mut self, parent: Self::Node) -> f64;
}
