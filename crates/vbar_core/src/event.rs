//! Inputs delivered to a scrollbar instance by its host.

/// A point in CSS pixels.
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

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            other => MouseButton::Other(other.unsigned_abs()),
        }
    }
}

/// Pointer position carried by mouse inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub button: MouseButton,
    /// Position relative to the viewport
    pub client: Point,
    /// Position relative to the element the event was dispatched on
    pub offset: Point,
}

impl PointerEvent {
    pub fn new(button: MouseButton, client: Point, offset: Point) -> Self {
        Self {
            button,
            client,
            offset,
        }
    }
}

/// Events that drive a scrollbar instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// Native scroll of the content element.
    Scroll,
    /// Wheel over the content element.
    Wheel { delta_x: f64, delta_y: f64 },
    /// Mouse button pressed on the dragger.
    PointerDown(PointerEvent),
    /// Mouse moved anywhere in the document.
    PointerMove(PointerEvent),
    /// Mouse button released anywhere in the document.
    PointerUp(PointerEvent),
    /// Window resized.
    Resize,
    /// Children or text of the content subtree changed.
    Mutation,
}

impl Input {
    /// Listener channel that delivers this input; `None` for mutations,
    /// which arrive through the mutation observer.
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Input::Scroll => Some(Channel::Scroll),
            Input::Wheel { .. } => Some(Channel::Wheel),
            Input::PointerDown(_) => Some(Channel::DragStart),
            Input::PointerMove(_) => Some(Channel::DragMove),
            Input::PointerUp(_) => Some(Channel::DragEnd),
            Input::Resize => Some(Channel::Resize),
            Input::Mutation => None,
        }
    }
}

/// What the host should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    /// Suppress the event's default action.
    PreventDefault,
}

/// Listener channels an instance attaches through its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// `scroll` on the content element
    Scroll,
    /// `wheel` on the content element
    Wheel,
    /// `mousedown` on the dragger
    DragStart,
    /// `mousemove` on the document, only while dragging
    DragMove,
    /// `mouseup` on the document, only while dragging
    DragEnd,
    /// `resize` on the window
    Resize,
}

impl Channel {
    /// DOM event type listened for.
    pub fn event_type(&self) -> &'static str {
        match self {
            Channel::Scroll => "scroll",
            Channel::Wheel => "wheel",
            Channel::DragStart => "mousedown",
            Channel::DragMove => "mousemove",
            Channel::DragEnd => "mouseup",
            Channel::Resize => "resize",
        }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target<N> {
    Node(N),
    Document,
    Window,
}
