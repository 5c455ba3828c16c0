//! `web-sys` implementation of the scrollbar document trait.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Array, Map, Object, Reflect, WeakSet};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, MouseEvent, MutationObserver,
    MutationObserverInit, WheelEvent, Window,
};
use web_time::Instant;

use vbar_core::{
    Channel, Dom, ElementMetrics, Input, MouseButton, Point, PointerEvent, Propagation, Rect,
    StyleProperty, StyleTarget, Target, UserAgent,
};

use crate::error::{Result, WebError};

/// Prefixes written alongside properties older engines only know prefixed.
const VENDOR_PREFIXES: &[&str] = &["-webkit-", "-moz-", "-ms-"];

/// Handle of an element known to a [`WebDom`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

type Dispatch = Rc<dyn Fn(NodeId, Input) -> Propagation>;

struct Registration {
    owner: NodeId,
    target: Target<NodeId>,
    channel: Channel,
    closure: Closure<dyn FnMut(Event)>,
}

struct Observer {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

/// The browser document.
///
/// Elements are interned into [`NodeId`]s the first time they are seen and
/// forgotten again when released. Every DOM event the engine listens to is
/// forwarded to the dispatch callback given to [`WebDom::new`] along with
/// the owning container.
pub struct WebDom {
    window: Window,
    document: Document,
    // element -> id, keyed by JS object identity
    ids: Map,
    nodes: RefCell<HashMap<NodeId, Element>>,
    next_id: Cell<u32>,
    retired: WeakSet,
    dispatch: Dispatch,
    listeners: Vec<Registration>,
    observers: HashMap<NodeId, Observer>,
    // detached but possibly still on the JS stack
    retired_listeners: Vec<Closure<dyn FnMut(Event)>>,
    retired_observers: Vec<Observer>,
    tick: Closure<dyn FnMut()>,
    timer: Option<i32>,
}

impl WebDom {
    /// Attach to the current window.
    ///
    /// `dispatch` receives every input; `tick` runs when the timer armed by
    /// [`WebDom::schedule`] fires.
    pub fn new(
        dispatch: impl Fn(NodeId, Input) -> Propagation + 'static,
        tick: impl Fn() + 'static,
    ) -> Result<Self> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let tick = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);

        Ok(Self {
            window,
            document,
            ids: Map::new(),
            nodes: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            retired: WeakSet::new(),
            dispatch: Rc::new(dispatch),
            listeners: Vec::new(),
            observers: HashMap::new(),
            retired_listeners: Vec::new(),
            retired_observers: Vec::new(),
            tick,
            timer: None,
        })
    }

    /// Handle for `element`, creating one if it is new.
    pub fn intern(&self, element: &Element) -> NodeId {
        if let Some(node) = self.lookup(element) {
            return node;
        }
        let node = NodeId(self.next_id.get());
        self.next_id.set(node.0.wrapping_add(1));
        self.ids.set(element.as_ref(), &JsValue::from(node.0));
        self.nodes.borrow_mut().insert(node, element.clone());
        node
    }

    /// Handle for `element` if one is held.
    pub fn lookup(&self, element: &Element) -> Option<NodeId> {
        self.ids
            .get(element.as_ref())
            .as_f64()
            .map(|id| NodeId(id as u32))
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(&node).cloned()
    }

    /// Whether the scrollbar once bound to `element` has been destroyed.
    pub fn is_retired_element(&self, element: &Element) -> bool {
        self.retired.has(element.unchecked_ref::<Object>())
    }

    /// Number of elements currently held.
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Drop callbacks detached during earlier dispatches.
    ///
    /// Call at the start of every dispatch, never from inside a callback
    /// that may itself have been detached.
    pub fn release_retired(&mut self) {
        self.retired_listeners.clear();
        self.retired_observers.clear();
    }

    /// Arm the timer for `deadline`, replacing any armed one.
    pub fn schedule(&mut self, deadline: Option<Instant>) {
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let Some(deadline) = deadline else {
            return;
        };

        let delay = deadline.saturating_duration_since(Instant::now());
        let millis = i32::try_from(delay.as_micros().div_ceil(1000)).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.tick.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => self.timer = Some(handle),
            Err(err) => log::warn!("Failed to arm timer: {}", WebError::js(err)),
        }
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn event_target(&self, target: Target<NodeId>) -> Option<EventTarget> {
        match target {
            Target::Node(node) => self.element(node).map(JsCast::unchecked_into),
            Target::Document => Some(self.document.clone().unchecked_into()),
            Target::Window => Some(self.window.clone().unchecked_into()),
        }
    }

    fn create_html(&self, tag: &str) -> Result<HtmlElement> {
        self.document
            .create_element(tag)
            .map_err(WebError::js)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| WebError::Js(format!("<{}> is not an HTML element", tag)))
    }

    /// Measure a scrollbar in a hidden 100x10 wrapper inside `parent`.
    fn measure_scrollbar(&self, parent: NodeId) -> Result<f64> {
        let parent: Element = match self.element(parent) {
            Some(element) => element,
            None => self.document.body().ok_or(WebError::NoBody)?.into(),
        };

        let wrapper = self.create_html("div")?;
        let child = self.create_html("div")?;
        let style = wrapper.style();
        for (name, value) in [
            ("display", "block"),
            ("box-sizing", "content-box"),
            ("position", "absolute"),
            ("pointer-events", "none"),
            ("opacity", "0"),
            ("bottom", "0"),
            ("right", "0"),
            ("width", "100px"),
            ("height", "10px"),
            ("overflow", "hidden"),
        ] {
            style.set_property(name, value).map_err(WebError::js)?;
        }
        wrapper.append_child(&child).map_err(WebError::js)?;
        parent.append_child(&wrapper).map_err(WebError::js)?;

        let measured = measure_inside(&wrapper, &child);
        parent.remove_child(&wrapper).map_err(WebError::js)?;
        measured
    }
}

/// Width lost to the scrollbar once the wrapper scrolls.
fn measure_inside(wrapper: &HtmlElement, child: &HtmlElement) -> Result<f64> {
    let full_width = child.offset_width();
    wrapper
        .style()
        .set_property("overflow-y", "scroll")
        .map_err(WebError::js)?;
    // Safari only shows the bar when the child actually overflows
    let style = child.style();
    style.set_property("height", "20px").map_err(WebError::js)?;
    style.set_property("width", "100%").map_err(WebError::js)?;
    Ok(f64::from(full_width - child.offset_width()))
}

/// Read a scroll offset without truncating fractional values.
fn scroll_offset(element: &Element, property: &str) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str(property))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
}

fn write_scroll_offset(element: &Element, property: &str, value: f64) {
    if let Err(err) = Reflect::set(
        element.as_ref(),
        &JsValue::from_str(property),
        &JsValue::from_f64(value),
    ) {
        log::warn!("Failed to set {}: {}", property, WebError::js(err));
    }
}

fn to_input(channel: Channel, event: &Event) -> Option<Input> {
    match channel {
        Channel::Scroll => Some(Input::Scroll),
        Channel::Resize => Some(Input::Resize),
        Channel::Wheel => {
            let wheel = event.dyn_ref::<WheelEvent>()?;
            Some(Input::Wheel {
                delta_x: wheel.delta_x(),
                delta_y: wheel.delta_y(),
            })
        }
        Channel::DragStart | Channel::DragMove | Channel::DragEnd => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            let pointer = PointerEvent::new(
                MouseButton::from_dom(mouse.button()),
                Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())),
                Point::new(f64::from(mouse.offset_x()), f64::from(mouse.offset_y())),
            );
            Some(match channel {
                Channel::DragStart => Input::PointerDown(pointer),
                Channel::DragMove => Input::PointerMove(pointer),
                _ => Input::PointerUp(pointer),
            })
        }
    }
}

impl Dom for WebDom {
    type Node = NodeId;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn element_children(&mut self, node: NodeId) -> Vec<NodeId> {
        let Some(element) = self.element(node) else {
            return Vec::new();
        };
        let children = element.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .map(|child| self.intern(&child))
            .collect()
    }

    fn create_element(&mut self, tag: &str) -> vbar_core::Result<NodeId> {
        let element = self.document.create_element(tag).map_err(WebError::js)?;
        Ok(self.intern(&element))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child)) {
            if let Err(err) = parent.append_child(&child) {
                log::warn!("Failed to append element: {}", WebError::js(err));
            }
        }
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(parent_element), Some(child_element)) =
            (self.element(parent), self.element(child))
        {
            if let Err(err) = parent_element.remove_child(&child_element) {
                log::debug!("Failed to remove element: {}", WebError::js(err));
            }
        }
    }

    fn release(&mut self, node: NodeId) {
        if let Some(element) = self.nodes.borrow_mut().remove(&node) {
            self.ids.delete(element.as_ref());
        }
    }

    fn retire(&mut self, container: NodeId) {
        if let Some(element) = self.element(container) {
            self.retired.add(element.unchecked_ref::<Object>());
        }
        self.release(container);
    }

    // A retired handle is released at once, so callers holding only the
    // element ask `is_retired_element` instead.
    fn is_retired(&self, container: NodeId) -> bool {
        self.element(container)
            .is_some_and(|element| self.is_retired_element(&element))
    }

    fn metrics(&self, node: NodeId) -> ElementMetrics {
        let Some(element) = self.element(node) else {
            return ElementMetrics::default();
        };
        ElementMetrics {
            client_width: f64::from(element.client_width()),
            client_height: f64::from(element.client_height()),
            scroll_width: f64::from(element.scroll_width()),
            scroll_height: f64::from(element.scroll_height()),
            scroll_left: scroll_offset(&element, "scrollLeft"),
            scroll_top: scroll_offset(&element, "scrollTop"),
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.element(node)
            .map(|element| {
                let rect = element.get_bounding_client_rect();
                Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
            })
            .unwrap_or_default()
    }

    fn set_scroll_top(&mut self, node: NodeId, value: f64) {
        if let Some(element) = self.element(node) {
            write_scroll_offset(&element, "scrollTop", value);
        }
    }

    fn set_scroll_left(&mut self, node: NodeId, value: f64) {
        if let Some(element) = self.element(node) {
            write_scroll_offset(&element, "scrollLeft", value);
        }
    }

    fn set_style(
        &mut self,
        target: StyleTarget<NodeId>,
        property: StyleProperty,
        value: Option<&str>,
    ) {
        let element = match target {
            StyleTarget::Body => self.document.body(),
            StyleTarget::Node(node) => self.html(node),
        };
        let Some(element) = element else {
            return;
        };

        let style = element.style();
        let name = property.css_name();
        let mut names: Vec<String> = Vec::new();
        if property.needs_vendor_prefixes() {
            names.extend(
                VENDOR_PREFIXES
                    .iter()
                    .map(|prefix| format!("{}{}", prefix, name)),
            );
        }
        names.push(name.to_string());

        for name in &names {
            let result = match value {
                Some(value) => style.set_property(name, value),
                None => style.remove_property(name).map(|_| ()),
            };
            if let Err(err) = result {
                log::debug!("Failed to set style {}: {}", name, WebError::js(err));
            }
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            if let Err(err) = element.class_list().add_1(class) {
                log::warn!("Failed to add class '{}': {}", class, WebError::js(err));
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            if let Err(err) = element.class_list().remove_1(class) {
                log::warn!("Failed to remove class '{}': {}", class, WebError::js(err));
            }
        }
    }

    fn add_listener(&mut self, owner: NodeId, target: Target<NodeId>, channel: Channel) {
        let Some(event_target) = self.event_target(target) else {
            log::warn!("No element to listen on for {}", channel.event_type());
            return;
        };

        let dispatch = Rc::clone(&self.dispatch);
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let Some(input) = to_input(channel, &event) else {
                return;
            };
            if dispatch(owner, input) == Propagation::PreventDefault {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);

        if let Err(err) = event_target
            .add_event_listener_with_callback(channel.event_type(), closure.as_ref().unchecked_ref())
        {
            log::warn!(
                "Failed to listen for {}: {}",
                channel.event_type(),
                WebError::js(err)
            );
            return;
        }

        self.listeners.push(Registration {
            owner,
            target,
            channel,
            closure,
        });
    }

    fn remove_listener(&mut self, owner: NodeId, target: Target<NodeId>, channel: Channel) {
        let Some(index) = self
            .listeners
            .iter()
            .position(|r| r.owner == owner && r.target == target && r.channel == channel)
        else {
            return;
        };
        let registration = self.listeners.remove(index);

        if let Some(event_target) = self.event_target(target) {
            if let Err(err) = event_target.remove_event_listener_with_callback(
                channel.event_type(),
                registration.closure.as_ref().unchecked_ref(),
            ) {
                log::debug!(
                    "Failed to stop listening for {}: {}",
                    channel.event_type(),
                    WebError::js(err)
                );
            }
        }
        // may be the closure currently running
        self.retired_listeners.push(registration.closure);
    }

    fn observe_mutations(&mut self, owner: NodeId, content: NodeId) -> bool {
        let supported =
            Reflect::has(&self.window, &JsValue::from_str("MutationObserver")).unwrap_or(false);
        if !supported {
            return false;
        }
        let Some(content) = self.element(content) else {
            return false;
        };

        let dispatch = Rc::clone(&self.dispatch);
        let callback = Closure::wrap(Box::new(move |_records: Array, _observer: MutationObserver| {
            dispatch(owner, Input::Mutation);
        }) as Box<dyn FnMut(Array, MutationObserver)>);

        let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                log::debug!("MutationObserver unavailable: {}", WebError::js(err));
                return false;
            }
        };

        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_character_data(true);
        init.set_subtree(true);
        if let Err(err) = observer.observe_with_options(&content, &init) {
            log::debug!("Failed to observe content: {}", WebError::js(err));
            return false;
        }

        self.observers.insert(
            owner,
            Observer {
                observer,
                _callback: callback,
            },
        );
        true
    }

    fn disconnect_mutations(&mut self, owner: NodeId) {
        if let Some(observer) = self.observers.remove(&owner) {
            observer.observer.disconnect();
            self.retired_observers.push(observer);
        }
    }

    fn user_agent(&self) -> UserAgent {
        let navigator = self.window.navigator();
        UserAgent::new(
            navigator.user_agent().unwrap_or_default(),
            Reflect::get(&navigator, &JsValue::from_str("vendor"))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default(),
        )
    }

    fn native_scrollbar_width(&mut self, parent: NodeId) -> f64 {
        match self.measure_scrollbar(parent) {
            Ok(width) => width,
            Err(err) => {
                log::debug!("Scrollbar width probe failed: {}", err);
                0.0
            }
        }
    }
}
