//! A single scrollbar bound to one container element.
//!
//! The instance owns the per-axis geometry, the rate limiters feeding it and
//! every timeout it schedules. All document access goes through the [`Dom`]
//! passed into each call, so the instance itself holds nothing but node
//! handles.

use std::fmt::Debug;
use std::hash::Hash;

use web_time::Instant;

use crate::config::Config;
use crate::constants::OVERLAY_SCROLLBAR_PADDING;
use crate::dom::{Dom, StyleProperty, StyleTarget};
use crate::error::{Result, VbarError};
use crate::event::{Channel, Input, MouseButton, PointerEvent, Propagation, Target};
use crate::geometry::{blocks_parent_scroll, px, Axis, AxisMetrics, AxisState};
use crate::probe::Environment;
use crate::rate_limit::{Debounce, Throttle};
use crate::timers::{Timeout, Timeouts};

/// Where a container is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Active,
    /// A pointer drag of the dragger is in progress
    Dragging,
    /// Torn down; the container can't be bound again
    Destroyed,
}

/// Options for [`Instance::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshOptions {
    /// Run a geometry pass now in addition to the deferred one
    pub immediate: bool,
}

/// Options for [`Instance::destroy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DestroyOptions {
    /// Leave layout styles in place (host transitions may still be running)
    pub skip_styles: bool,
}

/// Vertical destination for [`Instance::scroll_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollTarget {
    Top,
    Bottom,
    /// Native scroll offset in px
    Offset(f64),
}

/// Elements an instance works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elements<N> {
    /// Clipping element the directive is bound to
    pub container: N,
    /// The container's only child, natively scrolled
    pub content: N,
    /// Created thumb, appended to the container
    pub dragger: N,
    /// Created child of the dragger carrying the visual style
    pub styler: N,
}

/// Source of the next due piece of deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    Scroll,
    DragMove,
    Resize,
    Mutation,
    Timeout,
}

pub struct Instance<N> {
    config: Config,
    elements: Elements<N>,
    environment: Environment,
    y: AxisState,
    x: AxisState,
    dragging: Option<Axis>,
    listeners: Vec<(Target<N>, Channel)>,
    observing: bool,
    scroll_throttle: Throttle<()>,
    drag_throttle: Throttle<PointerEvent>,
    resize_debounce: Debounce<()>,
    mutation_throttle: Throttle<()>,
    timeouts: Timeouts,
}

impl<N: Copy + Eq + Hash + Debug> Instance<N> {
    /// Build a scrollbar inside `container`.
    ///
    /// The container must have exactly one element child, which becomes the
    /// scrolled content. On error nothing in the document has been touched
    /// and every handle taken here is released again.
    pub fn initialize<D: Dom<Node = N>>(dom: &mut D, container: N, config: Config) -> Result<Self> {
        let children = dom.element_children(container);
        let content = match children.as_slice() {
            [content] => *content,
            _ => {
                for child in &children {
                    dom.release(*child);
                }
                return Err(VbarError::MissingContent {
                    found: children.len(),
                });
            }
        };

        let environment = Environment::detect(dom, content);
        log::debug!(
            "Environment for {:?}: {:?}, native scrollbar {}px",
            container,
            environment.browser,
            environment.native_scrollbar_width
        );

        let styler = match dom.create_element("div") {
            Ok(styler) => styler,
            Err(e) => {
                dom.release(content);
                return Err(e);
            }
        };
        let dragger = match dom.create_element("div") {
            Ok(dragger) => dragger,
            Err(e) => {
                dom.release(styler);
                dom.release(content);
                return Err(e);
            }
        };
        dom.add_class(dragger, &config.classes.dragger_class);
        dom.set_style(
            StyleTarget::Node(dragger),
            StyleProperty::Position,
            Some("absolute"),
        );
        dom.add_class(styler, &config.classes.dragger_styler_class);
        dom.append_child(dragger, styler);
        dom.append_child(container, dragger);

        let mut instance = Self {
            scroll_throttle: Throttle::new(config.scroll_interval()),
            drag_throttle: Throttle::new(config.drag_interval()),
            resize_debounce: Debounce::new(config.resize_delay()),
            mutation_throttle: Throttle::new(config.observer_interval()),
            config,
            elements: Elements {
                container,
                content,
                dragger,
                styler,
            },
            environment,
            y: AxisState::default(),
            x: AxisState::default(),
            dragging: None,
            listeners: Vec::new(),
            observing: false,
            timeouts: Timeouts::new(),
        };

        instance.attach(dom, Target::Node(content), Channel::Scroll);
        instance.attach(dom, Target::Node(dragger), Channel::DragStart);
        if instance.config.prevent_parent_scroll {
            instance.attach(dom, Target::Node(content), Channel::Wheel);
        }
        if instance.config.resize_refresh {
            instance.attach(dom, Target::Window, Channel::Resize);
        }

        instance.observing = dom.observe_mutations(container, content);
        if !instance.observing {
            log::debug!("Mutation observation unavailable, relying on refresh calls");
        }

        instance.apply_styles(dom);
        instance.refresh(dom, RefreshOptions { immediate: true });

        log::debug!("Scrollbar initialized on {:?}", container);
        Ok(instance)
    }

    /// Recompute geometry now (if `immediate`) and once more after the
    /// current update batch.
    pub fn refresh<D: Dom<Node = N>>(&mut self, dom: &mut D, options: RefreshOptions) {
        if options.immediate {
            self.geometry_pass(dom);
        }
        self.timeouts.set(Timeout::DeferredRefresh, dom.now());
    }

    /// Feed one input into the instance.
    ///
    /// Inputs for channels the instance never attached are ignored.
    pub fn handle<D: Dom<Node = N>>(&mut self, dom: &mut D, input: Input) -> Propagation {
        let delivered = match input.channel() {
            Some(channel) => self.is_attached(channel),
            None => self.observing,
        };
        if !delivered {
            log::trace!("Ignoring {:?}, channel not attached", input);
            return Propagation::Continue;
        }

        let now = dom.now();
        match input {
            Input::Scroll => {
                if self.scroll_throttle.call(now, ()).is_some() {
                    self.on_scroll(dom);
                }
            }
            Input::Wheel { delta_y, .. } => return self.on_wheel(dom, delta_y),
            Input::PointerDown(event) => self.on_drag_start(dom, event),
            Input::PointerMove(event) => {
                if let Some(event) = self.drag_throttle.call(now, event) {
                    self.on_drag_move(dom, event);
                }
            }
            Input::PointerUp(_) => self.on_drag_end(dom),
            Input::Resize => {
                if self.resize_debounce.call(now, ()).is_some() {
                    self.refresh(dom, RefreshOptions::default());
                }
            }
            Input::Mutation => {
                if self.mutation_throttle.call(now, ()).is_some() {
                    self.refresh(dom, RefreshOptions::default());
                }
            }
        }
        Propagation::Continue
    }

    /// Run every deferred call and timeout that is due, earliest first.
    ///
    /// Returns how many fired.
    pub fn poll<D: Dom<Node = N>>(&mut self, dom: &mut D) -> usize {
        let mut fired = 0;
        loop {
            let now = dom.now();
            let Some((due, source)) = self.next_due() else {
                break;
            };
            if due > now {
                break;
            }

            match source {
                Due::Scroll => {
                    if self.scroll_throttle.poll(now).is_some() {
                        self.on_scroll(dom);
                    }
                }
                Due::DragMove => {
                    if let Some(event) = self.drag_throttle.poll(now) {
                        if self.dragging.is_some() {
                            self.on_drag_move(dom, event);
                        }
                    }
                }
                Due::Resize => {
                    if self.resize_debounce.poll(now).is_some() {
                        self.refresh(dom, RefreshOptions::default());
                    }
                }
                Due::Mutation => {
                    if self.mutation_throttle.poll(now).is_some() {
                        self.refresh(dom, RefreshOptions::default());
                    }
                }
                Due::Timeout => {
                    if let Some(timeout) = self.timeouts.pop_due(now) {
                        self.on_timeout(dom, timeout);
                    }
                }
            }
            fired += 1;
        }
        fired
    }

    /// Earliest instant at which [`Self::poll`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_due().map(|(due, _)| due)
    }

    /// Set the native scroll position of the content.
    ///
    /// The dragger follows through the scroll event the host raises.
    pub fn scroll_to<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        target: ScrollTarget,
        x: Option<f64>,
    ) -> Result<()> {
        let content = self.elements.content;
        let top = match target {
            ScrollTarget::Top => 0.0,
            ScrollTarget::Bottom => dom.metrics(content).scroll_height,
            ScrollTarget::Offset(offset) => valid_offset(offset)?,
        };
        let left = x.map(valid_offset).transpose()?;

        dom.set_scroll_top(content, top);
        if let Some(left) = left {
            dom.set_scroll_left(content, left);
        }
        Ok(())
    }

    /// Tear the scrollbar down and hand back the container.
    ///
    /// Every listener, observer and timer owned by the instance is released
    /// before this returns.
    pub fn destroy<D: Dom<Node = N>>(mut self, dom: &mut D, options: DestroyOptions) -> N {
        let Elements {
            container,
            content,
            dragger,
            styler,
        } = self.elements;

        for (target, channel) in self.listeners.drain(..) {
            dom.remove_listener(container, target, channel);
        }
        if self.observing {
            dom.disconnect_mutations(container);
        }

        if self.dragging.take().is_some() {
            self.set_user_select(dom, None);
        }

        for (_, class) in self.config.classes.container_states() {
            dom.remove_class(container, class);
        }
        dom.remove_class(content, &self.config.classes.content_class);

        if !options.skip_styles {
            for property in [StyleProperty::Position, StyleProperty::Overflow] {
                dom.set_style(StyleTarget::Node(container), property, None);
            }
            for property in [
                StyleProperty::BoxSizing,
                StyleProperty::Display,
                StyleProperty::OverflowX,
                StyleProperty::OverflowY,
                StyleProperty::Height,
                StyleProperty::MarginRight,
                StyleProperty::PaddingRight,
            ] {
                dom.set_style(StyleTarget::Node(content), property, None);
            }
        }

        dom.remove_child(dragger, styler);
        dom.remove_child(container, dragger);
        for node in [styler, dragger, content] {
            dom.release(node);
        }

        let cleared = self.timeouts.clear_all();
        self.scroll_throttle.reset();
        self.drag_throttle.reset();
        self.resize_debounce.cancel();
        self.mutation_throttle.reset();

        log::debug!(
            "Scrollbar destroyed on {:?} ({} pending timeouts dropped)",
            container,
            cleared
        );
        container
    }

    pub fn state(&self) -> LifecycleState {
        if self.dragging.is_some() {
            LifecycleState::Dragging
        } else {
            LifecycleState::Active
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::Y => &self.y,
            Axis::X => &self.x,
        }
    }

    /// Axis currently being dragged.
    pub fn dragging(&self) -> Option<Axis> {
        self.dragging
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn elements(&self) -> &Elements<N> {
        &self.elements
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Whether content mutations are being watched.
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Listeners currently attached through the host.
    pub fn attached_channels(&self) -> &[(Target<N>, Channel)] {
        &self.listeners
    }

    fn is_attached(&self, channel: Channel) -> bool {
        self.listeners.iter().any(|(_, c)| *c == channel)
    }

    fn attach<D: Dom<Node = N>>(&mut self, dom: &mut D, target: Target<N>, channel: Channel) {
        dom.add_listener(self.elements.container, target, channel);
        self.listeners.push((target, channel));
    }

    fn detach<D: Dom<Node = N>>(&mut self, dom: &mut D, channel: Channel) {
        let container = self.elements.container;
        self.listeners.retain(|(target, c)| {
            if *c == channel {
                dom.remove_listener(container, *target, *c);
                false
            } else {
                true
            }
        });
    }

    fn next_due(&self) -> Option<(Instant, Due)> {
        [
            (self.timeouts.deadline(), Due::Timeout),
            (self.scroll_throttle.deadline(), Due::Scroll),
            (self.drag_throttle.deadline(), Due::DragMove),
            (self.resize_debounce.deadline(), Due::Resize),
            (self.mutation_throttle.deadline(), Due::Mutation),
        ]
        .into_iter()
        .filter_map(|(deadline, source)| deadline.map(|due| (due, source)))
        .min_by_key(|(due, _)| *due)
    }

    fn metrics<D: Dom<Node = N>>(&self, dom: &D, axis: Axis) -> AxisMetrics {
        let container = dom.metrics(self.elements.container);
        let content = dom.metrics(self.elements.content);
        AxisMetrics::from_elements(axis, &container, &content)
    }

    /// Layout that pushes the native scrollbar past the clipped edge.
    fn apply_styles<D: Dom<Node = N>>(&self, dom: &mut D) {
        let Elements {
            container, content, ..
        } = self.elements;
        let classes = &self.config.classes;

        dom.add_class(container, &classes.container_class);
        let container_styles = [
            (StyleProperty::Position, "relative"),
            (StyleProperty::Overflow, "hidden"),
        ];
        for (property, value) in container_styles {
            dom.set_style(StyleTarget::Node(container), property, Some(value));
        }

        dom.add_class(content, &classes.content_class);
        let content_styles = [
            (StyleProperty::BoxSizing, "content-box"),
            (StyleProperty::Display, "block"),
            (StyleProperty::OverflowX, "hidden"),
            (StyleProperty::OverflowY, "scroll"),
            (StyleProperty::Height, "100%"),
        ];
        for (property, value) in content_styles {
            dom.set_style(StyleTarget::Node(content), property, Some(value));
        }

        let overlay = self.environment.has_overlay_scrollbar();
        if overlay && !self.config.override_floating_scrollbar {
            log::debug!("Overlay scrollbar left visible");
            return;
        }

        let margin = format!("-{}", px(self.environment.width_to_hide()));
        dom.set_style(
            StyleTarget::Node(content),
            StyleProperty::MarginRight,
            Some(&margin),
        );
        if overlay {
            dom.set_style(
                StyleTarget::Node(content),
                StyleProperty::PaddingRight,
                Some(&px(OVERLAY_SCROLLBAR_PADDING)),
            );
        }
    }

    /// Ratio, base size and scroll-derived offset, then write the dragger.
    fn geometry_pass<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        let metrics = self.metrics(dom, Axis::Y);
        self.y.recompute(&metrics);
        self.update_dragger(dom, false);
    }

    fn update_dragger<D: Dom<Node = N>>(&mut self, dom: &mut D, with_scrolling_classes: bool) {
        let Elements {
            container, dragger, ..
        } = self.elements;

        dom.set_style(
            StyleTarget::Node(dragger),
            StyleProperty::Height,
            Some(&px(self.y.bar_base_size)),
        );
        dom.set_style(
            StyleTarget::Node(dragger),
            StyleProperty::Top,
            Some(&px(self.y.bar_offset)),
        );

        let classes = &self.config.classes;
        if self.y.is_scrollable() {
            dom.remove_class(container, &classes.container_invisible_class);
            dom.add_class(container, &classes.container_visible_class);
        } else {
            dom.remove_class(container, &classes.container_visible_class);
            dom.add_class(container, &classes.container_invisible_class);
        }

        if with_scrolling_classes {
            let now = dom.now();
            dom.add_class(container, &classes.container_scrolling_class);
            self.timeouts.set(
                Timeout::ScrollingClass,
                now + self.config.scrolling_class_delay(),
            );
            dom.add_class(container, &classes.container_scrolling_phantom_class);
            self.timeouts.set(
                Timeout::ScrollingPhantomClass,
                now + self.config.scrolling_phantom_class_delay(),
            );
        }
    }

    fn on_scroll<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        let metrics = self.metrics(dom, Axis::Y);
        // content may have changed size without a resize or mutation
        self.y.compute_visible_ratio(&metrics);
        self.y.compute_bar_base_size(&metrics);

        if self.dragging.is_some() {
            log::trace!("Scroll during drag, dragger left to the pointer");
            return;
        }
        self.y.compute_bar_offset_from_scroll(&metrics);
        self.update_dragger(dom, true);
    }

    fn on_wheel<D: Dom<Node = N>>(&mut self, dom: &mut D, delta_y: f64) -> Propagation {
        let metrics = self.metrics(dom, Axis::Y);
        if blocks_parent_scroll(&self.y, &metrics, delta_y) {
            log::trace!("Wheel at scroll edge suppressed");
            Propagation::PreventDefault
        } else {
            Propagation::Continue
        }
    }

    fn on_drag_start<D: Dom<Node = N>>(&mut self, dom: &mut D, event: PointerEvent) {
        if event.button != MouseButton::Left {
            log::trace!("Ignoring {:?} button press on dragger", event.button);
            return;
        }
        if self.dragging.is_some() {
            return;
        }

        self.dragging = Some(Axis::Y);
        self.y.bar_click_offset = event.offset.y;
        self.set_user_select(dom, Some("none"));

        let container = self.elements.container;
        let classes = &self.config.classes;
        dom.add_class(container, &classes.container_dragging_class);
        self.timeouts.clear(Timeout::DraggingPhantomClass);
        dom.add_class(container, &classes.container_dragging_phantom_class);

        self.attach(dom, Target::Document, Channel::DragMove);
        self.attach(dom, Target::Document, Channel::DragEnd);
        log::debug!("Drag started on {:?}", container);
    }

    /// Dragger first, then the native scroll offset that follows from it.
    fn on_drag_move<D: Dom<Node = N>>(&mut self, dom: &mut D, event: PointerEvent) {
        let metrics = self.metrics(dom, Axis::Y);
        let pointer = event.client.y - dom.bounding_rect(self.elements.container).top();

        self.y.compute_bar_offset_from_drag(pointer, &metrics);
        self.update_dragger(dom, false);
        self.y.compute_scroll_from_bar(&metrics);
        dom.set_scroll_top(self.elements.content, self.y.scroll_offset);
    }

    fn on_drag_end<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        if self.dragging.is_none() {
            return;
        }
        if let Some(event) = self.drag_throttle.flush() {
            self.on_drag_move(dom, event);
        }
        self.drag_throttle.reset();
        self.dragging = None;
        self.set_user_select(dom, None);

        let container = self.elements.container;
        dom.remove_class(container, &self.config.classes.container_dragging_class);
        self.timeouts.set(
            Timeout::DraggingPhantomClass,
            dom.now() + self.config.dragging_phantom_class_delay(),
        );

        self.detach(dom, Channel::DragMove);
        self.detach(dom, Channel::DragEnd);
        log::debug!("Drag ended on {:?}", container);
    }

    fn on_timeout<D: Dom<Node = N>>(&mut self, dom: &mut D, timeout: Timeout) {
        let classes = &self.config.classes;
        let class = match timeout {
            Timeout::ScrollingClass => &classes.container_scrolling_class,
            Timeout::ScrollingPhantomClass => &classes.container_scrolling_phantom_class,
            Timeout::DraggingPhantomClass => &classes.container_dragging_phantom_class,
            Timeout::DeferredRefresh => return self.geometry_pass(dom),
        };
        dom.remove_class(self.elements.container, class);
    }

    fn set_user_select<D: Dom<Node = N>>(&self, dom: &mut D, value: Option<&str>) {
        dom.set_style(
            StyleTarget::Node(self.elements.container),
            StyleProperty::UserSelect,
            value,
        );
        if self.config.unselectable_body {
            dom.set_style(StyleTarget::Body, StyleProperty::UserSelect, value);
        }
    }
}

fn valid_offset(offset: f64) -> Result<f64> {
    if offset.is_finite() && offset >= 0.0 {
        Ok(offset)
    } else {
        Err(VbarError::InvalidScrollPosition(offset))
    }
}
