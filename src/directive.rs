//! Template-binding lifecycle for scrollbars.
//!
//! Frameworks call into a [`Directive`] when a bound element is inserted,
//! when its component re-renders and when it is unbound. Every failure is
//! reported to the log and swallowed so a broken scrollbar never takes the
//! page down with it.

use web_time::Instant;

use vbar_core::constants::LOG_PREFIX;
use vbar_core::{
    Config, DestroyOptions, Dom, Input, LifecycleState, Propagation, RefreshOptions, ScrollTarget,
    Scrollbars,
};

pub struct Directive<D: Dom> {
    scrollbars: Scrollbars<D>,
}

impl<D: Dom> Directive<D> {
    pub fn new(dom: D) -> Self {
        Self {
            scrollbars: Scrollbars::new(dom),
        }
    }

    /// Bind a scrollbar to a freshly inserted `container`.
    ///
    /// `options` is the JSON options object from the binding. Invalid
    /// options fall back to the defaults. Returns whether a scrollbar is
    /// now live on the container.
    pub fn inserted(&mut self, container: D::Node, options: Option<&str>) -> bool {
        let config = match options.map(Config::from_json).transpose() {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                log::warn!("{} Ignoring invalid options: {}", LOG_PREFIX, e);
                Config::default()
            }
        };

        match self.scrollbars.bind(container, config) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{} {}", LOG_PREFIX, e);
                false
            }
        }
    }

    /// The owning component re-rendered; recompute on the next tick.
    pub fn component_updated(&mut self, container: D::Node) {
        if self.is_live(container) {
            self.refresh(container, RefreshOptions::default());
        }
    }

    /// The element is leaving the document. Styles are left alone since the
    /// nodes are about to go away anyway.
    pub fn unbind(&mut self, container: D::Node) {
        if self.is_live(container) {
            self.destroy(container, DestroyOptions { skip_styles: true });
        }
    }

    pub fn refresh(&mut self, container: D::Node, options: RefreshOptions) {
        if let Err(e) = self.scrollbars.refresh(container, options) {
            log::warn!("{} {}", LOG_PREFIX, e);
        }
    }

    pub fn destroy(&mut self, container: D::Node, options: DestroyOptions) {
        if let Err(e) = self.scrollbars.destroy(container, options) {
            log::warn!("{} {}", LOG_PREFIX, e);
        }
    }

    pub fn scroll_to(&mut self, container: D::Node, target: ScrollTarget, x: Option<f64>) {
        if let Err(e) = self.scrollbars.scroll_to(container, target, x) {
            log::warn!("{} {}", LOG_PREFIX, e);
        }
    }

    pub fn dispatch(&mut self, container: D::Node, input: Input) -> Propagation {
        self.scrollbars.dispatch(container, input)
    }

    pub fn poll_timers(&mut self) -> usize {
        self.scrollbars.poll_timers()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scrollbars.next_deadline()
    }

    pub fn dom(&self) -> &D {
        self.scrollbars.dom()
    }

    pub fn dom_mut(&mut self) -> &mut D {
        self.scrollbars.dom_mut()
    }

    pub fn scrollbars(&self) -> &Scrollbars<D> {
        &self.scrollbars
    }

    fn is_live(&self, container: D::Node) -> bool {
        matches!(
            self.scrollbars.state(container),
            LifecycleState::Active | LifecycleState::Dragging
        )
    }
}
