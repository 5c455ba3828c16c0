//! Scrollbar instances keyed by container element.

use std::collections::HashMap;

use web_time::Instant;

use crate::config::Config;
use crate::dom::Dom;
use crate::error::{Result, VbarError};
use crate::event::{Input, Propagation};
use crate::geometry::{Axis, AxisState};
use crate::instance::{DestroyOptions, Instance, LifecycleState, RefreshOptions, ScrollTarget};

/// Owns the host document and every scrollbar bound in it.
///
/// A container has at most one live instance. Once destroyed, a container
/// stays retired and can't be bound again; the document keeps that mark so
/// no handle outlives its scrollbar.
pub struct Scrollbars<D: Dom> {
    dom: D,
    instances: HashMap<D::Node, Instance<D::Node>>,
}

impl<D: Dom> Scrollbars<D> {
    pub fn new(dom: D) -> Self {
        Self {
            dom,
            instances: HashMap::new(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Bind a new scrollbar to `container`.
    ///
    /// Unless the container is already bound, a failed bind releases the
    /// container handle.
    pub fn bind(&mut self, container: D::Node, config: Config) -> Result<()> {
        if self.instances.contains_key(&container) {
            return Err(VbarError::AlreadyInitialized);
        }
        if self.dom.is_retired(container) {
            self.dom.release(container);
            return Err(VbarError::Destroyed);
        }

        match Instance::initialize(&mut self.dom, container, config) {
            Ok(instance) => {
                self.instances.insert(container, instance);
                Ok(())
            }
            Err(e) => {
                self.dom.release(container);
                Err(e)
            }
        }
    }

    pub fn refresh(&mut self, container: D::Node, options: RefreshOptions) -> Result<()> {
        let instance = Self::live(&mut self.instances, &self.dom, container)?;
        instance.refresh(&mut self.dom, options);
        Ok(())
    }

    /// Destroy the scrollbar on `container`, returning the container.
    pub fn destroy(&mut self, container: D::Node, options: DestroyOptions) -> Result<D::Node> {
        match self.instances.remove(&container) {
            Some(instance) => {
                let container = instance.destroy(&mut self.dom, options);
                self.dom.retire(container);
                Ok(container)
            }
            None if self.dom.is_retired(container) => Err(VbarError::Destroyed),
            None => Err(VbarError::NotInitialized),
        }
    }

    pub fn scroll_to(
        &mut self,
        container: D::Node,
        target: ScrollTarget,
        x: Option<f64>,
    ) -> Result<()> {
        let instance = Self::live(&mut self.instances, &self.dom, container)?;
        instance.scroll_to(&mut self.dom, target, x)
    }

    /// Deliver an input raised by the host for the scrollbar owning
    /// `container`.
    ///
    /// Inputs for unknown or destroyed containers are dropped; a listener may
    /// still fire once while its removal is in flight.
    pub fn dispatch(&mut self, container: D::Node, input: Input) -> Propagation {
        match self.instances.get_mut(&container) {
            Some(instance) => instance.handle(&mut self.dom, input),
            None => {
                log::trace!("Dropping {:?} for {:?}, no live scrollbar", input, container);
                Propagation::Continue
            }
        }
    }

    /// Fire everything due on any instance. Returns how many callbacks ran.
    pub fn poll_timers(&mut self) -> usize {
        let mut fired = 0;
        for instance in self.instances.values_mut() {
            fired += instance.poll(&mut self.dom);
        }
        fired
    }

    /// Earliest deadline across all instances.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.instances
            .values()
            .filter_map(|instance| instance.next_deadline())
            .min()
    }

    pub fn state(&self, container: D::Node) -> LifecycleState {
        match self.instances.get(&container) {
            Some(instance) => instance.state(),
            None if self.dom.is_retired(container) => LifecycleState::Destroyed,
            None => LifecycleState::Uninitialized,
        }
    }

    /// Snapshot of one axis of the scrollbar on `container`.
    pub fn geometry(&self, container: D::Node, axis: Axis) -> Option<AxisState> {
        self.instances
            .get(&container)
            .map(|instance| *instance.axis(axis))
    }

    pub fn instance(&self, container: D::Node) -> Option<&Instance<D::Node>> {
        self.instances.get(&container)
    }

    /// Number of live scrollbars.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn live<'a>(
        instances: &'a mut HashMap<D::Node, Instance<D::Node>>,
        dom: &D,
        container: D::Node,
    ) -> Result<&'a mut Instance<D::Node>> {
        match instances.get_mut(&container) {
            Some(instance) => Ok(instance),
            None if dom.is_retired(container) => Err(VbarError::Destroyed),
            None => Err(VbarError::NotInitialized),
        }
    }
}
