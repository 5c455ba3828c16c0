//! In-memory document.
//!
//! [`MemoryDom`] keeps a small element tree with fixed metrics, a manual
//! clock and a record of every listener, observer and node handle held by
//! the core. Scroll offsets are
//! clamped like a browser would. Events are never raised by the document
//! itself; the driver dispatches them explicitly.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::time::Duration;

use web_time::Instant;

use crate::dom::{Dom, ElementMetrics, Rect, StyleProperty, StyleTarget};
use crate::error::Result;
use crate::event::{Channel, Target};
use crate::probe::UserAgent;

/// Handle of an element in a [`MemoryDom`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Debug, Clone, Default)]
struct MemoryNode {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    styles: BTreeMap<StyleProperty, String>,
    metrics: ElementMetrics,
    rect: Rect,
}

/// A recorded listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub owner: NodeId,
    pub target: Target<NodeId>,
    pub channel: Channel,
}

pub struct MemoryDom {
    nodes: Vec<MemoryNode>,
    body: NodeId,
    body_styles: BTreeMap<StyleProperty, String>,
    start: Instant,
    elapsed: Duration,
    listeners: Vec<Listener>,
    observers: HashMap<NodeId, NodeId>,
    held: BTreeSet<NodeId>,
    retired: HashSet<NodeId>,
    mutation_support: bool,
    scrollbar_width: f64,
    user_agent: UserAgent,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Empty document with a body, classic 17px scrollbars and mutation
    /// observation.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            body: NodeId(0),
            body_styles: BTreeMap::new(),
            start: Instant::now(),
            elapsed: Duration::ZERO,
            listeners: Vec::new(),
            observers: HashMap::new(),
            held: BTreeSet::new(),
            retired: HashSet::new(),
            mutation_support: true,
            scrollbar_width: 17.0,
            user_agent: UserAgent::default(),
        };
        dom.body = dom.create_node("body");
        dom
    }

    /// Width reported by the scrollbar probe; 0 simulates overlay scrollbars.
    pub fn with_scrollbar_width(mut self, width: f64) -> Self {
        self.scrollbar_width = width;
        self
    }

    pub fn with_user_agent(mut self, user_agent: UserAgent) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Simulate an environment without mutation observation.
    pub fn without_mutation_observer(mut self) -> Self {
        self.mutation_support = false;
        self
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn create_node(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(MemoryNode {
            tag: tag.to_string(),
            ..Default::default()
        });
        id
    }

    /// Build a container of `container_height` px holding one content child
    /// whose full height is `content_height`, attached to the body.
    pub fn scroll_container(&mut self, container_height: f64, content_height: f64) -> (NodeId, NodeId) {
        let container = self.create_node("div");
        let content = self.create_node("div");
        let body = self.body;
        self.append_child(body, container);
        self.append_child(container, content);

        self.set_client_size(container, 300.0, container_height);
        self.set_scroll_size(container, 300.0, container_height);
        self.set_client_size(content, 300.0, container_height);
        self.set_scroll_size(content, 300.0, content_height);
        self.set_rect(container, Rect::new(0.0, 0.0, 300.0, container_height));
        (container, content)
    }

    pub fn set_client_size(&mut self, node: NodeId, width: f64, height: f64) {
        if let Some(node) = self.node_mut(node) {
            node.metrics.client_width = width;
            node.metrics.client_height = height;
        }
    }

    /// Change the full scrollable size, re-clamping the scroll offsets.
    pub fn set_scroll_size(&mut self, node: NodeId, width: f64, height: f64) {
        if let Some(node) = self.node_mut(node) {
            node.metrics.scroll_width = width;
            node.metrics.scroll_height = height;
            node.metrics.scroll_top = clamp_scroll(
                node.metrics.scroll_top,
                node.metrics.scroll_height,
                node.metrics.client_height,
            );
            node.metrics.scroll_left = clamp_scroll(
                node.metrics.scroll_left,
                node.metrics.scroll_width,
                node.metrics.client_width,
            );
        }
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(node) = self.node_mut(node) {
            node.rect = rect;
        }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, duration: Duration) {
        self.elapsed += duration;
    }

    /// Time since the document was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    /// Children of `node` without handing out handles.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Handles given to the core and not yet released.
    pub fn held_handles(&self) -> Vec<NodeId> {
        self.held.iter().copied().collect()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        match self.node(node) {
            Some(node) => &node.classes,
            None => &[],
        }
    }

    pub fn style(&self, node: NodeId, property: StyleProperty) -> Option<&str> {
        self.node(node)
            .and_then(|n| n.styles.get(&property))
            .map(String::as_str)
    }

    pub fn body_style(&self, property: StyleProperty) -> Option<&str> {
        self.body_styles.get(&property).map(String::as_str)
    }

    /// Current native scroll offsets as `(left, top)`.
    pub fn scroll_position(&self, node: NodeId) -> (f64, f64) {
        let metrics = self.metrics(node);
        (metrics.scroll_left, metrics.scroll_top)
    }

    /// Listeners registered on behalf of `owner`.
    pub fn listeners(&self, owner: NodeId) -> Vec<Listener> {
        self.listeners
            .iter()
            .filter(|l| l.owner == owner)
            .copied()
            .collect()
    }

    pub fn has_listener(&self, owner: NodeId, target: Target<NodeId>, channel: Channel) -> bool {
        self.listeners
            .iter()
            .any(|l| l.owner == owner && l.target == target && l.channel == channel)
    }

    /// Registrations across all owners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_observed(&self, owner: NodeId) -> bool {
        self.observers.contains_key(&owner)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|c| *c != child);
        }
        if let Some(child) = self.node_mut(child) {
            child.parent = None;
        }
    }
}

fn clamp_scroll(value: f64, scroll_size: f64, client_size: f64) -> f64 {
    let max = (scroll_size - client_size).max(0.0);
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    fn element_children(&mut self, node: NodeId) -> Vec<NodeId> {
        let children = self.children(node);
        self.held.extend(children.iter().copied());
        children
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        let node = self.create_node(tag);
        self.held.insert(node);
        Ok(node)
    }

    fn release(&mut self, node: NodeId) {
        self.held.remove(&node);
    }

    fn retire(&mut self, container: NodeId) {
        self.retired.insert(container);
        self.release(container);
    }

    fn is_retired(&self, container: NodeId) -> bool {
        self.retired.contains(&container)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        } else {
            log::debug!("{:?} is not a child of {:?}", child, parent);
        }
    }

    fn metrics(&self, node: NodeId) -> ElementMetrics {
        self.node(node).map(|n| n.metrics).unwrap_or_default()
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.node(node).map(|n| n.rect).unwrap_or_default()
    }

    fn set_scroll_top(&mut self, node: NodeId, value: f64) {
        if let Some(node) = self.node_mut(node) {
            let m = &mut node.metrics;
            m.scroll_top = clamp_scroll(value, m.scroll_height, m.client_height);
        }
    }

    fn set_scroll_left(&mut self, node: NodeId, value: f64) {
        if let Some(node) = self.node_mut(node) {
            let m = &mut node.metrics;
            m.scroll_left = clamp_scroll(value, m.scroll_width, m.client_width);
        }
    }

    fn set_style(&mut self, target: StyleTarget<NodeId>, property: StyleProperty, value: Option<&str>) {
        let styles = match target {
            StyleTarget::Body => &mut self.body_styles,
            StyleTarget::Node(node) => match self.node_mut(node) {
                Some(node) => &mut node.styles,
                None => return,
            },
        };
        match value {
            Some(value) => {
                styles.insert(property, value.to_string());
            }
            None => {
                styles.remove(&property);
            }
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(node) = self.node_mut(node) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(node) = self.node_mut(node) {
            node.classes.retain(|c| c != class);
        }
    }

    fn add_listener(&mut self, owner: NodeId, target: Target<NodeId>, channel: Channel) {
        self.listeners.push(Listener {
            owner,
            target,
            channel,
        });
    }

    fn remove_listener(&mut self, owner: NodeId, target: Target<NodeId>, channel: Channel) {
        let wanted = Listener {
            owner,
            target,
            channel,
        };
        if let Some(index) = self.listeners.iter().position(|l| *l == wanted) {
            self.listeners.remove(index);
        }
    }

    fn observe_mutations(&mut self, owner: NodeId, content: NodeId) -> bool {
        if !self.mutation_support {
            return false;
        }
        self.observers.insert(owner, content);
        true
    }

    fn disconnect_mutations(&mut self, owner: NodeId) {
        self.observers.remove(&owner);
    }

    fn user_agent(&self) -> UserAgent {
        self.user_agent.clone()
    }

    fn native_scrollbar_width(&mut self, _parent: NodeId) -> f64 {
        self.scrollbar_width
    }
}
