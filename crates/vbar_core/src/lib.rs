//! vbar_core - Custom scrollbar engine
//!
//! Keeps a custom dragger in sync with the native scroll position of a
//! content element, in both directions, under scroll, drag, resize and
//! content-mutation input. The engine is host agnostic: documents are
//! reached through the [`Dom`] trait and time is driven by the host through
//! [`Scrollbars::poll_timers`].

pub mod config;
pub mod constants;
pub mod dom;
mod error;
pub mod event;
pub mod geometry;
mod instance;
mod memory;
pub mod probe;
pub mod rate_limit;
mod registry;
pub mod timers;

#[cfg(test)]
mod tests;

pub use config::{ClassNames, Config, ConfigError, LogLevel};
pub use dom::{Dom, ElementMetrics, Rect, StyleProperty, StyleTarget};
pub use error::{Result, VbarError};
pub use event::{Channel, Input, MouseButton, Point, PointerEvent, Propagation, Target};
pub use geometry::{Axis, AxisMetrics, AxisState};
pub use instance::{
    DestroyOptions, Elements, Instance, LifecycleState, RefreshOptions, ScrollTarget,
};
pub use memory::{Listener, MemoryDom, NodeId};
pub use probe::{BrowserInfo, Environment, UserAgent};
pub use registry::Scrollbars;
