//! vbar - Custom scrollbars for scrollable elements
//!
//! Hides an element's native scrollbar and draws a styleable dragger in its
//! place, kept in sync with the native scroll position. The engine lives in
//! `vbar_core`; this crate adds the template-binding lifecycle and, on
//! wasm32, the JavaScript entry points backed by the browser document.

mod directive;

pub use directive::Directive;
pub use vbar_core::{
    Config, DestroyOptions, LifecycleState, LogLevel, RefreshOptions, ScrollTarget, VbarError,
};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
