//! vbar_web - Browser backend for vbar scrollbars
//!
//! [`WebDom`] implements the `vbar_core` document trait on top of `web-sys`.
//! It turns DOM events into engine inputs through a dispatch callback and
//! arms a single `setTimeout` for the engine's next deadline.

mod dom;
mod error;

pub use dom::{NodeId, WebDom};
pub use error::{Result, WebError};
