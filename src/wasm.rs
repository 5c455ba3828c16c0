use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use vbar_core::constants::LOG_PREFIX;
use vbar_core::{
    DestroyOptions, Input, LogLevel, Propagation, RefreshOptions, ScrollTarget, VbarError,
};
use vbar_web::{NodeId, WebDom};

use crate::Directive;

thread_local! {
    static RUNTIME: RefCell<Option<Directive<WebDom>>> = const { RefCell::new(None) };
}

/// Run `f` against the page-wide directive, creating it on first use, then
/// re-arm the timer for whatever became pending.
fn with_runtime<R>(f: impl FnOnce(&mut Directive<WebDom>) -> R) -> Option<R> {
    RUNTIME.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            log::warn!("{} Dropping re-entrant call", LOG_PREFIX);
            return None;
        };

        if slot.is_none() {
            match WebDom::new(dispatch_event, on_tick) {
                Ok(dom) => *slot = Some(Directive::new(dom)),
                Err(e) => {
                    log::error!("{} {}", LOG_PREFIX, e);
                    return None;
                }
            }
        }
        let directive = slot.as_mut()?;

        directive.dom_mut().release_retired();
        let result = f(directive);
        let deadline = directive.next_deadline();
        directive.dom_mut().schedule(deadline);
        Some(result)
    })
}

fn dispatch_event(container: NodeId, input: Input) -> Propagation {
    with_runtime(|directive| directive.dispatch(container, input)).unwrap_or_default()
}

fn on_tick() {
    with_runtime(|directive| {
        let fired = directive.poll_timers();
        log::trace!("{} Timer tick ran {} callbacks", LOG_PREFIX, fired);
    });
}

/// Run `f` for an element the page already bound, warning otherwise.
fn with_bound(element: &Element, f: impl FnOnce(&mut Directive<WebDom>, NodeId)) {
    with_runtime(|directive| match directive.dom().lookup(element) {
        Some(node) => f(directive, node),
        None if directive.dom().is_retired_element(element) => {
            log::warn!("{} {}", LOG_PREFIX, VbarError::Destroyed)
        }
        None => log::warn!("{} {}", LOG_PREFIX, VbarError::NotInitialized),
    });
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Warn).is_err() {
        web_sys::console::warn_1(&format!("{} Logger already initialized", LOG_PREFIX).into());
    }
}

/// Change how much the scrollbars report to the console.
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) {
    match level.parse::<LogLevel>() {
        Ok(level) => log::set_max_level(level.to_level_filter()),
        Err(e) => log::warn!("{} {}", LOG_PREFIX, e),
    }
}

/// Bind a scrollbar to `element`. `options` is an options object or
/// `undefined`.
#[wasm_bindgen]
pub fn bind(element: &Element, options: JsValue) -> bool {
    let options = if options.is_undefined() || options.is_null() {
        None
    } else {
        match js_sys::JSON::stringify(&options) {
            Ok(json) => Some(String::from(json)),
            Err(_) => {
                log::warn!("{} Options aren't serializable, using defaults", LOG_PREFIX);
                None
            }
        }
    };

    with_runtime(|directive| {
        let node = directive.dom().intern(element);
        let bound = directive.inserted(node, options.as_deref());
        log::trace!(
            "{} {} elements held",
            LOG_PREFIX,
            directive.dom().node_count()
        );
        bound
    })
    .unwrap_or(false)
}

/// The component owning `element` re-rendered.
#[wasm_bindgen]
pub fn update(element: &Element) {
    with_runtime(|directive| {
        if let Some(node) = directive.dom().lookup(element) {
            directive.component_updated(node);
        }
    });
}

/// `element` is leaving the page.
#[wasm_bindgen]
pub fn unbind(element: &Element) {
    with_runtime(|directive| {
        if let Some(node) = directive.dom().lookup(element) {
            directive.unbind(node);
        }
    });
}

#[wasm_bindgen]
pub fn refresh(element: &Element, immediate: Option<bool>) {
    let options = RefreshOptions {
        immediate: immediate.unwrap_or(false),
    };
    with_bound(element, |directive, node| directive.refresh(node, options));
}

#[wasm_bindgen]
pub fn destroy(element: &Element, skip_styles: Option<bool>) {
    let options = DestroyOptions {
        skip_styles: skip_styles.unwrap_or(false),
    };
    with_bound(element, |directive, node| directive.destroy(node, options));
}

/// Scroll `element` to `"top"`, `"bottom"` or a pixel offset, optionally
/// moving the horizontal offset to `x` as well.
#[wasm_bindgen(js_name = scrollTo)]
pub fn scroll_to(element: &Element, y: JsValue, x: Option<f64>) {
    let target = match (y.as_string().as_deref(), y.as_f64()) {
        (Some("top"), _) => ScrollTarget::Top,
        (Some("bottom"), _) => ScrollTarget::Bottom,
        (_, Some(offset)) => ScrollTarget::Offset(offset),
        _ => {
            log::warn!("{} Unknown scroll position {:?}", LOG_PREFIX, y);
            return;
        }
    };
    with_bound(element, |directive, node| directive.scroll_to(node, target, x));
}
