/// Headless replay of a scripted scrollbar session for native builds.
///
/// Binds a scrollbar in the in-memory document and drives it through
/// scrolling, dragging, a resize and a content change, logging the dragger
/// geometry after each step. Set `RUST_LOG=debug` to see the engine's own
/// trace.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::Duration;

    use vbar::Directive;
    use vbar_core::{
        Axis, Dom, Input, MemoryDom, MouseButton, NodeId, Point, PointerEvent, ScrollTarget,
    };

    fn report(directive: &Directive<MemoryDom>, container: NodeId, step: &str) {
        match directive.scrollbars().geometry(container, Axis::Y) {
            Some(y) => log::info!(
                "{:<12} bar {:>6.1}px at {:>6.1}px, scroll {:>6.1}px ({:.0}%)",
                step,
                y.bar_base_size,
                y.bar_offset,
                y.scroll_offset,
                y.scroll_percent * 100.0
            ),
            None => log::info!("{:<12} no scrollbar", step),
        }
    }

    fn wait(directive: &mut Directive<MemoryDom>, millis: u64) {
        directive.dom_mut().advance(Duration::from_millis(millis));
        let fired = directive.poll_timers();
        log::debug!("+{}ms, {} callbacks", millis, fired);
    }

    fn pointer(y: f64, offset_y: f64) -> PointerEvent {
        PointerEvent::new(
            MouseButton::Left,
            Point::new(10.0, y),
            Point::new(4.0, offset_y),
        )
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut dom = MemoryDom::new();
    let (container, content) = dom.scroll_container(200.0, 1000.0);
    let mut directive = Directive::new(dom);

    if !directive.inserted(container, Some(r#"{"preventParentScroll": true}"#)) {
        log::error!("Failed to bind the scrollbar");
        return;
    }
    wait(&mut directive, 1);
    report(&directive, container, "bound");

    directive.dom_mut().set_scroll_top(content, 200.0);
    directive.dispatch(container, Input::Scroll);
    wait(&mut directive, 20);
    report(&directive, container, "scrolled");

    directive.dispatch(container, Input::PointerDown(pointer(60.0, 20.0)));
    for y in [80.0, 120.0, 160.0, 250.0] {
        directive.dispatch(container, Input::PointerMove(pointer(y, 0.0)));
        wait(&mut directive, 15);
    }
    directive.dispatch(container, Input::PointerUp(pointer(250.0, 0.0)));
    report(&directive, container, "dragged");

    let edge = directive.dispatch(
        container,
        Input::Wheel {
            delta_x: 0.0,
            delta_y: 40.0,
        },
    );
    log::info!("{:<12} {:?}", "wheel", edge);

    directive.dom_mut().set_client_size(container, 300.0, 400.0);
    directive.dom_mut().set_client_size(content, 300.0, 400.0);
    directive.dispatch(container, Input::Resize);
    wait(&mut directive, 150);
    report(&directive, container, "resized");

    directive.dom_mut().set_scroll_size(content, 300.0, 2000.0);
    directive.dispatch(container, Input::Mutation);
    wait(&mut directive, 1);
    report(&directive, container, "mutated");

    directive.scroll_to(container, ScrollTarget::Top, None);
    wait(&mut directive, 20);
    report(&directive, container, "top");

    wait(&mut directive, 1500);
    directive.unbind(container);
    report(&directive, container, "unbound");
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
