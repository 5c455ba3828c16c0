//! Scenario tests for scrollbars bound in a [`MemoryDom`].
//!
//! Every scenario uses a 200px container around 1000px of content unless it
//! says otherwise, so the dragger is 40px long and travels 160px.

mod lifecycle_tests;

use std::time::Duration;

use crate::{
    Axis, AxisState, Config, Dom, Input, MemoryDom, MouseButton, NodeId, Point, PointerEvent,
    Scrollbars,
};

const EPSILON: f64 = 0.0001;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// A bound scrollbar with its deferred first pass already run.
struct Fixture {
    bars: Scrollbars<MemoryDom>,
    container: NodeId,
    content: NodeId,
}

impl Fixture {
    fn new(config: Config) -> Self {
        Self::with_dom(MemoryDom::new(), config)
    }

    fn with_dom(mut dom: MemoryDom, config: Config) -> Self {
        let (container, content) = dom.scroll_container(200.0, 1000.0);
        let mut bars = Scrollbars::new(dom);
        bars.bind(container, config).unwrap();
        bars.poll_timers();
        Self {
            bars,
            container,
            content,
        }
    }

    fn dom(&self) -> &MemoryDom {
        self.bars.dom()
    }

    fn dom_mut(&mut self) -> &mut MemoryDom {
        self.bars.dom_mut()
    }

    fn y(&self) -> AxisState {
        self.bars.geometry(self.container, Axis::Y).unwrap()
    }

    fn dragger(&self) -> NodeId {
        self.bars.instance(self.container).unwrap().elements().dragger
    }

    /// Advance the clock and run whatever became due.
    fn advance(&mut self, duration: Duration) -> usize {
        self.dom_mut().advance(duration);
        self.bars.poll_timers()
    }

    /// Move the content like the browser would, then raise the scroll event.
    fn scroll_native(&mut self, top: f64) {
        let content = self.content;
        self.dom_mut().set_scroll_top(content, top);
        self.bars.dispatch(self.container, Input::Scroll);
    }

    fn scroll_top(&self) -> f64 {
        self.dom().scroll_position(self.content).1
    }
}

/// Pointer event at viewport `y`, `offset_y` px into the dragger.
fn pointer(button: MouseButton, y: f64, offset_y: f64) -> PointerEvent {
    PointerEvent::new(button, Point::new(10.0, y), Point::new(4.0, offset_y))
}

fn press(y: f64, offset_y: f64) -> Input {
    Input::PointerDown(pointer(MouseButton::Left, y, offset_y))
}

fn move_to(y: f64) -> Input {
    Input::PointerMove(pointer(MouseButton::Left, y, 0.0))
}

fn release(y: f64) -> Input {
    Input::PointerUp(pointer(MouseButton::Left, y, 0.0))
}
