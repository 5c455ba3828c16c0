//! Tests for binding, refreshing and destroying scrollbars.

use super::*;
use crate::constants::*;
use crate::{
    Channel, DestroyOptions, LifecycleState, Propagation, RefreshOptions, StyleProperty, Target,
    VbarError,
};

#[test]
fn test_bind_builds_dragger() {
    let fx = Fixture::new(Config::default());
    let dom = fx.dom();
    let dragger = fx.dragger();

    assert_eq!(dom.children(fx.container), vec![fx.content, dragger]);
    assert!(dom.has_class(dragger, DRAGGER_CLASS));
    assert_eq!(dom.style(dragger, StyleProperty::Position), Some("absolute"));

    let styler = dom.children(dragger);
    assert_eq!(styler.len(), 1);
    assert!(dom.has_class(styler[0], DRAGGER_STYLER_CLASS));
    assert_eq!(
        fx.bars.instance(fx.container).unwrap().elements().styler,
        styler[0]
    );
}

#[test]
fn test_bind_applies_layout_styles() {
    let fx = Fixture::new(Config::default());
    let dom = fx.dom();

    assert!(dom.has_class(fx.container, CONTAINER_CLASS));
    assert_eq!(dom.style(fx.container, StyleProperty::Position), Some("relative"));
    assert_eq!(dom.style(fx.container, StyleProperty::Overflow), Some("hidden"));

    assert!(dom.has_class(fx.content, CONTENT_CLASS));
    assert_eq!(dom.style(fx.content, StyleProperty::BoxSizing), Some("content-box"));
    assert_eq!(dom.style(fx.content, StyleProperty::Display), Some("block"));
    assert_eq!(dom.style(fx.content, StyleProperty::OverflowX), Some("hidden"));
    assert_eq!(dom.style(fx.content, StyleProperty::OverflowY), Some("scroll"));
    assert_eq!(dom.style(fx.content, StyleProperty::Height), Some("100%"));

    // classic 17px scrollbar pushed past the clipped edge
    assert_eq!(dom.style(fx.content, StyleProperty::MarginRight), Some("-17px"));
    assert_eq!(dom.style(fx.content, StyleProperty::PaddingRight), None);
}

#[test]
fn test_overlay_scrollbar_uses_fallback_width() {
    let fx = Fixture::with_dom(MemoryDom::new().with_scrollbar_width(0.0), Config::default());
    let dom = fx.dom();

    assert!(fx
        .bars
        .instance(fx.container)
        .unwrap()
        .environment()
        .has_overlay_scrollbar());
    assert_eq!(dom.style(fx.content, StyleProperty::MarginRight), Some("-20px"));
    assert_eq!(dom.style(fx.content, StyleProperty::PaddingRight), Some("20px"));
}

#[test]
fn test_overlay_scrollbar_left_alone_without_override() {
    let config = Config {
        override_floating_scrollbar: false,
        ..Default::default()
    };
    let fx = Fixture::with_dom(MemoryDom::new().with_scrollbar_width(0.0), config);
    let dom = fx.dom();

    assert_eq!(dom.style(fx.content, StyleProperty::MarginRight), None);
    assert_eq!(dom.style(fx.content, StyleProperty::PaddingRight), None);
    assert_eq!(dom.style(fx.content, StyleProperty::OverflowY), Some("scroll"));
}

#[test]
fn test_bind_runs_initial_geometry() {
    let fx = Fixture::new(Config::default());
    let y = fx.y();

    assert!(approx_eq(y.visible_ratio, 0.2));
    assert!(approx_eq(y.bar_base_size, 40.0));
    assert!(approx_eq(y.bar_offset, 0.0));

    let dom = fx.dom();
    let dragger = fx.dragger();
    assert_eq!(dom.style(dragger, StyleProperty::Height), Some("40px"));
    assert_eq!(dom.style(dragger, StyleProperty::Top), Some("0px"));
    assert!(dom.has_class(fx.container, CONTAINER_VISIBLE_CLASS));
    assert!(!dom.has_class(fx.container, CONTAINER_INVISIBLE_CLASS));
    assert_eq!(fx.bars.state(fx.container), LifecycleState::Active);
}

#[test]
fn test_content_that_fits_hides_dragger() {
    let mut dom = MemoryDom::new();
    let (container, _) = dom.scroll_container(200.0, 150.0);
    let mut bars = Scrollbars::new(dom);
    bars.bind(container, Config::default()).unwrap();

    let y = bars.geometry(container, Axis::Y).unwrap();
    assert!(approx_eq(y.visible_ratio, 1.0));
    assert!(approx_eq(y.bar_base_size, 0.0));

    let dragger = bars.instance(container).unwrap().elements().dragger;
    assert_eq!(bars.dom().style(dragger, StyleProperty::Height), Some("0px"));
    assert!(bars.dom().has_class(container, CONTAINER_INVISIBLE_CLASS));
    assert!(!bars.dom().has_class(container, CONTAINER_VISIBLE_CLASS));
}

#[test]
fn test_bind_attaches_default_channels() {
    let fx = Fixture::new(Config::default());
    let dom = fx.dom();
    let (container, content) = (fx.container, fx.content);

    assert!(dom.has_listener(container, Target::Node(content), Channel::Scroll));
    assert!(dom.has_listener(container, Target::Node(fx.dragger()), Channel::DragStart));
    assert!(dom.has_listener(container, Target::Window, Channel::Resize));
    assert!(!dom.has_listener(container, Target::Node(content), Channel::Wheel));
    assert!(!dom.has_listener(container, Target::Document, Channel::DragMove));
    assert_eq!(dom.listener_count(), 3);
    assert!(dom.is_observed(container));
}

#[test]
fn test_bind_attaches_optional_channels() {
    let config = Config {
        prevent_parent_scroll: true,
        resize_refresh: false,
        ..Default::default()
    };
    let fx = Fixture::new(config);
    let dom = fx.dom();

    assert!(dom.has_listener(fx.container, Target::Node(fx.content), Channel::Wheel));
    assert!(!dom.has_listener(fx.container, Target::Window, Channel::Resize));
    assert_eq!(
        fx.bars
            .instance(fx.container)
            .unwrap()
            .attached_channels()
            .len(),
        3
    );
}

#[test]
fn test_missing_observer_is_not_an_error() {
    let fx = Fixture::with_dom(
        MemoryDom::new().without_mutation_observer(),
        Config::default(),
    );
    assert!(!fx.bars.instance(fx.container).unwrap().is_observing());
    assert_eq!(fx.dom().observer_count(), 0);
}

#[test]
fn test_bind_without_content_child_leaves_no_trace() {
    let mut dom = MemoryDom::new();
    let container = dom.create_node("div");
    let body = dom.body();
    dom.append_child(body, container);
    let mut bars = Scrollbars::new(dom);

    assert_eq!(
        bars.bind(container, Config::default()),
        Err(VbarError::MissingContent { found: 0 })
    );
    assert_eq!(bars.state(container), LifecycleState::Uninitialized);
    assert!(bars.is_empty());
    assert_eq!(bars.dom().listener_count(), 0);
    assert!(bars.dom().classes(container).is_empty());
    assert!(bars.dom().children(container).is_empty());
    assert_eq!(bars.next_deadline(), None);
    assert!(bars.dom().held_handles().is_empty());
}

#[test]
fn test_bind_with_two_children_is_rejected() {
    let mut dom = MemoryDom::new();
    let (container, _) = dom.scroll_container(200.0, 1000.0);
    let extra = dom.create_node("div");
    dom.append_child(container, extra);
    let mut bars = Scrollbars::new(dom);

    assert_eq!(
        bars.bind(container, Config::default()),
        Err(VbarError::MissingContent { found: 2 })
    );
    assert_eq!(bars.dom().children(container).len(), 2);
    assert!(bars.dom().held_handles().is_empty());
}

#[test]
fn test_bind_destroy_cycles_release_handles() {
    let mut bars = Scrollbars::new(MemoryDom::new());

    for _ in 0..3 {
        let (container, content) = bars.dom_mut().scroll_container(200.0, 1000.0);
        bars.bind(container, Config::default()).unwrap();
        let elements = *bars.instance(container).unwrap().elements();
        let mut expected = vec![content, elements.dragger, elements.styler];
        expected.sort();
        assert_eq!(bars.dom().held_handles(), expected);

        bars.destroy(container, DestroyOptions::default()).unwrap();
        assert!(bars.dom().held_handles().is_empty());

        assert_eq!(
            bars.bind(container, Config::default()),
            Err(VbarError::Destroyed)
        );
        assert!(bars.dom().held_handles().is_empty());
    }
    assert!(bars.is_empty());
}

#[test]
fn test_double_bind_is_rejected() {
    let mut fx = Fixture::new(Config::default());

    assert_eq!(
        fx.bars.bind(fx.container, Config::default()),
        Err(VbarError::AlreadyInitialized)
    );
    assert_eq!(fx.bars.len(), 1);
    assert_eq!(fx.dom().children(fx.container).len(), 2);
    assert_eq!(fx.dom().listener_count(), 3);
}

#[test]
fn test_destroy_releases_everything() {
    let mut fx = Fixture::new(Config::default());
    let dragger = fx.dragger();
    fx.scroll_native(400.0);
    assert!(fx.bars.next_deadline().is_some());

    let returned = fx
        .bars
        .destroy(fx.container, DestroyOptions::default())
        .unwrap();
    assert_eq!(returned, fx.container);

    let dom = fx.dom();
    assert_eq!(dom.listener_count(), 0);
    assert_eq!(dom.observer_count(), 0);
    assert!(dom.classes(fx.container).is_empty());
    assert!(dom.classes(fx.content).is_empty());
    assert_eq!(dom.children(fx.container), vec![fx.content]);
    assert_eq!(dom.parent(dragger), None);
    assert_eq!(dom.style(fx.container, StyleProperty::Position), None);
    assert_eq!(dom.style(fx.content, StyleProperty::MarginRight), None);
    assert_eq!(dom.style(fx.content, StyleProperty::OverflowY), None);

    assert_eq!(fx.bars.next_deadline(), None);
    assert_eq!(fx.advance(ms(5000)), 0);
    assert_eq!(fx.bars.state(fx.container), LifecycleState::Destroyed);
    assert_eq!(fx.bars.geometry(fx.container, Axis::Y), None);
}

#[test]
fn test_destroy_can_keep_styles() {
    let mut fx = Fixture::new(Config::default());
    fx.bars
        .destroy(fx.container, DestroyOptions { skip_styles: true })
        .unwrap();

    let dom = fx.dom();
    assert_eq!(dom.style(fx.container, StyleProperty::Overflow), Some("hidden"));
    assert_eq!(dom.style(fx.content, StyleProperty::MarginRight), Some("-17px"));
    assert!(!dom.has_class(fx.container, CONTAINER_CLASS));
    assert_eq!(dom.listener_count(), 0);
}

#[test]
fn test_destroy_twice_is_a_reported_no_op() {
    let mut fx = Fixture::new(Config::default());
    fx.bars
        .destroy(fx.container, DestroyOptions::default())
        .unwrap();
    let children = fx.dom().children(fx.container);

    assert_eq!(
        fx.bars.destroy(fx.container, DestroyOptions::default()),
        Err(VbarError::Destroyed)
    );
    assert_eq!(fx.dom().children(fx.container), children);
    assert_eq!(fx.dom().listener_count(), 0);
}

#[test]
fn test_operations_on_unbound_container() {
    let mut dom = MemoryDom::new();
    let (container, _) = dom.scroll_container(200.0, 1000.0);
    let mut bars = Scrollbars::new(dom);

    assert_eq!(
        bars.destroy(container, DestroyOptions::default()),
        Err(VbarError::NotInitialized)
    );
    assert_eq!(
        bars.refresh(container, RefreshOptions::default()),
        Err(VbarError::NotInitialized)
    );
    assert_eq!(
        bars.dispatch(container, Input::Scroll),
        Propagation::Continue
    );
    assert_eq!(bars.state(container), LifecycleState::Uninitialized);
}

#[test]
fn test_destroyed_is_terminal() {
    let mut fx = Fixture::new(Config::default());
    fx.bars
        .destroy(fx.container, DestroyOptions::default())
        .unwrap();

    assert_eq!(
        fx.bars.bind(fx.container, Config::default()),
        Err(VbarError::Destroyed)
    );
    assert_eq!(
        fx.bars.refresh(fx.container, RefreshOptions { immediate: true }),
        Err(VbarError::Destroyed)
    );
    assert_eq!(fx.dom().listener_count(), 0);
    assert_eq!(fx.bars.state(fx.container), LifecycleState::Destroyed);
}

#[test]
fn test_destroy_during_drag_restores_selection() {
    let mut fx = Fixture::new(Config::default());
    fx.bars.dispatch(fx.container, press(10.0, 10.0));
    assert_eq!(fx.dom().body_style(StyleProperty::UserSelect), Some("none"));

    fx.bars
        .destroy(fx.container, DestroyOptions { skip_styles: true })
        .unwrap();

    let dom = fx.dom();
    assert_eq!(dom.body_style(StyleProperty::UserSelect), None);
    assert_eq!(dom.style(fx.container, StyleProperty::UserSelect), None);
    assert_eq!(dom.listener_count(), 0);
    assert!(!dom.has_class(fx.container, CONTAINER_DRAGGING_CLASS));
    assert!(!dom.has_class(fx.container, CONTAINER_DRAGGING_PHANTOM_CLASS));
}

#[test]
fn test_deferred_pass_sees_settled_layout() {
    let mut dom = MemoryDom::new();
    let (container, content) = dom.scroll_container(200.0, 1000.0);
    let mut bars = Scrollbars::new(dom);
    bars.bind(container, Config::default()).unwrap();
    assert!(approx_eq(
        bars.geometry(container, Axis::Y).unwrap().bar_base_size,
        40.0
    ));

    // content finishes rendering before the next update batch
    bars.dom_mut().set_scroll_size(content, 300.0, 2000.0);
    assert_eq!(bars.next_deadline(), Some(bars.dom().now()));
    assert_eq!(bars.poll_timers(), 1);

    let y = bars.geometry(container, Axis::Y).unwrap();
    assert!(approx_eq(y.visible_ratio, 0.1));
    assert!(approx_eq(y.bar_base_size, 20.0));
    assert_eq!(bars.next_deadline(), None);
}

#[test]
fn test_refresh_recomputes_now_and_later() {
    let mut fx = Fixture::new(Config::default());
    let content = fx.content;
    fx.dom_mut().set_scroll_size(content, 300.0, 500.0);

    fx.bars
        .refresh(fx.container, RefreshOptions { immediate: true })
        .unwrap();
    assert!(approx_eq(fx.y().bar_base_size, 80.0));
    assert_eq!(
        fx.dom().style(fx.dragger(), StyleProperty::Height),
        Some("80px")
    );

    fx.dom_mut().set_scroll_size(content, 300.0, 400.0);
    fx.bars
        .refresh(fx.container, RefreshOptions::default())
        .unwrap();
    assert!(approx_eq(fx.y().bar_base_size, 80.0));
    fx.bars.poll_timers();
    assert!(approx_eq(fx.y().bar_base_size, 100.0));
}

#[test]
fn test_instances_are_independent() {
    let mut dom = MemoryDom::new();
    let (first, _) = dom.scroll_container(200.0, 1000.0);
    let (second, _) = dom.scroll_container(100.0, 400.0);
    let mut bars = Scrollbars::new(dom);
    bars.bind(first, Config::default()).unwrap();
    bars.bind(second, Config::default()).unwrap();
    bars.poll_timers();

    bars.destroy(first, DestroyOptions::default()).unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars.state(second), LifecycleState::Active);
    assert!(approx_eq(
        bars.geometry(second, Axis::Y).unwrap().bar_base_size,
        25.0
    ));
    assert_eq!(bars.dom().listeners(second).len(), 3);
}
