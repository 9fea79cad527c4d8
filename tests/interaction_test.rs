//! Interaction Tests
//!
//! Claims about event bindings and the spans they feed.
//!
//! Run: cargo test --test interaction_test

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use trueno_ctx::prelude::*;

fn clickable_bars(scene: &mut Scene, id: &str) -> Selection {
    let root = scene.root();
    let x = build_scale(&Domain::categorical(["a", "b"]), (0.0, 100.0));
    let y = build_scale(&Domain::continuous(0.0, 10.0), (100.0, 0.0));
    let data = vec![Datum::xy("a", 3.0), Datum::xy("b", 7.0)];
    let desc = AttributeDescription::new().on("click").on("mouseover");
    bar(scene, root, &data, &x, &y, &desc, id)
}

/// Claim 1: rendering alone never notifies a span
#[test]
fn claim_01_render_does_not_notify() {
    let mut scene = Scene::new(100, 100);
    let span = Span::new("bars");
    scene.register_span(Rc::clone(&span));
    clickable_bars(&mut scene, "bars");
    clickable_bars(&mut scene, "bars");
    assert_eq!(span.notifications(), 0);
    assert!(span.snapshot().is_empty());
}

/// Claim 2: each dispatch bumps the count, stores the datum and notifies once
#[test]
fn claim_02_dispatch_updates_span() {
    let mut scene = Scene::new(100, 100);
    let span = Span::new("bars");
    scene.register_span(Rc::clone(&span));
    let heard = Rc::new(Cell::new(0u32));
    let h = Rc::clone(&heard);
    span.subscribe(move |_| h.set(h.get() + 1));

    let sel = clickable_bars(&mut scene, "bars");
    assert!(scene.dispatch(sel.nodes()[1], "click"));
    assert!(scene.dispatch(sel.nodes()[0], "mouseover"));

    assert_eq!(span.count("click"), 1);
    assert_eq!(span.count("mouseover"), 1);
    assert_eq!(span.latest("click"), Some(Bound::Datum(Datum::xy("b", 7.0))));
    assert_eq!(heard.get(), 2);
    assert_eq!(span.to_json()["click"]["data"]["x"], "b");
}

/// Claim 3: events not in the description are not handled
#[test]
fn claim_03_unbound_event_ignored() {
    let mut scene = Scene::new(100, 100);
    let span = Span::new("bars");
    scene.register_span(Rc::clone(&span));
    let sel = clickable_bars(&mut scene, "bars");
    assert!(!scene.dispatch(sel.nodes()[0], "dblclick"));
    assert_eq!(span.notifications(), 0);
}

/// Claim 4: without a registered span nothing is bound
#[test]
fn claim_04_missing_span_skips_binding() {
    let mut scene = Scene::new(100, 100);
    let sel = clickable_bars(&mut scene, "orphan");
    for id in sel.nodes() {
        assert_eq!(scene.document().listener_count(*id), 0);
    }
}

/// Claim 5: a span registered after the first render is picked up by the next
#[test]
fn claim_05_late_span_bound_on_rerender() {
    let mut scene = Scene::new(100, 100);
    clickable_bars(&mut scene, "late");
    let span = Span::new("late");
    scene.register_span(Rc::clone(&span));
    let sel = clickable_bars(&mut scene, "late");
    scene.dispatch(sel.nodes()[0], "click");
    assert_eq!(span.count("click"), 1);
}

mod proptests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Claim 6: k dispatches between renders raise the count by exactly
        /// k and fire exactly k notifications, however many renders happen.
        #[test]
        fn claim_06_event_count_monotonic(
            rounds in prop::collection::vec(0usize..6, 1..5),
        ) {
            let mut scene = Scene::new(100, 100);
            let span = Span::new("m");
            scene.register_span(Rc::clone(&span));
            let mut expected = 0u64;
            for k in rounds {
                let sel = clickable_bars(&mut scene, "m");
                let before = span.count("click");
                for i in 0..k {
                    scene.dispatch(sel.nodes()[i % sel.len()], "click");
                }
                expected += k as u64;
                prop_assert_eq!(span.count("click"), before + k as u64);
                prop_assert_eq!(span.notifications(), expected);
            }
        }
    }
}
