//! Attribute splicing: apply an [`AttributeDescription`] to a selection.
//!
//! Order is fixed: event bindings, then the transition, then attributes,
//! then style. The returned selection keeps the transition, so geometry a
//! mark writes after splicing is animated too.

use crate::description::AttributeDescription;
use crate::scene::{Document, Event, Listener, Selection};
use crate::span::Span;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Apply `description` to `selection`, reporting events to `span` if given.
#[must_use]
pub fn splice(
    doc: &mut Document,
    selection: Selection,
    description: &AttributeDescription,
    span: Option<&Rc<Span>>,
) -> Selection {
    let selection = bind_events(doc, selection, &description.events, span);
    let selection = animate(selection, description.animation_duration_ms);
    let selection = description
        .attributes
        .iter()
        .fold(selection, |sel, (name, value)| sel.attr(doc, name, value));
    description
        .style
        .iter()
        .fold(selection, |sel, (name, value)| sel.style(doc, name, value))
}

fn animate(selection: Selection, duration_ms: f64) -> Selection {
    if duration_ms <= 0.0 {
        return selection;
    }
    selection.transition(duration_ms)
}

/// One handler per event name; binding again replaces the old handler.
fn bind_events(
    doc: &mut Document,
    selection: Selection,
    events: &BTreeSet<String>,
    span: Option<&Rc<Span>>,
) -> Selection {
    let Some(span) = span else {
        return selection;
    };
    events.iter().fold(selection, |sel, event| {
        let span = Rc::clone(span);
        let name = event.clone();
        let listener: Listener = Rc::new(move |e: &Event| span.record(&name, e.data.clone()));
        sel.on(doc, event, &listener)
    })
}
