//! Externally-owned reactive value cells for interactive marks.
//!
//! A [`Span`] is created and kept alive by the host. Renderers only look it
//! up by id through the [`SpanRegistry`] and hand it to the splicer, whose
//! event handlers update it: per event name they bump a counter, store the
//! payload of the latest dispatch and fire one "input" notification.

use crate::data::Bound;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

/// Per-event state kept in a span's value bag.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EventRecord {
    /// Number of dispatches seen.
    pub count: u64,
    /// Data bound to the node of the most recent dispatch.
    pub data: Bound,
}

type Subscriber = Rc<dyn Fn(&Span)>;

/// Reactive value cell keyed by element id.
pub struct Span {
    id: String,
    value: RefCell<BTreeMap<String, EventRecord>>,
    notifications: Cell<u64>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Span")
            .field("id", &self.id)
            .field("value", &self.value.borrow())
            .field("notifications", &self.notifications.get())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl Span {
    /// Create a span. Hosts own the returned handle.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: id.into(),
            value: RefCell::new(BTreeMap::new()),
            notifications: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
        })
    }

    /// Element id this span is keyed by.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Record one dispatch of `event` and notify subscribers once.
    pub fn record(&self, event: &str, data: Bound) {
        {
            let mut value = self.value.borrow_mut();
            let entry = value.entry(event.to_string()).or_default();
            entry.count += 1;
            entry.data = data;
        }
        self.notify_input();
    }

    /// Fire the "input" notification.
    pub fn notify_input(&self) {
        self.notifications.set(self.notifications.get() + 1);
        // Cloned so subscribers may subscribe or read the span re-entrantly.
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber(self);
        }
    }

    /// Register an "input" subscriber.
    pub fn subscribe<F>(&self, f: F)
    where
        F: Fn(&Span) + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(f));
    }

    /// Dispatch count for `event`, zero if never seen.
    #[must_use]
    pub fn count(&self, event: &str) -> u64 {
        self.value.borrow().get(event).map_or(0, |r| r.count)
    }

    /// Payload of the latest dispatch of `event`.
    #[must_use]
    pub fn latest(&self, event: &str) -> Option<Bound> {
        self.value.borrow().get(event).map(|r| r.data.clone())
    }

    /// Copy of the whole value bag.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, EventRecord> {
        self.value.borrow().clone()
    }

    /// Value bag as JSON, shaped `{event: {count, data}}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&*self.value.borrow()).unwrap_or(serde_json::Value::Null)
    }

    /// Total "input" notifications fired.
    #[must_use]
    pub fn notifications(&self) -> u64 {
        self.notifications.get()
    }
}

/// Host-side lookup from element id to span.
#[derive(Debug, Default)]
pub struct SpanRegistry {
    spans: HashMap<String, Rc<Span>>,
}

impl SpanRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a span under its id, replacing any previous one.
    pub fn register(&mut self, span: Rc<Span>) {
        self.spans.insert(span.id().to_string(), span);
    }

    /// Look up the span for `id`.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<Rc<Span>> {
        self.spans.get(id).cloned()
    }

    /// Stop tracking a span. The host keeps its own handle.
    pub fn unregister(&mut self, id: &str) -> Option<Rc<Span>> {
        self.spans.remove(id)
    }

    /// Number of registered spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether no span is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
