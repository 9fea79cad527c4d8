//! Render tree: an arena of SVG-like element nodes.
//!
//! This is the selection layer the marks draw into. It supports the handful
//! of operations declarative chart code needs:
//!
//! - keyed join of a class of children against a data list
//!   ([`Document::join`]), reusing matching nodes, appending missing ones and
//!   removing surplus ones;
//! - attribute, style and text writes, optionally under a transition that
//!   records a [`Tween`] for every changed value;
//! - event listeners, one per event name per node, and synchronous
//!   [`Document::dispatch`] for hosts feeding pointer or keyboard input.
//!
//! Joined nodes remember their join key. A user `class` written onto such a
//! node is merged after the key, so later joins still find it.
//!
//! Removed nodes are detached and their arena slots are recycled by later
//! appends. A [`NodeId`] kept past its node's removal may come to name a
//! different node.

use crate::data::Bound;
use crate::span::{Span, SpanRegistry};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An event delivered to a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event name (`click`, `mouseover`, ...).
    pub name: String,
    /// Node the event was dispatched on.
    pub target: NodeId,
    /// Data bound to the target at dispatch time.
    pub data: Bound,
}

/// Event callback stored on a node.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Whether a tween animates an attribute or a style property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    /// SVG attribute.
    Attribute,
    /// CSS property.
    Style,
}

/// A value change written under a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    /// Attribute or style property name.
    pub property: String,
    /// Attribute or style.
    pub kind: TweenKind,
    /// Value before the write.
    pub from: String,
    /// Value after the write.
    pub to: String,
    /// Animation length in milliseconds.
    pub duration_ms: f64,
}

/// One element of the render tree.
pub struct Node {
    tag: String,
    key: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: Option<String>,
    data: Bound,
    listeners: BTreeMap<String, Listener>,
    tweens: Vec<Tween>,
    attached: bool,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("tag", &self.tag)
            .field("key", &self.key)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("attributes", &self.attributes)
            .field("style", &self.style)
            .field("text", &self.text)
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .field("tweens", &self.tweens)
            .finish_non_exhaustive()
    }
}

impl Node {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            key: None,
            parent,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            text: None,
            data: Bound::None,
            listeners: BTreeMap::new(),
            tweens: Vec::new(),
            attached: true,
        }
    }

    fn vacant() -> Self {
        Self {
            attached: false,
            ..Self::new("", None)
        }
    }

    /// Element tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Attributes in name order.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Style properties in name order.
    #[must_use]
    pub fn style(&self) -> &BTreeMap<String, String> {
        &self.style
    }

    /// Text content.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Bound data.
    #[must_use]
    pub fn data(&self) -> &Bound {
        &self.data
    }

    /// Names of events with a listener.
    pub fn listened_events(&self) -> impl Iterator<Item = &str> {
        self.listeners.keys().map(String::as_str)
    }

    /// Pending animations.
    #[must_use]
    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// Join key the node was created under, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Whether `class` is one of the node's class tokens.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attributes
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == class))
    }

    /// Whether the node is still part of the tree.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn record_tween(&mut self, tween: Tween) {
        self.tweens
            .retain(|t| !(t.property == tween.property && t.kind == tween.kind));
        self.tweens.push(tween);
    }

    fn clear_tween(&mut self, property: &str, kind: TweenKind) {
        self.tweens.retain(|t| !(t.property == property && t.kind == kind));
    }
}

/// Arena-backed render tree rooted at an `svg` element.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    width: u32,
    height: u32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(600, 300)
    }
}

impl Document {
    /// Create a document with an empty `svg` root of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            nodes: vec![Node::new("svg", None)],
            free: Vec::new(),
            width,
            height,
        }
    }

    /// Root `svg` node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Document width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Document height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Number of attached nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.attached).count()
    }

    /// Arena slots allocated, attached or free.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Append a new child element, reusing a free slot when there is one.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = Node::new(tag, Some(parent));
        let id = match self.free.pop() {
            Some(id) => {
                *self.node_mut(id) = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        };
        self.node_mut(parent).children.push(id);
        id
    }

    /// Detach a node and its subtree and free their slots.
    ///
    /// The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root() || !self.node(id).attached {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = std::mem::replace(self.node_mut(next), Node::vacant());
            stack.extend(node.children);
            self.free.push(next);
        }
    }

    /// Direct children of `parent` carrying `class`.
    #[must_use]
    pub fn children_with_class(&self, parent: NodeId, class: &str) -> Vec<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .filter(|c| self.node(*c).has_class(class))
            .collect()
    }

    /// Every attached node carrying `class`, in document order.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.has_class(class) {
                found.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    /// Direct children of `parent` created by a join on `key`.
    fn keyed_children(&self, parent: NodeId, key: &str) -> Vec<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .filter(|c| self.node(*c).key.as_deref() == Some(key))
            .collect()
    }

    /// Keyed join: make the children of `parent` joined on `class` match
    /// `data` one to one.
    ///
    /// Existing nodes are reused in order, missing ones are appended as
    /// `tag` elements with the class already set, and surplus ones are
    /// removed. Each node receives its datum. The key survives later
    /// `class` writes.
    pub fn join(&mut self, parent: NodeId, class: &str, tag: &str, data: Vec<Bound>) -> Selection {
        let existing = self.keyed_children(parent, class);
        let mut nodes = Vec::with_capacity(data.len());
        let mut entered = 0usize;

        for (i, datum) in data.into_iter().enumerate() {
            let id = if let Some(id) = existing.get(i) {
                *id
            } else {
                let id = self.append(parent, tag);
                let node = self.node_mut(id);
                node.key = Some(class.to_string());
                node.attributes.insert("class".to_string(), class.to_string());
                entered += 1;
                id
            };
            self.node_mut(id).data = datum;
            nodes.push(id);
        }

        let exited = existing.len().saturating_sub(nodes.len());
        for id in existing.into_iter().skip(nodes.len()) {
            self.remove(id);
        }

        if entered > 0 || exited > 0 {
            tracing::debug!(class, entered, exited, "join reconciled");
        }
        Selection::new(nodes)
    }

    /// Read an attribute.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attributes.get(name).map(String::as_str)
    }

    /// Read a style property.
    #[must_use]
    pub fn style(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).style.get(name).map(String::as_str)
    }

    /// Write an attribute; with a duration, changed values record a tween.
    ///
    /// On a joined node, `class` is written as the join key followed by the
    /// given classes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: String, duration_ms: Option<f64>) {
        let node = self.node_mut(id);
        let value = match node.key.as_deref() {
            Some(key) if name == "class" => keyed_class(key, &value),
            _ => value,
        };
        let previous = node.attributes.insert(name.to_string(), value.clone());
        Self::track(node, name, TweenKind::Attribute, previous, value, duration_ms);
    }

    /// Write a style property; with a duration, changed values record a tween.
    pub fn set_style(&mut self, id: NodeId, name: &str, value: String, duration_ms: Option<f64>) {
        let node = self.node_mut(id);
        let previous = node.style.insert(name.to_string(), value.clone());
        Self::track(node, name, TweenKind::Style, previous, value, duration_ms);
    }

    fn track(
        node: &mut Node,
        property: &str,
        kind: TweenKind,
        previous: Option<String>,
        value: String,
        duration_ms: Option<f64>,
    ) {
        match (duration_ms, previous) {
            (Some(duration_ms), Some(from)) if from != value => node.record_tween(Tween {
                property: property.to_string(),
                kind,
                from,
                to: value,
                duration_ms,
            }),
            (Some(_), _) => {}
            (None, _) => node.clear_tween(property, kind),
        }
    }

    /// Replace the text content.
    pub fn set_text(&mut self, id: NodeId, text: String) {
        self.node_mut(id).text = Some(text);
    }

    /// Install `listener` for `event`, replacing any previous one.
    pub fn set_listener(&mut self, id: NodeId, event: &str, listener: Listener) {
        self.node_mut(id).listeners.insert(event.to_string(), listener);
    }

    /// Number of listeners installed on a node.
    #[must_use]
    pub fn listener_count(&self, id: NodeId) -> usize {
        self.node(id).listeners.len()
    }

    /// Deliver `event` to the listener on `id`, if any.
    ///
    /// Returns whether a listener ran. Detached nodes have no listeners.
    pub fn dispatch(&self, id: NodeId, event: &str) -> bool {
        let node = self.node(id);
        let Some(listener) = node.listeners.get(event).cloned() else {
            tracing::trace!(node = id.0, event, "no listener");
            return false;
        };
        let payload = Event {
            name: event.to_string(),
            target: id,
            data: node.data.clone(),
        };
        tracing::trace!(node = id.0, event, "dispatch");
        listener(&payload);
        true
    }
}

fn keyed_class(key: &str, classes: &str) -> String {
    let mut class = key.to_string();
    for token in classes.split_whitespace().filter(|t| *t != key) {
        class.push(' ');
        class.push_str(token);
    }
    class
}

/// A list of nodes plus an optional transition, as produced by a join.
///
/// Setters take the document explicitly and return the selection so calls
/// chain: `sel.attr(doc, "x", 1).attr(doc, "y", 2)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    nodes: Vec<NodeId>,
    duration_ms: Option<f64>,
}

impl Selection {
    /// Wrap a list of nodes.
    #[must_use]
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self {
            nodes,
            duration_ms: None,
        }
    }

    /// Selected nodes.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// First selected node.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Number of selected nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Active transition length, if any.
    #[must_use]
    pub fn duration_ms(&self) -> Option<f64> {
        self.duration_ms
    }

    /// Animate subsequent writes over `duration_ms`.
    #[must_use]
    pub fn transition(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Set the same attribute value on every node.
    #[must_use]
    pub fn attr(self, doc: &mut Document, name: &str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        for id in &self.nodes {
            doc.set_attr(*id, name, value.clone(), self.duration_ms);
        }
        self
    }

    /// Set a per-node attribute computed from bound data and index.
    #[must_use]
    pub fn attr_with<F>(self, doc: &mut Document, name: &str, f: F) -> Self
    where
        F: Fn(&Bound, usize) -> String,
    {
        for (i, id) in self.nodes.iter().enumerate() {
            let value = f(doc.node(*id).data(), i);
            doc.set_attr(*id, name, value, self.duration_ms);
        }
        self
    }

    /// Set the same style value on every node.
    #[must_use]
    pub fn style(self, doc: &mut Document, name: &str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        for id in &self.nodes {
            doc.set_style(*id, name, value.clone(), self.duration_ms);
        }
        self
    }

    /// Set per-node text computed from bound data and index.
    #[must_use]
    pub fn text_with<F>(self, doc: &mut Document, f: F) -> Self
    where
        F: Fn(&Bound, usize) -> String,
    {
        for (i, id) in self.nodes.iter().enumerate() {
            let text = f(doc.node(*id).data(), i);
            doc.set_text(*id, text);
        }
        self
    }

    /// Install one listener for `event` on every node.
    #[must_use]
    pub fn on(self, doc: &mut Document, event: &str, listener: &Listener) -> Self {
        for id in &self.nodes {
            doc.set_listener(*id, event, Rc::clone(listener));
        }
        self
    }
}

/// A document plus the spans hosts have registered for interactive marks.
#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) document: Document,
    pub(crate) spans: SpanRegistry,
}

impl Scene {
    /// Create an empty scene of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            document: Document::new(width, height),
            spans: SpanRegistry::default(),
        }
    }

    /// Root `svg` node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.document.root()
    }

    /// The render tree.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The render tree, mutably.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Registered spans.
    #[must_use]
    pub fn spans(&self) -> &SpanRegistry {
        &self.spans
    }

    /// Register an externally-owned span under its id.
    pub fn register_span(&mut self, span: Rc<Span>) {
        self.spans.register(span);
    }

    /// Forward a host event to a node.
    pub fn dispatch(&self, id: NodeId, event: &str) -> bool {
        self.document.dispatch(id, event)
    }
}
