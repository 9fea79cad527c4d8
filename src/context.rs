//! Nested coordinate contexts.
//!
//! A context is a keyed `g` element (`ctx-<id>`) that claims a fractional
//! sub-rectangle of its parent's pixel extent. Children see fresh scales
//! whose ranges start at zero, and the group's `transform` carries the
//! translation, so a subtree renders identically wherever it is nested.

use crate::axis::{x_axis, y_axis, AxisOptions};
use crate::data::Bound;
use crate::description::{AttrValue, AttributeDescription};
use crate::geometry::Rect;
use crate::marks::{render_mark, MarkSpec};
use crate::path::fmt_num;
use crate::scale::{Domain, PositionScale, DEFAULT_BAND_GAP};
use crate::scene::{NodeId, Scene, Selection};
use crate::splice::splice;
use serde::{Deserialize, Serialize};

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

fn default_band_gap() -> f64 {
    DEFAULT_BAND_GAP
}

/// A node of a render tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    /// Nested context.
    Context(ContextSpec),
    /// Primitive mark.
    Mark(MarkSpec),
}

impl From<ContextSpec> for RenderNode {
    fn from(spec: ContextSpec) -> Self {
        RenderNode::Context(spec)
    }
}

impl From<MarkSpec> for RenderNode {
    fn from(spec: MarkSpec) -> Self {
        RenderNode::Mark(spec)
    }
}

/// A context placed by fractions of its parent's ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSpec {
    /// Keys the `ctx-<id>` group.
    pub id: String,
    /// Domain for children's x scale.
    pub x_domain: Domain,
    /// Horizontal slice of the parent, as fractions.
    #[serde(default = "unit_range")]
    pub x_range: (f64, f64),
    /// Domain for children's y scale.
    pub y_domain: Domain,
    /// Vertical slice of the parent, as fractions.
    #[serde(default = "unit_range")]
    pub y_range: (f64, f64),
    /// Spliced onto the group only.
    #[serde(default)]
    pub description: AttributeDescription,
    /// Rotate and scale around the context centre.
    #[serde(default)]
    pub pivot_center: bool,
    /// Band gap for categorical domains.
    #[serde(default = "default_band_gap")]
    pub band_gap: f64,
    /// Rendered in order inside the group.
    #[serde(default)]
    pub children: Vec<RenderNode>,
}

impl ContextSpec {
    /// A context filling its parent.
    #[must_use]
    pub fn new(id: impl Into<String>, x_domain: Domain, y_domain: Domain) -> Self {
        Self {
            id: id.into(),
            x_domain,
            x_range: unit_range(),
            y_domain,
            y_range: unit_range(),
            description: AttributeDescription::default(),
            pivot_center: false,
            band_gap: DEFAULT_BAND_GAP,
            children: Vec::new(),
        }
    }

    /// Horizontal slice as fractions of the parent width.
    #[must_use]
    pub fn x_range(mut self, from: f64, to: f64) -> Self {
        self.x_range = (from, to);
        self
    }

    /// Vertical slice as fractions of the parent height.
    #[must_use]
    pub fn y_range(mut self, from: f64, to: f64) -> Self {
        self.y_range = (from, to);
        self
    }

    /// Set the group description.
    #[must_use]
    pub fn description(mut self, description: AttributeDescription) -> Self {
        self.description = description;
        self
    }

    /// Pivot transforms around the centre.
    #[must_use]
    pub fn pivot_center(mut self, pivot: bool) -> Self {
        self.pivot_center = pivot;
        self
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, node: impl Into<RenderNode>) -> Self {
        self.children.push(node.into());
        self
    }
}

/// A top-level context with pixel ranges and visible guides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandaloneContextSpec {
    /// Keys the group and its guides.
    pub id: String,
    /// Domain for the x scale.
    pub x_domain: Domain,
    /// Pixel range for the x scale.
    pub x_range: (f64, f64),
    /// Domain for the y scale.
    pub y_domain: Domain,
    /// Pixel range for the y scale.
    pub y_range: (f64, f64),
    /// Spliced onto the group.
    #[serde(default)]
    pub description: AttributeDescription,
    /// Guide options; `show` is forced on.
    #[serde(default)]
    pub axis: AxisOptions,
    /// Rendered in order inside the group.
    #[serde(default)]
    pub children: Vec<RenderNode>,
}

impl StandaloneContextSpec {
    /// Context with the given domains and pixel ranges.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        x_domain: Domain,
        x_range: (f64, f64),
        y_domain: Domain,
        y_range: (f64, f64),
    ) -> Self {
        Self {
            id: id.into(),
            x_domain,
            x_range,
            y_domain,
            y_range,
            description: AttributeDescription::default(),
            axis: AxisOptions::visible(),
            children: Vec::new(),
        }
    }

    /// Set the group description.
    #[must_use]
    pub fn description(mut self, description: AttributeDescription) -> Self {
        self.description = description;
        self
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, node: impl Into<RenderNode>) -> Self {
        self.children.push(node.into());
        self
    }
}

/// Render one node of a render tree with the scales of its parent.
pub fn compose(
    scene: &mut Scene,
    parent: NodeId,
    x: &PositionScale,
    y: &PositionScale,
    node: &RenderNode,
) -> Selection {
    match node {
        RenderNode::Context(spec) => context(scene, parent, x, y, spec),
        RenderNode::Mark(spec) => render_mark(scene, parent, x, y, spec),
    }
}

/// Render a nested context inside `parent`.
///
/// The group is translated to the sub-rectangle's origin; children get
/// scales over `[0, width]` and `[0, height]` of that sub-rectangle.
pub fn context(
    scene: &mut Scene,
    parent: NodeId,
    parent_x: &PositionScale,
    parent_y: &PositionScale,
    spec: &ContextSpec,
) -> Selection {
    let frame = Rect::from_ranges(parent_x.range(), parent_y.range())
        .fraction(spec.x_range, spec.y_range);
    let child_x = PositionScale::build(&spec.x_domain, (0.0, frame.width), spec.band_gap);
    let child_y = PositionScale::build(&spec.y_domain, (0.0, frame.height), spec.band_gap);

    let class = format!("ctx-{}", spec.id);
    let description = with_translate(&spec.description, frame.x, frame.y);
    let doc = &mut scene.document;
    let group = doc.join(parent, &class, "g", vec![Bound::None]);
    let mut group = splice(doc, group, &description, None);
    if spec.pivot_center {
        let c = Rect::new(0.0, 0.0, frame.width, frame.height).center();
        let origin = format!("{}px {}px", fmt_num(c.x), fmt_num(c.y));
        group = group.style(doc, "transform-origin", origin);
    }

    if let Some(g) = group.first() {
        for child in &spec.children {
            compose(scene, g, &child_x, &child_y, child);
        }
    }
    group
}

/// Render a top-level context with literal pixel ranges and guides.
pub fn context_standalone(
    scene: &mut Scene,
    parent: NodeId,
    spec: &StandaloneContextSpec,
) -> Selection {
    let class = format!("ctx-{}", spec.id);
    let group = scene.document.join(parent, &class, "g", vec![Bound::None]);
    let group = splice(&mut scene.document, group, &spec.description, None);
    let Some(g) = group.first() else {
        return group;
    };

    let options = AxisOptions {
        show: true,
        ..spec.axis.clone()
    };
    let x = x_axis(scene, g, &spec.x_domain, spec.x_range, &spec.id, &options);
    let y = y_axis(scene, g, &spec.y_domain, spec.y_range, &spec.id, &options);
    for child in &spec.children {
        compose(scene, g, &x, &y, child);
    }
    group
}

/// The group transform: the translate first, then any user transform.
fn with_translate(description: &AttributeDescription, x: f64, y: f64) -> AttributeDescription {
    let translate = format!("translate({},{})", fmt_num(x), fmt_num(y));
    let transform = match description.attributes.get("transform") {
        Some(user) => format!("{translate} {user}"),
        None => translate,
    };
    let mut description = description.clone();
    description
        .attributes
        .insert("transform".to_string(), AttrValue::Text(transform));
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Datum;
    use crate::marks::MarkKind;

    fn unit() -> Domain {
        Domain::continuous(0.0, 1.0)
    }

    fn root_scales() -> (PositionScale, PositionScale) {
        (
            PositionScale::build(&Domain::continuous(0.0, 1.0), (0.0, 200.0), 0.0),
            PositionScale::build(&Domain::continuous(0.0, 1.0), (0.0, 100.0), 0.0),
        )
    }

    #[test]
    fn test_translate_and_child_range() {
        let mut scene = Scene::new(200, 100);
        let root = scene.root();
        let (x, y) = root_scales();
        let bars = MarkSpec::new("b", MarkKind::Bar)
            .data(vec![Datum::xy("only", 1.0)]);
        let spec = ContextSpec::new("c", Domain::categorical(["only"]), unit())
            .x_range(0.25, 0.75)
            .y_range(0.5, 1.0)
            .child(bars);
        let group = context(&mut scene, root, &x, &y, &spec);
        let g = group.nodes()[0];
        let doc = scene.document();
        assert_eq!(doc.attr(g, "transform"), Some("translate(50,50)"));
        assert!(doc.node(g).has_class("ctx-c"));
        let rect = doc.children_with_class(g, "bar-b")[0];
        // Child x range is [0, 100]: one band with the default gap.
        assert_eq!(doc.attr(rect, "width"), Some("80"));
        assert_eq!(doc.attr(rect, "x"), Some("10"));
    }

    #[test]
    fn test_user_transform_appended() {
        let mut scene = Scene::new(200, 100);
        let root = scene.root();
        let (x, y) = root_scales();
        let spec = ContextSpec::new("r", unit(), unit())
            .x_range(0.5, 1.0)
            .pivot_center(true)
            .description(AttributeDescription::new().attr("transform", "rotate(90)"));
        let g = context(&mut scene, root, &x, &y, &spec).nodes()[0];
        let doc = scene.document();
        assert_eq!(doc.attr(g, "transform"), Some("translate(100,0) rotate(90)"));
        assert_eq!(doc.style(g, "transform-origin"), Some("50px 50px"));
    }

    #[test]
    fn test_rerender_reuses_group() {
        let mut scene = Scene::new(200, 100);
        let root = scene.root();
        let (x, y) = root_scales();
        let spec = ContextSpec::new("same", unit(), unit());
        let first = context(&mut scene, root, &x, &y, &spec);
        let second = context(&mut scene, root, &x, &y, &spec);
        assert_eq!(first.nodes(), second.nodes());
        assert_eq!(scene.document().find_by_class("ctx-same").len(), 1);
    }

    #[test]
    fn test_group_description_not_inherited() {
        let mut scene = Scene::new(200, 100);
        let root = scene.root();
        let (x, y) = root_scales();
        let line = MarkSpec::new("l", MarkKind::Line { curve: Default::default() })
            .data(vec![Datum::xy(0.0, 0.0), Datum::xy(1.0, 1.0)]);
        let spec = ContextSpec::new("p", unit(), unit())
            .description(AttributeDescription::new().attr("opacity", 0.5))
            .child(line);
        let g = context(&mut scene, root, &x, &y, &spec).nodes()[0];
        let doc = scene.document();
        let path = doc.children_with_class(g, "line-l")[0];
        assert_eq!(doc.attr(g, "opacity"), Some("0.5"));
        assert_eq!(doc.attr(path, "opacity"), None);
    }

    #[test]
    fn test_standalone_draws_guides_inside_group() {
        let mut scene = Scene::new(300, 200);
        let root = scene.root();
        let spec = StandaloneContextSpec::new(
            "main",
            Domain::continuous(0.0, 10.0),
            (30.0, 270.0),
            Domain::continuous(0.0, 5.0),
            (180.0, 20.0),
        );
        let g = context_standalone(&mut scene, root, &spec).nodes()[0];
        let doc = scene.document();
        assert_eq!(doc.children_with_class(g, "x_axis-main").len(), 1);
        assert_eq!(doc.children_with_class(g, "y_axis-main").len(), 1);
    }

    #[test]
    fn test_render_node_yaml() {
        let yaml = r"
type: context
id: inner
x_domain: [a, b]
y_domain: [0, 10]
x_range: [0.0, 0.5]
children:
  - type: mark
    id: bars
    mark: { kind: bar }
    data:
      - { x: a, y: 3 }
";
        let node: RenderNode = serde_yaml_ng::from_str(yaml).unwrap();
        let RenderNode::Context(spec) = node else {
            panic!("expected context");
        };
        assert!(spec.x_domain.is_categorical());
        assert_eq!(spec.y_range, (0.0, 1.0));
        assert_eq!(spec.children.len(), 1);
    }
}
