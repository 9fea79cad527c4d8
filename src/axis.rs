//! Axis entry points: build a position scale and optionally draw its guide.
//!
//! A guide is a keyed group `x_axis-<id>` or `y_axis-<id>` holding one
//! `domain` path and one `tick` group per tick, each with a tick line and a
//! label. Re-rendering reuses the group and drops surplus ticks.

use crate::data::Bound;
use crate::description::AttributeDescription;
use crate::path::fmt_num;
use crate::scale::{Domain, PositionScale, Tick, DEFAULT_BAND_GAP};
use crate::scene::{NodeId, Scene};
use crate::splice::splice;
use serde::{Deserialize, Serialize};

/// Tick line length in pixels.
const TICK_SIZE: f64 = 6.0;
/// Gap between tick line and label.
const TICK_PADDING: f64 = 3.0;
/// Approximate tick count for linear scales.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Side of the plot a guide is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrient {
    /// Ticks above the domain line.
    Top,
    /// Ticks right of the domain line.
    Right,
    /// Ticks below the domain line.
    Bottom,
    /// Ticks left of the domain line.
    Left,
}

impl AxisOrient {
    fn is_horizontal(self) -> bool {
        matches!(self, AxisOrient::Top | AxisOrient::Bottom)
    }

    /// Direction ticks point in: -1 towards the origin, 1 away.
    fn sign(self) -> f64 {
        match self {
            AxisOrient::Top | AxisOrient::Left => -1.0,
            AxisOrient::Right | AxisOrient::Bottom => 1.0,
        }
    }

    fn text_anchor(self) -> &'static str {
        match self {
            AxisOrient::Top | AxisOrient::Bottom => "middle",
            AxisOrient::Left => "end",
            AxisOrient::Right => "start",
        }
    }

    fn label_dy(self) -> &'static str {
        match self {
            AxisOrient::Top => "0em",
            AxisOrient::Bottom => "0.71em",
            AxisOrient::Left | AxisOrient::Right => "0.32em",
        }
    }
}

/// Options for [`x_axis`] and [`y_axis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    /// Draw the guide.
    pub show: bool,
    /// Band gap for categorical domains.
    pub band_gap: f64,
    /// Guide side; `None` picks bottom for x and right for y.
    pub orient: Option<AxisOrient>,
    /// Approximate tick count for linear scales.
    pub tick_count: usize,
    /// Spliced onto the guide group.
    pub description: AttributeDescription,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            show: false,
            band_gap: DEFAULT_BAND_GAP,
            orient: None,
            tick_count: DEFAULT_TICK_COUNT,
            description: AttributeDescription::default(),
        }
    }
}

impl AxisOptions {
    /// Options with the guide shown.
    #[must_use]
    pub fn visible() -> Self {
        Self {
            show: true,
            ..Self::default()
        }
    }

    /// Set the guide side.
    #[must_use]
    pub fn orient(mut self, orient: AxisOrient) -> Self {
        self.orient = Some(orient);
        self
    }

    /// Set the band gap.
    #[must_use]
    pub fn band_gap(mut self, gap: f64) -> Self {
        self.band_gap = gap;
        self
    }
}

/// Build the horizontal scale for `domain` over `range`, drawing a guide
/// into `parent` when `options.show` is set.
pub fn x_axis(
    scene: &mut Scene,
    parent: NodeId,
    domain: &Domain,
    range: (f64, f64),
    id: &str,
    options: &AxisOptions,
) -> PositionScale {
    let scale = PositionScale::build(domain, range, options.band_gap);
    if options.show {
        let orient = options.orient.unwrap_or(AxisOrient::Bottom);
        let class = format!("x_axis-{id}");
        draw_guide(scene, parent, &scale, orient, &class, options);
    }
    scale
}

/// Vertical counterpart of [`x_axis`].
pub fn y_axis(
    scene: &mut Scene,
    parent: NodeId,
    domain: &Domain,
    range: (f64, f64),
    id: &str,
    options: &AxisOptions,
) -> PositionScale {
    let scale = PositionScale::build(domain, range, options.band_gap);
    if options.show {
        let orient = options.orient.unwrap_or(AxisOrient::Right);
        let class = format!("y_axis-{id}");
        draw_guide(scene, parent, &scale, orient, &class, options);
    }
    scale
}

fn draw_guide(
    scene: &mut Scene,
    parent: NodeId,
    scale: &PositionScale,
    orient: AxisOrient,
    class: &str,
    options: &AxisOptions,
) {
    let doc = &mut scene.document;
    let group = doc
        .join(parent, class, "g", vec![Bound::None])
        .attr(doc, "fill", "none")
        .attr(doc, "font-size", 10)
        .attr(doc, "font-family", "sans-serif")
        .attr(doc, "text-anchor", orient.text_anchor());
    let group = splice(doc, group, &options.description, None);
    let Some(g) = group.first() else {
        return;
    };

    let k = orient.sign();
    let (r0, r1) = scale.range();
    let outer = fmt_num(k * TICK_SIZE);
    let domain_d = if orient.is_horizontal() {
        format!("M{},{outer}V0H{}V{outer}", fmt_num(r0), fmt_num(r1))
    } else {
        format!("M{outer},{}H0V{}H{outer}", fmt_num(r0), fmt_num(r1))
    };
    let _ = doc
        .join(g, "domain", "path", vec![Bound::None])
        .attr(doc, "stroke", "currentColor")
        .attr(doc, "d", domain_d);

    let ticks = scale.ticks(options.tick_count);
    let tick_groups = doc
        .join(g, "tick", "g", vec![Bound::None; ticks.len()])
        .attr(doc, "opacity", 1)
        .attr_with(doc, "transform", |_, i| tick_transform(&ticks[i], orient));

    let line_axis = if orient.is_horizontal() { "y2" } else { "x2" };
    let text_axis = if orient.is_horizontal() { "y" } else { "x" };
    for (i, tick) in tick_groups.nodes().iter().enumerate() {
        let _ = doc
            .join(*tick, "tick-line", "line", vec![Bound::None])
            .attr(doc, "stroke", "currentColor")
            .attr(doc, line_axis, fmt_num(k * TICK_SIZE));
        let label = ticks[i].label.clone();
        let _ = doc
            .join(*tick, "tick-label", "text", vec![Bound::None])
            .attr(doc, "fill", "currentColor")
            .attr(doc, text_axis, fmt_num(k * (TICK_SIZE + TICK_PADDING)))
            .attr(doc, "dy", orient.label_dy())
            .text_with(doc, |_, _| label.clone());
    }
}

fn tick_transform(tick: &Tick, orient: AxisOrient) -> String {
    let p = fmt_num(tick.position);
    if orient.is_horizontal() {
        format!("translate({p},0)")
    } else {
        format!("translate(0,{p})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide_ticks(scene: &Scene, class: &str) -> Vec<NodeId> {
        let g = scene.document().find_by_class(class)[0];
        scene.document().children_with_class(g, "tick")
    }

    #[test]
    fn test_hidden_axis_draws_nothing() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let domain = Domain::continuous(0.0, 1.0);
        let s = x_axis(&mut scene, root, &domain, (0.0, 100.0), "a", &AxisOptions::default());
        assert!((s.range().1 - 100.0).abs() < f64::EPSILON);
        assert!(scene.document().is_empty());
    }

    #[test]
    fn test_subnormal_domain_guide_has_endpoint_ticks() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let domain = Domain::continuous(0.0, 1e-310);
        x_axis(&mut scene, root, &domain, (0.0, 100.0), "t", &AxisOptions::visible());
        assert_eq!(guide_ticks(&scene, "x_axis-t").len(), 2);
    }

    #[test]
    fn test_guide_class_keeps_key_across_renders() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let mut opts = AxisOptions::visible();
        opts.description = AttributeDescription::new().attr("class", "axis");
        let domain = Domain::continuous(0.0, 10.0);
        for _ in 0..3 {
            y_axis(&mut scene, root, &domain, (100.0, 0.0), "k", &opts);
        }
        let doc = scene.document();
        assert_eq!(doc.node(root).children().len(), 1);
        assert_eq!(doc.find_by_class("axis"), doc.find_by_class("y_axis-k"));
    }

    #[test]
    fn test_x_axis_bottom_guide() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        x_axis(
            &mut scene,
            root,
            &Domain::continuous(0.0, 10.0),
            (0.0, 100.0),
            "a",
            &AxisOptions::visible(),
        );
        let doc = scene.document();
        let g = doc.find_by_class("x_axis-a")[0];
        let domain = doc.children_with_class(g, "domain")[0];
        assert_eq!(doc.attr(domain, "d"), Some("M0,6V0H100V6"));
        let ticks = guide_ticks(&scene, "x_axis-a");
        assert_eq!(ticks.len(), 11);
        assert_eq!(doc.attr(ticks[5], "transform"), Some("translate(50,0)"));
        let label = doc.children_with_class(ticks[5], "tick-label")[0];
        assert_eq!(doc.node(label).text(), Some("5"));
        assert_eq!(doc.attr(label, "dy"), Some("0.71em"));
    }

    #[test]
    fn test_y_axis_defaults_right() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        y_axis(
            &mut scene,
            root,
            &Domain::categorical(["a", "b"]),
            (0.0, 100.0),
            "c",
            &AxisOptions::visible().band_gap(0.0),
        );
        let doc = scene.document();
        let g = doc.find_by_class("y_axis-c")[0];
        assert_eq!(doc.attr(g, "text-anchor"), Some("start"));
        let ticks = guide_ticks(&scene, "y_axis-c");
        assert_eq!(doc.attr(ticks[0], "transform"), Some("translate(0,25)"));
        assert_eq!(doc.attr(ticks[1], "transform"), Some("translate(0,75)"));
    }

    #[test]
    fn test_left_orient_points_outward() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        y_axis(
            &mut scene,
            root,
            &Domain::continuous(0.0, 1.0),
            (100.0, 0.0),
            "l",
            &AxisOptions::visible().orient(AxisOrient::Left),
        );
        let doc = scene.document();
        let g = doc.find_by_class("y_axis-l")[0];
        let domain = doc.children_with_class(g, "domain")[0];
        assert_eq!(doc.attr(domain, "d"), Some("M-6,100H0V0H-6"));
        assert_eq!(doc.attr(g, "text-anchor"), Some("end"));
    }

    #[test]
    fn test_rerender_drops_surplus_ticks() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let opts = AxisOptions::visible();
        let three = Domain::categorical(["a", "b", "c"]);
        x_axis(&mut scene, root, &three, (0.0, 90.0), "x", &opts);
        assert_eq!(guide_ticks(&scene, "x_axis-x").len(), 3);
        let one = Domain::categorical(["a"]);
        x_axis(&mut scene, root, &one, (0.0, 90.0), "x", &opts);
        assert_eq!(guide_ticks(&scene, "x_axis-x").len(), 1);
        assert_eq!(scene.document().find_by_class("x_axis-x").len(), 1);
    }

    #[test]
    fn test_degenerate_axis_has_no_ticks() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let domain = Domain::categorical(Vec::<String>::new());
        let s = x_axis(&mut scene, root, &domain, (0.0, 80.0), "e", &AxisOptions::visible());
        assert!(s.is_degenerate());
        assert!(guide_ticks(&scene, "x_axis-e").is_empty());
    }

    #[test]
    fn test_options_deserialize() {
        let o: AxisOptions = serde_json::from_str(r#"{"show": true, "orient": "top"}"#).unwrap();
        assert!(o.show);
        assert_eq!(o.orient, Some(AxisOrient::Top));
        assert_eq!(o.tick_count, DEFAULT_TICK_COUNT);
    }
}
