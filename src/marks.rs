//! Primitive mark renderers: area, line, shape and bar.
//!
//! Every renderer follows the same steps:
//!
//! 1. resolve the span registered under the mark id (if any);
//! 2. keyed-join a class `<kind>-<id>` of elements under `parent` against
//!    the data;
//! 3. splice the description onto the joined elements;
//! 4. write geometry computed from the scales.
//!
//! Scales are only read. The `*_standalone` variants derive domains from the
//! data, build scales with visible guides and delegate.

use crate::axis::{x_axis, y_axis, AxisOptions};
use crate::data::{Bound, Datum, Value};
use crate::description::AttributeDescription;
use crate::geometry::Point;
use crate::path::{area_path, fmt_num, line_path, symbol_path, Curve, Symbol, DEFAULT_SYMBOL_SIZE};
use crate::scale::{Domain, PositionScale, Scale};
use crate::scene::{NodeId, Scene, Selection};
use crate::splice::splice;
use serde::{Deserialize, Serialize};

// ============================================================================
// Descriptors
// ============================================================================

/// Which primitive a [`MarkSpec`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkKind {
    /// Filled band between `y0` and `y1`.
    Area {
        /// Interpolation.
        #[serde(default)]
        curve: Curve,
    },
    /// Polyline through `(x, y)`.
    Line {
        /// Interpolation.
        #[serde(default)]
        curve: Curve,
    },
    /// One symbol per datum.
    Shape {
        /// Symbol type.
        #[serde(default)]
        symbol: Symbol,
    },
    /// One rectangle per datum.
    Bar,
}

impl MarkKind {
    /// Class prefix, also the kind name in configs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MarkKind::Area { .. } => "area",
            MarkKind::Line { .. } => "line",
            MarkKind::Shape { .. } => "shape",
            MarkKind::Bar => "bar",
        }
    }
}

/// A mark in a render tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkSpec {
    /// Element id: keys the join and the span lookup.
    pub id: String,
    /// Primitive and its options.
    pub mark: MarkKind,
    /// Records to draw.
    #[serde(default)]
    pub data: Vec<Datum>,
    /// Attributes, style, events and animation.
    #[serde(default)]
    pub description: AttributeDescription,
}

impl MarkSpec {
    /// Mark with no data and an empty description.
    #[must_use]
    pub fn new(id: impl Into<String>, mark: MarkKind) -> Self {
        Self {
            id: id.into(),
            mark,
            data: Vec::new(),
            description: AttributeDescription::default(),
        }
    }

    /// Set the data.
    #[must_use]
    pub fn data(mut self, data: Vec<Datum>) -> Self {
        self.data = data;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: AttributeDescription) -> Self {
        self.description = description;
        self
    }
}

/// Pixel size standalone marks lay themselves out in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandaloneSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Default for StandaloneSize {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
        }
    }
}

impl StandaloneSize {
    fn x_range(self) -> (f64, f64) {
        (0.1 * self.width, 0.9 * self.width)
    }

    fn y_range(self) -> (f64, f64) {
        (0.1 * self.height, 0.9 * self.height)
    }
}

/// Draw `spec` with the given scales.
pub fn render_mark(
    scene: &mut Scene,
    parent: NodeId,
    x: &PositionScale,
    y: &PositionScale,
    spec: &MarkSpec,
) -> Selection {
    let (data, desc, id) = (&spec.data, &spec.description, spec.id.as_str());
    match spec.mark {
        MarkKind::Area { curve } => area(scene, parent, data, x, y, desc, id, curve),
        MarkKind::Line { curve } => line(scene, parent, data, x, y, desc, id, curve),
        MarkKind::Shape { symbol } => shape(scene, parent, data, x, y, desc, id, symbol),
        MarkKind::Bar => bar(scene, parent, data, x, y, desc, id),
    }
}

/// Draw `spec` with scales derived from its own data.
pub fn render_mark_standalone(
    scene: &mut Scene,
    parent: NodeId,
    spec: &MarkSpec,
    size: StandaloneSize,
) -> Selection {
    let (data, desc, id) = (&spec.data, &spec.description, spec.id.as_str());
    match spec.mark {
        MarkKind::Area { curve } => area_standalone(scene, parent, data, desc, id, curve, size),
        MarkKind::Line { curve } => line_standalone(scene, parent, data, desc, id, curve, size),
        MarkKind::Shape { symbol } => shape_standalone(scene, parent, data, desc, id, symbol, size),
        MarkKind::Bar => bar_standalone(scene, parent, data, desc, id, size),
    }
}

/// Join `data` to the `<kind>-<id>` class and splice the description.
fn bind(
    scene: &mut Scene,
    parent: NodeId,
    kind: &str,
    tag: &str,
    data: Vec<Bound>,
    description: &AttributeDescription,
    id: &str,
) -> Selection {
    let span = scene.spans.resolve(id);
    let class = format!("{kind}-{id}");
    let doc = &mut scene.document;
    let selection = doc.join(parent, &class, tag, data);
    splice(doc, selection, description, span.as_ref())
}

// ============================================================================
// Area
// ============================================================================

/// One path filling the band between `y0` and `y1` across `x`.
///
/// Missing `y1` falls back to `y`; missing `y0` is the zero baseline.
#[allow(clippy::too_many_arguments)]
pub fn area(
    scene: &mut Scene,
    parent: NodeId,
    data: &[Datum],
    x: &PositionScale,
    y: &PositionScale,
    description: &AttributeDescription,
    id: &str,
    curve: Curve,
) -> Selection {
    let series = vec![Bound::Series(data.to_vec())];
    let selection = bind(scene, parent, "area", "path", series, description, id);
    selection.attr_with(&mut scene.document, "d", |bound, _| {
        let series = bound.series().unwrap_or_default();
        let top: Vec<Point> = series
            .iter()
            .map(|d| Point::new(x.scale(&d.x), y.scale(area_top(d))))
            .collect();
        let bottom: Vec<Point> = series
            .iter()
            .map(|d| Point::new(x.scale(&d.x), y.scale(d.y0.unwrap_or(0.0))))
            .collect();
        area_path(&top, &bottom, curve)
    })
}

fn area_top(d: &Datum) -> f64 {
    d.y1.or_else(|| d.y.as_number()).unwrap_or(0.0)
}

/// [`area`] with scales derived from the data's `x` and `y0`/`y1` extents.
pub fn area_standalone(
    scene: &mut Scene,
    parent: NodeId,
    data: &[Datum],
    description: &AttributeDescription,
    id: &str,
    curve: Curve,
    size: StandaloneSize,
) -> Selection {
    let xs: Vec<Value> = data.iter().map(|d| d.x.clone()).collect();
    let ys: Vec<Value> = data
        .iter()
        .flat_map(|d| [Value::Number(d.y0.unwrap_or(0.0)), Value::Number(area_top(d))])
        .collect();
    let (xd, yd) = (Domain::from_values(&xs), Domain::from_values(&ys));
    let (x, y) = standalone_scales(scene, parent, id, &xd, &yd, size, size.y_range());
    area(scene, parent, data, &x, &y, description, id, curve)
}

// ============================================================================
// Line
// ============================================================================

/// One path through `(x, y)` for the whole series.
#[allow(clippy::too_many_arguments)]
pub fn line(
    scene: &mut Scene,
    parent: NodeId,
    data: &[Datum],
    x: &PositionScale,
    y: &PositionScale,
    description: &AttributeDescription,
    id: &str,
    curve: Curve,
) -> Selection {
    let series = vec![Bound::Series(data.to_vec())];
    let selection = bind(scene, parent, "line", "path", series, description, id);
    selection.attr_with(&mut scene.document, "d", |bound, _| {
        let points: Vec<Point> = bound
            .series()
            .unwrap_or_default()
            .iter()
            .map(|d| Point::new(x.scale(&d.x), y.scale(&d.y)))
            .collect();
        line_path(&points, curve)
    })
}

/// [`line`] with scales derived from the data extents.
pub fn line_standalone(
    scene: &mut Scene,
    parent: NodeId,
    data: &[Datum],
    description: &AttributeDescription,
    id: &str,
    curve: Curve,
    size: StandaloneSize,
) -> Selection {
    let (xd, yd) = point_domains(data);
    let (x, y) = standalone_scales(scene, parent, id, &xd, &yd, size, size.y_range());
    line(scene, parent, data, &x, &y, description, id, curve)
}

// ============================================================================
// Shape
// ============================================================================

/// One symbol per datum, translated to `(x, y)`.
///
/// Symbol area comes from the datum's `size`, defaulting to 64.
#[allow(clippy::too_many_arguments)]
pub fn shape(
    scene: &mut Scene,
    parent: NodeId,
    data: &[Datum],
    x: &PositionScale,
    y: &PositionScale,
    description: &AttributeDescription,
    id: &str,
    symbol: Symbol,
) -> Selection {
    let bound = data.iter().cloned().map(Bound::Datum).collect();
    let selection = bind(scene, parent, "shape", "path", bound, description, id);
    let doc = &mut scene.document;
    selection
        .attr_with(doc, "transform", |bound, _| {
            let Some(d) = bound.datum() else {
                return String::new();
            };
            format!("translate({},{})", fmt_num(x.scale(&d.x)), fmt_num(y.scale(&d.y)))
        })
        .attr_with(doc, "d", |bound, _| {
            let size = bound.datum().and_then(|d| d.size).unwrap_or(DEFAULT_SYMBOL_SIZE);
            symbol_path(symbol, size)
        })
}

/// [`shape`] with scales derived from the data extents.
pub fn shape_standalone(
    scene: &mut Scene,
    parent: NodeId,
    data: &[Datum],
    description: &AttributeDescription,
    id: &str,
    symbol: Symbol,
    size: StandaloneSize,
) -> Selection {
    let (xd, yd) = point_domains(data);
    let (x, y) = standalone_scales(scene, parent, id, &xd, &yd, size, size.y_range());
    shape(scene, parent, data, &x, &y, description, id, symbol)
}

// ============================================================================
// Bar
// ============================================================================

/// Rectangle geometry for one datum.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BarRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// One rectangle per datum, grown from the zero line.
///
/// A categorical `x` on the first datum draws vertical bars (band on x,
/// value on y); otherwise bars are horizontal (band on y, value on x).
pub fn bar(
    scene: &mut Scene,
    parent: NodeId,
    data: &[Datum],
    x: &PositionScale,
    y: &PositionScale,
    description: &AttributeDescription,
    id: &str,
) -> Selection {
    let vertical = data.first().is_some_and(|d| d.x.is_category());
    let rects: Vec<BarRect> = data
        .iter()
        .map(|d| if vertical { vertical_bar(d, x, y) } else { horizontal_bar(d, x, y) })
        .collect();

    let bound = data.iter().cloned().map(Bound::Datum).collect();
    let selection = bind(scene, parent, "bar", "rect", bound, description, id);
    let doc = &mut scene.document;
    selection
        .attr_with(doc, "x", |_, i| fmt_num(rects[i].x))
        .attr_with(doc, "y", |_, i| fmt_num(rects[i].y))
        .attr_with(doc, "width", |_, i| fmt_num(rects[i].width))
        .attr_with(doc, "height", |_, i| fmt_num(rects[i].height))
}

fn vertical_bar(d: &Datum, x: &PositionScale, y: &PositionScale) -> BarRect {
    let zero = y.scale(0.0_f64);
    let value = y.scale(&d.y);
    BarRect {
        x: x.scale(&d.x),
        y: zero.min(value),
        width: x.bandwidth(),
        height: (value - zero).abs(),
    }
}

fn horizontal_bar(d: &Datum, x: &PositionScale, y: &PositionScale) -> BarRect {
    let zero = x.scale(0.0_f64);
    let value = x.scale(&d.x);
    BarRect {
        x: zero.min(value),
        y: y.scale(&d.y),
        width: (value - zero).abs(),
        height: y.bandwidth(),
    }
}

/// [`bar`] with scales derived from the data.
///
/// Categorical `x` gives a band x scale and a value y scale over
/// `[min(y, 0), max(y, 0)]` drawn bottom-up; otherwise the value scale is on
/// x and the band scale on y.
pub fn bar_standalone(
    scene: &mut Scene,
    parent: NodeId,
    data: &[Datum],
    description: &AttributeDescription,
    id: &str,
    size: StandaloneSize,
) -> Selection {
    let xs: Vec<Value> = data.iter().map(|d| d.x.clone()).collect();
    let ys: Vec<Value> = data.iter().map(|d| d.y.clone()).collect();
    let (x, y) = if data.first().is_some_and(|d| d.x.is_category()) {
        let (lo, hi) = size.y_range();
        let xd = Domain::from_values(&xs);
        let yd = Domain::from_values_with_zero(&ys);
        standalone_scales(scene, parent, id, &xd, &yd, size, (hi, lo))
    } else {
        let xd = Domain::from_values_with_zero(&xs);
        let yd = Domain::from_values(&ys);
        standalone_scales(scene, parent, id, &xd, &yd, size, size.y_range())
    };
    bar(scene, parent, data, &x, &y, description, id)
}

// ============================================================================
// Standalone helpers
// ============================================================================

fn point_domains(data: &[Datum]) -> (Domain, Domain) {
    let xs: Vec<Value> = data.iter().map(|d| d.x.clone()).collect();
    let ys: Vec<Value> = data.iter().map(|d| d.y.clone()).collect();
    (Domain::from_values(&xs), Domain::from_values(&ys))
}

fn standalone_scales(
    scene: &mut Scene,
    parent: NodeId,
    id: &str,
    x_domain: &Domain,
    y_domain: &Domain,
    size: StandaloneSize,
    y_range: (f64, f64),
) -> (PositionScale, PositionScale) {
    let options = AxisOptions::visible();
    let x = x_axis(scene, parent, x_domain, size.x_range(), id, &options);
    let y = y_axis(scene, parent, y_domain, y_range, id, &options);
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use approx::assert_relative_eq;
    use std::rc::Rc;

    fn num(scene: &Scene, id: NodeId, name: &str) -> f64 {
        scene
            .document()
            .attr(id, name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(f64::NAN)
    }

    fn linear(d0: f64, d1: f64, r0: f64, r1: f64) -> PositionScale {
        PositionScale::build(&Domain::continuous(d0, d1), (r0, r1), 0.0)
    }

    #[test]
    fn test_vertical_bar_geometry() {
        let mut scene = Scene::new(200, 100);
        let root = scene.root();
        let x = PositionScale::build(&Domain::categorical(["a", "b"]), (0.0, 100.0), 0.0);
        let y = linear(0.0, 100.0, 100.0, 0.0);
        let data = vec![Datum::xy("a", 50.0), Datum::xy("b", 25.0)];
        let sel = bar(&mut scene, root, &data, &x, &y, &AttributeDescription::new(), "sales");
        assert_eq!(sel.len(), 2);
        let first = sel.nodes()[0];
        assert_relative_eq!(num(&scene, first, "x"), 0.0);
        assert_relative_eq!(num(&scene, first, "y"), 50.0);
        assert_relative_eq!(num(&scene, first, "width"), 50.0);
        assert_relative_eq!(num(&scene, first, "height"), 50.0);
        assert!(scene.document().node(first).has_class("bar-sales"));
    }

    #[test]
    fn test_negative_bar_grows_down() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let x = PositionScale::build(&Domain::categorical(["a"]), (0.0, 100.0), 0.0);
        let y = linear(-10.0, 10.0, 100.0, 0.0);
        let desc = AttributeDescription::new();
        let sel = bar(&mut scene, root, &[Datum::xy("a", -5.0)], &x, &y, &desc, "n");
        let id = sel.nodes()[0];
        assert_relative_eq!(num(&scene, id, "y"), 50.0);
        assert_relative_eq!(num(&scene, id, "height"), 25.0);
    }

    #[test]
    fn test_horizontal_bar_geometry() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let x = linear(0.0, 10.0, 0.0, 100.0);
        let y = PositionScale::build(&Domain::categorical(["p", "q"]), (0.0, 100.0), 0.0);
        let desc = AttributeDescription::new();
        let sel = bar(&mut scene, root, &[Datum::xy(4.0, "q")], &x, &y, &desc, "h");
        let id = sel.nodes()[0];
        assert_relative_eq!(num(&scene, id, "x"), 0.0);
        assert_relative_eq!(num(&scene, id, "width"), 40.0);
        assert_relative_eq!(num(&scene, id, "y"), 50.0);
        assert_relative_eq!(num(&scene, id, "height"), 50.0);
    }

    #[test]
    fn test_bar_empty_data() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let x = linear(0.0, 1.0, 0.0, 1.0);
        let sel = bar(&mut scene, root, &[], &x, &x, &AttributeDescription::new(), "e");
        assert!(sel.is_empty());
        assert!(scene.document().is_empty());
    }

    #[test]
    fn test_line_empty_series_has_empty_path() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let x = linear(0.0, 1.0, 0.0, 1.0);
        let desc = AttributeDescription::new();
        let sel = line(&mut scene, root, &[], &x, &x, &desc, "l", Curve::Linear);
        assert_eq!(sel.len(), 1);
        assert_eq!(scene.document().attr(sel.nodes()[0], "d"), Some(""));
    }

    #[test]
    fn test_line_path() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let x = linear(0.0, 10.0, 0.0, 100.0);
        let y = linear(0.0, 10.0, 100.0, 0.0);
        let data = vec![Datum::xy(0.0, 0.0), Datum::xy(10.0, 10.0)];
        let desc = AttributeDescription::new();
        let sel = line(&mut scene, root, &data, &x, &y, &desc, "l", Curve::Linear);
        assert_eq!(scene.document().attr(sel.nodes()[0], "d"), Some("M0,100L100,0"));
    }

    #[test]
    fn test_area_path_uses_baseline() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let x = linear(0.0, 1.0, 0.0, 10.0);
        let y = linear(0.0, 10.0, 10.0, 0.0);
        let data = vec![Datum::band(0.0, 0.0, 5.0), Datum::band(1.0, 0.0, 10.0)];
        let desc = AttributeDescription::new();
        let sel = area(&mut scene, root, &data, &x, &y, &desc, "a", Curve::Linear);
        assert_eq!(scene.document().attr(sel.nodes()[0], "d"), Some("M0,5L10,0L10,10L0,10Z"));
    }

    #[test]
    fn test_shape_translate_and_default_size() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let x = linear(0.0, 1.0, 0.0, 100.0);
        let data = vec![Datum::xy(0.5, 0.25)];
        let desc = AttributeDescription::new();
        let sel = shape(&mut scene, root, &data, &x, &x, &desc, "s", Symbol::Square);
        let id = sel.nodes()[0];
        assert_eq!(scene.document().attr(id, "transform"), Some("translate(50,25)"));
        assert_eq!(scene.document().attr(id, "d"), Some("M-4,-4L4,-4L4,4L-4,4Z"));
    }

    #[test]
    fn test_registered_span_receives_events() {
        let mut scene = Scene::new(100, 100);
        let root = scene.root();
        let span = Span::new("pts");
        scene.register_span(Rc::clone(&span));
        let x = linear(0.0, 1.0, 0.0, 100.0);
        let desc = AttributeDescription::new().on("click");
        let data = vec![Datum::xy(0.1, 0.1), Datum::xy(0.9, 0.9)];
        let sel = shape(&mut scene, root, &data, &x, &x, &desc, "pts", Symbol::Circle);
        assert_eq!(span.notifications(), 0);
        scene.dispatch(sel.nodes()[1], "click");
        assert_eq!(span.count("click"), 1);
        assert_eq!(span.latest("click"), Some(Bound::Datum(Datum::xy(0.9, 0.9))));
    }

    #[test]
    fn test_bar_standalone_categorical_x() {
        let mut scene = Scene::new(600, 300);
        let root = scene.root();
        let data = vec![Datum::xy("a", 4.0), Datum::xy("b", 8.0)];
        let desc = AttributeDescription::new();
        let sel = bar_standalone(&mut scene, root, &data, &desc, "b", StandaloneSize::default());
        let doc = scene.document();
        assert_eq!(doc.find_by_class("x_axis-b").len(), 1);
        assert_eq!(doc.find_by_class("y_axis-b").len(), 1);
        // y domain [0, 8] over [270, 30]: the tallest bar reaches the top.
        let tall = sel.nodes()[1];
        assert_relative_eq!(num(&scene, tall, "y"), 30.0);
        assert_relative_eq!(num(&scene, tall, "height"), 240.0);
    }

    #[test]
    fn test_mark_kind_deserialize() {
        let k: MarkKind = serde_json::from_str(r#"{"kind": "line", "curve": "basis"}"#).unwrap();
        assert_eq!(k, MarkKind::Line { curve: Curve::Basis });
        let b: MarkKind = serde_json::from_str(r#"{"kind": "bar"}"#).unwrap();
        assert_eq!(b.name(), "bar");
    }
}
