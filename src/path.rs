//! SVG path-data generators for lines, areas and point symbols.
//!
//! Output follows the compact `M0,0L10,10Z` form. Coordinates are rounded
//! to six decimals so repeated renders of the same data produce identical
//! strings.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Write;

/// Default symbol area in square pixels.
pub const DEFAULT_SYMBOL_SIZE: f64 = 64.0;

/// Interpolation between consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    /// Straight segments.
    #[default]
    Linear,
    /// Step change halfway between points.
    Step,
    /// Step change at the previous point.
    StepBefore,
    /// Step change at the next point.
    StepAfter,
    /// Cubic B-spline through the control points.
    Basis,
}

/// Point symbol shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    /// Filled circle.
    #[default]
    Circle,
    /// Axis-aligned square.
    Square,
    /// Plus sign.
    Cross,
    /// Rhombus, taller than wide.
    Diamond,
    /// Upward triangle.
    Triangle,
    /// Three-armed star.
    Wye,
}

/// Format a coordinate: six decimals at most, no trailing zeros, no `-0`.
pub(crate) fn fmt_num(v: f64) -> String {
    let rounded = (v * 1e6).round() / 1e6;
    format!("{}", rounded + 0.0)
}

/// Accumulates path commands.
#[derive(Debug, Default)]
struct PathData {
    out: String,
}

impl PathData {
    fn move_to(&mut self, p: Point) {
        let _ = write!(self.out, "M{},{}", fmt_num(p.x), fmt_num(p.y));
    }

    fn line_to(&mut self, p: Point) {
        let _ = write!(self.out, "L{},{}", fmt_num(p.x), fmt_num(p.y));
    }

    fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        let _ = write!(
            self.out,
            "C{},{},{},{},{},{}",
            fmt_num(c1.x),
            fmt_num(c1.y),
            fmt_num(c2.x),
            fmt_num(c2.y),
            fmt_num(p.x),
            fmt_num(p.y)
        );
    }

    fn arc_to(&mut self, r: f64, p: Point) {
        let _ = write!(
            self.out,
            "A{},{},0,1,1,{},{}",
            fmt_num(r),
            fmt_num(r),
            fmt_num(p.x),
            fmt_num(p.y)
        );
    }

    fn close(&mut self) {
        self.out.push('Z');
    }

    /// Start a segment: a move for a fresh path, a line when continuing.
    fn begin(&mut self, p: Point, continuing: bool) {
        if continuing {
            self.line_to(p);
        } else {
            self.move_to(p);
        }
    }

    fn polygon(mut self, points: &[Point]) -> String {
        if let Some((first, rest)) = points.split_first() {
            self.move_to(*first);
            for p in rest {
                self.line_to(*p);
            }
            self.close();
        }
        self.out
    }
}

// ============================================================================
// Lines and areas
// ============================================================================

/// Path through `points` with the given interpolation.
///
/// No points yield an empty string; a single point yields a closed move.
#[must_use]
pub fn line_path(points: &[Point], curve: Curve) -> String {
    let mut path = PathData::default();
    trace(&mut path, points, curve, false);
    if points.len() == 1 {
        path.close();
    }
    path.out
}

/// Closed area between `top` (drawn forward) and `bottom` (drawn back).
#[must_use]
pub fn area_path(top: &[Point], bottom: &[Point], curve: Curve) -> String {
    if top.is_empty() {
        return String::new();
    }
    let mut path = PathData::default();
    trace(&mut path, top, curve, false);
    let reversed: Vec<Point> = bottom.iter().rev().copied().collect();
    trace(&mut path, &reversed, curve, true);
    path.close();
    path.out
}

fn trace(path: &mut PathData, points: &[Point], curve: Curve, continuing: bool) {
    match curve {
        Curve::Linear => linear(path, points, continuing),
        Curve::Step => step(path, points, 0.5, continuing),
        Curve::StepBefore => step(path, points, 0.0, continuing),
        Curve::StepAfter => step(path, points, 1.0, continuing),
        Curve::Basis => basis(path, points, continuing),
    }
}

fn linear(path: &mut PathData, points: &[Point], continuing: bool) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    path.begin(*first, continuing);
    for p in rest {
        path.line_to(*p);
    }
}

/// Step interpolation; `t` places the vertical jump between points
/// (0 at the previous point, 1 at the next).
fn step(path: &mut PathData, points: &[Point], t: f64, continuing: bool) {
    let Some((first, _)) = points.split_first() else {
        return;
    };
    path.begin(*first, continuing);
    for pair in points.windows(2) {
        let (prev, p) = (pair[0], pair[1]);
        if t <= 0.0 {
            path.line_to(Point::new(prev.x, p.y));
            path.line_to(p);
        } else {
            let x = prev.x * (1.0 - t) + p.x * t;
            path.line_to(Point::new(x, prev.y));
            path.line_to(Point::new(x, p.y));
        }
    }
    if t > 0.0 && t < 1.0 && points.len() > 1 {
        path.line_to(points[points.len() - 1]);
    }
}

/// Uniform cubic B-spline; endpoints are interpolated, interior points
/// act as control points.
fn basis(path: &mut PathData, points: &[Point], continuing: bool) {
    if points.len() < 3 {
        linear(path, points, continuing);
        return;
    }
    let (mut p0, mut p1) = (points[0], points[1]);
    path.begin(p0, continuing);
    path.line_to(Point::new((5.0 * p0.x + p1.x) / 6.0, (5.0 * p0.y + p1.y) / 6.0));
    for &p in &points[2..] {
        basis_segment(path, p0, p1, p);
        p0 = p1;
        p1 = p;
    }
    basis_segment(path, p0, p1, p1);
    path.line_to(p1);
}

fn basis_segment(path: &mut PathData, p0: Point, p1: Point, p: Point) {
    path.curve_to(
        Point::new((2.0 * p0.x + p1.x) / 3.0, (2.0 * p0.y + p1.y) / 3.0),
        Point::new((p0.x + 2.0 * p1.x) / 3.0, (p0.y + 2.0 * p1.y) / 3.0),
        Point::new((p0.x + 4.0 * p1.x + p.x) / 6.0, (p0.y + 4.0 * p1.y + p.y) / 6.0),
    );
}

// ============================================================================
// Symbols
// ============================================================================

/// Path for `symbol` centred on the origin with area close to `size`.
///
/// Non-positive or non-finite sizes produce an empty path.
#[must_use]
pub fn symbol_path(symbol: Symbol, size: f64) -> String {
    if !(size.is_finite() && size > 0.0) {
        return String::new();
    }
    let mut path = PathData::default();
    match symbol {
        Symbol::Circle => {
            let r = (size / PI).sqrt();
            path.move_to(Point::new(r, 0.0));
            path.arc_to(r, Point::new(-r, 0.0));
            path.arc_to(r, Point::new(r, 0.0));
            path.close();
            path.out
        }
        Symbol::Square => {
            let h = size.sqrt() / 2.0;
            path.polygon(&[
                Point::new(-h, -h),
                Point::new(h, -h),
                Point::new(h, h),
                Point::new(-h, h),
            ])
        }
        Symbol::Cross => {
            let r = (size / 5.0).sqrt() / 2.0;
            path.polygon(&[
                Point::new(-3.0 * r, -r),
                Point::new(-r, -r),
                Point::new(-r, -3.0 * r),
                Point::new(r, -3.0 * r),
                Point::new(r, -r),
                Point::new(3.0 * r, -r),
                Point::new(3.0 * r, r),
                Point::new(r, r),
                Point::new(r, 3.0 * r),
                Point::new(-r, 3.0 * r),
                Point::new(-r, r),
                Point::new(-3.0 * r, r),
            ])
        }
        Symbol::Diamond => {
            let tan30 = (1.0_f64 / 3.0).sqrt();
            let y = (size / (2.0 * tan30)).sqrt();
            let x = y * tan30;
            path.polygon(&[
                Point::new(0.0, -y),
                Point::new(x, 0.0),
                Point::new(0.0, y),
                Point::new(-x, 0.0),
            ])
        }
        Symbol::Triangle => {
            let sqrt3 = 3.0_f64.sqrt();
            let y = -(size / (sqrt3 * 3.0)).sqrt();
            path.polygon(&[
                Point::new(0.0, 2.0 * y),
                Point::new(-sqrt3 * y, -y),
                Point::new(sqrt3 * y, -y),
            ])
        }
        Symbol::Wye => wye(path, size),
    }
}

fn wye(path: PathData, size: f64) -> String {
    let (c, s) = (-0.5, 3.0_f64.sqrt() / 2.0);
    let k = 1.0 / 12.0_f64.sqrt();
    let r = (size / ((k / 2.0 + 1.0) * 3.0)).sqrt();
    let (x0, y0) = (r / 2.0, r * k);
    let (x1, y1) = (x0, r * k + r);
    let arm = [(x0, y0), (x1, y1), (-x1, y1)];
    // Second and third arms: the first rotated by 120 and 240 degrees.
    let mut points: Vec<Point> = arm.iter().map(|&(x, y)| Point::new(x, y)).collect();
    points.extend(arm.iter().map(|&(x, y)| Point::new(c * x - s * y, s * x + c * y)));
    points.extend(arm.iter().map(|&(x, y)| Point::new(c * x + s * y, c * y - s * x)));
    path.polygon(&points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn test_line_linear() {
        let d = line_path(&pts(&[(0.0, 0.0), (10.0, 10.0), (20.0, 5.0)]), Curve::Linear);
        assert_eq!(d, "M0,0L10,10L20,5");
    }

    #[test]
    fn test_line_empty_and_single() {
        assert_eq!(line_path(&[], Curve::Linear), "");
        assert_eq!(line_path(&pts(&[(3.0, 4.0)]), Curve::Basis), "M3,4Z");
    }

    #[test]
    fn test_step_variants() {
        let p = pts(&[(0.0, 0.0), (10.0, 10.0)]);
        assert_eq!(line_path(&p, Curve::Step), "M0,0L5,0L5,10L10,10");
        assert_eq!(line_path(&p, Curve::StepBefore), "M0,0L0,10L10,10");
        assert_eq!(line_path(&p, Curve::StepAfter), "M0,0L10,0L10,10");
    }

    #[test]
    fn test_basis_endpoints() {
        let p = pts(&[(0.0, 0.0), (6.0, 6.0), (12.0, 0.0)]);
        let d = line_path(&p, Curve::Basis);
        assert!(d.starts_with("M0,0L1,1C"));
        assert!(d.ends_with("L12,0"));
    }

    #[test]
    fn test_area_closes() {
        let top = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        let bottom = pts(&[(0.0, 5.0), (10.0, 5.0)]);
        assert_eq!(area_path(&top, &bottom, Curve::Linear), "M0,0L10,0L10,5L0,5Z");
        assert_eq!(area_path(&[], &[], Curve::Linear), "");
    }

    #[test]
    fn test_square_symbol() {
        assert_eq!(symbol_path(Symbol::Square, 64.0), "M-4,-4L4,-4L4,4L-4,4Z");
    }

    #[test]
    fn test_circle_symbol_radius() {
        let d = symbol_path(Symbol::Circle, PI * 25.0);
        assert_eq!(d, "M5,0A5,5,0,1,1,-5,0A5,5,0,1,1,5,0Z");
    }

    #[test]
    fn test_every_symbol_closes() {
        for s in [
            Symbol::Circle,
            Symbol::Square,
            Symbol::Cross,
            Symbol::Diamond,
            Symbol::Triangle,
            Symbol::Wye,
        ] {
            let d = symbol_path(s, DEFAULT_SYMBOL_SIZE);
            assert!(d.starts_with('M') && d.ends_with('Z'), "{s:?}: {d}");
        }
        assert_eq!(symbol_path(Symbol::Square, 0.0), "");
    }

    #[test]
    fn test_curve_deserialize() {
        let c: Curve = serde_json::from_str("\"step_before\"").unwrap();
        assert_eq!(c, Curve::StepBefore);
    }
}
