//! Data records bound to render-tree nodes.
//!
//! Data is expected pre-shaped: each [`Datum`] carries the coordinates a mark
//! needs and nothing else. No aggregation happens here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single coordinate value: numeric or categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Continuous value.
    Number(f64),
    /// Category label.
    Category(String),
}

impl Default for Value {
    fn default() -> Self {
        Value::Number(0.0)
    }
}

impl Value {
    /// Numeric payload, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Category(_) => None,
        }
    }

    /// Category payload, if any.
    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Category(c) => Some(c),
        }
    }

    /// Whether this value is a category label.
    #[must_use]
    pub fn is_category(&self) -> bool {
        matches!(self, Value::Category(_))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Category(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Category(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Category(c) => f.write_str(c),
        }
    }
}

/// One data record.
///
/// Which fields matter depends on the mark: lines read `x`/`y`, areas read
/// `x`/`y0`/`y1`, shapes add `size`, bars read `x`/`y` with one of them
/// categorical.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Datum {
    /// Horizontal coordinate.
    #[serde(default)]
    pub x: Value,
    /// Vertical coordinate.
    #[serde(default)]
    pub y: Value,
    /// Area baseline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y0: Option<f64>,
    /// Area topline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1: Option<f64>,
    /// Symbol area in square pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl Datum {
    /// Create a point record.
    #[must_use]
    pub fn xy(x: impl Into<Value>, y: impl Into<Value>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            ..Self::default()
        }
    }

    /// Create an area record with a baseline and topline.
    #[must_use]
    pub fn band(x: impl Into<Value>, y0: f64, y1: f64) -> Self {
        Self {
            x: x.into(),
            y0: Some(y0),
            y1: Some(y1),
            ..Self::default()
        }
    }

    /// Set the symbol size.
    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Data bound to a render-tree node, also the payload handed to spans.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    /// Nothing bound (groups, guides).
    #[default]
    None,
    /// One record (bars, point shapes).
    Datum(Datum),
    /// A whole series (one line or area path).
    Series(Vec<Datum>),
}

impl Bound {
    /// The single record, if this binding holds one.
    #[must_use]
    pub fn datum(&self) -> Option<&Datum> {
        match self {
            Bound::Datum(d) => Some(d),
            _ => None,
        }
    }

    /// The series, if this binding holds one.
    #[must_use]
    pub fn series(&self) -> Option<&[Datum]> {
        match self {
            Bound::Series(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_untagged_serde() {
        let v: Value = serde_json::from_str("3.5").unwrap();
        assert_eq!(v, Value::Number(3.5));
        let v: Value = serde_json::from_str("\"a\"").unwrap();
        assert_eq!(v, Value::Category("a".into()));
    }

    #[test]
    fn test_datum_defaults() {
        let d: Datum = serde_json::from_str(r#"{"x": 1, "y0": 0, "y1": 2}"#).unwrap();
        assert_eq!(d.x, Value::Number(1.0));
        assert_eq!(d.y, Value::Number(0.0));
        assert_eq!(d.y1, Some(2.0));
        assert_eq!(d.size, None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from("b").to_string(), "b");
    }

    #[test]
    fn test_bound_accessors() {
        let b = Bound::Datum(Datum::xy(1.0, 2.0));
        assert!(b.datum().is_some());
        assert!(b.series().is_none());
        assert!(Bound::None.datum().is_none());
    }
}
