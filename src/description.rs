//! Declarative attribute descriptions.
//!
//! An [`AttributeDescription`] is the one shape every mark, axis guide and
//! context accepts: static attributes, style properties, the event names to
//! report to a span, and an animation duration.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A primitive attribute or style value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Numeric value, written in shortest form.
    Number(f64),
    /// Color, written as CSS `rgb(...)`.
    Color(Rgba),
    /// Free text, written verbatim.
    Text(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(v) => write!(f, "{v}"),
            AttrValue::Color(c) => f.write_str(&c.to_css()),
            AttrValue::Text(t) => f.write_str(t),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Number(f64::from(v))
    }
}

impl From<Rgba> for AttrValue {
    fn from(c: Rgba) -> Self {
        AttrValue::Color(c)
    }
}

impl From<&str> for AttrValue {
    fn from(t: &str) -> Self {
        AttrValue::Text(t.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(t: String) -> Self {
        AttrValue::Text(t)
    }
}

/// Attributes, style, events and animation for a selection.
///
/// A duration of zero or less disables animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeDescription {
    /// Static attributes.
    #[serde(alias = "attr")]
    pub attributes: BTreeMap<String, AttrValue>,
    /// CSS style properties.
    pub style: BTreeMap<String, AttrValue>,
    /// Event names reported to the mark's span.
    pub events: BTreeSet<String>,
    /// Transition length in milliseconds.
    #[serde(alias = "duration")]
    pub animation_duration_ms: f64,
}

impl AttributeDescription {
    /// Empty description: no attributes, no events, no animation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Add a style property.
    #[must_use]
    pub fn style(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.style.insert(name.to_string(), value.into());
        self
    }

    /// Report `event` to the span.
    #[must_use]
    pub fn on(mut self, event: &str) -> Self {
        self.events.insert(event.to_string());
        self
    }

    /// Animate attribute and style writes over `ms` milliseconds.
    #[must_use]
    pub fn duration(mut self, ms: f64) -> Self {
        self.animation_duration_ms = ms;
        self
    }

    /// Whether writes should animate.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.animation_duration_ms > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let d = AttributeDescription::new()
            .attr("stroke-width", 2)
            .style("fill", Rgba::RED)
            .on("click")
            .duration(300.0);
        assert_eq!(d.attributes["stroke-width"].to_string(), "2");
        assert_eq!(d.style["fill"].to_string(), "rgb(255,0,0)");
        assert!(d.events.contains("click"));
        assert!(d.is_animated());
    }

    #[test]
    fn test_non_positive_duration_not_animated() {
        assert!(!AttributeDescription::new().is_animated());
        assert!(!AttributeDescription::new().duration(-5.0).is_animated());
    }

    #[test]
    fn test_deserialize_short_keys() {
        let json = r##"{
            "attr": {"stroke": "#ff0000", "opacity": 0.5, "class-extra": "hot"},
            "events": ["click", "mouseover"],
            "duration": 200
        }"##;
        let d: AttributeDescription = serde_json::from_str(json).unwrap();
        assert_eq!(d.attributes["stroke"], AttrValue::Color(Rgba::RED));
        assert_eq!(d.attributes["opacity"], AttrValue::Number(0.5));
        assert_eq!(d.attributes["class-extra"], AttrValue::Text("hot".into()));
        assert_eq!(d.events.len(), 2);
        assert!((d.animation_duration_ms - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_number_display_shortest() {
        assert_eq!(AttrValue::Number(1.5).to_string(), "1.5");
        assert_eq!(AttrValue::Number(10.0).to_string(), "10");
    }
}
