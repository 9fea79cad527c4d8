//! Scale functions for data-to-pixel mappings.
//!
//! A [`PositionScale`] is either a continuous [`LinearScale`], a banded
//! [`BandScale`] over category labels, or a degenerate scale that collapses
//! everything onto the midpoint of its range. Degenerate scales are how
//! malformed domains are absorbed: renderers keep working and the mark simply
//! collapses.

use crate::data::Value;
use serde::{Deserialize, Serialize};

/// Default padding between bands, as a fraction of one step.
pub const DEFAULT_BAND_GAP: f64 = 0.2;

/// Trait for scale functions that map domain values to pixel positions.
pub trait Scale<D> {
    /// Transform a domain value to a pixel position.
    fn scale(&self, value: D) -> f64;

    /// Get the pixel range.
    fn range(&self) -> (f64, f64);
}

/// Input space of a scale: a numeric interval or an ordered category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Domain {
    /// `[min, max]` numeric bounds.
    Continuous(f64, f64),
    /// Ordered category labels.
    Categorical(Vec<String>),
}

impl Domain {
    /// Numeric domain.
    #[must_use]
    pub fn continuous(min: f64, max: f64) -> Self {
        Domain::Continuous(min, max)
    }

    /// Category domain from any list of labels.
    #[must_use]
    pub fn categorical<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Domain::Categorical(labels.into_iter().map(Into::into).collect())
    }

    /// Infer a domain from data values.
    ///
    /// If the first value is a category the domain is the ordered set of
    /// labels; otherwise it is the `[min, max]` of the numeric values. An
    /// empty slice yields non-finite bounds, which build a degenerate scale.
    #[must_use]
    pub fn from_values(values: &[Value]) -> Self {
        Self::extent(values, false)
    }

    /// Like [`Domain::from_values`] but numeric extents always include zero.
    #[must_use]
    pub fn from_values_with_zero(values: &[Value]) -> Self {
        Self::extent(values, true)
    }

    fn extent(values: &[Value], include_zero: bool) -> Self {
        if values.first().is_some_and(Value::is_category) {
            let mut labels: Vec<String> = Vec::new();
            for v in values {
                let label = v.to_string();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
            return Domain::Categorical(labels);
        }

        let numbers = values.iter().filter_map(Value::as_number);
        let (mut min, mut max) = numbers.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if include_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        Domain::Continuous(min, max)
    }

    /// Whether this domain builds a band scale.
    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self, Domain::Categorical(_))
    }
}

/// A tick mark: pixel position plus label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Pixel position along the axis.
    pub position: f64,
    /// Display label.
    pub label: String,
}

// ============================================================================
// Linear
// ============================================================================

/// Linear scale for continuous-to-pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// Returns `None` when a bound is non-finite or the domain is empty
    /// (`min == max`); callers fall back to a degenerate scale.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Option<Self> {
        let finite = domain.0.is_finite() && domain.1.is_finite();
        if !finite || domain.0 == domain.1 {
            return None;
        }
        Some(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Get the domain extent.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    /// Invert the scale (pixel to domain).
    #[must_use]
    pub fn invert(&self, position: f64) -> f64 {
        if self.range_max == self.range_min {
            return self.domain_min;
        }
        let t = (position - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Round-number tick values inside the domain, roughly `count` of them.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain_min <= self.domain_max {
            (self.domain_min, self.domain_max)
        } else {
            (self.domain_max, self.domain_min)
        };
        let mut values = nice_ticks(lo, hi, count.max(1));
        if self.domain_min > self.domain_max {
            values.reverse();
        }
        values
    }

    /// Labels for [`LinearScale::ticks`], formatted to the tick step precision.
    #[must_use]
    pub fn tick_labels(&self, ticks: &[f64]) -> Vec<String> {
        let step = match ticks {
            [a, b, ..] => (b - a).abs(),
            _ => (self.domain_max - self.domain_min).abs(),
        };
        let decimals = if step > 0.0 && step.is_finite() {
            (-step.log10() - 1e-9).ceil().max(0.0) as usize
        } else {
            0
        };
        ticks
            .iter()
            .map(|t| format!("{:.*}", decimals, t + 0.0))
            .collect()
    }
}

impl Scale<f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Upper bound on ticks produced per tick requested.
const MAX_TICKS_PER_REQUESTED: usize = 10;

/// Tick values at a 1/2/5 × 10^k step covering `[lo, hi]`.
///
/// Spans too small or too large to step through in floating point fall back
/// to the two endpoints.
fn nice_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if lo == hi {
        return vec![lo];
    }
    let raw = (hi - lo) / count as f64;
    if !(raw.is_finite() && raw > 0.0) {
        return vec![lo, hi];
    }
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    // Work in integer multiples so 0.1 * 3 prints as 0.3.
    let (multiplier, divides) = if power < 0.0 {
        (10f64.powf(-power) / factor, true)
    } else {
        (10f64.powf(power) * factor, false)
    };
    let (first, last) = if divides {
        ((lo * multiplier).ceil(), (hi * multiplier).floor())
    } else {
        ((lo / multiplier).ceil(), (hi / multiplier).floor())
    };
    let limit = count.saturating_mul(MAX_TICKS_PER_REQUESTED) as f64;
    if !(multiplier.is_finite() && first.is_finite() && last.is_finite()) || last - first > limit {
        tracing::debug!(lo, hi, "tick span not representable, using endpoints");
        return vec![lo, hi];
    }

    (first as i64..=last as i64)
        .map(|i| {
            if divides {
                i as f64 / multiplier
            } else {
                i as f64 * multiplier
            }
        })
        .collect()
}

// ============================================================================
// Band
// ============================================================================

/// Band scale: each category owns an equal step of the range, with a gap
/// split evenly on both sides of its band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    categories: Vec<String>,
    range_min: f64,
    range_max: f64,
    gap: f64,
}

impl BandScale {
    /// Create a band scale. Returns `None` for an empty category list.
    ///
    /// `gap` is clamped to `[0, 1)`; duplicate labels keep their first slot.
    #[must_use]
    pub fn new(categories: &[String], range: (f64, f64), gap: f64) -> Option<Self> {
        if categories.is_empty() {
            return None;
        }
        let mut unique: Vec<String> = Vec::with_capacity(categories.len());
        for c in categories {
            if !unique.contains(c) {
                unique.push(c.clone());
            }
        }
        let gap = if gap.is_finite() {
            gap.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            DEFAULT_BAND_GAP
        };
        Some(Self {
            categories: unique,
            range_min: range.0,
            range_max: range.1,
            gap,
        })
    }

    /// Ordered category labels.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Signed distance between consecutive band slots.
    #[must_use]
    pub fn step(&self) -> f64 {
        (self.range_max - self.range_min) / self.categories.len() as f64
    }

    /// Width of one band.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step().abs() * (1.0 - self.gap)
    }

    /// Clamped gap fraction.
    #[must_use]
    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Start (lowest pixel coordinate) of the band for `category`.
    #[must_use]
    pub fn position(&self, category: &str) -> Option<f64> {
        let index = self.categories.iter().position(|c| c == category)?;
        let step = self.step();
        let a = self.range_min + index as f64 * step;
        let b = a + step;
        Some(a.min(b) + step.abs() * self.gap / 2.0)
    }

    /// Centre of the band for `category`.
    #[must_use]
    pub fn center(&self, category: &str) -> Option<f64> {
        self.position(category).map(|p| p + self.bandwidth() / 2.0)
    }

    fn midpoint(&self) -> f64 {
        (self.range_min + self.range_max) / 2.0
    }
}

impl Scale<&str> for BandScale {
    fn scale(&self, value: &str) -> f64 {
        self.position(value).unwrap_or_else(|| self.midpoint())
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

// ============================================================================
// Position scale
// ============================================================================

/// The scale handed from contexts to marks.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionScale {
    /// Continuous mapping.
    Linear(LinearScale),
    /// Banded category mapping.
    Band(BandScale),
    /// Everything maps to the range midpoint.
    Degenerate {
        /// Pixel range.
        range: (f64, f64),
    },
}

impl PositionScale {
    /// Build a scale for `domain` over `range`.
    ///
    /// Categorical domains build band scales with `band_gap`; numeric domains
    /// build linear scales. Empty category lists and non-finite or empty
    /// numeric domains build a degenerate scale.
    #[must_use]
    pub fn build(domain: &Domain, range: (f64, f64), band_gap: f64) -> Self {
        let built = match domain {
            Domain::Continuous(a, b) => {
                LinearScale::new((*a, *b), range).map(PositionScale::Linear)
            }
            Domain::Categorical(labels) => {
                BandScale::new(labels, range, band_gap).map(PositionScale::Band)
            }
        };
        built.unwrap_or_else(|| {
            tracing::debug!(?domain, ?range, "degenerate domain, mapping to range midpoint");
            PositionScale::Degenerate { range }
        })
    }

    /// Pixel range.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            PositionScale::Linear(s) => s.range(),
            PositionScale::Band(b) => b.range(),
            PositionScale::Degenerate { range } => *range,
        }
    }

    /// Band width, zero for non-band scales.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        match self {
            PositionScale::Band(b) => b.bandwidth(),
            _ => 0.0,
        }
    }

    /// Signed extent `range.1 - range.0`.
    #[must_use]
    pub fn extent(&self) -> f64 {
        let (a, b) = self.range();
        b - a
    }

    /// Whether this is a degenerate scale.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, PositionScale::Degenerate { .. })
    }

    /// Axis ticks: nice values for linear scales, band centres for band
    /// scales, nothing for degenerate scales.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        match self {
            PositionScale::Linear(s) => {
                let values = s.ticks(count);
                let labels = s.tick_labels(&values);
                values
                    .into_iter()
                    .zip(labels)
                    .map(|(v, label)| Tick {
                        position: s.scale(v),
                        label,
                    })
                    .collect()
            }
            PositionScale::Band(b) => b
                .categories()
                .iter()
                .filter_map(|c| {
                    b.center(c).map(|position| Tick {
                        position,
                        label: c.clone(),
                    })
                })
                .collect(),
            PositionScale::Degenerate { .. } => Vec::new(),
        }
    }

    fn midpoint(&self) -> f64 {
        let (a, b) = self.range();
        (a + b) / 2.0
    }
}

impl Scale<f64> for PositionScale {
    fn scale(&self, value: f64) -> f64 {
        match self {
            PositionScale::Linear(s) => s.scale(value),
            _ => self.midpoint(),
        }
    }

    fn range(&self) -> (f64, f64) {
        PositionScale::range(self)
    }
}

impl Scale<&Value> for PositionScale {
    fn scale(&self, value: &Value) -> f64 {
        match (self, value) {
            (PositionScale::Linear(s), Value::Number(v)) => s.scale(*v),
            (PositionScale::Band(b), Value::Category(c)) => b.scale(c.as_str()),
            _ => self.midpoint(),
        }
    }

    fn range(&self) -> (f64, f64) {
        PositionScale::range(self)
    }
}

/// Build a position scale with the default band gap.
#[must_use]
pub fn build_scale(domain: &Domain, range: (f64, f64)) -> PositionScale {
    PositionScale::build(domain, range, DEFAULT_BAND_GAP)
}
