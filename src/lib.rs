//! # Trueno-Ctx
//!
//! Declarative chart composition with nested coordinate contexts.
//!
//! A chart is a tree: contexts carve fractional sub-rectangles out of their
//! parent and hand fresh, zero-based scales to their children; marks (area,
//! line, shape, bar) bind data to keyed elements and compute geometry from
//! those scales. Every node accepts the same [`AttributeDescription`] of
//! attributes, style, events and animation, and interactive marks report
//! events to externally-owned [`Span`](span::Span)s.
//!
//! ## Features
//!
//! - **Nested contexts**: a subtree renders identically wherever it is placed
//! - **Keyed re-render**: same ids reuse nodes, handlers never stack
//! - **Animations**: transitions recorded as tweens, written as SVG `<animate>`
//! - **Configs**: whole scenes from YAML or JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trueno_ctx::prelude::*;
//!
//! let mut scene = Scene::new(400, 200);
//! let root = scene.root();
//! let outer = StandaloneContextSpec::new(
//!     "main",
//!     Domain::continuous(0.0, 1.0),
//!     (40.0, 360.0),
//!     Domain::continuous(0.0, 1.0),
//!     (180.0, 20.0),
//! )
//! .child(
//!     ContextSpec::new("left", Domain::categorical(["a", "b"]), Domain::continuous(0.0, 10.0))
//!         .x_range(0.0, 0.5)
//!         .child(MarkSpec::new("sales", MarkKind::Bar).data(vec![Datum::xy("a", 3.0)])),
//! );
//! context_standalone(&mut scene, root, &outer);
//! SvgWriter::new().write_to_file(scene.document(), "chart.svg")?;
//! ```

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color type and CSS formatting.
pub mod color;

/// Data records and bound values.
pub mod data;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Scale functions for data-to-pixel mappings.
pub mod scale;

/// Path-data generators for curves and symbols.
pub mod path;

// ============================================================================
// Render Tree
// ============================================================================

/// Arena render tree, selections and event dispatch.
pub mod scene;

/// Externally-owned reactive cells fed by mark events.
pub mod span;

/// Declarative attribute descriptions.
pub mod description;

/// Applies attribute descriptions to selections.
pub mod splice;

// ============================================================================
// Composition
// ============================================================================

/// Axis scales and guides.
pub mod axis;

/// Area, line, shape and bar renderers.
pub mod marks;

/// Nested coordinate contexts and render trees.
pub mod context;

/// YAML/JSON scene descriptions.
pub mod config;

// ============================================================================
// Output
// ============================================================================

/// Output encoders (SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-ctx operations.
pub mod error;

pub use description::AttributeDescription;
pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust,ignore
/// use trueno_ctx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::axis::{x_axis, y_axis, AxisOptions, AxisOrient};
    pub use crate::color::Rgba;
    pub use crate::config::SceneConfig;
    pub use crate::context::{
        compose, context, context_standalone, ContextSpec, RenderNode, StandaloneContextSpec,
    };
    pub use crate::data::{Bound, Datum, Value};
    pub use crate::description::{AttrValue, AttributeDescription};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Point, Rect};
    pub use crate::marks::{
        area, area_standalone, bar, bar_standalone, line, line_standalone, shape,
        shape_standalone, MarkKind, MarkSpec, StandaloneSize,
    };
    pub use crate::output::SvgWriter;
    pub use crate::path::{Curve, Symbol};
    pub use crate::scale::{build_scale, Domain, PositionScale, Scale};
    pub use crate::scene::{Document, Event, NodeId, Scene, Selection};
    pub use crate::span::{EventRecord, Span, SpanRegistry};
    pub use crate::splice::splice;
}
