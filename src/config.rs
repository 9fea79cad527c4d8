//! Scene configuration files.
//!
//! A scene file lists top-level contexts (with their nested render trees)
//! and standalone marks. YAML and JSON are both accepted:
//!
//! ```yaml
//! width: 400
//! height: 200
//! contexts:
//!   - id: main
//!     x_domain: [a, b, c]
//!     x_range: [40, 360]
//!     y_domain: [0, 10]
//!     y_range: [180, 20]
//!     children:
//!       - type: mark
//!         id: sales
//!         mark: { kind: bar }
//!         data: [{ x: a, y: 3 }, { x: b, y: 7 }]
//! ```

use crate::color::Rgba;
use crate::context::{context_standalone, StandaloneContextSpec};
use crate::error::{Error, Result};
use crate::marks::{render_mark_standalone, MarkSpec, StandaloneSize};
use crate::output::SvgWriter;
use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A complete scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Document width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Document height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Background fill for SVG output.
    #[serde(default)]
    pub background: Option<Rgba>,

    /// Top-level contexts, rendered first.
    #[serde(default)]
    pub contexts: Vec<StandaloneContextSpec>,

    /// Standalone marks laid out over the whole document.
    #[serde(default)]
    pub marks: Vec<MarkSpec>,
}

fn default_width() -> u32 {
    600
}
fn default_height() -> u32 {
    300
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: None,
            contexts: Vec::new(),
            marks: Vec::new(),
        }
    }
}

impl SceneConfig {
    /// Creates an empty scene description with default size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a scene from a `.yaml`, `.yml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has another extension,
    /// or fails to parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let is_json = match extension.as_deref() {
            Some("yaml" | "yml") => false,
            Some("json") => true,
            _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
        };

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        tracing::debug!(path = %path.display(), is_json, "loading scene config");
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Parses a scene from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the 1-indexed line of the failure.
    pub fn parse_yaml(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Parses a scene from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the input is malformed.
    pub fn parse_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the scene back to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if a value cannot be represented.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).map_err(|e| Error::ConfigParse {
            line: 0,
            message: e.to_string(),
        })
    }

    /// Renders into a fresh scene.
    #[must_use]
    pub fn render(&self) -> Scene {
        let mut scene = Scene::new(self.width, self.height);
        self.render_into(&mut scene);
        scene
    }

    /// Renders into an existing scene, reusing nodes with the same ids.
    ///
    /// Hosts that registered spans on `scene` keep them across re-renders.
    pub fn render_into(&self, scene: &mut Scene) {
        let root = scene.root();
        for spec in &self.contexts {
            context_standalone(scene, root, spec);
        }
        let size = StandaloneSize {
            width: f64::from(self.width),
            height: f64::from(self.height),
        };
        for mark in &self.marks {
            render_mark_standalone(scene, root, mark, size);
        }
        tracing::debug!(
            contexts = self.contexts.len(),
            marks = self.marks.len(),
            nodes = scene.document().len(),
            "scene rendered"
        );
    }

    /// SVG writer configured with this scene's background.
    #[must_use]
    pub fn svg_writer(&self) -> SvgWriter {
        SvgWriter::new().background(self.background)
    }
}
