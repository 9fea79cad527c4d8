//! SVG serialization of a render tree.
//!
//! Writes every attached node with its attributes and style. Tweens recorded
//! by transitions become SMIL `<animate>` children that run once from the
//! previous value and freeze on the new one.

use crate::color::Rgba;
use crate::error::Result;
use crate::path::fmt_num;
use crate::scene::{Document, Node, NodeId, Tween, TweenKind};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG writer for [`Document`]s.
#[derive(Debug, Clone)]
pub struct SvgWriter {
    /// Background color (None for transparent)
    background: Option<Rgba>,
    /// Emit `<animate>` for recorded tweens
    animations: bool,
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgWriter {
    /// Writer with a transparent background and animations on.
    #[must_use]
    pub fn new() -> Self {
        Self {
            background: None,
            animations: true,
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Enable or disable `<animate>` output.
    #[must_use]
    pub fn animations(mut self, enabled: bool) -> Self {
        self.animations = enabled;
        self
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self, doc: &Document) -> String {
        let mut svg = String::with_capacity(4096);
        let root = doc.node(doc.root());

        // SVG header
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}""#,
            doc.width(),
            doc.height(),
            doc.width(),
            doc.height()
        );
        write_attributes(&mut svg, root);
        svg.push_str(">\n");

        // Background
        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                bg.to_css()
            );
        }

        for child in root.children() {
            self.write_node(&mut svg, doc, *child, 1);
        }

        // Close SVG
        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, doc: &Document, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render(doc).as_bytes())?;
        Ok(())
    }

    fn write_node(&self, svg: &mut String, doc: &Document, id: NodeId, depth: usize) {
        let node = doc.node(id);
        if !node.is_attached() {
            return;
        }
        let indent = "  ".repeat(depth);
        let tweens: &[Tween] = if self.animations { node.tweens() } else { &[] };

        let _ = write!(svg, "{indent}<{}", node.tag());
        write_attributes(svg, node);

        if node.children().is_empty() && tweens.is_empty() {
            match node.text() {
                Some(text) => {
                    let _ = writeln!(svg, ">{}</{}>", escape(text), node.tag());
                }
                None => svg.push_str("/>\n"),
            }
            return;
        }

        svg.push('>');
        if let Some(text) = node.text() {
            svg.push_str(&escape(text));
        }
        svg.push('\n');
        for tween in tweens {
            let _ = writeln!(svg, "{indent}  {}", animate_element(tween));
        }
        for child in node.children() {
            self.write_node(svg, doc, *child, depth + 1);
        }
        let _ = writeln!(svg, "{indent}</{}>", node.tag());
    }
}

fn write_attributes(svg: &mut String, node: &Node) {
    for (name, value) in node.attributes() {
        let _ = write!(svg, r#" {name}="{}""#, escape(value));
    }
    if !node.style().is_empty() {
        let style: Vec<String> = node
            .style()
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        let _ = write!(svg, r#" style="{}""#, escape(&style.join("; ")));
    }
}

fn animate_element(tween: &Tween) -> String {
    let attribute_type = match tween.kind {
        TweenKind::Attribute => "XML",
        TweenKind::Style => "CSS",
    };
    format!(
        r#"<animate attributeName="{}" attributeType="{attribute_type}" from="{}" to="{}" dur="{}ms" fill="freeze"/>"#,
        escape(&tween.property),
        escape(&tween.from),
        escape(&tween.to),
        fmt_num(tween.duration_ms)
    )
}

/// Escape XML special characters
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
