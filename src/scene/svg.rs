//! SVG export of a [`MemoryScene`]
//!
//! Page-level nodes are drawn at their own positions; everything below them
//! is placed with [`MemoryScene::child_offsets`], so auto-layout frames come
//! out exactly as they were measured.

use super::memory::{MemoryScene, SceneNode};
use super::types::{NodeId, NodeKind, Paint, Size};
use super::Scene;
use crate::config::SvgConfig;

/// Baseline offset of a line relative to the font size
const ASCENT: f64 = 0.9;

const LINE_HEIGHT: f64 = 1.2;

/// Axis-aligned bounds in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Bounds {
    fn union(self, other: Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Bounds {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

/// Build SVG elements incrementally
struct SvgBuilder<'a> {
    config: &'a SvgConfig,
    elements: Vec<String>,
    indent: usize,
}

impl<'a> SvgBuilder<'a> {
    fn new(config: &'a SvgConfig) -> Self {
        Self {
            config,
            elements: Vec::new(),
            indent: 1,
        }
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn push(&mut self, element: String) {
        let line = format!("{}{}", self.indent_str(), element);
        self.elements.push(line);
    }

    fn start_group(&mut self, name: &str) {
        self.push(format!(r#"<g data-name="{}">"#, escape_xml(name)));
        self.indent += 1;
    }

    fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.push("</g>".to_string());
    }

    fn add_rect(&mut self, node: &SceneNode, x: f64, y: f64, size: Size) {
        let radius = if node.corner_radius > 0.0 {
            format!(r#" rx="{}""#, node.corner_radius)
        } else {
            String::new()
        };
        self.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            x,
            y,
            size.width,
            size.height,
            radius,
            paint_attributes(node)
        ));
    }

    fn add_text(&mut self, node: &SceneNode, x: f64, y: f64) {
        let (family, weight) = match &node.font {
            Some(font) => (font.family.as_str(), style_weight(&font.style)),
            None => ("sans-serif", 400),
        };
        let fill = node
            .fills
            .first()
            .map(|p| fill_attribute("fill", p))
            .unwrap_or_else(|| r#" fill="none""#.to_string());

        let spans: String = node
            .characters
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                let baseline = y + node.font_size * (ASCENT + i as f64 * LINE_HEIGHT);
                format!(r#"<tspan x="{}" y="{}">{}</tspan>"#, x, baseline, escape_xml(line))
            })
            .collect();

        self.push(format!(
            r#"<text font-family="{}" font-size="{}" font-weight="{}"{}>{}</text>"#,
            escape_xml(family),
            node.font_size,
            weight,
            fill,
            spans
        ));
    }

    fn build(self, bounds: Bounds) -> String {
        let padding = self.config.padding;
        let vb_x = bounds.x - padding;
        let vb_y = bounds.y - padding;
        let vb_w = bounds.width + 2.0 * padding;
        let vb_h = bounds.height + 2.0 * padding;
        let nl = self.newline();

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
            vb_x, vb_y, vb_w, vb_h, vb_w, vb_h
        ));
        svg.push_str(nl);

        if let Some(background) = &self.config.background {
            svg.push_str(&format!(
                r#"{}<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                if self.config.pretty_print { "  " } else { "" },
                vb_x,
                vb_y,
                vb_w,
                vb_h,
                escape_xml(background)
            ));
            svg.push_str(nl);
        }

        for element in &self.elements {
            svg.push_str(element);
            svg.push_str(nl);
        }
        svg.push_str("</svg>");
        svg
    }
}

/// Render every page-level node of the scene as one SVG document
pub fn render_svg(scene: &MemoryScene, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config);
    let mut bounds: Option<Bounds> = None;

    for &root in scene.page() {
        let Some(node) = scene.node(root) else {
            continue;
        };
        let size = scene.measure(root);
        let root_bounds = Bounds {
            x: node.x,
            y: node.y,
            width: size.width,
            height: size.height,
        };
        bounds = Some(match bounds {
            Some(b) => b.union(root_bounds),
            None => root_bounds,
        });
        render_node(scene, root, node.x, node.y, &mut builder);
    }

    builder.build(bounds.unwrap_or(Bounds {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    }))
}

fn render_node(scene: &MemoryScene, id: NodeId, x: f64, y: f64, builder: &mut SvgBuilder<'_>) {
    let Some(node) = scene.node(id) else {
        return;
    };
    let size = scene.measure(id);
    match node.kind {
        NodeKind::Text => builder.add_text(node, x, y),
        NodeKind::Rectangle => builder.add_rect(node, x, y, size),
        NodeKind::Frame => {
            builder.start_group(&node.name);
            if !node.fills.is_empty() || !node.strokes.is_empty() {
                builder.add_rect(node, x, y, size);
            }
            for (child, dx, dy) in scene.child_offsets(id) {
                render_node(scene, child, x + dx, y + dy, builder);
            }
            builder.end_group();
        }
    }
}

fn paint_attributes(node: &SceneNode) -> String {
    let mut attrs = match node.fills.first() {
        Some(paint) => fill_attribute("fill", paint),
        None => r#" fill="none""#.to_string(),
    };
    if let Some(paint) = node.strokes.first() {
        attrs.push_str(&fill_attribute("stroke", paint));
        attrs.push_str(&format!(r#" stroke-width="{}""#, node.stroke_weight));
    }
    attrs
}

fn fill_attribute(attr: &str, paint: &Paint) -> String {
    let mut out = format!(r#" {}="{}""#, attr, paint.color.to_hex());
    if paint.opacity < 1.0 {
        out.push_str(&format!(r#" {}-opacity="{}""#, attr, paint.opacity));
    }
    out
}

/// Numeric weight for a font style name
fn style_weight(style: &str) -> u16 {
    match style {
        "Bold" => 700,
        "Semi Bold" => 600,
        "Medium" => 500,
        _ => 400,
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
