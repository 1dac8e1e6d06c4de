//! In-process scene host
//!
//! Nodes live in an arena indexed by [`NodeId`]. Sizes of auto-layout frames
//! are computed on demand from their children, so `measure` always reflects
//! the current tree. Text is measured with a fixed advance per character.

use std::collections::HashSet;

use async_trait::async_trait;

use super::types::*;
use super::Scene;
use crate::error::BuildError;

/// Advance of one glyph relative to the font size
const GLYPH_ADVANCE: f64 = 0.6;

/// Line height relative to the font size
const LINE_HEIGHT: f64 = 1.2;

const DEFAULT_FONT_SIZE: f64 = 12.0;

const DEFAULT_SHAPE_SIZE: f64 = 100.0;

/// A node stored in a [`MemoryScene`]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub layout_mode: LayoutMode,
    pub primary_sizing: SizingMode,
    pub counter_sizing: SizingMode,
    pub corner_radius: f64,
    /// top, right, bottom, left
    pub padding: [f64; 4],
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: f64,
    pub primary_align: AxisAlign,
    pub counter_align: AxisAlign,
    pub item_spacing: f64,
    pub font: Option<FontName>,
    pub characters: String,
    pub font_size: f64,
}

impl SceneNode {
    fn new(kind: NodeKind) -> Self {
        let (name, fills) = match kind {
            NodeKind::Frame => ("Frame", vec![Paint::solid(Rgb::WHITE)]),
            NodeKind::Text => ("Text", vec![Paint::solid(Rgb::BLACK)]),
            NodeKind::Rectangle => (
                "Rectangle",
                vec![Paint::solid(Rgb::new(0.85, 0.85, 0.85))],
            ),
        };
        Self {
            kind,
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: DEFAULT_SHAPE_SIZE,
            height: DEFAULT_SHAPE_SIZE,
            layout_mode: LayoutMode::None,
            primary_sizing: SizingMode::Fixed,
            counter_sizing: SizingMode::Fixed,
            corner_radius: 0.0,
            padding: [0.0; 4],
            min_width: None,
            min_height: None,
            fills,
            strokes: Vec::new(),
            stroke_weight: 1.0,
            primary_align: AxisAlign::Min,
            counter_align: AxisAlign::Min,
            item_spacing: 0.0,
            font: None,
            characters: String::new(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Arena-backed [`Scene`] implementation
#[derive(Debug, Default)]
pub struct MemoryScene {
    nodes: Vec<SceneNode>,
    page: Vec<NodeId>,
    selection: Vec<NodeId>,
    /// `None` means every font is available
    available_fonts: Option<HashSet<FontName>>,
    loaded_fonts: Vec<FontName>,
}

impl MemoryScene {
    /// Create a scene in which every font loads
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene in which only the given fonts load
    pub fn with_fonts(fonts: impl IntoIterator<Item = FontName>) -> Self {
        Self {
            available_fonts: Some(fonts.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Page-level nodes in placement order
    pub fn page(&self) -> &[NodeId] {
        &self.page
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Fonts successfully loaded, in load order
    pub fn loaded_fonts(&self) -> &[FontName] {
        &self.loaded_fonts
    }

    /// Children of a node, empty for unknown handles
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// First descendant (or the node itself) with the given name
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        let node = self.node(root)?;
        if node.name == name {
            return Some(root);
        }
        node.children
            .iter()
            .find_map(|&child| self.find_by_name(child, name))
    }

    /// Offsets of a frame's children relative to the frame's origin
    pub fn child_offsets(&self, id: NodeId) -> Vec<(NodeId, f64, f64)> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        if node.layout_mode == LayoutMode::None {
            return node
                .children
                .iter()
                .map(|&c| {
                    let (x, y) = self.node(c).map(|n| (n.x, n.y)).unwrap_or_default();
                    (c, x, y)
                })
                .collect();
        }

        let horizontal = node.layout_mode == LayoutMode::Horizontal;
        let size = self.measure(id);
        let [top, right, bottom, left] = node.padding;
        let (lead, trail, cross_lead, cross_trail) = if horizontal {
            (left, right, top, bottom)
        } else {
            (top, bottom, left, right)
        };
        let (primary_extent, counter_extent) = if horizontal {
            (size.width, size.height)
        } else {
            (size.height, size.width)
        };

        let sizes: Vec<(f64, f64)> = node
            .children
            .iter()
            .map(|&c| {
                let s = self.measure(c);
                if horizontal {
                    (s.width, s.height)
                } else {
                    (s.height, s.width)
                }
            })
            .collect();
        let used: f64 = sizes.iter().map(|(p, _)| p).sum::<f64>()
            + node.item_spacing * sizes.len().saturating_sub(1) as f64;
        let free = (primary_extent - lead - trail - used).max(0.0);

        let (mut cursor, gap) = match node.primary_align {
            AxisAlign::Min => (lead, node.item_spacing),
            AxisAlign::Center => (lead + free / 2.0, node.item_spacing),
            AxisAlign::Max => (lead + free, node.item_spacing),
            AxisAlign::SpaceBetween if sizes.len() > 1 => {
                (lead, node.item_spacing + free / (sizes.len() - 1) as f64)
            }
            AxisAlign::SpaceBetween => (lead, node.item_spacing),
        };

        let inner_counter = counter_extent - cross_lead - cross_trail;
        node.children
            .iter()
            .zip(sizes)
            .map(|(&child, (primary, counter))| {
                let cross = match node.counter_align {
                    AxisAlign::Center => cross_lead + (inner_counter - counter) / 2.0,
                    AxisAlign::Max => cross_lead + inner_counter - counter,
                    AxisAlign::Min | AxisAlign::SpaceBetween => cross_lead,
                };
                let offset = if horizontal {
                    (child, cursor, cross)
                } else {
                    (child, cross, cursor)
                };
                cursor += primary + gap;
                offset
            })
            .collect()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(SceneNode::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    fn font_available(&self, font: &FontName) -> bool {
        self.available_fonts
            .as_ref()
            .map_or(true, |fonts| fonts.contains(font))
    }

    fn measure_text(node: &SceneNode) -> Size {
        let lines: Vec<&str> = node.characters.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            longest as f64 * node.font_size * GLYPH_ADVANCE,
            lines.len() as f64 * node.font_size * LINE_HEIGHT,
        )
    }

    fn measure_auto_layout(&self, node: &SceneNode) -> Size {
        let horizontal = node.layout_mode == LayoutMode::Horizontal;
        let children: Vec<Size> = node.children.iter().map(|&c| self.measure(c)).collect();
        let spacing = node.item_spacing * children.len().saturating_sub(1) as f64;
        let [top, right, bottom, left] = node.padding;

        let (content_w, content_h) = if horizontal {
            (
                children.iter().map(|s| s.width).sum::<f64>() + spacing,
                children.iter().map(|s| s.height).fold(0.0, f64::max),
            )
        } else {
            (
                children.iter().map(|s| s.width).fold(0.0, f64::max),
                children.iter().map(|s| s.height).sum::<f64>() + spacing,
            )
        };
        let (width_mode, height_mode) = if horizontal {
            (node.primary_sizing, node.counter_sizing)
        } else {
            (node.counter_sizing, node.primary_sizing)
        };
        let width = match width_mode {
            SizingMode::Auto => content_w + left + right,
            SizingMode::Fixed => node.width,
        };
        let height = match height_mode {
            SizingMode::Auto => content_h + top + bottom,
            SizingMode::Fixed => node.height,
        };
        Size::new(width, height)
    }
}

#[async_trait]
impl Scene for MemoryScene {
    fn create_frame(&mut self) -> NodeId {
        self.create(NodeKind::Frame)
    }

    fn create_text(&mut self) -> NodeId {
        self.create(NodeKind::Text)
    }

    fn create_rectangle(&mut self) -> NodeId {
        self.create(NodeKind::Rectangle)
    }

    fn set_name(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.node_mut(node) {
            n.name = name.to_string();
        }
    }

    fn set_layout_mode(&mut self, node: NodeId, mode: LayoutMode) {
        if let Some(n) = self.node_mut(node) {
            n.layout_mode = mode;
        }
    }

    fn set_sizing(&mut self, node: NodeId, primary: SizingMode, counter: SizingMode) {
        if let Some(n) = self.node_mut(node) {
            n.primary_sizing = primary;
            n.counter_sizing = counter;
        }
    }

    fn resize(&mut self, node: NodeId, width: f64, height: f64) {
        if let Some(n) = self.node_mut(node) {
            n.width = width;
            n.height = height;
        }
    }

    fn set_corner_radius(&mut self, node: NodeId, radius: f64) {
        if let Some(n) = self.node_mut(node) {
            n.corner_radius = radius;
        }
    }

    fn set_padding(&mut self, node: NodeId, padding: Padding) {
        if let Some(n) = self.node_mut(node) {
            let sides = [padding.top, padding.right, padding.bottom, padding.left];
            for (slot, side) in n.padding.iter_mut().zip(sides) {
                if let Some(value) = side {
                    *slot = value;
                }
            }
        }
    }

    fn set_min_width(&mut self, node: NodeId, width: f64) {
        if let Some(n) = self.node_mut(node) {
            n.min_width = Some(width);
        }
    }

    fn set_min_height(&mut self, node: NodeId, height: f64) {
        if let Some(n) = self.node_mut(node) {
            n.min_height = Some(height);
        }
    }

    fn set_fills(&mut self, node: NodeId, fills: Vec<Paint>) {
        if let Some(n) = self.node_mut(node) {
            n.fills = fills;
        }
    }

    fn set_strokes(&mut self, node: NodeId, strokes: Vec<Paint>) {
        if let Some(n) = self.node_mut(node) {
            n.strokes = strokes;
        }
    }

    fn set_stroke_weight(&mut self, node: NodeId, weight: f64) {
        if let Some(n) = self.node_mut(node) {
            n.stroke_weight = weight;
        }
    }

    fn set_primary_axis_align(&mut self, node: NodeId, align: AxisAlign) {
        if let Some(n) = self.node_mut(node) {
            n.primary_align = align;
        }
    }

    fn set_counter_axis_align(&mut self, node: NodeId, align: AxisAlign) {
        if let Some(n) = self.node_mut(node) {
            n.counter_align = align;
        }
    }

    fn set_item_spacing(&mut self, node: NodeId, spacing: f64) {
        if let Some(n) = self.node_mut(node) {
            n.item_spacing = spacing;
        }
    }

    async fn load_font(&mut self, font: &FontName) -> Result<(), BuildError> {
        if !self.font_available(font) {
            return Err(BuildError::scene(format!("font '{}' is not installed", font)));
        }
        if !self.loaded_fonts.contains(font) {
            self.loaded_fonts.push(font.clone());
        }
        Ok(())
    }

    fn set_font(&mut self, node: NodeId, font: &FontName) {
        if let Some(n) = self.node_mut(node) {
            n.font = Some(font.clone());
        }
    }

    fn set_characters(&mut self, node: NodeId, characters: &str) {
        if let Some(n) = self.node_mut(node) {
            n.characters = characters.to_string();
        }
    }

    fn set_font_size(&mut self, node: NodeId, size: f64) {
        if let Some(n) = self.node_mut(node) {
            n.font_size = size;
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.node(parent).is_none() {
            return;
        }
        let previous = match self.node_mut(child) {
            Some(n) => n.parent.replace(parent),
            None => return,
        };
        if let Some(old) = previous.and_then(|p| self.node_mut(p)) {
            old.children.retain(|&c| c != child);
        }
        self.page.retain(|&c| c != child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    fn add_to_page(&mut self, node: NodeId) {
        if self.node(node).is_some() && !self.page.contains(&node) {
            self.page.push(node);
        }
    }

    fn set_position(&mut self, node: NodeId, x: f64, y: f64) {
        if let Some(n) = self.node_mut(node) {
            n.x = x;
            n.y = y;
        }
    }

    fn measure(&self, node: NodeId) -> Size {
        let Some(n) = self.node(node) else {
            return Size::default();
        };
        let size = match (n.kind, n.layout_mode) {
            (NodeKind::Text, _) => Self::measure_text(n),
            (NodeKind::Frame, LayoutMode::Horizontal | LayoutMode::Vertical) => {
                self.measure_auto_layout(n)
            }
            _ => Size::new(n.width, n.height),
        };
        Size::new(
            size.width.max(n.min_width.unwrap_or(0.0)),
            size.height.max(n.min_height.unwrap_or(0.0)),
        )
    }

    fn select_and_reveal(&mut self, nodes: &[NodeId]) {
        self.selection = nodes.to_vec();
    }
}
