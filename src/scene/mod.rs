//! Scene capability
//!
//! The builder and the showcase renderer never create output directly; they
//! drive a [`Scene`] handed to them by the caller. A scene owns every node it
//! creates and hands out [`NodeId`] handles. [`MemoryScene`] is an in-process
//! host that measures auto-layout frames and can be exported to SVG.

pub mod memory;
pub mod svg;
pub mod types;

pub use memory::{MemoryScene, SceneNode};
pub use svg::render_svg;
pub use types::*;

use async_trait::async_trait;

use crate::error::BuildError;

/// Node construction and layout operations offered by a host
#[async_trait]
pub trait Scene: Send {
    fn create_frame(&mut self) -> NodeId;
    fn create_text(&mut self) -> NodeId;
    fn create_rectangle(&mut self) -> NodeId;

    fn set_name(&mut self, node: NodeId, name: &str);
    fn set_layout_mode(&mut self, node: NodeId, mode: LayoutMode);
    /// Sizing along the primary and counter auto-layout axes
    fn set_sizing(&mut self, node: NodeId, primary: SizingMode, counter: SizingMode);
    fn resize(&mut self, node: NodeId, width: f64, height: f64);
    fn set_corner_radius(&mut self, node: NodeId, radius: f64);
    fn set_padding(&mut self, node: NodeId, padding: Padding);
    fn set_min_width(&mut self, node: NodeId, width: f64);
    fn set_min_height(&mut self, node: NodeId, height: f64);
    fn set_fills(&mut self, node: NodeId, fills: Vec<Paint>);
    fn set_strokes(&mut self, node: NodeId, strokes: Vec<Paint>);
    fn set_stroke_weight(&mut self, node: NodeId, weight: f64);
    fn set_primary_axis_align(&mut self, node: NodeId, align: AxisAlign);
    fn set_counter_axis_align(&mut self, node: NodeId, align: AxisAlign);
    fn set_item_spacing(&mut self, node: NodeId, spacing: f64);

    /// Make a font available; must succeed before a text node uses it
    async fn load_font(&mut self, font: &FontName) -> Result<(), BuildError>;
    fn set_font(&mut self, node: NodeId, font: &FontName);
    fn set_characters(&mut self, node: NodeId, characters: &str);
    fn set_font_size(&mut self, node: NodeId, size: f64);

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Place a page-level node
    fn add_to_page(&mut self, node: NodeId);
    fn set_position(&mut self, node: NodeId, x: f64, y: f64);
    /// Current laid-out size of a node
    fn measure(&self, node: NodeId) -> Size;
    /// Select the given nodes and scroll them into view
    fn select_and_reveal(&mut self, nodes: &[NodeId]);
}
