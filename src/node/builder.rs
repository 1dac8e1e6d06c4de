//! Recursive node construction against a [`Scene`]

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::{debug, warn};

use super::definition::{FrameDefinition, NodeDefinition, ShapeProperties, TextDefinition};
use crate::config::FontConfig;
use crate::error::BuildError;
use crate::scene::{FontName, LayoutMode, NodeId, Scene, SizingMode};

/// Characters of a text node that sets none
pub const DEFAULT_CHARACTERS: &str = "Text";

/// Style used for the fallback family
pub const FALLBACK_STYLE: &str = "Regular";

const DEFAULT_WEIGHT: f64 = 400.0;

/// Font style for a numeric weight
pub fn font_style(weight: f64) -> &'static str {
    if weight >= 700.0 {
        "Bold"
    } else if weight >= 600.0 {
        "Semi Bold"
    } else if weight >= 500.0 {
        "Medium"
    } else {
        "Regular"
    }
}

/// Builds scene nodes from typed definitions
///
/// Children are built one at a time in declared order; a child may wait on
/// font loading before the next one starts.
pub struct NodeBuilder<'a, S: Scene + ?Sized> {
    scene: &'a mut S,
    fonts: &'a FontConfig,
}

impl<'a, S: Scene + ?Sized> NodeBuilder<'a, S> {
    pub fn new(scene: &'a mut S, fonts: &'a FontConfig) -> Self {
        Self { scene, fonts }
    }

    /// The scene nodes are built into
    pub fn scene(&mut self) -> &mut S {
        &mut *self.scene
    }

    /// Build a node, or nothing for an unknown type tag
    pub fn build<'b>(
        &'b mut self,
        definition: &'b NodeDefinition,
    ) -> BoxFuture<'b, Result<Option<NodeId>, BuildError>> {
        async move {
            match definition {
                NodeDefinition::Frame(frame) => self.build_frame(frame).await.map(Some),
                NodeDefinition::Text(text) => self.build_text(text).await.map(Some),
                NodeDefinition::Rectangle(shape) => Ok(Some(self.build_rectangle(shape))),
                NodeDefinition::Unknown { tag } => {
                    warn!(tag = %tag, "unknown node type, skipping");
                    Ok(None)
                }
            }
        }
        .boxed()
    }

    /// Read and build a resolved JSON definition
    pub async fn build_value(&mut self, definition: &Value) -> Result<Option<NodeId>, BuildError> {
        let typed = NodeDefinition::from_value(definition);
        self.build(&typed).await
    }

    /// `HORIZONTAL` and `VERTICAL` frames hug their content; `NONE` turns auto
    /// layout off and keeps the fixed size.
    async fn build_frame(&mut self, frame: &FrameDefinition) -> Result<NodeId, BuildError> {
        let node = self.scene.create_frame();
        let hug = matches!(
            frame.layout_mode,
            Some(LayoutMode::Horizontal | LayoutMode::Vertical)
        );
        if let Some(mode) = frame.layout_mode {
            self.scene.set_layout_mode(node, mode);
        }
        if hug {
            self.scene.set_sizing(node, SizingMode::Auto, SizingMode::Auto);
        }
        self.apply_shape(node, &frame.shape, !hug);

        for child in &frame.children {
            if let Some(built) = self.build(child).await? {
                self.scene.append_child(node, built);
            }
        }
        Ok(node)
    }

    async fn build_text(&mut self, text: &TextDefinition) -> Result<NodeId, BuildError> {
        let font = self
            .prepare_font(text.font_weight.unwrap_or(DEFAULT_WEIGHT))
            .await?;
        let node = self.scene.create_text();
        self.scene.set_font(node, &font);
        if let Some(name) = &text.name {
            self.scene.set_name(node, name);
        }
        self.scene.set_characters(
            node,
            text.characters.as_deref().unwrap_or(DEFAULT_CHARACTERS),
        );
        if let Some(size) = text.font_size {
            self.scene.set_font_size(node, size);
        }
        if let Some(fills) = &text.fills {
            self.scene.set_fills(node, fills.clone());
        }
        Ok(node)
    }

    fn build_rectangle(&mut self, shape: &ShapeProperties) -> NodeId {
        let node = self.scene.create_rectangle();
        self.apply_shape(node, shape, true);
        node
    }

    /// Load the primary family in the weight's style, else the fallback
    async fn prepare_font(&mut self, weight: f64) -> Result<FontName, BuildError> {
        let requested = FontName::new(&self.fonts.primary, font_style(weight));
        match self.scene.load_font(&requested).await {
            Ok(()) => Ok(requested),
            Err(err) => {
                let fallback = FontName::new(&self.fonts.fallback, FALLBACK_STYLE);
                warn!(font = %requested, fallback = %fallback, error = %err, "font unavailable, falling back");
                match self.scene.load_font(&fallback).await {
                    Ok(()) => Ok(fallback),
                    Err(_) => Err(BuildError::font_unavailable(requested, fallback)),
                }
            }
        }
    }

    /// Apply the properties shared by frames and rectangles
    ///
    /// Only properties the definition sets are touched.
    fn apply_shape(&mut self, node: NodeId, shape: &ShapeProperties, fixed_size: bool) {
        let scene = &mut *self.scene;
        if let Some(name) = &shape.name {
            scene.set_name(node, name);
        }
        if fixed_size && (shape.width.is_some() || shape.height.is_some()) {
            let current = scene.measure(node);
            scene.resize(
                node,
                shape.width.unwrap_or(current.width),
                shape.height.unwrap_or(current.height),
            );
        }
        if let Some(radius) = shape.corner_radius {
            scene.set_corner_radius(node, radius);
        }
        if !shape.padding.is_empty() {
            scene.set_padding(node, shape.padding);
        }
        if let Some(width) = shape.min_width {
            scene.set_min_width(node, width);
        }
        if let Some(height) = shape.min_height {
            scene.set_min_height(node, height);
        }
        if let Some(fills) = &shape.fills {
            scene.set_fills(node, fills.clone());
        }
        match &shape.strokes {
            Some(strokes) if !strokes.is_empty() => scene.set_strokes(node, strokes.clone()),
            Some(_) => debug!(node = %node, "empty stroke list, leaving strokes unchanged"),
            None => {}
        }
        if let Some(weight) = shape.stroke_weight {
            scene.set_stroke_weight(node, weight);
        }
        if let Some(align) = shape.primary_axis_align {
            scene.set_primary_axis_align(node, align);
        }
        if let Some(align) = shape.counter_axis_align {
            scene.set_counter_axis_align(node, align);
        }
        if let Some(spacing) = shape.item_spacing {
            scene.set_item_spacing(node, spacing);
        }
    }
}

/// Build a resolved JSON definition into `scene`
pub async fn build<S: Scene + ?Sized>(
    scene: &mut S,
    definition: &Value,
    fonts: &FontConfig,
) -> Result<Option<NodeId>, BuildError> {
    NodeBuilder::new(scene, fonts).build_value(definition).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{AxisAlign, MemoryScene, NodeKind, Paint, Rgb, Size};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_font_style_ladder() {
        assert_eq!(font_style(900.0), "Bold");
        assert_eq!(font_style(700.0), "Bold");
        assert_eq!(font_style(650.0), "Semi Bold");
        assert_eq!(font_style(600.0), "Semi Bold");
        assert_eq!(font_style(500.0), "Medium");
        assert_eq!(font_style(499.0), "Regular");
        assert_eq!(font_style(100.0), "Regular");
    }

    #[tokio::test]
    async fn test_build_rectangle_applies_shared_properties() {
        let mut scene = MemoryScene::new();
        let node = build(
            &mut scene,
            &json!({
                "type": "RECTANGLE",
                "name": "swatch",
                "width": 40,
                "cornerRadius": 6,
                "fills": ["#000000"],
                "strokes": ["#ffffff"],
                "strokeWeight": 2
            }),
            &FontConfig::default(),
        )
        .await
        .unwrap()
        .expect("rectangle");

        let rect = scene.node(node).unwrap();
        assert_eq!(rect.kind, NodeKind::Rectangle);
        assert_eq!(rect.name, "swatch");
        assert_eq!((rect.width, rect.height), (40.0, 100.0));
        assert_eq!(rect.corner_radius, 6.0);
        assert_eq!(rect.fills, vec![Paint::solid(Rgb::BLACK)]);
        assert_eq!(rect.strokes, vec![Paint::solid(Rgb::WHITE)]);
        assert_eq!(rect.stroke_weight, 2.0);
    }

    #[tokio::test]
    async fn test_unspecified_properties_keep_host_defaults() {
        let mut scene = MemoryScene::new();
        let node = build(&mut scene, &json!({ "type": "RECTANGLE", "strokes": [] }), &FontConfig::default())
            .await
            .unwrap()
            .unwrap();
        let rect = scene.node(node).unwrap();
        assert_eq!(rect.fills.len(), 1);
        assert!(rect.strokes.is_empty());
        assert_eq!(rect.corner_radius, 0.0);
        assert_eq!(rect.name, "Rectangle");
    }

    #[tokio::test]
    async fn test_empty_fills_clear() {
        let mut scene = MemoryScene::new();
        let node = build(&mut scene, &json!({ "type": "FRAME", "fills": [] }), &FontConfig::default())
            .await
            .unwrap()
            .unwrap();
        assert!(scene.node(node).unwrap().fills.is_empty());
    }

    #[tokio::test]
    async fn test_auto_layout_frame_hugs_and_ignores_fixed_size() {
        let mut scene = MemoryScene::new();
        let node = build(
            &mut scene,
            &json!({
                "type": "FRAME",
                "layoutMode": "VERTICAL",
                "width": 500,
                "padding": 10,
                "itemSpacing": 4,
                "primaryAxisAlignItems": "CENTER",
                "counterAxisAlignItems": "MAX",
                "children": [
                    { "type": "RECTANGLE", "width": 20, "height": 20 },
                    { "type": "RECTANGLE", "width": 30, "height": 10 }
                ]
            }),
            &FontConfig::default(),
        )
        .await
        .unwrap()
        .unwrap();

        let frame = scene.node(node).unwrap();
        assert_eq!(frame.layout_mode, LayoutMode::Vertical);
        assert_eq!((frame.primary_sizing, frame.counter_sizing), (SizingMode::Auto, SizingMode::Auto));
        assert_eq!(frame.padding, [10.0; 4]);
        assert_eq!(frame.primary_align, AxisAlign::Center);
        assert_eq!(frame.counter_align, AxisAlign::Max);
        assert_eq!(scene.measure(node).width, 50.0);
        assert_eq!(scene.measure(node).height, 54.0);
    }

    #[tokio::test]
    async fn test_layout_mode_none_keeps_fixed_size() {
        let mut scene = MemoryScene::new();
        let node = build(
            &mut scene,
            &json!({
                "type": "FRAME",
                "layoutMode": "NONE",
                "width": 240,
                "height": 80,
                "children": [{ "type": "RECTANGLE", "width": 20, "height": 20 }]
            }),
            &FontConfig::default(),
        )
        .await
        .unwrap()
        .unwrap();

        let frame = scene.node(node).unwrap();
        assert_eq!(frame.layout_mode, LayoutMode::None);
        assert_eq!((frame.primary_sizing, frame.counter_sizing), (SizingMode::Fixed, SizingMode::Fixed));
        assert_eq!(scene.measure(node), Size::new(240.0, 80.0));
    }

    #[tokio::test]
    async fn test_children_built_in_order_and_unknown_skipped() {
        let mut scene = MemoryScene::new();
        let node = build(
            &mut scene,
            &json!({
                "type": "FRAME",
                "children": [
                    { "type": "RECTANGLE", "name": "a" },
                    { "type": "VECTOR", "name": "b" },
                    { "type": "TEXT", "name": "c" },
                    { "type": "RECTANGLE", "name": "d" }
                ]
            }),
            &FontConfig::default(),
        )
        .await
        .unwrap()
        .unwrap();

        let names: Vec<&str> = scene
            .children(node)
            .iter()
            .map(|&c| scene.node(c).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[tokio::test]
    async fn test_unknown_root_builds_nothing() {
        let mut scene = MemoryScene::new();
        let built = build(&mut scene, &json!({ "type": "ELLIPSE" }), &FontConfig::default())
            .await
            .unwrap();
        assert_eq!(built, None);
        assert!(scene.is_empty());
    }

    #[tokio::test]
    async fn test_text_defaults_and_weight_style() {
        let mut scene = MemoryScene::new();
        let node = build(
            &mut scene,
            &json!({ "type": "TEXT", "fontWeight": 600, "fontSize": 18, "fills": ["#ffffff"] }),
            &FontConfig::default(),
        )
        .await
        .unwrap()
        .unwrap();

        let text = scene.node(node).unwrap();
        assert_eq!(text.characters, DEFAULT_CHARACTERS);
        assert_eq!(text.font, Some(FontName::new("Inter", "Semi Bold")));
        assert_eq!(text.font_size, 18.0);
        assert_eq!(text.fills, vec![Paint::solid(Rgb::WHITE)]);
        assert_eq!(scene.loaded_fonts(), &[FontName::new("Inter", "Semi Bold")]);
    }

    #[tokio::test]
    async fn test_text_falls_back_to_secondary_family() {
        let mut scene = MemoryScene::with_fonts([FontName::new("Roboto", "Regular")]);
        let node = build(
            &mut scene,
            &json!({ "type": "TEXT", "characters": "Hi", "fontWeight": 700 }),
            &FontConfig::default(),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(scene.node(node).unwrap().font, Some(FontName::new("Roboto", "Regular")));
    }

    #[tokio::test]
    async fn test_text_fails_when_fallback_unavailable() {
        let mut scene = MemoryScene::with_fonts([]);
        let err = build(&mut scene, &json!({ "type": "TEXT" }), &FontConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::FontUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_padding_sides_only_touch_given_sides() {
        let mut scene = MemoryScene::new();
        let node = build(
            &mut scene,
            &json!({ "type": "FRAME", "padding": { "left": 3 } }),
            &FontConfig::default(),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(scene.node(node).unwrap().padding, [0.0, 0.0, 0.0, 3.0]);
    }
}
