//! Variant showcases
//!
//! A showcase is one vertical container per component: a bold title, then
//! either the base node or a row with one labelled cell per variant
//! combination. Batches place showcases left to right, each offset by the
//! measured width of the ones before it plus the configured gutter, so they
//! are built strictly one after another.

use tracing::{debug, info};

use crate::component::{Combination, ComponentDefinition};
use crate::config::RenderConfig;
use crate::error::BuildError;
use crate::node::{NodeBuilder, NodeDefinition, TextDefinition};
use crate::scene::{LayoutMode, NodeId, Padding, Scene, SizingMode};
use crate::tokens::{TokenRegistry, UnresolvedToken};

const TITLE_WEIGHT: f64 = 700.0;

const LABEL_WEIGHT: f64 = 400.0;

/// Name of the row holding the variant cells
pub const VARIANT_ROW_NAME: &str = "Variants";

/// A rendered component showcase
#[derive(Debug, Clone, PartialEq)]
pub struct Showcase {
    /// Name of the component
    pub component: String,
    /// Page-level container
    pub node: NodeId,
    /// Number of variant cells; zero when the component has no variants
    pub variant_count: usize,
    /// Token references that could not be resolved, across all cells
    pub unresolved: Vec<UnresolvedToken>,
}

/// Render one component and bring it into view
pub async fn render_component<S: Scene + ?Sized>(
    scene: &mut S,
    component: &ComponentDefinition,
    tokens: &TokenRegistry,
    config: &RenderConfig,
) -> Result<Showcase, BuildError> {
    let showcase = build_showcase(scene, component, tokens, config).await?;
    scene.select_and_reveal(&[showcase.node]);
    Ok(showcase)
}

/// Render components side by side, in order
///
/// A failure stops the batch; showcases already placed stay on the page.
pub async fn render_batch<S: Scene + ?Sized>(
    scene: &mut S,
    components: &[ComponentDefinition],
    tokens: &TokenRegistry,
    config: &RenderConfig,
) -> Result<Vec<Showcase>, BuildError> {
    let mut placed = Vec::with_capacity(components.len());
    let mut offset = 0.0;
    for component in components {
        let showcase = build_showcase(scene, component, tokens, config).await?;
        scene.set_position(showcase.node, offset, 0.0);
        let width = scene.measure(showcase.node).width;
        info!(component = %component.name, x = offset, width, "placed showcase");
        offset += width + config.showcase.gutter;
        placed.push(showcase);
    }
    let nodes: Vec<NodeId> = placed.iter().map(|s| s.node).collect();
    scene.select_and_reveal(&nodes);
    Ok(placed)
}

async fn build_showcase<S: Scene + ?Sized>(
    scene: &mut S,
    component: &ComponentDefinition,
    tokens: &TokenRegistry,
    config: &RenderConfig,
) -> Result<Showcase, BuildError> {
    let layout = &config.showcase;
    let container = stack(scene, &component.name, LayoutMode::Vertical, layout.section_spacing);
    scene.set_padding(container, Padding::uniform(layout.padding));
    scene.add_to_page(container);

    let mut builder = NodeBuilder::new(scene, &config.fonts);
    let title = text(&component.name, layout.title_font_size, TITLE_WEIGHT);
    if let Some(node) = builder.build(&title).await? {
        builder.scene().append_child(container, node);
    }

    let mut unresolved = Vec::new();
    let mut variant_count = 0;
    if !component.has_variants() {
        let instance = component.instantiate(&Combination::new(), tokens);
        unresolved.extend(instance.unresolved);
        if let Some(node) = builder.build_value(&instance.definition).await? {
            builder.scene().append_child(container, node);
        }
    } else {
        let row = stack(
            builder.scene(),
            VARIANT_ROW_NAME,
            LayoutMode::Horizontal,
            layout.row_spacing,
        );
        builder.scene().append_child(container, row);

        for instance in component.instances(tokens) {
            variant_count += 1;
            let label = instance.combination.label();
            debug!(component = %component.name, variant = %label, "building variant");
            let cell = stack(builder.scene(), &label, LayoutMode::Vertical, layout.cell_spacing);
            builder.scene().append_child(row, cell);

            let caption = text(&label, layout.label_font_size, LABEL_WEIGHT);
            if let Some(node) = builder.build(&caption).await? {
                builder.scene().append_child(cell, node);
            }
            if let Some(node) = builder.build_value(&instance.definition).await? {
                let scene = builder.scene();
                let display_name = instance.combination.display_name();
                if !display_name.is_empty() {
                    scene.set_name(node, &display_name);
                }
                scene.append_child(cell, node);
            }
            unresolved.extend(instance.unresolved);
        }
    }

    Ok(Showcase {
        component: component.name.clone(),
        node: container,
        variant_count,
        unresolved,
    })
}

/// A transparent auto-layout frame that hugs its content
fn stack<S: Scene + ?Sized>(scene: &mut S, name: &str, mode: LayoutMode, spacing: f64) -> NodeId {
    let node = scene.create_frame();
    scene.set_name(node, name);
    scene.set_layout_mode(node, mode);
    scene.set_sizing(node, SizingMode::Auto, SizingMode::Auto);
    scene.set_item_spacing(node, spacing);
    scene.set_fills(node, Vec::new());
    node
}

fn text(characters: &str, font_size: f64, weight: f64) -> NodeDefinition {
    NodeDefinition::Text(TextDefinition {
        name: Some(characters.to_string()),
        characters: Some(characters.to_string()),
        font_size: Some(font_size),
        font_weight: Some(weight),
        fills: None,
    })
}
