//! End-to-end scenarios for resolution, merging, expansion and building

use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

use variant_forge::component::{apply_overrides, expand, merge, Combination};
use variant_forge::node::build;
use variant_forge::scene::{MemoryScene, NodeKind, Scene};
use variant_forge::tokens::resolve;
use variant_forge::{render_batch, ComponentDefinition, FontConfig, RenderConfig, TokenRegistry};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

#[test]
fn test_resolve_without_references_is_identity() {
    let registry = TokenRegistry::from_value(json!({ "colors": { "primary": "#336699" } }));
    let value = json!({ "type": "FRAME", "cornerRadius": 4, "children": [{ "name": "x" }] });
    assert_eq!(resolve(&value, &registry), value);
}

#[test]
fn test_missing_reference_passes_through_with_diagnostic() {
    let registry = TokenRegistry::from_value(json!({ "colors": { "primary": "#336699" } }));
    let mut misses = Vec::new();
    let resolved = registry.resolve_with_diagnostics(&json!(["$colors.accent"]), &mut misses);
    assert_eq!(resolved, json!(["$colors.accent"]));
    assert_eq!(misses.len(), 1);
    assert_eq!(misses[0].reference, "$colors.accent");
    assert_eq!(misses[0].missing_segment, "accent");
}

#[test]
fn test_merge_identities() {
    let a = json!({ "type": "FRAME", "children": [{ "name": "label", "characters": "Hi" }] });
    assert_eq!(merge(&a, &json!({})), a);
    assert_eq!(merge(&json!({}), &a), a);
}

#[test]
fn test_expansion_count_is_product() {
    let variants = object(json!({ "size": ["sm", "md", "lg"], "tone": ["a", "b"], "shape": ["x"] }));
    assert_eq!(expand(&variants).len(), 6);
    assert_eq!(expand(&Map::new()), vec![Combination::new()]);
}

#[tokio::test]
async fn test_scenario_token_fill() {
    let registry = TokenRegistry::from_value(json!({ "colors": { "primary": "#336699" } }));
    let definition = resolve(&json!({ "type": "RECTANGLE", "fills": ["$colors.primary"] }), &registry);

    let mut scene = MemoryScene::new();
    let node = build(&mut scene, &definition, &FontConfig::default())
        .await
        .unwrap()
        .expect("rectangle builds");
    let fill = scene.node(node).unwrap().fills[0].color;
    assert!((fill.r - 0.2).abs() < 1e-9);
    assert!((fill.g - 0.4).abs() < 1e-9);
    assert!((fill.b - 0.6).abs() < 1e-9);
}

#[test]
fn test_scenario_four_combinations() {
    let variants = object(json!({ "size": ["sm", "lg"], "tone": ["default", "danger"] }));
    let combos = expand(&variants);
    let labels: Vec<String> = combos.iter().map(|c| c.label()).collect();
    assert_eq!(
        labels,
        vec![
            "size: sm, tone: default",
            "size: sm, tone: danger",
            "size: lg, tone: default",
            "size: lg, tone: danger",
        ]
    );
}

#[test]
fn test_scenario_child_override() {
    let base = json!({
        "type": "FRAME",
        "children": [{ "type": "TEXT", "name": "label", "characters": "Hi" }]
    });
    let overrides = object(json!({
        "state": { "pressed": { "children": [{ "name": "label", "characters": "Bye" }] } }
    }));
    let combo = Combination::from_pairs([("state", "pressed")]);
    let result = apply_overrides(&base, &overrides, &combo);
    assert_eq!(
        result["children"],
        json!([{ "type": "TEXT", "name": "label", "characters": "Bye" }])
    );
}

#[test]
fn test_scenario_unknown_child_override_dropped() {
    let base = json!({ "type": "FRAME", "children": [{ "name": "label" }, { "name": "icon" }] });
    let overrides = object(json!({
        "state": { "on": { "children": [{ "name": "badge", "characters": "1" }] } }
    }));
    let combo = Combination::from_pairs([("state", "on")]);
    let result = apply_overrides(&base, &overrides, &combo);
    assert_eq!(result["children"].as_array().unwrap().len(), 2);
    assert_eq!(result["children"], base["children"]);
}

#[tokio::test]
async fn test_scenario_unknown_type_skipped() {
    let definition = json!({
        "type": "FRAME",
        "layoutMode": "VERTICAL",
        "children": [
            { "type": "RECTANGLE", "name": "first" },
            { "type": "STAR", "name": "odd" },
            { "type": "TEXT", "name": "last", "characters": "ok" }
        ]
    });
    let mut scene = MemoryScene::new();
    let frame = build(&mut scene, &definition, &FontConfig::default())
        .await
        .unwrap()
        .expect("frame builds");

    let children: Vec<(NodeKind, String)> = scene
        .children(frame)
        .iter()
        .map(|&c| {
            let n = scene.node(c).unwrap();
            (n.kind, n.name.clone())
        })
        .collect();
    assert_eq!(
        children,
        vec![(NodeKind::Rectangle, "first".to_string()), (NodeKind::Text, "last".to_string())]
    );

    let mut scene = MemoryScene::new();
    let lone = build(&mut scene, &json!({ "type": "STAR" }), &FontConfig::default())
        .await
        .unwrap();
    assert_eq!(lone, None);
}

#[tokio::test]
async fn test_scenario_batch_offsets() {
    let components: Vec<ComponentDefinition> = [120, 60, 200]
        .iter()
        .enumerate()
        .map(|(i, width)| {
            ComponentDefinition::from_value(
                "inline",
                json!({
                    "name": format!("component-{}", i),
                    "base": { "type": "RECTANGLE", "width": width, "height": 30 },
                    "variants": { "size": ["sm", "lg"] }
                }),
            )
            .unwrap()
        })
        .collect();
    let config = RenderConfig::default();
    let mut scene = MemoryScene::new();
    let placed = render_batch(&mut scene, &components, &TokenRegistry::new(), &config)
        .await
        .unwrap();

    let xs: Vec<f64> = placed.iter().map(|s| scene.node(s.node).unwrap().x).collect();
    let widths: Vec<f64> = placed.iter().map(|s| scene.measure(s.node).width).collect();
    let gutter = config.showcase.gutter;
    assert_eq!(xs[0], 0.0);
    assert_eq!(xs[1], widths[0] + gutter);
    assert_eq!(xs[2], widths[0] + widths[1] + 2.0 * gutter);
    assert!(placed.iter().all(|s| s.variant_count == 2));
}
