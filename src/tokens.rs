//! Token registry and reference resolution
//!
//! Definitions refer to design values symbolically: a string such as
//! `"$colors.primary"` is a reference into the registry, walked one dotted
//! segment at a time. Resolution never fails hard. A reference that cannot be
//! followed is logged, recorded as an [`UnresolvedToken`] and passed through
//! unchanged so the rest of the pipeline keeps going.

use serde_json::{Map, Value};
use tracing::warn;

/// Sentinel that marks a string as a token reference
pub const REFERENCE_MARKER: char = '$';

/// A token reference that could not be followed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedToken {
    /// The full reference, marker included
    pub reference: String,
    /// The first path segment that was missing or not traversable
    pub missing_segment: String,
}

/// Namespaced, arbitrarily nested token values
///
/// The top-level keys are namespaces (`colors`, `spacing`, `typography`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenRegistry {
    root: Map<String, Value>,
}

impl TokenRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a JSON value
    ///
    /// Anything other than an object produces an empty registry; `null` does
    /// so silently.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(root) => Self { root },
            Value::Null => Self::default(),
            other => {
                warn!(kind = json_kind(&other), "token registry is not an object, ignoring");
                Self::default()
            }
        }
    }

    /// Store a namespace document under its namespace key
    ///
    /// Documents wrapped in their own namespace (`{"colors": {...}}` for the
    /// `colors` namespace) are unwrapped first.
    pub fn insert_namespace(&mut self, namespace: &str, document: Value) {
        let document = match document {
            Value::Object(mut map) if map.len() == 1 && map.contains_key(namespace) => {
                map.remove(namespace).unwrap_or(Value::Null)
            }
            other => other,
        };
        self.root.insert(namespace.to_string(), document);
    }

    /// Namespaces currently present
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(|k| k.as_str())
    }

    /// Whether the registry holds no namespaces
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Look up the value at a dotted path
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.walk(path).ok()
    }

    /// The registry as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Walk a dotted path, reporting the first segment that could not be followed
    fn walk<'a, 'p>(&'a self, path: &'p str) -> Result<&'a Value, &'p str> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or("");
        let mut current = self.root.get(first).ok_or(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment).ok_or(segment)?,
                _ => return Err(segment),
            };
        }
        Ok(current)
    }

    /// Resolve every token reference inside `value`
    pub fn resolve(&self, value: &Value) -> Value {
        let mut misses = Vec::new();
        self.resolve_with_diagnostics(value, &mut misses)
    }

    /// Resolve every token reference inside `value`, recording misses
    ///
    /// Containers are rebuilt; the input is never modified. Resolved values are
    /// not resolved again, so a token whose value is itself a reference comes
    /// back as that reference string.
    pub fn resolve_with_diagnostics(
        &self,
        value: &Value,
        misses: &mut Vec<UnresolvedToken>,
    ) -> Value {
        match value {
            Value::String(s) => match s.strip_prefix(REFERENCE_MARKER) {
                Some(path) => match self.walk(path) {
                    Ok(resolved) => resolved.clone(),
                    Err(segment) => {
                        warn!(reference = %s, segment, "unresolved token reference");
                        misses.push(UnresolvedToken {
                            reference: s.clone(),
                            missing_segment: segment.to_string(),
                        });
                        value.clone()
                    }
                },
                None => value.clone(),
            },
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_with_diagnostics(item, misses))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.resolve_with_diagnostics(v, misses)))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }
}

/// Resolve `value` against `registry`
pub fn resolve(value: &Value, registry: &TokenRegistry) -> Value {
    registry.resolve(value)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> TokenRegistry {
        TokenRegistry::from_value(json!({
            "colors": {
                "primary": "#336699",
                "neutral": { "100": "#f5f5f5", "900": "#1a1a1a" },
                "alias": "$colors.primary"
            },
            "spacing": { "md": 16 },
            "typography": { "heading": { "size": 24, "weight": 700 } }
        }))
    }

    #[test]
    fn test_resolve_simple_reference() {
        assert_eq!(resolve(&json!("$colors.primary"), &registry()), json!("#336699"));
    }

    #[test]
    fn test_lookup_outlives_path() {
        let registry = registry();
        let found = {
            let path = format!("colors.{}", "primary");
            registry.lookup(&path)
        };
        assert_eq!(found, Some(&json!("#336699")));
        assert_eq!(registry.lookup("colors.neutral.missing"), None);
    }

    #[test]
    fn test_resolve_nested_reference() {
        assert_eq!(registry().resolve(&json!("$colors.neutral.900")), json!("#1a1a1a"));
        assert_eq!(registry().resolve(&json!("$spacing.md")), json!(16));
    }

    #[test]
    fn test_resolve_reference_to_object() {
        assert_eq!(
            registry().resolve(&json!("$typography.heading")),
            json!({ "size": 24, "weight": 700 })
        );
    }

    #[test]
    fn test_non_references_are_identity() {
        let registry = registry();
        for value in [
            json!("colors.primary"),
            json!("#ffffff"),
            json!(12.5),
            json!(true),
            json!(null),
            json!({ "r": 1, "g": 0, "b": 0 }),
        ] {
            assert_eq!(registry.resolve(&value), value);
        }
    }

    #[test]
    fn test_missing_path_passes_through_with_diagnostic() {
        let mut misses = Vec::new();
        let value = json!("$colors.missing.shade");
        let resolved = registry().resolve_with_diagnostics(&value, &mut misses);
        assert_eq!(resolved, value);
        assert_eq!(
            misses,
            vec![UnresolvedToken {
                reference: "$colors.missing.shade".to_string(),
                missing_segment: "missing".to_string(),
            }]
        );
    }

    #[test]
    fn test_non_traversable_intermediate_is_a_miss() {
        let mut misses = Vec::new();
        let resolved = registry().resolve_with_diagnostics(&json!("$colors.primary.dark"), &mut misses);
        assert_eq!(resolved, json!("$colors.primary.dark"));
        assert_eq!(misses.len(), 1);
        assert_eq!(misses[0].missing_segment, "dark");
    }

    #[test]
    fn test_containers_are_rebuilt_recursively() {
        let input = json!({
            "fills": ["$colors.primary", "#000000"],
            "padding": { "top": "$spacing.md", "left": 4 },
            "children": [{ "fills": ["$colors.neutral.100"] }]
        });
        let resolved = registry().resolve(&input);
        assert_eq!(
            resolved,
            json!({
                "fills": ["#336699", "#000000"],
                "padding": { "top": 16, "left": 4 },
                "children": [{ "fills": ["#f5f5f5"] }]
            })
        );
        // input untouched
        assert_eq!(input["fills"][0], json!("$colors.primary"));
    }

    #[test]
    fn test_resolution_is_not_transitive() {
        assert_eq!(registry().resolve(&json!("$colors.alias")), json!("$colors.primary"));
    }

    #[test]
    fn test_resolution_is_idempotent_on_resolved_input() {
        let registry = registry();
        let once = registry.resolve(&json!({ "fill": "$colors.primary" }));
        assert_eq!(registry.resolve(&once), once);
    }

    #[test]
    fn test_insert_namespace_unwraps_self_named_document() {
        let mut registry = TokenRegistry::new();
        registry.insert_namespace("colors", json!({ "colors": { "primary": "#ff0000" } }));
        registry.insert_namespace("spacing", json!({ "sm": 4 }));
        assert_eq!(registry.lookup("colors.primary"), Some(&json!("#ff0000")));
        assert_eq!(registry.lookup("spacing.sm"), Some(&json!(4)));
        assert_eq!(registry.namespaces().collect::<Vec<_>>(), vec!["colors", "spacing"]);
    }

    #[test]
    fn test_non_object_registry_is_empty() {
        assert!(TokenRegistry::from_value(json!([1, 2])).is_empty());
    }
}
