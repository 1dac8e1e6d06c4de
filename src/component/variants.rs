//! Variant space expansion and override application

use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

use super::merge::merge;

/// One value chosen for every variant dimension, in declared order
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Combination {
    entries: Vec<(String, String)>,
}

impl Combination {
    /// Create an empty combination
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a combination from `(dimension, value)` pairs
    pub fn from_pairs<I, D, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (D, V)>,
        D: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(d, v)| (d.into(), v.into()))
                .collect(),
        }
    }

    /// The value chosen for a dimension
    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(d, _)| d == dimension)
            .map(|(_, v)| v.as_str())
    }

    /// `(dimension, value)` pairs in declared order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(d, v)| (d.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable label, e.g. `size: sm, tone: danger`
    pub fn label(&self) -> String {
        self.iter()
            .map(|(d, v)| format!("{}: {}", d, v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Node name for this combination, e.g. `sm/danger`
    pub fn display_name(&self) -> String {
        self.iter().map(|(_, v)| v).collect::<Vec<_>>().join("/")
    }

    fn with(&self, dimension: &str, value: String) -> Self {
        let mut entries = self.entries.clone();
        entries.push((dimension.to_string(), value));
        Self { entries }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Key under which a variant value is looked up in the overrides map
///
/// Strings are used as-is; other scalars use their JSON text (`true`, `2`).
pub fn variant_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Every combination of the variant space, first dimension outermost
///
/// A dimension whose value list is not an array is skipped with a warning.
/// No dimensions yields a single empty combination.
pub fn expand(variants: &Map<String, Value>) -> Vec<Combination> {
    let mut combinations = vec![Combination::new()];
    for (dimension, values) in variants {
        let Value::Array(values) = values else {
            warn!(dimension = %dimension, "variant dimension is not a list, skipping");
            continue;
        };
        combinations = combinations
            .iter()
            .flat_map(|prefix| {
                values
                    .iter()
                    .map(move |value| prefix.with(dimension, variant_key(value)))
            })
            .collect();
    }
    combinations
}

/// Fold the matching override fragments over `base`
///
/// Dimensions are applied in the combination's order, so later dimensions
/// win on conflicting fields. Dimensions or values without an override entry
/// leave the accumulator untouched.
pub fn apply_overrides(
    base: &Value,
    overrides: &Map<String, Value>,
    combination: &Combination,
) -> Value {
    combination
        .iter()
        .filter_map(|(dimension, value)| overrides.get(dimension)?.get(value))
        .fold(base.clone(), |acc, fragment| merge(&acc, fragment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashSet;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_expand_no_dimensions() {
        let combinations = expand(&Map::new());
        assert_eq!(combinations, vec![Combination::new()]);
        assert_eq!(combinations[0].label(), "");
    }

    #[test]
    fn test_expand_count_is_product() {
        let variants = object(json!({
            "size": ["sm", "md", "lg"],
            "tone": ["default", "danger"],
            "disabled": [false, true]
        }));
        assert_eq!(expand(&variants).len(), 12);
    }

    #[test]
    fn test_expand_last_dimension_varies_fastest() {
        let variants = object(json!({ "size": ["sm", "lg"], "tone": ["default", "danger"] }));
        let names: Vec<String> = expand(&variants).iter().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["sm/default", "sm/danger", "lg/default", "lg/danger"]);
    }

    #[test]
    fn test_expand_combinations_are_distinct() {
        let variants = object(json!({ "size": ["sm", "lg"], "tone": ["default", "danger"] }));
        let set: HashSet<Combination> = expand(&variants).into_iter().collect();
        assert_eq!(set.len(), 4);
        assert!(set.contains(&Combination::from_pairs([("size", "lg"), ("tone", "danger")])));
    }

    #[test]
    fn test_expand_empty_dimension_yields_nothing() {
        let variants = object(json!({ "size": ["sm"], "tone": [] }));
        assert!(expand(&variants).is_empty());
    }

    #[test]
    fn test_expand_skips_malformed_dimension() {
        let variants = object(json!({ "size": ["sm", "lg"], "tone": "danger" }));
        assert_eq!(expand(&variants).len(), 2);
    }

    #[test]
    fn test_label_and_display_name() {
        let c = Combination::from_pairs([("size", "sm"), ("disabled", "true")]);
        assert_eq!(c.label(), "size: sm, disabled: true");
        assert_eq!(c.to_string(), "size: sm, disabled: true");
        assert_eq!(c.display_name(), "sm/true");
        assert_eq!(c.get("disabled"), Some("true"));
        assert_eq!(c.get("tone"), None);
    }

    #[test]
    fn test_apply_overrides_later_dimension_wins() {
        let base = json!({ "type": "FRAME", "cornerRadius": 4, "fills": ["#ffffff"] });
        let overrides = object(json!({
            "size": { "lg": { "cornerRadius": 8, "fills": ["#eeeeee"] } },
            "tone": { "danger": { "fills": ["#ff0000"] } }
        }));
        let merged = apply_overrides(
            &base,
            &overrides,
            &Combination::from_pairs([("size", "lg"), ("tone", "danger")]),
        );
        assert_eq!(
            merged,
            json!({ "type": "FRAME", "cornerRadius": 8, "fills": ["#ff0000"] })
        );
    }

    #[test]
    fn test_apply_overrides_missing_entries_are_noops() {
        let base = json!({ "type": "FRAME", "cornerRadius": 4 });
        let overrides = object(json!({ "size": { "lg": { "cornerRadius": 8 } } }));
        let merged = apply_overrides(
            &base,
            &overrides,
            &Combination::from_pairs([("size", "sm"), ("tone", "danger")]),
        );
        assert_eq!(merged, base);
    }

    #[test]
    fn test_apply_overrides_non_string_values() {
        let variants = object(json!({ "disabled": [true] }));
        let overrides = object(json!({ "disabled": { "true": { "opacity": 0.5 } } }));
        let combination = &expand(&variants)[0];
        let merged = apply_overrides(&json!({}), &overrides, combination);
        assert_eq!(merged, json!({ "opacity": 0.5 }));
    }
}
