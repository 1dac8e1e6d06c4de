//! Structural merging of definition fragments

use serde_json::{Map, Value};
use tracing::debug;

/// Field whose sequences are merged by child name instead of replaced
pub const CHILDREN_KEY: &str = "children";

/// Field used to match child entries
pub const NAME_KEY: &str = "name";

/// Deep-merge `source` on top of `target`, producing a fresh value
///
/// Objects merge field by field. The `children` sequence merges by child
/// name; every other sequence is replaced wholesale by the source's. When
/// either side is not an object the source wins.
pub fn merge(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Object(t), Value::Object(s)) => Value::Object(merge_objects(t, s)),
        _ => source.clone(),
    }
}

fn merge_objects(target: &Map<String, Value>, source: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = target.clone();
    for (key, source_value) in source {
        let value = match (target.get(key), source_value) {
            (Some(t @ Value::Object(_)), Value::Object(_)) => merge(t, source_value),
            (Some(Value::Array(t)), Value::Array(s)) if key == CHILDREN_KEY => {
                Value::Array(merge_children(t, s))
            }
            _ => source_value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

/// Name-keyed merge of child sequences
///
/// Each named source entry is merged into the first target entry with the
/// same name. Entries that match nothing, or carry no name, are dropped: an
/// override can change existing children but never add new ones.
pub fn merge_children(target: &[Value], source: &[Value]) -> Vec<Value> {
    let mut merged = target.to_vec();
    for entry in source {
        let Some(name) = entry.get(NAME_KEY) else {
            debug!("dropping child override without a name");
            continue;
        };
        match target.iter().position(|child| child.get(NAME_KEY) == Some(name)) {
            Some(index) => merged[index] = merge(&merged[index], entry),
            None => debug!(%name, "dropping override for unknown child"),
        }
    }
    merged
}
