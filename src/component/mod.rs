//! Component definitions and their variant space
//!
//! A component document carries a canonical `base` definition, the documented
//! variant axes, and per-axis override fragments:
//!
//! ```text
//! {
//!   "name": "button",
//!   "base": { "type": "FRAME", "layoutMode": "HORIZONTAL", "children": [...] },
//!   "variants": { "size": ["sm", "lg"], "tone": ["default", "danger"] },
//!   "variantOverrides": { "tone": { "danger": { "fills": ["$colors.danger"] } } }
//! }
//! ```
//!
//! Each [`Combination`] of the variant space yields its own definition:
//! overrides are merged onto the base with [`merge`], then token references
//! are resolved.

mod merge;
mod variants;

pub use merge::{merge, merge_children, CHILDREN_KEY, NAME_KEY};
pub use variants::{apply_overrides, expand, variant_key, Combination};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::tokens::{TokenRegistry, UnresolvedToken};

/// Errors raised when reading a component document
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The document is not a component definition
    #[error("invalid component definition '{source_name}': {source}")]
    Invalid {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A component with its documented variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub name: String,
    pub base: Value,
    #[serde(default)]
    pub variants: Map<String, Value>,
    #[serde(default)]
    pub variant_overrides: Map<String, Value>,
}

/// The resolved definition for one cell of the variant space
#[derive(Debug, Clone, PartialEq)]
pub struct VariantInstance {
    pub combination: Combination,
    pub definition: Value,
    pub unresolved: Vec<UnresolvedToken>,
}

impl ComponentDefinition {
    /// Read a component definition from a JSON document
    pub fn from_value(source_name: &str, value: Value) -> Result<Self, DefinitionError> {
        serde_json::from_value(value).map_err(|source| DefinitionError::Invalid {
            source_name: source_name.to_string(),
            source,
        })
    }

    /// Whether the component documents any usable variant axis
    ///
    /// Dimensions whose values are not a list are ignored by [`expand`], so
    /// they do not count.
    pub fn has_variants(&self) -> bool {
        self.variants.values().any(Value::is_array)
    }

    /// Every combination of the variant space
    pub fn combinations(&self) -> Vec<Combination> {
        expand(&self.variants)
    }

    /// Merge the overrides for `combination` onto the base and resolve tokens
    pub fn instantiate(&self, combination: &Combination, tokens: &TokenRegistry) -> VariantInstance {
        let merged = apply_overrides(&self.base, &self.variant_overrides, combination);
        let mut unresolved = Vec::new();
        let definition = tokens.resolve_with_diagnostics(&merged, &mut unresolved);
        VariantInstance {
            combination: combination.clone(),
            definition,
            unresolved,
        }
    }

    /// Resolved definitions for the whole variant space, in expansion order
    pub fn instances(&self, tokens: &TokenRegistry) -> Vec<VariantInstance> {
        self.combinations()
            .iter()
            .map(|combination| self.instantiate(combination, tokens))
            .collect()
    }
}
