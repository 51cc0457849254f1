//! Wire types for the flag service API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named, string-list-valued custom property attached to a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    pub name: String,
    #[serde(default)]
    pub value: Vec<String>,
}

/// A feature flag as returned by the list and single-flag endpoints.
///
/// Only the fields the sweep needs are modeled; everything else in the
/// response is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagRecord {
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// Epoch milliseconds; absent or unparseable on some legacy flags.
    #[serde(default)]
    pub creation_date: Option<i64>,
    #[serde(default)]
    pub custom_properties: HashMap<String, PropertyValue>,
}

impl FlagRecord {
    /// The custom property with the given name, if present.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.custom_properties.get(name)
    }

    /// Whether the flag already carries a non-empty value for `name`.
    #[must_use]
    pub fn has_property_value(&self, name: &str) -> bool {
        self.property(name).is_some_and(|p| !p.value.is_empty())
    }
}

/// One page of the list-flags endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagPage {
    #[serde(default)]
    pub items: Vec<FlagRecord>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// JSON-patch operation kind.
///
/// The service enforces strict JSON-Patch semantics: `add` for a property
/// that does not exist yet, `replace` for one that does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: PropertyValue,
}

/// Body of the single-flag PATCH endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PatchRequest {
    pub patch: Vec<PatchOperation>,
}

impl PatchRequest {
    /// Build the patch that sets `property_name` to a single-element list.
    #[must_use]
    pub fn set_custom_property(property_name: &str, value: String, already_exists: bool) -> Self {
        let op = if already_exists {
            PatchOp::Replace
        } else {
            PatchOp::Add
        };
        Self {
            patch: vec![PatchOperation {
                op,
                path: format!("/customProperties/{property_name}"),
                value: PropertyValue {
                    name: property_name.to_string(),
                    value: vec![value],
                },
            }],
        }
    }
}
