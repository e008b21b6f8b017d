//! Data model for swagger discovery: the root `api-docs` listing, per-resource
//! schema documents, and the aggregated resource map handed to code generation.

use crate::errors::DiscoveryError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key holding the API listing in the root document.
pub const KEY_APIS: &str = "apis";
/// Key holding the API version in the root document.
pub const KEY_API_VERSION: &str = "apiVersion";
/// Key holding the relative locator inside each API entry.
pub const KEY_PATH: &str = "path";
/// Key injected into each resource document with its logical grouping.
pub const KEY_PACKAGE: &str = "package";

/// The aggregated output of one discovery run: resource name to its
/// package-annotated schema document.
pub type ResourceMap = BTreeMap<String, ResourceDocument>;

/// One entry in the root document's API listing. Only `path` is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEntry {
    pub path: String,
}

/// The top-level `api-docs` descriptor: the API version and the listing of
/// every discoverable resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDocument {
    pub api_version: String,
    pub apis: Vec<ApiEntry>,
}

impl RootDocument {
    /// Interpret a raw fetched document as a root listing.
    ///
    /// Both `apis` and `apiVersion` must be present regardless of which one
    /// the caller ends up needing; absence signals a malformed or
    /// incompatible root document and fails the run before any resource
    /// fetch starts.
    pub fn from_value(value: &Value) -> Result<Self, DiscoveryError> {
        let obj = value.as_object().ok_or_else(|| DiscoveryError::Structural {
            message: "root document is not a JSON object".to_string(),
        })?;

        let apis = obj.get(KEY_APIS).ok_or_else(|| DiscoveryError::Structural {
            message: "no apis information found in api-docs".to_string(),
        })?;

        let api_version = obj
            .get(KEY_API_VERSION)
            .and_then(Value::as_str)
            .ok_or_else(|| DiscoveryError::Structural {
                message: "no api version found in api-docs".to_string(),
            })?
            .to_string();

        let entries = apis.as_array().ok_or_else(|| DiscoveryError::Structural {
            message: "apis is not an array".to_string(),
        })?;

        let mut parsed = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = entry
                .get(KEY_PATH)
                .and_then(Value::as_str)
                .ok_or_else(|| DiscoveryError::Structural {
                    message: "apis entry is missing a path".to_string(),
                })?;
            parsed.push(ApiEntry {
                path: path.to_string(),
            });
        }

        Ok(RootDocument {
            api_version,
            apis: parsed,
        })
    }
}

/// The detailed schema for one resource.
///
/// Treated as an opaque payload except for the fields the engine rewrites:
/// the injected `package`, the `apis` listing, and `models.<name>.id`.
/// `Clone` is a deep copy; derived documents never share structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDocument(Map<String, Value>);

impl ResourceDocument {
    /// Wrap a raw fetched document; anything but a JSON object is rejected.
    pub fn from_value(value: Value, location: &str) -> Result<Self, DiscoveryError> {
        match value {
            Value::Object(map) => Ok(ResourceDocument(map)),
            other => Err(DiscoveryError::Parse {
                location: location.to_string(),
                message: format!("expected a JSON object, got {}", json_type_name(&other)),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn package(&self) -> Option<&str> {
        self.0.get(KEY_PACKAGE).and_then(Value::as_str)
    }

    pub fn set_package(&mut self, package: &str) {
        self.0
            .insert(KEY_PACKAGE.to_string(), Value::String(package.to_string()));
    }

    /// The document's sub-API entries, empty if absent or not an array.
    pub fn apis(&self) -> &[Value] {
        self.0
            .get(KEY_APIS)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_apis(&mut self, apis: Vec<Value>) {
        self.0.insert(KEY_APIS.to_string(), Value::Array(apis));
    }

    /// Overwrite `models.<model>.id`, creating the intermediate objects when
    /// the document lacks them.
    pub fn set_model_id(&mut self, model: &str, id: &str) {
        let models = self
            .0
            .entry("models".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !models.is_object() {
            *models = Value::Object(Map::new());
        }
        if let Some(models) = models.as_object_mut() {
            let entry = models
                .entry(model.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Some(entry) = entry.as_object_mut() {
                entry.insert("id".to_string(), Value::String(id.to_string()));
            }
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
