//! The one structurally irregular aggregation rule: a single `Metadata`
//! resource document fans out into three derived resources, partitioned by
//! the sub-API paths it carries.

use crate::schema::{ResourceDocument, KEY_PATH};
use serde_json::Value;

/// Resource name that triggers the split.
pub const METADATA_RESOURCE: &str = "Metadata";
const GLOBAL_METADATA: &str = "GlobalMetadata";
const AGGREGATE_METADATA: &str = "AggregateMetadata";

const AGGREGATE_MARKER: &str = "/aggregatemetadatas";
const GLOBAL_MARKER: &str = "/globalmetadatas";

/// Expand one fetched `Metadata` document into three independent documents.
///
/// Each derived document is a full deep copy; mutating one is never visible
/// in another. The original `apis` entries are partitioned exhaustively and
/// mutually exclusively: `/aggregatemetadatas` paths go to AggregateMetadata,
/// otherwise `/globalmetadatas` paths go to GlobalMetadata, everything else
/// stays with Metadata. Each derived document's `models.Metadata.id` is
/// rewritten to its own name, and all three carry the same `package`.
pub fn split_metadata(
    original: &ResourceDocument,
    package: &str,
) -> [(String, ResourceDocument); 3] {
    let mut metadata_apis: Vec<Value> = Vec::new();
    let mut global_apis: Vec<Value> = Vec::new();
    let mut aggregate_apis: Vec<Value> = Vec::new();

    for entry in original.apis() {
        let path = entry.get(KEY_PATH).and_then(Value::as_str).unwrap_or("");
        if path.contains(AGGREGATE_MARKER) {
            aggregate_apis.push(entry.clone());
        } else if path.contains(GLOBAL_MARKER) {
            global_apis.push(entry.clone());
        } else {
            metadata_apis.push(entry.clone());
        }
    }

    let derive = |name: &str, apis: Vec<Value>| {
        let mut doc = original.clone();
        doc.set_apis(apis);
        doc.set_model_id(METADATA_RESOURCE, name);
        doc.set_package(package);
        (name.to_string(), doc)
    };

    [
        derive(METADATA_RESOURCE, metadata_apis),
        derive(GLOBAL_METADATA, global_apis),
        derive(AGGREGATE_METADATA, aggregate_apis),
    ]
}
