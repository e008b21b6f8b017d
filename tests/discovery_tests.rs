#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use specfetch::{DiscoveryError, DiscoveryOptions, SchemaDiscovery};
use std::fs;
use std::path::Path;

fn write_file(root: &Path, relative: &str, contents: &serde_json::Value) {
    let path = root.join(relative.trim_start_matches('/'));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_string_pretty(contents).unwrap()).unwrap();
}

fn options() -> DiscoveryOptions {
    DiscoveryOptions {
        workers: Some(4),
        ..Default::default()
    }
}

/// A local export with two plain resources and one Metadata resource.
fn fixture_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_file(
        root,
        "api-docs",
        &json!({
            "apiVersion": "3.0",
            "apis": [
                { "path": "/v1/pumps" },
                { "path": "/v1/valves" },
                { "path": "/v1/Metadata" }
            ]
        }),
    );
    write_file(
        root,
        "/v1/pumps",
        &json!({ "models": { "Pump": { "id": "Pump" } }, "apis": [{ "path": "/v1/pumps" }] }),
    );
    write_file(
        root,
        "/v1/valves",
        &json!({ "models": { "Valve": { "id": "Valve" } }, "apis": [] }),
    );
    write_file(
        root,
        "/v1/Metadata",
        &json!({
            "models": { "Metadata": { "id": "Metadata" } },
            "apis": [
                { "path": "/v1/aggregatemetadatas" },
                { "path": "/v1/globalmetadatas" },
                { "path": "/v1/other" }
            ]
        }),
    );
    dir
}

#[test]
fn aggregates_every_resource_with_its_package() {
    let dir = fixture_tree();
    let discovery =
        SchemaDiscovery::from_dir(dir.path().to_string_lossy(), None, options());

    let resources = discovery.run().unwrap();
    assert_eq!(
        resources.keys().collect::<Vec<_>>(),
        [
            "AggregateMetadata",
            "GlobalMetadata",
            "Metadata",
            "pumps",
            "valves"
        ]
    );
    assert_eq!(resources["pumps"].package(), Some("/v1"));
    assert_eq!(resources["valves"].package(), Some("/v1"));
}

#[test]
fn metadata_split_partitions_apis_and_rewrites_model_ids() {
    let dir = fixture_tree();
    let discovery =
        SchemaDiscovery::from_dir(dir.path().to_string_lossy(), None, options());
    let resources = discovery.run().unwrap();

    assert_eq!(
        resources["Metadata"].apis(),
        &[json!({ "path": "/v1/other" })]
    );
    assert_eq!(
        resources["GlobalMetadata"].apis(),
        &[json!({ "path": "/v1/globalmetadatas" })]
    );
    assert_eq!(
        resources["AggregateMetadata"].apis(),
        &[json!({ "path": "/v1/aggregatemetadatas" })]
    );

    for name in ["Metadata", "GlobalMetadata", "AggregateMetadata"] {
        let doc = &resources[name];
        assert_eq!(doc.get("models").unwrap()["Metadata"]["id"], json!(name));
        assert_eq!(doc.package(), Some("/v1"));
    }

    // Partition is exhaustive: the three derived lists sum to the original.
    let total = resources["Metadata"].apis().len()
        + resources["GlobalMetadata"].apis().len()
        + resources["AggregateMetadata"].apis().len();
    assert_eq!(total, 3);
}

#[test]
fn no_metadata_resource_means_no_derived_keys() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "api-docs",
        &json!({ "apiVersion": "3.0", "apis": [{ "path": "/v1/pumps" }] }),
    );
    write_file(dir.path(), "/v1/pumps", &json!({ "models": {}, "apis": [] }));

    let discovery =
        SchemaDiscovery::from_dir(dir.path().to_string_lossy(), None, options());
    let resources = discovery.run().unwrap();

    assert!(!resources.contains_key("Metadata"));
    assert!(!resources.contains_key("GlobalMetadata"));
    assert!(!resources.contains_key("AggregateMetadata"));
}

#[test]
fn discovery_is_idempotent_across_runs() {
    let dir = fixture_tree();
    let discovery =
        SchemaDiscovery::from_dir(dir.path().to_string_lossy(), None, options());

    let first = discovery.run().unwrap();
    let second = discovery.run().unwrap();
    assert_eq!(first, second);
}

#[test]
fn root_missing_apis_fails_structurally() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "api-docs", &json!({ "apiVersion": "3.0" }));

    let discovery =
        SchemaDiscovery::from_dir(dir.path().to_string_lossy(), None, options());
    let err = discovery.run().unwrap_err();
    assert!(matches!(err, DiscoveryError::Structural { .. }));
    assert!(err.to_string().contains("apis"));
}

#[test]
fn root_missing_version_fails_structurally() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "api-docs", &json!({ "apis": [] }));

    let discovery =
        SchemaDiscovery::from_dir(dir.path().to_string_lossy(), None, options());
    let err = discovery.run().unwrap_err();
    assert!(matches!(err, DiscoveryError::Structural { .. }));
    assert!(err.to_string().contains("version"));
}

#[test]
fn missing_resource_file_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "api-docs",
        &json!({ "apiVersion": "3.0", "apis": [{ "path": "/v1/ghost" }] }),
    );

    let discovery =
        SchemaDiscovery::from_dir(dir.path().to_string_lossy(), None, options());
    let err = discovery.run().unwrap_err();
    assert!(matches!(
        err,
        DiscoveryError::Retrieval { status: None, .. }
    ));
    assert!(err.to_string().contains("ghost"));
}
