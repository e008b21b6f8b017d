#![allow(clippy::unwrap_used, clippy::expect_used)]

use specfetch::{DiscoveryError, LocalTransport, SchemaTransport};
use std::fs;

fn write_tree(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (relative, contents) in files {
        let path = dir.path().join(relative.trim_start_matches('/'));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
    dir
}

#[test]
fn reads_root_document_from_api_docs_file() {
    let dir = write_tree(&[(
        "api-docs",
        r#"{ "apiVersion": "3.0", "apis": [{ "path": "/v1/pumps" }] }"#,
    )]);
    let transport = LocalTransport::new(dir.path().to_string_lossy());

    let root = transport.root_document().unwrap();
    assert_eq!(root["apiVersion"], "3.0");
    assert_eq!(root["apis"][0]["path"], "/v1/pumps");
}

#[test]
fn missing_root_file_is_a_retrieval_error_carrying_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let transport = LocalTransport::new(dir.path().to_string_lossy());

    let err = transport.root_document().unwrap_err();
    assert!(matches!(
        err,
        DiscoveryError::Retrieval { status: None, .. }
    ));
    assert!(err.to_string().contains("api-docs"));
}

#[test]
fn unparseable_file_is_a_parse_error_with_the_parser_message() {
    let dir = write_tree(&[("api-docs", "{ not json")]);
    let transport = LocalTransport::new(dir.path().to_string_lossy());

    let err = transport.root_document().unwrap_err();
    let DiscoveryError::Parse { location, message } = err else {
        panic!("expected a parse error, got {err:?}");
    };
    assert!(location.ends_with("api-docs"));
    assert!(!message.is_empty());
}

#[test]
fn resource_paths_resolve_relative_to_the_root() {
    let dir = write_tree(&[("v1/pumps", r#"{ "models": {}, "apis": [] }"#)]);
    let root = dir.path().to_string_lossy().to_string();
    let transport = LocalTransport::new(root.as_str());

    let path = transport.path_for_model("/v1/pumps");
    assert_eq!(path, format!("{root}/v1/pumps"));

    let doc = transport.resource_document(&path, "pumps").unwrap();
    assert!(doc["models"].is_object());

    let (package, resource) = transport.locator_info(&path).unwrap();
    assert_eq!(package, "/v1");
    assert_eq!(resource, "pumps");
}
