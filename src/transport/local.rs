//! Filesystem transport over an exported swagger document tree.

use super::{split_package_resource, SchemaTransport, ENTRY_POINT};
use crate::errors::DiscoveryError;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Reads swagger documents from `{root}{relative-path}{ext}` on disk.
///
/// No version requirement: local trees are already a single exported
/// version, so a missing version means "unconstrained".
pub struct LocalTransport {
    root: String,
    extension: String,
}

impl LocalTransport {
    pub fn new(root: impl Into<String>) -> Self {
        Self::with_extension(root, "")
    }

    /// Local trees sometimes carry a file extension (e.g. `.json`) on every
    /// document; the extension participates in path construction and is
    /// stripped back out when deriving resource identity.
    pub fn with_extension(root: impl Into<String>, extension: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
            extension: extension.into(),
        }
    }

    fn read_json(&self, path: &str) -> Result<Value, DiscoveryError> {
        if !Path::new(path).is_file() {
            return Err(DiscoveryError::Retrieval {
                location: path.to_string(),
                status: None,
            });
        }
        let content = std::fs::read_to_string(path).map_err(|err| DiscoveryError::Retrieval {
            location: format!("{path}: {err}"),
            status: None,
        })?;
        serde_json::from_str(&content).map_err(|err| DiscoveryError::Parse {
            location: path.to_string(),
            message: err.to_string(),
        })
    }
}

impl SchemaTransport for LocalTransport {
    fn path_for_model(&self, api_path: &str) -> String {
        format!("{}{api_path}{}", self.root, self.extension)
    }

    fn root_document(&self) -> Result<Value, DiscoveryError> {
        let path = format!("{}{ENTRY_POINT}{}", self.root, self.extension);
        debug!(path, "reading api-docs");
        self.read_json(&path)
    }

    fn resource_document(
        &self,
        path: &str,
        resource_name: &str,
    ) -> Result<Value, DiscoveryError> {
        debug!(path, resource_name, "reading resource schema");
        self.read_json(path)
    }

    fn locator_info(&self, path: &str) -> Result<(String, String), DiscoveryError> {
        let Some(remainder) = path.strip_prefix(&self.root) else {
            return Err(DiscoveryError::Configuration {
                message: format!("locator {path} is not under the root {}", self.root),
            });
        };
        let remainder = if self.extension.is_empty() {
            remainder
        } else {
            remainder.strip_suffix(&self.extension).unwrap_or(remainder)
        };
        Ok(split_package_resource(remainder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_paths_concatenate_root_and_relative_path() {
        let transport = LocalTransport::new("/x");
        assert_eq!(transport.path_for_model("/v1/foo"), "/x/v1/foo");

        let (package, resource) = transport.locator_info("/x/v1/foo").unwrap();
        assert_eq!(package, "/v1");
        assert_eq!(resource, "foo");
    }

    #[test]
    fn extension_is_appended_and_stripped_symmetrically() {
        let transport = LocalTransport::with_extension("/x", ".json");
        let path = transport.path_for_model("/v1/foo");
        assert_eq!(path, "/x/v1/foo.json");

        let (package, resource) = transport.locator_info(&path).unwrap();
        assert_eq!(package, "/v1");
        assert_eq!(resource, "foo");
    }

    #[test]
    fn locator_outside_the_root_is_an_error() {
        let transport = LocalTransport::new("/x");
        assert!(transport.locator_info("/elsewhere/v1/foo").is_err());
    }
}
