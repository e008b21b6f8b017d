//! # Transport Module
//!
//! How discovery reaches swagger documents: over HTTP against a versioned
//! base URL, or straight off the filesystem. The aggregation engine only ever
//! sees the four-operation [`SchemaTransport`] contract and never knows which
//! variant is behind it.

mod local;
mod remote;

pub use local::LocalTransport;
pub use remote::{RemoteTransport, TlsOptions, TlsVersion};

use crate::errors::DiscoveryError;
use serde_json::Value;

/// Path segment under which detailed schemas live on remote servers.
pub const SCHEMA_SEGMENT: &str = "/schema";
/// Relative locator of the root listing document.
pub const ENTRY_POINT: &str = "/api-docs";

/// Capability contract for fetching swagger documents.
///
/// `locator_info` must reproduce the exact split points `path_for_model`
/// used when it built the locator; the pair is how a fetched document gets
/// its `(package, resource name)` identity back out of its own path.
pub trait SchemaTransport: Send + Sync {
    /// Fully qualified locator for one API entry's relative path.
    fn path_for_model(&self, api_path: &str) -> String;

    /// Fetch and JSON-parse the root listing document.
    fn root_document(&self) -> Result<Value, DiscoveryError>;

    /// Fetch and JSON-parse one resource's detailed schema.
    fn resource_document(&self, path: &str, resource_name: &str)
        -> Result<Value, DiscoveryError>;

    /// Derive `(package, resource_name)` from a locator built by
    /// [`SchemaTransport::path_for_model`].
    fn locator_info(&self, path: &str) -> Result<(String, String), DiscoveryError>;
}

/// Split a marker-relative remainder on its final separator: everything
/// before the last segment is the package, the last segment the resource.
pub(crate) fn split_package_resource(remainder: &str) -> (String, String) {
    match remainder.rsplit_once('/') {
        Some((package, resource)) => (package.to_string(), resource.to_string()),
        None => (String::new(), remainder.to_string()),
    }
}
