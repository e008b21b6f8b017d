//! # Discovery Module
//!
//! The aggregation engine: drives a [`SchemaTransport`] to enumerate every
//! resource behind an api-docs listing, fans the fetches out across the task
//! manager, and merges the results into one [`ResourceMap`] for the code
//! generator.

use crate::errors::DiscoveryError;
use crate::metadata::{split_metadata, METADATA_RESOURCE};
use crate::schema::{ResourceDocument, ResourceMap, RootDocument};
use crate::task_manager::{TaskManager, TaskManagerConfig};
use crate::transport::{LocalTransport, RemoteTransport, SchemaTransport, TlsOptions};
use crate::version::{canonical_version, VersionPolicy};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Tunables for one discovery run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryOptions {
    /// How the advertised version is truncated when no explicit version was
    /// supplied.
    pub version_policy: VersionPolicy,
    /// Fetch worker count; `None` reads `SPECFETCH_FETCH_WORKERS`.
    pub workers: Option<usize>,
}

/// One configured discovery source.
///
/// Built from exactly one of a remote base URL or a local root directory;
/// the run algorithm only ever sees the transport contract.
pub struct SchemaDiscovery {
    transport: Arc<dyn SchemaTransport>,
    api_version: Option<String>,
    options: DiscoveryOptions,
}

impl std::fmt::Debug for SchemaDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaDiscovery")
            .field("api_version", &self.api_version)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SchemaDiscovery {
    /// Discover against a remote swagger endpoint.
    ///
    /// The version is required up front (it is embedded in every URL) and is
    /// taken as-is, dots replaced; the version resolver is bypassed.
    pub fn from_url(
        base_url: &str,
        api_version: Option<&str>,
        tls: TlsOptions,
        options: DiscoveryOptions,
    ) -> Result<Self, DiscoveryError> {
        let transport = RemoteTransport::new(base_url, api_version, tls)?;
        Ok(Self {
            transport: Arc::new(transport),
            api_version: api_version.map(str::to_string),
            options,
        })
    }

    /// Discover against a local export of the swagger document tree.
    /// A missing version means "version unconstrained".
    pub fn from_dir(
        root: impl Into<String>,
        api_version: Option<String>,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            transport: Arc::new(LocalTransport::new(root)),
            api_version,
            options,
        }
    }

    /// Discover through an arbitrary transport implementation.
    pub fn with_transport(
        transport: Arc<dyn SchemaTransport>,
        api_version: Option<String>,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            transport,
            api_version,
            options,
        }
    }

    /// Run one discovery pass and return the completed resource map.
    ///
    /// Any task error aborts the whole run with the underlying error; no
    /// partial map is ever returned. Each run starts from a fresh root fetch
    /// and a fresh, empty map.
    pub fn run(&self) -> Result<ResourceMap, DiscoveryError> {
        let root_value = self.transport.root_document()?;
        let root = RootDocument::from_value(&root_value)?;

        // Fixed once per run; never re-resolved per resource.
        let version = match &self.api_version {
            Some(version) => version.clone(),
            None => canonical_version(&root.api_version, self.options.version_policy),
        };
        info!(
            version,
            resources = root.apis.len(),
            "starting discovery run"
        );

        let results: Arc<DashMap<String, ResourceDocument>> = Arc::new(DashMap::new());
        let config = self
            .options
            .workers
            .map(TaskManagerConfig::new)
            .unwrap_or_else(TaskManagerConfig::from_env);
        let mut manager = TaskManager::new(config);

        for entry in &root.apis {
            let path = self.transport.path_for_model(&entry.path);
            debug!(path, "scheduling resource fetch");
            let transport = Arc::clone(&self.transport);
            let results = Arc::clone(&results);
            manager.start_task(move || fetch_resource(transport.as_ref(), &path, &results));
        }

        manager.wait_until_exit()?;

        let results = Arc::try_unwrap(results).unwrap_or_else(|shared| {
            shared
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect()
        });
        let map: ResourceMap = results.into_iter().collect();
        info!(resources = map.len(), "discovery run complete");
        Ok(map)
    }
}

/// One fetch-and-normalize task: derive the resource identity from its own
/// path, fetch the document, and insert it (or its Metadata-split derivatives)
/// under keys no other task writes.
fn fetch_resource(
    transport: &dyn SchemaTransport,
    path: &str,
    results: &DashMap<String, ResourceDocument>,
) -> Result<(), DiscoveryError> {
    let (package, resource_name) = transport.locator_info(path)?;
    let value = transport.resource_document(path, &resource_name)?;
    let mut doc = ResourceDocument::from_value(value, path)?;

    if resource_name == METADATA_RESOURCE {
        for (name, derived) in split_metadata(&doc, &package) {
            results.insert(name, derived);
        }
    } else {
        doc.set_package(&package);
        results.insert(resource_name, doc);
    }
    Ok(())
}
