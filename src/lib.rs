//! # specfetch
//!
//! **specfetch** discovers the full set of resource schemas exposed by a
//! swagger-style API description — served over HTTP or stored as local files —
//! fetches each resource's detailed schema concurrently, and assembles them
//! into a single in-memory resource map keyed by resource name, ready for
//! downstream SDK code generation.
//!
//! ## Architecture
//!
//! - **[`transport`]** - how documents are reached: [`transport::RemoteTransport`]
//!   (HTTP, per-instance TLS options) and [`transport::LocalTransport`]
//!   (filesystem), behind the four-operation [`transport::SchemaTransport`] contract
//! - **[`discovery`]** - the aggregation engine driving one discovery run
//! - **[`task_manager`]** - worker threads fanning resource fetches out in parallel
//! - **[`version`]** - normalization of dotted api versions into path tokens
//! - **[`metadata`]** - the Metadata split rule (one fetched document, three
//!   derived resources partitioned by sub-API path)
//! - **[`schema`]** - the data model: root listing, resource documents, resource map
//! - **[`errors`]** - the fatal [`errors::DiscoveryError`] kinds
//! - **[`cli`]** - `specfetch discover`, the JSON hand-off to code generation
//!
//! ## Example
//!
//! ```rust,no_run
//! use specfetch::{DiscoveryOptions, SchemaDiscovery};
//!
//! # fn main() -> Result<(), specfetch::DiscoveryError> {
//! let discovery =
//!     SchemaDiscovery::from_dir("./swagger-export", None, DiscoveryOptions::default());
//! let resources = discovery.run()?;
//! for (name, doc) in &resources {
//!     println!("{name}: package {:?}", doc.package());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod discovery;
pub mod errors;
pub mod metadata;
pub mod schema;
pub mod task_manager;
pub mod transport;
pub mod version;

pub use discovery::{DiscoveryOptions, SchemaDiscovery};
pub use errors::DiscoveryError;
pub use schema::{ResourceDocument, ResourceMap, RootDocument};
pub use transport::{LocalTransport, RemoteTransport, SchemaTransport, TlsOptions, TlsVersion};
pub use version::{canonical_version, VersionPolicy};
