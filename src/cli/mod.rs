//! # CLI Module
//!
//! Command-line surface for the discovery engine. The CLI is the boundary to
//! the downstream code-generation tooling: it runs one discovery pass and
//! hands the resource map over as JSON.
//!
//! ## Commands
//!
//! ### `discover`
//!
//! Discover every resource schema behind an api-docs listing:
//!
//! ```bash
//! # Remote endpoint (version required)
//! specfetch discover --url https://vsd.example.net/nuage/api --api-version 3.0
//!
//! # Local export (version optional)
//! specfetch discover --dir ./swagger-export --output resources.json --pretty
//! ```
//!
//! Options:
//! - `--url <URL>` / `--dir <PATH>` - exactly one discovery source
//! - `--api-version <V>` - explicit API version (required with `--url`)
//! - `--accept-invalid-certs` - tolerate self-signed certificates
//! - `--tls-min` / `--tls-max` - TLS protocol bounds for legacy servers
//! - `--workers <N>` - fetch worker threads
//! - `--version-policy <major-minor|full>` - version truncation policy
//! - `--output <FILE>` - write JSON to a file instead of stdout

mod commands;

pub use commands::{run_cli, Cli, Commands};
