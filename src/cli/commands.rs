use crate::discovery::{DiscoveryOptions, SchemaDiscovery};
use crate::transport::{TlsOptions, TlsVersion};
use crate::version::VersionPolicy;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

/// Command-line interface for the swagger discovery engine
#[derive(Parser)]
#[command(name = "specfetch")]
#[command(about = "Swagger resource discovery for SDK generation", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Discover every resource schema behind an api-docs listing and emit
    /// the aggregated resource map as JSON
    Discover {
        /// Base URL of the remote swagger endpoint
        #[arg(long, conflicts_with = "dir", required_unless_present = "dir")]
        url: Option<String>,

        /// Root directory of a local swagger export
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Explicit API version (e.g. "3.0"); required with --url
        #[arg(short = 'v', long)]
        api_version: Option<String>,

        /// Accept self-signed or otherwise invalid TLS certificates
        #[arg(long, default_value_t = false)]
        accept_invalid_certs: bool,

        /// Minimum TLS protocol version for legacy servers
        #[arg(long, value_enum)]
        tls_min: Option<TlsVersionArg>,

        /// Maximum TLS protocol version
        #[arg(long, value_enum)]
        tls_max: Option<TlsVersionArg>,

        /// Fetch worker threads (default: SPECFETCH_FETCH_WORKERS or 8)
        #[arg(long)]
        workers: Option<usize>,

        /// How the advertised api version is truncated when no explicit
        /// version was given
        #[arg(long, value_enum, default_value_t = VersionPolicyArg::MajorMinor)]
        version_policy: VersionPolicyArg,

        /// Write the resource map to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TlsVersionArg {
    #[value(name = "1.0")]
    Tls10,
    #[value(name = "1.1")]
    Tls11,
    #[value(name = "1.2")]
    Tls12,
    #[value(name = "1.3")]
    Tls13,
}

impl From<TlsVersionArg> for TlsVersion {
    fn from(arg: TlsVersionArg) -> Self {
        match arg {
            TlsVersionArg::Tls10 => TlsVersion::Tls10,
            TlsVersionArg::Tls11 => TlsVersion::Tls11,
            TlsVersionArg::Tls12 => TlsVersion::Tls12,
            TlsVersionArg::Tls13 => TlsVersion::Tls13,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VersionPolicyArg {
    MajorMinor,
    Full,
}

impl From<VersionPolicyArg> for VersionPolicy {
    fn from(arg: VersionPolicyArg) -> Self {
        match arg {
            VersionPolicyArg::MajorMinor => VersionPolicy::MajorMinor,
            VersionPolicyArg::Full => VersionPolicy::Full,
        }
    }
}

/// Execute a parsed CLI invocation.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Discover {
            url,
            dir,
            api_version,
            accept_invalid_certs,
            tls_min,
            tls_max,
            workers,
            version_policy,
            output,
            pretty,
        } => {
            let options = DiscoveryOptions {
                version_policy: version_policy.into(),
                workers,
            };

            let discovery = if let Some(url) = url {
                let tls = TlsOptions {
                    accept_invalid_certs,
                    min_version: tls_min.map(Into::into),
                    max_version: tls_max.map(Into::into),
                    ..TlsOptions::default()
                };
                SchemaDiscovery::from_url(&url, api_version.as_deref(), tls, options)?
            } else if let Some(dir) = dir {
                SchemaDiscovery::from_dir(dir.to_string_lossy(), api_version, options)
            } else {
                // clap enforces one of the two; keep a real error anyway.
                anyhow::bail!("either --url or --dir is required");
            };

            let resources = discovery.run()?;

            let json = if pretty {
                serde_json::to_string_pretty(&resources)
            } else {
                serde_json::to_string(&resources)
            }
            .context("failed to serialize resource map")?;

            match output {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(json.as_bytes())?;
                    stdout.write_all(b"\n")?;
                }
            }
            Ok(())
        }
    }
}
