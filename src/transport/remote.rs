//! HTTP transport against a version-qualified swagger endpoint.

use super::{split_package_resource, SchemaTransport, ENTRY_POINT, SCHEMA_SEGMENT};
use crate::errors::DiscoveryError;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Minimum/maximum protocol selection for [`TlsOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsVersion {
    Tls10,
    Tls11,
    Tls12,
    Tls13,
}

impl TlsVersion {
    fn as_reqwest(self) -> reqwest::tls::Version {
        match self {
            TlsVersion::Tls10 => reqwest::tls::Version::TLS_1_0,
            TlsVersion::Tls11 => reqwest::tls::Version::TLS_1_1,
            TlsVersion::Tls12 => reqwest::tls::Version::TLS_1_2,
            TlsVersion::Tls13 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

/// Per-transport TLS configuration.
///
/// Legacy schema servers ship self-signed certificates and ancient protocol
/// stacks, so both knobs exist — but always per client instance and opted
/// into explicitly, never as a process-wide default.
#[derive(Debug, Clone, Copy)]
pub struct TlsOptions {
    /// Accept self-signed or otherwise invalid certificates.
    pub accept_invalid_certs: bool,
    pub min_version: Option<TlsVersion>,
    pub max_version: Option<TlsVersion>,
    /// Per-request timeout; timeouts belong to the transport, not the
    /// task manager.
    pub timeout: Option<Duration>,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            min_version: None,
            max_version: None,
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Fetches swagger documents over HTTP from `{base}/V{version}/schema/...`.
#[derive(Debug)]
pub struct RemoteTransport {
    client: reqwest::blocking::Client,
    base_path: String,
    root_url: String,
}

impl RemoteTransport {
    /// Build a remote transport for a base URL and an explicit API version.
    ///
    /// The version is mandatory here: the versioned base path is part of
    /// every URL, including the root listing, so there is nothing to resolve
    /// it from yet.
    pub fn new(
        base_url: &str,
        api_version: Option<&str>,
        tls: TlsOptions,
    ) -> Result<Self, DiscoveryError> {
        let Some(version) = api_version.filter(|v| !v.is_empty()) else {
            return Err(DiscoveryError::Configuration {
                message: "remote discovery requires an api version; specify one explicitly"
                    .to_string(),
            });
        };

        url::Url::parse(base_url).map_err(|err| DiscoveryError::Configuration {
            message: format!("invalid base url {base_url}: {err}"),
        })?;

        let mut builder = reqwest::blocking::Client::builder();
        if tls.accept_invalid_certs {
            warn!(base_url, "certificate verification disabled for this transport");
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(min) = tls.min_version {
            builder = builder.min_tls_version(min.as_reqwest());
        }
        if let Some(max) = tls.max_version {
            builder = builder.max_tls_version(max.as_reqwest());
        }
        if let Some(timeout) = tls.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| DiscoveryError::Configuration {
            message: format!("could not build http client: {err}"),
        })?;

        let token = version.replace('.', "_");
        let base_path = format!("{}/V{token}", base_url.trim_end_matches('/'));
        let root_url = format!("{base_path}{SCHEMA_SEGMENT}{ENTRY_POINT}");

        Ok(Self {
            client,
            base_path,
            root_url,
        })
    }

    /// The versioned base every locator is built from, e.g. `https://h/V3_0`.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn fetch_json(&self, url: &str) -> Result<Value, DiscoveryError> {
        let response = self.client.get(url).send().map_err(|err| {
            error!(url, %err, "request failed");
            DiscoveryError::Retrieval {
                location: format!("{url}: {}", error_chain(&err)),
                status: None,
            }
        })?;
        Self::decode_json(url, response)
    }

    fn decode_json(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<Value, DiscoveryError> {
        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Retrieval {
                location: url.to_string(),
                status: Some(status.as_u16()),
            });
        }
        let body = response.text().map_err(|err| DiscoveryError::Parse {
            location: url.to_string(),
            message: err.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|err| DiscoveryError::Parse {
            location: url.to_string(),
            message: err.to_string(),
        })
    }
}

impl SchemaTransport for RemoteTransport {
    fn path_for_model(&self, api_path: &str) -> String {
        format!("{}{SCHEMA_SEGMENT}{api_path}", self.base_path)
    }

    fn root_document(&self) -> Result<Value, DiscoveryError> {
        debug!(url = %self.root_url, "fetching api-docs");
        self.fetch_json(&self.root_url)
    }

    fn resource_document(
        &self,
        path: &str,
        resource_name: &str,
    ) -> Result<Value, DiscoveryError> {
        debug!(url = path, resource_name, "fetching resource schema");
        let response = match self.client.get(path).send() {
            Ok(response) => response,
            // Some legacy servers botch the first TLS negotiation and
            // succeed on the second. Retry exactly once for those.
            Err(err) if is_tls_failure(&err) => {
                warn!(url = path, resource_name, %err, "retrying after TLS handshake failure");
                self.client.get(path).send().map_err(|err| {
                    error!(url = path, %err, "request failed after retry");
                    DiscoveryError::Retrieval {
                        location: format!("{path}: {}", error_chain(&err)),
                        status: None,
                    }
                })?
            }
            Err(err) => {
                error!(url = path, %err, "request failed");
                return Err(DiscoveryError::Retrieval {
                    location: format!("{path}: {}", error_chain(&err)),
                    status: None,
                });
            }
        };
        Self::decode_json(path, response)
    }

    fn locator_info(&self, path: &str) -> Result<(String, String), DiscoveryError> {
        let Some((_, remainder)) = path.split_once(SCHEMA_SEGMENT) else {
            return Err(DiscoveryError::Configuration {
                message: format!("locator {path} does not contain the {SCHEMA_SEGMENT} marker"),
            });
        };
        Ok(split_package_resource(remainder))
    }
}

/// Substrings that mark a TLS negotiation failure somewhere in an error
/// chain. rustls never says "tls" in its own messages; its alert and record
/// errors have to be matched by their actual vocabulary.
const TLS_FAILURE_MARKERS: &[&str] = &[
    "tls",
    "ssl",
    "handshake",
    "certificate",
    "corrupt message",
    "invalid peer",
    "received fatal alert",
    "unexpected eof",
];

fn looks_like_tls_failure(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    TLS_FAILURE_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}

/// Walk the error source chain looking for a TLS negotiation failure.
/// `reqwest` has no typed handshake error, so this is textual.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(cause) = current {
        if looks_like_tls_failure(&cause.to_string()) {
            return true;
        }
        current = cause.source();
    }
    false
}

/// Flatten an error and its sources into one line. `reqwest`'s `Display`
/// omits the source chain, which is where the actual connect/TLS cause
/// lives.
fn error_chain(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut current = std::error::Error::source(err);
    while let Some(cause) = current {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        current = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_requires_a_version() {
        let err = RemoteTransport::new("https://host/", None, TlsOptions::default()).unwrap_err();
        assert!(matches!(err, DiscoveryError::Configuration { .. }));
        assert!(err.to_string().contains("api version"));
    }

    #[test]
    fn construction_rejects_garbage_urls() {
        let err =
            RemoteTransport::new("not a url", Some("3.0"), TlsOptions::default()).unwrap_err();
        assert!(matches!(err, DiscoveryError::Configuration { .. }));
    }

    #[test]
    fn model_paths_and_locator_info_use_the_same_split_points() {
        let transport =
            RemoteTransport::new("https://host/", Some("3.0"), TlsOptions::default()).unwrap();
        assert_eq!(transport.base_path(), "https://host/V3_0");

        let path = transport.path_for_model("/v1/pumps");
        assert_eq!(path, "https://host/V3_0/schema/v1/pumps");

        let (package, resource) = transport.locator_info(&path).unwrap();
        assert_eq!(package, "/v1");
        assert_eq!(resource, "pumps");
    }

    #[test]
    fn tls_failure_detection_covers_rustls_vocabulary() {
        // rustls record/alert errors as they appear in reqwest source chains.
        assert!(looks_like_tls_failure(
            "received corrupt message of type InvalidContentType"
        ));
        assert!(looks_like_tls_failure("invalid peer certificate: Expired"));
        assert!(looks_like_tls_failure(
            "received fatal alert: HandshakeFailure"
        ));
        assert!(looks_like_tls_failure("unexpected EOF"));
        assert!(looks_like_tls_failure("tls handshake eof"));

        assert!(!looks_like_tls_failure("Connection refused (os error 111)"));
        assert!(!looks_like_tls_failure(
            "failed to lookup address information"
        ));
    }

    #[test]
    fn locator_info_without_marker_is_an_error() {
        let transport =
            RemoteTransport::new("https://host", Some("3.0"), TlsOptions::default()).unwrap();
        assert!(transport.locator_info("https://host/V3_0/v1/pumps").is_err());
    }
}
