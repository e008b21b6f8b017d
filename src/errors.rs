use std::fmt;

/// Fatal discovery error
///
/// Every variant aborts the whole discovery run; there is no partial-success
/// mode. Messages carry the offending URL or file path plus the HTTP status
/// or parser message where one is available, so an operator can tell which
/// resource failed and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// Missing required construction input
    ///
    /// Raised before any fetch happens, e.g. remote discovery without an API
    /// version to build the versioned base URL from.
    Configuration {
        /// Human-readable description of the missing input
        message: String,
    },
    /// A document could not be retrieved
    ///
    /// Non-success HTTP status for the remote transport, or a missing file
    /// for the local transport (`status` is `None` in that case).
    Retrieval {
        /// The URL or file path that was attempted
        location: String,
        /// HTTP status code, when the failure came off the wire
        status: Option<u16>,
    },
    /// A retrieved document was not valid JSON
    Parse {
        /// The URL or file path the document came from
        location: String,
        /// The underlying parser's message
        message: String,
    },
    /// The root document is missing a required field
    Structural {
        /// Which required field was absent
        message: String,
    },
    /// A fetch worker thread panicked
    Worker {
        /// Panic payload, when it was a string
        message: String,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::Configuration { message } => {
                write!(f, "configuration error: {}", message)
            }
            DiscoveryError::Retrieval {
                location,
                status: Some(code),
            } => {
                write!(f, "[HTTP {}] could not retrieve {}", code, location)
            }
            DiscoveryError::Retrieval {
                location,
                status: None,
            } => {
                write!(f, "could not access {}", location)
            }
            DiscoveryError::Parse { location, message } => {
                write!(f, "could not load json from {}: {}", location, message)
            }
            DiscoveryError::Structural { message } => {
                write!(f, "malformed api-docs: {}", message)
            }
            DiscoveryError::Worker { message } => {
                write!(f, "fetch worker panicked: {}", message)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {}
