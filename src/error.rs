//! Error types for the proxy endpoint.

use std::path::PathBuf;

use hyper::StatusCode;
use thiserror::Error;

/// Failures detected while serving the organizations endpoint.
///
/// A non-2xx answer from GitHub is not an error: it is relayed as-is.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// A credential file is missing, unreadable or not UTF-8.
    #[error("Failed to read secret {}: {source}", .path.display())]
    SecretUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured secrets location does not denote a local directory.
    #[error("Malformed secrets location: {0}")]
    UriMalformed(String),

    /// GitHub did not answer within the configured timeout.
    #[error("GitHub API timed out: {0}")]
    UpstreamTimeout(#[source] reqwest::Error),

    /// Connection, DNS, TLS or body transfer failure talking to GitHub.
    #[error("GitHub API unreachable: {0}")]
    UpstreamUnavailable(#[source] reqwest::Error),
}

impl ProxyError {
    /// Status code sent back to the caller
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::SecretUnavailable { .. } | Self::UriMalformed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::UpstreamTimeout(err)
        } else {
            Self::UpstreamUnavailable(err)
        }
    }
}

/// Result type alias using `ProxyError`.
pub type Result<T> = std::result::Result<T, ProxyError>;
