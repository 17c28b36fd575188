//! Fetch error taxonomy and curl error classification.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::status::StatusLine;

/// Final non-2xx response, kept with enough context to describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusError {
    pub code: u32,
    /// Reason phrase from the status line; empty for HTTP/2 responses.
    pub reason: String,
    /// URL that produced the response (after redirects, when known).
    pub url: String,
}

impl HttpStatusError {
    pub(crate) fn new(status: &StatusLine, url: &str) -> Self {
        Self {
            code: status.code,
            reason: status.reason.clone(),
            url: url.to_string(),
        }
    }
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self.code {
            400..=499 => "Client Error",
            500..=599 => "Server Error",
            _ => "Error",
        };
        write!(
            f,
            "{} {}: {} for url: {}",
            self.code, class, self.reason, self.url
        )
    }
}

impl std::error::Error for HttpStatusError {}

/// Tag for [`FetchError`] so callers can branch without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Http,
    Connection,
    InvalidUrl,
    Network,
    Filesystem,
    Unexpected,
}

/// Everything that can stop a fetch, one variant per reported error line.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    #[error("{0}")]
    Http(HttpStatusError),
    /// Host could not be reached (DNS, refused, TLS handshake).
    #[error("connection failed: {0}")]
    Connection(#[source] curl::Error),
    /// Transport rejected the URL as malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[source] curl::Error),
    /// Any other transport failure.
    #[error("{detail}")]
    Network { detail: String },
    /// Creating the output directory or writing the file failed.
    #[error("{source}: '{}'", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failure outside the taxonomy above (input read, panic).
    #[error("{0}")]
    Unexpected(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Http(_) => FetchErrorKind::Http,
            FetchError::Connection(_) => FetchErrorKind::Connection,
            FetchError::InvalidUrl(_) => FetchErrorKind::InvalidUrl,
            FetchError::Network { .. } => FetchErrorKind::Network,
            FetchError::Filesystem { .. } => FetchErrorKind::Filesystem,
            FetchError::Unexpected(_) => FetchErrorKind::Unexpected,
        }
    }

    pub(crate) fn network(detail: impl Into<String>) -> Self {
        FetchError::Network {
            detail: detail.into(),
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FetchError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Classify a curl error into connection / invalid-URL / generic network failures.
pub fn classify_curl_error(e: curl::Error) -> FetchError {
    if e.is_url_malformed() {
        return FetchError::InvalidUrl(e);
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_ssl_certproblem()
        || e.is_got_nothing()
    {
        return FetchError::Connection(e);
    }
    let detail = match e.extra_description() {
        Some(extra) => format!("{} ({})", e, extra),
        None => e.to_string(),
    };
    FetchError::network(detail)
}
