//! Error types for feed retrieval and configuration loading.

use thiserror::Error;

/// Why a single source contributed nothing to the run.
///
/// All variants are recoverable: the scheduler counts the source as failed
/// and keeps going.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request exceeded the per-request timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Connection, TLS, body read or any other transport failure.
    #[error("network error: {0}")]
    Transport(String),

    /// The body could not be parsed as a feed.
    #[error("malformed feed: {0}")]
    Malformed(String),

    /// The task did not finish within the scheduler's wait bound.
    #[error("no result within wait bound")]
    HarvestTimeout,

    /// The fetch task panicked.
    #[error("task panicked")]
    Panicked,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl FetchError {
    /// Split the message into a fixed label and the underlying detail, if
    /// any. Only the detail comes from outside (server or parser text).
    ///
    /// # Returns
    ///
    /// `(label, Some(detail))` for [`FetchError::Transport`] and
    /// [`FetchError::Malformed`]; the full message and `None` otherwise.
    pub fn label_and_detail(&self) -> (String, Option<&str>) {
        match self {
            FetchError::Transport(detail) => ("network error".to_string(), Some(detail)),
            FetchError::Malformed(detail) => ("malformed feed".to_string(), Some(detail)),
            other => (other.to_string(), None),
        }
    }
}

/// Problems found while loading or validating [`crate::config::AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("source {name:?} has an invalid URL {url:?}: {source}")]
    InvalidUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("duplicate source name {0:?}")]
    DuplicateSource(String),

    #[error("no sources configured")]
    NoSources,

    #[error("{0} must be greater than zero")]
    ZeroTunable(&'static str),
}
