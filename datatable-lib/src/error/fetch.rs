//! Fetch error types

use std::error::Error as StdError;
use std::sync::Arc;

/// A failure reported by a data fetcher or a filter options fetcher.
///
/// Cheap to clone so the last failure can live in a table snapshot while the
/// same value is handed to the host's error hook.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    /// Human readable description of the failure.
    pub message: String,
    /// Underlying cause, if the fetcher supplied one.
    #[source]
    cause: Option<Arc<dyn StdError + Send + Sync>>,
}

impl FetchError {
    /// Creates a fetch error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a fetch error wrapping an underlying cause.
    pub fn with_cause(
        message: impl Into<String>,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    /// Returns the underlying cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync)> {
        self.cause.as_deref()
    }
}

impl PartialEq for FetchError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl From<String> for FetchError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for FetchError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_cause(format!("Response parse error: {err}"), err)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        Self::with_cause(err.to_string(), err)
    }
}
