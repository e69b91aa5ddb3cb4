//! Table controller error types

use super::FetchError;

/// Errors surfaced by the table controller.
///
/// Construction problems (`MissingFetcher`, `NoRuntime`, `InvalidHeader`) are
/// returned from the builder. Command misuse is returned from the command.
/// Fetch failures never unwind a command: they are stored in the snapshot and
/// handed to the error hook.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TableError {
    /// The builder was finished without a data fetcher.
    #[error("A data fetcher is required")]
    MissingFetcher,

    /// The controller was built outside of a tokio runtime.
    #[error("No tokio runtime available")]
    NoRuntime,

    /// A header resolved to an empty access path.
    #[error("Header '{0}' has an empty access path")]
    InvalidHeader(String),

    /// Two headers, filters or actions share a key.
    #[error("Duplicate key '{0}'")]
    DuplicateKey(String),

    /// No filter is registered under this key.
    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),

    /// The selected option index is outside the filter's option list.
    #[error("Filter '{key}' has no option at index {index} ({len} options)")]
    InvalidFilterSelection {
        /// Filter key.
        key: String,
        /// Requested option index.
        index: usize,
        /// Number of options currently loaded.
        len: usize,
    },

    /// No action is registered under this key.
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    /// The row index is outside the currently displayed rows.
    #[error("Row {index} is out of range ({len} rows)")]
    RowOutOfRange {
        /// Requested row index.
        index: usize,
        /// Number of displayed rows.
        len: usize,
    },

    /// The action's availability test rejected this row.
    #[error("Action '{action}' is not available for row {index}")]
    ActionUnavailable {
        /// Action key.
        action: String,
        /// Row index.
        index: usize,
    },

    /// The data fetcher failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A filter's option fetcher failed.
    #[error("Loading options for filter '{key}' failed: {error}")]
    FilterOptions {
        /// Filter key.
        key: String,
        /// Underlying fetch error.
        error: FetchError,
    },

    /// The controller has been shut down.
    #[error("Table controller has been shut down")]
    Disposed,
}

impl TableError {
    /// Returns the fetch error behind this error, if any.
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::FilterOptions { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns `true` if retrying the triggering event may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::FilterOptions { .. })
    }
}
