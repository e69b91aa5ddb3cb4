//! Point-in-time view of a table controller.

use crate::error::FetchError;
use crate::loading::LoadingState;
use crate::model::{Filter, Header, Record, Scalar};
use crate::pagination::PaginationState;
use crate::selection::SelectionState;

/// Data lifecycle state of a table.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TableStatus {
    /// No fetch outstanding and the last one succeeded (or none ran yet).
    #[default]
    Idle,
    /// A fetch is outstanding.
    Fetching,
    /// The last fetch failed; rows and pagination are from the last success.
    Error(FetchError),
}

impl TableStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Get the error if present
    pub fn as_error(&self) -> Option<&FetchError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Everything a host needs to render a table.
#[derive(Debug, Clone)]
pub struct TableSnapshot<T> {
    pub headers: Vec<Header>,
    pub filters: Vec<Filter>,
    /// Rows of the current page.
    pub rows: Vec<T>,
    pub pagination: PaginationState,
    /// Selection, when the table is selectable.
    pub selection: Option<SelectionState>,
    pub loading: LoadingState,
    pub status: TableStatus,
    /// Search value as typed; the applied value may lag behind by the debounce delay.
    pub search: String,
    /// Keys of the actions available on each row, index-aligned with `rows`.
    pub visible_actions: Vec<Vec<String>>,
    /// Whether any fetch has completed successfully.
    pub loaded: bool,
    pub empty_message: String,
    pub error_message: String,
}

impl<T: Record> TableSnapshot<T> {
    /// Returns `true` when the empty state message should be shown.
    pub fn show_empty(&self) -> bool {
        self.loaded && self.status.is_idle() && self.rows.is_empty()
    }

    /// Returns the message for the error state, if the table is in it.
    pub fn error(&self) -> Option<&str> {
        self.status.as_error().map(|_| self.error_message.as_str())
    }

    /// Display value of column `col` for row `row`.
    pub fn cell(&self, row: usize, col: usize) -> Option<String> {
        let header = self.headers.get(col)?;
        Some(header.display(self.rows.get(row)?))
    }

    /// Identity of row `index`, when the table is selectable.
    pub fn row_key(&self, index: usize) -> Option<Scalar> {
        let selection = self.selection.as_ref()?;
        selection.key_of(self.rows.get(index)?)
    }

    /// Identities of all displayed rows.
    pub fn visible_keys(&self) -> Vec<Scalar> {
        self.selection
            .as_ref()
            .map(|s| s.keys_of(&self.rows))
            .unwrap_or_default()
    }

    /// Whether row `index` is selected.
    pub fn is_row_selected(&self, index: usize) -> bool {
        match (&self.selection, self.row_key(index)) {
            (Some(selection), Some(key)) => selection.is_selected(&key),
            _ => false,
        }
    }

    /// Whether every displayed row is selected.
    pub fn is_all_selected(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.is_all_selected(&self.visible_keys()))
    }

    /// Whether action `key` is available on row `index`.
    pub fn is_action_visible(&self, index: usize, key: &str) -> bool {
        self.visible_actions
            .get(index)
            .is_some_and(|keys| keys.iter().any(|k| k == key))
    }
}
