//! Table filters and their options.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Scalar;
use crate::error::TableError;
use crate::fetcher::FilterOptionsFetcher;

/// One selectable option of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Value sent in the query when this option is selected.
    pub value: Scalar,
    /// Display name.
    pub name: String,
    /// Short display name for compact views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Query key override; the filter key is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl FilterOption {
    pub fn new(value: impl Into<Scalar>, name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: name.into(),
            short: None,
            column: None,
        }
    }

    /// Sets the short display name.
    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    /// Sets the query key override.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Name to show in compact views.
    pub fn label(&self, compact: bool) -> &str {
        match (&self.short, compact) {
            (Some(short), true) => short,
            _ => &self.name,
        }
    }
}

/// A filter over table data.
///
/// Invariant: when `selected` is set it indexes into `list`.
#[derive(Clone)]
pub struct Filter {
    /// Filter key, unique within a table.
    pub key: String,
    /// Index of the selected option.
    pub selected: Option<usize>,
    /// Available options.
    pub list: Vec<FilterOption>,
    /// Whether the option dropdown is open.
    pub open: bool,
    /// Whether options are being fetched.
    pub loading: bool,
    fetch: Option<Arc<dyn FilterOptionsFetcher>>,
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("key", &self.key)
            .field("selected", &self.selected)
            .field("list", &self.list)
            .field("open", &self.open)
            .field("loading", &self.loading)
            .field("fetch", &self.fetch.is_some())
            .finish()
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.selected == other.selected
            && self.list == other.list
            && self.open == other.open
            && self.loading == other.loading
    }
}

impl Filter {
    /// Creates a filter with no options.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            selected: None,
            list: Vec::new(),
            open: false,
            loading: false,
            fetch: None,
        }
    }

    /// Seeds the option list.
    pub fn with_options(mut self, options: Vec<FilterOption>) -> Self {
        self.list = options;
        self
    }

    /// Loads options lazily with `fetcher` the first time the filter is opened.
    pub fn with_fetch(mut self, fetcher: impl FilterOptionsFetcher + 'static) -> Self {
        self.fetch = Some(Arc::new(fetcher));
        self
    }

    /// Preselects an option. Validated when the table is built.
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    /// Returns the selected option, if any.
    pub fn selected_option(&self) -> Option<&FilterOption> {
        self.selected.and_then(|i| self.list.get(i))
    }

    /// Key under which the selected value goes into the query.
    pub fn query_key(&self) -> &str {
        self.selected_option()
            .and_then(|o| o.column.as_deref())
            .unwrap_or(&self.key)
    }

    /// Returns the lazy option fetcher, if configured.
    pub fn fetcher(&self) -> Option<Arc<dyn FilterOptionsFetcher>> {
        self.fetch.clone()
    }

    /// Returns `true` if opening the filter should fetch options.
    pub fn needs_options(&self) -> bool {
        self.fetch.is_some() && self.list.is_empty() && !self.loading
    }

    /// Checks that the selection indexes into the option list.
    pub fn validate(&self) -> Result<(), TableError> {
        match self.selected {
            Some(index) if index >= self.list.len() => Err(TableError::InvalidFilterSelection {
                key: self.key.clone(),
                index,
                len: self.list.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Changes the selection. Returns `true` if it changed.
    pub fn select(&mut self, index: Option<usize>) -> Result<bool, TableError> {
        if let Some(index) = index
            && index >= self.list.len()
        {
            return Err(TableError::InvalidFilterSelection {
                key: self.key.clone(),
                index,
                len: self.list.len(),
            });
        }
        let changed = self.selected != index;
        self.selected = index;
        Ok(changed)
    }
}
