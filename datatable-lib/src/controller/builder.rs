//! Table controller builder.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::runtime::Handle;

use super::TableController;
use super::shared::{ErrorHook, SelectHook, Shared};
use crate::config::TableConfig;
use crate::error::TableError;
use crate::fetcher::TableDataFetcher;
use crate::model::{Filter, Header, HeaderSpec, Record, TableAction};
use crate::selection::SelectionState;
use crate::variant::TableStyle;

/// Builder for [`TableController`].
///
/// # Example
///
/// ```ignore
/// let table = TableController::builder()
///     .header("name", "Name")
///     .header("owner", HeaderSpec::new("Owner", "owner.name"))
///     .filter(Filter::new("status").with_options(statuses))
///     .selection("id")
///     .fetcher(fetcher_fn(load_page))
///     .build()?;
/// ```
pub struct TableBuilder<T> {
    config: TableConfig,
    headers: Vec<(String, HeaderSpec)>,
    filters: Vec<Filter>,
    actions: Vec<TableAction<T>>,
    selection: Option<SelectionState>,
    search: String,
    search_fields: Vec<String>,
    style: TableStyle,
    fetcher: Option<Arc<dyn TableDataFetcher<T>>>,
    on_select: Option<SelectHook<T>>,
    on_error: Option<ErrorHook>,
}

impl<T> Default for TableBuilder<T> {
    fn default() -> Self {
        Self {
            config: TableConfig::default(),
            headers: Vec::new(),
            filters: Vec::new(),
            actions: Vec::new(),
            selection: None,
            search: String::new(),
            search_fields: Vec::new(),
            style: TableStyle::default(),
            fetcher: None,
            on_select: None,
            on_error: None,
        }
    }
}

impl<T> TableBuilder<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a column. Columns keep insertion order.
    pub fn header(mut self, key: impl Into<String>, spec: impl Into<HeaderSpec>) -> Self {
        self.headers.push((key.into(), spec.into()));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn action(mut self, action: TableAction<T>) -> Self {
        self.actions.push(action);
        self
    }

    /// Makes rows selectable, identified by the field `key`.
    pub fn selection(mut self, key: impl Into<String>) -> Self {
        self.selection = Some(SelectionState::new(key));
        self
    }

    /// Makes rows selectable with an initial selection.
    pub fn selection_state(mut self, selection: SelectionState) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Veto-capable hook run before every selection change.
    ///
    /// Receives the row and whether the change is a select-all. Returning
    /// `false` leaves the selection untouched.
    pub fn on_select(mut self, hook: impl Fn(&T, bool) -> bool + Send + Sync + 'static) -> Self {
        self.on_select = Some(Arc::new(hook));
        self
    }

    /// Receives fetch and filter option failures.
    pub fn on_error(
        mut self,
        hook: impl Fn(&TableError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Initial search value. Applied on mount without debounce.
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = value.into();
        self
    }

    /// Fields the server searches; non-empty makes the table searchable.
    pub fn search_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn fetcher(mut self, fetcher: impl TableDataFetcher<T> + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Validates the configuration, then mounts the controller.
    ///
    /// Mounting issues the first fetch, so this must run inside a tokio runtime.
    pub fn build(self) -> Result<TableController<T>, TableError> {
        let fetcher = self.fetcher.ok_or(TableError::MissingFetcher)?;
        let runtime = Handle::try_current().map_err(|_| TableError::NoRuntime)?;

        let headers = self
            .headers
            .into_iter()
            .map(|(key, spec)| Header::from_spec(key, spec))
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique(headers.iter().map(|h| h.key.as_str()))?;
        ensure_unique(self.filters.iter().map(|f| f.key.as_str()))?;
        ensure_unique(self.actions.iter().map(|a| a.key.as_str()))?;
        for filter in &self.filters {
            filter.validate()?;
        }

        let shared = Shared::new(super::shared::Parts {
            config: self.config,
            headers,
            filters: self.filters,
            actions: self.actions,
            selection: self.selection,
            search: self.search,
            search_fields: self.search_fields,
            style: self.style,
            fetcher,
            on_select: self.on_select,
            on_error: self.on_error,
            runtime,
        });
        log::debug!("Mounting table controller");
        shared.mount();
        Ok(TableController { shared })
    }
}

fn ensure_unique<'a>(keys: impl Iterator<Item = &'a str>) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(TableError::DuplicateKey(key.to_string()));
        }
    }
    Ok(())
}
