//! Table data controller.
//!
//! Owns pagination, search, filter and selection state of one table and
//! keeps it in sync with an injected [`TableDataFetcher`]. Hosts drive it
//! through commands and observe it through [`TableController::state`] or
//! [`TableController::subscribe`].
//!
//! Lifecycle: `Idle -> Fetching` on mount, page change, debounced search
//! change, filter or limit change and [`TableController::refresh`].
//! `Fetching -> Idle` when the latest request succeeds, `Fetching -> Error`
//! when it fails. The error state is not sticky; the next trigger fetches again.
//!
//! [`TableDataFetcher`]: crate::fetcher::TableDataFetcher

mod builder;
mod shared;
mod snapshot;

use std::sync::Arc;

pub use builder::TableBuilder;
pub use shared::ListenerId;
pub use snapshot::{TableSnapshot, TableStatus};

use shared::Shared;

use crate::config::TableConfig;
use crate::error::TableError;
use crate::model::{Record, Scalar};
use crate::variant::TableStyle;

/// Handle to a mounted table.
///
/// Cheap to clone; all clones share the same state. The table is torn down
/// by [`TableController::shutdown`] or when the last handle is dropped.
pub struct TableController<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for TableController<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> TableController<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    pub fn builder() -> TableBuilder<T> {
        TableBuilder::new()
    }

    /// Get a snapshot of the current state.
    pub fn state(&self) -> TableSnapshot<T> {
        self.shared.snapshot()
    }

    pub fn config(&self) -> &TableConfig {
        &self.shared.config
    }

    pub fn style(&self) -> TableStyle {
        self.shared.style
    }

    /// Whether the table offers a search box.
    pub fn is_searchable(&self) -> bool {
        !self.shared.search_fields.is_empty()
    }

    pub fn search_fields(&self) -> &[String] {
        &self.shared.search_fields
    }

    /// Registers a listener called with a fresh snapshot after every change.
    pub fn subscribe(
        &self,
        listener: impl Fn(&TableSnapshot<T>) + Send + Sync + 'static,
    ) -> ListenerId {
        self.shared.subscribe(Arc::new(listener))
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    /// Requests `page`, clamped to `[1, max(pages, 1)]`.
    ///
    /// Fetches when the clamped page differs from the current one. Returns the
    /// clamped page.
    pub fn set_page(&self, page: u32) -> Result<u32, TableError> {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        let next = inner.pagination.request_page(page);
        if next.page != page {
            log::debug!("Requested page {page} clamped to {}", next.page);
        }
        let target = next.page;
        if target == inner.pagination.page {
            return Ok(target);
        }
        inner.pagination = next;
        self.shared.start_fetch(&mut inner);
        drop(inner);
        self.shared.notify();
        Ok(target)
    }

    pub fn next_page(&self) -> Result<u32, TableError> {
        let page = self.shared.lock().pagination.page;
        self.set_page(page.saturating_add(1))
    }

    pub fn previous_page(&self) -> Result<u32, TableError> {
        let page = self.shared.lock().pagination.page;
        self.set_page(page.saturating_sub(1))
    }

    /// Changes the page size and returns to page 1.
    pub fn set_limit(&self, limit: u32) -> Result<(), TableError> {
        let limit = limit.max(1);
        let mut inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        if inner.pagination.limit == limit {
            return Ok(());
        }
        inner.pagination.limit = limit;
        inner.pagination.page = 1;
        self.shared.start_fetch(&mut inner);
        drop(inner);
        self.shared.notify();
        Ok(())
    }

    /// Fetches the current page again.
    pub fn refresh(&self) -> Result<(), TableError> {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        self.shared.start_fetch(&mut inner);
        drop(inner);
        self.shared.notify();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Updates the search value. The fetch runs once the value has been
    /// stable for the configured debounce delay, starting from page 1.
    pub fn set_search(&self, value: impl Into<String>) -> Result<(), TableError> {
        let value = value.into();
        let mut inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        if inner.search == value {
            return Ok(());
        }
        inner.search = value;
        self.shared.schedule_search(&mut inner);
        drop(inner);
        self.shared.notify();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    /// Selects option `index` of filter `key`, or clears it with `None`.
    ///
    /// Closes the filter's dropdown. A changed selection returns to page 1
    /// and fetches.
    pub fn set_filter(&self, key: &str, index: Option<usize>) -> Result<(), TableError> {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        let filter = inner
            .filters
            .iter_mut()
            .find(|f| f.key == key)
            .ok_or_else(|| TableError::UnknownFilter(key.to_string()))?;
        let changed = filter.select(index)?;
        filter.open = false;
        if changed {
            inner.pagination.page = 1;
            self.shared.start_fetch(&mut inner);
        }
        drop(inner);
        self.shared.notify();
        Ok(())
    }

    pub fn clear_filter(&self, key: &str) -> Result<(), TableError> {
        self.set_filter(key, None)
    }

    /// Opens a filter's dropdown, loading its options first if it has none.
    pub fn open_filter(&self, key: &str) -> Result<(), TableError> {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        let index = inner
            .filters
            .iter()
            .position(|f| f.key == key)
            .ok_or_else(|| TableError::UnknownFilter(key.to_string()))?;
        inner.filters[index].open = true;
        if inner.filters[index].needs_options() {
            self.shared.load_filter_options(&mut inner, index);
        }
        drop(inner);
        self.shared.notify();
        Ok(())
    }

    pub fn close_filter(&self, key: &str) -> Result<(), TableError> {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        let filter = inner
            .filters
            .iter_mut()
            .find(|f| f.key == key)
            .ok_or_else(|| TableError::UnknownFilter(key.to_string()))?;
        filter.open = false;
        drop(inner);
        self.shared.notify();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Toggles selection of the displayed row at `index`.
    ///
    /// Returns `false` when nothing changed: the table is not selectable, the
    /// row has no key, or the select hook vetoed the change.
    pub fn toggle_selection(&self, index: usize) -> Result<bool, TableError> {
        let inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        let len = inner.rows.len();
        let row = inner
            .rows
            .get(index)
            .cloned()
            .ok_or(TableError::RowOutOfRange { index, len })?;
        let Some(key) = inner.selection.as_ref().and_then(|s| s.key_of(&row)) else {
            return Ok(false);
        };
        drop(inner);

        if !self.shared.allow_select(&row, false) {
            log::debug!("Selection of {key} vetoed");
            return Ok(false);
        }

        let mut inner = self.shared.lock();
        if let Some(selection) = inner.selection.as_mut() {
            selection.toggle(key);
        }
        drop(inner);
        self.shared.notify();
        Ok(true)
    }

    /// Selects every displayed row, or deselects them all if all are selected.
    ///
    /// Only the rows of the current page are affected. The select hook is
    /// consulted once with the first displayed row.
    pub fn select_all(&self) -> Result<bool, TableError> {
        let inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        let Some(selection) = inner.selection.as_ref() else {
            return Ok(false);
        };
        let Some(first) = inner.rows.first().cloned() else {
            return Ok(false);
        };
        let visible = selection.keys_of(&inner.rows);
        let all_selected = selection.is_all_selected(&visible);
        drop(inner);

        if !self.shared.allow_select(&first, true) {
            log::debug!("Select-all vetoed");
            return Ok(false);
        }

        let mut inner = self.shared.lock();
        if let Some(selection) = inner.selection.as_mut() {
            selection.select_all(&visible, all_selected);
        }
        drop(inner);
        self.shared.notify();
        Ok(true)
    }

    /// Whether the row identified by `key` is selected.
    pub fn is_selected(&self, key: &Scalar) -> bool {
        self.shared
            .lock()
            .selection
            .as_ref()
            .is_some_and(|s| s.is_selected(key))
    }

    pub fn clear_selection(&self) -> Result<(), TableError> {
        let mut inner = self.shared.lock();
        if inner.disposed {
            return Err(TableError::Disposed);
        }
        if let Some(selection) = inner.selection.as_mut() {
            selection.clear();
        }
        drop(inner);
        self.shared.notify();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Runs action `key` on the displayed row at `index`.
    ///
    /// The action's availability test is evaluated again right before running.
    pub async fn run_action(&self, key: &str, index: usize) -> Result<(), TableError> {
        let action = self
            .shared
            .actions
            .iter()
            .find(|a| a.key == key)
            .cloned()
            .ok_or_else(|| TableError::UnknownAction(key.to_string()))?;
        let row = {
            let inner = self.shared.lock();
            if inner.disposed {
                return Err(TableError::Disposed);
            }
            let len = inner.rows.len();
            inner
                .rows
                .get(index)
                .cloned()
                .ok_or(TableError::RowOutOfRange { index, len })?
        };
        if !action.is_available(row.clone()).await {
            return Err(TableError::ActionUnavailable {
                action: key.to_string(),
                index,
            });
        }
        log::debug!("Running action '{key}' on row {index}");
        action.run(row).await;
        Ok(())
    }

    /// Tears the table down: cancels the debounce and loading timers and the
    /// in-flight fetch, drops listeners, and discards any late response.
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }

    /// Whether [`TableController::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.shared.lock().disposed
    }
}
