//! Controller state and the tasks that mutate it.
//!
//! Every spawned task (fetch, debounce, loading delay, filter options, action
//! evaluation) holds a `Weak` reference and re-checks `disposed` and the
//! request sequence under the lock before touching state. Only the response
//! of the latest issued request is ever applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::snapshot::{TableSnapshot, TableStatus};
use crate::config::TableConfig;
use crate::error::{FetchError, TableError};
use crate::fetcher::{TableDataFetcher, TableResponse};
use crate::loading::LoadingState;
use crate::model::{Filter, Header, Record, TableAction};
use crate::pagination::PaginationState;
use crate::query::build_query;
use crate::selection::SelectionState;
use crate::variant::TableStyle;

pub(crate) type SelectHook<T> = Arc<dyn Fn(&T, bool) -> bool + Send + Sync>;
pub(crate) type ErrorHook = Arc<dyn Fn(&TableError) + Send + Sync>;
pub(crate) type Listener<T> = Arc<dyn Fn(&TableSnapshot<T>) + Send + Sync>;

/// Identifies a listener registered with [`super::TableController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Builder output handed to [`Shared::new`].
pub(crate) struct Parts<T> {
    pub config: TableConfig,
    pub headers: Vec<Header>,
    pub filters: Vec<Filter>,
    pub actions: Vec<TableAction<T>>,
    pub selection: Option<SelectionState>,
    pub search: String,
    pub search_fields: Vec<String>,
    pub style: TableStyle,
    pub fetcher: Arc<dyn TableDataFetcher<T>>,
    pub on_select: Option<SelectHook<T>>,
    pub on_error: Option<ErrorHook>,
    pub runtime: Handle,
}

/// Mutable table state, guarded by [`Shared::inner`].
pub(crate) struct Inner<T> {
    pub headers: Vec<Header>,
    pub filters: Vec<Filter>,
    pub rows: Vec<T>,
    pub pagination: PaginationState,
    /// Pagination of the last applied response; restored when a fetch fails.
    pub applied_pagination: PaginationState,
    pub selection: Option<SelectionState>,
    pub loading: LoadingState,
    pub status: TableStatus,
    /// Search value as typed.
    pub search: String,
    /// Search value used in queries; catches up with `search` after the debounce.
    pub applied_search: String,
    pub visible_actions: Vec<Vec<String>>,
    pub loaded: bool,
    /// Sequence number of the latest issued request.
    pub seq: u64,
    pub disposed: bool,
    pub debounce: Option<JoinHandle<()>>,
    pub loading_timer: Option<JoinHandle<()>>,
    pub in_flight: Option<JoinHandle<()>>,
}

impl<T> Inner<T> {
    fn abort_tasks(&mut self) {
        for handle in [
            self.debounce.take(),
            self.loading_timer.take(),
            self.in_flight.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}

pub(crate) struct Shared<T> {
    inner: Mutex<Inner<T>>,
    listeners: Mutex<Vec<(ListenerId, Listener<T>)>>,
    next_listener: AtomicU64,
    pub config: TableConfig,
    pub actions: Vec<TableAction<T>>,
    pub search_fields: Vec<String>,
    pub style: TableStyle,
    fetcher: Arc<dyn TableDataFetcher<T>>,
    on_select: Option<SelectHook<T>>,
    on_error: Option<ErrorHook>,
    runtime: Handle,
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        inner.disposed = true;
        inner.abort_tasks();
    }
}

impl<T> Shared<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    pub fn new(parts: Parts<T>) -> Arc<Self> {
        let pagination = PaginationState::new(parts.config.page, parts.config.limit);
        Arc::new(Self {
            inner: Mutex::new(Inner {
                headers: parts.headers,
                filters: parts.filters,
                rows: Vec::new(),
                applied_pagination: pagination.clone(),
                pagination,
                selection: parts.selection,
                loading: LoadingState::default(),
                status: TableStatus::Idle,
                applied_search: parts.search.clone(),
                search: parts.search,
                visible_actions: Vec::new(),
                loaded: false,
                seq: 0,
                disposed: false,
                debounce: None,
                loading_timer: None,
                in_flight: None,
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            config: parts.config,
            actions: parts.actions,
            search_fields: parts.search_fields,
            style: parts.style,
            fetcher: parts.fetcher,
            on_select: parts.on_select,
            on_error: parts.on_error,
            runtime: parts.runtime,
        })
    }

    pub fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issues the initial fetch.
    pub fn mount(self: &Arc<Self>) {
        let mut inner = self.lock();
        self.start_fetch(&mut inner);
        drop(inner);
        self.notify();
    }

    pub fn snapshot(&self) -> TableSnapshot<T> {
        let inner = self.lock();
        self.snapshot_of(&inner)
    }

    fn snapshot_of(&self, inner: &Inner<T>) -> TableSnapshot<T> {
        TableSnapshot {
            headers: inner.headers.clone(),
            filters: inner.filters.clone(),
            rows: inner.rows.clone(),
            pagination: inner.pagination.clone(),
            selection: inner.selection.clone(),
            loading: inner.loading,
            status: inner.status.clone(),
            search: inner.search.clone(),
            visible_actions: inner.visible_actions.clone(),
            loaded: inner.loaded,
            empty_message: self.config.empty_message.clone(),
            error_message: self.config.error_message.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    pub fn subscribe(&self, listener: Listener<T>) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn clear_listeners(&self) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Sends the current state to every listener. Must be called without the lock held.
    pub fn notify(&self) {
        let snapshot = {
            let inner = self.lock();
            if inner.disposed {
                return;
            }
            self.snapshot_of(&inner)
        };
        let listeners: Vec<Listener<T>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn report(&self, error: &TableError) {
        if let Some(hook) = &self.on_error {
            hook(error);
        }
    }

    pub fn allow_select(&self, item: &T, is_select_all: bool) -> bool {
        self.on_select
            .as_ref()
            .is_none_or(|hook| hook(item, is_select_all))
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    /// Issues a fetch for the current page, limit, applied search and filters.
    ///
    /// Supersedes any outstanding request: its response will be discarded.
    pub fn start_fetch(self: &Arc<Self>, inner: &mut Inner<T>) {
        if inner.disposed {
            return;
        }
        inner.seq += 1;
        let seq = inner.seq;
        let page = inner.pagination.page;
        let limit = inner.pagination.limit;
        let query = build_query(Some(inner.applied_search.as_str()), &inner.filters);
        log::debug!("Fetch #{seq}: page {page}, limit {limit}, query {query:?}");

        inner.loading = inner.loading.begin_fetch();
        inner.status = TableStatus::Fetching;

        if let Some(timer) = inner.loading_timer.take() {
            timer.abort();
        }
        let weak = Arc::downgrade(self);
        let delay = self.config.loading_delay;
        inner.loading_timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            {
                let mut inner = shared.lock();
                if inner.disposed || inner.seq != seq {
                    return;
                }
                inner.loading_timer = None;
                inner.loading = inner.loading.delay_elapsed();
            }
            shared.notify();
        }));

        let weak = Arc::downgrade(self);
        let fetcher = Arc::clone(&self.fetcher);
        inner.in_flight = Some(self.runtime.spawn(async move {
            let result = fetcher.fetch(page, limit, query).await;
            Shared::complete(weak, seq, result).await;
        }));
    }

    async fn complete(weak: Weak<Self>, seq: u64, result: Result<TableResponse<T>, FetchError>) {
        let Some(shared) = weak.upgrade() else {
            log::debug!("Fetch #{seq} finished after the table was dropped");
            return;
        };

        let error = {
            let mut inner = shared.lock();
            if inner.disposed {
                log::debug!("Fetch #{seq} finished after shutdown, discarding");
                return;
            }
            if inner.seq != seq {
                log::debug!("Discarding stale response #{seq}, latest is #{}", inner.seq);
                return;
            }
            if let Some(timer) = inner.loading_timer.take() {
                timer.abort();
            }
            inner.loading = inner.loading.end_fetch();
            inner.in_flight = None;

            match result {
                Ok(response) => {
                    inner.pagination = inner
                        .pagination
                        .recompute(&response, shared.config.range_window);
                    inner.applied_pagination = inner.pagination.clone();
                    inner.visible_actions = vec![Vec::new(); response.data.len()];
                    inner.rows = response.data;
                    inner.status = TableStatus::Idle;
                    inner.loaded = true;
                    log::debug!(
                        "Fetch #{seq} applied: page {}/{}, {} rows of {}",
                        inner.pagination.page,
                        inner.pagination.pages,
                        inner.rows.len(),
                        inner.pagination.total
                    );
                    None
                }
                Err(e) => {
                    log::warn!("Fetch #{seq} failed: {e}");
                    inner.pagination = inner.applied_pagination.clone();
                    inner.status = TableStatus::Error(e.clone());
                    Some(TableError::Fetch(e))
                }
            }
        };

        shared.notify();
        if let Some(error) = error {
            shared.report(&error);
            return;
        }
        if shared.actions.is_empty() {
            return;
        }

        let actions = shared.actions.clone();
        let rows = shared.lock().rows.clone();
        drop(shared);

        let visible = evaluate_actions(&actions, &rows).await;

        let Some(shared) = weak.upgrade() else {
            return;
        };
        {
            let mut inner = shared.lock();
            if inner.disposed || inner.seq != seq {
                return;
            }
            inner.visible_actions = visible;
        }
        shared.notify();
    }

    // -------------------------------------------------------------------------
    // Search debounce
    // -------------------------------------------------------------------------

    /// Restarts the debounce timer for the typed search value.
    pub fn schedule_search(self: &Arc<Self>, inner: &mut Inner<T>) {
        if let Some(pending) = inner.debounce.take() {
            pending.abort();
        }
        let weak = Arc::downgrade(self);
        let delay = self.config.search_debounce;
        inner.debounce = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            {
                let mut inner = shared.lock();
                if inner.disposed {
                    return;
                }
                inner.debounce = None;
                if inner.applied_search == inner.search {
                    return;
                }
                inner.applied_search = inner.search.clone();
                inner.pagination.page = 1;
                shared.start_fetch(&mut inner);
            }
            shared.notify();
        }));
    }

    // -------------------------------------------------------------------------
    // Filter options
    // -------------------------------------------------------------------------

    /// Loads the options of filter `index` in the background.
    pub fn load_filter_options(self: &Arc<Self>, inner: &mut Inner<T>, index: usize) {
        let Some(filter) = inner.filters.get_mut(index) else {
            return;
        };
        let Some(fetcher) = filter.fetcher() else {
            return;
        };
        filter.loading = true;
        let key = filter.key.clone();
        let weak = Arc::downgrade(self);
        log::debug!("Loading options for filter '{key}'");

        // Detached: the result is matched back to the filter by key.
        self.runtime.spawn(async move {
            let result = fetcher.fetch_options().await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let error = {
                let mut inner = shared.lock();
                if inner.disposed {
                    return;
                }
                let Some(filter) = inner.filters.iter_mut().find(|f| f.key == key) else {
                    return;
                };
                filter.loading = false;
                match result {
                    Ok(options) => {
                        filter.list = options;
                        if filter.validate().is_err() {
                            filter.selected = None;
                        }
                        None
                    }
                    Err(error) => {
                        log::warn!("Loading options for filter '{key}' failed: {error}");
                        Some(TableError::FilterOptions { key, error })
                    }
                }
            };
            shared.notify();
            if let Some(error) = error {
                shared.report(&error);
            }
        });
    }

    /// Marks the controller disposed and cancels all timers and the in-flight fetch.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        if inner.disposed {
            return;
        }
        log::debug!("Shutting down table controller (latest fetch #{})", inner.seq);
        inner.disposed = true;
        inner.abort_tasks();
        inner.loading = inner.loading.end_fetch();
        drop(inner);
        self.clear_listeners();
    }
}

/// Evaluates every action's availability test for every row.
///
/// Rows are checked concurrently; the returned future owns all it needs.
pub(crate) fn evaluate_actions<T>(
    actions: &[TableAction<T>],
    rows: &[T],
) -> BoxFuture<'static, Vec<Vec<String>>>
where
    T: Clone + Send + 'static,
{
    let checks: Vec<BoxFuture<'static, Vec<String>>> = rows
        .iter()
        .map(|row| {
            let pending: Vec<(String, BoxFuture<'static, bool>)> = actions
                .iter()
                .map(|action| (action.key.clone(), action.availability(row.clone())))
                .collect();
            async move {
                let mut keys = Vec::new();
                for (key, check) in pending {
                    if check.await {
                        keys.push(key);
                    }
                }
                keys
            }
            .boxed()
        })
        .collect();
    join_all(checks).boxed()
}
