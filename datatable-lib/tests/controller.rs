//! Lifecycle tests for the table controller: fetching, paging, supersession,
//! errors, debounce, loading delay and teardown.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use common::{Call, ScriptedFetcher, advance, page, rows, settle};
use datatable_lib::error::{FetchError, TableError};
use datatable_lib::model::{Filter, FilterOption, HeaderSpec, Scalar};
use datatable_lib::query::{Query, SEARCH_KEY};
use datatable_lib::{TableBuilder, TableController, TableResponse, fetcher_fn};
use serde_json::Value;

fn builder(fetcher: &ScriptedFetcher) -> TableBuilder<Value> {
    TableController::builder()
        .header("id", "ID")
        .header("name", "Name")
        .header("owner", HeaderSpec::new("Owner", "owner.name"))
        .selection("id")
        .fetcher(fetcher.clone())
}

/// Mounts a table and resolves the initial fetch with the 42-row dataset.
async fn mounted(fetcher: &ScriptedFetcher) -> TableController<Value> {
    let table = builder(fetcher).build().unwrap();
    settle().await;
    fetcher.resolve(0, page(42, 1, 10));
    settle().await;
    table
}

#[tokio::test(start_paused = true)]
async fn test_mount_fetches_first_page() {
    let fetcher = ScriptedFetcher::new();
    let table = builder(&fetcher).build().unwrap();
    assert!(table.state().status.is_fetching());
    assert!(table.state().loading.is_fetching);

    settle().await;
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(
        fetcher.call(0),
        Call {
            page: 1,
            limit: 10,
            query: Query::new()
        }
    );

    fetcher.resolve(0, page(42, 1, 10));
    settle().await;

    let state = table.state();
    assert!(state.status.is_idle());
    assert!(state.loaded);
    assert_eq!(state.pagination.pages, 5);
    assert_eq!(state.pagination.total, 42);
    assert!(state.pagination.range.starts_with(&[1, 2, 3]));
    assert_eq!(state.rows.len(), 10);
    assert_eq!(state.cell(0, 2).as_deref(), Some("Ada"));
    assert_eq!(state.cell(1, 1).as_deref(), Some("row 2"));
    assert!(!state.loading.is_fetching);
}

#[tokio::test(start_paused = true)]
async fn test_page_request_is_clamped() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;

    assert_eq!(table.set_page(7).unwrap(), 5);
    settle().await;
    assert_eq!(fetcher.call(1).page, 5);

    fetcher.resolve(1, page(42, 5, 10));
    settle().await;
    let state = table.state();
    assert_eq!(state.pagination.page, 5);
    assert_eq!(state.rows.len(), 2);
    assert_eq!(state.pagination.first_item(), 41);
}

#[tokio::test(start_paused = true)]
async fn test_same_page_does_not_fetch() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;

    assert_eq!(table.set_page(1).unwrap(), 1);
    assert_eq!(table.set_page(0).unwrap(), 1);
    settle().await;
    assert_eq!(fetcher.call_count(), 1);
    assert!(table.state().status.is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_next_and_previous_page() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;

    assert_eq!(table.previous_page().unwrap(), 1);
    assert_eq!(table.next_page().unwrap(), 2);
    settle().await;
    fetcher.resolve(1, page(42, 2, 10));
    settle().await;
    assert_eq!(table.next_page().unwrap(), 3);
    assert_eq!(table.previous_page().unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_newer_request_supersedes_slower_one() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;

    table.set_page(2).unwrap();
    table.set_page(3).unwrap();
    settle().await;
    assert_eq!(fetcher.call(1).page, 2);
    assert_eq!(fetcher.call(2).page, 3);

    // B (page 3) resolves first, then the slow A (page 2).
    fetcher.resolve(2, page(42, 3, 10));
    settle().await;
    assert!(table.state().status.is_idle());
    fetcher.resolve(1, page(42, 2, 10));
    settle().await;

    let state = table.state();
    assert_eq!(state.pagination.page, 3);
    assert_eq!(state.rows, rows(21..=30));
    assert!(state.status.is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_settled_page_is_last_request() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;

    table.set_page(2).unwrap();
    table.set_page(9).unwrap();
    table.set_page(4).unwrap();
    settle().await;
    assert_eq!(fetcher.call_count(), 4);

    fetcher.resolve(3, page(42, 4, 10));
    fetcher.resolve(2, page(42, 5, 10));
    fetcher.resolve(1, page(42, 2, 10));
    settle().await;

    let state = table.state();
    assert_eq!(state.pagination.page, 4);
    assert_eq!(state.rows, rows(31..=40));
}

#[tokio::test(start_paused = true)]
async fn test_stale_failure_is_ignored() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;

    table.set_page(2).unwrap();
    table.set_page(3).unwrap();
    settle().await;
    fetcher.resolve(2, page(42, 3, 10));
    fetcher.resolve(1, Err(FetchError::new("timeout")));
    settle().await;

    assert!(table.state().status.is_idle());
    assert_eq!(table.state().pagination.page, 3);
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_last_good_data() {
    let fetcher = ScriptedFetcher::new();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let table = builder(&fetcher)
        .on_error(move |e| sink.lock().unwrap().push(e.to_string()))
        .build()
        .unwrap();
    settle().await;
    fetcher.resolve(0, page(42, 1, 10));
    settle().await;
    let before = table.state();

    table.refresh().unwrap();
    settle().await;
    fetcher.resolve(1, Err(FetchError::new("connection reset")));
    settle().await;

    let state = table.state();
    assert_eq!(
        state.status.as_error().map(|e| e.message.as_str()),
        Some("connection reset")
    );
    assert_eq!(state.error(), Some("Failed to load data"));
    assert_eq!(state.rows, before.rows);
    assert_eq!(state.pagination, before.pagination);
    assert!(!state.loading.is_fetching);
    assert!(!state.loading.is_loading);
    assert!(!state.show_empty());
    assert_eq!(
        *errors.lock().unwrap(),
        vec!["Fetch failed: connection reset".to_string()]
    );

    // Not sticky: the next trigger fetches again.
    table.set_page(2).unwrap();
    assert!(table.state().status.is_fetching());
    settle().await;
    fetcher.resolve(2, page(42, 2, 10));
    settle().await;
    assert!(table.state().status.is_idle());
    assert_eq!(table.state().pagination.page, 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_page_change_restores_pagination() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;
    let before = table.state();

    assert_eq!(table.set_page(3).unwrap(), 3);
    assert_eq!(table.state().pagination.page, 3);
    settle().await;
    fetcher.resolve(1, Err(FetchError::new("boom")));
    settle().await;

    let state = table.state();
    assert!(state.status.is_error());
    assert_eq!(state.pagination, before.pagination);
    assert_eq!(state.rows, rows(1..=10));

    // Retrying the same page fetches it again.
    assert_eq!(table.set_page(3).unwrap(), 3);
    assert!(table.state().status.is_fetching());
    settle().await;
    assert_eq!(fetcher.call_count(), 3);
    assert_eq!(fetcher.call(2).page, 3);
    fetcher.resolve(2, page(42, 3, 10));
    settle().await;

    let state = table.state();
    assert!(state.status.is_idle());
    assert_eq!(state.pagination.page, 3);
    assert_eq!(state.rows, rows(21..=30));
}

#[tokio::test(start_paused = true)]
async fn test_huge_page_count_settles() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;

    table.refresh().unwrap();
    settle().await;
    fetcher.resolve(
        1,
        Ok(TableResponse {
            total: u64::MAX,
            page: u32::MAX,
            pages: u32::MAX,
            limit: 10,
            data: rows(1..=10),
        }),
    );
    settle().await;

    let state = table.state();
    assert!(state.status.is_idle());
    assert!(!state.loading.is_fetching);
    assert_eq!(state.pagination.page, u32::MAX);
    assert_eq!(state.pagination.range.len(), 5);
    assert_eq!(state.pagination.range.last(), Some(&u32::MAX));
}

#[tokio::test(start_paused = true)]
async fn test_empty_result() {
    let fetcher = ScriptedFetcher::new();
    let table = builder(&fetcher).build().unwrap();
    settle().await;
    assert!(!table.state().show_empty());

    fetcher.resolve(0, page(0, 1, 10));
    settle().await;

    let state = table.state();
    assert_eq!(state.pagination.pages, 0);
    assert_eq!(state.pagination.page, 1);
    assert!(state.pagination.range.is_empty());
    assert!(state.show_empty());
    assert_eq!(state.empty_message, "No data available");
    assert_eq!(table.set_page(3).unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_headers_still_fetch() {
    let fetcher = ScriptedFetcher::new();
    let table = TableController::<Value>::builder()
        .fetcher(fetcher.clone())
        .build()
        .unwrap();
    settle().await;
    fetcher.resolve(0, page(3, 1, 10));
    settle().await;

    let state = table.state();
    assert!(state.headers.is_empty());
    assert_eq!(state.rows.len(), 3);
    assert_eq!(state.cell(0, 0), None);
}

#[tokio::test(start_paused = true)]
async fn test_search_is_debounced() {
    let queries = Arc::new(Mutex::new(Vec::<(u32, Query)>::new()));
    let log = Arc::clone(&queries);
    let table = TableController::<Value>::builder()
        .search_fields(["name"])
        .fetcher(fetcher_fn(move |p: u32, l: u32, q: Query| {
            log.lock().unwrap().push((p, q));
            async move { page(42, p, l) }
        }))
        .build()
        .unwrap();
    assert!(table.is_searchable());
    settle().await;
    table.set_page(3).unwrap();
    settle().await;
    assert_eq!(queries.lock().unwrap().len(), 2);

    table.set_search("a").unwrap();
    advance(100).await;
    table.set_search("ab").unwrap();
    advance(100).await;
    table.set_search("abc").unwrap();
    assert_eq!(table.state().search, "abc");
    advance(298).await;
    assert_eq!(queries.lock().unwrap().len(), 2);

    advance(5).await;
    let queries = queries.lock().unwrap();
    assert_eq!(queries.len(), 3);
    let (page, query) = &queries[2];
    assert_eq!(*page, 1);
    assert_eq!(query.get(SEARCH_KEY), Some(&Scalar::from("abc")));
}

#[tokio::test(start_paused = true)]
async fn test_search_back_to_applied_value_does_not_fetch() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;

    table.set_search("x").unwrap();
    advance(100).await;
    table.set_search("").unwrap();
    advance(400).await;
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_initial_search_applies_on_mount() {
    let fetcher = ScriptedFetcher::new();
    let _table = builder(&fetcher).search("ada").build().unwrap();
    settle().await;
    assert_eq!(
        fetcher.call(0).query.get(SEARCH_KEY),
        Some(&Scalar::from("ada"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_loading_flag_waits_for_delay() {
    let fetcher = ScriptedFetcher::new();
    let table = builder(&fetcher).build().unwrap();

    advance(150).await;
    let loading = table.state().loading;
    assert!(loading.is_fetching);
    assert!(!loading.is_loading);

    advance(100).await;
    assert!(table.state().loading.is_loading);

    fetcher.resolve(0, page(42, 1, 10));
    settle().await;
    let loading = table.state().loading;
    assert!(!loading.is_fetching);
    assert!(!loading.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_fast_fetch_never_shows_loading() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;

    table.refresh().unwrap();
    advance(50).await;
    fetcher.resolve(1, page(42, 1, 10));
    settle().await;
    advance(300).await;
    assert!(!table.state().loading.is_loading);
    assert!(!table.state().loading.is_fetching);
}

#[tokio::test(start_paused = true)]
async fn test_limit_change_resets_page() {
    let fetcher = ScriptedFetcher::new();
    let table = mounted(&fetcher).await;
    table.set_page(4).unwrap();
    settle().await;
    fetcher.resolve(1, page(42, 4, 10));
    settle().await;

    table.set_limit(25).unwrap();
    settle().await;
    assert_eq!(fetcher.last_call().page, 1);
    assert_eq!(fetcher.last_call().limit, 25);

    table.set_limit(25).unwrap();
    settle().await;
    assert_eq!(fetcher.call_count(), 3);

    fetcher.resolve(2, page(42, 1, 25));
    settle().await;
    assert_eq!(table.state().pagination.pages, 2);
}

#[tokio::test(start_paused = true)]
async fn test_filter_change_resets_page() {
    let fetcher = ScriptedFetcher::new();
    let table = builder(&fetcher)
        .filter(Filter::new("status").with_options(vec![
            FilterOption::new("open", "Open"),
            FilterOption::new(2, "Closed").with_column("state_code"),
        ]))
        .build()
        .unwrap();
    settle().await;
    fetcher.resolve(0, page(42, 1, 10));
    settle().await;
    table.set_page(3).unwrap();
    settle().await;
    fetcher.resolve(1, page(42, 3, 10));
    settle().await;

    table.set_filter("status", Some(1)).unwrap();
    settle().await;
    let call = fetcher.last_call();
    assert_eq!(call.page, 1);
    assert_eq!(call.query.get("state_code"), Some(&Scalar::Int(2)));
    assert_eq!(table.state().filters[0].selected, Some(1));

    table.set_filter("status", Some(1)).unwrap();
    settle().await;
    assert_eq!(fetcher.call_count(), 3);

    table.clear_filter("status").unwrap();
    settle().await;
    assert_eq!(fetcher.call_count(), 4);
    assert!(fetcher.last_call().query.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_discards_late_response() {
    let fetcher = ScriptedFetcher::new();
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    let table = builder(&fetcher).build().unwrap();
    table.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    table.set_search("pending").unwrap();
    settle().await;

    table.shutdown();
    assert!(table.is_shut_down());
    fetcher.resolve(0, page(42, 1, 10));
    advance(1000).await;

    let state = table.state();
    assert!(state.rows.is_empty());
    assert!(!state.loaded);
    assert!(!state.loading.is_fetching);
    assert!(!state.loading.is_loading);
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
    assert!(matches!(table.set_page(2), Err(TableError::Disposed)));
    assert!(matches!(table.refresh(), Err(TableError::Disposed)));
}

#[tokio::test(start_paused = true)]
async fn test_drop_while_fetching() {
    let fetcher = ScriptedFetcher::new();
    let table = builder(&fetcher).build().unwrap();
    settle().await;
    drop(table);
    fetcher.resolve(0, page(42, 1, 10));
    advance(500).await;
}

#[test]
fn test_build_requires_fetcher() {
    let result = TableController::<Value>::builder().header("id", "ID").build();
    assert!(matches!(result.err(), Some(TableError::MissingFetcher)));
}

#[test]
fn test_build_requires_runtime() {
    let result = TableController::<Value>::builder()
        .fetcher(ScriptedFetcher::new())
        .build();
    assert!(matches!(result.err(), Some(TableError::NoRuntime)));
}

#[tokio::test]
async fn test_build_rejects_invalid_configuration() {
    let fetcher = ScriptedFetcher::new();

    let result = builder(&fetcher).header("x", HeaderSpec::new("X", "")).build();
    assert!(matches!(result.err(), Some(TableError::InvalidHeader(key)) if key == "x"));

    let result = builder(&fetcher).header("id", "Again").build();
    assert!(matches!(result.err(), Some(TableError::DuplicateKey(key)) if key == "id"));

    let result = builder(&fetcher)
        .filter(Filter::new("status").with_selected(0))
        .build();
    assert!(matches!(
        result.err(),
        Some(TableError::InvalidFilterSelection { index: 0, len: 0, .. })
    ));
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_response_shape_from_server_is_authoritative() {
    let fetcher = ScriptedFetcher::new();
    let table = builder(&fetcher).build().unwrap();
    settle().await;
    fetcher.resolve(
        0,
        Ok(TableResponse {
            total: 100,
            page: 2,
            pages: 4,
            limit: 25,
            data: rows(26..=50),
        }),
    );
    settle().await;
    let pagination = table.state().pagination;
    assert_eq!(pagination.page, 2);
    assert_eq!(pagination.limit, 25);
    assert_eq!(pagination.range, vec![1, 2, 3, 4]);
}
