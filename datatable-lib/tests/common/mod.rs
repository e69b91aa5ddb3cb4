//! Shared helpers for controller tests.
//!
//! Tests run on a paused tokio clock, so `settle` only lets spawned tasks run
//! and `advance` moves time deterministically.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use datatable_lib::error::FetchError;
use datatable_lib::fetcher::{TableDataFetcher, TableResponse};
use datatable_lib::query::Query;
use serde_json::{Value, json};
use tokio::sync::oneshot;

pub type FetchResult = Result<TableResponse<Value>, FetchError>;

/// A recorded fetch call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub page: u32,
    pub limit: u32,
    pub query: Query,
}

struct Pending {
    call: Call,
    reply: Option<oneshot::Sender<FetchResult>>,
}

/// Fetcher whose calls stay pending until the test resolves them, in any order.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    pending: Arc<Mutex<Vec<Pending>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn call(&self, index: usize) -> Call {
        self.pending.lock().unwrap()[index].call.clone()
    }

    pub fn last_call(&self) -> Call {
        self.pending.lock().unwrap().last().unwrap().call.clone()
    }

    /// Resolves call `index`. Panics if it was already resolved.
    pub fn resolve(&self, index: usize, result: FetchResult) {
        let reply = self.pending.lock().unwrap()[index]
            .reply
            .take()
            .expect("call already resolved");
        let _ = reply.send(result);
    }
}

#[async_trait]
impl TableDataFetcher<Value> for ScriptedFetcher {
    async fn fetch(&self, page: u32, limit: u32, query: Query) -> FetchResult {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push(Pending {
            call: Call { page, limit, query },
            reply: Some(tx),
        });
        rx.await
            .unwrap_or_else(|_| Err(FetchError::new("reply dropped")))
    }
}

/// Rows `{"id": n, "name": "row n"}` for ids in `ids`.
pub fn rows(ids: impl IntoIterator<Item = i64>) -> Vec<Value> {
    ids.into_iter()
        .map(|id| json!({"id": id, "name": format!("row {id}"), "owner": {"name": "Ada"}}))
        .collect()
}

/// A page of the `total`-row dataset, as a server would return it.
pub fn page(total: u64, page: u32, limit: u32) -> FetchResult {
    let start = i64::from(page - 1) * i64::from(limit) + 1;
    let end = (start + i64::from(limit) - 1).min(total as i64);
    Ok(TableResponse::new(rows(start..=end), total, page, limit))
}

/// Lets spawned tasks run without moving past any pending timer of interest.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
