//! Fetcher contracts consumed by the table controller.
//!
//! The controller makes no assumption about transport. A fetcher only has to
//! resolve with a page of rows or reject with a [`FetchError`].

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::model::FilterOption;
use crate::query::Query;

/// One page of rows plus the server's pagination metadata.
///
/// The server is authoritative for every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableResponse<T> {
    /// Total number of records matching the query.
    pub total: u64,
    /// Page this response belongs to (1-based).
    pub page: u32,
    /// Total number of pages.
    pub pages: u32,
    /// Number of items per page.
    pub limit: u32,
    /// Rows of this page.
    pub data: Vec<T>,
}

impl<T> TableResponse<T> {
    /// Builds a response, deriving `pages` from `total` and `limit`.
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let pages = u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);
        Self {
            total,
            page,
            pages,
            limit,
            data,
        }
    }

    /// An empty result set.
    pub fn empty(limit: u32) -> Self {
        Self::new(Vec::new(), 0, 1, limit)
    }
}

/// Produces pages of table data.
#[async_trait]
pub trait TableDataFetcher<T>: Send + Sync {
    /// Fetches `page` (1-based) of `limit` rows matching `query`.
    async fn fetch(&self, page: u32, limit: u32, query: Query)
    -> Result<TableResponse<T>, FetchError>;
}

/// Produces the option list of a filter.
#[async_trait]
pub trait FilterOptionsFetcher: Send + Sync {
    /// Fetches the options.
    async fn fetch_options(&self) -> Result<Vec<FilterOption>, FetchError>;
}

/// Adapter implementing [`TableDataFetcher`] for an async closure.
pub struct FnFetcher<F>(F);

/// Wraps `f` as a [`TableDataFetcher`].
///
/// # Example
///
/// ```
/// use datatable_lib::error::FetchError;
/// use datatable_lib::fetcher::{fetcher_fn, TableResponse};
/// use datatable_lib::query::Query;
///
/// let fetcher = fetcher_fn(|page: u32, limit: u32, _query: Query| async move {
///     Ok::<_, FetchError>(TableResponse::<serde_json::Value>::new(Vec::new(), 0, page, limit))
/// });
/// # let _ = fetcher;
/// ```
pub fn fetcher_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher(f)
}

#[async_trait]
impl<T, F, Fut> TableDataFetcher<T> for FnFetcher<F>
where
    T: Send + 'static,
    F: Fn(u32, u32, Query) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TableResponse<T>, FetchError>> + Send,
{
    async fn fetch(
        &self,
        page: u32,
        limit: u32,
        query: Query,
    ) -> Result<TableResponse<T>, FetchError> {
        (self.0)(page, limit, query).await
    }
}

/// Adapter implementing [`FilterOptionsFetcher`] for an async closure.
pub struct FnOptions<F>(F);

/// Wraps `f` as a [`FilterOptionsFetcher`].
pub fn options_fn<F>(f: F) -> FnOptions<F> {
    FnOptions(f)
}

#[async_trait]
impl<F, Fut> FilterOptionsFetcher for FnOptions<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<FilterOption>, FetchError>> + Send,
{
    async fn fetch_options(&self) -> Result<Vec<FilterOption>, FetchError> {
        (self.0)().await
    }
}
