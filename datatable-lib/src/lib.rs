//! Table data controller library
//!
//! A framework-agnostic controller for paginated, filterable, selectable
//! tables whose rows come from an async fetcher. Rendering is left to the
//! host; the controller owns the data lifecycle.

pub mod config;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod loading;
pub mod model;
pub mod pagination;
pub mod query;
pub mod selection;
pub mod variant;

pub use controller::{ListenerId, TableBuilder, TableController, TableSnapshot, TableStatus};
pub use fetcher::{TableDataFetcher, TableResponse, fetcher_fn, options_fn};
