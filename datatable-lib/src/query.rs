//! Query derivation from search and filter state.

use std::collections::BTreeMap;

use crate::model::{Filter, Scalar};

/// Query passed to the data fetcher.
pub type Query = BTreeMap<String, Scalar>;

/// Reserved query key carrying the search value.
pub const SEARCH_KEY: &str = "search";

/// Builds the fetcher query for the current search value and filters.
///
/// Every filter with a selection contributes one entry, keyed by the selected
/// option's `column` or else the filter key. A non-empty search value is added
/// under [`SEARCH_KEY`].
pub fn build_query(search: Option<&str>, filters: &[Filter]) -> Query {
    let mut query: Query = filters
        .iter()
        .filter_map(|filter| {
            let option = filter.selected_option()?;
            Some((filter.query_key().to_string(), option.value.clone()))
        })
        .collect();

    if let Some(search) = search.filter(|s| !s.is_empty()) {
        query.insert(SEARCH_KEY.to_string(), Scalar::from(search));
    }

    query
}
