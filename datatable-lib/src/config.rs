//! Table controller configuration

use std::time::Duration;

/// Configuration for a table controller.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use datatable_lib::config::TableConfig;
///
/// let config = TableConfig::default()
///     .with_limit(25)
///     .with_search_debounce(Duration::from_millis(500))
///     .with_empty_message("Nothing here yet");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    /// Page requested on mount.
    ///
    /// This is a request only: the page reported by the first response wins,
    /// and until then `page` is not bounded by `pages`.
    ///
    /// Default: 1
    pub page: u32,

    /// Items per page requested on mount.
    ///
    /// Default: 10
    pub limit: u32,

    /// Page sizes offered by the pager.
    ///
    /// Default: 10, 25, 50, 100
    pub page_size_options: Vec<u32>,

    /// Quiet period after the last search change before fetching.
    ///
    /// Default: 300 ms
    pub search_debounce: Duration,

    /// How long a fetch may be outstanding before the loading flag turns on.
    ///
    /// Default: 200 ms
    pub loading_delay: Duration,

    /// Number of page numbers shown by the pager.
    ///
    /// Default: 5
    pub range_window: u32,

    /// Message shown when a settled fetch returned no rows.
    pub empty_message: String,

    /// Message shown while the table is in the error state.
    pub error_message: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            page_size_options: vec![10, 25, 50, 100],
            search_debounce: Duration::from_millis(300),
            loading_delay: Duration::from_millis(200),
            range_window: 5,
            empty_message: "No data available".to_string(),
            error_message: "Failed to load data".to_string(),
        }
    }
}

impl TableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the initial page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Sets the page sizes offered by the pager.
    pub fn with_page_size_options(mut self, options: Vec<u32>) -> Self {
        self.page_size_options = options;
        self
    }

    /// Sets the search debounce delay.
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    /// Sets the loading indicator delay.
    pub fn with_loading_delay(mut self, delay: Duration) -> Self {
        self.loading_delay = delay;
        self
    }

    /// Sets the pager window size.
    pub fn with_range_window(mut self, window: u32) -> Self {
        self.range_window = window;
        self
    }

    /// Sets the empty state message.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Sets the error state message.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }
}
