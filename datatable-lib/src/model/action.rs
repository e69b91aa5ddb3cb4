//! Row actions.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

type ActionHandler<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;
type ActionTest<T> = Arc<dyn Fn(T) -> BoxFuture<'static, bool> + Send + Sync>;

/// An action offered on each row, e.g. "edit" or "delete".
///
/// The optional availability test may be synchronous or asynchronous. The
/// controller re-evaluates it for every row whenever fresh data is applied.
pub struct TableAction<T> {
    /// Action key, unique within a table.
    pub key: String,
    /// Tooltip text.
    pub tooltip: Option<String>,
    /// Extra CSS classes for the action button.
    pub class: Option<String>,
    handler: ActionHandler<T>,
    test: Option<ActionTest<T>>,
}

impl<T> Clone for TableAction<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            tooltip: self.tooltip.clone(),
            class: self.class.clone(),
            handler: Arc::clone(&self.handler),
            test: self.test.clone(),
        }
    }
}

impl<T> fmt::Debug for TableAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableAction")
            .field("key", &self.key)
            .field("tooltip", &self.tooltip)
            .field("class", &self.class)
            .field("test", &self.test.is_some())
            .finish()
    }
}

impl<T: Send + 'static> TableAction<T> {
    /// Creates an action running `handler` with the row it was invoked on.
    pub fn new<F, Fut>(key: impl Into<String>, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            key: key.into(),
            tooltip: None,
            class: None,
            handler: Arc::new(move |item| handler(item).boxed()),
            test: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Shows the action only for rows where `test` resolves to `true`.
    pub fn with_test<F, Fut>(mut self, test: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.test = Some(Arc::new(move |item| test(item).boxed()));
        self
    }

    /// Synchronous variant of [`TableAction::with_test`].
    pub fn with_sync_test<F>(mut self, test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.test = Some(Arc::new(move |item| {
            let available = test(&item);
            async move { available }.boxed()
        }));
        self
    }

    /// Evaluates the availability test. Actions without a test are always available.
    pub async fn is_available(&self, item: T) -> bool {
        self.availability(item).await
    }

    /// Availability check that does not borrow the action.
    pub(crate) fn availability(&self, item: T) -> BoxFuture<'static, bool> {
        match &self.test {
            Some(test) => test(item),
            None => async { true }.boxed(),
        }
    }

    /// Runs the action handler.
    pub async fn run(&self, item: T) {
        (self.handler)(item).await
    }
}
