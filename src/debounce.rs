// Quiet-period debouncing for keystroke-driven filter input

use crate::config::Config;
use crate::error::CatalogResult;
use crate::predicate::PredicateSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default quiet period before a typed query is applied
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Publishes a value only after `delay` has passed without a newer push
///
/// Every `push` aborts the pending emission before scheduling the new one,
/// and dropping the debouncer aborts whatever is still pending. Must be used
/// from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: Arc<watch::Sender<Option<T>>>,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            delay,
            tx: Arc::new(tx),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, replacing anything not yet published
    pub fn push(&mut self, value: T) {
        self.cancel();

        let tx = Arc::clone(&self.tx);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send_replace(Some(value));
        }));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Last value that survived a full quiet period
    pub fn latest(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// Filter input for one list view
///
/// Equality selectors reach the predicate set immediately; typed text goes
/// through a [`Debouncer`] and is folded in once it settles.
#[derive(Debug)]
pub struct FilterInput {
    predicates: PredicateSet,
    text: Debouncer<String>,
    settled: watch::Receiver<Option<String>>,
}

impl FilterInput {
    pub fn new(delay: Duration) -> Self {
        let text = Debouncer::new(delay);
        let settled = text.subscribe();
        Self {
            predicates: PredicateSet::new(),
            text,
            settled,
        }
    }

    /// Use the configured quiet period
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.debounce())
    }

    pub fn delay(&self) -> Duration {
        self.text.delay()
    }

    /// Notified each time a typed query settles
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.text.subscribe()
    }

    /// Record a keystroke-level change of the query
    pub fn type_text(&mut self, value: &str) {
        self.text.push(value.to_string());
    }

    /// Change an equality selector, effective immediately
    pub fn set_equals(&mut self, field: &str, value: &str) -> CatalogResult<()> {
        self.predicates.set_equals(field, value)
    }

    /// Predicates to hand to the filter engine right now
    pub fn current(&mut self) -> &PredicateSet {
        self.sync_text();
        &self.predicates
    }

    /// Wait until a typed query settles, then return the updated predicates
    ///
    /// Returns at once when no query is pending or unapplied.
    pub async fn settled(&mut self) -> &PredicateSet {
        let unapplied = self.settled.has_changed().unwrap_or(false);
        // The sender lives in `self.text`, so the channel cannot close here
        if (unapplied || self.text.is_pending()) && self.settled.changed().await.is_ok() {
            self.apply_text();
        }
        &self.predicates
    }

    pub fn is_pending(&self) -> bool {
        self.text.is_pending()
    }

    fn sync_text(&mut self) {
        if self.settled.has_changed().unwrap_or(false) {
            self.apply_text();
        }
    }

    fn apply_text(&mut self) {
        let text = self.settled.borrow_and_update().clone();
        if let Some(text) = text {
            debug!(query = %text, "filter input: text settled");
            self.predicates.set_text(&text);
        }
    }
}

impl Default for FilterInput {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
