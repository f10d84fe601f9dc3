// Session-owned store that tolerates overlapping loads

use crate::error::{CatalogError, CatalogResult};
use crate::record::Record;
use crate::source::RecordSource;
use crate::store::Store;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Result of a load that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched records replaced the store
    Applied { ticket: u64, count: usize },
    /// A load was issued after this one; this response was dropped
    Superseded { ticket: u64, latest: u64 },
}

/// Store handle shared by the tasks of one session
///
/// Each `load` draws a ticket before fetching and commits only if it still
/// holds the most recently issued ticket, so a response to a superseded
/// request is dropped whether it lands before or after the newer one. If the
/// newest load fails, the previous records stay. The fetch runs without
/// holding the lock: readers keep seeing the previous records until the
/// commit swaps them in one step.
#[derive(Debug)]
pub struct SharedStore<T: Record> {
    inner: Arc<RwLock<Store<T>>>,
    issued: Arc<AtomicU64>,
}

impl<T: Record> Clone for SharedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            issued: Arc::clone(&self.issued),
        }
    }
}

impl<T: Record> Default for SharedStore<T> {
    fn default() -> Self {
        Self::new(Store::new())
    }
}

impl<T: Record> SharedStore<T> {
    pub fn new(store: Store<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run `f` against the current records
    pub async fn read<R>(&self, f: impl FnOnce(&Store<T>) -> R) -> R {
        let guard = self.inner.read().await;
        f(&*guard)
    }

    /// Run a mutation against the current records
    pub async fn write<R>(&self, f: impl FnOnce(&mut Store<T>) -> R) -> R {
        let mut guard = self.inner.write().await;
        f(&mut *guard)
    }

    /// Clone the current records out
    pub async fn snapshot(&self) -> Vec<T> {
        self.read(|store| store.records().to_vec()).await
    }

    pub async fn len(&self) -> usize {
        self.read(|store| store.len()).await
    }

    pub async fn is_empty(&self) -> bool {
        self.read(|store| store.is_empty()).await
    }

    /// Fetch from `source` and replace the records unless a newer load already landed
    pub async fn load<S>(&self, source: &S) -> CatalogResult<LoadOutcome>
    where
        S: RecordSource<T> + ?Sized,
    {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            collection = T::collection_name(),
            ticket,
            source = %source.describe(),
            "load: fetch started"
        );

        let records = match source.fetch().await {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    collection = T::collection_name(),
                    ticket,
                    error = %e,
                    "load: fetch failed, keeping previous records"
                );
                return Err(CatalogError::LoadFailed {
                    collection: T::collection_name(),
                    source: e,
                });
            }
        };

        // Tickets are issued without the lock, so check under it
        let mut guard = self.inner.write().await;
        let latest = self.issued.load(Ordering::SeqCst);
        if ticket < latest {
            info!(
                collection = T::collection_name(),
                ticket,
                latest,
                "load: stale response discarded"
            );
            return Ok(LoadOutcome::Superseded { ticket, latest });
        }

        let count = records.len();
        guard.replace_all(records)?;

        Ok(LoadOutcome::Applied { ticket, count })
    }
}
