//! Keyed in-process query cache.
//!
//! Each key owns a `OnceCell`. Concurrent readers of a cold key share one
//! fetch: the first caller runs it and the rest await the same cell. A
//! failed fetch leaves the cell empty, so the next reader tries again.
//! Invalidation drops the cell; a fetch already in flight finishes against
//! the dropped cell and is not seen by later readers.

use crate::errors::Result;
use std::{collections::HashMap, future::Future, sync::Arc};
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, trace};

/// Cached query identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// All courses
    Courses,
    /// All leads
    Leads,
    /// All sellers
    Sellers,
    /// All professors
    Professors,
    /// All commission rules
    CommissionRules,
    /// All annual goals
    Goals,
}

/// A cache of values of one type, keyed by [`QueryKey`].
#[derive(Debug)]
pub struct QueryCache<V> {
    entries: RwLock<HashMap<QueryKey, Arc<OnceCell<V>>>>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn cell(&self, key: QueryKey) -> Arc<OnceCell<V>> {
        if let Some(cell) = self.entries.read().await.get(&key) {
            return Arc::clone(cell);
        }
        let mut entries = self.entries.write().await;
        Arc::clone(entries.entry(key).or_default())
    }

    /// Returns the cached value for `key`, running `fetch` when there is none.
    pub async fn get_or_fetch<F, Fut>(&self, key: QueryKey, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let cell = self.cell(key).await;
        if let Some(value) = cell.get() {
            trace!("Cache hit for {key:?}");
            return Ok(value.clone());
        }

        let value = cell
            .get_or_try_init(|| async move {
                debug!("Fetching {key:?}");
                fetch().await
            })
            .await?;
        Ok(value.clone())
    }

    /// Drops the cached value for `key`.
    pub async fn invalidate(&self, key: QueryKey) {
        if self.entries.write().await.remove(&key).is_some() {
            debug!("Invalidated {key:?}");
        }
    }

    /// Whether a value is currently cached for `key`.
    pub async fn is_cached(&self, key: QueryKey) -> bool {
        self.entries
            .read()
            .await
            .get(&key)
            .is_some_and(|cell| cell.initialized())
    }
}
