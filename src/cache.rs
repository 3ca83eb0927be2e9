use cached::{Cached, UnboundCache};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::error::SiteError;
use crate::site::{normalize_path, SiteSource};

type Slot = Arc<OnceCell<Arc<str>>>;

/// Session cache of page fragments keyed by site-relative path
///
/// Each path gets a single slot; concurrent requests for the same path wait
/// on the same fetch. A failed fetch leaves the slot empty so a later
/// activation may try again.
pub struct PageCache {
    site: Arc<dyn SiteSource>,
    slots: Mutex<UnboundCache<String, Slot>>,
    fetches: AtomicUsize,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub fetches: usize,
}

impl PageCache {
    pub fn new(site: Arc<dyn SiteSource>) -> Self {
        Self {
            site,
            slots: Mutex::new(UnboundCache::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    async fn slot(&self, path: &str) -> Slot {
        let mut slots = self.slots.lock().await;
        slots
            .cache_get_or_set_with(path.to_string(), || Arc::new(OnceCell::new()))
            .clone()
    }

    /// Cached fragment text for `path`, fetching it on first use
    pub async fn get_or_fetch(&self, path: &str) -> Result<Arc<str>, SiteError> {
        let path = normalize_path(path);
        let slot = self.slot(path).await;
        let text = slot
            .get_or_try_init(|| async {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                debug!("CACHE: miss for {}, fetching", path);
                let text = self.site.fetch_text(path).await?;
                Ok::<_, SiteError>(Arc::from(text))
            })
            .await?;
        Ok(text.clone())
    }

    /// Whether `path` has already been fetched successfully
    pub async fn contains(&self, path: &str) -> bool {
        let mut slots = self.slots.lock().await;
        slots
            .cache_get(normalize_path(path))
            .map_or(false, |slot| slot.initialized())
    }

    /// Warm the cache for `paths`, ignoring failures
    pub async fn prefetch(&self, paths: &[String]) {
        let pending = paths.iter().map(|path| async move {
            if self.contains(path).await {
                return;
            }
            if let Err(e) = self.get_or_fetch(path).await {
                debug!("CACHE: prefetch of {} failed: {}", path, e);
            }
        });
        join_all(pending).await;
    }

    pub async fn stats(&self) -> CacheStats {
        let slots = self.slots.lock().await;
        CacheStats {
            entries: slots.cache_size(),
            fetches: self.fetches.load(Ordering::SeqCst),
        }
    }
}
