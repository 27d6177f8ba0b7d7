//! Index loader - loads the index at most once per session / 索引加载器
//!
//! Concurrent callers share a single in-flight load and all wait for it.
//! A failed load is not cached: the next search starts a fresh attempt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::search::SearchIndex;
use crate::source::IndexSource;

/// Index together with the time it finished loading
struct LoadedIndex {
    index: Arc<SearchIndex>,
    loaded_at: DateTime<Utc>,
}

pub struct IndexLoader {
    source: Arc<dyn IndexSource>,
    /// Swapped for a fresh cell on invalidation / 失效时替换为新的 cell
    cell: RwLock<Arc<OnceCell<LoadedIndex>>>,
    loads: AtomicU64,
}

impl IndexLoader {
    pub fn new(source: Arc<dyn IndexSource>) -> Self {
        Self {
            source,
            cell: RwLock::new(Arc::new(OnceCell::new())),
            loads: AtomicU64::new(0),
        }
    }

    /// Get the index, loading it on first use / 获取索引（首次使用时加载）
    pub async fn get(&self) -> Result<Arc<SearchIndex>> {
        let cell = self.cell.read().clone();
        let loaded = cell.get_or_try_init(|| self.load()).await?;
        Ok(loaded.index.clone())
    }

    async fn load(&self) -> Result<LoadedIndex> {
        let started = Instant::now();
        let attempt = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Loading search index from {} (attempt {})", self.source.describe(), attempt);

        match self.source.fetch().await {
            Ok(raw) => {
                let index = SearchIndex::from_raw(raw);
                tracing::info!(
                    "Search index loaded: {} records in {}ms",
                    index.len(),
                    started.elapsed().as_millis()
                );
                Ok(LoadedIndex {
                    index: Arc::new(index),
                    loaded_at: Utc::now(),
                })
            }
            Err(e) => {
                tracing::error!("Failed to load search index: {}", e);
                Err(e)
            }
        }
    }

    /// Loaded index, never triggers a load / 已加载的索引（不触发加载）
    pub fn cached(&self) -> Option<Arc<SearchIndex>> {
        self.cell.read().get().map(|loaded| loaded.index.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.read().initialized()
    }

    /// When the cached index was loaded / 索引加载时间
    ///
    /// A load that lands in an invalidated cell never shows up here.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.cell.read().get().map(|loaded| loaded.loaded_at)
    }

    /// Drop the cached index; the next `get` loads again / 使缓存失效
    ///
    /// A load already in flight completes into the old cell and is discarded.
    pub fn invalidate(&self) {
        *self.cell.write() = Arc::new(OnceCell::new());
        tracing::info!("Search index invalidated");
    }

    /// Number of loads started so far / 已发起的加载次数
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn source(&self) -> &dyn IndexSource {
        self.source.as_ref()
    }
}
