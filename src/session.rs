//! Search session - owns the index loader and the active result cursor / 搜索会话
//!
//! Every non-empty search takes a new generation. Work started under an older
//! generation is dropped when it finishes: a search superseded while the index was
//! loading leaves the cursor alone, and a page rendered for an old search is not
//! delivered.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use crate::content::ContentMaterializer;
use crate::error::Result;
use crate::loader::IndexLoader;
use crate::search::{match_query, parse, RecordId, ResultPaginator, SearchPage};

/// Tracks the active search generation / 跟踪当前搜索版本
#[derive(Debug, Default)]
pub struct SearchVersionTracker {
    active: AtomicU64,
}

impl SearchVersionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding older ones / 开始新版本
    pub fn next_version(&self) -> u64 {
        self.active.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, version: u64) -> bool {
        self.current() == version
    }
}

/// Result summary / 搜索结果摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub generation: u64,
    pub query: String,
    pub total: usize,
}

impl SearchSummary {
    pub fn message(&self) -> String {
        match self.total {
            0 => "No records found".to_string(),
            1 => "1 record found".to_string(),
            n => format!("{} records found", n),
        }
    }
}

/// Outcome of a search request / 搜索请求结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query had no terms, nothing was done / 空查询，不执行搜索
    Skipped,
    /// A newer search started before this one finished / 已被新的搜索取代
    Superseded,
    Ready(SearchSummary),
}

/// Page of ids tagged with the search it belongs to / 带版本的结果页
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPage {
    pub generation: u64,
    #[serde(flatten)]
    pub page: SearchPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRecord {
    pub id: RecordId,
    pub html: String,
}

/// Rendered page / 渲染后的结果页
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    pub generation: u64,
    pub records: Vec<RenderedRecord>,
    pub has_more: bool,
}

/// Paginator plus the generation of the search that filled it / 分页器及其所属版本
#[derive(Debug, Default)]
struct Cursor {
    paginator: ResultPaginator,
    generation: u64,
}

pub struct SearchSession {
    loader: IndexLoader,
    cursor: Mutex<Cursor>,
    versions: SearchVersionTracker,
    page_size: usize,
}

impl SearchSession {
    pub fn new(loader: IndexLoader, page_size: usize) -> Self {
        Self {
            loader,
            cursor: Mutex::new(Cursor::default()),
            versions: SearchVersionTracker::new(),
            page_size: page_size.max(1),
        }
    }

    /// Run a search and reset the cursor to its matches / 执行搜索并重置分页
    ///
    /// Loads the index on first use. An empty query is a no-op and leaves the
    /// previous results in place.
    pub async fn search(&self, raw: &str) -> Result<SearchOutcome> {
        let query = parse(raw);
        if query.is_empty() {
            tracing::debug!("Empty query {:?}, search skipped", raw);
            return Ok(SearchOutcome::Skipped);
        }

        let generation = self.versions.next_version();
        let index = match self.loader.get().await {
            Ok(index) => index,
            Err(e) => {
                // The old list must not outlive a newer search, even a failed one
                let mut cursor = self.cursor.lock();
                if self.versions.is_current(generation) {
                    cursor.paginator.clear();
                    cursor.generation = generation;
                }
                return Err(e);
            }
        };

        let matches = match_query(&query, &index);
        let total = matches.len();

        {
            let mut cursor = self.cursor.lock();
            // Checked under the lock so a newer search cannot interleave
            if !self.versions.is_current(generation) {
                tracing::debug!("Search {:?} (generation {}) superseded", raw, generation);
                return Ok(SearchOutcome::Superseded);
            }
            cursor.paginator.init(matches, self.page_size);
            cursor.generation = generation;
        }

        tracing::info!(
            "Search {:?}: {} group(s), {} match(es), generation {}",
            raw,
            query.len(),
            total,
            generation
        );
        Ok(SearchOutcome::Ready(SearchSummary {
            generation,
            query: raw.to_string(),
            total,
        }))
    }

    /// Next page of ids from the active search / 获取下一页
    ///
    /// Returns `None` while a newer search is still in flight: the cursor then holds
    /// matches of a search that has been superseded, and they are left in place.
    pub fn next_page(&self) -> Option<SessionPage> {
        let mut cursor = self.cursor.lock();
        if !self.versions.is_current(cursor.generation) {
            tracing::debug!(
                "Cursor generation {} is stale (current {})",
                cursor.generation,
                self.versions.current()
            );
            return None;
        }
        Some(SessionPage {
            generation: cursor.generation,
            page: cursor.paginator.next_page(),
        })
    }

    /// Next page rendered through `materializer` / 获取并渲染下一页
    ///
    /// Records that fail to render are skipped. Returns `None` when a newer search
    /// started while this page was being rendered.
    pub async fn render_next_page(
        &self,
        materializer: &dyn ContentMaterializer,
    ) -> Option<RenderedPage> {
        let SessionPage { generation, page } = self.next_page()?;

        let mut records = Vec::with_capacity(page.ids.len());
        for id in page.ids {
            match materializer.materialize(&id).await {
                Ok(html) => records.push(RenderedRecord { id, html }),
                Err(e) => tracing::warn!("Failed to load content for {}: {}", id, e),
            }
        }

        if !self.versions.is_current(generation) {
            tracing::debug!("Discarding page rendered for stale generation {}", generation);
            return None;
        }

        Some(RenderedPage {
            generation,
            records,
            has_more: page.has_more,
        })
    }

    /// End the session: drop the index and the cursor / 结束会话
    pub fn reset(&self) {
        let mut cursor = self.cursor.lock();
        cursor.generation = self.versions.next_version();
        cursor.paginator.clear();
        self.loader.invalidate();
    }

    pub fn current_generation(&self) -> u64 {
        self.versions.current()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn loader(&self) -> &IndexLoader {
        &self.loader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::search::{PaginatorState, RawIndex};
    use crate::source::{IndexSource, StaticIndexSource};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    fn corpus(n: usize) -> RawIndex {
        (0..n)
            .map(|i| {
                let text = if i % 2 == 0 { "Even food" } else { "Odd restaurant" };
                (format!("post/{}", i), text.to_string())
            })
            .collect()
    }

    fn session(n: usize, page_size: usize) -> SearchSession {
        let loader = IndexLoader::new(Arc::new(StaticIndexSource::new(corpus(n))));
        SearchSession::new(loader, page_size)
    }

    struct EchoMaterializer;

    #[async_trait]
    impl ContentMaterializer for EchoMaterializer {
        async fn materialize(&self, id: &str) -> Result<String> {
            if id.ends_with("/3") {
                return Err(SearchError::Content("broken".to_string()));
            }
            Ok(format!("<article>{}</article>", id))
        }
    }

    struct SlowSource;

    #[async_trait]
    impl IndexSource for SlowSource {
        async fn fetch(&self) -> Result<RawIndex> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(corpus(4))
        }

        fn describe(&self) -> String {
            "slow".to_string()
        }
    }

    struct FailingSource;

    #[async_trait]
    impl IndexSource for FailingSource {
        async fn fetch(&self) -> Result<RawIndex> {
            Err(SearchError::IndexUnavailable("HTTP 500".to_string()))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    #[tokio::test]
    async fn test_search_and_paginate() {
        let session = session(50, 10);
        let SearchOutcome::Ready(summary) = session.search("food").await.unwrap() else {
            panic!("expected results");
        };
        assert_eq!(summary.total, 25);
        assert_eq!(summary.message(), "25 records found");

        let sizes: Vec<(usize, bool)> = (0..4)
            .map(|_| {
                let page = session.next_page().unwrap().page;
                (page.ids.len(), page.has_more)
            })
            .collect();
        assert_eq!(sizes, vec![(10, true), (10, true), (5, false), (0, false)]);
    }

    #[tokio::test]
    async fn test_empty_query_is_noop() {
        let session = session(10, 2);
        session.search("food").await.unwrap();
        session.next_page();

        assert_eq!(session.search("   ").await.unwrap(), SearchOutcome::Skipped);
        assert_eq!(session.search("\"\"").await.unwrap(), SearchOutcome::Skipped);
        // Previous cursor untouched
        assert_eq!(session.next_page().unwrap().page.ids, vec!["post/4", "post/6"]);
    }

    #[tokio::test]
    async fn test_empty_query_does_not_load_index() {
        let session = session(10, 2);
        session.search("").await.unwrap();
        assert_eq!(session.loader().load_count(), 0);
    }

    #[tokio::test]
    async fn test_new_search_replaces_cursor() {
        let session = session(30, 5);
        session.search("food").await.unwrap();
        session.next_page();

        session.search("restaurant").await.unwrap();
        let page = session.next_page().unwrap().page;
        assert_eq!(page.ids, vec!["post/1", "post/3", "post/5", "post/7", "post/9"]);
    }

    #[tokio::test]
    async fn test_no_matches() {
        let session = session(10, 5);
        let SearchOutcome::Ready(summary) = session.search("zwift").await.unwrap() else {
            panic!("expected a summary");
        };
        assert_eq!(summary.message(), "No records found");
        assert_eq!(session.next_page().unwrap().page, SearchPage::default());
    }

    #[tokio::test]
    async fn test_index_unavailable() {
        let session = SearchSession::new(IndexLoader::new(Arc::new(FailingSource)), 10);
        let err = session.search("food").await.unwrap_err();
        assert!(matches!(err, SearchError::IndexUnavailable(_)));
        assert_eq!(session.next_page().unwrap().page, SearchPage::default());
    }

    #[tokio::test]
    async fn test_superseded_search_does_not_touch_cursor() {
        let session = Arc::new(SearchSession::new(IndexLoader::new(Arc::new(SlowSource)), 10));

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.search("food").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = session.search("restaurant").await.unwrap();

        assert_eq!(first.await.unwrap().unwrap(), SearchOutcome::Superseded);
        assert!(matches!(second, SearchOutcome::Ready(_)));
        assert_eq!(session.loader().load_count(), 1);
        assert_eq!(session.next_page().unwrap().page.ids, vec!["post/1", "post/3"]);
    }

    #[tokio::test]
    async fn test_render_skips_broken_records() {
        let session = session(8, 3);
        session.search("restaurant").await.unwrap();

        let page = session.render_next_page(&EchoMaterializer).await.unwrap();
        let ids: Vec<&str> = page.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["post/1", "post/5"]);
        assert_eq!(page.records[0].html, "<article>post/1</article>");
        assert!(page.has_more);
    }

    struct SupersedingMaterializer {
        session: Arc<SearchSession>,
    }

    #[async_trait]
    impl ContentMaterializer for SupersedingMaterializer {
        async fn materialize(&self, id: &str) -> Result<String> {
            // A newer search lands while this page is still rendering
            self.session.search("food").await?;
            Ok(id.to_string())
        }
    }

    #[tokio::test]
    async fn test_stale_page_is_dropped() {
        let session = Arc::new(session(10, 2));
        session.search("restaurant").await.unwrap();

        let materializer = SupersedingMaterializer { session: session.clone() };
        assert!(session.render_next_page(&materializer).await.is_none());
        assert_eq!(session.next_page().unwrap().page.ids, vec!["post/0", "post/2"]);
    }

    #[tokio::test]
    async fn test_reset_ends_session() {
        let session = session(10, 2);
        session.search("food").await.unwrap();
        let before = session.current_generation();

        session.reset();
        assert!(session.current_generation() > before);
        assert!(!session.loader().is_loaded());
        assert_eq!(session.cursor.lock().paginator.state(), PaginatorState::Idle);
        assert_eq!(session.next_page().unwrap().page, SearchPage::default());

        session.search("food").await.unwrap();
        assert_eq!(session.loader().load_count(), 2);
    }

    /// First fetch is immediate, later fetches are slow or fail / 首次立即返回，之后变慢或失败
    struct ReloadingSource {
        fetches: std::sync::atomic::AtomicUsize,
        fail_reload: bool,
    }

    impl ReloadingSource {
        fn new(fail_reload: bool) -> Self {
            Self { fetches: std::sync::atomic::AtomicUsize::new(0), fail_reload }
        }
    }

    #[async_trait]
    impl IndexSource for ReloadingSource {
        async fn fetch(&self) -> Result<RawIndex> {
            if self.fetches.fetch_add(1, Ordering::SeqCst) > 0 {
                tokio::time::sleep(Duration::from_millis(200)).await;
                if self.fail_reload {
                    return Err(SearchError::IndexUnavailable("HTTP 502".to_string()));
                }
            }
            Ok(corpus(6))
        }

        fn describe(&self) -> String {
            "reloading".to_string()
        }
    }

    #[tokio::test]
    async fn test_old_matches_withheld_while_newer_search_loads() {
        let session = Arc::new(SearchSession::new(
            IndexLoader::new(Arc::new(ReloadingSource::new(false))),
            1,
        ));
        session.search("food").await.unwrap();
        session.loader().invalidate();

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.search("restaurant").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(session.next_page().is_none());
        assert!(session.render_next_page(&EchoMaterializer).await.is_none());

        let SearchOutcome::Ready(summary) = pending.await.unwrap().unwrap() else {
            panic!("expected results");
        };
        let page = session.render_next_page(&EchoMaterializer).await.unwrap();
        assert_eq!(page.generation, summary.generation);
        assert_eq!(page.records[0].id, "post/1");
    }

    #[tokio::test]
    async fn test_failed_newer_search_drops_old_matches() {
        let session = SearchSession::new(IndexLoader::new(Arc::new(ReloadingSource::new(true))), 2);
        session.search("food").await.unwrap();
        session.loader().invalidate();

        let err = session.search("restaurant").await.unwrap_err();
        assert!(matches!(err, SearchError::IndexUnavailable(_)));

        let page = session.next_page().unwrap();
        assert_eq!(page.generation, session.current_generation());
        assert_eq!(page.page, SearchPage::default());
    }

    #[test]
    fn test_summary_message() {
        let summary = |total| SearchSummary { generation: 1, query: "q".to_string(), total };
        assert_eq!(summary(1).message(), "1 record found");
        assert_eq!(summary(2).message(), "2 records found");
    }
}
