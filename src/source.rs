//! Index sources - where the index blob comes from / 索引来源
//!
//! A source delivers the whole index in one call. It does not fold case and does
//! not retry; both belong elsewhere.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::AppConfig;
use crate::error::{Result, SearchError};
use crate::search::RawIndex;

/// Index source trait / 索引来源 trait
#[async_trait]
pub trait IndexSource: Send + Sync {
    /// Fetch the full index / 获取完整索引
    async fn fetch(&self) -> Result<RawIndex>;

    /// Human-readable location for logs / 用于日志的描述
    fn describe(&self) -> String;
}

/// Fetches `search.json` over HTTP / 通过 HTTP 获取索引
pub struct HttpIndexSource {
    client: Client,
    url: Url,
}

impl HttpIndexSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    async fn fetch(&self) -> Result<RawIndex> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| SearchError::IndexUnavailable(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SearchError::IndexUnavailable(format!(
                "HTTP {} from {}",
                response.status(),
                self.url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::IndexUnavailable(format!("read failed: {}", e)))?;
        RawIndex::from_json(&body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads the index from a local file / 从本地文件读取索引
pub struct FileIndexSource {
    path: PathBuf,
}

impl FileIndexSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IndexSource for FileIndexSource {
    async fn fetch(&self) -> Result<RawIndex> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SearchError::IndexUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        RawIndex::from_json(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory index / 内存索引
pub struct StaticIndexSource {
    raw: RawIndex,
}

impl StaticIndexSource {
    pub fn new(raw: RawIndex) -> Self {
        Self { raw }
    }
}

#[async_trait]
impl IndexSource for StaticIndexSource {
    async fn fetch(&self) -> Result<RawIndex> {
        Ok(self.raw.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} entries)", self.raw.len())
    }
}

/// Pick the index source from config: local file if set, otherwise HTTP
/// / 根据配置选择索引来源
pub fn source_from_config(config: &AppConfig) -> Result<Arc<dyn IndexSource>> {
    match config.index_file() {
        Some(path) => Ok(Arc::new(FileIndexSource::new(path))),
        None => Ok(Arc::new(HttpIndexSource::new(
            config.index_url()?,
            config.request_timeout(),
        )?)),
    }
}
