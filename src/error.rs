use thiserror::Error;

/// Search error / 搜索错误
#[derive(Error, Debug)]
pub enum SearchError {
    /// Index fetch failed or no index loaded yet / 索引不可用
    #[error("Search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Invalid search index: {0}")]
    IndexFormat(String),

    #[error("Content unavailable: {0}")]
    Content(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias / 结果类型别名
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Whether a caller-level retry makes sense (the core never retries by itself)
    /// / 是否值得由调用方重试
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            SearchError::IndexUnavailable(_) | SearchError::Http(_) | SearchError::Io(_)
        )
    }
}
