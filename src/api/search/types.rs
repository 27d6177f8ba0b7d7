use serde::{Deserialize, Serialize};

use site_search::session::{RenderedPage, RenderedRecord};

/// 搜索请求
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// 搜索响应（包含第一页）
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// e.g. "3 records found" / 结果摘要
    pub summary: String,
    pub total: usize,
    pub generation: u64,
    pub results: Vec<RenderedRecord>,
    pub has_more: bool,
    pub permalink: String,
}

/// 下一页响应
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub generation: u64,
    pub results: Vec<RenderedRecord>,
    pub has_more: bool,
}

impl From<RenderedPage> for PageResponse {
    fn from(page: RenderedPage) -> Self {
        Self {
            generation: page.generation,
            results: page.records,
            has_more: page.has_more,
        }
    }
}

/// 搜索开关
#[derive(Debug, Serialize)]
pub struct SearchEnabled {
    pub enabled: bool,
}
