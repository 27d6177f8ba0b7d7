use axum::{extract::State, Json};
use std::sync::Arc;

use site_search::search::{search_permalink, HelpEntry, HELP_ENTRIES};
use site_search::{SearchError, SearchOutcome};

use super::types::*;
use crate::api::ApiResponse;
use crate::state::AppState;

const SUPERSEDED: &str = "Search superseded by a newer query";

fn error_response<T>(e: &SearchError) -> Json<ApiResponse<T>> {
    let code = match e {
        SearchError::IndexUnavailable(_) => 503,
        _ => 500,
    };
    Json(ApiResponse::error_with_code(code, &e.to_string()))
}

/// POST /api/search - 搜索并返回第一页
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Json<ApiResponse<SearchResponse>> {
    if !state.config.search.enabled {
        return Json(ApiResponse::error("Search is disabled"));
    }

    let summary = match state.session.search(&req.query).await {
        Ok(SearchOutcome::Ready(summary)) => summary,
        Ok(SearchOutcome::Skipped) => return Json(ApiResponse::error("Search query is empty")),
        Ok(SearchOutcome::Superseded) => return Json(ApiResponse::error_with_code(409, SUPERSEDED)),
        Err(e) => {
            tracing::warn!("Search failed for {:?}: {}", req.query, e);
            return error_response(&e);
        }
    };

    // 渲染第一页
    let Some(page) = state.session.render_next_page(state.materializer.as_ref()).await else {
        return Json(ApiResponse::error_with_code(409, SUPERSEDED));
    };

    Json(ApiResponse::success(SearchResponse {
        summary: summary.message(),
        total: summary.total,
        generation: summary.generation,
        results: page.records,
        has_more: page.has_more,
        permalink: search_permalink(&req.query),
    }))
}

/// POST /api/search/next - 加载下一页
pub async fn next_page(State(state): State<Arc<AppState>>) -> Json<ApiResponse<PageResponse>> {
    if !state.config.search.enabled {
        return Json(ApiResponse::error("Search is disabled"));
    }

    match state.session.render_next_page(state.materializer.as_ref()).await {
        Some(page) => Json(ApiResponse::success(page.into())),
        None => Json(ApiResponse::error_with_code(409, SUPERSEDED)),
    }
}

/// POST /api/search/reset - 结束会话（清除索引缓存与分页）
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<ApiResponse<()>> {
    state.session.reset();
    Json(ApiResponse::success(()))
}

/// GET /api/search/help - 查询语法帮助
pub async fn help() -> Json<ApiResponse<&'static [HelpEntry]>> {
    Json(ApiResponse::success(HELP_ENTRIES))
}

/// GET /api/search/enabled
pub async fn is_search_enabled(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SearchEnabled>> {
    Json(ApiResponse::success(SearchEnabled {
        enabled: state.config.search.enabled,
    }))
}
