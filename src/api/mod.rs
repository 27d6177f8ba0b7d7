pub mod search;
pub mod server;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> Self {
        Self::error_with_code(400, message)
    }

    pub fn error_with_code(code: i32, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Build the HTTP router / 构建路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/api/search", post(search::search))
        .route("/api/search/next", post(search::next_page))
        .route("/api/search/reset", post(search::reset))
        .route("/api/search/help", get(search::help))
        .route("/api/search/enabled", get(search::is_search_enabled))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
