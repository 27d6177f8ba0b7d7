use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// GET /api/health - 健康检查
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let loader = state.session.loader();
    Json(json!({
        "status": "ok",
        "version": site_search::VERSION,
        "build_time": env!("BUILD_TIME"),
        "index_loaded": loader.is_loaded(),
        "index_loaded_at": loader.loaded_at().map(|t| t.to_rfc3339()),
        "generation": state.session.current_generation(),
    }))
}
