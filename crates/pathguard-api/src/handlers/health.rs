//! Health check handler.

use axum::Json;
use axum::extract::State;

use pathguard_core::traits::cache::CacheProvider;

use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cache_ok = state.cache.health_check().await.unwrap_or(false);
    Json(serde_json::json!({
        "status": if cache_ok { "ok" } else { "degraded" },
        "cache": cache_ok,
    }))
}
