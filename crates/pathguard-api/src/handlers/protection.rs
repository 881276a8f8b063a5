//! Protection management handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};

use pathguard_entity::protection::CreateProtection;

use crate::dto::{CheckQuery, ProtectRequest, ProtectionResponse, StatusEntry};
use crate::error::ApiError;
use crate::state::AppState;

/// Identity recorded for protections created through the admin API.
const API_ADMIN: &str = "admin";

/// GET /api/protections
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let records = state.checker.list().await?;
    let items: Vec<ProtectionResponse> = records.into_iter().map(Into::into).collect();
    Ok(Json(serde_json::json!({ "success": true, "data": items })))
}

/// POST /api/protections
pub async fn protect(
    State(state): State<AppState>,
    Json(req): Json<ProtectRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.path.trim().is_empty() {
        return Err(pathguard_core::error::AppError::validation("Path must not be empty").into());
    }

    let record = state
        .checker
        .protect(CreateProtection {
            path: req.path,
            file_id: None,
            user_id: req.user_id,
            created_by: API_ADMIN.to_string(),
            reason: req.reason,
        })
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": ProtectionResponse::from(record),
    })))
}

/// DELETE /api/protections/{id}
pub async fn unprotect(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.checker.unprotect_by_id(id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /api/protections/check?path=...
///
/// Read-only and safe for any authenticated caller; no admin token.
pub async fn check(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let protected = state.checker.is_protected(&query.path).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "protected": protected },
    })))
}

/// POST /api/protections/cache/clear
pub async fn clear_cache(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.checker.clear_cache().await;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /api/protections/status
///
/// Full `path -> status` map for badge rendering, including the
/// externally visible alias for records stored under a group mount's
/// internal identifier path.
pub async fn status(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let records = state.checker.list().await?;

    let mut map: BTreeMap<String, StatusEntry> = BTreeMap::new();
    for record in records {
        let entry = StatusEntry {
            protected: true,
            reason: record.reason.clone(),
            created_by: record.created_by.clone(),
        };
        if let Some(visible) = state.mounts.to_visible(&record.path) {
            map.insert(visible, entry.clone());
        }
        map.insert(record.path, entry);
    }

    Ok(Json(serde_json::json!({ "success": true, "data": map })))
}
