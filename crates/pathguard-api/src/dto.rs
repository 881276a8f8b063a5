//! Request and response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pathguard_entity::protection::ProtectionRecord;

/// POST /api/protections request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectRequest {
    /// Path to protect (normalized server-side).
    pub path: String,
    /// Scope the protection to a user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Free-text reason shown on denials.
    #[serde(default)]
    pub reason: Option<String>,
}

/// GET /api/protections/check query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckQuery {
    pub path: String,
}

/// A protection record in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionResponse {
    pub id: i64,
    pub path: String,
    pub user_id: Option<String>,
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

impl From<ProtectionRecord> for ProtectionResponse {
    fn from(record: ProtectionRecord) -> Self {
        Self {
            id: record.id,
            path: record.path.clone(),
            user_id: record.user_id.clone(),
            created_by: record.created_by.clone(),
            created_at: record.created_at_utc(),
            reason: record.reason,
        }
    }
}

/// One entry in the GET /api/protections/status map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub protected: bool,
    pub reason: Option<String>,
    pub created_by: String,
}
