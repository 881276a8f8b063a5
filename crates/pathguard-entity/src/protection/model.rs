//! Protection record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A durable record marking one canonical path as protected.
///
/// Records are immutable after insert except for deletion; changing a
/// reason means delete-and-recreate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProtectionRecord {
    /// Surrogate key assigned on insert.
    pub id: i64,
    /// Canonical path (`/segment/segment`, single leading slash, no trailing slash).
    pub path: String,
    /// Optional cross-reference to the underlying storage object.
    pub file_id: Option<i64>,
    /// Identity the protection applies on behalf of, when scoped.
    pub user_id: Option<String>,
    /// Identity that created the protection.
    pub created_by: String,
    /// Creation time as unix seconds.
    pub created_at: i64,
    /// Optional free-text reason shown to users and clients.
    pub reason: Option<String>,
}

impl ProtectionRecord {
    /// Creation time as a UTC timestamp, for display.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }
}

/// Data required to create a new protection record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProtection {
    /// Canonical path to protect.
    pub path: String,
    /// Optional storage object reference.
    pub file_id: Option<i64>,
    /// Identity the protection is scoped to, if any.
    pub user_id: Option<String>,
    /// Identity creating the protection.
    pub created_by: String,
    /// Optional reason.
    pub reason: Option<String>,
}
