//! Protection record repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use pathguard_core::error::{AppError, ErrorKind};
use pathguard_core::result::AppResult;
use pathguard_entity::protection::{CreateProtection, ProtectionRecord};

use crate::store::ProtectionStore;

/// PostgreSQL-backed protection store.
#[derive(Debug, Clone)]
pub struct ProtectionRepository {
    pool: PgPool,
}

impl ProtectionRepository {
    /// Create a new protection repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProtectionStore for ProtectionRepository {
    async fn insert(&self, data: &CreateProtection) -> AppResult<ProtectionRecord> {
        sqlx::query_as::<_, ProtectionRecord>(
            "INSERT INTO folder_protection (path, file_id, user_id, created_by, created_at, reason) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.path)
        .bind(data.file_id)
        .bind(&data.user_id)
        .bind(&data.created_by)
        .bind(chrono::Utc::now().timestamp())
        .bind(&data.reason)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // The uniqueness constraint does the duplicate detection, not a
            // prior read, so concurrent inserts cannot both succeed.
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("folder_protection_path_key") =>
            {
                AppError::duplicate_path(format!("Path '{}' is already protected", data.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert protection", e),
        })
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM folder_protection WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete protection", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn delete_by_path(&self, path: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM folder_protection WHERE path = $1")
            .bind(path)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete protection", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn find_exact(&self, path: &str) -> AppResult<Option<ProtectionRecord>> {
        sqlx::query_as::<_, ProtectionRecord>("SELECT * FROM folder_protection WHERE path = $1")
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find protection", e))
    }

    async fn list_all(&self) -> AppResult<Vec<ProtectionRecord>> {
        sqlx::query_as::<_, ProtectionRecord>(
            "SELECT * FROM folder_protection ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list protections", e))
    }

    async fn find_path_by_id(&self, id: i64) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT path FROM folder_protection WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resolve protection id", e)
            })
    }
}
