//! The protection checker: cached decision logic over the durable store.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pathguard_cache::CacheManager;
use pathguard_cache::keys;
use pathguard_core::config::protection::ProtectionConfig;
use pathguard_core::error::AppError;
use pathguard_core::result::AppResult;
use pathguard_core::traits::cache::CacheProvider;
use pathguard_database::ProtectionStore;
use pathguard_entity::protection::{CreateProtection, ProtectionRecord};

use crate::path;

/// Cached outcome of a full-record lookup.
///
/// `Missing` is a real cache entry, distinct from "not cached": it lets a
/// negative lookup hit the cache instead of the store for the TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProtectionInfo {
    /// No record exists for the path.
    Missing,
    /// A record exists.
    Found(ProtectionRecord),
}

/// Answers all protection questions and owns cache coherency.
///
/// Read paths treat the cache as best-effort: any cache error is logged
/// and the store is consulted directly. Store errors surface as
/// `ProtectionCheckFailed` so callers guarding destructive operations can
/// fail closed.
#[derive(Debug, Clone)]
pub struct ProtectionChecker {
    store: Arc<dyn ProtectionStore>,
    cache: Arc<CacheManager>,
    config: ProtectionConfig,
}

impl ProtectionChecker {
    pub fn new(
        store: Arc<dyn ProtectionStore>,
        cache: Arc<CacheManager>,
        config: ProtectionConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Protection tunables this checker was built with.
    pub fn config(&self) -> &ProtectionConfig {
        &self.config
    }

    fn lookup_ttl(&self) -> Duration {
        Duration::from_secs(self.config.lookup_ttl_seconds)
    }

    /// Exact-match protection check on the canonical form of `path`.
    pub async fn is_protected(&self, path: &str) -> AppResult<bool> {
        let canonical = path::normalize(path);
        let key = keys::protected(&canonical);

        match self.cache.get(&key).await {
            Ok(Some(value)) => return Ok(value == "true"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Cache read failed, falling back to store"),
        }

        let protected = self
            .store
            .find_exact(&canonical)
            .await
            .map_err(check_failed)?
            .is_some();

        let value = if protected { "true" } else { "false" };
        if let Err(e) = self.cache.set(&key, value, self.lookup_ttl()).await {
            warn!(error = %e, "Cache write failed");
        }

        Ok(protected)
    }

    /// True when the path itself or any ancestor is protected.
    ///
    /// Walks root-down so a protection near the top of the tree
    /// short-circuits before the deeper lookups run.
    pub async fn is_protected_or_parent_protected(&self, path: &str) -> AppResult<bool> {
        let canonical = path::normalize(path);
        for ancestor in path::ancestors(&canonical) {
            if self.is_protected(&ancestor).await? {
                return Ok(true);
            }
        }
        self.is_protected(&canonical).await
    }

    /// True when any protected path anywhere has this exact basename.
    ///
    /// Coarse and case-sensitive: a protected `/a/Reports` blocks
    /// creating a `Reports` in any location, which keeps a staged
    /// rename from landing on a protected name.
    pub async fn is_any_protected_with_basename(&self, name: &str) -> AppResult<bool> {
        if name.is_empty() {
            return Ok(false);
        }
        let paths = self.protected_paths().await?;
        Ok(paths.iter().any(|p| path::basename(p) == name))
    }

    /// All protected paths, cached as one list.
    pub async fn protected_paths(&self) -> AppResult<Vec<String>> {
        let key = keys::all_protected();

        match self.cache.get(&key).await {
            Ok(Some(json)) => match serde_json::from_str::<Vec<String>>(&json) {
                Ok(paths) => return Ok(paths),
                Err(e) => warn!(error = %e, "Corrupt cached path list, falling back to store"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Cache read failed, falling back to store"),
        }

        let paths: Vec<String> = self
            .store
            .list_all()
            .await
            .map_err(check_failed)?
            .into_iter()
            .map(|r| r.path)
            .collect();

        match serde_json::to_string(&paths) {
            Ok(json) => {
                if let Err(e) = self.cache.set(&key, &json, self.lookup_ttl()).await {
                    warn!(error = %e, "Cache write failed");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize path list"),
        }

        Ok(paths)
    }

    /// Full protection record for a path, with negative caching.
    pub async fn protection_info(&self, path: &str) -> AppResult<Option<ProtectionRecord>> {
        let canonical = path::normalize(path);
        let key = keys::protection_info(&canonical);

        match self.cache.get(&key).await {
            Ok(Some(json)) => match serde_json::from_str::<ProtectionInfo>(&json) {
                Ok(ProtectionInfo::Missing) => return Ok(None),
                Ok(ProtectionInfo::Found(record)) => return Ok(Some(record)),
                Err(e) => warn!(error = %e, "Corrupt cached protection info, falling back to store"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Cache read failed, falling back to store"),
        }

        let record = self
            .store
            .find_exact(&canonical)
            .await
            .map_err(check_failed)?;

        let info = match &record {
            Some(r) => ProtectionInfo::Found(r.clone()),
            None => ProtectionInfo::Missing,
        };
        match serde_json::to_string(&info) {
            Ok(json) => {
                if let Err(e) = self.cache.set(&key, &json, self.lookup_ttl()).await {
                    warn!(error = %e, "Cache write failed");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize protection info"),
        }

        Ok(record)
    }

    /// Denial reason for a path: the record's reason, or the configured
    /// default when the record has none or cannot be read.
    pub async fn denial_reason(&self, path: &str) -> String {
        match self.protection_info(path).await {
            Ok(Some(record)) => record
                .reason
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| self.config.default_reason.clone()),
            Ok(None) | Err(_) => self.config.default_reason.clone(),
        }
    }

    /// Decide whether a blocked-operation notification should fire now.
    ///
    /// At most one notification per (path, action) pair per window; the
    /// claim is an atomic set-if-absent so concurrent requests cannot
    /// both win. Cache failures suppress the notification rather than
    /// spamming the user.
    pub async fn should_notify(&self, path: &str, action: &str) -> bool {
        let canonical = path::normalize(path);
        let key = keys::notification_sent(&canonical, action);
        let window = Duration::from_secs(self.config.notification_window_seconds);
        let now = chrono::Utc::now().timestamp().to_string();

        match self.cache.set_nx(&key, &now, window).await {
            Ok(won) => won,
            Err(e) => {
                warn!(error = %e, "Notification de-duplication unavailable, suppressing");
                false
            }
        }
    }

    /// Create a protection record. The path is normalized first; the
    /// store enforces uniqueness.
    pub async fn protect(&self, mut data: CreateProtection) -> AppResult<ProtectionRecord> {
        data.path = path::normalize(&data.path);
        let record = self.store.insert(&data).await?;
        debug!(path = %record.path, id = record.id, "Protection created");
        self.clear_cache().await;
        Ok(record)
    }

    /// Remove a protection by id. Errors with `NotFound` when no record
    /// has that id.
    pub async fn unprotect_by_id(&self, id: i64) -> AppResult<()> {
        let removed = self.store.delete_by_id(id).await?;
        if removed == 0 {
            return Err(AppError::not_found(format!("No protection with id {id}")));
        }
        debug!(id, "Protection removed");
        self.clear_cache().await;
        Ok(())
    }

    /// Remove a protection by path. Errors with `NotFound` when the
    /// canonical path is not protected.
    pub async fn unprotect_by_path(&self, path: &str) -> AppResult<()> {
        let canonical = path::normalize(path);
        let removed = self.store.delete_by_path(&canonical).await?;
        if removed == 0 {
            return Err(AppError::not_found(format!(
                "Path is not protected: {canonical}"
            )));
        }
        debug!(path = %canonical, "Protection removed");
        self.clear_cache().await;
        Ok(())
    }

    /// All protection records, newest first.
    pub async fn list(&self) -> AppResult<Vec<ProtectionRecord>> {
        self.store.list_all().await
    }

    /// Resolve a record id to its path.
    pub async fn path_for_id(&self, id: i64) -> AppResult<Option<String>> {
        self.store.find_path_by_id(id).await
    }

    /// Drop every cached protection entry.
    ///
    /// Invoked after every store mutation. Dropping the whole namespace
    /// is cheap at this cardinality and closes every derived-key
    /// invalidation hole (ancestor walks, basename list, negative
    /// entries) in one move.
    pub async fn clear_cache(&self) {
        if let Err(e) = self.cache.flush_all().await {
            warn!(error = %e, "Cache flush failed after mutation");
        }
    }
}

fn check_failed(e: AppError) -> AppError {
    AppError::with_source(
        pathguard_core::error::ErrorKind::ProtectionCheckFailed,
        format!("Protection check failed: {}", e.message),
        e,
    )
}
