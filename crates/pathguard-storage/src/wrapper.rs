//! The protection decorator over a storage backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use pathguard_core::result::AppResult;
use pathguard_core::error::AppError;
use pathguard_core::traits::storage::StorageBackend;
use pathguard_core::types::action::ProtectedAction;
use pathguard_core::types::permissions::Permissions;
use pathguard_engine::checker::ProtectionChecker;
use pathguard_engine::notify::RateLimitedNotifier;
use pathguard_engine::path;

use crate::probe;

/// Storage decorator that consults the protection checker before every
/// mutating operation and delegates everything else unchanged.
///
/// Check failures on mutating operations propagate as errors, which
/// aborts the operation: the guard fails closed. Advisory queries
/// degrade to the conservative answer instead of erroring.
#[derive(Debug, Clone)]
pub struct ProtectedStorage {
    inner: Arc<dyn StorageBackend>,
    checker: ProtectionChecker,
    notifier: RateLimitedNotifier,
}

impl ProtectedStorage {
    pub fn new(
        inner: Arc<dyn StorageBackend>,
        checker: ProtectionChecker,
        notifier: RateLimitedNotifier,
    ) -> Self {
        Self {
            inner,
            checker,
            notifier,
        }
    }

    /// Deny `action` on `path`: fire the rate-limited notification and
    /// return the domain error the caller surfaces.
    async fn deny(&self, path: &str, action: ProtectedAction) -> AppError {
        debug!(path, action = action.as_str(), "Denied operation on protected folder");
        self.notifier.notify_blocked(path, action).await;
        let reason = self.checker.denial_reason(path).await;
        AppError::protection_denied(reason)
    }

    /// Alias path for the source of a cross-storage transfer when the
    /// source backend is a group mount.
    fn source_alias(&self, source: &dyn StorageBackend, source_path: &str) -> Option<String> {
        let id = probe::find_group_mount_id(source, self.checker.config().probe_depth_limit)?;
        let mount = path::group_mount_path(&self.checker.config().group_mount_prefix, id);
        Some(format!("{mount}{}", path::normalize(source_path)))
    }

    /// Guard for cross-storage copy and move: the transfer is denied when
    /// the source is protected (directly or through its group mount) or
    /// when the target lands in or collides with a protected folder.
    async fn check_cross_storage(
        &self,
        source: &Arc<dyn StorageBackend>,
        source_path: &str,
        target_path: &str,
        action: ProtectedAction,
    ) -> AppResult<()> {
        if self.checker.is_protected(source_path).await? {
            return Err(self.deny(source_path, action).await);
        }
        if let Some(alias) = self.source_alias(source.as_ref(), source_path) {
            if self.checker.is_protected_or_parent_protected(&alias).await? {
                return Err(self.deny(&alias, action).await);
            }
        }
        if self
            .checker
            .is_protected_or_parent_protected(target_path)
            .await?
        {
            return Err(self.deny(target_path, action).await);
        }
        let name = path::basename(&path::normalize(target_path)).to_string();
        if self.checker.is_any_protected_with_basename(&name).await? {
            return Err(self.deny(target_path, action).await);
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for ProtectedStorage {
    fn backend_type(&self) -> &str {
        "protected"
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }

    async fn is_dir(&self, path: &str) -> AppResult<bool> {
        self.inner.is_dir(path).await
    }

    async fn mkdir(&self, dir_path: &str) -> AppResult<()> {
        if self
            .checker
            .is_protected_or_parent_protected(dir_path)
            .await?
        {
            return Err(self.deny(dir_path, ProtectedAction::Create).await);
        }
        let name = path::basename(&path::normalize(dir_path)).to_string();
        if self.checker.is_any_protected_with_basename(&name).await? {
            return Err(self.deny(dir_path, ProtectedAction::Create).await);
        }
        self.inner.mkdir(dir_path).await
    }

    async fn delete(&self, del_path: &str) -> AppResult<()> {
        if self.checker.is_protected(del_path).await? {
            return Err(self.deny(del_path, ProtectedAction::Delete).await);
        }
        self.inner.delete(del_path).await
    }

    async fn rename(&self, source: &str, target: &str) -> AppResult<()> {
        // Destination is checked at the protocol layer, not here.
        if self.checker.is_protected(source).await? {
            return Err(self.deny(source, ProtectedAction::Move).await);
        }
        self.inner.rename(source, target).await
    }

    async fn copy(&self, source: &str, target: &str) -> AppResult<()> {
        if self.checker.is_protected(source).await? {
            return Err(self.deny(source, ProtectedAction::Copy).await);
        }
        let name = path::basename(&path::normalize(target)).to_string();
        if self.checker.is_any_protected_with_basename(&name).await? {
            return Err(self.deny(target, ProtectedAction::Copy).await);
        }
        self.inner.copy(source, target).await
    }

    async fn copy_from(
        &self,
        source: Arc<dyn StorageBackend>,
        source_path: &str,
        target_path: &str,
    ) -> AppResult<()> {
        self.check_cross_storage(&source, source_path, target_path, ProtectedAction::Copy)
            .await?;
        self.inner.copy_from(source, source_path, target_path).await
    }

    async fn move_from(
        &self,
        source: Arc<dyn StorageBackend>,
        source_path: &str,
        target_path: &str,
    ) -> AppResult<()> {
        self.check_cross_storage(&source, source_path, target_path, ProtectedAction::Move)
            .await?;
        self.inner.move_from(source, source_path, target_path).await
    }

    async fn is_deletable(&self, query_path: &str) -> AppResult<bool> {
        match self.checker.is_protected(query_path).await {
            Ok(true) => Ok(false),
            Ok(false) => self.inner.is_deletable(query_path).await,
            Err(e) => {
                warn!(path = query_path, error = %e, "Capability check degraded to false");
                Ok(false)
            }
        }
    }

    async fn is_updatable(&self, query_path: &str) -> AppResult<bool> {
        match self.checker.is_protected(query_path).await {
            Ok(true) => Ok(false),
            Ok(false) => self.inner.is_updatable(query_path).await,
            Err(e) => {
                warn!(path = query_path, error = %e, "Capability check degraded to false");
                Ok(false)
            }
        }
    }

    async fn permissions(&self, query_path: &str) -> AppResult<Permissions> {
        let perms = self.inner.permissions(query_path).await?;
        match self.checker.is_protected(query_path).await {
            Ok(true) => Ok(perms.read_only()),
            Ok(false) => Ok(perms),
            Err(e) => {
                warn!(path = query_path, error = %e, "Permission check degraded to read-only");
                Ok(perms.read_only())
            }
        }
    }

    fn wrapped(&self) -> Option<&dyn StorageBackend> {
        Some(self.inner.as_ref())
    }

    fn group_mount_id(&self) -> Option<i64> {
        self.inner.group_mount_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use pathguard_cache::{CacheManager, MemoryCacheProvider};
    use pathguard_core::config::cache::MemoryCacheConfig;
    use pathguard_core::config::protection::ProtectionConfig;
    use pathguard_core::error::ErrorKind;
    use pathguard_core::traits::notify::LogNotifier;
    use pathguard_database::ProtectionStore;
    use pathguard_engine::memstore::MemoryProtectionStore;
    use pathguard_entity::protection::CreateProtection;

    fn make_checker() -> ProtectionChecker {
        let store = Arc::new(MemoryProtectionStore::new());
        let provider = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig {
            max_capacity: 1000,
        }));
        let cache = Arc::new(CacheManager::from_provider(provider));
        ProtectionChecker::new(store, cache, ProtectionConfig::default())
    }

    fn wrap(checker: &ProtectionChecker, inner: Arc<dyn StorageBackend>) -> ProtectedStorage {
        let notifier = RateLimitedNotifier::new(checker.clone(), Arc::new(LogNotifier));
        ProtectedStorage::new(inner, checker.clone(), notifier)
    }

    async fn protect(checker: &ProtectionChecker, path: &str) {
        checker
            .protect(CreateProtection {
                path: path.to_string(),
                file_id: None,
                user_id: None,
                created_by: "admin".to_string(),
                reason: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_protected_denied() {
        let checker = make_checker();
        let inner = Arc::new(MemoryStorage::new());
        inner.mkdir("/Projects").await.unwrap();
        let storage = wrap(&checker, inner.clone());

        protect(&checker, "/Projects").await;

        let err = storage.delete("/Projects").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProtectionDenied);
        assert!(inner.exists("/Projects").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_inside_protected_allowed() {
        let checker = make_checker();
        let inner = Arc::new(MemoryStorage::new());
        inner.mkdir("/Projects").await.unwrap();
        inner.mkdir("/Projects/scratch").await.unwrap();
        let storage = wrap(&checker, inner);

        protect(&checker, "/Projects").await;

        // Exact-match only at this entry point.
        storage.delete("/Projects/scratch").await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_protected_source_denied() {
        let checker = make_checker();
        let inner = Arc::new(MemoryStorage::new());
        inner.mkdir("/Projects").await.unwrap();
        let storage = wrap(&checker, inner);

        protect(&checker, "/Projects").await;

        let err = storage.rename("/Projects", "/Archive").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProtectionDenied);
    }

    #[tokio::test]
    async fn test_copy_onto_protected_basename_denied() {
        let checker = make_checker();
        let inner = Arc::new(MemoryStorage::new());
        inner.mkdir("/scratch").await.unwrap();
        let storage = wrap(&checker, inner);

        protect(&checker, "/team/Reports").await;

        let err = storage.copy("/scratch", "/elsewhere/Reports").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProtectionDenied);
    }

    #[tokio::test]
    async fn test_mkdir_guards() {
        let checker = make_checker();
        let storage = wrap(&checker, Arc::new(MemoryStorage::new()));

        protect(&checker, "/Projects").await;

        // Inside a protected folder.
        let err = storage.mkdir("/Projects/new").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProtectionDenied);

        // Colliding basename anywhere.
        let err = storage.mkdir("/other/Projects").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProtectionDenied);

        storage.mkdir("/unrelated").await.unwrap();
    }

    #[tokio::test]
    async fn test_capability_queries_false_when_protected() {
        let checker = make_checker();
        let inner = Arc::new(MemoryStorage::new());
        inner.mkdir("/Projects").await.unwrap();
        inner.mkdir("/open").await.unwrap();
        let storage = wrap(&checker, inner);

        protect(&checker, "/Projects").await;

        assert!(!storage.is_deletable("/Projects").await.unwrap());
        assert!(!storage.is_updatable("/Projects").await.unwrap());
        assert!(storage.is_deletable("/open").await.unwrap());
    }

    #[tokio::test]
    async fn test_permissions_stripped_when_protected() {
        let checker = make_checker();
        let inner = Arc::new(MemoryStorage::new());
        inner.mkdir("/Projects").await.unwrap();
        let storage = wrap(&checker, inner);

        protect(&checker, "/Projects").await;

        let perms = storage.permissions("/Projects").await.unwrap();
        assert!(perms.contains(Permissions::READ));
        assert!(!perms.contains(Permissions::DELETE));
        assert!(!perms.contains(Permissions::UPDATE));
        assert!(!perms.contains(Permissions::CREATE));
    }

    #[tokio::test]
    async fn test_move_from_group_mount_denied() {
        let checker = make_checker();
        let target = wrap(&checker, Arc::new(MemoryStorage::new()));

        let source: Arc<dyn StorageBackend> =
            Arc::new(MemoryStorage::group_mount(7));
        source.mkdir("/Docs").await.unwrap();

        protect(&checker, "/__groupmounts/7").await;

        let err = target
            .move_from(source, "/Docs", "/landing")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ProtectionDenied);
    }

    #[tokio::test]
    async fn test_move_from_unprotected_source_allowed() {
        let checker = make_checker();
        let target = wrap(&checker, Arc::new(MemoryStorage::new()));

        let source: Arc<dyn StorageBackend> = Arc::new(MemoryStorage::new());
        source.mkdir("/Docs").await.unwrap();

        target.move_from(source, "/Docs", "/landing").await.unwrap();
    }
}
