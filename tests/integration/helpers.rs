//! Shared fixtures for the integration tests.

use std::sync::Arc;

use async_trait::async_trait;

use pathguard_cache::{CacheManager, MemoryCacheProvider};
use pathguard_core::config::AppConfig;
use pathguard_core::config::cache::MemoryCacheConfig;
use pathguard_core::result::AppResult;
use pathguard_core::traits::notify::LogNotifier;
use pathguard_dav::{ChangeTracker, DavGuard, DavInterceptor, DavTree, MountResolver};
use pathguard_engine::checker::ProtectionChecker;
use pathguard_engine::memstore::MemoryProtectionStore;
use pathguard_engine::notify::RateLimitedNotifier;
use pathguard_entity::protection::CreateProtection;
use pathguard_storage::{MemoryStorage, ProtectedStorage};

pub const ADMIN_TOKEN: &str = "integration-admin-token";

/// Everything the end-to-end tests need, wired the way the server
/// entry point wires it, minus Postgres and Redis.
pub struct TestEnv {
    pub config: Arc<AppConfig>,
    pub checker: ProtectionChecker,
    pub cache: Arc<CacheManager>,
    pub mounts: Arc<MountResolver>,
}

impl TestEnv {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.server.admin_token = Some(ADMIN_TOKEN.to_string());

        let store = Arc::new(MemoryProtectionStore::new());
        let provider = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig {
            max_capacity: 1000,
        }));
        let cache = Arc::new(CacheManager::from_provider(provider));
        let checker =
            ProtectionChecker::new(store, Arc::clone(&cache), config.protection.clone());
        let mounts = Arc::new(MountResolver::new(&config.protection.group_mount_prefix));

        Self {
            config: Arc::new(config),
            checker,
            cache,
            mounts,
        }
    }

    pub fn notifier(&self) -> RateLimitedNotifier {
        RateLimitedNotifier::new(self.checker.clone(), Arc::new(LogNotifier))
    }

    /// Wrap `backend` the way the registry wraps an interactive mount.
    pub fn protected_storage(&self, backend: Arc<MemoryStorage>) -> ProtectedStorage {
        ProtectedStorage::new(backend, self.checker.clone(), self.notifier())
    }

    pub fn interceptor(&self) -> DavInterceptor {
        let guard = DavGuard::new(self.checker.clone(), Arc::clone(&self.mounts));
        DavInterceptor::new(
            guard,
            self.notifier(),
            Arc::new(NullTracker),
            Arc::new(NullTree),
        )
    }

    pub async fn protect(&self, path: &str, reason: Option<&str>) {
        self.checker
            .protect(CreateProtection {
                path: path.to_string(),
                file_id: None,
                user_id: None,
                created_by: "admin".to_string(),
                reason: reason.map(String::from),
            })
            .await
            .unwrap();
    }
}

#[derive(Debug)]
pub struct NullTracker;

#[async_trait]
impl ChangeTracker for NullTracker {
    async fn touch(&self, _path: &str) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct NullTree;

#[async_trait]
impl DavTree for NullTree {
    async fn is_empty_dir(&self, _path: &str) -> AppResult<bool> {
        Ok(false)
    }
    async fn created_recently(&self, _path: &str) -> AppResult<bool> {
        Ok(false)
    }
    async fn remove_dir(&self, _path: &str) -> AppResult<()> {
        Ok(())
    }
}
