//! One-shot wrapper registration over mounted storages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use pathguard_core::traits::storage::StorageBackend;
use pathguard_engine::checker::ProtectionChecker;
use pathguard_engine::notify::RateLimitedNotifier;

use crate::wrapper::ProtectedStorage;

/// Execution context a mount is being set up for.
///
/// Background jobs (scans, cleanups, migrations) run without a user and
/// must not be blocked by UI-facing protections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Interactive,
    Background,
}

/// Applies the protection wrapper to eligible mounts, once per process.
///
/// Mount setup hooks can fire more than once in a worker's lifetime;
/// the `registered` flag keeps a second registration from double-wrapping
/// every storage.
#[derive(Debug)]
pub struct WrapperRegistry {
    checker: ProtectionChecker,
    notifier: RateLimitedNotifier,
    registered: AtomicBool,
}

impl WrapperRegistry {
    pub fn new(checker: ProtectionChecker, notifier: RateLimitedNotifier) -> Self {
        Self {
            checker,
            notifier,
            registered: AtomicBool::new(false),
        }
    }

    /// Claim the registration slot. Returns `true` exactly once.
    pub fn register(&self) -> bool {
        let first = self
            .registered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if first {
            info!("Protection storage wrapper registered");
        } else {
            debug!("Protection storage wrapper already registered, skipping");
        }
        first
    }

    /// Wrap one mount's backend if it is eligible.
    ///
    /// The root mount and background contexts pass through unwrapped.
    pub fn wrap(
        &self,
        mount_point: &str,
        context: ExecutionContext,
        backend: Arc<dyn StorageBackend>,
    ) -> Arc<dyn StorageBackend> {
        if mount_point == "/" || context == ExecutionContext::Background {
            debug!(mount_point, ?context, "Mount not eligible for protection wrapper");
            return backend;
        }
        debug!(mount_point, "Applying protection wrapper");
        Arc::new(ProtectedStorage::new(
            backend,
            self.checker.clone(),
            self.notifier.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use pathguard_cache::{CacheManager, MemoryCacheProvider};
    use pathguard_core::config::cache::MemoryCacheConfig;
    use pathguard_core::config::protection::ProtectionConfig;
    use pathguard_core::traits::notify::LogNotifier;
    use pathguard_engine::memstore::MemoryProtectionStore;

    fn make_registry() -> WrapperRegistry {
        let store = Arc::new(MemoryProtectionStore::new());
        let provider = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig {
            max_capacity: 1000,
        }));
        let cache = Arc::new(CacheManager::from_provider(provider));
        let checker = ProtectionChecker::new(store, cache, ProtectionConfig::default());
        let notifier = RateLimitedNotifier::new(checker.clone(), Arc::new(LogNotifier));
        WrapperRegistry::new(checker, notifier)
    }

    #[test]
    fn test_register_is_one_shot() {
        let registry = make_registry();
        assert!(registry.register());
        assert!(!registry.register());
        assert!(!registry.register());
    }

    #[test]
    fn test_wrap_skips_root_and_background() {
        let registry = make_registry();
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryStorage::new());

        let wrapped = registry.wrap("/", ExecutionContext::Interactive, backend.clone());
        assert_eq!(wrapped.backend_type(), "memory");

        let wrapped = registry.wrap("/user/files", ExecutionContext::Background, backend.clone());
        assert_eq!(wrapped.backend_type(), "memory");

        let wrapped = registry.wrap("/user/files", ExecutionContext::Interactive, backend);
        assert_eq!(wrapped.backend_type(), "protected");
    }
}
