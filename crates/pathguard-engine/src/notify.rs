//! Rate-limited notification dispatch for blocked operations.

use std::sync::Arc;

use tracing::warn;

use pathguard_core::traits::notify::Notifier;
use pathguard_core::types::action::ProtectedAction;

use crate::checker::ProtectionChecker;

/// Wraps a [`Notifier`] with the checker's per-(path, action) window.
///
/// Delivery is best-effort: a failed or suppressed notification never
/// affects the denial itself.
#[derive(Debug, Clone)]
pub struct RateLimitedNotifier {
    checker: ProtectionChecker,
    inner: Arc<dyn Notifier>,
}

impl RateLimitedNotifier {
    pub fn new(checker: ProtectionChecker, inner: Arc<dyn Notifier>) -> Self {
        Self { checker, inner }
    }

    /// Notify about a blocked action, at most once per window.
    pub async fn notify_blocked(&self, path: &str, action: ProtectedAction) {
        if !self.checker.should_notify(path, action.as_str()).await {
            return;
        }
        if let Err(e) = self.inner.notify(path, action).await {
            warn!(path, action = action.as_str(), error = %e, "Notification delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memstore::MemoryProtectionStore;
    use async_trait::async_trait;
    use pathguard_cache::{CacheManager, MemoryCacheProvider};
    use pathguard_core::config::cache::MemoryCacheConfig;
    use pathguard_core::config::protection::ProtectionConfig;
    use pathguard_core::result::AppResult;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, ProtectedAction)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, path: &str, action: ProtectedAction) -> AppResult<()> {
            self.sent
                .lock()
                .unwrap()
                .push((path.to_string(), action));
            Ok(())
        }
    }

    fn make_checker() -> ProtectionChecker {
        let store = Arc::new(MemoryProtectionStore::new());
        let provider = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig {
            max_capacity: 1000,
        }));
        let cache = Arc::new(CacheManager::from_provider(provider));
        ProtectionChecker::new(store, cache, ProtectionConfig::default())
    }

    #[tokio::test]
    async fn test_second_notification_suppressed() {
        let recorder = Arc::new(RecordingNotifier::default());
        let notifier = RateLimitedNotifier::new(make_checker(), recorder.clone());

        notifier.notify_blocked("/X", ProtectedAction::Delete).await;
        notifier.notify_blocked("/X", ProtectedAction::Delete).await;
        notifier.notify_blocked("/X", ProtectedAction::Move).await;

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], ("/X".to_string(), ProtectedAction::Delete));
        assert_eq!(sent[1], ("/X".to_string(), ProtectedAction::Move));
    }
}
