//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use pathguard_cache::CacheManager;
use pathguard_core::config::AppConfig;
use pathguard_dav::MountResolver;
use pathguard_engine::checker::ProtectionChecker;

/// Application state passed to every Axum handler via `State<AppState>`.
///
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The protection decision engine.
    pub checker: ProtectionChecker,
    /// Cache manager, for the explicit cache-clear endpoint.
    pub cache: Arc<CacheManager>,
    /// Group-mount alias resolver, for the status map.
    pub mounts: Arc<MountResolver>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        checker: ProtectionChecker,
        cache: Arc<CacheManager>,
        mounts: Arc<MountResolver>,
    ) -> Self {
        Self {
            config,
            checker,
            cache,
            mounts,
        }
    }
}
