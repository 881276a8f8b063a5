//! Notification delivery trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::action::ProtectedAction;

/// Delivers a "blocked operation" notification to the acting user.
///
/// Delivery is an external collaborator concern; PathGuard only decides
/// *when* to notify (rate-limited, once per path+action per window) and
/// treats delivery failures as non-fatal.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Notify the acting user that `action` on `path` was blocked.
    async fn notify(&self, path: &str, action: ProtectedAction) -> AppResult<()>;
}

/// Notifier that only logs. Used in tests and when no delivery channel is wired.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, path: &str, action: ProtectedAction) -> AppResult<()> {
        tracing::info!(path, action = action.as_str(), "Blocked operation on protected folder");
        Ok(())
    }
}
