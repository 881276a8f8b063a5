//! Request interception and denial response shaping.

use std::sync::Arc;

use async_trait::async_trait;
use http::{Method, StatusCode};
use tracing::{debug, warn};

use pathguard_core::result::AppResult;
use pathguard_core::types::action::ProtectedAction;
use pathguard_engine::notify::RateLimitedNotifier;
use pathguard_engine::path;

use crate::guard::{DavGuard, Denial, DenialCause, GuardVerdict};

/// Forces a resource's change-tracking metadata (version tag and
/// modification time) to update so polling clients detect a change.
///
/// Sync clients optimistically drop a deleted item from their local view
/// and only restore it when they observe new metadata on the next poll.
#[async_trait]
pub trait ChangeTracker: Send + Sync + std::fmt::Debug + 'static {
    async fn touch(&self, path: &str) -> AppResult<()>;
}

/// The slice of tree state the interceptor needs for bypass cleanup.
#[async_trait]
pub trait DavTree: Send + Sync + std::fmt::Debug + 'static {
    async fn is_empty_dir(&self, path: &str) -> AppResult<bool>;
    async fn created_recently(&self, path: &str) -> AppResult<bool>;
    async fn remove_dir(&self, path: &str) -> AppResult<()>;
}

/// A fully shaped denial response for the transport layer to emit.
#[derive(Debug, Clone)]
pub struct DenialResponse {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

pub const HEADER_PROTECTED: &str = "X-Folder-Protected";
pub const HEADER_ACTION: &str = "X-Protection-Action";
pub const HEADER_REASON: &str = "X-Protection-Reason";

/// Runs the guard for each DAV request and turns denials into responses,
/// performing the denial side effects on the way out.
#[derive(Debug, Clone)]
pub struct DavInterceptor {
    guard: DavGuard,
    notifier: RateLimitedNotifier,
    tracker: Arc<dyn ChangeTracker>,
    tree: Arc<dyn DavTree>,
}

impl DavInterceptor {
    pub fn new(
        guard: DavGuard,
        notifier: RateLimitedNotifier,
        tracker: Arc<dyn ChangeTracker>,
        tree: Arc<dyn DavTree>,
    ) -> Self {
        Self {
            guard,
            notifier,
            tracker,
            tree,
        }
    }

    pub fn guard(&self) -> &DavGuard {
        &self.guard
    }

    /// Intercept one request. Returns the denial response to emit, or
    /// `None` when the request may proceed.
    pub async fn intercept(
        &self,
        method: &Method,
        uri: &str,
        destination: Option<&str>,
    ) -> Option<DenialResponse> {
        match self.guard.evaluate(method, uri, destination).await {
            GuardVerdict::Allow => None,
            GuardVerdict::Deny(denial) => Some(self.deny(denial).await),
        }
    }

    /// Intercept a LOCK request whose scope was parsed from the body.
    pub async fn intercept_lock(&self, uri: &str, exclusive: bool) -> Option<DenialResponse> {
        match self.guard.evaluate_lock(uri, exclusive).await {
            GuardVerdict::Allow => None,
            GuardVerdict::Deny(denial) => Some(self.deny(denial).await),
        }
    }

    async fn deny(&self, denial: Denial) -> DenialResponse {
        // Touch first: the client must see fresh metadata on its next
        // poll or it keeps showing the item as locally deleted.
        if matches!(denial.action, ProtectedAction::Delete | ProtectedAction::Move) {
            self.touch_node_and_parent(&denial.source).await;
        }

        if denial.action == ProtectedAction::Move
            && denial.cause == DenialCause::BasenameCollision
        {
            self.cleanup_stepping_stone(&denial.source).await;
        }

        self.notifier
            .notify_blocked(&denial.path, denial.action)
            .await;

        build_response(&denial)
    }

    async fn touch_node_and_parent(&self, node: &str) {
        if let Err(e) = self.tracker.touch(node).await {
            warn!(path = node, error = %e, "Failed to touch denied node");
        }
        if let Some(parent) = path::parent(node) {
            if let Err(e) = self.tracker.touch(&parent).await {
                warn!(path = %parent, error = %e, "Failed to touch parent of denied node");
            }
        }
    }

    /// Delete a freshly created empty folder whose only purpose was to
    /// be renamed onto a protected name (a known sync-client two-step
    /// workaround). Without this the blocked rename leaves debris.
    async fn cleanup_stepping_stone(&self, source: &str) {
        let candidate = match self.tree.is_empty_dir(source).await {
            Ok(true) => self.tree.created_recently(source).await,
            other => other,
        };
        match candidate {
            Ok(true) => {
                debug!(path = source, "Removing stepping-stone folder after blocked rename");
                if let Err(e) = self.tree.remove_dir(source).await {
                    warn!(path = source, error = %e, "Failed to remove stepping-stone folder");
                }
            }
            Ok(false) => {}
            Err(e) => warn!(path = source, error = %e, "Bypass cleanup check failed"),
        }
    }
}

fn build_response(denial: &Denial) -> DenialResponse {
    // PROPPATCH reports per-property failure, which clients expect as a
    // plain forbidden; everything else gets the locked status.
    let status = if denial.action == ProtectedAction::PropertyWrite {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::LOCKED
    };

    DenialResponse {
        status,
        headers: vec![
            (HEADER_PROTECTED, "true".to_string()),
            (HEADER_ACTION, denial.action.as_str().to_string()),
            (HEADER_REASON, denial.reason.clone()),
        ],
        body: error_body(denial),
    }
}

/// Structured DAV error body so clients surface the server-supplied
/// message instead of a generic fallback.
fn error_body(denial: &Denial) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<d:error xmlns:d=\"DAV:\" xmlns:pg=\"urn:pathguard\">\n",
            "  <pg:folder-protected>true</pg:folder-protected>\n",
            "  <pg:action>{action}</pg:action>\n",
            "  <pg:message>{message}</pg:message>\n",
            "</d:error>\n"
        ),
        action = denial.action.as_str(),
        message = xml_escape(&denial.reason),
    )
}

fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
