//! Per-method protection guard for DAV requests.

use std::sync::Arc;

use http::Method;
use tracing::{error, warn};

use pathguard_core::result::AppResult;
use pathguard_core::types::action::ProtectedAction;
use pathguard_engine::checker::ProtectionChecker;
use pathguard_engine::path;

use crate::resolve::{self, MountResolver};

/// What triggered a denial. Drives response shaping and bypass cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialCause {
    /// The path itself is protected.
    Exact,
    /// The path or an ancestor is protected.
    ParentProtected,
    /// The destination basename collides with a protected folder's name.
    BasenameCollision,
    /// The protection check errored; destructive operations fail closed.
    CheckFailed,
}

/// A concrete denial with everything the response needs.
#[derive(Debug, Clone)]
pub struct Denial {
    /// Canonical path the denial applies to.
    pub path: String,
    /// Source path of the request (differs from `path` for MOVE/COPY
    /// denials caused by the destination).
    pub source: String,
    pub action: ProtectedAction,
    pub reason: String,
    pub cause: DenialCause,
}

#[derive(Debug, Clone)]
pub enum GuardVerdict {
    Allow,
    Deny(Denial),
}

impl GuardVerdict {
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }
}

/// Evaluates DAV methods against the protection checker.
///
/// Every resolved path is checked under all its forms: the path itself,
/// its `/files` variant, and its group-mount alias when one applies.
#[derive(Debug, Clone)]
pub struct DavGuard {
    checker: ProtectionChecker,
    mounts: Arc<MountResolver>,
}

impl DavGuard {
    pub fn new(checker: ProtectionChecker, mounts: Arc<MountResolver>) -> Self {
        Self { checker, mounts }
    }

    pub fn mounts(&self) -> &MountResolver {
        &self.mounts
    }

    /// Evaluate one request. `uri` is the raw request URI; `destination`
    /// is the raw `Destination` header when present.
    ///
    /// LOCK requests are treated as exclusive here; callers that parse
    /// the lock scope from the body should use [`Self::evaluate_lock`].
    pub async fn evaluate(
        &self,
        method: &Method,
        uri: &str,
        destination: Option<&str>,
    ) -> GuardVerdict {
        let target = resolve::resolve_uri(uri);
        let action = action_for_method(method);

        let result = match method.as_str() {
            "GET" | "HEAD" | "PROPFIND" | "REPORT" => self.check_read(&target).await,
            "DELETE" => self.check_delete(&target).await,
            "MOVE" => self.check_move(&target, destination).await,
            "COPY" => self.check_copy(&target, destination).await,
            "MKCOL" => self.check_create(&target, ProtectedAction::Create).await,
            "PUT" => self.check_create(&target, ProtectedAction::Write).await,
            "LOCK" => return self.evaluate_lock(uri, true).await,
            "UNLOCK" => self.check_exact(&target, ProtectedAction::Lock).await,
            "PROPPATCH" => self.check_exact(&target, ProtectedAction::PropertyWrite).await,
            _ => Ok(None),
        };

        self.conclude(result, &target, action)
    }

    /// Evaluate a LOCK request whose scope is already known. Shared
    /// locks pass; only exclusive locks are guarded.
    pub async fn evaluate_lock(&self, uri: &str, exclusive: bool) -> GuardVerdict {
        if !exclusive {
            return GuardVerdict::Allow;
        }
        let target = resolve::resolve_uri(uri);
        let result = self.check_exact(&target, ProtectedAction::Lock).await;
        self.conclude(result, &target, ProtectedAction::Lock)
    }

    fn conclude(
        &self,
        result: AppResult<Option<Denial>>,
        target: &str,
        action: ProtectedAction,
    ) -> GuardVerdict {
        match result {
            Ok(Some(denial)) => GuardVerdict::Deny(denial),
            Ok(None) => GuardVerdict::Allow,
            Err(e) if action.is_destructive() => {
                // A failed check must never let a destructive operation
                // through.
                error!(path = target, action = action.as_str(), error = %e,
                    "Protection check failed, denying destructive operation");
                GuardVerdict::Deny(Denial {
                    path: target.to_string(),
                    source: target.to_string(),
                    action,
                    reason: self.checker.config().default_reason.clone(),
                    cause: DenialCause::CheckFailed,
                })
            }
            Err(e) => {
                warn!(path = target, action = action.as_str(), error = %e,
                    "Protection check failed, allowing read");
                GuardVerdict::Allow
            }
        }
    }

    /// All forms a path may be recorded under.
    fn candidates(&self, canonical: &str) -> Vec<String> {
        let mut out = Vec::new();
        for alias in self.mounts.aliases(canonical) {
            for variant in resolve::path_variants(&alias) {
                if !out.contains(&variant) {
                    out.push(variant);
                }
            }
        }
        out
    }

    async fn any_exact(&self, canonical: &str) -> AppResult<Option<String>> {
        for candidate in self.candidates(canonical) {
            if self.checker.is_protected(&candidate).await? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    async fn any_hierarchy(&self, canonical: &str) -> AppResult<Option<String>> {
        for candidate in self.candidates(canonical) {
            if self
                .checker
                .is_protected_or_parent_protected(&candidate)
                .await?
            {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    async fn denial(
        &self,
        matched: &str,
        source: &str,
        action: ProtectedAction,
        cause: DenialCause,
    ) -> Denial {
        Denial {
            path: matched.to_string(),
            source: source.to_string(),
            action,
            reason: self.checker.denial_reason(matched).await,
            cause,
        }
    }

    async fn check_read(&self, target: &str) -> AppResult<Option<Denial>> {
        if let Some(matched) = self.any_hierarchy(target).await? {
            return Ok(Some(
                self.denial(&matched, target, ProtectedAction::Read, DenialCause::ParentProtected)
                    .await,
            ));
        }
        Ok(None)
    }

    async fn check_delete(&self, target: &str) -> AppResult<Option<Denial>> {
        if let Some(matched) = self.any_exact(target).await? {
            return Ok(Some(
                self.denial(&matched, target, ProtectedAction::Delete, DenialCause::Exact)
                    .await,
            ));
        }
        Ok(None)
    }

    async fn check_move(
        &self,
        source: &str,
        destination: Option<&str>,
    ) -> AppResult<Option<Denial>> {
        if let Some(matched) = self.any_exact(source).await? {
            return Ok(Some(
                self.denial(&matched, source, ProtectedAction::Move, DenialCause::Exact)
                    .await,
            ));
        }
        let Some(dest) = destination.and_then(resolve::parse_destination) else {
            return Ok(None);
        };
        if let Some(matched) = self.any_hierarchy(&dest).await? {
            return Ok(Some(
                self.denial(&matched, source, ProtectedAction::Move, DenialCause::ParentProtected)
                    .await,
            ));
        }
        let name = path::basename(&dest).to_string();
        if self.checker.is_any_protected_with_basename(&name).await? {
            return Ok(Some(
                self.denial(&dest, source, ProtectedAction::Move, DenialCause::BasenameCollision)
                    .await,
            ));
        }
        Ok(None)
    }

    async fn check_copy(
        &self,
        source: &str,
        destination: Option<&str>,
    ) -> AppResult<Option<Denial>> {
        // Copying a protected subtree out is reading it.
        if let Some(matched) = self.any_hierarchy(source).await? {
            return Ok(Some(
                self.denial(&matched, source, ProtectedAction::Copy, DenialCause::ParentProtected)
                    .await,
            ));
        }
        let Some(dest) = destination.and_then(resolve::parse_destination) else {
            return Ok(None);
        };
        if let Some(matched) = self.any_hierarchy(&dest).await? {
            return Ok(Some(
                self.denial(&matched, source, ProtectedAction::Copy, DenialCause::ParentProtected)
                    .await,
            ));
        }
        let name = path::basename(&dest).to_string();
        if self.checker.is_any_protected_with_basename(&name).await? {
            return Ok(Some(
                self.denial(&dest, source, ProtectedAction::Copy, DenialCause::BasenameCollision)
                    .await,
            ));
        }
        Ok(None)
    }

    async fn check_create(
        &self,
        target: &str,
        action: ProtectedAction,
    ) -> AppResult<Option<Denial>> {
        if let Some(matched) = self.any_hierarchy(target).await? {
            return Ok(Some(
                self.denial(&matched, target, action, DenialCause::ParentProtected)
                    .await,
            ));
        }
        let name = path::basename(target).to_string();
        if self.checker.is_any_protected_with_basename(&name).await? {
            return Ok(Some(
                self.denial(target, target, action, DenialCause::BasenameCollision)
                    .await,
            ));
        }
        Ok(None)
    }

    async fn check_exact(
        &self,
        target: &str,
        action: ProtectedAction,
    ) -> AppResult<Option<Denial>> {
        if let Some(matched) = self.any_exact(target).await? {
            return Ok(Some(
                self.denial(&matched, target, action, DenialCause::Exact).await,
            ));
        }
        Ok(None)
    }
}

fn action_for_method(method: &Method) -> ProtectedAction {
    match method.as_str() {
        "DELETE" => ProtectedAction::Delete,
        "MOVE" => ProtectedAction::Move,
        "COPY" => ProtectedAction::Copy,
        "MKCOL" => ProtectedAction::Create,
        "PUT" => ProtectedAction::Write,
        "LOCK" | "UNLOCK" => ProtectedAction::Lock,
        "PROPPATCH" => ProtectedAction::PropertyWrite,
        _ => ProtectedAction::Read,
    }
}
