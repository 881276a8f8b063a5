//! Storage backend trait wrapped by the protection interception layer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::permissions::Permissions;

/// Trait for the primitive filesystem operations of a mounted storage.
///
/// The protection layer decorates implementations of this trait: it
/// intercepts exactly the operations listed here and forwards everything
/// else untouched. The trait surface is explicit; there is no dynamic
/// catch-all dispatch.
#[async_trait]
pub trait StorageBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local", "memory", "protected").
    fn backend_type(&self) -> &str;

    /// Check whether a file or directory exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Check whether the given path is a directory.
    async fn is_dir(&self, path: &str) -> AppResult<bool>;

    /// Create a directory.
    async fn mkdir(&self, path: &str) -> AppResult<()>;

    /// Delete a file or directory.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Rename (move) within this backend.
    async fn rename(&self, source: &str, target: &str) -> AppResult<()>;

    /// Copy within this backend.
    async fn copy(&self, source: &str, target: &str) -> AppResult<()>;

    /// Copy a subtree in from another backend.
    async fn copy_from(
        &self,
        source: Arc<dyn StorageBackend>,
        source_path: &str,
        target_path: &str,
    ) -> AppResult<()>;

    /// Move a subtree in from another backend.
    async fn move_from(
        &self,
        source: Arc<dyn StorageBackend>,
        source_path: &str,
        target_path: &str,
    ) -> AppResult<()>;

    /// Advisory capability query: may the path be deleted?
    ///
    /// Advisory queries answer `false` rather than erroring; they are
    /// consumed by UI layers to grey out actions.
    async fn is_deletable(&self, path: &str) -> AppResult<bool>;

    /// Advisory capability query: may the path be written to?
    async fn is_updatable(&self, path: &str) -> AppResult<bool>;

    /// Effective permission bitmask for the path.
    async fn permissions(&self, path: &str) -> AppResult<Permissions>;

    /// The backend this one wraps, if it is a decorator.
    ///
    /// Used by the capability probe to walk wrapper chains of unknown depth.
    fn wrapped(&self) -> Option<&dyn StorageBackend> {
        None
    }

    /// Group-mount identifier, if this backend is a group mount.
    ///
    /// Group mounts track protection under an internal identifier path
    /// rather than their externally visible name.
    fn group_mount_id(&self) -> Option<i64> {
        None
    }
}
