//! The protection store trait, ground truth for protection decisions.

use async_trait::async_trait;

use pathguard_core::result::AppResult;
use pathguard_entity::protection::{CreateProtection, ProtectionRecord};

/// Durable store of protection records.
///
/// The store is the authority; the cache in front of it is never. There is
/// no update operation; records are immutable after insert.
#[async_trait]
pub trait ProtectionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new record. Fails with `DuplicatePath` when a record with
    /// the same canonical path already exists. Uniqueness is enforced by
    /// the store itself, not a prior read, so two concurrent inserts race
    /// safely: exactly one wins.
    async fn insert(&self, data: &CreateProtection) -> AppResult<ProtectionRecord>;

    /// Delete by surrogate key. Returns the number of rows removed.
    async fn delete_by_id(&self, id: i64) -> AppResult<u64>;

    /// Delete by canonical path. Returns the number of rows removed.
    async fn delete_by_path(&self, path: &str) -> AppResult<u64>;

    /// Exact-match lookup.
    async fn find_exact(&self, path: &str) -> AppResult<Option<ProtectionRecord>>;

    /// All records, newest first.
    async fn list_all(&self) -> AppResult<Vec<ProtectionRecord>>;

    /// Resolve a record id to its path (delete-by-id confirmation flows).
    async fn find_path_by_id(&self, id: i64) -> AppResult<Option<String>>;
}
