//! Capability probe over storage wrapper chains.

use pathguard_core::traits::storage::StorageBackend;

/// Walk a wrapper chain looking for a group-mount capability.
///
/// Wrapper chains are built by independent layers, so their depth is
/// unknown here; the walk is bounded by `max_depth` to stay safe against
/// a self-referential chain.
pub fn find_group_mount_id(backend: &dyn StorageBackend, max_depth: usize) -> Option<i64> {
    let mut current = backend;
    for _ in 0..=max_depth {
        if let Some(id) = current.group_mount_id() {
            return Some(id);
        }
        match current.wrapped() {
            Some(inner) => current = inner,
            None => return None,
        }
    }
    None
}
