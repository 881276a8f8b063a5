//! End-to-end protection scenarios across the engine and the storage
//! wrapper.

use std::sync::Arc;

use pathguard_core::error::ErrorKind;
use pathguard_core::traits::storage::StorageBackend;
use pathguard_core::types::permissions::Permissions;
use pathguard_storage::MemoryStorage;

use crate::helpers::TestEnv;

#[tokio::test]
async fn test_delete_protected_folder_is_denied_sibling_is_not() {
    let env = TestEnv::new();
    let backend = Arc::new(MemoryStorage::new());
    backend.mkdir("/Projects").await.unwrap();
    backend.mkdir("/Projects/Alpha").await.unwrap();
    backend.mkdir("/Projects/Beta").await.unwrap();
    let storage = env.protected_storage(backend.clone());

    env.protect("/Projects/Alpha", Some("Quarterly audit")).await;

    let err = storage.delete("/Projects/Alpha").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ProtectionDenied);
    assert!(err.message.contains("Quarterly audit"));
    assert!(backend.exists("/Projects/Alpha").await.unwrap());

    storage.delete("/Projects/Beta").await.unwrap();
    assert!(!backend.exists("/Projects/Beta").await.unwrap());
}

#[tokio::test]
async fn test_create_with_protected_basename_is_denied() {
    let env = TestEnv::new();
    let backend = Arc::new(MemoryStorage::new());
    backend.mkdir("/Other").await.unwrap();
    let storage = env.protected_storage(backend);

    env.protect("/Projects/Alpha", None).await;

    let err = storage.mkdir("/Other/Alpha").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ProtectionDenied);

    storage.mkdir("/Other/Gamma").await.unwrap();
}

#[tokio::test]
async fn test_create_inside_protected_hierarchy_is_denied() {
    let env = TestEnv::new();
    let backend = Arc::new(MemoryStorage::new());
    backend.mkdir("/Shared").await.unwrap();
    backend.mkdir("/Shared/sub").await.unwrap();
    let storage = env.protected_storage(backend);

    env.protect("/Shared", None).await;

    let err = storage.mkdir("/Shared/sub/new").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ProtectionDenied);
}

#[tokio::test]
async fn test_delete_inside_protected_folder_is_allowed() {
    // Protection pins the folder itself; content churn inside it stays
    // possible.
    let env = TestEnv::new();
    let backend = Arc::new(MemoryStorage::new());
    backend.mkdir("/Shared").await.unwrap();
    backend.touch_file("/Shared/notes.txt");
    let storage = env.protected_storage(backend.clone());

    env.protect("/Shared", None).await;

    storage.delete("/Shared/notes.txt").await.unwrap();
    assert!(!backend.exists("/Shared/notes.txt").await.unwrap());
}

#[tokio::test]
async fn test_unprotect_takes_effect_immediately() {
    let env = TestEnv::new();
    let backend = Arc::new(MemoryStorage::new());
    backend.mkdir("/Temp").await.unwrap();
    let storage = env.protected_storage(backend);

    env.protect("/Temp", None).await;
    assert!(env.checker.is_protected("/Temp").await.unwrap());
    assert!(storage.delete("/Temp").await.is_err());

    env.checker.unprotect_by_path("/Temp").await.unwrap();

    // The mutation flushed the cache, so the stale positive is gone.
    assert!(!env.checker.is_protected("/Temp").await.unwrap());
    storage.delete("/Temp").await.unwrap();
}

#[tokio::test]
async fn test_protected_folder_reports_read_only_capabilities() {
    let env = TestEnv::new();
    let backend = Arc::new(MemoryStorage::new());
    backend.mkdir("/Frozen").await.unwrap();
    let storage = env.protected_storage(backend);

    env.protect("/Frozen", None).await;

    assert!(!storage.is_deletable("/Frozen").await.unwrap());
    assert!(!storage.is_updatable("/Frozen").await.unwrap());
    let perms = storage.permissions("/Frozen").await.unwrap();
    assert!(perms.contains(Permissions::READ));
    assert!(!perms.contains(Permissions::DELETE));
}

#[tokio::test]
async fn test_cache_consistency_across_repeated_checks() {
    let env = TestEnv::new();
    env.protect("/X", None).await;
    env.checker.clear_cache().await;

    // First call misses the cache, second hits it; answers agree.
    assert!(env.checker.is_protected("/X").await.unwrap());
    assert!(env.checker.is_protected("/X").await.unwrap());
}
