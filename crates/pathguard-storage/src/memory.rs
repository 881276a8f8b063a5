//! In-memory storage backend.
//!
//! A concurrent map of canonical paths. Backs tests and single-node
//! demos; delete, rename, and copy operate on whole subtrees the way a
//! real filesystem backend would.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use pathguard_core::error::AppError;
use pathguard_core::result::AppResult;
use pathguard_core::traits::storage::StorageBackend;
use pathguard_core::types::permissions::Permissions;
use pathguard_engine::path;

#[derive(Debug, Clone, Copy)]
struct Node {
    is_dir: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    nodes: DashMap<String, Node>,
    group_id: Option<i64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that reports itself as the group mount with `id`.
    pub fn group_mount(id: i64) -> Self {
        Self {
            nodes: DashMap::new(),
            group_id: Some(id),
        }
    }

    /// Create a file entry (directories come from `mkdir`).
    pub fn touch_file(&self, raw: &str) {
        self.nodes
            .insert(path::normalize(raw), Node { is_dir: false });
    }

    fn subtree_keys(&self, canonical: &str) -> Vec<String> {
        let prefix = format!("{canonical}/");
        self.nodes
            .iter()
            .filter(|e| e.key() == canonical || e.key().starts_with(&prefix))
            .map(|e| e.key().clone())
            .collect()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn exists(&self, raw: &str) -> AppResult<bool> {
        let canonical = path::normalize(raw);
        Ok(canonical == "/" || self.nodes.contains_key(&canonical))
    }

    async fn is_dir(&self, raw: &str) -> AppResult<bool> {
        let canonical = path::normalize(raw);
        if canonical == "/" {
            return Ok(true);
        }
        Ok(self
            .nodes
            .get(&canonical)
            .map(|n| n.is_dir)
            .unwrap_or(false))
    }

    async fn mkdir(&self, raw: &str) -> AppResult<()> {
        let canonical = path::normalize(raw);
        if self.nodes.contains_key(&canonical) {
            return Err(AppError::storage(format!(
                "Path already exists: {canonical}"
            )));
        }
        self.nodes.insert(canonical, Node { is_dir: true });
        Ok(())
    }

    async fn delete(&self, raw: &str) -> AppResult<()> {
        let canonical = path::normalize(raw);
        let keys = self.subtree_keys(&canonical);
        if keys.is_empty() {
            return Err(AppError::not_found(format!("No such path: {canonical}")));
        }
        for key in keys {
            self.nodes.remove(&key);
        }
        Ok(())
    }

    async fn rename(&self, source: &str, target: &str) -> AppResult<()> {
        let src = path::normalize(source);
        let dst = path::normalize(target);
        let keys = self.subtree_keys(&src);
        if keys.is_empty() {
            return Err(AppError::not_found(format!("No such path: {src}")));
        }
        for key in keys {
            if let Some((_, node)) = self.nodes.remove(&key) {
                let moved = format!("{dst}{}", &key[src.len()..]);
                self.nodes.insert(moved, node);
            }
        }
        Ok(())
    }

    async fn copy(&self, source: &str, target: &str) -> AppResult<()> {
        let src = path::normalize(source);
        let dst = path::normalize(target);
        let keys = self.subtree_keys(&src);
        if keys.is_empty() {
            return Err(AppError::not_found(format!("No such path: {src}")));
        }
        for key in keys {
            if let Some(node) = self.nodes.get(&key).map(|n| *n) {
                let copied = format!("{dst}{}", &key[src.len()..]);
                self.nodes.insert(copied, node);
            }
        }
        Ok(())
    }

    async fn copy_from(
        &self,
        source: Arc<dyn StorageBackend>,
        source_path: &str,
        target_path: &str,
    ) -> AppResult<()> {
        if !source.exists(source_path).await? {
            return Err(AppError::not_found(format!("No such path: {source_path}")));
        }
        let is_dir = source.is_dir(source_path).await?;
        self.nodes
            .insert(path::normalize(target_path), Node { is_dir });
        Ok(())
    }

    async fn move_from(
        &self,
        source: Arc<dyn StorageBackend>,
        source_path: &str,
        target_path: &str,
    ) -> AppResult<()> {
        self.copy_from(source.clone(), source_path, target_path)
            .await?;
        source.delete(source_path).await
    }

    async fn is_deletable(&self, raw: &str) -> AppResult<bool> {
        self.exists(raw).await
    }

    async fn is_updatable(&self, raw: &str) -> AppResult<bool> {
        self.exists(raw).await
    }

    async fn permissions(&self, raw: &str) -> AppResult<Permissions> {
        if self.exists(raw).await? {
            Ok(Permissions::ALL)
        } else {
            Ok(Permissions::NONE)
        }
    }

    fn group_mount_id(&self) -> Option<i64> {
        self.group_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mkdir_exists_delete() {
        let storage = MemoryStorage::new();
        storage.mkdir("/a").await.unwrap();
        storage.mkdir("/a/b").await.unwrap();

        assert!(storage.exists("/a/b").await.unwrap());
        assert!(storage.is_dir("/a").await.unwrap());

        storage.delete("/a").await.unwrap();
        assert!(!storage.exists("/a").await.unwrap());
        assert!(!storage.exists("/a/b").await.unwrap());
    }

    #[tokio::test]
    async fn test_rename_moves_subtree() {
        let storage = MemoryStorage::new();
        storage.mkdir("/a").await.unwrap();
        storage.touch_file("/a/file.txt");

        storage.rename("/a", "/b").await.unwrap();
        assert!(!storage.exists("/a").await.unwrap());
        assert!(storage.exists("/b/file.txt").await.unwrap());
        assert!(!storage.is_dir("/b/file.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_copy_keeps_source() {
        let storage = MemoryStorage::new();
        storage.mkdir("/a").await.unwrap();
        storage.copy("/a", "/b").await.unwrap();
        assert!(storage.exists("/a").await.unwrap());
        assert!(storage.exists("/b").await.unwrap());
    }
}
