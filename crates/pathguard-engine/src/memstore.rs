//! In-memory protection store.
//!
//! Backs single-node deployments without Postgres and every unit and
//! integration test in the workspace. Semantics match the SQL store,
//! including path uniqueness and newest-first listing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use pathguard_core::error::AppError;
use pathguard_core::result::AppResult;
use pathguard_database::ProtectionStore;
use pathguard_entity::protection::{CreateProtection, ProtectionRecord};

#[derive(Debug, Default)]
pub struct MemoryProtectionStore {
    records: Mutex<Vec<ProtectionRecord>>,
    next_id: AtomicI64,
}

impl MemoryProtectionStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Vec<ProtectionRecord>>> {
        self.records
            .lock()
            .map_err(|_| AppError::internal("Protection store lock poisoned"))
    }
}

#[async_trait]
impl ProtectionStore for MemoryProtectionStore {
    async fn insert(&self, data: &CreateProtection) -> AppResult<ProtectionRecord> {
        let mut records = self.lock()?;
        if records.iter().any(|r| r.path == data.path) {
            return Err(AppError::duplicate_path(format!(
                "Path is already protected: {}",
                data.path
            )));
        }
        let record = ProtectionRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            path: data.path.clone(),
            file_id: data.file_id,
            user_id: data.user_id.clone(),
            created_by: data.created_by.clone(),
            created_at: chrono::Utc::now().timestamp(),
            reason: data.reason.clone(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<u64> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok((before - records.len()) as u64)
    }

    async fn delete_by_path(&self, path: &str) -> AppResult<u64> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|r| r.path != path);
        Ok((before - records.len()) as u64)
    }

    async fn find_exact(&self, path: &str) -> AppResult<Option<ProtectionRecord>> {
        let records = self.lock()?;
        Ok(records.iter().find(|r| r.path == path).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<ProtectionRecord>> {
        let records = self.lock()?;
        let mut out: Vec<ProtectionRecord> = records.clone();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn find_path_by_id(&self, id: i64) -> AppResult<Option<String>> {
        let records = self.lock()?;
        Ok(records.iter().find(|r| r.id == id).map(|r| r.path.clone()))
    }
}
