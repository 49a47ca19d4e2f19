use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{DataUpdate, FreshnessRecord, StoredRecord, UpdateStatus};
use crate::core::{EsgError, SourceTag, UpdateStore};

#[derive(Debug, Default)]
struct Tables {
    updates: Vec<DataUpdate>,
    records: Vec<StoredRecord>,
    freshness: HashMap<SourceTag, FreshnessRecord>,
}

/// An [`UpdateStore`] that keeps everything in process memory.
///
/// Clones share the same tables, so a clone handed to the coordinator can be inspected from the
/// outside.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored validated records, oldest first.
    pub async fn records(&self) -> Vec<StoredRecord> {
        self.tables.read().await.records.clone()
    }

    /// Looks up one update log entry.
    pub async fn update(&self, id: Uuid) -> Option<DataUpdate> {
        let guard = self.tables.read().await;
        guard.updates.iter().find(|u| u.id == id).cloned()
    }
}

impl UpdateStore for InMemoryStore {
    fn create_update<'a>(&'a self, update: &'a DataUpdate) -> BoxFuture<'a, Result<(), EsgError>> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            if guard.updates.iter().any(|u| u.id == update.id) {
                return Err(EsgError::Store(format!("duplicate update id {}", update.id)));
            }
            guard.updates.push(update.clone());
            Ok(())
        })
    }

    fn set_update_status<'a>(
        &'a self,
        id: Uuid,
        status: UpdateStatus,
        error: Option<String>,
    ) -> BoxFuture<'a, Result<(), EsgError>> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            let entry = guard
                .updates
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| EsgError::Store(format!("no update with id {id}")))?;
            entry.status = status;
            entry.error = error;
            entry.updated_at = Some(Utc::now());
            Ok::<_, EsgError>(())
        })
    }

    fn put_record<'a>(&'a self, record: StoredRecord) -> BoxFuture<'a, Result<(), EsgError>> {
        Box::pin(async move {
            self.tables.write().await.records.push(record);
            Ok(())
        })
    }

    fn upsert_freshness<'a>(
        &'a self,
        record: FreshnessRecord,
    ) -> BoxFuture<'a, Result<(), EsgError>> {
        Box::pin(async move {
            self.tables
                .write()
                .await
                .freshness
                .insert(record.source.clone(), record);
            Ok(())
        })
    }

    fn list_freshness(&self) -> BoxFuture<'_, Result<Vec<FreshnessRecord>, EsgError>> {
        Box::pin(async move {
            let guard = self.tables.read().await;
            let mut out: Vec<FreshnessRecord> = guard.freshness.values().cloned().collect();
            out.sort_by(|a, b| b.last_update.cmp(&a.last_update));
            Ok(out)
        })
    }

    fn list_updates(&self) -> BoxFuture<'_, Result<Vec<DataUpdate>, EsgError>> {
        Box::pin(async move { Ok(self.tables.read().await.updates.clone()) })
    }
}
