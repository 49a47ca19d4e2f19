use futures::future::BoxFuture;
use serde_json::Value;
use uuid::Uuid;

use crate::coordinator::{DataUpdate, FreshnessRecord, StoredRecord, UpdateStatus, WebhookNotification};
use crate::core::EsgError;

/// A trait for services that turn a change notification into the raw payload it refers to.
///
/// This decouples the [`UpdateCoordinator`](crate::coordinator::UpdateCoordinator) from how each
/// source is reached. It is implemented by [`HttpFetcher`](crate::fetch::HttpFetcher); tests plug
/// in canned payloads.
pub trait PayloadFetcher: Send + Sync {
    /// Asynchronously fetches the current payload for the resource named in `notification`.
    ///
    /// # Errors
    ///
    /// Returns an [`EsgError`] if the source cannot be reached, answers with an error status, or
    /// returns a body that is not JSON.
    fn fetch<'a>(
        &'a self,
        notification: &'a WebhookNotification,
    ) -> BoxFuture<'a, Result<Value, EsgError>>;
}

/// A trait for the persistence layer behind the coordinator.
///
/// From the coordinator's point of view these are opaque row stores: an update log, a table of
/// validated records and a per-source freshness table.
pub trait UpdateStore: Send + Sync {
    /// Inserts a new update log entry.
    fn create_update<'a>(&'a self, update: &'a DataUpdate) -> BoxFuture<'a, Result<(), EsgError>>;

    /// Moves an update log entry to a new status, optionally recording the failure text.
    fn set_update_status<'a>(
        &'a self,
        id: Uuid,
        status: UpdateStatus,
        error: Option<String>,
    ) -> BoxFuture<'a, Result<(), EsgError>>;

    /// Stores a validated record.
    fn put_record<'a>(&'a self, record: StoredRecord) -> BoxFuture<'a, Result<(), EsgError>>;

    /// Inserts or replaces the freshness entry for `record.source`.
    fn upsert_freshness<'a>(&'a self, record: FreshnessRecord)
    -> BoxFuture<'a, Result<(), EsgError>>;

    /// All freshness entries, most recently updated first.
    fn list_freshness(&self) -> BoxFuture<'_, Result<Vec<FreshnessRecord>, EsgError>>;

    /// All update log entries, in insertion order.
    fn list_updates(&self) -> BoxFuture<'_, Result<Vec<DataUpdate>, EsgError>>;
}
