use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::{Assessment, SourceTag, UnifiedEsgRecord, ValidationResult};

/// A notice from a source that one of its resources changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookNotification {
    pub source: SourceTag,
    /// Free-form event name such as `invoice.created`. Carried through to storage untouched.
    pub event_type: String,
    /// Source-specific id of the changed resource (invoice id, spreadsheet id, drive item id).
    pub resource_id: String,
    pub timestamp: DateTime<Utc>,
    /// Whatever the notification itself carried; kept on the update log only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl WebhookNotification {
    /// A notification stamped with the current time.
    pub fn new(
        source: impl Into<SourceTag>,
        event_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            event_type: event_type.into(),
            resource_id: resource_id.into(),
            timestamp: Utc::now(),
            data: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Where an update is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// One entry of the update log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUpdate {
    pub id: Uuid,
    pub source: SourceTag,
    pub resource_id: String,
    pub event_type: String,
    /// When the source reported the change.
    pub timestamp: DateTime<Utc>,
    pub status: UpdateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure text for `Failed` updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DataUpdate {
    /// A fresh `Pending` log entry for `notification`.
    #[must_use]
    pub fn pending(notification: &WebhookNotification) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: notification.source.clone(),
            resource_id: notification.resource_id.clone(),
            event_type: notification.event_type.clone(),
            timestamp: notification.timestamp,
            status: UpdateStatus::Pending,
            data: notification.data.clone(),
            error: None,
            updated_at: None,
        }
    }
}

/// A validated record as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub source: SourceTag,
    pub event_type: String,
    pub normalized: UnifiedEsgRecord,
    pub validation: ValidationResult,
    pub last_updated: DateTime<Utc>,
}

/// Whether a source's stored data reflects its latest change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessStatus {
    Current,
    Pending,
}

/// Last-update bookkeeping for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessRecord {
    pub source: SourceTag,
    pub last_update: DateTime<Utc>,
    pub event_type: String,
    pub status: FreshnessStatus,
}

impl FreshnessRecord {
    /// The placeholder shown for a source that has never delivered an update.
    #[must_use]
    pub fn placeholder(source: SourceTag, now: DateTime<Utc>) -> Self {
        Self {
            source,
            last_update: now,
            event_type: "none".to_string(),
            status: FreshnessStatus::Pending,
        }
    }
}

/// Counts over the update log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Updates still `Pending` or `Processing`.
    pub pending: usize,
    /// Updates per source label.
    pub by_source: BTreeMap<String, usize>,
}

impl UpdateStats {
    /// Tallies a list of update log entries.
    #[must_use]
    pub fn tally(updates: &[DataUpdate]) -> Self {
        let mut stats = Self {
            total: updates.len(),
            ..Self::default()
        };
        for known in SourceTag::KNOWN {
            stats.by_source.insert(known.to_string(), 0);
        }
        for u in updates {
            match u.status {
                UpdateStatus::Completed => stats.successful += 1,
                UpdateStatus::Failed => stats.failed += 1,
                UpdateStatus::Pending | UpdateStatus::Processing => stats.pending += 1,
            }
            *stats.by_source.entry(u.source.to_string()).or_insert(0) += 1;
        }
        stats
    }
}

/// What [`UpdateCoordinator::process`](super::UpdateCoordinator::process) returns on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedUpdate {
    pub update_id: Uuid,
    pub assessment: Assessment,
}
