//! Update orchestration: notification in, validated record and freshness entry out.

mod memory;
mod model;

pub use memory::InMemoryStore;
pub use model::{
    DataUpdate, FreshnessRecord, FreshnessStatus, ProcessedUpdate, StoredRecord, UpdateStats,
    UpdateStatus, WebhookNotification,
};

use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use serde_json::Value;
use uuid::Uuid;

use crate::core::{
    EsgError, PayloadFetcher, RetryConfig, SourceTag, UpdateStore, ValidationResult,
};
use crate::validate::EsgValidator;

/// Drives one source update through fetch, normalization, validation and persistence.
///
/// The coordinator owns its collaborators and keeps no mutable state of its own; one instance
/// can process many notifications concurrently.
///
/// # Example
///
/// ```no_run
/// # use esg_ingest::{HttpFetcher, InMemoryStore, UpdateCoordinator, WebhookNotification};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = HttpFetcher::builder()
///     .with_default_endpoints()
///     .bearer_token("spreadsheet", "ya29.token")
///     .build()?;
/// let coordinator = UpdateCoordinator::builder(fetcher, InMemoryStore::new()).build();
///
/// let done = coordinator
///     .process(WebhookNotification::new("spreadsheet", "sheet.updated", "1AbC"))
///     .await?;
/// println!("score {}", done.assessment.validation.score);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UpdateCoordinator<F, S> {
    fetcher: F,
    store: S,
    validator: EsgValidator,
    retry: RetryConfig,
    fetch_timeout: Option<Duration>,
}

impl<F, S> UpdateCoordinator<F, S>
where
    F: PayloadFetcher,
    S: UpdateStore,
{
    /// Create a new builder.
    pub fn builder(fetcher: F, store: S) -> UpdateCoordinatorBuilder<F, S> {
        UpdateCoordinatorBuilder {
            fetcher,
            store,
            validator: EsgValidator::new(),
            retry: RetryConfig::default(),
            fetch_timeout: None,
        }
    }

    /// The persistence layer this coordinator writes to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Processes one change notification end to end.
    ///
    /// The update is logged as `Pending`, moved to `Processing`, and finally marked `Completed`
    /// or `Failed`. Validation problems in the payload do not fail the update; they are stored
    /// with the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be fetched (after retries) or the store rejects a
    /// write. The update is marked `Failed` with the error text first, when the store allows.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, notification), err, fields(source = %notification.source, event = %notification.event_type)))]
    pub async fn process(
        &self,
        notification: WebhookNotification,
    ) -> Result<ProcessedUpdate, EsgError> {
        let update = DataUpdate::pending(&notification);
        self.store.create_update(&update).await?;

        match self.run(&notification, update.id).await {
            Ok(done) => {
                self.store
                    .set_update_status(update.id, UpdateStatus::Completed, None)
                    .await?;
                #[cfg(feature = "tracing")]
                tracing::info!(update_id = %update.id, "update processed");
                Ok(done)
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(update_id = %update.id, error = %e, "update failed");
                // A failed status write is logged; the caller gets the original error.
                if let Err(_status_err) = self
                    .store
                    .set_update_status(update.id, UpdateStatus::Failed, Some(e.to_string()))
                    .await
                {
                    #[cfg(feature = "tracing")]
                    tracing::error!(update_id = %update.id, error = %_status_err, "could not mark update failed");
                }
                Err(e)
            }
        }
    }

    /// Processes several notifications concurrently, one result per notification in input order.
    pub async fn process_batch(
        &self,
        notifications: Vec<WebhookNotification>,
    ) -> Vec<Result<ProcessedUpdate, EsgError>> {
        join_all(notifications.into_iter().map(|n| self.process(n))).await
    }

    /// Per-source freshness, newest first.
    ///
    /// When nothing has been recorded yet, a `Pending` placeholder is stored and returned for
    /// each known source.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn freshness(&self) -> Result<Vec<FreshnessRecord>, EsgError> {
        let current = self.store.list_freshness().await?;
        if !current.is_empty() {
            return Ok(current);
        }

        let now = Utc::now();
        let defaults: Vec<FreshnessRecord> = SourceTag::KNOWN
            .into_iter()
            .map(|source| FreshnessRecord::placeholder(source, now))
            .collect();
        for record in &defaults {
            if let Err(_e) = self.store.upsert_freshness(record.clone()).await {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_e, source = %record.source, "could not seed freshness");
            }
        }
        Ok(defaults)
    }

    /// Counts over the update log.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn stats(&self) -> Result<UpdateStats, EsgError> {
        let updates = self.store.list_updates().await?;
        Ok(UpdateStats::tally(&updates))
    }

    async fn run(
        &self,
        notification: &WebhookNotification,
        update_id: Uuid,
    ) -> Result<ProcessedUpdate, EsgError> {
        self.store
            .set_update_status(update_id, UpdateStatus::Processing, None)
            .await?;

        let payload = self.fetch_with_retry(notification).await?;

        let assessment = self.validator.assess(&payload, &notification.source);
        log_validation(&notification.source, &assessment.validation);

        let now = Utc::now();
        self.store
            .put_record(StoredRecord {
                source: notification.source.clone(),
                event_type: notification.event_type.clone(),
                normalized: assessment.normalized.clone(),
                validation: assessment.validation.clone(),
                last_updated: now,
            })
            .await?;
        self.store
            .upsert_freshness(FreshnessRecord {
                source: notification.source.clone(),
                last_update: now,
                event_type: notification.event_type.clone(),
                status: FreshnessStatus::Current,
            })
            .await?;

        Ok(ProcessedUpdate {
            update_id,
            assessment,
        })
    }

    async fn fetch_with_retry(&self, notification: &WebhookNotification) -> Result<Value, EsgError> {
        let mut attempt: u32 = 0;
        loop {
            match self.fetch_once(notification).await {
                Ok(payload) => return Ok(payload),
                Err(e)
                    if self.retry.enabled
                        && attempt < self.retry.max_retries
                        && e.is_retryable(&self.retry) =>
                {
                    let delay = self.retry.backoff.delay(attempt);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, ?delay, error = %e, "retrying fetch");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, notification: &WebhookNotification) -> Result<Value, EsgError> {
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetcher.fetch(notification))
                .await
                .map_err(|_| EsgError::Timeout(limit))?,
            None => self.fetcher.fetch(notification).await,
        }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_validation(source: &SourceTag, result: &ValidationResult) {
    #[cfg(feature = "tracing")]
    {
        tracing::info!(
            %source,
            is_valid = result.is_valid,
            score = result.score,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "ESG validation"
        );
        let critical: Vec<&str> = result
            .errors_with(crate::core::Severity::Critical)
            .map(|e| e.field.as_str())
            .collect();
        if !critical.is_empty() {
            tracing::error!(%source, fields = ?critical, "critical ESG validation errors");
        }
    }
}

/* ----------------------- Builder ----------------------- */

pub struct UpdateCoordinatorBuilder<F, S> {
    fetcher: F,
    store: S,
    validator: EsgValidator,
    retry: RetryConfig,
    fetch_timeout: Option<Duration>,
}

impl<F, S> UpdateCoordinatorBuilder<F, S>
where
    F: PayloadFetcher,
    S: UpdateStore,
{
    /// Overrides the retry policy around fetches. Default: [`RetryConfig::default`].
    #[must_use]
    pub fn retry_policy(mut self, cfg: RetryConfig) -> Self {
        self.retry = cfg;
        self
    }

    /// Bounds each fetch attempt. Default: none.
    #[must_use]
    pub fn fetch_timeout(mut self, dur: Duration) -> Self {
        self.fetch_timeout = Some(dur);
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: EsgValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn build(self) -> UpdateCoordinator<F, S> {
        UpdateCoordinator {
            fetcher: self.fetcher,
            store: self.store,
            validator: self.validator,
            retry: self.retry,
            fetch_timeout: self.fetch_timeout,
        }
    }
}
