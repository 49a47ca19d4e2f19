//! esg-ingest: normalization, validation and compliance scoring for ESG data.
//!
//! Payloads fetched from accounting platforms, spreadsheet services, office document graphs or
//! arbitrary uploads are mapped onto one [`UnifiedEsgRecord`], checked against domain rules and
//! scored 0-100. The [`UpdateCoordinator`] wires this into a fetch-validate-persist pipeline.
//!
//! ```
//! use esg_ingest::{EsgValidator, SourceTag};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "sheets": [{
//!         "properties": { "title": "Environmental Data" },
//!         "data": [{ "rowData": [{ "values": [
//!             { "formattedValue": "Carbon" },
//!             { "formattedValue": "-50" }
//!         ]}]}]
//!     }]
//! });
//!
//! let result = EsgValidator::new().validate(&payload, &SourceTag::Spreadsheet);
//! assert!(!result.is_valid);
//! assert_eq!(result.score, 81);
//! ```

pub mod activity;
pub mod coordinator;
pub mod core;
pub mod fetch;
pub mod normalize;
pub mod validate;

pub use coordinator::{
    DataUpdate, FreshnessRecord, FreshnessStatus, InMemoryStore, ProcessedUpdate, StoredRecord,
    UpdateCoordinator, UpdateCoordinatorBuilder, UpdateStats, UpdateStatus, WebhookNotification,
};
pub use crate::core::{
    Assessment, Backoff, EsgError, Metric, PayloadFetcher, RetryConfig, Severity, SourceTag,
    UnifiedEsgRecord, UpdateStore, ValidationError, ValidationResult, ValidationWarning,
};
pub use fetch::{HttpFetcher, HttpFetcherBuilder};
pub use normalize::{Normalizer, normalize};
pub use validate::EsgValidator;

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Meant for tests and small binaries; calling it twice is harmless.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
