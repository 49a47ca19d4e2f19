//! Core components of the `esg-ingest` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The primary [`EsgError`] type.
//! - The unified ESG schema ([`UnifiedEsgRecord`]) and validation output types.
//! - The lenient numeric parser shared by every normalizer.
//! - Service traits for the fetch and persistence layers, and the retry policy around fetches.

/// The primary error type (`EsgError`) for the crate.
pub mod error;
/// The unified schema, source tags and validation result types.
pub mod models;
/// Lenient number parsing for weakly-typed source values.
pub mod numeric;
/// Retry and backoff configuration for payload fetches.
pub mod retry;
/// Service traits for abstracting payload fetching and persistence.
pub mod services;

// convenient re-exports so most code can just `use crate::core::EsgError`
pub use error::EsgError;
pub use models::{
    Assessment, BoardComposition, ComplianceMetrics, DiversityMetrics, Environmental,
    ExecutiveCompensation, Governance, HealthAndSafety, Metric, Severity, Social, SourceTag,
    UnifiedEsgRecord, ValidationError, ValidationResult, ValidationWarning,
};
pub use numeric::parse_numeric;
pub use retry::{Backoff, RetryConfig, TRANSIENT_STATUSES};
pub use services::{PayloadFetcher, UpdateStore};
