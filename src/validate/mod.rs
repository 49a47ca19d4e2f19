//! The validation and scoring engine.

mod rules;
mod score;

pub use rules::CARBON_WARNING_THRESHOLD;
pub use score::{COMPLETENESS_BONUS, compliance_score};

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::core::{
    Assessment, Severity, SourceTag, UnifiedEsgRecord, ValidationError, ValidationResult,
};
use crate::normalize::{Normalizer, strategy_for};

/// Validates and scores ESG payloads.
///
/// The validator carries no state: it is `Copy`, every call is a pure function of its inputs,
/// and one value can be shared freely across threads and tasks.
///
/// # Example
///
/// ```
/// use esg_ingest::{EsgValidator, SourceTag};
/// use serde_json::json;
///
/// let validator = EsgValidator::new();
/// let result = validator.validate(&json!({ "employee_count": 0 }), &SourceTag::from("upload"));
///
/// assert!(result.is_valid);
/// assert_eq!(result.warnings.len(), 1);
/// assert_eq!(result.score, 100);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EsgValidator;

impl EsgValidator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes `payload` for `source`, applies the rule set and computes the score.
    ///
    /// Never fails: data problems come back as errors and warnings in the result, and an
    /// internal fault becomes a single critical error with a score of 0.
    #[must_use]
    pub fn validate(&self, payload: &Value, source: &SourceTag) -> ValidationResult {
        self.assess(payload, source).validation
    }

    /// Like [`validate`](Self::validate), but also returns the normalized record.
    #[must_use]
    pub fn assess(&self, payload: &Value, source: &SourceTag) -> Assessment {
        self.assess_with(strategy_for(source), payload)
    }

    /// Validates `payload` using an explicit normalizer instead of the source's default one.
    #[must_use]
    pub fn validate_with(&self, normalizer: &dyn Normalizer, payload: &Value) -> ValidationResult {
        self.assess_with(normalizer, payload).validation
    }

    /// Assesses `payload` using an explicit normalizer.
    #[must_use]
    pub fn assess_with(&self, normalizer: &dyn Normalizer, payload: &Value) -> Assessment {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let normalized = normalizer.normalize(payload);
            let validation = self.check(&normalized);
            Assessment {
                normalized,
                validation,
            }
        }));

        outcome.unwrap_or_else(|cause| {
            let message = panic_message(cause.as_ref());
            #[cfg(feature = "tracing")]
            tracing::error!(%message, "internal fault during ESG validation");
            Assessment {
                normalized: UnifiedEsgRecord::default(),
                validation: fault_result(&message),
            }
        })
    }

    /// Applies the rule set to an already-normalized record.
    #[must_use]
    pub fn check(&self, record: &UnifiedEsgRecord) -> ValidationResult {
        let findings = rules::check(record);
        let score = compliance_score(record, &findings.errors);
        let is_valid = !findings
            .errors
            .iter()
            .any(|e| e.severity.blocks_validity());
        ValidationResult {
            is_valid,
            errors: findings.errors,
            warnings: findings.warnings,
            score,
        }
    }
}

fn fault_result(message: &str) -> ValidationResult {
    ValidationResult {
        is_valid: false,
        errors: vec![ValidationError {
            field: "general".to_string(),
            message: format!("Validation error: {message}"),
            severity: Severity::Critical,
        }],
        warnings: Vec::new(),
        score: 0,
    }
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    cause
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| cause.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown internal fault".to_string())
}
