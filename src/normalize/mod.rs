//! Source normalizers: raw, source-tagged payloads in, [`UnifiedEsgRecord`] out.
//!
//! Normalization is best-effort and infallible. Anything that cannot be read from a payload is
//! left absent in the record; nothing here returns an error or touches the outside world.

mod accounting;
mod generic;
pub mod keywords;
mod office_graph;
mod spreadsheet;
mod wire;

pub use accounting::AccountingNormalizer;
pub use generic::GenericNormalizer;
pub use office_graph::OfficeGraphNormalizer;
pub use spreadsheet::SpreadsheetNormalizer;

use serde_json::Value;

use crate::core::{SourceTag, UnifiedEsgRecord};

/// A strategy that knows how to read one source's payload shape.
///
/// Implementations must be pure: the same payload always yields the same record.
pub trait Normalizer: Send + Sync {
    /// Maps `payload` onto the unified schema, leaving unreadable fields absent.
    fn normalize(&self, payload: &Value) -> UnifiedEsgRecord;
}

/// Picks the strategy for a source. Unrecognized sources use [`GenericNormalizer`].
#[must_use]
pub fn strategy_for(source: &SourceTag) -> &'static dyn Normalizer {
    match source {
        SourceTag::AccountingPlatform => &AccountingNormalizer,
        SourceTag::Spreadsheet => &SpreadsheetNormalizer,
        SourceTag::OfficeGraph => &OfficeGraphNormalizer,
        SourceTag::Generic(_) => &GenericNormalizer,
    }
}

/// Normalizes `payload` using the strategy registered for `source`.
///
/// ```
/// use esg_ingest::{SourceTag, normalize::normalize};
/// use serde_json::json;
///
/// let record = normalize(&json!({ "employee_count": "1,250" }), &SourceTag::from("upload"));
/// assert_eq!(record.social.employee_count, Some(1250.0));
/// assert_eq!(record.environmental.carbon_emissions, None);
/// ```
#[must_use]
pub fn normalize(payload: &Value, source: &SourceTag) -> UnifiedEsgRecord {
    strategy_for(source).normalize(payload)
}
