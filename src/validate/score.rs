use crate::core::{UnifiedEsgRecord, ValidationError};

/// Points awarded for a fully populated record.
pub const COMPLETENESS_BONUS: f64 = 10.0;

/// Computes the 0-100 compliance score.
///
/// Starts at 100, subtracts each error's severity penalty, adds `completeness * 10`, then rounds
/// and clamps. Warnings do not count.
///
/// ```
/// use esg_ingest::{UnifiedEsgRecord, validate::compliance_score};
///
/// assert_eq!(compliance_score(&UnifiedEsgRecord::default(), &[]), 100);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compliance_score(record: &UnifiedEsgRecord, errors: &[ValidationError]) -> u8 {
    let penalty: i32 = errors.iter().map(|e| e.severity.penalty()).sum();
    let raw = 100.0 - f64::from(penalty) + record.completeness() * COMPLETENESS_BONUS;
    // Clamped to 0..=100 before the cast.
    raw.round().clamp(0.0, 100.0) as u8
}
