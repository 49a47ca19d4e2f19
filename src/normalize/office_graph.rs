use serde_json::Value;

use super::Normalizer;
use crate::core::UnifiedEsgRecord;

/// Office document graph (workbook content) payloads.
///
/// No extraction is implemented yet: every payload normalizes to the empty record, so these
/// updates score 100 with no diagnostics.
// TODO: read worksheet `values` ranges once the content layout of uploaded workbooks is fixed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfficeGraphNormalizer;

impl Normalizer for OfficeGraphNormalizer {
    fn normalize(&self, _payload: &Value) -> UnifiedEsgRecord {
        UnifiedEsgRecord::default()
    }
}
