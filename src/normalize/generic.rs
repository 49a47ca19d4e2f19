use serde_json::Value;

use super::{
    Normalizer,
    keywords::{self, GENERIC_FAMILIES},
};
use crate::core::UnifiedEsgRecord;

/// Catch-all strategy for unrecognized sources.
///
/// Every top-level key is matched against the environmental, social and governance keyword
/// families at once, so a single flat object can fill all three sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericNormalizer;

impl Normalizer for GenericNormalizer {
    fn normalize(&self, payload: &Value) -> UnifiedEsgRecord {
        let mut record = UnifiedEsgRecord::default();
        let Some(map) = payload.as_object() else {
            return record;
        };

        for family in GENERIC_FAMILIES {
            for rule in family {
                if let Some(v) = keywords::extract(map, family, rule.metric) {
                    rule.metric.set(&mut record, v);
                }
            }
        }
        record
    }
}
