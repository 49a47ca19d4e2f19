use serde_json::Value;

use super::{Normalizer, keywords::fold_key};
use crate::core::{Metric, UnifiedEsgRecord, numeric::parse_numeric};

/// Folded key -> metric. Accounting payloads rarely carry ESG data, so this is a short,
/// exact-alias list rather than a heuristic scan.
const ALIASES: &[(&str, Metric)] = &[
    ("carbonemissions", Metric::CarbonEmissions),
    ("energyconsumption", Metric::EnergyConsumption),
    ("employeecount", Metric::EmployeeCount),
    ("communityinvestment", Metric::CommunityInvestment),
    ("ceopayratio", Metric::CeoPayRatio),
    ("medianemployeepay", Metric::MedianEmployeePay),
];

/// Flat-record extraction for accounting platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountingNormalizer;

impl Normalizer for AccountingNormalizer {
    fn normalize(&self, payload: &Value) -> UnifiedEsgRecord {
        let mut record = UnifiedEsgRecord::default();
        let Some(map) = payload.as_object() else {
            return record;
        };

        for (key, value) in map {
            let folded = fold_key(key);
            let Some(&(_, metric)) = ALIASES.iter().find(|(alias, _)| *alias == folded) else {
                continue;
            };
            if let Some(v) = parse_numeric(value) {
                metric.set(&mut record, v);
            }
        }
        record
    }
}
