//! Best-effort heuristic field extraction.
//!
//! Source payloads label their values however they like (`"Carbon (tCO2e)"`,
//! `total_staff`, `BoardSize`). A [`KeywordRule`] maps a set of substrings onto one
//! [`Metric`]; an ordered slice of rules is a *family*. Within a family the first rule whose
//! keyword appears in the lower-cased label wins, so a label is never assigned to two metrics
//! of the same section.

use serde_json::{Map, Value};

use crate::core::{Metric, numeric::parse_numeric};

/// Maps any of `keywords` (lower-case substrings) onto `metric`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub metric: Metric,
    pub keywords: &'static [&'static str],
}

const fn rule(metric: Metric, keywords: &'static [&'static str]) -> KeywordRule {
    KeywordRule { metric, keywords }
}

/* ----- spreadsheet row labels ----- */

pub const SHEET_ENVIRONMENTAL: &[KeywordRule] = &[
    rule(Metric::CarbonEmissions, &["carbon"]),
    rule(Metric::EnergyConsumption, &["energy"]),
    rule(Metric::WaterUsage, &["water"]),
];

pub const SHEET_SOCIAL: &[KeywordRule] = &[
    rule(Metric::EmployeeCount, &["employee"]),
    rule(Metric::GenderRatio, &["diversity"]),
];

pub const SHEET_GOVERNANCE: &[KeywordRule] = &[rule(Metric::TotalDirectors, &["board"])];

/* ----- generic top-level keys ----- */

pub const GENERIC_ENVIRONMENTAL: &[KeywordRule] = &[
    rule(Metric::CarbonEmissions, &["carbon", "emission"]),
    rule(Metric::EnergyConsumption, &["energy"]),
    rule(Metric::WaterUsage, &["water"]),
];

pub const GENERIC_SOCIAL: &[KeywordRule] = &[
    rule(Metric::EmployeeCount, &["employee", "staff"]),
    rule(Metric::GenderRatio, &["diversity"]),
];

pub const GENERIC_GOVERNANCE: &[KeywordRule] = &[
    rule(Metric::TotalDirectors, &["board", "director"]),
    rule(Metric::CeoPayRatio, &["ceo", "executive"]),
];

/// The section families used by the generic path, visited together for every key.
pub const GENERIC_FAMILIES: [&[KeywordRule]; 3] =
    [GENERIC_ENVIRONMENTAL, GENERIC_SOCIAL, GENERIC_GOVERNANCE];

/// Returns the metric `label` names within `family`, if any.
#[must_use]
pub fn classify(label: &str, family: &[KeywordRule]) -> Option<Metric> {
    let lower = label.to_lowercase();
    family
        .iter()
        .find(|r| r.keywords.iter().any(|k| lower.contains(k)))
        .map(|r| r.metric)
}

/// Extracts `metric` from a flat mapping by key heuristics.
///
/// Every key that `family` classifies as `metric` is a candidate; keys are visited in map
/// order and the last candidate holding a parseable number wins.
#[must_use]
pub fn extract(map: &Map<String, Value>, family: &[KeywordRule], metric: Metric) -> Option<f64> {
    map.iter()
        .filter(|(key, _)| classify(key, family) == Some(metric))
        .filter_map(|(_, value)| parse_numeric(value))
        .last()
}

/// Folds an alias into its comparable form: lower-case, alphanumerics only.
///
/// `"Carbon Emissions"`, `carbon-emissions` and `carbonEmissions` all fold to
/// `carbonemissions`.
#[must_use]
pub fn fold_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
