//! Activity-row normalization for manual uploads.
//!
//! Uploaded rows (travel, fuel and energy activity) are flat objects. They are not scored like
//! [`UnifiedEsgRecord`](crate::UnifiedEsgRecord)s; instead each row gains canonical emission
//! fields and a list of human-readable data-quality flags.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::core::numeric::parse_numeric;

/// Kilometres per statute mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// One normalized activity row and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityNormalization {
    /// The original columns plus the canonical ones (`null` when unknown).
    pub normalized: Map<String, Value>,
    pub flags: Vec<String>,
}

/// Adds canonical emission fields to one activity row and flags gaps and negative values.
///
/// | canonical field | taken from |
/// |---|---|
/// | `scope_3_category_6_miles` | `air_travel_miles` |
/// | `scope_3_category_6_km` | `business_travel_km`, else miles converted to km |
/// | `scope_1_natural_gas_therms` | `natural_gas_therms` |
/// | `energy_mwh` | `energy_kwh / 1000` |
#[must_use]
pub fn normalize_activity(record: &Map<String, Value>) -> ActivityNormalization {
    let num = |key: &str| record.get(key).and_then(parse_numeric);

    let miles = num("air_travel_miles");
    let km = num("business_travel_km").or_else(|| miles.map(|m| m * KM_PER_MILE));
    let therms = num("natural_gas_therms");
    let kwh = num("energy_kwh");
    let mwh = kwh.map(|k| k / 1000.0);

    let mut normalized = record.clone();
    normalized.insert("scope_3_category_6_miles".into(), to_json(miles));
    normalized.insert("scope_3_category_6_km".into(), to_json(km));
    normalized.insert("scope_1_natural_gas_therms".into(), to_json(therms));
    normalized.insert("energy_mwh".into(), to_json(mwh));

    let mut flags = Vec::new();
    if miles.is_none() && km.is_none() {
        flags.push("Missing business travel distance (miles or km)".to_string());
    }
    if therms.is_none() {
        flags.push("Missing natural gas usage".to_string());
    }
    let negatives = [
        (miles, "Negative air travel miles"),
        (km, "Negative business travel km"),
        (therms, "Negative natural gas usage"),
        (kwh, "Negative energy_kwh"),
        (mwh, "Negative energy_mwh"),
    ];
    flags.extend(
        negatives
            .into_iter()
            .filter(|(v, _)| v.is_some_and(|v| v < 0.0))
            .map(|(_, msg)| msg.to_string()),
    );

    ActivityNormalization { normalized, flags }
}

/// Normalizes a request body holding either one row or an array of rows.
///
/// Elements that are not objects are treated as empty rows.
#[must_use]
pub fn normalize_activities(body: &Value) -> Vec<ActivityNormalization> {
    let empty = Map::new();
    let row = |v: &Value| normalize_activity(v.as_object().unwrap_or(&empty));
    match body {
        Value::Array(items) => items.iter().map(row).collect(),
        single => vec![row(single)],
    }
}

/// Renames user-supplied columns to canonical field names.
///
/// `mapping` goes from the uploaded column name to the canonical field. Every canonical field
/// appears in the output; when its column is missing the value is `null`.
///
/// ```
/// use std::collections::BTreeMap;
/// use esg_ingest::activity::apply_column_mapping;
/// use serde_json::json;
///
/// let raw = json!({ "Fuel (therms)": 120, "Site": "Leeds" });
/// let mapping = BTreeMap::from([
///     ("Fuel (therms)".to_string(), "natural_gas_therms".to_string()),
///     ("Miles flown".to_string(), "air_travel_miles".to_string()),
/// ]);
/// let out = apply_column_mapping(raw.as_object().unwrap(), &mapping);
/// assert_eq!(out["natural_gas_therms"], json!(120));
/// assert!(out["air_travel_miles"].is_null());
/// assert!(!out.contains_key("Site"));
/// ```
#[must_use]
pub fn apply_column_mapping(
    raw: &Map<String, Value>,
    mapping: &BTreeMap<String, String>,
) -> Map<String, Value> {
    mapping
        .iter()
        .map(|(column, canonical)| {
            let value = raw.get(column).cloned().unwrap_or(Value::Null);
            (canonical.clone(), value)
        })
        .collect()
}

fn to_json(v: Option<f64>) -> Value {
    v.and_then(Number::from_f64).map_or(Value::Null, Value::Number)
}
