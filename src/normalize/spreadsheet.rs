use serde_json::Value;

use super::{
    Normalizer,
    keywords::{self, KeywordRule},
    wire::{Sheet, Workbook},
};
use crate::core::{UnifiedEsgRecord, numeric::parse_numeric};

/// Sheet-title routing: the first entry whose keyword appears in the lower-cased title decides
/// which row family the sheet is read with.
const SHEET_ROUTES: &[(&[&str], &[KeywordRule])] = &[
    (&["environmental", "carbon"], keywords::SHEET_ENVIRONMENTAL),
    (&["social", "employee"], keywords::SHEET_SOCIAL),
    (&["governance", "board"], keywords::SHEET_GOVERNANCE),
];

/// Reads workbooks laid out as `(metric label, value)` rows on topic sheets.
///
/// Sheets whose title matches no topic are ignored, as are rows whose label matches no metric
/// or whose value is not a number. When several rows name the same metric the last one wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetNormalizer;

impl Normalizer for SpreadsheetNormalizer {
    fn normalize(&self, payload: &Value) -> UnifiedEsgRecord {
        let mut record = UnifiedEsgRecord::default();
        let workbook: Workbook = serde_json::from_value(payload.clone()).unwrap_or_default();

        for raw in workbook.sheets {
            let Ok(sheet) = serde_json::from_value::<Sheet>(raw) else {
                continue;
            };
            if let Some(family) = route(sheet.title()) {
                read_rows(&sheet, family, &mut record);
            }
        }
        record
    }
}

fn route(title: &str) -> Option<&'static [KeywordRule]> {
    let lower = title.to_lowercase();
    SHEET_ROUTES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, family)| *family)
}

fn read_rows(sheet: &Sheet, family: &[KeywordRule], record: &mut UnifiedEsgRecord) {
    let rows = sheet.data.iter().flat_map(|grid| grid.row_data.iter());
    for row in rows {
        let [label_cell, value_cell, ..] = row.values.as_slice() else {
            continue;
        };
        let Some(metric) = keywords::classify(&label_cell.label(), family) else {
            continue;
        };
        if let Some(v) = value_cell.content().as_ref().and_then(parse_numeric) {
            metric.set(record, v);
        }
    }
}
