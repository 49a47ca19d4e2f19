use esg_ingest::{SourceTag, normalize};
use serde_json::json;

use crate::common::{sheet, workbook};

#[test]
fn routes_rows_by_sheet_title() {
    let payload = workbook(vec![
        sheet(
            "Environmental Data",
            &[("Carbon", "1,200"), ("Energy use (MWh)", "830"), ("Water", "15")],
        ),
        sheet("Employee Metrics", &[("Employees", "420"), ("Diversity", "0.48")]),
        sheet("Board", &[("Board seats", "9")]),
    ]);

    let r = normalize(&payload, &SourceTag::Spreadsheet);

    assert_eq!(r.environmental.carbon_emissions, Some(1200.0));
    assert_eq!(r.environmental.energy_consumption, Some(830.0));
    assert_eq!(r.environmental.water_usage, Some(15.0));
    assert_eq!(r.social.employee_count, Some(420.0));
    assert_eq!(r.social.diversity_metrics.gender_ratio, Some(0.48));
    assert_eq!(r.governance.board_composition.total_directors, Some(9.0));
}

#[test]
fn title_match_is_case_insensitive_and_substring_based() {
    let payload = workbook(vec![sheet("FY24 CARBON footprint", &[("carbon", "10")])]);
    let r = normalize(&payload, &SourceTag::Spreadsheet);
    assert_eq!(r.environmental.carbon_emissions, Some(10.0));
}

#[test]
fn unrelated_sheets_and_rows_are_ignored() {
    let payload = workbook(vec![
        sheet("Revenue", &[("Carbon", "99")]),
        sheet("Environmental", &[("Scope notes", "12"), ("Carbon", "n/a")]),
    ]);
    let r = normalize(&payload, &SourceTag::Spreadsheet);
    assert!(r.is_empty());
}

#[test]
fn rows_only_map_within_their_sheet_family() {
    // "Employee" rows mean nothing on an environmental sheet.
    let payload = workbook(vec![sheet("Environmental", &[("Employee count", "50")])]);
    let r = normalize(&payload, &SourceTag::Spreadsheet);
    assert_eq!(r.social.employee_count, None);
}

#[test]
fn last_matching_row_wins() {
    let payload = workbook(vec![sheet(
        "Carbon",
        &[("Carbon Q1", "100"), ("Carbon Q2", "250")],
    )]);
    let r = normalize(&payload, &SourceTag::Spreadsheet);
    assert_eq!(r.environmental.carbon_emissions, Some(250.0));
}

#[test]
fn short_rows_are_skipped() {
    let payload = json!({
        "sheets": [{
            "properties": { "title": "Environmental" },
            "data": [{ "rowData": [
                { "values": [ { "formattedValue": "Carbon" } ] },
                { },
                { "values": [ { "formattedValue": "Water" }, { "formattedValue": "7" } ] }
            ]}]
        }]
    });
    let r = normalize(&payload, &SourceTag::Spreadsheet);
    assert_eq!(r.environmental.carbon_emissions, None);
    assert_eq!(r.environmental.water_usage, Some(7.0));
}

#[test]
fn effective_value_is_used_when_formatted_value_is_missing() {
    let payload = json!({
        "sheets": [{
            "properties": { "title": "Social" },
            "data": [{ "rowData": [
                { "values": [
                    { "effectiveValue": { "stringValue": "Employees" } },
                    { "effectiveValue": { "numberValue": 310.0 } }
                ]}
            ]}]
        }]
    });
    let r = normalize(&payload, &SourceTag::Spreadsheet);
    assert_eq!(r.social.employee_count, Some(310.0));
}

#[test]
fn a_malformed_sheet_does_not_hide_the_others() {
    let payload = json!({
        "sheets": [
            { "properties": "not an object", "data": 5 },
            {
                "properties": { "title": "Governance" },
                "data": [{ "rowData": [
                    { "values": [ { "formattedValue": "Board size" }, { "formattedValue": 7 } ] }
                ]}]
            }
        ]
    });
    let r = normalize(&payload, &SourceTag::Spreadsheet);
    assert_eq!(r.governance.board_composition.total_directors, Some(7.0));
}

#[test]
fn payloads_without_sheets_normalize_to_empty() {
    for payload in [json!({}), json!([]), json!("sheet"), json!({ "sheets": "x" })] {
        assert!(normalize(&payload, &SourceTag::Spreadsheet).is_empty());
    }
}

#[test]
fn normalization_is_idempotent() {
    let payload = workbook(vec![sheet("Environmental", &[("Carbon", "-50")])]);
    let a = normalize(&payload, &SourceTag::Spreadsheet);
    let b = normalize(&payload, &SourceTag::Spreadsheet);
    assert_eq!(a, b);
}

#[test]
fn a_malformed_cell_does_not_hide_the_rest_of_the_sheet() {
    let payload = json!({
        "sheets": [{
            "properties": { "title": "Environmental Data" },
            "data": [{ "rowData": [
                { "values": [ { "formattedValue": "Carbon" }, { "formattedValue": "-50" } ] },
                { "values": [ null, { "formattedValue": 3 } ] },
                { "values": [
                    { "formattedValue": "Water" },
                    { "effectiveValue": { "numberValue": "x" } }
                ]},
                null
            ]}]
        }]
    });
    let r = normalize(&payload, &SourceTag::Spreadsheet);
    assert_eq!(r.environmental.carbon_emissions, Some(-50.0));
    assert_eq!(r.environmental.water_usage, None);
}

#[test]
fn malformed_grid_blocks_are_skipped() {
    let payload = json!({
        "sheets": [{
            "properties": { "title": "Social" },
            "data": [
                "not a grid",
                { "rowData": "not rows" },
                { "rowData": [
                    { "values": [ { "formattedValue": "Employees" }, { "formattedValue": "12" } ] }
                ]}
            ]
        }]
    });
    let r = normalize(&payload, &SourceTag::Spreadsheet);
    assert_eq!(r.social.employee_count, Some(12.0));
}
