use esg_ingest::{EsgValidator, Severity, SourceTag};
use serde_json::json;

use crate::common::{sheet, workbook};

#[test]
fn spreadsheet_negative_carbon() {
    let payload = json!({
        "sheets": [{
            "properties": { "title": "Environmental Data" },
            "data": [{ "rowData": [{ "values": [
                { "formattedValue": "Carbon" },
                { "formattedValue": "-50" }
            ]}]}]
        }]
    });

    let a = EsgValidator::new().assess(&payload, &SourceTag::Spreadsheet);

    assert_eq!(a.normalized.environmental.carbon_emissions, Some(-50.0));
    assert_eq!(a.validation.errors.len(), 1);
    assert_eq!(a.validation.errors[0].severity, Severity::Critical);
    assert!(a.validation.errors[0].message.contains("cannot be negative"));
    assert!(a.validation.warnings.is_empty());
    // 100 - 20 + 10 * 1/19
    assert_eq!(a.validation.score, 81);
    assert!(!a.validation.is_valid);
}

#[test]
fn generic_zero_employees() {
    let r = EsgValidator::new().validate(&json!({ "employee_count": 0 }), &SourceTag::from("hr"));
    assert!(r.errors.is_empty());
    assert_eq!(r.warnings.len(), 1);
    assert!(r.is_valid);
    assert_eq!(r.score, 100);
}

#[test]
fn empty_payload_scores_100_for_every_source() {
    let sources = [
        SourceTag::AccountingPlatform,
        SourceTag::Spreadsheet,
        SourceTag::OfficeGraph,
        SourceTag::from("anything"),
    ];
    for source in sources {
        let r = EsgValidator::new().validate(&json!({}), &source);
        assert!(r.errors.is_empty(), "{source}");
        assert!(r.warnings.is_empty(), "{source}");
        assert!(r.is_valid, "{source}");
        assert_eq!(r.score, 100, "{source}");
    }
}

#[test]
fn one_high_error_makes_a_high_scoring_record_invalid() {
    let payload = json!({ "diversity_ratio": 1.5 });
    let r = EsgValidator::new().validate(&payload, &SourceTag::from("upload"));
    assert_eq!(r.errors.len(), 1);
    assert_eq!(r.errors[0].severity, Severity::High);
    assert!(!r.is_valid);
    assert_eq!(r.score, 91);
}

#[test]
fn minor_problems_still_validate() {
    let payload = workbook(vec![
        sheet("Environmental", &[("Carbon", "2,500,000")]),
        sheet("Board", &[("Board members", "8")]),
    ]);
    let r = EsgValidator::new().validate(&payload, &SourceTag::Spreadsheet);
    assert!(r.errors.is_empty());
    assert_eq!(r.warnings.len(), 1);
    assert!(r.is_valid);
    assert_eq!(r.score, 100);
}

#[test]
fn result_serializes_with_camel_case_keys_and_lowercase_severity() {
    let r = EsgValidator::new().validate(&json!({ "board_size": 0 }), &SourceTag::from("upload"));
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["isValid"], json!(false));
    assert_eq!(v["errors"][0]["severity"], json!("critical"));
    assert_eq!(v["score"], json!(81));
}

#[test]
fn validator_is_shareable_across_threads() {
    let validator = EsgValidator::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                validator
                    .validate(&json!({ "carbon": -i }), &SourceTag::from("upload"))
                    .score
            })
        })
        .collect();
    let scores: Vec<u8> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // carbon 0 is valid; every negative value costs one critical error.
    assert_eq!(scores[0], 100);
    assert!(scores[1..].iter().all(|s| *s == 81));
}

#[test]
fn negative_carbon_behind_a_sign_and_space_is_critical() {
    let result = EsgValidator::new().validate(
        &json!({ "carbon_emissions": "- 50" }),
        &SourceTag::from("upload"),
    );
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].severity, Severity::Critical);
    assert_eq!(result.errors[0].field, "environmental.carbonEmissions");
}

#[test]
fn malformed_neighbour_cells_keep_the_negative_carbon_error() {
    let payload = json!({
        "sheets": [{
            "properties": { "title": "Environmental Data" },
            "data": [{ "rowData": [
                { "values": [ { "formattedValue": "Carbon" }, { "formattedValue": "-50" } ] },
                { "values": [ null, { "formattedValue": 3 } ] }
            ]}]
        }]
    });
    let result = EsgValidator::new().validate(&payload, &SourceTag::Spreadsheet);
    assert!(!result.is_valid);
    assert_eq!(result.score, 81);
    assert_eq!(result.errors[0].severity, Severity::Critical);
}
