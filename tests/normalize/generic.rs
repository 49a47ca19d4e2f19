use esg_ingest::{SourceTag, normalize};
use serde_json::json;

fn generic() -> SourceTag {
    SourceTag::from("csv-upload")
}

#[test]
fn one_flat_object_fills_all_three_sections() {
    let payload = json!({
        "Total Emissions (t)": "4,500",
        "energy_kwh": 120000,
        "water_m3": "300",
        "staff_headcount": 85,
        "diversity_index": 0.4,
        "independent_directors": 5,
        "ceo_pay_ratio": "145"
    });

    let r = normalize(&payload, &generic());

    assert_eq!(r.environmental.carbon_emissions, Some(4500.0));
    assert_eq!(r.environmental.energy_consumption, Some(120_000.0));
    assert_eq!(r.environmental.water_usage, Some(300.0));
    assert_eq!(r.social.employee_count, Some(85.0));
    assert_eq!(r.social.diversity_metrics.gender_ratio, Some(0.4));
    assert_eq!(r.governance.board_composition.total_directors, Some(5.0));
    assert_eq!(r.governance.executive_compensation.ceo_pay_ratio, Some(145.0));
}

#[test]
fn absent_carbon_stays_absent_not_zero() {
    let r = normalize(&json!({ "revenue": 10 }), &generic());
    assert_eq!(r.environmental.carbon_emissions, None);
    assert!(r.is_empty());
}

#[test]
fn first_keyword_in_a_section_claims_the_key() {
    // "carbon" precedes "energy" in the environmental family.
    let r = normalize(&json!({ "carbon_energy_index": 3 }), &generic());
    assert_eq!(r.environmental.carbon_emissions, Some(3.0));
    assert_eq!(r.environmental.energy_consumption, None);
}

#[test]
fn later_keys_override_earlier_ones_but_unparseable_values_do_not() {
    let r = normalize(
        &json!({ "carbon_2023": 10, "carbon_2024": 12, "carbon_note": "pending" }),
        &generic(),
    );
    assert_eq!(r.environmental.carbon_emissions, Some(12.0));
}

#[test]
fn non_object_payloads_are_empty() {
    assert!(normalize(&json!([1, 2, 3]), &generic()).is_empty());
    assert!(normalize(&json!(null), &generic()).is_empty());
}

#[test]
fn spaced_negative_strings_stay_negative() {
    let r = normalize(&json!({ "carbon_emissions": "- 50" }), &generic());
    assert_eq!(r.environmental.carbon_emissions, Some(-50.0));
}
