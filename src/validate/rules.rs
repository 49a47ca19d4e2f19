//! Domain rules applied to a normalized record.
//!
//! Each rule looks at one present field. Absent fields are never validated: the engine does not
//! require any field to be supplied, it only rejects values that are present but wrong.

use crate::core::{
    Environmental, Governance, Metric, Severity, Social, UnifiedEsgRecord, ValidationError,
    ValidationWarning,
};

/// Emissions above this many tons CO2e are flagged for a unit check.
pub const CARBON_WARNING_THRESHOLD: f64 = 1_000_000.0;

/// Errors and warnings collected while checking a record.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub(crate) errors: Vec<ValidationError>,
    pub(crate) warnings: Vec<ValidationWarning>,
}

impl Findings {
    fn error(&mut self, metric: Metric, message: &str, severity: Severity) {
        self.errors.push(ValidationError {
            field: metric.path().to_string(),
            message: message.to_string(),
            severity,
        });
    }

    fn warn(&mut self, metric: Metric, message: &str, recommendation: &str) {
        self.warnings.push(ValidationWarning {
            field: metric.path().to_string(),
            message: message.to_string(),
            recommendation: recommendation.to_string(),
        });
    }
}

/// Runs every rule against `record`. All rules are evaluated; none short-circuits another.
pub(crate) fn check(record: &UnifiedEsgRecord) -> Findings {
    let mut out = Findings::default();
    check_environmental(&record.environmental, &mut out);
    check_social(&record.social, &mut out);
    check_governance(&record.governance, &mut out);
    out
}

fn check_environmental(env: &Environmental, out: &mut Findings) {
    if let Some(carbon) = env.carbon_emissions {
        if carbon < 0.0 {
            out.error(
                Metric::CarbonEmissions,
                "Carbon emissions cannot be negative",
                Severity::Critical,
            );
        } else if carbon > CARBON_WARNING_THRESHOLD {
            out.warn(
                Metric::CarbonEmissions,
                "Carbon emissions seem unusually high",
                "Verify the unit of measurement (tons CO2e)",
            );
        }
    }

    if env.energy_consumption.is_some_and(|v| v < 0.0) {
        out.error(
            Metric::EnergyConsumption,
            "Energy consumption cannot be negative",
            Severity::Critical,
        );
    }
}

fn check_social(social: &Social, out: &mut Findings) {
    if let Some(count) = social.employee_count {
        if count < 0.0 {
            out.error(
                Metric::EmployeeCount,
                "Employee count cannot be negative",
                Severity::Critical,
            );
        } else if count == 0.0 {
            out.warn(
                Metric::EmployeeCount,
                "Employee count is zero",
                "Verify this is correct for your organization type",
            );
        }
    }

    if social
        .diversity_metrics
        .gender_ratio
        .is_some_and(|r| !(0.0..=1.0).contains(&r))
    {
        out.error(
            Metric::GenderRatio,
            "Gender ratio must be between 0 and 1",
            Severity::High,
        );
    }
}

fn check_governance(gov: &Governance, out: &mut Findings) {
    if gov.board_composition.total_directors.is_some_and(|n| n < 1.0) {
        out.error(
            Metric::TotalDirectors,
            "Board must have at least one director",
            Severity::Critical,
        );
    }

    if gov
        .executive_compensation
        .ceo_pay_ratio
        .is_some_and(|r| r < 1.0)
    {
        out.warn(
            Metric::CeoPayRatio,
            "CEO pay ratio is less than 1",
            "Verify this calculation is correct",
        );
    }
}
