use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/* ---------------- Unified record ---------------- */

/// The canonical normalized form of ESG data, independent of where it came from.
///
/// Every numeric leaf is either a finite number or `None`. `None` means "unknown" and is
/// deliberately distinct from zero: validation rules only fire on present values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedEsgRecord {
    /// Environmental metrics.
    #[serde(default)]
    pub environmental: Environmental,
    /// Social metrics.
    #[serde(default)]
    pub social: Social,
    /// Governance metrics.
    #[serde(default)]
    pub governance: Governance,
}

/// Environmental section of a [`UnifiedEsgRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environmental {
    /// Greenhouse gas emissions, in tons CO2e.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_emissions: Option<f64>,
    /// Total energy consumed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_consumption: Option<f64>,
    /// Total water withdrawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_usage: Option<f64>,
    /// Total waste generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_generation: Option<f64>,
    /// Share of energy from renewable sources, as a percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewable_energy_percentage: Option<f64>,
}

/// Social section of a [`UnifiedEsgRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Social {
    /// Headcount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<f64>,
    /// Workforce diversity figures.
    #[serde(default)]
    pub diversity_metrics: DiversityMetrics,
    /// Occupational health and safety figures.
    #[serde(default)]
    pub health_and_safety: HealthAndSafety,
    /// Money invested in the community.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_investment: Option<f64>,
}

/// Workforce diversity figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiversityMetrics {
    /// Gender ratio, expected in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnic_diversity: Option<f64>,
    /// Headcount per age bucket (bucket label -> count).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_distribution: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAndSafety {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incidents: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_hours: Option<f64>,
}

/// Governance section of a [`UnifiedEsgRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Governance {
    #[serde(default)]
    pub board_composition: BoardComposition,
    #[serde(default)]
    pub executive_compensation: ExecutiveCompensation,
    #[serde(default)]
    pub compliance_metrics: ComplianceMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardComposition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub independent_directors: Option<f64>,
    /// Number of seats on the board. A board needs at least one director.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_directors: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversity_percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveCompensation {
    /// CEO pay divided by median employee pay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceo_pay_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_employee_pay: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulatory_violations: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_findings: Option<f64>,
}

/* ---------------- Metric addressing ---------------- */

/// Addresses one numeric leaf of a [`UnifiedEsgRecord`].
///
/// `age_distribution` is the only leaf that is not a single number, so it has no variant here;
/// completeness counts it separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    CarbonEmissions,
    EnergyConsumption,
    WaterUsage,
    WasteGeneration,
    RenewableEnergyPercentage,
    EmployeeCount,
    GenderRatio,
    EthnicDiversity,
    Incidents,
    TrainingHours,
    CommunityInvestment,
    IndependentDirectors,
    TotalDirectors,
    BoardDiversityPercentage,
    CeoPayRatio,
    MedianEmployeePay,
    RegulatoryViolations,
    AuditFindings,
}

impl Metric {
    /// Every numeric leaf, in schema order.
    pub const ALL: [Self; 18] = [
        Self::CarbonEmissions,
        Self::EnergyConsumption,
        Self::WaterUsage,
        Self::WasteGeneration,
        Self::RenewableEnergyPercentage,
        Self::EmployeeCount,
        Self::GenderRatio,
        Self::EthnicDiversity,
        Self::Incidents,
        Self::TrainingHours,
        Self::CommunityInvestment,
        Self::IndependentDirectors,
        Self::TotalDirectors,
        Self::BoardDiversityPercentage,
        Self::CeoPayRatio,
        Self::MedianEmployeePay,
        Self::RegulatoryViolations,
        Self::AuditFindings,
    ];

    /// The dotted path used in diagnostics, e.g. `social.diversityMetrics.genderRatio`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::CarbonEmissions => "environmental.carbonEmissions",
            Self::EnergyConsumption => "environmental.energyConsumption",
            Self::WaterUsage => "environmental.waterUsage",
            Self::WasteGeneration => "environmental.wasteGeneration",
            Self::RenewableEnergyPercentage => "environmental.renewableEnergyPercentage",
            Self::EmployeeCount => "social.employeeCount",
            Self::GenderRatio => "social.diversityMetrics.genderRatio",
            Self::EthnicDiversity => "social.diversityMetrics.ethnicDiversity",
            Self::Incidents => "social.healthAndSafety.incidents",
            Self::TrainingHours => "social.healthAndSafety.trainingHours",
            Self::CommunityInvestment => "social.communityInvestment",
            Self::IndependentDirectors => "governance.boardComposition.independentDirectors",
            Self::TotalDirectors => "governance.boardComposition.totalDirectors",
            Self::BoardDiversityPercentage => "governance.boardComposition.diversityPercentage",
            Self::CeoPayRatio => "governance.executiveCompensation.ceoPayRatio",
            Self::MedianEmployeePay => "governance.executiveCompensation.medianEmployeePay",
            Self::RegulatoryViolations => "governance.complianceMetrics.regulatoryViolations",
            Self::AuditFindings => "governance.complianceMetrics.auditFindings",
        }
    }

    fn slot(self, r: &UnifiedEsgRecord) -> &Option<f64> {
        let (e, s, g) = (&r.environmental, &r.social, &r.governance);
        match self {
            Self::CarbonEmissions => &e.carbon_emissions,
            Self::EnergyConsumption => &e.energy_consumption,
            Self::WaterUsage => &e.water_usage,
            Self::WasteGeneration => &e.waste_generation,
            Self::RenewableEnergyPercentage => &e.renewable_energy_percentage,
            Self::EmployeeCount => &s.employee_count,
            Self::GenderRatio => &s.diversity_metrics.gender_ratio,
            Self::EthnicDiversity => &s.diversity_metrics.ethnic_diversity,
            Self::Incidents => &s.health_and_safety.incidents,
            Self::TrainingHours => &s.health_and_safety.training_hours,
            Self::CommunityInvestment => &s.community_investment,
            Self::IndependentDirectors => &g.board_composition.independent_directors,
            Self::TotalDirectors => &g.board_composition.total_directors,
            Self::BoardDiversityPercentage => &g.board_composition.diversity_percentage,
            Self::CeoPayRatio => &g.executive_compensation.ceo_pay_ratio,
            Self::MedianEmployeePay => &g.executive_compensation.median_employee_pay,
            Self::RegulatoryViolations => &g.compliance_metrics.regulatory_violations,
            Self::AuditFindings => &g.compliance_metrics.audit_findings,
        }
    }

    fn slot_mut(self, r: &mut UnifiedEsgRecord) -> &mut Option<f64> {
        let (e, s, g) = (&mut r.environmental, &mut r.social, &mut r.governance);
        match self {
            Self::CarbonEmissions => &mut e.carbon_emissions,
            Self::EnergyConsumption => &mut e.energy_consumption,
            Self::WaterUsage => &mut e.water_usage,
            Self::WasteGeneration => &mut e.waste_generation,
            Self::RenewableEnergyPercentage => &mut e.renewable_energy_percentage,
            Self::EmployeeCount => &mut s.employee_count,
            Self::GenderRatio => &mut s.diversity_metrics.gender_ratio,
            Self::EthnicDiversity => &mut s.diversity_metrics.ethnic_diversity,
            Self::Incidents => &mut s.health_and_safety.incidents,
            Self::TrainingHours => &mut s.health_and_safety.training_hours,
            Self::CommunityInvestment => &mut s.community_investment,
            Self::IndependentDirectors => &mut g.board_composition.independent_directors,
            Self::TotalDirectors => &mut g.board_composition.total_directors,
            Self::BoardDiversityPercentage => &mut g.board_composition.diversity_percentage,
            Self::CeoPayRatio => &mut g.executive_compensation.ceo_pay_ratio,
            Self::MedianEmployeePay => &mut g.executive_compensation.median_employee_pay,
            Self::RegulatoryViolations => &mut g.compliance_metrics.regulatory_violations,
            Self::AuditFindings => &mut g.compliance_metrics.audit_findings,
        }
    }

    /// Reads this metric from a record.
    #[must_use]
    pub fn get(self, record: &UnifiedEsgRecord) -> Option<f64> {
        *self.slot(record)
    }

    /// Writes this metric into a record. Non-finite values are stored as absent.
    pub fn set(self, record: &mut UnifiedEsgRecord, value: f64) {
        *self.slot_mut(record) = value.is_finite().then_some(value);
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl UnifiedEsgRecord {
    /// Total number of leaf fields in the schema (numeric leaves plus `age_distribution`).
    pub const LEAF_COUNT: usize = Metric::ALL.len() + 1;

    /// Number of leaf fields that carry a value.
    #[must_use]
    pub fn present_leaf_count(&self) -> usize {
        let numeric = Metric::ALL
            .iter()
            .filter(|m| m.get(self).is_some())
            .count();
        let ages = self
            .social
            .diversity_metrics
            .age_distribution
            .as_ref()
            .is_some_and(|m| !m.is_empty());
        numeric + usize::from(ages)
    }

    /// Fraction of the schema's leaf fields that are present, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completeness(&self) -> f64 {
        self.present_leaf_count() as f64 / Self::LEAF_COUNT as f64
    }

    /// True when no leaf carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present_leaf_count() == 0
    }
}

/* ---------------- Validation output ---------------- */

/// How serious a [`ValidationError`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Points subtracted from the compliance score for one error of this severity.
    #[must_use]
    pub const fn penalty(self) -> i32 {
        match self {
            Self::Critical => 20,
            Self::High => 10,
            Self::Medium => 5,
            Self::Low => 2,
        }
    }

    /// Critical and high errors make a record invalid; medium and low only cost score.
    #[must_use]
    pub const fn blocks_validity(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An out-of-range or invalid value found in a normalized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

/// A suspicious but acceptable value. Warnings never affect validity or score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Dotted path of the field.
    pub field: String,
    pub message: String,
    /// What the data owner should double-check.
    pub recommendation: String,
}

/// Outcome of validating one normalized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// `true` iff no error has severity critical or high.
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    /// Composite compliance score in `0..=100`.
    pub score: u8,
}

impl ValidationResult {
    /// Errors of exactly the given severity.
    pub fn errors_with(&self, severity: Severity) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.severity == severity)
    }

    #[must_use]
    pub fn has_critical(&self) -> bool {
        self.errors_with(Severity::Critical).next().is_some()
    }
}

/// A normalized record together with its validation outcome.
///
/// This is what the engine hands to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub normalized: UnifiedEsgRecord,
    pub validation: ValidationResult,
}

/* ---------------- Source tags ---------------- */

/// Identifies the system a raw payload came from.
///
/// Parsing never fails: any label that is not one of the known sources becomes
/// [`SourceTag::Generic`], which routes to the heuristic normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceTag {
    /// Accounting platform (e.g. `QuickBooks`).
    AccountingPlatform,
    /// Spreadsheet service (e.g. Google Sheets).
    Spreadsheet,
    /// Office document graph (e.g. Microsoft Graph / Excel Online).
    OfficeGraph,
    /// Anything else, keeping the original label.
    Generic(String),
}

impl SourceTag {
    /// The three enumerated sources, in display order.
    pub const KNOWN: [Self; 3] = [Self::AccountingPlatform, Self::Spreadsheet, Self::OfficeGraph];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AccountingPlatform => "accounting-platform",
            Self::Spreadsheet => "spreadsheet",
            Self::OfficeGraph => "office-graph",
            Self::Generic(label) => label,
        }
    }

    #[must_use]
    pub const fn is_generic(&self) -> bool {
        matches!(self, Self::Generic(_))
    }
}

impl From<&str> for SourceTag {
    fn from(s: &str) -> Self {
        match s {
            "accounting-platform" | "quickbooks" => Self::AccountingPlatform,
            "spreadsheet" | "google-sheets" => Self::Spreadsheet,
            "office-graph" | "microsoft-graph" => Self::OfficeGraph,
            other => Self::Generic(other.to_string()),
        }
    }
}

impl From<String> for SourceTag {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<SourceTag> for String {
    fn from(tag: SourceTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
