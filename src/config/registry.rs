//! Every adjustable input, its bounds, and the parameter set they address.
//!
//! Keys are `component.field`, e.g. `pgx.annual_volume` or
//! `financial.implementation_cost`. The bounds mirror the ranges a user can
//! reasonably enter for a single facility.

use super::defaults::{
    financial_defaults, praedialert_defaults, praedigene_defaults, FinancialParams,
    PraediAlertParams, PraediGeneParams,
};
use crate::core::{OrganizationType, Product};
use crate::error::{Result, RoiError, ValidationIssue};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Dollars,
    Percent,
    Count,
    Hours,
    Score,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Dollars => "$",
            Self::Percent => "%",
            Self::Count => "#",
            Self::Hours => "h",
            Self::Score => "pts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Unit,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub help: &'static str,
    pub impact: Option<ImpactLevel>,
    /// `None` for financial inputs shared by both products.
    #[serde(skip)]
    pub product: Option<Product>,
}

impl ParameterSpec {
    pub fn component(&self) -> &'static str {
        self.key.split_once('.').map_or(self.key, |(c, _)| c)
    }

    fn check(&self, value: f64) -> Option<ValidationIssue> {
        let message = if !value.is_finite() {
            "must be a finite number".to_string()
        } else if value < self.min {
            format!("below minimum {}", self.min)
        } else if value > self.max {
            format!("above maximum {}", self.max)
        } else {
            return None;
        };
        Some(ValidationIssue {
            key: self.key.to_string(),
            value,
            message,
        })
    }
}

const GENE: Option<Product> = Some(Product::PraediGene);
const ALERT: Option<Product> = Some(Product::PraediAlert);
const HIGH: Option<ImpactLevel> = Some(ImpactLevel::High);
const MEDIUM: Option<ImpactLevel> = Some(ImpactLevel::Medium);
const LOW: Option<ImpactLevel> = Some(ImpactLevel::Low);

macro_rules! spec {
    ($key:literal, $label:literal, $unit:ident, $min:expr, $max:expr, $step:expr, $impact:expr, $product:expr, $help:literal) => {
        ParameterSpec {
            key: $key,
            label: $label,
            unit: Unit::$unit,
            min: $min,
            max: $max,
            step: $step,
            help: $help,
            impact: $impact,
            product: $product,
        }
    };
}

#[rustfmt::skip]
pub const REGISTRY: &[ParameterSpec] = &[
    spec!("pgx.annual_volume", "PGx Annual Test Volume", Count, 100.0, 5000.0, 100.0, None, GENE, "Number of PGx tests performed annually"),
    spec!("pgx.adr_cost", "Cost per ADR", Dollars, 2000.0, 15000.0, 500.0, HIGH, GENE, "Average cost of an adverse drug reaction"),
    spec!("pgx.patient_impact", "Patient Impact", Percent, 10.0, 40.0, 5.0, HIGH, GENE, "Percentage of patients benefiting from PGx testing"),
    spec!("pgx.readmission_rate", "Readmission Reduction", Percent, 2.0, 15.0, 1.0, MEDIUM, GENE, "Reduction in readmission rates"),
    spec!("tso500.annual_volume", "TSO500 Annual Test Volume", Count, 50.0, 1000.0, 50.0, None, GENE, "Number of TSO500 tests performed annually"),
    spec!("tso500.treatment_cost", "Targeted Treatment Cost", Dollars, 15000.0, 50000.0, 1000.0, HIGH, GENE, "Average cost of targeted therapy"),
    spec!("tso500.treatment_success", "Treatment Success Rate", Percent, 50.0, 85.0, 5.0, MEDIUM, GENE, "Success rate of targeted therapies"),
    spec!("tso500.fte_daily_cost", "TSO500 FTE Daily Cost", Dollars, 500.0, 1500.0, 100.0, MEDIUM, GENE, "Daily cost of FTE time"),
    spec!("bias2015.annual_tests", "BIAS2015 Annual Test Volume", Count, 100.0, 1500.0, 50.0, None, GENE, "Number of BIAS2015 analyses annually"),
    spec!("bias2015.patient_benefit", "Patient Benefit Score", Score, 5.0, 10.0, 1.0, LOW, GENE, "Clinical benefit score; fractional values truncate"),
    spec!("bias2015.fte_daily_cost", "BIAS2015 FTE Daily Cost", Dollars, 500.0, 1500.0, 100.0, MEDIUM, GENE, "Daily cost of FTE time"),
    spec!("cytogenetics.annual_volume", "Cytogenetics Annual Case Volume", Count, 100.0, 1000.0, 50.0, None, GENE, "Number of cytogenetics cases annually"),
    spec!("cytogenetics.tech_time", "Tech Time per Case", Hours, 1.0, 6.0, 0.5, LOW, GENE, "Technician hours per case"),
    spec!("cytogenetics.rerun_cost", "Cost per Rerun", Dollars, 100.0, 500.0, 50.0, LOW, GENE, "Cost when a test needs to be rerun"),
    spec!("cytogenetics.fte_daily_cost", "Cytogenetics FTE Daily Cost", Dollars, 500.0, 1500.0, 100.0, MEDIUM, GENE, "Daily cost of FTE time"),
    spec!("ipc.cost_per_hai", "Cost per HAI", Dollars, 10000.0, 50000.0, 1000.0, HIGH, ALERT, "Average cost of treating a healthcare-associated infection"),
    spec!("ipc.hai_incidence_rate", "HAI Incidence Rate", Percent, 0.5, 15.0, 0.1, HIGH, ALERT, "Baseline HAI rate"),
    spec!("ipc.reduction_target", "HAI Reduction Target", Percent, 10.0, 50.0, 5.0, None, ALERT, "Expected reduction in HAI rates (parametric model)"),
    spec!("ipc.annual_patient_days", "Annual Patient Days", Count, 10000.0, 200000.0, 5000.0, None, ALERT, "Total inpatient days per year"),
    spec!("stewardship.annual_dot", "Annual DOT", Count, 10000.0, 100000.0, 5000.0, None, ALERT, "Antibiotic days of therapy per year"),
    spec!("stewardship.cost_per_dot", "Cost per DOT", Dollars, 50.0, 200.0, 10.0, None, ALERT, "Average cost per day of therapy"),
    spec!("stewardship.dot_reduction_target", "DOT Reduction Target", Percent, 10.0, 40.0, 5.0, MEDIUM, ALERT, "Expected reduction in days of therapy"),
    spec!("stewardship.antibiotic_cost_reduction", "Antibiotic Cost Reduction", Percent, 15.0, 40.0, 5.0, None, ALERT, "Expected reduction in antibiotic costs (parametric model)"),
    spec!("regulatory.reports_per_year", "Reports per Year", Count, 50.0, 200.0, 10.0, None, ALERT, "Regulatory reports generated annually"),
    spec!("regulatory.hours_per_report", "Hours per Report", Hours, 1.0, 8.0, 0.5, None, ALERT, "Average hours to complete each report manually"),
    spec!("regulatory.hourly_labor_cost", "Hourly Labor Cost", Dollars, 30.0, 100.0, 5.0, None, ALERT, "Cost per hour of staff time"),
    spec!("regulatory.automation_efficiency", "Automation Efficiency", Percent, 50.0, 90.0, 5.0, LOW, ALERT, "Percentage of time saved through automation"),
    spec!("financial.implementation_cost", "Implementation Cost", Dollars, 0.0, 10_000_000.0, 5000.0, HIGH, None, "One-time installation and integration cost"),
    spec!("financial.annual_maintenance", "Annual Maintenance", Dollars, 0.0, 10_000_000.0, 1000.0, MEDIUM, None, "Yearly license, maintenance and support"),
    spec!("financial.staff_training", "Staff Training", Dollars, 0.0, 10_000_000.0, 1000.0, LOW, None, "One-time training cost"),
];

pub fn lookup(key: &str) -> Option<&'static ParameterSpec> {
    REGISTRY.iter().find(|spec| spec.key == key)
}

/// Parameters that feed a product's calculation, financial inputs included.
pub fn specs_for(product: Product) -> impl Iterator<Item = &'static ParameterSpec> {
    REGISTRY
        .iter()
        .filter(move |spec| spec.product.is_none_or(|p| p == product))
}

/// Parse a `key=value` override.
pub fn parse_override(input: &str) -> Result<(String, f64)> {
    let syntax = || RoiError::OverrideSyntax {
        input: input.to_string(),
    };
    let (key, value) = input.split_once('=').ok_or_else(syntax)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(syntax());
    }
    let value = value
        .trim()
        .replace([',', '_'], "")
        .parse::<f64>()
        .map_err(|_| syntax())?;
    Ok((key.to_string(), value))
}

/// Complete set of calculation inputs for one organization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSet {
    pub gene: PraediGeneParams,
    pub alert: PraediAlertParams,
    pub financial: FinancialParams,
}

impl ParameterSet {
    pub fn defaults(org: OrganizationType) -> Self {
        Self {
            gene: praedigene_defaults(org),
            alert: praedialert_defaults(org),
            financial: financial_defaults(org.size_class()),
        }
    }

    pub fn get(&self, key: &str) -> Result<f64> {
        let mut copy = *self;
        copy.slot(key)
            .map(|value| *value)
            .ok_or_else(|| RoiError::unknown_parameter(key))
    }

    /// Set one input. Range checks happen in [`ParameterSet::validate`].
    pub fn apply_override(&mut self, key: &str, value: f64) -> Result<()> {
        let slot = self
            .slot(key)
            .ok_or_else(|| RoiError::unknown_parameter(key))?;
        tracing::debug!(key, from = *slot, to = value, "parameter override");
        *slot = value;
        Ok(())
    }

    pub fn apply_overrides<'a>(
        &mut self,
        overrides: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<()> {
        overrides
            .into_iter()
            .try_for_each(|(key, value)| self.apply_override(key, value))
    }

    /// Every registry value outside its bounds, in registry order.
    pub fn validate_parameters(&self) -> Vec<ValidationIssue> {
        REGISTRY
            .iter()
            .filter_map(|spec| {
                let value = self.get(spec.key).ok()?;
                spec.check(value)
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let issues = self.validate_parameters();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(RoiError::Validation { issues })
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut f64> {
        let gene = &mut self.gene;
        let alert = &mut self.alert;
        let fin = &mut self.financial;
        Some(match key {
            "pgx.annual_volume" => &mut gene.pgx.annual_volume,
            "pgx.adr_cost" => &mut gene.pgx.adr_cost,
            "pgx.patient_impact" => &mut gene.pgx.patient_impact,
            "pgx.readmission_rate" => &mut gene.pgx.readmission_rate,
            "tso500.annual_volume" => &mut gene.tso500.annual_volume,
            "tso500.treatment_cost" => &mut gene.tso500.treatment_cost,
            "tso500.treatment_success" => &mut gene.tso500.treatment_success,
            "tso500.fte_daily_cost" => &mut gene.tso500.fte_daily_cost,
            "bias2015.annual_tests" => &mut gene.bias2015.annual_tests,
            "bias2015.patient_benefit" => &mut gene.bias2015.patient_benefit,
            "bias2015.fte_daily_cost" => &mut gene.bias2015.fte_daily_cost,
            "cytogenetics.annual_volume" => &mut gene.cytogenetics.annual_volume,
            "cytogenetics.tech_time" => &mut gene.cytogenetics.tech_time,
            "cytogenetics.rerun_cost" => &mut gene.cytogenetics.rerun_cost,
            "cytogenetics.fte_daily_cost" => &mut gene.cytogenetics.fte_daily_cost,
            "ipc.cost_per_hai" => &mut alert.ipc.cost_per_hai,
            "ipc.hai_incidence_rate" => &mut alert.ipc.hai_incidence_rate,
            "ipc.reduction_target" => &mut alert.ipc.reduction_target,
            "ipc.annual_patient_days" => &mut alert.ipc.annual_patient_days,
            "stewardship.annual_dot" => &mut alert.stewardship.annual_dot,
            "stewardship.cost_per_dot" => &mut alert.stewardship.cost_per_dot,
            "stewardship.dot_reduction_target" => &mut alert.stewardship.dot_reduction_target,
            "stewardship.antibiotic_cost_reduction" => {
                &mut alert.stewardship.antibiotic_cost_reduction
            }
            "regulatory.reports_per_year" => &mut alert.regulatory.reports_per_year,
            "regulatory.hours_per_report" => &mut alert.regulatory.hours_per_report,
            "regulatory.hourly_labor_cost" => &mut alert.regulatory.hourly_labor_cost,
            "regulatory.automation_efficiency" => &mut alert.regulatory.automation_efficiency,
            "financial.implementation_cost" => &mut fin.implementation_cost,
            "financial.annual_maintenance" => &mut fin.annual_maintenance,
            "financial.staff_training" => &mut fin.staff_training,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_registry_key_addresses_a_slot() {
        let params = ParameterSet::defaults(OrganizationType::MediumHospital);
        for spec in REGISTRY {
            assert!(params.get(spec.key).is_ok(), "{} has no slot", spec.key);
        }
    }

    #[test]
    fn defaults_are_in_range_for_every_organization() {
        for org in OrganizationType::ALL {
            let issues = ParameterSet::defaults(org).validate_parameters();
            assert!(issues.is_empty(), "{org}: {issues:?}");
        }
    }

    #[test]
    fn override_then_read_back() {
        let mut params = ParameterSet::defaults(OrganizationType::SmallHospital);
        params.apply_override("pgx.annual_volume", 3000.0).unwrap();
        assert_eq!(params.gene.pgx.annual_volume, 3000.0);
        assert_eq!(params.get("pgx.annual_volume").unwrap(), 3000.0);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut params = ParameterSet::defaults(OrganizationType::SmallHospital);
        let err = params.apply_override("pgx.volume", 1.0).unwrap_err();
        assert_eq!(err.code().as_str(), "E051");
    }

    #[test]
    fn validation_reports_every_bad_value() {
        let mut params = ParameterSet::defaults(OrganizationType::LargeHospital);
        params
            .apply_overrides([
                ("pgx.annual_volume", 50.0),
                ("ipc.cost_per_hai", 90_000.0),
                ("financial.staff_training", -1.0),
            ])
            .unwrap();

        let keys: Vec<_> = params
            .validate_parameters()
            .into_iter()
            .map(|issue| issue.key)
            .collect();
        assert_eq!(
            keys,
            vec!["pgx.annual_volume", "ipc.cost_per_hai", "financial.staff_training"]
        );
        assert!(params.validate().is_err());
    }

    #[test]
    fn parse_override_accepts_separators() {
        assert_eq!(
            parse_override("financial.implementation_cost = 75,000").unwrap(),
            ("financial.implementation_cost".to_string(), 75_000.0)
        );
        assert!(parse_override("pgx.annual_volume").is_err());
        assert!(parse_override("=5").is_err());
        assert!(parse_override("pgx.adr_cost=lots").is_err());
    }

    #[test]
    fn product_filter_includes_financial_inputs() {
        let keys: Vec<_> = specs_for(Product::PraediAlert).map(|s| s.key).collect();
        assert!(keys.contains(&"ipc.cost_per_hai"));
        assert!(keys.contains(&"financial.annual_maintenance"));
        assert!(!keys.contains(&"pgx.adr_cost"));
    }

    #[test]
    fn component_is_the_key_prefix() {
        assert_eq!(lookup("stewardship.annual_dot").unwrap().component(), "stewardship");
    }
}
