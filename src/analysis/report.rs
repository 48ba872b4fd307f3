//! Everything a report renders, computed once.

use super::contract::{contract_analysis, ContractAnalysis, VISN21_CONTRACT};
use super::projection::{five_year_projection, monthly_schedule, PaybackSchedule, ProjectionYear};
use super::scenarios::{scenarios, Scenario};
use super::sensitivity::{sensitivity, SensitivityEntry};
use crate::calculators::calculate;
use crate::config::RoiInputs;
use crate::core::{OrganizationType, Product, RoiResults};
use crate::error::Result;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Months shown in the payback schedule.
pub const SCHEDULE_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiReport {
    pub generated_at: DateTime<Local>,
    pub inputs: RoiInputs,
    pub results: RoiResults,
    pub projection: Vec<ProjectionYear>,
    pub payback: PaybackSchedule,
    pub scenarios: Vec<Scenario>,
    pub sensitivity: Vec<SensitivityEntry>,
    /// Present for PraediAlert at VISN21
    pub contract: Option<ContractAnalysis>,
}

impl RoiReport {
    pub fn product(&self) -> Product {
        self.results.product
    }
}

/// Run the calculation and every analysis for one set of inputs.
pub fn build_report(inputs: &RoiInputs) -> Result<RoiReport> {
    let results = calculate(inputs)?;
    let savings = results.summary.total_savings;

    let contract = (inputs.product == Product::PraediAlert
        && inputs.organization == OrganizationType::Visn21)
        .then(|| contract_analysis(savings, &VISN21_CONTRACT));

    Ok(RoiReport {
        generated_at: Local::now(),
        inputs: inputs.clone(),
        projection: five_year_projection(savings, &results.financial),
        payback: monthly_schedule(savings, &results.financial, SCHEDULE_MONTHS),
        scenarios: scenarios(&results),
        sensitivity: sensitivity(inputs)?,
        contract,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visn21_alert_report_includes_contract() {
        let report =
            build_report(&RoiInputs::new(Product::PraediAlert, OrganizationType::Visn21)).unwrap();
        let contract = report.contract.unwrap();
        assert_eq!(contract.annual_savings, report.results.summary.total_savings);
        assert_eq!(report.projection.len(), 5);
        assert_eq!(report.payback.months.len(), 12);
        assert_eq!(report.scenarios.len(), 3);
    }

    #[test]
    fn other_reports_skip_contract() {
        let report =
            build_report(&RoiInputs::new(Product::PraediGene, OrganizationType::Visn21)).unwrap();
        assert!(report.contract.is_none());
        let report = build_report(&RoiInputs::new(
            Product::PraediAlert,
            OrganizationType::LargeHospital,
        ))
        .unwrap();
        assert!(report.contract.is_none());
    }
}
