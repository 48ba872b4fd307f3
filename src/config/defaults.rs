//! Default parameter sets per organization type.
//!
//! Custom organizations start from the medium-hospital values.

use crate::core::{OrganizationType, SizeClass};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PgxParams {
    pub adr_cost: f64,
    /// Percent of tested patients who benefit
    pub patient_impact: f64,
    /// Percent of avoided ADRs that would have led to readmission
    pub readmission_rate: f64,
    pub annual_volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tso500Params {
    pub fte_daily_cost: f64,
    pub treatment_cost: f64,
    /// Percent
    pub treatment_success: f64,
    pub annual_volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bias2015Params {
    pub fte_daily_cost: f64,
    /// Clinical benefit score on a 5..10 scale; fractional values truncate
    pub patient_benefit: f64,
    pub annual_tests: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CytogeneticsParams {
    pub fte_daily_cost: f64,
    pub rerun_cost: f64,
    /// Technician hours per case
    pub tech_time: f64,
    pub annual_volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PraediGeneParams {
    pub pgx: PgxParams,
    pub tso500: Tso500Params,
    pub bias2015: Bias2015Params,
    pub cytogenetics: CytogeneticsParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IpcParams {
    pub cost_per_hai: f64,
    /// Percent
    pub hai_incidence_rate: f64,
    /// Percent; only the parametric model reads it
    pub reduction_target: f64,
    pub annual_patient_days: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StewardshipParams {
    /// Percent; only the parametric model reads it
    pub antibiotic_cost_reduction: f64,
    /// Percent
    pub dot_reduction_target: f64,
    pub cost_per_dot: f64,
    pub annual_dot: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryParams {
    pub hourly_labor_cost: f64,
    pub reports_per_year: f64,
    /// Percent
    pub automation_efficiency: f64,
    pub hours_per_report: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PraediAlertParams {
    pub ipc: IpcParams,
    pub stewardship: StewardshipParams,
    pub regulatory: RegulatoryParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialParams {
    pub implementation_cost: f64,
    pub annual_maintenance: f64,
    pub staff_training: f64,
}

impl FinancialParams {
    /// Implementation plus one year of maintenance plus training.
    pub fn total_investment(&self) -> f64 {
        self.implementation_cost + self.annual_maintenance + self.staff_training
    }
}

/// Per-test laboratory costs behind the PraediGene pipelines. Loaded
/// genetic-test data can replace them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestCosts {
    pub pgx_in_house: f64,
    pub pgx_outsourced: f64,
    pub tso500_in_house: f64,
    pub tso500_outsourced: f64,
    pub bias2015_per_test: f64,
    pub cytogenetics_in_house: f64,
    pub cytogenetics_outsourced: f64,
}

impl Default for TestCosts {
    fn default() -> Self {
        Self {
            pgx_in_house: 200.0,
            pgx_outsourced: 350.0,
            tso500_in_house: 1500.0,
            tso500_outsourced: 1800.0,
            bias2015_per_test: 1000.0,
            cytogenetics_in_house: 600.0,
            cytogenetics_outsourced: 850.0,
        }
    }
}

#[rustfmt::skip]
pub fn praedigene_defaults(org: OrganizationType) -> PraediGeneParams {
    match org.size_class() {
        SizeClass::Large => PraediGeneParams {
            pgx: PgxParams { adr_cost: 7500.0, patient_impact: 25.0, readmission_rate: 8.0, annual_volume: 2000.0 },
            tso500: Tso500Params { fte_daily_cost: 1000.0, treatment_cost: 35000.0, treatment_success: 75.0, annual_volume: 500.0 },
            bias2015: Bias2015Params { fte_daily_cost: 1000.0, patient_benefit: 9.0, annual_tests: 800.0 },
            cytogenetics: CytogeneticsParams { fte_daily_cost: 1000.0, rerun_cost: 250.0, tech_time: 4.0, annual_volume: 600.0 },
        },
        SizeClass::Medium => PraediGeneParams {
            pgx: PgxParams { adr_cost: 5500.0, patient_impact: 20.0, readmission_rate: 6.0, annual_volume: 1200.0 },
            tso500: Tso500Params { fte_daily_cost: 800.0, treatment_cost: 28000.0, treatment_success: 70.0, annual_volume: 300.0 },
            bias2015: Bias2015Params { fte_daily_cost: 800.0, patient_benefit: 8.0, annual_tests: 500.0 },
            cytogenetics: CytogeneticsParams { fte_daily_cost: 800.0, rerun_cost: 200.0, tech_time: 3.0, annual_volume: 400.0 },
        },
        SizeClass::Small => PraediGeneParams {
            pgx: PgxParams { adr_cost: 4000.0, patient_impact: 15.0, readmission_rate: 4.0, annual_volume: 600.0 },
            tso500: Tso500Params { fte_daily_cost: 600.0, treatment_cost: 22000.0, treatment_success: 65.0, annual_volume: 150.0 },
            bias2015: Bias2015Params { fte_daily_cost: 600.0, patient_benefit: 7.0, annual_tests: 300.0 },
            cytogenetics: CytogeneticsParams { fte_daily_cost: 600.0, rerun_cost: 150.0, tech_time: 2.5, annual_volume: 200.0 },
        },
        SizeClass::Visn21 => PraediGeneParams {
            pgx: PgxParams { adr_cost: 6000.0, patient_impact: 20.0, readmission_rate: 5.0, annual_volume: 1500.0 },
            tso500: Tso500Params { fte_daily_cost: 900.0, treatment_cost: 30000.0, treatment_success: 72.0, annual_volume: 400.0 },
            bias2015: Bias2015Params { fte_daily_cost: 900.0, patient_benefit: 8.5, annual_tests: 650.0 },
            cytogenetics: CytogeneticsParams { fte_daily_cost: 900.0, rerun_cost: 225.0, tech_time: 3.5, annual_volume: 500.0 },
        },
    }
}

#[rustfmt::skip]
pub fn praedialert_defaults(org: OrganizationType) -> PraediAlertParams {
    match org.size_class() {
        SizeClass::Large => PraediAlertParams {
            ipc: IpcParams { cost_per_hai: 45000.0, hai_incidence_rate: 4.5, reduction_target: 43.6, annual_patient_days: 100_000.0 },
            stewardship: StewardshipParams { antibiotic_cost_reduction: 30.0, dot_reduction_target: 20.0, cost_per_dot: 100.0, annual_dot: 50_000.0 },
            regulatory: RegulatoryParams { hourly_labor_cost: 50.0, reports_per_year: 100.0, automation_efficiency: 80.0, hours_per_report: 4.0 },
        },
        SizeClass::Medium => PraediAlertParams {
            ipc: IpcParams { cost_per_hai: 45000.0, hai_incidence_rate: 4.2, reduction_target: 43.6, annual_patient_days: 60_000.0 },
            stewardship: StewardshipParams { antibiotic_cost_reduction: 25.0, dot_reduction_target: 18.0, cost_per_dot: 90.0, annual_dot: 30_000.0 },
            regulatory: RegulatoryParams { hourly_labor_cost: 45.0, reports_per_year: 80.0, automation_efficiency: 75.0, hours_per_report: 3.5 },
        },
        SizeClass::Small => PraediAlertParams {
            ipc: IpcParams { cost_per_hai: 45000.0, hai_incidence_rate: 4.0, reduction_target: 43.6, annual_patient_days: 30_000.0 },
            stewardship: StewardshipParams { antibiotic_cost_reduction: 20.0, dot_reduction_target: 15.0, cost_per_dot: 80.0, annual_dot: 15_000.0 },
            regulatory: RegulatoryParams { hourly_labor_cost: 40.0, reports_per_year: 60.0, automation_efficiency: 70.0, hours_per_report: 3.0 },
        },
        SizeClass::Visn21 => PraediAlertParams {
            ipc: IpcParams { cost_per_hai: 45000.0, hai_incidence_rate: 4.3, reduction_target: 43.6, annual_patient_days: 144_517.0 },
            stewardship: StewardshipParams { antibiotic_cost_reduction: 30.0, dot_reduction_target: 20.0, cost_per_dot: 100.0, annual_dot: 60_000.0 },
            regulatory: RegulatoryParams { hourly_labor_cost: 50.0, reports_per_year: 120.0, automation_efficiency: 80.0, hours_per_report: 4.0 },
        },
    }
}

/// VISN21 figures come from the budgetary quote: installation, base-year
/// license and training.
#[rustfmt::skip]
pub fn financial_defaults(size: SizeClass) -> FinancialParams {
    match size {
        SizeClass::Small => FinancialParams { implementation_cost: 30_000.0, annual_maintenance: 6_000.0, staff_training: 3_000.0 },
        SizeClass::Medium => FinancialParams { implementation_cost: 50_000.0, annual_maintenance: 10_000.0, staff_training: 5_000.0 },
        SizeClass::Large => FinancialParams { implementation_cost: 75_000.0, annual_maintenance: 15_000.0, staff_training: 8_000.0 },
        SizeClass::Visn21 => FinancialParams { implementation_cost: 50_000.0, annual_maintenance: 1_350_000.0, staff_training: 35_000.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_matches_medium() {
        assert_eq!(
            praedigene_defaults(OrganizationType::Custom),
            praedigene_defaults(OrganizationType::MediumHospital)
        );
        assert_eq!(
            praedialert_defaults(OrganizationType::Custom),
            praedialert_defaults(OrganizationType::MediumHospital)
        );
    }

    #[test]
    fn visn21_investment_matches_quote() {
        let fin = financial_defaults(SizeClass::Visn21);
        assert_eq!(fin.total_investment(), 1_435_000.0);
    }

    #[test]
    fn every_org_uses_study_reduction_by_default() {
        for org in OrganizationType::ALL {
            assert_eq!(praedialert_defaults(org).ipc.reduction_target, 43.6);
        }
    }
}
