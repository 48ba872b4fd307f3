//! Study financials, the sensitivity table and target hospital estimates.

use super::{
    annual_outbreak_probability, annualize, per_facility, KEY_METRICS, STUDY_FINANCIALS,
    STUDY_OUTCOMES,
};
use crate::config::registry::ImpactLevel;
use crate::core::{whole, SizeClass};
use serde::Serialize;

const ADMISSIONS_PER_BED: f64 = 50.0;

/// Study financials scaled to one facility for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualFinancials {
    pub implementation_cost: f64,
    pub annual_operating: f64,
    pub direct_savings: f64,
    pub los_savings: f64,
    pub mortality_value: f64,
    pub outbreak_savings: f64,
    pub total_annual_savings: f64,
}

pub fn annual_financials_per_facility() -> AnnualFinancials {
    let f = STUDY_FINANCIALS;
    AnnualFinancials {
        implementation_cost: per_facility(f.implementation_total),
        annual_operating: per_facility(f.annual_operating),
        direct_savings: annualize(per_facility(f.direct_savings)),
        los_savings: annualize(per_facility(f.los_savings)),
        mortality_value: annualize(per_facility(f.mortality_value)),
        outbreak_savings: annualize(per_facility(f.outbreak_savings)),
        total_annual_savings: annualize(per_facility(f.total_benefits)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostItem {
    pub item: &'static str,
    pub amount: f64,
}

const fn item(item: &'static str, amount: f64) -> CostItem {
    CostItem { item, amount }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialImpact {
    pub per_hai_costs: Vec<CostItem>,
    pub implementation: Vec<CostItem>,
    pub annual_operating: Vec<CostItem>,
    pub savings_18_months: Vec<CostItem>,
    pub payback_months: f64,
    pub first_year_roi: f64,
    pub five_year_roi: f64,
    pub break_even_month: u32,
}

impl FinancialImpact {
    pub fn implementation_total(&self) -> f64 {
        self.implementation.iter().map(|c| c.amount).sum()
    }

    pub fn operating_total(&self) -> f64 {
        self.annual_operating.iter().map(|c| c.amount).sum()
    }

    pub fn savings_total(&self) -> f64 {
        self.savings_18_months.iter().map(|c| c.amount).sum()
    }
}

pub fn financial_impact() -> FinancialImpact {
    let f = STUDY_FINANCIALS;
    FinancialImpact {
        per_hai_costs: vec![
            item("Direct medical costs", 30_000.0),
            item("Extended LOS (7.5 days x $2,000)", 15_000.0),
            item("Additional diagnostics", 5_000.0),
            item("Indirect costs", 10_000.0),
        ],
        implementation: vec![
            item("Software license", 800_000.0),
            item("Integration setup", 240_000.0),
            item("Staff training", 120_000.0),
            item("Infrastructure", 160_000.0),
        ],
        annual_operating: vec![
            item("Maintenance", 160_000.0),
            item("Support", 80_000.0),
            item("Staff time (0.5 FTE per facility)", 320_000.0),
        ],
        savings_18_months: vec![
            item("Direct HAI prevention", f.direct_savings),
            item("LOS reduction", f.los_savings),
            item("Mortality prevention", f.mortality_value),
            item("Outbreak prevention", f.outbreak_savings),
        ],
        payback_months: 12.0,
        first_year_roi: 1163.0,
        five_year_roi: 5825.0,
        break_even_month: 11,
    }
}

/// One row of the study's published sensitivity ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensitivityRow {
    pub name: &'static str,
    pub base_case: f64,
    pub pessimistic: f64,
    pub optimistic: f64,
    pub impact: ImpactLevel,
}

pub fn sensitivity_table() -> [SensitivityRow; 4] {
    [
        SensitivityRow {
            name: "HAI Reduction Rate",
            base_case: STUDY_OUTCOMES.hai_reduction_rate * 100.0,
            pessimistic: 30.0,
            optimistic: 50.0,
            impact: ImpactLevel::High,
        },
        SensitivityRow {
            name: "Cost per HAI",
            base_case: KEY_METRICS.cost_per_hai,
            pessimistic: 35_000.0,
            optimistic: 55_000.0,
            impact: ImpactLevel::High,
        },
        SensitivityRow {
            name: "Implementation Cost",
            base_case: per_facility(STUDY_FINANCIALS.implementation_total),
            pessimistic: 200_000.0,
            optimistic: 130_000.0,
            impact: ImpactLevel::Medium,
        },
        SensitivityRow {
            name: "Annual Operating Cost",
            base_case: per_facility(STUDY_FINANCIALS.annual_operating),
            pessimistic: 85_000.0,
            optimistic: 55_000.0,
            impact: ImpactLevel::Low,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetHospital {
    pub name: &'static str,
    pub beds: u32,
    pub size: SizeClass,
    /// Fraction of admissions acquiring an HAI
    pub baseline_hai_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetHospitalSavings {
    pub annual_admissions: f64,
    pub baseline_hais: f64,
    pub hais_prevented: f64,
    pub direct_savings: f64,
    pub days_saved: f64,
    pub los_savings: f64,
    pub lives_saved: f64,
    pub mortality_savings: f64,
    pub outbreak_savings: f64,
    pub total_savings: f64,
}

impl TargetHospital {
    /// Annual savings from the study effect sizes, in whole units.
    pub fn annual_savings(&self) -> TargetHospitalSavings {
        let annual_admissions = f64::from(self.beds) * ADMISSIONS_PER_BED;
        let baseline_hais = whole(annual_admissions * self.baseline_hai_rate);
        let hais_prevented = whole(baseline_hais * STUDY_OUTCOMES.hai_reduction_rate);

        let direct_savings = hais_prevented * KEY_METRICS.cost_per_hai;
        let days_saved = hais_prevented * KEY_METRICS.average_los_extension_days;
        let los_savings = days_saved * KEY_METRICS.cost_per_hospital_day;
        let lives_saved = whole(hais_prevented * KEY_METRICS.mortality_rate);
        let mortality_savings = lives_saved * KEY_METRICS.life_value;
        let outbreak_savings = whole(annual_outbreak_probability() * KEY_METRICS.outbreak_cost);

        TargetHospitalSavings {
            annual_admissions,
            baseline_hais,
            hais_prevented,
            direct_savings,
            days_saved,
            los_savings,
            lives_saved,
            mortality_savings,
            outbreak_savings,
            total_savings: direct_savings + los_savings + mortality_savings + outbreak_savings,
        }
    }
}

pub fn target_hospitals() -> [TargetHospital; 5] {
    let hospital = |name, beds, size, baseline_hai_rate| TargetHospital {
        name,
        beds,
        size,
        baseline_hai_rate,
    };
    [
        hospital("Boston VA Medical Center", 361, SizeClass::Large, 0.045),
        hospital("Seattle VA Medical Center", 358, SizeClass::Large, 0.042),
        hospital("Atlanta VA Medical Center", 339, SizeClass::Large, 0.048),
        hospital("Phoenix VA Medical Center", 267, SizeClass::Medium, 0.044),
        hospital("Minneapolis VA Medical Center", 279, SizeClass::Medium, 0.041),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_facility_annual_financials() {
        let annual = annual_financials_per_facility();
        assert_eq!(annual.implementation_cost, 165_000.0);
        assert_eq!(annual.annual_operating, 70_000.0);
        assert_eq!(annual.direct_savings, 1_125_000.0);
        assert_eq!(annual.outbreak_savings, 166_667.0);
        assert_eq!(annual.total_annual_savings, 1_979_167.0);
    }

    #[test]
    fn financial_impact_components_sum_to_study_totals() {
        let impact = financial_impact();
        assert_eq!(impact.implementation_total(), STUDY_FINANCIALS.implementation_total);
        assert_eq!(impact.operating_total(), STUDY_FINANCIALS.annual_operating);
        assert_eq!(impact.savings_total(), STUDY_FINANCIALS.total_benefits);
    }

    #[test]
    fn boston_annual_savings() {
        let boston = target_hospitals()[0].annual_savings();
        assert_eq!(boston.annual_admissions, 18_050.0);
        assert_eq!(boston.baseline_hais, 812.0);
        assert_eq!(boston.hais_prevented, 354.0);
        assert_eq!(boston.lives_saved, 17.0);
        assert_eq!(boston.outbreak_savings, 166_666.0);
        assert_eq!(boston.total_savings, 26_010_666.0);
    }

    #[test]
    fn minneapolis_annual_savings() {
        let minneapolis = target_hospitals()[4].annual_savings();
        assert_eq!(minneapolis.hais_prevented, 248.0);
        assert_eq!(minneapolis.total_savings, 18_294_666.0);
    }

    #[test]
    fn sensitivity_base_cases_come_from_study() {
        let table = sensitivity_table();
        assert!((table[0].base_case - 43.6).abs() < 1e-9);
        assert_eq!(table[2].base_case, 165_000.0);
        assert_eq!(table[3].impact, ImpactLevel::Low);
    }
}
