//! Pre-loaded results of the 8-facility PraediAlert study.
//!
//! The study ran 18 months pre and post implementation (December 2020 to
//! August 2024) against 117 control facilities. Everything here is static
//! reference data plus small derivations over it; the calculators read the
//! effect sizes from [`STUDY_OUTCOMES`] and [`KEY_METRICS`].

pub mod facilities;
pub mod financial;
pub mod methodology;

pub use facilities::{
    control_group, derived_comparisons, facility_summary, hai_types, ControlGroup,
    DerivedComparisons, FacilityOutcome, FacilityResult, FacilitySummary, HaiTypeResult,
    STUDY_FACILITIES,
};
pub use financial::{
    annual_financials_per_facility, financial_impact, sensitivity_table, target_hospitals,
    AnnualFinancials, CostItem, FinancialImpact, SensitivityRow, TargetHospital,
    TargetHospitalSavings,
};
pub use methodology::{methodology, MethodologySection, MethodologyStep};

use crate::core::SizeClass;
use serde::Serialize;

pub const STUDY_PERIOD: &str = "December 2020 - August 2024";
pub const STUDY_PERIOD_MONTHS: f64 = 18.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Headline outcomes over the full 18 months, all 8 facilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StudyOutcomes {
    pub facilities: u32,
    pub control_facilities: u32,
    pub hais_prevented: f64,
    /// Fraction, 0.436 = 43.6 %
    pub hai_reduction_rate: f64,
    /// Fraction better than the control group
    pub relative_improvement: f64,
    pub lives_saved: f64,
    pub hospital_days_saved: f64,
    pub outbreaks_detected: f64,
}

pub const STUDY_OUTCOMES: StudyOutcomes = StudyOutcomes {
    facilities: 8,
    control_facilities: 117,
    hais_prevented: 300.0,
    hai_reduction_rate: 0.436,
    relative_improvement: 0.181,
    lives_saved: 15.0,
    hospital_days_saved: 2250.0,
    outbreaks_detected: 2.0,
};

/// Cost and outcome constants used by every PraediAlert calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub cost_per_hai: f64,
    pub cost_per_hospital_day: f64,
    /// 7.5 days rounded up
    pub average_los_extension_days: f64,
    pub mortality_rate: f64,
    pub life_value: f64,
    pub outbreak_cost: f64,
}

pub const KEY_METRICS: KeyMetrics = KeyMetrics {
    cost_per_hai: 45_000.0,
    cost_per_hospital_day: 2_000.0,
    average_los_extension_days: 8.0,
    mortality_rate: 0.05,
    life_value: 250_000.0,
    outbreak_cost: 1_000_000.0,
};

/// Study totals over 18 months for all facilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StudyFinancials {
    pub implementation_total: f64,
    pub annual_operating: f64,
    pub direct_savings: f64,
    pub los_savings: f64,
    pub mortality_value: f64,
    pub outbreak_savings: f64,
    pub total_benefits: f64,
}

pub const STUDY_FINANCIALS: StudyFinancials = StudyFinancials {
    implementation_total: 1_320_000.0,
    annual_operating: 560_000.0,
    direct_savings: 13_500_000.0,
    los_savings: 4_500_000.0,
    mortality_value: 3_750_000.0,
    outbreak_savings: 2_000_000.0,
    total_benefits: 23_750_000.0,
};

/// Convert an 18-month figure to a yearly one, rounded to a whole number.
pub fn annualize(value_18_months: f64) -> f64 {
    (value_18_months * (MONTHS_PER_YEAR / STUDY_PERIOD_MONTHS)).round()
}

/// Split a study-wide total across the 8 facilities, rounded.
pub fn per_facility(total: f64) -> f64 {
    (total / f64::from(STUDY_OUTCOMES.facilities)).round()
}

/// Yearly chance that one facility detects an outbreak.
pub fn annual_outbreak_probability() -> f64 {
    let facility_years =
        f64::from(STUDY_OUTCOMES.facilities) * STUDY_PERIOD_MONTHS / MONTHS_PER_YEAR;
    STUDY_OUTCOMES.outbreaks_detected / facility_years
}

/// Per-facility yearly outcome rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualOutcomes {
    pub hais_prevented_per_facility: f64,
    pub lives_saved_per_facility: f64,
    pub hospital_days_saved_per_facility: f64,
    pub outbreak_detection_probability: f64,
}

pub fn annual_outcomes() -> AnnualOutcomes {
    let facilities = f64::from(STUDY_OUTCOMES.facilities);
    AnnualOutcomes {
        hais_prevented_per_facility: annualize(STUDY_OUTCOMES.hais_prevented / facilities),
        lives_saved_per_facility: annualize(STUDY_OUTCOMES.lives_saved / facilities),
        hospital_days_saved_per_facility: annualize(
            STUDY_OUTCOMES.hospital_days_saved / facilities,
        ),
        outbreak_detection_probability: annual_outbreak_probability(),
    }
}

/// Scaling applied when extrapolating study results to a facility size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeAdjustment {
    pub hai_multiplier: f64,
    pub cost_multiplier: f64,
    pub efficiency_multiplier: f64,
}

/// VISN21 is a network of mostly large facilities and uses the large row.
pub fn size_adjustment(size: SizeClass) -> SizeAdjustment {
    match size {
        SizeClass::Large | SizeClass::Visn21 => SizeAdjustment {
            hai_multiplier: 1.2,
            cost_multiplier: 1.1,
            efficiency_multiplier: 0.95,
        },
        SizeClass::Medium => SizeAdjustment {
            hai_multiplier: 1.0,
            cost_multiplier: 1.0,
            efficiency_multiplier: 1.0,
        },
        SizeClass::Small => SizeAdjustment {
            hai_multiplier: 0.8,
            cost_multiplier: 0.9,
            efficiency_multiplier: 1.05,
        },
    }
}
