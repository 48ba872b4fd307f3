//! PraediAlert modules: IPC surveillance, antimicrobial stewardship and
//! regulatory reporting.
//!
//! The study model applies the effect sizes observed across the 8-facility
//! study and counts whole events and dollars. The parametric model uses the
//! configured reduction targets and, when facility data is loaded, the
//! measured HAI rate, bed days and DOT rate.

use super::SavingsComponent;
use crate::config::{FacilityInputs, IpcParams, RegulatoryParams, RoiInputs, StewardshipParams};
use crate::core::{
    whole, CalculationModel, ClinicalImpact, ComponentResult, Metric, MetricValue, SavingsLine,
};
use crate::study::{KEY_METRICS, STUDY_OUTCOMES};
use serde::Serialize;

/// Yearly chance of catching an outbreak: 2 outbreaks across 8 facilities.
const OUTBREAK_PROBABILITY: f64 = 0.25;
const EARLY_DETECTION_RATE: f64 = 0.4;
const EARLY_DETECTION_COST_SHARE: f64 = 0.3;

const STUDY_OPTIMIZATION_RATE: f64 = 0.25;
const CDIFF_CASES_PER_10K_DOT: f64 = 15.0;
const CDIFF_CASE_COST: f64 = 15_000.0;
/// Share of the DOT reduction that carries over to C. diff reduction
const CDIFF_REDUCTION_SHARE: f64 = 0.5;

const ACCURACY_VALUE_PER_REPORT: f64 = 50.0;
const COMPLIANCE_VALUE_PER_REPORT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IpcOutcome {
    pub annual_patient_days: f64,
    /// Percent
    pub hai_rate: f64,
    pub baseline_hais: f64,
    pub hais_prevented: f64,
    /// Percent
    pub reduction_percent: f64,
    pub prevention_savings: f64,
    pub early_detection_savings: f64,
    pub los_days_saved: f64,
    pub los_savings: f64,
    pub lives_saved: f64,
    pub mortality_value: f64,
    pub outbreak_savings: f64,
    pub total_savings: f64,
}

pub fn ipc_study(params: &IpcParams) -> IpcOutcome {
    let reduction_percent = STUDY_OUTCOMES.hai_reduction_rate * 100.0;
    let baseline_hais =
        whole((params.annual_patient_days / 1000.0) * (params.hai_incidence_rate / 100.0) * 10.0);
    let hais_prevented = whole(baseline_hais * (reduction_percent / 100.0));

    let prevention_savings = hais_prevented * params.cost_per_hai;
    let los_days_saved = hais_prevented * KEY_METRICS.average_los_extension_days;
    let los_savings = los_days_saved * KEY_METRICS.cost_per_hospital_day;
    let lives_saved = whole(hais_prevented * KEY_METRICS.mortality_rate);
    let mortality_value = lives_saved * KEY_METRICS.life_value;
    let outbreak_savings = whole(OUTBREAK_PROBABILITY * KEY_METRICS.outbreak_cost);

    IpcOutcome {
        annual_patient_days: params.annual_patient_days,
        hai_rate: params.hai_incidence_rate,
        baseline_hais,
        hais_prevented,
        reduction_percent,
        prevention_savings,
        early_detection_savings: 0.0,
        los_days_saved,
        los_savings,
        lives_saved,
        mortality_value,
        outbreak_savings,
        total_savings: prevention_savings + los_savings + mortality_value + outbreak_savings,
    }
}

pub fn ipc_parametric(params: &IpcParams, facility: &FacilityInputs) -> IpcOutcome {
    let hai_rate = facility.cdi_rate.unwrap_or(params.hai_incidence_rate);
    let annual_patient_days = facility.total_bed_days.unwrap_or(params.annual_patient_days);

    let baseline_hais = (hai_rate / 100.0) * (annual_patient_days / 365.0);
    let hais_prevented = baseline_hais * (params.reduction_target / 100.0);
    let prevention_savings = hais_prevented * params.cost_per_hai;
    let early_detection_savings =
        baseline_hais * EARLY_DETECTION_RATE * (params.cost_per_hai * EARLY_DETECTION_COST_SHARE);

    IpcOutcome {
        annual_patient_days,
        hai_rate,
        baseline_hais,
        hais_prevented,
        reduction_percent: params.reduction_target,
        prevention_savings,
        early_detection_savings,
        los_days_saved: hais_prevented * KEY_METRICS.average_los_extension_days,
        los_savings: 0.0,
        lives_saved: hais_prevented * KEY_METRICS.mortality_rate,
        mortality_value: 0.0,
        outbreak_savings: 0.0,
        total_savings: prevention_savings + early_detection_savings,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StewardshipOutcome {
    pub annual_dot: f64,
    pub current_cost: f64,
    pub dot_reduced: f64,
    /// Percent
    pub dot_reduction_percent: f64,
    pub dot_savings: f64,
    pub optimization_savings: f64,
    pub cdiff_cases_prevented: f64,
    pub cdiff_savings: f64,
    pub total_savings: f64,
}

pub fn stewardship_study(params: &StewardshipParams) -> StewardshipOutcome {
    let annual_dot = params.annual_dot;
    let reduction = params.dot_reduction_target / 100.0;

    let current_cost = annual_dot * params.cost_per_dot;
    let dot_reduced = whole(annual_dot * reduction);
    let dot_savings = dot_reduced * params.cost_per_dot;
    let optimization_savings = whole(current_cost * STUDY_OPTIMIZATION_RATE);
    let cdiff_cases_prevented = whole((annual_dot / 10_000.0) * reduction * CDIFF_CASES_PER_10K_DOT);
    let cdiff_savings = cdiff_cases_prevented * CDIFF_CASE_COST;

    StewardshipOutcome {
        annual_dot,
        current_cost,
        dot_reduced,
        dot_reduction_percent: params.dot_reduction_target,
        dot_savings,
        optimization_savings,
        cdiff_cases_prevented,
        cdiff_savings,
        total_savings: dot_savings + optimization_savings + cdiff_savings,
    }
}

pub fn stewardship_parametric(
    params: &StewardshipParams,
    facility: &FacilityInputs,
) -> StewardshipOutcome {
    let annual_dot = facility.annual_dot().unwrap_or(params.annual_dot);

    let current_cost = annual_dot * params.cost_per_dot;
    let dot_reduced = annual_dot * (params.dot_reduction_target / 100.0);
    let dot_savings = dot_reduced * params.cost_per_dot;
    let optimization_savings = current_cost * (params.antibiotic_cost_reduction / 100.0);

    let cdiff_reduction = params.dot_reduction_target * CDIFF_REDUCTION_SHARE;
    let cdiff_cases_prevented =
        (annual_dot / 10_000.0) * (cdiff_reduction / 100.0) * CDIFF_CASES_PER_10K_DOT;
    let cdiff_savings = cdiff_cases_prevented * CDIFF_CASE_COST;

    StewardshipOutcome {
        annual_dot,
        current_cost,
        dot_reduced,
        dot_reduction_percent: params.dot_reduction_target,
        dot_savings,
        optimization_savings,
        cdiff_cases_prevented,
        cdiff_savings,
        total_savings: dot_savings + optimization_savings + cdiff_savings,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegulatoryOutcome {
    pub reports_per_year: f64,
    pub hours_per_report: f64,
    pub manual_hours: f64,
    pub hours_saved: f64,
    pub labor_savings: f64,
    pub accuracy_value: f64,
    pub compliance_value: f64,
    pub total_savings: f64,
}

/// `whole_hours` counts saved hours as whole hours (study model).
pub fn regulatory(params: &RegulatoryParams, whole_hours: bool) -> RegulatoryOutcome {
    let manual_hours = params.reports_per_year * params.hours_per_report;
    let saved = manual_hours * (params.automation_efficiency / 100.0);
    let hours_saved = if whole_hours { whole(saved) } else { saved };
    let labor_savings = hours_saved * params.hourly_labor_cost;
    let accuracy_value = params.reports_per_year * ACCURACY_VALUE_PER_REPORT;
    let compliance_value = params.reports_per_year * COMPLIANCE_VALUE_PER_REPORT;

    RegulatoryOutcome {
        reports_per_year: params.reports_per_year,
        hours_per_report: params.hours_per_report,
        manual_hours,
        hours_saved,
        labor_savings,
        accuracy_value,
        compliance_value,
        total_savings: labor_savings + accuracy_value + compliance_value,
    }
}

pub fn ipc(inputs: &RoiInputs) -> IpcOutcome {
    match inputs.model {
        CalculationModel::Study => ipc_study(&inputs.params.alert.ipc),
        CalculationModel::Parametric => ipc_parametric(&inputs.params.alert.ipc, &inputs.facility),
    }
}

pub fn stewardship(inputs: &RoiInputs) -> StewardshipOutcome {
    match inputs.model {
        CalculationModel::Study => stewardship_study(&inputs.params.alert.stewardship),
        CalculationModel::Parametric => {
            stewardship_parametric(&inputs.params.alert.stewardship, &inputs.facility)
        }
    }
}

pub fn clinical_impact(inputs: &RoiInputs) -> ClinicalImpact {
    let outcome = ipc(inputs);
    ClinicalImpact {
        hais_prevented: outcome.hais_prevented,
        lives_saved: outcome.lives_saved,
        hospital_days_saved: outcome.los_days_saved,
    }
}

pub struct IpcSurveillance;
pub struct AntimicrobialStewardship;
pub struct RegulatoryReporting;

impl SavingsComponent for IpcSurveillance {
    fn key(&self) -> &'static str {
        "ipc"
    }

    fn title(&self) -> &'static str {
        "IPC Surveillance"
    }

    fn calculate(&self, inputs: &RoiInputs) -> ComponentResult {
        let o = ipc(inputs);
        let mut breakdown = vec![SavingsLine::new("Direct HAI Prevention", o.prevention_savings)];
        match inputs.model {
            CalculationModel::Study => breakdown.extend([
                SavingsLine::new("Length-of-Stay Reduction", o.los_savings),
                SavingsLine::new("Mortality Prevention Value", o.mortality_value),
                SavingsLine::new("Outbreak Prevention", o.outbreak_savings),
            ]),
            CalculationModel::Parametric => breakdown.push(SavingsLine::new(
                "Early Detection",
                o.early_detection_savings,
            )),
        }

        ComponentResult {
            key: self.key().into(),
            title: self.title().into(),
            total_savings: o.total_savings,
            roi_percent: None,
            headline: Metric::count("HAIs Prevented", o.hais_prevented),
            metrics: vec![
                Metric::count("Annual Patient Days", o.annual_patient_days),
                Metric::new("HAI Rate", MetricValue::Percent(o.hai_rate)),
                Metric::count("Baseline HAIs", o.baseline_hais),
                Metric::percent("Reduction Rate", o.reduction_percent),
                Metric::count("Lives Saved", o.lives_saved),
                Metric::new("Hospital Days Saved", MetricValue::Days(o.los_days_saved)),
            ],
            breakdown,
        }
    }
}

impl SavingsComponent for AntimicrobialStewardship {
    fn key(&self) -> &'static str {
        "stewardship"
    }

    fn title(&self) -> &'static str {
        "Antimicrobial Stewardship"
    }

    fn calculate(&self, inputs: &RoiInputs) -> ComponentResult {
        let o = stewardship(inputs);
        ComponentResult {
            key: self.key().into(),
            title: self.title().into(),
            total_savings: o.total_savings,
            roi_percent: None,
            headline: Metric::count("DOT Reduced", o.dot_reduced),
            metrics: vec![
                Metric::count("Annual DOT", o.annual_dot),
                Metric::currency("Current Antibiotic Cost", o.current_cost),
                Metric::percent("DOT Reduction", o.dot_reduction_percent),
                Metric::count("C. diff Cases Prevented", o.cdiff_cases_prevented),
            ],
            breakdown: vec![
                SavingsLine::new("DOT Reduction", o.dot_savings),
                SavingsLine::new("Selection Optimization", o.optimization_savings),
                SavingsLine::new("C. diff Prevention", o.cdiff_savings),
            ],
        }
    }
}

impl SavingsComponent for RegulatoryReporting {
    fn key(&self) -> &'static str {
        "regulatory"
    }

    fn title(&self) -> &'static str {
        "Regulatory Reporting"
    }

    fn calculate(&self, inputs: &RoiInputs) -> ComponentResult {
        let whole_hours = inputs.model == CalculationModel::Study;
        let o = regulatory(&inputs.params.alert.regulatory, whole_hours);
        ComponentResult {
            key: self.key().into(),
            title: self.title().into(),
            total_savings: o.total_savings,
            roi_percent: None,
            headline: Metric::new("Hours Saved", MetricValue::Hours(o.hours_saved)),
            metrics: vec![
                Metric::count("Reports per Year", o.reports_per_year),
                Metric::new("Manual Hours", MetricValue::Hours(o.manual_hours)),
                Metric::percent(
                    "Automation Efficiency",
                    inputs.params.alert.regulatory.automation_efficiency,
                ),
            ],
            breakdown: vec![
                SavingsLine::new("Labor Savings", o.labor_savings),
                SavingsLine::new("Accuracy Improvement", o.accuracy_value),
                SavingsLine::new("Compliance Risk Reduction", o.compliance_value),
            ],
        }
    }
}
