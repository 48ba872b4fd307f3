//! PraediGene genetic-testing pipelines: PGx, TSO500, BIAS2015 and
//! Cytogenetics.

use super::SavingsComponent;
use crate::config::{
    Bias2015Params, CytogeneticsParams, PgxParams, RoiInputs, TestCosts, Tso500Params,
};
use crate::core::{ComponentResult, Metric, MetricValue, SavingsLine};
use serde::Serialize;

const BASELINE_ADR_RATE: f64 = 0.12;
const READMISSION_COST: f64 = 12_000.0;
const MEDICATION_VALUE_PER_PATIENT: f64 = 50.0;

const TSO500_IN_HOUSE_TURNAROUND_DAYS: f64 = 14.0;
const TSO500_OUTSOURCED_TURNAROUND_DAYS: f64 = 21.0;
const TSO500_ACTIONABLE_RATE: f64 = 0.28;
const TREATMENT_VALUE_CAPTURE: f64 = 0.3;
const TRIAL_ELIGIBLE_RATE: f64 = 0.15;
const TRIAL_ENROLLMENT_VALUE: f64 = 25_000.0;

const BIAS_BASELINE_TURNAROUND_DAYS: f64 = 14.0;
const BIAS_TURNAROUND_IMPROVEMENT: f64 = 0.35;
const BIAS_ACTIONABLE_RATE: f64 = 0.22;
const BIAS_FINDING_VALUE: f64 = 15_000.0;
const BIAS_RESEARCH_VALUE_PER_TEST: f64 = 500.0;

const RERUN_RATE_MANUAL: f64 = 0.08;
const RERUN_RATE_AUTOMATED: f64 = 0.02;
const AUTOMATION_HOUR_REDUCTION: f64 = 0.6;
const HOURS_PER_FTE_DAY: f64 = 8.0;
const QUALITY_VALUE_PER_CASE: f64 = 100.0;

fn pipeline_roi(savings: f64, spend: f64) -> f64 {
    if spend > 0.0 {
        savings / spend * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PgxOutcome {
    pub volume: f64,
    pub in_house_cost: f64,
    pub outsource_cost: f64,
    pub cost_savings: f64,
    pub adrs_avoided: f64,
    pub adr_savings: f64,
    pub readmissions_prevented: f64,
    pub readmission_savings: f64,
    pub medication_savings: f64,
    pub total_savings: f64,
    pub roi_percent: f64,
}

pub fn pgx(params: &PgxParams, costs: &TestCosts) -> PgxOutcome {
    let volume = params.annual_volume;
    let impact = params.patient_impact / 100.0;

    let in_house_cost = volume * costs.pgx_in_house;
    let outsource_cost = volume * costs.pgx_outsourced;
    let cost_savings = outsource_cost - in_house_cost;

    let adrs_avoided = volume * BASELINE_ADR_RATE * impact;
    let adr_savings = adrs_avoided * params.adr_cost;
    let readmissions_prevented = adrs_avoided * (params.readmission_rate / 100.0);
    let readmission_savings = readmissions_prevented * READMISSION_COST;
    let medication_savings = volume * MEDICATION_VALUE_PER_PATIENT * impact;

    let total_savings = cost_savings + adr_savings + readmission_savings + medication_savings;
    PgxOutcome {
        volume,
        in_house_cost,
        outsource_cost,
        cost_savings,
        adrs_avoided,
        adr_savings,
        readmissions_prevented,
        readmission_savings,
        medication_savings,
        total_savings,
        roi_percent: pipeline_roi(total_savings, in_house_cost),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tso500Outcome {
    pub volume: f64,
    pub in_house_cost: f64,
    pub outsource_cost: f64,
    pub cost_savings: f64,
    pub time_saved_days: f64,
    pub time_savings_value: f64,
    pub actionable_variants: f64,
    pub successful_treatments: f64,
    pub treatment_value: f64,
    pub trial_enrollment: f64,
    pub trial_value: f64,
    pub total_savings: f64,
    pub roi_percent: f64,
}

pub fn tso500(params: &Tso500Params, costs: &TestCosts) -> Tso500Outcome {
    let volume = params.annual_volume;

    let in_house_cost = volume * costs.tso500_in_house;
    let outsource_cost = volume * costs.tso500_outsourced;
    let cost_savings = outsource_cost - in_house_cost;

    let time_saved_days =
        volume * (TSO500_OUTSOURCED_TURNAROUND_DAYS - TSO500_IN_HOUSE_TURNAROUND_DAYS);
    let time_savings_value = time_saved_days * params.fte_daily_cost;

    let actionable_variants = volume * TSO500_ACTIONABLE_RATE;
    let successful_treatments = actionable_variants * (params.treatment_success / 100.0);
    let treatment_value = successful_treatments * params.treatment_cost * TREATMENT_VALUE_CAPTURE;

    let trial_enrollment = actionable_variants * TRIAL_ELIGIBLE_RATE;
    let trial_value = trial_enrollment * TRIAL_ENROLLMENT_VALUE;

    let total_savings = cost_savings + time_savings_value + treatment_value + trial_value;
    Tso500Outcome {
        volume,
        in_house_cost,
        outsource_cost,
        cost_savings,
        time_saved_days,
        time_savings_value,
        actionable_variants,
        successful_treatments,
        treatment_value,
        trial_enrollment,
        trial_value,
        total_savings,
        roi_percent: pipeline_roi(total_savings, in_house_cost),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bias2015Outcome {
    pub volume: f64,
    pub total_cost: f64,
    /// Whole-number score actually applied
    pub benefit_score: f64,
    pub time_saved_days: f64,
    pub time_savings_value: f64,
    pub actionable_findings: f64,
    pub clinical_value: f64,
    pub research_value: f64,
    pub total_savings: f64,
    pub roi_percent: f64,
}

pub fn bias2015(params: &Bias2015Params, costs: &TestCosts) -> Bias2015Outcome {
    let volume = params.annual_tests;
    // The score is a whole-number scale: 8.5 scores as 8.
    let benefit_score = params.patient_benefit.trunc();
    let benefit = benefit_score / 10.0;

    let total_cost = volume * costs.bias2015_per_test;

    let time_saved_days = volume * BIAS_BASELINE_TURNAROUND_DAYS * BIAS_TURNAROUND_IMPROVEMENT;
    let time_savings_value = time_saved_days * params.fte_daily_cost * benefit;

    let actionable_findings = volume * BIAS_ACTIONABLE_RATE;
    let clinical_value = actionable_findings * BIAS_FINDING_VALUE * benefit;
    let research_value = volume * BIAS_RESEARCH_VALUE_PER_TEST;

    let total_savings = time_savings_value + clinical_value + research_value;
    Bias2015Outcome {
        volume,
        total_cost,
        benefit_score,
        time_saved_days,
        time_savings_value,
        actionable_findings,
        clinical_value,
        research_value,
        total_savings,
        roi_percent: pipeline_roi(total_savings, total_cost),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CytogeneticsOutcome {
    pub volume: f64,
    pub in_house_cost: f64,
    pub outsource_cost: f64,
    pub cost_savings: f64,
    pub reruns_prevented: f64,
    pub rerun_savings: f64,
    pub hours_saved: f64,
    pub labor_savings: f64,
    pub quality_value: f64,
    pub total_savings: f64,
    pub roi_percent: f64,
}

pub fn cytogenetics(params: &CytogeneticsParams, costs: &TestCosts) -> CytogeneticsOutcome {
    let volume = params.annual_volume;

    let in_house_cost = volume * costs.cytogenetics_in_house;
    let outsource_cost = volume * costs.cytogenetics_outsourced;
    let cost_savings = outsource_cost - in_house_cost;

    let reruns_prevented = volume * (RERUN_RATE_MANUAL - RERUN_RATE_AUTOMATED);
    let rerun_savings = reruns_prevented * params.rerun_cost;

    let manual_hours = volume * params.tech_time;
    let hours_saved = manual_hours * AUTOMATION_HOUR_REDUCTION;
    let labor_savings = hours_saved / HOURS_PER_FTE_DAY * params.fte_daily_cost;

    let quality_value = volume * QUALITY_VALUE_PER_CASE;

    let total_savings = cost_savings + rerun_savings + labor_savings + quality_value;
    CytogeneticsOutcome {
        volume,
        in_house_cost,
        outsource_cost,
        cost_savings,
        reruns_prevented,
        rerun_savings,
        hours_saved,
        labor_savings,
        quality_value,
        total_savings,
        roi_percent: pipeline_roi(total_savings, in_house_cost),
    }
}

pub struct PgxPipeline;
pub struct Tso500Pipeline;
pub struct Bias2015Pipeline;
pub struct CytogeneticsPipeline;

impl SavingsComponent for PgxPipeline {
    fn key(&self) -> &'static str {
        "pgx"
    }

    fn title(&self) -> &'static str {
        "PGx Pipeline"
    }

    fn calculate(&self, inputs: &RoiInputs) -> ComponentResult {
        let o = pgx(&inputs.params.gene.pgx, &inputs.test_costs);
        ComponentResult {
            key: self.key().into(),
            title: self.title().into(),
            total_savings: o.total_savings,
            roi_percent: Some(o.roi_percent),
            headline: Metric::count("ADRs Avoided", o.adrs_avoided),
            metrics: vec![
                Metric::count("Annual Tests", o.volume),
                Metric::currency("In-House Cost", o.in_house_cost),
                Metric::currency("Outsourced Cost", o.outsource_cost),
                Metric::count("Readmissions Prevented", o.readmissions_prevented),
                Metric::percent("Patient Impact", inputs.params.gene.pgx.patient_impact),
                Metric::percent("Pipeline ROI", o.roi_percent),
            ],
            breakdown: vec![
                SavingsLine::new("Testing Cost Savings", o.cost_savings),
                SavingsLine::new("ADR Avoidance", o.adr_savings),
                SavingsLine::new("Readmission Reduction", o.readmission_savings),
                SavingsLine::new("Medication Optimization", o.medication_savings),
            ],
        }
    }
}

impl SavingsComponent for Tso500Pipeline {
    fn key(&self) -> &'static str {
        "tso500"
    }

    fn title(&self) -> &'static str {
        "TSO500 Pipeline"
    }

    fn calculate(&self, inputs: &RoiInputs) -> ComponentResult {
        let o = tso500(&inputs.params.gene.tso500, &inputs.test_costs);
        ComponentResult {
            key: self.key().into(),
            title: self.title().into(),
            total_savings: o.total_savings,
            roi_percent: Some(o.roi_percent),
            headline: Metric::count("Actionable Variants", o.actionable_variants),
            metrics: vec![
                Metric::count("Annual Tests", o.volume),
                Metric::currency("In-House Cost", o.in_house_cost),
                Metric::new("Turnaround Days Saved", MetricValue::Days(o.time_saved_days)),
                Metric::count("Successful Treatments", o.successful_treatments),
                Metric::count("Trial Enrollments", o.trial_enrollment),
                Metric::percent("Pipeline ROI", o.roi_percent),
            ],
            breakdown: vec![
                SavingsLine::new("Testing Cost Savings", o.cost_savings),
                SavingsLine::new("Turnaround Time Value", o.time_savings_value),
                SavingsLine::new("Targeted Treatment Value", o.treatment_value),
                SavingsLine::new("Clinical Trial Value", o.trial_value),
            ],
        }
    }
}

impl SavingsComponent for Bias2015Pipeline {
    fn key(&self) -> &'static str {
        "bias2015"
    }

    fn title(&self) -> &'static str {
        "BIAS2015 Pipeline"
    }

    fn calculate(&self, inputs: &RoiInputs) -> ComponentResult {
        let o = bias2015(&inputs.params.gene.bias2015, &inputs.test_costs);
        ComponentResult {
            key: self.key().into(),
            title: self.title().into(),
            total_savings: o.total_savings,
            roi_percent: Some(o.roi_percent),
            headline: Metric::count("Actionable Findings", o.actionable_findings),
            metrics: vec![
                Metric::count("Annual Tests", o.volume),
                Metric::currency("Total Test Cost", o.total_cost),
                Metric::new("Benefit Score", MetricValue::Count(o.benefit_score)),
                Metric::new("Turnaround Days Saved", MetricValue::Days(o.time_saved_days)),
                Metric::percent("Pipeline ROI", o.roi_percent),
            ],
            breakdown: vec![
                SavingsLine::new("Turnaround Time Value", o.time_savings_value),
                SavingsLine::new("Clinical Value", o.clinical_value),
                SavingsLine::new("Research Value", o.research_value),
            ],
        }
    }
}

impl SavingsComponent for CytogeneticsPipeline {
    fn key(&self) -> &'static str {
        "cytogenetics"
    }

    fn title(&self) -> &'static str {
        "Cytogenetics Pipeline"
    }

    fn calculate(&self, inputs: &RoiInputs) -> ComponentResult {
        let o = cytogenetics(&inputs.params.gene.cytogenetics, &inputs.test_costs);
        ComponentResult {
            key: self.key().into(),
            title: self.title().into(),
            total_savings: o.total_savings,
            roi_percent: Some(o.roi_percent),
            headline: Metric::count("Reruns Prevented", o.reruns_prevented),
            metrics: vec![
                Metric::count("Annual Cases", o.volume),
                Metric::currency("In-House Cost", o.in_house_cost),
                Metric::new("Technician Hours Saved", MetricValue::Hours(o.hours_saved)),
                Metric::percent("Pipeline ROI", o.roi_percent),
            ],
            breakdown: vec![
                SavingsLine::new("Testing Cost Savings", o.cost_savings),
                SavingsLine::new("Rerun Reduction", o.rerun_savings),
                SavingsLine::new("Labor Automation", o.labor_savings),
                SavingsLine::new("Quality Improvement", o.quality_value),
            ],
        }
    }
}
