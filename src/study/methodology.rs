//! Calculation methodology for the report appendix.
//!
//! Worked examples are rendered from the study constants so the appendix
//! cannot drift from the numbers the calculators use.

use super::facilities::{control_group, derived_comparisons, STUDY_POST_HAIS, STUDY_PRE_HAIS};
use super::{annualize, KEY_METRICS, STUDY_OUTCOMES};
use crate::formatting::{format_currency, format_number};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodologyStep {
    pub name: String,
    pub formula: String,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodologySection {
    pub title: String,
    pub steps: Vec<MethodologyStep>,
}

fn step(name: &str, formula: &str, example: String) -> MethodologyStep {
    MethodologyStep {
        name: name.to_string(),
        formula: formula.to_string(),
        example,
    }
}

fn hai_reduction() -> MethodologySection {
    let reduction = STUDY_PRE_HAIS - STUDY_POST_HAIS;
    MethodologySection {
        title: "HAI Reduction Rate".into(),
        steps: vec![
            step(
                "Absolute Reduction",
                "Reduction = Baseline HAIs - Post HAIs",
                format!("{STUDY_PRE_HAIS} - {STUDY_POST_HAIS} = {reduction} HAIs prevented"),
            ),
            step(
                "Percentage Reduction",
                "Reduction % = (Reduction / Baseline) x 100",
                format!(
                    "({reduction} / {STUDY_PRE_HAIS}) x 100 = {:.1}%",
                    reduction / STUDY_PRE_HAIS * 100.0
                ),
            ),
            step(
                "Annualization",
                "Annual Rate = (18-month value) x (12/18)",
                format!(
                    "{} HAIs x (12/18) = {} HAIs prevented annually",
                    STUDY_OUTCOMES.hais_prevented,
                    annualize(STUDY_OUTCOMES.hais_prevented)
                ),
            ),
        ],
    }
}

fn ipc_savings() -> MethodologySection {
    let m = KEY_METRICS;
    MethodologySection {
        title: "IPC Surveillance Savings".into(),
        steps: vec![
            step(
                "Baseline HAIs",
                "floor(Patient Days / 1000 x HAI Rate x 10)",
                "100,000 / 1000 x 4.5% x 10 = 45 HAIs".into(),
            ),
            step(
                "HAIs Prevented",
                "floor(Baseline HAIs x 43.6%)",
                "floor(45 x 0.436) = 19 HAIs".into(),
            ),
            step(
                "Direct Savings",
                "HAIs Prevented x Cost per HAI",
                format!("19 x {} = {}", format_currency(m.cost_per_hai), format_currency(19.0 * m.cost_per_hai)),
            ),
            step(
                "Length of Stay",
                "HAIs Prevented x LOS Extension x Cost per Day",
                format!(
                    "19 x {} days x {} = {}",
                    m.average_los_extension_days,
                    format_currency(m.cost_per_hospital_day),
                    format_currency(19.0 * m.average_los_extension_days * m.cost_per_hospital_day)
                ),
            ),
            step(
                "Mortality Value",
                "floor(HAIs Prevented x 5%) x Value of Life",
                format!("floor(19 x 0.05) = 0 lives x {}", format_currency(m.life_value)),
            ),
        ],
    }
}

fn roi_and_payback() -> MethodologySection {
    MethodologySection {
        title: "ROI and Payback".into(),
        steps: vec![
            step(
                "Total Investment",
                "Implementation + Annual Maintenance + Training",
                "$50,000 + $10,000 + $5,000 = $65,000".into(),
            ),
            step(
                "ROI",
                "ROI = ((Total Savings - Total Investment) / Total Investment) x 100",
                "(($2,162,450 - $65,000) / $65,000) x 100 = 3,226.8%".into(),
            ),
            step(
                "Payback Period",
                "Payback Months = Total Investment / (Annual Savings / 12)",
                "$65,000 / ($2,162,450 / 12) = 0.4 months".into(),
            ),
        ],
    }
}

fn intervention_vs_control() -> MethodologySection {
    let control = control_group();
    let derived = derived_comparisons();
    MethodologySection {
        title: "Intervention vs Control".into(),
        steps: vec![
            step(
                "Intervention Group Change",
                "(Post - Pre) / Pre x 100",
                format!(
                    "({STUDY_POST_HAIS} - {STUDY_PRE_HAIS}) / {STUDY_PRE_HAIS} x 100 = {:.1}%",
                    derived.intervention_change
                ),
            ),
            step(
                "Control Group Change",
                "(Post - Pre) / Pre x 100",
                format!(
                    "({} - {}) / {} x 100 = {:.1}%",
                    format_number(control.post_hais),
                    format_number(control.pre_hais),
                    format_number(control.pre_hais),
                    derived.control_change
                ),
            ),
            step(
                "Difference-in-Differences",
                "Intervention Change - Control Change",
                format!(
                    "{:.1}% - ({:.1}%) = {:.1} percentage points",
                    derived.intervention_change,
                    derived.control_change,
                    derived.difference_in_differences
                ),
            ),
            step(
                "Relative Improvement",
                "(DiD / Control Change) x 100",
                format!("{:.0}% better than control", derived.relative_improvement),
            ),
        ],
    }
}

fn outbreak_value() -> MethodologySection {
    MethodologySection {
        title: "Outbreak Detection Value".into(),
        steps: vec![step(
            "Annual Probability",
            "Outbreaks / (Facilities x Years)",
            format!(
                "{} / ({} x 1.5) = {:.3}",
                STUDY_OUTCOMES.outbreaks_detected,
                STUDY_OUTCOMES.facilities,
                super::annual_outbreak_probability()
            ),
        )],
    }
}

pub fn methodology() -> Vec<MethodologySection> {
    vec![
        hai_reduction(),
        ipc_savings(),
        roi_and_payback(),
        intervention_vs_control(),
        outbreak_value(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_has_steps() {
        let sections = methodology();
        assert_eq!(sections.len(), 5);
        assert!(sections.iter().all(|s| !s.steps.is_empty()));
    }

    #[test]
    fn examples_use_study_numbers() {
        let sections = methodology();
        let reduction = &sections[0].steps[1];
        assert_eq!(reduction.example, "(300 / 688) x 100 = 43.6%");
        let did = &sections[3].steps[2];
        assert!(did.example.ends_with("-16.0 percentage points"), "{}", did.example);
    }
}
