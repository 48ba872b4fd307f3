//! One-at-a-time sensitivity of ROI to each input (tornado data).

use crate::calculators::calculate;
use crate::config::{specs_for, ParameterSpec, RoiInputs};
use crate::error::Result;
use crate::observability::{set_phase, ReportPhase};
use serde::Serialize;

/// Relative perturbation applied in each direction.
pub const SENSITIVITY_STEP: f64 = 0.10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub base_value: f64,
    pub low_value: f64,
    pub high_value: f64,
    pub low_savings: f64,
    pub high_savings: f64,
    pub low_roi: f64,
    pub high_roi: f64,
    /// Absolute ROI difference between the two runs, percentage points
    pub swing: f64,
}

fn perturbed(inputs: &RoiInputs, spec: &ParameterSpec, value: f64) -> Result<(f64, f64)> {
    let mut inputs = inputs.clone();
    inputs.params.apply_override(spec.key, value)?;
    let results = calculate(&inputs)?;
    Ok((results.summary.total_savings, results.summary.roi_percent))
}

/// Perturb every parameter of the product by ±10 % and rank by ROI swing,
/// largest first. Parameters with no effect on the selected model stay in
/// the list with zero swing.
pub fn sensitivity(inputs: &RoiInputs) -> Result<Vec<SensitivityEntry>> {
    let _phase = set_phase(ReportPhase::Analysis);

    let mut entries = specs_for(inputs.product)
        .map(|spec| {
            let base_value = inputs.params.get(spec.key)?;
            let low_value = base_value * (1.0 - SENSITIVITY_STEP);
            let high_value = base_value * (1.0 + SENSITIVITY_STEP);
            let (low_savings, low_roi) = perturbed(inputs, spec, low_value)?;
            let (high_savings, high_roi) = perturbed(inputs, spec, high_value)?;
            Ok(SensitivityEntry {
                key: spec.key,
                label: spec.label,
                base_value,
                low_value,
                high_value,
                low_savings,
                high_savings,
                low_roi,
                high_roi,
                swing: (high_roi - low_roi).abs(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    entries.sort_by(|a, b| b.swing.total_cmp(&a.swing));
    tracing::debug!(parameters = entries.len(), "sensitivity analysis complete");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalculationModel, OrganizationType, Product};

    #[test]
    fn entries_are_sorted_by_swing() {
        let inputs = RoiInputs::new(Product::PraediGene, OrganizationType::MediumHospital);
        let entries = sensitivity(&inputs).unwrap();
        assert!(!entries.is_empty());
        assert!(entries.windows(2).all(|w| w[0].swing >= w[1].swing));
    }

    #[test]
    fn covers_product_and_financial_parameters() {
        let inputs = RoiInputs::new(Product::PraediAlert, OrganizationType::LargeHospital);
        let entries = sensitivity(&inputs).unwrap();
        assert!(entries.iter().any(|e| e.key == "ipc.cost_per_hai"));
        assert!(entries.iter().any(|e| e.key == "financial.implementation_cost"));
        assert!(entries.iter().all(|e| !e.key.starts_with("pgx.")));
    }

    #[test]
    fn study_model_ignores_reduction_target() {
        let inputs = RoiInputs::new(Product::PraediAlert, OrganizationType::LargeHospital)
            .with_model(CalculationModel::Study);
        let entries = sensitivity(&inputs).unwrap();
        let target = entries
            .iter()
            .find(|e| e.key == "ipc.reduction_target")
            .unwrap();
        assert_eq!(target.swing, 0.0);
    }

    #[test]
    fn investment_moves_roi_the_other_way() {
        let inputs = RoiInputs::new(Product::PraediAlert, OrganizationType::MediumHospital);
        let entries = sensitivity(&inputs).unwrap();
        let implementation = entries
            .iter()
            .find(|e| e.key == "financial.implementation_cost")
            .unwrap();
        assert!(implementation.high_roi < implementation.low_roi);
        assert_eq!(implementation.low_savings, implementation.high_savings);
    }
}
