//! Savings calculators.
//!
//! Each product is a fixed set of [`SavingsComponent`]s. [`calculate`] runs
//! every component for the selected product and folds the results into an
//! [`RoiResults`] with the product-level summary.

pub mod praedialert;
pub mod praedigene;

use crate::config::RoiInputs;
use crate::core::{CalculationModel, ComponentResult, Product, RoiResults, RoiSummary};
use crate::error::{Result, RoiError};
use crate::observability::{set_phase, ReportPhase};

pub use praedialert::{AntimicrobialStewardship, IpcSurveillance, RegulatoryReporting};
pub use praedigene::{Bias2015Pipeline, CytogeneticsPipeline, PgxPipeline, Tso500Pipeline};

/// One independently priced part of a product.
pub trait SavingsComponent {
    /// Stable identifier, matches the parameter key prefix
    fn key(&self) -> &'static str;
    fn title(&self) -> &'static str;
    fn calculate(&self, inputs: &RoiInputs) -> ComponentResult;
}

pub fn components_for(product: Product) -> Vec<Box<dyn SavingsComponent>> {
    match product {
        Product::PraediGene => vec![
            Box::new(PgxPipeline),
            Box::new(Tso500Pipeline),
            Box::new(Bias2015Pipeline),
            Box::new(CytogeneticsPipeline),
        ],
        Product::PraediAlert => vec![
            Box::new(IpcSurveillance),
            Box::new(AntimicrobialStewardship),
            Box::new(RegulatoryReporting),
        ],
    }
}

/// Whether totals are reported in whole dollars.
fn whole_dollars(inputs: &RoiInputs) -> bool {
    inputs.product == Product::PraediAlert && inputs.model == CalculationModel::Study
}

/// Run every component of the selected product.
///
/// # Errors
///
/// Returns [`RoiError::NonFinite`] when a component or the summary yields
/// NaN or infinity.
pub fn calculate(inputs: &RoiInputs) -> Result<RoiResults> {
    let _phase = set_phase(ReportPhase::Calculation);

    let components = components_for(inputs.product)
        .iter()
        .map(|component| {
            let result = component.calculate(inputs);
            tracing::debug!(
                component = component.key(),
                savings = result.total_savings,
                "component calculated"
            );
            ensure_finite(&result)?;
            Ok(result)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut total_savings: f64 = components.iter().map(|c| c.total_savings).sum();
    let mut financial = inputs.params.financial;
    if whole_dollars(inputs) {
        total_savings = total_savings.trunc();
        financial.implementation_cost = financial.implementation_cost.trunc();
        financial.annual_maintenance = financial.annual_maintenance.trunc();
        financial.staff_training = financial.staff_training.trunc();
    }

    let summary = RoiSummary::compute(total_savings, &financial);
    if !summary.roi_percent.is_finite() || !summary.total_savings.is_finite() {
        return Err(RoiError::NonFinite {
            component: "summary".into(),
        });
    }

    let clinical = (inputs.product == Product::PraediAlert)
        .then(|| praedialert::clinical_impact(inputs));

    tracing::info!(
        product = %inputs.product,
        total_savings = summary.total_savings,
        roi_percent = summary.roi_percent,
        "calculation complete"
    );

    Ok(RoiResults {
        product: inputs.product,
        organization: inputs.organization,
        model: inputs.model,
        components,
        summary,
        financial,
        clinical,
    })
}

fn ensure_finite(result: &ComponentResult) -> Result<()> {
    let breakdown_finite = result.breakdown.iter().all(|line| line.amount.is_finite());
    if result.total_savings.is_finite() && breakdown_finite {
        Ok(())
    } else {
        Err(RoiError::NonFinite {
            component: result.key.clone(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    pub fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-6 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::assert_close;
    use super::*;
    use crate::core::OrganizationType;

    fn alert(org: OrganizationType, model: CalculationModel) -> RoiResults {
        calculate(&RoiInputs::new(Product::PraediAlert, org).with_model(model)).unwrap()
    }

    #[test]
    fn component_keys_follow_product() {
        let keys: Vec<_> = components_for(Product::PraediGene)
            .iter()
            .map(|c| c.key())
            .collect();
        assert_eq!(keys, ["pgx", "tso500", "bias2015", "cytogenetics"]);
        let keys: Vec<_> = components_for(Product::PraediAlert)
            .iter()
            .map(|c| c.key())
            .collect();
        assert_eq!(keys, ["ipc", "stewardship", "regulatory"]);
    }

    #[test]
    fn visn21_study_totals() {
        let results = alert(OrganizationType::Visn21, CalculationModel::Study);
        assert_eq!(results.summary.total_savings, 5_154_200.0);
        assert_eq!(results.summary.total_investment, 1_435_000.0);
        assert_close(results.summary.roi_percent, 259.177_700_348_432);
        assert_close(results.summary.payback_months.unwrap(), 3.340_964_650_188);

        let clinical = results.clinical.unwrap();
        assert_eq!(clinical.hais_prevented, 27.0);
        assert_eq!(clinical.lives_saved, 1.0);
        assert_eq!(clinical.hospital_days_saved, 216.0);
    }

    #[test]
    fn medium_hospital_study_totals() {
        let results = alert(OrganizationType::MediumHospital, CalculationModel::Study);
        assert_eq!(results.component("ipc").unwrap().total_savings, 860_000.0);
        assert_eq!(results.component("stewardship").unwrap().total_savings, 1_281_000.0);
        assert_eq!(results.component("regulatory").unwrap().total_savings, 21_450.0);
        assert_eq!(results.summary.total_savings, 2_162_450.0);
        assert_eq!(results.summary.total_investment, 65_000.0);
    }

    #[test]
    fn medium_hospital_parametric_totals() {
        let results = alert(OrganizationType::MediumHospital, CalculationModel::Parametric);
        assert_close(results.component("ipc").unwrap().total_savings, 172_740.821_917_808);
        assert_close(results.component("stewardship").unwrap().total_savings, 1_221_750.0);
        assert_close(results.summary.total_savings, 1_415_940.821_917_808);
    }

    #[test]
    fn praediagene_has_no_clinical_summary() {
        let inputs = RoiInputs::new(Product::PraediGene, OrganizationType::MediumHospital);
        let results = calculate(&inputs).unwrap();
        assert!(results.clinical.is_none());
        assert_close(results.summary.total_savings, 6_304_856.0);
    }

    #[test]
    fn component_totals_match_breakdown() {
        for product in Product::ALL {
            for org in OrganizationType::ALL {
                let results = calculate(&RoiInputs::new(product, org)).unwrap();
                for component in &results.components {
                    assert_close(component.breakdown_total(), component.total_savings);
                }
            }
        }
    }

    #[test]
    fn nan_parameter_is_rejected() {
        let mut inputs = RoiInputs::new(Product::PraediAlert, OrganizationType::SmallHospital);
        inputs.params.alert.ipc.cost_per_hai = f64::NAN;
        let err = calculate(&inputs).unwrap_err();
        assert!(matches!(err, RoiError::NonFinite { component } if component == "ipc"));
    }
}
