//! Conservative, expected and optimistic savings scenarios.

use crate::core::{payback_months, roi_percent, RoiResults};
use serde::Serialize;

pub const SCENARIO_FACTORS: [(&str, f64); 3] =
    [("Conservative", 0.7), ("Expected", 1.0), ("Optimistic", 1.3)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub name: &'static str,
    pub factor: f64,
    pub annual_savings: f64,
    pub total_investment: f64,
    pub net_benefit: f64,
    pub roi_percent: f64,
    pub payback_months: Option<f64>,
}

/// Scale total savings by each factor and recompute ROI and payback
/// against the unchanged investment.
pub fn scenarios(results: &RoiResults) -> Vec<Scenario> {
    let investment = results.summary.total_investment;
    SCENARIO_FACTORS
        .iter()
        .map(|&(name, factor)| {
            let annual_savings = results.summary.total_savings * factor;
            Scenario {
                name,
                factor,
                annual_savings,
                total_investment: investment,
                net_benefit: annual_savings - investment,
                roi_percent: roi_percent(annual_savings, investment),
                payback_months: payback_months(annual_savings, investment),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::calculate;
    use crate::config::RoiInputs;
    use crate::core::{OrganizationType, Product};

    #[test]
    fn expected_scenario_matches_summary() {
        let inputs = RoiInputs::new(Product::PraediAlert, OrganizationType::Visn21);
        let results = calculate(&inputs).unwrap();
        let all = scenarios(&results);
        assert_eq!(all.len(), 3);
        let expected = &all[1];
        assert_eq!(expected.annual_savings, results.summary.total_savings);
        assert_eq!(expected.roi_percent, results.summary.roi_percent);
        assert_eq!(expected.payback_months, results.summary.payback_months);
    }

    #[test]
    fn scenarios_are_ordered_by_roi() {
        let inputs = RoiInputs::new(Product::PraediGene, OrganizationType::SmallHospital);
        let results = calculate(&inputs).unwrap();
        let all = scenarios(&results);
        assert!(all[0].roi_percent < all[1].roi_percent);
        assert!(all[1].roi_percent < all[2].roi_percent);
        assert!(all[0].payback_months > all[2].payback_months);
    }
}
