use super::{ChartKind, ChartSpec, Rgb, ValueFormat};
use crate::analysis::{PaybackSchedule, ProjectionYear, Scenario, SensitivityEntry};
use crate::core::RoiResults;
use crate::study::{hai_types, STUDY_FACILITIES};

pub fn savings_vs_investment(results: &RoiResults) -> ChartSpec {
    let summary = &results.summary;
    ChartSpec::new(
        format!("{} Annual Savings vs Investment", results.product.display_name()),
        ChartKind::Column,
        ValueFormat::Currency,
    )
    .categories(["Investment", "Annual Savings", "Net Benefit"])
    .series(
        "Amount",
        vec![
            summary.total_investment,
            summary.total_savings,
            summary.net_benefit,
        ],
        Rgb::NAVY,
    )
    .axes("", "Amount ($)")
}

pub fn component_breakdown(results: &RoiResults) -> ChartSpec {
    ChartSpec::new("Savings by Component", ChartKind::Pie, ValueFormat::Currency)
        .categories(results.components.iter().map(|c| c.title.clone()))
        .series(
            "Annual Savings",
            results.components.iter().map(|c| c.total_savings).collect(),
            Rgb::GREEN,
        )
}

pub fn five_year_cumulative(years: &[ProjectionYear]) -> ChartSpec {
    ChartSpec::new("5-Year Cumulative Projection", ChartKind::Line, ValueFormat::Currency)
        .categories(years.iter().map(|y| format!("Year {}", y.year)))
        .series(
            "Cumulative Savings",
            years.iter().map(|y| y.cumulative_savings).collect(),
            Rgb::GREEN,
        )
        .series(
            "Cumulative Cost",
            years.iter().map(|y| y.cumulative_cost).collect(),
            Rgb::RED,
        )
        .series(
            "Cumulative Net",
            years.iter().map(|y| y.cumulative_net).collect(),
            Rgb::NAVY,
        )
        .axes("Year", "Amount ($)")
}

pub fn cumulative_monthly(schedule: &PaybackSchedule) -> ChartSpec {
    ChartSpec::new("Cumulative Savings by Month", ChartKind::Line, ValueFormat::Currency)
        .categories(schedule.months.iter().map(|m| format!("M{}", m.month)))
        .series(
            "Cumulative Savings",
            schedule.months.iter().map(|m| m.cumulative_savings).collect(),
            Rgb::GREEN,
        )
        .series(
            "Cumulative Cost",
            schedule.months.iter().map(|m| m.cumulative_cost).collect(),
            Rgb::RED,
        )
        .axes("Month", "Amount ($)")
}

pub fn scenario_comparison(scenarios: &[Scenario]) -> ChartSpec {
    ChartSpec::new("Scenario Comparison", ChartKind::Column, ValueFormat::Currency)
        .categories(scenarios.iter().map(|s| s.name))
        .series(
            "Annual Savings",
            scenarios.iter().map(|s| s.annual_savings).collect(),
            Rgb::GREEN,
        )
        .series(
            "Net Benefit",
            scenarios.iter().map(|s| s.net_benefit).collect(),
            Rgb::NAVY,
        )
        .axes("Scenario", "Amount ($)")
}

/// ROI at -10 % and +10 % for the `top` most influential parameters.
pub fn sensitivity_tornado(entries: &[SensitivityEntry], top: usize) -> ChartSpec {
    let shown = &entries[..top.min(entries.len())];
    ChartSpec::new("ROI Sensitivity (±10%)", ChartKind::Bar, ValueFormat::Percent)
        .categories(shown.iter().map(|e| e.label))
        .series("-10%", shown.iter().map(|e| e.low_roi).collect(), Rgb::RED)
        .series("+10%", shown.iter().map(|e| e.high_roi).collect(), Rgb::GREEN)
        .axes("Parameter", "ROI (%)")
}

pub fn study_facility_reduction() -> ChartSpec {
    // The New Orleans outbreak (-3200 %) would flatten every other bar.
    let facilities: Vec<_> = STUDY_FACILITIES
        .iter()
        .filter(|f| f.reduction() >= 0)
        .collect();
    ChartSpec::new("HAI Reduction by Facility", ChartKind::Column, ValueFormat::Percent)
        .categories(facilities.iter().map(|f| f.short_name()))
        .series(
            "Reduction",
            facilities.iter().map(|f| f.reduction_percent()).collect(),
            Rgb::TEAL,
        )
        .axes("Facility", "Reduction (%)")
}

pub fn hai_type_comparison() -> ChartSpec {
    let types = hai_types();
    ChartSpec::new(
        "HAI Change by Type: Intervention vs Control",
        ChartKind::Column,
        ValueFormat::Percent,
    )
    .categories(types.iter().map(|t| t.code))
    .series(
        "Intervention",
        types.iter().map(|t| t.intervention_change()).collect(),
        Rgb::NAVY,
    )
    .series(
        "Control",
        types.iter().map(|t| t.control_change()).collect(),
        Rgb::GRAY,
    )
    .axes("HAI Type", "Change (%)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{five_year_projection, scenarios};
    use crate::calculators::calculate;
    use crate::config::RoiInputs;
    use crate::core::{OrganizationType, Product};

    fn results() -> RoiResults {
        calculate(&RoiInputs::new(Product::PraediAlert, OrganizationType::MediumHospital)).unwrap()
    }

    #[test]
    fn series_lengths_match_categories() {
        let results = results();
        let years = five_year_projection(results.summary.total_savings, &results.financial);
        let charts = [
            savings_vs_investment(&results),
            component_breakdown(&results),
            five_year_cumulative(&years),
            scenario_comparison(&scenarios(&results)),
            study_facility_reduction(),
            hai_type_comparison(),
        ];
        for chart in &charts {
            assert!(chart.has_data(), "{}", chart.title);
            for series in &chart.series {
                assert_eq!(series.values.len(), chart.categories.len(), "{}", chart.title);
            }
        }
    }

    #[test]
    fn facility_chart_drops_outbreak_sites_with_increases() {
        let chart = study_facility_reduction();
        assert_eq!(chart.categories.len(), 7);
        assert!(!chart.categories.iter().any(|c| c == "New Orleans"));
    }

    #[test]
    fn tornado_limits_to_top_entries() {
        let entries = crate::analysis::sensitivity(&RoiInputs::new(
            Product::PraediGene,
            OrganizationType::SmallHospital,
        ))
        .unwrap();
        let chart = sensitivity_tornado(&entries, 5);
        assert_eq!(chart.categories.len(), 5);
        assert_eq!(chart.series.len(), 2);
    }
}
