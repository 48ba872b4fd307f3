//! Five-year projection and monthly payback schedule.

use crate::config::FinancialParams;
use crate::core::roi_percent;
use serde::Serialize;

/// Savings growth as the deployment matures, year 1 first.
pub const YEAR_MULTIPLIERS: [f64; 5] = [1.00, 1.05, 1.10, 1.12, 1.15];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub multiplier: f64,
    pub cost: f64,
    pub savings: f64,
    pub net_benefit: f64,
    pub roi_percent: f64,
    pub cumulative_cost: f64,
    pub cumulative_savings: f64,
    pub cumulative_net: f64,
    pub cumulative_roi: f64,
}

/// Year 1 pays the full investment, later years only maintenance.
pub fn five_year_projection(annual_savings: f64, financial: &FinancialParams) -> Vec<ProjectionYear> {
    let mut cumulative_cost = 0.0;
    let mut cumulative_savings = 0.0;

    YEAR_MULTIPLIERS
        .iter()
        .zip(1u32..)
        .map(|(&multiplier, year)| {
            let cost = if year == 1 {
                financial.total_investment()
            } else {
                financial.annual_maintenance
            };
            let savings = annual_savings * multiplier;
            cumulative_cost += cost;
            cumulative_savings += savings;

            ProjectionYear {
                year,
                multiplier,
                cost,
                savings,
                net_benefit: savings - cost,
                roi_percent: roi_percent(savings, cost),
                cumulative_cost,
                cumulative_savings,
                cumulative_net: cumulative_savings - cumulative_cost,
                cumulative_roi: roi_percent(cumulative_savings, cumulative_cost),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: u32,
    pub cost: f64,
    pub savings: f64,
    pub cumulative_cost: f64,
    pub cumulative_savings: f64,
    pub cumulative_net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaybackSchedule {
    pub months: Vec<MonthlyPoint>,
    /// First month whose cumulative savings cover cumulative cost
    pub break_even_month: Option<u32>,
}

/// Month-by-month cash flow. Implementation and training land in month 1;
/// maintenance is spread evenly.
pub fn monthly_schedule(
    annual_savings: f64,
    financial: &FinancialParams,
    months: u32,
) -> PaybackSchedule {
    let monthly_savings = annual_savings / 12.0;
    let monthly_maintenance = financial.annual_maintenance / 12.0;
    let upfront = financial.implementation_cost + financial.staff_training;

    let mut cumulative_cost = 0.0;
    let mut cumulative_savings = 0.0;
    let mut break_even_month = None;
    let points = (1..=months)
        .map(|month| {
            let cost = if month == 1 {
                upfront + monthly_maintenance
            } else {
                monthly_maintenance
            };
            cumulative_cost += cost;
            cumulative_savings += monthly_savings;
            if break_even_month.is_none() && cumulative_savings >= cumulative_cost {
                break_even_month = Some(month);
            }
            MonthlyPoint {
                month,
                cost,
                savings: monthly_savings,
                cumulative_cost,
                cumulative_savings,
                cumulative_net: cumulative_savings - cumulative_cost,
            }
        })
        .collect();

    PaybackSchedule {
        months: points,
        break_even_month,
    }
}
