//! VISN21 five-year contract against projected savings.
//!
//! Pricing follows the budgetary quote for 7 hospitals: a base year with
//! installation and training, then four option years of license only.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContractQuote {
    pub annual_license: f64,
    pub training: f64,
    pub installation: f64,
    pub option_years: [f64; 4],
    pub hospitals: u32,
}

impl ContractQuote {
    pub fn base_year_total(&self) -> f64 {
        self.annual_license + self.training + self.installation
    }

    pub fn contract_total(&self) -> f64 {
        self.base_year_total() + self.option_years.iter().sum::<f64>()
    }
}

pub const VISN21_CONTRACT: ContractQuote = ContractQuote {
    annual_license: 1_350_000.0,
    training: 35_000.0,
    installation: 50_000.0,
    option_years: [1_390_500.0, 1_432_215.0, 1_475_181.0, 1_519_437.0],
    hospitals: 7,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractYear {
    pub label: String,
    pub cost: f64,
    pub savings: f64,
    pub net_benefit: f64,
    pub cumulative_net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractAnalysis {
    pub quote: ContractQuote,
    pub base_year_total: f64,
    pub contract_total: f64,
    pub years: Vec<ContractYear>,
    pub annual_savings: f64,
    pub five_year_savings: f64,
    pub net_benefit: f64,
    pub roi_percent: f64,
    pub base_year_cost_per_hospital: f64,
    pub average_annual_cost_per_hospital: f64,
    pub annual_savings_per_hospital: f64,
    pub net_benefit_per_hospital: f64,
}

/// Each contract year is measured against the same annual savings.
pub fn contract_analysis(annual_savings: f64, quote: &ContractQuote) -> ContractAnalysis {
    let costs = std::iter::once(("Base Year".to_string(), quote.base_year_total())).chain(
        quote
            .option_years
            .iter()
            .enumerate()
            .map(|(i, cost)| (format!("Option Year {}", i + 1), *cost)),
    );

    let mut cumulative_net = 0.0;
    let years: Vec<ContractYear> = costs
        .map(|(label, cost)| {
            let net_benefit = annual_savings - cost;
            cumulative_net += net_benefit;
            ContractYear {
                label,
                cost,
                savings: annual_savings,
                net_benefit,
                cumulative_net,
            }
        })
        .collect();

    let contract_total = quote.contract_total();
    let hospitals = f64::from(quote.hospitals);
    let five_year_savings = annual_savings * years.len() as f64;
    let net_benefit = five_year_savings - contract_total;

    ContractAnalysis {
        quote: *quote,
        base_year_total: quote.base_year_total(),
        contract_total,
        years,
        annual_savings,
        five_year_savings,
        net_benefit,
        roi_percent: if contract_total > 0.0 {
            net_benefit / contract_total * 100.0
        } else {
            0.0
        },
        base_year_cost_per_hospital: (quote.base_year_total() / hospitals).floor(),
        average_annual_cost_per_hospital: (contract_total / hospitals / 5.0).floor(),
        annual_savings_per_hospital: (annual_savings / hospitals).floor(),
        net_benefit_per_hospital: (net_benefit / hospitals).floor(),
    }
}
