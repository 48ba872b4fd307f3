//! Calculation results in a shape every renderer can walk.

use super::types::{CalculationModel, OrganizationType, Product};
use crate::config::FinancialParams;
use crate::formatting::{format_currency, format_months, format_number, format_percent};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MetricValue {
    Currency(f64),
    Count(f64),
    Percent(f64),
    Days(f64),
    Hours(f64),
    Months(Option<f64>),
    Text(String),
}

impl MetricValue {
    pub fn display(&self) -> String {
        match self {
            Self::Currency(v) => format_currency(*v),
            Self::Count(v) => format_number(*v),
            Self::Percent(v) => format_percent(*v),
            Self::Days(v) => format!("{} days", format_number(*v)),
            Self::Hours(v) => format!("{} hours", format_number(*v)),
            Self::Months(m) => format_months(*m),
            Self::Text(t) => t.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Currency(v) | Self::Count(v) | Self::Percent(v) | Self::Days(v) | Self::Hours(v) => {
                Some(*v)
            }
            Self::Months(m) => *m,
            Self::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: MetricValue,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: MetricValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn currency(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, MetricValue::Currency(value))
    }

    pub fn count(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, MetricValue::Count(value))
    }

    pub fn percent(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, MetricValue::Percent(value))
    }
}

/// One contributor to a component's total savings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsLine {
    pub label: String,
    pub amount: f64,
}

impl SavingsLine {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Outcome of a single pipeline or module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentResult {
    /// Registry prefix, e.g. `pgx` or `ipc`
    pub key: String,
    pub title: String,
    pub total_savings: f64,
    /// Savings relative to the component's own testing spend, when it has one
    pub roi_percent: Option<f64>,
    pub headline: Metric,
    pub metrics: Vec<Metric>,
    pub breakdown: Vec<SavingsLine>,
}

impl ComponentResult {
    pub fn breakdown_total(&self) -> f64 {
        self.breakdown.iter().map(|line| line.amount).sum()
    }
}

/// Patient outcomes reported by the PraediAlert IPC module.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClinicalImpact {
    pub hais_prevented: f64,
    pub lives_saved: f64,
    pub hospital_days_saved: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoiSummary {
    pub total_savings: f64,
    pub total_investment: f64,
    pub net_benefit: f64,
    pub roi_percent: f64,
    /// `None` when savings never cover the investment
    pub payback_months: Option<f64>,
}

impl RoiSummary {
    pub fn compute(total_savings: f64, financial: &FinancialParams) -> Self {
        let total_investment = financial.total_investment();
        Self {
            total_savings,
            total_investment,
            net_benefit: total_savings - total_investment,
            roi_percent: roi_percent(total_savings, total_investment),
            payback_months: payback_months(total_savings, total_investment),
        }
    }
}

/// Net return as a percentage of cost; zero when there is no cost.
pub fn roi_percent(savings: f64, investment: f64) -> f64 {
    if investment > 0.0 {
        (savings - investment) / investment * 100.0
    } else {
        0.0
    }
}

/// Whole-unit count; the tolerance keeps `180 * 0.7` from counting as 125.
pub fn whole(value: f64) -> f64 {
    (value + 1e-9).floor()
}

pub fn payback_months(savings: f64, investment: f64) -> Option<f64> {
    (savings > 0.0).then(|| investment / (savings / 12.0))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiResults {
    pub product: Product,
    pub organization: OrganizationType,
    pub model: CalculationModel,
    pub components: Vec<ComponentResult>,
    pub summary: RoiSummary,
    pub financial: FinancialParams,
    pub clinical: Option<ClinicalImpact>,
}

impl RoiResults {
    pub fn component(&self, key: &str) -> Option<&ComponentResult> {
        self.components.iter().find(|c| c.key == key)
    }
}
