//! Core domain types shared by calculators, analysis and output.

pub mod metrics;
pub mod types;

pub use metrics::{
    payback_months, roi_percent, whole, ClinicalImpact, ComponentResult, Metric, MetricValue,
    RoiResults, RoiSummary, SavingsLine,
};
pub use types::{CalculationModel, OrganizationType, Product, SizeClass};
