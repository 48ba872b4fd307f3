//! Analyses layered on top of a single calculation: multi-year projection,
//! monthly payback, savings scenarios, parameter sensitivity and the VISN21
//! contract. [`build_report`] runs them all for one set of inputs.

pub mod contract;
pub mod projection;
pub mod report;
pub mod scenarios;
pub mod sensitivity;

pub use contract::{contract_analysis, ContractAnalysis, ContractYear, VISN21_CONTRACT};
pub use projection::{
    five_year_projection, monthly_schedule, MonthlyPoint, PaybackSchedule, ProjectionYear,
    YEAR_MULTIPLIERS,
};
pub use report::{build_report, RoiReport, SCHEDULE_MONTHS};
pub use scenarios::{scenarios, Scenario, SCENARIO_FACTORS};
pub use sensitivity::{sensitivity, SensitivityEntry, SENSITIVITY_STEP};
