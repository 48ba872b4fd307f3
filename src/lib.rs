//! ROI calculator for PraediGene (genetic testing pipelines) and
//! PraediAlert (infection prevention and surveillance) deployments.
//!
//! Inputs are resolved from organization defaults, facility CSV data, a
//! `.praedi-roi.toml` file and command-line overrides. The calculators
//! produce per-component savings; the analysis layer adds projections,
//! scenarios, sensitivity and the VISN21 contract view; output renders
//! terminal, Markdown, JSON and CSV reports plus PDF and Excel exports.

pub mod analysis;
pub mod calculators;
pub mod charts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod output;
pub mod study;

// Re-export commonly used types
pub use crate::analysis::{build_report, RoiReport};
pub use crate::calculators::calculate;
pub use crate::config::{resolve_inputs, CliOverrides, RoiConfig, RoiInputs};
pub use crate::core::{CalculationModel, OrganizationType, Product, RoiResults};
pub use crate::error::{Result, RoiError};
pub use crate::output::{create_writer, ExportFormat, OutputFormat, OutputWriter, View};
