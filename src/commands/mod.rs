//! CLI command implementations.
//!
//! Each submodule handles one subcommand:
//! - **calculate**: run the calculation and print or write a text report
//! - **export**: render a PDF report or Excel workbook
//! - **parameters**: list the parameter registry with organization defaults
//! - **study**: show the pre-loaded PraediAlert study data
//! - **data**: load, validate, template and summarize facility CSV files
//! - **init**: write a commented default configuration file
//!
//! Commands share a [`Session`]: the loaded configuration plus the
//! formatting chosen from flags, config and environment.

pub mod calculate;
pub mod data;
pub mod export;
pub mod init;
pub mod parameters;
pub mod study;

pub use calculate::handle_calculate;
pub use data::handle_data;
pub use export::handle_export;
pub use init::init_config;
pub use parameters::handle_parameters;
pub use study::handle_study;

use crate::analysis::{build_report, RoiReport};
use crate::cli::{GlobalArgs, InputArgs};
use crate::config::{load_config, load_config_from_path, resolve_inputs, RoiConfig, RoiInputs};
use crate::data::load_directory;
use crate::formatting::FormattingConfig;
use crate::observability::{set_current_artifact, set_phase, ReportPhase};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct Session {
    pub config: RoiConfig,
    pub config_path: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

impl Session {
    /// Load the explicit or discovered config and settle formatting.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let _phase = set_phase(ReportPhase::ConfigLoading);
        let (config, config_path) = match &global.config {
            Some(path) => {
                let _artifact = set_current_artifact(path);
                let config = load_config_from_path(path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?;
                (config, Some(path.clone()))
            }
            None => load_config().context("Failed to load configuration")?,
        };
        if let Some(path) = &config_path {
            tracing::info!(path = %path.display(), "using config file");
        }

        let formatting = if global.plain || config.plain() {
            FormattingConfig::plain()
        } else {
            FormattingConfig::from_env()
        };

        Ok(Self {
            config,
            config_path,
            formatting,
        })
    }

    /// Session with default config and plain output.
    pub fn with_config(config: RoiConfig) -> Self {
        Self {
            config,
            config_path: None,
            formatting: FormattingConfig::plain(),
        }
    }

    /// Layer defaults, facility data, config and flags into calculation
    /// inputs. Data comes from `--data-dir`, else the config's directory.
    pub fn resolve_inputs(&self, args: &InputArgs) -> Result<RoiInputs> {
        let data_dir = args
            .data_dir
            .as_deref()
            .or(self.config.data_directory().map(PathBuf::as_path));
        let dataset = match data_dir {
            Some(dir) => Some(
                load_directory(dir)
                    .with_context(|| format!("Failed to load facility data: {}", dir.display()))?,
            ),
            None => None,
        };

        resolve_inputs(&self.config, &args.overrides(), dataset.as_ref())
            .context("Invalid calculation inputs")
    }

    pub fn build_report(&self, args: &InputArgs) -> Result<RoiReport> {
        let inputs = self.resolve_inputs(args)?;
        let _phase = set_phase(ReportPhase::Calculation);
        build_report(&inputs).context("Calculation failed")
    }

    pub fn output_directory(&self) -> Option<&Path> {
        self.config.output_directory().map(PathBuf::as_path)
    }
}
