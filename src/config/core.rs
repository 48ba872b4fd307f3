use crate::core::CalculationModel;
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Contents of `.praedi-roi.toml`.
///
/// Product and organization stay strings here so every spelling accepted on
/// the command line (`Large Hospital`, `large-hospital`, `VISN21`) also works
/// in the file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RoiConfig {
    #[serde(default)]
    pub product: Option<String>,

    #[serde(default)]
    pub organization: Option<String>,

    #[serde(default)]
    pub model: Option<CalculationModel>,

    /// `"component.field" = value` overrides
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,

    #[serde(default)]
    pub financial: Option<FinancialOverrides>,

    #[serde(default)]
    pub output: Option<OutputConfig>,

    #[serde(default)]
    pub data: Option<DataConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FinancialOverrides {
    pub implementation_cost: Option<f64>,
    pub annual_maintenance: Option<f64>,
    pub staff_training: Option<f64>,
}

impl FinancialOverrides {
    /// Overrides as registry keys.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [
            ("financial.implementation_cost", self.implementation_cost),
            ("financial.annual_maintenance", self.annual_maintenance),
            ("financial.staff_training", self.staff_training),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    /// Where exported reports land when no explicit path is given
    pub directory: Option<PathBuf>,
    pub plain: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DataConfig {
    /// Directory holding facility CSV files
    pub directory: Option<PathBuf>,
}

impl RoiConfig {
    pub fn output_directory(&self) -> Option<&PathBuf> {
        self.output.as_ref().and_then(|o| o.directory.as_ref())
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output.as_ref().and_then(|o| o.format)
    }

    pub fn plain(&self) -> bool {
        self.output.as_ref().and_then(|o| o.plain).unwrap_or(false)
    }

    pub fn data_directory(&self) -> Option<&PathBuf> {
        self.data.as_ref().and_then(|d| d.directory.as_ref())
    }
}
