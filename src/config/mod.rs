//! Parameter defaults, the parameter registry and `.praedi-roi.toml` handling.

mod core;
pub mod defaults;
pub mod inputs;
mod loader;
pub mod registry;

pub use self::core::{DataConfig, FinancialOverrides, OutputConfig, RoiConfig};
pub use defaults::{
    financial_defaults, praedialert_defaults, praedigene_defaults, Bias2015Params,
    CytogeneticsParams, FinancialParams, IpcParams, PgxParams, PraediAlertParams,
    PraediGeneParams, RegulatoryParams, StewardshipParams, TestCosts, Tso500Params,
};
pub use inputs::{resolve_inputs, CliOverrides, FacilityInputs, RoiInputs};
pub use loader::{
    directory_ancestors, discover_config_path, load_config, load_config_from_path, parse_config,
    CONFIG_FILE_NAME,
};
pub use registry::{
    lookup, parse_override, specs_for, ImpactLevel, ParameterSet, ParameterSpec, Unit, REGISTRY,
};
