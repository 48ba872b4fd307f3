use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# praedi-roi configuration
#
# Command-line flags override these values; anything left out falls back to
# the organization defaults. Run `praedi-roi parameters` for every key.

# praedigene or praedialert
product = "praedialert"

# small_hospital, medium_hospital, large_hospital, visn21 or custom
organization = "visn21"

# PraediAlert model: study (18-month study results) or parametric
model = "study"

[parameters]
# "ipc.cost_per_hai" = 45000
# "stewardship.cost_per_dot" = 100
# "pgx.annual_volume" = 1500

[financial]
# implementation_cost = 50000
# annual_maintenance = 1350000
# staff_training = 35000

[output]
format = "terminal"
# directory = "reports"
plain = false

[data]
# directory = "data"
"#;

/// Write [`DEFAULT_CONFIG`] into `dir`, refusing to replace an existing
/// file unless `force` is set.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config_from_path, resolve_inputs, CliOverrides};
    use crate::core::{OrganizationType, Product};
    use crate::output::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn default_config_parses_and_resolves() {
        let dir = TempDir::new().unwrap();
        init_config(dir.path(), false).unwrap();

        let config = load_config_from_path(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.output_format(), Some(OutputFormat::Terminal));
        assert!(!config.plain());

        let inputs = resolve_inputs(&config, &CliOverrides::default(), None).unwrap();
        assert_eq!(inputs.product, Product::PraediAlert);
        assert_eq!(inputs.organization, OrganizationType::Visn21);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "product = \"praedigene\"\n").unwrap();

        assert!(init_config(dir.path(), false).is_err());
        init_config(dir.path(), true).unwrap();
        let contents = std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(contents, DEFAULT_CONFIG);
    }
}
