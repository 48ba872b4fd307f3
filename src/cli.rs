use crate::config::{parse_override, CliOverrides};
use crate::core::{CalculationModel, OrganizationType, Product};
use crate::data::DataKind;
use crate::error::RoiError;
use crate::output::{ExportFormat, OutputFormat, View};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "praedi-roi")]
#[command(about = "ROI calculator for PraediGene and PraediAlert deployments", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Disable colors and emoji
    #[arg(long, global = true)]
    pub plain: bool,

    /// Configuration file (defaults to the nearest .praedi-roi.toml)
    #[arg(long, global = true, env = "PRAEDI_ROI_CONFIG")]
    pub config: Option<PathBuf>,
}

/// What to calculate and with which overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Product to evaluate
    #[arg(short, long, value_parser = parse_named::<Product>)]
    pub product: Option<Product>,

    /// Organization type whose defaults seed the parameters
    #[arg(short = 'g', long, value_parser = parse_named::<OrganizationType>)]
    pub organization: Option<OrganizationType>,

    /// PraediAlert calculation model
    #[arg(short, long, value_enum)]
    pub model: Option<CalculationModel>,

    /// Override one parameter, e.g. --set ipc.cost_per_hai=30000 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_set)]
    pub set: Vec<(String, f64)>,

    /// Directory of facility CSV files
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,
}

impl InputArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            product: self.product,
            organization: self.organization,
            model: self.model,
            set: self.set.clone(),
        }
    }
}

fn parse_set(input: &str) -> Result<(String, f64), String> {
    parse_override(input).map_err(|e| e.to_string())
}

/// Accept every spelling `FromStr` does: `praedigene`, `VISN21`, `"Small Hospital"`.
fn parse_named<T: std::str::FromStr<Err = RoiError>>(input: &str) -> Result<T, String> {
    input.parse().map_err(|e: RoiError| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calculate savings, ROI and payback and print a report
    Calculate(CalculateArgs),

    /// Export a PDF report or Excel workbook
    Export(ExportArgs),

    /// List every adjustable parameter with its bounds and defaults
    Parameters(ParametersArgs),

    /// Show the pre-loaded PraediAlert study data
    Study(StudyArgs),

    /// Inspect, validate and template facility CSV files
    Data {
        #[command(subcommand)]
        command: DataCommand,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Output format (defaults to the config file's, then terminal)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Which part of the report to show
    #[arg(long, value_enum, default_value = "executive")]
    pub view: View,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Document format (guessed from --output, otherwise pdf)
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Output file (defaults to a timestamped name in the output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include study sheets in the Excel workbook
    #[arg(long)]
    pub comprehensive: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ParametersArgs {
    /// Only parameters used by this product
    #[arg(short, long, value_parser = parse_named::<Product>)]
    pub product: Option<Product>,

    /// Organization whose defaults are shown
    #[arg(short = 'g', long, value_parser = parse_named::<OrganizationType>)]
    pub organization: Option<OrganizationType>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StudySection {
    /// Headline outcomes and key cost metrics
    #[default]
    Overview,
    /// The eight intervention facilities
    Facilities,
    /// HAI types, intervention vs control
    HaiTypes,
    /// Cost structure and annualized financials
    Financial,
    /// Projected savings at target VA hospitals
    Targets,
    /// Calculation steps with worked examples
    Methodology,
}

#[derive(Args, Debug, Clone)]
pub struct StudyArgs {
    #[arg(value_enum, default_value = "overview")]
    pub section: StudySection,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DataCommand {
    /// Load one CSV file and preview its rows
    Load {
        path: PathBuf,

        /// Rows to preview
        #[arg(long, default_value = "5")]
        rows: usize,
    },

    /// Check a CSV file carries the columns its kind requires
    Validate {
        path: PathBuf,

        /// Expected kind (hai_rates, antibiotic_dot, patient_days, genetic_tests);
        /// detected from the headers when omitted
        #[arg(long, value_parser = parse_named::<DataKind>)]
        kind: Option<DataKind>,
    },

    /// Write a template CSV for a data kind
    Template {
        #[arg(value_parser = parse_named::<DataKind>)]
        kind: DataKind,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize a directory of facility data files
    Summary {
        /// Data directory (defaults to the config file's)
        dir: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_calculate_with_overrides() {
        let cli = Cli::parse_from([
            "praedi-roi",
            "calculate",
            "--product",
            "alert",
            "-g",
            "large",
            "--set",
            "ipc.cost_per_hai=30000",
            "--set",
            "financial.staff_training=0",
            "--plain",
        ]);
        assert!(cli.global.plain);
        let Commands::Calculate(args) = cli.command else {
            panic!("expected calculate");
        };
        let overrides = args.inputs.overrides();
        assert_eq!(overrides.product, Some(Product::PraediAlert));
        assert_eq!(overrides.organization, Some(OrganizationType::LargeHospital));
        assert_eq!(overrides.set.len(), 2);
        assert_eq!(args.view, View::Executive);
    }

    #[test]
    fn accepts_product_and_organization_spellings() {
        for (product, organization, expected) in [
            ("praedigene", "small_hospital", (Product::PraediGene, OrganizationType::SmallHospital)),
            ("PraediAlert", "VISN21", (Product::PraediAlert, OrganizationType::Visn21)),
            ("gene", "Small Hospital", (Product::PraediGene, OrganizationType::SmallHospital)),
            ("praedi-alert", "medium-hospital", (Product::PraediAlert, OrganizationType::MediumHospital)),
        ] {
            let cli = Cli::parse_from([
                "praedi-roi",
                "calculate",
                "--product",
                product,
                "--organization",
                organization,
            ]);
            let Commands::Calculate(args) = cli.command else {
                panic!("expected calculate");
            };
            assert_eq!((args.inputs.product.unwrap(), args.inputs.organization.unwrap()), expected);
        }

        let cli = Cli::parse_from(["praedi-roi", "parameters", "-p", "praedigene", "-g", "visn21"]);
        let Commands::Parameters(args) = cli.command else {
            panic!("expected parameters");
        };
        assert_eq!(args.product, Some(Product::PraediGene));
        assert_eq!(args.organization, Some(OrganizationType::Visn21));
    }

    #[test]
    fn rejects_unknown_product() {
        let err = Cli::try_parse_from(["praedi-roi", "calculate", "--product", "praedimax"])
            .unwrap_err();
        assert!(err.to_string().contains("praedigene, praedialert"));
    }

    #[test]
    fn rejects_malformed_set() {
        let result = Cli::try_parse_from(["praedi-roi", "calculate", "--set", "ipc.cost_per_hai"]);
        assert!(result.is_err());
    }

    #[test]
    fn excel_alias_selects_xlsx() {
        let cli = Cli::parse_from(["praedi-roi", "export", "--format", "excel", "--comprehensive"]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.format, Some(ExportFormat::Xlsx));
        assert!(args.comprehensive);
    }

    #[test]
    fn data_template_parses_kind() {
        let cli = Cli::parse_from(["praedi-roi", "data", "template", "hai-rates"]);
        let Commands::Data {
            command: DataCommand::Template { kind, output },
        } = cli.command
        else {
            panic!("expected data template");
        };
        assert_eq!(kind, DataKind::HaiRates);
        assert!(output.is_none());
    }
}
