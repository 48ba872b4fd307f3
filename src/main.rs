use anyhow::{Context, Result};
use clap::Parser;
use praedi_roi::cli::{Cli, Commands};
use praedi_roi::commands::{self, Session};
use praedi_roi::observability::{init_tracing, install_panic_hook};
use praedi_roi::RoiError;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    install_panic_hook();
    init_tracing(cli.global.verbosity);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // A broken config must not stop `init --force` from replacing it.
    if let Commands::Init { force } = cli.command {
        let dir = std::env::current_dir().context("Failed to get current directory")?;
        return commands::init_config(&dir, force);
    }

    let session = Session::load(&cli.global)?;
    match &cli.command {
        Commands::Calculate(args) => commands::handle_calculate(&session, args),
        Commands::Export(args) => commands::handle_export(&session, args).map(|_| ()),
        Commands::Parameters(args) => commands::handle_parameters(&session, args),
        Commands::Study(args) => commands::handle_study(&session, args),
        Commands::Data { command } => commands::handle_data(&session, command),
        Commands::Init { .. } => Ok(()),
    }
}

fn report_error(err: &anyhow::Error) {
    match err.chain().find_map(|cause| cause.downcast_ref::<RoiError>()) {
        Some(roi) => {
            tracing::debug!(code = %roi.code(), user_fixable = roi.is_user_fixable(), "run failed");
            eprintln!("Error [{}]: {err:#}", roi.code());
            if roi.is_user_fixable() {
                eprintln!("Check the inputs; `praedi-roi parameters` lists every key and its bounds.");
            }
        }
        None => eprintln!("Error: {err:#}"),
    }
}
