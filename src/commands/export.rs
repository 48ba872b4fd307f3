use super::Session;
use crate::cli::ExportArgs;
use crate::output::{export_report, resolve_export_path, ExcelOptions, ExportFormat};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;

/// `--format`, else the output file's extension, else PDF.
pub fn resolve_format(args: &ExportArgs) -> ExportFormat {
    args.format
        .or_else(|| args.output.as_deref().and_then(ExportFormat::from_path))
        .unwrap_or(ExportFormat::Pdf)
}

/// Returns the written path.
pub fn handle_export(session: &Session, args: &ExportArgs) -> Result<PathBuf> {
    let report = session.build_report(&args.inputs)?;
    let format = resolve_format(args);
    let path = resolve_export_path(
        args.output.as_deref(),
        session.output_directory(),
        report.product(),
        format,
        &Local::now(),
    );
    if args.comprehensive && format != ExportFormat::Xlsx {
        tracing::warn!("--comprehensive only applies to Excel workbooks");
    }

    let options = ExcelOptions {
        comprehensive: args.comprehensive,
    };
    export_report(&report, format, &path, &options)
        .with_context(|| format!("Failed to export report to {}", path.display()))?;

    let formatter = session.formatting.formatter();
    println!(
        "{}",
        formatter.success(&format!(
            "{} {} report written to {}",
            report.product(),
            format.extension().to_uppercase(),
            path.display()
        ))
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InputArgs;
    use crate::config::{OutputConfig, RoiConfig};
    use crate::core::Product;

    fn args(format: Option<ExportFormat>, output: Option<PathBuf>) -> ExportArgs {
        ExportArgs {
            inputs: InputArgs::default(),
            format,
            output,
            comprehensive: false,
        }
    }

    #[test]
    fn format_from_flag_then_extension() {
        assert_eq!(resolve_format(&args(None, None)), ExportFormat::Pdf);
        assert_eq!(
            resolve_format(&args(None, Some(PathBuf::from("r.xlsx")))),
            ExportFormat::Xlsx
        );
        assert_eq!(
            resolve_format(&args(Some(ExportFormat::Pdf), Some(PathBuf::from("r.xlsx")))),
            ExportFormat::Pdf
        );
    }

    #[test]
    fn default_name_lands_in_configured_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let session = Session::with_config(RoiConfig {
            output: Some(OutputConfig {
                directory: Some(dir.path().join("exports")),
                ..Default::default()
            }),
            ..Default::default()
        });
        let mut export = args(Some(ExportFormat::Xlsx), None);
        export.inputs.product = Some(Product::PraediGene);

        let path = handle_export(&session, &export).unwrap();

        assert!(path.starts_with(dir.path().join("exports")));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("PraediGene_ROI_Report_"));
        assert!(name.ends_with(".xlsx"));
        assert!(path.is_file());
    }
}
