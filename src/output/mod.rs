//! Report rendering: terminal, Markdown, JSON and CSV text formats, plus
//! the Excel workbook and PDF document exports.
//!
//! Text formats go through [`OutputWriter`] so the same report can be
//! printed to stdout or rendered into a string and written to a file.

pub mod csv;
pub mod excel;
pub mod json;
pub mod markdown;
pub mod pdf;
pub mod terminal;

pub use self::csv::CsvWriter;
pub use excel::{component_sheet_name, render_workbook, ExcelOptions};
pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use pdf::render_pdf;
pub use terminal::TerminalWriter;

use crate::analysis::RoiReport;
use crate::core::Product;
use crate::formatting::FormattingConfig;
use crate::io;
use crate::observability::{set_current_artifact, set_phase, ReportPhase};
use anyhow::Result;
use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Text formats for `calculate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Markdown,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Terminal => "txt",
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Guess the format from an output file's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::Terminal),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Terminal => "terminal",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}

/// Binary document formats for `export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    #[value(alias = "excel")]
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// Which slice of the report a text view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Headline metrics and the five-year projection
    #[default]
    Executive,
    /// Every component with its metrics and savings breakdown
    Detailed,
    /// Scenarios and parameter sensitivity
    Comparison,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Executive => "Executive Summary",
            Self::Detailed => "Detailed Analysis",
            Self::Comparison => "Comparison View",
        }
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &RoiReport) -> Result<()>;
}

/// Writer for `format` over any byte sink.
pub fn create_writer<'a, W: std::io::Write + 'a>(
    format: OutputFormat,
    view: View,
    formatting: FormattingConfig,
    writer: W,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, view, formatting)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer, view)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Csv => Box::new(CsvWriter::new(writer)),
    }
}

pub fn render_to_string(
    report: &RoiReport,
    format: OutputFormat,
    view: View,
    formatting: FormattingConfig,
) -> Result<String> {
    let mut buffer = Vec::new();
    create_writer(format, view, formatting, &mut buffer).write_report(report)?;
    Ok(String::from_utf8(buffer)?)
}

/// Print to stdout, or write to `output_file` creating parent directories.
pub fn output_report(
    report: &RoiReport,
    format: OutputFormat,
    view: View,
    output_file: Option<&Path>,
    formatting: FormattingConfig,
) -> Result<()> {
    match output_file {
        Some(path) => {
            // Files never carry escape codes.
            let formatting = if format == OutputFormat::Terminal {
                FormattingConfig::plain()
            } else {
                formatting
            };
            let content = render_to_string(report, format, view, formatting)?;
            io::write_file(path, &content)?;
            tracing::info!(path = %path.display(), %format, "report written");
        }
        None => {
            let stdout = std::io::stdout();
            create_writer(format, view, formatting, stdout.lock()).write_report(report)?;
        }
    }
    Ok(())
}

/// Render a PDF or workbook and write it to `path`, creating parent
/// directories.
pub fn export_report(
    report: &RoiReport,
    format: ExportFormat,
    path: &Path,
    excel: &ExcelOptions,
) -> Result<()> {
    let _phase = set_phase(ReportPhase::Export);
    let _artifact = set_current_artifact(path);
    let bytes = match format {
        ExportFormat::Pdf => render_pdf(report)?,
        ExportFormat::Xlsx => render_workbook(report, excel)?,
    };
    io::write_bytes(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(())
}

/// `PraediAlert_ROI_Report_20250101_093000.pdf`
pub fn default_file_name(product: Product, extension: &str, at: &DateTime<Local>) -> String {
    format!(
        "{}_ROI_Report_{}.{}",
        product.display_name(),
        at.format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Explicit path wins; otherwise a timestamped name inside `directory`.
pub fn resolve_export_path(
    explicit: Option<&Path>,
    directory: Option<&Path>,
    product: Product,
    format: ExportFormat,
    at: &DateTime<Local>,
) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let name = default_file_name(product, format.extension(), at);
            match directory {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        }
    }
}

/// Long date for report headers: `January 05, 2025`.
pub fn report_date(at: &DateTime<Local>) -> String {
    at.format("%B %d, %Y").to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::analysis::{build_report, RoiReport};
    use crate::config::RoiInputs;
    use crate::core::{OrganizationType, Product};

    pub fn report(product: Product, organization: OrganizationType) -> RoiReport {
        build_report(&RoiInputs::new(product, organization)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap()
    }

    #[test]
    fn default_name_carries_product_and_timestamp() {
        assert_eq!(
            default_file_name(Product::PraediAlert, "pdf", &fixed_time()),
            "PraediAlert_ROI_Report_20250307_090501.pdf"
        );
    }

    #[test]
    fn export_path_prefers_explicit_file() {
        let explicit = PathBuf::from("out/report.xlsx");
        let path = resolve_export_path(
            Some(&explicit),
            Some(Path::new("reports")),
            Product::PraediGene,
            ExportFormat::Xlsx,
            &fixed_time(),
        );
        assert_eq!(path, explicit);

        let path = resolve_export_path(
            None,
            Some(Path::new("reports")),
            Product::PraediGene,
            ExportFormat::Xlsx,
            &fixed_time(),
        );
        assert_eq!(
            path,
            PathBuf::from("reports/PraediGene_ROI_Report_20250307_090501.xlsx")
        );
    }

    #[test]
    fn format_is_guessed_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("r/summary.MD")),
            Some(OutputFormat::Markdown)
        );
        assert_eq!(OutputFormat::from_path(Path::new("x.pdf")), None);
    }

    #[test]
    fn export_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a/b.XLSX")), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_path(Path::new("report.pdf")), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::from_path(Path::new("report.md")), None);
    }

    #[test]
    fn report_date_is_long_form() {
        assert_eq!(report_date(&fixed_time()), "March 07, 2025");
    }

    #[test]
    fn output_file_creates_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("summary.json");
        let report =
            test_support::report(Product::PraediAlert, crate::core::OrganizationType::Visn21);

        output_report(
            &report,
            OutputFormat::Json,
            View::Executive,
            Some(&path),
            FormattingConfig::plain(),
        )
        .unwrap();
        assert!(path.is_file());
    }
}
