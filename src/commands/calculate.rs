use super::Session;
use crate::cli::CalculateArgs;
use crate::output::{output_report, OutputFormat};
use anyhow::Result;

/// Format precedence: `--format`, the output file's extension, the config
/// file, terminal.
pub fn resolve_format(args: &CalculateArgs, session: &Session) -> OutputFormat {
    args.format
        .or_else(|| args.output.as_deref().and_then(OutputFormat::from_path))
        .or_else(|| session.config.output_format())
        .unwrap_or_default()
}

pub fn handle_calculate(session: &Session, args: &CalculateArgs) -> Result<()> {
    let report = session.build_report(&args.inputs)?;
    let format = resolve_format(args, session);
    output_report(
        &report,
        format,
        args.view,
        args.output.as_deref(),
        session.formatting,
    )?;

    if let Some(path) = &args.output {
        let formatter = session.formatting.formatter();
        eprintln!(
            "{}",
            formatter.success(&format!("Report written to {}", path.display()))
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InputArgs;
    use crate::config::{OutputConfig, RoiConfig};
    use crate::output::View;
    use std::path::PathBuf;

    fn args(format: Option<OutputFormat>, output: Option<&str>) -> CalculateArgs {
        CalculateArgs {
            inputs: InputArgs::default(),
            format,
            view: View::Executive,
            output: output.map(PathBuf::from),
        }
    }

    #[test]
    fn format_precedence() {
        let session = Session::with_config(RoiConfig {
            output: Some(OutputConfig {
                format: Some(OutputFormat::Json),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(
            resolve_format(&args(Some(OutputFormat::Csv), Some("r.md")), &session),
            OutputFormat::Csv
        );
        assert_eq!(
            resolve_format(&args(None, Some("r.md")), &session),
            OutputFormat::Markdown
        );
        assert_eq!(resolve_format(&args(None, None), &session), OutputFormat::Json);
        assert_eq!(
            resolve_format(&args(None, None), &Session::with_config(RoiConfig::default())),
            OutputFormat::Terminal
        );
    }

    #[test]
    fn writes_markdown_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports").join("alert.md");
        let session = Session::with_config(RoiConfig::default());

        handle_calculate(&session, &args(None, path.to_str())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# PraediAlert ROI Analysis"));
    }
}
