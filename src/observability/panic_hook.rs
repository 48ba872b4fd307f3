//! Structured crash report printed when praedi-roi panics.

use super::context::{get_current_context, ReportContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    let report = render_crash_report(
        &extract_panic_message(info),
        info.location().map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
        &context,
    );
    eprintln!();
    eprint!("{report}");
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    }
}

fn render_crash_report(message: &str, location: Option<String>, context: &ReportContext) -> String {
    let rule = "═".repeat(WIDTH);
    let mut out = String::new();
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    out.push_str(&format!("╔{rule}╗\n"));
    out.push_str(&boxed_line(&format!("{:^width$}", "PRAEDI-ROI CRASH REPORT", width = WIDTH - 4)));
    out.push_str(&format!("╠{rule}╣\n"));
    out.push_str(&boxed_line(&format!("Version: {VERSION}")));
    out.push_str(&boxed_line(&format!("Platform: {}", std::env::consts::OS)));
    out.push_str(&boxed_line(&format!("Time: {timestamp}")));
    out.push_str(&format!("╠{rule}╣\n"));
    out.push_str(&boxed_line(&format!("PANIC: {message}")));
    if let Some(location) = location {
        out.push_str(&boxed_line(&format!("Location: {location}")));
    }
    out.push_str(&format!("╠{rule}╣\n"));
    out.push_str(&boxed_line("REPORT CONTEXT:"));
    match &context.phase {
        Some(phase) => out.push_str(&boxed_line(&format!("  Phase: {phase}"))),
        None => out.push_str(&boxed_line("  Phase: (not set, crash before report run started)")),
    }
    if let Some(metadata) = Span::current().metadata() {
        out.push_str(&boxed_line(&format!("  Span: {}", metadata.name())));
    }
    if let Some(artifact) = &context.current_artifact {
        out.push_str(&boxed_line(&format!("  Artifact: {}", artifact.display())));
    }
    out.push_str(&format!("╠{rule}╣\n"));
    out.push_str(&boxed_line("Run with RUST_BACKTRACE=1 for stack trace"));
    out.push_str(&format!("╚{rule}╝\n"));
    out
}

fn boxed_line(text: &str) -> String {
    format!("║  {:<width$}║\n", truncate(text, WIDTH - 3), width = WIDTH - 2)
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::context::{reset_context, set_current_artifact, set_phase, ReportPhase};

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let result = truncate("ééééééééééé", 6);
        assert_eq!(result, "ééé...");
    }

    #[test]
    fn report_names_phase_and_artifact() {
        reset_context();
        let _phase = set_phase(ReportPhase::Export);
        let _file = set_current_artifact("reports/out.pdf");

        let report = render_crash_report(
            "font table missing",
            Some("src/output/pdf.rs:10:5".into()),
            &get_current_context(),
        );
        assert!(report.contains("PANIC: font table missing"));
        assert!(report.contains("Phase: export"));
        assert!(report.contains("Artifact: reports/out.pdf"));
    }

    #[test]
    fn report_without_phase_says_so() {
        let report = render_crash_report("boom", None, &ReportContext::new());
        assert!(report.contains("Phase: (not set"));
        assert!(!report.contains("Location:"));
    }
}
