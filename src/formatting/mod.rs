//! Terminal styling and number formatting shared by every report view.

mod numbers;

pub use numbers::{
    format_currency, format_currency_signed, format_months, format_number, format_percent,
    format_points,
};

use colored::{ColoredString, Colorize};
use std::env;
use std::io::IsTerminal;

/// Whether a terminal feature is forced on, off, or follows the tty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Toggle {
    #[default]
    Auto,
    Always,
    Never,
}

impl Toggle {
    fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => stdout_is_rich(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingConfig {
    pub color: Toggle,
    pub emoji: Toggle,
}

impl FormattingConfig {
    /// Honour NO_COLOR, CLICOLOR and CLICOLOR_FORCE.
    pub fn from_env() -> Self {
        let color = if env::var("CLICOLOR_FORCE").is_ok_and(|v| v == "1") {
            Toggle::Always
        } else if env::var_os("NO_COLOR").is_some() || env::var("CLICOLOR").is_ok_and(|v| v == "0")
        {
            Toggle::Never
        } else {
            Toggle::Auto
        };
        Self {
            color,
            emoji: Toggle::Auto,
        }
    }

    /// ASCII-only output: no colors, no emoji.
    pub fn plain() -> Self {
        Self {
            color: Toggle::Never,
            emoji: Toggle::Never,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.color == Toggle::Never && self.emoji == Toggle::Never
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        let color = self.color.enabled();
        colored::control::set_override(color);
        Box::new(Styler {
            color,
            emoji: self.emoji.enabled(),
        })
    }
}

/// Report styling, degrading to plain text when colors or emoji are off.
pub trait OutputFormatter {
    fn success(&self, text: &str) -> String;
    fn loss(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn info(&self, text: &str) -> String;
    fn header(&self, text: &str) -> String;
    fn emoji(&self, emoji: &str, fallback: &str) -> String;
    fn bold(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;

    /// Green for gains, red for losses.
    fn signed_currency(&self, value: f64) -> String {
        let text = format_currency_signed(value);
        if value < 0.0 {
            self.loss(&text)
        } else {
            self.success(&text)
        }
    }
}

struct Styler {
    color: bool,
    emoji: bool,
}

impl Styler {
    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for Styler {
    fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    fn loss(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    fn info(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan())
    }

    fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    fn emoji(&self, emoji: &str, fallback: &str) -> String {
        let text = if self.emoji { emoji } else { fallback };
        text.to_string()
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }
}

fn stdout_is_rich() -> bool {
    env::var("TERM").map_or(true, |term| term != "dumb") && std::io::stdout().is_terminal()
}

/// Icon for a report section with its ASCII fallback.
pub fn section_icon(section: &str) -> (&'static str, &'static str) {
    match section {
        "praedigene" => ("🧬", "[GENE]"),
        "praedialert" => ("🏥", "[ALERT]"),
        "pgx" => ("💊", "[PGX]"),
        "tso500" => ("🧫", "[TSO]"),
        "bias2015" => ("🔬", "[BIAS]"),
        "cytogenetics" => ("🧪", "[CYTO]"),
        "ipc" => ("🦠", "[IPC]"),
        "stewardship" => ("💊", "[ASP]"),
        "regulatory" => ("📋", "[REG]"),
        "projection" => ("📈", "[PROJ]"),
        "summary" => ("📊", "[STATS]"),
        _ => ("•", "-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_formatter_leaves_text_untouched() {
        let f = FormattingConfig::plain().formatter();
        assert_eq!(f.header("Executive Summary"), "Executive Summary");
        assert_eq!(f.emoji("🧬", "[GENE]"), "[GENE]");
        assert_eq!(f.signed_currency(-1500.0), "-$1,500");
    }

    #[test]
    fn forced_emoji_without_color() {
        let config = FormattingConfig {
            color: Toggle::Never,
            emoji: Toggle::Always,
        };
        assert!(!config.is_plain());
        let f = config.formatter();
        assert_eq!(f.emoji("🧬", "[GENE]"), "🧬");
        assert_eq!(f.success("ok"), "ok");
    }

    #[test]
    fn unknown_section_falls_back_to_bullet() {
        assert_eq!(section_icon("unknown"), ("•", "-"));
        assert_eq!(section_icon("ipc").1, "[IPC]");
    }
}
