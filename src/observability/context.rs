//! Thread-local context for crash reports.
//!
//! Tracks which stage of report generation is running and which artifact
//! (data file, export target) is being touched. Guards restore the previous
//! context on drop so phases can nest.

use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CURRENT_CONTEXT: RefCell<ReportContext> = const { RefCell::new(ReportContext::new()) };
}

/// Snapshot of what praedi-roi was doing.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub phase: Option<ReportPhase>,
    /// Data file being read or report file being written
    pub current_artifact: Option<PathBuf>,
}

impl ReportContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_artifact: None,
        }
    }
}

/// Stages of a report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPhase {
    ConfigLoading,
    DataLoading,
    Calculation,
    Analysis,
    Rendering,
    Export,
}

impl std::fmt::Display for ReportPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigLoading => write!(f, "config_loading"),
            Self::DataLoading => write!(f, "data_loading"),
            Self::Calculation => write!(f, "calculation"),
            Self::Analysis => write!(f, "analysis"),
            Self::Rendering => write!(f, "rendering"),
            Self::Export => write!(f, "export"),
        }
    }
}

/// Restores the previous context when dropped.
pub struct ContextGuard {
    previous: ReportContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

#[must_use]
pub fn set_phase(phase: ReportPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_current_artifact(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_artifact = Some(path.into());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn get_current_context() -> ReportContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

#[cfg(test)]
pub(crate) fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = ReportContext::new();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restores_outer_phase() {
        reset_context();

        let _outer = set_phase(ReportPhase::Calculation);
        {
            let _inner = set_phase(ReportPhase::Export);
            assert_eq!(get_current_context().phase, Some(ReportPhase::Export));
        }
        assert_eq!(get_current_context().phase, Some(ReportPhase::Calculation));
    }

    #[test]
    fn artifact_is_tracked_alongside_phase() {
        reset_context();

        let _phase = set_phase(ReportPhase::DataLoading);
        let _file = set_current_artifact("/data/visn21_hai_rates.csv");

        let ctx = get_current_context();
        assert_eq!(ctx.phase, Some(ReportPhase::DataLoading));
        assert_eq!(
            ctx.current_artifact,
            Some(PathBuf::from("/data/visn21_hai_rates.csv"))
        );
    }

    #[test]
    fn phase_names_are_snake_case() {
        assert_eq!(ReportPhase::ConfigLoading.to_string(), "config_loading");
        assert_eq!(ReportPhase::DataLoading.to_string(), "data_loading");
    }
}
