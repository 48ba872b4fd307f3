//! Crash reports, phase tracking and log setup.
//!
//! Install the panic hook and the subscriber once at startup, then mark each
//! stage of report generation so a crash report can say what was running:
//!
//! ```ignore
//! use praedi_roi::observability::{set_phase, ReportPhase};
//!
//! let _phase = set_phase(ReportPhase::Calculation);
//! let results = calculate(&config)?;
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, set_current_artifact, set_phase, ContextGuard,
    ReportContext, ReportPhase,
};
pub use panic_hook::install_panic_hook;
pub use self::tracing::{init_tracing, verbosity_filter};
