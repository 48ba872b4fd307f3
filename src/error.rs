//! Unified error type for praedi-roi operations.
//!
//! Every failure surfaced by the library is a [`RoiError`]. Each variant
//! carries a stable [`ErrorCode`] so scripts can match on failures without
//! parsing messages.
//!
//! # Error Codes
//!
//! - E001-E009: I/O and filesystem errors
//! - E010-E019: Data import errors (CSV parsing, missing columns)
//! - E020-E029: Configuration errors
//! - E030-E039: Calculation errors
//! - E040-E049: Export errors (PDF, Excel, CSV writers)
//! - E050-E059: Parameter validation errors
//!
//! # Example
//!
//! ```rust
//! use praedi_roi::error::{ErrorCode, RoiError};
//!
//! let err = RoiError::unknown_parameter("pgx.volume");
//! assert_eq!(err.code(), ErrorCode::PARAMETER_UNKNOWN);
//! assert!(err.is_user_fixable());
//! ```

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - file not found
    pub const IO_FILE_NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// I/O error - permission denied
    pub const IO_PERMISSION_DENIED: ErrorCode = ErrorCode("E002");
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Data error - malformed CSV content
    pub const DATA_MALFORMED: ErrorCode = ErrorCode("E010");
    /// Data error - required columns missing
    pub const DATA_MISSING_COLUMNS: ErrorCode = ErrorCode("E011");
    /// Data error - unsupported file type
    pub const DATA_UNSUPPORTED: ErrorCode = ErrorCode("E012");

    /// Config error - invalid value or syntax
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");
    /// Config error - unknown product or organization name
    pub const CONFIG_UNKNOWN_NAME: ErrorCode = ErrorCode("E023");

    /// Calculation error - result is not a finite number
    pub const CALCULATION_NON_FINITE: ErrorCode = ErrorCode("E030");

    /// Export error - Excel workbook
    pub const EXPORT_EXCEL: ErrorCode = ErrorCode("E040");
    /// Export error - PDF document
    pub const EXPORT_PDF: ErrorCode = ErrorCode("E041");
    /// Export error - CSV writer
    pub const EXPORT_CSV: ErrorCode = ErrorCode("E042");

    /// Validation error - parameter outside its allowed range
    pub const PARAMETER_OUT_OF_RANGE: ErrorCode = ErrorCode("E050");
    /// Validation error - parameter key not recognised
    pub const PARAMETER_UNKNOWN: ErrorCode = ErrorCode("E051");
    /// Validation error - malformed `key=value` override
    pub const PARAMETER_SYNTAX: ErrorCode = ErrorCode("E052");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single out-of-range or otherwise invalid input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Parameter key, e.g. `pgx.annual_volume`.
    pub key: String,
    /// Offending value.
    pub value: f64,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}: {}", self.key, self.value, self.message)
    }
}

/// Unified error type for praedi-roi.
#[derive(Debug, Error)]
pub enum RoiError {
    #[error("I/O error{}: {source}", path_suffix(.path))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data in {path}: {message}")]
    Data { path: PathBuf, message: String },

    #[error("unsupported data file {path}: only CSV input is read")]
    UnsupportedFile { path: PathBuf },

    #[error("{path} is missing required columns: {}", .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("configuration error{}: {message}", path_suffix(.path))]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("unknown {kind} '{name}' (expected one of: {expected})")]
    UnknownName {
        kind: &'static str,
        name: String,
        expected: String,
    },

    #[error("unknown parameter '{key}'")]
    UnknownParameter { key: String },

    #[error("invalid override '{input}': expected key=value")]
    OverrideSyntax { input: String },

    #[error("{} invalid parameter value(s): {}", .issues.len(), join_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },

    #[error("calculation for {component} produced a non-finite value")]
    NonFinite { component: String },

    #[error("Excel export failed: {0}")]
    Excel(String),

    #[error("PDF export failed: {0}")]
    Pdf(String),

    #[error("CSV export failed: {0}")]
    Csv(String),
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl RoiError {
    /// Wrap an I/O error with the path it concerns.
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path,
        }
    }

    #[must_use]
    pub fn data(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Data {
            path: path.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unknown_parameter(key: impl Into<String>) -> Self {
        Self::UnknownParameter { key: key.into() }
    }

    /// Structured code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IO_FILE_NOT_FOUND,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IO_PERMISSION_DENIED,
                _ => ErrorCode::IO_GENERIC,
            },
            Self::Data { .. } => ErrorCode::DATA_MALFORMED,
            Self::UnsupportedFile { .. } => ErrorCode::DATA_UNSUPPORTED,
            Self::MissingColumns { .. } => ErrorCode::DATA_MISSING_COLUMNS,
            Self::Config { .. } => ErrorCode::CONFIG_INVALID,
            Self::UnknownName { .. } => ErrorCode::CONFIG_UNKNOWN_NAME,
            Self::UnknownParameter { .. } => ErrorCode::PARAMETER_UNKNOWN,
            Self::OverrideSyntax { .. } => ErrorCode::PARAMETER_SYNTAX,
            Self::Validation { .. } => ErrorCode::PARAMETER_OUT_OF_RANGE,
            Self::NonFinite { .. } => ErrorCode::CALCULATION_NON_FINITE,
            Self::Excel(_) => ErrorCode::EXPORT_EXCEL,
            Self::Pdf(_) => ErrorCode::EXPORT_PDF,
            Self::Csv(_) => ErrorCode::EXPORT_CSV,
        }
    }

    /// Whether the user can fix this by changing inputs or configuration.
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::Data { .. }
                | Self::UnsupportedFile { .. }
                | Self::MissingColumns { .. }
                | Self::Config { .. }
                | Self::UnknownName { .. }
                | Self::UnknownParameter { .. }
                | Self::OverrideSyntax { .. }
                | Self::Validation { .. }
        ) || matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

impl From<rust_xlsxwriter::XlsxError> for RoiError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Excel(err.to_string())
    }
}

impl From<csv::Error> for RoiError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RoiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_e001_and_is_fixable() {
        let err = RoiError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            "/tmp/missing.csv",
        );
        assert_eq!(err.code(), ErrorCode::IO_FILE_NOT_FOUND);
        assert!(err.is_user_fixable());
        assert!(err.to_string().contains("/tmp/missing.csv"));
    }

    #[test]
    fn validation_message_lists_every_issue() {
        let err = RoiError::Validation {
            issues: vec![
                ValidationIssue {
                    key: "pgx.annual_volume".into(),
                    value: 10.0,
                    message: "below minimum 100".into(),
                },
                ValidationIssue {
                    key: "ipc.cost_per_hai".into(),
                    value: 90000.0,
                    message: "above maximum 50000".into(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 invalid parameter value(s)"));
        assert!(text.contains("pgx.annual_volume"));
        assert!(text.contains("ipc.cost_per_hai"));
        assert_eq!(err.code().as_str(), "E050");
    }

    #[test]
    fn export_errors_are_not_user_fixable() {
        assert!(!RoiError::Pdf("font".into()).is_user_fixable());
        assert_eq!(RoiError::Excel("x".into()).code(), ErrorCode::EXPORT_EXCEL);
    }

    #[test]
    fn missing_columns_joins_names() {
        let err = RoiError::MissingColumns {
            path: PathBuf::from("beds.csv"),
            missing: vec!["facility".into(), "bed_days_annual".into()],
        };
        assert_eq!(
            err.to_string(),
            "beds.csv is missing required columns: facility, bed_days_annual"
        );
    }
}
