//! Facility data import.
//!
//! CSV files are read into a [`DataFile`], classified by their headers into
//! a [`DataKind`], and parsed into typed records that together make up a
//! [`FacilityDataset`]. The dataset feeds measured rates and volumes into
//! the calculation inputs.

mod dataset;
mod loader;
pub mod records;
pub mod summary;
mod templates;

pub use dataset::{merge_facility_datasets, FacilityDataset};
pub use loader::{
    load_directory, load_file, parse_records, validate_columns, DataFile, DIRECTORY_FILES,
};
pub use records::{BedDaysRecord, DotRecord, GeneticTestRecord, HaiRateRecord};
pub use summary::{
    bed_days_summary, dot_by_quarter, dot_by_facility, hai_type_summary, BedDaysSummary,
    DotFacilitySummary, DotQuarterSummary, HaiTypeSummary,
};
pub use templates::template_csv;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a CSV file contains, judged from its header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    HaiRates,
    AntibioticDot,
    PatientDays,
    GeneticTests,
    Generic,
}

impl DataKind {
    pub const TYPED: [DataKind; 4] = [
        DataKind::HaiRates,
        DataKind::AntibioticDot,
        DataKind::PatientDays,
        DataKind::GeneticTests,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::HaiRates => "hai_rates",
            Self::AntibioticDot => "antibiotic_dot",
            Self::PatientDays => "patient_days",
            Self::GeneticTests => "genetic_tests",
            Self::Generic => "generic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HaiRates => "HAI Rates",
            Self::AntibioticDot => "Antibiotic DOT",
            Self::PatientDays => "Patient Bed Days",
            Self::GeneticTests => "Genetic Tests",
            Self::Generic => "Generic",
        }
    }

    /// Columns a typed file must carry. Each entry lists the accepted
    /// spellings of one column, canonical name first.
    pub fn required_columns(&self) -> &'static [&'static [&'static str]] {
        match self {
            Self::HaiRates => &[
                &["facility"],
                &["hai_type"],
                &["rolling_12_months_rate", "infection_rate"],
            ],
            Self::AntibioticDot => &[&["facility"], &["quarter"], &["year"], &["dot_per_1000_days"]],
            Self::PatientDays => &[
                &["facility"],
                &["bed_days_annual", "bed_days", "patient_days"],
            ],
            Self::GeneticTests => &[&["test_type"], &["annual_volume", "test_volume"]],
            Self::Generic => &[],
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for DataKind {
    type Err = crate::error::RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        [Self::HaiRates, Self::AntibioticDot, Self::PatientDays, Self::GeneticTests, Self::Generic]
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| crate::error::RoiError::UnknownName {
                kind: "data kind",
                name: s.to_string(),
                expected: "hai_rates, antibiotic_dot, patient_days, genetic_tests, generic".into(),
            })
    }
}

/// Classify a file by its headers. HAI rates win over DOT, DOT over
/// patient days, patient days over genetic tests.
pub fn detect_kind<S: AsRef<str>>(headers: &[S]) -> DataKind {
    let has = |name: &str| headers.iter().any(|h| h.as_ref().trim() == name);

    if has("hai_type") || has("infection_rate") {
        DataKind::HaiRates
    } else if has("dot_per_1000_days") || has("antibiotic") {
        DataKind::AntibioticDot
    } else if has("bed_days") || has("bed_days_annual") || has("patient_days") {
        DataKind::PatientDays
    } else if has("test_volume") || has("sample_id") || (has("test_type") && has("annual_volume"))
    {
        DataKind::GeneticTests
    } else {
        DataKind::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_kind() {
        assert_eq!(
            detect_kind(&["facility", "hai_type", "rolling_12_months_rate"]),
            DataKind::HaiRates
        );
        assert_eq!(
            detect_kind(&["facility", "quarter", "dot_per_1000_days"]),
            DataKind::AntibioticDot
        );
        assert_eq!(detect_kind(&["facility", "bed_days_annual"]), DataKind::PatientDays);
        assert_eq!(detect_kind(&["sample_id", "result"]), DataKind::GeneticTests);
        assert_eq!(
            detect_kind(&["test_type", "annual_volume", "in_house_cost"]),
            DataKind::GeneticTests
        );
        assert_eq!(detect_kind(&["name", "value"]), DataKind::Generic);
    }

    #[test]
    fn hai_rates_take_precedence() {
        assert_eq!(
            detect_kind(&["infection_rate", "patient_days", "antibiotic"]),
            DataKind::HaiRates
        );
        assert_eq!(detect_kind(&["antibiotic", "bed_days"]), DataKind::AntibioticDot);
    }

    #[test]
    fn detected_aliases_are_accepted_columns() {
        for headers in [
            &["facility", "patient_days"][..],
            &["facility", "bed_days"][..],
            &["facility", "hai_type", "infection_rate"][..],
            &["test_type", "test_volume"][..],
        ] {
            let kind = detect_kind(headers);
            assert_ne!(kind, DataKind::Generic);
            for column in kind.required_columns() {
                assert!(
                    column.iter().any(|name| headers.contains(name)),
                    "{kind}: {headers:?} lacks {}",
                    column[0]
                );
            }
        }
    }

    #[test]
    fn kind_parses_from_slug() {
        assert_eq!("hai-rates".parse::<DataKind>().unwrap(), DataKind::HaiRates);
        assert!("spreadsheet".parse::<DataKind>().is_err());
    }
}
