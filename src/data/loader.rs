//! Reading CSV files from disk.

use super::dataset::FacilityDataset;
use super::{detect_kind, DataKind};
use crate::error::{Result, RoiError};
use crate::observability::{set_current_artifact, set_phase, ReportPhase};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Files read by [`load_directory`], in load order.
pub const DIRECTORY_FILES: [&str; 4] = [
    "visn21_patient_bed_days.csv",
    "visn21_hai_rates.csv",
    "visn21_antibiotic_dot.csv",
    "genetic_tests.csv",
];

/// A CSV file held as strings, with its detected kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataFile {
    pub path: PathBuf,
    pub kind: DataKind,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataFile {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn preview(&self, rows: usize) -> &[Vec<String>] {
        &self.rows[..rows.min(self.rows.len())]
    }

    /// Parse from in-memory CSV text.
    pub fn from_reader(path: impl Into<PathBuf>, reader: impl std::io::Read) -> Result<Self> {
        let path = path.into();
        let malformed = |e: csv::Error| RoiError::data(&path, e.to_string());

        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);
        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(malformed)?
            .iter()
            .map(str::to_string)
            .collect();
        let rows = csv_reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(str::to_string).collect())
                    .map_err(malformed)
            })
            .collect::<Result<Vec<Vec<String>>>>()?;

        Ok(Self {
            kind: detect_kind(&headers),
            path,
            headers,
            rows,
        })
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Load one CSV file and detect its kind.
///
/// # Errors
///
/// Fails for non-CSV extensions, unreadable files and malformed rows.
pub fn load_file(path: &Path) -> Result<DataFile> {
    let _artifact = set_current_artifact(path);
    if !is_csv(path) {
        return Err(RoiError::UnsupportedFile {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| RoiError::io(e, path))?;
    let data = DataFile::from_reader(path, file)?;
    tracing::info!(
        path = %path.display(),
        kind = %data.kind,
        rows = data.row_count(),
        columns = data.column_count(),
        "loaded data file"
    );
    Ok(data)
}

/// Report every expected column absent from `headers`. A column is present
/// when any of its spellings is; a missing one is named by its first.
pub fn validate_columns<S: AsRef<str>>(
    path: &Path,
    headers: &[S],
    expected: &[&[&str]],
) -> Result<()> {
    let missing: Vec<String> = expected
        .iter()
        .filter(|names| !names.iter().any(|name| headers.iter().any(|h| h.as_ref() == *name)))
        .filter_map(|names| names.first().map(|name| (*name).to_string()))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RoiError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        })
    }
}

/// Deserialize the rows of a file into typed records.
pub fn parse_records<T: DeserializeOwned>(file: &DataFile) -> Result<Vec<T>> {
    validate_columns(&file.path, &file.headers, file.kind.required_columns())?;
    let headers = csv::StringRecord::from(file.headers.clone());
    file.rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            csv::StringRecord::from(row.clone())
                .deserialize::<T>(Some(&headers))
                .map_err(|e| RoiError::data(&file.path, format!("row {}: {e}", index + 2)))
        })
        .collect()
}

/// Load the known data files from a directory. Missing files are skipped.
///
/// # Errors
///
/// Fails when a present file cannot be read or parsed.
pub fn load_directory(dir: &Path) -> Result<FacilityDataset> {
    let _phase = set_phase(ReportPhase::DataLoading);
    if !dir.is_dir() {
        return Err(RoiError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "data directory not found"),
            dir,
        ));
    }

    let mut dataset = FacilityDataset::default();
    for name in DIRECTORY_FILES {
        let path = dir.join(name);
        if !path.exists() {
            tracing::info!(file = name, "data file not present, skipping");
            continue;
        }
        dataset.add(load_file(&path)?)?;
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::{BedDaysRecord, HaiRateRecord};
    use indoc::indoc;
    use tempfile::TempDir;

    const BED_DAYS: &str = indoc! {"
        facility,facility_code,bed_days_annual
        Palo Alto,640,120000
        Fresno,570,45000
        VISN 21,V21,165000
    "};

    #[test]
    fn reads_headers_and_rows() {
        let file = DataFile::from_reader("beds.csv", BED_DAYS.as_bytes()).unwrap();
        assert_eq!(file.kind, DataKind::PatientDays);
        assert_eq!(file.column_count(), 3);
        assert_eq!(file.row_count(), 3);
        assert_eq!(file.preview(2).len(), 2);
        assert_eq!(file.preview(10).len(), 3);
    }

    #[test]
    fn parses_typed_records() {
        let file = DataFile::from_reader("beds.csv", BED_DAYS.as_bytes()).unwrap();
        let records: Vec<BedDaysRecord> = parse_records(&file).unwrap();
        assert_eq!(records[1].facility, "Fresno");
        assert_eq!(records[1].bed_days_annual, 45_000.0);
        assert_eq!(records[0].facility_code.as_deref(), Some("640"));
    }

    #[test]
    fn bad_number_reports_row() {
        let csv = "facility,bed_days_annual\nFresno,lots\n";
        let file = DataFile::from_reader("beds.csv", csv.as_bytes()).unwrap();
        let err = parse_records::<BedDaysRecord>(&file).unwrap_err();
        assert!(err.to_string().contains("row 2"), "{err}");
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let csv = "facility,bed_days_annual\nFresno\n";
        let err = DataFile::from_reader("beds.csv", csv.as_bytes()).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::DATA_MALFORMED);
    }

    #[test]
    fn validate_lists_all_missing_columns() {
        let err = validate_columns(
            Path::new("dot.csv"),
            &["facility"],
            DataKind::AntibioticDot.required_columns(),
        )
        .unwrap_err();
        match err {
            RoiError::MissingColumns { missing, .. } => {
                assert_eq!(missing, ["quarter", "year", "dot_per_1000_days"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn aliased_headers_parse_into_records() {
        let csv = indoc! {"
            facility,patient_days
            Palo Alto,120000
        "};
        let file = DataFile::from_reader("beds.csv", csv.as_bytes()).unwrap();
        assert_eq!(file.kind, DataKind::PatientDays);
        let records: Vec<BedDaysRecord> = parse_records(&file).unwrap();
        assert_eq!(records[0].bed_days_annual, 120_000.0);

        let csv = "facility,hai_type,infection_rate\nFresno,CDI,0.41\n";
        let file = DataFile::from_reader("hai.csv", csv.as_bytes()).unwrap();
        assert_eq!(file.kind, DataKind::HaiRates);
        let records: Vec<HaiRateRecord> = parse_records(&file).unwrap();
        assert_eq!(records[0].rolling_12_months_rate, 0.41);
    }

    #[test]
    fn missing_aliased_column_is_named_canonically() {
        let err = validate_columns(
            Path::new("beds.csv"),
            &["facility", "beds"],
            DataKind::PatientDays.required_columns(),
        )
        .unwrap_err();
        match err {
            RoiError::MissingColumns { missing, .. } => assert_eq!(missing, ["bed_days_annual"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_csv_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, b"").unwrap();
        let err = load_file(&path).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::DATA_UNSUPPORTED);
    }

    #[test]
    fn directory_skips_missing_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("visn21_patient_bed_days.csv"), BED_DAYS).unwrap();
        let dataset = load_directory(dir.path()).unwrap();
        assert_eq!(dataset.bed_days.len(), 3);
        assert!(dataset.hai_rates.is_empty());
        assert_eq!(dataset.sources.len(), 1);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = load_directory(Path::new("/nonexistent/praedi-data")).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::IO_FILE_NOT_FOUND);
    }
}
