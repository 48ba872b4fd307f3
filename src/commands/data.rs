use super::Session;
use crate::cli::DataCommand;
use crate::data::{
    bed_days_summary, dot_by_quarter, hai_type_summary, load_directory, load_file, template_csv,
    validate_columns, DataFile, DataKind, FacilityDataset,
};
use crate::formatting::{format_currency, format_number};
use crate::io;
use anyhow::{bail, Context, Result};
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use std::fmt::Write;
use std::path::Path;

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn table(plain: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(if plain {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL
        })
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn handle_data(session: &Session, command: &DataCommand) -> Result<()> {
    let plain = session.formatting.is_plain();
    let formatter = session.formatting.formatter();
    match command {
        DataCommand::Load { path, rows } => {
            let file = load_file(path)
                .with_context(|| format!("Failed to load data file: {}", path.display()))?;
            print!("{}", render_preview(&file, *rows, plain)?);
        }
        DataCommand::Validate { path, kind } => {
            let kind = validate_file(path, *kind)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "{} is a valid {} file",
                    path.display(),
                    kind.display_name()
                ))
            );
        }
        DataCommand::Template { kind, output } => {
            let Some(template) = template_csv(*kind) else {
                bail!("No template for {} files", kind.display_name());
            };
            match output {
                Some(path) => {
                    io::write_file(path, template)?;
                    println!(
                        "{}",
                        formatter.success(&format!("Template written to {}", path.display()))
                    );
                }
                None => print!("{template}"),
            }
        }
        DataCommand::Summary { dir } => {
            let Some(dir) = dir.as_deref().or(session.config.data_directory().map(|d| d.as_path()))
            else {
                bail!("No data directory given and none configured under [data] in the config file");
            };
            let dataset = load_directory(dir)
                .with_context(|| format!("Failed to load facility data: {}", dir.display()))?;
            if dataset.is_empty() {
                println!("{}", formatter.warning(&format!("No data files found in {}", dir.display())));
                return Ok(());
            }
            print!("{}", render_summary(&dataset, plain)?);
        }
    }
    Ok(())
}

/// Check a file against `kind`, or its detected kind, parsing every row.
pub fn validate_file(path: &Path, kind: Option<DataKind>) -> Result<DataKind> {
    let mut file = load_file(path)
        .with_context(|| format!("Failed to load data file: {}", path.display()))?;
    let kind = kind.unwrap_or(file.kind);
    if kind == DataKind::Generic {
        bail!(
            "Could not detect the data kind of {}; pass --kind ({})",
            path.display(),
            DataKind::TYPED.map(|k| k.slug()).join(", ")
        );
    }

    validate_columns(path, &file.headers, kind.required_columns())?;
    file.kind = kind;
    let rows = file.row_count();
    FacilityDataset::default()
        .add(file)
        .with_context(|| format!("Rows in {} do not parse as {}", path.display(), kind.display_name()))?;
    tracing::info!(path = %path.display(), %kind, rows, "data file valid");
    Ok(kind)
}

pub fn render_preview(file: &DataFile, rows: usize, plain: bool) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "File: {}", file.path.display())?;
    writeln!(out, "Detected kind: {}", file.kind.display_name())?;
    writeln!(
        out,
        "{} rows x {} columns",
        file.row_count(),
        file.column_count()
    )?;

    let mut t = table(plain);
    t.set_header(file.headers.clone());
    for row in file.preview(rows) {
        t.add_row(row.clone());
    }
    writeln!(out, "{t}")?;
    if file.row_count() > rows {
        writeln!(out, "... {} more rows", file.row_count() - rows)?;
    }
    Ok(out)
}

pub fn render_summary(dataset: &FacilityDataset, plain: bool) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Loaded {} data files", dataset.sources.len())?;

    if let Some(summary) = bed_days_summary(&dataset.bed_days) {
        writeln!(out)?;
        writeln!(out, "Patient bed days ({} facilities)", summary.facilities.len())?;
        writeln!(out, "  Total:   {}", format_number(summary.total))?;
        writeln!(out, "  Average: {}", format_number(summary.average))?;
    }

    let hai = hai_type_summary(&dataset.hai_rates);
    if !hai.is_empty() {
        writeln!(out)?;
        writeln!(out, "HAI rates by type")?;
        let mut t = table(plain);
        t.set_header(vec!["HAI Type", "Average", "Max", "Min", "Facilities > 0"]);
        for row in &hai {
            t.add_row(vec![
                Cell::new(&row.hai_type),
                right(format!("{:.3}", row.average)),
                right(format!("{:.3}", row.max)),
                right(format!("{:.3}", row.min)),
                right(row.facilities_above_zero),
            ]);
        }
        writeln!(out, "{t}")?;
    }

    let dot = dot_by_quarter(&dataset.antibiotic_dot);
    if !dot.is_empty() {
        writeln!(out)?;
        writeln!(out, "Antibiotic DOT per 1000 days by quarter")?;
        let mut t = table(plain);
        t.set_header(vec!["Quarter", "Mean", "Min", "Max"]);
        for row in &dot {
            t.add_row(vec![
                Cell::new(format!("{} {}", row.year, row.quarter)),
                right(format!("{:.1}", row.mean)),
                right(format!("{:.1}", row.min)),
                right(format!("{:.1}", row.max)),
            ]);
        }
        writeln!(out, "{t}")?;
    }

    if !dataset.genetic_tests.is_empty() {
        writeln!(out)?;
        writeln!(out, "Genetic test volumes")?;
        let mut t = table(plain);
        t.set_header(vec!["Test", "Annual Volume", "In-House Cost", "Outsource Cost"]);
        for test in &dataset.genetic_tests {
            let cost = |c: Option<f64>| c.map(format_currency).unwrap_or_else(|| "-".into());
            t.add_row(vec![
                Cell::new(&test.test_type),
                right(format_number(test.annual_volume)),
                right(cost(test.in_house_cost)),
                right(cost(test.outsource_cost)),
            ]);
        }
        writeln!(out, "{t}")?;
    }

    let inputs = dataset.facility_inputs();
    if !inputs.is_empty() {
        writeln!(out)?;
        writeln!(out, "Calculation inputs derived from this data")?;
        if let Some(days) = inputs.total_bed_days {
            writeln!(out, "  ipc.annual_patient_days   {}", format_number(days))?;
        }
        if let Some(rate) = inputs.cdi_rate {
            writeln!(out, "  mean CDI rate             {rate:.3}")?;
        }
        if let Some(dot) = inputs.annual_dot() {
            writeln!(out, "  stewardship.annual_dot    {}", format_number(dot))?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn validates_detected_kind() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "dot.csv", template_csv(DataKind::AntibioticDot).unwrap());
        assert_eq!(validate_file(&path, None).unwrap(), DataKind::AntibioticDot);
    }

    #[test]
    fn explicit_kind_reports_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "beds.csv", template_csv(DataKind::PatientDays).unwrap());
        let err = validate_file(&path, Some(DataKind::HaiRates)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("hai_type"), "{message}");
        assert!(message.contains("rolling_12_months_rate"), "{message}");
    }

    #[test]
    fn unparseable_rows_fail_validation() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "beds.csv",
            indoc! {"
                facility,facility_code,bed_days_annual
                Fresno,570,lots
            "},
        );
        assert!(validate_file(&path, None).is_err());
    }

    #[test]
    fn generic_file_needs_explicit_kind() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "misc.csv", "a,b\n1,2\n");
        let err = validate_file(&path, None).unwrap_err();
        assert!(err.to_string().contains("--kind"));
    }

    #[test]
    fn preview_is_truncated() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "hai.csv", template_csv(DataKind::HaiRates).unwrap());
        let file = load_file(&path).unwrap();
        let text = render_preview(&file, 1, true).unwrap();
        assert!(text.contains("Detected kind: HAI Rates"));
        assert!(text.contains("2 rows x 4 columns"));
        assert!(text.contains("... 1 more rows"));
    }

    #[test]
    fn summary_derives_calculation_inputs() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "visn21_patient_bed_days.csv",
            indoc! {"
                facility,facility_code,bed_days_annual
                Palo Alto,640,120000
                Fresno,570,45000
                VISN 21,V21,165000
            "},
        );
        write(
            &dir,
            "visn21_antibiotic_dot.csv",
            indoc! {"
                facility,quarter,year,dot_per_1000_days
                Palo Alto,Q1,2024,400
                Fresno,Q1,2024,600
            "},
        );
        let dataset = load_directory(dir.path()).unwrap();
        let text = render_summary(&dataset, true).unwrap();

        assert!(text.contains("Loaded 2 data files"));
        assert!(text.contains("Total:   165,000"));
        assert!(text.contains("ipc.annual_patient_days   165,000"));
        assert!(text.contains("stewardship.annual_dot    82,500"));
    }
}
