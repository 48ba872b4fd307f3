//! Flat `section,metric,value,display` rows for spreadsheets and scripts.

use super::OutputWriter;
use crate::analysis::RoiReport;
use crate::core::MetricValue;
use crate::formatting::{format_currency, format_months, format_percent};
use std::io::Write;

pub const CSV_HEADER: [&str; 4] = ["section", "metric", "value", "display"];

/// One exported row. `value` is empty for text metrics and missing payback.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub section: String,
    pub metric: String,
    pub value: Option<f64>,
    pub display: String,
}

impl CsvRow {
    fn new(section: &str, metric: &str, value: Option<f64>, display: String) -> Self {
        Self {
            section: section.to_string(),
            metric: metric.to_string(),
            value,
            display,
        }
    }

    fn currency(section: &str, metric: &str, value: f64) -> Self {
        Self::new(section, metric, Some(value), format_currency(value))
    }

    fn percent(section: &str, metric: &str, value: f64) -> Self {
        Self::new(section, metric, Some(value), format_percent(value))
    }

    fn months(section: &str, metric: &str, value: Option<f64>) -> Self {
        Self::new(section, metric, value, format_months(value))
    }

    fn from_metric(section: &str, label: &str, value: &MetricValue) -> Self {
        Self::new(section, label, value.as_f64(), value.display())
    }
}

/// Every figure in the report as flat rows, summary first.
pub fn report_rows(report: &RoiReport) -> Vec<CsvRow> {
    let summary = &report.results.summary;
    let mut rows = vec![
        CsvRow::currency("summary", "Total Annual Savings", summary.total_savings),
        CsvRow::currency("summary", "Total Investment", summary.total_investment),
        CsvRow::currency("summary", "Net Benefit", summary.net_benefit),
        CsvRow::percent("summary", "ROI", summary.roi_percent),
        CsvRow::months("summary", "Payback Period", summary.payback_months),
    ];

    if let Some(clinical) = &report.results.clinical {
        rows.extend([
            CsvRow::from_metric(
                "clinical",
                "HAIs Prevented",
                &MetricValue::Count(clinical.hais_prevented),
            ),
            CsvRow::from_metric(
                "clinical",
                "Lives Saved",
                &MetricValue::Count(clinical.lives_saved),
            ),
            CsvRow::from_metric(
                "clinical",
                "Hospital Days Saved",
                &MetricValue::Days(clinical.hospital_days_saved),
            ),
        ]);
    }

    for component in &report.results.components {
        let section = component.key.as_str();
        rows.push(CsvRow::currency(section, "Total Savings", component.total_savings));
        if let Some(roi) = component.roi_percent {
            rows.push(CsvRow::percent(section, "ROI", roi));
        }
        rows.push(CsvRow::from_metric(
            section,
            &component.headline.label,
            &component.headline.value,
        ));
        rows.extend(
            component
                .metrics
                .iter()
                .map(|m| CsvRow::from_metric(section, &m.label, &m.value)),
        );
        rows.extend(
            component
                .breakdown
                .iter()
                .map(|line| CsvRow::currency(section, &line.label, line.amount)),
        );
    }

    for year in &report.projection {
        let label = format!("Year {}", year.year);
        rows.push(CsvRow::currency("projection", &format!("{label} Savings"), year.savings));
        rows.push(CsvRow::currency("projection", &format!("{label} Cost"), year.cost));
        rows.push(CsvRow::currency(
            "projection",
            &format!("{label} Cumulative Net"),
            year.cumulative_net,
        ));
    }

    for scenario in &report.scenarios {
        rows.push(CsvRow::currency(
            "scenarios",
            &format!("{} Savings", scenario.name),
            scenario.annual_savings,
        ));
        rows.push(CsvRow::percent(
            "scenarios",
            &format!("{} ROI", scenario.name),
            scenario.roi_percent,
        ));
    }

    rows
}

pub struct CsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_report(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        let mut csv = ::csv::Writer::from_writer(&mut self.writer);
        csv.write_record(CSV_HEADER)?;
        for row in report_rows(report) {
            let value = row.value.map(|v| v.to_string()).unwrap_or_default();
            csv.write_record([
                row.section.as_str(),
                row.metric.as_str(),
                value.as_str(),
                row.display.as_str(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrganizationType, Product};
    use crate::output::test_support::report;
    use pretty_assertions::assert_eq;

    fn render(product: Product, org: OrganizationType) -> String {
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .write_report(&report(product, org))
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn csv_starts_with_header_and_summary() {
        let text = render(Product::PraediAlert, OrganizationType::Visn21);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("section,metric,value,display"));
        assert_eq!(
            lines.next(),
            Some("summary,Total Annual Savings,5154200,\"$5,154,200\"")
        );
    }

    #[test]
    fn csv_reads_back_with_consistent_width() {
        let text = render(Product::PraediGene, OrganizationType::LargeHospital);
        let mut reader = ::csv::Reader::from_reader(text.as_bytes());
        let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert!(records.iter().all(|r| r.len() == 4));
        assert!(records.iter().any(|r| &r[0] == "pgx"));
        assert!(records.iter().any(|r| &r[0] == "cytogenetics"));
    }

    #[test]
    fn clinical_rows_only_for_praedialert() {
        let gene = report_rows(&report(Product::PraediGene, OrganizationType::Visn21));
        assert!(gene.iter().all(|r| r.section != "clinical"));

        let alert = report_rows(&report(Product::PraediAlert, OrganizationType::Visn21));
        let hais = alert
            .iter()
            .find(|r| r.section == "clinical" && r.metric == "HAIs Prevented")
            .unwrap();
        assert_eq!(hais.value, Some(27.0));
    }
}
