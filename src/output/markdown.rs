use super::{report_date, OutputWriter, View};
use crate::analysis::{ContractAnalysis, RoiReport};
use crate::core::ComponentResult;
use crate::formatting::{format_currency, format_months, format_percent, format_points};
use std::io::Write;

/// Sensitivity rows shown before the table is cut off.
const SENSITIVITY_ROWS: usize = 10;

pub struct MarkdownWriter<W: Write> {
    writer: W,
    view: View,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W, view: View) -> Self {
        Self { writer, view }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        match self.view {
            View::Executive => {
                self.write_projection(report)?;
                if let Some(contract) = &report.contract {
                    self.write_contract(contract)?;
                }
            }
            View::Detailed => {
                for component in &report.results.components {
                    self.write_component(component)?;
                }
            }
            View::Comparison => {
                self.write_scenarios(report)?;
                self.write_sensitivity(report)?;
            }
        }
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# {} ROI Analysis", report.product())?;
        writeln!(self.writer)?;
        writeln!(self.writer, "_{}_", report.product().tagline())?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Organization: {} | Model: {} | View: {}",
            report.results.organization,
            report.results.model,
            self.view.title()
        )?;
        writeln!(self.writer, "Generated: {}", report_date(&report.generated_at))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        let summary = &report.results.summary;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        self.write_row("Total Annual Savings", &format_currency(summary.total_savings))?;
        self.write_row("Total Investment", &format_currency(summary.total_investment))?;
        self.write_row("Net Benefit", &format_currency(summary.net_benefit))?;
        self.write_row("ROI", &format_percent(summary.roi_percent))?;
        self.write_row("Payback Period", &format_months(summary.payback_months))?;
        if let Some(clinical) = &report.results.clinical {
            self.write_row("HAIs Prevented", &format!("{:.0}", clinical.hais_prevented))?;
            self.write_row("Lives Saved", &format!("{:.0}", clinical.lives_saved))?;
            self.write_row(
                "Hospital Days Saved",
                &format!("{:.0}", clinical.hospital_days_saved),
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_row(&mut self, label: &str, value: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "| {label} | {value} |")?;
        Ok(())
    }

    fn write_projection(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## 5-Year Projection")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Year | Savings | Cost | Net Benefit | Cumulative Net | Cumulative ROI |"
        )?;
        writeln!(
            self.writer,
            "|------|---------|------|-------------|----------------|----------------|"
        )?;
        for year in &report.projection {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} |",
                year.year,
                format_currency(year.savings),
                format_currency(year.cost),
                format_currency(year.net_benefit),
                format_currency(year.cumulative_net),
                format_percent(year.cumulative_roi)
            )?;
        }
        writeln!(self.writer)?;
        match report.payback.break_even_month {
            Some(month) => writeln!(self.writer, "Break-even in month {month}.")?,
            None => writeln!(
                self.writer,
                "No break-even within {} months.",
                report.payback.months.len()
            )?,
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_contract(&mut self, contract: &ContractAnalysis) -> anyhow::Result<()> {
        writeln!(self.writer, "## VISN21 Contract Analysis")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Contract Year | Cost | Savings | Net | Cumulative Net |")?;
        writeln!(self.writer, "|---------------|------|---------|-----|----------------|")?;
        for year in &contract.years {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} |",
                year.label,
                format_currency(year.cost),
                format_currency(year.savings),
                format_currency(year.net_benefit),
                format_currency(year.cumulative_net)
            )?;
        }
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "5-year contract total {} across {} hospitals; 5-year ROI {}.",
            format_currency(contract.contract_total),
            contract.quote.hospitals,
            format_percent(contract.roi_percent)
        )?;
        writeln!(
            self.writer,
            "Per hospital: base year {}, annual savings {}, 5-year net {}.",
            format_currency(contract.base_year_cost_per_hospital),
            format_currency(contract.annual_savings_per_hospital),
            format_currency(contract.net_benefit_per_hospital)
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_component(&mut self, component: &ComponentResult) -> anyhow::Result<()> {
        writeln!(self.writer, "## {}", component.title)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "**{}:** {}  ",
            component.headline.label,
            component.headline.value.display()
        )?;
        write!(
            self.writer,
            "**Total Savings:** {}",
            format_currency(component.total_savings)
        )?;
        match component.roi_percent {
            Some(roi) => writeln!(self.writer, " (ROI {})", format_percent(roi))?,
            None => writeln!(self.writer)?,
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        for metric in &component.metrics {
            self.write_row(&metric.label, &metric.value.display())?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "| Savings Source | Amount |")?;
        writeln!(self.writer, "|----------------|--------|")?;
        for line in &component.breakdown {
            self.write_row(&line.label, &format_currency(line.amount))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_scenarios(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Scenario Comparison")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Scenario | Annual Savings | Net Benefit | ROI | Payback |")?;
        writeln!(self.writer, "|----------|----------------|-------------|-----|---------|")?;
        for scenario in &report.scenarios {
            writeln!(
                self.writer,
                "| {} (x{:.1}) | {} | {} | {} | {} |",
                scenario.name,
                scenario.factor,
                format_currency(scenario.annual_savings),
                format_currency(scenario.net_benefit),
                format_percent(scenario.roi_percent),
                format_months(scenario.payback_months)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_sensitivity(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Sensitivity Analysis (±10%)")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Parameter | Low ROI | High ROI | ROI Swing |")?;
        writeln!(self.writer, "|-----------|---------|----------|-----------|")?;
        for entry in report.sensitivity.iter().take(SENSITIVITY_ROWS) {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                entry.label,
                format_percent(entry.low_roi),
                format_percent(entry.high_roi),
                format_points(entry.swing)
            )?;
        }
        if report.sensitivity.len() > SENSITIVITY_ROWS {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "_{} more parameters with smaller swings omitted._",
                report.sensitivity.len() - SENSITIVITY_ROWS
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrganizationType, Product};
    use crate::output::test_support::report;

    fn render(view: View, product: Product, org: OrganizationType) -> String {
        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer, view)
            .write_report(&report(product, org))
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn executive_view_has_summary_projection_and_contract() {
        let text = render(View::Executive, Product::PraediAlert, OrganizationType::Visn21);
        assert!(text.starts_with("# PraediAlert ROI Analysis"));
        assert!(text.contains("| Total Annual Savings | $5,154,200 |"));
        assert!(text.contains("| Total Investment | $1,435,000 |"));
        assert!(text.contains("## 5-Year Projection"));
        assert!(text.contains("## VISN21 Contract Analysis"));
        assert!(text.contains("| Option Year 4 |"));
    }

    #[test]
    fn detailed_view_lists_every_pipeline() {
        let text = render(View::Detailed, Product::PraediGene, OrganizationType::MediumHospital);
        for title in [
            "## PGx Pipeline",
            "## TSO500 Pipeline",
            "## BIAS2015 Pipeline",
            "## Cytogenetics Pipeline",
        ] {
            assert!(text.contains(title), "missing {title}");
        }
        assert!(!text.contains("Contract"));
    }

    #[test]
    fn comparison_view_caps_sensitivity_rows() {
        let text = render(View::Comparison, Product::PraediAlert, OrganizationType::LargeHospital);
        assert!(text.contains("| Conservative (x0.7) |"));
        assert!(text.contains("more parameters with smaller swings omitted"));
    }
}
