use super::{report_date, OutputWriter, View};
use crate::analysis::RoiReport;
use crate::charts::{
    component_breakdown, five_year_cumulative, render_text, scenario_comparison,
    sensitivity_tornado,
};
use crate::core::ComponentResult;
use crate::formatting::{
    format_currency, format_months, format_percent, format_points, section_icon,
    FormattingConfig, OutputFormatter,
};
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use std::io::Write;

const CHART_WIDTH: usize = 40;
const TORNADO_ROWS: usize = 8;
const RULE_WIDTH: usize = 55;

pub struct TerminalWriter<W: Write> {
    writer: W,
    view: View,
    config: FormattingConfig,
    formatter: Box<dyn OutputFormatter>,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, view: View, config: FormattingConfig) -> Self {
        Self {
            writer,
            view,
            formatter: config.formatter(),
            config,
        }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        match self.view {
            View::Executive => self.write_executive(report)?,
            View::Detailed => {
                for component in &report.results.components {
                    self.write_component(component)?;
                }
                let chart = component_breakdown(&report.results);
                self.write_chart(&render_text(&chart, CHART_WIDTH))?;
            }
            View::Comparison => self.write_comparison(report)?,
        }
        Ok(())
    }
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

impl<W: Write> TerminalWriter<W> {
    fn plain(&self) -> bool {
        self.config.is_plain()
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.plain() {
                presets::ASCII_FULL
            } else {
                presets::UTF8_FULL
            })
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    fn section(&mut self, key: &str, title: &str) -> anyhow::Result<()> {
        let (emoji, fallback) = section_icon(key);
        let icon = self.formatter.emoji(emoji, fallback);
        writeln!(self.writer)?;
        writeln!(self.writer, "{icon} {}", self.formatter.header(title))?;
        Ok(())
    }

    fn write_header(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        let product = report.product();
        let (emoji, fallback) = section_icon(product.slug());
        let icon = self.formatter.emoji(emoji, fallback);
        let rule = if self.plain() { "=" } else { "═" }.repeat(RULE_WIDTH);
        writeln!(self.writer, "{}", self.formatter.info(&rule))?;
        writeln!(
            self.writer,
            "{icon} {}",
            self.formatter.bold(&format!("{product} ROI Analysis: {}", self.view.title()))
        )?;
        writeln!(self.writer, "{}", self.formatter.dim(product.tagline()))?;
        writeln!(self.writer, "{}", self.formatter.info(&rule))?;
        writeln!(
            self.writer,
            "Organization: {}   Model: {}   {}",
            report.results.organization,
            report.results.model,
            report_date(&report.generated_at)
        )?;
        Ok(())
    }

    fn write_summary(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        let summary = &report.results.summary;
        self.section("summary", "Key Metrics")?;

        let mut table = self.table();
        table.set_header(vec!["Metric", "Value"]);
        let mut rows = vec![
            ("Total Annual Savings", format_currency(summary.total_savings)),
            ("Total Investment", format_currency(summary.total_investment)),
            ("Net Benefit", format_currency(summary.net_benefit)),
            ("Return on Investment", format_percent(summary.roi_percent)),
            ("Payback Period", format_months(summary.payback_months)),
        ];
        if let Some(clinical) = &report.results.clinical {
            rows.extend([
                ("HAIs Prevented", format!("{:.0}", clinical.hais_prevented)),
                ("Lives Saved", format!("{:.0}", clinical.lives_saved)),
                ("Hospital Days Saved", format!("{:.0}", clinical.hospital_days_saved)),
            ]);
        }
        for (label, value) in rows {
            table.add_row(vec![
                Cell::new(label),
                right(value),
            ]);
        }
        writeln!(self.writer, "{table}")?;

        let net = self.formatter.signed_currency(summary.net_benefit);
        let verdict = if summary.net_benefit >= 0.0 {
            self.formatter.success("pays for itself in the first year")
        } else {
            self.formatter.warning("does not pay back in the first year")
        };
        writeln!(self.writer, "First-year net {net}: {verdict}")?;
        Ok(())
    }

    fn write_executive(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        self.section("projection", "5-Year Financial Projection")?;
        let mut table = self.table();
        table.set_header(vec!["Year", "Savings", "Cost", "Net", "Cumulative Net", "Cum. ROI"]);
        for year in &report.projection {
            table.add_row(vec![
                Cell::new(year.year),
                right(format_currency(year.savings)),
                right(format_currency(year.cost)),
                right(format_currency(year.net_benefit)),
                right(format_currency(year.cumulative_net)),
                right(format_percent(year.cumulative_roi)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        match report.payback.break_even_month {
            Some(month) => writeln!(self.writer, "Break-even: month {month}")?,
            None => writeln!(
                self.writer,
                "{}",
                self.formatter.warning(&format!(
                    "No break-even within {} months",
                    report.payback.months.len()
                ))
            )?,
        }
        self.write_chart(&render_text(&five_year_cumulative(&report.projection), CHART_WIDTH))?;

        if let Some(contract) = &report.contract {
            self.section("summary", "VISN21 Contract")?;
            let mut table = self.table();
            table.set_header(vec!["Contract Year", "Cost", "Net", "Cumulative Net"]);
            for year in &contract.years {
                table.add_row(vec![
                    Cell::new(&year.label),
                    right(format_currency(year.cost)),
                    right(format_currency(year.net_benefit)),
                    right(format_currency(year.cumulative_net)),
                ]);
            }
            writeln!(self.writer, "{table}")?;
            writeln!(
                self.writer,
                "Contract total {} for {} hospitals, 5-year ROI {}",
                format_currency(contract.contract_total),
                contract.quote.hospitals,
                format_percent(contract.roi_percent)
            )?;
        }
        Ok(())
    }

    fn write_component(&mut self, component: &ComponentResult) -> anyhow::Result<()> {
        self.section(&component.key, &component.title)?;
        let mut headline = format!(
            "{}: {}   Total savings: {}",
            component.headline.label,
            component.headline.value.display(),
            format_currency(component.total_savings)
        );
        if let Some(roi) = component.roi_percent {
            headline.push_str(&format!("   ROI: {}", format_percent(roi)));
        }
        writeln!(self.writer, "{}", self.formatter.bold(&headline))?;

        let mut table = self.table();
        table.set_header(vec!["Metric", "Value"]);
        for metric in &component.metrics {
            table.add_row(vec![
                Cell::new(&metric.label),
                right(metric.value.display()),
            ]);
        }
        for line in &component.breakdown {
            table.add_row(vec![
                Cell::new(format!("Savings: {}", line.label)),
                right(format_currency(line.amount)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }

    fn write_comparison(&mut self, report: &RoiReport) -> anyhow::Result<()> {
        self.section("summary", "Scenario Comparison")?;
        let mut table = self.table();
        table.set_header(vec!["Scenario", "Factor", "Savings", "Net", "ROI", "Payback"]);
        for scenario in &report.scenarios {
            table.add_row(vec![
                Cell::new(scenario.name),
                right(format!("x{:.1}", scenario.factor)),
                right(format_currency(scenario.annual_savings)),
                right(format_currency(scenario.net_benefit)),
                right(format_percent(scenario.roi_percent)),
                right(format_months(scenario.payback_months)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        self.write_chart(&render_text(&scenario_comparison(&report.scenarios), CHART_WIDTH))?;

        self.section("summary", "Sensitivity (±10%)")?;
        let mut table = self.table();
        table.set_header(vec!["Parameter", "Base", "Low ROI", "High ROI", "Swing"]);
        for entry in report.sensitivity.iter().take(TORNADO_ROWS) {
            table.add_row(vec![
                Cell::new(entry.label),
                right(entry.base_value),
                right(format_percent(entry.low_roi)),
                right(format_percent(entry.high_roi)),
                right(format_points(entry.swing)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        self.write_chart(&render_text(
            &sensitivity_tornado(&report.sensitivity, TORNADO_ROWS),
            CHART_WIDTH,
        ))?;
        Ok(())
    }

    fn write_chart(&mut self, chart: &str) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        write!(self.writer, "{chart}")?;
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
        TerminalWriter::new(&mut buffer, view, FormattingConfig::plain())
            .write_report(&report(product, org))
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn plain_executive_view_is_ascii_tables() {
        let text = render(View::Executive, Product::PraediAlert, OrganizationType::Visn21);
        assert!(text.contains("[ALERT] PraediAlert ROI Analysis: Executive Summary"));
        assert!(text.contains("$5,154,200"));
        assert!(text.contains("[PROJ] 5-Year Financial Projection"));
        assert!(text.contains("Option Year 4"));
        assert!(!text.contains('┌'));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn detailed_view_shows_breakdowns() {
        let text = render(View::Detailed, Product::PraediGene, OrganizationType::LargeHospital);
        assert!(text.contains("[PGX] PGx Pipeline"));
        assert!(text.contains("[CYTO] Cytogenetics Pipeline"));
        assert!(text.contains("Savings: "));
    }

    #[test]
    fn comparison_view_has_scenarios_and_tornado() {
        let text = render(View::Comparison, Product::PraediAlert, OrganizationType::MediumHospital);
        assert!(text.contains("Conservative"));
        assert!(text.contains("Optimistic"));
        assert!(text.contains("Sensitivity (±10%)"));
    }

    #[test]
    fn losing_deployment_is_flagged() {
        let mut inputs =
            crate::config::RoiInputs::new(Product::PraediGene, OrganizationType::SmallHospital);
        inputs.params.financial.implementation_cost = 50_000_000.0;
        let report = crate::analysis::build_report(&inputs).unwrap();

        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer, View::Executive, FormattingConfig::plain())
            .write_report(&report)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("does not pay back in the first year"));
    }
}
