//! Excel workbook export with native charts.
//!
//! Every sheet lays its tables out from column A. Chart source data goes in
//! a block starting at [`CHART_DATA_COL`] so charts never depend on the
//! layout of the human-facing tables.

use super::report_date;
use crate::analysis::{ContractAnalysis, RoiReport};
use crate::charts::{
    component_breakdown, cumulative_monthly, five_year_cumulative, hai_type_comparison,
    savings_vs_investment, scenario_comparison, sensitivity_tornado, study_facility_reduction,
    ChartKind, ChartSpec, ValueFormat,
};
use crate::core::{ComponentResult, MetricValue};
use crate::error::Result;
use crate::observability::{set_phase, ReportPhase};
use crate::study::{
    annual_financials_per_facility, control_group, derived_comparisons, facility_summary,
    financial_impact, hai_types, sensitivity_table, target_hospitals, CostItem, STUDY_FACILITIES,
    STUDY_PERIOD,
};
use rust_xlsxwriter::{
    Chart, ChartFormat, ChartLine, ChartSolidFill, ChartType, Color, Format, FormatAlign,
    FormatBorder, Workbook, Worksheet,
};

const CHART_DATA_COL: u16 = 24;
const CHART_WIDTH: u32 = 640;
const CHART_HEIGHT: u32 = 360;
const TORNADO_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExcelOptions {
    /// Add the study sheets: facility results, HAI types, financial analysis
    pub comprehensive: bool,
}

/// Sheet title for a component, as the workbook tabs name them.
pub fn component_sheet_name(key: &str, title: &str) -> String {
    match key {
        "cytogenetics" => "Cytogenetics".to_string(),
        "stewardship" => "Antimicrobial".to_string(),
        "regulatory" => "Regulatory".to_string(),
        _ => title.chars().take(31).collect(),
    }
}

struct Formats {
    title: Format,
    subtitle: Format,
    header: Format,
    label: Format,
    bold: Format,
    currency: Format,
    bold_currency: Format,
    percent: Format,
    number: Format,
    decimal: Format,
}

impl Formats {
    fn new() -> Self {
        let navy = Color::RGB(0x000080);
        let bordered = Format::new().set_border(FormatBorder::Thin);
        Self {
            title: Format::new().set_bold().set_font_size(16).set_font_color(navy),
            subtitle: Format::new().set_italic().set_font_color(Color::Gray),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(navy)
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            label: bordered.clone(),
            bold: bordered.clone().set_bold(),
            currency: bordered.clone().set_num_format(ValueFormat::Currency.excel_format()),
            bold_currency: bordered
                .clone()
                .set_bold()
                .set_num_format(ValueFormat::Currency.excel_format()),
            percent: bordered.clone().set_num_format(ValueFormat::Percent.excel_format()),
            number: bordered.clone().set_num_format(ValueFormat::Number.excel_format()),
            decimal: bordered.set_num_format("#,##0.0"),
        }
    }

    fn for_value(&self, format: ValueFormat) -> &Format {
        match format {
            ValueFormat::Currency => &self.currency,
            ValueFormat::Percent => &self.percent,
            ValueFormat::Number => &self.number,
        }
    }
}

/// Build the workbook and return its bytes.
pub fn render_workbook(report: &RoiReport, options: &ExcelOptions) -> Result<Vec<u8>> {
    let _phase = set_phase(ReportPhase::Rendering);
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    write_executive_summary(workbook.add_worksheet(), report, &formats)?;
    for component in &report.results.components {
        let name = component_sheet_name(&component.key, &component.title);
        let sheet = workbook.add_worksheet();
        sheet.set_name(&name)?;
        write_component(sheet, &name, component, &formats)?;
    }
    write_projection(workbook.add_worksheet(), report, &formats)?;
    write_scenarios(workbook.add_worksheet(), report, &formats)?;
    write_sensitivity(workbook.add_worksheet(), report, &formats)?;
    if let Some(contract) = &report.contract {
        write_contract(workbook.add_worksheet(), contract, &formats)?;
    }

    if options.comprehensive {
        write_facility_results(workbook.add_worksheet(), &formats)?;
        write_hai_types(workbook.add_worksheet(), &formats)?;
        write_financial_analysis(workbook.add_worksheet(), &formats)?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(
        bytes = bytes.len(),
        comprehensive = options.comprehensive,
        "workbook rendered"
    );
    Ok(bytes)
}

fn write_title(
    sheet: &mut Worksheet,
    title: &str,
    subtitle: &str,
    formats: &Formats,
) -> Result<u32> {
    sheet.write_string_with_format(0, 0, title, &formats.title)?;
    sheet.write_string_with_format(1, 0, subtitle, &formats.subtitle)?;
    Ok(3)
}

fn write_headers(
    sheet: &mut Worksheet,
    row: u32,
    headers: &[&str],
    formats: &Formats,
) -> Result<()> {
    for (col, header) in (0u16..).zip(headers) {
        sheet.write_string_with_format(row, col, *header, &formats.header)?;
    }
    Ok(())
}

fn write_metric_value(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &MetricValue,
    formats: &Formats,
) -> Result<()> {
    match value {
        MetricValue::Currency(v) => {
            sheet.write_number_with_format(row, col, *v, &formats.currency)?
        }
        MetricValue::Percent(v) => sheet.write_number_with_format(row, col, *v, &formats.percent)?,
        MetricValue::Count(v) | MetricValue::Days(v) | MetricValue::Hours(v) => {
            sheet.write_number_with_format(row, col, *v, &formats.number)?
        }
        MetricValue::Months(Some(v)) => {
            sheet.write_number_with_format(row, col, *v, &formats.decimal)?
        }
        MetricValue::Months(None) => {
            sheet.write_string_with_format(row, col, "never", &formats.label)?
        }
        MetricValue::Text(t) => sheet.write_string_with_format(row, col, t, &formats.label)?,
    };
    Ok(())
}

/// Write `spec`'s data at `(row, CHART_DATA_COL)` and insert its chart at
/// `(anchor_row, anchor_col)`. Returns the first row below the data block.
fn insert_chart(
    sheet: &mut Worksheet,
    sheet_name: &str,
    spec: &ChartSpec,
    row: u32,
    anchor: (u32, u16),
    formats: &Formats,
) -> Result<u32> {
    if !spec.has_data() {
        return Ok(row);
    }
    let col = CHART_DATA_COL;
    sheet.write_string_with_format(row, col, &spec.title, &formats.header)?;
    for (offset, series) in (1u16..).zip(&spec.series) {
        sheet.write_string_with_format(row, col + offset, &series.name, &formats.header)?;
    }
    let first = row + 1;
    for (r, category) in (first..).zip(&spec.categories) {
        sheet.write_string_with_format(r, col, category, &formats.label)?;
    }
    let value_format = formats.for_value(spec.value_format);
    for (offset, series) in (1u16..).zip(&spec.series) {
        for (r, value) in (first..).zip(&series.values) {
            sheet.write_number_with_format(r, col + offset, *value, value_format)?;
        }
    }
    let last = first + spec.categories.len() as u32 - 1;

    let mut chart = Chart::new(match spec.kind {
        ChartKind::Column => ChartType::Column,
        ChartKind::Bar => ChartType::Bar,
        ChartKind::Line => ChartType::Line,
        ChartKind::Pie => ChartType::Pie,
    });
    for (offset, series) in (1u16..).zip(&spec.series) {
        let color = Color::RGB(series.color.as_u32());
        let mut format = ChartFormat::new();
        match spec.kind {
            ChartKind::Line => {
                format.set_line(ChartLine::new().set_color(color).set_width(2.25));
            }
            ChartKind::Column | ChartKind::Bar => {
                format.set_solid_fill(ChartSolidFill::new().set_color(color));
            }
            // Excel varies slice colors itself.
            ChartKind::Pie => {}
        }
        chart
            .add_series()
            .set_name(series.name.as_str())
            .set_categories((sheet_name, first, col, last, col))
            .set_values((sheet_name, first, col + offset, last, col + offset))
            .set_format(&mut format);
    }
    chart.title().set_name(spec.title.as_str());
    if spec.kind != ChartKind::Pie {
        if let Some(x) = &spec.x_axis {
            chart.x_axis().set_name(x.as_str());
        }
        if let Some(y) = &spec.y_axis {
            chart.y_axis().set_name(y.as_str());
        }
        chart.y_axis().set_num_format(spec.value_format.excel_format());
    }
    chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);
    sheet.insert_chart(anchor.0, anchor.1, &chart)?;
    Ok(last + 2)
}

fn write_executive_summary(
    sheet: &mut Worksheet,
    report: &RoiReport,
    formats: &Formats,
) -> Result<()> {
    const NAME: &str = "Executive Summary";
    sheet.set_name(NAME)?;
    let results = &report.results;
    let summary = &results.summary;
    let subtitle = format!(
        "{} | {} model | {}",
        results.organization,
        results.model,
        report_date(&report.generated_at)
    );
    let title = format!("{} ROI Analysis", results.product);
    let mut row = write_title(sheet, &title, &subtitle, formats)?;

    write_headers(sheet, row, &["Metric", "Value"], formats)?;
    row += 1;
    let currency_rows = [
        ("Total Annual Savings", summary.total_savings),
        ("Implementation Cost", results.financial.implementation_cost),
        ("Annual Maintenance", results.financial.annual_maintenance),
        ("Staff Training", results.financial.staff_training),
        ("Total Investment", summary.total_investment),
        ("Net Benefit", summary.net_benefit),
    ];
    for (label, value) in currency_rows {
        sheet.write_string_with_format(row, 0, label, &formats.label)?;
        sheet.write_number_with_format(row, 1, value, &formats.currency)?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "Return on Investment", &formats.bold)?;
    sheet.write_number_with_format(row, 1, summary.roi_percent, &formats.percent)?;
    row += 1;
    sheet.write_string_with_format(row, 0, "Payback Period (months)", &formats.label)?;
    write_metric_value(sheet, row, 1, &MetricValue::Months(summary.payback_months), formats)?;
    row += 1;

    if let Some(clinical) = &results.clinical {
        for (label, value) in [
            ("HAIs Prevented", clinical.hais_prevented),
            ("Lives Saved", clinical.lives_saved),
            ("Hospital Days Saved", clinical.hospital_days_saved),
        ] {
            sheet.write_string_with_format(row, 0, label, &formats.label)?;
            sheet.write_number_with_format(row, 1, value, &formats.number)?;
            row += 1;
        }
    }

    row += 1;
    write_headers(sheet, row, &["Component", "Annual Savings"], formats)?;
    row += 1;
    for component in &results.components {
        sheet.write_string_with_format(row, 0, &component.title, &formats.label)?;
        sheet.write_number_with_format(row, 1, component.total_savings, &formats.currency)?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "Total", &formats.bold)?;
    sheet.write_number_with_format(row, 1, summary.total_savings, &formats.bold_currency)?;

    sheet.set_column_width(0, 32)?;
    sheet.set_column_width(1, 18)?;
    sheet.set_column_width(CHART_DATA_COL, 26)?;
    let next = insert_chart(sheet, NAME, &savings_vs_investment(results), 3, (3, 3), formats)?;
    insert_chart(sheet, NAME, &component_breakdown(results), next, (22, 3), formats)?;
    Ok(())
}

fn write_component(
    sheet: &mut Worksheet,
    name: &str,
    component: &ComponentResult,
    formats: &Formats,
) -> Result<()> {
    let mut row = write_title(sheet, &component.title, "Annual savings detail", formats)?;

    write_headers(sheet, row, &["Metric", "Value"], formats)?;
    row += 1;
    sheet.write_string_with_format(row, 0, &component.headline.label, &formats.bold)?;
    write_metric_value(sheet, row, 1, &component.headline.value, formats)?;
    row += 1;
    for metric in &component.metrics {
        sheet.write_string_with_format(row, 0, &metric.label, &formats.label)?;
        write_metric_value(sheet, row, 1, &metric.value, formats)?;
        row += 1;
    }
    if let Some(roi) = component.roi_percent {
        sheet.write_string_with_format(row, 0, "Pipeline ROI", &formats.label)?;
        sheet.write_number_with_format(row, 1, roi, &formats.percent)?;
        row += 1;
    }

    row += 1;
    write_headers(sheet, row, &["Savings Source", "Annual Amount"], formats)?;
    row += 1;
    for line in &component.breakdown {
        sheet.write_string_with_format(row, 0, &line.label, &formats.label)?;
        sheet.write_number_with_format(row, 1, line.amount, &formats.currency)?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "Total Savings", &formats.bold)?;
    sheet.write_number_with_format(row, 1, component.total_savings, &formats.bold_currency)?;

    sheet.set_column_width(0, 34)?;
    sheet.set_column_width(1, 18)?;
    sheet.set_column_width(CHART_DATA_COL, 30)?;

    let chart = ChartSpec::new(
        format!("{} Savings Breakdown", component.title),
        ChartKind::Pie,
        ValueFormat::Currency,
    )
    .categories(component.breakdown.iter().map(|l| l.label.clone()))
    .series(
        "Annual Savings",
        component.breakdown.iter().map(|l| l.amount).collect(),
        crate::charts::Rgb::GREEN,
    );
    insert_chart(sheet, name, &chart, 3, (3, 3), formats)?;
    Ok(())
}

fn write_projection(sheet: &mut Worksheet, report: &RoiReport, formats: &Formats) -> Result<()> {
    const NAME: &str = "5-Year Projection";
    sheet.set_name(NAME)?;
    let mut row = write_title(
        sheet,
        "5-Year Financial Projection",
        "Maturity-adjusted savings",
        formats,
    )?;

    write_headers(
        sheet,
        row,
        &["Year", "Multiplier", "Cost", "Savings", "Net Benefit", "ROI", "Cumulative Net"],
        formats,
    )?;
    row += 1;
    for year in &report.projection {
        sheet.write_number_with_format(row, 0, f64::from(year.year), &formats.number)?;
        sheet.write_number_with_format(row, 1, year.multiplier, &formats.decimal)?;
        sheet.write_number_with_format(row, 2, year.cost, &formats.currency)?;
        sheet.write_number_with_format(row, 3, year.savings, &formats.currency)?;
        sheet.write_number_with_format(row, 4, year.net_benefit, &formats.currency)?;
        sheet.write_number_with_format(row, 5, year.roi_percent, &formats.percent)?;
        sheet.write_number_with_format(row, 6, year.cumulative_net, &formats.bold_currency)?;
        row += 1;
    }

    row += 1;
    write_headers(
        sheet,
        row,
        &["Month", "Cost", "Savings", "Cumulative Cost", "Cumulative Savings", "Cumulative Net"],
        formats,
    )?;
    row += 1;
    for month in &report.payback.months {
        sheet.write_number_with_format(row, 0, f64::from(month.month), &formats.number)?;
        sheet.write_number_with_format(row, 1, month.cost, &formats.currency)?;
        sheet.write_number_with_format(row, 2, month.savings, &formats.currency)?;
        sheet.write_number_with_format(row, 3, month.cumulative_cost, &formats.currency)?;
        sheet.write_number_with_format(row, 4, month.cumulative_savings, &formats.currency)?;
        sheet.write_number_with_format(row, 5, month.cumulative_net, &formats.currency)?;
        row += 1;
    }
    let break_even = match report.payback.break_even_month {
        Some(month) => format!("Break-even in month {month}"),
        None => format!("No break-even within {} months", report.payback.months.len()),
    };
    sheet.write_string_with_format(row + 1, 0, &break_even, &formats.subtitle)?;

    for col in 0..7 {
        sheet.set_column_width(col, 18)?;
    }
    let yearly = five_year_cumulative(&report.projection);
    let next = insert_chart(sheet, NAME, &yearly, 3, (30, 0), formats)?;
    insert_chart(sheet, NAME, &cumulative_monthly(&report.payback), next, (30, 6), formats)?;
    Ok(())
}

fn write_scenarios(sheet: &mut Worksheet, report: &RoiReport, formats: &Formats) -> Result<()> {
    const NAME: &str = "Scenarios";
    sheet.set_name(NAME)?;
    let mut row = write_title(
        sheet,
        "Scenario Analysis",
        "Savings scaled, investment unchanged",
        formats,
    )?;

    write_headers(
        sheet,
        row,
        &[
            "Scenario",
            "Factor",
            "Annual Savings",
            "Investment",
            "Net Benefit",
            "ROI",
            "Payback (months)",
        ],
        formats,
    )?;
    row += 1;
    for scenario in &report.scenarios {
        sheet.write_string_with_format(row, 0, scenario.name, &formats.bold)?;
        sheet.write_number_with_format(row, 1, scenario.factor, &formats.decimal)?;
        sheet.write_number_with_format(row, 2, scenario.annual_savings, &formats.currency)?;
        sheet.write_number_with_format(row, 3, scenario.total_investment, &formats.currency)?;
        sheet.write_number_with_format(row, 4, scenario.net_benefit, &formats.currency)?;
        sheet.write_number_with_format(row, 5, scenario.roi_percent, &formats.percent)?;
        write_metric_value(sheet, row, 6, &MetricValue::Months(scenario.payback_months), formats)?;
        row += 1;
    }
    for col in 0..7 {
        sheet.set_column_width(col, 18)?;
    }
    insert_chart(sheet, NAME, &scenario_comparison(&report.scenarios), 3, (row + 2, 0), formats)?;
    Ok(())
}

fn write_sensitivity(sheet: &mut Worksheet, report: &RoiReport, formats: &Formats) -> Result<()> {
    const NAME: &str = "Sensitivity";
    sheet.set_name(NAME)?;
    let mut row = write_title(
        sheet,
        "Sensitivity Analysis",
        "Each parameter moved ±10%",
        formats,
    )?;

    write_headers(
        sheet,
        row,
        &["Parameter", "Base", "Low", "High", "Low ROI", "High ROI", "ROI Swing (pts)"],
        formats,
    )?;
    row += 1;
    for entry in &report.sensitivity {
        sheet.write_string_with_format(row, 0, entry.label, &formats.label)?;
        sheet.write_number_with_format(row, 1, entry.base_value, &formats.decimal)?;
        sheet.write_number_with_format(row, 2, entry.low_value, &formats.decimal)?;
        sheet.write_number_with_format(row, 3, entry.high_value, &formats.decimal)?;
        sheet.write_number_with_format(row, 4, entry.low_roi, &formats.percent)?;
        sheet.write_number_with_format(row, 5, entry.high_roi, &formats.percent)?;
        sheet.write_number_with_format(row, 6, entry.swing, &formats.decimal)?;
        row += 1;
    }
    sheet.set_column_width(0, 34)?;
    for col in 1..7 {
        sheet.set_column_width(col, 14)?;
    }
    let tornado = sensitivity_tornado(&report.sensitivity, TORNADO_ROWS);
    insert_chart(sheet, NAME, &tornado, 3, (row + 2, 0), formats)?;
    Ok(())
}

fn write_contract(
    sheet: &mut Worksheet,
    contract: &ContractAnalysis,
    formats: &Formats,
) -> Result<()> {
    sheet.set_name("VISN21 Contract")?;
    let subtitle = format!("{} hospitals, budgetary quote", contract.quote.hospitals);
    let mut row = write_title(sheet, "VISN21 Contract Analysis", &subtitle, formats)?;

    write_headers(
        sheet,
        row,
        &["Contract Year", "Cost", "Savings", "Net Benefit", "Cumulative Net"],
        formats,
    )?;
    row += 1;
    for year in &contract.years {
        sheet.write_string_with_format(row, 0, &year.label, &formats.label)?;
        sheet.write_number_with_format(row, 1, year.cost, &formats.currency)?;
        sheet.write_number_with_format(row, 2, year.savings, &formats.currency)?;
        sheet.write_number_with_format(row, 3, year.net_benefit, &formats.currency)?;
        sheet.write_number_with_format(row, 4, year.cumulative_net, &formats.currency)?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "5-Year Total", &formats.bold)?;
    sheet.write_number_with_format(row, 1, contract.contract_total, &formats.bold_currency)?;
    sheet.write_number_with_format(row, 2, contract.five_year_savings, &formats.bold_currency)?;
    sheet.write_number_with_format(row, 3, contract.net_benefit, &formats.bold_currency)?;
    row += 2;

    for (label, value) in [
        ("Base Year Cost per Hospital", contract.base_year_cost_per_hospital),
        ("Average Annual Cost per Hospital", contract.average_annual_cost_per_hospital),
        ("Annual Savings per Hospital", contract.annual_savings_per_hospital),
        ("5-Year Net Benefit per Hospital", contract.net_benefit_per_hospital),
    ] {
        sheet.write_string_with_format(row, 0, label, &formats.label)?;
        sheet.write_number_with_format(row, 1, value, &formats.currency)?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "5-Year ROI", &formats.bold)?;
    sheet.write_number_with_format(row, 1, contract.roi_percent, &formats.percent)?;

    sheet.set_column_width(0, 34)?;
    for col in 1..5 {
        sheet.set_column_width(col, 18)?;
    }
    Ok(())
}

fn write_facility_results(sheet: &mut Worksheet, formats: &Formats) -> Result<()> {
    const NAME: &str = "8 Facility Results";
    sheet.set_name(NAME)?;
    let mut row = write_title(sheet, "8-Facility Study Results", STUDY_PERIOD, formats)?;

    write_headers(
        sheet,
        row,
        &[
            "Facility",
            "Region",
            "Go-Live",
            "Beds",
            "Pre HAIs",
            "Post HAIs",
            "Reduction",
            "Outcome",
            "Notes",
        ],
        formats,
    )?;
    row += 1;
    for facility in &STUDY_FACILITIES {
        sheet.write_string_with_format(row, 0, facility.name, &formats.label)?;
        sheet.write_string_with_format(row, 1, facility.region, &formats.label)?;
        sheet.write_string_with_format(row, 2, facility.go_live, &formats.label)?;
        sheet.write_number_with_format(row, 3, f64::from(facility.beds), &formats.number)?;
        sheet.write_number_with_format(row, 4, f64::from(facility.pre_hais), &formats.number)?;
        sheet.write_number_with_format(row, 5, f64::from(facility.post_hais), &formats.number)?;
        sheet.write_number_with_format(row, 6, facility.reduction_percent(), &formats.percent)?;
        sheet.write_string_with_format(row, 7, facility.outcome.to_string(), &formats.label)?;
        sheet.write_string_with_format(row, 8, facility.notes, &formats.label)?;
        row += 1;
    }

    let summary = facility_summary();
    let control = control_group();
    let derived = derived_comparisons();
    row += 1;
    write_headers(sheet, row, &["Study Summary", "Value"], formats)?;
    row += 1;
    let number_rows = [
        ("Total Beds", f64::from(summary.total_beds)),
        ("Study Pre HAIs", summary.total_pre_hais),
        ("Study Post HAIs", summary.total_post_hais),
        ("HAIs Prevented", summary.total_reduction),
        ("Facilities with Reduction", summary.facilities_with_reduction as f64),
        ("Outbreaks Detected", summary.facilities_with_outbreak_detection as f64),
        ("Control Facilities", f64::from(control.facilities)),
        ("Control Pre HAIs", control.pre_hais),
        ("Control Post HAIs", control.post_hais),
    ];
    for (label, value) in number_rows {
        sheet.write_string_with_format(row, 0, label, &formats.label)?;
        sheet.write_number_with_format(row, 1, value, &formats.number)?;
        row += 1;
    }
    let percent_rows = [
        ("Average Reduction", summary.average_reduction_percent),
        ("Intervention Change", derived.intervention_change),
        ("Control Change", derived.control_change),
        ("Difference in Differences", derived.difference_in_differences),
        ("Relative Improvement", derived.relative_improvement),
    ];
    for (label, value) in percent_rows {
        sheet.write_string_with_format(row, 0, label, &formats.label)?;
        sheet.write_number_with_format(row, 1, value, &formats.percent)?;
        row += 1;
    }

    sheet.set_column_width(0, 38)?;
    for col in 1..8 {
        sheet.set_column_width(col, 14)?;
    }
    sheet.set_column_width(8, 44)?;
    insert_chart(sheet, NAME, &study_facility_reduction(), 3, (row + 2, 0), formats)?;
    Ok(())
}

fn write_hai_types(sheet: &mut Worksheet, formats: &Formats) -> Result<()> {
    const NAME: &str = "HAI Type Analysis";
    sheet.set_name(NAME)?;
    let mut row = write_title(
        sheet,
        "HAI Type Analysis",
        "Intervention vs control facilities",
        formats,
    )?;

    write_headers(
        sheet,
        row,
        &[
            "Type",
            "Description",
            "Intervention Pre",
            "Intervention Post",
            "Intervention Change",
            "Control Pre",
            "Control Post",
            "Control Change",
            "Net Benefit",
        ],
        formats,
    )?;
    row += 1;
    for hai in hai_types() {
        sheet.write_string_with_format(row, 0, hai.code, &formats.bold)?;
        sheet.write_string_with_format(row, 1, hai.name, &formats.label)?;
        sheet.write_number_with_format(row, 2, hai.intervention_pre, &formats.number)?;
        sheet.write_number_with_format(row, 3, hai.intervention_post, &formats.number)?;
        sheet.write_number_with_format(row, 4, hai.intervention_change(), &formats.percent)?;
        sheet.write_number_with_format(row, 5, hai.control_pre, &formats.number)?;
        sheet.write_number_with_format(row, 6, hai.control_post, &formats.number)?;
        sheet.write_number_with_format(row, 7, hai.control_change(), &formats.percent)?;
        sheet.write_number_with_format(row, 8, hai.net_benefit_percent, &formats.percent)?;
        row += 1;
    }
    sheet.set_column_width(1, 40)?;
    for col in 2..9 {
        sheet.set_column_width(col, 16)?;
    }
    insert_chart(sheet, NAME, &hai_type_comparison(), 3, (row + 2, 0), formats)?;
    Ok(())
}

fn write_cost_items(
    sheet: &mut Worksheet,
    mut row: u32,
    heading: &str,
    items: &[CostItem],
    formats: &Formats,
) -> Result<u32> {
    write_headers(sheet, row, &[heading, "Amount"], formats)?;
    row += 1;
    for item in items {
        sheet.write_string_with_format(row, 0, item.item, &formats.label)?;
        sheet.write_number_with_format(row, 1, item.amount, &formats.currency)?;
        row += 1;
    }
    let total: f64 = items.iter().map(|i| i.amount).sum();
    sheet.write_string_with_format(row, 0, "Total", &formats.bold)?;
    sheet.write_number_with_format(row, 1, total, &formats.bold_currency)?;
    Ok(row + 2)
}

fn write_financial_analysis(sheet: &mut Worksheet, formats: &Formats) -> Result<()> {
    sheet.set_name("Financial Analysis")?;
    let mut row = write_title(sheet, "Study Financial Analysis", STUDY_PERIOD, formats)?;

    let impact = financial_impact();
    row = write_cost_items(sheet, row, "Cost per HAI", &impact.per_hai_costs, formats)?;
    row = write_cost_items(
        sheet,
        row,
        "Implementation (8 facilities)",
        &impact.implementation,
        formats,
    )?;
    row = write_cost_items(sheet, row, "Annual Operating", &impact.annual_operating, formats)?;
    row = write_cost_items(sheet, row, "Savings (18 months)", &impact.savings_18_months, formats)?;

    write_headers(sheet, row, &["Return Metric", "Value"], formats)?;
    row += 1;
    for (label, value, format) in [
        ("Payback (months)", impact.payback_months, &formats.decimal),
        ("First-Year ROI", impact.first_year_roi, &formats.percent),
        ("5-Year ROI", impact.five_year_roi, &formats.percent),
        ("Break-Even Month", f64::from(impact.break_even_month), &formats.number),
    ] {
        sheet.write_string_with_format(row, 0, label, &formats.label)?;
        sheet.write_number_with_format(row, 1, value, format)?;
        row += 1;
    }

    let annual = annual_financials_per_facility();
    row += 1;
    write_headers(sheet, row, &["Per Facility, Annual", "Amount"], formats)?;
    row += 1;
    for (label, value) in [
        ("Implementation Cost", annual.implementation_cost),
        ("Operating Cost", annual.annual_operating),
        ("Direct Savings", annual.direct_savings),
        ("LOS Savings", annual.los_savings),
        ("Mortality Value", annual.mortality_value),
        ("Outbreak Savings", annual.outbreak_savings),
        ("Total Annual Savings", annual.total_annual_savings),
    ] {
        sheet.write_string_with_format(row, 0, label, &formats.label)?;
        sheet.write_number_with_format(row, 1, value, &formats.currency)?;
        row += 1;
    }

    row += 1;
    write_headers(
        sheet,
        row,
        &["Sensitivity Parameter", "Base", "Pessimistic", "Optimistic", "Impact"],
        formats,
    )?;
    row += 1;
    for entry in sensitivity_table() {
        sheet.write_string_with_format(row, 0, entry.name, &formats.label)?;
        sheet.write_number_with_format(row, 1, entry.base_case, &formats.decimal)?;
        sheet.write_number_with_format(row, 2, entry.pessimistic, &formats.decimal)?;
        sheet.write_number_with_format(row, 3, entry.optimistic, &formats.decimal)?;
        sheet.write_string_with_format(row, 4, entry.impact.to_string(), &formats.label)?;
        row += 1;
    }

    row += 1;
    write_headers(
        sheet,
        row,
        &["Target Hospital", "Beds", "HAIs Prevented", "Lives Saved", "Annual Savings"],
        formats,
    )?;
    row += 1;
    for hospital in target_hospitals() {
        let savings = hospital.annual_savings();
        sheet.write_string_with_format(row, 0, hospital.name, &formats.label)?;
        sheet.write_number_with_format(row, 1, f64::from(hospital.beds), &formats.number)?;
        sheet.write_number_with_format(row, 2, savings.hais_prevented, &formats.number)?;
        sheet.write_number_with_format(row, 3, savings.lives_saved, &formats.number)?;
        sheet.write_number_with_format(row, 4, savings.total_savings, &formats.currency)?;
        row += 1;
    }

    sheet.set_column_width(0, 38)?;
    for col in 1..5 {
        sheet.set_column_width(col, 16)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrganizationType, Product};
    use crate::output::test_support::report;

    /// xlsx files are zip archives.
    fn is_zip(bytes: &[u8]) -> bool {
        bytes.starts_with(b"PK")
    }

    #[test]
    fn component_sheets_use_short_tab_names() {
        assert_eq!(component_sheet_name("pgx", "PGx Pipeline"), "PGx Pipeline");
        assert_eq!(component_sheet_name("cytogenetics", "Cytogenetics Pipeline"), "Cytogenetics");
        assert_eq!(
            component_sheet_name("stewardship", "Antimicrobial Stewardship"),
            "Antimicrobial"
        );
        assert_eq!(component_sheet_name("regulatory", "Regulatory Reporting"), "Regulatory");
    }

    #[test]
    fn renders_standard_workbook() {
        let report = report(Product::PraediGene, OrganizationType::MediumHospital);
        let bytes = render_workbook(&report, &ExcelOptions::default()).unwrap();
        assert!(is_zip(&bytes));
    }

    #[test]
    fn comprehensive_workbook_is_larger() {
        let report = report(Product::PraediAlert, OrganizationType::Visn21);
        let standard = render_workbook(&report, &ExcelOptions::default()).unwrap();
        let full = render_workbook(&report, &ExcelOptions { comprehensive: true }).unwrap();
        assert!(is_zip(&full));
        assert!(full.len() > standard.len());
    }
}
