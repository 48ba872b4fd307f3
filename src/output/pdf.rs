//! PDF report: cover, summary tables, vector charts and a methodology
//! appendix on US Letter pages.
//!
//! Built-in Helvetica has no glyph metrics here, so widths are estimated
//! from character counts and text is limited to ASCII.

use super::report_date;
use crate::analysis::RoiReport;
use crate::charts::{
    component_breakdown, five_year_cumulative, savings_vs_investment, scenario_comparison,
    sensitivity_tornado, study_facility_reduction, ChartKind, ChartSpec, Rgb,
};
use crate::config::specs_for;
use crate::core::Product;
use crate::error::{Result, RoiError};
use crate::formatting::{format_currency, format_months, format_percent};
use crate::observability::{set_phase, ReportPhase};
use crate::study::methodology;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb as PdfRgb,
};
use std::io::{BufWriter, Write};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 20.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica advance as a fraction of the font size.
const CHAR_WIDTH_EM: f32 = 0.5;
const ROW_HEIGHT: f32 = 6.5;
const CHART_HEIGHT: f32 = 70.0;
const TORNADO_ROWS: usize = 8;

const BLACK: Rgb = Rgb(0, 0, 0);
const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
const STRIPE: Rgb = Rgb(0xee, 0xf0, 0xf5);

fn pdf_error(err: impl std::fmt::Display) -> RoiError {
    RoiError::Pdf(err.to_string())
}

fn color(rgb: Rgb) -> PdfColor {
    let (r, g, b) = rgb.unit();
    PdfColor::Rgb(PdfRgb::new(r, g, b, None))
}

fn point(x: f32, y: f32) -> (Point, bool) {
    (Point::new(Mm(x), Mm(y)), false)
}

/// Approximate rendered width in millimetres.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * CHAR_WIDTH_EM * PT_TO_MM
}

/// Replace characters outside the built-in font encoding.
pub fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '±' => out.push_str("+/-"),
            '×' => out.push('x'),
            '–' | '—' => out.push('-'),
            '≥' => out.push_str(">="),
            '≤' => out.push_str("<="),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn fit(text: &str, width: f32, size: f32) -> String {
    let max_chars = (width / (size * CHAR_WIDTH_EM * PT_TO_MM)).floor() as usize;
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(2)).collect();
        format!("{kept}..")
    }
}

/// Greedy word wrap to `width` millimetres.
fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let max_chars = (width / (size * CHAR_WIDTH_EM * PT_TO_MM)).floor().max(1.0) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

struct PdfBuilder {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    layer: PdfLayerReference,
    pages: Vec<PdfLayerReference>,
    /// Distance from the bottom edge of the next line's baseline
    y: f32,
}

impl PdfBuilder {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            regular,
            bold,
            pages: vec![layer.clone()],
            layer,
            doc,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages.push(self.layer.clone());
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Start a new page unless `height` millimetres remain above the footer.
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN + 8.0 {
            self.new_page();
        }
    }

    fn text_at(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(pdf_text(text), size, Mm(x), Mm(y), font);
    }

    fn text_aligned(&self, text: &str, size: f32, x: f32, width: f32, y: f32, align: Align, bold: bool) {
        let text = fit(&pdf_text(text), width, size);
        let x = match align {
            Align::Left => x,
            Align::Right => x + width - text_width(&text, size),
        };
        self.text_at(&text, size, x, y, bold);
    }

    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, fill: Rgb) {
        self.layer.set_fill_color(color(fill));
        self.layer.add_polygon(Polygon {
            rings: vec![vec![
                point(x, y),
                point(x + width, y),
                point(x + width, y + height),
                point(x, y + height),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
        self.layer.set_fill_color(color(BLACK));
    }

    fn line(&self, points: &[(f32, f32)], stroke: Rgb, thickness: f32) {
        self.layer.set_outline_color(color(stroke));
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: points.iter().map(|&(x, y)| point(x, y)).collect(),
            is_closed: false,
        });
    }

    fn heading(&mut self, text: &str) {
        self.ensure_space(16.0);
        self.y -= 4.0;
        self.layer.set_fill_color(color(Rgb::NAVY));
        self.text_at(text, 15.0, MARGIN, self.y, true);
        self.layer.set_fill_color(color(BLACK));
        self.y -= 2.5;
        self.line(&[(MARGIN, self.y), (PAGE_WIDTH - MARGIN, self.y)], Rgb::NAVY, 0.8);
        self.y -= 7.0;
    }

    fn subheading(&mut self, text: &str) {
        self.ensure_space(12.0);
        self.text_at(text, 12.0, MARGIN, self.y, true);
        self.y -= 7.0;
    }

    fn paragraph(&mut self, text: &str, size: f32) {
        for line in wrap(&pdf_text(text), CONTENT_WIDTH, size) {
            self.ensure_space(size * 0.5);
            self.text_at(&line, size, MARGIN, self.y, false);
            self.y -= size * 0.5;
        }
        self.y -= 2.0;
    }

    /// Table with a navy header row and striped body. The first column is
    /// left-aligned, the rest right-aligned. `widths` are fractions of the
    /// content width.
    fn table(&mut self, headers: &[&str], widths: &[f32], rows: &[Vec<String>]) {
        let widths: Vec<f32> = widths.iter().map(|w| w * CONTENT_WIDTH).collect();
        let align = |col: usize| if col == 0 { Align::Left } else { Align::Right };

        self.ensure_space(ROW_HEIGHT * 2.0);
        self.table_header(headers, &widths);
        for (i, row) in rows.iter().enumerate() {
            if self.y - ROW_HEIGHT < MARGIN + 8.0 {
                self.new_page();
                self.table_header(headers, &widths);
            }
            if i % 2 == 1 {
                self.fill_rect(MARGIN, self.y - 2.0, CONTENT_WIDTH, ROW_HEIGHT, STRIPE);
            }
            let mut x = MARGIN;
            for (col, (cell, width)) in row.iter().zip(&widths).enumerate() {
                self.text_aligned(cell, 9.0, x + 1.5, width - 3.0, self.y, align(col), false);
                x += width;
            }
            self.y -= ROW_HEIGHT;
        }
        self.y -= 4.0;
    }

    fn table_header(&mut self, headers: &[&str], widths: &[f32]) {
        self.fill_rect(MARGIN, self.y - 2.0, CONTENT_WIDTH, ROW_HEIGHT, Rgb::NAVY);
        self.layer.set_fill_color(color(WHITE));
        let mut x = MARGIN;
        for (col, (header, width)) in headers.iter().zip(widths).enumerate() {
            let align = if col == 0 { Align::Left } else { Align::Right };
            self.text_aligned(header, 9.0, x + 1.5, width - 3.0, self.y, align, true);
            x += width;
        }
        self.layer.set_fill_color(color(BLACK));
        self.y -= ROW_HEIGHT;
    }

    fn chart(&mut self, spec: &ChartSpec) {
        if !spec.has_data() {
            return;
        }
        self.ensure_space(CHART_HEIGHT + 20.0);
        self.text_at(&spec.title, 11.0, MARGIN, self.y, true);
        self.y -= 4.0;

        let top = self.y;
        let bottom = top - CHART_HEIGHT;
        match spec.kind {
            ChartKind::Column | ChartKind::Line => self.vertical_chart(spec, top, bottom),
            ChartKind::Bar | ChartKind::Pie => self.horizontal_chart(spec, top, bottom),
        }
        self.y = bottom - 12.0;
        self.legend(spec);
        self.y -= 6.0;
    }

    fn value_range(spec: &ChartSpec) -> (f64, f64) {
        let values = spec.series.iter().flat_map(|s| s.values.iter().copied());
        let (lo, hi) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if hi - lo <= f64::EPSILON {
            (lo, lo + 1.0)
        } else {
            (lo, hi)
        }
    }

    /// Column and line charts: categories along x, values up y.
    fn vertical_chart(&self, spec: &ChartSpec, top: f32, bottom: f32) {
        let label_width = 26.0;
        let left = MARGIN + label_width;
        let right = PAGE_WIDTH - MARGIN;
        let (lo, hi) = Self::value_range(spec);
        let y_of = |v: f64| bottom + ((v - lo) / (hi - lo)) as f32 * (top - bottom);
        let zero = y_of(0.0);

        for value in [hi, lo] {
            let label = spec.value_format.format(value);
            self.text_aligned(&label, 7.0, MARGIN, label_width - 2.0, y_of(value) - 1.0, Align::Right, false);
        }
        self.line(&[(left, top), (left, bottom)], Rgb::GRAY, 0.4);
        self.line(&[(left, zero), (right, zero)], Rgb::GRAY, 0.4);

        let n = spec.categories.len();
        let group = (right - left) / n as f32;
        let m = spec.series.len().max(1);

        match spec.kind {
            ChartKind::Line => {
                for series in &spec.series {
                    let points: Vec<(f32, f32)> = series
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| (left + group * (i as f32 + 0.5), y_of(*v)))
                        .collect();
                    self.line(&points, series.color, 1.2);
                    for (x, y) in &points {
                        self.fill_rect(x - 0.8, y - 0.8, 1.6, 1.6, series.color);
                    }
                }
            }
            _ => {
                let bar = group * 0.7 / m as f32;
                for (s, series) in spec.series.iter().enumerate() {
                    for (i, v) in series.values.iter().enumerate() {
                        let x = left + group * i as f32 + group * 0.15 + bar * s as f32;
                        let y = y_of(*v);
                        self.fill_rect(x, y.min(zero), bar, (y - zero).abs(), series.color);
                    }
                }
            }
        }

        for (i, category) in spec.categories.iter().enumerate() {
            let x = left + group * i as f32;
            self.text_aligned(category, 7.0, x + 1.0, group - 2.0, bottom - 5.0, Align::Left, false);
        }
    }

    /// Bar charts and pie shares: one row per category, bars grow right
    /// from zero.
    fn horizontal_chart(&self, spec: &ChartSpec, top: f32, bottom: f32) {
        let label_width = 55.0;
        let left = MARGIN + label_width;
        let right = PAGE_WIDTH - MARGIN - 24.0;

        // Pie slices become shares of the first series' total.
        let pie_total: f64 = match spec.kind {
            ChartKind::Pie => spec
                .series
                .first()
                .map(|s| s.values.iter().sum())
                .unwrap_or(0.0),
            _ => 0.0,
        };
        let shown = |v: f64| {
            if spec.kind == ChartKind::Pie && pie_total > 0.0 {
                v / pie_total * 100.0
            } else {
                v
            }
        };

        let (lo, hi) = if spec.kind == ChartKind::Pie {
            (0.0, 100.0)
        } else {
            Self::value_range(spec)
        };
        let x_of = |v: f64| left + ((v - lo) / (hi - lo)) as f32 * (right - left);
        let zero = x_of(0.0);
        self.line(&[(zero, top), (zero, bottom)], Rgb::GRAY, 0.4);

        let n = spec.categories.len();
        let band = (top - bottom) / n as f32;
        let series: Vec<_> = match spec.kind {
            ChartKind::Pie => spec.series.iter().take(1).collect(),
            _ => spec.series.iter().collect(),
        };
        let bar = band * 0.7 / series.len().max(1) as f32;

        for (i, category) in spec.categories.iter().enumerate() {
            let band_top = top - band * i as f32;
            self.text_aligned(
                category,
                7.5,
                MARGIN,
                label_width - 2.0,
                band_top - band / 2.0 - 1.0,
                Align::Left,
                false,
            );
            for (s, series) in series.iter().enumerate() {
                let Some(&raw) = series.values.get(i) else {
                    continue;
                };
                let value = shown(raw);
                let y = band_top - band * 0.15 - bar * (s as f32 + 1.0);
                let x = x_of(value);
                let fill = if spec.kind == ChartKind::Pie {
                    Rgb::PALETTE[i % Rgb::PALETTE.len()]
                } else {
                    series.color
                };
                self.fill_rect(x.min(zero), y, (x - zero).abs(), bar, fill);
                let label = if spec.kind == ChartKind::Pie {
                    format_percent(value)
                } else {
                    spec.value_format.format(value)
                };
                self.text_at(&label, 6.5, x.max(zero) + 1.0, y + bar / 2.0 - 1.0, false);
            }
        }
    }

    fn legend(&mut self, spec: &ChartSpec) {
        if spec.kind == ChartKind::Pie || spec.series.len() < 2 {
            return;
        }
        let mut x = MARGIN + 26.0;
        for series in &spec.series {
            self.fill_rect(x, self.y, 3.0, 3.0, series.color);
            self.text_at(&series.name, 8.0, x + 4.5, self.y + 0.3, false);
            x += 10.0 + text_width(&pdf_text(&series.name), 8.0);
        }
    }

    /// Stamp `Page i of n` on every page and serialize.
    fn finish(self) -> Result<Vec<u8>> {
        let total = self.pages.len();
        for (i, layer) in self.pages.iter().enumerate() {
            let label = format!("Page {} of {}", i + 1, total);
            let x = PAGE_WIDTH - MARGIN - text_width(&label, 8.0);
            layer.use_text(label, 8.0, Mm(x), Mm(MARGIN / 2.0), &self.regular);
        }

        let mut bytes = Vec::new();
        {
            let mut writer = BufWriter::new(&mut bytes);
            self.doc.save(&mut writer).map_err(pdf_error)?;
            writer.flush().map_err(pdf_error)?;
        }
        Ok(bytes)
    }
}

/// Render the report as a PDF document.
pub fn render_pdf(report: &RoiReport) -> Result<Vec<u8>> {
    let _phase = set_phase(ReportPhase::Rendering);
    let product = report.product();
    let results = &report.results;
    let summary = &results.summary;
    let mut pdf = PdfBuilder::new(&format!("{product} ROI Analysis"))?;

    // Cover
    pdf.y = PAGE_HEIGHT - 70.0;
    pdf.layer.set_fill_color(color(Rgb::NAVY));
    pdf.text_at(&format!("{product} ROI Analysis"), 28.0, MARGIN, pdf.y, true);
    pdf.layer.set_fill_color(color(BLACK));
    pdf.y -= 12.0;
    pdf.text_at(product.tagline(), 14.0, MARGIN, pdf.y, false);
    pdf.y -= 20.0;
    for line in [
        format!("Organization: {}", results.organization),
        format!("Calculation model: {}", results.model),
        format!("Prepared: {}", report_date(&report.generated_at)),
    ] {
        pdf.text_at(&line, 11.0, MARGIN, pdf.y, false);
        pdf.y -= 7.0;
    }
    pdf.y -= 10.0;
    let cards = [
        ("Annual Savings", format_currency(summary.total_savings)),
        ("ROI", format_percent(summary.roi_percent)),
        ("Payback", format_months(summary.payback_months)),
        ("Investment", format_currency(summary.total_investment)),
    ];
    let card_width = CONTENT_WIDTH / cards.len() as f32;
    for (i, (label, value)) in cards.iter().enumerate() {
        let x = MARGIN + card_width * i as f32;
        pdf.fill_rect(x + 1.0, pdf.y - 14.0, card_width - 2.0, 22.0, STRIPE);
        pdf.text_aligned(value, 13.0, x + 3.0, card_width - 6.0, pdf.y, Align::Left, true);
        pdf.text_aligned(label, 9.0, x + 3.0, card_width - 6.0, pdf.y - 8.0, Align::Left, false);
    }

    // Executive summary
    pdf.new_page();
    pdf.heading("Executive Summary");
    let mut rows = vec![
        vec!["Total Annual Savings".to_string(), format_currency(summary.total_savings)],
        vec!["Implementation Cost".to_string(), format_currency(results.financial.implementation_cost)],
        vec!["Annual Maintenance".to_string(), format_currency(results.financial.annual_maintenance)],
        vec!["Staff Training".to_string(), format_currency(results.financial.staff_training)],
        vec!["Total Investment".to_string(), format_currency(summary.total_investment)],
        vec!["Net Benefit".to_string(), format_currency(summary.net_benefit)],
        vec!["Return on Investment".to_string(), format_percent(summary.roi_percent)],
        vec!["Payback Period".to_string(), format_months(summary.payback_months)],
    ];
    if let Some(clinical) = &results.clinical {
        rows.extend([
            vec!["HAIs Prevented".to_string(), format!("{:.0}", clinical.hais_prevented)],
            vec!["Lives Saved".to_string(), format!("{:.0}", clinical.lives_saved)],
            vec!["Hospital Days Saved".to_string(), format!("{:.0}", clinical.hospital_days_saved)],
        ]);
    }
    pdf.table(&["Metric", "Value"], &[0.6, 0.4], &rows);
    pdf.chart(&savings_vs_investment(results));

    // Components
    pdf.heading("Savings by Component");
    let rows: Vec<Vec<String>> = results
        .components
        .iter()
        .map(|c| {
            vec![
                c.title.clone(),
                format!("{}: {}", c.headline.label, c.headline.value.display()),
                c.roi_percent.map(format_percent).unwrap_or_else(|| "-".into()),
                format_currency(c.total_savings),
            ]
        })
        .collect();
    pdf.table(
        &["Component", "Headline", "ROI", "Annual Savings"],
        &[0.3, 0.35, 0.13, 0.22],
        &rows,
    );
    pdf.chart(&component_breakdown(results));
    for component in &results.components {
        pdf.subheading(&component.title);
        let rows: Vec<Vec<String>> = component
            .metrics
            .iter()
            .map(|m| vec![m.label.clone(), m.value.display()])
            .chain(
                component
                    .breakdown
                    .iter()
                    .map(|l| vec![format!("Savings: {}", l.label), format_currency(l.amount)]),
            )
            .collect();
        pdf.table(&["Metric", "Value"], &[0.65, 0.35], &rows);
    }

    // Projection
    pdf.heading("5-Year Financial Projection");
    let rows: Vec<Vec<String>> = report
        .projection
        .iter()
        .map(|y| {
            vec![
                format!("Year {}", y.year),
                format_currency(y.cost),
                format_currency(y.savings),
                format_currency(y.net_benefit),
                format_currency(y.cumulative_net),
                format_percent(y.cumulative_roi),
            ]
        })
        .collect();
    pdf.table(
        &["Year", "Cost", "Savings", "Net", "Cumulative Net", "Cum. ROI"],
        &[0.12, 0.18, 0.18, 0.18, 0.2, 0.14],
        &rows,
    );
    let break_even = match report.payback.break_even_month {
        Some(month) => format!("Cumulative savings pass cumulative cost in month {month}."),
        None => format!(
            "Cumulative savings do not pass cumulative cost within {} months.",
            report.payback.months.len()
        ),
    };
    pdf.paragraph(&break_even, 10.0);
    pdf.chart(&five_year_cumulative(&report.projection));

    if let Some(contract) = &report.contract {
        pdf.subheading("VISN21 Contract");
        let rows: Vec<Vec<String>> = contract
            .years
            .iter()
            .map(|y| {
                vec![
                    y.label.clone(),
                    format_currency(y.cost),
                    format_currency(y.net_benefit),
                    format_currency(y.cumulative_net),
                ]
            })
            .collect();
        pdf.table(
            &["Contract Year", "Cost", "Net", "Cumulative Net"],
            &[0.31, 0.23, 0.23, 0.23],
            &rows,
        );
        pdf.paragraph(
            &format!(
                "Contract total {} for {} hospitals; 5-year ROI {}; base year {} per hospital.",
                format_currency(contract.contract_total),
                contract.quote.hospitals,
                format_percent(contract.roi_percent),
                format_currency(contract.base_year_cost_per_hospital)
            ),
            10.0,
        );
    }

    // Scenarios and sensitivity
    pdf.heading("Scenario and Sensitivity Analysis");
    let rows: Vec<Vec<String>> = report
        .scenarios
        .iter()
        .map(|s| {
            vec![
                format!("{} (x{:.1})", s.name, s.factor),
                format_currency(s.annual_savings),
                format_currency(s.net_benefit),
                format_percent(s.roi_percent),
                format_months(s.payback_months),
            ]
        })
        .collect();
    pdf.table(
        &["Scenario", "Savings", "Net", "ROI", "Payback"],
        &[0.24, 0.2, 0.2, 0.16, 0.2],
        &rows,
    );
    pdf.chart(&scenario_comparison(&report.scenarios));
    pdf.chart(&sensitivity_tornado(&report.sensitivity, TORNADO_ROWS));

    if product == Product::PraediAlert {
        pdf.chart(&study_facility_reduction());
    }

    // Appendix
    pdf.new_page();
    pdf.heading("Appendix: Calculation Methodology");
    if product == Product::PraediAlert {
        for section in methodology() {
            pdf.subheading(&section.title);
            for step in &section.steps {
                pdf.paragraph(&format!("{}: {}", step.name, step.formula), 9.5);
                pdf.paragraph(&format!("Example: {}", step.example), 9.0);
            }
        }
    }
    pdf.subheading("Parameters Used");
    let rows = specs_for(product)
        .map(|spec| {
            let value = report.inputs.params.get(spec.key)?;
            Ok(vec![spec.label.to_string(), spec.key.to_string(), format!("{value}")])
        })
        .collect::<Result<Vec<_>>>()?;
    pdf.table(&["Parameter", "Key", "Value"], &[0.45, 0.38, 0.17], &rows);

    let bytes = pdf.finish()?;
    tracing::debug!(bytes = bytes.len(), "pdf rendered");
    Ok(bytes)
}
