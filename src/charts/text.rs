use super::{ChartKind, ChartSpec};
use std::fmt::Write;

const FULL: char = '█';
const NEGATIVE: char = '░';

fn bar(value: f64, max_abs: f64, width: usize) -> String {
    let len = ((value.abs() / max_abs) * width as f64).round() as usize;
    let glyph = if value < 0.0 { NEGATIVE } else { FULL };
    std::iter::repeat_n(glyph, len.min(width)).collect()
}

/// Draw a chart as horizontal text bars, `width` columns for the longest.
/// Negative values use a lighter glyph; pie charts show shares of the whole.
pub fn render_text(chart: &ChartSpec, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);
    if !chart.has_data() {
        let _ = writeln!(out, "  (no data)");
        return out;
    }

    let label_width = chart
        .categories
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0);
    let multi = chart.series.len() > 1;
    let series_width = chart
        .series
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);
    let max_abs = chart.max_abs();
    let pie_total: f64 = match chart.kind {
        ChartKind::Pie => chart
            .series
            .first()
            .map(|s| s.values.iter().map(|v| v.abs()).sum())
            .unwrap_or(0.0),
        _ => 0.0,
    };

    for (index, category) in chart.categories.iter().enumerate() {
        for (n, series) in chart.series.iter().enumerate() {
            let Some(&value) = series.values.get(index) else {
                continue;
            };
            let label = if n == 0 { category.as_str() } else { "" };
            let series_label = if multi {
                format!(" {:<series_width$}", series.name)
            } else {
                String::new()
            };
            let value_text = if chart.kind == ChartKind::Pie && pie_total > 0.0 {
                format!(
                    "{} ({:.1}%)",
                    chart.value_format.format(value),
                    value.abs() / pie_total * 100.0
                )
            } else {
                chart.value_format.format(value)
            };
            let bar_max = if chart.kind == ChartKind::Pie && pie_total > 0.0 {
                pie_total
            } else {
                max_abs
            };
            let _ = writeln!(
                out,
                "  {label:<label_width$}{series_label} │{} {value_text}",
                bar(value, bar_max, width)
            );
        }
    }
    out
}
