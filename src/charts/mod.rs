//! Backend-neutral chart descriptions.
//!
//! A [`ChartSpec`] holds categories, series and axis titles. The Excel
//! writer turns it into a native chart, the PDF writer draws it as vector
//! bars, and [`render_text`] prints it in the terminal.

mod builders;
mod text;

pub use builders::{
    component_breakdown, cumulative_monthly, five_year_cumulative, hai_type_comparison,
    savings_vs_investment, scenario_comparison, sensitivity_tornado, study_facility_reduction,
};
pub use text::render_text;

use crate::formatting::{format_currency, format_number, format_percent};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Vertical bars
    Column,
    /// Horizontal bars
    Bar,
    Line,
    Pie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const NAVY: Rgb = Rgb(0x00, 0x00, 0x80);
    pub const GREEN: Rgb = Rgb(0x00, 0x64, 0x00);
    pub const RED: Rgb = Rgb(0x8b, 0x00, 0x00);
    pub const ORANGE: Rgb = Rgb(0xcc, 0x55, 0x00);
    pub const GRAY: Rgb = Rgb(0x55, 0x55, 0x55);
    pub const TEAL: Rgb = Rgb(0x00, 0x6d, 0x77);

    /// Cycled for series and pie slices without a fixed meaning.
    pub const PALETTE: [Rgb; 6] = [
        Rgb::NAVY,
        Rgb::GREEN,
        Rgb::ORANGE,
        Rgb::TEAL,
        Rgb::RED,
        Rgb::GRAY,
    ];

    pub fn as_u32(&self) -> u32 {
        (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }

    /// Components scaled to 0.0..=1.0.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Currency,
    Percent,
    Number,
}

impl ValueFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Currency => format_currency(value),
            Self::Percent => format_percent(value),
            Self::Number => format_number(value),
        }
    }

    /// Excel number format for axis labels and data cells.
    pub fn excel_format(&self) -> &'static str {
        match self {
            Self::Currency => "$#,##0",
            Self::Percent => "0.0\"%\"",
            Self::Number => "#,##0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub value_format: ValueFormat,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, kind: ChartKind, value_format: ValueFormat) -> Self {
        Self {
            title: title.into(),
            kind,
            categories: Vec::new(),
            series: Vec::new(),
            x_axis: None,
            y_axis: None,
            value_format,
        }
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn series(mut self, name: impl Into<String>, values: Vec<f64>, color: Rgb) -> Self {
        self.series.push(Series {
            name: name.into(),
            values,
            color,
        });
        self
    }

    pub fn axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis = Some(x.into());
        self.y_axis = Some(y.into());
        self
    }

    /// Largest absolute value across all series, at least 1.0.
    pub fn max_abs(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter())
            .fold(1.0_f64, |acc, v| acc.max(v.abs()))
    }

    pub fn has_data(&self) -> bool {
        !self.categories.is_empty() && self.series.iter().any(|s| !s.values.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_into_u32() {
        assert_eq!(Rgb::NAVY.as_u32(), 0x000080);
        assert_eq!(Rgb(0xff, 0x80, 0x00).as_u32(), 0xff8000);
        assert_eq!(Rgb(255, 0, 0).unit(), (1.0, 0.0, 0.0));
    }

    #[test]
    fn builder_collects_series() {
        let chart = ChartSpec::new("Test", ChartKind::Column, ValueFormat::Number)
            .categories(["a", "b"])
            .series("one", vec![1.0, -5.0], Rgb::NAVY)
            .axes("x", "y");
        assert!(chart.has_data());
        assert_eq!(chart.max_abs(), 5.0);
        assert_eq!(chart.y_axis.as_deref(), Some("y"));
    }

    #[test]
    fn empty_chart_has_no_data() {
        let chart = ChartSpec::new("Empty", ChartKind::Pie, ValueFormat::Currency);
        assert!(!chart.has_data());
        assert_eq!(chart.max_abs(), 1.0);
    }
}
