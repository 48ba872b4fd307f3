//! Descriptive summaries of loaded facility data.

use super::records::{is_aggregate_row, BedDaysRecord, DotRecord, HaiRateRecord};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedDaysSummary {
    pub facilities: Vec<String>,
    pub total: f64,
    pub average: f64,
}

/// Facility totals; aggregate rows are left out of every figure.
pub fn bed_days_summary(records: &[BedDaysRecord]) -> Option<BedDaysSummary> {
    let rows: Vec<&BedDaysRecord> = records
        .iter()
        .filter(|r| !is_aggregate_row(&r.facility))
        .collect();
    if rows.is_empty() {
        return None;
    }
    let total: f64 = rows.iter().map(|r| r.bed_days_annual).sum();
    Some(BedDaysSummary {
        facilities: rows.iter().map(|r| r.facility.clone()).collect(),
        total,
        average: total / rows.len() as f64,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HaiTypeSummary {
    pub hai_type: String,
    pub unit_of_measure: Option<String>,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub facilities_above_zero: usize,
}

#[derive(Default)]
struct Stats {
    sum: f64,
    count: usize,
    min: f64,
    max: f64,
    positive: usize,
}

impl Stats {
    fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += value;
        self.count += 1;
        if value > 0.0 {
            self.positive += 1;
        }
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Per HAI type statistics in first-seen order, aggregate rows excluded.
pub fn hai_type_summary(records: &[HaiRateRecord]) -> Vec<HaiTypeSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut stats: BTreeMap<String, (Stats, Option<String>)> = BTreeMap::new();

    for record in records.iter().filter(|r| !is_aggregate_row(&r.facility)) {
        let entry = stats.entry(record.hai_type.clone()).or_insert_with(|| {
            order.push(record.hai_type.clone());
            (Stats::default(), record.unit_of_measure.clone())
        });
        entry.0.push(record.rolling_12_months_rate);
    }

    order
        .into_iter()
        .filter_map(|hai_type| {
            let (s, unit) = stats.remove(&hai_type)?;
            Some(HaiTypeSummary {
                average: s.mean(),
                max: s.max,
                min: s.min,
                facilities_above_zero: s.positive,
                unit_of_measure: unit,
                hai_type,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotQuarterSummary {
    pub year: i32,
    pub quarter: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// DOT per 1000 days grouped by year and quarter, chronological.
pub fn dot_by_quarter(records: &[DotRecord]) -> Vec<DotQuarterSummary> {
    let mut groups: BTreeMap<(i32, String), Stats> = BTreeMap::new();
    for record in records.iter().filter(|r| !is_aggregate_row(&r.facility)) {
        groups
            .entry((record.year, record.quarter.clone()))
            .or_default()
            .push(record.dot_per_1000_days);
    }
    groups
        .into_iter()
        .map(|((year, quarter), s)| DotQuarterSummary {
            year,
            quarter,
            mean: s.mean(),
            min: s.min,
            max: s.max,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotFacilitySummary {
    pub facility: String,
    pub mean: f64,
}

/// Mean DOT per facility, highest first.
pub fn dot_by_facility(records: &[DotRecord]) -> Vec<DotFacilitySummary> {
    let mut groups: BTreeMap<String, Stats> = BTreeMap::new();
    for record in records.iter().filter(|r| !is_aggregate_row(&r.facility)) {
        groups
            .entry(record.facility.clone())
            .or_default()
            .push(record.dot_per_1000_days);
    }
    let mut facilities: Vec<DotFacilitySummary> = groups
        .into_iter()
        .map(|(facility, s)| DotFacilitySummary {
            facility,
            mean: s.mean(),
        })
        .collect();
    facilities.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    facilities
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn beds(facility: &str, days: f64) -> BedDaysRecord {
        BedDaysRecord {
            facility: facility.into(),
            facility_code: None,
            bed_days_annual: days,
        }
    }

    fn hai(facility: &str, hai_type: &str, rate: f64) -> HaiRateRecord {
        HaiRateRecord {
            facility: facility.into(),
            hai_type: hai_type.into(),
            rolling_12_months_rate: rate,
            unit_of_measure: Some("per 1000 patient days".into()),
        }
    }

    fn dot(facility: &str, quarter: &str, rate: f64) -> DotRecord {
        DotRecord {
            facility: facility.into(),
            quarter: quarter.into(),
            year: 2024,
            dot_per_1000_days: rate,
        }
    }

    #[test]
    fn bed_days_exclude_network_row() {
        let summary = bed_days_summary(&[
            beds("Palo Alto", 100_000.0),
            beds("Reno", 50_000.0),
            beds("VISN 21", 150_000.0),
        ])
        .unwrap();
        assert_eq!(summary.total, 150_000.0);
        assert_eq!(summary.average, 75_000.0);
        assert_eq!(summary.facilities, ["Palo Alto", "Reno"]);
        assert!(bed_days_summary(&[beds("VISN 21", 1.0)]).is_none());
    }

    #[test]
    fn hai_types_keep_first_seen_order() {
        let summary = hai_type_summary(&[
            hai("Reno", "CLABSI", 0.0),
            hai("Reno", "CDI", 0.4),
            hai("Fresno", "CLABSI", 1.0),
            hai("VISN21", "CLABSI", 50.0),
        ]);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].hai_type, "CLABSI");
        assert_eq!(summary[0].average, 0.5);
        assert_eq!(summary[0].max, 1.0);
        assert_eq!(summary[0].min, 0.0);
        assert_eq!(summary[0].facilities_above_zero, 1);
    }

    #[test]
    fn dot_groups_by_quarter_and_facility() {
        let records = [
            dot("Reno", "Q2", 300.0),
            dot("Reno", "Q1", 320.0),
            dot("Fresno", "Q1", 480.0),
        ];
        let quarters = dot_by_quarter(&records);
        assert_eq!(quarters[0].quarter, "Q1");
        assert_eq!(quarters[0].mean, 400.0);
        assert_eq!(quarters[1].min, 300.0);

        let facilities = dot_by_facility(&records);
        assert_eq!(facilities[0].facility, "Fresno");
        assert_eq!(facilities[1].mean, 310.0);
    }
}
