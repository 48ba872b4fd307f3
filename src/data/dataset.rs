use super::loader::{parse_records, DataFile};
use super::records::{is_aggregate_row, BedDaysRecord, DotRecord, GeneticTestRecord, HaiRateRecord};
use super::DataKind;
use crate::config::{FacilityInputs, ParameterSet, TestCosts};
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;

/// Every typed record loaded for one calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacilityDataset {
    pub bed_days: Vec<BedDaysRecord>,
    pub hai_rates: Vec<HaiRateRecord>,
    pub antibiotic_dot: Vec<DotRecord>,
    pub genetic_tests: Vec<GeneticTestRecord>,
    pub sources: Vec<PathBuf>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

impl FacilityDataset {
    pub fn is_empty(&self) -> bool {
        self.bed_days.is_empty()
            && self.hai_rates.is_empty()
            && self.antibiotic_dot.is_empty()
            && self.genetic_tests.is_empty()
    }

    /// Parse a loaded file into the matching record list. Generic files
    /// carry nothing the calculators can use and are skipped.
    pub fn add(&mut self, file: DataFile) -> Result<()> {
        match file.kind {
            DataKind::PatientDays => self.bed_days.extend(parse_records(&file)?),
            DataKind::HaiRates => self.hai_rates.extend(parse_records(&file)?),
            DataKind::AntibioticDot => self.antibiotic_dot.extend(parse_records(&file)?),
            DataKind::GeneticTests => self.genetic_tests.extend(parse_records(&file)?),
            DataKind::Generic => {
                tracing::warn!(path = %file.path.display(), "no recognised columns, file ignored");
                return Ok(());
            }
        }
        self.sources.push(file.path);
        Ok(())
    }

    /// Sum of facility bed days, network aggregate rows excluded.
    pub fn total_bed_days(&self) -> Option<f64> {
        let facilities: Vec<f64> = self
            .bed_days
            .iter()
            .filter(|r| !is_aggregate_row(&r.facility))
            .map(|r| r.bed_days_annual)
            .collect();
        (!facilities.is_empty()).then(|| facilities.iter().sum())
    }

    /// Mean CDI rolling-12-month rate across facilities.
    pub fn mean_cdi_rate(&self) -> Option<f64> {
        mean(
            self.hai_rates
                .iter()
                .filter(|r| r.is_cdi() && !is_aggregate_row(&r.facility))
                .map(|r| r.rolling_12_months_rate),
        )
    }

    pub fn mean_dot_rate(&self) -> Option<f64> {
        mean(
            self.antibiotic_dot
                .iter()
                .filter(|r| !is_aggregate_row(&r.facility))
                .map(|r| r.dot_per_1000_days),
        )
    }

    pub fn facility_inputs(&self) -> FacilityInputs {
        FacilityInputs {
            cdi_rate: self.mean_cdi_rate(),
            total_bed_days: self.total_bed_days(),
            mean_dot_rate: self.mean_dot_rate(),
        }
    }

    /// Replace pipeline volumes and per-test costs with measured values.
    /// Unrecognised test types are logged and skipped.
    pub fn apply_genetic_tests(&self, params: &mut ParameterSet, costs: &mut TestCosts) {
        for test in &self.genetic_tests {
            let kind = test.test_type.trim().to_ascii_lowercase().replace([' ', '-', '_'], "");
            let (volume, in_house, outsourced) = match kind.as_str() {
                "pgx" | "pharmacogenomics" => (
                    &mut params.gene.pgx.annual_volume,
                    &mut costs.pgx_in_house,
                    Some(&mut costs.pgx_outsourced),
                ),
                "tso500" => (
                    &mut params.gene.tso500.annual_volume,
                    &mut costs.tso500_in_house,
                    Some(&mut costs.tso500_outsourced),
                ),
                "bias2015" => (
                    &mut params.gene.bias2015.annual_tests,
                    &mut costs.bias2015_per_test,
                    None,
                ),
                "cytogenetics" | "cyto" => (
                    &mut params.gene.cytogenetics.annual_volume,
                    &mut costs.cytogenetics_in_house,
                    Some(&mut costs.cytogenetics_outsourced),
                ),
                _ => {
                    tracing::warn!(test_type = %test.test_type, "unknown genetic test type");
                    continue;
                }
            };
            *volume = test.annual_volume;
            if let Some(cost) = test.in_house_cost {
                *in_house = cost;
            }
            if let (Some(slot), Some(cost)) = (outsourced, test.outsource_cost) {
                *slot = cost;
            }
            tracing::debug!(test_type = %test.test_type, volume = test.annual_volume, "applied genetic test data");
        }
    }
}

/// Combine per-facility datasets, stamping each row with its facility name.
pub fn merge_facility_datasets(
    datasets: impl IntoIterator<Item = (String, FacilityDataset)>,
) -> FacilityDataset {
    datasets
        .into_iter()
        .fold(FacilityDataset::default(), |mut merged, (facility, data)| {
            merged.bed_days.extend(data.bed_days.into_iter().map(|mut r| {
                r.facility.clone_from(&facility);
                r
            }));
            merged.hai_rates.extend(data.hai_rates.into_iter().map(|mut r| {
                r.facility.clone_from(&facility);
                r
            }));
            merged.antibiotic_dot.extend(data.antibiotic_dot.into_iter().map(|mut r| {
                r.facility.clone_from(&facility);
                r
            }));
            merged.genetic_tests.extend(data.genetic_tests);
            merged.sources.extend(data.sources);
            merged
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OrganizationType;

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
            unit_of_measure: None,
        }
    }

    fn dot(facility: &str, rate: f64) -> DotRecord {
        DotRecord {
            facility: facility.into(),
            quarter: "Q1".into(),
            year: 2024,
            dot_per_1000_days: rate,
        }
    }

    #[test]
    fn facility_inputs_exclude_aggregates() {
        let dataset = FacilityDataset {
            bed_days: vec![beds("Palo Alto", 120_000.0), beds("Fresno", 80_000.0), beds("VISN 21", 200_000.0)],
            hai_rates: vec![
                hai("Palo Alto", "CDI", 0.4),
                hai("Fresno", "CDI", 0.6),
                hai("Fresno", "CLABSI", 2.0),
                hai("VISN21", "CDI", 9.0),
            ],
            antibiotic_dot: vec![dot("Palo Alto", 300.0), dot("Fresno", 500.0)],
            ..FacilityDataset::default()
        };
        let inputs = dataset.facility_inputs();
        assert_eq!(inputs.total_bed_days, Some(200_000.0));
        assert_eq!(inputs.mean_dot_rate, Some(400.0));
        assert!((inputs.cdi_rate.unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(inputs.annual_dot(), Some(80_000.0));
    }

    #[test]
    fn facility_named_total_is_counted() {
        let dataset = FacilityDataset {
            bed_days: vec![
                beds("Total Care Medical Center", 30_000.0),
                beds("Fresno", 70_000.0),
                beds("Total", 100_000.0),
            ],
            ..FacilityDataset::default()
        };
        assert_eq!(dataset.total_bed_days(), Some(100_000.0));
    }

    #[test]
    fn empty_dataset_yields_no_inputs() {
        let inputs = FacilityDataset::default().facility_inputs();
        assert!(inputs.is_empty());
    }

    #[test]
    fn genetic_tests_replace_volume_and_costs() {
        let dataset = FacilityDataset {
            genetic_tests: vec![
                GeneticTestRecord {
                    test_type: "PGx".into(),
                    annual_volume: 1000.0,
                    in_house_cost: Some(180.0),
                    outsource_cost: Some(400.0),
                },
                GeneticTestRecord {
                    test_type: "BIAS2015".into(),
                    annual_volume: 450.0,
                    in_house_cost: Some(1100.0),
                    outsource_cost: Some(1200.0),
                },
                GeneticTestRecord {
                    test_type: "WGS".into(),
                    annual_volume: 5.0,
                    in_house_cost: None,
                    outsource_cost: None,
                },
            ],
            ..FacilityDataset::default()
        };
        let mut params = ParameterSet::defaults(OrganizationType::MediumHospital);
        let mut costs = TestCosts::default();
        dataset.apply_genetic_tests(&mut params, &mut costs);

        assert_eq!(params.gene.pgx.annual_volume, 1000.0);
        assert_eq!(costs.pgx_in_house, 180.0);
        assert_eq!(costs.pgx_outsourced, 400.0);
        assert_eq!(params.gene.bias2015.annual_tests, 450.0);
        assert_eq!(costs.bias2015_per_test, 1100.0);
        assert_eq!(params.gene.tso500.annual_volume, 300.0);
    }

    #[test]
    fn merge_tags_rows_with_facility() {
        let a = FacilityDataset {
            hai_rates: vec![hai("unknown", "CDI", 0.3)],
            ..FacilityDataset::default()
        };
        let b = FacilityDataset {
            hai_rates: vec![hai("unknown", "CDI", 0.7)],
            antibiotic_dot: vec![dot("unknown", 410.0)],
            ..FacilityDataset::default()
        };
        let merged = merge_facility_datasets([("Reno".to_string(), a), ("Fresno".to_string(), b)]);
        let names: Vec<_> = merged.hai_rates.iter().map(|r| r.facility.as_str()).collect();
        assert_eq!(names, ["Reno", "Fresno"]);
        assert_eq!(merged.antibiotic_dot[0].facility, "Fresno");
    }
}
