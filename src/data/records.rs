//! Typed rows for each supported data kind.

use serde::{Deserialize, Serialize};

/// Annual bed days for one facility. Network aggregate rows (for example
/// "VISN 21" or "Total") may appear alongside the facilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedDaysRecord {
    pub facility: String,
    #[serde(default)]
    pub facility_code: Option<String>,
    #[serde(alias = "bed_days", alias = "patient_days")]
    pub bed_days_annual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaiRateRecord {
    pub facility: String,
    pub hai_type: String,
    #[serde(alias = "infection_rate")]
    pub rolling_12_months_rate: f64,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
}

impl HaiRateRecord {
    pub fn is_cdi(&self) -> bool {
        let kind = self.hai_type.trim().to_ascii_lowercase();
        kind == "cdi" || kind.contains("diff")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotRecord {
    pub facility: String,
    pub quarter: String,
    pub year: i32,
    pub dot_per_1000_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticTestRecord {
    pub test_type: String,
    #[serde(alias = "test_volume")]
    pub annual_volume: f64,
    #[serde(default)]
    pub in_house_cost: Option<f64>,
    #[serde(default)]
    pub outsource_cost: Option<f64>,
}

const AGGREGATE_NAMES: [&str; 3] = ["VISN 21", "VISN21", "TOTAL"];

/// Whether a facility name denotes a network-level aggregate row. Only the
/// whole name counts, so "Total Care Medical Center" stays a facility.
pub fn is_aggregate_row(facility: &str) -> bool {
    let name = facility.trim().to_ascii_uppercase();
    AGGREGATE_NAMES.contains(&name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_rows_are_recognised() {
        assert!(is_aggregate_row("VISN 21"));
        assert!(is_aggregate_row("VISN21"));
        assert!(is_aggregate_row(" Total "));
        assert!(!is_aggregate_row("Palo Alto"));
    }

    #[test]
    fn facility_names_containing_total_are_kept() {
        assert!(!is_aggregate_row("Total Care Medical Center"));
        assert!(!is_aggregate_row("VISN 21 Palo Alto"));
    }

    #[test]
    fn cdi_matches_common_spellings() {
        let record = |hai_type: &str| HaiRateRecord {
            facility: "Fresno".into(),
            hai_type: hai_type.into(),
            rolling_12_months_rate: 0.4,
            unit_of_measure: None,
        };
        assert!(record("CDI").is_cdi());
        assert!(record("C. diff").is_cdi());
        assert!(!record("CLABSI").is_cdi());
    }
}
