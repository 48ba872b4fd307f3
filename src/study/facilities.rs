//! Facility-level study results, the control group and HAI-type breakdown.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityOutcome {
    Success,
    Exceptional,
    OutbreakDetected,
    CdiOutbreakDetected,
}

impl FacilityOutcome {
    pub fn is_outbreak(&self) -> bool {
        matches!(self, Self::OutbreakDetected | Self::CdiOutbreakDetected)
    }
}

impl fmt::Display for FacilityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "Success",
            Self::Exceptional => "Exceptional",
            Self::OutbreakDetected => "Outbreak Detected",
            Self::CdiOutbreakDetected => "CDI Outbreak Detected",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FacilityResult {
    pub name: &'static str,
    pub region: &'static str,
    pub go_live: &'static str,
    pub beds: u32,
    pub pre_hais: u32,
    pub post_hais: u32,
    pub outcome: FacilityOutcome,
    pub notes: &'static str,
}

impl FacilityResult {
    /// Negative when HAIs rose, as at an outbreak site.
    pub fn reduction(&self) -> i64 {
        i64::from(self.pre_hais) - i64::from(self.post_hais)
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.pre_hais == 0 {
            return 0.0;
        }
        self.reduction() as f64 / f64::from(self.pre_hais) * 100.0
    }

    /// Name without the "VA Medical Center" suffix, for chart labels.
    pub fn short_name(&self) -> &'static str {
        self.name
            .strip_suffix(" VA Medical Center")
            .unwrap_or(self.name)
    }
}

macro_rules! facility {
    ($name:literal, $region:literal, $go_live:literal, $beds:literal, $pre:literal, $post:literal, $outcome:ident, $notes:literal) => {
        FacilityResult {
            name: $name,
            region: $region,
            go_live: $go_live,
            beds: $beds,
            pre_hais: $pre,
            post_hais: $post,
            outcome: FacilityOutcome::$outcome,
            notes: $notes,
        }
    };
}

#[rustfmt::skip]
pub const STUDY_FACILITIES: [FacilityResult; 8] = [
    facility!("Palo Alto VA Medical Center", "West", "December 2, 2020", 308, 74, 60, Success, "Pilot facility, first implementation"),
    facility!("West Palm Beach VA Medical Center", "Southeast", "July 22, 2021", 300, 43, 15, Exceptional, "Highest reduction rate achieved"),
    facility!("Las Vegas VA Medical Center", "Southwest", "June 30, 2022", 293, 41, 26, Success, "Rapid implementation model"),
    facility!("Greater Los Angeles VA Medical Center", "West", "August 1, 2022", 605, 111, 56, Success, "Largest facility in study"),
    facility!("New Orleans VA Medical Center", "South", "September 8, 2022", 248, 33, 1089, OutbreakDetected, "MRSA community surge detected and contained"),
    facility!("Loma Linda VA Medical Center", "West", "October 11, 2022", 270, 88, 47, Success, "Integrated with existing systems"),
    facility!("Shreveport VA Medical Center", "South", "April 23, 2024", 194, 247, 106, CdiOutbreakDetected, "CDI cluster identified and prevented"),
    facility!("Dallas VA Medical Center", "South", "May 21, 2024", 875, 237, 86, Exceptional, "Second highest reduction, newest implementation"),
];

/// Reported study-wide HAI counts, New Orleans outbreak excluded.
pub const STUDY_PRE_HAIS: f64 = 688.0;
pub const STUDY_POST_HAIS: f64 = 388.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FacilitySummary {
    pub total_pre_hais: f64,
    pub total_post_hais: f64,
    pub total_reduction: f64,
    pub average_reduction_percent: f64,
    pub facilities_with_reduction: usize,
    pub facilities_with_outbreak_detection: usize,
    pub total_beds: u32,
    pub total_lives_saved: f64,
    pub total_days_saved: f64,
}

pub fn facility_summary() -> FacilitySummary {
    let total_reduction = STUDY_PRE_HAIS - STUDY_POST_HAIS;
    FacilitySummary {
        total_pre_hais: STUDY_PRE_HAIS,
        total_post_hais: STUDY_POST_HAIS,
        total_reduction,
        average_reduction_percent: total_reduction / STUDY_PRE_HAIS * 100.0,
        facilities_with_reduction: STUDY_FACILITIES
            .iter()
            .filter(|f| !f.outcome.is_outbreak())
            .count(),
        facilities_with_outbreak_detection: STUDY_FACILITIES
            .iter()
            .filter(|f| f.outcome.is_outbreak())
            .count(),
        total_beds: STUDY_FACILITIES.iter().map(|f| f.beds).sum(),
        total_lives_saved: super::STUDY_OUTCOMES.lives_saved,
        total_days_saved: super::STUDY_OUTCOMES.hospital_days_saved,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlGroup {
    pub facilities: u32,
    pub pre_hais: f64,
    pub post_hais: f64,
    pub significance: &'static str,
}

impl ControlGroup {
    pub fn reduction(&self) -> f64 {
        self.pre_hais - self.post_hais
    }

    pub fn reduction_percent(&self) -> f64 {
        self.reduction() / self.pre_hais * 100.0
    }

    pub fn average_pre(&self) -> f64 {
        self.pre_hais / f64::from(self.facilities)
    }

    pub fn average_post(&self) -> f64 {
        self.post_hais / f64::from(self.facilities)
    }
}

pub fn control_group() -> ControlGroup {
    ControlGroup {
        facilities: super::STUDY_OUTCOMES.control_facilities,
        pre_hais: 5836.0,
        post_hais: 4224.0,
        significance: "p < 0.001",
    }
}

/// Intervention against control, computed from the reported counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedComparisons {
    /// Percent change, negative is a reduction
    pub intervention_change: f64,
    pub control_change: f64,
    /// Percentage points
    pub difference_in_differences: f64,
    /// Percent better than control
    pub relative_improvement: f64,
}

pub fn derived_comparisons() -> DerivedComparisons {
    let control = control_group();
    let intervention_change = (STUDY_POST_HAIS - STUDY_PRE_HAIS) / STUDY_PRE_HAIS * 100.0;
    let control_change = (control.post_hais - control.pre_hais) / control.pre_hais * 100.0;
    let difference_in_differences = intervention_change - control_change;
    DerivedComparisons {
        intervention_change,
        control_change,
        difference_in_differences,
        relative_improvement: difference_in_differences / control_change * 100.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HaiTypeResult {
    pub code: &'static str,
    pub name: &'static str,
    pub intervention_pre: f64,
    pub intervention_post: f64,
    pub control_pre: f64,
    pub control_post: f64,
    /// Reported net benefit over control, percent
    pub net_benefit_percent: f64,
}

impl HaiTypeResult {
    pub fn intervention_change(&self) -> f64 {
        (self.intervention_post - self.intervention_pre) / self.intervention_pre * 100.0
    }

    pub fn control_change(&self) -> f64 {
        (self.control_post - self.control_pre) / self.control_pre * 100.0
    }
}

macro_rules! hai_type {
    ($code:literal, $name:literal, $ip:literal, $ipost:literal, $cp:literal, $cpost:literal, $net:literal) => {
        HaiTypeResult {
            code: $code,
            name: $name,
            intervention_pre: $ip,
            intervention_post: $ipost,
            control_pre: $cp,
            control_post: $cpost,
            net_benefit_percent: $net,
        }
    };
}

#[rustfmt::skip]
const HAI_TYPES: [HaiTypeResult; 6] = [
    hai_type!("CAUTI", "Catheter-Associated UTI", 145.0, 78.0, 1459.0, 1155.0, 34.0),
    hai_type!("CLABSI", "Central Line Bloodstream Infection", 112.0, 67.0, 1167.0, 968.0, 21.1),
    hai_type!("SSI", "Surgical Site Infection", 98.0, 58.0, 1050.0, 907.0, 12.8),
    hai_type!("CDI", "Clostridioides difficile Infection", 87.0, 52.0, 875.0, 732.0, 18.1),
    hai_type!("MRSA", "Methicillin-resistant Staph aureus", 143.0, 78.0, 700.0, 605.0, -21.2),
    hai_type!("DVT/PE", "Deep Vein Thrombosis/Pulmonary Embolism", 103.0, 55.0, 585.0, 857.0, 26.4),
];

pub fn hai_types() -> &'static [HaiTypeResult] {
    &HAI_TYPES
}
