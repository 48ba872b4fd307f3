use crate::error::RoiError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product platform being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    /// Genetic-testing pipelines (PGx, TSO500, BIAS2015, Cytogenetics)
    PraediGene,
    /// Infection prevention and surveillance modules
    PraediAlert,
}

impl Product {
    pub const ALL: [Product; 2] = [Product::PraediGene, Product::PraediAlert];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PraediGene => "PraediGene",
            Self::PraediAlert => "PraediAlert",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::PraediGene => "praedigene",
            Self::PraediAlert => "praedialert",
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            Self::PraediGene => "Precision Medicine & Genetic Testing Platform",
            Self::PraediAlert => "Comprehensive Clinical Surveillance Platform",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Product {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "praedigene" | "gene" => Ok(Self::PraediGene),
            "praedialert" | "alert" => Ok(Self::PraediAlert),
            _ => Err(RoiError::UnknownName {
                kind: "product",
                name: s.to_string(),
                expected: "praedigene, praedialert".to_string(),
            }),
        }
    }
}

/// Organization profile that selects the default parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    SmallHospital,
    MediumHospital,
    LargeHospital,
    #[serde(alias = "VISN21")]
    Visn21,
    /// Custom facility; starts from the medium-hospital defaults.
    Custom,
}

impl OrganizationType {
    pub const ALL: [OrganizationType; 5] = [
        OrganizationType::Visn21,
        OrganizationType::SmallHospital,
        OrganizationType::MediumHospital,
        OrganizationType::LargeHospital,
        OrganizationType::Custom,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SmallHospital => "Small Hospital",
            Self::MediumHospital => "Medium Hospital",
            Self::LargeHospital => "Large Hospital",
            Self::Visn21 => "VISN21",
            Self::Custom => "Custom",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::SmallHospital => "small_hospital",
            Self::MediumHospital => "medium_hospital",
            Self::LargeHospital => "large_hospital",
            Self::Visn21 => "visn21",
            Self::Custom => "custom",
        }
    }

    pub fn size_class(&self) -> SizeClass {
        match self {
            Self::SmallHospital => SizeClass::Small,
            Self::MediumHospital | Self::Custom => SizeClass::Medium,
            Self::LargeHospital => SizeClass::Large,
            Self::Visn21 => SizeClass::Visn21,
        }
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for OrganizationType {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "smallhospital" | "small" => Ok(Self::SmallHospital),
            "mediumhospital" | "medium" => Ok(Self::MediumHospital),
            "largehospital" | "large" => Ok(Self::LargeHospital),
            "visn21" => Ok(Self::Visn21),
            "custom" => Ok(Self::Custom),
            _ => Err(RoiError::UnknownName {
                kind: "organization",
                name: s.to_string(),
                expected: "small_hospital, medium_hospital, large_hospital, visn21, custom"
                    .to_string(),
            }),
        }
    }
}

/// Size bucket used for financial defaults and study adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    Visn21,
}

/// Which set of formulas drives the PraediAlert modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CalculationModel {
    /// Effect sizes fixed to the 8-facility study, whole-dollar figures
    #[default]
    Study,
    /// Configurable reduction targets, driven by loaded facility data when present
    Parametric,
}

impl fmt::Display for CalculationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Study => f.write_str("study"),
            Self::Parametric => f.write_str("parametric"),
        }
    }
}

// Lowercase and strip separators so "Large Hospital", "large-hospital" and
// "large_hospital" compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_parses_every_spelling() {
        for input in ["large_hospital", "Large Hospital", "large-hospital", "LARGE"] {
            assert_eq!(
                input.parse::<OrganizationType>().unwrap(),
                OrganizationType::LargeHospital
            );
        }
        assert_eq!("VISN21".parse::<OrganizationType>().unwrap(), OrganizationType::Visn21);
    }

    #[test]
    fn unknown_organization_is_an_error() {
        let err = "clinic".parse::<OrganizationType>().unwrap_err();
        assert!(err.to_string().contains("unknown organization 'clinic'"));
    }

    #[test]
    fn visn21_keeps_its_case_in_display() {
        assert_eq!(OrganizationType::Visn21.to_string(), "VISN21");
        assert_eq!(OrganizationType::SmallHospital.to_string(), "Small Hospital");
    }

    #[test]
    fn custom_uses_medium_size_class() {
        assert_eq!(OrganizationType::Custom.size_class(), SizeClass::Medium);
    }

    #[test]
    fn product_round_trips_through_slug() {
        for product in Product::ALL {
            assert_eq!(product.slug().parse::<Product>().unwrap(), product);
        }
    }
}
