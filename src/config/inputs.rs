//! Resolution of everything a calculation needs into one [`RoiInputs`].
//!
//! Layers, lowest first: organization defaults, loaded facility data,
//! the config file, command-line flags.

use super::core::RoiConfig;
use super::defaults::TestCosts;
use super::registry::ParameterSet;
use crate::core::{CalculationModel, OrganizationType, Product};
use crate::data::FacilityDataset;
use crate::error::Result;
use serde::Serialize;

pub const DEFAULT_PRODUCT: Product = Product::PraediAlert;
pub const DEFAULT_ORGANIZATION: OrganizationType = OrganizationType::Visn21;

/// Facility measurements derived from loaded CSV data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FacilityInputs {
    /// Mean CDI rolling-12-month rate across facilities
    pub cdi_rate: Option<f64>,
    /// Annual bed days summed over facilities, network aggregate excluded
    pub total_bed_days: Option<f64>,
    /// Mean antibiotic days of therapy per 1000 bed days
    pub mean_dot_rate: Option<f64>,
}

impl FacilityInputs {
    pub fn is_empty(&self) -> bool {
        self.cdi_rate.is_none() && self.total_bed_days.is_none() && self.mean_dot_rate.is_none()
    }

    pub fn annual_dot(&self) -> Option<f64> {
        Some(self.mean_dot_rate? * self.total_bed_days? / 1000.0)
    }
}

/// Flags from the command line; `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub product: Option<Product>,
    pub organization: Option<OrganizationType>,
    pub model: Option<CalculationModel>,
    pub set: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiInputs {
    pub product: Product,
    pub organization: OrganizationType,
    pub model: CalculationModel,
    pub params: ParameterSet,
    pub test_costs: TestCosts,
    pub facility: FacilityInputs,
}

impl RoiInputs {
    /// Organization defaults with no overrides or data.
    pub fn new(product: Product, organization: OrganizationType) -> Self {
        Self {
            product,
            organization,
            model: CalculationModel::default(),
            params: ParameterSet::defaults(organization),
            test_costs: TestCosts::default(),
            facility: FacilityInputs::default(),
        }
    }

    pub fn with_model(mut self, model: CalculationModel) -> Self {
        self.model = model;
        self
    }
}

pub fn resolve_inputs(
    config: &RoiConfig,
    cli: &CliOverrides,
    data: Option<&FacilityDataset>,
) -> Result<RoiInputs> {
    let product = match (cli.product, config.product.as_deref()) {
        (Some(product), _) => product,
        (None, Some(name)) => name.parse()?,
        (None, None) => DEFAULT_PRODUCT,
    };
    let organization = match (cli.organization, config.organization.as_deref()) {
        (Some(org), _) => org,
        (None, Some(name)) => name.parse()?,
        (None, None) => DEFAULT_ORGANIZATION,
    };
    let model = cli.model.or(config.model).unwrap_or_default();

    let mut inputs = RoiInputs::new(product, organization).with_model(model);

    if let Some(data) = data {
        data.apply_genetic_tests(&mut inputs.params, &mut inputs.test_costs);
        inputs.facility = data.facility_inputs();
    }

    inputs.params.apply_overrides(
        config
            .parameters
            .iter()
            .map(|(key, value)| (key.as_str(), *value)),
    )?;
    if let Some(financial) = &config.financial {
        inputs.params.apply_overrides(financial.entries())?;
    }
    inputs
        .params
        .apply_overrides(cli.set.iter().map(|(key, value)| (key.as_str(), *value)))?;

    inputs.params.validate()?;

    tracing::info!(
        product = %inputs.product,
        organization = %inputs.organization,
        model = %inputs.model,
        facility_data = !inputs.facility.is_empty(),
        "resolved calculation inputs"
    );
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::core::FinancialOverrides;

    #[test]
    fn defaults_when_nothing_is_given() {
        let inputs = resolve_inputs(&RoiConfig::default(), &CliOverrides::default(), None).unwrap();
        assert_eq!(inputs.product, Product::PraediAlert);
        assert_eq!(inputs.organization, OrganizationType::Visn21);
        assert_eq!(inputs.model, CalculationModel::Study);
        assert!(inputs.facility.is_empty());
    }

    #[test]
    fn cli_beats_file_beats_defaults() {
        let mut config = RoiConfig {
            organization: Some("Small Hospital".into()),
            financial: Some(FinancialOverrides {
                implementation_cost: Some(40_000.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        config.parameters.insert("pgx.annual_volume".into(), 900.0);

        let cli = CliOverrides {
            product: Some(Product::PraediGene),
            set: vec![("pgx.annual_volume".into(), 1100.0)],
            ..Default::default()
        };

        let inputs = resolve_inputs(&config, &cli, None).unwrap();
        assert_eq!(inputs.organization, OrganizationType::SmallHospital);
        assert_eq!(inputs.product, Product::PraediGene);
        assert_eq!(inputs.params.gene.pgx.annual_volume, 1100.0);
        assert_eq!(inputs.params.financial.implementation_cost, 40_000.0);
        assert_eq!(inputs.params.financial.annual_maintenance, 6_000.0);
    }

    #[test]
    fn out_of_range_override_fails_resolution() {
        let cli = CliOverrides {
            set: vec![("regulatory.automation_efficiency".into(), 99.0)],
            ..Default::default()
        };
        let err = resolve_inputs(&RoiConfig::default(), &cli, None).unwrap_err();
        assert_eq!(err.code().as_str(), "E050");
    }

    #[test]
    fn unknown_organization_in_file_is_reported() {
        let config = RoiConfig {
            organization: Some("clinic".into()),
            ..Default::default()
        };
        assert!(resolve_inputs(&config, &CliOverrides::default(), None).is_err());
    }

    #[test]
    fn annual_dot_needs_both_measurements() {
        let mut facility = FacilityInputs {
            mean_dot_rate: Some(400.0),
            ..Default::default()
        };
        assert_eq!(facility.annual_dot(), None);
        facility.total_bed_days = Some(100_000.0);
        assert_eq!(facility.annual_dot(), Some(40_000.0));
    }
}
