use super::Session;
use crate::cli::ParametersArgs;
use crate::config::inputs::DEFAULT_ORGANIZATION;
use crate::config::{specs_for, ParameterSet, ParameterSpec, REGISTRY};
use crate::core::{OrganizationType, Product};
use crate::formatting::format_number;
use anyhow::{Context, Result};
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ParameterRow {
    #[serde(flatten)]
    pub spec: &'static ParameterSpec,
    pub default: f64,
}

/// Registry entries with their defaults for `organization`.
pub fn parameter_rows(
    product: Option<Product>,
    organization: OrganizationType,
) -> crate::error::Result<Vec<ParameterRow>> {
    let defaults = ParameterSet::defaults(organization);
    let specs: Vec<&'static ParameterSpec> = match product {
        Some(product) => specs_for(product).collect(),
        None => REGISTRY.iter().collect(),
    };
    specs
        .into_iter()
        .map(|spec| {
            Ok(ParameterRow {
                spec,
                default: defaults.get(spec.key)?,
            })
        })
        .collect()
}

/// Whole numbers grouped, fractions as written.
fn display_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format_number(value)
    } else {
        value.to_string()
    }
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn render_table(rows: &[ParameterRow], plain: bool) -> String {
    let mut table = Table::new();
    table
        .load_preset(if plain {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL
        })
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Key", "Label", "Unit", "Default", "Min", "Max", "Impact"]);
    for row in rows {
        let spec = row.spec;
        table.add_row(vec![
            Cell::new(spec.key),
            Cell::new(spec.label),
            Cell::new(spec.unit.symbol()),
            right(display_value(row.default)),
            right(display_value(spec.min)),
            right(display_value(spec.max)),
            Cell::new(spec.impact.map(|i| i.to_string()).unwrap_or_default()),
        ]);
    }
    table.to_string()
}

pub fn handle_parameters(session: &Session, args: &ParametersArgs) -> Result<()> {
    let organization = match (args.organization, session.config.organization.as_deref()) {
        (Some(org), _) => org,
        (None, Some(name)) => name.parse().context("Invalid organization in config")?,
        (None, None) => DEFAULT_ORGANIZATION,
    };
    let rows = parameter_rows(args.product, organization)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let formatter = session.formatting.formatter();
    let scope = args
        .product
        .map_or_else(|| "All products".to_string(), |p| p.to_string());
    println!(
        "{}",
        formatter.header(&format!("{scope}: parameters with {organization} defaults"))
    );
    println!("{}", render_table(&rows, session.formatting.is_plain()));
    println!(
        "{}",
        formatter.dim("Override with --set key=value or a [parameters] table in .praedi-roi.toml")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_filter_keeps_financial_inputs() {
        let rows = parameter_rows(Some(Product::PraediAlert), OrganizationType::Visn21).unwrap();
        assert!(rows.iter().any(|r| r.spec.key == "ipc.cost_per_hai"));
        assert!(rows.iter().any(|r| r.spec.key == "financial.implementation_cost"));
        assert!(rows.iter().all(|r| !r.spec.key.starts_with("pgx.")));
    }

    #[test]
    fn defaults_fall_inside_bounds() {
        for org in OrganizationType::ALL {
            for row in parameter_rows(None, org).unwrap() {
                assert!(
                    row.default >= row.spec.min && row.default <= row.spec.max,
                    "{} default {} outside [{}, {}] for {org}",
                    row.spec.key,
                    row.default,
                    row.spec.min,
                    row.spec.max
                );
            }
        }
    }

    #[test]
    fn json_rows_flatten_spec() {
        let rows = parameter_rows(Some(Product::PraediGene), OrganizationType::LargeHospital)
            .unwrap();
        let value = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(value["key"], "pgx.annual_volume");
        assert!(value["default"].is_number());
    }

    #[test]
    fn fractional_bounds_are_not_rounded() {
        assert_eq!(display_value(0.5), "0.5");
        assert_eq!(display_value(144_517.0), "144,517");
    }

    #[test]
    fn plain_table_is_ascii() {
        let rows = parameter_rows(Some(Product::PraediGene), OrganizationType::SmallHospital)
            .unwrap();
        let table = render_table(&rows, true);
        assert!(table.contains("pgx.adr_cost"));
        assert!(table.is_ascii());
    }
}
