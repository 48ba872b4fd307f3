use praedi_roi::config::{specs_for, RoiInputs};
use praedi_roi::core::CalculationModel;
use praedi_roi::data::load_directory;
use praedi_roi::formatting::FormattingConfig;
use praedi_roi::output::{export_report, ExcelOptions};
use praedi_roi::{
    build_report, create_writer, resolve_inputs, CliOverrides, ExportFormat, OrganizationType,
    OutputFormat, OutputWriter, Product, RoiConfig, RoiReport, View,
};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn render(report: &RoiReport, format: OutputFormat, view: View) -> String {
    let mut buffer = Vec::new();
    create_writer(format, view, FormattingConfig::plain(), &mut buffer)
        .write_report(report)
        .unwrap();
    String::from_utf8(buffer).unwrap()
}

fn assert_consistent(report: &RoiReport) {
    let summary = &report.results.summary;
    assert!((summary.net_benefit - (summary.total_savings - summary.total_investment)).abs() < 1e-6);

    let component_total: f64 = report
        .results
        .components
        .iter()
        .map(|c| c.total_savings)
        .sum();
    // Study-model totals are truncated to whole dollars.
    assert!((component_total - summary.total_savings).abs() < 1.0);

    let mut previous = 0.0;
    for year in &report.projection {
        assert!((year.cumulative_savings - previous - year.savings).abs() < 1e-6);
        assert!((year.cumulative_net - (year.cumulative_savings - year.cumulative_cost)).abs() < 1e-6);
        previous = year.cumulative_savings;
    }

    assert!(report
        .sensitivity
        .windows(2)
        .all(|pair| pair[0].swing >= pair[1].swing));
}

#[test]
fn every_organization_builds_and_renders() {
    for product in Product::ALL {
        for organization in OrganizationType::ALL {
            for model in [CalculationModel::Study, CalculationModel::Parametric] {
                let mut inputs = RoiInputs::new(product, organization);
                inputs.model = model;
                let report = build_report(&inputs).unwrap_or_else(|e| {
                    panic!("{product} / {organization} / {model:?} failed: {e}")
                });
                assert_consistent(&report);
                assert_eq!(report.projection.len(), 5);
                assert_eq!(
                    report.contract.is_some(),
                    product == Product::PraediAlert && organization == OrganizationType::Visn21
                );

                for format in [
                    OutputFormat::Terminal,
                    OutputFormat::Markdown,
                    OutputFormat::Json,
                    OutputFormat::Csv,
                ] {
                    for view in [View::Executive, View::Detailed, View::Comparison] {
                        let text = render(&report, format, view);
                        assert!(!text.is_empty(), "{format:?} {view:?} rendered nothing");
                    }
                }
            }
        }
    }
}

#[test]
fn exports_write_pdf_and_workbook() {
    let dir = TempDir::new().unwrap();
    let report = build_report(&RoiInputs::new(
        Product::PraediAlert,
        OrganizationType::Visn21,
    ))
    .unwrap();

    let pdf = dir.path().join("report.pdf");
    export_report(&report, ExportFormat::Pdf, &pdf, &ExcelOptions::default()).unwrap();
    assert!(fs::read(&pdf).unwrap().starts_with(b"%PDF"));

    let xlsx = dir.path().join("nested").join("report.xlsx");
    export_report(
        &report,
        ExportFormat::Xlsx,
        &xlsx,
        &ExcelOptions {
            comprehensive: true,
        },
    )
    .unwrap();
    assert!(fs::read(&xlsx).unwrap().starts_with(b"PK"));
}

#[test]
fn facility_data_replaces_patient_days() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("visn21_patient_bed_days.csv"),
        "facility,facility_code,bed_days_annual\nPalo Alto,640,150000\nFresno,570,50000\n",
    )
    .unwrap();
    let dataset = load_directory(dir.path()).unwrap();

    let overrides = CliOverrides {
        product: Some(Product::PraediAlert),
        model: Some(CalculationModel::Parametric),
        ..CliOverrides::default()
    };
    let with_data = resolve_inputs(&RoiConfig::default(), &overrides, Some(&dataset)).unwrap();
    let without = resolve_inputs(&RoiConfig::default(), &overrides, None).unwrap();

    assert_eq!(with_data.facility.total_bed_days, Some(200_000.0));
    assert_eq!(without.facility.total_bed_days, None);

    let with_data = build_report(&with_data).unwrap();
    let without = build_report(&without).unwrap();
    assert_consistent(&with_data);
    assert_ne!(
        with_data.results.summary.total_savings,
        without.results.summary.total_savings
    );
}

#[test]
fn override_outside_bounds_is_rejected() {
    let overrides = CliOverrides {
        set: vec![("ipc.cost_per_hai".to_string(), -5.0)],
        ..CliOverrides::default()
    };
    let err = resolve_inputs(&RoiConfig::default(), &overrides, None).unwrap_err();
    assert!(err.to_string().contains("ipc.cost_per_hai"));
}

fn product_strategy() -> impl Strategy<Value = Product> {
    prop_oneof![Just(Product::PraediGene), Just(Product::PraediAlert)]
}

fn organization_strategy() -> impl Strategy<Value = OrganizationType> {
    prop::sample::select(OrganizationType::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn perturbed_parameters_keep_report_consistent(
        product in product_strategy(),
        organization in organization_strategy(),
        index in any::<prop::sample::Index>(),
        factor in 0.5f64..1.5,
    ) {
        let specs: Vec<_> = specs_for(product).collect();
        let spec = specs[index.index(specs.len())];

        let mut inputs = RoiInputs::new(product, organization);
        inputs.model = CalculationModel::Parametric;
        let base = inputs.params.get(spec.key).unwrap();
        prop_assume!(base > 0.0);
        let value = (base * factor).clamp(spec.min, spec.max);
        inputs.params.apply_override(spec.key, value).unwrap();

        let report = build_report(&inputs).unwrap();
        assert_consistent(&report);

        let savings = report.results.summary.total_savings;
        prop_assert!((report.scenarios[1].annual_savings - savings).abs() < 1e-6);
        if savings >= 0.0 {
            prop_assert!(report.scenarios[0].annual_savings <= report.scenarios[1].annual_savings);
            prop_assert!(report.scenarios[1].annual_savings <= report.scenarios[2].annual_savings);
        }
    }
}
