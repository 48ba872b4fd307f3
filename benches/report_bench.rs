use criterion::{criterion_group, criterion_main, Criterion};
use praedi_roi::config::RoiInputs;
use praedi_roi::formatting::FormattingConfig;
use praedi_roi::output::render_pdf;
use praedi_roi::{build_report, create_writer, OrganizationType, OutputFormat, Product, View};
use std::hint::black_box;

fn bench_build_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_report");
    for product in Product::ALL {
        let inputs = RoiInputs::new(product, OrganizationType::Visn21);
        group.bench_function(product.slug(), |b| {
            b.iter(|| build_report(black_box(&inputs)).unwrap())
        });
    }
    group.finish();
}

fn bench_rendering(c: &mut Criterion) {
    let report = build_report(&RoiInputs::new(
        Product::PraediAlert,
        OrganizationType::Visn21,
    ))
    .unwrap();

    c.bench_function("render_terminal_detailed", |b| {
        b.iter(|| {
            let mut buffer = Vec::new();
            create_writer(
                OutputFormat::Terminal,
                View::Detailed,
                FormattingConfig::plain(),
                &mut buffer,
            )
            .write_report(black_box(&report))
            .unwrap();
            buffer
        })
    });

    c.bench_function("render_pdf", |b| {
        b.iter(|| render_pdf(black_box(&report)).unwrap())
    });
}

criterion_group!(benches, bench_build_report, bench_rendering);
criterion_main!(benches);
