//! Benchmark for keyed reconciliation and SVG encoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gapminder_viz::prelude::*;

const CONTINENTS: [&str; 4] = ["asia", "europe", "africa", "americas"];

fn year(year: i32, countries: usize, offset: usize) -> YearDataset {
    let records = (offset..offset + countries)
        .map(|i| CountryRecord {
            country: format!("country-{i}"),
            continent: CONTINENTS[i % CONTINENTS.len()].to_string(),
            income: 200.0 + (i * 37 + year as usize) as f64,
            life_exp: 30.0 + (i % 50) as f64,
            population: 10_000 + (i as u64) * 1_000,
        })
        .collect();
    YearDataset { year, records }
}

fn reconcile_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    let scales = ChartScales::new(&ChartLayout::default()).unwrap();

    for size in [50, 200, 1_000] {
        // Shift by 10% so each render has enters, updates and exits.
        let a = year(1800, size, 0);
        let b = year(1801, size, size / 10);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bench, _| {
            let mut renderer = ChartRenderer::new(scales.clone(), Duration::from_millis(100));
            bench.iter(|| {
                renderer.render(black_box(&a), "1800");
                renderer.render(black_box(&b), "1801")
            });
        });
    }

    group.finish();
}

fn svg_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_svg");
    let layout = ChartLayout::default();
    let chart = ChartSvg::new(layout).unwrap();

    for size in [50, 200, 1_000] {
        let mut renderer =
            ChartRenderer::new(ChartScales::new(&layout).unwrap(), Duration::from_millis(100));
        renderer.render(&year(1800, size, 0), "1800");
        renderer.render(&year(1801, size, 0), "1801");
        let frame = renderer.frame();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bench, _| {
            bench.iter(|| chart.render(black_box(&frame)));
        });
    }

    group.finish();
}

criterion_group!(benches, reconcile_benchmark, svg_benchmark);
criterion_main!(benches);
