//! Series building and trend forecasting on synthetic wide tables

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rentrs::{build_series, DataFrame, Period, TrendForecaster};

/// `regions` x `months` rent table with a gap every seventh cell
fn wide_table(regions: usize, months: usize) -> DataFrame {
    let start = Period::new(2015, 1).unwrap();
    let mut headers = vec!["ZIP".to_string(), "Metro".to_string()];
    headers.extend(start.range(months).map(|p| format!("{}-28", p)));

    let records = (0..regions)
        .map(|r| {
            let mut row = vec![(98000 + r).to_string(), "Seattle".to_string()];
            row.extend((0..months).map(|m| {
                if (r + m) % 7 == 0 {
                    String::new()
                } else {
                    (1000.0 + r as f64 + 7.5 * m as f64).to_string()
                }
            }));
            row
        })
        .collect();
    DataFrame::from_records(headers, records).unwrap()
}

fn bench_build_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("Series Builder");

    for regions in [100, 1000] {
        let df = wide_table(regions, 120);
        group.bench_with_input(BenchmarkId::new("build", regions), &df, |b, df| {
            b.iter(|| build_series(std::hint::black_box(df), "ZIP", 12).unwrap());
        });
    }

    group.finish();
}

fn bench_forecast(c: &mut Criterion) {
    let mut group = c.benchmark_group("Trend Forecaster");

    for regions in [100, 1000] {
        let series = build_series(&wide_table(regions, 120), "ZIP", 12).unwrap();
        let forecaster = TrendForecaster::default();
        group.bench_with_input(BenchmarkId::new("forecast", regions), &series, |b, series| {
            b.iter(|| forecaster.forecast(std::hint::black_box(series)).unwrap().rows.len());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_series, bench_forecast);
criterion_main!(benches);
