use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rusty_fx_analyzer::{
    analysis::{calculate_change_distribution, median, mode, standard_deviation, SessionSummary},
    currency::CurrencyCode,
    types::{Observation, RateSeries},
};

/// One year of business-day rates with a slow drift and a weekly wobble
fn year_of_rates(code: &str, base: f64) -> RateSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let observations = (0..365)
        .filter(|i| i % 7 < 5)
        .map(|i| {
            let rate = base + 0.001 * i as f64 + 0.01 * ((i % 5) as f64 - 2.0);
            Observation::new(format!("{:03}/A/NBP/2024", i + 1), start + Duration::days(i), rate)
        })
        .collect();
    RateSeries::from_observations(CurrencyCode::new(code).unwrap(), observations)
}

fn benchmark_statistics(c: &mut Criterion) {
    let usd = year_of_rates("USD", 4.0);

    c.bench_function("median_1y", |b| b.iter(|| median(black_box(&usd))));
    c.bench_function("mode_1y", |b| b.iter(|| mode(black_box(&usd))));
    c.bench_function("standard_deviation_1y", |b| {
        b.iter(|| standard_deviation(black_box(&usd)))
    });
}

fn benchmark_sessions(c: &mut Criterion) {
    let usd = year_of_rates("USD", 4.0);

    c.bench_function("session_summary_1y", |b| {
        b.iter(|| SessionSummary::from_series(black_box(&usd)))
    });
}

fn benchmark_change_distribution(c: &mut Criterion) {
    let eur = year_of_rates("EUR", 4.3);
    let usd = year_of_rates("USD", 4.0);

    c.bench_function("change_distribution_1y", |b| {
        b.iter(|| {
            calculate_change_distribution(black_box(&eur), black_box(&usd), 14, 0.0001)
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_statistics,
    benchmark_sessions,
    benchmark_change_distribution
);
criterion_main!(benches);
