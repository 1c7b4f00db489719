//! Criterion benchmarks for the scoring hot paths.
//!
//! Benchmarks:
//!   - additive and coast-calibrated scoring of one snapshot
//!   - shelter ranking over 500 raw features
//!
//! Run with: cargo bench --bench storm_scoring

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;

use coastal_storm_risk::shelters::GeoCenter;
use coastal_storm_risk::{compute_storm_risk_at, rank_shelters, Coast, GeoElement, ScoringStrategy, WeatherObservation};

fn stormy() -> WeatherObservation {
    WeatherObservation {
        city: "Puri".to_string(),
        temp: 26.0,
        feels_like: 35.0,
        temp_min: 25.0,
        temp_max: 27.0,
        humidity: 92.0,
        pressure: 985.0,
        wind_speed: 18.0,
        wind_deg: 95.0,
        visibility: 1.5,
        condition: "thunderstorm with heavy rain".to_string(),
        main: "Thunderstorm".to_string(),
        icon: "11d".to_string(),
        lat: 19.8135,
        lon: 85.8310,
    }
}

// ---------------------------------------------------------------------------
// Benchmark: scoring strategies
// ---------------------------------------------------------------------------

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("storm_risk");
    let observation = stormy();
    let anchor = NaiveDate::from_ymd_opt(2024, 11, 30)
        .and_then(|d| d.and_hms_opt(21, 15, 0))
        .unwrap();

    group.bench_function("additive", |b| {
        b.iter(|| {
            black_box(compute_storm_risk_at(
                black_box(&observation),
                Coast::East,
                ScoringStrategy::Additive,
                anchor,
            ))
        });
    });

    // Includes timeline synthesis
    group.bench_function("coastal_east", |b| {
        b.iter(|| {
            black_box(compute_storm_risk_at(
                black_box(&observation),
                Coast::East,
                ScoringStrategy::CoastCalibrated,
                anchor,
            ))
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: shelter ranking
// ---------------------------------------------------------------------------

fn bench_shelter_ranking(c: &mut Criterion) {
    let (lat, lon) = (13.0827, 80.2707);
    let amenities = ["hospital", "school", "community_centre", "place_of_worship", "townhall"];

    // Spiral of features, some outside the radius, some duplicated
    let elements: Vec<GeoElement> = (0..500)
        .map(|i| {
            let angle = i as f64 * 0.37;
            let reach = 0.0003 * (i % 250) as f64;
            let mut tags = HashMap::new();
            tags.insert("amenity".to_string(), amenities[i % amenities.len()].to_string());
            GeoElement {
                kind: "way".to_string(),
                lat: None,
                lon: None,
                center: Some(GeoCenter { lat: lat + reach * angle.sin(), lon: lon + reach * angle.cos() }),
                tags,
            }
        })
        .collect();

    c.bench_function("rank_shelters_500", |b| {
        b.iter(|| black_box(rank_shelters(black_box(&elements), lat, lon, 10.0)));
    });
}

// ---------------------------------------------------------------------------
// Register groups
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_strategies, bench_shelter_ranking);
criterion_main!(benches);
