use aqi_processor::aqi::{concentration_to_index, index_to_concentration};
use aqi_processor::models::{
    CombinedObservation, Measurement, Pm25Reading, Pollutant, QcStatus, StationId, StationRegistry,
};
use aqi_processor::processors::{
    daily_pm25_series, AqiPipeline, DailyAggregator, DataMerger, GridAligner, IntegrityChecker,
};
use aqi_processor::readers::RawObservations;
use aqi_processor::utils::DateRange;
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

fn station_names(count: usize) -> Vec<StationId> {
    (1..=count)
        .map(|i| StationId::new(format!("DKI{} (Station {})", i, i)))
        .collect()
}

fn registry(count: usize) -> StationRegistry {
    let stations = station_names(count);
    let authority = stations[0].clone();
    StationRegistry::new(stations)
        .with_pm25_authority(authority)
        .expect("first station is monitored")
}

fn range(days: u64) -> DateRange {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    DateRange(start, start + chrono::Days::new(days - 1))
}

// Synthetic raw input: one combined row per station-day, 24 hourly PM2.5 readings per day
fn create_raw_observations(station_count: usize, days: u64) -> RawObservations {
    let mut raw = RawObservations::default();
    let stations = station_names(station_count);

    for (s, station) in stations.iter().enumerate() {
        for (d, date) in range(days).enumerate() {
            let base = 20.0 + (d % 90) as f64 + s as f64;
            raw.combined.push(
                CombinedObservation::new(station.clone(), date.and_hms_opt(0, 0, 0).unwrap())
                    .with_sub_index(Pollutant::Pm10, Measurement::from_f64(base))
                    .with_sub_index(Pollutant::So2, Measurement::from_f64(base / 3.0))
                    .with_sub_index(Pollutant::Co, Measurement::from_f64(base / 2.0))
                    .with_sub_index(Pollutant::O3, Measurement::from_f64(base * 1.2))
                    .with_sub_index(Pollutant::No2, Measurement::from_f64(base / 4.0)),
            );
        }
    }

    for (d, date) in range(days).enumerate() {
        for hour in 0..24 {
            raw.pm25_readings.push(Pm25Reading::new(
                stations[0].clone(),
                date.and_hms_opt(hour, 0, 0).unwrap(),
                Some(5.0 + (d % 60) as f64 + hour as f64),
                if hour % 7 == 0 { QcStatus::Invalid } else { QcStatus::Valid },
            ));
        }
    }

    raw
}

fn benchmark_conversion(c: &mut Criterion) {
    let concentrations: Vec<f64> = (1..=500).map(|v| v as f64 * 1.7).collect();

    c.bench_function("concentration_to_index", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for pollutant in Pollutant::ALL {
                for &value in &concentrations {
                    total += concentration_to_index(pollutant, Measurement::Value(value)).or_zero();
                }
            }
            black_box(total)
        })
    });

    c.bench_function("index_to_concentration", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for pollutant in Pollutant::ALL {
                for index in 1..=350 {
                    total += index_to_concentration(pollutant, Measurement::Value(index as f64))
                        .or_zero();
                }
            }
            black_box(total)
        })
    });
}

fn benchmark_stages(c: &mut Criterion) {
    let registry = registry(5);
    let days = range(365);
    let raw = create_raw_observations(5, 365);

    c.bench_function("pm25_daily_series", |b| {
        b.iter(|| black_box(daily_pm25_series(&raw.pm25_readings).len()))
    });

    c.bench_function("grid_alignment", |b| {
        let aligner = GridAligner::new(&registry, days);
        b.iter(|| black_box(aligner.align(&raw.combined).map(|g| g.len()).unwrap_or(0)))
    });

    let series = daily_pm25_series(&raw.pm25_readings);
    let grid = GridAligner::new(&registry, days)
        .align(&raw.combined)
        .expect("synthetic stations are monitored");

    c.bench_function("merge_and_derive", |b| {
        let merger = DataMerger::new(&registry);
        b.iter(|| black_box(merger.merge(grid.clone(), &series).map(|m| m.len()).unwrap_or(0)))
    });

    let merged = DataMerger::new(&registry)
        .merge(grid.clone(), &series)
        .expect("series belong to the authoritative station");

    c.bench_function("daily_aggregation", |b| {
        let aggregator = DailyAggregator::new();
        b.iter(|| black_box(aggregator.aggregate(&merged).len()))
    });

    let daily = DailyAggregator::new().aggregate(&merged);
    c.bench_function("integrity_checker", |b| {
        let checker = IntegrityChecker::new().with_expected_range(days);
        b.iter(|| black_box(checker.check_integrity(&daily).map(|r| r.total_records).unwrap_or(0)))
    });
}

fn benchmark_varying_data_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_by_station_count");

    for &size in &[1, 5, 20] {
        group.bench_with_input(BenchmarkId::new("stations", size), &size, |b, &station_count| {
            let raw = create_raw_observations(station_count, 365);
            let pipeline = AqiPipeline::new(Arc::new(registry(station_count)), range(365));

            b.iter(|| black_box(pipeline.process(raw.clone(), None).map(|o| o.records.len())))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_conversion,
    benchmark_stages,
    benchmark_varying_data_sizes
);
criterion_main!(benches);
