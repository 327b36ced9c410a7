use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{Measurement, Pm25Reading, Pollutant, StationId, StationSeries};
use crate::utils::round_half_even;

/// Average the usable PM2.5 readings of each station into a daily series.
///
/// Readings that failed QC or are not strictly positive are dropped before averaging. Each
/// daily mean is rounded to a whole µg/m³. Days without a usable reading have no entry, so
/// they read back as missing.
pub fn daily_pm25_series(readings: &[Pm25Reading]) -> BTreeMap<StationId, StationSeries> {
    let mut sums: BTreeMap<(&StationId, chrono::NaiveDate), (f64, usize)> = BTreeMap::new();
    let mut dropped = 0usize;

    for reading in readings {
        match reading.usable_concentration() {
            Some(value) => {
                let entry = sums.entry((&reading.station, reading.date())).or_default();
                entry.0 += value;
                entry.1 += 1;
            }
            None => dropped += 1,
        }
    }

    let mut series: BTreeMap<StationId, StationSeries> = BTreeMap::new();
    for ((station, date), (sum, count)) in sums {
        let mean = round_half_even(sum / count as f64);
        series
            .entry(station.clone())
            .or_insert_with(|| StationSeries::new(station.clone(), Pollutant::Pm25))
            .values
            .insert(date, Measurement::from_f64(mean));
    }

    debug!(
        readings = readings.len(),
        dropped,
        stations = series.len(),
        "Averaged PM2.5 readings into daily series"
    );

    series
}
