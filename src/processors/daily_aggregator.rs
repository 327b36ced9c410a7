use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::aqi::HealthCategory;
use crate::models::{
    ConsolidatedRecord, DailyAqiRecord, Measurement, Pollutant, PollutantReading, PollutantValues,
    StationId,
};
use crate::utils::round_half_even;

/// Collapses consolidated rows into one finalized row per station and calendar day.
///
/// Every numeric column is averaged over the day, skipping missing values. The composite index
/// is the largest sub-index and the dominant pollutant the first one (in column order) to reach
/// it. All numeric cells are then rounded to integers; a missing composite counts as zero and
/// yields the "no data" category. Output is sorted by station, then date.
#[derive(Debug, Default)]
pub struct DailyAggregator;

impl DailyAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, records: &[ConsolidatedRecord]) -> Vec<DailyAqiRecord> {
        let mut groups: BTreeMap<(&StationId, NaiveDate), Vec<&ConsolidatedRecord>> =
            BTreeMap::new();
        for record in records {
            groups
                .entry((&record.station, record.date()))
                .or_default()
                .push(record);
        }

        let daily: Vec<DailyAqiRecord> = groups
            .into_iter()
            .map(|((station, date), day)| finalize(station.clone(), date, &day))
            .collect();

        debug!(input = records.len(), output = daily.len(), "Aggregated daily rows");
        daily
    }
}

fn finalize(station: StationId, date: NaiveDate, day: &[&ConsolidatedRecord]) -> DailyAqiRecord {
    let means = PollutantValues::from_fn(|pollutant| {
        PollutantReading::new(
            Measurement::mean(day.iter().map(|r| r.readings[pollutant].concentration)),
            Measurement::mean(day.iter().map(|r| r.readings[pollutant].index)),
        )
    });

    let (dominant, peak) = dominant_pollutant(&means);
    let composite_index = round_half_even(peak) as u32;
    let category = HealthCategory::from_composite(composite_index);

    DailyAqiRecord {
        date,
        station,
        readings: means.map(|_, r| PollutantReading::new(round_cell(r.concentration), round_cell(r.index))),
        composite_index,
        dominant: dominant.filter(|_| peak > 0.0),
        category,
    }
}

/// First pollutant, in column order, whose sub-index equals the row maximum.
fn dominant_pollutant(readings: &PollutantValues<PollutantReading>) -> (Option<Pollutant>, f64) {
    readings
        .iter()
        .filter_map(|(pollutant, r)| r.index.value().map(|v| (pollutant, v)))
        .fold((None, 0.0), |(best, peak), (pollutant, value)| {
            if best.is_none() || value > peak {
                (Some(pollutant), value)
            } else {
                (best, peak)
            }
        })
}

fn round_cell(value: Measurement) -> Measurement {
    value.map_positive(round_half_even)
}
