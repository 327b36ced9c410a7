use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{
    CombinedObservation, ConsolidatedRecord, Measurement, Pollutant, PollutantReading,
    PollutantValues, StationId, StationRegistry,
};
use crate::utils::DateRange;

/// Lays the combined observations onto a complete station × day grid.
///
/// Every monitored station gets exactly one row per calendar day of the range. Days without
/// an observation become explicit missing rows; several observations on the same day are
/// averaged column by column. Stations are aligned in parallel and emitted in station order.
pub struct GridAligner<'a> {
    registry: &'a StationRegistry,
    range: DateRange,
    max_workers: usize,
}

type DayBuckets<'o> = BTreeMap<NaiveDate, Vec<&'o CombinedObservation>>;

impl<'a> GridAligner<'a> {
    pub fn new(registry: &'a StationRegistry, range: DateRange) -> Self {
        Self {
            registry,
            range,
            max_workers: num_cpus::get(),
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn align(&self, observations: &[CombinedObservation]) -> Result<Vec<ConsolidatedRecord>> {
        let mut by_station: BTreeMap<&StationId, DayBuckets<'_>> = BTreeMap::new();
        let mut out_of_range = 0usize;

        for observation in observations {
            if !self.registry.contains(&observation.station) {
                return Err(ProcessingError::UnknownStation(observation.station.to_string()));
            }
            let date = observation.date();
            if !self.range.contains(date) {
                out_of_range += 1;
                continue;
            }
            by_station
                .entry(&observation.station)
                .or_default()
                .entry(date)
                .or_default()
                .push(observation);
        }

        if out_of_range > 0 {
            debug!(out_of_range, "Ignored observations outside the date range");
        }

        let stations: Vec<&StationId> = self.registry.stations().collect();
        let empty = DayBuckets::new();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let per_station: Vec<Vec<ConsolidatedRecord>> = pool.install(|| {
            stations
                .par_iter()
                .map(|station| {
                    let days = by_station.get(station).unwrap_or(&empty);
                    self.align_station(station, days)
                })
                .collect()
        });

        Ok(per_station.into_iter().flatten().collect())
    }

    fn align_station(&self, station: &StationId, days: &DayBuckets<'_>) -> Vec<ConsolidatedRecord> {
        let mut duplicated_days = 0usize;

        let records: Vec<ConsolidatedRecord> = self
            .range
            .map(|date| match days.get(&date) {
                None => ConsolidatedRecord::missing(station.clone(), date),
                Some(day) => {
                    if day.len() > 1 {
                        duplicated_days += 1;
                    }
                    let readings = average_readings(day);
                    let mut record = ConsolidatedRecord::missing(station.clone(), date);
                    record.readings = readings;
                    record
                }
            })
            .collect();

        if duplicated_days > 0 {
            warn!(
                station = %station,
                days = duplicated_days,
                "Averaged duplicate observations for the same day"
            );
        }

        records
    }
}

/// Column-wise mean of one day's observations, in raw-source semantics: the PM2.5 cell is a
/// concentration, the others are sub-indices.
fn average_readings(day: &[&CombinedObservation]) -> PollutantValues<PollutantReading> {
    PollutantValues::from_fn(|pollutant| match pollutant {
        Pollutant::Pm25 => PollutantReading::new(
            Measurement::mean(day.iter().map(|o| o.pm25_concentration)),
            Measurement::Missing,
        ),
        other => PollutantReading::new(
            Measurement::Missing,
            Measurement::mean(day.iter().map(|o| o.sub_indices[other])),
        ),
    })
}
