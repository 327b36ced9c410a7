use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Measurement, Pollutant, PollutantValues, StationId};

/// Quality-control verdict attached to every row of the dedicated PM2.5 source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QcStatus {
    Valid,
    Suspect,
    Invalid,
    Missing,
    Unrecognised,
}

impl QcStatus {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "valid" => QcStatus::Valid,
            "suspect" => QcStatus::Suspect,
            "invalid" => QcStatus::Invalid,
            "missing" | "" => QcStatus::Missing,
            _ => QcStatus::Unrecognised,
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, QcStatus::Valid)
    }
}

/// One (usually hourly) row of the dedicated PM2.5 source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pm25Reading {
    pub station: StationId,
    pub timestamp: NaiveDateTime,
    pub raw_concentration: Option<f64>,
    pub qc: QcStatus,
}

impl Pm25Reading {
    pub fn new(
        station: StationId,
        timestamp: NaiveDateTime,
        raw_concentration: Option<f64>,
        qc: QcStatus,
    ) -> Self {
        Self {
            station,
            timestamp,
            raw_concentration,
            qc,
        }
    }

    /// Concentration that may take part in the daily average: QC-valid and strictly positive.
    pub fn usable_concentration(&self) -> Option<f64> {
        if !self.qc.is_usable() {
            return None;
        }
        self.raw_concentration.filter(|c| c.is_finite() && *c > 0.0)
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// One row of the combined source.
///
/// The PM2.5 column of this source is a concentration; the other five columns are already
/// sub-indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedObservation {
    pub station: StationId,
    pub timestamp: NaiveDateTime,
    pub pm25_concentration: Measurement,
    pub sub_indices: PollutantValues<Measurement>,
}

impl CombinedObservation {
    pub fn new(station: StationId, timestamp: NaiveDateTime) -> Self {
        Self {
            station,
            timestamp,
            pm25_concentration: Measurement::Missing,
            sub_indices: PollutantValues::default(),
        }
    }

    pub fn with_pm25_concentration(mut self, value: Measurement) -> Self {
        self.pm25_concentration = value;
        self
    }

    pub fn with_sub_index(mut self, pollutant: Pollutant, value: Measurement) -> Self {
        self.sub_indices[pollutant] = value;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Daily series of one pollutant at one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSeries {
    pub station: StationId,
    pub pollutant: Pollutant,
    pub values: BTreeMap<NaiveDate, Measurement>,
}

impl StationSeries {
    pub fn new(station: StationId, pollutant: Pollutant) -> Self {
        Self {
            station,
            pollutant,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, date: NaiveDate) -> Measurement {
        self.values.get(&date).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
