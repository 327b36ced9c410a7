use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::{Measurement, Pollutant, PollutantValues, StationId};

/// Concentration and sub-index of one pollutant. The concentration column always precedes
/// the index column in the output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PollutantReading {
    pub concentration: Measurement,
    pub index: Measurement,
}

impl PollutantReading {
    pub fn new(concentration: Measurement, index: Measurement) -> Self {
        Self {
            concentration,
            index,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

/// A station row of the consolidated table, before daily aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    pub station: StationId,
    pub timestamp: NaiveDateTime,
    pub readings: PollutantValues<PollutantReading>,
}

impl ConsolidatedRecord {
    pub fn new(
        station: StationId,
        timestamp: NaiveDateTime,
        readings: PollutantValues<PollutantReading>,
    ) -> Self {
        Self {
            station,
            timestamp,
            readings,
        }
    }

    /// Placeholder row for a date on which the station reported nothing.
    pub fn missing(station: StationId, date: NaiveDate) -> Self {
        Self::new(station, date.and_time(chrono::NaiveTime::MIN), PollutantValues::default())
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn reading(&self, pollutant: Pollutant) -> &PollutantReading {
        &self.readings[pollutant]
    }

    pub fn has_any_reading(&self) -> bool {
        self.readings
            .iter()
            .any(|(_, r)| !r.concentration.is_missing() || !r.index.is_missing())
    }
}

pub struct ConsolidatedRecordBuilder {
    station: Option<StationId>,
    timestamp: Option<NaiveDateTime>,
    readings: PollutantValues<PollutantReading>,
}

impl Default for ConsolidatedRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsolidatedRecordBuilder {
    pub fn new() -> Self {
        Self {
            station: None,
            timestamp: None,
            readings: PollutantValues::default(),
        }
    }

    pub fn station(mut self, station: StationId) -> Self {
        self.station = Some(station);
        self
    }

    pub fn timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn date(self, date: NaiveDate) -> Self {
        self.timestamp(date.and_time(chrono::NaiveTime::MIN))
    }

    pub fn concentration(mut self, pollutant: Pollutant, value: impl Into<Measurement>) -> Self {
        self.readings[pollutant].concentration = value.into();
        self
    }

    pub fn index(mut self, pollutant: Pollutant, value: impl Into<Measurement>) -> Self {
        self.readings[pollutant].index = value.into();
        self
    }

    pub fn build(self) -> Result<ConsolidatedRecord> {
        Ok(ConsolidatedRecord::new(
            self.station
                .ok_or_else(|| ProcessingError::MissingData("station".to_string()))?,
            self.timestamp
                .ok_or_else(|| ProcessingError::MissingData("timestamp".to_string()))?,
            self.readings,
        ))
    }
}
