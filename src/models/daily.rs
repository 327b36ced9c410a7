use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aqi::HealthCategory;
use crate::models::{PollutantReading, Pollutant, PollutantValues, StationId};

/// Finalized row of the published daily table.
///
/// Readings are rounded to whole numbers but keep the distinction between a measured zero
/// and a missing value; the display marker is applied by the writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAqiRecord {
    pub date: NaiveDate,
    pub station: StationId,
    pub readings: PollutantValues<PollutantReading>,
    pub composite_index: u32,
    pub dominant: Option<Pollutant>,
    pub category: HealthCategory,
}

impl DailyAqiRecord {
    pub fn reading(&self, pollutant: Pollutant) -> &PollutantReading {
        &self.readings[pollutant]
    }

    pub fn has_data(&self) -> bool {
        self.category.has_data()
    }

    pub fn is_hazardous(&self) -> bool {
        self.category == HealthCategory::Hazardous
    }
}
