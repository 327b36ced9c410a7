use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::aqi::{concentration_to_index, index_to_concentration};
use crate::error::{ProcessingError, Result};
use crate::models::{ConsolidatedRecord, Measurement, Pollutant, StationId, StationRegistry, StationSeries};

/// Merges the dedicated PM2.5 series into the aligned grid and fills in the derived columns.
pub struct DataMerger<'a> {
    registry: &'a StationRegistry,
}

impl<'a> DataMerger<'a> {
    pub fn new(registry: &'a StationRegistry) -> Self {
        Self { registry }
    }

    /// Overwrite PM2.5 from the dedicated series, then derive every companion column.
    pub fn merge(
        &self,
        mut grid: Vec<ConsolidatedRecord>,
        pm25_series: &BTreeMap<StationId, StationSeries>,
    ) -> Result<Vec<ConsolidatedRecord>> {
        self.overwrite_pm25(&mut grid, pm25_series)?;
        self.derive_companions(&mut grid);
        Ok(grid)
    }

    /// For an authoritative station, a dedicated reading (matched by station and day) replaces
    /// the combined-source PM2.5 concentration; days without one keep the combined value.
    /// Every other station reports PM2.5 as missing, whatever the combined source held.
    pub fn overwrite_pm25(
        &self,
        grid: &mut [ConsolidatedRecord],
        pm25_series: &BTreeMap<StationId, StationSeries>,
    ) -> Result<()> {
        for station in pm25_series.keys() {
            if !self.registry.is_pm25_authoritative(station) {
                return Err(ProcessingError::DataMerge(format!(
                    "PM2.5 series supplied for '{}', which is not a PM2.5 source station",
                    station
                )));
            }
        }

        let mut overwritten = 0usize;
        for record in grid.iter_mut() {
            if !self.registry.is_pm25_authoritative(&record.station) {
                record.readings[Pollutant::Pm25].concentration = Measurement::Missing;
                continue;
            }

            let dedicated = pm25_series
                .get(&record.station)
                .map(|series| series.get(record.date()))
                .unwrap_or_default();
            if !dedicated.is_missing() {
                record.readings[Pollutant::Pm25].concentration = dedicated;
                overwritten += 1;
            }
        }

        for station in self.registry.pm25_authoritative() {
            if !pm25_series.contains_key(station) {
                warn!(station = %station, "No PM2.5 series for authoritative station");
            }
        }

        debug!(overwritten, "Merged dedicated PM2.5 concentrations");
        Ok(())
    }

    /// Forward conversion for PM2.5 (concentration → index); reverse conversion for the other
    /// pollutants, whose raw value is already the index.
    pub fn derive_companions(&self, grid: &mut [ConsolidatedRecord]) {
        for record in grid.iter_mut() {
            let pm25 = &mut record.readings[Pollutant::Pm25];
            pm25.index = concentration_to_index(Pollutant::Pm25, pm25.concentration);

            for pollutant in Pollutant::INDEX_REPORTED {
                let reading = &mut record.readings[pollutant];
                reading.concentration = index_to_concentration(pollutant, reading.index);
            }
        }
    }
}
