use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::models::{DailyAqiRecord, StationRegistry};
use crate::processors::{
    daily_pm25_series, DailyAggregator, DataMerger, GridAligner, IntegrityChecker, IntegrityReport,
};
use crate::readers::{FileObservationSource, ObservationSource, RawObservations};
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::utils::DateRange;

/// Finalized daily table plus the integrity report computed over it.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<DailyAqiRecord>,
    pub report: IntegrityReport,
}

/// Runs load → align → merge → convert → aggregate → categorize, one stage after another.
pub struct AqiPipeline {
    registry: Arc<StationRegistry>,
    range: DateRange,
    max_workers: usize,
    strict_validation: bool,
}

impl AqiPipeline {
    pub fn new(registry: Arc<StationRegistry>, range: DateRange) -> Self {
        Self {
            registry,
            range,
            max_workers: num_cpus::get(),
            strict_validation: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let (start, end) = settings.date_bounds()?;
        Ok(Self::new(Arc::new(settings.registry()?), DateRange(start, end)))
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_strict_validation(mut self, strict_validation: bool) -> Self {
        self.strict_validation = strict_validation;
        self
    }

    pub fn registry(&self) -> Arc<StationRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Load from any observation source and process synchronously.
    pub fn run<S: ObservationSource>(
        &self,
        source: &S,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineOutput> {
        if let Some(p) = progress {
            p.set_message("Reading observations...");
        }
        let raw = source.load()?;
        self.process(raw, progress)
    }

    /// Load the on-disk sources concurrently, then process.
    pub async fn run_files(
        &self,
        source: &FileObservationSource,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineOutput> {
        if let Some(p) = progress {
            p.set_message("Reading PM2.5 feeds and combined files...");
        }
        let raw = source.read_all().await?;
        self.process(raw, progress)
    }

    pub fn process(
        &self,
        raw: RawObservations,
        progress: Option<&ProgressReporter>,
    ) -> Result<PipelineOutput> {
        info!(
            pm25_rows = raw.pm25_readings.len(),
            combined_rows = raw.combined.len(),
            "Loaded raw observations"
        );

        let pm25_series = daily_pm25_series(&raw.pm25_readings);

        if let Some(p) = progress {
            p.set_message("Aligning station grid...");
        }
        let grid = GridAligner::new(&self.registry, self.range)
            .with_max_workers(self.max_workers)
            .align(&raw.combined)?;
        info!(
            stations = self.registry.len(),
            days = self.range.day_count(),
            rows = grid.len(),
            "Aligned observations to the station grid"
        );

        if let Some(p) = progress {
            p.set_message("Merging PM2.5 and deriving companion columns...");
        }
        let merged = DataMerger::new(&self.registry).merge(grid, &pm25_series)?;

        if let Some(p) = progress {
            p.set_message("Aggregating daily index...");
        }
        let records = DailyAggregator::new().aggregate(&merged);
        info!(rows = records.len(), "Aggregated daily index");

        if let Some(p) = progress {
            p.set_message("Checking data integrity...");
        }
        let report = IntegrityChecker::with_strict_mode(self.strict_validation)
            .with_expected_range(self.range)
            .check_integrity(&records)?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Processed {} station-days", records.len()));
        }

        Ok(PipelineOutput { records, report })
    }
}
