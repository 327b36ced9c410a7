use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ProcessingError, Result};
use crate::models::{CombinedObservation, Pm25Reading, StationId, StationRegistry};
use crate::readers::{CombinedReader, ObservationSource, Pm25Reader, RawObservations};
use crate::settings::Settings;

/// Observation source backed by the on-disk PM2.5 feeds and monthly combined files.
///
/// The two sources are read concurrently and the files of each source in parallel. Files are
/// concatenated in a fixed order (feed then year for PM2.5, year then filename for the
/// combined files) so repeated runs produce identical input.
#[derive(Debug, Clone)]
pub struct FileObservationSource {
    aqi_dir: PathBuf,
    pm25_dir: PathBuf,
    feeds: Vec<(String, StationId)>,
    combined_years: RangeInclusive<i32>,
    pm25_years: RangeInclusive<i32>,
    registry: Arc<StationRegistry>,
    max_workers: usize,
    use_mmap: bool,
}

impl FileObservationSource {
    pub fn new(settings: &Settings, registry: Arc<StationRegistry>) -> Self {
        Self {
            aqi_dir: settings.aqi_dir.clone(),
            pm25_dir: settings.pm25_dir.clone(),
            feeds: settings
                .pm25_feeds
                .iter()
                .map(|feed| (feed.city.clone(), StationId::new(feed.station.as_str())))
                .collect(),
            combined_years: settings.start_year..=settings.end_year,
            pm25_years: settings.pm25_years(),
            registry,
            max_workers: num_cpus::get(),
            use_mmap: false,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read both sources on the blocking pool, concurrently.
    pub async fn read_all(&self) -> Result<RawObservations> {
        let pm25_source = self.clone();
        let combined_source = self.clone();

        let pm25_handle = tokio::task::spawn_blocking(move || pm25_source.read_pm25());
        let combined_handle = tokio::task::spawn_blocking(move || combined_source.read_combined());

        let (pm25_readings, combined) = tokio::try_join!(pm25_handle, combined_handle)?;

        Ok(RawObservations {
            pm25_readings: pm25_readings?,
            combined: combined?,
        })
    }

    /// Every expected PM2.5 feed file with the station it is attributed to.
    pub fn pm25_files(&self) -> Vec<(PathBuf, StationId)> {
        self.feeds
            .iter()
            .flat_map(|(city, station)| {
                self.pm25_years.clone().map(move |year| {
                    (Pm25Reader::feed_path(&self.pm25_dir, city, year), station.clone())
                })
            })
            .collect()
    }

    /// Every combined monthly file in the year range; a missing year directory is fatal.
    pub fn combined_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for year in self.combined_years.clone() {
            let year_files = CombinedReader::year_files(&self.aqi_dir, year).map_err(|e| {
                ProcessingError::MissingData(format!(
                    "combined data for {} under {}: {}",
                    year,
                    self.aqi_dir.display(),
                    e
                ))
            })?;
            files.extend(year_files);
        }
        Ok(files)
    }

    fn read_pm25(&self) -> Result<Vec<Pm25Reading>> {
        let files = self.pm25_files();
        if let Some((missing, _)) = files.iter().find(|(path, _)| !path.is_file()) {
            return Err(ProcessingError::MissingData(format!(
                "PM2.5 feed not found: {}",
                missing.display()
            )));
        }

        let reader = Pm25Reader::with_mmap(self.use_mmap);
        let per_file: Vec<Vec<Pm25Reading>> = self.install(|| {
            files
                .par_iter()
                .map(|(path, station)| {
                    debug!(file = %path.display(), station = %station, "Reading PM2.5 feed");
                    reader.read_file(path, station)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let readings: Vec<Pm25Reading> = per_file.into_iter().flatten().collect();
        info!(files = files.len(), rows = readings.len(), "Loaded PM2.5 feeds");
        Ok(readings)
    }

    fn read_combined(&self) -> Result<Vec<CombinedObservation>> {
        let files = self.combined_files()?;

        let reader = CombinedReader::new(&self.registry).with_mmap(self.use_mmap);
        let per_file = self.install(|| {
            files
                .par_iter()
                .map(|path| {
                    debug!(file = %path.display(), "Reading combined file");
                    reader.read_file(path)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let skipped: usize = per_file.iter().map(|f| f.skipped_rows).sum();
        let observations: Vec<CombinedObservation> =
            per_file.into_iter().flat_map(|f| f.observations).collect();

        info!(
            files = files.len(),
            rows = observations.len(),
            skipped,
            "Loaded combined files"
        );
        Ok(observations)
    }

    fn install<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send,
        T: Send,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;
        pool.install(op)
    }

    pub fn aqi_dir(&self) -> &Path {
        &self.aqi_dir
    }

    pub fn pm25_dir(&self) -> &Path {
        &self.pm25_dir
    }
}

impl ObservationSource for FileObservationSource {
    fn load(&self) -> Result<RawObservations> {
        let (pm25_readings, combined) = rayon::join(|| self.read_pm25(), || self.read_combined());

        Ok(RawObservations {
            pm25_readings: pm25_readings?,
            combined: combined?,
        })
    }
}
