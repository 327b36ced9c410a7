use csv::{ReaderBuilder, Trim};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{ProcessingError, Result};
use crate::models::{CombinedObservation, Measurement, Pollutant, StationRegistry};
use crate::readers::pm25_reader::column_index;
use crate::readers::text_decoder::read_text;
use crate::utils::constants::{COL_DATE, COL_STATION};
use crate::utils::parse_day_first;

/// Reader for the monthly combined files (`tanggal`, `stasiun`, one column per pollutant).
///
/// PM2.5 is a concentration in these files; the other five pollutant columns are sub-indices.
/// Non-numeric cells such as `---` are read as missing values.
pub struct CombinedReader<'a> {
    registry: &'a StationRegistry,
    use_mmap: bool,
}

#[derive(Debug, Default)]
pub struct CombinedFile {
    pub observations: Vec<CombinedObservation>,
    pub skipped_rows: usize,
}

impl<'a> CombinedReader<'a> {
    pub fn new(registry: &'a StationRegistry) -> Self {
        Self {
            registry,
            use_mmap: false,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Monthly files of one year directory, in filename order.
    pub fn year_files(dir: &Path, year: i32) -> Result<Vec<PathBuf>> {
        let year_dir = dir.join(year.to_string());
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&year_dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn read_file(&self, path: &Path) -> Result<CombinedFile> {
        let text = read_text(path, self.use_mmap)?;
        self.parse(&text, &path.display().to_string())
    }

    fn parse(&self, text: &str, source_name: &str) -> Result<CombinedFile> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let date_col = column_index(&headers, COL_DATE, source_name)?;
        let station_col = column_index(&headers, COL_STATION, source_name)?;
        let pollutant_cols = Pollutant::ALL
            .iter()
            .map(|p| column_index(&headers, p.key(), source_name).map(|col| (*p, col)))
            .collect::<Result<Vec<_>>>()?;

        let mut file = CombinedFile::default();
        for row in reader.records() {
            let row = row?;
            let date_str = row.get(date_col).unwrap_or("");
            let station_str = row.get(station_col).unwrap_or("");
            if date_str.is_empty() && station_str.is_empty() {
                continue;
            }

            let Some(station) = self.registry.resolve(station_str) else {
                file.skipped_rows += 1;
                continue;
            };

            let timestamp = parse_day_first(date_str).map_err(|e| {
                ProcessingError::InvalidFormat(format!("{} in {}", e, source_name))
            })?;

            let mut observation = CombinedObservation::new(station, timestamp);
            for (pollutant, col) in &pollutant_cols {
                let value = Measurement::from_option(
                    row.get(*col).and_then(|v| v.parse::<f64>().ok()),
                );
                observation = match pollutant {
                    Pollutant::Pm25 => observation.with_pm25_concentration(value),
                    other => observation.with_sub_index(*other, value),
                };
            }
            file.observations.push(observation);
        }

        if file.skipped_rows > 0 {
            warn!(
                source = source_name,
                skipped = file.skipped_rows,
                "Skipped rows for stations outside the monitored set"
            );
        }

        Ok(file)
    }
}
