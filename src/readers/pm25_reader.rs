use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};
use crate::models::{Pm25Reading, QcStatus, StationId};
use crate::readers::text_decoder::read_text;
use crate::utils::constants::{PM25_COL_DATE, PM25_COL_QC, PM25_COL_RAW_CONC};
use crate::utils::parse_day_first;

/// Reader for the dedicated hourly PM2.5 feeds (`Date (LT)`, `Raw Conc.`, `QC Name`).
pub struct Pm25Reader {
    use_mmap: bool,
}

impl Pm25Reader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Feed file for a city and year, e.g. `JakartaCentral_PM2.5_2020_YTD.csv`.
    pub fn feed_path(dir: &Path, city: &str, year: i32) -> PathBuf {
        dir.join(format!("Jakarta{}_PM2.5_{}_YTD.csv", capitalize(city), year))
    }

    /// Read every row of a feed file, attributing it to `station`.
    pub fn read_file(&self, path: &Path, station: &StationId) -> Result<Vec<Pm25Reading>> {
        let text = read_text(path, self.use_mmap)?;
        self.parse(&text, station, &path.display().to_string())
    }

    fn parse(&self, text: &str, station: &StationId, source_name: &str) -> Result<Vec<Pm25Reading>> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let date_col = column_index(&headers, PM25_COL_DATE, source_name)?;
        let conc_col = column_index(&headers, PM25_COL_RAW_CONC, source_name)?;
        let qc_col = column_index(&headers, PM25_COL_QC, source_name)?;

        let mut readings = Vec::new();
        for row in reader.records() {
            let row = row?;
            let date_str = row.get(date_col).unwrap_or("");
            if date_str.is_empty() {
                continue;
            }

            let timestamp = parse_day_first(date_str).map_err(|e| {
                ProcessingError::InvalidFormat(format!("{} in {}", e, source_name))
            })?;
            let raw_concentration = row.get(conc_col).and_then(|v| v.parse::<f64>().ok());
            let qc = QcStatus::parse(row.get(qc_col).unwrap_or(""));

            readings.push(Pm25Reading::new(
                station.clone(),
                timestamp,
                raw_concentration,
                qc,
            ));
        }

        Ok(readings)
    }
}

impl Default for Pm25Reader {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn column_index(headers: &StringRecord, column: &str, source_name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| ProcessingError::MissingColumn {
            source_name: source_name.to_string(),
            column: column.to_string(),
        })
}

fn capitalize(word: &str) -> String {
    let lower = word.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
