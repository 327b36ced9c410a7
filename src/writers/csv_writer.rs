use csv::WriterBuilder;
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::aqi::LabelLanguage;
use crate::error::Result;
use crate::models::{DailyAqiRecord, Measurement, Pollutant};
use crate::utils::constants::{
    COL_CATEGORY, COL_COMPOSITE, COL_CRITICAL, COL_DATE, COL_STATION, DEFAULT_NO_DATA_MARKER,
};
use crate::writers::DailyTableSink;

/// Writes the published daily table as CSV.
///
/// Zero and missing numeric cells are rendered with the no-data marker. The file is staged
/// next to the destination and renamed into place once complete.
pub struct CsvWriter {
    no_data_marker: String,
    language: LabelLanguage,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self {
            no_data_marker: DEFAULT_NO_DATA_MARKER.to_string(),
            language: LabelLanguage::default(),
        }
    }

    pub fn with_no_data_marker(mut self, marker: &str) -> Self {
        self.no_data_marker = marker.to_string();
        self
    }

    pub fn with_language(mut self, language: LabelLanguage) -> Self {
        self.language = language;
        self
    }

    /// Column names in output order; each concentration column precedes its index column.
    pub fn header() -> Vec<String> {
        let mut header = vec![COL_DATE.to_string(), COL_STATION.to_string()];
        for pollutant in Pollutant::ALL {
            header.push(pollutant.concentration_column());
            header.push(pollutant.index_column().to_string());
        }
        header.extend([COL_COMPOSITE, COL_CRITICAL, COL_CATEGORY].map(String::from));
        header
    }

    pub fn render_row(&self, record: &DailyAqiRecord) -> Vec<String> {
        let mut row = vec![
            record.date.format("%Y-%m-%d").to_string(),
            record.station.to_string(),
        ];
        for pollutant in Pollutant::ALL {
            let reading = record.reading(pollutant);
            row.push(self.render_cell(reading.concentration));
            row.push(self.render_cell(reading.index));
        }

        row.push(if record.composite_index == 0 {
            self.no_data_marker.clone()
        } else {
            record.composite_index.to_string()
        });
        row.push(
            record
                .dominant
                .map(|p| p.critical_label().to_string())
                .unwrap_or_else(|| self.no_data_marker.clone()),
        );
        row.push(record.category.label(self.language).to_string());
        row
    }

    fn render_cell(&self, value: Measurement) -> String {
        match value {
            Measurement::Value(v) => format!("{}", v.round() as i64),
            Measurement::Zero | Measurement::Missing => self.no_data_marker.clone(),
        }
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DailyTableSink for CsvWriter {
    fn write_table(&self, records: &[DailyAqiRecord], path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let staged = NamedTempFile::new_in(dir)?;
        {
            let mut writer = WriterBuilder::new().from_writer(staged.as_file());
            writer.write_record(Self::header())?;
            for record in records {
                writer.write_record(self.render_row(record))?;
            }
            writer.flush()?;
        }
        staged.persist(path).map_err(|e| e.error)?;

        info!(rows = records.len(), path = %path.display(), "Wrote CSV table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::HealthCategory;
    use crate::models::{PollutantReading, PollutantValues, StationId};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record() -> DailyAqiRecord {
        let mut readings = PollutantValues::<PollutantReading>::default();
        readings[Pollutant::Pm10] =
            PollutantReading::new(Measurement::Value(100.0), Measurement::Value(75.0));
        readings[Pollutant::So2] = PollutantReading::new(Measurement::Zero, Measurement::Zero);

        DailyAqiRecord {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            station: StationId::from("DKI2 (Kelapa Gading)"),
            readings,
            composite_index: 75,
            dominant: Some(Pollutant::Pm10),
            category: HealthCategory::Moderate,
        }
    }

    #[test]
    fn test_header_interleaves_concentration_and_index() {
        let header = CsvWriter::header();
        assert_eq!(header.len(), 17);
        assert_eq!(
            &header[..6],
            &["tanggal", "stasiun", "pm25(ug/m3)", "pm25", "pm10(ug/m3)", "pm10"]
        );
        assert_eq!(&header[14..], &["max", "critical", "categori"]);
    }

    #[test]
    fn test_render_row_uses_marker_for_zero_and_missing() {
        let row = CsvWriter::new().render_row(&record());
        assert_eq!(
            row,
            vec![
                "2020-01-01", "DKI2 (Kelapa Gading)", "---", "---", "100", "75", "---", "---",
                "---", "---", "---", "---", "---", "---", "75", "PM10", "SEDANG",
            ]
        );

        let english = CsvWriter::new()
            .with_language(LabelLanguage::English)
            .with_no_data_marker("NA")
            .render_row(&record());
        assert_eq!(english[2], "NA");
        assert_eq!(english[16], "MODERATE");
    }

    #[test]
    fn test_write_table_replaces_destination() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("out").join("combined.csv");

        CsvWriter::new().write_table(&[record()], &path)?;
        let text = fs::read_to_string(&path)?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("tanggal,stasiun,pm25(ug/m3),pm25"));
        assert!(lines[1].ends_with(",75,PM10,SEDANG"));

        let leftovers = fs::read_dir(path.parent().unwrap())?.count();
        assert_eq!(leftovers, 1);
        Ok(())
    }
}
