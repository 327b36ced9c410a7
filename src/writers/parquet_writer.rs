use arrow::array::{ArrayRef, Date32Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::info;

use crate::aqi::LabelLanguage;
use crate::error::{ProcessingError, Result};
use crate::models::{DailyAqiRecord, Measurement, Pollutant};
use crate::utils::constants::{
    COL_CATEGORY, COL_COMPOSITE, COL_CRITICAL, COL_DATE, COL_STATION, COMPRESSION_GZIP,
    COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use crate::writers::DailyTableSink;

/// Writes the daily table as Parquet with typed columns.
///
/// Numeric cells that the CSV table renders with the no-data marker are stored as nulls, as is
/// the critical pollutant of a day without data.
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
    language: LabelLanguage,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            language: LabelLanguage::default(),
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    pub fn with_language(mut self, language: LabelLanguage) -> Self {
        self.language = language;
        self
    }

    fn create_schema(&self) -> Arc<Schema> {
        let mut fields = vec![
            Field::new(COL_DATE, DataType::Date32, false),
            Field::new(COL_STATION, DataType::Utf8, false),
        ];
        for pollutant in Pollutant::ALL {
            fields.push(Field::new(pollutant.concentration_column(), DataType::UInt32, true));
            fields.push(Field::new(pollutant.index_column(), DataType::UInt32, true));
        }
        fields.push(Field::new(COL_COMPOSITE, DataType::UInt32, true));
        fields.push(Field::new(COL_CRITICAL, DataType::Utf8, true));
        fields.push(Field::new(COL_CATEGORY, DataType::Utf8, false));

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(
        &self,
        records: &[DailyAqiRecord],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .ok_or_else(|| ProcessingError::InvalidFormat("Unix epoch".to_string()))?;

        let dates: Date32Array = records
            .iter()
            .map(|r| Some((r.date - epoch).num_days() as i32))
            .collect();
        let stations: StringArray = records.iter().map(|r| Some(r.station.as_str())).collect();

        let mut columns: Vec<ArrayRef> = vec![Arc::new(dates), Arc::new(stations)];
        for pollutant in Pollutant::ALL {
            let concentrations: UInt32Array = records
                .iter()
                .map(|r| cell(r.reading(pollutant).concentration))
                .collect();
            let indices: UInt32Array = records
                .iter()
                .map(|r| cell(r.reading(pollutant).index))
                .collect();
            columns.push(Arc::new(concentrations));
            columns.push(Arc::new(indices));
        }

        let composite: UInt32Array = records
            .iter()
            .map(|r| (r.composite_index > 0).then_some(r.composite_index))
            .collect();
        let critical: StringArray = records
            .iter()
            .map(|r| r.dominant.map(|p| p.critical_label()))
            .collect();
        let categories: StringArray = records
            .iter()
            .map(|r| Some(r.category.label(self.language)))
            .collect();
        columns.push(Arc::new(composite));
        columns.push(Arc::new(critical));
        columns.push(Arc::new(categories));

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Row count and row-group layout of a written file.
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let reader = SerializedFileReader::new(fs::File::open(path)?)?;
        let metadata = reader.metadata();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups: metadata.num_row_groups(),
            file_size: fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

fn cell(value: Measurement) -> Option<u32> {
    match value {
        Measurement::Value(v) => Some(v.round() as u32),
        Measurement::Zero | Measurement::Missing => None,
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DailyTableSink for ParquetWriter {
    fn write_table(&self, records: &[DailyAqiRecord], path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let schema = self.create_schema();
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let staged = NamedTempFile::new_in(dir)?;
        let mut writer = ArrowWriter::try_new(staged.reopen()?, schema.clone(), Some(props))?;
        for chunk in records.chunks(self.row_group_size) {
            writer.write(&self.records_to_batch(chunk, schema.clone())?)?;
        }
        writer.close()?;
        staged.persist(path).map_err(|e| e.error)?;

        info!(rows = records.len(), path = %path.display(), "Wrote Parquet table");
        Ok(())
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub file_size: u64,
    pub compression: Compression,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::HealthCategory;
    use crate::models::{PollutantReading, PollutantValues, StationId};
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    fn records() -> Vec<DailyAqiRecord> {
        let mut readings = PollutantValues::<PollutantReading>::default();
        readings[Pollutant::Pm25] =
            PollutantReading::new(Measurement::Value(10.0), Measurement::Value(32.0));

        vec![
            DailyAqiRecord {
                date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                station: StationId::from("DKI1 (Bunderan HI)"),
                readings,
                composite_index: 32,
                dominant: Some(Pollutant::Pm25),
                category: HealthCategory::Good,
            },
            DailyAqiRecord {
                date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
                station: StationId::from("DKI1 (Bunderan HI)"),
                readings: PollutantValues::default(),
                composite_index: 0,
                dominant: None,
                category: HealthCategory::NoData,
            },
        ]
    }

    #[test]
    fn test_unsupported_compression() {
        assert!(ParquetWriter::new().with_compression("brotli-ish").is_err());
        assert!(ParquetWriter::new().with_compression("ZSTD").is_ok());
    }

    #[test]
    fn test_write_and_read_back() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("daily.parquet");
        let writer = ParquetWriter::new().with_row_group_size(1);

        writer.write_table(&records(), &path)?;

        let info = writer.get_file_info(&path)?;
        assert_eq!(info.total_rows, 2);
        assert_eq!(info.row_groups, 2);

        let mut reader = ParquetRecordBatchReaderBuilder::try_new(fs::File::open(&path)?)?.build()?;
        let batch = reader
            .next()
            .ok_or_else(|| ProcessingError::MissingData("batch".to_string()))??;
        assert_eq!(batch.num_columns(), 17);

        let pm25_index = batch
            .column(3)
            .as_any()
            .downcast_ref::<UInt32Array>()
            .ok_or_else(|| ProcessingError::InvalidFormat("pm25 column type".to_string()))?;
        assert_eq!(pm25_index.value(0), 32);

        let categories = batch
            .column(16)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| ProcessingError::InvalidFormat("categori column type".to_string()))?;
        assert_eq!(categories.value(0), "BAIK");
        Ok(())
    }

    #[test]
    fn test_marker_cells_are_null() -> Result<()> {
        let writer = ParquetWriter::new();
        let batch = writer.records_to_batch(&records(), writer.create_schema())?;

        let composite = batch
            .column(14)
            .as_any()
            .downcast_ref::<UInt32Array>()
            .ok_or_else(|| ProcessingError::InvalidFormat("max column type".to_string()))?;
        assert!(composite.is_valid(0));
        assert!(composite.is_null(1));
        assert!(batch.column(15).is_null(1));
        Ok(())
    }
}
