pub mod csv_writer;
pub mod parquet_writer;

pub use csv_writer::CsvWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

use std::path::Path;

use crate::error::Result;
use crate::models::DailyAqiRecord;

/// Destination for the finalized daily table.
///
/// Implementations either produce the complete artifact at `path` or leave nothing behind.
pub trait DailyTableSink {
    fn write_table(&self, records: &[DailyAqiRecord], path: &Path) -> Result<()>;
}
