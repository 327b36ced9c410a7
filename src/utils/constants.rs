/// Default processing range
pub const DEFAULT_START_YEAR: i32 = 2010;
pub const DEFAULT_END_YEAR: i32 = 2021;
pub const DEFAULT_PM25_FIRST_YEAR: i32 = 2015;

/// Directory names
pub const DEFAULT_AQI_DIR: &str = "Air Quality Data";
pub const DEFAULT_PM25_DIR: &str = "Air Quality Data/pm2,5";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Environment variable prefix for settings overrides (`AQI__START_YEAR=2015`)
pub const ENV_PREFIX: &str = "AQI";

/// Published marker for zero or absent numeric cells
pub const DEFAULT_NO_DATA_MARKER: &str = "---";

/// Combined source columns
pub const COL_DATE: &str = "tanggal";
pub const COL_STATION: &str = "stasiun";
pub const COL_COMPOSITE: &str = "max";
pub const COL_CRITICAL: &str = "critical";
pub const COL_CATEGORY: &str = "categori";

/// PM2.5 feed columns
pub const PM25_COL_DATE: &str = "Date (LT)";
pub const PM25_COL_RAW_CONC: &str = "Raw Conc.";
pub const PM25_COL_QC: &str = "QC Name";

/// Parquet row group size
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
