use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

use crate::aqi::LabelLanguage;
use crate::error::{ProcessingError, Result};
use crate::models::{StationId, StationRegistry};
use crate::utils::constants::{
    DEFAULT_AQI_DIR, DEFAULT_END_YEAR, DEFAULT_NO_DATA_MARKER, DEFAULT_PM25_DIR,
    DEFAULT_PM25_FIRST_YEAR, DEFAULT_START_YEAR, ENV_PREFIX,
};

/// A dedicated PM2.5 feed and the station it is authoritative for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Pm25Feed {
    /// City part of the feed file name, e.g. `Central` in `JakartaCentral_PM2.5_2020_YTD.csv`.
    #[validate(length(min = 1))]
    pub city: String,

    #[validate(length(min = 1))]
    pub station: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationAlias {
    #[validate(length(min = 1))]
    pub raw: String,

    #[validate(length(min = 1))]
    pub canonical: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_cross_fields"))]
pub struct Settings {
    #[validate(range(min = 1900, max = 2100))]
    pub start_year: i32,

    #[validate(range(min = 1900, max = 2100))]
    pub end_year: i32,

    /// First year covered by the dedicated PM2.5 feeds.
    #[validate(range(min = 1900, max = 2100))]
    pub pm25_first_year: i32,

    #[validate(length(min = 1))]
    pub stations: Vec<String>,

    #[validate(nested)]
    pub pm25_feeds: Vec<Pm25Feed>,

    #[validate(nested)]
    pub station_aliases: Vec<StationAlias>,

    pub aqi_dir: PathBuf,
    pub pm25_dir: PathBuf,

    #[validate(length(min = 1))]
    pub no_data_marker: String,

    pub label_language: LabelLanguage,
}

fn validate_cross_fields(settings: &Settings) -> std::result::Result<(), ValidationError> {
    if settings.start_year > settings.end_year {
        return Err(ValidationError::new("start_year_after_end_year"));
    }

    let unknown_feed = settings
        .pm25_feeds
        .iter()
        .any(|feed| !settings.stations.iter().any(|s| s.trim() == feed.station.trim()));
    if unknown_feed {
        return Err(ValidationError::new("pm25_feed_for_unmonitored_station"));
    }

    Ok(())
}

impl Default for Settings {
    fn default() -> Self {
        let stations = [
            "DKI1 (Bunderan HI)",
            "DKI2 (Kelapa Gading)",
            "DKI3 (Jagakarsa)",
            "DKI4 (Lubang Buaya)",
            "DKI5 (Kebon Jeruk)",
        ];

        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            pm25_first_year: DEFAULT_PM25_FIRST_YEAR,
            stations: stations.iter().map(|s| s.to_string()).collect(),
            pm25_feeds: vec![
                Pm25Feed {
                    city: "Central".to_string(),
                    station: "DKI1 (Bunderan HI)".to_string(),
                },
                Pm25Feed {
                    city: "South".to_string(),
                    station: "DKI3 (Jagakarsa)".to_string(),
                },
            ],
            station_aliases: vec![StationAlias {
                raw: "DKI5 (Kebon Jeruk) Jakarta Barat".to_string(),
                canonical: "DKI5 (Kebon Jeruk)".to_string(),
            }],
            aqi_dir: PathBuf::from(DEFAULT_AQI_DIR),
            pm25_dir: PathBuf::from(DEFAULT_PM25_DIR),
            no_data_marker: DEFAULT_NO_DATA_MARKER.to_string(),
            label_language: LabelLanguage::default(),
        }
    }
}

impl Settings {
    /// Layer built-in defaults, an optional settings file and `AQI__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(ProcessingError::Config(format!(
                    "Settings file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line year overrides and re-validate.
    pub fn with_years(mut self, start_year: Option<i32>, end_year: Option<i32>) -> Result<Self> {
        if let Some(year) = start_year {
            self.start_year = year;
        }
        if let Some(year) = end_year {
            self.end_year = year;
        }
        self.validate()?;
        Ok(self)
    }

    /// First and last calendar day of the processing range.
    pub fn date_bounds(&self) -> Result<(NaiveDate, NaiveDate)> {
        let start = NaiveDate::from_ymd_opt(self.start_year, 1, 1).ok_or_else(|| {
            ProcessingError::Config(format!("Invalid start year {}", self.start_year))
        })?;
        let end = NaiveDate::from_ymd_opt(self.end_year, 12, 31).ok_or_else(|| {
            ProcessingError::Config(format!("Invalid end year {}", self.end_year))
        })?;
        Ok((start, end))
    }

    /// Years covered by the dedicated PM2.5 feeds within the processing range.
    pub fn pm25_years(&self) -> std::ops::RangeInclusive<i32> {
        self.pm25_first_year.max(self.start_year)..=self.end_year
    }

    pub fn registry(&self) -> Result<StationRegistry> {
        let mut registry =
            StationRegistry::new(self.stations.iter().map(|s| StationId::new(s.as_str())));

        for alias in &self.station_aliases {
            registry = registry.with_alias(&alias.raw, StationId::new(alias.canonical.as_str()));
        }
        for feed in &self.pm25_feeds {
            registry = registry.with_pm25_authority(StationId::new(feed.station.as_str()))?;
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());

        let registry = settings.registry().unwrap();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.pm25_authoritative().count(), 2);

        let (start, end) = settings.date_bounds().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
        assert_eq!(settings.pm25_years(), 2015..=2021);
    }

    #[test]
    fn test_year_overrides_are_validated() {
        let settings = Settings::default().with_years(Some(2019), Some(2020)).unwrap();
        assert_eq!(settings.start_year, 2019);
        assert_eq!(settings.pm25_years(), 2019..=2020);

        let inverted = Settings::default().with_years(Some(2021), Some(2020));
        assert!(matches!(inverted, Err(ProcessingError::Validation(_))));
    }

    #[test]
    fn test_feed_must_target_monitored_station() {
        let mut settings = Settings::default();
        settings.pm25_feeds.push(Pm25Feed {
            city: "North".to_string(),
            station: "DKI9 (Unknown)".to_string(),
        });
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "start_year = 2018")?;
        writeln!(file, "end_year = 2019")?;
        writeln!(file, "no_data_marker = \"NA\"")?;
        writeln!(file, "label_language = \"english\"")?;

        let settings = Settings::load(Some(file.path()))?;
        assert_eq!(settings.start_year, 2018);
        assert_eq!(settings.end_year, 2019);
        assert_eq!(settings.no_data_marker, "NA");
        assert_eq!(settings.label_language, LabelLanguage::English);
        assert_eq!(settings.stations.len(), 5);

        Ok(())
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/aqi.toml")));
        assert!(matches!(result, Err(ProcessingError::Config(_))));
    }
}
