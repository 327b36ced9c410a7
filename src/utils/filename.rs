use chrono::{Datelike, Local};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_OUTPUT_DIR;

/// Generate default output filename with format: combined-aqi-{YYMMDD}.{extension}
pub fn generate_default_output_filename(extension: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "combined-aqi-{:02}{:02}{:02}.{}",
        year, month, day, extension
    );
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(filename)
}
