use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::aqi::HealthCategory;
use crate::error::{ProcessingError, Result};
use crate::models::{DailyAqiRecord, Pollutant, StationId};
use crate::utils::DateRange;

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_records: usize,
    pub days_with_data: usize,
    pub no_data_days: usize,
    pub hazardous_days: usize,
    pub category_counts: BTreeMap<String, usize>,
    pub station_statistics: BTreeMap<String, StationStatistics>,
    pub issues: Vec<IntegrityIssue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityIssue {
    pub station: String,
    pub date: NaiveDate,
    pub issue_type: IssueType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueType {
    DuplicateRow,
    MissingDate,
    CategoryMismatch,
    CompositeMismatch,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StationStatistics {
    pub total_days: usize,
    pub days_with_data: usize,
    pub no_data_days: usize,
    pub hazardous_days: usize,
    pub max_composite: u32,
    pub category_counts: BTreeMap<String, usize>,
    /// How often each pollutant was the dominant one, keyed by its critical label.
    pub dominant_counts: BTreeMap<String, usize>,
    /// Days with a non-zero sub-index, per pollutant.
    pub pollutant_coverage: BTreeMap<String, usize>,
}

impl IntegrityReport {
    pub fn coverage(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            100.0 * self.days_with_data as f64 / self.total_records as f64
        }
    }
}

/// Consistency and coverage checks over the finalized daily table.
pub struct IntegrityChecker {
    strict_mode: bool,
    expected_range: Option<DateRange>,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            strict_mode: false,
            expected_range: None,
        }
    }

    /// In strict mode any issue fails the check instead of only being reported.
    pub fn with_strict_mode(strict_mode: bool) -> Self {
        Self {
            strict_mode,
            expected_range: None,
        }
    }

    /// Report stations that lack a row for a day of `range`.
    pub fn with_expected_range(mut self, range: DateRange) -> Self {
        self.expected_range = Some(range);
        self
    }

    pub fn check_integrity(&self, records: &[DailyAqiRecord]) -> Result<IntegrityReport> {
        let mut report = IntegrityReport {
            start_date: records.iter().map(|r| r.date).min(),
            end_date: records.iter().map(|r| r.date).max(),
            total_records: records.len(),
            days_with_data: 0,
            no_data_days: 0,
            hazardous_days: 0,
            category_counts: BTreeMap::new(),
            station_statistics: BTreeMap::new(),
            issues: Vec::new(),
        };

        let mut seen: HashSet<(&StationId, NaiveDate)> = HashSet::new();
        let mut station_dates: BTreeMap<&StationId, Vec<NaiveDate>> = BTreeMap::new();

        for record in records {
            self.check_record(record, &mut report);

            if !seen.insert((&record.station, record.date)) {
                report.issues.push(IntegrityIssue {
                    station: record.station.to_string(),
                    date: record.date,
                    issue_type: IssueType::DuplicateRow,
                    details: "more than one row for the same station and day".to_string(),
                });
            }
            station_dates.entry(&record.station).or_default().push(record.date);

            let label = record.category.ispu_label().to_string();
            *report.category_counts.entry(label.clone()).or_default() += 1;

            let stats = report
                .station_statistics
                .entry(record.station.to_string())
                .or_default();
            stats.total_days += 1;
            *stats.category_counts.entry(label).or_default() += 1;
            stats.max_composite = stats.max_composite.max(record.composite_index);

            if record.has_data() {
                report.days_with_data += 1;
                stats.days_with_data += 1;
            } else {
                report.no_data_days += 1;
                stats.no_data_days += 1;
            }

            if record.is_hazardous() {
                report.hazardous_days += 1;
                stats.hazardous_days += 1;
            }

            if let Some(dominant) = record.dominant {
                *stats
                    .dominant_counts
                    .entry(dominant.critical_label().to_string())
                    .or_default() += 1;
            }

            for (pollutant, reading) in record.readings.iter() {
                if reading.index.is_positive() {
                    *stats
                        .pollutant_coverage
                        .entry(pollutant.critical_label().to_string())
                        .or_default() += 1;
                }
            }
        }

        if let Some(range) = self.expected_range {
            for (station, dates) in &station_dates {
                self.check_date_coverage(station, dates, range, &mut report);
            }
        }

        if self.strict_mode && !report.issues.is_empty() {
            return Err(ProcessingError::Integrity(format!(
                "{} issue(s), first: {} on {}: {}",
                report.issues.len(),
                report.issues[0].station,
                report.issues[0].date,
                report.issues[0].details
            )));
        }

        Ok(report)
    }

    fn check_record(&self, record: &DailyAqiRecord, report: &mut IntegrityReport) {
        let peak = record
            .readings
            .iter()
            .filter_map(|(_, r)| r.index.value())
            .fold(0.0_f64, f64::max) as u32;

        if peak != record.composite_index {
            report.issues.push(IntegrityIssue {
                station: record.station.to_string(),
                date: record.date,
                issue_type: IssueType::CompositeMismatch,
                details: format!(
                    "composite {} differs from highest sub-index {}",
                    record.composite_index, peak
                ),
            });
        }

        let expected = HealthCategory::from_composite(record.composite_index);
        if expected != record.category {
            report.issues.push(IntegrityIssue {
                station: record.station.to_string(),
                date: record.date,
                issue_type: IssueType::CategoryMismatch,
                details: format!(
                    "category {} does not match composite {}",
                    record.category, record.composite_index
                ),
            });
        }
    }

    fn check_date_coverage(
        &self,
        station: &StationId,
        dates: &[NaiveDate],
        range: DateRange,
        report: &mut IntegrityReport,
    ) {
        let present: HashSet<&NaiveDate> = dates.iter().collect();
        for date in range.filter(|d| !present.contains(d)) {
            report.issues.push(IntegrityIssue {
                station: station.to_string(),
                date,
                issue_type: IssueType::MissingDate,
                details: "no row for this day".to_string(),
            });
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        if let (Some(start), Some(end)) = (report.start_date, report.end_date) {
            summary.push_str(&format!("Date Range: {} to {}\n", start, end));
        }
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Days With Data: {} ({:.1}%)\n",
            report.days_with_data,
            report.coverage()
        ));
        summary.push_str(&format!("No-Data Days: {}\n", report.no_data_days));
        summary.push_str(&format!("Hazardous Days: {}\n", report.hazardous_days));

        summary.push_str("\nCategories:\n");
        for category in HealthCategory::ALL {
            let label = category.ispu_label();
            let count = report.category_counts.get(label).copied().unwrap_or(0);
            summary.push_str(&format!("  {:<20} {}\n", label, count));
        }

        summary.push_str("\nStations:\n");
        for (station, stats) in &report.station_statistics {
            let dominant = stats
                .dominant_counts
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(label, _)| label.as_str())
                .unwrap_or("-");
            summary.push_str(&format!(
                "  {}: {}/{} days with data, max {}, hazardous {}, most often critical {}\n",
                station,
                stats.days_with_data,
                stats.total_days,
                stats.max_composite,
                stats.hazardous_days,
                dominant
            ));
        }

        summary.push_str(&format!("\nIssues: {}\n", report.issues.len()));
        if !report.issues.is_empty() {
            summary.push_str("\nTop 10 Issues:\n");
            for (i, issue) in report.issues.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} on {}: {:?}, {}\n",
                    i + 1,
                    issue.station,
                    issue.date,
                    issue.issue_type,
                    issue.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
