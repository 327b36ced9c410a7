use std::path::Path;
use tracing::info;

use crate::aqi::{convert, Direction};
use crate::cli::args::{Cli, Commands, InputArgs, OutputFormat};
use crate::error::{ProcessingError, Result};
use crate::logging;
use crate::models::{DailyAqiRecord, Measurement, Pollutant};
use crate::processors::{AqiPipeline, IntegrityChecker, PipelineOutput};
use crate::readers::FileObservationSource;
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::utils::{generate_default_output_filename, DEFAULT_NO_DATA_MARKER};
use crate::writers::{CsvWriter, DailyTableSink, ParquetWriter};

pub async fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose, cli.log_file.as_deref())?;
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Process {
            input,
            output_file,
            format,
            compression,
            station,
            validate_only,
        } => {
            let settings = load_settings(config_path, &input)?;

            // Reject a bad writer configuration before doing any work
            let sink: Box<dyn DailyTableSink> = match format {
                OutputFormat::Csv => Box::new(
                    CsvWriter::new()
                        .with_no_data_marker(&settings.no_data_marker)
                        .with_language(settings.label_language),
                ),
                OutputFormat::Parquet => Box::new(
                    ParquetWriter::new()
                        .with_compression(&compression)?
                        .with_language(settings.label_language),
                ),
            };

            print_inputs(&settings, input.max_workers);
            let output = run_pipeline(&settings, &input, false).await?;

            let checker = IntegrityChecker::new();
            println!("\n{}", checker.generate_summary(&output.report));

            if validate_only {
                println!("Validation complete - no output file written");
                return Ok(());
            }

            let records = filter_station(output.records, station.as_deref());
            if records.is_empty() {
                println!("No records to write");
                return Ok(());
            }

            let output_file =
                output_file.unwrap_or_else(|| generate_default_output_filename(format.extension()));
            println!(
                "Writing {} rows to {}...",
                records.len(),
                output_file.display()
            );
            sink.write_table(&records, &output_file)?;

            if format == OutputFormat::Parquet {
                let file_info = ParquetWriter::new().get_file_info(&output_file)?;
                println!(
                    "Rows: {}, row groups: {}, size: {} bytes",
                    file_info.total_rows, file_info.row_groups, file_info.file_size
                );
            }

            println!("Processing complete!");
        }

        Commands::Validate { input, strict } => {
            let settings = load_settings(config_path, &input)?;
            print_inputs(&settings, input.max_workers);

            let output = run_pipeline(&settings, &input, strict).await?;

            let checker = IntegrityChecker::new();
            println!("\n{}", checker.generate_summary(&output.report));

            if output.report.issues.is_empty() {
                println!("✅ All station-days passed integrity checks");
            } else {
                println!("⚠️  Found {} integrity issues", output.report.issues.len());
            }
        }

        Commands::Convert {
            pollutant,
            concentration,
            index,
        } => {
            let key: Pollutant = pollutant.parse()?;
            let (direction, value) = match (concentration, index) {
                (Some(c), _) => (Direction::ConcentrationToIndex, c),
                (None, Some(i)) => (Direction::IndexToConcentration, i),
                (None, None) => {
                    return Err(ProcessingError::Config(
                        "Either --concentration or --index is required".to_string(),
                    ))
                }
            };

            let result = convert(key.key(), direction, value)?;
            let rendered = match result {
                Measurement::Value(v) => v.to_string(),
                Measurement::Zero | Measurement::Missing => DEFAULT_NO_DATA_MARKER.to_string(),
            };

            match direction {
                Direction::ConcentrationToIndex => {
                    println!("{} concentration {} -> index {}", key, value, rendered)
                }
                Direction::IndexToConcentration => {
                    println!("{} index {} -> concentration {}", key, value, rendered)
                }
            }
        }

        Commands::Report { input, output_file } => {
            let settings = load_settings(config_path, &input)?;
            print_inputs(&settings, input.max_workers);

            let output = run_pipeline(&settings, &input, false).await?;
            let output_file =
                output_file.unwrap_or_else(|| generate_default_output_filename("json"));

            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&output_file, serde_json::to_string_pretty(&output.report)?)?;

            info!(path = %output_file.display(), "Wrote integrity report");
            println!("Report written to {}", output_file.display());
        }
    }

    Ok(())
}

fn load_settings(config_path: Option<&Path>, input: &InputArgs) -> Result<Settings> {
    let mut settings = Settings::load(config_path)?;
    if let Some(dir) = &input.aqi_dir {
        settings.aqi_dir = dir.clone();
    }
    if let Some(dir) = &input.pm25_dir {
        settings.pm25_dir = dir.clone();
    }
    settings.with_years(input.start_year, input.end_year)
}

async fn run_pipeline(
    settings: &Settings,
    input: &InputArgs,
    strict_validation: bool,
) -> Result<PipelineOutput> {
    let pipeline = AqiPipeline::from_settings(settings)?
        .with_max_workers(input.max_workers)
        .with_strict_validation(strict_validation);
    let source = FileObservationSource::new(settings, pipeline.registry())
        .with_max_workers(input.max_workers);

    let progress = ProgressReporter::new_spinner("Processing air quality data...", false);
    pipeline.run_files(&source, Some(&progress)).await
}

fn print_inputs(settings: &Settings, max_workers: usize) {
    println!("Combined data: {}", settings.aqi_dir.display());
    println!("PM2.5 feeds: {}", settings.pm25_dir.display());
    println!("Years: {}-{}", settings.start_year, settings.end_year);
    println!("Workers: {}", max_workers);
}

fn filter_station(records: Vec<DailyAqiRecord>, station: Option<&str>) -> Vec<DailyAqiRecord> {
    match station {
        Some(wanted) => records
            .into_iter()
            .filter(|r| r.station.as_str() == wanted || r.station.code() == wanted)
            .collect(),
        None => records,
    }
}
