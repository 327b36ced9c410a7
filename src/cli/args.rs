use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aqi-processor")]
#[command(about = "Consolidates multi-station pollutant data into a daily Air Quality Index table")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML, JSON or YAML)")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Input locations and processing range; anything left unset comes from the settings.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    #[arg(long, help = "Directory holding one sub-directory of monthly CSV files per year")]
    pub aqi_dir: Option<PathBuf>,

    #[arg(long, help = "Directory holding the dedicated PM2.5 feeds")]
    pub pm25_dir: Option<PathBuf>,

    #[arg(long)]
    pub start_year: Option<i32>,

    #[arg(long)]
    pub end_year: Option<i32>,

    #[arg(long, default_value_t = num_cpus::get())]
    pub max_workers: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the daily table
    Process {
        #[command(flatten)]
        input: InputArgs,

        #[arg(
            short,
            long,
            help = "Output file path [default: output/combined-aqi-{YYMMDD}.{csv|parquet}]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        #[arg(short, long, default_value = "snappy", help = "Parquet compression")]
        compression: String,

        #[arg(short, long, help = "Only write rows of this station")]
        station: Option<String>,

        #[arg(long, default_value = "false")]
        validate_only: bool,
    },

    /// Run the pipeline and print the integrity report only
    Validate {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, help = "Fail when any integrity issue is found")]
        strict: bool,
    },

    /// Convert a single concentration to its sub-index, or a sub-index to its concentration
    Convert {
        #[arg(short, long, help = "Pollutant key: pm25, pm10, so2, co, o3 or no2")]
        pollutant: String,

        #[arg(long, conflicts_with = "index", required_unless_present = "index")]
        concentration: Option<f64>,

        #[arg(long)]
        index: Option<f64>,
    },

    /// Run the pipeline and write the integrity report as JSON
    Report {
        #[command(flatten)]
        input: InputArgs,

        #[arg(
            short,
            long,
            help = "Report file path [default: output/combined-aqi-{YYMMDD}.json]"
        )]
        output_file: Option<PathBuf>,
    },
}
