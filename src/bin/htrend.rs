//! Healthtrend CLI - Command-line interface for Healthtrend
//!
//! Commands:
//! - analyze: Run the full pipeline and emit a trend report
//! - clean: Clean a table and emit the surviving records
//! - validate: Check a table against the input schema
//! - sample: Generate synthetic daily health data
//! - schema: Print input schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use healthtrend::report::ReportBuilder;
use healthtrend::sample::SampleGenerator;
use healthtrend::table::SchemaError;
use healthtrend::types::{HealthReport, TrendDirection};
use healthtrend::{cleaner, ingest, pipeline, report};
use healthtrend::{AnalysisError, CRATE_VERSION};

/// Healthtrend - Daily health log cleaning and weight-change trend estimation
#[derive(Parser)]
#[command(name = "htrend")]
#[command(version = CRATE_VERSION)]
#[command(about = "Clean daily health logs and estimate weight-change trends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and emit a trend report
    Analyze {
        /// Input CSV path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Report format
        #[arg(long, default_value = "text")]
        format: ReportFormat,

        /// Pin the producer instance id (random by default)
        #[arg(long)]
        instance_id: Option<String>,
    },

    /// Clean a table and emit the surviving records
    Clean {
        /// Input CSV path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "csv")]
        format: CleanFormat,
    },

    /// Check a table against the input schema
    Validate {
        /// Input CSV path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate synthetic daily health data
    Sample {
        /// Days of data to generate
        #[arg(long, default_value = "30")]
        days: usize,

        /// RNG seed, for reproducible output
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Date of the last row (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        end_date: Option<String>,

        /// Output path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Print input schema information
    Schema {
        /// Output as JSON schema
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum ReportFormat {
    /// Human-readable text report
    Text,
    /// Compact JSON payload
    Json,
    /// Pretty-printed JSON payload
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum CleanFormat {
    /// CSV with the schema columns first
    Csv,
    /// Compact JSON array of records
    Json,
    /// Pretty-printed JSON array of records
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TrendCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            format,
            instance_id,
        } => cmd_analyze(&input, &output, format, instance_id),

        Commands::Clean {
            input,
            output,
            format,
        } => cmd_clean(&input, &output, format),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Sample {
            days,
            seed,
            end_date,
            output,
        } => cmd_sample(days, seed, end_date, &output),

        Commands::Schema { json } => cmd_schema(json),
    }
}

fn cmd_analyze(
    input: &PathBuf,
    output: &PathBuf,
    format: ReportFormat,
    instance_id: Option<String>,
) -> Result<(), TrendCliError> {
    let input_data = read_input(input)?;
    let analysis = pipeline::analyze_csv(&input_data)?;

    let mut builder = ReportBuilder::new();
    if let Some(id) = instance_id {
        builder = builder.with_instance_id(id);
    }
    let report = builder.build(&analysis);

    let rendered = match format {
        ReportFormat::Text => render_text_report(&report),
        ReportFormat::Json => report::to_json(&report)?,
        ReportFormat::JsonPretty => report::to_json_pretty(&report)?,
    };

    write_output(output, &rendered)
}

fn cmd_clean(input: &PathBuf, output: &PathBuf, format: CleanFormat) -> Result<(), TrendCliError> {
    let input_data = read_input(input)?;
    let table = ingest::read_csv_str(&input_data)?;
    let series = cleaner::clean(&table)?;

    let rendered = match format {
        CleanFormat::Csv => ingest::series_to_csv(&series)?,
        CleanFormat::Json => serde_json::to_string(series.records())?,
        CleanFormat::JsonPretty => serde_json::to_string_pretty(series.records())?,
    };

    write_output(output, &rendered)
}

fn cmd_validate(input: &PathBuf, json: bool) -> Result<(), TrendCliError> {
    let input_data = read_input(input)?;
    let table = ingest::read_csv_str(&input_data)?;
    let report = cleaner::validate(&table);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Rows read:         {}", report.rows_read);
        println!("Valid rows:        {}", report.rows_valid);
        println!("Rows with missing: {}", report.rows_with_missing);
        println!("Problem cells:     {}", report.issues.len());

        if !report.missing_columns.is_empty() {
            println!("\nMissing columns:");
            for column in &report.missing_columns {
                println!("  - {}", column);
            }
        }

        if !report.issues.is_empty() {
            println!("\nProblems:");
            for issue in &report.issues {
                println!("  - Row {} ({}): {}", issue.row, issue.column, issue.message);
            }
        }
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(TrendCliError::ValidationFailed(
            report.missing_columns.len() + report.issues.len(),
        ))
    }
}

fn cmd_sample(
    days: usize,
    seed: u64,
    end_date: Option<String>,
    output: &PathBuf,
) -> Result<(), TrendCliError> {
    let mut generator = SampleGenerator::new().with_days(days).with_seed(seed);

    if let Some(raw) = end_date {
        let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| TrendCliError::InvalidDate(raw))?;
        generator = generator.with_end_date(date);
    }

    let csv = generator.generate_csv()?;
    write_output(output, &csv)
}

fn cmd_schema(json: bool) -> Result<(), TrendCliError> {
    if json {
        println!("{}", get_input_json_schema());
    } else {
        println!("Input Schema: daily health log CSV");
        println!();
        println!("Required columns (any order, headers case-insensitive):");
        println!("  - date              calendar date (YYYY-MM-DD, YYYY/MM/DD or MM/DD/YYYY)");
        println!("  - sleep_hours       hours of sleep (number)");
        println!("  - steps             daily step count (number)");
        println!("  - exercise_minutes  minutes of exercise (number)");
        println!("  - heart_rate        resting heart rate in bpm (number)");
        println!();
        println!("Missing values: empty cells or NA, N/A, NaN, null, none (case-insensitive).");
        println!("Rows missing any tracked value are dropped during cleaning.");
        println!("Extra columns pass through cleaning untouched.");
    }

    Ok(())
}

// Helper functions

fn read_input(input: &PathBuf) -> Result<String, TrendCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(TrendCliError::NoInput);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &PathBuf, data: &str) -> Result<(), TrendCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn render_text_report(report: &HealthReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("Health Trend Report".to_string());
    lines.push("===================".to_string());
    lines.push(format!(
        "Producer:  {} {}",
        report.producer.name, report.producer.version
    ));
    lines.push(format!("Generated: {}", report.generated_at_utc));
    lines.push(String::new());

    let cleaning = &report.cleaning;
    let outlier_drops: usize = cleaning.outlier_passes.iter().map(|p| p.rows_dropped).sum();
    lines.push(format!("Rows read:    {}", cleaning.rows_read));
    lines.push(format!(
        "Rows dropped: {} ({} missing, {} outliers)",
        cleaning.rows_dropped_missing + outlier_drops,
        cleaning.rows_dropped_missing,
        outlier_drops
    ));
    lines.push(format!("Rows kept:    {}", cleaning.rows_kept));

    if let Some(metrics) = &report.metrics {
        lines.push(String::new());
        lines.push(format!(
            "Daily metrics ({} days, {} to {}):",
            metrics.days, metrics.date_start, metrics.date_end
        ));
        lines.push(format!(
            "  Sleep:      {:.2} hours (min {:.2}, max {:.2})",
            metrics.sleep_hours.mean, metrics.sleep_hours.min, metrics.sleep_hours.max
        ));
        lines.push(format!(
            "  Steps:      {:.0} (min {:.0}, max {:.0})",
            metrics.steps.mean, metrics.steps.min, metrics.steps.max
        ));
        lines.push(format!(
            "  Exercise:   {:.1} minutes (min {:.1}, max {:.1})",
            metrics.exercise_minutes.mean, metrics.exercise_minutes.min, metrics.exercise_minutes.max
        ));
        lines.push(format!(
            "  Heart rate: {:.1} bpm (min {:.1}, max {:.1})",
            metrics.heart_rate.mean, metrics.heart_rate.min, metrics.heart_rate.max
        ));
    }

    match &report.prediction {
        Some(prediction) => {
            lines.push(String::new());
            lines.push(format!(
                "Predicted weight {}: {:.1} lbs",
                prediction.direction.as_str(),
                prediction.weight_change_lbs.abs()
            ));
            lines.push(format!(
                "Based on your activity patterns, you are predicted to {} {:.1} pounds.",
                direction_verb(prediction.direction),
                prediction.weight_change_lbs.abs()
            ));
        }
        None => {
            lines.push(String::new());
            lines.push("No records survived cleaning; nothing to predict.".to_string());
        }
    }

    lines.join("\n") + "\n"
}

fn direction_verb(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Gain => "gain",
        TrendDirection::Loss => "lose",
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "healthtrend.daily_log.v1",
        "description": "One row of a daily health log",
        "type": "object",
        "required": ["date", "sleep_hours", "steps", "exercise_minutes", "heart_rate"],
        "properties": {
            "date": { "type": "string", "format": "date" },
            "sleep_hours": { "type": "number" },
            "steps": { "type": "number" },
            "exercise_minutes": { "type": "number" },
            "heart_rate": { "type": "number" }
        },
        "additionalProperties": { "type": "string" }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum TrendCliError {
    Io(io::Error),
    Analysis(AnalysisError),
    Json(serde_json::Error),
    NoInput,
    InvalidDate(String),
    ValidationFailed(usize),
}

impl From<io::Error> for TrendCliError {
    fn from(e: io::Error) -> Self {
        TrendCliError::Io(e)
    }
}

impl From<AnalysisError> for TrendCliError {
    fn from(e: AnalysisError) -> Self {
        TrendCliError::Analysis(e)
    }
}

impl From<SchemaError> for TrendCliError {
    fn from(e: SchemaError) -> Self {
        TrendCliError::Analysis(AnalysisError::Schema(e))
    }
}

impl From<serde_json::Error> for TrendCliError {
    fn from(e: serde_json::Error) -> Self {
        TrendCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TrendCliError> for CliError {
    fn from(e: TrendCliError) -> Self {
        match e {
            TrendCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TrendCliError::Analysis(AnalysisError::Schema(e)) => CliError {
                code: "SCHEMA_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'htrend validate' for a full report".to_string()),
            },
            TrendCliError::Analysis(AnalysisError::Csv(e)) => CliError {
                code: "CSV_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check CSV syntax".to_string()),
            },
            TrendCliError::Analysis(AnalysisError::Io(e)) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TrendCliError::Analysis(AnalysisError::Json(e)) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TrendCliError::Analysis(AnalysisError::EmptySeries(e)) => CliError {
                code: "EMPTY_SERIES".to_string(),
                message: e.to_string(),
                hint: Some("Provide at least one complete daily record".to_string()),
            },
            TrendCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TrendCliError::NoInput => CliError {
                code: "NO_INPUT".to_string(),
                message: "No input on stdin".to_string(),
                hint: Some("Pipe CSV data in or pass a file path".to_string()),
            },
            TrendCliError::InvalidDate(raw) => CliError {
                code: "INVALID_DATE".to_string(),
                message: format!("Unparseable date '{}'", raw),
                hint: Some("Use YYYY-MM-DD".to_string()),
            },
            TrendCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} problems found", count),
                hint: Some("Fix the reported problems and retry".to_string()),
            },
        }
    }
}
