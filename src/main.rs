//! # rentrs
//!
//! Command-line entry point for the regional rent pipeline.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rentrs::{pipeline, PipelineConfig};

#[derive(Parser)]
#[command(name = "rentrs", version)]
#[command(about = "Regional rent series, trend forecasts and affordability tables", long_about = None)]
struct Cli {
    /// TOML configuration file; missing keys take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the raw source files
    #[arg(long)]
    raw_dir: Option<PathBuf>,

    /// Directory for intermediate outputs
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Directory for final outputs
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// SQLite database to load the output tables into
    #[arg(long)]
    database: Option<PathBuf>,

    /// Metro name to keep (case-insensitive substring)
    #[arg(short, long)]
    region_filter: Option<String>,

    /// Non-missing months a region needs to be kept
    #[arg(long)]
    min_months: Option<usize>,

    /// Months of history a region needs to be forecast
    #[arg(long)]
    min_history: Option<usize>,

    /// Months to forecast past the last observation
    #[arg(long)]
    horizon_months: Option<usize>,
}

impl Cli {
    fn into_config(self) -> rentrs::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(dir) = self.raw_dir {
            config.raw_dir = dir;
        }
        if let Some(dir) = self.work_dir {
            config.work_dir = dir;
        }
        if let Some(dir) = self.out_dir {
            config.out_dir = dir;
        }
        if self.database.is_some() {
            config.database = self.database;
        }
        if let Some(filter) = self.region_filter {
            config.region_filter = filter;
        }
        if let Some(n) = self.min_months {
            config.min_months = n;
        }
        if let Some(n) = self.min_history {
            config.min_history = n;
        }
        if let Some(n) = self.horizon_months {
            config.horizon_months = n;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentrs=info".into()),
        )
        .init();

    let result = Cli::parse().into_config().and_then(|config| pipeline::run(&config));
    match result {
        Ok(summary) => {
            println!(
                "Pipeline complete: {} region(s) forecast, {} affordability row(s), {} file(s) written",
                summary.regions_forecast,
                summary.merged_rows,
                summary.files_written.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(err: &rentrs::Error) {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    eprintln!("Error: {}", message);
}
