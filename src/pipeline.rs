//! End-to-end pipeline run
//!
//! Loads the sources, builds the rent series, forecasts them, merges the
//! affordability table and only then writes anything. CSVs are staged next
//! to their destinations and the SQLite tables are replaced in one
//! transaction; the CSVs are renamed into place only after that succeeds,
//! so a failed write leaves the previous outputs as they were.

use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::forecast::TrendForecaster;
use crate::io::{stage_csv, write_tables};
use crate::merge::clean_and_merge;
use crate::sources::{self, REGION_COLUMN};
use crate::timeseries::{series_frame, SeriesBuilder};

pub const MERGED_FILE: &str = "merged_dataset.csv";
pub const DASHBOARD_FILE: &str = "affordability_dashboard.csv";
pub const SERIES_FILE: &str = "rent_series.csv";
pub const FORECAST_FILE: &str = "rent_forecast.csv";

/// Counts and paths of one completed run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSummary {
    pub regions_built: usize,
    pub regions_excluded: usize,
    pub regions_forecast: usize,
    pub regions_skipped: usize,
    pub forecast_rows: usize,
    pub merged_rows: usize,
    pub neighborhoods: Option<usize>,
    pub files_written: Vec<PathBuf>,
}

/// Run the pipeline described by `config`
pub fn run(config: &PipelineConfig) -> Result<PipelineSummary> {
    config.validate()?;
    let mut summary = PipelineSummary::default();

    log::info!("loading raw datasets from {}", config.raw_dir.display());
    let rent = sources::load_rent(config.rent_path(), &config.region_filter)?;
    let income = sources::load_income(config.income_path(), &config.region_filter)?;
    let burden = sources::load_rent_burden(config.rent_burden_path())?;
    summary.neighborhoods =
        sources::load_neighborhoods(config.neighborhoods_path())?.map(|df| df.row_count());

    log::info!("building regional rent series");
    let build = SeriesBuilder::new(REGION_COLUMN)
        .min_months(config.min_months)
        .build(&rent)?;
    summary.regions_built = build.series.len();
    summary.regions_excluded = build.report.excluded_regions.len();

    log::info!("forecasting {} months ahead", config.horizon_months);
    let forecaster = TrendForecaster::new(config.horizon_months, config.min_history);
    let report = forecaster.forecast(&build.series)?;
    summary.regions_skipped = report.skipped_regions.len();
    summary.regions_forecast = summary.regions_built - summary.regions_skipped;
    summary.forecast_rows = report.rows.len();

    log::info!("cleaning and merging");
    let merged = clean_and_merge(&rent, &income, &burden)?;
    summary.merged_rows = merged.row_count();

    let series_df = series_frame(&build.series, REGION_COLUMN, "rent")?;
    let forecast_df = report.to_frame(REGION_COLUMN, "forecast_rent")?;

    log::info!("saving outputs");
    let staged = [
        stage_csv(&merged, config.work_dir.join(MERGED_FILE))?,
        stage_csv(&merged, config.out_dir.join(DASHBOARD_FILE))?,
        stage_csv(&series_df, config.work_dir.join(SERIES_FILE))?,
        stage_csv(&forecast_df, config.out_dir.join(FORECAST_FILE))?,
    ];

    if let Some(db) = &config.database {
        write_tables(
            &[
                (config.table_name.as_str(), &merged),
                (config.forecast_table.as_str(), &forecast_df),
            ],
            db,
        )?;
        log::info!(
            "loaded tables {} and {} into {}",
            config.table_name,
            config.forecast_table,
            db.display()
        );
    }

    for file in staged {
        summary.files_written.push(file.commit()?);
    }

    log::info!(
        "pipeline complete: {} region(s) forecast, {} affordability row(s) in {}",
        summary.regions_forecast,
        summary.merged_rows,
        config.out_dir.display()
    );
    Ok(summary)
}
