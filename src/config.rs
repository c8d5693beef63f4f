//! Pipeline configuration
//!
//! Every path and threshold the pipeline uses lives in one `PipelineConfig`
//! value that is passed to each stage. It can be loaded from a TOML file;
//! missing keys take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forecast::{DEFAULT_HORIZON_MONTHS, DEFAULT_MIN_HISTORY};
use crate::timeseries::DEFAULT_MIN_MONTHS;

/// Input file names, relative to `raw_dir`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    /// Wide rent index table (Zillow Observed Rent Index layout)
    pub rent: String,
    /// Median household income by ZIP code
    pub income: String,
    /// ACS gross rent as a percentage of household income (table B25070)
    pub rent_burden: String,
    /// Neighborhood boundaries; optional
    pub neighborhoods: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        SourceFiles {
            rent: "zillow_rent.csv".to_string(),
            income: "Income_Breakdown_by_ZIP_Code.csv".to_string(),
            rent_burden: "acs_rent_burden.csv".to_string(),
            neighborhoods: "Neighborhood_Map_Atlas_Neighborhoods.geojson".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the raw source files
    pub raw_dir: PathBuf,
    /// Intermediate outputs
    pub work_dir: PathBuf,
    /// Final outputs
    pub out_dir: PathBuf,
    /// SQLite database to load the output tables into, if any
    pub database: Option<PathBuf>,
    /// Table name for the affordability table
    pub table_name: String,
    /// Table name for the forecast table
    pub forecast_table: String,
    /// Case-insensitive substring matched against the metro label
    pub region_filter: String,
    /// Non-missing months a region needs to enter the series
    pub min_months: usize,
    /// Months of history a region needs to be forecast
    pub min_history: usize,
    /// Months to project past the last observation
    pub horizon_months: usize,
    pub sources: SourceFiles,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            raw_dir: PathBuf::from("raw_data"),
            work_dir: PathBuf::from("data_work"),
            out_dir: PathBuf::from("data_out"),
            database: None,
            table_name: "housing_data".to_string(),
            forecast_table: "rent_forecast".to_string(),
            region_filter: "Seattle".to_string(),
            min_months: DEFAULT_MIN_MONTHS,
            min_history: DEFAULT_MIN_HISTORY,
            horizon_months: DEFAULT_HORIZON_MONTHS,
            sources: SourceFiles::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject thresholds that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.min_months == 0 {
            return Err(Error::Config("min_months must be at least 1".to_string()));
        }
        if self.min_history < 2 {
            return Err(Error::Config(
                "min_history must be at least 2 to fit a trend".to_string(),
            ));
        }
        if self.horizon_months == 0 {
            return Err(Error::Config("horizon_months must be at least 1".to_string()));
        }
        if self.table_name.trim().is_empty() || self.forecast_table.trim().is_empty() {
            return Err(Error::Config("table names must not be empty".to_string()));
        }
        if self.table_name == self.forecast_table {
            return Err(Error::Config(format!(
                "table_name and forecast_table are both '{}'",
                self.table_name
            )));
        }
        Ok(())
    }

    pub fn rent_path(&self) -> PathBuf {
        self.raw_dir.join(&self.sources.rent)
    }

    pub fn income_path(&self) -> PathBuf {
        self.raw_dir.join(&self.sources.income)
    }

    pub fn rent_burden_path(&self) -> PathBuf {
        self.raw_dir.join(&self.sources.rent_burden)
    }

    pub fn neighborhoods_path(&self) -> PathBuf {
        self.raw_dir.join(&self.sources.neighborhoods)
    }
}
