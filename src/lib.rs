//! Regional rent time-series pipeline
//!
//! Turns a wide region x month rent table into cleaned per-region series,
//! projects each region forward with a linear trend, and joins rent with
//! income and rent burden figures into an affordability table.

pub mod config;
pub mod dataframe;
pub mod error;
pub mod forecast;
pub mod io;
pub mod merge;
pub mod na;
pub mod pipeline;
pub mod region;
pub mod sources;
pub mod timeseries;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use dataframe::DataFrame;
pub use error::{Error, Result};
pub use forecast::{forecast, ForecastRow, RegionModel, TrendForecaster};
pub use na::NA;
pub use pipeline::{run, PipelineSummary};
pub use region::RegionId;
pub use timeseries::{build_series, CleanedSeries, Period, SeriesBuilder};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
