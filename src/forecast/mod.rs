//! Per-region linear trend forecasting
//!
//! Each region's cleaned series is fitted with a closed-form least squares
//! line over its month index and extrapolated a fixed number of months past
//! its last observation. Regions are independent and fitted in parallel.

pub mod ols;
pub mod trend;

pub use ols::RegionModel;
pub use trend::{
    forecast, ForecastReport, ForecastRow, TrendForecaster, DEFAULT_HORIZON_MONTHS,
    DEFAULT_MIN_HISTORY,
};
