use rayon::prelude::*;

use super::ols::RegionModel;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::region::RegionId;
use crate::timeseries::{CleanedSeries, Period};

/// Default forecast horizon (5 years of months)
pub const DEFAULT_HORIZON_MONTHS: usize = 60;
/// Default minimum series length needed to fit a trend
pub const DEFAULT_MIN_HISTORY: usize = 24;

/// One projected month of one region
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub region: RegionId,
    pub period: Period,
    pub forecast_value: f64,
}

/// Forecast rows plus the regions the history gate skipped
#[derive(Debug, Clone, Default)]
pub struct ForecastReport {
    /// Ordered by region, then period
    pub rows: Vec<ForecastRow>,
    pub skipped_regions: Vec<RegionId>,
}

impl ForecastReport {
    /// Forecast table: region, period, forecast value
    pub fn to_frame(&self, region_column: &str, value_column: &str) -> Result<DataFrame> {
        let mut df = DataFrame::new();
        df.add_column(
            region_column,
            self.rows.iter().map(|r| r.region.to_string()).collect(),
        )?;
        df.add_column(
            "period",
            self.rows.iter().map(|r| r.period.to_string()).collect(),
        )?;
        df.add_column(
            value_column,
            self.rows.iter().map(|r| r.forecast_value.to_string()).collect(),
        )?;
        Ok(df)
    }
}

/// Per-region linear trend forecaster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendForecaster {
    horizon_months: usize,
    min_history: usize,
}

impl Default for TrendForecaster {
    fn default() -> Self {
        TrendForecaster {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            min_history: DEFAULT_MIN_HISTORY,
        }
    }
}

impl TrendForecaster {
    pub fn new(horizon_months: usize, min_history: usize) -> Self {
        TrendForecaster {
            horizon_months,
            min_history,
        }
    }

    /// Fit and project one region.
    ///
    /// `t` counts calendar months from the first observation, so a month
    /// missing from the series keeps its place on the time axis. Returns
    /// `Ok(None)` when the series is shorter than `min_history`.
    pub fn forecast_region(&self, series: &CleanedSeries) -> Result<Option<Vec<ForecastRow>>> {
        if series.len() < self.min_history {
            log::debug!(
                "region {} has {} months of history, {} required; not forecast",
                series.region(),
                series.len(),
                self.min_history
            );
            return Ok(None);
        }

        let observations = series.observations();
        let (first, last) = match (observations.first(), observations.last()) {
            (Some(first), Some(last)) => (first.period, last.period),
            _ => {
                return Err(Error::ModelFit {
                    region: series.region().to_string(),
                    reason: "series has no observations".to_string(),
                })
            }
        };
        let points: Vec<(f64, f64)> = observations
            .iter()
            .map(|o| (o.period.months_since(first) as f64, o.value))
            .collect();

        let model = RegionModel::fit(series.region(), &points)?;
        log::debug!(
            "region {}: slope {:.4}, intercept {:.4}, r2 {:.4}",
            series.region(),
            model.slope,
            model.intercept,
            model.r_squared
        );

        let last_t = last.months_since(first);
        let rows = last
            .succ()
            .range(self.horizon_months)
            .enumerate()
            .map(|(i, period)| ForecastRow {
                region: series.region().clone(),
                period,
                forecast_value: model.predict((last_t + 1 + i as i64) as f64),
            })
            .collect();
        Ok(Some(rows))
    }

    /// Forecast every region independently
    pub fn forecast(&self, series: &[CleanedSeries]) -> Result<ForecastReport> {
        let per_region: Vec<(&CleanedSeries, Option<Vec<ForecastRow>>)> = series
            .par_iter()
            .map(|s| self.forecast_region(s).map(|rows| (s, rows)))
            .collect::<Result<_>>()?;

        let mut report = ForecastReport::default();
        for (s, rows) in per_region {
            match rows {
                Some(rows) => report.rows.extend(rows),
                None => report.skipped_regions.push(s.region().clone()),
            }
        }
        report
            .rows
            .sort_by(|a, b| a.region.cmp(&b.region).then(a.period.cmp(&b.period)));

        log::info!(
            "forecast {} month(s) for {} region(s), {} region(s) below {} months of history skipped",
            self.horizon_months,
            series.len() - report.skipped_regions.len(),
            report.skipped_regions.len(),
            self.min_history
        );
        Ok(report)
    }
}

/// Forecast every region with the given horizon and history gate
pub fn forecast(series: &[CleanedSeries], horizon_months: usize, min_history: usize) -> Result<Vec<ForecastRow>> {
    Ok(TrendForecaster::new(horizon_months, min_history)
        .forecast(series)?
        .rows)
}
