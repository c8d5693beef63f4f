//! Wide rent table -> clean per-region monthly series
//!
//! A wide table has one row per region and one column per month. The
//! builder melts it into `(region, period, value)` observations, groups them
//! by region, drops regions with too little history, and repairs the gaps of
//! the survivors.

use std::collections::BTreeMap;

use rayon::prelude::*;

use super::fill::fill_gaps;
use super::period::Period;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::na::NA;
use crate::region::RegionId;

/// Default inclusion threshold, in non-missing months
pub const DEFAULT_MIN_MONTHS: usize = 12;

/// One cell of the wide table
#[derive(Debug, Clone, PartialEq)]
pub struct LongObservation {
    pub region: RegionId,
    pub period: Period,
    pub value: NA<f64>,
}

/// A gap-free observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub period: Period,
    pub value: f64,
}

/// Chronological, gap-filled observations of one region
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSeries {
    region: RegionId,
    observations: Vec<Observation>,
}

impl CleanedSeries {
    /// Build from observations in strictly increasing period order; a month
    /// absent from the source table stays absent here
    pub fn new(region: RegionId, observations: Vec<Observation>) -> Result<Self> {
        if observations.windows(2).any(|w| w[0].period >= w[1].period) {
            return Err(Error::Consistency(format!(
                "observations of region {} are not in strictly increasing period order",
                region
            )));
        }
        Ok(CleanedSeries {
            region,
            observations,
        })
    }

    pub fn region(&self) -> &RegionId {
        &self.region
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn last_period(&self) -> Option<Period> {
        self.observations.last().map(|o| o.period)
    }
}

/// What the builder dropped along the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Columns that became part of the time axis
    pub period_columns: usize,
    /// Date-like column labels that did not parse as a month
    pub dropped_columns: Vec<String>,
    /// Non-blank cells that were not numbers (treated as missing)
    pub unparseable_cells: usize,
    /// Rows with a blank region identifier
    pub rows_without_region: usize,
    /// Regions below the `min_months` threshold
    pub excluded_regions: Vec<RegionId>,
}

/// Output of one build
#[derive(Debug, Clone, Default)]
pub struct SeriesBuild {
    /// Retained regions, ordered by region id
    pub series: Vec<CleanedSeries>,
    pub report: BuildReport,
}

/// Reshapes a wide region x month table into cleaned series
#[derive(Debug, Clone)]
pub struct SeriesBuilder {
    region_column: String,
    min_months: usize,
}

impl SeriesBuilder {
    pub fn new(region_column: impl Into<String>) -> Self {
        SeriesBuilder {
            region_column: region_column.into(),
            min_months: DEFAULT_MIN_MONTHS,
        }
    }

    /// Minimum non-missing observations a region needs to be kept.
    /// Zero disables the threshold.
    pub fn min_months(mut self, min_months: usize) -> Self {
        self.min_months = min_months;
        self
    }

    /// Melt the wide table into one observation per (region, period column).
    ///
    /// Only columns that look like dates and parse as a calendar month take
    /// part; other date-like columns are reported in `report.dropped_columns`.
    pub fn melt(&self, wide: &DataFrame, report: &mut BuildReport) -> Result<Vec<LongObservation>> {
        if wide.column_count() == 0 {
            return Ok(Vec::new());
        }
        wide.require_columns("rent", &[self.region_column.as_str()])?;

        let mut periods: Vec<(&str, Period)> = Vec::new();
        for label in wide.column_names() {
            if *label == self.region_column || !Period::is_date_like(label) {
                continue;
            }
            match Period::parse(label) {
                Ok(period) => periods.push((label.as_str(), period)),
                Err(e) => {
                    log::warn!("dropping column '{}': {}", label, e);
                    report.dropped_columns.push(label.clone());
                }
            }
        }
        report.period_columns = periods.len();

        let regions: Vec<RegionId> = wide
            .get_column_string_values(&self.region_column)?
            .iter()
            .map(|cell| RegionId::new(cell))
            .collect();

        let columns = periods
            .iter()
            .map(|(label, period)| wide.get_column_string_values(label).map(|cells| (cells, *period)))
            .collect::<Result<Vec<_>>>()?;

        let mut long = Vec::with_capacity(regions.len() * columns.len());
        for (row, region) in regions.iter().enumerate() {
            if region.is_empty() {
                report.rows_without_region += 1;
                continue;
            }
            for (cells, period) in &columns {
                let cell = &cells[row];
                let value = NA::parse_cell(cell).unwrap_or_else(|e| {
                    log::debug!("region {} period {}: {}", region, period, e);
                    report.unparseable_cells += 1;
                    NA::NA
                });
                long.push(LongObservation {
                    region: region.clone(),
                    period: *period,
                    value,
                });
            }
        }

        if report.rows_without_region > 0 {
            log::warn!(
                "{} row(s) without a region identifier were skipped",
                report.rows_without_region
            );
        }
        if report.unparseable_cells > 0 {
            log::warn!(
                "{} rent cell(s) were not numeric and are treated as missing",
                report.unparseable_cells
            );
        }
        Ok(long)
    }

    /// Run the full build: melt, group, threshold, sort, gap-fill
    pub fn build(&self, wide: &DataFrame) -> Result<SeriesBuild> {
        let mut report = BuildReport::default();
        let long = self.melt(wide, &mut report)?;

        let groups: Vec<(RegionId, BTreeMap<Period, NA<f64>>)> =
            group_by_region(long).into_iter().collect();

        let min_months = self.min_months;
        let outcomes: Vec<std::result::Result<CleanedSeries, RegionId>> = groups
            .into_par_iter()
            .map(|(region, cells)| clean_region(region, cells, min_months))
            .collect();

        let mut series = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(s) => series.push(s),
                Err(region) => report.excluded_regions.push(region),
            }
        }

        log::info!(
            "built {} regional series from {} period columns ({} region(s) below {} months excluded)",
            series.len(),
            report.period_columns,
            report.excluded_regions.len(),
            min_months
        );
        Ok(SeriesBuild { series, report })
    }
}

/// Group observations by region, one cell per month.
///
/// A region listed on several rows keeps the first present value seen for
/// each month.
fn group_by_region(long: Vec<LongObservation>) -> BTreeMap<RegionId, BTreeMap<Period, NA<f64>>> {
    let mut groups: BTreeMap<RegionId, BTreeMap<Period, NA<f64>>> = BTreeMap::new();
    for obs in long {
        let cell = groups
            .entry(obs.region)
            .or_default()
            .entry(obs.period)
            .or_insert(NA::NA);
        if cell.is_na() {
            *cell = obs.value;
        }
    }
    groups
}

fn clean_region(
    region: RegionId,
    cells: BTreeMap<Period, NA<f64>>,
    min_months: usize,
) -> std::result::Result<CleanedSeries, RegionId> {
    let present = cells.values().filter(|v| v.is_value()).count();
    if present == 0 || present < min_months {
        log::debug!(
            "region {} has {} of {} required months, excluded",
            region,
            present,
            min_months
        );
        return Err(region);
    }

    // BTreeMap iteration is already chronological
    let (periods, raw): (Vec<Period>, Vec<NA<f64>>) = cells.into_iter().unzip();
    let filled = match fill_gaps(&raw) {
        Some(filled) => filled,
        None => return Err(region),
    };

    let observations = periods
        .into_iter()
        .zip(filled)
        .map(|(period, value)| Observation { period, value })
        .collect();
    Ok(CleanedSeries {
        region,
        observations,
    })
}

/// Build cleaned series from a wide table.
///
/// An empty table yields no series. A table without `region_column` is an
/// `Error::InputSchema`.
pub fn build_series(wide: &DataFrame, region_column: &str, min_months: usize) -> Result<Vec<CleanedSeries>> {
    Ok(SeriesBuilder::new(region_column)
        .min_months(min_months)
        .build(wide)?
        .series)
}

/// Long-format DataFrame of cleaned series: region, period, value
pub fn series_frame(series: &[CleanedSeries], region_column: &str, value_column: &str) -> Result<DataFrame> {
    let rows: usize = series.iter().map(CleanedSeries::len).sum();
    let mut regions = Vec::with_capacity(rows);
    let mut periods = Vec::with_capacity(rows);
    let mut values = Vec::with_capacity(rows);
    for s in series {
        for obs in s.observations() {
            regions.push(s.region().to_string());
            periods.push(obs.period.to_string());
            values.push(obs.value.to_string());
        }
    }

    let mut df = DataFrame::new();
    df.add_column(region_column, regions)?;
    df.add_column("period", periods)?;
    df.add_column(value_column, values)?;
    Ok(df)
}
