//! Region merger
//!
//! Joins the rent, income and rent burden tables into the affordability
//! table: one row per income row, with the ZIP's median rent, its burden
//! breakdown and the rent-to-income ratio.

use std::collections::BTreeMap;

use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::na::NA;
use crate::region::RegionId;
use crate::sources::{MONTHLY_INCOME_COLUMN, REGION_COLUMN};
use crate::timeseries::{BuildReport, SeriesBuilder};

pub const MEDIAN_RENT_COLUMN: &str = "MedianRent";
pub const RATIO_COLUMN: &str = "rent_to_income";

/// Median of the present values; even counts average the middle pair
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// `ZIP, MedianRent` over every non-missing month of each ZIP's rows
pub fn median_rent(rent: &DataFrame) -> Result<DataFrame> {
    let mut report = BuildReport::default();
    let long = SeriesBuilder::new(REGION_COLUMN).melt(rent, &mut report)?;

    let mut by_region: BTreeMap<RegionId, Vec<f64>> = BTreeMap::new();
    for obs in long {
        let values = by_region.entry(obs.region).or_default();
        if let NA::Value(v) = obs.value {
            values.push(v);
        }
    }

    let mut regions = Vec::with_capacity(by_region.len());
    let mut medians = Vec::with_capacity(by_region.len());
    for (region, mut values) in by_region {
        regions.push(region.to_string());
        medians.push(NA::from(median(&mut values)));
    }

    let mut df = DataFrame::new();
    df.add_column(REGION_COLUMN, regions)?;
    df.add_numeric_column(MEDIAN_RENT_COLUMN, &medians)?;
    Ok(df)
}

/// Build the affordability table.
///
/// `income LEFT JOIN median rent ON ZIP`, then `LEFT JOIN burden ON ZIP`;
/// `rent_to_income` is NA when either side is missing or income is zero.
pub fn clean_and_merge(rent: &DataFrame, income: &DataFrame, burden: &DataFrame) -> Result<DataFrame> {
    income.require_columns("income", &[REGION_COLUMN, MONTHLY_INCOME_COLUMN])?;
    burden.require_columns("rent_burden", &[REGION_COLUMN])?;

    let medians = median_rent(rent)?;
    let mut merged = income
        .left_join(&medians, REGION_COLUMN)?
        .left_join(burden, REGION_COLUMN)?;

    let (rents, _) = merged.get_column_numeric_values(MEDIAN_RENT_COLUMN)?;
    let (incomes, _) = merged.get_column_numeric_values(MONTHLY_INCOME_COLUMN)?;
    let ratios: Vec<NA<f64>> = rents
        .into_iter()
        .zip(incomes)
        .map(|(rent, income)| rent / income)
        .collect();
    let with_ratio = ratios.iter().filter(|r| r.is_value()).count();
    merged.add_numeric_column(RATIO_COLUMN, &ratios)?;

    log::info!(
        "merged {} income row(s); {} have a rent-to-income ratio",
        merged.row_count(),
        with_ratio
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(headers: &[&str], rows: &[&[&str]]) -> DataFrame {
        DataFrame::from_records(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_median_rent_pools_rows_and_skips_gaps() {
        let rent = frame(
            &["ZIP", "Metro", "2015-01", "2015-02", "2015-03"],
            &[
                &["98101", "Seattle", "1000", "", "3000"],
                &["98101", "Seattle", "2000", "", ""],
                &["98102", "Seattle", "", "", ""],
            ],
        );
        let df = median_rent(&rent).unwrap();
        assert_eq!(df.row_count(), 2);
        assert_eq!(df.row(0).unwrap(), vec!["98101", "2000"]);
        assert_eq!(df.row(1).unwrap(), vec!["98102", ""]);
    }

    #[test]
    fn test_clean_and_merge() {
        let rent = frame(
            &["ZIP", "Metro", "2015-01", "2015-02"],
            &[&["98101", "Seattle", "2000", "2200"], &["98103", "Seattle", "1500", "1500"]],
        );
        let income = frame(
            &["ZIP", "Metro", "MonthlyMedianIncome"],
            &[
                &["98101", "Seattle", "7000"],
                &["98102", "Seattle", "5000"],
                &["98103", "Seattle", "0"],
            ],
        );
        let burden = frame(
            &["ZIP", "TotalHouseholds"],
            &[&["98101", "100"], &["98102", "50"]],
        );

        let merged = clean_and_merge(&rent, &income, &burden).unwrap();
        assert_eq!(
            merged.column_names(),
            &["ZIP", "Metro", "MonthlyMedianIncome", "MedianRent", "TotalHouseholds", "rent_to_income"]
        );
        assert_eq!(merged.row_count(), 3);
        assert_eq!(merged.row(0).unwrap(), vec!["98101", "Seattle", "7000", "2100", "100", "0.3"]);
        // no rent for 98102, no burden row and zero income for 98103
        assert_eq!(merged.row(1).unwrap(), vec!["98102", "Seattle", "5000", "", "50", ""]);
        assert_eq!(merged.row(2).unwrap(), vec!["98103", "Seattle", "0", "1500", "", ""]);
    }

    #[test]
    fn test_income_without_zip_is_schema_error() {
        let empty = DataFrame::new();
        let income = frame(&["Metro", "MonthlyMedianIncome"], &[&["Seattle", "1"]]);
        let burden = frame(&["ZIP"], &[]);
        assert!(matches!(
            clean_and_merge(&empty, &income, &burden),
            Err(crate::error::Error::InputSchema { .. })
        ));
    }
}
