//! Source table loaders
//!
//! Each loader reads one raw file, checks the columns it depends on, renames
//! them onto the shared `ZIP` key and keeps the rows of the configured
//! metro. The `prepare_*` functions do the same on an already loaded
//! DataFrame.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::io::{read_csv, read_geojson_properties};
use crate::na::NA;
use crate::region::RegionId;

/// Join key shared by every table
pub const REGION_COLUMN: &str = "ZIP";
pub const METRO_COLUMN: &str = "Metro";
pub const MONTHLY_INCOME_COLUMN: &str = "MonthlyMedianIncome";

const RENT_REGION_COLUMN: &str = "RegionName";
const INCOME_SOURCE_COLUMN: &str = "Households - Median income (dollars)";
const ANNUAL_INCOME_COLUMN: &str = "AnnualMedianIncome";
const BURDEN_NAME_COLUMN: &str = "NAME";
const NOT_COMPUTED_COLUMN: &str = "HH_RentNotComputed";

/// ACS table B25070 variables and their output names
pub const RENT_BURDEN_RENAMES: &[(&str, &str)] = &[
    ("B25070_001E", "TotalHouseholds"),
    ("B25070_002E", "HH_RentLT10Pct"),
    ("B25070_003E", "HH_Rent10to14Pct"),
    ("B25070_004E", "HH_Rent15to19Pct"),
    ("B25070_005E", "HH_Rent20to24Pct"),
    ("B25070_006E", "HH_Rent25to29Pct"),
    ("B25070_007E", "HH_Rent30to34Pct"),
    ("B25070_008E", "HH_Rent35to39Pct"),
    ("B25070_009E", "HH_Rent40to49Pct"),
    ("B25070_010E", "HH_Rent50PlusPct"),
    ("B25070_011E", "HH_RentNotComputed"),
];

lazy_static! {
    static ref ZCTA: Regex = Regex::new(r"ZCTA5 (\d{5})").unwrap();
    static ref BURDEN_KEEP: Regex = Regex::new(r"^(ZIP|TotalHouseholds|HH_|Pct_)").unwrap();
}

/// Case-insensitive substring match; a blank metro never matches
pub fn matches_region(metro: &str, filter: &str) -> bool {
    let metro = metro.trim();
    !metro.is_empty() && metro.to_lowercase().contains(&filter.to_lowercase())
}

pub fn load_rent<P: AsRef<Path>>(path: P, region_filter: &str) -> Result<DataFrame> {
    prepare_rent(read_csv(path)?, region_filter)
}

/// Wide rent index: `RegionName` becomes `ZIP`, rows outside the metro go
pub fn prepare_rent(mut df: DataFrame, region_filter: &str) -> Result<DataFrame> {
    df.require_columns("rent", &[RENT_REGION_COLUMN, METRO_COLUMN])?;
    df.rename_columns("rent", &[(RENT_REGION_COLUMN, REGION_COLUMN)])?;
    df.map_column(REGION_COLUMN, RegionId::normalize)?;

    let filtered = df.filter_rows(METRO_COLUMN, |m| matches_region(m, region_filter))?;
    log::info!(
        "rent: kept {} of {} region rows matching '{}'",
        filtered.row_count(),
        df.row_count(),
        region_filter
    );
    Ok(filtered)
}

pub fn load_income<P: AsRef<Path>>(path: P, region_filter: &str) -> Result<DataFrame> {
    prepare_income(read_csv(path)?, region_filter)
}

/// Median income: annual figures become monthly, output is
/// `ZIP, Metro, MonthlyMedianIncome`
pub fn prepare_income(df: DataFrame, region_filter: &str) -> Result<DataFrame> {
    df.require_columns("income", &[REGION_COLUMN, METRO_COLUMN, INCOME_SOURCE_COLUMN])?;
    let mut df = df.select_columns(&[REGION_COLUMN, METRO_COLUMN, INCOME_SOURCE_COLUMN])?;
    df.rename_columns("income", &[(INCOME_SOURCE_COLUMN, ANNUAL_INCOME_COLUMN)])?;
    df.map_column(REGION_COLUMN, RegionId::normalize)?;

    let (annual, _) = df.get_column_numeric_values(ANNUAL_INCOME_COLUMN)?;
    let monthly: Vec<NA<f64>> = annual.iter().map(|a| a.map(|v| v / 12.0)).collect();
    df.add_numeric_column(MONTHLY_INCOME_COLUMN, &monthly)?;

    let filtered = df.filter_rows(METRO_COLUMN, |m| matches_region(m, region_filter))?;
    log::info!(
        "income: kept {} of {} rows matching '{}'",
        filtered.row_count(),
        df.row_count(),
        region_filter
    );
    filtered.select_columns(&[REGION_COLUMN, METRO_COLUMN, MONTHLY_INCOME_COLUMN])
}

pub fn load_rent_burden<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    prepare_rent_burden(read_csv(path)?)
}

/// ACS rent burden: ZIP codes are pulled out of `ZCTA5 nnnnn` labels and the
/// B25070 variables get readable, numeric columns
pub fn prepare_rent_burden(mut df: DataFrame) -> Result<DataFrame> {
    let mut required = vec![BURDEN_NAME_COLUMN];
    required.extend(RENT_BURDEN_RENAMES.iter().map(|(code, _)| *code));
    df.require_columns("rent_burden", &required)?;

    df.rename_columns("rent_burden", &[(BURDEN_NAME_COLUMN, REGION_COLUMN)])?;
    df.rename_columns("rent_burden", RENT_BURDEN_RENAMES)?;

    df.map_column(REGION_COLUMN, |name| {
        ZCTA.captures(name)
            .map(|caps| RegionId::normalize(&caps[1]))
            .unwrap_or_default()
    })?;
    let total = df.row_count();
    let mut df = df.filter_rows(REGION_COLUMN, |zip| !zip.is_empty())?;
    if df.row_count() < total {
        log::warn!(
            "rent_burden: {} row(s) without a ZCTA5 code dropped",
            total - df.row_count()
        );
    }

    let names: Vec<&str> = RENT_BURDEN_RENAMES.iter().map(|(_, name)| *name).collect();
    let failures = coerce_numeric_columns(&mut df, &names)?;
    if failures > 0 {
        log::warn!(
            "rent_burden: {} cell(s) were not numeric and are treated as missing",
            failures
        );
    }

    let mut df = df.select_columns_where(|name| BURDEN_KEEP.is_match(name));
    df.drop_column(NOT_COMPUTED_COLUMN)?;
    Ok(df)
}

/// Rewrite `columns` as numbers, unparseable cells becoming missing.
/// Returns how many non-blank cells failed to parse.
fn coerce_numeric_columns(df: &mut DataFrame, columns: &[&str]) -> Result<usize> {
    let mut failures = 0;
    for name in columns {
        let (values, failed) = df.get_column_numeric_values(name)?;
        df.replace_numeric_column(name, &values)?;
        failures += failed;
    }
    Ok(failures)
}

/// Neighborhood boundary properties, or `None` when the file is absent
pub fn load_neighborhoods<P: AsRef<Path>>(path: P) -> Result<Option<DataFrame>> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("no neighborhood boundaries at {}, skipping", path.display());
        return Ok(None);
    }
    let df = read_geojson_properties(path)?;
    log::info!("loaded {} neighborhood feature(s)", df.row_count());
    Ok(Some(df))
}
