use std::fmt;

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    /// Column names that look like dates: a separator or a 4-digit year
    static ref DATE_LIKE: Regex = Regex::new(r"[-/]|\d{4}").unwrap();
    static ref YEAR_MONTH: Regex = Regex::new(r"^(\d{4})[-/](\d{1,2})$").unwrap();
    static ref MONTH_YEAR: Regex = Regex::new(r"^(\d{1,2})[-/](\d{4})$").unwrap();
}

/// Day-bearing label formats, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A calendar month, the unit of the time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Parse(format!("month out of range: {}", month)));
        }
        Ok(Period { year, month })
    }

    /// Whether a column name looks like a time period at all.
    ///
    /// This is only a pre-filter; a label that passes must still `parse`.
    pub fn is_date_like(label: &str) -> bool {
        DATE_LIKE.is_match(label.trim())
    }

    /// Parse a column label into a calendar month.
    ///
    /// Accepts `YYYY-MM`, `YYYY/MM`, `MM/YYYY`, `YYYY-MM-DD`, `YYYY/MM/DD`
    /// and `M/D/YYYY`. The day, when present, is validated and discarded.
    pub fn parse(label: &str) -> Result<Self> {
        let label = label.trim();

        if let Some(caps) = YEAR_MONTH.captures(label) {
            return Self::from_parts(&caps[1], &caps[2], label);
        }
        if let Some(caps) = MONTH_YEAR.captures(label) {
            return Self::from_parts(&caps[2], &caps[1], label);
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(label, format) {
                return Ok(Period::from(date));
            }
        }

        Err(Error::Parse(format!("not a calendar month: '{}'", label)))
    }

    fn from_parts(year: &str, month: &str, label: &str) -> Result<Self> {
        let year = year
            .parse::<i32>()
            .map_err(|_| Error::Parse(format!("bad year in '{}'", label)))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| Error::Parse(format!("bad month in '{}'", label)))?;
        Period::new(year, month)
            .map_err(|_| Error::Parse(format!("not a calendar month: '{}'", label)))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month
    pub fn succ(&self) -> Self {
        self.plus_months(1)
    }

    pub fn plus_months(&self, months: usize) -> Self {
        let ordinal = self.ordinal() + months as i64;
        Period {
            year: ordinal.div_euclid(12) as i32,
            month: (ordinal.rem_euclid(12) + 1) as u32,
        }
    }

    /// Whole months from `earlier` to `self`; negative when `self` comes first
    pub fn months_since(&self, earlier: Period) -> i64 {
        self.ordinal() - earlier.ordinal()
    }

    /// Months since year 0, for arithmetic
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// `n` consecutive months starting with `self`
    pub fn range(self, n: usize) -> impl Iterator<Item = Period> {
        (0..n).map(move |i| self.plus_months(i))
    }
}

impl From<NaiveDate> for Period {
    fn from(date: NaiveDate) -> Self {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
