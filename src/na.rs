use std::fmt::{self, Debug, Display};
use std::ops::Div;

use crate::error::{Error, Result};

/// A value that may be missing (NA, Not Available)
///
/// Survey and index tables leave cells blank or write `NA`/`NaN` when a
/// figure is unavailable. `NA<T>` keeps that distinction in the type system
/// instead of encoding it as `f64::NAN`.
#[derive(Clone, Copy, PartialEq)]
pub enum NA<T> {
    /// The value is present
    Value(T),
    /// The value is missing
    NA,
}

impl<T> NA<T> {
    pub fn is_na(&self) -> bool {
        matches!(self, NA::NA)
    }

    pub fn is_value(&self) -> bool {
        !self.is_na()
    }

    /// Borrow the value if present
    pub fn value(&self) -> Option<&T> {
        match self {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }

    pub fn map<U, F>(&self, f: F) -> NA<U>
    where
        F: FnOnce(&T) -> U,
    {
        match self {
            NA::Value(v) => NA::Value(f(v)),
            NA::NA => NA::NA,
        }
    }
}

impl NA<f64> {
    /// Parse a numeric cell.
    ///
    /// Blank cells and the usual missing markers (`NA`, `NaN`, `null`, `-`)
    /// are `Ok(NA::NA)`. Any other text that is not a number is a
    /// `Error::Parse`; callers coerce it to NA after counting it.
    pub fn parse_cell(cell: &str) -> Result<NA<f64>> {
        let trimmed = cell.trim();
        if is_missing_marker(trimmed) {
            return Ok(NA::NA);
        }

        let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(NA::Value(v)),
            Ok(_) => Ok(NA::NA),
            Err(_) => Err(Error::Parse(format!("not a number: '{}'", trimmed))),
        }
    }

    /// Render as a CSV field: missing values become an empty field
    pub fn to_field(&self) -> String {
        match self {
            NA::Value(v) => v.to_string(),
            NA::NA => String::new(),
        }
    }
}

fn is_missing_marker(s: &str) -> bool {
    s.is_empty()
        || s == "-"
        || s.eq_ignore_ascii_case("na")
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
}

impl<T> From<T> for NA<T> {
    fn from(value: T) -> Self {
        NA::Value(value)
    }
}

impl<T> From<Option<T>> for NA<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => NA::Value(v),
            None => NA::NA,
        }
    }
}

impl<T> From<NA<T>> for Option<T> {
    fn from(na: NA<T>) -> Self {
        match na {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

impl<T: Debug> Debug for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{:?}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: Display> Display for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

// Division by zero yields NA, as does a missing operand
impl Div for NA<f64> {
    type Output = NA<f64>;

    fn div(self, other: Self) -> Self::Output {
        match (self, other) {
            (NA::Value(_), NA::Value(b)) if b == 0.0 => NA::NA,
            (NA::Value(a), NA::Value(b)) => NA::Value(a / b),
            _ => NA::NA,
        }
    }
}
