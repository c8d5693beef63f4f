//! Column-ordered table of string cells
//!
//! Source tables arrive as delimited text with a mix of identifier, label
//! and numeric columns. Cells are kept as text and converted on access, so
//! a loader can rename, filter and select columns before deciding which
//! ones are numeric.

pub mod join;

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::na::NA;

/// DataFrame: named columns of equal length, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    /// Column order
    columns: Vec<String>,
    /// Column name -> cell values
    data: HashMap<String, Vec<String>>,
    row_count: usize,
}

impl DataFrame {
    pub fn new() -> Self {
        DataFrame::default()
    }

    /// Build a DataFrame from a header row and records.
    ///
    /// Short records are padded with empty cells, extra cells are ignored.
    pub fn from_records(headers: Vec<String>, records: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(Error::Column(format!("duplicate column name: {}", header)));
            }
        }

        let mut columns: Vec<Vec<String>> = headers
            .iter()
            .map(|_| Vec::with_capacity(records.len()))
            .collect();

        for record in &records {
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(record.get(i).cloned().unwrap_or_default());
            }
        }

        let row_count = records.len();
        let data = headers.iter().cloned().zip(columns).collect();
        Ok(DataFrame {
            columns: headers,
            data,
            row_count,
        })
    }

    /// Append a column of text cells
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<String>) -> Result<()> {
        let name = name.into();
        if self.data.contains_key(&name) {
            return Err(Error::Column(format!("duplicate column name: {}", name)));
        }
        if !self.columns.is_empty() && values.len() != self.row_count {
            return Err(Error::Consistency(format!(
                "column '{}' has {} rows, expected {}",
                name,
                values.len(),
                self.row_count
            )));
        }

        self.row_count = values.len();
        self.columns.push(name.clone());
        self.data.insert(name, values);
        Ok(())
    }

    /// Append a numeric column; missing values are written as empty cells
    pub fn add_numeric_column(&mut self, name: impl Into<String>, values: &[NA<f64>]) -> Result<()> {
        self.add_column(name, values.iter().map(NA::to_field).collect())
    }

    /// Overwrite an existing column with numeric values, in place
    pub fn replace_numeric_column(&mut self, name: &str, values: &[NA<f64>]) -> Result<()> {
        let row_count = self.row_count;
        let cells = self
            .data
            .get_mut(name)
            .ok_or_else(|| Error::Column(format!("column not found: {}", name)))?;
        if values.len() != row_count {
            return Err(Error::Consistency(format!(
                "column '{}' has {} rows, expected {}",
                name,
                values.len(),
                row_count
            )));
        }
        *cells = values.iter().map(NA::to_field).collect();
        Ok(())
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    pub fn get_column(&self, name: &str) -> Option<&[String]> {
        self.data.get(name).map(Vec::as_slice)
    }

    /// Text values of a column
    pub fn get_column_string_values(&self, name: &str) -> Result<&[String]> {
        self.get_column(name)
            .ok_or_else(|| Error::Column(format!("column not found: {}", name)))
    }

    /// Numeric values of a column, coercing unparseable cells to NA.
    ///
    /// Returns the values together with the number of non-blank cells that
    /// failed to parse.
    pub fn get_column_numeric_values(&self, name: &str) -> Result<(Vec<NA<f64>>, usize)> {
        let cells = self.get_column_string_values(name)?;
        let mut failures = 0;
        let values = cells
            .iter()
            .map(|cell| {
                NA::parse_cell(cell).unwrap_or_else(|_| {
                    failures += 1;
                    NA::NA
                })
            })
            .collect();

        if failures > 0 {
            log::warn!(
                "column '{}': {} cell(s) were not numeric and are treated as missing",
                name,
                failures
            );
        }
        Ok((values, failures))
    }

    /// Cells of one row, in column order
    pub fn row(&self, index: usize) -> Option<Vec<&str>> {
        if index >= self.row_count {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|name| self.data[name][index].as_str())
                .collect(),
        )
    }

    /// Fail with `Error::InputSchema` unless every column is present
    pub fn require_columns(&self, table: &str, required: &[&str]) -> Result<()> {
        match required.iter().find(|c| !self.contains_column(c)) {
            Some(missing) => Err(Error::missing_column(table, missing)),
            None => Ok(()),
        }
    }

    /// Rename columns in place. Every source column must exist.
    pub fn rename_columns(&mut self, table: &str, renames: &[(&str, &str)]) -> Result<()> {
        for (from, to) in renames {
            if from == to {
                continue;
            }
            if !self.data.contains_key(*from) {
                return Err(Error::missing_column(table, from));
            }
            if self.data.contains_key(*to) {
                return Err(Error::Column(format!(
                    "cannot rename '{}' to existing column '{}'",
                    from, to
                )));
            }
            let values = self.data.remove(*from).unwrap_or_default();
            self.data.insert(to.to_string(), values);
            for name in self.columns.iter_mut().filter(|n| n.as_str() == *from) {
                *name = to.to_string();
            }
        }
        Ok(())
    }

    /// New DataFrame with the given columns, in the given order
    pub fn select_columns(&self, names: &[&str]) -> Result<DataFrame> {
        let mut result = DataFrame::new();
        for name in names {
            let values = self.get_column_string_values(name)?;
            result.add_column(*name, values.to_vec())?;
        }
        result.row_count = self.row_count;
        Ok(result)
    }

    /// New DataFrame with the columns whose names satisfy `keep`
    pub fn select_columns_where<F>(&self, keep: F) -> DataFrame
    where
        F: Fn(&str) -> bool,
    {
        let names: Vec<&str> = self
            .columns
            .iter()
            .map(String::as_str)
            .filter(|n| keep(n))
            .collect();
        let mut result = DataFrame::new();
        for name in names {
            result.columns.push(name.to_string());
            result.data.insert(name.to_string(), self.data[name].clone());
        }
        result.row_count = self.row_count;
        result
    }

    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        self.data
            .remove(name)
            .ok_or_else(|| Error::Column(format!("column not found: {}", name)))?;
        self.columns.retain(|c| c != name);
        if self.columns.is_empty() {
            self.row_count = 0;
        }
        Ok(())
    }

    /// Keep the rows whose cell in `column` satisfies `predicate`
    pub fn filter_rows<F>(&self, column: &str, predicate: F) -> Result<DataFrame>
    where
        F: Fn(&str) -> bool,
    {
        let keep: Vec<bool> = self
            .get_column_string_values(column)?
            .iter()
            .map(|cell| predicate(cell))
            .collect();
        Ok(self.take_rows(&keep))
    }

    /// Replace each cell of `column` with `f(cell)`
    pub fn map_column<F>(&mut self, column: &str, f: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        let values = self
            .data
            .get_mut(column)
            .ok_or_else(|| Error::Column(format!("column not found: {}", column)))?;
        for cell in values.iter_mut() {
            *cell = f(cell);
        }
        Ok(())
    }

    fn take_rows(&self, keep: &[bool]) -> DataFrame {
        let mut result = DataFrame {
            columns: self.columns.clone(),
            data: HashMap::with_capacity(self.columns.len()),
            row_count: keep.iter().filter(|k| **k).count(),
        };
        for name in &self.columns {
            let values = self.data[name]
                .iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| v.clone())
                .collect();
            result.data.insert(name.clone(), values);
        }
        result
    }
}
