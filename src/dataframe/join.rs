use std::collections::HashMap;

use super::DataFrame;
use crate::error::{Error, Result};

impl DataFrame {
    /// Left join on a shared key column: every row of `self`, with the
    /// matching rows of `other` where present.
    ///
    /// The key column appears once. Right-hand columns whose names clash
    /// with a left-hand column get a `_right` suffix. A left key with several
    /// right matches produces one row per match.
    pub fn left_join(&self, other: &DataFrame, on: &str) -> Result<DataFrame> {
        if !self.contains_column(on) {
            return Err(Error::Column(format!(
                "join column '{}' is missing from the left table",
                on
            )));
        }
        if !other.contains_column(on) {
            return Err(Error::Column(format!(
                "join column '{}' is missing from the right table",
                on
            )));
        }

        let left_keys = self.get_column_string_values(on)?;
        let right_keys = other.get_column_string_values(on)?;

        let mut right_index: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, key) in right_keys.iter().enumerate() {
            right_index.entry(key.as_str()).or_default().push(i);
        }

        // (left row, matching right row)
        let mut pairs: Vec<(usize, Option<usize>)> = Vec::with_capacity(left_keys.len());
        for (left_idx, key) in left_keys.iter().enumerate() {
            match right_index.get(key.as_str()) {
                Some(matches) => pairs.extend(matches.iter().map(|&r| (left_idx, Some(r)))),
                None => pairs.push((left_idx, None)),
            }
        }

        let mut result = DataFrame::new();
        for name in self.column_names() {
            let values = &self.data[name];
            result.add_column(
                name.clone(),
                pairs.iter().map(|(l, _)| values[*l].clone()).collect(),
            )?;
        }

        for name in other.column_names().iter().filter(|n| n.as_str() != on) {
            let values = &other.data[name];
            let result_name = if self.contains_column(name) {
                format!("{}_right", name)
            } else {
                name.clone()
            };
            result.add_column(
                result_name,
                pairs
                    .iter()
                    .map(|(_, r)| r.map(|r| values[r].clone()).unwrap_or_default())
                    .collect(),
            )?;
        }

        Ok(result)
    }
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
    fn test_left_join_keeps_unmatched_left_rows() {
        let left = frame(&["ZIP", "income"], &[&["1", "100"], &["2", "200"]]);
        let right = frame(&["ZIP", "rent"], &[&["1", "50"], &["3", "70"]]);

        let joined = left.left_join(&right, "ZIP").unwrap();
        assert_eq!(joined.row_count(), 2);
        assert_eq!(joined.column_names(), &["ZIP", "income", "rent"]);
        assert_eq!(joined.row(0).unwrap(), vec!["1", "100", "50"]);
        assert_eq!(joined.row(1).unwrap(), vec!["2", "200", ""]);
    }

    #[test]
    fn test_duplicate_matches_and_name_clash() {
        let left = frame(&["ZIP", "v"], &[&["1", "a"], &["2", "b"]]);
        let right = frame(&["ZIP", "v"], &[&["1", "x"], &["1", "y"]]);

        let joined = left.left_join(&right, "ZIP").unwrap();
        assert_eq!(joined.row_count(), 3);
        assert_eq!(joined.column_names(), &["ZIP", "v", "v_right"]);
        assert_eq!(joined.get_column("v_right").unwrap(), &["x", "y", ""]);
    }

    #[test]
    fn test_missing_join_column() {
        let left = frame(&["ZIP"], &[]);
        let right = frame(&["zip"], &[]);
        assert!(left.left_join(&right, "ZIP").is_err());
    }
}
