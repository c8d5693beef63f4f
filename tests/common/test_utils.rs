//! Test utilities for temporary workspaces and fixture files
//!
//! Each test gets its own directory under the system temp dir (respecting
//! TMPDIR, TEMP and TMP) that is removed when the guard is dropped.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rentrs::PipelineConfig;

static TEST_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Get the temporary directory, respecting environment variables
pub fn get_temp_dir() -> PathBuf {
    env::var("TMPDIR")
        .or_else(|_| env::var("TEMP"))
        .or_else(|_| env::var("TMP"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir())
}

/// Generate a unique test directory path
pub fn test_temp_dir(test_name: &str) -> PathBuf {
    let counter = TEST_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dirname = format!(
        "rentrs_test_dir_{}_{}_{}",
        test_name,
        std::process::id(),
        counter
    );
    get_temp_dir().join(dirname)
}

/// RAII wrapper for temporary test directories with automatic cleanup
pub struct TempTestDir {
    path: PathBuf,
    keep: bool,
}

impl TempTestDir {
    pub fn new(test_name: &str) -> std::io::Result<Self> {
        let path = test_temp_dir(test_name);
        fs::create_dir_all(&path)?;
        Ok(TempTestDir { path, keep: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the directory after drop (for debugging)
    pub fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for TempTestDir {
    fn drop(&mut self) {
        if !self.keep && self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

/// Write a CSV file from headers and rows; cells are written verbatim
pub fn write_csv_fixture(path: &Path, headers: &[&str], rows: &[Vec<String>]) {
    let mut content = headers.join(",");
    content.push('\n');
    for row in rows {
        content.push_str(&row.join(","));
        content.push('\n');
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(path, content).expect("Failed to write fixture CSV");
}

/// `n` month-end column labels starting January 2015
pub fn monthly_headers(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("{}-{:02}-28", 2015 + i / 12, i % 12 + 1))
        .collect()
}

/// Zillow-style wide rent file.
///
/// Each entry is `(zip, metro, monthly values)`; `None` is a blank cell.
pub fn write_rent_fixture(path: &Path, months: usize, regions: &[(&str, &str, Vec<Option<f64>>)]) {
    let labels = monthly_headers(months);
    let mut headers = vec!["RegionID", "SizeRank", "RegionName", "RegionType", "Metro"];
    headers.extend(labels.iter().map(String::as_str));

    let rows: Vec<Vec<String>> = regions
        .iter()
        .enumerate()
        .map(|(i, (zip, metro, values))| {
            let mut row = vec![
                i.to_string(),
                i.to_string(),
                zip.to_string(),
                "zip".to_string(),
                format!("\"{}\"", metro),
            ];
            row.extend((0..months).map(|m| {
                values
                    .get(m)
                    .copied()
                    .flatten()
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }));
            row
        })
        .collect();
    write_csv_fixture(path, &headers, &rows);
}

/// Income file: `(zip, metro, annual median income)`
pub fn write_income_fixture(path: &Path, rows: &[(&str, &str, &str)]) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(zip, metro, income)| {
            vec![
                zip.to_string(),
                format!("\"{}\"", metro),
                income.to_string(),
                "1".to_string(),
            ]
        })
        .collect();
    write_csv_fixture(
        path,
        &["ZIP", "Metro", "Households - Median income (dollars)", "Households"],
        &rows,
    );
}

/// ACS B25070 file with one row per ZIP; every bucket holds `households / 10`
pub fn write_burden_fixture(path: &Path, rows: &[(&str, u32)]) {
    let mut headers = vec!["GEO_ID", "NAME"];
    let codes: Vec<String> = (1..=11).map(|i| format!("B25070_{:03}E", i)).collect();
    headers.extend(codes.iter().map(String::as_str));

    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(zip, households)| {
            let mut row = vec![format!("860Z200US{}", zip), format!("ZCTA5 {}", zip)];
            row.push(households.to_string());
            row.extend((0..10).map(|_| (households / 10).to_string()));
            row
        })
        .collect();
    write_csv_fixture(path, &headers, &rows);
}

/// Config rooted in `root`: raw/, work/ and out/ subdirectories
pub fn pipeline_config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        raw_dir: root.join("raw"),
        work_dir: root.join("work"),
        out_dir: root.join("out"),
        ..PipelineConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_cleanup() {
        let path;
        {
            let dir = TempTestDir::new("cleanup").unwrap();
            path = dir.path().to_path_buf();
            fs::write(dir.path().join("a.txt"), "x").unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists(), "directory should be removed on drop");
    }

    #[test]
    fn test_monthly_headers() {
        let headers = monthly_headers(14);
        assert_eq!(headers[0], "2015-01-28");
        assert_eq!(headers[11], "2015-12-28");
        assert_eq!(headers[13], "2016-02-28");
    }
}
