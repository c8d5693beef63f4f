use csv::{ReaderBuilder, Trim, Writer};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::DataFrame;

/// Read a CSV file with a header row into a DataFrame.
///
/// Cells are trimmed; short rows are padded with empty cells.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(Error::Csv)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(Error::Csv)?;
        records.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    log::debug!(
        "read {} row(s) x {} column(s) from {}",
        records.len(),
        headers.len(),
        path.as_ref().display()
    );
    DataFrame::from_records(headers, records)
}

/// A CSV written to a temporary file beside its destination.
///
/// Nothing is visible at the destination until `commit`; dropping an
/// uncommitted file removes it.
#[derive(Debug)]
pub struct StagedCsv {
    tmp: NamedTempFile,
    path: PathBuf,
}

impl StagedCsv {
    /// Final destination
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the temporary file over the destination
    pub fn commit(self) -> Result<PathBuf> {
        let StagedCsv { tmp, path } = self;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;
        Ok(path)
    }
}

/// Write a DataFrame to a temporary file in the directory of `path`.
///
/// `commit` then replaces `path` atomically, so a failed run never leaves
/// a truncated file behind.
pub fn stage_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<StagedCsv> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(Error::Io)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(Error::Io)?;
    {
        let mut wtr = Writer::from_writer(tmp.as_file_mut());
        wtr.write_record(df.column_names()).map_err(Error::Csv)?;

        for i in 0..df.row_count() {
            if let Some(row) = df.row(i) {
                wtr.write_record(&row).map_err(Error::Csv)?;
            }
        }
        wtr.flush().map_err(Error::Io)?;
    }

    log::debug!("staged {} row(s) for {}", df.row_count(), path.display());
    Ok(StagedCsv {
        tmp,
        path: path.to_path_buf(),
    })
}
