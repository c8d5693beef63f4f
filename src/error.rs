use thiserror::Error;

/// Error type for every stage of the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// A required column is absent from a loaded table. Aborts the run.
    #[error("input schema error: table '{table}' is missing required column '{column}'")]
    InputSchema { table: String, column: String },

    /// A label or cell could not be parsed. Callers that degrade gracefully
    /// log and count these instead of returning them.
    #[error("parse error: {0}")]
    Parse(String),

    /// Degenerate regression input reached the fitting step
    #[error("model fit error for region {region}: {reason}")]
    ModelFit { region: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("column error: {0}")]
    Column(String),

    #[error("data format error: {0}")]
    Format(String),

    #[error("consistency error: {0}")]
    Consistency(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),

    #[error("SQL error")]
    Sql(#[source] rusqlite::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a missing required column
    pub fn missing_column(table: &str, column: &str) -> Self {
        Error::InputSchema {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Sql(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
