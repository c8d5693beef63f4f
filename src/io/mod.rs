pub mod csv;
pub mod json;
pub mod sql;

// Re-export commonly used functions
pub use csv::{read_csv, stage_csv, StagedCsv};
pub use json::read_geojson_properties;
pub use sql::{read_sql, write_tables};
