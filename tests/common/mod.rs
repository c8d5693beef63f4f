//! Common test utilities module
//!
//! Provides temporary workspaces and raw source fixtures for pipeline tests.

#![allow(dead_code, unused_imports)]

pub mod test_utils;

pub use test_utils::{
    monthly_headers, pipeline_config, test_temp_dir, write_burden_fixture, write_csv_fixture,
    write_income_fixture, write_rent_fixture, TempTestDir,
};
