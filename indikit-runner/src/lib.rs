//! Indikit Runner: batch evaluation over named data columns.
//!
//! This crate builds on `indikit-core` to provide:
//! - TOML batch files describing a list of indicator studies
//! - CSV datasets of named, equal-length columns
//! - Parallel (rayon) or sequential batch execution with a fingerprinted report
//! - JSON and row-aligned CSV export of reports

pub mod batch;
pub mod config;
pub mod dataset;
pub mod export;

pub use batch::{run_batch, BatchError, BatchReport, BatchRunner, NamedSeries, StudyOutcome};
pub use config::{BatchConfig, ConfigError, Fingerprint, StudyConfig};
pub use dataset::{Dataset, DatasetError};
pub use export::{export_csv, export_json, save_report, ReportPaths};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<BatchConfig>();
        assert_sync::<BatchConfig>();
        assert_send::<StudyConfig>();
        assert_sync::<StudyConfig>();
    }

    #[test]
    fn dataset_is_send_sync() {
        assert_send::<Dataset>();
        assert_sync::<Dataset>();
    }

    #[test]
    fn report_types_are_send_sync() {
        assert_send::<BatchReport>();
        assert_sync::<BatchReport>();
        assert_send::<StudyOutcome>();
        assert_sync::<StudyOutcome>();
    }

    #[test]
    fn runner_is_send_sync() {
        assert_send::<BatchRunner<'static>>();
        assert_sync::<BatchRunner<'static>>();
    }
}
