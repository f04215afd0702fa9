//! Batch execution: fan a set of studies out over the indicator registry.
//!
//! Studies are independent, so with `parallel` set they run on the rayon pool.
//! Results keep the order of the studies in the config either way, and the
//! first failing study fails the whole batch.

use indikit_core::{registry, EngineError, Registry};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{BatchConfig, ConfigError, Fingerprint, StudyConfig};
use crate::dataset::{Dataset, DatasetError};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("study '{label}': {source}")]
    Dataset {
        label: String,
        #[source]
        source: DatasetError,
    },

    #[error("study '{label}': {source}")]
    Engine {
        label: String,
        #[source]
        source: EngineError,
    },
}

/// One output series of a study.
#[derive(Debug, Clone, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Result of evaluating one study.
#[derive(Debug, Clone, Serialize)]
pub struct StudyOutcome {
    pub label: String,
    pub indicator: String,
    pub options: Vec<f64>,
    pub lookback: usize,
    /// Whether `outputs` were re-aligned to the dataset rows.
    pub padded: bool,
    pub outputs: Vec<NamedSeries>,
}

impl StudyOutcome {
    /// Dataset row of the first value in each output series.
    pub fn first_row(&self) -> usize {
        if self.padded {
            0
        } else {
            self.lookback
        }
    }
}

/// Everything produced by one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub fingerprint: Fingerprint,
    pub rows: usize,
    pub studies: Vec<StudyOutcome>,
}

impl BatchReport {
    pub fn study(&self, label: &str) -> Option<&StudyOutcome> {
        self.studies.iter().find(|s| s.label == label)
    }
}

/// Runs batches against one registry.
pub struct BatchRunner<'r> {
    registry: &'r Registry,
}

impl Default for BatchRunner<'static> {
    fn default() -> Self {
        Self::new(registry())
    }
}

impl<'r> BatchRunner<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Validates `config` and evaluates every study on `dataset`.
    pub fn run(&self, config: &BatchConfig, dataset: &Dataset) -> Result<BatchReport, BatchError> {
        self.run_with_progress(config, dataset, |_, _, _| {})
    }

    /// Like [`run`](Self::run), invoking the callback after each study with
    /// its index, the study count and the outcome. With `parallel` set the
    /// callback may be called from several threads and out of order.
    pub fn run_with_progress<F>(
        &self,
        config: &BatchConfig,
        dataset: &Dataset,
        progress_callback: F,
    ) -> Result<BatchReport, BatchError>
    where
        F: Fn(usize, usize, &StudyOutcome) + Send + Sync,
    {
        config.validate(self.registry)?;
        let fingerprint = config.fingerprint()?;
        let total = config.studies.len();
        info!(
            studies = total,
            rows = dataset.rows(),
            parallel = config.parallel,
            fingerprint = %fingerprint,
            "batch started"
        );

        let run_one = |(idx, study): (usize, &StudyConfig)| -> Result<StudyOutcome, BatchError> {
            let outcome = self.run_study(study, dataset, config.pad_outputs)?;
            progress_callback(idx, total, &outcome);
            Ok(outcome)
        };

        let studies: Vec<StudyOutcome> = if config.parallel {
            config
                .studies
                .par_iter()
                .enumerate()
                .map(run_one)
                .collect::<Result<Vec<_>, BatchError>>()?
        } else {
            config
                .studies
                .iter()
                .enumerate()
                .map(run_one)
                .collect::<Result<Vec<_>, BatchError>>()?
        };

        info!(studies = studies.len(), "batch finished");
        Ok(BatchReport {
            fingerprint,
            rows: dataset.rows(),
            studies,
        })
    }

    fn run_study(
        &self,
        study: &StudyConfig,
        dataset: &Dataset,
        pad: bool,
    ) -> Result<StudyOutcome, BatchError> {
        let label = study.label();
        let inputs = study
            .inputs
            .iter()
            .map(|column| dataset.column(column))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| BatchError::Dataset {
                label: label.to_string(),
                source,
            })?;

        let result = self
            .registry
            .evaluate(&study.indicator, &inputs, &study.options)
            .map_err(|source| BatchError::Engine {
                label: label.to_string(),
                source,
            })?;
        debug!(
            study = label,
            indicator = %study.indicator,
            lookback = result.lookback(),
            "study evaluated"
        );

        let lookback = result.lookback();
        let names = result.output_names();
        let series = if pad {
            result.padded()
        } else {
            result.into_outputs()
        };
        let outputs = names
            .iter()
            .zip(series)
            .map(|(name, values)| NamedSeries {
                name: name.to_string(),
                values,
            })
            .collect();

        Ok(StudyOutcome {
            label: label.to_string(),
            indicator: study.indicator.clone(),
            options: study.options.clone(),
            lookback,
            padded: pad,
            outputs,
        })
    }
}

/// Runs `config` on `dataset` against the built-in registry.
pub fn run_batch(config: &BatchConfig, dataset: &Dataset) -> Result<BatchReport, BatchError> {
    BatchRunner::default().run(config, dataset)
}
