//! Named input columns for a batch.
//!
//! Every column has the same number of rows. CSV files carry the column
//! names in their header row; an empty cell reads as NaN.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("no column named '{0}'")]
    MissingColumn(String),
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: BTreeMap<String, Vec<f64>>,
    rows: usize,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column. The first column fixes the row count.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), DatasetError> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(DatasetError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(DatasetError::LengthMismatch {
                column: name,
                expected: self.rows,
                actual: values.len(),
            });
        }
        self.rows = values.len();
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        self.insert(name, values)?;
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Result<&[f64], DatasetError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, DatasetError> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DatasetError> {
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            for ((field, column), name) in record.iter().zip(values.iter_mut()).zip(&headers) {
                let field = field.trim();
                let v = if field.is_empty() {
                    f64::NAN
                } else {
                    field.parse().map_err(|_| DatasetError::InvalidNumber {
                        column: name.clone(),
                        row,
                        value: field.to_string(),
                    })?
                };
                column.push(v);
            }
        }

        let mut dataset = Self::new();
        for (name, column) in headers.into_iter().zip(values) {
            dataset.insert(name, column)?;
        }
        debug!(
            columns = dataset.columns.len(),
            rows = dataset.rows,
            "dataset loaded"
        );
        Ok(dataset)
    }
}
