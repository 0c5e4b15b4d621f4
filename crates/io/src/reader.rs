//! High-level Parquet series reader.

use std::path::Path;

use ndarray::{Array2, ArrayView2};
use tracing::{debug, info};

use crate::error::IoError;
use crate::parquet_read;

/// Configuration for reading a state series from Parquet.
///
/// By default every `Float64` column is a state dimension, in schema order.
/// [`ReaderConfig::with_columns()`] selects and orders the dimensions
/// explicitly; other columns (time stamps, indices) are ignored either way.
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Column names to read, or `None` for all `Float64` columns.
    columns: Option<Vec<String>>,
}

impl ReaderConfig {
    /// Reads exactly these columns, in this order.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if an explicit column list is empty.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.columns.as_ref().is_some_and(Vec::is_empty) {
            return Err(IoError::Validation {
                count: 1,
                details: "column list must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// A named D×T state series: rows are dimensions, columns are time steps.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSeries {
    names: Vec<String>,
    data: Array2<f64>,
}

impl StateSeries {
    /// Pairs dimension names with a D×T matrix.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `names.len() != data.nrows()`.
    pub fn new(names: Vec<String>, data: Array2<f64>) -> Result<Self, IoError> {
        if names.len() != data.nrows() {
            return Err(IoError::Validation {
                count: 1,
                details: format!(
                    "{} name(s) for {} state dimension(s)",
                    names.len(),
                    data.nrows()
                ),
            });
        }
        Ok(Self { names, data })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn n_dims(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_times(&self) -> usize {
        self.data.ncols()
    }

    /// Consumes the series, returning names and data.
    pub fn into_parts(self) -> (Vec<String>, Array2<f64>) {
        (self.names, self.data)
    }
}

/// Read a state series from a Parquet file.
///
/// Each selected `Float64` column becomes one row of the returned D×T
/// matrix; Parquet rows are time steps, concatenated across row groups.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Parquet`] | the file cannot be opened or decoded |
/// | [`IoError::MissingColumn`] | a requested column is absent |
/// | [`IoError::Validation`] | wrong column type, duplicates, nulls, NaN or infinity |
/// | [`IoError::EmptySeries`] | no `Float64` columns or no rows |
pub fn read_series(path: &Path, config: &ReaderConfig) -> Result<StateSeries, IoError> {
    config.validate()?;

    let (schema, batches) = parquet_read::read_batches(path)?;
    let columns = parquet_read::resolve_columns(&schema, config.columns(), path)?;
    debug!(n_batches = batches.len(), n_columns = columns.len(), "parquet schema resolved");

    let n_times: usize = batches.iter().map(|b| b.num_rows()).sum();
    if columns.is_empty() || n_times == 0 {
        return Err(IoError::EmptySeries {
            path: path.to_path_buf(),
        });
    }

    let mut problems = Vec::new();
    let mut data = Array2::zeros((columns.len(), n_times));
    for (d, (index, name)) in columns.iter().enumerate() {
        let values = parquet_read::extract_column(&batches, *index, name, &mut problems);
        if values.len() == n_times {
            data.row_mut(d)
                .iter_mut()
                .zip(values)
                .for_each(|(dst, v)| *dst = v);
        }
    }
    if !problems.is_empty() {
        return Err(parquet_read::validation_error(&problems));
    }

    let names: Vec<String> = columns.into_iter().map(|(_, name)| name).collect();
    info!(
        path = %path.display(),
        n_dims = names.len(),
        n_times,
        "state series read"
    );
    StateSeries::new(names, data)
}
