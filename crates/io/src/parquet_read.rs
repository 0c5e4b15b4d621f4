//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{DataType, Float64Type, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;

/// Maximum number of individual problems spelled out in a validation error.
const MAX_REPORTED: usize = 5;

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<(Schema, Vec<RecordBatch>), IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().as_ref().clone();
    let reader = builder.build()?;

    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;

    Ok((schema, batches))
}

/// Resolves the columns to read, as `(index, name)` pairs in output order.
///
/// With `requested = None` every `Float64` column is used, in schema order.
/// Requested columns must exist and be `Float64`.
///
/// # Errors
///
/// Returns [`IoError::MissingColumn`] for an unknown name, or
/// [`IoError::Validation`] for duplicates or non-`Float64` columns.
pub(crate) fn resolve_columns(
    schema: &Schema,
    requested: Option<&[String]>,
    path: &Path,
) -> Result<Vec<(usize, String)>, IoError> {
    let Some(requested) = requested else {
        return Ok(schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| f.data_type() == &DataType::Float64)
            .map(|(i, f)| (i, f.name().clone()))
            .collect());
    };

    let mut resolved = Vec::with_capacity(requested.len());
    let mut problems = Vec::new();
    for name in requested {
        let (index, field) = schema.column_with_name(name).ok_or_else(|| IoError::MissingColumn {
            name: name.clone(),
            path: path.to_path_buf(),
        })?;
        if field.data_type() != &DataType::Float64 {
            problems.push(format!(
                "column '{name}' has type {}, expected Float64",
                field.data_type()
            ));
        }
        if resolved.iter().any(|(i, _)| *i == index) {
            problems.push(format!("column '{name}' requested more than once"));
        }
        resolved.push((index, name.clone()));
    }

    if !problems.is_empty() {
        return Err(IoError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        });
    }
    Ok(resolved)
}

/// Concatenates one `Float64` column across all batches.
///
/// Nulls and non-finite values are collected as problems rather than
/// returned as data.
pub(crate) fn extract_column(
    batches: &[RecordBatch],
    index: usize,
    name: &str,
    problems: &mut Vec<String>,
) -> Vec<f64> {
    let mut values = Vec::new();
    let mut row = 0usize;
    for batch in batches {
        let Some(col) = batch.column(index).as_primitive_opt::<Float64Type>() else {
            problems.push(format!("column '{name}' is not Float64"));
            return values;
        };
        for i in 0..col.len() {
            if col.is_null(i) {
                problems.push(format!("{name} row {row} is null"));
            } else if !col.value(i).is_finite() {
                problems.push(format!("{name} row {row} is {}", col.value(i)));
            }
            values.push(col.value(i));
            row += 1;
        }
    }
    values
}

/// Builds a validation error from accumulated problems.
pub(crate) fn validation_error(problems: &[String]) -> IoError {
    let mut details = problems
        .iter()
        .take(MAX_REPORTED)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");
    if problems.len() > MAX_REPORTED {
        details.push_str(&format!("; and {} more", problems.len() - MAX_REPORTED));
    }
    IoError::Validation {
        count: problems.len(),
        details,
    }
}
