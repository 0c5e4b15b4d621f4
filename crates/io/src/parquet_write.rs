//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use ndarray::ArrayView2;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::IoError;

/// Builds the Arrow schema for trajectory output: `member`, `step`, then one
/// `Float64` column per state dimension.
pub(crate) fn build_trajectory_schema(names: &[String]) -> Schema {
    let mut fields = vec![
        Field::new("member", DataType::UInt32, false),
        Field::new("step", DataType::UInt32, false),
    ];
    fields.extend(names.iter().map(|n| Field::new(n, DataType::Float64, false)));
    Schema::new(fields)
}

/// Builds the Arrow schema for a wide series: one `Float64` column per
/// state dimension.
pub(crate) fn build_series_schema(names: &[String]) -> Schema {
    Schema::new(
        names
            .iter()
            .map(|n| Field::new(n, DataType::Float64, false))
            .collect::<Vec<_>>(),
    )
}

/// One `Float64` column per row of a D×N matrix.
fn state_columns(data: ArrayView2<'_, f64>) -> Vec<ArrayRef> {
    data.rows()
        .into_iter()
        .map(|row| Arc::new(Float64Array::from(row.to_vec())) as ArrayRef)
        .collect()
}

/// Converts one D×N trajectory into a long-format [`RecordBatch`] with N rows.
pub(crate) fn trajectory_to_record_batch(
    member: u32,
    trajectory: ArrayView2<'_, f64>,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let n = trajectory.ncols();
    let steps = u32::try_from(n).map_err(|_| IoError::Validation {
        count: 1,
        details: format!("{n} steps exceed the u32 step column"),
    })?;

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from(vec![member; n])),
        Arc::new(UInt32Array::from((0..steps).collect::<Vec<_>>())),
    ];
    columns.extend(state_columns(trajectory));

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Converts a D×T series into a wide [`RecordBatch`] with T rows.
pub(crate) fn series_to_record_batch(
    data: ArrayView2<'_, f64>,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    Ok(RecordBatch::try_new(
        Arc::new(schema.clone()),
        state_columns(data),
    )?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
