//! Integration tests: round-trip series and trajectories through Parquet.

use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, Float64Array, Int64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Float64Type, Schema, UInt32Type};
use lim_io::{
    Compression, IoError, ReaderConfig, StateSeries, WriterConfig, read_series, write_series,
    write_trajectories,
};
use ndarray::{Array2, array};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("pc{i}")).collect()
}

/// Writes a file with an integer `time` column followed by the given
/// nullable Float64 columns.
fn write_raw(path: &std::path::Path, cols: &[(&str, Vec<Option<f64>>)]) {
    let n = cols[0].1.len() as i64;
    let mut fields = vec![Field::new("time", DataType::Int64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int64Array::from((0..n).collect::<Vec<_>>()))];
    for (name, values) in cols {
        fields.push(Field::new(*name, DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(values.clone())));
    }
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn series_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("series.parquet");

    let data = Array2::from_shape_fn((3, 50), |(i, t)| (t as f64 * 0.1 + i as f64).sin());
    let series = StateSeries::new(names(3), data).unwrap();
    write_series(&path, &series, &WriterConfig::default()).expect("write succeeds");

    let back = read_series(&path, &ReaderConfig::default()).expect("read succeeds");
    assert_eq!(back, series);
}

#[test]
fn series_spanning_row_groups() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("groups.parquet");

    let data = Array2::from_shape_fn((2, 25), |(i, t)| (i * 100 + t) as f64);
    let series = StateSeries::new(names(2), data).unwrap();
    let config = WriterConfig::default()
        .with_row_group_size(7)
        .with_compression(Compression::Zstd);
    write_series(&path, &series, &config).expect("write succeeds");

    let back = read_series(&path, &ReaderConfig::default()).expect("read succeeds");
    assert_eq!(back.data(), series.data());
}

#[test]
fn selected_columns_set_dimension_order() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("pcs.parquet");
    write_raw(
        &path,
        &[
            ("pc1", vec![Some(1.0), Some(2.0), Some(3.0)]),
            ("pc2", vec![Some(4.0), Some(5.0), Some(6.0)]),
            ("pc3", vec![Some(7.0), Some(8.0), Some(9.0)]),
        ],
    );

    let all = read_series(&path, &ReaderConfig::default()).unwrap();
    assert_eq!(all.names(), &["pc1", "pc2", "pc3"]);
    assert_eq!(all.data().shape(), &[3, 3]);

    let config = ReaderConfig::default().with_columns(vec!["pc3".into(), "pc1".into()]);
    let picked = read_series(&path, &config).unwrap();
    assert_eq!(picked.names(), &["pc3", "pc1"]);
    assert_eq!(picked.data(), &array![[7.0, 8.0, 9.0], [1.0, 2.0, 3.0]]);
}

#[test]
fn nulls_and_nan_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("bad.parquet");
    write_raw(
        &path,
        &[
            ("pc1", vec![Some(1.0), None, Some(3.0)]),
            ("pc2", vec![Some(f64::NAN), Some(5.0), Some(f64::INFINITY)]),
        ],
    );

    let err = read_series(&path, &ReaderConfig::default()).unwrap_err();
    match err {
        IoError::Validation { count, details } => {
            assert_eq!(count, 3);
            assert!(details.contains("pc1 row 1 is null"));
            assert!(details.contains("pc2 row 0 is NaN"));
        }
        other => panic!("expected Validation error, got {other:?}"),
    }
}

#[test]
fn missing_column_reported() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("pcs.parquet");
    write_raw(&path, &[("pc1", vec![Some(1.0), Some(2.0)])]);

    let config = ReaderConfig::default().with_columns(vec!["pc7".into()]);
    let err = read_series(&path, &config).unwrap_err();
    assert!(matches!(err, IoError::MissingColumn { ref name, .. } if name == "pc7"));
}

#[test]
fn file_without_float_columns_is_empty() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("ints.parquet");
    let schema = Arc::new(Schema::new(vec![Field::new("time", DataType::Int64, false)]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(Int64Array::from(vec![0, 1, 2])) as ArrayRef],
    )
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let err = read_series(&path, &ReaderConfig::default()).unwrap_err();
    assert!(matches!(err, IoError::EmptySeries { .. }));
}

#[test]
fn trajectories_written_in_long_format() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("forecast.parquet");

    let members = vec![
        array![[1.0, 2.0, 3.0], [10.0, 20.0, 30.0]],
        array![[-1.0, -2.0, -3.0], [-10.0, -20.0, -30.0]],
    ];
    write_trajectories(&path, &names(2), &members, &WriterConfig::default())
        .expect("write succeeds");

    let file = std::fs::File::open(&path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<RecordBatch> = reader.collect::<Result<_, _>>().unwrap();

    let mut member = Vec::new();
    let mut step = Vec::new();
    let mut pc2 = Vec::new();
    for b in &batches {
        assert_eq!(b.schema().field(0).name(), "member");
        assert_eq!(b.schema().field(1).name(), "step");
        member.extend(b.column(0).as_primitive::<UInt32Type>().values().iter().copied());
        step.extend(b.column(1).as_primitive::<UInt32Type>().values().iter().copied());
        pc2.extend(b.column(3).as_primitive::<Float64Type>().values().iter().copied());
    }
    assert_eq!(member, vec![0, 0, 0, 1, 1, 1]);
    assert_eq!(step, vec![0, 1, 2, 0, 1, 2]);
    assert_eq!(pc2, vec![10.0, 20.0, 30.0, -10.0, -20.0, -30.0]);
}

#[test]
fn trajectories_with_wrong_dimensions_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("forecast.parquet");

    let members = vec![array![[1.0, 2.0, 3.0]]];
    let err = write_trajectories(&path, &names(2), &members, &WriterConfig::default()).unwrap_err();
    assert!(matches!(err, IoError::Validation { .. }));
    assert!(!path.exists());
}
