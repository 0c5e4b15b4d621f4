//! # lim-io
//!
//! Read multivariate state series from Parquet and write forecast
//! trajectories back to Parquet. Bridges the columnar file layout into the
//! D×T `ndarray` matrices used by `lim-model`.

mod error;
mod parquet_read;
mod parquet_write;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{ReaderConfig, StateSeries, read_series};
pub use writer::{Compression, WriterConfig, write_series, write_trajectories};
