//! High-level Parquet writer configuration and orchestration.

use std::path::Path;

use ndarray::Array2;
use parquet::file::properties::WriterProperties;
use tracing::info;

use crate::error::IoError;
use crate::parquet_write;
use crate::reader::StateSeries;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => parquet::basic::Compression::ZSTD(parquet::basic::ZstdLevel::try_new(3)?),
        })
    }
}

/// Configuration for writing series and trajectories to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn properties(&self) -> Result<WriterProperties, IoError> {
        Ok(WriterProperties::builder()
            .set_compression(self.compression.to_parquet()?)
            .set_max_row_group_size(self.row_group_size)
            .build())
    }
}

/// Checks dimension names and member shapes before anything is written.
fn validate_members(names: &[String], members: &[Array2<f64>]) -> Result<(), IoError> {
    let mut problems = Vec::new();
    if names.is_empty() {
        problems.push("at least one state dimension name is required".to_string());
    }
    for (i, name) in names.iter().enumerate() {
        if name == "member" || name == "step" {
            problems.push(format!("dimension name '{name}' clashes with an index column"));
        }
        if names[..i].contains(name) {
            problems.push(format!("dimension name '{name}' is duplicated"));
        }
    }
    if u32::try_from(members.len()).is_err() {
        problems.push(format!("{} members exceed the u32 member column", members.len()));
    }
    for (m, traj) in members.iter().enumerate() {
        if traj.nrows() != names.len() {
            problems.push(format!(
                "member {m} has {} dimension(s), expected {}",
                traj.nrows(),
                names.len()
            ));
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(IoError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        })
    }
}

/// Write ensemble trajectories to a Parquet file in long format.
///
/// Each D×N member becomes N rows `(member, step, x_1, ..., x_D)`, with the
/// dimension columns named by `names`.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid, a name is
/// duplicated or reserved, or a member's row count differs from
/// `names.len()`; [`IoError::Parquet`] if batch conversion or file I/O fails.
pub fn write_trajectories(
    path: &Path,
    names: &[String],
    members: &[Array2<f64>],
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;
    validate_members(names, members)?;

    let schema = parquet_write::build_trajectory_schema(names);
    let batches = members
        .iter()
        .zip(0u32..)
        .map(|(traj, member)| {
            parquet_write::trajectory_to_record_batch(member, traj.view(), &schema)
        })
        .collect::<Result<Vec<_>, _>>()?;

    parquet_write::write_batches(path, &batches, &schema, config.properties()?)?;
    info!(
        path = %path.display(),
        n_members = members.len(),
        n_dims = names.len(),
        "trajectories written"
    );
    Ok(())
}

/// Write a state series in the wide layout read by
/// [`read_series`](crate::read_series): one `Float64` column per dimension,
/// one row per time step.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid, or
/// [`IoError::Parquet`] if batch conversion or file I/O fails.
pub fn write_series(path: &Path, series: &StateSeries, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;

    let schema = parquet_write::build_series_schema(series.names());
    let batch = parquet_write::series_to_record_batch(series.data().view(), &schema)?;
    parquet_write::write_batches(path, &[batch], &schema, config.properties()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names() -> Vec<String> {
        vec!["pc1".to_string(), "pc2".to_string()]
    }

    #[test]
    fn default_config_values() {
        let config = WriterConfig::default();
        assert_eq!(config.compression(), Compression::Snappy);
        assert_eq!(config.row_group_size(), 1_000_000);
    }

    #[test]
    fn builder_methods() {
        let config = WriterConfig::default()
            .with_compression(Compression::Zstd)
            .with_row_group_size(500);
        assert_eq!(config.compression(), Compression::Zstd);
        assert_eq!(config.row_group_size(), 500);
    }

    #[test]
    fn validate_zero_row_group_size() {
        let config = WriterConfig::default().with_row_group_size(0);
        let err = config.validate().unwrap_err();
        match err {
            IoError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("row_group_size"));
            }
            _ => panic!("expected Validation error"),
        }
    }

    #[test]
    fn members_must_match_names() {
        let members = vec![array![[1.0, 2.0], [3.0, 4.0]], array![[1.0, 2.0]]];
        let err = validate_members(&names(), &members).unwrap_err();
        assert!(matches!(err, IoError::Validation { count: 1, .. }));
        assert!(err.to_string().contains("member 1 has 1 dimension(s), expected 2"));
    }

    #[test]
    fn reserved_and_duplicate_names_rejected() {
        let names = vec!["step".to_string(), "pc1".to_string(), "pc1".to_string()];
        let err = validate_members(&names, &[]).unwrap_err();
        assert!(matches!(err, IoError::Validation { count: 2, .. }));
    }

    #[test]
    fn empty_names_rejected() {
        let err = validate_members(&[], &[]).unwrap_err();
        assert!(err.to_string().contains("at least one state dimension"));
    }

    #[test]
    fn all_compressions_convert() {
        for c in [Compression::None, Compression::Snappy, Compression::Zstd] {
            assert!(c.to_parquet().is_ok());
        }
    }
}
