//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use crate::config::{IoToml, ModelToml};

use lim_io::{Compression, ReaderConfig, WriterConfig};
use lim_model::{LimSpec, Resampling};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses a residual resampling mode name into the corresponding enum variant.
pub fn parse_resampling(s: &str) -> Result<Resampling> {
    match s.to_lowercase().as_str() {
        "independent" => Ok(Resampling::Independent),
        "joint" => Ok(Resampling::Joint),
        other => bail!("unknown resampling mode: {other:?}"),
    }
}

/// Resolves the `initial` setting to a column of a series with `n_times`
/// time steps.
pub fn parse_initial(s: &str, n_times: usize) -> Result<usize> {
    if n_times == 0 {
        bail!("cannot pick an initial condition from an empty series");
    }
    match s.to_lowercase().as_str() {
        "first" => Ok(0),
        "last" => Ok(n_times - 1),
        other => match other.parse::<usize>() {
            Ok(t) if t < n_times => Ok(t),
            Ok(t) => bail!("initial column {t} out of range for {n_times} time steps"),
            Err(_) => bail!("unknown initial condition: {other:?}"),
        },
    }
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> ReaderConfig {
    match io.columns {
        Some(ref cols) => ReaderConfig::default().with_columns(cols.clone()),
        None => ReaderConfig::default(),
    }
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoToml) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(io.row_group_size))
}

/// Builds a [`LimSpec`] from the TOML model configuration, with an optional
/// lag override.
pub fn build_spec(model: &ModelToml, lag: Option<usize>) -> Result<LimSpec> {
    let resampling = parse_resampling(&model.resampling)?;
    Ok(LimSpec::new(lag.unwrap_or(model.lag)).with_resampling(resampling))
}
