use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::info;

use lim_io::{StateSeries, read_series};

use crate::convert;

/// Top-level LIM configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Model settings.
    #[serde(default)]
    pub model: ModelToml,

    /// Ensemble simulation settings.
    #[serde(default)]
    pub simulate: SimulateToml,

    /// Diagnostics settings.
    #[serde(default)]
    pub diagnose: DiagnoseToml,
}

impl LimConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse config TOML")
    }

    /// Reads the input series named by `[io] input`.
    pub fn read_input(&self) -> Result<StateSeries> {
        let input = self
            .io
            .input
            .as_ref()
            .ok_or_else(|| anyhow!("no input path in config [io] section"))?;
        info!(path = %input.display(), "reading state series");
        read_series(input, &convert::build_reader_config(&self.io))
            .with_context(|| format!("failed to read Parquet: {}", input.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// State dimension columns, in order. All `Float64` columns if unset.
    pub columns: Option<Vec<String>>,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            columns: None,
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    #[serde(default = "default_lag")]
    pub lag: usize,
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default = "default_resampling")]
    pub resampling: String,
}

impl Default for ModelToml {
    fn default() -> Self {
        Self {
            lag: default_lag(),
            horizon: default_horizon(),
            resampling: default_resampling(),
        }
    }
}

fn default_lag() -> usize {
    1
}
fn default_horizon() -> usize {
    100
}
fn default_resampling() -> String {
    "independent".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulateToml {
    #[serde(default = "default_members")]
    pub members: usize,
    #[serde(default = "default_true")]
    pub stochastic: bool,
    /// Column of the input series to start from: `"first"`, `"last"`, or
    /// an index.
    #[serde(default = "default_initial")]
    pub initial: String,
}

impl Default for SimulateToml {
    fn default() -> Self {
        Self {
            members: default_members(),
            stochastic: true,
            initial: default_initial(),
        }
    }
}

fn default_members() -> usize {
    100
}
fn default_true() -> bool {
    true
}
fn default_initial() -> String {
    "last".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnoseToml {
    #[serde(default)]
    pub row: usize,
    #[serde(default = "default_diagnose_lags")]
    pub lags: Vec<usize>,
}

impl Default for DiagnoseToml {
    fn default() -> Self {
        Self {
            row: 0,
            lags: default_diagnose_lags(),
        }
    }
}

fn default_diagnose_lags() -> Vec<usize> {
    (0..=5).collect()
}
