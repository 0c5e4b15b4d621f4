use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Linear Inverse Model fitting and stochastic forecasting.
#[derive(Parser)]
#[command(
    name = "lim",
    version,
    about = "Linear Inverse Model fitting and stochastic forecasting"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Fit a model and write its propagators as JSON.
    Fit(FitArgs),
    /// Fit a model and write an ensemble forecast to Parquet.
    Simulate(SimulateArgs),
    /// Compute autocorrelation and lag-sensitivity diagnostics.
    Diagnose(DiagnoseArgs),
}

/// Arguments for the `fit` subcommand.
#[derive(clap::Args)]
pub struct FitArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "lim.toml")]
    pub config: PathBuf,

    /// Path for the fit report JSON (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the model lag from config.
    #[arg(short, long)]
    pub lag: Option<usize>,
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "lim.toml")]
    pub config: PathBuf,

    /// Override output Parquet path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Integrate without residual noise.
    #[arg(long)]
    pub deterministic: bool,
}

/// Arguments for the `diagnose` subcommand.
#[derive(clap::Args)]
pub struct DiagnoseArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "lim.toml")]
    pub config: PathBuf,

    /// Path for diagnostics JSON output (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
