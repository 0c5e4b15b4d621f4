//! Diagnose command: autocorrelation and lag sweep over a Parquet series.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use lim_diagnostics::{diagnose, to_json};

use crate::cli::DiagnoseArgs;
use crate::config::LimConfig;
use crate::fit_cmd::emit;

/// Run the diagnostics pipeline.
pub fn run(args: DiagnoseArgs) -> Result<()> {
    let _cmd = info_span!("diagnose").entered();

    let config = LimConfig::load(&args.config)?;
    let series = config.read_input()?;

    let report = diagnose(
        series.view(),
        config.diagnose.row,
        &config.diagnose.lags,
        series.names(),
    )
    .context("diagnostics failed")?;
    info!(
        row = config.diagnose.row,
        n_lags = config.diagnose.lags.len(),
        "diagnostics computed"
    );

    let json = to_json(&report).context("failed to serialise diagnostics")?;
    emit(&json, args.output.as_deref())
}
