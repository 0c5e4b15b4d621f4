//! Fit command: fit a model to a Parquet series and report its propagators.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use lim_diagnostics::{FitReport, to_json};

use crate::cli::FitArgs;
use crate::config::LimConfig;
use crate::convert;

/// Run the fit pipeline.
pub fn run(args: FitArgs) -> Result<()> {
    let _cmd = info_span!("fit").entered();

    let config = LimConfig::load(&args.config)?;
    let spec = convert::build_spec(&config.model, args.lag)?;
    let series = config.read_input()?;

    let fit = spec.fit(series.view()).context("model fit failed")?;
    info!(lag = fit.lag(), n_dims = fit.n_dims(), "model fitted");

    let json = to_json(&FitReport::new(&fit, series.names()))
        .context("failed to serialise fit report")?;
    emit(&json, args.output.as_deref())
}

/// Writes `json` to `output`, or to stdout when no path is given.
pub(crate) fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
