//! Simulate command: fit a model and write an ensemble forecast to Parquet.

use anyhow::{Context, Result, anyhow, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, info_span};

use lim_io::write_trajectories;

use crate::cli::SimulateArgs;
use crate::config::LimConfig;
use crate::convert;

/// Run the simulation pipeline.
pub fn run(args: SimulateArgs) -> Result<()> {
    let _cmd = info_span!("simulate").entered();

    let config = LimConfig::load(&args.config)?;
    let output = args
        .output
        .as_ref()
        .or(config.io.output.as_ref())
        .ok_or_else(|| anyhow!("no output path: provide --output or set [io] output"))?;
    if config.simulate.members == 0 {
        bail!("simulate.members must be at least 1");
    }
    let spec = convert::build_spec(&config.model, None)?;
    let writer_cfg = convert::build_writer_config(&config.io)?;
    let seed = args.seed.or(config.seed);
    let stochastic = config.simulate.stochastic && !args.deterministic;

    let series = config.read_input()?;
    let start = convert::parse_initial(&config.simulate.initial, series.n_times())?;
    let initial = series.data().column(start);

    let fit = spec.fit(series.view()).context("model fit failed")?;
    info!(lag = fit.lag(), n_dims = fit.n_dims(), "model fitted");

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let members = fit
        .simulate_ensemble(
            initial,
            config.model.horizon,
            config.simulate.members,
            stochastic,
            &mut rng,
        )
        .context("ensemble simulation failed")?;
    info!(
        n_members = members.len(),
        horizon = config.model.horizon,
        start,
        stochastic,
        "ensemble integrated"
    );

    let last = config.model.horizon - 1;
    let finals: Vec<Vec<f64>> = members.iter().map(|m| m.column(last).to_vec()).collect();
    let mean = lim_stats::ensemble_mean(&finals);
    let sd = lim_stats::ensemble_sd(&finals);
    for ((name, m), s) in series.names().iter().zip(&mean).zip(&sd) {
        debug!(dimension = %name, mean = *m, sd = *s, "final-step ensemble spread");
    }

    write_trajectories(output, series.names(), &members, &writer_cfg)
        .with_context(|| format!("failed to write Parquet: {}", output.display()))?;
    info!(path = %output.display(), "forecast written");

    Ok(())
}
