//! # lim-model
//!
//! Linear Inverse Model: a lag-τ linear propagator fitted from lagged
//! covariance statistics, a consistent unit-step propagator obtained by
//! matrix log/exp rescaling, and stochastic forward integration driven by
//! bootstrap-resampled residuals.
//!
//! ## Typestate Workflow
//!
//! ```mermaid
//! graph LR
//!     A["LimSpec::new(lag)"] -->|".fit(data.view())?"| B["LimFit"]
//!     B --> C[".propagator(): G"]
//!     B --> D[".unit_propagator(): G₁"]
//!     B --> E[".residuals(): e"]
//!     B --> F[".simulate(x0, n, stochastic, &mut rng)"]
//!     H["Lim::new(x0, data, lag, horizon)?"] -->|".build()? / .run()?"| B
//! ```
//!
//! ## Two Usage Paths
//!
//! **Typestate** (fit once, simulate many times):
//! ```ignore
//! let fit = LimSpec::new(3).fit(data.view())?;
//! let path = fit.simulate(x0.view(), 120, true, &mut rng)?;
//! ```
//!
//! **Container** (bound initial condition and horizon):
//! ```ignore
//! let mut model = Lim::new(x0.view(), data.view(), 3, 120)?;
//! model.build()?;
//! let path = model.run(true, &mut rng)?;
//! ```
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | C(0) | | Zero-lag covariance `x0·x0ᵀ` |
//! | C(τ) | | Lagged covariance `xτ·x0ᵀ` |
//! | G | [`LimFit::propagator()`] | Lag propagator `C(τ)·C(0)⁻¹` |
//! | G₁ | [`LimFit::unit_propagator()`] | Unit-step propagator `exp(log(G)/τ)` |
//! | e | [`LimFit::residuals()`] | D×(T−τ) one-step residuals |

mod error;
mod fit;
mod integrate;
mod model;
mod spec;

pub(crate) mod covariance;
pub(crate) mod linalg;
pub(crate) mod matrix_fn;
pub(crate) mod propagator;
pub(crate) mod residual;

pub use error::LimError;
pub use fit::LimFit;
pub use integrate::Resampling;
pub use model::Lim;
pub use spec::LimSpec;
