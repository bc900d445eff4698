//! Sensitivity Module: Divergence of Nearby Trajectories
//!
//! Quantifies sensitive dependence on initial conditions.
//!
//! ## Divergence Series
//!
//! For two trajectories a, b on one grid:
//!
//!   d(tᵢ) = ‖a(tᵢ) − b(tᵢ)‖₂
//!
//! ## Separation Rate
//!
//! On a chaotic attractor d grows roughly like d₀·e^{λt} until it saturates
//! at the attractor diameter. Fitting ln d(t) by least squares over a
//! window before saturation gives an estimate of λ. For the classic Lorenz
//! parameters the largest Lyapunov exponent is about 0.906.

mod comparator;

pub use comparator::{
    compare, estimate_exponential_rate, DivergenceSeries, PredictabilityHorizon, SeparationRate,
};
