//! Integrate Module: Adaptive ODE Solution on a Time Grid
//!
//! Turns a [`VectorField`](crate::VectorField) and an initial state into a
//! [`Trajectory`](crate::Trajectory) sampled exactly on a [`TimeGrid`].
//!
//! ## Method
//!
//! The Lorenz flow alternates between slow drift around the two wings and
//! rapid curvature change when switching wings, so fixed-step schemes
//! either waste work or drift visibly over a 40-time-unit horizon. The
//! integrator therefore uses local error control:
//!
//! - **Non-stiff**: Dormand-Prince 5(4) with FSAL and dense output
//! - **Stiff**: Rosenbrock 2(3) W-method with the analytic Jacobian
//!
//! starting non-stiff and switching when Hairer's h·|λ| test fires, the same
//! strategy LSODA follows between Adams and BDF.
//!
//! Error control uses the weighted RMS norm
//!
//!   ‖e‖ = sqrt( (1/n) Σᵢ (eᵢ / (atol + rtol · max(|y₀ᵢ|, |y₁ᵢ|)))² )
//!
//! with defaults rtol = 1e-6, atol = 1e-8.

mod cancel;
mod control;
mod dopri5;
mod grid;
mod rosenbrock;
mod solver;

pub use cancel::CancelToken;
pub use control::{StepController, Tolerances};
pub use grid::TimeGrid;
pub use solver::{
    IntegrationFailure, IntegrationStats, Integrator, IntegratorOptions, Method, MethodSelection,
};
