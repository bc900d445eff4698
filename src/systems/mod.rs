//! Systems Module: Vector Fields for Trajectory Simulation
//!
//! Defines the phase-space [`State`], the [`VectorField`] trait the
//! integrator consumes, and the Lorenz system:
//!
//! - **Lorenz**: three-variable convection model, chaotic for σ = 10,
//!   β = 8/3, ρ = 28

mod lorenz;
mod state;
mod traits;

pub use lorenz::{LorenzParams, LorenzSystem};
pub use state::State;
pub use traits::{jacobian_norm, Jacobian, VectorField};
