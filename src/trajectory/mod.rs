//! Trajectory Module: Integrated Paths and Ensembles
//!
//! A [`Trajectory`] is the sampled solution of one initial condition; a
//! [`TrajectorySet`] integrates many initial conditions against the same
//! vector field and grid, in parallel, keeping each failure local to the
//! entry that produced it.

mod path;
mod set;

pub use path::Trajectory;
pub use set::{random_initial_states, TrajectoryEntry, TrajectoryOutcome, TrajectorySet};
