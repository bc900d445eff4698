//! Batches of trajectories sharing one time grid.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Result, SimulationError};
use crate::integrate::{IntegrationFailure, IntegrationStats, Integrator, TimeGrid};
use crate::systems::{State, VectorField};

use super::path::Trajectory;

/// How one initial condition fared
#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryOutcome {
    Completed(Trajectory),
    /// `partial_states[i]` is the state at `grid[i]`
    Failed {
        error: SimulationError,
        partial_states: Vec<State>,
    },
}

/// One member of a [`TrajectorySet`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryEntry {
    /// Position in the set (order of the supplied or drawn initial states)
    pub id: usize,
    pub initial_state: State,
    pub outcome: TrajectoryOutcome,
}

impl TrajectoryEntry {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TrajectoryOutcome::Completed(_))
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        match &self.outcome {
            TrajectoryOutcome::Completed(traj) => Some(traj),
            TrajectoryOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&SimulationError> {
        match &self.outcome {
            TrajectoryOutcome::Completed(_) => None,
            TrajectoryOutcome::Failed { error, .. } => Some(error),
        }
    }

    /// Valid states on the grid prefix, whether or not integration finished
    pub fn states(&self) -> &[State] {
        match &self.outcome {
            TrajectoryOutcome::Completed(traj) => traj.states(),
            TrajectoryOutcome::Failed { partial_states, .. } => partial_states,
        }
    }
}

/// Ordered, immutable collection of trajectories over one shared grid
///
/// Integration failures stay local to their entry: siblings always run to
/// completion and the set reports how many succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySet {
    grid: Arc<TimeGrid>,
    entries: Vec<TrajectoryEntry>,
}

impl TrajectorySet {
    /// Integrate every initial state independently, in parallel
    ///
    /// Entry `i` of the result belongs to `initial_states[i]`.
    pub fn from_initial_states<F>(
        integrator: &Integrator,
        field: &F,
        grid: &Arc<TimeGrid>,
        initial_states: &[State],
    ) -> Self
    where
        F: VectorField + ?Sized,
    {
        let entries: Vec<TrajectoryEntry> = initial_states
            .par_iter()
            .enumerate()
            .map(|(id, &initial_state)| {
                let outcome = integrate_entry(integrator, field, grid, id, initial_state);
                TrajectoryEntry {
                    id,
                    initial_state,
                    outcome,
                }
            })
            .collect();

        let set = Self {
            grid: Arc::clone(grid),
            entries,
        };

        info!(
            field = field.name(),
            trajectories = set.len(),
            succeeded = set.success_count(),
            failed = set.failure_count(),
            grid_points = grid.len(),
            "integrated trajectory set"
        );

        set
    }

    /// Integrate `count` initial states drawn uniformly from `[0, cube_size)³`
    ///
    /// The draw is fully determined by `seed`; equal seeds give equal sets.
    pub fn generate_random<F>(
        integrator: &Integrator,
        field: &F,
        grid: &Arc<TimeGrid>,
        count: usize,
        cube_size: f64,
        seed: u64,
    ) -> Result<Self>
    where
        F: VectorField + ?Sized,
    {
        let initial_states = random_initial_states(count, cube_size, seed)?;
        Ok(Self::from_initial_states(
            integrator,
            field,
            grid,
            &initial_states,
        ))
    }

    pub fn grid(&self) -> &Arc<TimeGrid> {
        &self.grid
    }

    pub fn entries(&self) -> &[TrajectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&TrajectoryEntry> {
        self.entries.get(id)
    }

    /// Completed trajectory for `id`, if it exists and succeeded
    pub fn trajectory(&self, id: usize) -> Option<&Trajectory> {
        self.get(id).and_then(TrajectoryEntry::trajectory)
    }

    /// `(id, trajectory)` for every successful entry, in order
    pub fn completed(&self) -> impl Iterator<Item = (usize, &Trajectory)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.trajectory().map(|traj| (e.id, traj)))
    }

    pub fn initial_states(&self) -> Vec<State> {
        self.entries.iter().map(|e| e.initial_state).collect()
    }

    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    /// Solver counters summed over successful entries
    pub fn total_stats(&self) -> IntegrationStats {
        let mut total = IntegrationStats::default();
        for (_, traj) in self.completed() {
            total += *traj.stats();
        }
        total
    }
}

fn integrate_entry<F>(
    integrator: &Integrator,
    field: &F,
    grid: &Arc<TimeGrid>,
    id: usize,
    initial_state: State,
) -> TrajectoryOutcome
where
    F: VectorField + ?Sized,
{
    match integrator.integrate(field, initial_state, grid) {
        Ok(traj) => TrajectoryOutcome::Completed(traj),
        Err(IntegrationFailure {
            error,
            partial_states,
            ..
        }) => {
            warn!(
                id,
                initial = ?initial_state,
                %error,
                recovered = partial_states.len(),
                "trajectory integration failed"
            );
            TrajectoryOutcome::Failed {
                error,
                partial_states,
            }
        }
    }
}

/// `count` states uniform in `[0, cube_size)³`, x then y then z per state
pub fn random_initial_states(count: usize, cube_size: f64, seed: u64) -> Result<Vec<State>> {
    if !(cube_size.is_finite() && cube_size > 0.0) {
        return Err(SimulationError::InvalidConfig(format!(
            "cube size must be positive and finite, got {}",
            cube_size
        )));
    }

    let uniform = Uniform::new(0.0, cube_size)
        .map_err(|e| SimulationError::InvalidConfig(format!("cube size {}: {}", cube_size, e)))?;
    let mut rng = StdRng::seed_from_u64(seed);

    Ok((0..count)
        .map(|_| {
            let x = uniform.sample(&mut rng);
            let y = uniform.sample(&mut rng);
            let z = uniform.sample(&mut rng);
            State::new(x, y, z)
        })
        .collect())
}
