//! A single integrated trajectory.

use ndarray::Array2;
use std::sync::Arc;

use crate::integrate::{IntegrationStats, TimeGrid};
use crate::systems::State;

/// States of one initial condition sampled on a shared [`TimeGrid`]
///
/// `states()[i]` is the state at `grid()[i]`; the two always have the same
/// length and `states()[0]` is the initial condition exactly as supplied.
/// Trajectories are immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    grid: Arc<TimeGrid>,
    states: Vec<State>,
    stats: IntegrationStats,
}

impl Trajectory {
    pub(crate) fn new(grid: Arc<TimeGrid>, states: Vec<State>, stats: IntegrationStats) -> Self {
        debug_assert_eq!(grid.len(), states.len());
        Self { grid, states, stats }
    }

    pub fn grid(&self) -> &Arc<TimeGrid> {
        &self.grid
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn times(&self) -> &[f64] {
        self.grid.points()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, index: usize) -> Option<State> {
        self.states.get(index).copied()
    }

    pub fn initial_state(&self) -> State {
        self.states[0]
    }

    pub fn final_state(&self) -> State {
        self.states[self.states.len() - 1]
    }

    /// Solver diagnostics gathered while producing this trajectory
    pub fn stats(&self) -> &IntegrationStats {
        &self.stats
    }

    /// `(t, state)` pairs in time order
    pub fn iter(&self) -> impl Iterator<Item = (f64, &State)> + '_ {
        self.grid.points().iter().copied().zip(self.states.iter())
    }

    /// True when every state is finite
    pub fn is_finite(&self) -> bool {
        self.states.iter().all(State::is_finite)
    }

    /// Trajectory as an `n × 3` point cloud (columns x, y, z)
    pub fn to_array(&self) -> Array2<f64> {
        let n = self.states.len();
        let mut points = Array2::zeros((n, 3));

        for (i, s) in self.states.iter().enumerate() {
            points[[i, 0]] = s.x;
            points[[i, 1]] = s.y;
            points[[i, 2]] = s.z;
        }

        points
    }

    /// Axis-aligned bounding box `(min, max)` of all states
    pub fn bounds(&self) -> (State, State) {
        let mut lo = State::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut hi = State::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);

        for s in &self.states {
            lo = lo.zip_with(*s, f64::min);
            hi = hi.zip_with(*s, f64::max);
        }

        (lo, hi)
    }
}
