//! Time grid: the points at which trajectories are reported.

use serde::Serialize;

use crate::error::{Result, SimulationError};

/// Strictly increasing, finite sequence of time points (length ≥ 1)
///
/// A grid is validated when built, so every `TimeGrid` in circulation is
/// well-formed. A single-point grid is the degenerate case: integrating over
/// it returns only the initial state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// Build a grid from explicit time points
    pub fn new(points: Vec<f64>) -> Result<Self> {
        if points.is_empty() {
            return Err(SimulationError::InvalidTimeGrid {
                reason: "grid needs at least one time point".into(),
            });
        }

        if let Some(i) = points.iter().position(|t| !t.is_finite()) {
            return Err(SimulationError::InvalidTimeGrid {
                reason: format!("time point {} is not finite ({})", i, points[i]),
            });
        }

        if let Some(i) = points.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SimulationError::InvalidTimeGrid {
                reason: format!(
                    "time points must be strictly increasing (t[{}] = {} >= t[{}] = {})",
                    i,
                    points[i],
                    i + 1,
                    points[i + 1]
                ),
            });
        }

        Ok(Self { points })
    }

    /// `count` evenly spaced points over `[start, end]`, both ends included
    ///
    /// `count == 1` yields `[start]`.
    pub fn linspace(start: f64, end: f64, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(SimulationError::InvalidTimeGrid {
                reason: "grid needs at least one time point".into(),
            });
        }
        if count == 1 {
            return Self::new(vec![start]);
        }

        let step = (end - start) / (count - 1) as f64;
        let mut points: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
        // Pin the endpoint against accumulated rounding
        points[count - 1] = end;

        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.points.get(index).copied()
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    pub fn span(&self) -> f64 {
        self.end() - self.start()
    }

    /// True when consecutive spacings agree to a relative tolerance
    pub fn is_uniform(&self, rel_tol: f64) -> bool {
        if self.points.len() < 3 {
            return true;
        }
        let h0 = self.points[1] - self.points[0];
        self.points
            .windows(2)
            .all(|w| ((w[1] - w[0]) - h0).abs() <= rel_tol * h0.abs())
    }
}

impl std::ops::Index<usize> for TimeGrid {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.points[index]
    }
}
