//! Separation between two trajectories and its exponential growth rate.

use ndarray::Array1;
use std::ops::Range;
use std::sync::Arc;

use crate::error::{Result, SimulationError};
use crate::integrate::TimeGrid;
use crate::trajectory::Trajectory;

/// Euclidean distance between two trajectories at every grid point
#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceSeries {
    grid: Arc<TimeGrid>,
    values: Vec<f64>,
}

/// Least-squares fit of ln d(t) = slope·t + intercept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationRate {
    /// Estimated growth rate (units of 1/time)
    pub slope: f64,
    /// ln d at t = 0 on the fitted line
    pub intercept: f64,
    /// Points that entered the fit (positive, finite divergence)
    pub samples: usize,
}

/// First point at which separation exceeds a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictabilityHorizon {
    pub index: usize,
    pub time: f64,
    pub divergence: f64,
}

impl DivergenceSeries {
    pub fn grid(&self) -> &Arc<TimeGrid> {
        &self.grid
    }

    /// `values()[i] = ‖a(tᵢ) − b(tᵢ)‖₂`
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Mean separation over `range`, `None` when the range is empty or out of bounds
    pub fn mean_over(&self, range: Range<usize>) -> Option<f64> {
        let slice = self.values.get(range)?;
        if slice.is_empty() {
            return None;
        }
        Some(slice.iter().sum::<f64>() / slice.len() as f64)
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(self.values.clone())
    }

    /// First grid point where divergence exceeds `threshold`
    pub fn predictability_horizon(&self, threshold: f64) -> Option<PredictabilityHorizon> {
        self.values
            .iter()
            .position(|&d| d > threshold)
            .map(|index| PredictabilityHorizon {
                index,
                time: self.grid[index],
                divergence: self.values[index],
            })
    }
}

/// Pointwise separation of two trajectories on the same grid
pub fn compare(a: &Trajectory, b: &Trajectory) -> Result<DivergenceSeries> {
    if !same_grid(a.grid(), b.grid()) {
        return Err(SimulationError::InvalidComparison {
            reason: format!(
                "trajectories use different time grids ({} and {} points)",
                a.grid().len(),
                b.grid().len()
            ),
        });
    }

    let values = a
        .states()
        .iter()
        .zip(b.states())
        .map(|(sa, sb)| sa.distance(sb))
        .collect();

    Ok(DivergenceSeries {
        grid: Arc::clone(a.grid()),
        values,
    })
}

fn same_grid(a: &Arc<TimeGrid>, b: &Arc<TimeGrid>) -> bool {
    Arc::ptr_eq(a, b) || a.points() == b.points()
}

/// Fit an exponential growth rate to the divergence over `fit_window`
///
/// Points with zero or non-finite divergence are skipped. Returns
/// `Ok(None)` when fewer than two usable points remain or they all share
/// one time; identical initial states therefore give `None` rather than a
/// spurious rate. The result is a finite-window diagnostic, not a
/// converged Lyapunov exponent.
pub fn estimate_exponential_rate(
    series: &DivergenceSeries,
    grid: &TimeGrid,
    fit_window: Range<usize>,
) -> Result<Option<SeparationRate>> {
    let len = series.len();
    if grid.len() != len {
        return Err(SimulationError::InvalidComparison {
            reason: format!(
                "series has {} points but grid has {}",
                len,
                grid.len()
            ),
        });
    }
    if grid.points() != series.grid().points() {
        return Err(SimulationError::InvalidComparison {
            reason: "grid differs from the one the series was sampled on".into(),
        });
    }
    if fit_window.start >= fit_window.end || fit_window.end > len {
        return Err(SimulationError::InvalidFitWindow {
            start: fit_window.start,
            end: fit_window.end,
            len,
        });
    }

    let samples: Vec<(f64, f64)> = fit_window
        .filter_map(|i| {
            let d = series.values[i];
            (d > 0.0 && d.is_finite()).then(|| (grid[i], d.ln()))
        })
        .collect();

    Ok(least_squares(&samples))
}

fn least_squares(samples: &[(f64, f64)]) -> Option<SeparationRate> {
    let n = samples.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let mean_t = samples.iter().map(|&(t, _)| t).sum::<f64>() / nf;
    let mean_y = samples.iter().map(|&(_, y)| y).sum::<f64>() / nf;

    let mut s_tt = 0.0;
    let mut s_ty = 0.0;
    for &(t, y) in samples {
        let dt = t - mean_t;
        s_tt += dt * dt;
        s_ty += dt * (y - mean_y);
    }

    if s_tt <= 0.0 {
        return None;
    }

    let slope = s_ty / s_tt;
    Some(SeparationRate {
        slope,
        intercept: mean_y - slope * mean_t,
        samples: n,
    })
}
