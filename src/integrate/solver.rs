//! Grid-aligned adaptive integrator with automatic stiff/non-stiff switching
//!
//! The driver advances with Dormand-Prince 5(4) while the problem is
//! non-stiff and hands over to the Rosenbrock 2(3) W-method once the
//! stiffness test fires for enough consecutive steps (and back again once
//! h·‖J‖∞ stays small). Every accepted step reports the grid points it
//! covers through its continuous extension, so output lands exactly on the
//! requested times regardless of the internal step sequence.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::error::{Result, SimulationError};
use crate::systems::{State, VectorField};
use crate::trajectory::Trajectory;

use super::cancel::CancelToken;
use super::control::{StepController, Tolerances};
use super::dopri5::{self, DopriDense};
use super::grid::TimeGrid;
use super::rosenbrock::{self, RosenbrockDense};

/// Accepted stiff (or calm) steps in a row before switching method
const SWITCH_AFTER: u32 = 15;
/// Non-stiff steps that clear a partial run of stiff detections
const STIFF_RESET_AFTER: u32 = 6;

/// Which stepper(s) the integrator may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodSelection {
    /// Start non-stiff, switch on detected stiffness
    #[default]
    Auto,
    /// Dormand-Prince only
    NonStiff,
    /// Rosenbrock only
    Stiff,
}

/// Stepper currently in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    NonStiff,
    Stiff,
}

impl Method {
    fn order(self) -> u32 {
        match self {
            Method::NonStiff => dopri5::ORDER,
            Method::Stiff => rosenbrock::ORDER,
        }
    }
}

/// Solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorOptions {
    pub tolerances: Tolerances,
    pub method: MethodSelection,
    /// Internal steps allowed per trajectory
    pub max_steps: u64,
    /// Upper bound on the internal step size (defaults to the grid span)
    pub max_step: Option<f64>,
    /// First step size (defaults to an automatic estimate)
    pub initial_step: Option<f64>,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            method: MethodSelection::Auto,
            max_steps: 1_000_000,
            max_step: None,
            initial_step: None,
        }
    }
}

impl IntegratorOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerances.is_valid() {
            return Err(SimulationError::InvalidConfig(format!(
                "tolerances must be finite, non-negative and not both zero (rtol = {}, atol = {})",
                self.tolerances.relative, self.tolerances.absolute
            )));
        }
        if self.max_steps == 0 {
            return Err(SimulationError::InvalidConfig(
                "max_steps must be non-zero".into(),
            ));
        }
        for (name, value) in [("max_step", self.max_step), ("initial_step", self.initial_step)] {
            if let Some(h) = value {
                if !(h.is_finite() && h > 0.0) {
                    return Err(SimulationError::InvalidConfig(format!(
                        "{} must be positive and finite, got {}",
                        name, h
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Counters collected during one integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IntegrationStats {
    pub accepted_steps: u64,
    pub rejected_steps: u64,
    pub function_evals: u64,
    pub jacobian_evals: u64,
    /// Accepted steps taken by the stiff stepper
    pub stiff_steps: u64,
    pub method_switches: u32,
}

impl AddAssign for IntegrationStats {
    fn add_assign(&mut self, rhs: Self) {
        self.accepted_steps += rhs.accepted_steps;
        self.rejected_steps += rhs.rejected_steps;
        self.function_evals += rhs.function_evals;
        self.jacobian_evals += rhs.jacobian_evals;
        self.stiff_steps += rhs.stiff_steps;
        self.method_switches += rhs.method_switches;
    }
}

/// A failed integration: the error plus every valid state produced before it
///
/// `partial_states[i]` is the state at `grid[i]`.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{error} ({recovered} grid states recovered)", recovered = .partial_states.len())]
pub struct IntegrationFailure {
    #[source]
    pub error: SimulationError,
    pub partial_states: Vec<State>,
    pub stats: IntegrationStats,
}

impl From<IntegrationFailure> for SimulationError {
    fn from(failure: IntegrationFailure) -> Self {
        failure.error
    }
}

/// Continuous extension of one accepted step
#[derive(Debug, Clone, Copy)]
enum DenseSegment {
    NonStiff(DopriDense),
    Stiff(RosenbrockDense),
}

impl DenseSegment {
    fn at(&self, theta: f64) -> State {
        match self {
            DenseSegment::NonStiff(d) => d.at(theta),
            DenseSegment::Stiff(d) => d.at(theta),
        }
    }
}

/// Result of one attempted step, whichever stepper produced it
#[derive(Debug, Clone, Copy)]
struct Attempt {
    y_new: State,
    f_new: State,
    error: f64,
    stiffness: Option<f64>,
    jacobian_norm: f64,
    dense: DenseSegment,
}

/// Decides when to hand over between the two steppers
#[derive(Debug, Default)]
struct StiffnessMonitor {
    stiff_hits: u32,
    calm_hits: u32,
}

impl StiffnessMonitor {
    fn observe(&mut self, method: Method, attempt: &Attempt, h: f64) -> Option<Method> {
        match method {
            Method::NonStiff => {
                match attempt.stiffness {
                    Some(hl) if hl > dopri5::STIFF_THRESHOLD => {
                        self.calm_hits = 0;
                        self.stiff_hits += 1;
                        if self.stiff_hits >= SWITCH_AFTER {
                            *self = Self::default();
                            return Some(Method::Stiff);
                        }
                    }
                    _ => {
                        self.calm_hits += 1;
                        if self.calm_hits >= STIFF_RESET_AFTER {
                            self.stiff_hits = 0;
                        }
                    }
                }
                None
            }
            Method::Stiff => {
                if h * attempt.jacobian_norm < rosenbrock::NON_STIFF_THRESHOLD {
                    self.calm_hits += 1;
                    if self.calm_hits >= SWITCH_AFTER {
                        *self = Self::default();
                        return Some(Method::NonStiff);
                    }
                } else {
                    self.calm_hits = 0;
                }
                None
            }
        }
    }
}

/// Adaptive ODE integrator producing states on a [`TimeGrid`]
///
/// Deterministic: the same field, initial state, grid and options always
/// give a bit-identical trajectory.
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    options: IntegratorOptions,
    controller: StepController,
    cancel: Option<CancelToken>,
}

impl Integrator {
    /// Create an integrator after validating `options`
    pub fn new(options: IntegratorOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    /// Attach a cancellation token checked once per internal step
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &IntegratorOptions {
        &self.options
    }

    /// Integrate `initial` through `field` and report it at every grid point
    ///
    /// The returned trajectory starts with `initial` unchanged. A one-point
    /// grid returns just that state.
    pub fn integrate<F>(
        &self,
        field: &F,
        initial: State,
        grid: &Arc<TimeGrid>,
    ) -> std::result::Result<Trajectory, IntegrationFailure>
    where
        F: VectorField + ?Sized,
    {
        let mut stats = IntegrationStats::default();

        if !initial.is_finite() {
            return Err(IntegrationFailure {
                error: SimulationError::InvalidInitialCondition { state: initial },
                partial_states: Vec::new(),
                stats,
            });
        }

        let times = grid.points();
        let mut states = Vec::with_capacity(times.len());
        states.push(initial);

        if times.len() == 1 {
            return Ok(Trajectory::new(Arc::clone(grid), states, stats));
        }

        let tol = self.options.tolerances;
        let t_end = grid.end();
        let h_max = self.options.max_step.unwrap_or(grid.span());

        let mut t = grid.start();
        let mut y = initial;
        let mut f = field.evaluate(&y, t);
        stats.function_evals += 1;

        if !f.is_finite() {
            return Err(IntegrationFailure {
                error: SimulationError::IntegrationDivergence {
                    last_valid_index: 0,
                    time: t,
                },
                partial_states: states,
                stats,
            });
        }

        let mut method = match self.options.method {
            MethodSelection::Stiff => Method::Stiff,
            MethodSelection::Auto | MethodSelection::NonStiff => Method::NonStiff,
        };

        let mut h = match self.options.initial_step {
            Some(h0) => h0,
            None => {
                stats.function_evals += 1;
                initial_step(field, t, &y, &f, method.order(), h_max, &tol)
            }
        };

        let mut monitor = StiffnessMonitor::default();
        let mut next = 1;
        let mut steps: u64 = 0;
        let mut after_reject = false;
        let mut non_finite_seen = false;

        while next < times.len() {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(IntegrationFailure {
                    error: SimulationError::IntegrationCancelled {
                        last_valid_index: states.len() - 1,
                    },
                    partial_states: states,
                    stats,
                });
            }

            if steps >= self.options.max_steps {
                return Err(IntegrationFailure {
                    error: SimulationError::StepLimitExceeded {
                        time: t,
                        steps: self.options.max_steps,
                    },
                    partial_states: states,
                    stats,
                });
            }
            steps += 1;

            h = h.min(h_max);
            let h_floor = step_floor(t, t_end);

            if !(h >= h_floor) {
                let error = if non_finite_seen {
                    SimulationError::IntegrationDivergence {
                        last_valid_index: states.len() - 1,
                        time: t,
                    }
                } else {
                    SimulationError::StepSizeUnderflow { time: t, step: h }
                };
                return Err(IntegrationFailure {
                    error,
                    partial_states: states,
                    stats,
                });
            }

            let remaining = t_end - t;
            let last = h >= remaining - h_floor;
            if last {
                h = remaining;
            }

            let attempt = self.attempt(method, field, t, &y, &f, h, &mut stats);

            let Some(attempt) = attempt.filter(|a| a.error <= 1.0) else {
                let error = attempt.map_or(f64::INFINITY, |a| a.error);
                if !error.is_finite() {
                    non_finite_seen = true;
                }
                stats.rejected_steps += 1;
                h *= self.controller.factor(error, method.order(), true);
                after_reject = true;
                continue;
            };

            let t_new = if last { t_end } else { t + h };

            while next < times.len() && times[next] <= t_new {
                let s = if times[next] == t_new {
                    attempt.y_new
                } else {
                    attempt.dense.at((times[next] - t) / h)
                };

                if !s.is_finite() {
                    return Err(IntegrationFailure {
                        error: SimulationError::IntegrationDivergence {
                            last_valid_index: next - 1,
                            time: times[next],
                        },
                        partial_states: states,
                        stats,
                    });
                }

                states.push(s);
                next += 1;
            }

            if !attempt.y_new.is_finite() {
                return Err(IntegrationFailure {
                    error: SimulationError::IntegrationDivergence {
                        last_valid_index: states.len() - 1,
                        time: t_new,
                    },
                    partial_states: states,
                    stats,
                });
            }

            stats.accepted_steps += 1;
            if method == Method::Stiff {
                stats.stiff_steps += 1;
            }

            let order = method.order();
            if self.options.method == MethodSelection::Auto {
                if let Some(switched) = monitor.observe(method, &attempt, h) {
                    debug!(
                        t = t_new,
                        h,
                        from = ?method,
                        to = ?switched,
                        "switching integration method"
                    );
                    method = switched;
                    stats.method_switches += 1;
                }
            }

            t = t_new;
            y = attempt.y_new;
            f = attempt.f_new;
            non_finite_seen = false;
            h *= self.controller.factor(attempt.error, order, after_reject);
            after_reject = false;
        }

        Ok(Trajectory::new(Arc::clone(grid), states, stats))
    }

    /// Run one step of the active stepper; `None` marks a singular W matrix
    #[allow(clippy::too_many_arguments)]
    fn attempt<F>(
        &self,
        method: Method,
        field: &F,
        t: f64,
        y: &State,
        f: &State,
        h: f64,
        stats: &mut IntegrationStats,
    ) -> Option<Attempt>
    where
        F: VectorField + ?Sized,
    {
        let tol = &self.options.tolerances;

        match method {
            Method::NonStiff => {
                stats.function_evals += dopri5::EVALS_PER_STEP;
                let step = dopri5::step(field, t, y, f, h, tol);
                Some(Attempt {
                    y_new: step.y_new,
                    f_new: step.f_new,
                    error: step.error,
                    stiffness: step.stiffness,
                    jacobian_norm: 0.0,
                    dense: DenseSegment::NonStiff(step.dense),
                })
            }
            Method::Stiff => {
                stats.function_evals += rosenbrock::EVALS_PER_STEP;
                stats.jacobian_evals += 1;
                let step = rosenbrock::step(field, t, y, f, h, tol)?;
                Some(Attempt {
                    y_new: step.y_new,
                    f_new: step.f_new,
                    error: step.error,
                    stiffness: None,
                    jacobian_norm: step.jacobian_norm,
                    dense: DenseSegment::Stiff(step.dense),
                })
            }
        }
    }
}

/// Smallest meaningful step at time `t`
fn step_floor(t: f64, t_end: f64) -> f64 {
    16.0 * f64::EPSILON * t.abs().max(t_end.abs()).max(f64::MIN_POSITIVE)
}

fn scaled_rms(v: &State, scale: &State) -> f64 {
    let e = v.zip_with(*scale, |a, s| a / s);
    ((e.x * e.x + e.y * e.y + e.z * e.z) / 3.0).sqrt()
}

/// Starting step size (Hairer, Nørsett & Wanner, §II.4)
fn initial_step<F>(
    field: &F,
    t: f64,
    y: &State,
    f0: &State,
    order: u32,
    h_max: f64,
    tol: &Tolerances,
) -> f64
where
    F: VectorField + ?Sized,
{
    let sk = tol.scale(y, y);
    let d0 = scaled_rms(y, &sk);
    let d1 = scaled_rms(f0, &sk);

    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(h_max);

    let y1 = *y + h0 * *f0;
    let f1 = field.evaluate(&y1, t + h0);
    let d2 = scaled_rms(&(f1 - *f0), &sk) / h0;

    let der = d1.max(d2);
    let h1 = if der <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / der).powf(1.0 / (order as f64 + 1.0))
    };

    (100.0 * h0).min(h1).min(h_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{Jacobian, LorenzSystem};

    /// Rotation in the x-y plane plus decay in z
    struct Oscillator;

    impl VectorField for Oscillator {
        fn evaluate(&self, state: &State, _t: f64) -> State {
            State::new(state.y, -state.x, -0.5 * state.z)
        }
    }

    fn exact_oscillator(t: f64) -> State {
        State::new(t.sin(), t.cos(), (-0.5 * t).exp())
    }

    #[test]
    fn test_matches_analytic_solution_on_grid() {
        let grid = Arc::new(TimeGrid::linspace(0.0, 10.0, 101).unwrap());
        let traj = Integrator::default()
            .integrate(&Oscillator, State::new(0.0, 1.0, 1.0), &grid)
            .unwrap();

        assert_eq!(traj.len(), 101);
        for (t, s) in traj.iter() {
            let err = (*s - exact_oscillator(t)).max_abs();
            assert!(err < 1e-4, "error {} at t = {}", err, t);
        }
        assert!(traj.stats().accepted_steps > 0);
        assert_eq!(traj.stats().method_switches, 0);
    }

    #[test]
    fn test_grid_finer_than_steps_uses_dense_output() {
        // Many output points per internal step
        let grid = Arc::new(TimeGrid::linspace(0.0, 2.0, 2001).unwrap());
        let traj = Integrator::default()
            .integrate(&Oscillator, State::new(0.0, 1.0, 1.0), &grid)
            .unwrap();

        assert!(traj.stats().accepted_steps < 2000);
        for (t, s) in traj.iter() {
            assert!((*s - exact_oscillator(t)).max_abs() < 1e-5);
        }
    }

    #[test]
    fn test_single_point_grid_returns_initial_state() {
        let grid = Arc::new(TimeGrid::new(vec![3.0]).unwrap());
        let initial = State::new(0.0, 1.0, 1.0);
        let traj = Integrator::default()
            .integrate(&LorenzSystem::classic(), initial, &grid)
            .unwrap();

        assert_eq!(traj.states(), &[initial]);
    }

    #[test]
    fn test_rejects_non_finite_initial_state() {
        let grid = Arc::new(TimeGrid::linspace(0.0, 1.0, 11).unwrap());
        let failure = Integrator::default()
            .integrate(&LorenzSystem::classic(), State::new(f64::NAN, 0.0, 0.0), &grid)
            .unwrap_err();

        assert!(matches!(
            failure.error,
            SimulationError::InvalidInitialCondition { .. }
        ));
        assert!(failure.partial_states.is_empty());
    }

    #[test]
    fn test_non_finite_field_reports_divergence() {
        // Field turns into NaN after t = 0.5
        struct Poisoned;
        impl VectorField for Poisoned {
            fn evaluate(&self, state: &State, t: f64) -> State {
                if t > 0.5 {
                    State::new(f64::NAN, f64::NAN, f64::NAN)
                } else {
                    -*state
                }
            }
        }

        let grid = Arc::new(TimeGrid::linspace(0.0, 1.0, 11).unwrap());
        let failure = Integrator::default()
            .integrate(&Poisoned, State::new(1.0, 1.0, 1.0), &grid)
            .unwrap_err();

        match failure.error {
            SimulationError::IntegrationDivergence {
                last_valid_index, ..
            } => {
                assert_eq!(last_valid_index + 1, failure.partial_states.len());
                assert!(last_valid_index <= 5);
            }
            other => panic!("expected divergence, got {:?}", other),
        }
        assert!(failure.partial_states.iter().all(State::is_finite));
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();

        let grid = Arc::new(TimeGrid::linspace(0.0, 40.0, 2001).unwrap());
        let failure = Integrator::default()
            .with_cancel(token)
            .integrate(&LorenzSystem::classic(), State::new(0.0, 1.0, 1.0), &grid)
            .unwrap_err();

        assert_eq!(
            failure.error,
            SimulationError::IntegrationCancelled { last_valid_index: 0 }
        );
        assert_eq!(failure.partial_states.len(), 1);
    }

    #[test]
    fn test_overflowing_derivative_reports_divergence() {
        // x(ρ − z) overflows to −inf although the state itself is finite
        let grid = Arc::new(TimeGrid::linspace(0.0, 1.0, 11).unwrap());
        let failure = Integrator::default()
            .integrate(&LorenzSystem::classic(), State::new(1e200, 1e200, 1e200), &grid)
            .unwrap_err();

        assert_eq!(
            failure.error,
            SimulationError::IntegrationDivergence {
                last_valid_index: 0,
                time: 0.0
            }
        );
        assert_eq!(failure.partial_states, vec![State::new(1e200, 1e200, 1e200)]);
    }

    #[test]
    fn test_cancelled_mid_run() {
        /// Lorenz flow that trips the token once t passes 0.5
        struct CancelAfterHalf {
            inner: LorenzSystem,
            token: CancelToken,
        }
        impl VectorField for CancelAfterHalf {
            fn evaluate(&self, state: &State, t: f64) -> State {
                if t > 0.5 {
                    self.token.cancel();
                }
                self.inner.evaluate(state, t)
            }
        }

        let token = CancelToken::new();
        let field = CancelAfterHalf {
            inner: LorenzSystem::classic(),
            token: token.clone(),
        };
        let grid = Arc::new(TimeGrid::linspace(0.0, 40.0, 2001).unwrap());
        let failure = Integrator::default()
            .with_cancel(token)
            .integrate(&field, State::new(0.0, 1.0, 1.0), &grid)
            .unwrap_err();

        let SimulationError::IntegrationCancelled { last_valid_index } = failure.error else {
            panic!("expected cancellation, got {:?}", failure.error);
        };
        assert_eq!(last_valid_index + 1, failure.partial_states.len());
        assert!(last_valid_index >= 20);
        assert!(last_valid_index < 2000);
        assert!(failure.partial_states.iter().all(State::is_finite));
    }

    #[test]
    fn test_step_limit() {
        let options = IntegratorOptions {
            max_steps: 10,
            ..IntegratorOptions::default()
        };
        let grid = Arc::new(TimeGrid::linspace(0.0, 40.0, 2001).unwrap());
        let failure = Integrator::new(options)
            .unwrap()
            .integrate(&LorenzSystem::classic(), State::new(0.0, 1.0, 1.0), &grid)
            .unwrap_err();

        assert!(matches!(
            failure.error,
            SimulationError::StepLimitExceeded { steps: 10, .. }
        ));
        assert!(!failure.partial_states.is_empty());
    }

    #[test]
    fn test_finite_time_blowup_underflows() {
        // dx/dt = x², x(0) = 1 escapes at t = 1
        struct Blowup;
        impl VectorField for Blowup {
            fn evaluate(&self, state: &State, _t: f64) -> State {
                State::new(state.x * state.x, 0.0, 0.0)
            }
        }

        let options = IntegratorOptions {
            method: MethodSelection::NonStiff,
            ..IntegratorOptions::default()
        };
        let grid = Arc::new(TimeGrid::linspace(0.0, 2.0, 21).unwrap());
        let failure = Integrator::new(options)
            .unwrap()
            .integrate(&Blowup, State::new(1.0, 0.0, 0.0), &grid)
            .unwrap_err();

        assert!(failure.error.is_integration_error());
        // Grid points up to t = 0.9 are reachable
        assert!(failure.partial_states.len() >= 10);
        assert!(failure.partial_states.len() <= 11);
    }

    /// One fast mode (λ = −3000) slaved to a slow manifold y ≈ cos(x)
    struct Stiff;

    impl VectorField for Stiff {
        fn evaluate(&self, state: &State, _t: f64) -> State {
            State::new(
                -0.5 * state.x,
                -3000.0 * (state.y - state.x.cos()),
                -state.z,
            )
        }

        fn jacobian(&self, state: &State, _t: f64) -> Jacobian {
            [
                [-0.5, 0.0, 0.0],
                [-3000.0 * state.x.sin(), -3000.0, 0.0],
                [0.0, 0.0, -1.0],
            ]
        }
    }

    #[test]
    fn test_auto_switches_to_stiff_stepper() {
        let grid = Arc::new(TimeGrid::linspace(0.0, 5.0, 51).unwrap());
        let initial = State::new(1.0, 0.0, 1.0);

        let auto = Integrator::default().integrate(&Stiff, initial, &grid).unwrap();
        let explicit = Integrator::new(IntegratorOptions {
            method: MethodSelection::NonStiff,
            ..IntegratorOptions::default()
        })
        .unwrap()
        .integrate(&Stiff, initial, &grid)
        .unwrap();

        assert!(auto.stats().method_switches >= 1);
        assert!(auto.stats().stiff_steps > 0);
        assert!(auto.stats().accepted_steps < explicit.stats().accepted_steps);

        // Both track the slow manifold y ≈ cos(x)
        for (a, b) in auto.states().iter().zip(explicit.states()).skip(1) {
            assert!((a.x - b.x).abs() < 1e-4);
            assert!((a.y - b.y).abs() < 1e-3);
            assert!((a.z - b.z).abs() < 1e-4);
        }
    }

    #[test]
    fn test_stiff_only_tracks_solution() {
        let options = IntegratorOptions {
            method: MethodSelection::Stiff,
            ..IntegratorOptions::default()
        };
        let grid = Arc::new(TimeGrid::linspace(0.0, 2.0, 21).unwrap());
        let traj = Integrator::new(options)
            .unwrap()
            .integrate(&Stiff, State::new(1.0, 1.0, 0.0), &grid)
            .unwrap();

        for (t, s) in traj.iter() {
            assert!((s.x - (-0.5 * t).exp()).abs() < 1e-4, "x at t = {}", t);
        }
        assert_eq!(traj.stats().stiff_steps, traj.stats().accepted_steps);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let bad = IntegratorOptions {
            tolerances: Tolerances::new(0.0, 0.0),
            ..IntegratorOptions::default()
        };
        assert!(Integrator::new(bad).is_err());

        let bad = IntegratorOptions {
            max_step: Some(-1.0),
            ..IntegratorOptions::default()
        };
        assert!(Integrator::new(bad).is_err());
    }
}
