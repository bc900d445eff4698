//! Rosenbrock 2(3): linearly implicit stiff stepper
//!
//! Shampine-Reichelt modified Rosenbrock W-method (the scheme behind
//! MATLAB's `ode23s`). Each step forms W = I − h·d·J once, factors it and
//! reuses the LU for three solves:
//!
//!   k1 = W⁻¹ (F0 + h·d·T)
//!   F1 = f(t + h/2, y + h/2·k1)
//!   k2 = W⁻¹ (F1 − k1) + k1
//!   y1 = y + h·k2
//!   F2 = f(t + h, y1)
//!   k3 = W⁻¹ (F2 − e32 (k2 − F1) − 2 (k1 − F0) + h·d·T)
//!   err = h/6 · (k1 − 2 k2 + k3)
//!
//! with d = 1/(2 + √2), e32 = 6 + √2 and T = ∂f/∂t.
//!
//! Reference: Shampine & Reichelt, "The MATLAB ODE Suite", SIAM J. Sci.
//! Comput. 18(1), 1997.

use nalgebra::{Matrix3, Vector3};

use crate::systems::{jacobian_norm, Jacobian, State, VectorField};

use super::control::Tolerances;

/// Order used by the step-size controller
pub(crate) const ORDER: u32 = 2;

/// Derivative evaluations per attempted step (F0 is reused from the last step)
pub(crate) const EVALS_PER_STEP: u64 = 2;

/// h·‖J‖∞ below which a step no longer needs the implicit method
pub(crate) const NON_STIFF_THRESHOLD: f64 = 2.0;

fn gamma() -> f64 {
    1.0 / (2.0 + std::f64::consts::SQRT_2)
}

fn e32() -> f64 {
    6.0 + std::f64::consts::SQRT_2
}

fn to_vector(s: &State) -> Vector3<f64> {
    Vector3::new(s.x, s.y, s.z)
}

fn to_state(v: &Vector3<f64>) -> State {
    State::new(v[0], v[1], v[2])
}

#[rustfmt::skip]
fn to_matrix(jac: &Jacobian) -> Matrix3<f64> {
    Matrix3::new(
        jac[0][0], jac[0][1], jac[0][2],
        jac[1][0], jac[1][1], jac[1][2],
        jac[2][0], jac[2][1], jac[2][2],
    )
}

/// Dense output of one accepted step
#[derive(Debug, Clone, Copy)]
pub(crate) struct RosenbrockDense {
    y0: State,
    k1: State,
    k2: State,
    h: f64,
}

impl RosenbrockDense {
    /// State at fraction `theta ∈ [0, 1]` of the step
    pub(crate) fn at(&self, theta: f64) -> State {
        let d = gamma();
        let denom = 1.0 - 2.0 * d;
        let w1 = theta * (1.0 - theta) / denom;
        let w2 = theta * (theta - 2.0 * d) / denom;
        self.y0 + self.h * (w1 * self.k1 + w2 * self.k2)
    }
}

/// Outcome of one attempted step
#[derive(Debug, Clone, Copy)]
pub(crate) struct RosenbrockStep {
    pub y_new: State,
    /// f(t + h, y_new), reused as F0 of the next step
    pub f_new: State,
    /// Weighted RMS error (accept when ≤ 1)
    pub error: f64,
    /// ‖J‖∞ at the start of the step
    pub jacobian_norm: f64,
    pub dense: RosenbrockDense,
}

/// Attempt a single step of size `h` from `(t, y)` with `f0 = f(t, y)`
///
/// Returns `None` when W is singular for this step size; the caller treats
/// that as a rejected step and shrinks `h`.
pub(crate) fn step<F: VectorField + ?Sized>(
    field: &F,
    t: f64,
    y: &State,
    f0: &State,
    h: f64,
    tol: &Tolerances,
) -> Option<RosenbrockStep> {
    let d = gamma();
    let jac = field.jacobian(y, t);
    let dfdt = field.time_derivative(y, t);

    let w = Matrix3::identity() - to_matrix(&jac) * (h * d);
    let lu = w.lu();
    let solve = |rhs: State| lu.solve(&to_vector(&rhs)).map(|v| to_state(&v));

    let hdt = (h * d) * dfdt;

    let k1 = solve(*f0 + hdt)?;
    let f1 = field.evaluate(&(*y + (0.5 * h) * k1), t + 0.5 * h);
    let k2 = solve(f1 - k1)? + k1;
    let y_new = *y + h * k2;
    let f2 = field.evaluate(&y_new, t + h);
    let k3 = solve(f2 - e32() * (k2 - f1) - 2.0 * (k1 - *f0) + hdt)?;

    let err = (h / 6.0) * (k1 - 2.0 * k2 + k3);
    let error = tol.error_norm(&err, y, &y_new);

    Some(RosenbrockStep {
        y_new,
        f_new: f2,
        error,
        jacobian_norm: jacobian_norm(&jac),
        dense: RosenbrockDense {
            y0: *y,
            k1,
            k2,
            h,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stiff linear system with eigenvalues −1, −1000, −10000
    struct StiffDecay;

    impl VectorField for StiffDecay {
        fn evaluate(&self, state: &State, _t: f64) -> State {
            State::new(-state.x, -1000.0 * state.y, -10000.0 * state.z)
        }

        fn jacobian(&self, _state: &State, _t: f64) -> Jacobian {
            [
                [-1.0, 0.0, 0.0],
                [0.0, -1000.0, 0.0],
                [0.0, 0.0, -10000.0],
            ]
        }
    }

    #[test]
    fn test_stable_for_large_steps() {
        let y0 = State::new(1.0, 1.0, 1.0);
        let f0 = StiffDecay.evaluate(&y0, 0.0);
        let result = step(&StiffDecay, 0.0, &y0, &f0, 0.1, &Tolerances::default()).unwrap();

        // An explicit method would blow up at h·λ = 1000; the W-method damps
        assert!(result.y_new.y.abs() < 1.0);
        assert!(result.y_new.z.abs() < 1.0);
        assert!((result.y_new.x - (-0.1f64).exp()).abs() < 1e-3);
        assert_eq!(result.jacobian_norm, 10000.0);
    }

    #[test]
    fn test_dense_output_endpoints() {
        let y0 = State::new(2.0, 0.0, 0.0);
        let f0 = StiffDecay.evaluate(&y0, 0.0);
        let result = step(&StiffDecay, 0.0, &y0, &f0, 0.01, &Tolerances::default()).unwrap();

        assert_eq!(result.dense.at(0.0), y0);
        assert!((result.dense.at(1.0) - result.y_new).max_abs() < 1e-14);
    }

    #[test]
    fn test_time_dependent_forcing_is_exact_for_quadratics() {
        // dy/dt = t, y(0) = 0 ⇒ y(t) = t²/2
        struct Ramp;
        impl VectorField for Ramp {
            fn evaluate(&self, _state: &State, t: f64) -> State {
                State::new(t, t, t)
            }
            fn jacobian(&self, _state: &State, _t: f64) -> Jacobian {
                [[0.0; 3]; 3]
            }
            fn time_derivative(&self, _state: &State, _t: f64) -> State {
                State::new(1.0, 1.0, 1.0)
            }
        }

        let y0 = State::ZERO;
        let f0 = Ramp.evaluate(&y0, 0.0);
        let result = step(&Ramp, 0.0, &y0, &f0, 0.1, &Tolerances::default()).unwrap();
        assert!((result.y_new.x - 0.005).abs() < 1e-15);
        assert!(result.error < 1.0);
    }
}
