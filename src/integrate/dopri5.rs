//! Dormand-Prince 5(4): explicit non-stiff stepper
//!
//! Seven-stage embedded pair with the first-same-as-last property, a
//! fourth-order continuous extension for grid output, and Hairer's stiffness
//! test h·|λ| ≈ h·‖k7 − k6‖ / ‖y1 − y6‖.
//!
//! Reference: Hairer, Nørsett & Wanner, "Solving Ordinary Differential
//! Equations I", 2nd ed., §II.5 and §II.6 (DOPRI5).

use crate::systems::{State, VectorField};

use super::control::Tolerances;

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// 5th-order minus embedded 4th-order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// Continuous extension
const D1: f64 = -12715105075.0 / 11282082432.0;
const D3: f64 = 87487479700.0 / 32700410799.0;
const D4: f64 = -10690763975.0 / 1880347072.0;
const D5: f64 = 701980252875.0 / 199316789632.0;
const D6: f64 = -1453857185.0 / 822651844.0;
const D7: f64 = 69997945.0 / 29380423.0;

/// Order used by the step-size controller
pub(crate) const ORDER: u32 = 4;

/// Derivative evaluations per attempted step (k1 is reused from the last step)
pub(crate) const EVALS_PER_STEP: u64 = 6;

/// Threshold on h·|λ| above which a step counts as stiff
pub(crate) const STIFF_THRESHOLD: f64 = 3.25;

/// Dense output of one accepted step
#[derive(Debug, Clone, Copy)]
pub(crate) struct DopriDense {
    rcont: [State; 5],
}

impl DopriDense {
    /// State at fraction `theta ∈ [0, 1]` of the step
    pub(crate) fn at(&self, theta: f64) -> State {
        let theta1 = 1.0 - theta;
        let [r1, r2, r3, r4, r5] = self.rcont;
        r1 + theta * (r2 + theta1 * (r3 + theta * (r4 + theta1 * r5)))
    }
}

/// Outcome of one attempted step
#[derive(Debug, Clone, Copy)]
pub(crate) struct DopriStep {
    pub y_new: State,
    /// f(t + h, y_new), reused as k1 of the next step
    pub f_new: State,
    /// Weighted RMS error (accept when ≤ 1)
    pub error: f64,
    /// Estimate of h·|λ| for the stiffness test, when measurable
    pub stiffness: Option<f64>,
    pub dense: DopriDense,
}

/// Attempt a single step of size `h` from `(t, y)` with `k1 = f(t, y)`
pub(crate) fn step<F: VectorField + ?Sized>(
    field: &F,
    t: f64,
    y: &State,
    k1: &State,
    h: f64,
    tol: &Tolerances,
) -> DopriStep {
    let y = *y;
    let k1 = *k1;

    let k2 = field.evaluate(&(y + h * (A21 * k1)), t + C2 * h);
    let k3 = field.evaluate(&(y + h * (A31 * k1 + A32 * k2)), t + C3 * h);
    let k4 = field.evaluate(&(y + h * (A41 * k1 + A42 * k2 + A43 * k3)), t + C4 * h);
    let k5 = field.evaluate(
        &(y + h * (A51 * k1 + A52 * k2 + A53 * k3 + A54 * k4)),
        t + C5 * h,
    );
    let y6 = y + h * (A61 * k1 + A62 * k2 + A63 * k3 + A64 * k4 + A65 * k5);
    let k6 = field.evaluate(&y6, t + h);

    let y_new = y + h * (A71 * k1 + A73 * k3 + A74 * k4 + A75 * k5 + A76 * k6);
    let k7 = field.evaluate(&y_new, t + h);

    let err = h * (E1 * k1 + E3 * k3 + E4 * k4 + E5 * k5 + E6 * k6 + E7 * k7);
    let error = tol.error_norm(&err, &y, &y_new);

    let stiffness = {
        let num = (k7 - k6).norm();
        let den = (y_new - y6).norm();
        if den > 0.0 && num.is_finite() {
            Some(h.abs() * num / den)
        } else {
            None
        }
    };

    let ydiff = y_new - y;
    let bspl = h * k1 - ydiff;
    let dense = DopriDense {
        rcont: [
            y,
            ydiff,
            bspl,
            ydiff - h * k7 - bspl,
            h * (D1 * k1 + D3 * k3 + D4 * k4 + D5 * k5 + D6 * k6 + D7 * k7),
        ],
    };

    DopriStep {
        y_new,
        f_new: k7,
        error,
        stiffness,
        dense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dy/dt = -y per component, exact solution y0·e^{-t}
    struct Decay;

    impl VectorField for Decay {
        fn evaluate(&self, state: &State, _t: f64) -> State {
            -*state
        }
    }

    #[test]
    fn test_single_step_accuracy() {
        let y0 = State::new(1.0, 2.0, -1.0);
        let k1 = Decay.evaluate(&y0, 0.0);
        let h: f64 = 0.1;
        let result = step(&Decay, 0.0, &y0, &k1, h, &Tolerances::default());

        let exact = y0 * (-h).exp();
        assert!((result.y_new - exact).max_abs() < 1e-8);
        assert!(result.error < 1.0);
        assert_eq!(result.f_new, -result.y_new);
    }

    #[test]
    fn test_dense_output_endpoints_and_midpoint() {
        let y0 = State::new(1.0, 0.5, 3.0);
        let k1 = Decay.evaluate(&y0, 0.0);
        let h: f64 = 0.1;
        let result = step(&Decay, 0.0, &y0, &k1, h, &Tolerances::default());

        assert_eq!(result.dense.at(0.0), y0);
        assert!((result.dense.at(1.0) - result.y_new).max_abs() < 1e-14);

        let mid = result.dense.at(0.5);
        let exact = y0 * (-0.05f64).exp();
        assert!((mid - exact).max_abs() < 1e-6);
    }

    #[test]
    fn test_stiffness_estimate_tracks_eigenvalue() {
        // dy/dt = -50 y: h·|λ| = 50 h
        struct Fast;
        impl VectorField for Fast {
            fn evaluate(&self, state: &State, _t: f64) -> State {
                -50.0 * *state
            }
        }

        let y0 = State::new(1.0, 1.0, 1.0);
        let k1 = Fast.evaluate(&y0, 0.0);
        let result = step(&Fast, 0.0, &y0, &k1, 0.01, &Tolerances::default());
        let hl = result.stiffness.unwrap();
        assert!((hl - 0.5).abs() < 1e-9, "h·λ estimate {}", hl);
    }
}
