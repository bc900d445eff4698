//! Vector Field Trait: Standardized API for Integrable Systems
//!
//! Every system the integrator can advance implements [`VectorField`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      VectorField Trait                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + evaluate()          - Instantaneous derivative f(y, t)   │
//! │  + jacobian()          - ∂f/∂y for implicit steppers        │
//! │  + time_derivative()   - ∂f/∂t (zero when autonomous)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use super::state::State;

/// 3×3 Jacobian, row-major: `jac[i][j] = ∂f_i/∂y_j`.
pub type Jacobian = [[f64; 3]; 3];

/// Right-hand side of an ODE system dy/dt = f(y, t) on three variables.
///
/// Implementations must be deterministic and free of side effects; the
/// `Send + Sync` bound lets one field be shared by parallel integrations.
pub trait VectorField: Send + Sync {
    /// Instantaneous derivative at `(state, t)`
    fn evaluate(&self, state: &State, t: f64) -> State;

    /// Jacobian ∂f/∂y at `(state, t)`
    ///
    /// Defaults to a forward-difference approximation. Systems with a closed
    /// form should override it.
    fn jacobian(&self, state: &State, t: f64) -> Jacobian {
        let f0 = self.evaluate(state, t);
        let base = state.to_array();
        let mut jac = [[0.0; 3]; 3];

        for j in 0..3 {
            let delta = f64::EPSILON.sqrt() * base[j].abs().max(1.0);
            let mut shifted = base;
            shifted[j] += delta;
            let f1 = self.evaluate(&State::from_array(shifted), t).to_array();
            let f0 = f0.to_array();
            for i in 0..3 {
                jac[i][j] = (f1[i] - f0[i]) / delta;
            }
        }

        jac
    }

    /// Partial derivative ∂f/∂t
    ///
    /// Zero for autonomous systems.
    fn time_derivative(&self, _state: &State, _t: f64) -> State {
        State::ZERO
    }

    /// Short human-readable name
    fn name(&self) -> &'static str {
        "vector field"
    }
}

/// Infinity norm (max absolute row sum) of a Jacobian
pub fn jacobian_norm(jac: &Jacobian) -> f64 {
    jac.iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}
