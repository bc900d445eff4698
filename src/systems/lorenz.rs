//! Lorenz System: Deterministic Convection Chaos
//!
//! The Lorenz system models a truncated Rayleigh-Bénard convection cell:
//!
//!   dx/dt = σ(y − x)
//!   dy/dt = x(ρ − z) − y
//!   dz/dt = xy − βz
//!
//! where:
//! - σ: Prandtl number
//! - ρ: reduced Rayleigh number (control parameter)
//! - β: geometric aspect factor
//!
//! ## Chaotic Regime
//!
//! For the classic parameters σ = 10, β = 8/3, ρ = 28 the two non-trivial
//! fixed points C± are unstable and trajectories settle onto the butterfly
//! attractor. Nearby initial conditions separate roughly exponentially
//! (maximal Lyapunov exponent ≈ 0.9) until the separation saturates at the
//! attractor diameter.
//!
//! ## References
//!
//! - Lorenz, E. N. (1963). Deterministic nonperiodic flow. Journal of the
//!   Atmospheric Sciences, 20(2), 130-141.

use serde::{Deserialize, Serialize};

use super::state::State;
use super::traits::{Jacobian, VectorField};

/// Parameters {σ, β, ρ} of the Lorenz system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LorenzParams {
    pub sigma: f64,
    pub beta: f64,
    pub rho: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            beta: 8.0 / 3.0,
            rho: 28.0,
        }
    }
}

/// Lorenz vector field with parameters fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LorenzSystem {
    params: LorenzParams,
}

impl LorenzSystem {
    /// Create system with explicit parameters
    pub fn new(sigma: f64, beta: f64, rho: f64) -> Self {
        Self {
            params: LorenzParams { sigma, beta, rho },
        }
    }

    /// Classic chaotic parameters σ = 10, β = 8/3, ρ = 28
    pub fn classic() -> Self {
        Self::from_params(LorenzParams::default())
    }

    pub fn from_params(params: LorenzParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> LorenzParams {
        self.params
    }

    /// Equilibria of the system
    ///
    /// The origin always; C± = (±√(β(ρ−1)), ±√(β(ρ−1)), ρ−1) when ρ > 1.
    pub fn fixed_points(&self) -> Vec<State> {
        let LorenzParams { beta, rho, .. } = self.params;
        let mut points = vec![State::ZERO];

        if rho > 1.0 {
            let r = (beta * (rho - 1.0)).sqrt();
            points.push(State::new(r, r, rho - 1.0));
            points.push(State::new(-r, -r, rho - 1.0));
        }

        points
    }

    /// Phase-space divergence ∇·f = −(σ + 1 + β)
    ///
    /// Constant and negative: volumes contract at rate e^{−(σ+1+β)t}.
    pub fn divergence(&self) -> f64 {
        -(self.params.sigma + 1.0 + self.params.beta)
    }
}

impl Default for LorenzSystem {
    fn default() -> Self {
        Self::classic()
    }
}

impl VectorField for LorenzSystem {
    fn evaluate(&self, state: &State, _t: f64) -> State {
        let LorenzParams { sigma, beta, rho } = self.params;
        let State { x, y, z } = *state;

        State::new(sigma * (y - x), x * (rho - z) - y, x * y - beta * z)
    }

    fn jacobian(&self, state: &State, _t: f64) -> Jacobian {
        let LorenzParams { sigma, beta, rho } = self.params;
        let State { x, y, z } = *state;

        [
            [-sigma, sigma, 0.0],
            [rho - z, -1.0, -x],
            [y, x, -beta],
        ]
    }

    fn name(&self) -> &'static str {
        "lorenz"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lorenz_derivative() {
        let system = LorenzSystem::classic();
        let d = system.evaluate(&State::new(0.0, 1.0, 1.0), 0.0);

        assert_eq!(d.x, 10.0);
        assert_eq!(d.y, -1.0);
        assert!((d.z + 8.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_lorenz_time_invariant() {
        let system = LorenzSystem::classic();
        let s = State::new(1.5, -2.0, 20.0);
        assert_eq!(system.evaluate(&s, 0.0), system.evaluate(&s, 123.4));
    }

    #[test]
    fn test_fixed_points_are_equilibria() {
        let system = LorenzSystem::classic();
        let points = system.fixed_points();
        assert_eq!(points.len(), 3);

        for p in points {
            let d = system.evaluate(&p, 0.0);
            assert!(d.norm() < 1e-12, "f({:?}) = {:?}", p, d);
        }

        // Below the pitchfork only the origin survives
        assert_eq!(LorenzSystem::new(10.0, 8.0 / 3.0, 0.5).fixed_points().len(), 1);
    }

    #[test]
    fn test_analytic_jacobian_matches_finite_difference() {
        struct Wrapped(LorenzSystem);
        impl VectorField for Wrapped {
            fn evaluate(&self, state: &State, t: f64) -> State {
                self.0.evaluate(state, t)
            }
        }

        let system = LorenzSystem::classic();
        let s = State::new(-3.2, 4.1, 17.5);
        let analytic = system.jacobian(&s, 0.0);
        let numeric = Wrapped(system).jacobian(&s, 0.0);

        for i in 0..3 {
            for j in 0..3 {
                assert!((analytic[i][j] - numeric[i][j]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_divergence() {
        let system = LorenzSystem::classic();
        assert!((system.divergence() + 41.0 / 3.0).abs() < 1e-12);
    }
}
