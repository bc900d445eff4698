//! Local error control: tolerances, weighted error norm and step-size controller.

use serde::{Deserialize, Serialize};

use crate::systems::State;

/// Absolute/relative tolerance pair
///
/// A component passes when |err| ≤ atol + rtol · max(|y_old|, |y_new|).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub relative: f64,
    pub absolute: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            relative: 1e-6,
            absolute: 1e-8,
        }
    }
}

impl Tolerances {
    pub fn new(relative: f64, absolute: f64) -> Self {
        Self { relative, absolute }
    }

    pub fn is_valid(&self) -> bool {
        self.relative.is_finite()
            && self.absolute.is_finite()
            && self.relative >= 0.0
            && self.absolute >= 0.0
            && (self.relative > 0.0 || self.absolute > 0.0)
    }

    /// Per-component scale atol + rtol · max(|a|, |b|)
    pub fn scale(&self, a: &State, b: &State) -> State {
        a.zip_with(*b, |u, v| self.absolute + self.relative * u.abs().max(v.abs()))
    }

    /// RMS of the scaled error; ≤ 1 means the step is acceptable
    ///
    /// Returns infinity for non-finite errors so the step is rejected.
    pub fn error_norm(&self, err: &State, y_old: &State, y_new: &State) -> f64 {
        let sk = self.scale(y_old, y_new);
        let e = err.zip_with(sk, |e, s| e / s);
        let norm = ((e.x * e.x + e.y * e.y + e.z * e.z) / 3.0).sqrt();

        if norm.is_finite() {
            norm
        } else {
            f64::INFINITY
        }
    }
}

/// I-controller: h_new = h · clamp(safety · err^(−1/(q+1)), min, max)
#[derive(Debug, Clone, Copy)]
pub struct StepController {
    /// Safety factor (0.8-0.9 typical)
    pub safety: f64,
    /// Maximum growth factor per step
    pub max_factor: f64,
    /// Minimum reduction factor per step
    pub min_factor: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            max_factor: 5.0,
            min_factor: 0.2,
        }
    }
}

impl StepController {
    /// Step-size factor for an error estimate of order `order + 1`
    ///
    /// After a rejection the factor never exceeds one.
    pub fn factor(&self, error: f64, order: u32, after_reject: bool) -> f64 {
        let max = if after_reject { 1.0 } else { self.max_factor };

        if error == 0.0 {
            return max;
        }
        if !error.is_finite() {
            return self.min_factor;
        }

        let exponent = 1.0 / (order as f64 + 1.0);
        (self.safety * error.powf(-exponent)).clamp(self.min_factor, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerances() {
        let tol = Tolerances::default();
        assert_eq!(tol.relative, 1e-6);
        assert_eq!(tol.absolute, 1e-8);
        assert!(tol.is_valid());
        assert!(!Tolerances::new(0.0, 0.0).is_valid());
        assert!(!Tolerances::new(-1.0, 1e-8).is_valid());
    }

    #[test]
    fn test_error_norm_scaling() {
        let tol = Tolerances::new(0.0, 1.0);
        let err = State::new(1.0, 1.0, 1.0);
        let norm = tol.error_norm(&err, &State::ZERO, &State::ZERO);
        assert!((norm - 1.0).abs() < 1e-15);

        let nan = State::new(f64::NAN, 0.0, 0.0);
        assert_eq!(tol.error_norm(&nan, &State::ZERO, &State::ZERO), f64::INFINITY);
    }

    #[test]
    fn test_controller_bounds() {
        let c = StepController::default();
        assert_eq!(c.factor(0.0, 4, false), 5.0);
        assert_eq!(c.factor(0.0, 4, true), 1.0);
        assert_eq!(c.factor(1e12, 4, false), 0.2);
        assert_eq!(c.factor(f64::INFINITY, 4, false), 0.2);

        let f = c.factor(1.0, 4, false);
        assert!((f - 0.9).abs() < 1e-15);
    }
}
