//! Caller-owned camera, canvas and projection.

use crate::systems::State;
use crate::trajectory::TrajectorySet;

/// Half-diagonal of the unit cube; every normalized point projects inside it
const VIEW_RADIUS: f64 = 1.732_050_807_568_877;

/// Camera and canvas state owned by whoever drives the animation
///
/// Angles follow the usual 3D-axes convention: azimuth rotates about the
/// z axis, elevation tilts the view up from the x-y plane, both in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub width: usize,
    pub height: usize,
    pub azimuth: f64,
    pub elevation: f64,
    center: State,
    half_extent: f64,
}

impl RenderContext {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            azimuth: 0.0,
            elevation: 10.0,
            center: State::ZERO,
            half_extent: 1.0,
        }
    }

    pub fn with_view(mut self, elevation: f64, azimuth: f64) -> Self {
        self.elevation = elevation;
        self.azimuth = azimuth;
        self
    }

    /// Advance the azimuth by `degrees`, wrapping to [0, 360)
    pub fn rotate(&mut self, degrees: f64) {
        self.azimuth = (self.azimuth + degrees).rem_euclid(360.0);
    }

    /// Fix the view volume to an axis-aligned box, scaled uniformly
    pub fn set_bounds(&mut self, lo: State, hi: State) {
        let center = (lo + hi) * 0.5;
        let half = (hi - lo).max_abs() * 0.5;
        if center.is_finite() && half.is_finite() && half > 0.0 {
            self.center = center;
            self.half_extent = half;
        }
    }

    /// Fix the view volume to enclose every completed trajectory of `set`
    pub fn fit_to(&mut self, set: &TrajectorySet) {
        let bounds = set.completed().map(|(_, traj)| traj.bounds()).reduce(
            |(lo_a, hi_a), (lo_b, hi_b)| {
                (lo_a.zip_with(lo_b, f64::min), hi_a.zip_with(hi_b, f64::max))
            },
        );
        if let Some((lo, hi)) = bounds {
            self.set_bounds(lo, hi);
        }
    }

    /// Canvas cell `(column, row)` of a state, `None` when it falls outside
    pub fn project(&self, state: &State) -> Option<(usize, usize)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }

        let p = (*state - self.center) * (1.0 / self.half_extent);
        let (sin_az, cos_az) = self.azimuth.to_radians().sin_cos();
        let (sin_el, cos_el) = self.elevation.to_radians().sin_cos();

        let u = -p.x * sin_az + p.y * cos_az;
        let v = p.z * cos_el - (p.x * cos_az + p.y * sin_az) * sin_el;

        let col = (u / VIEW_RADIUS + 1.0) * 0.5 * (self.width - 1) as f64;
        let row = (1.0 - v / VIEW_RADIUS) * 0.5 * (self.height - 1) as f64;

        let in_range = |c: f64, n: usize| c.is_finite() && c > -0.5 && c < n as f64 - 0.5;
        if !(in_range(col, self.width) && in_range(row, self.height)) {
            return None;
        }

        Some((col.round() as usize, row.round() as usize))
    }
}
