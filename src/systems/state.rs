//! Phase-space point of a three-variable system.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Instantaneous position (x, y, z) of a trajectory, or a derivative of one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl State {
    pub const ZERO: State = State { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to another state.
    pub fn distance(&self, other: &State) -> f64 {
        (*self - *other).norm()
    }

    /// Largest absolute component.
    pub fn max_abs(&self) -> f64 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Component-wise map.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    /// Component-wise combination of two states.
    pub fn zip_with(self, other: State, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }
}

impl From<[f64; 3]> for State {
    fn from(v: [f64; 3]) -> Self {
        Self::from_array(v)
    }
}

impl Add for State {
    type Output = State;

    fn add(self, rhs: State) -> State {
        State::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for State {
    fn add_assign(&mut self, rhs: State) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for State {
    type Output = State;

    fn sub(self, rhs: State) -> State {
        State::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for State {
    type Output = State;

    fn neg(self) -> State {
        State::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for State {
    type Output = State;

    fn mul(self, rhs: f64) -> State {
        State::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<State> for f64 {
    type Output = State;

    fn mul(self, rhs: State) -> State {
        rhs * self
    }
}
