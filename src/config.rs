//! Run configuration loaded from JSON.
//!
//! Every field has a default matching the classic experiment (σ = 10,
//! β = 8/3, ρ = 28 over t ∈ [0, 40]), so an empty object `{}` is a valid
//! configuration and files only need to name what they change.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::SimulationError;
use crate::integrate::{IntegratorOptions, MethodSelection, TimeGrid, Tolerances};
use crate::playback::DEFAULT_WINDOW;
use crate::systems::{LorenzParams, LorenzSystem, State};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] SimulationError),
}

/// Sampling interval and resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl Default for TimeSpan {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 40.0,
            points: 2001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Trailing points shown per trajectory
    pub window: usize,
    /// Delay between rendered frames
    pub frame_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            frame_interval_ms: 25,
        }
    }
}

/// Random initial conditions drawn from `[0, cube_size)³`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleSettings {
    pub count: usize,
    pub cube_size: f64,
    pub seed: u64,
}

impl Default for EnsembleSettings {
    fn default() -> Self {
        Self {
            count: 100,
            cube_size: 1000.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub system: LorenzParams,
    pub time: TimeSpan,
    pub tolerances: Tolerances,
    pub method: MethodSelection,
    pub playback: PlaybackSettings,
    pub ensemble: EnsembleSettings,
    /// Explicit initial states; when empty, the ensemble settings apply
    pub initial_states: Vec<State>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            system: LorenzParams::default(),
            time: TimeSpan::default(),
            tolerances: Tolerances::default(),
            method: MethodSelection::Auto,
            playback: PlaybackSettings::default(),
            ensemble: EnsembleSettings::default(),
            initial_states: Vec::new(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        let LorenzParams { sigma, beta, rho } = self.system;
        if ![sigma, beta, rho].iter().all(|p| p.is_finite()) {
            return Err(SimulationError::InvalidConfig(format!(
                "system parameters must be finite (σ = {}, β = {}, ρ = {})",
                sigma, beta, rho
            )));
        }
        if self.playback.window == 0 {
            return Err(SimulationError::InvalidWindow);
        }
        if !(self.ensemble.cube_size.is_finite() && self.ensemble.cube_size > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "ensemble cube size must be positive and finite, got {}",
                self.ensemble.cube_size
            )));
        }
        if let Some(state) = self.initial_states.iter().find(|s| !s.is_finite()) {
            return Err(SimulationError::InvalidInitialCondition { state: *state });
        }
        self.integrator_options().validate()?;
        self.time_grid().map(|_| ())
    }

    pub fn time_grid(&self) -> crate::Result<TimeGrid> {
        TimeGrid::linspace(self.time.start, self.time.end, self.time.points)
    }

    pub fn lorenz(&self) -> LorenzSystem {
        LorenzSystem::from_params(self.system)
    }

    pub fn integrator_options(&self) -> IntegratorOptions {
        IntegratorOptions {
            tolerances: self.tolerances,
            method: self.method,
            ..IntegratorOptions::default()
        }
    }
}
