//! Error types shared by the simulation core.

use thiserror::Error;

use crate::systems::State;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Every failure the simulation core can report.
///
/// Integration variants are contained per trajectory inside a
/// [`TrajectorySet`](crate::TrajectorySet); structural variants (grid, frame,
/// comparison, window) are returned to the caller immediately.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    #[error("invalid time grid: {reason}")]
    InvalidTimeGrid { reason: String },
    #[error("initial condition {state:?} has a non-finite component")]
    InvalidInitialCondition { state: State },
    #[error("integration diverged at t = {time} (last valid grid index {last_valid_index})")]
    IntegrationDivergence { last_valid_index: usize, time: f64 },
    #[error("integration cancelled (last valid grid index {last_valid_index})")]
    IntegrationCancelled { last_valid_index: usize },
    #[error("step size {step:e} underflowed at t = {time}")]
    StepSizeUnderflow { time: f64, step: f64 },
    #[error("step limit of {steps} exhausted at t = {time}")]
    StepLimitExceeded { time: f64, steps: u64 },
    #[error("frame {index} out of range (frame count {frame_count})")]
    FrameIndexOutOfRange { index: usize, frame_count: usize },
    #[error("invalid comparison: {reason}")]
    InvalidComparison { reason: String },
    #[error("playback window must hold at least one point")]
    InvalidWindow,
    #[error("fit window {start}..{end} does not lie within a series of length {len}")]
    InvalidFitWindow { start: usize, end: usize, len: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SimulationError {
    /// Whether this error belongs to a single integration (as opposed to a
    /// structural misuse of the API).
    pub fn is_integration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInitialCondition { .. }
                | Self::IntegrationDivergence { .. }
                | Self::IntegrationCancelled { .. }
                | Self::StepSizeUnderflow { .. }
                | Self::StepLimitExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_error_classification() {
        let divergence = SimulationError::IntegrationDivergence {
            last_valid_index: 3,
            time: 1.5,
        };
        assert!(divergence.is_integration_error());

        let frame = SimulationError::FrameIndexOutOfRange {
            index: 10,
            frame_count: 10,
        };
        assert!(!frame.is_integration_error());
        assert!(frame.to_string().contains("frame 10"));
    }
}
