//! Trailing-window frames over a trajectory set.

use crate::error::{Result, SimulationError};
use crate::systems::State;
use crate::trajectory::TrajectorySet;

/// Trailing window length used by the demos
pub const DEFAULT_WINDOW: usize = 100;

/// Trailing slice of one trajectory ending at the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryWindow<'a> {
    /// Entry id within the source set
    pub id: usize,
    pub times: &'a [f64],
    pub states: &'a [State],
}

impl<'a> TrajectoryWindow<'a> {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Most recent state (the "head" of the trail)
    pub fn head(&self) -> Option<&'a State> {
        self.states.last()
    }
}

/// Everything a renderer needs to draw one animation frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub index: usize,
    pub current_time: f64,
    /// One window per successful trajectory, in set order
    pub windows: Vec<TrajectoryWindow<'a>>,
}

/// Read-only view over a [`TrajectorySet`] that yields trailing windows
///
/// Frame `k` shows, for every completed trajectory, the states at grid
/// indices `max(0, k − W + 1) ..= k`. The buffer holds no cursor, so any
/// frame can be requested any number of times in any order.
#[derive(Debug, Clone, Copy)]
pub struct WindowedPlaybackBuffer<'a> {
    set: &'a TrajectorySet,
    window: usize,
}

impl<'a> WindowedPlaybackBuffer<'a> {
    pub fn new(set: &'a TrajectorySet, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(SimulationError::InvalidWindow);
        }
        Ok(Self { set, window })
    }

    pub fn with_default_window(set: &'a TrajectorySet) -> Self {
        Self {
            set,
            window: DEFAULT_WINDOW,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn set(&self) -> &'a TrajectorySet {
        self.set
    }

    /// Number of frames, one per grid point
    pub fn frame_count(&self) -> usize {
        self.set.grid().len()
    }

    pub fn get_frame(&self, index: usize) -> Result<Frame<'a>> {
        let frame_count = self.frame_count();
        if index >= frame_count {
            return Err(SimulationError::FrameIndexOutOfRange { index, frame_count });
        }

        let start = (index + 1).saturating_sub(self.window);
        let times = &self.set.grid().points()[start..=index];

        let windows = self
            .set
            .completed()
            .map(|(id, traj)| TrajectoryWindow {
                id,
                times,
                states: &traj.states()[start..=index],
            })
            .collect();

        Ok(Frame {
            index,
            current_time: self.set.grid()[index],
            windows,
        })
    }

    /// Fresh iterator over all frames in order
    pub fn frames(&self) -> Frames<'a> {
        Frames {
            buffer: *self,
            next: 0,
        }
    }
}

/// Iterator returned by [`WindowedPlaybackBuffer::frames`]
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    buffer: WindowedPlaybackBuffer<'a>,
    next: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.buffer.get_frame(self.next).ok()?;
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.frame_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrate::{Integrator, TimeGrid};
    use crate::systems::LorenzSystem;
    use std::sync::Arc;

    fn set_with_failure() -> TrajectorySet {
        let grid = Arc::new(TimeGrid::linspace(0.0, 1.0, 21).unwrap());
        let initial = [
            State::new(0.0, 1.0, 1.0),
            State::new(f64::NAN, 0.0, 0.0),
            State::new(0.0, 2.1, 1.0),
        ];
        TrajectorySet::from_initial_states(
            &Integrator::default(),
            &LorenzSystem::classic(),
            &grid,
            &initial,
        )
    }

    #[test]
    fn test_zero_window_rejected() {
        let set = set_with_failure();
        assert_eq!(
            WindowedPlaybackBuffer::new(&set, 0).unwrap_err(),
            SimulationError::InvalidWindow
        );
    }

    #[test]
    fn test_window_boundaries() {
        let set = set_with_failure();
        let buffer = WindowedPlaybackBuffer::new(&set, 5).unwrap();
        assert_eq!(buffer.frame_count(), 21);

        let first = buffer.get_frame(0).unwrap();
        assert_eq!(first.current_time, 0.0);
        assert!(first.windows.iter().all(|w| w.len() == 1));

        let early = buffer.get_frame(2).unwrap();
        assert!(early.windows.iter().all(|w| w.len() == 3));

        let late = buffer.get_frame(12).unwrap();
        let traj = set.trajectory(0).unwrap();
        assert_eq!(late.windows[0].len(), 5);
        assert_eq!(late.windows[0].states, &traj.states()[8..=12]);
        assert_eq!(late.windows[0].times, &set.grid().points()[8..=12]);
        assert_eq!(late.windows[0].head(), Some(&traj.states()[12]));
    }

    #[test]
    fn test_failed_entries_omitted() {
        let set = set_with_failure();
        let buffer = WindowedPlaybackBuffer::new(&set, 3).unwrap();
        let frame = buffer.get_frame(10).unwrap();
        let ids: Vec<usize> = frame.windows.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_out_of_range() {
        let set = set_with_failure();
        let buffer = WindowedPlaybackBuffer::with_default_window(&set);
        assert_eq!(
            buffer.get_frame(21).unwrap_err(),
            SimulationError::FrameIndexOutOfRange {
                index: 21,
                frame_count: 21
            }
        );
    }

    #[test]
    fn test_frames_repeatable() {
        let set = set_with_failure();
        let buffer = WindowedPlaybackBuffer::new(&set, 4).unwrap();

        assert_eq!(buffer.frames().len(), 21);
        let a: Vec<Frame> = buffer.frames().collect();
        let b: Vec<Frame> = buffer.frames().collect();
        assert_eq!(a, b);
        assert_eq!(a[7], buffer.get_frame(7).unwrap());
        assert_eq!(a.last().map(|f| f.index), Some(20));
    }
}
