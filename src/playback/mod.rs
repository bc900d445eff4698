//! Playback Module: Trailing-Window Animation Frames
//!
//! Animating an ensemble shows each trajectory as a short trail that
//! follows its head point. [`WindowedPlaybackBuffer`] turns a finished
//! [`TrajectorySet`](crate::TrajectorySet) into a sequence of [`Frame`]s,
//! each borrowing the relevant slices instead of copying states.

mod buffer;

pub use buffer::{Frame, Frames, TrajectoryWindow, WindowedPlaybackBuffer, DEFAULT_WINDOW};
