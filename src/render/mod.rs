//! Render Module: Drawing Playback Frames
//!
//! The simulation core never owns drawing state. A renderer receives the
//! caller's [`RenderContext`] together with each [`Frame`], so several
//! independent animations can run side by side.
//!
//! ## Projection
//!
//! States are normalized into the unit cube around the fitted bounds and
//! projected orthographically:
//!
//!   u = −x·sin(az) + y·cos(az)
//!   v =  z·cos(el) − (x·cos(az) + y·sin(az))·sin(el)

mod ascii;
mod context;

pub use ascii::AsciiRenderer;
pub use context::RenderContext;

use crate::playback::Frame;

/// Consumer of playback frames
pub trait FrameRenderer {
    type Output;

    fn render(&mut self, ctx: &RenderContext, frame: &Frame<'_>) -> Self::Output;
}
