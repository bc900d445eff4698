//! Plain-text frame renderer.

use std::fmt::Write;

use super::{FrameRenderer, RenderContext};
use crate::playback::Frame;

const TRAIL: char = '.';
const HEADS: &[char] = &['o', 'x', '*', '+', '#', '@', '%', '&'];

/// Terminal renderer: trails as dots, heads as per-trajectory glyphs
#[derive(Debug, Clone, Default)]
pub struct AsciiRenderer {
    canvas: Vec<char>,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Glyph drawn at the head of trajectory `id`
    pub fn head_glyph(id: usize) -> char {
        HEADS[id % HEADS.len()]
    }
}

impl FrameRenderer for AsciiRenderer {
    type Output = String;

    fn render(&mut self, ctx: &RenderContext, frame: &Frame<'_>) -> String {
        self.canvas.clear();
        self.canvas.resize(ctx.width * ctx.height, ' ');

        for window in &frame.windows {
            let Some((head, trail)) = window.states.split_last() else {
                continue;
            };
            for state in trail {
                if let Some((c, r)) = ctx.project(state) {
                    let cell = &mut self.canvas[r * ctx.width + c];
                    if *cell == ' ' {
                        *cell = TRAIL;
                    }
                }
            }
            if let Some((c, r)) = ctx.project(head) {
                self.canvas[r * ctx.width + c] = Self::head_glyph(window.id);
            }
        }

        let mut out = String::with_capacity((ctx.width + 1) * (ctx.height + 1) + 48);
        let _ = writeln!(
            out,
            "time: {:.2} [unit of time]   azim {:5.1}°  elev {:4.1}°",
            frame.current_time, ctx.azimuth, ctx.elevation
        );
        for row in self.canvas.chunks(ctx.width.max(1)) {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrate::TimeGrid;
    use crate::playback::WindowedPlaybackBuffer;
    use crate::systems::State;
    use crate::trajectory::TrajectorySet;
    use std::sync::Arc;

    #[test]
    fn test_renders_heads_and_trails() {
        let grid = Arc::new(TimeGrid::linspace(0.0, 1.0, 11).unwrap());
        let set = TrajectorySet::from_initial_states(
            &crate::Integrator::default(),
            &crate::LorenzSystem::classic(),
            &grid,
            &[State::new(0.0, 1.0, 1.0), State::new(0.0, 2.1, 1.0)],
        );
        let buffer = WindowedPlaybackBuffer::new(&set, 4).unwrap();

        let mut ctx = RenderContext::new(40, 20);
        ctx.fit_to(&set);
        let mut renderer = AsciiRenderer::new();
        let text = renderer.render(&ctx, &buffer.get_frame(10).unwrap());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 21);
        assert!(lines[0].starts_with("time: 1.00"));
        assert!(lines[1..].iter().all(|l| l.chars().count() == 40));
        let body: String = lines[1..].concat();
        assert!(body.chars().any(|c| c == 'o' || c == 'x'));
    }

    #[test]
    fn test_glyphs_cycle() {
        assert_eq!(AsciiRenderer::head_glyph(0), 'o');
        assert_eq!(AsciiRenderer::head_glyph(HEADS.len()), 'o');
        assert_eq!(AsciiRenderer::head_glyph(1), 'x');
    }
}
