//! Frame timing for the host loop.

use std::time::{Duration, Instant};

/// Longest wall-clock frame handed to the simulation, seconds. Stalls
/// (window drags, breakpoints) are cut down to this.
pub const MAX_FRAME_DT: f32 = 0.25;

/// Produces the per-frame `dt` handed to the animation tick.
///
/// In wall-clock mode `dt` is the real time since the previous frame. With a
/// fixed step (headless runs, tests) every frame advances by exactly that
/// step so the simulation is reproducible.
#[derive(Debug)]
pub struct FrameClock {
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Simulated time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed step in seconds, if any.
    fixed_step: Option<f32>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a wall-clock driven frame clock.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_step: None,
        }
    }

    /// Create a clock that advances by `step` seconds per frame, capped at
    /// [`MAX_FRAME_DT`]. NaN and negative steps give a clock that stands still.
    pub fn fixed(step: f32) -> Self {
        Self {
            fixed_step: Some(step.max(0.0).min(MAX_FRAME_DT)),
            ..Self::new()
        }
    }

    /// Start a new frame and return its `dt` in seconds.
    pub fn tick(&mut self) -> f32 {
        self.delta = match self.fixed_step {
            Some(step) => Duration::from_secs_f32(step),
            None => {
                let now = Instant::now();
                let delta = now - self.last_frame;
                self.last_frame = now;
                delta.min(Duration::from_secs_f32(MAX_FRAME_DT))
            }
        };
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.delta.as_secs_f32()
    }

    /// Delta time of the current frame in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total simulated time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether the clock runs on a fixed step.
    pub fn is_fixed(&self) -> bool {
        self.fixed_step.is_some()
    }

    /// Frames per second implied by the last delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}
