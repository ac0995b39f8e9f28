//! Virtual frame clock for deterministic playback.

use std::time::Duration;

/// Frame clock advanced manually, one frame at a time.
///
/// Time is derived from the integer frame index, so it never drifts and two
/// runs at the same fps produce identical timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    fps: u32,
    frame: u64,
}

impl FrameClock {
    /// Creates a clock at frame 0. `fps` of zero is treated as one.
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            frame: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances one frame.
    pub fn tick(&mut self) {
        self.frame += 1;
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    /// Current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        self.frame * 1_000_000_000 / u64::from(self.fps)
    }

    pub fn time_secs(&self) -> f64 {
        self.frame as f64 / f64::from(self.fps)
    }

    /// Frames needed to play `duration` seconds, both ends included:
    /// `⌈duration · fps⌉ + 1`.
    pub fn frame_count(&self, duration: f64) -> u64 {
        let frames = duration.max(0.0) * f64::from(self.fps);
        // absorb rounding noise such as 22.8 * 30 = 684.0000000000001
        (frames - 1e-9).ceil().max(0.0) as u64 + 1
    }
}
