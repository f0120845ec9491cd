//! Frame timing.
//!
//! One `FrameClock` per render loop; `tick()` once per presented frame.

use std::time::{Duration, Instant};

/// Timing snapshot handed to the application each frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Seconds since the clock was created. Drives the animations.
    pub elapsed: f32,
    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots with clamped deltas.
///
/// The clamp keeps the animation stable when the process is stalled by the
/// debugger, minimized, or starved: a long gap becomes one `dt_max` step
/// instead of a simulation jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_max: Duration::from_millis(250),
        }
    }

    /// Resets the delta baseline without touching `elapsed`.
    ///
    /// Called after surface reconfiguration so the first frame back does not
    /// see the stall as a giant delta.
    pub fn rebase(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns the snapshot for this frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let mut dt = now.saturating_duration_since(self.last);
        if dt > self.dt_max {
            dt = self.dt_max;
        }
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_increments() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_after_a_stall() {
        let mut clock = FrameClock::new();
        clock.last = Instant::now() - Duration::from_secs(10);
        let ft = clock.tick();
        assert!(ft.dt <= 0.2501, "dt {} not clamped", ft.dt);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.tick().elapsed;
        let b = clock.tick().elapsed;
        assert!(b >= a);
    }

    #[test]
    fn rebase_keeps_elapsed() {
        let mut clock = FrameClock::new();
        clock.last = Instant::now() - Duration::from_secs(10);
        clock.rebase();
        let ft = clock.tick();
        assert!(ft.dt < 0.1);
    }
}
