use std::time::{Duration, Instant};

/// Timing of one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock was created or reset, summed from clamped deltas.
    pub elapsed: f64,

    pub now: Instant,
    pub frame_index: u64,
}

/// Produces [`FrameTime`]s with delta time clamped to `[dt_min, dt_max]`.
///
/// The upper clamp keeps camera motion sane after a stall (debugger pause,
/// minimized window); the lower one avoids zero deltas from back-to-back ticks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f64,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
    pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_clamps(Self::DEFAULT_DT_MIN, Self::DEFAULT_DT_MAX)
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts timing from now. Frame indices keep counting.
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.elapsed = 0.0;
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;
        self.elapsed += dt.as_secs_f64();

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed,
            now,
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
    fn delta_is_clamped_both_ways() {
        let mut clock = FrameClock::new();
        let start = clock.last;

        let ft = clock.tick_at(start);
        assert_eq!(ft.dt, FrameClock::DEFAULT_DT_MIN.as_secs_f32());

        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(ft.dt, FrameClock::DEFAULT_DT_MAX.as_secs_f32());
    }

    #[test]
    fn frames_are_counted_and_elapsed_accumulates() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_secs(1));
        let start = clock.last;

        let a = clock.tick_at(start + Duration::from_millis(10));
        let b = clock.tick_at(start + Duration::from_millis(30));

        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        approx::assert_relative_eq!(b.elapsed, 0.030, epsilon = 1e-9);
        approx::assert_relative_eq!(b.dt, 0.020, epsilon = 1e-6);
    }
}
