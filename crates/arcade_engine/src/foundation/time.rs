//! Time management utilities

use std::time::{Duration, Instant};

/// Default upper bound for a single frame's delta time, in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.2;

/// Frame timer producing clamped delta times
///
/// The delta is clamped so that a stall (debugger break, window drag, slow
/// asset load) does not turn into one huge simulation step.
pub struct FrameTimer {
    last_frame: Instant,
    delta_time: f32,
    max_delta: f32,
    total_time: f32,
    frame_count: u64,
    fps: FpsCounter,
}

impl FrameTimer {
    /// Create a new timer with the given delta clamp (seconds)
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            max_delta,
            total_time: 0.0,
            frame_count: 0,
            fps: FpsCounter::default(),
        }
    }

    /// Restart measuring from now without counting the idle time
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.delta_time = 0.0;
    }

    /// Advance the timer (call once per frame) and return the clamped delta
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(elapsed)
    }

    /// Record an externally measured frame duration and return the clamped delta
    pub fn record(&mut self, elapsed: f32) -> f32 {
        self.delta_time = clamp_delta(elapsed, self.max_delta);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.fps.record(elapsed.max(0.0));
        self.delta_time
    }

    /// Get the time since the last frame in seconds (clamped)
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second measured over the last completed one-second window
    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }
}

/// Clamp a raw frame duration into `[0, max_delta]`
pub fn clamp_delta(elapsed: f32, max_delta: f32) -> f32 {
    if elapsed.is_nan() {
        return 0.0;
    }
    elapsed.clamp(0.0, max_delta)
}

/// Counts frames over one-second windows
#[derive(Debug, Default)]
pub struct FpsCounter {
    window_time: f32,
    window_frames: u32,
    fps: f32,
}

impl FpsCounter {
    /// Record one frame of the given duration
    pub fn record(&mut self, frame_time: f32) {
        self.window_time += frame_time;
        self.window_frames += 1;
        if self.window_time >= 1.0 {
            self.fps = self.window_frames as f32 / self.window_time;
            self.window_time = 0.0;
            self.window_frames = 0;
        }
    }

    /// Last measured rate
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Sleeps at the end of a frame to hold the loop at a target rate
pub struct FrameLimiter {
    frame_budget: Option<Duration>,
    frame_start: Instant,
}

impl FrameLimiter {
    /// Create a limiter for `target_fps` frames per second (0 = uncapped)
    pub fn new(target_fps: u32) -> Self {
        let frame_budget = (target_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(target_fps)));
        Self {
            frame_budget,
            frame_start: Instant::now(),
        }
    }

    /// Mark the start of a frame
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Time left in the current frame's budget
    pub fn remaining(&self) -> Duration {
        match self.frame_budget {
            Some(budget) => budget.saturating_sub(self.frame_start.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Sleep away whatever is left of the frame budget
    pub fn wait(&self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_delta_is_clamped() {
        let mut timer = FrameTimer::new(DEFAULT_MAX_DELTA);
        assert_relative_eq!(timer.record(1.5), 0.2);
        assert_relative_eq!(timer.record(0.016), 0.016);
        assert_eq!(timer.frame_count(), 2);
        assert_relative_eq!(timer.total_time(), 0.216, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_and_nan_deltas() {
        assert_relative_eq!(clamp_delta(-0.5, 0.2), 0.0);
        assert_relative_eq!(clamp_delta(f32::NAN, 0.2), 0.0);
    }

    #[test]
    fn test_fps_counter_window() {
        let mut counter = FpsCounter::default();
        for _ in 0..60 {
            counter.record(1.0 / 60.0);
        }
        // One more frame closes the window on accumulated rounding
        counter.record(1.0 / 60.0);
        assert!(counter.fps() > 55.0 && counter.fps() < 65.0);
    }

    #[test]
    fn test_uncapped_limiter_never_waits() {
        let limiter = FrameLimiter::new(0);
        assert!(limiter.remaining().is_zero());
    }

    #[test]
    fn test_capped_limiter_has_budget() {
        let mut limiter = FrameLimiter::new(10);
        limiter.begin_frame();
        assert!(limiter.remaining() <= Duration::from_millis(100));
        assert!(limiter.remaining() > Duration::from_millis(50));
    }
}
