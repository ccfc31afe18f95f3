use web_time::{Duration, Instant};

/// Longest delta handed to the camera, in seconds. Longer gaps (a stalled
/// window, a breakpoint) would otherwise teleport the camera.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Clamp a measured frame time to `[0, MAX_FRAME_DELTA]`.
#[must_use]
pub fn clamp_delta(seconds: f32) -> f32 {
    seconds.clamp(0.0, MAX_FRAME_DELTA)
}

/// Fold one frame time into an exponential moving average of FPS.
#[must_use]
pub fn smoothed_fps(previous: f32, frame_time: f32, smoothing: f32) -> f32 {
    if frame_time <= 0.0 {
        return previous;
    }
    previous * (1.0 - smoothing) + smoothing / frame_time
}

/// Frame timing with FPS calculation and optional frame limiting
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Whether enough time has passed since the last tick to render.
    #[must_use]
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Start a frame: returns the clamped seconds since the previous tick
    /// and updates the FPS average.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.smoothed_fps =
            smoothed_fps(self.smoothed_fps, elapsed, self.smoothing);
        clamp_delta(elapsed)
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_stalls_are_clamped() {
        assert_eq!(clamp_delta(3.0), MAX_FRAME_DELTA);
        assert_eq!(clamp_delta(0.016), 0.016);
        assert_eq!(clamp_delta(-1.0), 0.0);
    }

    #[test]
    fn fps_average_moves_toward_instant_rate() {
        let fps = smoothed_fps(60.0, 1.0 / 30.0, 0.5);
        assert!((fps - 45.0).abs() < 1e-3);
        assert_eq!(smoothed_fps(60.0, 0.0, 0.5), 60.0);
    }

    #[test]
    fn uncapped_timer_always_renders() {
        let mut timing = FrameTiming::new(0);
        assert!(timing.should_render());
        let dt = timing.tick();
        assert!((0.0..=MAX_FRAME_DELTA).contains(&dt));
    }
}
