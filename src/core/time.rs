//! Frame timing utilities

use std::time::{Duration, Instant};

/// Tracks wall time since startup, per-frame delta and FPS.
///
/// Times are `f64` seconds so long sessions keep sub-millisecond
/// resolution. Frame ticks read [`FrameTimer::now_secs`], input handlers
/// read [`FrameTimer::wall_secs`].
pub struct FrameTimer {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    fps_timer: Instant,
    fps: f32,
    fps_frame_count: u32,
}

impl FrameTimer {
    /// Create a new frame timer starting now
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a frame timer with an explicit start instant
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_frame: start,
            delta: Duration::ZERO,
            frame_count: 0,
            fps_timer: start,
            fps: 0.0,
            fps_frame_count: 0,
        }
    }

    /// Call once per frame to update timing
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Advance timing to `now`. Instants earlier than the last frame are
    /// treated as a zero-length frame.
    pub fn tick_at(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now.max(self.last_frame);
        self.frame_count += 1;
        self.fps_frame_count += 1;

        // Update FPS every second
        let fps_elapsed = now.saturating_duration_since(self.fps_timer);
        if fps_elapsed >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = now;
        }
    }

    /// Seconds between startup and the most recent tick
    pub fn now_secs(&self) -> f64 {
        self.last_frame.duration_since(self.start).as_secs_f64()
    }

    /// Seconds between startup and the current instant, independent of ticks.
    /// Input handlers use this so a pause lands on the real press time.
    pub fn wall_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_tracks_delta_and_now() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);
        timer.tick_at(start + Duration::from_millis(250));
        assert!((timer.delta_secs() - 0.25).abs() < 1e-4);
        assert!((timer.now_secs() - 0.25).abs() < 1e-4);

        timer.tick_at(start + Duration::from_millis(500));
        assert!((timer.delta_secs() - 0.25).abs() < 1e-4);
        assert!((timer.now_secs() - 0.5).abs() < 1e-4);
        assert_eq!(timer.frame_count(), 2);
    }

    #[test]
    fn test_fps_updates_after_one_second() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);
        for i in 1..=60 {
            timer.tick_at(start + Duration::from_micros(i * 16_667));
        }
        assert!(
            (timer.fps() - 60.0).abs() < 1.0,
            "fps = {} expected ~60",
            timer.fps()
        );
    }

    #[test]
    fn test_backwards_instant_is_zero_delta() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);
        timer.tick_at(start + Duration::from_secs(2));
        timer.tick_at(start + Duration::from_secs(1));
        assert_eq!(timer.delta_secs(), 0.0);
        assert!((timer.now_secs() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_long_uptime_keeps_millisecond_resolution() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);
        let day_and_half = Duration::from_secs(36 * 3600);
        timer.tick_at(start + day_and_half);
        let a = timer.now_secs();
        timer.tick_at(start + day_and_half + Duration::from_millis(1));
        let b = timer.now_secs();
        assert!(
            ((b - a) - 0.001).abs() < 1e-6,
            "1ms frame measured as {}s after 36h",
            b - a
        );
    }
}
