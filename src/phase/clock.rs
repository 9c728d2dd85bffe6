//! Pausable playback clock.

/// Elapsed playback time as a pure function of wall time and stored offsets.
///
/// While running, `elapsed(now) = accumulated + (now - started_at)`. Pausing
/// folds the running span into `accumulated`, so a pause/resume pair never
/// makes the elapsed time jump.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackClock {
    accumulated: f64,
    started_at: Option<f64>,
}

impl PlaybackClock {
    /// A clock that starts running at `now` with zero elapsed time.
    pub fn running(now: f64) -> Self {
        Self {
            accumulated: 0.0,
            started_at: Some(now),
        }
    }

    /// A stopped clock holding `elapsed` seconds.
    pub fn stopped(elapsed: f64) -> Self {
        Self {
            accumulated: elapsed,
            started_at: None,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Elapsed playback seconds at wall time `now`.
    ///
    /// Wall times earlier than the resume point count as zero progress.
    pub fn elapsed(&self, now: f64) -> f64 {
        match self.started_at {
            Some(start) => self.accumulated + (now - start).max(0.0),
            None => self.accumulated,
        }
    }

    /// Stop the clock, capturing the elapsed time. Returns the captured value.
    pub fn pause(&mut self, now: f64) -> f64 {
        self.accumulated = self.elapsed(now);
        self.started_at = None;
        self.accumulated
    }

    /// Restart the clock from the captured value. No-op if already running.
    pub fn resume(&mut self, now: f64) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::running(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_clock_tracks_wall_time() {
        let clock = PlaybackClock::running(2.0);
        assert!((clock.elapsed(5.5) - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut clock = PlaybackClock::running(0.0);
        let captured = clock.pause(4.0);
        assert_eq!(captured, 4.0);
        assert_eq!(clock.elapsed(100.0), 4.0);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_resume_does_not_jump() {
        let mut clock = PlaybackClock::running(0.0);
        clock.pause(4.0);
        clock.resume(10.0);
        assert!((clock.elapsed(10.0) - 4.0).abs() < 1e-6);
        assert!((clock.elapsed(11.5) - 5.5).abs() < 1e-6);
    }

    #[test]
    fn test_double_pause_and_resume_are_idempotent() {
        let mut clock = PlaybackClock::running(0.0);
        clock.pause(3.0);
        clock.pause(8.0);
        assert_eq!(clock.elapsed(9.0), 3.0);

        clock.resume(9.0);
        clock.resume(12.0);
        assert!((clock.elapsed(13.0) - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_earlier_wall_time_is_clamped() {
        let clock = PlaybackClock::running(5.0);
        assert_eq!(clock.elapsed(4.0), 0.0);
    }

    #[test]
    fn test_stopped_clock() {
        let mut clock = PlaybackClock::stopped(12.0);
        assert_eq!(clock.elapsed(50.0), 12.0);
        clock.resume(50.0);
        assert!((clock.elapsed(51.0) - 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_long_sessions_keep_resolution() {
        let clock = PlaybackClock::running(0.0);
        let late = 36.0 * 3600.0;
        let step = clock.elapsed(late + 0.001) - clock.elapsed(late);
        assert!((step - 0.001).abs() < 1e-6, "1ms step measured as {step}s after 36h");
    }
}
