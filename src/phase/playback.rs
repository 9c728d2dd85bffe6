//! Playback state machine.
//!
//! Owns the playback mode, the open control panel, the selected phase, the
//! animation speed and the pausable clock. Input is applied through
//! [`PlaybackController::handle`]; once per displayed frame the host calls
//! [`PlaybackController::tick`] and hands the resulting [`FrameOutput`] to the
//! renderer.

use crate::core::types::Vec3;
use crate::phase::clock::PlaybackClock;
use crate::phase::light::LightModel;
use crate::phase::catalog::PhaseId;

/// Control-bar sub-view currently shown. Independent of playback mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    None,
    Phases,
    Options,
}

/// How the light direction is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Clock running, light sweeps with elapsed time.
    Animating,
    /// Clock stopped, last light direction held.
    Paused,
    /// Clock stopped, light pinned to a phase value.
    PhaseLocked(PhaseId),
}

/// Input delivered by the control surface or the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaybackEvent {
    ToggleAnimation,
    SelectPhase(PhaseId),
    TogglePhasesPanel,
    ToggleOptionsPanel,
    SetSpeed(f32),
    Resize { width: u32, height: u32 },
}

/// What the host must do after an event has been handled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    None,
    /// Light direction changed immediately, outside the frame tick.
    LightChanged(Vec3),
    /// Viewport changed; only projection state needs updating.
    Reproject { width: u32, height: u32 },
}

/// Lighting inputs for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutput {
    pub light_direction: Vec3,
    /// Elapsed playback seconds, frozen while not animating.
    pub time: f64,
}

/// Playback controller. One instance per viewer, owned by the app.
#[derive(Clone, Debug)]
pub struct PlaybackController {
    model: LightModel,
    mode: PlaybackMode,
    panel: Panel,
    selected_phase: Option<PhaseId>,
    speed: f32,
    clock: PlaybackClock,
    light_direction: Vec3,
    time: f64,
}

impl PlaybackController {
    /// Create an animating controller whose clock starts at wall time `now`.
    pub fn new(model: LightModel, speed: f32, now: f64) -> Self {
        let speed = if is_valid_speed(speed) {
            speed
        } else {
            log::warn!("Invalid initial speed {speed}, using 1.0");
            1.0
        };
        Self {
            model,
            mode: PlaybackMode::Animating,
            panel: Panel::None,
            selected_phase: None,
            speed,
            clock: PlaybackClock::running(now),
            light_direction: model.direction(0.0, speed),
            time: 0.0,
        }
    }

    /// Apply one input event at wall time `now`.
    pub fn handle(&mut self, event: PlaybackEvent, now: f64) -> Effect {
        match event {
            PlaybackEvent::ToggleAnimation => {
                self.toggle_animation(now);
                Effect::None
            }
            PlaybackEvent::SelectPhase(phase) => self.select_phase(phase, now),
            PlaybackEvent::TogglePhasesPanel => self.toggle_phases_panel(now),
            PlaybackEvent::ToggleOptionsPanel => {
                self.toggle_options_panel();
                Effect::None
            }
            PlaybackEvent::SetSpeed(speed) => {
                self.set_speed(speed);
                Effect::None
            }
            PlaybackEvent::Resize { width, height } => Effect::Reproject { width, height },
        }
    }

    /// Advance one frame at wall time `now` and return the lighting inputs.
    ///
    /// Only `Animating` and `PhaseLocked` recompute the light; `Paused`
    /// returns the last values unchanged.
    pub fn tick(&mut self, now: f64) -> FrameOutput {
        match self.mode {
            PlaybackMode::Animating => {
                let t = self.clock.elapsed(now);
                self.time = t;
                self.light_direction = self.model.direction(t, self.speed);
            }
            PlaybackMode::PhaseLocked(phase) => {
                self.light_direction = self.model.direction(f64::from(phase.value()), self.speed);
            }
            PlaybackMode::Paused => {}
        }
        self.frame_output()
    }

    /// Lighting inputs as of the last tick or event.
    #[inline]
    pub fn frame_output(&self) -> FrameOutput {
        FrameOutput {
            light_direction: self.light_direction,
            time: self.time,
        }
    }

    #[inline]
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    #[inline]
    pub fn panel(&self) -> Panel {
        self.panel
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.mode == PlaybackMode::Animating
    }

    /// Phase currently pinning the light, if any.
    pub fn active_phase(&self) -> Option<PhaseId> {
        match self.mode {
            PlaybackMode::PhaseLocked(phase) => Some(phase),
            _ => None,
        }
    }

    /// Last phase the user picked. Survives closing the phase panel so it
    /// can be re-applied when the panel opens again.
    #[inline]
    pub fn selected_phase(&self) -> Option<PhaseId> {
        self.selected_phase
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn light_direction(&self) -> Vec3 {
        self.light_direction
    }

    #[inline]
    pub fn light_model(&self) -> &LightModel {
        &self.model
    }

    /// Elapsed playback seconds at wall time `now`.
    #[inline]
    pub fn elapsed(&self, now: f64) -> f64 {
        self.clock.elapsed(now)
    }

    #[inline]
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn toggle_animation(&mut self, now: f64) {
        match self.mode {
            PlaybackMode::Animating => self.pause(now),
            PlaybackMode::Paused | PlaybackMode::PhaseLocked(_) => self.resume(now),
        }
    }

    fn select_phase(&mut self, phase: PhaseId, now: f64) -> Effect {
        self.time = self.clock.pause(now);
        self.mode = PlaybackMode::PhaseLocked(phase);
        self.selected_phase = Some(phase);
        self.light_direction = self.model.direction(f64::from(phase.value()), self.speed);
        log::debug!("Phase locked: {}", phase.display_name());
        Effect::LightChanged(self.light_direction)
    }

    fn toggle_phases_panel(&mut self, now: f64) -> Effect {
        match self.panel {
            Panel::Options => {
                log::debug!("Phases panel ignored while options are open");
                Effect::None
            }
            Panel::Phases => {
                self.panel = Panel::None;
                self.resume(now);
                Effect::None
            }
            Panel::None => {
                self.panel = Panel::Phases;
                match self.selected_phase {
                    Some(phase) => self.select_phase(phase, now),
                    None => {
                        self.pause(now);
                        Effect::None
                    }
                }
            }
        }
    }

    fn toggle_options_panel(&mut self) {
        self.panel = match self.panel {
            Panel::None => Panel::Options,
            Panel::Options => Panel::None,
            Panel::Phases => {
                log::debug!("Options panel ignored while phases are open");
                Panel::Phases
            }
        };
    }

    fn set_speed(&mut self, speed: f32) {
        if is_valid_speed(speed) {
            self.speed = speed;
            log::debug!("Animation speed: {speed}");
        } else {
            log::warn!("Rejected animation speed {speed}");
        }
    }

    /// Stop the sweep. The held light and time are re-derived at the pause
    /// instant, which can be later than the last tick.
    fn pause(&mut self, now: f64) {
        let captured = self.clock.pause(now);
        if self.mode == PlaybackMode::Animating {
            self.mode = PlaybackMode::Paused;
            self.time = captured;
            self.light_direction = self.model.direction(captured, self.speed);
            log::debug!("Paused at {captured:.2}s");
        }
    }

    fn resume(&mut self, now: f64) {
        self.clock.resume(now);
        self.mode = PlaybackMode::Animating;
        log::debug!("Resumed from {:.2}s", self.clock.elapsed(now));
    }
}

#[inline]
fn is_valid_speed(speed: f32) -> bool {
    speed.is_finite() && speed > 0.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::light::compute_light_direction;

    fn controller() -> PlaybackController {
        PlaybackController::new(LightModel::default(), 1.0, 0.0)
    }

    #[test]
    fn test_starts_animating() {
        let c = controller();
        assert_eq!(c.mode(), PlaybackMode::Animating);
        assert_eq!(c.panel(), Panel::None);
        assert_eq!(c.active_phase(), None);
        assert!((c.light_direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tick_sweeps_while_animating() {
        let mut c = controller();
        let out = c.tick(12.0);
        assert!((out.time - 12.0).abs() < 1e-6);
        let expected = compute_light_direction(12.0, 1.0);
        assert!((out.light_direction - expected).length() < 1e-6);
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let mut c = controller();
        c.tick(3.0);
        c.handle(PlaybackEvent::ToggleAnimation, 5.0);
        assert_eq!(c.mode(), PlaybackMode::Paused);
        assert_eq!(c.elapsed(7.0), 5.0);

        c.handle(PlaybackEvent::ToggleAnimation, 9.0);
        assert_eq!(c.mode(), PlaybackMode::Animating);
        assert!((c.elapsed(9.0) - 5.0).abs() < 1e-6, "resume must not jump");
        let out = c.tick(10.0);
        assert!((out.time - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_pause_between_frames_holds_press_time() {
        let mut c = controller();
        c.tick(3.0);
        c.handle(PlaybackEvent::ToggleAnimation, 5.0);

        // The held frame reflects the press, not the earlier tick
        let held = c.tick(7.0);
        assert!((held.time - 5.0).abs() < 1e-9);
        let expected = compute_light_direction(5.0, 1.0);
        assert!((held.light_direction - expected).length() < 1e-6);

        // Resuming continues from exactly what was shown
        c.handle(PlaybackEvent::ToggleAnimation, 9.0);
        let resumed = c.tick(9.0);
        assert_eq!(resumed.time, held.time);
        assert!((resumed.light_direction - held.light_direction).length() < 1e-6);
    }

    #[test]
    fn test_paused_tick_holds_light() {
        let mut c = controller();
        let before = c.tick(4.0);
        c.handle(PlaybackEvent::ToggleAnimation, 4.0);
        let after = c.tick(40.0);
        assert_eq!(before, after);
    }

    #[test]
    fn test_select_phase_pins_light() {
        let mut c = controller();
        c.tick(2.0);
        let effect = c.handle(PlaybackEvent::SelectPhase(PhaseId::Full), 3.0);
        let expected = compute_light_direction(PhaseId::Full.value(), 1.0);
        assert_eq!(effect, Effect::LightChanged(expected));
        assert_eq!(c.active_phase(), Some(PhaseId::Full));
        assert!(!c.clock().is_running());

        // Ticks keep the light pinned and the time frozen at the selection
        let out = c.tick(100.0);
        assert!((out.light_direction - expected).length() < 1e-6);
        assert!((out.time - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_second_selection_wins_from_any_state() {
        let setups: [fn(&mut PlaybackController); 5] = [
            |_| {},
            |c| {
                c.handle(PlaybackEvent::ToggleAnimation, 1.0);
            },
            |c| {
                c.handle(PlaybackEvent::TogglePhasesPanel, 1.0);
            },
            |c| {
                c.handle(PlaybackEvent::SelectPhase(PhaseId::ThirdQuarter), 1.0);
            },
            |c| {
                c.handle(PlaybackEvent::ToggleOptionsPanel, 1.0);
            },
        ];
        for setup in setups {
            let mut c = controller();
            setup(&mut c);
            c.handle(PlaybackEvent::SelectPhase(PhaseId::New), 2.0);
            c.handle(PlaybackEvent::SelectPhase(PhaseId::WaxingCrescent), 3.0);
            assert_eq!(c.active_phase(), Some(PhaseId::WaxingCrescent));
            assert!(!c.is_animating());
            assert!(!c.clock().is_running());
        }
    }

    #[test]
    fn test_reopening_phases_panel_reissues_same_light() {
        let mut c = controller();
        c.handle(PlaybackEvent::TogglePhasesPanel, 1.0);
        let selected = c.handle(PlaybackEvent::SelectPhase(PhaseId::FirstQuarter), 2.0);
        let displayed = c.light_direction();
        assert_eq!(selected, Effect::LightChanged(displayed));

        // Closing resumes the sweep
        c.handle(PlaybackEvent::TogglePhasesPanel, 3.0);
        assert!(c.is_animating());
        c.tick(20.0);
        assert!((c.light_direction() - displayed).length() > 1e-3);

        // Reopening snaps back without drift
        let reopened = c.handle(PlaybackEvent::TogglePhasesPanel, 21.0);
        assert_eq!(reopened, Effect::LightChanged(displayed));
        assert_eq!(c.active_phase(), Some(PhaseId::FirstQuarter));
    }

    #[test]
    fn test_opening_phases_with_active_phase_keeps_direction() {
        let mut c = controller();
        c.handle(PlaybackEvent::SelectPhase(PhaseId::WaningGibbous), 1.0);
        let shown = c.tick(2.0).light_direction;
        let effect = c.handle(PlaybackEvent::TogglePhasesPanel, 3.0);
        assert_eq!(effect, Effect::LightChanged(shown));
    }

    #[test]
    fn test_opening_phases_without_selection_pauses() {
        let mut c = controller();
        let effect = c.handle(PlaybackEvent::TogglePhasesPanel, 4.0);
        assert_eq!(effect, Effect::None);
        assert_eq!(c.panel(), Panel::Phases);
        assert_eq!(c.mode(), PlaybackMode::Paused);
        assert_eq!(c.elapsed(10.0), 4.0);
    }

    #[test]
    fn test_closing_phases_resumes_from_captured_time() {
        let mut c = controller();
        c.handle(PlaybackEvent::TogglePhasesPanel, 4.0);
        c.handle(PlaybackEvent::SelectPhase(PhaseId::New), 6.0);
        c.handle(PlaybackEvent::TogglePhasesPanel, 10.0);
        assert_eq!(c.panel(), Panel::None);
        assert!(c.is_animating());
        assert!((c.elapsed(10.0) - 4.0).abs() < 1e-6);
        // Selection is remembered for highlighting
        assert_eq!(c.selected_phase(), Some(PhaseId::New));
        assert_eq!(c.active_phase(), None);
    }

    #[test]
    fn test_panels_are_mutually_exclusive() {
        let mut c = controller();
        c.handle(PlaybackEvent::ToggleOptionsPanel, 0.0);
        assert_eq!(c.panel(), Panel::Options);
        assert_eq!(c.handle(PlaybackEvent::TogglePhasesPanel, 1.0), Effect::None);
        assert_eq!(c.panel(), Panel::Options);
        assert!(c.is_animating(), "options panel does not affect playback");

        c.handle(PlaybackEvent::ToggleOptionsPanel, 2.0);
        c.handle(PlaybackEvent::TogglePhasesPanel, 3.0);
        c.handle(PlaybackEvent::ToggleOptionsPanel, 4.0);
        assert_eq!(c.panel(), Panel::Phases);
    }

    #[test]
    fn test_set_speed_applies_next_tick_only() {
        let mut c = controller();
        let before = c.tick(10.0);
        c.handle(PlaybackEvent::SetSpeed(3.0), 10.0);
        assert_eq!(c.frame_output(), before, "no retroactive recompute");
        let after = c.tick(10.0);
        let expected = compute_light_direction(10.0, 3.0);
        assert!((after.light_direction - expected).length() < 1e-6);
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let mut c = controller();
        for bad in [0.0, -2.0, f32::NAN, f32::INFINITY] {
            c.handle(PlaybackEvent::SetSpeed(bad), 1.0);
            assert_eq!(c.speed(), 1.0, "speed {bad} should be rejected");
        }
        let fallback = PlaybackController::new(LightModel::default(), -1.0, 0.0);
        assert_eq!(fallback.speed(), 1.0);
    }

    #[test]
    fn test_resize_only_reprojects() {
        let mut c = controller();
        c.handle(PlaybackEvent::SelectPhase(PhaseId::Full), 1.0);
        let mode = c.mode();
        let out = c.frame_output();
        let clock = *c.clock();

        let effect = c.handle(PlaybackEvent::Resize { width: 800, height: 600 }, 2.0);
        assert_eq!(effect, Effect::Reproject { width: 800, height: 600 });
        assert_eq!(c.mode(), mode);
        assert_eq!(c.frame_output(), out);
        assert_eq!(*c.clock(), clock);
    }

    #[test]
    fn test_toggle_from_phase_lock_resumes() {
        let mut c = controller();
        c.handle(PlaybackEvent::SelectPhase(PhaseId::Full), 5.0);
        c.handle(PlaybackEvent::ToggleAnimation, 8.0);
        assert!(c.is_animating());
        assert!((c.elapsed(8.0) - 5.0).abs() < 1e-6);
    }
}
