//! Keyboard bindings for the control bar.
//!
//! A key only acts on controls that are visible in the current panel, the
//! same way a hidden button cannot be clicked.

use winit::keyboard::KeyCode;

use crate::config::SpeedRange;
use crate::phase::{Panel, PhaseId, PlaybackEvent};

/// Result of a key press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiAction {
    Playback(PlaybackEvent),
    Exit,
}

/// Map a pressed key to an action, given the open panel and current speed.
pub fn map_key(key: KeyCode, panel: Panel, speed: f32, range: &SpeedRange) -> Option<UiAction> {
    let event = match (key, panel) {
        (KeyCode::Escape, Panel::None) => return Some(UiAction::Exit),
        (KeyCode::Escape, Panel::Phases) => PlaybackEvent::TogglePhasesPanel,
        (KeyCode::Escape, Panel::Options) => PlaybackEvent::ToggleOptionsPanel,

        (KeyCode::Space, Panel::None) => PlaybackEvent::ToggleAnimation,
        (KeyCode::KeyP, Panel::None | Panel::Phases) => PlaybackEvent::TogglePhasesPanel,
        (KeyCode::KeyO, Panel::None | Panel::Options) => PlaybackEvent::ToggleOptionsPanel,

        (KeyCode::ArrowUp | KeyCode::Equal | KeyCode::NumpadAdd, Panel::Options) => {
            PlaybackEvent::SetSpeed(range.step_up(speed))
        }
        (KeyCode::ArrowDown | KeyCode::Minus | KeyCode::NumpadSubtract, Panel::Options) => {
            PlaybackEvent::SetSpeed(range.step_down(speed))
        }

        (key, Panel::Phases) => PlaybackEvent::SelectPhase(phase_for_digit(key)?),
        _ => return None,
    };
    Some(UiAction::Playback(event))
}

fn phase_for_digit(key: KeyCode) -> Option<PhaseId> {
    let index = match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => 0,
        KeyCode::Digit2 | KeyCode::Numpad2 => 1,
        KeyCode::Digit3 | KeyCode::Numpad3 => 2,
        KeyCode::Digit4 | KeyCode::Numpad4 => 3,
        KeyCode::Digit5 | KeyCode::Numpad5 => 4,
        KeyCode::Digit6 | KeyCode::Numpad6 => 5,
        KeyCode::Digit7 | KeyCode::Numpad7 => 6,
        KeyCode::Digit8 | KeyCode::Numpad8 => 7,
        _ => return None,
    };
    PhaseId::from_index(index)
}
