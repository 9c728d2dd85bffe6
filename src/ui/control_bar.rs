//! Control bar view model.
//!
//! Derived from the playback controller on demand; it never holds state of
//! its own. The default bar shows the animate, phases and options buttons;
//! opening a panel hides every other button and turns the panel's own button
//! into a back button.

use std::fmt::Write;

use crate::config::SpeedRange;
use crate::phase::{catalog, Panel, PhaseId, PlaybackController};

const BACK: &str = "<< BACK";

/// What the control surface shows for the current playback state.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlBar {
    /// Caption of the play/pause button, `None` when hidden.
    pub animate_button: Option<&'static str>,
    pub phases_button: Option<&'static str>,
    pub options_button: Option<&'static str>,
    pub phase_list_visible: bool,
    /// Phase drawn with the selection highlight.
    pub highlighted_phase: Option<PhaseId>,
    /// Name of the selected phase shown above the list.
    pub phase_caption: Option<&'static str>,
    pub options_list_visible: bool,
    pub speed_caption: String,
    pub speed_range: SpeedRange,
}

impl ControlBar {
    pub fn from_controller(controller: &PlaybackController, speed_range: SpeedRange) -> Self {
        let animate_caption = if controller.is_animating() { "PAUSE" } else { "PLAY" };
        let selected = controller.selected_phase();
        let speed_caption = format!("Animation Speed: {}", controller.speed());

        match controller.panel() {
            Panel::None => Self {
                animate_button: Some(animate_caption),
                phases_button: Some("PHASES"),
                options_button: Some("OPTIONS"),
                phase_list_visible: false,
                highlighted_phase: selected,
                phase_caption: selected.map(PhaseId::display_name),
                options_list_visible: false,
                speed_caption,
                speed_range,
            },
            Panel::Phases => Self {
                animate_button: None,
                phases_button: Some(BACK),
                options_button: None,
                phase_list_visible: true,
                highlighted_phase: selected,
                phase_caption: selected.map(PhaseId::display_name),
                options_list_visible: false,
                speed_caption,
                speed_range,
            },
            Panel::Options => Self {
                animate_button: None,
                phases_button: None,
                options_button: Some(BACK),
                phase_list_visible: false,
                highlighted_phase: selected,
                phase_caption: selected.map(PhaseId::display_name),
                options_list_visible: true,
                speed_caption,
                speed_range,
            },
        }
    }

    /// Single-line rendering of the bar, used as the window title.
    pub fn title(&self) -> String {
        let mut line = String::new();
        if let Some(caption) = self.animate_button {
            let _ = write!(line, "[Space] {caption}  ");
        }
        if let Some(caption) = self.phases_button {
            let _ = write!(line, "[P] {caption}  ");
        }
        if let Some(caption) = self.options_button {
            let _ = write!(line, "[O] {caption}  ");
        }
        if self.phase_list_visible {
            let _ = write!(line, "| Phase: {} |", self.phase_caption.unwrap_or("-"));
            for (i, def) in catalog().iter().enumerate() {
                if self.highlighted_phase == Some(def.id) {
                    let _ = write!(line, " *{}:{}*", i + 1, def.display_name);
                } else {
                    let _ = write!(line, " {}:{}", i + 1, def.display_name);
                }
            }
        }
        if self.options_list_visible {
            let _ = write!(
                line,
                "| {} [{}-{}] (Up/Down)",
                self.speed_caption, self.speed_range.min, self.speed_range.max
            );
        }
        line.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{LightModel, PlaybackEvent};

    fn controller() -> PlaybackController {
        PlaybackController::new(LightModel::default(), 4.0, 0.0)
    }

    #[test]
    fn test_default_bar() {
        let bar = ControlBar::from_controller(&controller(), SpeedRange::default());
        assert_eq!(bar.animate_button, Some("PAUSE"));
        assert_eq!(bar.phases_button, Some("PHASES"));
        assert_eq!(bar.options_button, Some("OPTIONS"));
        assert!(!bar.phase_list_visible);
        assert!(!bar.options_list_visible);
        assert_eq!(bar.speed_caption, "Animation Speed: 4");
    }

    #[test]
    fn test_paused_caption() {
        let mut c = controller();
        c.handle(PlaybackEvent::ToggleAnimation, 1.0);
        let bar = ControlBar::from_controller(&c, SpeedRange::default());
        assert_eq!(bar.animate_button, Some("PLAY"));
    }

    #[test]
    fn test_phases_panel_hides_other_buttons() {
        let mut c = controller();
        c.handle(PlaybackEvent::TogglePhasesPanel, 1.0);
        c.handle(PlaybackEvent::SelectPhase(PhaseId::Full), 2.0);
        let bar = ControlBar::from_controller(&c, SpeedRange::default());
        assert_eq!(bar.animate_button, None);
        assert_eq!(bar.options_button, None);
        assert_eq!(bar.phases_button, Some("<< BACK"));
        assert!(bar.phase_list_visible);
        assert_eq!(bar.highlighted_phase, Some(PhaseId::Full));
        assert_eq!(bar.phase_caption, Some("Full Moon"));
        assert!(bar.title().contains("*5:Full Moon*"), "{}", bar.title());
    }

    #[test]
    fn test_options_panel() {
        let mut c = controller();
        c.handle(PlaybackEvent::ToggleOptionsPanel, 1.0);
        let bar = ControlBar::from_controller(&c, SpeedRange::default());
        assert_eq!(bar.animate_button, None);
        assert_eq!(bar.phases_button, None);
        assert_eq!(bar.options_button, Some("<< BACK"));
        assert!(bar.options_list_visible);
        assert!(bar.title().contains("Animation Speed: 4 [1-10]"), "{}", bar.title());
    }
}
