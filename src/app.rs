//! Window and event-loop wiring.
//!
//! `ViewerState` holds everything that does not need a window (controller,
//! camera, speed range) so input handling can be tested headless.
//! `ViewerApp` adds the window, GPU context and renderer on top.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::{SpeedRange, ViewerConfig};
use crate::core::camera::Camera;
use crate::core::error::Error;
use crate::core::time::FrameTimer;
use crate::core::types::Result;
use crate::phase::{Effect, FrameOutput, PlaybackController, PlaybackEvent};
use crate::render::texture::{load_surface, procedural_surface, moon_texture::PROCEDURAL_WIDTH};
use crate::render::{GpuContext, MoonRenderer};
use crate::ui::{map_key, ControlBar, UiAction};

/// Whether the event loop should keep running after an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Headless viewer state: playback plus projection.
pub struct ViewerState {
    pub controller: PlaybackController,
    pub camera: Camera,
    speed_range: SpeedRange,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig, now: f64) -> Self {
        let speed = config.speed.clamp(config.speed.initial);
        let mut controller = PlaybackController::new(config.light, speed, now);
        if let Some(phase) = config.initial_phase {
            log::info!("Starting at {}", phase.display_name());
            controller.handle(PlaybackEvent::SelectPhase(phase), now);
        }
        Self {
            controller,
            camera: Camera::from_config(&config.camera, config.window.width, config.window.height),
            speed_range: config.speed,
        }
    }

    /// Route a key press through the control bar bindings.
    pub fn on_key(&mut self, key: KeyCode, now: f64) -> Flow {
        let action = map_key(key, self.controller.panel(), self.controller.speed(), &self.speed_range);
        match action {
            Some(UiAction::Exit) => Flow::Exit,
            Some(UiAction::Playback(event)) => {
                self.apply(event, now);
                Flow::Continue
            }
            None => Flow::Continue,
        }
    }

    /// Feed an event to the controller and act on its effect. Returns the new
    /// surface size when the caller must resize GPU resources.
    pub fn apply(&mut self, event: PlaybackEvent, now: f64) -> Option<(u32, u32)> {
        match self.controller.handle(event, now) {
            Effect::None => None,
            Effect::LightChanged(direction) => {
                log::debug!("Light direction set to {:?}", direction);
                None
            }
            Effect::Reproject { width, height } => {
                if width == 0 || height == 0 {
                    return None;
                }
                self.camera.set_aspect(width as f32, height as f32);
                Some((width, height))
            }
        }
    }

    pub fn tick(&mut self, now: f64) -> FrameOutput {
        self.controller.tick(now)
    }

    pub fn control_bar(&self) -> ControlBar {
        ControlBar::from_controller(&self.controller, self.speed_range)
    }
}

/// Resolve the moon surface image: an explicit path must load, otherwise
/// a procedural surface is generated.
pub fn load_moon_surface(path: Option<&Path>) -> Result<RgbaImage> {
    match path {
        Some(path) => load_surface(path),
        None => {
            log::info!("No moon texture configured, using procedural surface");
            Ok(procedural_surface(PROCEDURAL_WIDTH))
        }
    }
}

/// winit application driving the viewer.
pub struct ViewerApp {
    config: ViewerConfig,
    state: ViewerState,
    timer: FrameTimer,
    surface: RgbaImage,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<MoonRenderer>,
    error: Option<Error>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let surface = load_moon_surface(config.texture_path.as_deref())?;
        let timer = FrameTimer::new();
        let state = ViewerState::new(&config, timer.wall_secs());
        Ok(Self {
            config,
            state,
            timer,
            surface,
            window: None,
            gpu: None,
            renderer: None,
            error: None,
        })
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| Error::Window(e.to_string()))?,
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let size = window.inner_size();
        self.state.camera.set_aspect(size.width as f32, size.height as f32);
        log::info!("Window created: {}x{}", size.width, size.height);

        let renderer = MoonRenderer::new(&gpu, &self.config, &self.surface);

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self) -> Result<()> {
        self.timer.tick();
        let frame = self.state.tick(self.timer.now_secs());

        if let (Some(gpu), Some(renderer)) = (&self.gpu, &mut self.renderer) {
            renderer.render(gpu, &self.state.camera, &frame)?;
        }

        if let Some(window) = &self.window {
            window.set_title(&format!(
                "{} | {:.0} FPS | {}",
                self.config.window.title,
                self.timer.fps(),
                self.state.control_bar().title()
            ));
        }
        Ok(())
    }

    /// Consume the app after the loop exits, surfacing any fatal error.
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let resize = PlaybackEvent::Resize {
                    width: size.width,
                    height: size.height,
                };
                if let Some((width, height)) = self.state.apply(resize, self.timer.wall_secs()) {
                    if let Some(gpu) = &mut self.gpu {
                        gpu.resize(width, height);
                        if let Some(renderer) = &mut self.renderer {
                            renderer.resize(gpu, width, height);
                        }
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && !event.repeat {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        if self.state.on_key(key, self.timer.wall_secs()) == Flow::Exit {
                            event_loop.exit();
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Run the viewer until the window closes.
pub fn run(config: ViewerConfig) -> Result<()> {
    let mut app = ViewerApp::new(config)?;
    let event_loop = EventLoop::new().map_err(|e| Error::Window(e.to_string()))?;
    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::Window(e.to_string()))?;
    app.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{Panel, PhaseId, PlaybackMode};

    fn state() -> ViewerState {
        ViewerState::new(&ViewerConfig::default(), 0.0)
    }

    #[test]
    fn test_initial_state_from_config() {
        let s = state();
        assert_eq!(s.controller.speed(), 4.0);
        assert_eq!(s.controller.mode(), PlaybackMode::Animating);
        assert!((s.camera.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn test_initial_phase_starts_locked() {
        let config = ViewerConfig {
            initial_phase: Some(PhaseId::WaningCrescent),
            ..Default::default()
        };
        let mut s = ViewerState::new(&config, 0.0);
        assert_eq!(s.controller.mode(), PlaybackMode::PhaseLocked(PhaseId::WaningCrescent));
        assert_eq!(s.controller.panel(), Panel::None);

        let frame = s.tick(30.0);
        let expected = crate::phase::compute_light_direction(PhaseId::WaningCrescent.value(), 4.0);
        assert!((frame.light_direction - expected).length() < 1e-6);

        // Space releases the lock into the normal sweep
        s.on_key(KeyCode::Space, 31.0);
        assert!(s.controller.is_animating());
    }

    #[test]
    fn test_phase_selection_via_keys() {
        let mut s = state();
        assert_eq!(s.on_key(KeyCode::KeyP, 1.0), Flow::Continue);
        assert_eq!(s.controller.panel(), Panel::Phases);
        s.on_key(KeyCode::Digit3, 2.0);
        assert_eq!(s.controller.active_phase(), Some(PhaseId::FirstQuarter));
        s.on_key(KeyCode::Escape, 3.0);
        assert_eq!(s.controller.panel(), Panel::None);
        assert_eq!(s.on_key(KeyCode::Escape, 4.0), Flow::Exit);
    }

    #[test]
    fn test_speed_keys_respect_range() {
        let mut s = state();
        s.on_key(KeyCode::KeyO, 1.0);
        for _ in 0..20 {
            s.on_key(KeyCode::ArrowUp, 1.0);
        }
        assert_eq!(s.controller.speed(), 10.0);
        for _ in 0..20 {
            s.on_key(KeyCode::ArrowDown, 1.0);
        }
        assert_eq!(s.controller.speed(), 1.0);
    }

    #[test]
    fn test_resize_changes_only_projection() {
        let mut s = state();
        let before = s.tick(1.0);
        let mode = s.controller.mode();
        let resized = s.apply(PlaybackEvent::Resize { width: 800, height: 800 }, 1.0);
        assert_eq!(resized, Some((800, 800)));
        assert!((s.camera.aspect - 1.0).abs() < 1e-6);
        assert_eq!(s.controller.mode(), mode);
        assert_eq!(s.controller.frame_output(), before);
    }

    #[test]
    fn test_zero_resize_ignored() {
        let mut s = state();
        let aspect = s.camera.aspect;
        assert_eq!(s.apply(PlaybackEvent::Resize { width: 0, height: 600 }, 1.0), None);
        assert_eq!(s.camera.aspect, aspect);
    }

    #[test]
    fn test_moon_surface_fallback_and_missing_file() {
        let generated = load_moon_surface(None).unwrap();
        assert_eq!(generated.width(), PROCEDURAL_WIDTH);
        let err = load_moon_surface(Some(Path::new("/nonexistent/moon.jpg"))).unwrap_err();
        assert!(matches!(err, Error::Texture(_)));
    }
}
