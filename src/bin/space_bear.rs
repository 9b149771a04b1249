//! Space Bear Cathedrals
//!
//! Run with: `cargo run --bin space_bear` (add `--features audio` for music)
//!
//! Controls:
//! - Placement: Left/Right move, Up rotates, Down drops, Enter advances the build front
//! - Flight: Left/Right turn, Up/Down pitch, Space thrusts
//! - ESC: Exit
//!
//! Settings come from the JSON file named by `SPACE_BEAR_CONFIG`, else
//! `space_bear.json` in the working directory, else built-in defaults.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use space_bear_engine::audio::MusicPlayer;
use space_bear_engine::game::{Flow, Game, GameConfig};
use space_bear_engine::input::{InputState, KeyBindings, KeyCode};
use space_bear_engine::render::{CubeRenderer, GpuContextConfig};
use space_bear_engine::timing::FramePacer;

fn map_key(key: WinitKey) -> KeyCode {
    match key {
        WinitKey::ArrowUp => KeyCode::ArrowUp,
        WinitKey::ArrowDown => KeyCode::ArrowDown,
        WinitKey::ArrowLeft => KeyCode::ArrowLeft,
        WinitKey::ArrowRight => KeyCode::ArrowRight,
        WinitKey::Enter => KeyCode::Enter,
        WinitKey::NumpadEnter => KeyCode::NumpadEnter,
        WinitKey::Space => KeyCode::Space,
        WinitKey::Escape => KeyCode::Escape,
        _ => KeyCode::Unknown,
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct AppState {
    window: Arc<Window>,
    renderer: CubeRenderer,
    game: Game,
    input: InputState,
    bindings: KeyBindings,
    audio: MusicPlayer,
    pacer: FramePacer,
}

impl AppState {
    fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let gpu_config = GpuContextConfig {
            vsync: config.window.vsync,
            sample_count: config.window.msaa_samples,
            ..Default::default()
        };
        let renderer =
            CubeRenderer::new(Arc::clone(&window), gpu_config).context("failed to initialise renderer")?;
        let pacer = FramePacer::new(config.window.tick_rate_hz);
        let game = Game::new(config).context("failed to start game")?;

        Ok(Self {
            window,
            renderer,
            game,
            input: InputState::new(),
            bindings: KeyBindings::new(),
            audio: MusicPlayer::new(),
            pacer,
        })
    }

    /// One update and one render. Returns `false` when the game asked to quit
    /// or the surface can no longer be drawn to.
    fn tick(&mut self) -> bool {
        let flow = self.game.update(&self.input, &mut self.audio);
        self.input.end_frame();
        if flow == Flow::Quit {
            return false;
        }

        self.game.render(&mut self.renderer);
        let scene = self.game.scene_uniforms(self.renderer.aspect_ratio());
        let clear_color = self.game.config().render.clear_color;

        match self.renderer.render_frame(&scene, clear_color) {
            Ok(()) => true,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring");
                self.renderer.reconfigure();
                true
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory");
                false
            }
            Err(e) => {
                tracing::warn!(error = ?e, "frame skipped");
                true
            }
        }
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

struct App {
    config: GameConfig,
    state: Option<AppState>,
    /// Set when startup failed; reported by `main` after the loop ends
    error: Option<anyhow::Error>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_config = &self.config.window;
        let attrs = WindowAttributes::default()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));

        let started = event_loop
            .create_window(attrs)
            .context("failed to create window")
            .and_then(|window| AppState::new(Arc::new(window), self.config.clone()));

        match started {
            Ok(state) => {
                tracing::info!("ready");
                self.state = Some(state);
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                state.renderer.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                state.input.handle_key(&state.bindings, map_key(key), pressed);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if state.pacer.due(now) {
                    state.pacer.advance(now);
                    if !state.tick() {
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.pacer.due(Instant::now()) {
                state.window.request_redraw();
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(state.pacer.deadline()));
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GameConfig::from_env().context("failed to load configuration")?;
    tracing::info!(
        width = config.window.width,
        height = config.window.height,
        tick_rate_hz = config.window.tick_rate_hz,
        "starting Space Bear Cathedrals"
    );

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App {
        config,
        state: None,
        error: None,
    };
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
