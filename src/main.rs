// =============================================================================
// VK-VIEWPORT DEMO HOST - winit window driving the viewport core
// =============================================================================
//
// The host owns the window and the tick timer. Everything Vulkan lives behind
// `Viewport`; the host only forwards window events and shows the overlay
// lines in the title bar.
//
// KEYS:
//   Esc  quit
//   F1   toggle the diagnostic overlay
//   F5   reload shaders from disk
//   F11  toggle fullscreen
//
// =============================================================================

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use vk_viewport::config::GraphicsConfig;
use vk_viewport::hot_reload::ShaderWatcher;
use vk_viewport::pacing::TickTimer;
use vk_viewport::{
    Config, Extent, FpsCounter, NativeWindow, ShaderSet, ShaderSource, TickOutcome, Viewport,
    ViewportOptions, VulkanLoader,
};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowAttributes},
};

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    // Load configuration from config.toml
    let config = Config::load();

    init_logging(&config)?;
    log::info!("Starting Vulkan viewport");
    log::info!(
        "Window: {}x{} ({})",
        config.window.width,
        config.window.height,
        if config.window.fullscreen { "fullscreen" } else { "windowed" }
    );
    log::info!(
        "Max FPS: {}, vsync: {}",
        config.graphics.max_fps,
        config.graphics.vsync
    );

    let shaders = load_shaders(&config.graphics)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, shaders);
    event_loop.run_app(&mut app)?;
    Ok(())
}

/// Initialize logging, optionally redirected to a log file
fn init_logging(config: &Config) -> Result<()> {
    use env_logger::{Builder, Target};
    use log::LevelFilter;

    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();

    if config.debug.log_to_file {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&config.debug.log_file)
            .with_context(|| format!("Failed to open log file {:?}", config.debug.log_file))?;

        writeln!(file, "=== Vulkan Viewport Log ===")?;
        writeln!(file, "Started: {:?}", std::time::SystemTime::now())?;
        writeln!(file)?;

        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn load_shaders(graphics: &GraphicsConfig) -> Result<ShaderSet> {
    ShaderSet::load(
        &ShaderSource::Path(graphics.vertex_shader.clone()),
        &ShaderSource::Path(graphics.fragment_shader.clone()),
    )
    .context("Failed to load shaders (compile them with glslc, see build.rs)")
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// IMPORTANT: `viewport` is declared before `window` so the surface is
/// released before the window it was created from.
struct App {
    config: Config,
    viewport: Viewport<VulkanLoader>,
    timer: TickTimer,
    fps: FpsCounter,
    watcher: Option<ShaderWatcher>,
    window: Option<Arc<Window>>,
    is_fullscreen: bool,
}

impl App {
    fn new(config: Config, shaders: ShaderSet) -> Self {
        let loader = VulkanLoader {
            enable_validation: config.debug.validation_layers,
        };
        let viewport = Viewport::new(loader, ViewportOptions::from(&config), shaders);

        let watcher = if config.debug.hot_reload_shaders {
            let files = [
                config.graphics.vertex_shader.clone(),
                config.graphics.fragment_shader.clone(),
            ];
            match ShaderWatcher::new(&files) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    log::warn!("Shader hot reload disabled: {:#}", e);
                    None
                }
            }
        } else {
            None
        };

        let now = Instant::now();
        Self {
            timer: TickTimer::new(config.graphics.max_fps, now),
            fps: FpsCounter::new(now),
            is_fullscreen: config.window.fullscreen,
            config,
            viewport,
            watcher,
            window: None,
        }
    }

    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        match self.viewport.on_tick() {
            Ok(TickOutcome::Presented { .. }) => {
                if self.fps.frame(Instant::now()) {
                    self.update_title();
                }
            }
            Ok(TickOutcome::Skipped(reason)) => {
                log::trace!("Tick skipped: {:?}", reason);
            }
            Err(e) => {
                log::error!("Render error: {}", e);
                event_loop.exit();
            }
        }
    }

    fn update_title(&self) {
        let Some(ref window) = self.window else {
            return;
        };
        let lines = self
            .viewport
            .overlay_lines(self.fps.fps(), self.fps.frame_time_ms());
        let mode = if self.is_fullscreen { "fullscreen" } else { "windowed" };

        if lines.is_empty() {
            window.set_title(&format!("{} [{}]", self.config.window.title, mode));
        } else {
            window.set_title(&format!(
                "{} - {} [{}]",
                self.config.window.title,
                lines.join(" | "),
                mode
            ));
        }
    }

    fn reload_shaders(&mut self) {
        let overlay = self.viewport.overlay().clone();
        match load_shaders(&self.config.graphics) {
            Ok(shaders) => {
                log::info!("Shaders reloaded");
                self.viewport.set_shaders(shaders);
                overlay.set_debug_message(None);
            }
            Err(e) => {
                log::warn!("Shader reload failed: {:#}", e);
                overlay.set_debug_message(Some(format!("shader reload failed: {e}")));
            }
        }
    }

    fn toggle_fullscreen(&mut self) {
        if let Some(ref window) = self.window {
            self.is_fullscreen = !self.is_fullscreen;

            if self.is_fullscreen {
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                log::info!("Entered fullscreen mode");
            } else {
                window.set_fullscreen(None);
                log::info!("Exited fullscreen mode");
            }
            // The resulting Resized event reaches the viewport
        }
    }
}

// =============================================================================
// EVENT HANDLING
// =============================================================================

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut window_attributes = WindowAttributes::default()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        if self.config.window.fullscreen {
            window_attributes =
                window_attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {:?}", e);
                event_loop.exit();
                return;
            }
        };

        let native = match NativeWindow::from_window(window.as_ref()) {
            Ok(native) => native,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.viewport
            .on_attach(native, Extent::new(size.width, size.height));
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                self.viewport.on_close();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.viewport
                    .on_resize(Extent::new(size.width, size.height));
            }

            WindowEvent::RedrawRequested => {
                self.tick(event_loop);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                use winit::keyboard::{KeyCode, PhysicalKey};

                if !event.state.is_pressed() || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    match key {
                        KeyCode::Escape => {
                            log::info!("ESC pressed, exiting...");
                            self.viewport.on_close();
                            event_loop.exit();
                        }
                        KeyCode::F1 => {
                            let enabled = !self.viewport.overlay().is_enabled();
                            self.viewport.set_debug_overlay_enabled(enabled);
                            self.update_title();
                        }
                        KeyCode::F5 => self.reload_shaders(),
                        KeyCode::F11 => self.toggle_fullscreen(),
                        _ => {}
                    }
                }
            }

            _ => {}
        }
    }

    /// Paces redraws to `max_fps` and polls the shader watcher.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.watcher.as_ref().is_some_and(ShaderWatcher::poll_changed) {
            self.reload_shaders();
        }

        self.timer.set_interval(self.viewport.tick_interval());
        if self.timer.poll(Instant::now()) {
            if let Some(ref window) = self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.timer.deadline()));
    }
}
