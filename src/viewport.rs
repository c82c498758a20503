// Viewport - host boundary of the rendering core
//
// Owns the render state machine. The host calls `on_attach` once, `on_tick`
// from its timer, `on_resize`/`on_close` from window events and the setters
// whenever it likes. GPU objects are built on the first tick and rebuilt at
// the start of the tick after something invalidated them.

use crate::backend::swapchain::{choose_extent, choose_surface_format};
use crate::backend::{
    AppIdentity, CommandSet, DeviceInfo, DeviceLoader, Extent, FramebufferSet, NativeWindow,
    PipelineState, RenderDevice, ShaderSet, SwapchainState,
};
use crate::config::Config;
use crate::error::RenderError;
use crate::frame::{
    FrameScheduler, FrameStats, FrameStep, FrameTimeouts, RenderState, SkipReason, TickOutcome,
};
use crate::overlay::{resident_memory_mb, OverlayMetrics, OverlayOptions, OverlayState};
use crate::pacing::{tick_interval, DEFAULT_MAX_FPS};
use ash::vk;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ViewportOptions {
    pub identity: AppIdentity,
    pub clear_color: [f32; 4],
    pub vsync: bool,
    pub max_fps: u32,
    pub timeouts: FrameTimeouts,
    pub overlay: OverlayOptions,
    pub overlay_enabled: bool,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            identity: AppIdentity::default(),
            clear_color: [0.1, 0.1, 0.2, 1.0],
            vsync: true,
            max_fps: DEFAULT_MAX_FPS,
            timeouts: FrameTimeouts::default(),
            overlay: OverlayOptions::default(),
            overlay_enabled: true,
        }
    }
}

impl From<&Config> for ViewportOptions {
    fn from(config: &Config) -> Self {
        Self {
            identity: AppIdentity {
                name: config.window.title.clone(),
                ..AppIdentity::default()
            },
            clear_color: config.graphics.clear_color,
            vsync: config.graphics.vsync,
            max_fps: config.graphics.max_fps,
            timeouts: FrameTimeouts {
                fence: config.graphics.fence_timeout(),
                acquire: config.graphics.acquire_timeout(),
            },
            overlay: config.overlay.options,
            overlay_enabled: config.overlay.enabled,
        }
    }
}

/// Which parts of the object graph are out of date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Invalidation {
    /// Host extent differs from the built extent.
    resize: bool,
    /// The presentation engine reported the swapchain stale.
    swapchain: bool,
    /// New shaders; render pass and pipeline must be rebuilt.
    pipeline: bool,
    /// New clear color; command buffers must be re-recorded.
    commands: bool,
}

impl Invalidation {
    const ALL: Self = Self {
        resize: true,
        swapchain: true,
        pipeline: true,
        commands: true,
    };

    fn any(&self) -> bool {
        self.resize || self.swapchain || self.pipeline || self.commands
    }
}

enum Rebuilt {
    Complete,
    /// The surface has no area right now; nothing was touched.
    Suspended,
}

struct BuildTarget<'a> {
    extent: Extent,
    vsync: bool,
    shaders: &'a ShaderSet,
    clear_color: [f32; 4],
}

/// GPU objects between the first tick and teardown. Dropping it waits for
/// the device to go idle and releases everything in reverse dependency order.
struct Live<D: RenderDevice> {
    scheduler: Option<FrameScheduler>,
    command_pool: Option<vk::CommandPool>,
    commands: Option<CommandSet>,
    framebuffers: Option<FramebufferSet>,
    pipeline: Option<PipelineState>,
    swapchain: Option<SwapchainState>,
    device: D,
    built: bool,
}

impl<D: RenderDevice> Live<D> {
    fn new(device: D, timeouts: FrameTimeouts) -> Result<Self, RenderError> {
        let mut live = Self {
            scheduler: None,
            command_pool: None,
            commands: None,
            framebuffers: None,
            pipeline: None,
            swapchain: None,
            device,
            built: false,
        };

        live.command_pool = Some(
            live.device
                .create_command_pool()
                .map_err(RenderError::device("create command pool"))?,
        );
        live.scheduler = Some(FrameScheduler::new(&live.device, timeouts)?);

        Ok(live)
    }

    fn rebuild(
        &mut self,
        mut stale: Invalidation,
        target: &BuildTarget<'_>,
    ) -> Result<Rebuilt, RenderError> {
        // The only hard barrier in the frame loop
        self.device
            .wait_idle()
            .map_err(RenderError::device("wait for device idle"))?;

        let caps = self
            .device
            .surface_capabilities()
            .map_err(RenderError::device("query surface capabilities"))?;

        if self.swapchain.is_none() {
            stale.swapchain = true;
        }
        let new_swapchain = stale.swapchain || stale.resize;

        if new_swapchain {
            let extent = choose_extent(&caps, target.extent);
            if extent.is_empty() {
                log::debug!("Surface extent is {}, deferring rebuild", extent);
                return Ok(Rebuilt::Suspended);
            }

            let format = choose_surface_format(&caps.formats)
                .ok_or_else(|| RenderError::invalid("swapchain", "surface reports no formats"))?;
            if self
                .pipeline
                .as_ref()
                .is_some_and(|p| p.format != format.format)
            {
                log::info!("Surface format changed to {:?}", format.format);
                stale.pipeline = true;
            }
        }

        // Tear down the stale part in reverse build order
        if let (Some(commands), Some(pool)) = (self.commands.take(), self.command_pool) {
            commands.free(&self.device, pool);
        }
        if new_swapchain || stale.pipeline {
            if let Some(framebuffers) = self.framebuffers.take() {
                framebuffers.destroy(&self.device);
            }
        }
        if stale.pipeline {
            if let Some(pipeline) = self.pipeline.take() {
                pipeline.destroy(&self.device);
            }
        }
        let retired = if new_swapchain {
            self.swapchain.take().map(|s| s.retire(&self.device))
        } else {
            None
        };

        // Rebuild in dependency order
        if new_swapchain {
            self.swapchain = Some(SwapchainState::build(
                &self.device,
                &caps,
                target.extent,
                target.vsync,
                retired,
            )?);
        }
        let swapchain = self.swapchain.as_ref().ok_or_else(|| missing("swapchain"))?;

        if self.pipeline.is_none() {
            self.pipeline = Some(PipelineState::build(
                &self.device,
                swapchain.format.format,
                target.shaders,
            )?);
        }
        let pipeline = self.pipeline.as_ref().ok_or_else(|| missing("pipeline"))?;

        if self.framebuffers.is_none() {
            self.framebuffers = Some(FramebufferSet::build(&self.device, pipeline, swapchain)?);
        }
        let framebuffers = self
            .framebuffers
            .as_ref()
            .ok_or_else(|| missing("framebuffers"))?;

        let pool = self.command_pool.ok_or_else(|| missing("command pool"))?;
        self.commands = Some(CommandSet::record(
            &self.device,
            pool,
            pipeline,
            framebuffers,
            target.clear_color,
        )?);

        self.built = true;
        Ok(Rebuilt::Complete)
    }

    fn generation(&self) -> Option<u64> {
        self.swapchain.as_ref().map(|s| s.generation)
    }
}

fn missing(what: &'static str) -> RenderError {
    RenderError::invalid(what, "missing after rebuild")
}

impl<D: RenderDevice> Drop for Live<D> {
    fn drop(&mut self) {
        log::info!("Cleaning up Vulkan resources...");

        if let Err(e) = self.device.wait_idle() {
            log::warn!("Device idle wait failed during teardown: {}", e);
        }

        if let Some(scheduler) = self.scheduler.take() {
            scheduler.destroy(&self.device);
        }
        let pool = self.command_pool.take();
        if let (Some(commands), Some(pool)) = (self.commands.take(), pool) {
            commands.free(&self.device, pool);
        }
        if let Some(pool) = pool {
            self.device.destroy_command_pool(pool);
        }
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.destroy(&self.device);
        }
        if let Some(framebuffers) = self.framebuffers.take() {
            framebuffers.destroy(&self.device);
        }
        if let Some(swapchain) = self.swapchain.take() {
            swapchain.destroy(&self.device);
        }
        // Device, surface and instance are released when `device` drops
    }
}

/// An embeddable Vulkan render target.
pub struct Viewport<L: DeviceLoader> {
    live: Option<Live<L::Device>>,
    loader: L,
    options: ViewportOptions,
    shaders: ShaderSet,
    overlay: OverlayState,
    window: Option<NativeWindow>,
    extent: Extent,
    state: RenderState,
    stale: Invalidation,
}

impl<L: DeviceLoader> Viewport<L> {
    pub fn new(loader: L, options: ViewportOptions, shaders: ShaderSet) -> Self {
        let overlay = OverlayState::new(options.overlay, options.overlay_enabled);
        Self {
            live: None,
            loader,
            options,
            shaders,
            overlay,
            window: None,
            extent: Extent::default(),
            state: RenderState::Uninitialized,
            stale: Invalidation::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Host events
    // ─────────────────────────────────────────────────────────────────────

    /// Binds the viewport to a native window. Also restarts a viewport that
    /// was destroyed by a fatal error.
    pub fn on_attach(&mut self, window: NativeWindow, extent: Extent) {
        if self.live.is_some() {
            log::warn!("Viewport attached while live, releasing previous resources");
            self.teardown();
        }

        log::info!("Viewport attached at {}", extent);
        self.window = Some(window);
        self.extent = extent;
        self.stale = Invalidation::default();
        self.state = RenderState::Uninitialized;
    }

    /// One scheduler step. Only fatal errors are returned; after one, ticks
    /// are no-ops until the next `on_attach`.
    pub fn on_tick(&mut self) -> Result<TickOutcome, RenderError> {
        if self.state == RenderState::Destroyed {
            return Ok(TickOutcome::Skipped(SkipReason::Destroyed));
        }
        let Some(window) = self.window else {
            return Ok(TickOutcome::Skipped(SkipReason::Detached));
        };
        if self.extent.is_empty() {
            return Ok(TickOutcome::Skipped(SkipReason::Suspended));
        }

        if self.live.is_none() {
            if let Err(e) = self.initialize(&window) {
                return Err(self.fail(e));
            }
        }

        if self.stale.any() {
            self.state = RenderState::Rebuilding;
            match self.rebuild() {
                Ok(Rebuilt::Complete) => {
                    self.stale = Invalidation::default();
                    self.state = RenderState::Ready;
                }
                Ok(Rebuilt::Suspended) => {
                    self.state = RenderState::RecreateRequired;
                    return Ok(TickOutcome::Skipped(SkipReason::Suspended));
                }
                Err(e) => return Err(self.fail(e)),
            }
        }

        self.render()
    }

    /// Takes effect on the next tick. A zero extent suspends ticking.
    pub fn on_resize(&mut self, extent: Extent) {
        if extent == self.extent {
            return;
        }
        log::debug!("Resize {} -> {}", self.extent, extent);
        self.extent = extent;

        if extent.is_empty() {
            log::debug!("Target minimized, ticks suspended");
            return;
        }

        let built = self
            .live
            .as_ref()
            .and_then(|live| live.swapchain.as_ref())
            .map(|swapchain| swapchain.extent);
        self.stale.resize = built.is_some_and(|built| built != extent);
        self.sync_state();
    }

    /// Releases every GPU object synchronously. Safe to call repeatedly.
    pub fn on_close(&mut self) {
        if self.state == RenderState::Destroyed && self.live.is_none() {
            return;
        }
        self.teardown();
        self.window = None;
        log::info!("Viewport closed");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Host settings
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_overlay_options(&mut self, options: OverlayOptions) {
        self.overlay.set_options(options);
    }

    pub fn set_debug_overlay_enabled(&mut self, enabled: bool) {
        self.overlay.set_debug_enabled(enabled);
    }

    /// Changes the tick interval only; in-flight work is unaffected.
    pub fn set_max_fps(&mut self, max_fps: u32) {
        let max_fps = if max_fps == 0 {
            log::warn!("max_fps must be positive, using {}", DEFAULT_MAX_FPS);
            DEFAULT_MAX_FPS
        } else {
            max_fps
        };
        self.options.max_fps = max_fps;
        log::debug!("Tick interval now {:?}", tick_interval(max_fps));
    }

    /// New shader binaries; the pipeline is rebuilt on the next tick.
    pub fn set_shaders(&mut self, shaders: ShaderSet) {
        self.shaders = shaders;
        self.stale.pipeline = true;
        self.sync_state();
    }

    pub fn set_clear_color(&mut self, clear_color: [f32; 4]) {
        if self.options.clear_color == clear_color {
            return;
        }
        self.options.clear_color = clear_color;
        self.stale.commands = true;
        self.sync_state();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn max_fps(&self) -> u32 {
        self.options.max_fps
    }

    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.options.max_fps)
    }

    /// Generation of the live swapchain.
    pub fn generation(&self) -> Option<u64> {
        self.live.as_ref().and_then(Live::generation)
    }

    pub fn swapchain_extent(&self) -> Option<Extent> {
        self.live
            .as_ref()
            .and_then(|live| live.swapchain.as_ref())
            .map(|swapchain| swapchain.extent)
    }

    pub fn image_count(&self) -> usize {
        self.live
            .as_ref()
            .and_then(|live| live.swapchain.as_ref())
            .map_or(0, SwapchainState::image_count)
    }

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.live.as_ref().map(|live| live.device.info())
    }

    pub fn frame_stats(&self) -> Option<FrameStats> {
        self.live
            .as_ref()
            .and_then(|live| live.scheduler.as_ref())
            .map(FrameScheduler::stats)
    }

    /// Shared handle for hosts that toggle the overlay from other threads.
    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn overlay_lines(&self, fps: f32, frame_time_ms: f32) -> Vec<String> {
        let options = self.overlay.options();
        let metrics = OverlayMetrics {
            fps,
            frame_time_ms,
            memory_mb: if options.show_memory {
                resident_memory_mb()
            } else {
                None
            },
            device_name: self.device_info().map(|info| info.name.clone()),
        };
        self.overlay.compose(&metrics)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn initialize(&mut self, window: &NativeWindow) -> Result<(), RenderError> {
        let device = self.loader.load(&self.options.identity, window)?;
        let info = device.info();
        log::info!(
            "Rendering on {} (queue family {})",
            info.name,
            info.queue_family
        );

        self.live = Some(Live::new(device, self.options.timeouts)?);
        self.stale = Invalidation::ALL;
        Ok(())
    }

    fn rebuild(&mut self) -> Result<Rebuilt, RenderError> {
        let Some(live) = self.live.as_mut() else {
            return Err(missing("device"));
        };
        let first_build = !live.built;
        let target = BuildTarget {
            extent: self.extent,
            vsync: self.options.vsync,
            shaders: &self.shaders,
            clear_color: self.options.clear_color,
        };

        match live.rebuild(self.stale, &target) {
            Ok(Rebuilt::Complete) => {
                if !first_build {
                    log::info!(
                        "Rebuilt swapchain-dependent objects (generation {})",
                        live.generation().unwrap_or(0)
                    );
                }
                Ok(Rebuilt::Complete)
            }
            Ok(Rebuilt::Suspended) => Ok(Rebuilt::Suspended),
            Err(e) if first_build => Err(e),
            Err(e) => Err(RenderError::RecreationFailed(Box::new(e))),
        }
    }

    fn render(&mut self) -> Result<TickOutcome, RenderError> {
        let Some(live) = self.live.as_mut() else {
            return Ok(TickOutcome::Skipped(SkipReason::Detached));
        };
        let (Some(scheduler), Some(swapchain), Some(commands)) = (
            live.scheduler.as_mut(),
            live.swapchain.as_ref(),
            live.commands.as_ref(),
        ) else {
            self.stale.swapchain = true;
            self.state = RenderState::RecreateRequired;
            return Ok(TickOutcome::Skipped(SkipReason::OutOfDate));
        };

        self.state = RenderState::Rendering;
        let generation = swapchain.generation;

        match scheduler.run_frame(&live.device, swapchain, commands) {
            Ok(FrameStep::Presented {
                image_index,
                recreate,
            }) => {
                if recreate {
                    log::debug!("Swapchain suboptimal, rebuilding on next tick");
                    self.stale.swapchain = true;
                    self.state = RenderState::RecreateRequired;
                } else {
                    self.state = RenderState::Ready;
                }
                Ok(TickOutcome::Presented {
                    image_index,
                    generation,
                })
            }
            Ok(FrameStep::OutOfDate) => {
                log::debug!("Swapchain out of date, rebuilding on next tick");
                self.stale.swapchain = true;
                self.state = RenderState::RecreateRequired;
                Ok(TickOutcome::Skipped(SkipReason::OutOfDate))
            }
            Err(e) if !e.is_fatal() => {
                log::warn!("Frame skipped: {}", e);
                self.state = RenderState::Ready;
                Ok(TickOutcome::Skipped(SkipReason::DeviceTimeout))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn sync_state(&mut self) {
        if self.live.is_none() {
            return;
        }
        if matches!(self.state, RenderState::Ready | RenderState::RecreateRequired) {
            self.state = if self.stale.any() {
                RenderState::RecreateRequired
            } else {
                RenderState::Ready
            };
        }
    }

    fn fail(&mut self, error: RenderError) -> RenderError {
        log::error!("Rendering stopped: {}", error);
        self.teardown();
        error
    }

    fn teardown(&mut self) {
        self.live = None;
        self.stale = Invalidation::default();
        self.state = RenderState::Destroyed;
    }

    #[cfg(test)]
    fn live_generations(&self) -> Option<(u64, u64, u64)> {
        let live = self.live.as_ref()?;
        Some((
            live.swapchain.as_ref()?.generation,
            live.framebuffers.as_ref()?.generation,
            live.commands.as_ref()?.generation,
        ))
    }
}
