// Diagnostic overlay
//
// The host decides where the lines go (window title, HUD, status bar). The
// core only keeps the toggles and composes text; nothing here touches the GPU.

use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use sysinfo::System;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    pub show_fps: bool,
    pub show_memory: bool,
    pub show_device_info: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            show_fps: true,
            show_memory: false,
            show_device_info: false,
        }
    }
}

/// Values the overlay can report for one frame.
#[derive(Debug, Clone, Default)]
pub struct OverlayMetrics {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub memory_mb: Option<u64>,
    pub device_name: Option<String>,
}

#[derive(Debug)]
struct Inner {
    options: OverlayOptions,
    enabled: bool,
    debug_message: Option<String>,
}

/// Overlay toggles shared between the render loop and other host threads.
#[derive(Debug, Clone)]
pub struct OverlayState {
    inner: Arc<RwLock<Inner>>,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new(OverlayOptions::default(), true)
    }
}

impl OverlayState {
    pub fn new(options: OverlayOptions, enabled: bool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                options,
                enabled,
                debug_message: None,
            })),
        }
    }

    /// Replaces all toggles at once.
    pub fn set_options(&self, options: OverlayOptions) {
        self.inner.write().options = options;
    }

    pub fn options(&self) -> OverlayOptions {
        self.inner.read().options
    }

    pub fn set_debug_enabled(&self, enabled: bool) {
        self.inner.write().enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.read().enabled
    }

    pub fn set_debug_message(&self, message: Option<String>) {
        self.inner.write().debug_message = message;
    }

    pub fn compose(&self, metrics: &OverlayMetrics) -> Vec<String> {
        let inner = self.inner.read();
        if !inner.enabled {
            return Vec::new();
        }

        let mut lines = Vec::new();
        if inner.options.show_fps {
            lines.push(format!(
                "FPS: {:.1} ({:.2}ms)",
                metrics.fps, metrics.frame_time_ms
            ));
        }
        if inner.options.show_memory {
            match metrics.memory_mb {
                Some(mb) => lines.push(format!("Memory: {mb} MB")),
                None => lines.push("Memory: n/a".to_string()),
            }
        }
        if inner.options.show_device_info {
            if let Some(name) = &metrics.device_name {
                lines.push(format!("Device: {name}"));
            }
        }
        if let Some(message) = &inner.debug_message {
            lines.push(format!("Debug: {message}"));
        }
        lines
    }
}

/// Averages frame times over one-second windows.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
    frame_time_ms: f32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Counts a presented frame. Returns true when a new average is ready.
    pub fn frame(&mut self, now: Instant) -> bool {
        self.frames += 1;

        let elapsed = now.duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return false;
        }

        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frame_time_ms = elapsed.as_secs_f32() * 1000.0 / self.frames as f32;
        self.frames = 0;
        self.window_start = now;
        true
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }
}

/// Resident set size of this process, where the platform exposes it.
pub fn resident_memory_mb() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    if !system.refresh_process(pid) {
        return None;
    }
    system
        .process(pid)
        .map(|process| process.memory() / (1024 * 1024))
}
