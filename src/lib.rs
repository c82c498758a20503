// =============================================================================
// VK-VIEWPORT - Embeddable Vulkan render target
// =============================================================================
//
// A host hands the core a native window and drives it with ticks. Each tick
// waits for the previous frame, acquires an image, submits pre-recorded
// commands and presents. Resizes, shader swaps and out-of-date swapchains
// are picked up at the start of the next tick.
//
// LAYOUT:
// ┌─────────────────────────────────────────────────────────────────┐
// │  Host (winit demo, or any window system with raw handles)       │
// │    └── Viewport (state machine, invalidation)                   │
// │          └── FrameScheduler (fence → acquire → submit → present)│
// │                └── backend: swapchain, pipeline, commands, sync │
// │                      └── RenderDevice (ash, or a test fake)     │
// └─────────────────────────────────────────────────────────────────┘
//
// =============================================================================

pub mod backend;
pub mod config;
pub mod error;
pub mod frame;
pub mod hot_reload;
pub mod overlay;
pub mod pacing;
pub mod viewport;

pub use backend::{
    AppIdentity, DeviceInfo, DeviceLoader, Extent, NativeWindow, RenderDevice, ShaderSet,
    ShaderSource, VulkanDevice, VulkanLoader,
};
pub use config::Config;
pub use error::{RenderError, WaitTarget};
pub use frame::{FrameStats, FrameTimeouts, RenderState, SkipReason, TickOutcome};
pub use overlay::{FpsCounter, OverlayMetrics, OverlayOptions, OverlayState};
pub use viewport::{Viewport, ViewportOptions};
