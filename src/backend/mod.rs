// Backend module - Vulkan abstraction layer
//
// Design: the frame loop and the resource builders only reach the GPU
// through `RenderDevice`. `VulkanDevice` implements it over ash; tests drive
// the same code with an accounting fake.

pub mod commands;
pub mod desc;
pub mod device;
#[cfg(test)]
pub(crate) mod fake;
pub mod pipeline;
pub mod shader;
pub mod surface;
pub mod swapchain;
pub mod sync;

pub use commands::CommandSet;
pub use device::{VulkanDevice, VulkanLoader};
pub use pipeline::{FramebufferSet, PipelineState};
pub use shader::{ShaderCode, ShaderSet, ShaderSource};
pub use surface::{Extent, NativeWindow, SurfaceBinding, SurfaceCaps};
pub use swapchain::SwapchainState;
pub use sync::FrameSync;

use crate::error::RenderError;
use ash::prelude::VkResult;
use ash::vk;
use desc::{DrawDesc, FramebufferDesc, PipelineDesc, RenderPassDesc, SubmitDesc, SwapchainDesc};
use std::time::Duration;

/// Identity reported to the driver at instance creation.
#[derive(Debug, Clone)]
pub struct AppIdentity {
    pub name: String,
    pub version: u32,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            name: "vk-viewport".to_string(),
            version: vk::make_api_version(0, 0, 1, 0),
        }
    }
}

/// Facts about the selected GPU, fixed at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub driver_version: u32,
    pub api_version: u32,
    pub queue_family: u32,
}

/// Every GPU operation the rendering core performs.
///
/// Implementations own the instance, surface, logical device and its single
/// queue. Creation calls return raw `vk` handles; the caller owns them and must
/// hand each back to the matching `destroy_*` exactly once.
pub trait RenderDevice {
    fn info(&self) -> &DeviceInfo;

    // Surface / swapchain
    fn surface_capabilities(&self) -> VkResult<SurfaceCaps>;
    fn create_swapchain(&self, desc: &SwapchainDesc) -> VkResult<vk::SwapchainKHR>;
    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>>;
    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR);
    fn create_image_view(&self, image: vk::Image, format: vk::Format) -> VkResult<vk::ImageView>;
    fn destroy_image_view(&self, view: vk::ImageView);

    // Pipeline objects
    fn create_render_pass(&self, desc: &RenderPassDesc) -> VkResult<vk::RenderPass>;
    fn destroy_render_pass(&self, render_pass: vk::RenderPass);
    fn create_shader_module(&self, code: &ShaderCode) -> VkResult<vk::ShaderModule>;
    fn destroy_shader_module(&self, module: vk::ShaderModule);
    fn create_pipeline_layout(&self) -> VkResult<vk::PipelineLayout>;
    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout);
    fn create_graphics_pipeline(&self, desc: &PipelineDesc) -> VkResult<vk::Pipeline>;
    fn destroy_pipeline(&self, pipeline: vk::Pipeline);
    fn create_framebuffer(&self, desc: &FramebufferDesc) -> VkResult<vk::Framebuffer>;
    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer);

    // Commands
    fn create_command_pool(&self) -> VkResult<vk::CommandPool>;
    fn destroy_command_pool(&self, pool: vk::CommandPool);
    fn allocate_command_buffers(
        &self,
        pool: vk::CommandPool,
        count: u32,
    ) -> VkResult<Vec<vk::CommandBuffer>>;
    fn free_command_buffers(&self, pool: vk::CommandPool, buffers: &[vk::CommandBuffer]);
    fn record_draw(&self, command_buffer: vk::CommandBuffer, draw: &DrawDesc) -> VkResult<()>;

    // Synchronization
    fn create_semaphore(&self) -> VkResult<vk::Semaphore>;
    fn destroy_semaphore(&self, semaphore: vk::Semaphore);
    fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence>;
    fn destroy_fence(&self, fence: vk::Fence);
    fn wait_for_fence(&self, fence: vk::Fence, timeout: Duration) -> VkResult<()>;
    fn reset_fence(&self, fence: vk::Fence) -> VkResult<()>;

    // Queue
    /// Returns the image index and whether the swapchain is suboptimal.
    fn acquire_next_image(
        &self,
        swapchain: vk::SwapchainKHR,
        timeout: Duration,
        signal: vk::Semaphore,
    ) -> VkResult<(u32, bool)>;
    fn submit(&self, submit: &SubmitDesc) -> VkResult<()>;
    /// Empty submission whose only effect is signaling `fence`.
    fn signal_fence(&self, fence: vk::Fence) -> VkResult<()>;
    /// Returns whether the swapchain is suboptimal.
    fn present(
        &self,
        swapchain: vk::SwapchainKHR,
        image_index: u32,
        wait: vk::Semaphore,
    ) -> VkResult<bool>;
    fn wait_idle(&self) -> VkResult<()>;
}

/// Produces a device for a native window on first use.
pub trait DeviceLoader {
    type Device: RenderDevice;

    fn load(
        &mut self,
        identity: &AppIdentity,
        window: &NativeWindow,
    ) -> Result<Self::Device, RenderError>;
}

/// Converts a timeout into the nanosecond count Vulkan expects.
pub(crate) fn timeout_nanos(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_nanos()).unwrap_or(u64::MAX)
}
