// Resource-accounting fake device
//
// Mints opaque handles, counts creations and destructions per object kind,
// models fence and semaphore state, and injects the faults the frame loop has
// to survive. Anything a real driver would flag as misuse is recorded as a
// violation instead of panicking, so tests can assert on it.

use super::desc::{DrawDesc, FramebufferDesc, PipelineDesc, RenderPassDesc, SubmitDesc, SwapchainDesc};
use super::{AppIdentity, DeviceInfo, DeviceLoader, Extent, NativeWindow, RenderDevice, ShaderCode, SurfaceCaps};
use crate::error::RenderError;
use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Swapchain,
    ImageView,
    RenderPass,
    ShaderModule,
    PipelineLayout,
    Pipeline,
    Framebuffer,
    CommandPool,
    CommandBuffer,
    Semaphore,
    Fence,
}

#[derive(Default)]
struct Ledger {
    next_raw: u64,
    live: HashMap<u64, Kind>,
    created: HashMap<Kind, usize>,
    destroyed: HashMap<Kind, usize>,
    destroy_log: Vec<Kind>,
    violations: Vec<String>,

    fail_next: HashMap<Kind, usize>,
    fail_after: HashMap<Kind, usize>,

    caps: Option<SurfaceCaps>,
    swapchain_images: HashMap<u64, Vec<vk::Image>>,
    last_old_swapchain: u64,
    next_image: u32,

    fences: HashMap<u64, bool>,
    semaphores: HashMap<u64, bool>,
    pool_buffers: HashMap<u64, Vec<u64>>,
    recorded: HashMap<u64, DrawDesc>,
    pending: Vec<u64>,
    stalled: bool,
    fence_timeouts: usize,
    acquire_script: VecDeque<vk::Result>,
    present_script: VecDeque<vk::Result>,

    fence_waits: usize,
    fence_signals: usize,
    fence_resets: usize,
    submits: usize,
    presents: usize,
    idle_waits: usize,
    devices_loaded: usize,
    devices_dropped: usize,
}

impl Ledger {
    fn violation(&mut self, message: String) {
        self.violations.push(message);
    }

    /// Applies the injected allocation faults for `kind`.
    fn inject(&mut self, kind: Kind) -> VkResult<()> {
        if let Some(left) = self.fail_next.get_mut(&kind) {
            if *left > 0 {
                *left -= 1;
                return Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
            }
        }
        if let Some(left) = self.fail_after.get_mut(&kind) {
            if *left == 0 {
                self.fail_after.remove(&kind);
                return Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
            }
            *left -= 1;
        }
        Ok(())
    }

    fn raw(&mut self) -> u64 {
        self.next_raw += 1;
        self.next_raw
    }

    fn mint(&mut self, kind: Kind) -> u64 {
        let raw = self.raw();
        self.live.insert(raw, kind);
        *self.created.entry(kind).or_default() += 1;
        raw
    }

    fn create(&mut self, kind: Kind) -> VkResult<u64> {
        self.inject(kind)?;
        Ok(self.mint(kind))
    }

    fn release(&mut self, kind: Kind, raw: u64) {
        if !self.pending.is_empty() {
            self.violation(format!("destroyed {kind:?} while GPU work is outstanding"));
        }
        match self.live.get(&raw).copied() {
            Some(found) if found == kind => {
                self.live.remove(&raw);
                *self.destroyed.entry(kind).or_default() += 1;
                self.destroy_log.push(kind);
            }
            Some(found) => self.violation(format!("destroyed a {found:?} as {kind:?}")),
            None => self.violation(format!("destroyed {kind:?} {raw} that is not live")),
        }
    }

    fn check_live(&mut self, kind: Kind, raw: u64, context: &str) {
        if self.live.get(&raw) != Some(&kind) {
            self.violation(format!("{context}: {kind:?} {raw} is not live"));
        }
    }

    fn signal_fence(&mut self, raw: u64) {
        self.fences.insert(raw, true);
        self.fence_signals += 1;
    }

    fn queue_fence(&mut self, raw: u64) {
        if self.fences.get(&raw).copied().unwrap_or(false) {
            self.violation("submitted with an already signaled fence".to_string());
        }
        if self.stalled {
            self.pending.push(raw);
        } else {
            self.signal_fence(raw);
        }
    }

    fn complete_pending(&mut self) {
        for raw in std::mem::take(&mut self.pending) {
            self.signal_fence(raw);
        }
    }

    fn wait_semaphore(&mut self, raw: u64, context: &str) {
        match self.semaphores.get(&raw).copied() {
            Some(true) => {
                self.semaphores.insert(raw, false);
            }
            Some(false) => self.violation(format!("{context} waits on an unsignaled semaphore")),
            None => self.violation(format!("{context} waits on an unknown semaphore")),
        }
    }

    fn signal_semaphore(&mut self, raw: u64, context: &str) {
        match self.semaphores.get(&raw).copied() {
            Some(false) => {
                self.semaphores.insert(raw, true);
            }
            Some(true) => self.violation(format!("{context} signals a semaphore that is already signaled")),
            None => self.violation(format!("{context} signals an unknown semaphore")),
        }
    }
}

/// Test handle over the shared ledger. Clones observe the same device.
#[derive(Clone, Default)]
pub struct FakeGpu {
    ledger: Arc<Mutex<Ledger>>,
}

impl FakeGpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two-to-eight images, host-sized extent, sRGB BGRA, FIFO + MAILBOX.
    pub fn default_caps() -> SurfaceCaps {
        SurfaceCaps {
            min_image_count: 2,
            max_image_count: 8,
            current_extent: None,
            min_extent: Extent::new(1, 1),
            max_extent: Extent::new(4096, 4096),
            current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
            formats: vec![
                vk::SurfaceFormatKHR {
                    format: vk::Format::B8G8R8A8_SRGB,
                    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                },
                vk::SurfaceFormatKHR {
                    format: vk::Format::B8G8R8A8_UNORM,
                    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
                },
            ],
            present_modes: vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX],
        }
    }

    pub fn device(&self) -> FakeDevice {
        self.ledger.lock().devices_loaded += 1;
        FakeDevice {
            ledger: self.ledger.clone(),
            info: DeviceInfo {
                name: "Fake GPU".to_string(),
                driver_version: 1,
                api_version: vk::API_VERSION_1_0,
                queue_family: 0,
            },
        }
    }

    pub fn loader(&self) -> FakeLoader {
        FakeLoader {
            gpu: self.clone(),
            failures: 0,
        }
    }

    // Knobs

    pub fn set_surface_caps(&self, caps: SurfaceCaps) {
        self.ledger.lock().caps = Some(caps);
    }

    pub fn set_current_extent(&self, extent: Option<Extent>) {
        let mut ledger = self.ledger.lock();
        let mut caps = ledger.caps.take().unwrap_or_else(Self::default_caps);
        caps.current_extent = extent;
        ledger.caps = Some(caps);
    }

    /// The next `count` creations of `kind` fail.
    pub fn fail_next_allocations(&self, kind: Kind, count: usize) {
        self.ledger.lock().fail_next.insert(kind, count);
    }

    /// `successes` more creations of `kind` succeed, then one fails.
    pub fn fail_allocations_after(&self, kind: Kind, successes: usize) {
        self.ledger.lock().fail_after.insert(kind, successes);
    }

    pub fn time_out_fence_waits(&self, count: usize) {
        self.ledger.lock().fence_timeouts = count;
    }

    pub fn script_acquire(&self, result: vk::Result) {
        self.ledger.lock().acquire_script.push_back(result);
    }

    pub fn script_present(&self, result: vk::Result) {
        self.ledger.lock().present_script.push_back(result);
    }

    /// Submitted work stays outstanding until `resume` or a device idle wait.
    pub fn stall(&self) {
        self.ledger.lock().stalled = true;
    }

    pub fn resume(&self) {
        let mut ledger = self.ledger.lock();
        ledger.stalled = false;
        ledger.complete_pending();
    }

    // Inspection

    pub fn live_count(&self) -> usize {
        self.ledger.lock().live.len()
    }

    pub fn live_of(&self, kind: Kind) -> usize {
        self.ledger.lock().live.values().filter(|&&k| k == kind).count()
    }

    pub fn created(&self, kind: Kind) -> usize {
        self.ledger.lock().created.get(&kind).copied().unwrap_or(0)
    }

    pub fn destroyed(&self, kind: Kind) -> usize {
        self.ledger.lock().destroyed.get(&kind).copied().unwrap_or(0)
    }

    pub fn destroy_log(&self) -> Vec<Kind> {
        self.ledger.lock().destroy_log.clone()
    }

    pub fn clear_destroy_log(&self) {
        self.ledger.lock().destroy_log.clear();
    }

    pub fn violations(&self) -> Vec<String> {
        self.ledger.lock().violations.clone()
    }

    pub fn fence_signaled(&self, fence: vk::Fence) -> bool {
        self.ledger
            .lock()
            .fences
            .get(&fence.as_raw())
            .copied()
            .unwrap_or(false)
    }

    pub fn fence_waits(&self) -> usize {
        self.ledger.lock().fence_waits
    }

    pub fn fence_signals(&self) -> usize {
        self.ledger.lock().fence_signals
    }

    pub fn fence_resets(&self) -> usize {
        self.ledger.lock().fence_resets
    }

    pub fn submits(&self) -> usize {
        self.ledger.lock().submits
    }

    pub fn presents(&self) -> usize {
        self.ledger.lock().presents
    }

    pub fn idle_waits(&self) -> usize {
        self.ledger.lock().idle_waits
    }

    pub fn devices_loaded(&self) -> usize {
        self.ledger.lock().devices_loaded
    }

    pub fn devices_dropped(&self) -> usize {
        self.ledger.lock().devices_dropped
    }

    pub fn last_old_swapchain(&self) -> vk::SwapchainKHR {
        vk::SwapchainKHR::from_raw(self.ledger.lock().last_old_swapchain)
    }

    pub fn recorded_draw(&self, command_buffer: vk::CommandBuffer) -> Option<DrawDesc> {
        self.ledger
            .lock()
            .recorded
            .get(&command_buffer.as_raw())
            .copied()
    }
}

pub struct FakeDevice {
    ledger: Arc<Mutex<Ledger>>,
    info: DeviceInfo,
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        let mut ledger = self.ledger.lock();
        if !ledger.pending.is_empty() {
            ledger.violation("device destroyed while GPU work is outstanding".to_string());
        }
        let children = ledger.live.len();
        if children > 0 {
            ledger.violation(format!("device destroyed with {children} live children"));
        }
        ledger.devices_dropped += 1;
    }
}

impl RenderDevice for FakeDevice {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn surface_capabilities(&self) -> VkResult<SurfaceCaps> {
        Ok(self
            .ledger
            .lock()
            .caps
            .clone()
            .unwrap_or_else(FakeGpu::default_caps))
    }

    fn create_swapchain(&self, desc: &SwapchainDesc) -> VkResult<vk::SwapchainKHR> {
        let mut ledger = self.ledger.lock();
        ledger.inject(Kind::Swapchain)?;

        let old = desc.old_swapchain().as_raw();
        if old != 0 {
            ledger.check_live(Kind::Swapchain, old, "old_swapchain");
        }
        ledger.last_old_swapchain = old;

        let raw = ledger.mint(Kind::Swapchain);
        let images: Vec<vk::Image> = (0..desc.image_count())
            .map(|_| vk::Image::from_raw(ledger.raw()))
            .collect();
        ledger.swapchain_images.insert(raw, images);
        Ok(vk::SwapchainKHR::from_raw(raw))
    }

    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        self.ledger
            .lock()
            .swapchain_images
            .get(&swapchain.as_raw())
            .cloned()
            .ok_or(vk::Result::ERROR_UNKNOWN)
    }

    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        let mut ledger = self.ledger.lock();
        ledger.release(Kind::Swapchain, swapchain.as_raw());
        ledger.swapchain_images.remove(&swapchain.as_raw());
    }

    fn create_image_view(&self, _image: vk::Image, _format: vk::Format) -> VkResult<vk::ImageView> {
        self.ledger
            .lock()
            .create(Kind::ImageView)
            .map(vk::ImageView::from_raw)
    }

    fn destroy_image_view(&self, view: vk::ImageView) {
        self.ledger.lock().release(Kind::ImageView, view.as_raw());
    }

    fn create_render_pass(&self, _desc: &RenderPassDesc) -> VkResult<vk::RenderPass> {
        self.ledger
            .lock()
            .create(Kind::RenderPass)
            .map(vk::RenderPass::from_raw)
    }

    fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.ledger.lock().release(Kind::RenderPass, render_pass.as_raw());
    }

    fn create_shader_module(&self, _code: &ShaderCode) -> VkResult<vk::ShaderModule> {
        self.ledger
            .lock()
            .create(Kind::ShaderModule)
            .map(vk::ShaderModule::from_raw)
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.ledger.lock().release(Kind::ShaderModule, module.as_raw());
    }

    fn create_pipeline_layout(&self) -> VkResult<vk::PipelineLayout> {
        self.ledger
            .lock()
            .create(Kind::PipelineLayout)
            .map(vk::PipelineLayout::from_raw)
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        self.ledger.lock().release(Kind::PipelineLayout, layout.as_raw());
    }

    fn create_graphics_pipeline(&self, desc: &PipelineDesc) -> VkResult<vk::Pipeline> {
        let mut ledger = self.ledger.lock();
        ledger.check_live(Kind::RenderPass, desc.render_pass().as_raw(), "pipeline");
        ledger.check_live(Kind::PipelineLayout, desc.layout().as_raw(), "pipeline");
        ledger.check_live(Kind::ShaderModule, desc.vertex().as_raw(), "pipeline");
        ledger.check_live(Kind::ShaderModule, desc.fragment().as_raw(), "pipeline");
        ledger.create(Kind::Pipeline).map(vk::Pipeline::from_raw)
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        self.ledger.lock().release(Kind::Pipeline, pipeline.as_raw());
    }

    fn create_framebuffer(&self, desc: &FramebufferDesc) -> VkResult<vk::Framebuffer> {
        let mut ledger = self.ledger.lock();
        ledger.check_live(Kind::RenderPass, desc.render_pass().as_raw(), "framebuffer");
        ledger.check_live(Kind::ImageView, desc.view().as_raw(), "framebuffer");
        ledger.create(Kind::Framebuffer).map(vk::Framebuffer::from_raw)
    }

    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        self.ledger.lock().release(Kind::Framebuffer, framebuffer.as_raw());
    }

    fn create_command_pool(&self) -> VkResult<vk::CommandPool> {
        let mut ledger = self.ledger.lock();
        let raw = ledger.create(Kind::CommandPool)?;
        ledger.pool_buffers.insert(raw, Vec::new());
        Ok(vk::CommandPool::from_raw(raw))
    }

    fn destroy_command_pool(&self, pool: vk::CommandPool) {
        let mut ledger = self.ledger.lock();
        // Destroying a pool frees whatever is still allocated from it
        for raw in ledger.pool_buffers.remove(&pool.as_raw()).unwrap_or_default() {
            if ledger.live.contains_key(&raw) {
                ledger.release(Kind::CommandBuffer, raw);
                ledger.recorded.remove(&raw);
            }
        }
        ledger.release(Kind::CommandPool, pool.as_raw());
    }

    fn allocate_command_buffers(
        &self,
        pool: vk::CommandPool,
        count: u32,
    ) -> VkResult<Vec<vk::CommandBuffer>> {
        let mut ledger = self.ledger.lock();
        ledger.check_live(Kind::CommandPool, pool.as_raw(), "allocate command buffers");
        ledger.inject(Kind::CommandBuffer)?;

        let raws: Vec<u64> = (0..count).map(|_| ledger.mint(Kind::CommandBuffer)).collect();
        ledger
            .pool_buffers
            .entry(pool.as_raw())
            .or_default()
            .extend(&raws);
        Ok(raws.into_iter().map(vk::CommandBuffer::from_raw).collect())
    }

    fn free_command_buffers(&self, pool: vk::CommandPool, buffers: &[vk::CommandBuffer]) {
        let mut ledger = self.ledger.lock();
        ledger.check_live(Kind::CommandPool, pool.as_raw(), "free command buffers");
        for buffer in buffers {
            let raw = buffer.as_raw();
            ledger.release(Kind::CommandBuffer, raw);
            ledger.recorded.remove(&raw);
            if let Some(owned) = ledger.pool_buffers.get_mut(&pool.as_raw()) {
                owned.retain(|&b| b != raw);
            }
        }
    }

    fn record_draw(&self, command_buffer: vk::CommandBuffer, draw: &DrawDesc) -> VkResult<()> {
        let mut ledger = self.ledger.lock();
        if !ledger.pending.is_empty() {
            ledger.violation("recorded a command buffer while GPU work is outstanding".to_string());
        }
        ledger.check_live(Kind::CommandBuffer, command_buffer.as_raw(), "record");
        ledger.check_live(Kind::RenderPass, draw.render_pass.as_raw(), "record");
        ledger.check_live(Kind::Framebuffer, draw.framebuffer.as_raw(), "record");
        ledger.check_live(Kind::Pipeline, draw.pipeline.as_raw(), "record");
        ledger.recorded.insert(command_buffer.as_raw(), *draw);
        Ok(())
    }

    fn create_semaphore(&self) -> VkResult<vk::Semaphore> {
        let mut ledger = self.ledger.lock();
        let raw = ledger.create(Kind::Semaphore)?;
        ledger.semaphores.insert(raw, false);
        Ok(vk::Semaphore::from_raw(raw))
    }

    fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        let mut ledger = self.ledger.lock();
        ledger.release(Kind::Semaphore, semaphore.as_raw());
        ledger.semaphores.remove(&semaphore.as_raw());
    }

    fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence> {
        let mut ledger = self.ledger.lock();
        let raw = ledger.create(Kind::Fence)?;
        ledger.fences.insert(raw, signaled);
        Ok(vk::Fence::from_raw(raw))
    }

    fn destroy_fence(&self, fence: vk::Fence) {
        let mut ledger = self.ledger.lock();
        ledger.release(Kind::Fence, fence.as_raw());
        ledger.fences.remove(&fence.as_raw());
    }

    fn wait_for_fence(&self, fence: vk::Fence, _timeout: Duration) -> VkResult<()> {
        let mut ledger = self.ledger.lock();
        let raw = fence.as_raw();
        ledger.fence_waits += 1;
        ledger.check_live(Kind::Fence, raw, "wait");

        if ledger.fence_timeouts > 0 {
            ledger.fence_timeouts -= 1;
            return Err(vk::Result::TIMEOUT);
        }
        if ledger.fences.get(&raw).copied().unwrap_or(false) {
            return Ok(());
        }
        if !ledger.pending.contains(&raw) {
            ledger.violation("waited on a fence nothing will signal".to_string());
        }
        Err(vk::Result::TIMEOUT)
    }

    fn reset_fence(&self, fence: vk::Fence) -> VkResult<()> {
        let mut ledger = self.ledger.lock();
        let raw = fence.as_raw();
        ledger.check_live(Kind::Fence, raw, "reset");
        if !ledger.fences.get(&raw).copied().unwrap_or(false) {
            ledger.violation("reset a fence that is not signaled".to_string());
        }
        ledger.fences.insert(raw, false);
        ledger.fence_resets += 1;
        Ok(())
    }

    fn acquire_next_image(
        &self,
        swapchain: vk::SwapchainKHR,
        _timeout: Duration,
        signal: vk::Semaphore,
    ) -> VkResult<(u32, bool)> {
        let mut ledger = self.ledger.lock();
        ledger.check_live(Kind::Swapchain, swapchain.as_raw(), "acquire");

        let suboptimal = match ledger.acquire_script.pop_front() {
            Some(vk::Result::SUBOPTIMAL_KHR) => true,
            Some(err) => return Err(err),
            None => false,
        };

        let count = ledger
            .swapchain_images
            .get(&swapchain.as_raw())
            .map_or(0, |images| images.len() as u32);
        if count == 0 {
            return Err(vk::Result::ERROR_SURFACE_LOST_KHR);
        }

        ledger.signal_semaphore(signal.as_raw(), "acquire");
        let index = ledger.next_image % count;
        ledger.next_image = ledger.next_image.wrapping_add(1);
        Ok((index, suboptimal))
    }

    fn submit(&self, submit: &SubmitDesc) -> VkResult<()> {
        let mut ledger = self.ledger.lock();
        let buffer = submit.command_buffer.as_raw();
        ledger.check_live(Kind::CommandBuffer, buffer, "submit");
        if !ledger.recorded.contains_key(&buffer) {
            ledger.violation("submitted a command buffer that was never recorded".to_string());
        }
        if submit.wait_stage != vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT {
            ledger.violation(format!("submission waits at {:?}", submit.wait_stage));
        }
        ledger.wait_semaphore(submit.wait.as_raw(), "submit");
        ledger.signal_semaphore(submit.signal.as_raw(), "submit");
        ledger.queue_fence(submit.fence.as_raw());
        ledger.submits += 1;
        Ok(())
    }

    fn signal_fence(&self, fence: vk::Fence) -> VkResult<()> {
        let mut ledger = self.ledger.lock();
        ledger.check_live(Kind::Fence, fence.as_raw(), "empty submit");
        ledger.queue_fence(fence.as_raw());
        Ok(())
    }

    fn present(
        &self,
        swapchain: vk::SwapchainKHR,
        _image_index: u32,
        wait: vk::Semaphore,
    ) -> VkResult<bool> {
        let mut ledger = self.ledger.lock();
        ledger.check_live(Kind::Swapchain, swapchain.as_raw(), "present");
        ledger.wait_semaphore(wait.as_raw(), "present");
        ledger.presents += 1;

        match ledger.present_script.pop_front() {
            Some(vk::Result::SUBOPTIMAL_KHR) => Ok(true),
            Some(err) => Err(err),
            None => Ok(false),
        }
    }

    fn wait_idle(&self) -> VkResult<()> {
        let mut ledger = self.ledger.lock();
        ledger.idle_waits += 1;
        ledger.complete_pending();
        Ok(())
    }
}

/// Loader handing out fake devices; can be told to fail initialization.
pub struct FakeLoader {
    gpu: FakeGpu,
    failures: usize,
}

impl FakeLoader {
    /// The next `count` loads fail as if no queue family could present.
    pub fn failing(mut self, count: usize) -> Self {
        self.failures = count;
        self
    }
}

impl DeviceLoader for FakeLoader {
    type Device = FakeDevice;

    fn load(
        &mut self,
        _identity: &AppIdentity,
        _window: &NativeWindow,
    ) -> Result<FakeDevice, RenderError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(RenderError::Initialization(
                "no queue family supports both graphics and presentation".to_string(),
            ));
        }
        Ok(self.gpu.device())
    }
}

/// Xlib handles that are never dereferenced by the fake.
pub fn test_window() -> NativeWindow {
    use raw_window_handle::{RawDisplayHandle, RawWindowHandle, XlibDisplayHandle, XlibWindowHandle};
    NativeWindow {
        display: RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0)),
        window: RawWindowHandle::Xlib(XlibWindowHandle::new(1)),
    }
}
