// Surface binding - native window to presentable surface
//
// The host hands us opaque display/window handles; we wrap them into a
// VkSurfaceKHR and re-query its capabilities before every swapchain build.

use crate::error::RenderError;
use ash::prelude::VkResult;
use ash::{vk, Entry};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-area extent means the target is minimized.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn clamp(self, min: Extent, max: Extent) -> Self {
        Self {
            width: self.width.clamp(min.width, max.width.max(min.width)),
            height: self.height.clamp(min.height, max.height.max(min.height)),
        }
    }
}

impl From<Extent> for vk::Extent2D {
    fn from(extent: Extent) -> Self {
        vk::Extent2D {
            width: extent.width,
            height: extent.height,
        }
    }
}

impl From<vk::Extent2D> for Extent {
    fn from(extent: vk::Extent2D) -> Self {
        Self::new(extent.width, extent.height)
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Raw handles of the host window. The host keeps the window alive for as
/// long as the viewport is attached.
#[derive(Debug, Clone, Copy)]
pub struct NativeWindow {
    pub display: RawDisplayHandle,
    pub window: RawWindowHandle,
}

impl NativeWindow {
    pub fn from_window<W: HasWindowHandle + HasDisplayHandle>(
        window: &W,
    ) -> Result<Self, RenderError> {
        let display = window
            .display_handle()
            .map_err(|e| RenderError::SurfaceCreation(format!("no display handle: {e}")))?
            .as_raw();
        let window = window
            .window_handle()
            .map_err(|e| RenderError::SurfaceCreation(format!("no window handle: {e}")))?
            .as_raw();
        Ok(Self { display, window })
    }
}

/// Snapshot of what the surface supports right now.
#[derive(Debug, Clone)]
pub struct SurfaceCaps {
    pub min_image_count: u32,
    /// Zero means no upper bound.
    pub max_image_count: u32,
    /// `None` when the surface lets the swapchain decide its size.
    pub current_extent: Option<Extent>,
    pub min_extent: Extent,
    pub max_extent: Extent,
    pub current_transform: vk::SurfaceTransformFlagsKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SurfaceCaps {
    pub fn from_vk(
        caps: &vk::SurfaceCapabilitiesKHR,
        formats: Vec<vk::SurfaceFormatKHR>,
        present_modes: Vec<vk::PresentModeKHR>,
    ) -> Self {
        let current_extent = if caps.current_extent.width == u32::MAX {
            None
        } else {
            Some(caps.current_extent.into())
        };

        Self {
            min_image_count: caps.min_image_count,
            max_image_count: caps.max_image_count,
            current_extent,
            min_extent: caps.min_image_extent.into(),
            max_extent: caps.max_image_extent.into(),
            current_transform: caps.current_transform,
            formats,
            present_modes,
        }
    }
}

/// Presentable surface bound to one native window.
pub struct SurfaceBinding {
    loader: ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
}

impl SurfaceBinding {
    pub fn bind(
        entry: &Entry,
        instance: &ash::Instance,
        window: &NativeWindow,
    ) -> Result<Self, RenderError> {
        let surface = unsafe {
            ash_window::create_surface(entry, instance, window.display, window.window, None)
        }
        .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;

        log::debug!("Bound presentation surface");

        Ok(Self {
            loader: ash::khr::surface::Instance::new(entry, instance),
            surface,
        })
    }

    pub fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }

    pub fn supports_present(&self, physical_device: vk::PhysicalDevice, queue_family: u32) -> bool {
        unsafe {
            self.loader.get_physical_device_surface_support(
                physical_device,
                queue_family,
                self.surface,
            )
        }
        .unwrap_or(false)
    }

    pub fn query_capabilities(&self, physical_device: vk::PhysicalDevice) -> VkResult<SurfaceCaps> {
        unsafe {
            let caps = self
                .loader
                .get_physical_device_surface_capabilities(physical_device, self.surface)?;
            let formats = self
                .loader
                .get_physical_device_surface_formats(physical_device, self.surface)?;
            let present_modes = self
                .loader
                .get_physical_device_surface_present_modes(physical_device, self.surface)?;
            Ok(SurfaceCaps::from_vk(&caps, formats, present_modes))
        }
    }

    /// Must run after every swapchain built on this surface is gone.
    pub(crate) unsafe fn destroy(&self) {
        self.loader.destroy_surface(self.surface, None);
    }
}
