// Swapchain - Window presentation
//
// Builds the chain of presentable images plus one view per image, sized to
// the current surface extent. Each build is a new generation; the previous
// generation's handle is passed as `old_swapchain` and retired afterwards.

use super::desc::SwapchainDesc;
use super::{Extent, RenderDevice, SurfaceCaps};
use crate::error::RenderError;
use ash::vk;

pub const PREFERRED_FORMAT: vk::SurfaceFormatKHR = vk::SurfaceFormatKHR {
    format: vk::Format::B8G8R8A8_SRGB,
    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
};

/// Prefer sRGB BGRA, otherwise take whatever the surface lists first.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .copied()
        .find(|f| {
            f.format == PREFERRED_FORMAT.format && f.color_space == PREFERRED_FORMAT.color_space
        })
        .or_else(|| formats.first().copied())
}

/// FIFO when vsync is on. Without vsync: MAILBOX, then IMMEDIATE, then the
/// vsync rule.
pub fn choose_present_mode(modes: &[vk::PresentModeKHR], vsync: bool) -> vk::PresentModeKHR {
    let has = |mode: vk::PresentModeKHR| modes.contains(&mode);

    if !vsync {
        if has(vk::PresentModeKHR::MAILBOX) {
            return vk::PresentModeKHR::MAILBOX;
        }
        if has(vk::PresentModeKHR::IMMEDIATE) {
            return vk::PresentModeKHR::IMMEDIATE;
        }
    }

    if has(vk::PresentModeKHR::FIFO) {
        vk::PresentModeKHR::FIFO
    } else {
        // FIFO is mandatory, but trust what the surface reports
        modes.first().copied().unwrap_or(vk::PresentModeKHR::FIFO)
    }
}

/// The surface's own extent, or the host size clamped to the surface limits
/// when the surface leaves it to us.
pub fn choose_extent(caps: &SurfaceCaps, host_extent: Extent) -> Extent {
    match caps.current_extent {
        Some(extent) => extent,
        None => host_extent.clamp(caps.min_extent, caps.max_extent),
    }
}

/// One more than the minimum, never above a non-zero maximum.
pub fn choose_image_count(caps: &SurfaceCaps) -> u32 {
    let count = caps.min_image_count.max(1) + 1;
    if caps.max_image_count > 0 {
        count.min(caps.max_image_count)
    } else {
        count
    }
}

/// A previous generation whose views are gone and whose handle still has to
/// be passed as `old_swapchain` and then destroyed.
pub struct RetiredSwapchain {
    handle: vk::SwapchainKHR,
    generation: u64,
}

pub struct SwapchainState {
    pub generation: u64,
    pub handle: vk::SwapchainKHR,
    pub format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: Extent,
    pub images: Vec<vk::Image>,
    pub image_views: Vec<vk::ImageView>,
}

impl SwapchainState {
    /// Builds a new generation. `previous` is always consumed: its handle is
    /// destroyed whether or not the new build succeeds.
    pub fn build<D: RenderDevice>(
        device: &D,
        caps: &SurfaceCaps,
        host_extent: Extent,
        vsync: bool,
        previous: Option<RetiredSwapchain>,
    ) -> Result<Self, RenderError> {
        let old_handle = previous
            .as_ref()
            .map_or(vk::SwapchainKHR::null(), |p| p.handle);
        let generation = previous.as_ref().map_or(1, |p| p.generation + 1);

        let result = Self::create(device, caps, host_extent, vsync, old_handle, generation);

        if let Some(previous) = previous {
            device.destroy_swapchain(previous.handle);
        }

        result
    }

    fn create<D: RenderDevice>(
        device: &D,
        caps: &SurfaceCaps,
        host_extent: Extent,
        vsync: bool,
        old_swapchain: vk::SwapchainKHR,
        generation: u64,
    ) -> Result<Self, RenderError> {
        let format = choose_surface_format(&caps.formats)
            .ok_or_else(|| RenderError::invalid("swapchain", "surface reports no formats"))?;
        let present_mode = choose_present_mode(&caps.present_modes, vsync);
        let extent = choose_extent(caps, host_extent);
        let image_count = choose_image_count(caps);

        let desc = SwapchainDesc::new(
            image_count,
            format,
            present_mode,
            extent,
            caps.current_transform,
            old_swapchain,
        )?;

        log::info!(
            "Creating swapchain generation {}: {} ({} images, {:?}, {:?})",
            generation,
            extent,
            image_count,
            format.format,
            present_mode
        );

        let handle = device
            .create_swapchain(&desc)
            .map_err(RenderError::device("create swapchain"))?;

        let images = match device.swapchain_images(handle) {
            Ok(images) => images,
            Err(e) => {
                device.destroy_swapchain(handle);
                return Err(RenderError::device("get swapchain images")(e));
            }
        };

        let mut image_views = Vec::with_capacity(images.len());
        for &image in &images {
            match device.create_image_view(image, format.format) {
                Ok(view) => image_views.push(view),
                Err(e) => {
                    for view in image_views {
                        device.destroy_image_view(view);
                    }
                    device.destroy_swapchain(handle);
                    return Err(RenderError::device("create image view")(e));
                }
            }
        }

        log::debug!("Created swapchain with {} images", images.len());

        Ok(Self {
            generation,
            handle,
            format,
            present_mode,
            extent,
            images,
            image_views,
        })
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Destroys the views and hands back the handle for the next build.
    pub fn retire<D: RenderDevice>(self, device: &D) -> RetiredSwapchain {
        for &view in &self.image_views {
            device.destroy_image_view(view);
        }
        RetiredSwapchain {
            handle: self.handle,
            generation: self.generation,
        }
    }

    pub fn destroy<D: RenderDevice>(self, device: &D) {
        let retired = self.retire(device);
        device.destroy_swapchain(retired.handle);
    }
}
