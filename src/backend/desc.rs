// GPU object descriptors
//
// Small immutable records describing each object we ask the device to build.
// Constructors reject values the driver would reject anyway, so a descriptor
// that exists is one the device can use as-is.

use super::Extent;
use crate::error::RenderError;
use ash::vk;

/// Number of vertices in the hard-coded triangle.
pub const TRIANGLE_VERTICES: u32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct SwapchainDesc {
    image_count: u32,
    format: vk::SurfaceFormatKHR,
    present_mode: vk::PresentModeKHR,
    extent: Extent,
    pre_transform: vk::SurfaceTransformFlagsKHR,
    old_swapchain: vk::SwapchainKHR,
}

impl SwapchainDesc {
    pub fn new(
        image_count: u32,
        format: vk::SurfaceFormatKHR,
        present_mode: vk::PresentModeKHR,
        extent: Extent,
        pre_transform: vk::SurfaceTransformFlagsKHR,
        old_swapchain: vk::SwapchainKHR,
    ) -> Result<Self, RenderError> {
        if image_count == 0 {
            return Err(RenderError::invalid("swapchain", "image count is zero"));
        }
        if extent.is_empty() {
            return Err(RenderError::invalid(
                "swapchain",
                format!("extent {extent} has zero area"),
            ));
        }
        if format.format == vk::Format::UNDEFINED {
            return Err(RenderError::invalid("swapchain", "surface format is undefined"));
        }
        Ok(Self {
            image_count,
            format,
            present_mode,
            extent,
            pre_transform,
            old_swapchain,
        })
    }

    pub fn image_count(&self) -> u32 {
        self.image_count
    }
    pub fn format(&self) -> vk::SurfaceFormatKHR {
        self.format
    }
    pub fn present_mode(&self) -> vk::PresentModeKHR {
        self.present_mode
    }
    pub fn extent(&self) -> Extent {
        self.extent
    }
    pub fn pre_transform(&self) -> vk::SurfaceTransformFlagsKHR {
        self.pre_transform
    }
    pub fn old_swapchain(&self) -> vk::SwapchainKHR {
        self.old_swapchain
    }
}

/// Single-subpass render pass with one cleared color attachment that ends in
/// the present layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPassDesc {
    color_format: vk::Format,
}

impl RenderPassDesc {
    pub fn new(color_format: vk::Format) -> Result<Self, RenderError> {
        if color_format == vk::Format::UNDEFINED {
            return Err(RenderError::invalid("render pass", "color format is undefined"));
        }
        Ok(Self { color_format })
    }

    pub fn color_format(&self) -> vk::Format {
        self.color_format
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineDesc {
    render_pass: vk::RenderPass,
    layout: vk::PipelineLayout,
    vertex: vk::ShaderModule,
    fragment: vk::ShaderModule,
}

impl PipelineDesc {
    pub fn new(
        render_pass: vk::RenderPass,
        layout: vk::PipelineLayout,
        vertex: vk::ShaderModule,
        fragment: vk::ShaderModule,
    ) -> Result<Self, RenderError> {
        if render_pass == vk::RenderPass::null() {
            return Err(RenderError::invalid("pipeline", "render pass is null"));
        }
        if layout == vk::PipelineLayout::null() {
            return Err(RenderError::invalid("pipeline", "layout is null"));
        }
        if vertex == vk::ShaderModule::null() || fragment == vk::ShaderModule::null() {
            return Err(RenderError::invalid("pipeline", "shader module is null"));
        }
        Ok(Self {
            render_pass,
            layout,
            vertex,
            fragment,
        })
    }

    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass
    }
    pub fn layout(&self) -> vk::PipelineLayout {
        self.layout
    }
    pub fn vertex(&self) -> vk::ShaderModule {
        self.vertex
    }
    pub fn fragment(&self) -> vk::ShaderModule {
        self.fragment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferDesc {
    render_pass: vk::RenderPass,
    view: vk::ImageView,
    extent: Extent,
}

impl FramebufferDesc {
    pub fn new(
        render_pass: vk::RenderPass,
        view: vk::ImageView,
        extent: Extent,
    ) -> Result<Self, RenderError> {
        if render_pass == vk::RenderPass::null() || view == vk::ImageView::null() {
            return Err(RenderError::invalid("framebuffer", "null attachment or render pass"));
        }
        if extent.is_empty() {
            return Err(RenderError::invalid(
                "framebuffer",
                format!("extent {extent} has zero area"),
            ));
        }
        Ok(Self {
            render_pass,
            view,
            extent,
        })
    }

    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass
    }
    pub fn view(&self) -> vk::ImageView {
        self.view
    }
    pub fn extent(&self) -> Extent {
        self.extent
    }
}

/// The fixed per-image draw: clear, bind, set viewport/scissor, draw, end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawDesc {
    pub render_pass: vk::RenderPass,
    pub framebuffer: vk::Framebuffer,
    pub pipeline: vk::Pipeline,
    pub extent: Extent,
    pub clear_color: [f32; 4],
    pub vertex_count: u32,
    pub instance_count: u32,
}

impl DrawDesc {
    pub fn triangle(
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        pipeline: vk::Pipeline,
        extent: Extent,
        clear_color: [f32; 4],
    ) -> Self {
        Self {
            render_pass,
            framebuffer,
            pipeline,
            extent,
            clear_color,
            vertex_count: TRIANGLE_VERTICES,
            instance_count: 1,
        }
    }

    pub fn viewport(&self) -> vk::Viewport {
        vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: self.extent.width as f32,
            height: self.extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    pub fn scissor(&self) -> vk::Rect2D {
        vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent: self.extent.into(),
        }
    }
}

/// One queue submission of a recorded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitDesc {
    pub command_buffer: vk::CommandBuffer,
    pub wait: vk::Semaphore,
    pub wait_stage: vk::PipelineStageFlags,
    pub signal: vk::Semaphore,
    pub fence: vk::Fence,
}

impl SubmitDesc {
    /// Color writes wait for the acquired image; everything earlier may run ahead.
    pub fn frame(
        command_buffer: vk::CommandBuffer,
        wait: vk::Semaphore,
        signal: vk::Semaphore,
        fence: vk::Fence,
    ) -> Self {
        Self {
            command_buffer,
            wait,
            wait_stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            signal,
            fence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    fn srgb() -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format: vk::Format::B8G8R8A8_SRGB,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        }
    }

    #[test]
    fn test_swapchain_desc_rejects_zero_extent() {
        let err = SwapchainDesc::new(
            3,
            srgb(),
            vk::PresentModeKHR::FIFO,
            Extent::new(0, 600),
            vk::SurfaceTransformFlagsKHR::IDENTITY,
            vk::SwapchainKHR::null(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidDescriptor { what: "swapchain", .. }));
    }

    #[test]
    fn test_swapchain_desc_rejects_zero_images() {
        assert!(SwapchainDesc::new(
            0,
            srgb(),
            vk::PresentModeKHR::FIFO,
            Extent::new(800, 600),
            vk::SurfaceTransformFlagsKHR::IDENTITY,
            vk::SwapchainKHR::null(),
        )
        .is_err());
    }

    #[test]
    fn test_render_pass_desc_rejects_undefined_format() {
        assert!(RenderPassDesc::new(vk::Format::UNDEFINED).is_err());
        assert_eq!(
            RenderPassDesc::new(vk::Format::B8G8R8A8_SRGB).unwrap().color_format(),
            vk::Format::B8G8R8A8_SRGB
        );
    }

    #[test]
    fn test_pipeline_desc_rejects_null_handles() {
        let pass = vk::RenderPass::from_raw(1);
        let layout = vk::PipelineLayout::from_raw(2);
        let module = vk::ShaderModule::from_raw(3);
        assert!(PipelineDesc::new(vk::RenderPass::null(), layout, module, module).is_err());
        assert!(PipelineDesc::new(pass, layout, vk::ShaderModule::null(), module).is_err());
        assert!(PipelineDesc::new(pass, layout, module, module).is_ok());
    }

    #[test]
    fn test_triangle_draw_covers_the_whole_extent() {
        let draw = DrawDesc::triangle(
            vk::RenderPass::from_raw(1),
            vk::Framebuffer::from_raw(2),
            vk::Pipeline::from_raw(3),
            Extent::new(1024, 768),
            [0.1, 0.1, 0.2, 1.0],
        );
        assert_eq!(draw.vertex_count, 3);
        assert_eq!(draw.instance_count, 1);
        assert_eq!(draw.viewport().width, 1024.0);
        assert_eq!(draw.scissor().extent.height, 768);
    }

    #[test]
    fn test_frame_submit_waits_at_color_output() {
        let submit = SubmitDesc::frame(
            vk::CommandBuffer::from_raw(1),
            vk::Semaphore::from_raw(2),
            vk::Semaphore::from_raw(3),
            vk::Fence::from_raw(4),
        );
        assert_eq!(submit.wait_stage, vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT);
    }
}
