// Graphics pipeline creation and management
//
// Render pass + pipeline depend only on the swapchain format and the shader
// binaries. Viewport and scissor are dynamic state, so a resize only needs new
// framebuffers.

use super::desc::{FramebufferDesc, PipelineDesc, RenderPassDesc};
use super::{Extent, RenderDevice, ShaderSet, SwapchainState};
use crate::error::RenderError;
use ash::vk;

pub struct PipelineState {
    pub render_pass: vk::RenderPass,
    pub layout: vk::PipelineLayout,
    pub pipeline: vk::Pipeline,
    /// Color format the render pass was built for.
    pub format: vk::Format,
}

impl PipelineState {
    pub fn build<D: RenderDevice>(
        device: &D,
        format: vk::Format,
        shaders: &ShaderSet,
    ) -> Result<Self, RenderError> {
        let render_pass = device
            .create_render_pass(&RenderPassDesc::new(format)?)
            .map_err(RenderError::pipeline("render pass rejected"))?;

        let layout = match device.create_pipeline_layout() {
            Ok(layout) => layout,
            Err(e) => {
                device.destroy_render_pass(render_pass);
                return Err(RenderError::pipeline("pipeline layout rejected")(e));
            }
        };

        match Self::create_pipeline(device, render_pass, layout, shaders) {
            Ok(pipeline) => {
                log::info!("Built graphics pipeline for {:?}", format);
                Ok(Self {
                    render_pass,
                    layout,
                    pipeline,
                    format,
                })
            }
            Err(e) => {
                device.destroy_pipeline_layout(layout);
                device.destroy_render_pass(render_pass);
                Err(e)
            }
        }
    }

    /// Shader modules only live until the pipeline exists.
    fn create_pipeline<D: RenderDevice>(
        device: &D,
        render_pass: vk::RenderPass,
        layout: vk::PipelineLayout,
        shaders: &ShaderSet,
    ) -> Result<vk::Pipeline, RenderError> {
        let vertex = device
            .create_shader_module(&shaders.vertex)
            .map_err(RenderError::pipeline("vertex shader rejected"))?;

        let fragment = match device.create_shader_module(&shaders.fragment) {
            Ok(module) => module,
            Err(e) => {
                device.destroy_shader_module(vertex);
                return Err(RenderError::pipeline("fragment shader rejected")(e));
            }
        };

        let result = PipelineDesc::new(render_pass, layout, vertex, fragment).and_then(|desc| {
            device
                .create_graphics_pipeline(&desc)
                .map_err(RenderError::pipeline("graphics pipeline rejected"))
        });

        device.destroy_shader_module(fragment);
        device.destroy_shader_module(vertex);

        result
    }

    pub fn destroy<D: RenderDevice>(self, device: &D) {
        device.destroy_pipeline(self.pipeline);
        device.destroy_pipeline_layout(self.layout);
        device.destroy_render_pass(self.render_pass);
    }
}

/// One framebuffer per swapchain image view, all from the same generation.
pub struct FramebufferSet {
    pub generation: u64,
    pub extent: Extent,
    pub framebuffers: Vec<vk::Framebuffer>,
}

impl FramebufferSet {
    pub fn build<D: RenderDevice>(
        device: &D,
        pipeline: &PipelineState,
        swapchain: &SwapchainState,
    ) -> Result<Self, RenderError> {
        let mut framebuffers = Vec::with_capacity(swapchain.image_views.len());

        for &view in &swapchain.image_views {
            let created = FramebufferDesc::new(pipeline.render_pass, view, swapchain.extent)
                .and_then(|desc| {
                    device
                        .create_framebuffer(&desc)
                        .map_err(RenderError::pipeline("framebuffer rejected"))
                });

            match created {
                Ok(framebuffer) => framebuffers.push(framebuffer),
                Err(e) => {
                    for framebuffer in framebuffers {
                        device.destroy_framebuffer(framebuffer);
                    }
                    return Err(e);
                }
            }
        }

        Ok(Self {
            generation: swapchain.generation,
            extent: swapchain.extent,
            framebuffers,
        })
    }

    pub fn len(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.framebuffers.is_empty()
    }

    pub fn destroy<D: RenderDevice>(self, device: &D) {
        for framebuffer in self.framebuffers {
            device.destroy_framebuffer(framebuffer);
        }
    }
}
