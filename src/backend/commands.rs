// Command recording
//
// One primary command buffer per framebuffer, recorded once per generation
// with the fixed clear + triangle sequence. The pool outlives every set.

use super::desc::DrawDesc;
use super::{FramebufferSet, PipelineState, RenderDevice};
use crate::error::RenderError;
use ash::vk;

pub struct CommandSet {
    pub generation: u64,
    pub buffers: Vec<vk::CommandBuffer>,
}

impl CommandSet {
    pub fn record<D: RenderDevice>(
        device: &D,
        pool: vk::CommandPool,
        pipeline: &PipelineState,
        framebuffers: &FramebufferSet,
        clear_color: [f32; 4],
    ) -> Result<Self, RenderError> {
        let count = u32::try_from(framebuffers.len())
            .map_err(|_| RenderError::invalid("command set", "too many framebuffers"))?;

        let buffers = device
            .allocate_command_buffers(pool, count)
            .map_err(RenderError::device("allocate command buffers"))?;

        for (&buffer, &framebuffer) in buffers.iter().zip(&framebuffers.framebuffers) {
            let draw = DrawDesc::triangle(
                pipeline.render_pass,
                framebuffer,
                pipeline.pipeline,
                framebuffers.extent,
                clear_color,
            );

            if let Err(e) = device.record_draw(buffer, &draw) {
                device.free_command_buffers(pool, &buffers);
                return Err(RenderError::device("record command buffer")(e));
            }
        }

        log::debug!(
            "Recorded {} command buffers for generation {}",
            buffers.len(),
            framebuffers.generation
        );

        Ok(Self {
            generation: framebuffers.generation,
            buffers,
        })
    }

    pub fn buffer(&self, image_index: u32) -> Option<vk::CommandBuffer> {
        self.buffers.get(image_index as usize).copied()
    }

    pub fn free<D: RenderDevice>(self, device: &D, pool: vk::CommandPool) {
        if !self.buffers.is_empty() {
            device.free_command_buffers(pool, &self.buffers);
        }
    }
}
