// Synchronization primitives
//
// One frame in flight: a single acquire semaphore, present semaphore and
// fence, created once and reused on every tick.

use super::RenderDevice;
use crate::error::RenderError;
use ash::vk;

pub struct FrameSync {
    /// Signaled by acquisition, waited on by the submission.
    pub image_available: vk::Semaphore,
    /// Signaled by the submission, waited on by presentation.
    pub render_finished: vk::Semaphore,
    pub in_flight_fence: vk::Fence,
}

impl FrameSync {
    pub fn new<D: RenderDevice>(device: &D) -> Result<Self, RenderError> {
        let image_available = device
            .create_semaphore()
            .map_err(RenderError::device("create acquire semaphore"))?;

        let render_finished = match device.create_semaphore() {
            Ok(semaphore) => semaphore,
            Err(e) => {
                device.destroy_semaphore(image_available);
                return Err(RenderError::device("create present semaphore")(e));
            }
        };

        // Start signaled so the first tick's wait returns immediately
        let in_flight_fence = match device.create_fence(true) {
            Ok(fence) => fence,
            Err(e) => {
                device.destroy_semaphore(render_finished);
                device.destroy_semaphore(image_available);
                return Err(RenderError::device("create in-flight fence")(e));
            }
        };

        Ok(Self {
            image_available,
            render_finished,
            in_flight_fence,
        })
    }

    pub fn destroy<D: RenderDevice>(&self, device: &D) {
        device.destroy_semaphore(self.image_available);
        device.destroy_semaphore(self.render_finished);
        device.destroy_fence(self.in_flight_fence);
    }
}
