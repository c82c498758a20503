// Frame scheduling
//
// One frame in flight. Each tick, strictly in order:
// fence wait -> fence reset -> acquire -> submit -> present.
// The fence wait is the only CPU blocking point and both waits are bounded.

use crate::backend::desc::SubmitDesc;
use crate::backend::{CommandSet, FrameSync, RenderDevice, SwapchainState};
use crate::error::{RenderError, WaitTarget};
use ash::vk;
use std::time::Duration;

/// Lifecycle of the rendering core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No GPU resources yet; the first tick builds them.
    Uninitialized,
    Ready,
    /// Inside a frame submission.
    Rendering,
    /// The swapchain-dependent objects must be rebuilt before the next frame.
    RecreateRequired,
    Rebuilding,
    /// Everything released. Only a new attach leaves this state.
    Destroyed,
}

/// Why a tick did not present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No window attached yet.
    Detached,
    /// Zero-area target (minimized).
    Suspended,
    /// The swapchain was out of date; rebuilt on the next tick.
    OutOfDate,
    /// A bounded wait expired; the next tick retries.
    DeviceTimeout,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Presented { image_index: u32, generation: u64 },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTimeouts {
    pub fence: Duration,
    pub acquire: Duration,
}

impl Default for FrameTimeouts {
    fn default() -> Self {
        Self {
            fence: Duration::from_secs(1),
            acquire: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames_presented: u64,
    pub frames_skipped: u64,
    pub timeouts: u64,
    pub out_of_date: u64,
}

/// Result of one scheduler step that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    /// `recreate` is set when presentation reported a suboptimal or stale
    /// swapchain; the frame itself was still shown.
    Presented { image_index: u32, recreate: bool },
    /// Acquisition reported the swapchain out of date; nothing was submitted.
    OutOfDate,
}

pub struct FrameScheduler {
    sync: FrameSync,
    timeouts: FrameTimeouts,
    stats: FrameStats,
}

impl FrameScheduler {
    pub fn new<D: RenderDevice>(device: &D, timeouts: FrameTimeouts) -> Result<Self, RenderError> {
        Ok(Self {
            sync: FrameSync::new(device)?,
            timeouts,
            stats: FrameStats::default(),
        })
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn sync(&self) -> &FrameSync {
        &self.sync
    }

    pub fn run_frame<D: RenderDevice>(
        &mut self,
        device: &D,
        swapchain: &SwapchainState,
        commands: &CommandSet,
    ) -> Result<FrameStep, RenderError> {
        let result = match self.step(device, swapchain, commands) {
            Err(RenderError::SwapchainOutOfDate) => Ok(FrameStep::OutOfDate),
            other => other,
        };
        match &result {
            Ok(FrameStep::Presented { .. }) => self.stats.frames_presented += 1,
            Ok(FrameStep::OutOfDate) => {
                self.stats.out_of_date += 1;
                self.stats.frames_skipped += 1;
            }
            Err(RenderError::DeviceTimeout { .. }) => {
                self.stats.timeouts += 1;
                self.stats.frames_skipped += 1;
            }
            Err(_) => self.stats.frames_skipped += 1,
        }
        result
    }

    fn step<D: RenderDevice>(
        &mut self,
        device: &D,
        swapchain: &SwapchainState,
        commands: &CommandSet,
    ) -> Result<FrameStep, RenderError> {
        let sync = &self.sync;

        // Step 1: previous submission must be done before its fence is reused
        match device.wait_for_fence(sync.in_flight_fence, self.timeouts.fence) {
            Ok(()) => {}
            Err(vk::Result::TIMEOUT) => {
                return Err(RenderError::DeviceTimeout {
                    target: WaitTarget::Fence,
                    timeout: self.timeouts.fence,
                })
            }
            Err(e) => return Err(RenderError::device("wait for in-flight fence")(e)),
        }

        // Step 2
        device
            .reset_fence(sync.in_flight_fence)
            .map_err(RenderError::device("reset in-flight fence"))?;

        // Step 3
        let (image_index, acquire_suboptimal) = match device.acquire_next_image(
            swapchain.handle,
            self.timeouts.acquire,
            sync.image_available,
        ) {
            Ok(acquired) => acquired,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                return Err(self.abandon(device, RenderError::SwapchainOutOfDate));
            }
            Err(vk::Result::TIMEOUT) | Err(vk::Result::NOT_READY) => {
                let timeout = RenderError::DeviceTimeout {
                    target: WaitTarget::Acquire,
                    timeout: self.timeouts.acquire,
                };
                return Err(self.abandon(device, timeout));
            }
            Err(e) => {
                return Err(self.abandon(device, RenderError::device("acquire next image")(e)))
            }
        };

        let Some(command_buffer) = commands.buffer(image_index) else {
            let missing = RenderError::invalid(
                "command set",
                format!("no command buffer for image {image_index}"),
            );
            return Err(self.abandon(device, missing));
        };

        // Step 4
        let submit = SubmitDesc::frame(
            command_buffer,
            sync.image_available,
            sync.render_finished,
            sync.in_flight_fence,
        );
        if let Err(e) = device.submit(&submit) {
            return Err(self.abandon(device, RenderError::device("queue submit")(e)));
        }

        // Step 5
        let present_stale = match device.present(swapchain.handle, image_index, sync.render_finished) {
            Ok(suboptimal) => suboptimal,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => true,
            Err(e) => return Err(RenderError::device("queue present")(e)),
        };

        Ok(FrameStep::Presented {
            image_index,
            recreate: acquire_suboptimal || present_stale,
        })
    }

    /// Leaves a tick after the fence was reset but before anything was
    /// submitted. An empty submission re-arms the fence so the next wait
    /// cannot block on a fence nobody will signal.
    fn abandon<D: RenderDevice>(&self, device: &D, error: RenderError) -> RenderError {
        match device.signal_fence(self.sync.in_flight_fence) {
            Ok(()) => error,
            Err(e) if error.is_fatal() => {
                log::warn!("Could not re-arm in-flight fence: {}", e);
                error
            }
            Err(e) => RenderError::device("re-arm in-flight fence")(e),
        }
    }

    pub fn destroy<D: RenderDevice>(&self, device: &D) {
        self.sync.destroy(device);
    }
}
