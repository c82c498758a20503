// Error taxonomy for the rendering core
//
// Every fallible GPU call is classified at its call site into one of these
// variants. The frame loop only escalates the fatal ones to the host; timeouts
// and out-of-date swapchains are handled inside the scheduler.

use ash::vk;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which bounded wait expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    /// The in-flight fence guarding the previous submission.
    Fence,
    /// Acquisition of the next presentable image.
    Acquire,
}

impl fmt::Display for WaitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitTarget::Fence => f.write_str("in-flight fence"),
            WaitTarget::Acquire => f.write_str("swapchain image acquisition"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// No instance, no usable physical device, or no queue family that can
    /// both draw and present.
    #[error("graphics initialization failed: {0}")]
    Initialization(String),

    /// The windowing backend could not produce a presentable surface.
    #[error("surface creation failed: {0}")]
    SurfaceCreation(String),

    /// A shader module, render pass, pipeline or framebuffer was rejected.
    #[error("pipeline build failed: {0}")]
    PipelineBuild(String),

    #[error("timed out after {timeout:?} waiting on {target}")]
    DeviceTimeout { target: WaitTarget, timeout: Duration },

    #[error("swapchain is out of date")]
    SwapchainOutOfDate,

    #[error("swapchain recreation failed: {0}")]
    RecreationFailed(#[source] Box<RenderError>),

    /// Any other device-level failure (device lost, out of memory, ...).
    #[error("{op} failed: {result}")]
    Device {
        op: &'static str,
        result: vk::Result,
    },

    #[error("invalid {what}: {reason}")]
    InvalidDescriptor { what: &'static str, reason: String },
}

impl RenderError {
    /// Adapter for `map_err` on raw device results.
    pub(crate) fn device(op: &'static str) -> impl FnOnce(vk::Result) -> RenderError {
        move |result| RenderError::Device { op, result }
    }

    pub(crate) fn pipeline(op: &'static str) -> impl FnOnce(vk::Result) -> RenderError {
        move |result| RenderError::PipelineBuild(format!("{op}: {result}"))
    }

    pub(crate) fn invalid(what: &'static str, reason: impl Into<String>) -> RenderError {
        RenderError::InvalidDescriptor {
            what,
            reason: reason.into(),
        }
    }

    /// Fatal errors end in the `Destroyed` state and are reported to the host.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RenderError::DeviceTimeout { .. } | RenderError::SwapchainOutOfDate
        )
    }
}
