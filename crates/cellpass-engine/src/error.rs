//! Error types for the cell pass pipeline.
//!
//! Every variant is fatal to the current invocation. Nothing is retried
//! internally; the caller receives the driver or compiler message verbatim.

use std::time::Duration;

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Failure of one of the pipeline stages (device, buffer, shader, pipeline, draw).
#[derive(Error, Debug)]
pub enum RenderError {
    /// None of the requested GPU backends is available on this platform.
    #[error("GPU rendering is not supported on this platform (requested backends: {requested:?})")]
    UnsupportedPlatform { requested: wgpu::Backends },

    /// No adapter matched the request.
    #[error("no suitable GPU adapter found: {0}")]
    NoAdapter(String),

    /// The adapter refused to create a logical device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Adapter/device acquisition did not finish in time.
    #[error("GPU device acquisition timed out after {0:?}")]
    DeviceAcquisitionTimeout(Duration),

    /// The host surface could not be created or bound to the device.
    #[error("surface configuration failed: {0}")]
    SurfaceConfigurationFailed(String),

    /// WGSL source failed to parse or validate.
    #[error("shader `{label}` failed to compile:\n{diagnostics}")]
    ShaderCompileError { label: String, diagnostics: String },

    /// Shader expectations do not match the declared vertex layout or targets.
    #[error("pipeline layout mismatch: {0}")]
    PipelineLayoutMismatch(String),

    /// The color format cannot be used as a render target.
    #[error("texture format {0:?} is not renderable")]
    UnsupportedFormat(wgpu::TextureFormat),

    /// Vertex bytes do not fit the vertex layout.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The host could not hand out a target view for this frame.
    #[error("surface target unavailable: {0}")]
    TargetUnavailable(String),

    /// Recording the draw failed; nothing was submitted.
    #[error("draw failed: {0}")]
    DrawError(String),
}

impl RenderError {
    /// Name of the pipeline stage this error belongs to.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform { .. }
            | Self::NoAdapter(_)
            | Self::DeviceCreationFailed(_)
            | Self::DeviceAcquisitionTimeout(_)
            | Self::SurfaceConfigurationFailed(_) => "device",
            Self::InvalidGeometry(_) => "buffer",
            Self::ShaderCompileError { .. } => "shader",
            Self::PipelineLayoutMismatch(_) | Self::UnsupportedFormat(_) => "pipeline",
            Self::TargetUnavailable(_) | Self::DrawError(_) => "draw",
        }
    }
}

#[cfg(test)]
impl RenderError {
    /// The machine has no usable GPU; hardware tests skip on these and fail on
    /// anything else.
    pub(crate) fn no_usable_gpu(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPlatform { .. }
                | Self::NoAdapter(_)
                | Self::DeviceCreationFailed(_)
                | Self::DeviceAcquisitionTimeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_follow_pipeline_order() {
        let platform = RenderError::UnsupportedPlatform { requested: wgpu::Backends::empty() };
        assert_eq!(platform.stage(), "device");
        assert_eq!(RenderError::InvalidGeometry("x".into()).stage(), "buffer");
        let shader = RenderError::ShaderCompileError {
            label: "s".into(),
            diagnostics: "d".into(),
        };
        assert_eq!(shader.stage(), "shader");
        assert_eq!(RenderError::PipelineLayoutMismatch("m".into()).stage(), "pipeline");
        assert_eq!(RenderError::DrawError("bind".into()).stage(), "draw");
    }

    #[test]
    fn shader_errors_carry_diagnostics() {
        let err = RenderError::ShaderCompileError {
            label: "cell shader".into(),
            diagnostics: "expected `;`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cell shader"));
        assert!(msg.contains("expected `;`"));
    }

    #[test]
    fn only_acquisition_failures_mean_no_gpu() {
        assert!(RenderError::NoAdapter("none".into()).no_usable_gpu());
        assert!(RenderError::DeviceAcquisitionTimeout(Duration::from_secs(1)).no_usable_gpu());
        assert!(!RenderError::SurfaceConfigurationFailed("size".into()).no_usable_gpu());
        assert!(!RenderError::PipelineLayoutMismatch("m".into()).no_usable_gpu());
        assert!(!RenderError::DrawError("bind".into()).no_usable_gpu());
    }
}
