use std::time::Duration;

/// Initialization parameters for the device context.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may use.
    ///
    /// Intersected with the backends compiled into this build; an empty
    /// intersection means the platform has no usable GPU API.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Only accept a software (fallback) adapter.
    pub force_fallback_adapter: bool,

    /// Prefer an sRGB surface format when the surface offers one.
    ///
    /// Off by default so the surface's own preferred format is used.
    pub prefer_srgb: bool,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Upper bound on adapter + device acquisition. `None` waits forever.
    pub acquire_timeout: Option<Duration>,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            prefer_srgb: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            acquire_timeout: Some(Duration::from_secs(10)),
        }
    }
}
