use std::sync::Arc;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::error::{RenderError, Result};

use super::{HostSurface, SurfaceTarget};

/// Presentation parameters for a window surface.
#[derive(Debug, Clone)]
pub struct WindowSurfaceConfig {
    /// Present mode (swap behavior).
    ///
    /// FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Desired maximum frame latency. A hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for WindowSurfaceConfig {
    fn default() -> Self {
        Self {
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
        }
    }
}

/// [`HostSurface`] backed by a native window.
///
/// `W` is usually an `Arc` around the host's window type so the surface can
/// hold its own handle.
pub struct WindowSurface<W> {
    window: W,
    size: (u32, u32),
    options: WindowSurfaceConfig,

    surface: Option<Arc<wgpu::Surface<'static>>>,
    caps: Option<wgpu::SurfaceCapabilities>,
    config: Option<wgpu::SurfaceConfiguration>,

    /// Device the surface is bound to; kept for reconfiguration.
    device: Option<wgpu::Device>,
}

impl<W> WindowSurface<W>
where
    W: HasWindowHandle + HasDisplayHandle + Send + Sync + Clone + 'static,
{
    /// `width`/`height` are the drawable size in physical pixels.
    pub fn new(window: W, width: u32, height: u32) -> Self {
        Self::with_config(window, width, height, WindowSurfaceConfig::default())
    }

    pub fn with_config(window: W, width: u32, height: u32, options: WindowSurfaceConfig) -> Self {
        Self {
            window,
            size: (width, height),
            options,
            surface: None,
            caps: None,
            config: None,
            device: None,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    /// Active surface configuration, once configured.
    pub fn config(&self) -> Option<&wgpu::SurfaceConfiguration> {
        self.config.as_ref()
    }

    fn acquire(&self) -> std::result::Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        match &self.surface {
            Some(surface) => surface.get_current_texture(),
            None => Err(wgpu::SurfaceError::Lost),
        }
    }
}

impl<W> HostSurface for WindowSurface<W>
where
    W: HasWindowHandle + HasDisplayHandle + Send + Sync + Clone + 'static,
{
    fn attach(&mut self, instance: &wgpu::Instance) -> Result<()> {
        let surface = instance
            .create_surface(self.window.clone())
            .map_err(|e| RenderError::SurfaceConfigurationFailed(e.to_string()))?;
        self.surface = Some(Arc::new(surface));
        Ok(())
    }

    fn compatible_surface(&self) -> Option<Arc<wgpu::Surface<'static>>> {
        self.surface.clone()
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn supported_formats(&mut self, adapter: &wgpu::Adapter) -> Vec<wgpu::TextureFormat> {
        let Some(surface) = self.surface.as_ref() else {
            return Vec::new();
        };
        let caps = surface.get_capabilities(adapter);
        let formats = caps.formats.clone();
        self.caps = Some(caps);
        formats
    }

    fn configure(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(RenderError::SurfaceConfigurationFailed(format!(
                "window surface has zero size ({width}x{height})"
            )));
        }

        let (Some(surface), Some(caps)) = (self.surface.as_ref(), self.caps.as_ref()) else {
            return Err(RenderError::SurfaceConfigurationFailed(
                "window surface was not attached to an adapter".into(),
            ));
        };

        if !caps.formats.contains(&format) {
            return Err(RenderError::SurfaceConfigurationFailed(format!(
                "surface does not support {format:?}"
            )));
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: self.options.present_mode,
            alpha_mode: choose_alpha_mode(caps, self.options.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: self.options.desired_maximum_frame_latency,
        };

        surface.configure(device, &config);
        log::debug!(
            "window surface configured: {width}x{height} {format:?} {:?}",
            config.alpha_mode
        );

        self.config = Some(config);
        self.device = Some(device.clone());
        Ok(())
    }

    fn current_target(&mut self) -> Result<SurfaceTarget> {
        let frame = match self.acquire() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure once with the same parameters and retry.
                if let (Some(surface), Some(config), Some(device)) =
                    (&self.surface, &self.config, &self.device)
                {
                    log::debug!("surface lost or outdated; reconfiguring");
                    surface.configure(device, config);
                }
                self.acquire()
                    .map_err(|e| RenderError::TargetUnavailable(e.to_string()))?
            }
            Err(e) => return Err(RenderError::TargetUnavailable(e.to_string())),
        };
        Ok(SurfaceTarget::from_surface_texture(frame))
    }
}

/// Alpha modes that let the transparent clear show the desktop through, best first.
const SEE_THROUGH: [wgpu::CompositeAlphaMode; 2] = [
    wgpu::CompositeAlphaMode::PreMultiplied,
    wgpu::CompositeAlphaMode::PostMultiplied,
];

/// Picks the compositing mode: the requested one if the surface has it,
/// otherwise a see-through mode, otherwise whatever the surface lists first.
fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    let supported = |mode: &wgpu::CompositeAlphaMode| caps.alpha_modes.contains(mode);

    if let Some(mode) = requested.filter(supported) {
        return mode;
    }
    if let Some(mode) = SEE_THROUGH.iter().copied().find(supported) {
        return mode;
    }
    match caps.alpha_modes.first() {
        Some(&mode) => mode,
        None => wgpu::CompositeAlphaMode::Auto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(alpha_modes: Vec<wgpu::CompositeAlphaMode>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            alpha_modes,
            ..Default::default()
        }
    }

    #[test]
    fn requested_alpha_mode_wins_when_supported() {
        let c = caps(vec![
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ]);
        let mode = choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied));
        assert_eq!(mode, wgpu::CompositeAlphaMode::PreMultiplied);
    }

    #[test]
    fn see_through_mode_is_preferred_over_opaque() {
        let c = caps(vec![
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]);
        assert_eq!(choose_alpha_mode(&c, None), wgpu::CompositeAlphaMode::PostMultiplied);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::Inherit)),
            wgpu::CompositeAlphaMode::PostMultiplied
        );
    }

    #[test]
    fn opaque_only_surface_stays_opaque() {
        let c = caps(vec![wgpu::CompositeAlphaMode::Opaque]);
        let mode = choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PostMultiplied));
        assert_eq!(mode, wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn no_alpha_modes_means_auto() {
        assert_eq!(choose_alpha_mode(&caps(vec![]), None), wgpu::CompositeAlphaMode::Auto);
    }
}
