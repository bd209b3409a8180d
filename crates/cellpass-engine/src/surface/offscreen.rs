use crate::error::{RenderError, Result};

use super::{HostSurface, SurfaceTarget};

/// [`HostSurface`] that renders into a plain texture.
///
/// Used for headless runs and tests. Frames are never presented; the last
/// rendered image stays in [`OffscreenSurface::texture`].
pub struct OffscreenSurface {
    size: (u32, u32),
    formats: Vec<wgpu::TextureFormat>,
    texture: Option<wgpu::Texture>,
    frames_acquired: u32,
}

impl OffscreenSurface {
    /// Offscreen surface preferring `Rgba8Unorm`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_formats(
            width,
            height,
            vec![wgpu::TextureFormat::Rgba8Unorm, wgpu::TextureFormat::Bgra8Unorm],
        )
    }

    /// Offscreen surface accepting `formats`, preferred first.
    pub fn with_formats(width: u32, height: u32, formats: Vec<wgpu::TextureFormat>) -> Self {
        Self {
            size: (width, height),
            formats,
            texture: None,
            frames_acquired: 0,
        }
    }

    /// Backing texture, once configured.
    pub fn texture(&self) -> Option<&wgpu::Texture> {
        self.texture.as_ref()
    }

    /// Number of targets handed out so far.
    pub fn frames_acquired(&self) -> u32 {
        self.frames_acquired
    }
}

impl HostSurface for OffscreenSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn supported_formats(&mut self, _adapter: &wgpu::Adapter) -> Vec<wgpu::TextureFormat> {
        self.formats.clone()
    }

    fn configure(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 {
            return Err(RenderError::SurfaceConfigurationFailed(format!(
                "offscreen surface has zero size ({width}x{height})"
            )));
        }
        if !self.formats.contains(&format) {
            return Err(RenderError::SurfaceConfigurationFailed(format!(
                "offscreen surface does not accept {format:?}"
            )));
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cellpass offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        self.texture = Some(texture);
        Ok(())
    }

    fn current_target(&mut self) -> Result<SurfaceTarget> {
        let Some(texture) = self.texture.as_ref() else {
            return Err(RenderError::TargetUnavailable(
                "offscreen surface is not configured".into(),
            ));
        };
        self.frames_acquired += 1;
        Ok(SurfaceTarget::from_texture(texture))
    }
}
