/// The image a single frame renders into.
///
/// Obtained fresh from the host surface for every frame and consumed by the
/// frame renderer, so a target cannot outlive the frame it was acquired for.
pub struct SurfaceTarget {
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    size: (u32, u32),

    /// Swapchain image, if the target is presentable.
    frame: Option<wgpu::SurfaceTexture>,
}

impl SurfaceTarget {
    /// Wraps an acquired swapchain image.
    pub fn from_surface_texture(frame: wgpu::SurfaceTexture) -> Self {
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            format: frame.texture.format(),
            size: (frame.texture.width(), frame.texture.height()),
            view,
            frame: Some(frame),
        }
    }

    /// Wraps a plain render-attachment texture. Presenting it is a no-op.
    pub fn from_texture(texture: &wgpu::Texture) -> Self {
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            format: texture.format(),
            size: (texture.width(), texture.height()),
            frame: None,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_presentable(&self) -> bool {
        self.frame.is_some()
    }

    /// Hands the image back to the surface for display.
    ///
    /// Must be called after the frame's commands were submitted.
    pub fn present(self) {
        let Self { view, frame, .. } = self;
        drop(view);
        if let Some(frame) = frame {
            frame.present();
        }
    }
}
