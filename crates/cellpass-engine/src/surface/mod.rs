//! Host-facing surface capability.
//!
//! The engine never talks to a windowing toolkit. Hosts hand it something that
//! implements [`HostSurface`]; the engine configures it once with the device and
//! the chosen format, then asks it for a fresh target view every frame.

mod offscreen;
mod target;
mod window;

pub use offscreen::OffscreenSurface;
pub use target::SurfaceTarget;
pub use window::{WindowSurface, WindowSurfaceConfig};

use std::sync::Arc;

use crate::error::Result;

/// A drawable output supplied by the host.
///
/// Call order during acquisition: `attach`, `compatible_surface` (adapter
/// selection), `supported_formats`, `configure`. `current_target` is called
/// once per frame afterwards.
pub trait HostSurface {
    /// Creates the platform surface on `instance`.
    fn attach(&mut self, instance: &wgpu::Instance) -> Result<()> {
        let _ = instance;
        Ok(())
    }

    /// Platform surface the adapter must be able to present to.
    ///
    /// Shared because adapter selection runs on a worker thread.
    fn compatible_surface(&self) -> Option<Arc<wgpu::Surface<'static>>> {
        None
    }

    /// Drawable size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Formats the surface accepts on `adapter`, preferred format first.
    fn supported_formats(&mut self, adapter: &wgpu::Adapter) -> Vec<wgpu::TextureFormat>;

    /// Binds the surface to `device` with `format`. Called once.
    fn configure(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) -> Result<()>;

    /// Returns the target view for the current frame.
    fn current_target(&mut self) -> Result<SurfaceTarget>;
}
