use std::time::Duration;

use crate::error::{RenderError, Result};
use crate::surface::HostSurface;

use super::deadline::{spawn_with_deadline, Elapsed};
use super::format::{available_backends, choose_surface_format};
use super::GpuInit;

/// Owns the wgpu core objects and the surface format they were bound with.
///
/// Acquired once per core; never recreated. Dropping it releases the device.
pub struct DeviceContext {
    /// Instance the adapter was enumerated from. Kept alive with the device.
    instance: wgpu::Instance,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Format the host surface was configured with.
    surface_format: wgpu::TextureFormat,
}

impl DeviceContext {
    /// Acquires a device and binds `surface` to it.
    ///
    /// Stages, each with its own error:
    /// 1. platform check (`UnsupportedPlatform`), before any instance exists
    /// 2. surface attach (`SurfaceConfigurationFailed`)
    /// 3. adapter request (`NoAdapter`)
    /// 4. device request (`DeviceCreationFailed`)
    /// 5. format choice + surface configure (`SurfaceConfigurationFailed`)
    ///
    /// Stages 3 and 4 run on a worker thread under `init.acquire_timeout`
    /// (`DeviceAcquisitionTimeout`); a stalled driver leaves that thread behind.
    pub async fn acquire<S>(surface: &mut S, init: &GpuInit) -> Result<Self>
    where
        S: HostSurface + ?Sized,
    {
        let backends = available_backends(init.backends);
        if backends.is_empty() {
            return Err(RenderError::UnsupportedPlatform {
                requested: init.backends,
            });
        }
        log::debug!("device: using backends {backends:?}");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        surface.attach(&instance)?;

        let job_instance = instance.clone();
        let compatible = surface.compatible_surface();
        let job_init = init.clone();
        let (adapter, device, queue) = acquire_within(init.acquire_timeout, move || {
            pollster::block_on(request_device(
                &job_instance,
                compatible.as_deref(),
                &job_init,
            ))
        })
        .await?;

        let formats = surface.supported_formats(&adapter);
        let surface_format = choose_surface_format(&formats, init.prefer_srgb).ok_or_else(|| {
            RenderError::SurfaceConfigurationFailed(
                "surface reports no supported formats on this adapter".into(),
            )
        })?;

        surface.configure(&device, surface_format)?;

        let info = adapter.get_info();
        log::info!(
            "device acquired: {} ({:?}), surface format {surface_format:?}",
            info.name,
            info.backend
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface_format,
        })
    }

    /// Returns the format the surface was configured with.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }
}

/// Runs a blocking acquisition step off the calling thread, bounded by `limit`.
async fn acquire_within<T, F>(limit: Option<Duration>, job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_with_deadline(job, limit)
        .await
        .map_err(|Elapsed(limit)| RenderError::DeviceAcquisitionTimeout(limit))?
}

async fn request_device(
    instance: &wgpu::Instance,
    compatible_surface: Option<&wgpu::Surface<'static>>,
    init: &GpuInit,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface,
            force_fallback_adapter: init.force_fallback_adapter,
        })
        .await
        .map_err(|e| RenderError::NoAdapter(e.to_string()))?;
    log::debug!("device: adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("cellpass device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await?;

    Ok((adapter, device, queue))
}
