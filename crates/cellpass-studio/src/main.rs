mod host;

use anyhow::Result;

use cellpass_engine::device::GpuInit;
use cellpass_engine::logging::{init_logging, LoggingConfig};

use host::{Host, HostConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu_init = GpuInit {
        backends: wgpu::Backends::from_env().unwrap_or(wgpu::Backends::all()),
        ..GpuInit::default()
    };

    Host::run(HostConfig::default(), gpu_init)
}
