//! GPU device management.
//!
//! This module is responsible for:
//! - checking that the platform exposes a usable GPU backend
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - choosing the surface format and binding the host surface to the device

mod context;
mod deadline;
mod format;
mod init;

pub use context::DeviceContext;
pub use init::GpuInit;
