use crate::device::DeviceContext;
use crate::error::{RenderError, Result};
use crate::geometry::VertexLayout;

/// Device-resident vertex data with a fixed allocation.
///
/// The size is set at creation and never changes; the content may be
/// overwritten with [`VertexBuffer::write`].
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    layout: VertexLayout,
}

/// Plain description of a vertex buffer, used for draw validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BufferBinding {
    pub size: u64,
    pub usage: wgpu::BufferUsages,
    pub layout: VertexLayout,
}

impl VertexBuffer {
    /// Allocates exactly `bytes.len()` bytes (VERTEX | COPY_DST) and queues
    /// a copy of `bytes` into it.
    ///
    /// The copy is ordered before any command buffer submitted later on the
    /// same queue.
    pub fn create(ctx: &DeviceContext, layout: VertexLayout, bytes: &[u8]) -> Result<Self> {
        check_whole_vertices(&layout, bytes.len() as u64)?;

        let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("cellpass cell vertices"),
            size: bytes.len() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        ctx.queue().write_buffer(&buffer, 0, bytes);
        log::debug!(
            "vertex buffer: {} bytes, {} vertices",
            bytes.len(),
            layout.vertex_count(bytes.len() as u64)
        );

        Ok(Self { buffer, layout })
    }

    /// Overwrites the whole content. The length must equal the allocation.
    pub fn write(&self, ctx: &DeviceContext, bytes: &[u8]) -> Result<()> {
        if bytes.len() as u64 != self.size() {
            return Err(RenderError::InvalidGeometry(format!(
                "write of {} bytes into a {}-byte vertex buffer",
                bytes.len(),
                self.size()
            )));
        }
        ctx.queue().write_buffer(&self.buffer, 0, bytes);
        Ok(())
    }

    /// Allocation size in bytes, exactly as requested.
    pub fn size(&self) -> u64 {
        self.buffer.size()
    }

    pub fn usage(&self) -> wgpu::BufferUsages {
        self.buffer.usage()
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn vertex_count(&self) -> u32 {
        self.layout.vertex_count(self.size())
    }

    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn binding(&self) -> BufferBinding {
        BufferBinding {
            size: self.size(),
            usage: self.usage(),
            layout: self.layout,
        }
    }
}

/// Vertex data must hold a whole number of vertices.
fn check_whole_vertices(layout: &VertexLayout, byte_len: u64) -> Result<()> {
    if layout.array_stride == 0 {
        return Err(RenderError::InvalidGeometry("vertex layout has zero stride".into()));
    }
    if byte_len % layout.array_stride != 0 {
        return Err(RenderError::InvalidGeometry(format!(
            "{byte_len} bytes is not a multiple of the {}-byte vertex stride",
            layout.array_stride
        )));
    }
    Ok(())
}
