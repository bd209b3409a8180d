use crate::error::{RenderError, Result};

use super::buffer::BufferBinding;
use super::pipeline::PipelineBinding;

/// A validated, non-indexed draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DrawCall {
    /// Vertex buffer slot the geometry is bound to.
    pub slot: u32,
    pub vertex_count: u32,
    pub instance_count: u32,
}

impl DrawCall {
    /// Checks that `buffer` can feed `pipeline` on a `target_format` target and
    /// derives the vertex count (buffer size / stride).
    pub fn plan(
        pipeline: &PipelineBinding,
        buffer: &BufferBinding,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        if pipeline.format != target_format {
            return Err(RenderError::DrawError(format!(
                "pipeline targets {:?} but the frame target is {target_format:?}",
                pipeline.format
            )));
        }
        if buffer.layout != pipeline.layout {
            return Err(RenderError::DrawError(format!(
                "vertex buffer layout (stride {}) differs from the pipeline's (stride {})",
                buffer.layout.array_stride, pipeline.layout.array_stride
            )));
        }
        if !buffer.usage.contains(wgpu::BufferUsages::VERTEX) {
            return Err(RenderError::DrawError(format!(
                "buffer usage {:?} lacks VERTEX",
                buffer.usage
            )));
        }

        let vertex_count = pipeline.layout.vertex_count(buffer.size);
        if vertex_count == 0 {
            return Err(RenderError::DrawError("vertex buffer holds no vertices".into()));
        }

        Ok(Self {
            slot: pipeline.layout.slot,
            vertex_count,
            instance_count: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CellVertex, VertexLayout};

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

    fn pipeline() -> PipelineBinding {
        PipelineBinding {
            format: FORMAT,
            layout: CellVertex::layout(),
        }
    }

    fn buffer(size: u64) -> BufferBinding {
        BufferBinding {
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            layout: CellVertex::layout(),
        }
    }

    #[test]
    fn reference_quad_draws_six_vertices_once() {
        let draw = DrawCall::plan(&pipeline(), &buffer(48), FORMAT).unwrap();
        assert_eq!(
            draw,
            DrawCall {
                slot: 0,
                vertex_count: 6,
                instance_count: 1
            }
        );
    }

    #[test]
    fn vertex_count_is_byte_length_over_eight() {
        for vertices in [1u64, 3, 6, 100] {
            let draw = DrawCall::plan(&pipeline(), &buffer(vertices * 8), FORMAT).unwrap();
            assert_eq!(draw.vertex_count as u64, vertices);
        }
    }

    #[test]
    fn format_mismatch_is_a_draw_error() {
        let err = DrawCall::plan(&pipeline(), &buffer(48), wgpu::TextureFormat::Rgba8Unorm)
            .unwrap_err();
        assert!(matches!(err, RenderError::DrawError(_)));
    }

    #[test]
    fn layout_mismatch_is_a_draw_error() {
        let mut b = buffer(48);
        b.layout = VertexLayout {
            array_stride: 16,
            ..CellVertex::layout()
        };
        let err = DrawCall::plan(&pipeline(), &b, FORMAT).unwrap_err();
        assert!(err.to_string().contains("stride 16"));
    }

    #[test]
    fn non_vertex_buffer_is_a_draw_error() {
        let mut b = buffer(48);
        b.usage = wgpu::BufferUsages::COPY_DST;
        assert!(matches!(
            DrawCall::plan(&pipeline(), &b, FORMAT),
            Err(RenderError::DrawError(_))
        ));
    }

    #[test]
    fn empty_buffer_is_a_draw_error() {
        assert!(DrawCall::plan(&pipeline(), &buffer(0), FORMAT).is_err());
    }
}
