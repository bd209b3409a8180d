use bytemuck::{Pod, Zeroable};

/// A single cell vertex: a 2D position in clip space.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CellVertex {
    pub pos: [f32; 2],
}

impl CellVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { pos: [x, y] }
    }

    /// Layout of a tightly packed `CellVertex` stream bound at slot 0.
    pub fn layout() -> VertexLayout {
        VertexLayout {
            slot: 0,
            array_stride: std::mem::size_of::<CellVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Explicit description of one vertex buffer binding.
///
/// The same value is handed to buffer creation and pipeline creation; the
/// frame renderer refuses to draw when the two disagree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    /// Vertex buffer slot the stream is bound to.
    pub slot: u32,
    /// Bytes between consecutive vertices.
    pub array_stride: u64,
    pub step_mode: wgpu::VertexStepMode,
    pub attributes: &'static [wgpu::VertexAttribute],
}

impl VertexLayout {
    /// Number of whole vertices held by `byte_len` bytes.
    #[inline]
    pub fn vertex_count(&self, byte_len: u64) -> u32 {
        if self.array_stride == 0 {
            return 0;
        }
        (byte_len / self.array_stride) as u32
    }

    /// Returns the attribute read by the given shader location, if any.
    pub fn attribute_at(&self, location: u32) -> Option<&wgpu::VertexAttribute> {
        self.attributes.iter().find(|a| a.shader_location == location)
    }

    pub fn to_wgpu(&self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: self.step_mode,
            attributes: self.attributes,
        }
    }
}

/// Scalar base type seen by the shader for a vertex input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    Float,
    Sint,
    Uint,
    Other,
}

/// Scalar kind a vertex format delivers to the shader.
///
/// Normalized integer formats arrive as floats.
pub fn format_scalar_kind(format: wgpu::VertexFormat) -> ScalarKind {
    use wgpu::VertexFormat as F;
    match format {
        F::Uint8x2
        | F::Uint8x4
        | F::Uint16x2
        | F::Uint16x4
        | F::Uint32
        | F::Uint32x2
        | F::Uint32x3
        | F::Uint32x4 => ScalarKind::Uint,
        F::Sint8x2
        | F::Sint8x4
        | F::Sint16x2
        | F::Sint16x4
        | F::Sint32
        | F::Sint32x2
        | F::Sint32x3
        | F::Sint32x4 => ScalarKind::Sint,
        _ => ScalarKind::Float,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_layout_is_one_float2_at_offset_zero() {
        let layout = CellVertex::layout();
        assert_eq!(layout.slot, 0);
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 1);

        let attr = layout.attributes[0];
        assert_eq!(attr.offset, 0);
        assert_eq!(attr.shader_location, 0);
        assert_eq!(attr.format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn vertex_count_divides_by_stride() {
        let layout = CellVertex::layout();
        assert_eq!(layout.vertex_count(48), 6);
        assert_eq!(layout.vertex_count(8), 1);
        assert_eq!(layout.vertex_count(0), 0);
    }

    #[test]
    fn attribute_lookup_by_location() {
        let layout = CellVertex::layout();
        assert!(layout.attribute_at(0).is_some());
        assert!(layout.attribute_at(1).is_none());
    }

    #[test]
    fn scalar_kinds() {
        assert_eq!(format_scalar_kind(wgpu::VertexFormat::Float32x2), ScalarKind::Float);
        assert_eq!(format_scalar_kind(wgpu::VertexFormat::Unorm8x4), ScalarKind::Float);
        assert_eq!(format_scalar_kind(wgpu::VertexFormat::Uint32), ScalarKind::Uint);
        assert_eq!(format_scalar_kind(wgpu::VertexFormat::Sint16x2), ScalarKind::Sint);
    }
}
