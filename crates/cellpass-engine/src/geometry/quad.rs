use super::CellVertex;

/// Half extent of the cell quad in clip space.
pub const CELL_HALF_EXTENT: f32 = 0.8;

/// Two counter-clockwise triangles covering `[-0.8, 0.8]` on both axes.
pub const CELL_QUAD: [CellVertex; 6] = quad(CELL_HALF_EXTENT);

/// Builds a centered, axis-aligned quad as a non-indexed triangle list.
pub const fn quad(half: f32) -> [CellVertex; 6] {
    [
        // triangle 1
        CellVertex::new(-half, -half),
        CellVertex::new(half, -half),
        CellVertex::new(half, half),
        // triangle 2
        CellVertex::new(-half, -half),
        CellVertex::new(half, half),
        CellVertex::new(-half, half),
    ]
}

/// Byte view of `CELL_QUAD`, ready for upload.
#[inline]
pub fn cell_quad_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&CELL_QUAD)
}

/// Axis-aligned bounds `(min, max)` of a vertex set, or `None` when empty.
pub fn bounds(vertices: &[CellVertex]) -> Option<([f32; 2], [f32; 2])> {
    let first = vertices.first()?;
    let mut min = first.pos;
    let mut max = first.pos;
    for v in &vertices[1..] {
        min[0] = min[0].min(v.pos[0]);
        min[1] = min[1].min(v.pos[1]);
        max[0] = max[0].max(v.pos[0]);
        max[1] = max[1].max(v.pos[1]);
    }
    Some((min, max))
}
