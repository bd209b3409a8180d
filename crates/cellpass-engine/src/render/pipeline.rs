//! Render pipeline creation with an explicit layout.
//!
//! Instead of letting the driver infer a layout from the shader, the pipeline
//! layout is derived up front by [`PipelinePlan::derive`]: entry points are
//! resolved, vertex inputs are matched against the declared vertex layout, and
//! the bind group set is fixed (empty for the cell pipeline). Mismatches are
//! reported before any GPU object is created.

use crate::device::DeviceContext;
use crate::error::{RenderError, Result};
use crate::geometry::{format_scalar_kind, VertexLayout};

use super::shader::{ShaderProgram, ShaderReflection, ShaderStage, FRAGMENT_ENTRY, VERTEX_ENTRY};

/// Entry point names a pipeline binds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EntryPoints {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

impl EntryPoints {
    pub const CELL: Self = Self {
        vertex: VERTEX_ENTRY,
        fragment: FRAGMENT_ENTRY,
    };
}

impl Default for EntryPoints {
    fn default() -> Self {
        Self::CELL
    }
}

/// Explicit layout a render pipeline is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePlan {
    pub entry_points: EntryPoints,
    pub vertex_layout: VertexLayout,

    /// Number of bind groups in the pipeline layout.
    pub bind_group_count: u32,

    /// Number of color targets written by the fragment stage.
    pub color_target_count: u32,
}

impl PipelinePlan {
    /// Checks `reflection` against `vertex_layout` and a single color target.
    pub fn derive(
        reflection: &ShaderReflection,
        vertex_layout: &VertexLayout,
        entry_points: EntryPoints,
    ) -> Result<Self> {
        let vs = reflection
            .entry_point(entry_points.vertex)
            .ok_or_else(|| mismatch(format!("shader has no entry point `{}`", entry_points.vertex)))?;
        if vs.stage != ShaderStage::Vertex {
            return Err(mismatch(format!("`{}` is not a vertex entry point", vs.name)));
        }

        let fs = reflection.entry_point(entry_points.fragment).ok_or_else(|| {
            mismatch(format!("shader has no entry point `{}`", entry_points.fragment))
        })?;
        if fs.stage != ShaderStage::Fragment {
            return Err(mismatch(format!("`{}` is not a fragment entry point", fs.name)));
        }

        check_vertex_layout(
            vertex_layout,
            wgpu::Limits::default().max_vertex_buffer_array_stride,
        )?;

        for input in &vs.inputs {
            let attr = vertex_layout.attribute_at(input.location).ok_or_else(|| {
                mismatch(format!(
                    "vertex input @location({}) is not provided by the vertex layout",
                    input.location
                ))
            })?;
            let provided = format_scalar_kind(attr.format);
            if provided != input.kind {
                return Err(mismatch(format!(
                    "vertex input @location({}) expects {:?} data but the layout supplies {:?}",
                    input.location, input.kind, attr.format
                )));
            }
        }

        for input in &fs.inputs {
            if !vs.outputs.iter().any(|o| o.location == input.location) {
                return Err(mismatch(format!(
                    "fragment input @location({}) is not written by `{}`",
                    input.location, vs.name
                )));
            }
        }

        if fs.outputs.is_empty() {
            return Err(mismatch(format!("`{}` writes no color output", fs.name)));
        }
        if let Some(extra) = fs.outputs.iter().find(|o| o.location != 0) {
            return Err(mismatch(format!(
                "`{}` writes @location({}) but the pipeline has a single color target",
                fs.name, extra.location
            )));
        }

        if let Some((group, binding)) = reflection.resource_bindings.first() {
            return Err(mismatch(format!(
                "shader declares @group({group}) @binding({binding}) but the pipeline has no bind groups"
            )));
        }

        Ok(Self {
            entry_points,
            vertex_layout: *vertex_layout,
            bind_group_count: 0,
            color_target_count: 1,
        })
    }
}

/// Alignment wgpu requires of vertex strides and attribute offsets.
const VERTEX_ALIGNMENT: u64 = 4;

/// Checks that every attribute fits inside one stride and the stride itself is
/// aligned and within `max_stride`.
pub(crate) fn check_vertex_layout(layout: &VertexLayout, max_stride: u32) -> Result<()> {
    let stride = layout.array_stride;
    if stride == 0 {
        return Err(mismatch("vertex layout has a zero stride".into()));
    }
    if stride % VERTEX_ALIGNMENT != 0 {
        return Err(mismatch(format!(
            "vertex stride {stride} is not a multiple of {VERTEX_ALIGNMENT}"
        )));
    }
    if stride > u64::from(max_stride) {
        return Err(mismatch(format!(
            "vertex stride {stride} exceeds the device limit of {max_stride}"
        )));
    }

    for attr in layout.attributes {
        let size = attr.format.size();
        if attr.offset % size.min(VERTEX_ALIGNMENT) != 0 {
            return Err(mismatch(format!(
                "attribute @location({}) offset {} is misaligned for {:?}",
                attr.shader_location, attr.offset, attr.format
            )));
        }
        if attr.offset + size > stride {
            return Err(mismatch(format!(
                "attribute @location({}) ({:?} at offset {}) overruns the {stride}-byte stride",
                attr.shader_location, attr.format, attr.offset
            )));
        }
    }

    Ok(())
}

fn mismatch(msg: String) -> RenderError {
    RenderError::PipelineLayoutMismatch(msg)
}

/// Rejects formats that cannot be a color render target.
pub(crate) fn check_color_target(
    format: wgpu::TextureFormat,
    features: wgpu::TextureFormatFeatures,
) -> Result<()> {
    if format.is_depth_stencil_format()
        || !features
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
    {
        return Err(RenderError::UnsupportedFormat(format));
    }
    Ok(())
}

/// Plain description of a pipeline, used for draw validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PipelineBinding {
    pub format: wgpu::TextureFormat,
    pub layout: VertexLayout,
}

/// Immutable render pipeline: shader stages + vertex layout + color format.
///
/// Changing any input means building a new pipeline.
pub struct RenderPipeline {
    pipeline: wgpu::RenderPipeline,
    plan: PipelinePlan,
    format: wgpu::TextureFormat,
}

impl RenderPipeline {
    /// Builds the cell pipeline (`vertexMain` / `fragmentMain`).
    pub fn create(
        ctx: &DeviceContext,
        shader: &ShaderProgram,
        vertex_layout: VertexLayout,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        Self::create_with_entries(ctx, shader, vertex_layout, format, EntryPoints::CELL)
    }

    pub fn create_with_entries(
        ctx: &DeviceContext,
        shader: &ShaderProgram,
        vertex_layout: VertexLayout,
        format: wgpu::TextureFormat,
        entry_points: EntryPoints,
    ) -> Result<Self> {
        check_color_target(format, ctx.adapter().get_texture_format_features(format))?;
        check_vertex_layout(
            &vertex_layout,
            ctx.device().limits().max_vertex_buffer_array_stride,
        )?;
        let plan = PipelinePlan::derive(shader.reflection(), &vertex_layout, entry_points)?;

        let device = ctx.device();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cellpass cell pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let vertex_buffers = [plan.vertex_layout.to_wgpu()];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cellpass cell pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: shader.module(),
                entry_point: Some(plan.entry_points.vertex),
                compilation_options: Default::default(),
                buffers: &vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: shader.module(),
                entry_point: Some(plan.entry_points.fragment),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("pipeline `{}` created for {format:?}", shader.label());

        Ok(Self {
            pipeline,
            plan,
            format,
        })
    }

    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn plan(&self) -> &PipelinePlan {
        &self.plan
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn binding(&self) -> PipelineBinding {
        PipelineBinding {
            format: self.format,
            layout: self.plan.vertex_layout,
        }
    }
}
