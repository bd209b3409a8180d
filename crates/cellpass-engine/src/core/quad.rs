use crate::device::{DeviceContext, GpuInit};
use crate::error::Result;
use crate::geometry::{cell_quad_bytes, CellVertex};
use crate::render::{FrameRenderer, FrameReport, RenderPipeline, ShaderProgram, VertexBuffer};
use crate::surface::HostSurface;

/// Everything needed to draw the cell quad on one surface.
///
/// Built once per surface; owns its device, so two `CellQuad`s never share
/// GPU state.
pub struct CellQuad {
    device: DeviceContext,
    buffer: VertexBuffer,
    shader: ShaderProgram,
    pipeline: RenderPipeline,
    renderer: FrameRenderer,
}

impl CellQuad {
    /// Runs the setup stages in order: device, buffer, shader, pipeline.
    ///
    /// The first failing stage aborts the build; nothing is recorded or
    /// submitted.
    pub async fn build<S>(surface: &mut S, init: &GpuInit) -> Result<Self>
    where
        S: HostSurface + ?Sized,
    {
        let device = DeviceContext::acquire(surface, init).await?;

        let layout = CellVertex::layout();
        let buffer = VertexBuffer::create(&device, layout, cell_quad_bytes())?;
        let shader = ShaderProgram::cell(&device)?;
        let pipeline = RenderPipeline::create(&device, &shader, layout, device.surface_format())?;

        log::debug!("cell quad ready");

        Ok(Self {
            device,
            buffer,
            shader,
            pipeline,
            renderer: FrameRenderer::new(),
        })
    }

    /// Draws one frame into a fresh target from `surface`.
    pub fn render<S>(&self, surface: &mut S) -> Result<FrameReport>
    where
        S: HostSurface + ?Sized,
    {
        let target = surface.current_target()?;
        self.renderer
            .render(&self.device, &self.pipeline, &self.buffer, target)
    }

    pub fn device(&self) -> &DeviceContext {
        &self.device
    }

    pub fn buffer(&self) -> &VertexBuffer {
        &self.buffer
    }

    pub fn shader(&self) -> &ShaderProgram {
        &self.shader
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }
}

/// Builds the cell quad on `surface` and renders exactly one frame.
pub async fn render_once<S>(surface: &mut S, init: &GpuInit) -> Result<FrameReport>
where
    S: HostSurface + ?Sized,
{
    let quad = CellQuad::build(surface, init).await?;
    quad.render(surface)
}
