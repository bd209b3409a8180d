//! Entry point wiring the stages together.
//!
//! Hosts call [`render_once`] with their surface, or keep a [`CellQuad`] around
//! when the GPU objects should outlive the first frame.

mod quad;

pub use quad::{render_once, CellQuad};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::GpuInit;
    use crate::error::RenderError;
    use crate::geometry::{bounds, ColorRgba, CellVertex, CELL_QUAD};
    use crate::render::{
        DrawCall, FrameRenderer, FrameState, RenderPipeline, ShaderProgram, CELL_SHADER_SOURCE,
    };
    use crate::surface::{HostSurface, OffscreenSurface};

    /// Builds on an offscreen surface, or `None` when this machine has no GPU.
    fn offscreen_quad(width: u32, height: u32) -> Option<(CellQuad, OffscreenSurface)> {
        let mut surface = OffscreenSurface::new(width, height);
        match pollster::block_on(CellQuad::build(&mut surface, &GpuInit::default())) {
            Ok(quad) => Some((quad, surface)),
            Err(e) if e.no_usable_gpu() => {
                eprintln!("skipping GPU test: {e}");
                None
            }
            Err(e) => panic!("cell quad setup failed: {e}"),
        }
    }

    #[test]
    fn one_frame_on_a_512_surface() {
        let Some((quad, mut surface)) = offscreen_quad(512, 512) else {
            return;
        };

        let report = quad.render(&mut surface).unwrap();

        assert_eq!(report.command_buffers, 1);
        assert_eq!(report.render_passes, 1);
        assert_eq!(
            report.draws,
            vec![DrawCall {
                slot: 0,
                vertex_count: 6,
                instance_count: 1
            }]
        );
        assert_eq!(report.clear, ColorRgba::TRANSPARENT);
        assert_eq!(report.target_size, (512, 512));
        assert_eq!(report.target_format, quad.device().surface_format());
        assert_eq!(report.final_state, FrameState::Submitted);
        assert_eq!(surface.frames_acquired(), 1);

        // The quad covers [-0.8, 0.8] and is filled opaque red.
        let (min, max) = bounds(&CELL_QUAD).unwrap();
        assert_eq!((min, max), ([-0.8, -0.8], [0.8, 0.8]));
        assert!(CELL_SHADER_SOURCE.contains("vec4f(1.0, 0.0, 0.0, 1.0)"));
    }

    #[test]
    fn render_once_acquires_exactly_one_target() {
        let mut surface = OffscreenSurface::new(512, 512);
        match pollster::block_on(render_once(&mut surface, &GpuInit::default())) {
            Ok(report) => {
                assert_eq!(report.draws[0].vertex_count, 6);
                assert_eq!(surface.frames_acquired(), 1);
            }
            Err(e) if e.no_usable_gpu() => eprintln!("skipping GPU test: {e}"),
            Err(e) => panic!("render_once failed: {e}"),
        }
    }

    #[test]
    fn unsupported_platform_fails_before_any_stage() {
        let mut surface = OffscreenSurface::new(512, 512);
        let init = GpuInit {
            backends: wgpu::Backends::empty(),
            ..GpuInit::default()
        };

        let err = pollster::block_on(render_once(&mut surface, &init))
            .err()
            .unwrap();

        assert!(matches!(err, RenderError::UnsupportedPlatform { .. }));
        assert!(surface.texture().is_none());
        assert_eq!(surface.frames_acquired(), 0);
    }

    #[test]
    fn independent_surfaces_get_independent_resources() {
        let Some((first, mut first_surface)) = offscreen_quad(512, 512) else {
            return;
        };
        let Some((second, mut second_surface)) = offscreen_quad(256, 256) else {
            return;
        };

        assert_eq!(first.render(&mut first_surface).unwrap().target_size, (512, 512));
        assert_eq!(second.render(&mut second_surface).unwrap().target_size, (256, 256));

        // Tearing down one set leaves the other usable.
        drop(first);
        let again = second.render(&mut second_surface).unwrap();
        assert_eq!(again.draws[0].vertex_count, 6);
        assert_eq!(first_surface.frames_acquired(), 1);
        assert_eq!(second_surface.frames_acquired(), 2);
    }

    #[test]
    fn shader_without_vertex_entry_never_builds_a_pipeline() {
        let Some((quad, _surface)) = offscreen_quad(64, 64) else {
            return;
        };
        let src = r#"
            @fragment
            fn fragmentMain() -> @location(0) vec4f {
                return vec4f(1.0, 0.0, 0.0, 1.0);
            }
        "#;

        let shader = ShaderProgram::compile(quad.device(), "fragment only", src).unwrap();
        let result = RenderPipeline::create(
            quad.device(),
            &shader,
            CellVertex::layout(),
            quad.device().surface_format(),
        );

        assert!(matches!(
            result,
            Err(RenderError::PipelineLayoutMismatch(_) | RenderError::ShaderCompileError { .. })
        ));
    }

    #[test]
    fn depth_format_pipeline_is_unsupported() {
        let Some((quad, _surface)) = offscreen_quad(64, 64) else {
            return;
        };
        let result = RenderPipeline::create(
            quad.device(),
            quad.shader(),
            CellVertex::layout(),
            wgpu::TextureFormat::Depth32Float,
        );
        assert!(matches!(result, Err(RenderError::UnsupportedFormat(_))));
    }

    #[test]
    fn draw_error_discards_the_frame() {
        let Some((quad, mut surface)) = offscreen_quad(64, 64) else {
            return;
        };

        // Pipeline for a format the surface target does not have.
        let other_format = match quad.device().surface_format() {
            wgpu::TextureFormat::Bgra8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            _ => wgpu::TextureFormat::Bgra8Unorm,
        };
        let pipeline = RenderPipeline::create(
            quad.device(),
            quad.shader(),
            CellVertex::layout(),
            other_format,
        )
        .unwrap();

        let target = surface.current_target().unwrap();
        let err = FrameRenderer::new()
            .render(quad.device(), &pipeline, quad.buffer(), target)
            .unwrap_err();
        assert!(matches!(err, RenderError::DrawError(_)));

        // The device is still healthy afterwards.
        assert!(quad.render(&mut surface).is_ok());
    }
}
