use crate::device::DeviceContext;
use crate::error::{RenderError, Result};
use crate::geometry::ColorRgba;
use crate::surface::SurfaceTarget;

use super::buffer::VertexBuffer;
use super::draw::DrawCall;
use super::pipeline::RenderPipeline;

/// Recording state of a single frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameState {
    Idle,
    /// Command encoder open.
    Recording,
    /// Render pass open on the target.
    PassActive,
    /// Command buffer handed to the queue. Terminal.
    Submitted,
}

/// Enforces `Idle → Recording → PassActive → Submitted`.
#[derive(Debug, Clone)]
pub struct FrameStateMachine {
    state: FrameState,
}

impl FrameStateMachine {
    pub fn new() -> Self {
        Self {
            state: FrameState::Idle,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Moves to `next`, which must be the immediate successor.
    pub fn advance(&mut self, next: FrameState) -> Result<()> {
        let expected = match self.state {
            FrameState::Idle => FrameState::Recording,
            FrameState::Recording => FrameState::PassActive,
            FrameState::PassActive => FrameState::Submitted,
            FrameState::Submitted => {
                return Err(RenderError::DrawError(
                    "frame already submitted; start a new frame from Idle".into(),
                ));
            }
        };
        if next != expected {
            return Err(RenderError::DrawError(format!(
                "invalid frame transition {:?} -> {next:?}",
                self.state
            )));
        }
        log::trace!("frame: {:?} -> {next:?}", self.state);
        self.state = next;
        Ok(())
    }
}

impl Default for FrameStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// What one submitted frame contained.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub clear: ColorRgba,
    pub render_passes: u32,
    pub draws: Vec<DrawCall>,
    pub command_buffers: u32,
    pub target_size: (u32, u32),
    pub target_format: wgpu::TextureFormat,
    pub final_state: FrameState,
    pub submission: wgpu::SubmissionIndex,
}

/// Records and submits one frame: clear, bind, draw.
///
/// Holds no per-frame state; every `render` call starts from `Idle`.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    clear: ColorRgba,
}

impl FrameRenderer {
    /// Renderer clearing to fully transparent black.
    pub fn new() -> Self {
        Self::with_clear(ColorRgba::TRANSPARENT)
    }

    pub fn with_clear(clear: ColorRgba) -> Self {
        debug_assert!(clear.is_finite());
        Self { clear }
    }

    pub fn clear_color(&self) -> ColorRgba {
        self.clear
    }

    /// Renders `buffer` with `pipeline` into `target` and submits.
    ///
    /// `target` is consumed: it is presented on success and discarded on
    /// failure. A failure while the pass is open drops the pass and the encoder
    /// without submitting anything.
    pub fn render(
        &self,
        ctx: &DeviceContext,
        pipeline: &RenderPipeline,
        buffer: &VertexBuffer,
        target: SurfaceTarget,
    ) -> Result<FrameReport> {
        let mut state = FrameStateMachine::new();

        state.advance(FrameState::Recording)?;
        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cellpass frame encoder"),
            });

        // The pass borrows the encoder; it ends when this block closes.
        let draw = {
            state.advance(FrameState::PassActive)?;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cellpass cell pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let draw = DrawCall::plan(&pipeline.binding(), &buffer.binding(), target.format())?;

            rpass.set_pipeline(pipeline.raw());
            rpass.set_vertex_buffer(draw.slot, buffer.raw().slice(..));
            rpass.draw(0..draw.vertex_count, 0..draw.instance_count);
            draw
        };

        state.advance(FrameState::Submitted)?;
        let submission = ctx.queue().submit(std::iter::once(encoder.finish()));

        let target_size = target.size();
        let target_format = target.format();
        target.present();

        log::debug!(
            "frame submitted: {} vertices into {}x{} {target_format:?}",
            draw.vertex_count,
            target_size.0,
            target_size.1
        );

        Ok(FrameReport {
            clear: self.clear,
            render_passes: 1,
            draws: vec![draw],
            command_buffers: 1,
            target_size,
            target_format,
            final_state: state.state(),
            submission,
        })
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_advance_in_order() {
        let mut sm = FrameStateMachine::new();
        assert_eq!(sm.state(), FrameState::Idle);
        sm.advance(FrameState::Recording).unwrap();
        sm.advance(FrameState::PassActive).unwrap();
        sm.advance(FrameState::Submitted).unwrap();
        assert_eq!(sm.state(), FrameState::Submitted);
    }

    #[test]
    fn skipping_a_state_is_rejected() {
        let mut sm = FrameStateMachine::new();
        let err = sm.advance(FrameState::PassActive).unwrap_err();
        assert!(matches!(err, RenderError::DrawError(_)));
        assert_eq!(sm.state(), FrameState::Idle);
    }

    #[test]
    fn submitted_is_terminal() {
        let mut sm = FrameStateMachine::new();
        for s in [FrameState::Recording, FrameState::PassActive, FrameState::Submitted] {
            sm.advance(s).unwrap();
        }
        assert!(sm.advance(FrameState::Recording).is_err());
        assert!(sm.advance(FrameState::Idle).is_err());
    }

    #[test]
    fn default_clear_is_transparent_black() {
        assert_eq!(FrameRenderer::new().clear_color(), ColorRgba::TRANSPARENT);
    }
}
