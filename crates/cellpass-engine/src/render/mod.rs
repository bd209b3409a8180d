//! GPU rendering stages.
//!
//! Each stage owns its own GPU object and fails with its own error:
//! - `shader`: WGSL compilation and reflection
//! - `buffer`: vertex data upload
//! - `pipeline`: explicit layout derivation and pipeline creation
//! - `frame`: command recording, submission, presentation

mod buffer;
mod draw;
mod frame;
mod pipeline;
mod shader;

pub use buffer::{BufferBinding, VertexBuffer};
pub use draw::DrawCall;
pub use frame::{FrameRenderer, FrameReport, FrameState, FrameStateMachine};
pub use pipeline::{EntryPoints, PipelineBinding, PipelinePlan, RenderPipeline};
pub use shader::{
    EntryPointInfo, ShaderIo, ShaderProgram, ShaderReflection, ShaderStage, CELL_SHADER_SOURCE,
    FRAGMENT_ENTRY, VERTEX_ENTRY,
};
