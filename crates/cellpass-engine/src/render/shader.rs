//! Shader program compilation and reflection.
//!
//! WGSL is parsed and validated on the CPU with naga before anything reaches
//! the device, so compile errors come back as [`RenderError::ShaderCompileError`]
//! with rendered diagnostics instead of a device-lost callback.

use crate::device::DeviceContext;
use crate::error::{RenderError, Result};
use crate::geometry::ScalarKind;

/// Source of the cell shader.
pub const CELL_SHADER_SOURCE: &str = include_str!("shaders/cell.wgsl");

/// Vertex entry point of the cell shader.
pub const VERTEX_ENTRY: &str = "vertexMain";

/// Fragment entry point of the cell shader.
pub const FRAGMENT_ENTRY: &str = "fragmentMain";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
    Other,
}

/// A user-defined (`@location`) input or output of an entry point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderIo {
    pub location: u32,
    pub kind: ScalarKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointInfo {
    pub name: String,
    pub stage: ShaderStage,
    pub inputs: Vec<ShaderIo>,
    pub outputs: Vec<ShaderIo>,
}

/// What a compiled shader expects from the pipeline around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderReflection {
    pub entry_points: Vec<EntryPointInfo>,

    /// `(group, binding)` of every declared resource.
    pub resource_bindings: Vec<(u32, u32)>,
}

impl ShaderReflection {
    pub fn entry_point(&self, name: &str) -> Option<&EntryPointInfo> {
        self.entry_points.iter().find(|ep| ep.name == name)
    }
}

/// Compiled shader module plus its reflection.
pub struct ShaderProgram {
    label: String,
    module: wgpu::ShaderModule,
    reflection: ShaderReflection,
}

impl ShaderProgram {
    /// Compiles the built-in cell shader.
    pub fn cell(ctx: &DeviceContext) -> Result<Self> {
        Self::compile(ctx, "cellpass cell shader", CELL_SHADER_SOURCE)
    }

    /// Validates `source` and creates the GPU module.
    ///
    /// Entry points are not checked here; pipeline creation does that against
    /// its vertex layout.
    pub fn compile(ctx: &DeviceContext, label: &str, source: &str) -> Result<Self> {
        let reflection = Self::reflect(label, source)?;

        let module = ctx
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        log::debug!(
            "shader `{label}` compiled: {} entry point(s)",
            reflection.entry_points.len()
        );

        Ok(Self {
            label: label.to_owned(),
            module,
            reflection,
        })
    }

    /// Parses, validates, and reflects `source` without a device.
    pub fn reflect(label: &str, source: &str) -> Result<ShaderReflection> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| compile_error(label, e.emit_to_string(source)))?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .map_err(|e| compile_error(label, e.emit_to_string(source)))?;

        Ok(reflect_module(&module))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    pub fn reflection(&self) -> &ShaderReflection {
        &self.reflection
    }
}

fn compile_error(label: &str, diagnostics: String) -> RenderError {
    RenderError::ShaderCompileError {
        label: label.to_owned(),
        diagnostics,
    }
}

fn reflect_module(module: &naga::Module) -> ShaderReflection {
    let entry_points = module
        .entry_points
        .iter()
        .map(|ep| {
            let mut inputs = Vec::new();
            for arg in &ep.function.arguments {
                collect_io(module, arg.ty, arg.binding.as_ref(), &mut inputs);
            }

            let mut outputs = Vec::new();
            if let Some(result) = &ep.function.result {
                collect_io(module, result.ty, result.binding.as_ref(), &mut outputs);
            }

            EntryPointInfo {
                name: ep.name.clone(),
                stage: match ep.stage {
                    naga::ShaderStage::Vertex => ShaderStage::Vertex,
                    naga::ShaderStage::Fragment => ShaderStage::Fragment,
                    naga::ShaderStage::Compute => ShaderStage::Compute,
                    _ => ShaderStage::Other,
                },
                inputs,
                outputs,
            }
        })
        .collect();

    let resource_bindings = module
        .global_variables
        .iter()
        .filter_map(|(_, var)| var.binding.as_ref().map(|b| (b.group, b.binding)))
        .collect();

    ShaderReflection {
        entry_points,
        resource_bindings,
    }
}

/// Collects `@location` bindings, descending into struct members.
fn collect_io(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<ShaderIo>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(ShaderIo {
            location: *location,
            kind: scalar_kind(module, ty),
        }),
        Some(_) => {} // builtin
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_io(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn scalar_kind(module: &naga::Module, ty: naga::Handle<naga::Type>) -> ScalarKind {
    let scalar = match &module.types[ty].inner {
        naga::TypeInner::Scalar(scalar) => scalar,
        naga::TypeInner::Vector { scalar, .. } => scalar,
        _ => return ScalarKind::Other,
    };
    match scalar.kind {
        naga::ScalarKind::Float => ScalarKind::Float,
        naga::ScalarKind::Sint => ScalarKind::Sint,
        naga::ScalarKind::Uint => ScalarKind::Uint,
        _ => ScalarKind::Other,
    }
}
