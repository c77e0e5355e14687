/// Program - a linked vertex/fragment pair with its pass state
///
/// Linking creates a pipeline that bakes the fixed-function state of the
/// pass the program is used in. Shaders are shared through `Arc`, so a stage
/// used by several programs is compiled once and released with its last
/// owner.
///
/// Uniforms can only be set through an `ActiveProgram`, the guard returned
/// by `Program::activate`. The guard unbinds the pipeline when it is
/// stopped or dropped.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    BindingGroup, CommandList, FixedFunctionState, GraphicsDevice, Pipeline, PipelineDesc,
    PrimitiveTopology, RenderPass, Shader, UniformValue, VertexLayout,
};

/// A linked program
pub struct Program {
    name: String,
    vertex_shader: Arc<dyn Shader>,
    fragment_shader: Arc<dyn Shader>,
    pipeline: Arc<dyn Pipeline>,
}

impl Program {
    /// Link the two stages with `fixed_function` for `render_pass`
    ///
    /// # Errors
    ///
    /// `Error::ProgramLink` when the device rejects the pair.
    pub fn link(
        device: &mut dyn GraphicsDevice,
        name: &str,
        vertex_shader: Arc<dyn Shader>,
        fragment_shader: Arc<dyn Shader>,
        vertex_layout: VertexLayout,
        fixed_function: FixedFunctionState,
        render_pass: &Arc<dyn RenderPass>,
    ) -> Result<Self> {
        let pipeline = device.create_pipeline(PipelineDesc {
            label: name,
            vertex_shader: vertex_shader.clone(),
            fragment_shader: fragment_shader.clone(),
            vertex_layout,
            topology: PrimitiveTopology::TriangleList,
            fixed_function,
            render_pass,
        })?;

        crate::engine_debug!("deferred::Program",
            "linked '{}' ({} + {})", name, vertex_shader.label(), fragment_shader.label());

        Ok(Self {
            name: name.to_string(),
            vertex_shader,
            fragment_shader,
            pipeline,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_shader(&self) -> &Arc<dyn Shader> {
        &self.vertex_shader
    }

    pub fn fragment_shader(&self) -> &Arc<dyn Shader> {
        &self.fragment_shader
    }

    pub fn pipeline(&self) -> &Arc<dyn Pipeline> {
        &self.pipeline
    }

    /// Fixed-function state baked at link time
    pub fn fixed_function(&self) -> &FixedFunctionState {
        self.pipeline.fixed_function()
    }

    /// Make this program current on `cmd`
    pub fn activate<'a>(&'a self, cmd: &'a mut dyn CommandList) -> Result<ActiveProgram<'a>> {
        cmd.bind_pipeline(&self.pipeline)?;
        Ok(ActiveProgram { program: self, cmd, in_use: true })
    }
}

/// A program bound on a command list
pub struct ActiveProgram<'a> {
    program: &'a Program,
    cmd: &'a mut dyn CommandList,
    in_use: bool,
}

impl<'a> ActiveProgram<'a> {
    pub fn program(&self) -> &Program {
        self.program
    }

    /// Set a named uniform
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) -> Result<()> {
        self.cmd.set_uniform(name, value.into())
    }

    /// Set every field of a uniform struct under `name`
    pub fn set_struct<S: UniformStruct + ?Sized>(&mut self, name: &str, value: &S) -> Result<()> {
        value.write_uniforms(name, self)
    }

    /// Bind a resource group against this program's pipeline
    pub fn bind_binding_group(&mut self, set_index: u32, group: &Arc<dyn BindingGroup>) -> Result<()> {
        self.cmd.bind_binding_group(&self.program.pipeline, set_index, group)
    }

    /// Command list the program is bound on (for draws)
    pub fn command_list(&mut self) -> &mut dyn CommandList {
        &mut *self.cmd
    }

    /// Unbind the program
    pub fn stop_using(mut self) -> Result<()> {
        self.in_use = false;
        self.cmd.unbind_pipeline()
    }
}

impl Drop for ActiveProgram<'_> {
    fn drop(&mut self) {
        if self.in_use {
            if let Err(e) = self.cmd.unbind_pipeline() {
                crate::engine_warn!("deferred::Program",
                    "failed to unbind '{}' on drop: {}", self.program.name, e);
            }
        }
    }
}

/// A value written as several uniforms sharing a name prefix
pub trait UniformStruct {
    /// Write every field as `<name>.<field>`
    fn write_uniforms(&self, name: &str, program: &mut ActiveProgram<'_>) -> Result<()>;
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
