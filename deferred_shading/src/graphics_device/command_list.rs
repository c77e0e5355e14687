/// Command list trait - records GPU commands for one frame
///
/// Every call returns a `Result`: device-level failures are reported at the
/// call that caused them instead of being discovered at submit time.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    RenderPass, Framebuffer, Pipeline, Buffer, BindingGroup, IndexType, UniformValue,
};

/// Command list for recording rendering commands
pub trait CommandList: Send + Sync {
    /// Begin recording
    fn begin(&mut self) -> Result<()>;

    /// Finish recording
    fn end(&mut self) -> Result<()>;

    /// Begin a render pass on `framebuffer`
    ///
    /// `clear_values` holds one entry per attachment whose load op is `Clear`,
    /// in attachment order (color attachments first, then depth/stencil).
    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        clear_values: &[ClearValue],
    ) -> Result<()>;

    /// End the current render pass
    fn end_render_pass(&mut self) -> Result<()>;

    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Set the scissor rectangle
    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    /// Bind a pipeline; its fixed-function state fully replaces the previous one
    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()>;

    /// Release the bound pipeline
    fn unbind_pipeline(&mut self) -> Result<()>;

    /// Set a named uniform of the bound pipeline
    ///
    /// Fails when no pipeline is bound.
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<()>;

    /// Bind a group of shader resources at `set_index`
    fn bind_binding_group(
        &mut self,
        pipeline: &Arc<dyn Pipeline>,
        set_index: u32,
        binding_group: &Arc<dyn BindingGroup>,
    ) -> Result<()>;

    /// Bind a vertex buffer
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    /// Bind an index buffer
    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64, index_type: IndexType) -> Result<()>;

    /// Draw non-indexed vertices
    fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()>;

    /// Draw indexed vertices
    fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()>;
}

/// Viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Full-surface viewport with depth range [0, 1]
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// Scissor rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    /// Rectangle covering `width` x `height` from the origin
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Clear value for an attachment whose load op is `Clear`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    Color([f32; 4]),
    DepthStencil { depth: f32, stencil: u32 },
}
