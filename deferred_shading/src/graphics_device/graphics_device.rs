/// GraphicsDevice trait - factory for GPU resources
///
/// Backends (OpenGL, Vulkan, ...) implement this trait. Command lists and
/// swapchains are owned by the application; the renderer only records into
/// them.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, BindingGroup, BindingGroupDesc, Framebuffer, FramebufferDesc,
    FramebufferStatus, Pipeline, PipelineDesc, RenderPass, RenderPassDesc, RenderTarget,
    Shader, ShaderDesc, Texture, TextureDesc, validate_framebuffer,
};

/// Resource factory of a graphics backend
pub trait GraphicsDevice: Send + Sync {
    /// Create a texture
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a buffer initialized with `data` (may be empty)
    fn create_buffer(&mut self, desc: BufferDesc, data: &[u8]) -> Result<Arc<dyn Buffer>>;

    /// Compile one shader stage
    ///
    /// Fails with `Error::ShaderCompilation` carrying the compiler log.
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>>;

    /// Link a pipeline
    ///
    /// Fails with `Error::ProgramLink` carrying the linker log.
    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Create an attachable view of `texture`
    fn create_render_target(&mut self, texture: &Arc<dyn Texture>) -> Result<Arc<dyn RenderTarget>>;

    /// Create a render pass
    fn create_render_pass(&mut self, desc: RenderPassDesc) -> Result<Arc<dyn RenderPass>>;

    /// Create a framebuffer (no completeness check, see `framebuffer_status`)
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>>;

    /// Completeness code for a framebuffer description
    ///
    /// The default runs the structural checks; backends extend it with
    /// hardware support queries.
    fn framebuffer_status(&self, desc: &FramebufferDesc) -> FramebufferStatus {
        validate_framebuffer(desc)
    }

    /// Create a binding group for `pipeline`
    fn create_binding_group(
        &mut self,
        pipeline: &Arc<dyn Pipeline>,
        desc: BindingGroupDesc,
    ) -> Result<Arc<dyn BindingGroup>>;
}
