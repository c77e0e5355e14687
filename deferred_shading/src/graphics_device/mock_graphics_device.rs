/// Mock graphics device for unit tests (no GPU required)
///
/// Every command recorded on a `MockCommandList` is kept as a `MockCommand`,
/// draws carrying a snapshot of the bound pipeline's fixed-function state.
/// Failure injection covers shader compilation, program linking and
/// framebuffer completeness. Live textures are counted so that tests can
/// check that a failed initialization released what it allocated.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::engine_bail;
use crate::graphics_device::{
    BindingGroup, BindingGroupDesc, Buffer, BufferDesc, ClearValue, CommandList,
    FixedFunctionState, Framebuffer, FramebufferDesc, FramebufferStatus, GraphicsDevice,
    IndexType, LoadOp, Pipeline, PipelineDesc, Rect2D, RenderPass, RenderPassDesc,
    RenderTarget, Shader, ShaderDesc, ShaderStage, Swapchain, Texture, TextureDesc,
    TextureFormat, TextureInfo, TextureUsage, UniformValue, Viewport, validate_framebuffer,
};

// ============================================================================
// Mock Texture
// ============================================================================

pub struct MockTexture {
    pub info: TextureInfo,
    live: Arc<AtomicUsize>,
}

impl MockTexture {
    pub fn new(desc: &TextureDesc, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self { info: TextureInfo::from(desc), live }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

impl Drop for MockTexture {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Mock Buffer
// ============================================================================

pub struct MockBuffer {
    pub label: String,
    pub size: u64,
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            engine_bail!("deferred::mock",
                "update of buffer '{}' out of range ({} + {} > {})",
                self.label, offset, data.len(), self.size);
        }
        Ok(())
    }
}

// ============================================================================
// Mock Shader / Pipeline
// ============================================================================

pub struct MockShader {
    pub label: String,
    pub stage: ShaderStage,
}

impl Shader for MockShader {
    fn label(&self) -> &str {
        &self.label
    }

    fn stage(&self) -> ShaderStage {
        self.stage
    }
}

pub struct MockPipeline {
    pub label: String,
    pub vertex_shader: Arc<dyn Shader>,
    pub fragment_shader: Arc<dyn Shader>,
    pub fixed_function: FixedFunctionState,
    pub render_pass: String,
}

impl Pipeline for MockPipeline {
    fn label(&self) -> &str {
        &self.label
    }

    fn fixed_function(&self) -> &FixedFunctionState {
        &self.fixed_function
    }
}

// ============================================================================
// Mock Render Target / Render Pass / Framebuffer / Binding Group
// ============================================================================

pub struct MockRenderTarget {
    texture: Arc<dyn Texture>,
}

impl RenderTarget for MockRenderTarget {
    fn width(&self) -> u32 {
        self.texture.info().width
    }

    fn height(&self) -> u32 {
        self.texture.info().height
    }

    fn format(&self) -> TextureFormat {
        self.texture.info().format
    }

    fn texture(&self) -> &Arc<dyn Texture> {
        &self.texture
    }
}

pub struct MockRenderPass {
    pub desc: RenderPassDesc,
}

impl RenderPass for MockRenderPass {
    fn desc(&self) -> &RenderPassDesc {
        &self.desc
    }
}

pub struct MockFramebuffer {
    pub label: String,
    pub width: u32,
    pub height: u32,
}

impl Framebuffer for MockFramebuffer {
    fn label(&self) -> &str {
        &self.label
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

pub struct MockBindingGroup {
    pub label: String,
    pub set_index: u32,
    pub textures: Vec<String>,
}

impl BindingGroup for MockBindingGroup {
    fn label(&self) -> &str {
        &self.label
    }

    fn set_index(&self) -> u32 {
        self.set_index
    }

    fn len(&self) -> usize {
        self.textures.len()
    }
}

// ============================================================================
// Mock Command List
// ============================================================================

/// One recorded command
#[derive(Debug, Clone, PartialEq)]
pub enum MockCommand {
    Begin,
    End,
    BeginRenderPass {
        render_pass: String,
        framebuffer: String,
        color_load_ops: Vec<LoadOp>,
        depth_load_op: Option<LoadOp>,
        stencil_load_op: Option<LoadOp>,
        clear_values: Vec<ClearValue>,
    },
    EndRenderPass,
    SetViewport(Viewport),
    SetScissor(Rect2D),
    BindPipeline(String),
    UnbindPipeline,
    SetUniform { name: String, value: UniformValue },
    BindBindingGroup { set_index: u32, group: String },
    BindVertexBuffer(String),
    BindIndexBuffer(String, IndexType),
    Draw {
        pipeline: String,
        render_pass: String,
        color_attachments: usize,
        state: FixedFunctionState,
        count: u32,
        indexed: bool,
    },
}

pub struct MockCommandList {
    pub commands: Vec<MockCommand>,
    render_pass: Option<Arc<dyn RenderPass>>,
    pipeline: Option<Arc<dyn Pipeline>>,
    /// Name of a command that fails once it is issued (device error injection)
    pub fail_on: Option<&'static str>,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            render_pass: None,
            pipeline: None,
            fail_on: None,
        }
    }

    /// Recorded draws, in order
    pub fn draws(&self) -> Vec<&MockCommand> {
        self.commands.iter()
            .filter(|c| matches!(c, MockCommand::Draw { .. }))
            .collect()
    }

    /// Labels of the render passes begun, in order
    pub fn render_passes(&self) -> Vec<&str> {
        self.commands.iter()
            .filter_map(|c| match c {
                MockCommand::BeginRenderPass { render_pass, .. } => Some(render_pass.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every value set for uniform `name`, in order
    pub fn uniform_values(&self, name: &str) -> Vec<UniformValue> {
        self.commands.iter()
            .filter_map(|c| match c {
                MockCommand::SetUniform { name: n, value } if n == name => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn is_in_render_pass(&self) -> bool {
        self.render_pass.is_some()
    }

    pub fn has_bound_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }

    fn check_injected(&self, command: &'static str) -> Result<()> {
        if self.fail_on == Some(command) {
            return Err(Error::BackendError(format!("injected failure on {}", command)));
        }
        Ok(())
    }

    fn record_draw(&mut self, count: u32, indexed: bool) -> Result<()> {
        let Some(render_pass) = &self.render_pass else {
            engine_bail!("deferred::mock", "draw recorded outside a render pass");
        };
        let Some(pipeline) = &self.pipeline else {
            engine_bail!("deferred::mock", "draw recorded without a bound pipeline");
        };
        let command = MockCommand::Draw {
            pipeline: pipeline.label().to_string(),
            render_pass: render_pass.desc().label.clone(),
            color_attachments: render_pass.desc().color_attachments.len(),
            state: *pipeline.fixed_function(),
            count,
            indexed,
        };
        self.commands.push(command);
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        self.commands.push(MockCommand::Begin);
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        if self.render_pass.is_some() {
            engine_bail!("deferred::mock", "end() called inside a render pass");
        }
        self.commands.push(MockCommand::End);
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.check_injected("begin_render_pass")?;
        if let Some(active) = &self.render_pass {
            engine_bail!("deferred::mock",
                "begin_render_pass '{}' while '{}' is active",
                render_pass.desc().label, active.desc().label);
        }
        let desc = render_pass.desc();
        if clear_values.len() != desc.clear_count() {
            engine_bail!("deferred::mock",
                "render pass '{}' expects {} clear values, got {}",
                desc.label, desc.clear_count(), clear_values.len());
        }
        self.commands.push(MockCommand::BeginRenderPass {
            render_pass: desc.label.clone(),
            framebuffer: framebuffer.label().to_string(),
            color_load_ops: desc.color_attachments.iter().map(|a| a.load_op).collect(),
            depth_load_op: desc.depth_stencil_attachment.map(|a| a.load_op),
            stencil_load_op: desc.depth_stencil_attachment.map(|a| a.stencil_load_op),
            clear_values: clear_values.to_vec(),
        });
        self.render_pass = Some(render_pass.clone());
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        if self.render_pass.take().is_none() {
            engine_bail!("deferred::mock", "end_render_pass without an active render pass");
        }
        self.commands.push(MockCommand::EndRenderPass);
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.commands.push(MockCommand::SetViewport(viewport));
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.commands.push(MockCommand::SetScissor(scissor));
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        self.check_injected("bind_pipeline")?;
        self.commands.push(MockCommand::BindPipeline(pipeline.label().to_string()));
        self.pipeline = Some(pipeline.clone());
        Ok(())
    }

    fn unbind_pipeline(&mut self) -> Result<()> {
        self.commands.push(MockCommand::UnbindPipeline);
        self.pipeline = None;
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<()> {
        if self.pipeline.is_none() {
            engine_bail!("deferred::mock", "set_uniform('{}') without a bound pipeline", name);
        }
        self.commands.push(MockCommand::SetUniform { name: name.to_string(), value });
        Ok(())
    }

    fn bind_binding_group(
        &mut self,
        _pipeline: &Arc<dyn Pipeline>,
        set_index: u32,
        binding_group: &Arc<dyn BindingGroup>,
    ) -> Result<()> {
        self.commands.push(MockCommand::BindBindingGroup {
            set_index,
            group: binding_group.label().to_string(),
        });
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, _offset: u64) -> Result<()> {
        self.commands.push(MockCommand::BindVertexBuffer(format!("{} bytes", buffer.size())));
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: &Arc<dyn Buffer>, _offset: u64, index_type: IndexType) -> Result<()> {
        self.commands.push(MockCommand::BindIndexBuffer(format!("{} bytes", buffer.size()), index_type));
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32, _first_vertex: u32) -> Result<()> {
        self.check_injected("draw")?;
        self.record_draw(vertex_count, false)
    }

    fn draw_indexed(&mut self, index_count: u32, _first_index: u32, _vertex_offset: i32) -> Result<()> {
        self.check_injected("draw")?;
        self.record_draw(index_count, true)
    }
}

// ============================================================================
// Mock Swapchain
// ============================================================================

/// One recorded present blit
#[derive(Debug, Clone, PartialEq)]
pub struct MockBlit {
    pub source: String,
    pub image_index: u32,
    pub width: u32,
    pub height: u32,
}

pub struct MockSwapchain {
    pub width: u32,
    pub height: u32,
    pub image_count: usize,
    next_image: u32,
    blits: Mutex<Vec<MockBlit>>,
}

impl MockSwapchain {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            image_count: 2,
            next_image: 0,
            blits: Mutex::new(Vec::new()),
        }
    }

    pub fn blits(&self) -> Vec<MockBlit> {
        self.blits.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl Swapchain for MockSwapchain {
    fn acquire_next_image(&mut self) -> Result<u32> {
        let index = self.next_image;
        self.next_image = (self.next_image + 1) % self.image_count as u32;
        Ok(index)
    }

    fn record_present_blit(
        &self,
        _cmd: &mut dyn CommandList,
        src: &dyn Texture,
        image_index: u32,
    ) -> Result<()> {
        let info = src.info();
        if info.width != self.width || info.height != self.height {
            engine_bail!("deferred::mock",
                "present blit size mismatch: source {}x{}, swapchain {}x{}",
                info.width, info.height, self.width, self.height);
        }
        if !info.usage.contains(TextureUsage::TRANSFER_SRC) {
            engine_bail!("deferred::mock", "present blit source '{}' lacks TRANSFER_SRC", info.label);
        }
        let mut blits = self.blits.lock()
            .map_err(|_| Error::BackendError("blit log poisoned".to_string()))?;
        blits.push(MockBlit {
            source: info.label.clone(),
            image_index,
            width: info.width,
            height: info.height,
        });
        Ok(())
    }

    fn present(&mut self, image_index: u32) -> Result<()> {
        if image_index as usize >= self.image_count {
            engine_bail!("deferred::mock", "present of unknown image {}", image_index);
        }
        Ok(())
    }

    fn image_count(&self) -> usize {
        self.image_count
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> TextureFormat {
        TextureFormat::B8G8R8A8_SRGB
    }
}

// ============================================================================
// Mock Graphics Device
// ============================================================================

pub struct MockGraphicsDevice {
    /// Labels of every created resource, in creation order
    pub created: Vec<String>,
    /// Shader label whose compilation fails
    pub fail_shader: Option<String>,
    /// Pipeline label whose link fails
    pub fail_link: Option<String>,
    /// Framebuffer label forced to report the given status
    pub forced_status: Option<(String, FramebufferStatus)>,
    /// Texture label whose creation fails with OutOfMemory
    pub fail_texture: Option<String>,
    live_textures: Arc<AtomicUsize>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            created: Vec::new(),
            fail_shader: None,
            fail_link: None,
            forced_status: None,
            fail_texture: None,
            live_textures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Textures created by this device and not yet dropped
    pub fn live_textures(&self) -> usize {
        self.live_textures.load(Ordering::SeqCst)
    }

    /// How many times a resource with this label was created
    pub fn created_count(&self, label: &str) -> usize {
        self.created.iter().filter(|l| l.as_str() == label).count()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        if self.fail_texture.as_deref() == Some(desc.label.as_str()) {
            return Err(Error::OutOfMemory);
        }
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("deferred::mock", "texture '{}' has zero size", desc.label);
        }
        self.created.push(desc.label.clone());
        Ok(Arc::new(MockTexture::new(&desc, self.live_textures.clone())))
    }

    fn create_buffer(&mut self, desc: BufferDesc, data: &[u8]) -> Result<Arc<dyn Buffer>> {
        if data.len() as u64 > desc.size {
            engine_bail!("deferred::mock", "buffer '{}' initial data exceeds size", desc.label);
        }
        self.created.push(desc.label.clone());
        Ok(Arc::new(MockBuffer { label: desc.label, size: desc.size }))
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
        if self.fail_shader.as_deref() == Some(desc.label) {
            return Err(Error::ShaderCompilation {
                shader: desc.label.to_string(),
                stage: desc.stage,
                log: "0:1(1): error: syntax error, unexpected end of file".to_string(),
            });
        }
        if desc.source.trim().is_empty() {
            return Err(Error::ShaderCompilation {
                shader: desc.label.to_string(),
                stage: desc.stage,
                log: "empty source".to_string(),
            });
        }
        self.created.push(desc.label.to_string());
        Ok(Arc::new(MockShader { label: desc.label.to_string(), stage: desc.stage }))
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        if self.fail_link.as_deref() == Some(desc.label) {
            return Err(Error::ProgramLink {
                program: desc.label.to_string(),
                log: "error: vertex output not read by fragment shader".to_string(),
            });
        }
        if desc.vertex_shader.stage() != ShaderStage::Vertex
            || desc.fragment_shader.stage() != ShaderStage::Fragment
        {
            return Err(Error::ProgramLink {
                program: desc.label.to_string(),
                log: "shader stages do not match their slots".to_string(),
            });
        }
        self.created.push(desc.label.to_string());
        Ok(Arc::new(MockPipeline {
            label: desc.label.to_string(),
            vertex_shader: desc.vertex_shader,
            fragment_shader: desc.fragment_shader,
            fixed_function: desc.fixed_function,
            render_pass: desc.render_pass.desc().label.clone(),
        }))
    }

    fn create_render_target(&mut self, texture: &Arc<dyn Texture>) -> Result<Arc<dyn RenderTarget>> {
        let usage = texture.info().usage;
        if !usage.intersects(TextureUsage::RENDER_TARGET | TextureUsage::DEPTH_STENCIL) {
            engine_bail!("deferred::mock",
                "create_render_target: incompatible texture usage {:?}", usage);
        }
        Ok(Arc::new(MockRenderTarget { texture: texture.clone() }))
    }

    fn create_render_pass(&mut self, desc: RenderPassDesc) -> Result<Arc<dyn RenderPass>> {
        self.created.push(desc.label.clone());
        Ok(Arc::new(MockRenderPass { desc }))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>> {
        self.created.push(desc.label.to_string());
        Ok(Arc::new(MockFramebuffer {
            label: desc.label.to_string(),
            width: desc.width,
            height: desc.height,
        }))
    }

    fn framebuffer_status(&self, desc: &FramebufferDesc) -> FramebufferStatus {
        match &self.forced_status {
            Some((label, status)) if label == desc.label => *status,
            _ => validate_framebuffer(desc),
        }
    }

    fn create_binding_group(
        &mut self,
        _pipeline: &Arc<dyn Pipeline>,
        desc: BindingGroupDesc,
    ) -> Result<Arc<dyn BindingGroup>> {
        self.created.push(desc.label.to_string());
        let textures = desc.resources.iter()
            .map(|r| match r {
                crate::graphics_device::BindingResource::SampledTexture(t, _) => t.info().label.clone(),
            })
            .collect();
        Ok(Arc::new(MockBindingGroup {
            label: desc.label.to_string(),
            set_index: desc.set_index,
            textures,
        }))
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
