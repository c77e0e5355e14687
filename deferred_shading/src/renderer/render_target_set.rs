/// RenderTargetSet - G-buffer, depth/stencil and final color attachments
///
/// Slot layout:
///
/// | Slot | Attachment | Format               |
/// |------|------------|----------------------|
/// | 0    | Position   | R32G32B32A32_SFLOAT  |
/// | 1    | Diffuse    | R32G32B32A32_SFLOAT  |
/// | 2    | Normal     | R32G32B32A32_SFLOAT  |
/// | 4    | FinalColor | R8G8B8A8_UNORM       |
/// | -    | Depth/stencil | D32_SFLOAT_S8_UINT |
///
/// The set owns one render pass per binding and three framebuffers. Every
/// `bind_for_*` call closes whatever pass was open and opens its own, then
/// sets viewport and scissor to the full target, so no binding inherits
/// state from the previous one.
///
/// A size change means building a new set; attachments are never resized.

use std::sync::Arc;
use crate::error::{Error, Result};
use crate::graphics_device::{
    AttachmentDesc, BindingGroup, BindingGroupDesc, BindingResource, ClearValue, CommandList,
    Framebuffer, FramebufferDesc, GraphicsDevice, LoadOp, Pipeline, Rect2D, RenderPass,
    RenderPassDesc, SamplerType, Texture, TextureDesc, TextureFormat, TextureUnit,
    TextureUsage, Viewport,
};
use crate::program::ActiveProgram;

pub const GBUFFER_FORMAT: TextureFormat = TextureFormat::R32G32B32A32_SFLOAT;
pub const DEPTH_STENCIL_FORMAT: TextureFormat = TextureFormat::D32_SFLOAT_S8_UINT;
pub const FINAL_COLOR_FORMAT: TextureFormat = TextureFormat::R8G8B8A8_UNORM;

/// Output slot of the final color attachment
pub const FINAL_COLOR_SLOT: u32 = 4;

// ===== G-BUFFER =====

/// G-buffer attachments, in slot and texture-unit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GBufferTexture {
    Position = 0,
    Diffuse = 1,
    Normal = 2,
}

impl GBufferTexture {
    pub const ALL: [GBufferTexture; 3] = [
        GBufferTexture::Position,
        GBufferTexture::Diffuse,
        GBufferTexture::Normal,
    ];

    /// Color output slot written by the geometry pass
    pub fn slot(&self) -> u32 {
        *self as u32
    }

    /// Texture unit the light passes sample it from
    pub fn texture_unit(&self) -> TextureUnit {
        TextureUnit(*self as u32)
    }

    /// Sampler uniform of the light shaders
    pub fn sampler_name(&self) -> &'static str {
        match self {
            GBufferTexture::Position => "gPositionMap",
            GBufferTexture::Diffuse => "gColorMap",
            GBufferTexture::Normal => "gNormalMap",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            GBufferTexture::Position => "gbuffer.position",
            GBufferTexture::Diffuse => "gbuffer.diffuse",
            GBufferTexture::Normal => "gbuffer.normal",
        }
    }
}

// ===== BINDINGS =====

/// Configuration of the set for one stage of the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetBinding {
    /// Final color is the only draw target, cleared
    FrameBegin,
    /// The three G-buffer slots are draw targets
    Geometry,
    /// No color draw target; depth/stencil only
    Stencil,
    /// Final color is the only draw target; G-buffer is sampled
    Light,
    /// Final color is the read source of the present blit
    FinalResolve,
}

impl TargetBinding {
    pub const ALL: [TargetBinding; 5] = [
        TargetBinding::FrameBegin,
        TargetBinding::Geometry,
        TargetBinding::Stencil,
        TargetBinding::Light,
        TargetBinding::FinalResolve,
    ];

    /// Color slots written while this binding is active
    pub fn draw_slots(&self) -> &'static [u32] {
        match self {
            TargetBinding::FrameBegin | TargetBinding::Light => &[FINAL_COLOR_SLOT],
            TargetBinding::Geometry => &[0, 1, 2],
            TargetBinding::Stencil | TargetBinding::FinalResolve => &[],
        }
    }

    /// Color slot read by a transfer, if any
    pub fn read_slot(&self) -> Option<u32> {
        match self {
            TargetBinding::FinalResolve => Some(FINAL_COLOR_SLOT),
            _ => None,
        }
    }

    /// Whether this binding runs inside a render pass
    pub fn is_render_pass(&self) -> bool {
        !matches!(self, TargetBinding::FinalResolve)
    }
}

// ===== RENDER TARGET SET =====

pub struct RenderTargetSet {
    width: u32,
    height: u32,
    clear_color: [f32; 4],

    gbuffer: [Arc<dyn Texture>; 3],
    depth_stencil: Arc<dyn Texture>,
    final_color: Arc<dyn Texture>,

    frame_begin_pass: Arc<dyn RenderPass>,
    geometry_pass: Arc<dyn RenderPass>,
    stencil_pass: Arc<dyn RenderPass>,
    light_pass: Arc<dyn RenderPass>,

    gbuffer_framebuffer: Arc<dyn Framebuffer>,
    stencil_framebuffer: Arc<dyn Framebuffer>,
    light_framebuffer: Arc<dyn Framebuffer>,

    binding: Option<TargetBinding>,
}

impl RenderTargetSet {
    /// Allocate every attachment at `width` x `height` and check completeness
    ///
    /// # Errors
    ///
    /// `Error::IncompleteFramebuffer` naming the framebuffer and its
    /// completeness code, or the device error of a failed allocation.
    /// Resources created before the failure are released on return.
    pub fn initialize(
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
        clear_color: [f32; 4],
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            crate::engine_error!("deferred::RenderTargetSet",
                "cannot create a {}x{} target set", width, height);
            return Err(Error::InitializationFailed(
                format!("target set size {}x{} is empty", width, height),
            ));
        }

        let mut texture = |label: &str, format: TextureFormat, usage: TextureUsage| {
            device.create_texture(TextureDesc {
                label: label.to_string(),
                width,
                height,
                format,
                usage,
            })
        };

        let gbuffer_usage = TextureUsage::RENDER_TARGET | TextureUsage::SAMPLED;
        let gbuffer = [
            texture(GBufferTexture::Position.label(), GBUFFER_FORMAT, gbuffer_usage)?,
            texture(GBufferTexture::Diffuse.label(), GBUFFER_FORMAT, gbuffer_usage)?,
            texture(GBufferTexture::Normal.label(), GBUFFER_FORMAT, gbuffer_usage)?,
        ];
        let depth_stencil = texture("depth_stencil", DEPTH_STENCIL_FORMAT, TextureUsage::DEPTH_STENCIL)?;
        let final_color = texture("final_color", FINAL_COLOR_FORMAT,
            TextureUsage::RENDER_TARGET | TextureUsage::TRANSFER_SRC)?;

        let gbuffer_targets = gbuffer.iter()
            .map(|t| device.create_render_target(t))
            .collect::<Result<Vec<_>>>()?;
        let depth_target = device.create_render_target(&depth_stencil)?;
        let final_target = device.create_render_target(&final_color)?;

        let final_attachment = |load| AttachmentDesc::color(FINAL_COLOR_FORMAT, load);
        let depth_attachment = |depth, stencil| AttachmentDesc::depth_stencil(DEPTH_STENCIL_FORMAT, depth, stencil);

        let frame_begin_pass = device.create_render_pass(RenderPassDesc {
            label: "frame_begin".to_string(),
            color_attachments: vec![final_attachment(LoadOp::Clear)],
            depth_stencil_attachment: Some(depth_attachment(LoadOp::Load, LoadOp::Load)),
        })?;
        let geometry_pass = device.create_render_pass(RenderPassDesc {
            label: "geometry".to_string(),
            color_attachments: vec![AttachmentDesc::color(GBUFFER_FORMAT, LoadOp::Clear); 3],
            depth_stencil_attachment: Some(depth_attachment(LoadOp::Clear, LoadOp::Clear)),
        })?;
        let stencil_pass = device.create_render_pass(RenderPassDesc {
            label: "stencil".to_string(),
            color_attachments: Vec::new(),
            depth_stencil_attachment: Some(depth_attachment(LoadOp::Load, LoadOp::Clear)),
        })?;
        let light_pass = device.create_render_pass(RenderPassDesc {
            label: "light".to_string(),
            color_attachments: vec![final_attachment(LoadOp::Load)],
            depth_stencil_attachment: Some(depth_attachment(LoadOp::Load, LoadOp::Load)),
        })?;

        let gbuffer_framebuffer = Self::checked_framebuffer(device, &FramebufferDesc {
            label: "gbuffer",
            render_pass: &geometry_pass,
            color_attachments: gbuffer_targets,
            depth_stencil_attachment: Some(depth_target.clone()),
            width,
            height,
        })?;
        let stencil_framebuffer = Self::checked_framebuffer(device, &FramebufferDesc {
            label: "stencil",
            render_pass: &stencil_pass,
            color_attachments: Vec::new(),
            depth_stencil_attachment: Some(depth_target.clone()),
            width,
            height,
        })?;
        let light_framebuffer = Self::checked_framebuffer(device, &FramebufferDesc {
            label: "light",
            render_pass: &light_pass,
            color_attachments: vec![final_target],
            depth_stencil_attachment: Some(depth_target),
            width,
            height,
        })?;

        crate::engine_info!("deferred::RenderTargetSet",
            "created {}x{} target set (3 G-buffer + depth/stencil + final color)", width, height);

        Ok(Self {
            width,
            height,
            clear_color,
            gbuffer,
            depth_stencil,
            final_color,
            frame_begin_pass,
            geometry_pass,
            stencil_pass,
            light_pass,
            gbuffer_framebuffer,
            stencil_framebuffer,
            light_framebuffer,
            binding: None,
        })
    }

    fn checked_framebuffer(
        device: &mut dyn GraphicsDevice,
        desc: &FramebufferDesc,
    ) -> Result<Arc<dyn Framebuffer>> {
        let status = device.framebuffer_status(desc);
        if !status.is_complete() {
            crate::engine_error!("deferred::RenderTargetSet",
                "framebuffer '{}' is incomplete: {}", desc.label, status);
            return Err(Error::IncompleteFramebuffer {
                target: desc.label.to_string(),
                status,
            });
        }
        device.create_framebuffer(desc)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Currently active binding
    pub fn binding(&self) -> Option<TargetBinding> {
        self.binding
    }

    pub fn gbuffer_texture(&self, texture: GBufferTexture) -> &Arc<dyn Texture> {
        &self.gbuffer[texture as usize]
    }

    pub fn depth_stencil_texture(&self) -> &Arc<dyn Texture> {
        &self.depth_stencil
    }

    pub fn final_color_texture(&self) -> &Arc<dyn Texture> {
        &self.final_color
    }

    /// Render pass used for `binding`, the one pipelines drawing there are
    /// created against. `FinalResolve` has none.
    pub fn render_pass(&self, binding: TargetBinding) -> Option<&Arc<dyn RenderPass>> {
        match binding {
            TargetBinding::FrameBegin => Some(&self.frame_begin_pass),
            TargetBinding::Geometry => Some(&self.geometry_pass),
            TargetBinding::Stencil => Some(&self.stencil_pass),
            TargetBinding::Light => Some(&self.light_pass),
            TargetBinding::FinalResolve => None,
        }
    }

    /// G-buffer sampling group for a light pipeline (bindings 0, 1, 2)
    pub fn create_light_inputs(
        &self,
        device: &mut dyn GraphicsDevice,
        pipeline: &Arc<dyn Pipeline>,
    ) -> Result<Arc<dyn BindingGroup>> {
        let resources = GBufferTexture::ALL.iter()
            .map(|t| BindingResource::SampledTexture(self.gbuffer_texture(*t).clone(), SamplerType::Nearest))
            .collect();
        device.create_binding_group(pipeline, BindingGroupDesc {
            label: &format!("{}.gbuffer_inputs", pipeline.label()),
            set_index: 0,
            resources,
        })
    }

    // ===== BINDING OPERATIONS =====

    /// Final color as sole draw target, cleared to the clear color
    pub fn begin_frame(&mut self, cmd: &mut dyn CommandList) -> Result<()> {
        let clear = [ClearValue::Color(self.clear_color)];
        let (pass, framebuffer) = (self.frame_begin_pass.clone(), self.light_framebuffer.clone());
        self.enter(cmd, TargetBinding::FrameBegin, &pass, &framebuffer, &clear)
    }

    /// Position, diffuse and normal as draw targets, with depth/stencil;
    /// all four are cleared
    pub fn bind_for_geometry(&mut self, cmd: &mut dyn CommandList) -> Result<()> {
        let clear = [
            ClearValue::Color([0.0; 4]),
            ClearValue::Color([0.0; 4]),
            ClearValue::Color([0.0; 4]),
            ClearValue::DepthStencil { depth: 1.0, stencil: 0 },
        ];
        let (pass, framebuffer) = (self.geometry_pass.clone(), self.gbuffer_framebuffer.clone());
        self.enter(cmd, TargetBinding::Geometry, &pass, &framebuffer, &clear)
    }

    /// Depth/stencil only; stencil is cleared, depth is kept
    pub fn bind_for_stencil(&mut self, cmd: &mut dyn CommandList) -> Result<()> {
        let clear = [ClearValue::DepthStencil { depth: 1.0, stencil: 0 }];
        let (pass, framebuffer) = (self.stencil_pass.clone(), self.stencil_framebuffer.clone());
        self.enter(cmd, TargetBinding::Stencil, &pass, &framebuffer, &clear)
    }

    /// Final color as sole draw target, loaded so lights accumulate
    pub fn bind_for_light(&mut self, cmd: &mut dyn CommandList) -> Result<()> {
        let (pass, framebuffer) = (self.light_pass.clone(), self.light_framebuffer.clone());
        self.enter(cmd, TargetBinding::Light, &pass, &framebuffer, &[])
    }

    /// Close any open pass and return the final color as blit source
    pub fn bind_for_final_resolve(&mut self, cmd: &mut dyn CommandList) -> Result<&Arc<dyn Texture>> {
        self.finish(cmd)?;
        self.binding = Some(TargetBinding::FinalResolve);
        Ok(&self.final_color)
    }

    /// Bind the G-buffer samplers of a light program (units 0, 1, 2)
    ///
    /// # Errors
    ///
    /// `Error::ContractViolation` outside the `Light` binding.
    pub fn bind_light_inputs(
        &self,
        program: &mut ActiveProgram<'_>,
        inputs: &Arc<dyn BindingGroup>,
    ) -> Result<()> {
        if self.binding != Some(TargetBinding::Light) {
            crate::engine_error!("deferred::RenderTargetSet",
                "G-buffer inputs bound while in {:?}", self.binding);
            return Err(Error::ContractViolation(
                "G-buffer inputs can only be bound for a light pass".to_string(),
            ));
        }
        program.bind_binding_group(inputs.set_index(), inputs)?;
        for texture in GBufferTexture::ALL {
            program.set_uniform(texture.sampler_name(), texture.texture_unit())?;
        }
        Ok(())
    }

    /// Close the open render pass, if any
    pub fn finish(&mut self, cmd: &mut dyn CommandList) -> Result<()> {
        if let Some(binding) = self.binding.take() {
            if binding.is_render_pass() {
                cmd.end_render_pass()?;
            }
        }
        Ok(())
    }

    fn enter(
        &mut self,
        cmd: &mut dyn CommandList,
        binding: TargetBinding,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.finish(cmd)?;
        cmd.begin_render_pass(render_pass, framebuffer, clear_values)?;
        self.binding = Some(binding);
        cmd.set_viewport(Viewport::full(self.width, self.height))?;
        cmd.set_scissor(Rect2D::full(self.width, self.height))
    }
}

#[cfg(test)]
#[path = "render_target_set_tests.rs"]
mod tests;
