/// DeferredRenderer - runs the passes of a deferred-shading frame
///
/// Frame sequence:
///
/// 1. `begin_frame`: clear the final color target
/// 2. `render_geometry_pass`: fill the G-buffer and depth
/// 3. for every point light with a bounding sphere:
///    `render_stencil_pass` then `render_point_light_pass`
/// 4. `render_directional_light_pass`
/// 5. `render_final_pass`: blit final color to the swapchain image
///
/// The renderer owns only the target set, the four programs, the two
/// light-volume models and the G-buffer input groups. Scene content comes in
/// through `FrameContext` every frame.
///
/// A pass that fails leaves the renderer in that pass: every later pass is
/// refused with `Error::ContractViolation` until the next `begin_frame`.

use std::path::Path;
use std::sync::Arc;
use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::graphics_device::{BindingGroup, CommandList, GraphicsDevice, Swapchain, VertexLayout};
use crate::light::{DirectionalLight, PointLight};
use crate::model::{Model, ModelLoader};
use crate::program::{
    Program, RenderContext, DIR_LIGHT_FRAG, GEOMETRY_FRAG, GEOMETRY_VERT, LIGHT_VERT,
    POINT_LIGHT_FRAG, STENCIL_FRAG, STENCIL_VERT,
};
use crate::renderer::{FrameContext, FrameStats, PassState, RenderTargetSet, RendererConfig, TargetBinding};

pub struct DeferredRenderer {
    context: RenderContext,
    target_set: RenderTargetSet,

    geometry_program: Program,
    stencil_program: Program,
    point_light_program: Program,
    directional_light_program: Program,

    point_light_inputs: Arc<dyn BindingGroup>,
    directional_light_inputs: Arc<dyn BindingGroup>,

    sphere: Arc<dyn Model>,
    quad: Arc<dyn Model>,

    pass: PassState,
    frame_open: bool,
    gbuffer_filled: bool,
    stats: FrameStats,
}

impl DeferredRenderer {
    /// Build the target set, compile the four programs and load the light
    /// volumes
    ///
    /// # Errors
    ///
    /// Any failure aborts construction: an incomplete framebuffer, a shader
    /// that does not compile, a program that does not link or a missing
    /// light-volume asset. Everything created before the failure is released.
    pub fn new(
        device: &mut dyn GraphicsDevice,
        config: &RendererConfig,
        loader: &dyn ModelLoader,
    ) -> Result<Self> {
        crate::engine_info!("deferred::DeferredRenderer",
            "initializing {}x{} deferred renderer", config.width, config.height);

        let target_set = RenderTargetSet::initialize(device, config.width, config.height, config.clear_color)?;
        let mut context = RenderContext::new(config.width, config.height, config.shader_dir.clone());

        let pass_target = |binding| {
            target_set.render_pass(binding).ok_or_else(|| {
                Error::InvalidResource(format!("target set has no render pass for {:?}", binding))
            })
        };

        crate::engine_info!("deferred::DeferredRenderer", "compile geometry-shaders");
        let geometry_program = context.load_program(device, "geometry", GEOMETRY_VERT, GEOMETRY_FRAG,
            VertexLayout::position_uv_normal(), PassState::Geometry.pipeline_state()?,
            pass_target(TargetBinding::Geometry)?)?;

        crate::engine_info!("deferred::DeferredRenderer", "compile stencil-shaders");
        let stencil_program = context.load_program(device, "stencil", STENCIL_VERT, STENCIL_FRAG,
            VertexLayout::positions_only(), PassState::Stencil.pipeline_state()?,
            pass_target(TargetBinding::Stencil)?)?;

        crate::engine_info!("deferred::DeferredRenderer", "compile pointlight-shaders");
        let point_light_program = context.load_program(device, "point_light", LIGHT_VERT, POINT_LIGHT_FRAG,
            VertexLayout::positions_only(), PassState::PointLight.pipeline_state()?,
            pass_target(TargetBinding::Light)?)?;

        crate::engine_info!("deferred::DeferredRenderer", "compile dirlight-shaders");
        let directional_light_program = context.load_program(device, "directional_light", LIGHT_VERT, DIR_LIGHT_FRAG,
            VertexLayout::positions_only(), PassState::DirectionalLight.pipeline_state()?,
            pass_target(TargetBinding::Light)?)?;

        let point_light_inputs = target_set.create_light_inputs(device, point_light_program.pipeline())?;
        let directional_light_inputs = target_set.create_light_inputs(device, directional_light_program.pipeline())?;

        let sphere = load_volume(device, loader, &config.sphere_path)?;
        let quad = load_volume(device, loader, &config.quad_path)?;

        crate::engine_info!("deferred::DeferredRenderer",
            "deferred renderer ready ({} shader stages compiled)", context.cached_shaders());

        Ok(Self {
            context,
            target_set,
            geometry_program,
            stencil_program,
            point_light_program,
            directional_light_program,
            point_light_inputs,
            directional_light_inputs,
            sphere,
            quad,
            pass: PassState::Idle,
            frame_open: false,
            gbuffer_filled: false,
            stats: FrameStats::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.context.width()
    }

    pub fn height(&self) -> u32 {
        self.context.height()
    }

    /// Pass currently running (`Idle` between passes)
    pub fn pass(&self) -> PassState {
        self.pass
    }

    pub fn target_set(&self) -> &RenderTargetSet {
        &self.target_set
    }

    /// Counters of the current frame
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn geometry_program(&self) -> &Program {
        &self.geometry_program
    }

    pub fn stencil_program(&self) -> &Program {
        &self.stencil_program
    }

    pub fn point_light_program(&self) -> &Program {
        &self.point_light_program
    }

    pub fn directional_light_program(&self) -> &Program {
        &self.directional_light_program
    }

    // ===== FRAME =====

    /// Render one whole frame and present-blit it to `image_index`
    ///
    /// `cmd` must be recording; it is left recording, outside any render
    /// pass, for the caller to end and submit.
    pub fn render_frame(
        &mut self,
        cmd: &mut dyn CommandList,
        swapchain: &dyn Swapchain,
        image_index: u32,
        frame: &FrameContext<'_>,
    ) -> Result<FrameStats> {
        self.begin_frame(cmd)?;
        self.render_geometry_pass(cmd, frame.models, frame.camera)?;

        if frame.toggles.point_lights {
            for light in frame.point_lights {
                if light.bounding_sphere().is_none() {
                    self.skip_light(light);
                    continue;
                }
                self.render_stencil_pass(cmd, light, frame.camera)?;
                self.render_point_light_pass(cmd, light, frame.camera)?;
            }
        }

        if frame.toggles.directional_light {
            if let Some(light) = frame.directional_light {
                self.render_directional_light_pass(cmd, light, frame.camera)?;
            }
        }

        self.render_final_pass(cmd, swapchain, image_index)?;

        crate::engine_trace!("deferred::DeferredRenderer", "frame done: {:?}", self.stats);
        Ok(self.stats)
    }

    /// Start a frame: clear final color and reset the frame counters
    pub fn begin_frame(&mut self, cmd: &mut dyn CommandList) -> Result<()> {
        if self.pass != PassState::Idle {
            crate::engine_warn!("deferred::DeferredRenderer",
                "previous frame stopped inside the {} pass", self.pass.name());
        }
        self.pass = PassState::Idle;
        self.stats = FrameStats::default();
        self.gbuffer_filled = false;
        self.frame_open = false;

        self.target_set.begin_frame(cmd)?;
        self.frame_open = true;
        Ok(())
    }

    // ===== PASSES =====

    /// Draw every model into the G-buffer
    ///
    /// The only pass that writes depth; every later pass of the frame reads
    /// it.
    pub fn render_geometry_pass(
        &mut self,
        cmd: &mut dyn CommandList,
        models: &[Arc<dyn Model>],
        camera: &Camera,
    ) -> Result<()> {
        self.enter(PassState::Geometry)?;

        self.target_set.bind_for_geometry(cmd)?;

        let mut program = self.geometry_program.activate(cmd)?;
        program.set_uniform("projection", *camera.projection_matrix())?;
        program.set_uniform("view", *camera.view_matrix())?;
        for model in models {
            program.set_uniform("model", model.model_matrix())?;
            model.draw(&mut program)?;
            self.stats.geometry_draws += 1;
        }
        program.stop_using()?;

        self.gbuffer_filled = true;
        self.leave();
        Ok(())
    }

    /// Mark in stencil the pixels whose geometry lies inside `light`'s volume
    ///
    /// Back faces failing the depth test increment, front faces failing it
    /// decrement, so pixels in front of the far side of the sphere and
    /// behind its near side end up non-zero. A light without a bounding
    /// sphere is skipped.
    pub fn render_stencil_pass(
        &mut self,
        cmd: &mut dyn CommandList,
        light: &PointLight,
        camera: &Camera,
    ) -> Result<()> {
        let Some(radius) = light.bounding_sphere() else {
            self.skip_light(light);
            return Ok(());
        };
        self.enter(PassState::Stencil)?;

        self.target_set.bind_for_stencil(cmd)?;

        let mut program = self.stencil_program.activate(cmd)?;
        program.set_uniform("model", light.volume_transform(radius))?;
        program.set_uniform("projection", *camera.projection_matrix())?;
        program.set_uniform("view", *camera.view_matrix())?;
        self.sphere.draw(&mut program)?;
        program.stop_using()?;

        self.stats.stencil_passes += 1;
        self.leave();
        Ok(())
    }

    /// Shade the stencil-marked pixels of `light` into final color
    pub fn render_point_light_pass(
        &mut self,
        cmd: &mut dyn CommandList,
        light: &PointLight,
        camera: &Camera,
    ) -> Result<()> {
        let Some(radius) = light.bounding_sphere() else {
            self.skip_light(light);
            return Ok(());
        };
        self.enter(PassState::PointLight)?;

        self.target_set.bind_for_light(cmd)?;

        let mut program = self.point_light_program.activate(cmd)?;
        self.target_set.bind_light_inputs(&mut program, &self.point_light_inputs)?;
        program.set_uniform("screenSize", self.context.screen_size())?;
        program.set_uniform("projection", *camera.projection_matrix())?;
        program.set_uniform("view", *camera.view_matrix())?;
        program.set_uniform("model", light.volume_transform(radius))?;
        program.set_struct("pointLight", light)?;
        program.set_uniform("eyePos", camera.position())?;
        self.sphere.draw(&mut program)?;
        program.stop_using()?;

        self.stats.point_light_passes += 1;
        self.leave();
        Ok(())
    }

    /// Shade every pixel with `light` using a full-screen quad
    pub fn render_directional_light_pass(
        &mut self,
        cmd: &mut dyn CommandList,
        light: &DirectionalLight,
        camera: &Camera,
    ) -> Result<()> {
        self.enter(PassState::DirectionalLight)?;

        self.target_set.bind_for_light(cmd)?;

        // The quad is already in clip space.
        let mut program = self.directional_light_program.activate(cmd)?;
        self.target_set.bind_light_inputs(&mut program, &self.directional_light_inputs)?;
        program.set_uniform("screenSize", self.context.screen_size())?;
        program.set_uniform("projection", Mat4::IDENTITY)?;
        program.set_uniform("view", Mat4::IDENTITY)?;
        program.set_uniform("model", Mat4::IDENTITY)?;
        program.set_struct("dirLight", light)?;
        program.set_uniform("eyePos", camera.position())?;
        self.quad.draw(&mut program)?;
        program.stop_using()?;

        self.stats.directional_passes += 1;
        self.leave();
        Ok(())
    }

    /// Copy final color to swapchain image `image_index`
    ///
    /// Only reads the final color target, so calling it again before the
    /// next frame blits the same image.
    ///
    /// # Errors
    ///
    /// `Error::ContractViolation` when the swapchain size differs from the
    /// target set.
    pub fn render_final_pass(
        &mut self,
        cmd: &mut dyn CommandList,
        swapchain: &dyn Swapchain,
        image_index: u32,
    ) -> Result<()> {
        let (width, height) = (self.target_set.width(), self.target_set.height());
        if swapchain.width() != width || swapchain.height() != height {
            crate::engine_error!("deferred::DeferredRenderer",
                "swapchain is {}x{} but the target set is {}x{}",
                swapchain.width(), swapchain.height(), width, height);
            return Err(Error::ContractViolation(format!(
                "final blit from {}x{} to {}x{}", width, height, swapchain.width(), swapchain.height(),
            )));
        }
        if !self.frame_open {
            return Err(self.violation("final blit before any frame was begun"));
        }
        self.enter(PassState::FinalBlit)?;

        let source = self.target_set.bind_for_final_resolve(cmd)?;
        swapchain.record_present_blit(cmd, source.as_ref(), image_index)?;

        self.stats.final_blits += 1;
        self.leave();
        Ok(())
    }

    // ===== PASS BOOKKEEPING =====

    fn enter(&mut self, pass: PassState) -> Result<()> {
        if self.pass != PassState::Idle {
            return Err(self.violation(&format!(
                "{} pass entered while the {} pass is active", pass.name(), self.pass.name(),
            )));
        }
        let needs_gbuffer = matches!(
            pass,
            PassState::Stencil | PassState::PointLight | PassState::DirectionalLight
        );
        if needs_gbuffer && !self.gbuffer_filled {
            return Err(self.violation(&format!(
                "{} pass entered before the geometry pass of this frame", pass.name(),
            )));
        }
        if pass == PassState::Geometry && !self.frame_open {
            return Err(self.violation("geometry pass entered before begin_frame"));
        }
        crate::engine_trace!("deferred::DeferredRenderer", "enter {} pass", pass.name());
        self.pass = pass;
        Ok(())
    }

    fn leave(&mut self) {
        self.pass = PassState::Idle;
    }

    fn violation(&self, message: &str) -> Error {
        crate::engine_error!("deferred::DeferredRenderer", "{}", message);
        Error::ContractViolation(message.to_string())
    }

    fn skip_light(&mut self, light: &PointLight) {
        crate::engine_warn!("deferred::DeferredRenderer",
            "point light at {} has no bounding sphere, skipped", format_position(light.position));
        self.stats.skipped_lights += 1;
    }
}

fn load_volume(device: &mut dyn GraphicsDevice, loader: &dyn ModelLoader, path: &Path) -> Result<Arc<dyn Model>> {
    loader.load(device, path).map_err(|e| {
        crate::engine_error!("deferred::DeferredRenderer", "light volume: {}", e);
        e
    })
}

fn format_position(position: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", position.x, position.y, position.z)
}

#[cfg(test)]
#[path = "deferred_renderer_tests.rs"]
mod tests;
