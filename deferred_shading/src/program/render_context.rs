/// RenderContext - viewport size plus shader loading
///
/// Every renderer stage needs the surface size and a way to turn shader
/// files into compiled stages. `RenderContext` provides both and is held by
/// the renderer as a field.
///
/// Shader files are looked up in the override directory when one is
/// configured, then in the built-in sources. Compiled stages are cached by
/// file name so that a stage shared by several programs is compiled once.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{
    FixedFunctionState, GraphicsDevice, RenderPass, Shader, ShaderDesc, ShaderStage, VertexLayout,
    Viewport,
};
use crate::program::{builtin_shader, Program};

pub struct RenderContext {
    width: u32,
    height: u32,
    shader_dir: Option<PathBuf>,
    shaders: FxHashMap<String, Arc<dyn Shader>>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32, shader_dir: Option<PathBuf>) -> Self {
        Self {
            width,
            height,
            shader_dir,
            shaders: FxHashMap::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` as floats, the `screenSize` uniform
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Full-surface viewport
    pub fn viewport(&self) -> Viewport {
        Viewport::full(self.width, self.height)
    }

    /// Source text of a shader file (`"light/light_pass.vert"`, ...)
    ///
    /// # Errors
    ///
    /// `Error::MissingAsset` when the file is neither in the override
    /// directory nor built in.
    pub fn shader_source(&self, file: &str) -> Result<Cow<'static, str>> {
        if let Some(dir) = &self.shader_dir {
            let path = dir.join(file);
            if path.exists() {
                return std::fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|e| Error::MissingAsset {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    });
            }
        }
        builtin_shader(file)
            .map(Cow::Borrowed)
            .ok_or_else(|| Error::MissingAsset {
                path: file.to_string(),
                reason: "no such shader file".to_string(),
            })
    }

    /// Compile (or fetch from cache) one shader file
    pub fn load_shader(&mut self, device: &mut dyn GraphicsDevice, file: &str) -> Result<Arc<dyn Shader>> {
        if let Some(shader) = self.shaders.get(file) {
            return Ok(shader.clone());
        }

        let stage = ShaderStage::from_extension(file).ok_or_else(|| {
            Error::InvalidResource(format!("cannot infer shader stage of '{}'", file))
        })?;
        let source = self.shader_source(file)?;
        let shader = device.create_shader(ShaderDesc {
            label: file,
            source: &source,
            stage,
            entry_point: "main",
        });

        match shader {
            Ok(shader) => {
                crate::engine_debug!("deferred::ShaderLoader", "compiled {:?} shader '{}'", stage, file);
                self.shaders.insert(file.to_string(), shader.clone());
                Ok(shader)
            }
            Err(e) => {
                crate::engine_error!("deferred::ShaderLoader", "{}", e);
                Err(e)
            }
        }
    }

    /// Compile both stages and link them into a program
    pub fn load_program(
        &mut self,
        device: &mut dyn GraphicsDevice,
        name: &str,
        vertex_file: &str,
        fragment_file: &str,
        vertex_layout: VertexLayout,
        fixed_function: FixedFunctionState,
        render_pass: &Arc<dyn RenderPass>,
    ) -> Result<Program> {
        let vertex = self.load_shader(device, vertex_file)?;
        let fragment = self.load_shader(device, fragment_file)?;
        Program::link(device, name, vertex, fragment, vertex_layout, fixed_function, render_pass).map_err(|e| {
            crate::engine_error!("deferred::ShaderLoader", "{}", e);
            e
        })
    }

    /// Number of compiled stages held by the cache
    pub fn cached_shaders(&self) -> usize {
        self.shaders.len()
    }

    /// Drop the cache's references; programs keep the stages they use alive
    pub fn clear_shader_cache(&mut self) {
        self.shaders.clear();
    }
}
