/// Renderer configuration

use std::path::PathBuf;
use crate::model::{ProceduralVolumeLoader, VolumeShape};

/// Construction-time settings of a `DeferredRenderer`
///
/// Width and height are the only values an application normally has to
/// provide; everything else has a working default.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Render target width in pixels
    pub width: u32,
    /// Render target height in pixels
    pub height: u32,
    /// Directory searched for shader files before the built-in sources
    pub shader_dir: Option<PathBuf>,
    /// Asset path of the unit light-volume sphere
    pub sphere_path: PathBuf,
    /// Asset path of the full-screen quad
    pub quad_path: PathBuf,
    /// Color the final target is cleared to at frame start
    pub clear_color: [f32; 4],
}

impl RendererConfig {
    /// Default configuration at the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_shader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shader_dir = Some(dir.into());
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Loader serving the two light-volume paths procedurally
    pub fn volume_loader(&self) -> ProceduralVolumeLoader {
        ProceduralVolumeLoader::new()
            .with_shape(&self.sphere_path, VolumeShape::Sphere { rings: 16, segments: 24 })
            .with_shape(&self.quad_path, VolumeShape::FullscreenQuad)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            shader_dir: None,
            sphere_path: PathBuf::from("objects/shadingObjects/pointLight.obj"),
            quad_path: PathBuf::from("objects/shadingObjects/dirLight_quad.obj"),
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}
