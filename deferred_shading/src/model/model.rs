/// Model contract
///
/// A model knows how to issue its own draw calls once a program is active.
/// Scene meshes come from outside the renderer; the two light-volume models
/// (unit sphere, full-screen quad) are loaded through a `ModelLoader` at
/// renderer construction.

use std::path::Path;
use std::sync::Arc;
use glam::Mat4;
use crate::error::Result;
use crate::graphics_device::GraphicsDevice;
use crate::program::ActiveProgram;

/// Something that can be drawn with the currently active program
pub trait Model: Send + Sync {
    /// Issue the draw calls for this model
    fn draw(&self, program: &mut ActiveProgram<'_>) -> Result<()>;

    /// World transform uploaded as the `model` uniform in the geometry pass
    fn model_matrix(&self) -> Mat4 {
        Mat4::IDENTITY
    }
}

/// Loads models from asset paths
pub trait ModelLoader {
    /// Load the model at `path`
    ///
    /// # Errors
    ///
    /// `Error::MissingAsset` when the asset cannot be found or parsed.
    fn load(&self, device: &mut dyn GraphicsDevice, path: &Path) -> Result<Arc<dyn Model>>;
}
