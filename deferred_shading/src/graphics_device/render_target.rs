/// Render target trait - an attachable view of a texture

use std::sync::Arc;
use crate::graphics_device::{Texture, TextureFormat};

/// A texture view that can be attached to a framebuffer
pub trait RenderTarget: Send + Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn format(&self) -> TextureFormat;

    /// Texture this view was created from
    fn texture(&self) -> &Arc<dyn Texture>;
}
