/// Swapchain trait - for window presentation

use crate::error::Result;
use crate::graphics_device::{CommandList, Texture, TextureFormat};

/// Swapchain for presenting rendered images to a window
pub trait Swapchain: Send + Sync {
    /// Acquire the next available swapchain image index
    fn acquire_next_image(&mut self) -> Result<u32>;

    /// Record a blit from the final rendered texture to a swapchain image
    ///
    /// Copies `src` into the swapchain image at `image_index`, rectangle
    /// `(0,0)-(w,h)` to `(0,0)-(w,h)`, color only, nearest filtering.
    /// Must be called while the command list is recording and outside a
    /// render pass. Fails when `src` and the swapchain differ in size.
    fn record_present_blit(
        &self,
        cmd: &mut dyn CommandList,
        src: &dyn Texture,
        image_index: u32,
    ) -> Result<()>;

    /// Present the image at `image_index`
    fn present(&mut self, image_index: u32) -> Result<()>;

    /// Number of images in the swapchain
    fn image_count(&self) -> usize;

    /// Width of the swapchain images in pixels
    fn width(&self) -> u32;

    /// Height of the swapchain images in pixels
    fn height(&self) -> u32;

    /// Pixel format of the swapchain images
    fn format(&self) -> TextureFormat;
}
