/// Texture trait and descriptors

use bitflags::bitflags;

/// Pixel formats used by the render targets and vertex attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Color formats
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R32G32B32A32_SFLOAT,

    // Depth/stencil formats
    D32_FLOAT,
    D24_UNORM_S8_UINT,
    D32_SFLOAT_S8_UINT,

    // Vertex attribute formats
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
}

impl TextureFormat {
    /// True for formats with a depth component
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::D32_FLOAT
                | TextureFormat::D24_UNORM_S8_UINT
                | TextureFormat::D32_SFLOAT_S8_UINT
        )
    }

    /// True for formats with a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_SFLOAT_S8_UINT)
    }

    /// Size of one texel or vertex element in bytes
    pub fn size_bytes(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R8G8B8A8_SRGB
            | TextureFormat::B8G8R8A8_UNORM
            | TextureFormat::B8G8R8A8_SRGB
            | TextureFormat::D32_FLOAT
            | TextureFormat::D24_UNORM_S8_UINT => 4,
            TextureFormat::D32_SFLOAT_S8_UINT | TextureFormat::R32G32_SFLOAT => 8,
            TextureFormat::R32G32B32_SFLOAT => 12,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
        }
    }
}

bitflags! {
    /// How a texture may be used by the device
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// Readable from shaders
        const SAMPLED = 1 << 0;
        /// Writable as a color attachment
        const RENDER_TARGET = 1 << 1;
        /// Writable as a depth/stencil attachment
        const DEPTH_STENCIL = 1 << 2;
        /// Source of a copy or blit
        const TRANSFER_SRC = 1 << 3;
        /// Destination of a copy or blit
        const TRANSFER_DST = 1 << 4;
    }
}

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Debug label (also used in diagnostics)
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
}

/// Read-only properties of a created texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
}

impl From<&TextureDesc> for TextureInfo {
    fn from(desc: &TextureDesc) -> Self {
        Self {
            label: desc.label.clone(),
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
        }
    }
}

/// GPU texture. The resource is released when the last `Arc` drops.
pub trait Texture: Send + Sync {
    /// Get texture properties
    fn info(&self) -> &TextureInfo;
}
