/// Render pass trait and descriptors
///
/// A render pass describes what happens to each attachment when a pass
/// starts and ends. Depth and stencil aspects have separate ops so that a
/// pass can keep the depth buffer while clearing stencil.

use crate::graphics_device::TextureFormat;

/// Render pass (attachment layout and load/store behavior)
pub trait RenderPass: Send + Sync {
    /// Descriptor given at creation
    fn desc(&self) -> &RenderPassDesc;
}

/// Descriptor for creating a render pass
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPassDesc {
    /// Debug label
    pub label: String,
    /// Color attachments in slot order
    pub color_attachments: Vec<AttachmentDesc>,
    /// Optional depth/stencil attachment
    pub depth_stencil_attachment: Option<AttachmentDesc>,
}

impl RenderPassDesc {
    /// Number of attachments that need a clear value
    pub fn clear_count(&self) -> usize {
        let colors = self.color_attachments.iter()
            .filter(|a| a.load_op == LoadOp::Clear)
            .count();
        let depth = self.depth_stencil_attachment.iter()
            .filter(|a| a.load_op == LoadOp::Clear || a.stencil_load_op == LoadOp::Clear)
            .count();
        colors + depth
    }
}

/// Attachment description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentDesc {
    pub format: TextureFormat,
    /// Load op for color, or for the depth aspect
    pub load_op: LoadOp,
    /// Store op for color, or for the depth aspect
    pub store_op: StoreOp,
    /// Load op for the stencil aspect (ignored for color)
    pub stencil_load_op: LoadOp,
    /// Store op for the stencil aspect (ignored for color)
    pub stencil_store_op: StoreOp,
}

impl AttachmentDesc {
    /// Color attachment
    pub fn color(format: TextureFormat, load_op: LoadOp) -> Self {
        Self {
            format,
            load_op,
            store_op: StoreOp::Store,
            stencil_load_op: LoadOp::DontCare,
            stencil_store_op: StoreOp::DontCare,
        }
    }

    /// Depth/stencil attachment with independent depth and stencil loads
    pub fn depth_stencil(format: TextureFormat, depth_load: LoadOp, stencil_load: LoadOp) -> Self {
        Self {
            format,
            load_op: depth_load,
            store_op: StoreOp::Store,
            stencil_load_op: stencil_load,
            stencil_store_op: StoreOp::Store,
        }
    }
}

/// What to do with attachment contents at the start of the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    Load,
    Clear,
    DontCare,
}

/// What to do with attachment contents at the end of the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Store,
    DontCare,
}
