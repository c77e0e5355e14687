/// Framebuffer trait - groups render target attachments for a render pass
///
/// Created once per target-set initialization and reused every frame.

use std::fmt;
use std::sync::Arc;
use crate::graphics_device::{RenderPass, RenderTarget, TextureUsage};

/// Framebuffer (color and depth/stencil attachments bound together)
pub trait Framebuffer: Send + Sync {
    /// Debug label
    fn label(&self) -> &str;

    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;
}

/// Descriptor for creating a framebuffer
pub struct FramebufferDesc<'a> {
    /// Debug label (named in completeness diagnostics)
    pub label: &'a str,
    /// The render pass this framebuffer is compatible with
    pub render_pass: &'a Arc<dyn RenderPass>,
    /// Color attachments in slot order
    pub color_attachments: Vec<Arc<dyn RenderTarget>>,
    /// Optional depth/stencil attachment
    pub depth_stencil_attachment: Option<Arc<dyn RenderTarget>>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Completeness code reported for a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    /// Ready to render into
    Complete,
    /// No attachments at all, or zero-sized
    Undefined,
    /// An attachment has a format or usage it cannot be rendered with
    IncompleteAttachment,
    /// The render pass expects an attachment that is absent
    MissingAttachment,
    /// A color slot the pass draws into has no attachment
    IncompleteDrawBuffer,
    /// The attachment read by a resolve is absent
    IncompleteReadBuffer,
    /// The device cannot render to this combination of formats
    Unsupported,
    /// Attachments do not share the framebuffer dimensions
    DimensionMismatch,
    /// Attachment count or formats differ from the render pass
    IncompatibleRenderPass,
}

impl FramebufferStatus {
    pub fn is_complete(&self) -> bool {
        *self == FramebufferStatus::Complete
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FramebufferStatus::Complete => "complete",
            FramebufferStatus::Undefined => "undefined",
            FramebufferStatus::IncompleteAttachment => "incomplete attachment",
            FramebufferStatus::MissingAttachment => "missing attachment",
            FramebufferStatus::IncompleteDrawBuffer => "incomplete draw buffer",
            FramebufferStatus::IncompleteReadBuffer => "incomplete read buffer",
            FramebufferStatus::Unsupported => "unsupported",
            FramebufferStatus::DimensionMismatch => "dimension mismatch",
            FramebufferStatus::IncompatibleRenderPass => "incompatible render pass",
        };
        f.write_str(text)
    }
}

/// Structural completeness check shared by all backends
///
/// Checks, in order: non-empty and non-zero size, attachment presence against
/// the render pass, formats, usage flags, and equal dimensions.
pub fn validate_framebuffer(desc: &FramebufferDesc) -> FramebufferStatus {
    let pass = desc.render_pass.desc();

    if desc.width == 0 || desc.height == 0 {
        return FramebufferStatus::Undefined;
    }
    if desc.color_attachments.is_empty() && desc.depth_stencil_attachment.is_none() {
        return FramebufferStatus::Undefined;
    }
    if desc.color_attachments.len() < pass.color_attachments.len() {
        return FramebufferStatus::IncompleteDrawBuffer;
    }
    if desc.color_attachments.len() > pass.color_attachments.len() {
        return FramebufferStatus::IncompatibleRenderPass;
    }
    match (&pass.depth_stencil_attachment, &desc.depth_stencil_attachment) {
        (Some(_), None) => return FramebufferStatus::MissingAttachment,
        (None, Some(_)) => return FramebufferStatus::IncompatibleRenderPass,
        _ => {}
    }

    for (target, expected) in desc.color_attachments.iter().zip(&pass.color_attachments) {
        if target.format() != expected.format {
            return FramebufferStatus::IncompatibleRenderPass;
        }
        if target.format().is_depth()
            || !target.texture().info().usage.contains(TextureUsage::RENDER_TARGET)
        {
            return FramebufferStatus::IncompleteAttachment;
        }
    }
    if let (Some(target), Some(expected)) = (&desc.depth_stencil_attachment, &pass.depth_stencil_attachment) {
        if target.format() != expected.format {
            return FramebufferStatus::IncompatibleRenderPass;
        }
        if !target.format().is_depth()
            || !target.texture().info().usage.contains(TextureUsage::DEPTH_STENCIL)
        {
            return FramebufferStatus::IncompleteAttachment;
        }
    }

    let mismatched = desc.color_attachments.iter()
        .chain(desc.depth_stencil_attachment.iter())
        .any(|t| t.width() != desc.width || t.height() != desc.height);
    if mismatched {
        return FramebufferStatus::DimensionMismatch;
    }

    FramebufferStatus::Complete
}

#[cfg(test)]
#[path = "frame_buffer_tests.rs"]
mod tests;
