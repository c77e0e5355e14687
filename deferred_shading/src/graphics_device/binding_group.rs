/// Binding group trait - a set of shader resources bound together

use std::sync::Arc;
use crate::graphics_device::Texture;

/// Sampler filtering for sampled textures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerType {
    /// Nearest filtering, clamp to edge
    Nearest,
    /// Linear filtering, clamp to edge
    Linear,
}

/// A resource bound at one binding index
#[derive(Clone)]
pub enum BindingResource {
    /// Texture sampled with the given filtering
    SampledTexture(Arc<dyn Texture>, SamplerType),
}

/// Descriptor for creating a binding group
pub struct BindingGroupDesc<'a> {
    /// Debug label
    pub label: &'a str,
    /// Set index the group binds to
    pub set_index: u32,
    /// Resources in binding order (binding i = texture unit i)
    pub resources: Vec<BindingResource>,
}

/// Binding group (resources bound as one unit)
pub trait BindingGroup: Send + Sync {
    /// Debug label
    fn label(&self) -> &str;

    /// Set index this group was created for
    fn set_index(&self) -> u32;

    /// Number of bound resources
    fn len(&self) -> usize;

    /// True if no resources are bound
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
