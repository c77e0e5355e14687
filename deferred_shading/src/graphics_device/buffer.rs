/// Buffer trait and descriptors

use crate::error::Result;

/// Buffer usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex buffer
    Vertex,
    /// Index buffer
    Index,
    /// Uniform buffer
    Uniform,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Debug label
    pub label: String,
    /// Size in bytes
    pub size: u64,
    pub usage: BufferUsage,
}

/// GPU buffer
pub trait Buffer: Send + Sync {
    /// Size in bytes
    fn size(&self) -> u64;

    /// Write `data` starting at `offset`
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;
}
