/// Shader trait and descriptors

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Guess the stage from a file extension (`.vert`, `.frag`)
    pub fn from_extension(path: &str) -> Option<Self> {
        if path.ends_with(".vert") {
            Some(ShaderStage::Vertex)
        } else if path.ends_with(".frag") {
            Some(ShaderStage::Fragment)
        } else {
            None
        }
    }
}

/// Descriptor for compiling a shader stage
#[derive(Debug, Clone)]
pub struct ShaderDesc<'a> {
    /// Label used in diagnostics (usually the source file name)
    pub label: &'a str,
    /// Source text handed to the backend compiler
    pub source: &'a str,
    pub stage: ShaderStage,
    pub entry_point: &'a str,
}

/// Compiled shader stage. Shared between programs through `Arc`.
pub trait Shader: Send + Sync {
    /// Label given at creation
    fn label(&self) -> &str;

    /// Compiled stage
    fn stage(&self) -> ShaderStage;
}
