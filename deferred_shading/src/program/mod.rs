/// Program module - linked shader programs and their loading

pub mod program;
pub mod light_uniforms;
pub mod render_context;
pub mod shader_source;

pub use program::*;
pub use render_context::*;
pub use shader_source::*;
