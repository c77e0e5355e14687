//! Error types for the deferred renderer
//!
//! Construction-time failures (incomplete framebuffers, shader compilation,
//! missing assets) are fatal and carry enough context to name the failing
//! attachment, shader or asset. Per-frame device failures surface through the
//! same type from every command list call.

use std::fmt;
use crate::graphics_device::{FramebufferStatus, ShaderStage};

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Renderer errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (device lost, command rejected, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (renderer, target set, subsystems)
    InitializationFailed(String),

    /// A framebuffer did not report complete after creation
    IncompleteFramebuffer {
        /// Label of the framebuffer that failed
        target: String,
        /// Completeness code reported by the device
        status: FramebufferStatus,
    },

    /// A shader stage failed to compile
    ShaderCompilation {
        /// Shader file or label
        shader: String,
        /// Stage that failed
        stage: ShaderStage,
        /// Compiler info log
        log: String,
    },

    /// Two compiled stages could not be linked into a program
    ProgramLink {
        /// Program name
        program: String,
        /// Linker info log
        log: String,
    },

    /// A required asset (shader source, light-volume mesh) could not be loaded
    MissingAsset {
        /// Asset path
        path: String,
        /// Reason reported by the loader
        reason: String,
    },

    /// A renderer call was issued in a state where it is not allowed
    ContractViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::IncompleteFramebuffer { target, status } => {
                write!(f, "Framebuffer '{}' incomplete: {}", target, status)
            }
            Error::ShaderCompilation { shader, stage, log } => {
                write!(f, "Failed to compile {:?} shader '{}': {}", stage, shader, log)
            }
            Error::ProgramLink { program, log } => {
                write!(f, "Failed to link program '{}': {}", program, log)
            }
            Error::MissingAsset { path, reason } => {
                write!(f, "Missing asset '{}': {}", path, reason)
            }
            Error::ContractViolation(msg) => write!(f, "Contract violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an ERROR message and build a `BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use deferred_shading::engine_err;
/// # let index = 0;
/// let err = engine_err!("deferred::FrameBuffer", "bad attachment {}", index);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::deferred::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return early with a `BackendError`
///
/// # Example
///
/// ```no_run
/// # use deferred_shading::engine_bail;
/// # fn draw() -> deferred_shading::deferred::Result<()> {
/// engine_bail!("deferred::mock", "draw outside a render pass");
/// # }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
