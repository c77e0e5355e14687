/*!
# Deferred Shading

A real-time deferred-shading renderer built on a backend-agnostic graphics
device abstraction.

Each frame goes through five passes:

- **Geometry**: scene models are rasterized into a G-buffer holding world
  position, diffuse color and normal.
- **Stencil**: for every point light, its bounding sphere is rasterized
  without color output to mark, in the stencil buffer, the pixels whose
  geometry lies inside the light volume.
- **Point light**: the sphere is drawn again, shading only the marked pixels
  and accumulating additively into the final color target.
- **Directional light**: a full-screen quad shades every pixel.
- **Final blit**: the final color target is copied to the presentation
  surface.

## Architecture

- **GraphicsDevice**: factory trait for GPU resources (backends implement it)
- **CommandList**: command recording trait, every call returns a `Result`
- **Program**: a linked shader pair with its pass's fixed-function state
- **RenderTargetSet**: the G-buffer, depth/stencil and final color attachments
- **DeferredRenderer**: owns the target set and programs, runs the passes
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod camera;
pub mod light;
pub mod program;
pub mod model;
pub mod renderer;

// Main deferred namespace module
pub mod deferred {
    // Error types
    pub use crate::error::{Error, Result};

    // Logger facade
    pub use crate::engine::Engine;

    // Renderer entry points
    pub use crate::renderer::{
        DeferredRenderer, RendererConfig, FrameContext, FrameStats, RenderToggles,
        RenderTargetSet, PassState,
    };

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Graphics device abstraction
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Scene-side contracts
    pub mod scene {
        pub use crate::camera::*;
        pub use crate::light::*;
        pub use crate::model::*;
    }

    // Program abstraction
    pub mod program {
        pub use crate::program::*;
    }

    // Renderer internals (target set bindings, pass table)
    pub mod render {
        pub use crate::renderer::*;
    }
}

// Re-export math library at crate root
pub use glam;
