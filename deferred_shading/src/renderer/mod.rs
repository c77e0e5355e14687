/// Renderer module - target set, pass table and the deferred pass orchestrator

pub mod config;
pub mod frame;
pub mod pass_state;
pub mod render_target_set;
pub mod deferred_renderer;

pub use config::*;
pub use frame::*;
pub use pass_state::*;
pub use render_target_set::*;
pub use deferred_renderer::*;
