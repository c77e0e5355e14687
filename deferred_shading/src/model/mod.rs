/// Model module - drawable contract, GPU meshes and light-volume primitives

pub mod model;
pub mod mesh;
pub mod primitives;

pub use model::*;
pub use mesh::*;
pub use primitives::*;
