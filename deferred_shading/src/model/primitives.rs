/// Procedural light-volume geometry
///
/// Both primitives wind their triangles counter-clockwise when seen from the
/// side their normals point to: outward for the sphere, toward +Z for the
/// quad.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::GraphicsDevice;
use crate::model::{Mesh, Model, ModelLoader};

/// Vertex positions and triangle indices
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

/// UV sphere of radius 1 centered at the origin
///
/// `rings` latitude bands (>= 2) and `segments` longitude bands (>= 3).
pub fn unit_sphere(rings: u32, segments: u32) -> MeshData {
    let rings = rings.max(2);
    let segments = segments.max(3);

    let mut positions = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for r in 0..=rings {
        let theta = std::f32::consts::PI * r as f32 / rings as f32;
        for s in 0..=segments {
            let phi = std::f32::consts::TAU * s as f32 / segments as f32;
            positions.push(Vec3::new(
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin(),
            ));
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);
    for r in 0..rings {
        for s in 0..segments {
            let i0 = r * stride + s;
            let i1 = (r + 1) * stride + s;
            let i2 = (r + 1) * stride + s + 1;
            let i3 = r * stride + s + 1;
            indices.extend_from_slice(&[i0, i2, i1, i0, i3, i2]);
        }
    }

    MeshData { positions, indices }
}

/// Quad covering clip space `[-1, 1]^2` at depth 0
pub fn fullscreen_quad() -> MeshData {
    MeshData {
        positions: vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// Shape served for a registered path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeShape {
    Sphere { rings: u32, segments: u32 },
    FullscreenQuad,
}

impl VolumeShape {
    pub fn mesh_data(&self) -> MeshData {
        match self {
            VolumeShape::Sphere { rings, segments } => unit_sphere(*rings, *segments),
            VolumeShape::FullscreenQuad => fullscreen_quad(),
        }
    }
}

/// Model loader that generates light volumes instead of reading files
///
/// Each registered path maps to a procedural shape; any other path is a
/// missing asset.
#[derive(Debug, Clone, Default)]
pub struct ProceduralVolumeLoader {
    shapes: FxHashMap<PathBuf, VolumeShape>,
}

impl ProceduralVolumeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `shape` for `path`
    pub fn with_shape(mut self, path: impl Into<PathBuf>, shape: VolumeShape) -> Self {
        self.shapes.insert(path.into(), shape);
        self
    }
}

impl ModelLoader for ProceduralVolumeLoader {
    fn load(&self, device: &mut dyn GraphicsDevice, path: &Path) -> Result<Arc<dyn Model>> {
        let shape = self.shapes.get(path).ok_or_else(|| Error::MissingAsset {
            path: path.display().to_string(),
            reason: "no procedural shape registered for this path".to_string(),
        })?;
        let data = shape.mesh_data();
        let mesh = Mesh::upload(device, &path.display().to_string(), &data.positions, &data.indices)?;
        Ok(Arc::new(mesh))
    }
}

#[cfg(test)]
#[path = "primitives_tests.rs"]
mod tests;
