/// Mesh - GPU vertex and index buffers drawn as one indexed call

use std::sync::Arc;
use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::graphics_device::{Buffer, BufferDesc, BufferUsage, GraphicsDevice, IndexType};
use crate::model::Model;
use crate::program::ActiveProgram;

/// Indexed triangle mesh with `vec3` positions
pub struct Mesh {
    label: String,
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Arc<dyn Buffer>,
    index_count: u32,
    transform: Mat4,
}

impl Mesh {
    /// Upload `positions` and `indices` to the device
    pub fn upload(
        device: &mut dyn GraphicsDevice,
        label: &str,
        positions: &[Vec3],
        indices: &[u32],
    ) -> Result<Self> {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(positions);
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);

        let vertex_buffer = device.create_buffer(BufferDesc {
            label: format!("{}.vertices", label),
            size: vertex_bytes.len() as u64,
            usage: BufferUsage::Vertex,
        }, vertex_bytes)?;
        let index_buffer = device.create_buffer(BufferDesc {
            label: format!("{}.indices", label),
            size: index_bytes.len() as u64,
            usage: BufferUsage::Index,
        }, index_bytes)?;

        Ok(Self {
            label: label.to_string(),
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            transform: Mat4::IDENTITY,
        })
    }

    /// Same mesh placed with `transform`
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

impl Model for Mesh {
    fn draw(&self, program: &mut ActiveProgram<'_>) -> Result<()> {
        let cmd = program.command_list();
        cmd.bind_vertex_buffer(&self.vertex_buffer, 0)?;
        cmd.bind_index_buffer(&self.index_buffer, 0, IndexType::U32)?;
        cmd.draw_indexed(self.index_count, 0, 0)
    }

    fn model_matrix(&self) -> Mat4 {
        self.transform
    }
}
