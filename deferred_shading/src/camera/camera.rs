/// Camera - low-level passive data container.
///
/// The Camera computes nothing. The caller is responsible for computing and
/// setting the view matrix, projection matrix and eye position; the renderer
/// only reads them.

use glam::{Mat4, Vec3};

/// Low-level camera. A passive data container.
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
    position: Vec3,
}

impl Camera {
    /// Create a new camera.
    pub fn new(view: Mat4, projection: Mat4, position: Vec3) -> Self {
        Self {
            view_matrix: view,
            projection_matrix: projection,
            position,
        }
    }

    // ===== GETTERS =====

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    // ===== SETTERS =====

    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
