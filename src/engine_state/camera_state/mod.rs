//! # Camera State Management
//!
//! Holds the look-at camera and projection used for offscreen frames and produces the
//! view-projection matrix the renderer uploads each frame.

use cgmath::{Deg, Matrix4, Point3};

use super::voxels::chunk::CHUNK_DIMENSION;

pub mod camera;

use camera::{Camera, CameraUniform, Projection};

/// Vertical field of view of the default projection.
pub const DEFAULT_FOVY_DEGREES: f32 = 60.0;
/// Near clipping plane of the default projection.
pub const DEFAULT_ZNEAR: f32 = 0.1;
/// Far clipping plane of the default projection.
pub const DEFAULT_ZFAR: f32 = 2000.0;

/// The camera together with its projection.
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: Camera,
    /// The projection for the current render target
    pub projection: Projection,
}

impl CameraState {
    /// Creates a camera state for a `width` x `height` target.
    pub fn new(eye: [f32; 3], target: [f32; 3], width: u32, height: u32) -> Self {
        Self {
            camera: Camera::new(eye, target),
            projection: Projection::new(
                width,
                height,
                Deg(DEFAULT_FOVY_DEGREES),
                DEFAULT_ZNEAR,
                DEFAULT_ZFAR,
            ),
        }
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.calc_matrix()
    }

    /// Uniform data for the current matrices.
    pub fn uniform(&self) -> CameraUniform {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&self.camera, &self.projection);
        uniform
    }

    /// Updates the aspect ratio after the render target changed size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Chunk coordinates containing the camera.
    pub fn chunk_position(&self) -> Point3<i32> {
        let eye = self.camera.eye;
        let dimension = CHUNK_DIMENSION as f32;
        Point3::new(
            (eye.x / dimension).floor() as i32,
            (eye.y / dimension).floor() as i32,
            (eye.z / dimension).floor() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_position_floors_negative_coordinates() {
        let state = CameraState::new([-1.0, 31.9, 64.0], [0.0, 0.0, 0.0], 800, 600);
        assert_eq!(state.chunk_position(), Point3::new(-1, 0, 2));
    }

    #[test]
    fn test_uniform_matches_view_proj() {
        let state = CameraState::new([96.0, 80.0, 96.0], [0.0, 0.0, 0.0], 800, 600);
        let expected: [[f32; 4]; 4] = state.view_proj().into();
        assert_eq!(state.uniform().view_proj, expected);
    }
}
