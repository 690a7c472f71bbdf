//! # Camera Implementation
//!
//! - `Camera`: eye and target of a fixed look-at camera
//! - `Projection`: perspective projection settings
//! - `CameraUniform`: packed data structure for GPU shaders

use bytemuck::{Pod, Zeroable};
use cgmath::*;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// NDC range from -1 to 1 in X and Y, and 0 to 1 in Z. The matrix scales Z from
/// [-1, 1] to [-0.5, 0.5] and then translates it to [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A camera looking from `eye` at `target`, with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub eye: Point3<f32>,
    /// The point the camera looks at
    pub target: Point3<f32>,
}

impl Camera {
    /// Creates a camera at `eye` looking at `target`.
    pub fn new<E: Into<Point3<f32>>, T: Into<Point3<f32>>>(eye: E, target: T) -> Self {
        Self {
            eye: eye.into(),
            target: target.into(),
        }
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, Vector3::unit_y())
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Calculates the projection matrix.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Camera data laid out for the shader's uniform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix, column major
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// A uniform holding the identity matrix.
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    /// Recomputes the view-projection matrix.
    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(matrix: Matrix4<f32>, point: Point3<f32>) -> Vector3<f32> {
        let clip = matrix * point.to_homogeneous();
        Vector3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
    }

    #[test]
    fn test_target_projects_to_screen_centre() {
        let camera = Camera::new((96.0, 80.0, 96.0), (0.0, 0.0, 0.0));
        let projection = Projection::new(800, 600, Deg(60.0), 0.1, 1000.0);
        let ndc = project(projection.calc_matrix() * camera.calc_matrix(), camera.target);

        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_depth_range_is_zero_to_one() {
        let camera = Camera::new((0.0, 0.0, 0.0), (0.0, 0.0, -1.0));
        let projection = Projection::new(100, 100, Deg(90.0), 1.0, 10.0);
        let matrix = projection.calc_matrix() * camera.calc_matrix();

        let near = project(matrix, Point3::new(0.0, 0.0, -1.0));
        let far = project(matrix, Point3::new(0.0, 0.0, -10.0));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_is_one_matrix() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
        let uniform = CameraUniform::new();
        assert_eq!(uniform.view_proj[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(uniform.view_proj[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_zero_height_does_not_divide_by_zero() {
        let mut projection = Projection::new(640, 0, Deg(60.0), 0.1, 100.0);
        assert_eq!(projection.aspect(), 640.0);
        projection.resize(640, 480);
        assert!((projection.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }
}
