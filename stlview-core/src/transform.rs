/// Euler rotation state and the model → camera space transform
use nalgebra::{Matrix3, Point3};

use crate::geometry::Model;

/// Rotation state around three axes (in radians)
///
/// Angles are unbounded; they wrap naturally through sin/cos.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    /// Pitch
    pub x: f32,
    /// Yaw
    pub y: f32,
    /// Roll
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn rotation_x(theta: f32) -> Matrix3<f32> {
        let (s, c) = theta.sin_cos();
        Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, c, -s, //
            0.0, s, c,
        )
    }

    pub fn rotation_y(theta: f32) -> Matrix3<f32> {
        let (s, c) = theta.sin_cos();
        Matrix3::new(
            c, 0.0, s, //
            0.0, 1.0, 0.0, //
            -s, 0.0, c,
        )
    }

    pub fn rotation_z(theta: f32) -> Matrix3<f32> {
        let (s, c) = theta.sin_cos();
        Matrix3::new(
            c, -s, 0.0, //
            s, c, 0.0, //
            0.0, 0.0, 1.0,
        )
    }

    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix3<f32> {
        // Applied to a vector: X first, then Y, then Z
        Self::rotation_z(rotation.z) * Self::rotation_y(rotation.y) * Self::rotation_x(rotation.x)
    }

    /// Rotate `point` about `center`, leaving the result centred on the origin
    pub fn apply(matrix: &Matrix3<f32>, center: &Point3<f32>, point: &Point3<f32>) -> Point3<f32> {
        Point3::from(matrix * (point - center))
    }

    /// Move every vertex of the model into camera space: centred on the
    /// model's centre of gravity, then rotated.
    ///
    /// Triangle order and winding are preserved.
    pub fn to_camera_space(model: &Model, rotation: &RotationState) -> Vec<[Point3<f32>; 3]> {
        let matrix = Self::rotation_matrix(rotation);
        let center = model.center_of_gravity;
        model
            .mesh
            .triangles
            .iter()
            .map(|t| t.vertices.map(|v| Self::apply(&matrix, &center, &v)))
            .collect()
    }
}
