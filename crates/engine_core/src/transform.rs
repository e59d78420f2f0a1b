//! Transform values and utilities for placing scene parts.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Uniformly scaled transform at `position` (marker cubes, arrows).
    pub fn from_position_uniform_scale(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale: Vec3::splat(scale),
            ..Default::default()
        }
    }

    /// Same transform with `rotation` replaced.
    pub fn with_rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Forward direction (+Z, the model forward axis of scene parts).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Raw model matrix for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Transform> for TransformRaw {
    fn from(transform: &Transform) -> Self {
        Self::from(transform.to_matrix())
    }
}

impl From<Transform> for TransformRaw {
    fn from(transform: Transform) -> Self {
        Self::from(&transform)
    }
}

impl From<Mat4> for TransformRaw {
    fn from(matrix: Mat4) -> Self {
        Self {
            model: matrix.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_scale_matrix_places_and_scales() {
        let t = Transform::from_position_uniform_scale(Vec3::new(1.0, 2.0, 3.0), 0.5);
        let p = t.to_matrix().transform_point3(Vec3::ONE);
        assert!((p - Vec3::new(1.5, 2.5, 3.5)).length() < 1e-6);
    }

    #[test]
    fn yaw_turns_forward() {
        let t = Transform::from_position(Vec3::ONE)
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!((t.forward() - Vec3::X).length() < 1e-6);
        assert_eq!(t.position, Vec3::ONE);
    }

    #[test]
    fn raw_matches_column_layout() {
        let t = Transform::from_position(Vec3::new(4.0, 5.0, 6.0));
        let raw = TransformRaw::from(t);
        assert_eq!(raw.model[3], [4.0, 5.0, 6.0, 1.0]);
        assert_eq!(bytemuck::bytes_of(&raw).len(), 64);
    }
}
