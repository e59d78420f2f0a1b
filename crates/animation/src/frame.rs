//! Per-frame render data handed to the renderer by value.

use crate::day_night::SceneLighting;
use crate::follow::CameraPose;
use crate::lights::LightUniforms;
use crate::particles::ParticleCloud;
use engine_core::Transform;
use glam::{Mat4, Vec3};
use procgen::WindmillMeshes;

/// Marker scale for Bezier corner points.
pub const CORNER_MARKER_SCALE: f32 = 0.12;
/// Handles are drawn slightly smaller than corners.
pub const HANDLE_MARKER_SCALE: f32 = CORNER_MARKER_SCALE * 0.8;
pub const LIGHT_MARKER_SCALE: f32 = 0.1;

pub const CORNER_MARKER_COLOR: Vec3 = Vec3::new(0.2, 0.7, 1.0);
pub const HANDLE_MARKER_COLOR: Vec3 = Vec3::new(1.0, 0.3, 0.6);
pub const PATH_COLOR: Vec3 = Vec3::new(0.95, 0.55, 0.15);

/// A small box drawn at a point of interest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    pub scale: f32,
    pub color: Vec3,
}

impl Marker {
    /// Create a marker.
    pub fn new(position: Vec3, scale: f32, color: Vec3) -> Self {
        Self { position, scale, color }
    }

    /// Model matrix for the marker cube.
    pub fn model(&self) -> Mat4 {
        Transform::from_position_uniform_scale(self.position, self.scale).to_matrix()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindmillFrame {
    pub body_model: Mat4,
    pub rotor_model: Mat4,
    /// Present only on frames where the meshes were rebuilt.
    pub rebuilt_meshes: Option<WindmillMeshes>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindReadout {
    pub heading: Vec3,
    pub strength: f32,
    pub arrow_model: Mat4,
    pub arrow_color: Vec3,
}

/// The tour path as a line strip plus its edit handles.
#[derive(Debug, Clone, PartialEq)]
pub struct PathOverlay {
    pub line_strip: Vec<Vec3>,
    pub color: Vec3,
    pub control_markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub windmill: WindmillFrame,
    pub particles: ParticleCloud,
    /// `None` when curve display is off or the path has no samples.
    pub path: Option<PathOverlay>,
    pub light_markers: Vec<Marker>,
    pub lights: LightUniforms,
    pub lighting: SceneLighting,
    pub wind: WindReadout,
    /// Set while the camera tour is driving the view.
    pub camera: Option<CameraPose>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_model_translates_and_scales() {
        let marker = Marker::new(Vec3::new(1.0, 2.0, 3.0), 0.5, CORNER_MARKER_COLOR);
        let model = marker.model();
        assert_eq!(model.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(model.transform_vector3(Vec3::X), Vec3::new(0.5, 0.0, 0.0));
    }
}
