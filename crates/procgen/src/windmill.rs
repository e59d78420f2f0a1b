//! Procedural windmill: a static body (base + tower) and a rotor (hub + arms)
//! composed from transformed boxes.

use crate::mesh::{append_transformed, build_box, Material, MeshData};
use engine_core::clamp_or;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Smallest allowed box dimension.
pub const MIN_DIMENSION: f32 = 0.05;
/// Number of rotor arms.
pub const ARM_COUNT: u32 = 4;
/// Angle between consecutive arms, degrees.
pub const ARM_STEP_DEGREES: f32 = 90.0;
/// Hub offsets are clamped to +-this value.
pub const MAX_HUB_OFFSET: f32 = 5.0;
/// Rotor speed is clamped to +-this value (deg/s).
pub const MAX_ROTATION_SPEED: f32 = 720.0;

/// Tunable windmill shape. Every dimension is in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindmillParams {
    pub base_size: Vec3,
    pub tower_size: Vec3,
    pub hub_size: Vec3,
    pub hub_forward_offset: f32,
    pub hub_vertical_offset: f32,
    pub arm_length: f32,
    pub arm_width: f32,
    pub arm_thickness: f32,
    pub structure_color: Vec3,
    /// Rotor speed at wind strength 1.0.
    pub rotation_speed_deg_per_sec: f32,
}

impl Default for WindmillParams {
    fn default() -> Self {
        Self {
            base_size: Vec3::new(2.5, 1.0, 2.5),
            tower_size: Vec3::new(0.7, 3.2, 0.7),
            hub_size: Vec3::splat(0.55),
            hub_forward_offset: 0.4,
            hub_vertical_offset: 0.0,
            arm_length: 2.7,
            arm_width: 0.35,
            arm_thickness: 0.12,
            structure_color: Vec3::new(0.88, 0.88, 0.86),
            rotation_speed_deg_per_sec: 45.0,
        }
    }
}

impl WindmillParams {
    /// Clamp every field into its documented range.
    pub fn sanitize(&mut self) {
        let min_box = Vec3::splat(MIN_DIMENSION);
        self.base_size = max_finite(self.base_size, min_box);
        self.tower_size = max_finite(self.tower_size, min_box);
        self.hub_size = max_finite(self.hub_size, min_box);

        self.hub_forward_offset = clamp_finite(self.hub_forward_offset, -MAX_HUB_OFFSET, MAX_HUB_OFFSET);
        self.hub_vertical_offset = clamp_finite(self.hub_vertical_offset, -MAX_HUB_OFFSET, MAX_HUB_OFFSET);

        self.arm_length = max_finite_scalar(self.arm_length, MIN_DIMENSION);
        self.arm_width = max_finite_scalar(self.arm_width, MIN_DIMENSION * 0.5);
        self.arm_thickness = max_finite_scalar(self.arm_thickness, MIN_DIMENSION * 0.5);

        self.structure_color = Vec3::new(
            clamp_finite(self.structure_color.x, 0.0, 1.0),
            clamp_finite(self.structure_color.y, 0.0, 1.0),
            clamp_finite(self.structure_color.z, 0.0, 1.0),
        );
        self.rotation_speed_deg_per_sec =
            clamp_finite(self.rotation_speed_deg_per_sec, -MAX_ROTATION_SPEED, MAX_ROTATION_SPEED);
    }

    /// Sanitized copy.
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }

    /// Hub center in body space: on top of the tower, pushed forward.
    pub fn hub_position(&self) -> Vec3 {
        Vec3::new(
            0.0,
            self.base_size.y + self.tower_size.y + self.hub_vertical_offset,
            self.hub_forward_offset,
        )
    }

    /// Height of the top of the tower above the ground.
    pub fn stack_height(&self) -> f32 {
        self.base_size.y + self.tower_size.y
    }

    fn material(&self) -> Material {
        Material {
            diffuse: self.structure_color,
            specular: Vec3::splat(0.2),
            shininess: 32.0,
        }
    }
}

fn clamp_finite(value: f32, min: f32, max: f32) -> f32 {
    clamp_or(value, min, max, min.max(0.0).min(max))
}

fn max_finite_scalar(value: f32, min: f32) -> f32 {
    if value.is_finite() {
        value.max(min)
    } else {
        min
    }
}

fn max_finite(value: Vec3, min: Vec3) -> Vec3 {
    Vec3::new(
        max_finite_scalar(value.x, min.x),
        max_finite_scalar(value.y, min.y),
        max_finite_scalar(value.z, min.z),
    )
}

/// The two compound meshes of a windmill.
#[derive(Debug, Clone, PartialEq)]
pub struct WindmillMeshes {
    /// Base and tower, drawn with an identity model matrix.
    pub body: MeshData,
    /// Hub and arms around the local origin, drawn at the hub position.
    pub rotor: MeshData,
}

/// Build body and rotor meshes. Parameters are sanitized first; identical
/// inputs always give identical output.
pub fn build_windmill_meshes(params: &WindmillParams) -> WindmillMeshes {
    let params = params.sanitized();

    let mut body = MeshData::with_capacity(24 * 2, 12 * 2);
    let base = build_box(params.base_size);
    append_transformed(
        &mut body,
        &base,
        Mat4::from_translation(Vec3::new(0.0, params.base_size.y * 0.5, 0.0)),
    );
    let tower = build_box(params.tower_size);
    append_transformed(
        &mut body,
        &tower,
        Mat4::from_translation(Vec3::new(
            0.0,
            params.base_size.y + params.tower_size.y * 0.5,
            0.0,
        )),
    );

    let arm_count = ARM_COUNT as usize;
    let mut rotor = MeshData::with_capacity(24 * (arm_count + 1), 12 * (arm_count + 1));
    append_transformed(&mut rotor, &build_box(params.hub_size), Mat4::IDENTITY);

    let arm = build_box(Vec3::new(params.arm_length, params.arm_width, params.arm_thickness));
    let arm_offset = Mat4::from_translation(Vec3::new(params.arm_length * 0.5, 0.0, 0.0));
    for i in 0..ARM_COUNT {
        let angle = (ARM_STEP_DEGREES * i as f32).to_radians();
        append_transformed(&mut rotor, &arm, Mat4::from_rotation_z(angle) * arm_offset);
    }

    body.material = params.material();
    rotor.material = params.material();

    log::debug!(
        "Built windmill: body {} verts / {} tris, rotor {} verts / {} tris",
        body.vertex_count(),
        body.triangle_count(),
        rotor.vertex_count(),
        rotor.triangle_count()
    );

    WindmillMeshes { body, rotor }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_windmill_part_counts() {
        let meshes = build_windmill_meshes(&WindmillParams::default());
        assert_eq!(meshes.body.vertex_count(), 48);
        assert_eq!(meshes.body.triangle_count(), 24);
        assert_eq!(meshes.rotor.vertex_count(), 24 * 5);
        assert_eq!(meshes.rotor.triangle_count(), 12 * 5);
        assert!(meshes.body.indices_in_bounds());
        assert!(meshes.rotor.indices_in_bounds());
    }

    #[test]
    fn windmill_build_is_deterministic() {
        let params = WindmillParams {
            arm_length: 3.3,
            hub_forward_offset: -0.7,
            ..Default::default()
        };
        let a = build_windmill_meshes(&params);
        let b = build_windmill_meshes(&params);
        assert_eq!(a.body.vertex_bytes(), b.body.vertex_bytes());
        assert_eq!(a.rotor.vertex_bytes(), b.rotor.vertex_bytes());
        assert_eq!(a.rotor.indices(), b.rotor.indices());
    }

    #[test]
    fn body_sits_on_ground_and_reaches_tower_top() {
        let params = WindmillParams::default();
        let meshes = build_windmill_meshes(&params);
        let ys: Vec<f32> = meshes.body.vertices.iter().map(|v| v.position[1]).collect();
        let min_y = ys.iter().cloned().fold(f32::MAX, f32::min);
        let max_y = ys.iter().cloned().fold(f32::MIN, f32::max);
        assert!(min_y.abs() < 1e-6);
        assert!((max_y - params.stack_height()).abs() < 1e-5);
    }

    #[test]
    fn arms_are_spaced_a_quarter_turn_apart() {
        let params = WindmillParams::default();
        let meshes = build_windmill_meshes(&params);
        // Each arm's vertex centroid sits at arm_length / 2 along its direction
        let expected = [Vec3::X, Vec3::Y, Vec3::NEG_X, Vec3::NEG_Y];
        for (arm, dir) in meshes.rotor.vertices[24..].chunks(24).zip(expected) {
            let centroid = arm.iter().map(|v| Vec3::from_array(v.position)).sum::<Vec3>() / 24.0;
            assert!((centroid - dir * params.arm_length * 0.5).length() < 1e-4);
        }
    }

    #[test]
    fn sanitize_clamps_all_ranges() {
        let mut params = WindmillParams {
            base_size: Vec3::new(-1.0, 0.0, 10.0),
            hub_forward_offset: 12.0,
            hub_vertical_offset: -9.0,
            arm_length: 0.0,
            arm_width: 0.001,
            arm_thickness: f32::NAN,
            structure_color: Vec3::new(2.0, -1.0, 0.5),
            rotation_speed_deg_per_sec: 5000.0,
            ..Default::default()
        };
        params.sanitize();
        assert_eq!(params.base_size, Vec3::new(MIN_DIMENSION, MIN_DIMENSION, 10.0));
        assert_eq!(params.hub_forward_offset, MAX_HUB_OFFSET);
        assert_eq!(params.hub_vertical_offset, -MAX_HUB_OFFSET);
        assert_eq!(params.arm_length, MIN_DIMENSION);
        assert_eq!(params.arm_width, MIN_DIMENSION * 0.5);
        assert_eq!(params.arm_thickness, MIN_DIMENSION * 0.5);
        assert_eq!(params.structure_color, Vec3::new(1.0, 0.0, 0.5));
        assert_eq!(params.rotation_speed_deg_per_sec, MAX_ROTATION_SPEED);
    }

    #[test]
    fn degenerate_params_still_build_finite_meshes() {
        let params = WindmillParams {
            tower_size: Vec3::ZERO,
            arm_length: -4.0,
            ..Default::default()
        };
        let meshes = build_windmill_meshes(&params);
        assert!(meshes
            .body
            .vertices
            .iter()
            .chain(&meshes.rotor.vertices)
            .all(|v| Vec3::from_array(v.position).is_finite() && Vec3::from_array(v.normal).is_finite()));
    }

    #[test]
    fn hub_position_follows_offsets() {
        let params = WindmillParams {
            hub_vertical_offset: 0.5,
            hub_forward_offset: -1.0,
            ..Default::default()
        };
        assert_eq!(params.hub_position(), Vec3::new(0.0, 1.0 + 3.2 + 0.5, -1.0));
    }

    #[test]
    fn materials_use_structure_color() {
        let meshes = build_windmill_meshes(&WindmillParams::default());
        assert_eq!(meshes.body.material.diffuse, Vec3::new(0.88, 0.88, 0.86));
        assert_eq!(meshes.rotor.material, meshes.body.material);
        assert_eq!(meshes.rotor.material.shininess, 32.0);
    }
}
