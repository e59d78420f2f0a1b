//! Light and camera followers that ride a [`CurvePath`] at constant speed.

use crate::curve::{CurvePath, PathPoint};
use crate::lights::SpotLight;
use engine_core::{clamp_or, safe_normalize, try_safe_normalize, NORMALIZE_EPSILON_SQ};
use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Tour speed bounds in world units per second.
pub const MAX_TOUR_SPEED: f32 = 5.0;
/// Camera look-ahead bounds in world units.
pub const LOOK_AHEAD_RANGE: (f32, f32) = (0.1, 8.0);
pub const DEFAULT_LOOK_AHEAD: f32 = 2.0;
/// Above this `|forward · up|` the camera basis switches its up reference.
const COLINEAR_LIMIT: f32 = 0.95;

/// Progress of one follower along the shared path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathState {
    /// Arc-length distance from the path start, kept in `[0, total_length)`.
    #[serde(skip)]
    pub distance: f32,
    pub speed: f32,
    pub aim_at_target: bool,
    pub target: Vec3,
}

impl Default for PathState {
    fn default() -> Self {
        Self {
            distance: 0.0,
            speed: 0.6,
            aim_at_target: true,
            target: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

impl PathState {
    /// Advance by `speed * dt`, wrap, and sample. Leaves the distance
    /// untouched when the path is not ready.
    pub fn advance(&mut self, dt: f32, path: &CurvePath) -> Option<PathPoint> {
        if !path.is_ready() {
            return None;
        }
        let speed = if self.speed.is_finite() {
            self.speed.clamp(0.0, MAX_TOUR_SPEED)
        } else {
            0.0
        };
        self.distance = path.wrap_distance(self.distance + speed * dt);
        path.sample_at_distance(self.distance)
    }
}

/// Moves a light along the path and keeps it aimed.
#[derive(Debug, Clone, Default)]
pub struct LightFollower {
    pub enabled: bool,
    pub state: PathState,
}

impl LightFollower {
    /// Advance and write the light's position and direction.
    ///
    /// Aiming at the target uses `target - position`; otherwise the light
    /// looks back along the path (`-tangent`). A degenerate aim vector keeps
    /// the previous direction. Returns `false` when the path is not ready.
    pub fn step(&mut self, dt: f32, path: &CurvePath, light: &mut SpotLight) -> bool {
        let Some(point) = self.state.advance(dt, path) else {
            return false;
        };

        light.position = point.position;
        let aim = if self.state.aim_at_target {
            self.state.target - point.position
        } else {
            -point.tangent
        };
        if let Some(direction) = try_safe_normalize(aim) {
            light.direction = direction;
        }
        true
    }
}

/// Camera placement for an orbit-style camera rig: where it looks, from how
/// far, and with which orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera position on the path.
    pub eye: Vec3,
    pub look_at: Vec3,
    /// Eye to look-at distance.
    pub distance: f32,
    /// Basis with columns (right, up, forward).
    pub orientation: Quat,
    /// `orientation` as XYZ Euler angles in radians.
    pub euler: Vec3,
}

impl CameraPose {
    /// Camera forward direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// Camera up direction.
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Right-handed view matrix for this pose.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.look_at, self.up())
    }
}

/// Moves a camera along the path, looking at the target or ahead along
/// the curve.
#[derive(Debug, Clone)]
pub struct CameraFollower {
    pub enabled: bool,
    pub state: PathState,
    pub look_ahead: f32,
}

impl Default for CameraFollower {
    fn default() -> Self {
        Self {
            enabled: false,
            state: PathState::default(),
            look_ahead: DEFAULT_LOOK_AHEAD,
        }
    }
}

impl CameraFollower {
    /// Advance and build the pose. `None` while the path is not ready.
    pub fn step(&mut self, dt: f32, path: &CurvePath) -> Option<CameraPose> {
        let point = self.state.advance(dt, path)?;
        Some(self.pose_at(point))
    }

    fn pose_at(&self, point: PathPoint) -> CameraPose {
        let position = point.position;
        let tangent = safe_normalize(point.tangent, Vec3::Z);

        let mut look_at = if self.state.aim_at_target {
            self.state.target
        } else {
            let (min, max) = LOOK_AHEAD_RANGE;
            position + tangent * clamp_or(self.look_ahead, min, max, DEFAULT_LOOK_AHEAD)
        };

        let mut to_target = look_at - position;
        if to_target.length_squared() < NORMALIZE_EPSILON_SQ {
            to_target = Vec3::Z;
            look_at = position + to_target;
        }
        let distance = to_target.length();
        let forward = to_target / distance;

        let world_up = if forward.dot(Vec3::Y).abs() > COLINEAR_LIMIT {
            Vec3::X
        } else {
            Vec3::Y
        };
        let right = world_up.cross(forward).normalize();
        let up = forward.cross(right).normalize();

        let orientation = Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize();
        let (x, y, z) = orientation.to_euler(EulerRot::XYZ);

        CameraPose {
            eye: position,
            look_at,
            distance,
            orientation,
            euler: Vec3::new(x, y, z),
        }
    }
}
