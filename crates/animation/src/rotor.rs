//! Windmill instance: lazily rebuilt meshes plus the spinning rotor.

use engine_core::wrap_into;
use glam::{Mat4, Vec3};
use procgen::{build_windmill_meshes, WindmillMeshes, WindmillParams};
use std::f32::consts::TAU;

#[derive(Debug, Clone)]
pub struct WindmillRig {
    params: WindmillParams,
    meshes: WindmillMeshes,
    hub_position: Vec3,
    rotor_angle: f32,
    dirty: bool,
    /// Set after a rebuild until the renderer takes the new meshes.
    pending_upload: bool,
}

impl Default for WindmillRig {
    fn default() -> Self {
        Self::new(WindmillParams::default())
    }
}

impl WindmillRig {
    /// Create a rig with sanitized params; meshes are built immediately.
    pub fn new(params: WindmillParams) -> Self {
        let params = params.sanitized();
        Self {
            meshes: build_windmill_meshes(&params),
            hub_position: params.hub_position(),
            params,
            rotor_angle: 0.0,
            dirty: false,
            pending_upload: true,
        }
    }

    /// Get the current (sanitized) params.
    pub fn params(&self) -> &WindmillParams {
        &self.params
    }

    /// Store new parameters; meshes are rebuilt on the next
    /// [`rebuild_if_dirty`](Self::rebuild_if_dirty) if anything changed.
    pub fn set_params(&mut self, params: WindmillParams) {
        let params = params.sanitized();
        if params != self.params {
            self.params = params;
            self.dirty = true;
        }
    }

    /// Whether params changed since the last rebuild.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild meshes if params changed. Returns whether it rebuilt.
    pub fn rebuild_if_dirty(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.meshes = build_windmill_meshes(&self.params);
        self.hub_position = self.params.hub_position();
        self.dirty = false;
        self.pending_upload = true;
        log::debug!("Windmill rebuilt, hub at {:?}", self.hub_position);
        true
    }

    /// Get the current meshes.
    pub fn meshes(&self) -> &WindmillMeshes {
        &self.meshes
    }

    /// Meshes that changed since the last call, for re-upload.
    pub fn take_rebuilt_meshes(&mut self) -> Option<WindmillMeshes> {
        if std::mem::take(&mut self.pending_upload) {
            Some(self.meshes.clone())
        } else {
            None
        }
    }

    /// Hub center in body space.
    pub fn hub_position(&self) -> Vec3 {
        self.hub_position
    }

    /// Rotor angle in radians, in `[0, 2pi)`.
    pub fn rotor_angle(&self) -> f32 {
        self.rotor_angle
    }

    /// Spin at `rotation_speed * wind_strength` degrees per second, keeping
    /// the angle in `[0, 2pi)`.
    pub fn spin(&mut self, dt: f32, wind_strength: f32) {
        let speed = (self.params.rotation_speed_deg_per_sec * wind_strength).to_radians();
        if speed != 0.0 {
            self.rotor_angle = wrap_into(self.rotor_angle + speed * dt, TAU);
        }
    }

    /// Stack height used to place the wind indicator.
    pub fn stack_height(&self) -> f32 {
        self.params.stack_height()
    }

    /// Ground plane height the particle emitter sits on.
    pub fn ground_height(&self) -> f32 {
        self.params.base_size.y
    }

    /// Model matrix of the static body.
    pub fn body_model(&self) -> Mat4 {
        Mat4::IDENTITY
    }

    /// Model matrix of the rotor for the given body orientation.
    pub fn rotor_model(&self, body_orientation: Mat4) -> Mat4 {
        body_orientation
            * Mat4::from_translation(self.hub_position)
            * Mat4::from_rotation_z(self.rotor_angle)
    }
}
