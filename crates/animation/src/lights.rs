//! Scene lights, the tour follower selection, and uniform packing.

use crate::curve::CurvePath;
use engine_core::{safe_normalize_with, try_safe_normalize};
use glam::Vec3;

/// Most lights the shader accepts.
pub const MAX_LIGHTS: usize = 8;

/// Directions shorter than this are replaced with straight down on upload.
const DIRECTION_EPSILON: f32 = 1e-4;

const MARKER_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.0);
const SELECTED_MARKER_COLOR: Vec3 = Vec3::new(1.0, 0.8, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub color: Vec3,
    pub direction: Vec3,
    pub is_spotlight: bool,
    pub spot_cos_cutoff: f32,
    pub spot_softness: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            color: Vec3::ONE,
            direction: Vec3::NEG_Y,
            is_spotlight: false,
            spot_cos_cutoff: 0.9,
            spot_softness: 0.1,
        }
    }
}

impl SpotLight {
    /// Point the light at `target` unless it sits on top of it.
    pub fn aim_at(&mut self, target: Vec3) {
        if let Some(direction) = try_safe_normalize(target - self.position) {
            self.direction = direction;
        }
    }
}

/// Light arrays in the layout the lighting shader consumes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightUniforms {
    pub count: usize,
    pub positions: [Vec3; MAX_LIGHTS],
    pub colors: [Vec3; MAX_LIGHTS],
    pub directions: [Vec3; MAX_LIGHTS],
    pub spot_cos_cutoff: [f32; MAX_LIGHTS],
    pub spot_softness: [f32; MAX_LIGHTS],
    pub is_spotlight: [i32; MAX_LIGHTS],
}

/// The light list, which one is selected in the editor, and which one rides
/// the tour.
#[derive(Debug, Clone)]
pub struct LightRig {
    lights: Vec<SpotLight>,
    selected: usize,
    follower: usize,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            lights: vec![SpotLight::default()],
            selected: 0,
            follower: 0,
        }
    }
}

impl LightRig {
    /// Get all lights.
    pub fn lights(&self) -> &[SpotLight] {
        &self.lights
    }

    /// Get all lights for editing.
    pub fn lights_mut(&mut self) -> &mut [SpotLight] {
        &mut self.lights
    }

    /// Index of the light selected in the editor.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Follower index, clamped into the current list.
    pub fn follower_index(&self) -> usize {
        self.follower.min(self.lights.len().saturating_sub(1))
    }

    /// Choose which light rides the tour; clamped on use.
    pub fn set_follower_index(&mut self, index: usize) {
        self.follower = index;
    }

    /// The light driven by the tour, if any light exists.
    pub fn follower_mut(&mut self) -> Option<&mut SpotLight> {
        let index = self.follower_index();
        self.follower = index;
        self.lights.get_mut(index)
    }

    /// Back to a single default light, snapped onto the start of `path` and
    /// optionally aimed at `target`.
    pub fn reset(&mut self, path: &CurvePath, aim_target: Option<Vec3>) {
        let mut light = SpotLight::default();
        if let Some(first) = path.samples().first() {
            light.position = first.position;
            if let Some(target) = aim_target {
                light.aim_at(target);
            }
        }
        self.lights.clear();
        self.lights.push(light);
        self.selected = 0;
        self.follower = 0;
    }

    /// Add a light and select it. Returns `false` once the shader limit is hit.
    pub fn add_light(&mut self, light: SpotLight) -> bool {
        if self.lights.len() >= MAX_LIGHTS {
            return false;
        }
        self.lights.push(light);
        self.selected = self.lights.len() - 1;
        true
    }

    /// Remove the selected light; the last remaining light is kept.
    pub fn remove_selected(&mut self) -> Option<SpotLight> {
        if self.lights.len() <= 1 {
            return None;
        }
        let removed = self.lights.remove(self.selected);
        self.selected = self.selected.min(self.lights.len() - 1);
        self.follower = self.follower_index();
        Some(removed)
    }

    /// Select the next light, wrapping around.
    pub fn select_next(&mut self) {
        if !self.lights.is_empty() {
            self.selected = (self.selected + 1) % self.lights.len();
        }
    }

    /// Select the previous light, wrapping around.
    pub fn select_previous(&mut self) {
        if self.lights.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.lights.len() - 1
        } else {
            self.selected - 1
        };
    }

    /// Marker position and colour per light; the selected one is highlighted.
    pub fn marker_colors(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.lights.iter().enumerate().map(move |(i, light)| {
            let color = if i == self.selected {
                SELECTED_MARKER_COLOR
            } else {
                MARKER_COLOR
            };
            (light.position, color)
        })
    }

    /// Pack up to [`MAX_LIGHTS`] lights with sanitized directions and spot
    /// parameters.
    pub fn uniforms(&self) -> LightUniforms {
        let mut uniforms = LightUniforms {
            count: self.lights.len().min(MAX_LIGHTS),
            ..Default::default()
        };
        for (i, light) in self.lights.iter().take(MAX_LIGHTS).enumerate() {
            uniforms.positions[i] = light.position;
            uniforms.colors[i] = light.color;
            uniforms.directions[i] =
                safe_normalize_with(light.direction, DIRECTION_EPSILON * DIRECTION_EPSILON, Vec3::NEG_Y);
            uniforms.spot_cos_cutoff[i] = light.spot_cos_cutoff.clamp(0.0, 1.0);
            uniforms.spot_softness[i] = light.spot_softness.clamp(0.0, 1.0);
            uniforms.is_spotlight[i] = light.is_spotlight as i32;
        }
        uniforms
    }
}
