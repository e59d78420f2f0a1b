//! The animation state owned by the host and ticked once per frame.

use crate::curve::{BezierSegment, ControlPoint, CurvePath};
use crate::day_night::DayNightCycle;
use crate::follow::{CameraFollower, CameraPose, LightFollower};
use crate::frame::{
    FrameOutput, Marker, PathOverlay, WindReadout, WindmillFrame, CORNER_MARKER_COLOR,
    CORNER_MARKER_SCALE, HANDLE_MARKER_COLOR, HANDLE_MARKER_SCALE, LIGHT_MARKER_SCALE, PATH_COLOR,
};
use crate::lights::LightRig;
use crate::particles::{ParticleSettings, WindParticles};
use crate::rotor::WindmillRig;
use crate::wind::{WindField, DEFAULT_ARROW_SCALE};
use glam::Vec3;
use rand::prelude::*;

/// Seed used for the particle generator unless the host picks one.
pub const DEFAULT_PARTICLE_SEED: u64 = 1337;

/// View toggles for the path overlay and the wind arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayOptions {
    pub show_curve: bool,
    pub show_control_points: bool,
    pub wind_arrow_scale: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_curve: false,
            show_control_points: false,
            wind_arrow_scale: DEFAULT_ARROW_SCALE,
        }
    }
}

/// One control-point move from the path editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathEdit {
    pub segment: usize,
    pub point: ControlPoint,
    pub position: Vec3,
}

/// Everything that changes from frame to frame.
///
/// Owns the tour path and every simulated component; the host writes
/// settings into the public fields and calls [`tick`](Self::tick), then
/// reads a [`FrameOutput`].
pub struct AnimationState<R = StdRng> {
    pub path: CurvePath,
    pub lights: LightRig,
    pub light_tour: LightFollower,
    pub camera_tour: CameraFollower,
    pub wind: WindField,
    pub particles: WindParticles<R>,
    pub day_night: DayNightCycle,
    pub windmill: WindmillRig,
    pub display: DisplayOptions,
    camera_pose: Option<CameraPose>,
}

impl Default for AnimationState<StdRng> {
    fn default() -> Self {
        Self::new(DEFAULT_PARTICLE_SEED)
    }
}

impl AnimationState<StdRng> {
    /// Default scene with a seeded particle generator.
    pub fn new(particle_seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(particle_seed))
    }
}

impl<R: Rng> AnimationState<R> {
    /// Default scene around the tour loop, with particles drawn from `rng`.
    pub fn with_rng(rng: R) -> Self {
        let mut state = Self {
            path: CurvePath::tour_loop(),
            lights: LightRig::default(),
            light_tour: LightFollower::default(),
            camera_tour: CameraFollower::default(),
            wind: WindField::default(),
            particles: WindParticles::with_rng(ParticleSettings::default(), rng),
            day_night: DayNightCycle::default(),
            windmill: WindmillRig::default(),
            display: DisplayOptions::default(),
            camera_pose: None,
        };
        state.reset_lights();
        state
    }

    /// Advance one frame: day-night, wind, camera tour, light tour,
    /// particles, then the rotor.
    pub fn tick(&mut self, dt: f32) {
        self.day_night.tick(dt);
        self.wind.tick(dt);

        if self.camera_tour.enabled {
            self.step_camera(dt);
        }
        if self.light_tour.enabled {
            self.step_light(dt);
        }

        self.particles
            .tick(dt, self.wind.sample(), self.windmill.ground_height());

        self.windmill.rebuild_if_dirty();
        self.windmill.spin(dt, self.wind.strength());
    }

    fn step_camera(&mut self, dt: f32) {
        // Both tours share one target
        self.camera_tour.state.target = self.light_tour.state.target;
        if let Some(pose) = self.camera_tour.step(dt, &self.path) {
            self.camera_pose = Some(pose);
        }
    }

    fn step_light(&mut self, dt: f32) -> bool {
        match self.lights.follower_mut() {
            Some(light) => self.light_tour.step(dt, &self.path, light),
            None => false,
        }
    }

    /// Point both tours at `target`.
    pub fn set_tour_target(&mut self, target: Vec3) {
        self.light_tour.state.target = target;
        self.camera_tour.state.target = target;
    }

    /// Move one control point and resync everything that rides the path.
    ///
    /// The tour light is snapped onto the edited curve even while the light
    /// tour is paused. Returns `false` for an out-of-range segment.
    pub fn edit_path(&mut self, edit: PathEdit) -> bool {
        if !self.path.set_control_point(edit.segment, edit.point, edit.position) {
            return false;
        }
        self.after_path_change();
        true
    }

    /// Swap in a new set of segments.
    pub fn replace_path(&mut self, segments: Vec<BezierSegment>) {
        self.path.set_segments(segments);
        self.after_path_change();
    }

    fn after_path_change(&mut self) {
        self.light_tour.state.distance = self.path.wrap_distance(self.light_tour.state.distance);
        self.camera_tour.state.distance = self.path.wrap_distance(self.camera_tour.state.distance);
        if !self.path.samples().is_empty() {
            self.step_light(0.0);
        }
        if self.camera_tour.enabled {
            self.step_camera(0.0);
        }
    }

    /// Turning the camera tour on starts it where the light tour is.
    pub fn set_camera_tour_enabled(&mut self, enabled: bool) {
        let was_enabled = self.camera_tour.enabled;
        self.camera_tour.enabled = enabled;
        if enabled && !was_enabled {
            self.camera_tour.state.distance = self.light_tour.state.distance;
            log::debug!("Camera tour enabled at distance {:.3}", self.camera_tour.state.distance);
        }
        self.refresh_camera();
    }

    /// Move the camera tour to the light tour's distance.
    pub fn align_camera_with_light_tour(&mut self) {
        self.camera_tour.state.distance = self.path.wrap_distance(self.light_tour.state.distance);
        self.refresh_camera();
    }

    fn refresh_camera(&mut self) {
        if self.camera_tour.enabled {
            self.step_camera(0.0);
        } else {
            self.camera_pose = None;
        }
    }

    /// Back to one light at the start of the path, aimed at the tour target
    /// when aiming is on.
    pub fn reset_lights(&mut self) {
        let target = self
            .light_tour
            .state
            .aim_at_target
            .then_some(self.light_tour.state.target);
        self.lights.reset(&self.path, target);
    }

    /// Last pose written by the camera tour, while it is enabled.
    pub fn camera_pose(&self) -> Option<CameraPose> {
        if self.camera_tour.enabled {
            self.camera_pose
        } else {
            None
        }
    }

    /// Snapshot for the renderer. Rebuilt windmill meshes are handed over
    /// once and then cleared.
    pub fn frame_output(&mut self) -> FrameOutput {
        let body_orientation = self.wind.body_orientation();
        let windmill = WindmillFrame {
            body_model: self.windmill.body_model(),
            rotor_model: self.windmill.rotor_model(body_orientation),
            rebuilt_meshes: self.windmill.take_rebuilt_meshes(),
        };

        let (arrow_model, arrow_color) = self
            .wind
            .indicator(self.windmill.stack_height(), self.display.wind_arrow_scale);
        let wind = WindReadout {
            heading: self.wind.heading(),
            strength: self.wind.strength(),
            arrow_model,
            arrow_color,
        };

        let light_markers = self
            .lights
            .marker_colors()
            .map(|(position, color)| Marker::new(position, LIGHT_MARKER_SCALE, color))
            .collect();

        FrameOutput {
            windmill,
            particles: self.particles.cloud(),
            path: self.path_overlay(),
            light_markers,
            lights: self.lights.uniforms(),
            lighting: self.day_night.lighting(),
            wind,
            camera: self.camera_pose(),
        }
    }

    fn path_overlay(&self) -> Option<PathOverlay> {
        if !self.display.show_curve {
            return None;
        }
        let line_strip = self.path.line_strip()?;

        let mut control_markers = Vec::new();
        if self.display.show_control_points {
            control_markers.extend(
                self.path
                    .corner_points()
                    .into_iter()
                    .map(|p| Marker::new(p, CORNER_MARKER_SCALE, CORNER_MARKER_COLOR)),
            );
            control_markers.extend(
                self.path
                    .handle_points()
                    .into_iter()
                    .map(|p| Marker::new(p, HANDLE_MARKER_SCALE, HANDLE_MARKER_COLOR)),
            );
        }

        Some(PathOverlay {
            line_strip,
            color: PATH_COLOR,
            control_markers,
        })
    }
}
