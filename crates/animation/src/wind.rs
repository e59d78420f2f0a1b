//! Gusting wind: a two-sine gust signal smoothed into a scalar strength and a
//! heading set from a user angle.

use engine_core::{clamp_or, frame_blend, safe_normalize, Transform};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Smoothed strength is kept in this range while gusts are on.
pub const STRENGTH_RANGE: (f32, f32) = (0.05, 4.0);
/// Time offset applied to the secondary gust wave, seconds.
pub const SECONDARY_PHASE_OFFSET: f32 = 2.37;
/// Blend rate toward the gust target, per second.
const SMOOTHING_RATE: f32 = 2.0;
/// User arrow scale bounds.
pub const ARROW_SCALE_RANGE: (f32, f32) = (0.2, 5.0);
pub const DEFAULT_ARROW_SCALE: f32 = 1.8;
/// Yaw offset between the windmill model's forward axis and +Z, degrees.
const MODEL_FORWARD_YAW_OFFSET_DEG: f32 = -90.0;

const ARROW_CALM_COLOR: Vec3 = Vec3::new(0.25, 0.65, 1.0);
const ARROW_GUST_COLOR: Vec3 = Vec3::new(1.0, 0.85, 0.2);

/// Wind indicator arrow as a line list pointing along +Z.
pub const ARROW_LINES: [Vec3; 6] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.12, 0.0, 0.85),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(-0.12, 0.0, 0.85),
];

/// User-facing wind parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    /// Heading in degrees; 0 blows along +Z, 90 along +X.
    pub heading_deg: f32,
    pub gusts_enabled: bool,
    pub base_strength: f32,
    pub gust_amplitude: f32,
    /// Primary gust frequency, Hz.
    pub gust_frequency: f32,
    /// Secondary gust frequency, Hz.
    pub secondary_frequency: f32,
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            heading_deg: 0.0,
            gusts_enabled: true,
            base_strength: 0.7,
            gust_amplitude: 0.6,
            gust_frequency: 0.18,
            secondary_frequency: 0.05,
        }
    }
}

/// What downstream systems read from the wind each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSample {
    /// Unit vector in the XZ plane.
    pub heading: Vec3,
    pub strength: f32,
}

#[derive(Debug, Clone)]
pub struct WindField {
    settings: WindSettings,
    heading: Vec3,
    time: f32,
    strength: f32,
}

impl Default for WindField {
    fn default() -> Self {
        Self::new(WindSettings::default())
    }
}

impl WindField {
    /// Create a wind field at strength 1.
    pub fn new(settings: WindSettings) -> Self {
        Self {
            heading: heading_from_degrees(settings.heading_deg),
            settings,
            time: 0.0,
            strength: 1.0,
        }
    }

    /// Get the current settings.
    pub fn settings(&self) -> &WindSettings {
        &self.settings
    }

    /// Replace the settings; the heading is recomputed.
    pub fn set_settings(&mut self, settings: WindSettings) {
        self.settings = settings;
        self.heading = heading_from_degrees(settings.heading_deg);
    }

    /// Set the heading angle in degrees.
    pub fn set_heading_deg(&mut self, degrees: f32) {
        self.settings.heading_deg = degrees;
        self.heading = heading_from_degrees(degrees);
    }

    /// Unit heading in the XZ plane.
    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    /// Smoothed gust strength.
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Gust clock in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Heading and strength for downstream systems.
    pub fn sample(&self) -> WindSample {
        WindSample {
            heading: self.heading,
            strength: self.strength,
        }
    }

    /// Advance the gust clock and update the smoothed strength.
    ///
    /// With gusts off the strength snaps to the base strength. Otherwise it
    /// blends toward `max(0, base + amplitude * gust)` by `clamp(2 dt, 0, 1)`
    /// per frame and is clamped to [`STRENGTH_RANGE`].
    pub fn tick(&mut self, dt: f32) {
        let base = self.settings.base_strength.max(0.0);
        if !self.settings.gusts_enabled {
            self.strength = base;
            return;
        }

        self.time += dt;
        let target = (base + self.settings.gust_amplitude.max(0.0) * self.gust_signal()).max(0.0);

        self.strength = if dt > 0.0 {
            self.strength + (target - self.strength) * frame_blend(dt, SMOOTHING_RATE)
        } else {
            target
        };
        let (min, max) = STRENGTH_RANGE;
        self.strength = self.strength.clamp(min, max);
    }

    /// Normalized gust signal in `[0, 1]` at the current gust time.
    pub fn gust_signal(&self) -> f32 {
        let primary = TAU * self.settings.gust_frequency.max(0.01) * self.time;
        let secondary = TAU
            * self.settings.secondary_frequency.max(0.005)
            * (self.time + SECONDARY_PHASE_OFFSET);
        let blend = 0.5 * primary.sin() + 0.5 * secondary.sin();
        0.5 * (blend + 1.0)
    }

    /// Yaw that turns the windmill's front into the wind.
    pub fn body_yaw(&self) -> f32 {
        let facing = safe_normalize(-self.heading, Vec3::Z);
        facing.x.atan2(facing.z) + MODEL_FORWARD_YAW_OFFSET_DEG.to_radians()
    }

    /// Rotation that yaws the windmill into the wind.
    pub fn body_orientation(&self) -> Mat4 {
        Mat4::from_rotation_y(self.body_yaw())
    }

    /// Model matrix and colour of the wind arrow floating `0.8` above
    /// `stack_height`. Longer and warmer as the wind strengthens.
    pub fn indicator(&self, stack_height: f32, arrow_scale: f32) -> (Mat4, Vec3) {
        let strength = self.strength.clamp(0.1, 3.5);
        let (min, max) = ARROW_SCALE_RANGE;
        let scale = clamp_or(arrow_scale, min, max, DEFAULT_ARROW_SCALE) * (0.7 + 0.3 * strength);
        let model = Transform::from_position_uniform_scale(Vec3::new(0.0, stack_height + 0.8, 0.0), scale)
            .with_rotation(Quat::from_rotation_y(self.heading.x.atan2(self.heading.z)))
            .to_matrix();
        let gust_blend = ((strength - 1.0) / 2.0).clamp(0.0, 1.0);
        (model, ARROW_CALM_COLOR.lerp(ARROW_GUST_COLOR, gust_blend))
    }
}

/// Unit XZ heading for an angle in degrees.
pub fn heading_from_degrees(degrees: f32) -> Vec3 {
    let yaw = degrees.to_radians();
    safe_normalize(Vec3::new(yaw.sin(), 0.0, yaw.cos()), Vec3::Z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_from_angle() {
        assert!((heading_from_degrees(0.0) - Vec3::Z).length() < 1e-6);
        assert!((heading_from_degrees(90.0) - Vec3::X).length() < 1e-6);
        assert!((heading_from_degrees(-180.0) - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(heading_from_degrees(f32::NAN), Vec3::Z);
    }

    #[test]
    fn constant_target_without_gust_amplitude() {
        let mut wind = WindField::new(WindSettings {
            gust_amplitude: 0.0,
            ..Default::default()
        });
        for _ in 0..2000 {
            wind.tick(1.0 / 60.0);
        }
        assert!((wind.strength() - 0.7).abs() < 1e-5);

        // A full-weight blend lands exactly on the target
        wind.tick(0.5);
        assert_eq!(wind.strength(), 0.7);
    }

    #[test]
    fn disabled_gusts_snap_to_base() {
        let mut wind = WindField::new(WindSettings {
            gusts_enabled: false,
            base_strength: 1.3,
            ..Default::default()
        });
        wind.tick(0.016);
        assert_eq!(wind.strength(), 1.3);
        assert_eq!(wind.time(), 0.0);

        wind.set_settings(WindSettings {
            gusts_enabled: false,
            base_strength: -2.0,
            ..Default::default()
        });
        wind.tick(0.016);
        assert_eq!(wind.strength(), 0.0);
    }

    #[test]
    fn strength_stays_in_range() {
        let mut wind = WindField::new(WindSettings {
            base_strength: 10.0,
            gust_amplitude: 5.0,
            ..Default::default()
        });
        for _ in 0..600 {
            wind.tick(0.1);
            let (min, max) = STRENGTH_RANGE;
            assert!(wind.strength() >= min && wind.strength() <= max);
        }
        assert_eq!(wind.strength(), STRENGTH_RANGE.1);
    }

    #[test]
    fn zero_dt_jumps_to_target() {
        let mut wind = WindField::default();
        wind.tick(0.0);
        let expected = 0.7 + 0.6 * wind.gust_signal();
        assert!((wind.strength() - expected).abs() < 1e-6);
    }

    #[test]
    fn gust_signal_is_normalized() {
        let mut wind = WindField::default();
        for _ in 0..1000 {
            wind.tick(0.05);
            let g = wind.gust_signal();
            assert!((0.0..=1.0).contains(&g));
        }
    }

    #[test]
    fn smoothing_moves_partway_toward_target() {
        let mut wind = WindField::new(WindSettings {
            gust_amplitude: 0.0,
            base_strength: 2.0,
            ..Default::default()
        });
        wind.tick(0.1);
        // 1.0 + (2.0 - 1.0) * 0.2
        assert!((wind.strength() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn body_turns_into_the_wind() {
        // The windmill model faces +X
        let mut wind = WindField::default();
        for degrees in [0.0, 45.0, 90.0, 200.0, -30.0] {
            wind.set_heading_deg(degrees);
            let front = wind.body_orientation().transform_vector3(Vec3::X);
            assert!((front + wind.heading()).length() < 1e-5, "heading {degrees}");
        }
    }

    #[test]
    fn nan_arrow_scale_uses_default() {
        let wind = WindField::default();
        let (nan_model, _) = wind.indicator(4.2, f32::NAN);
        let (default_model, _) = wind.indicator(4.2, DEFAULT_ARROW_SCALE);
        assert!(nan_model.is_finite());
        assert_eq!(nan_model, default_model);
    }

    #[test]
    fn indicator_scales_and_warms_with_strength() {
        let mut calm = WindField::new(WindSettings {
            gusts_enabled: false,
            base_strength: 0.5,
            ..Default::default()
        });
        calm.tick(0.1);
        let (calm_model, calm_color) = calm.indicator(4.2, 1.8);
        assert_eq!(calm_color, ARROW_CALM_COLOR);
        assert!((calm_model.w_axis.y - 5.0).abs() < 1e-5);

        let mut gusty = WindField::new(WindSettings {
            gusts_enabled: false,
            base_strength: 3.0,
            ..Default::default()
        });
        gusty.tick(0.1);
        let (gusty_model, gusty_color) = gusty.indicator(4.2, 1.8);
        assert!((gusty_color - ARROW_GUST_COLOR).length() < 1e-6);
        assert!(gusty_model.z_axis.length() > calm_model.z_axis.length());
    }
}
