//! Day-night cycle: a normalized time of day driving sun direction and a
//! smoothstep-eased blend between night and day palettes.

use engine_core::{safe_normalize, smoothstep, wrap_into};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Shortest allowed cycle, seconds.
pub const MIN_CYCLE_DURATION: f32 = 1.0;
/// Constant Z tilt of the sun arc so it never passes straight overhead.
const SUN_ARC_TILT: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightPalette {
    pub day_ambient: Vec3,
    pub night_ambient: Vec3,
    pub day_sun: Vec3,
    pub night_sun: Vec3,
}

impl Default for DayNightPalette {
    fn default() -> Self {
        Self {
            day_ambient: Vec3::new(0.35, 0.33, 0.38),
            night_ambient: Vec3::new(0.03, 0.05, 0.12),
            day_sun: Vec3::new(1.0, 0.95, 0.85),
            night_sun: Vec3::new(0.2, 0.25, 0.4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightSettings {
    pub enabled: bool,
    pub auto_advance: bool,
    /// Seconds for one full day.
    pub cycle_duration: f32,
    pub palette: DayNightPalette,
}

impl Default for DayNightSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_advance: true,
            cycle_duration: 60.0,
            palette: DayNightPalette::default(),
        }
    }
}

/// Lighting uniforms derived from the time of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLighting {
    pub ambient: Vec3,
    pub sun_direction: Vec3,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
}

impl SceneLighting {
    /// Output of a disabled cycle: the scene reads as unlit.
    pub fn unlit() -> Self {
        Self {
            ambient: Vec3::ZERO,
            sun_direction: Vec3::NEG_Y,
            sun_color: Vec3::ZERO,
            sun_intensity: 0.0,
        }
    }
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self::unlit()
    }
}

#[derive(Debug, Clone)]
pub struct DayNightCycle {
    pub settings: DayNightSettings,
    time_of_day: f32,
    lighting: SceneLighting,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(DayNightSettings::default(), 0.25)
    }
}

impl DayNightCycle {
    /// Create a cycle at `time_of_day` with lighting already computed.
    pub fn new(settings: DayNightSettings, time_of_day: f32) -> Self {
        let mut cycle = Self {
            settings,
            time_of_day,
            lighting: SceneLighting::unlit(),
        };
        cycle.tick(0.0);
        cycle
    }

    /// Get the normalized time of day.
    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    /// Drive the clock externally, e.g. from a slider. Lighting is
    /// recomputed immediately.
    pub fn set_time_of_day(&mut self, time_of_day: f32) {
        self.time_of_day = time_of_day;
        self.tick(0.0);
    }

    /// Get the lighting computed by the last tick.
    pub fn lighting(&self) -> SceneLighting {
        self.lighting
    }

    /// Advance (or clamp) the time of day and recompute lighting.
    pub fn tick(&mut self, dt: f32) {
        if !self.settings.enabled {
            self.lighting = SceneLighting::unlit();
            return;
        }

        if self.settings.auto_advance {
            let duration = self.settings.cycle_duration.max(MIN_CYCLE_DURATION);
            self.time_of_day = wrap_into(self.time_of_day + dt / duration, 1.0);
        } else if self.time_of_day.is_finite() {
            self.time_of_day = self.time_of_day.clamp(0.0, 1.0);
        } else {
            self.time_of_day = 0.0;
        }

        let angle = TAU * self.time_of_day - FRAC_PI_2;
        let sun_direction = safe_normalize(
            Vec3::new(angle.cos(), -angle.sin(), SUN_ARC_TILT),
            Vec3::NEG_Y,
        );
        let daylight = smoothstep(0.0, 1.0, (-sun_direction.y).clamp(0.0, 1.0));

        let palette = &self.settings.palette;
        self.lighting = SceneLighting {
            ambient: palette.night_ambient.lerp(palette.day_ambient, daylight),
            sun_direction,
            sun_color: palette.night_sun.lerp(palette.day_sun, daylight) * daylight,
            sun_intensity: daylight,
        };
    }

    /// 24-hour wall clock for the current time of day.
    pub fn clock(&self) -> (u32, u32) {
        let hours = self.time_of_day * 24.0;
        let whole = hours.floor();
        let hour = (whole as i64).rem_euclid(24) as u32;
        let minute = (((hours - whole) * 60.0).round() as i64).rem_euclid(60) as u32;
        (hour, minute)
    }

    /// Clock as `HH:MM`.
    pub fn clock_label(&self) -> String {
        let (hour, minute) = self.clock();
        format!("{hour:02}:{minute:02}")
    }
}
