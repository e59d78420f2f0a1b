//! Scene configuration. Loaded from scene.ron at startup.

use animation::{
    AnimationState, BezierSegment, DayNightSettings, ParticleSettings, WindSettings,
    DEFAULT_ARROW_SCALE, DEFAULT_LOOK_AHEAD, DEFAULT_PARTICLE_SEED,
};
use glam::Vec3;
use procgen::WindmillParams;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "scene.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize scene config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Light and camera tour settings. Both tours aim at the same target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    pub light_enabled: bool,
    pub light_speed: f32,
    pub light_aim_at_target: bool,
    pub camera_enabled: bool,
    pub camera_speed: f32,
    pub camera_aim_at_target: bool,
    pub camera_look_ahead: f32,
    pub target: Vec3,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            light_enabled: false,
            light_speed: 0.6,
            light_aim_at_target: true,
            camera_enabled: false,
            camera_speed: 0.6,
            camera_aim_at_target: true,
            camera_look_ahead: DEFAULT_LOOK_AHEAD,
            target: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_curve: bool,
    pub show_control_points: bool,
    pub wind_arrow_scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_curve: false,
            show_control_points: false,
            wind_arrow_scale: DEFAULT_ARROW_SCALE,
        }
    }
}

/// Options for the headless frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub frames: u32,
    /// Seconds per frame, at most `MAX_FRAME_DT`; 0 means wall-clock timing.
    pub fixed_dt: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            fixed_dt: 1.0 / 60.0,
        }
    }
}

impl HostConfig {
    /// Fixed step to run with, if any. Non-finite or non-positive values
    /// select wall-clock timing.
    pub fn fixed_step(&self) -> Option<f32> {
        (self.fixed_dt.is_finite() && self.fixed_dt > 0.0).then_some(self.fixed_dt)
    }
}

/// Every tunable of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub windmill: WindmillParams,
    pub wind: WindSettings,
    pub particles: ParticleSettings,
    pub particle_seed: u64,
    pub day_night: DayNightSettings,
    /// Starting time of day in `[0, 1)`; 0.5 is noon.
    pub time_of_day: f32,
    pub tours: TourConfig,
    pub display: DisplayConfig,
    /// Custom tour path; the built-in loop is used when absent.
    pub path: Option<Vec<BezierSegment>>,
    pub host: HostConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            windmill: WindmillParams::default(),
            wind: WindSettings::default(),
            particles: ParticleSettings::default(),
            particle_seed: DEFAULT_PARTICLE_SEED,
            day_night: DayNightSettings::default(),
            time_of_day: 0.25,
            tours: TourConfig::default(),
            display: DisplayConfig::default(),
            path: None,
            host: HostConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Load `scene.ron` from the current directory. A missing file gives
    /// the defaults; an unreadable or invalid one is logged and also gives
    /// the defaults.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No {} found, using defaults", CONFIG_FILE_NAME);
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and parse a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&data)
    }

    /// Parse a config from RON text.
    pub fn from_ron(data: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(data)?)
    }

    /// Pretty RON text for this config.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Write pretty RON to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let data = self.to_ron()?;
        std::fs::write(path, data).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write every tunable into `state`. Range clamping is left to the
    /// components, which clamp at the point of use.
    pub fn apply<R: Rng>(&self, state: &mut AnimationState<R>) {
        state.windmill.set_params(self.windmill);
        state.wind.set_settings(self.wind);
        state.particles.settings = self.particles;
        state.day_night.settings = self.day_night;
        state.day_night.set_time_of_day(self.time_of_day);

        state.display.show_curve = self.display.show_curve;
        state.display.show_control_points = self.display.show_control_points;
        state.display.wind_arrow_scale = self.display.wind_arrow_scale;

        let tours = &self.tours;
        state.light_tour.enabled = tours.light_enabled;
        state.light_tour.state.speed = tours.light_speed;
        state.light_tour.state.aim_at_target = tours.light_aim_at_target;
        state.camera_tour.state.speed = tours.camera_speed;
        state.camera_tour.state.aim_at_target = tours.camera_aim_at_target;
        state.camera_tour.look_ahead = tours.camera_look_ahead;
        state.set_tour_target(tours.target);

        if let Some(segments) = &self.path {
            state.replace_path(segments.clone());
        }
        state.reset_lights();
        state.set_camera_tour_enabled(tours.camera_enabled);
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}
