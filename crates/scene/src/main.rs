//! Windmill scene host: loads scene.ron, drives the animation state through
//! a frame loop, and hands each frame to the renderer.

mod config;
mod render;

use animation::AnimationState;
use anyhow::{Context, Result};
use config::{SceneConfig, CONFIG_FILE_NAME};
use engine_core::FrameClock;
use render::{LogRenderer, Renderer};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // `--write-config [path]` dumps the defaults and exits
    let mut args = std::env::args().skip(1);
    if let Some("--write-config") = args.next().as_deref() {
        let path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        SceneConfig::default()
            .save_to(&path)
            .with_context(|| format!("writing default config to {}", path.display()))?;
        log::info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = SceneConfig::load();
    let mut state = AnimationState::new(config.particle_seed);
    config.apply(&mut state);

    let mut clock = match config.host.fixed_step() {
        Some(step) => FrameClock::fixed(step),
        None => FrameClock::new(),
    };
    let mut renderer = LogRenderer::default();
    renderer.upload_wind_arrow(&animation::ARROW_LINES);

    log::info!(
        "Starting windmill scene: {} frames, path length {:.2}, {} lights",
        config.host.frames,
        state.path.total_length(),
        state.lights.lights().len()
    );

    for _ in 0..config.host.frames {
        let dt = clock.tick();
        state.tick(dt);
        renderer.submit(&state.frame_output());
    }

    let stats = renderer.stats;
    log::info!(
        "Finished {} frames in {:.2}s: clock {}, {} mesh uploads ({} bytes), {} path vertices, peak {} particles, wind {:.2}, sun {:.2}",
        stats.frames,
        clock.elapsed_seconds(),
        state.day_night.clock_label(),
        stats.mesh_uploads,
        stats.uploaded_bytes,
        stats.path_vertices,
        stats.peak_particles,
        stats.last_wind_strength,
        stats.last_sun_intensity
    );

    Ok(())
}
