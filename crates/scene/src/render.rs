//! Renderer seam. The host hands every frame's output to a [`Renderer`];
//! the headless build logs and tallies instead of drawing.

use animation::FrameOutput;
use engine_core::TransformRaw;
use glam::Vec3;
use procgen::WindmillMeshes;

pub trait Renderer {
    /// Upload the static wind-arrow line list once at startup.
    fn upload_wind_arrow(&mut self, lines: &[Vec3]);

    /// Replace the GPU copies of the windmill meshes.
    fn upload_windmill(&mut self, meshes: &WindmillMeshes);

    /// Draw one frame.
    fn draw_frame(&mut self, frame: &FrameOutput);

    /// Upload rebuilt meshes if the frame carries any, then draw.
    fn submit(&mut self, frame: &FrameOutput) {
        if let Some(meshes) = &frame.windmill.rebuilt_meshes {
            self.upload_windmill(meshes);
        }
        self.draw_frame(frame);
    }
}

/// Counters collected by [`LogRenderer`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    pub frames: u64,
    pub mesh_uploads: u32,
    /// Vertex bytes of the most recent upload.
    pub uploaded_bytes: usize,
    pub arrow_vertices: usize,
    /// Model-matrix bytes submitted by the most recent frame.
    pub instance_bytes: usize,
    pub peak_particles: usize,
    pub path_vertices: usize,
    pub last_sun_intensity: f32,
    pub last_wind_strength: f32,
}

/// Headless renderer: logs uploads and every `log_every`th frame.
#[derive(Debug)]
pub struct LogRenderer {
    pub stats: RenderStats,
    log_every: u64,
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(120)
    }
}

impl LogRenderer {
    /// Create a renderer that logs every `log_every`th frame.
    pub fn new(log_every: u64) -> Self {
        Self {
            stats: RenderStats::default(),
            log_every: log_every.max(1),
        }
    }
}

impl Renderer for LogRenderer {
    fn upload_wind_arrow(&mut self, lines: &[Vec3]) {
        self.stats.arrow_vertices = lines.len();
        log::debug!("Uploaded wind arrow: {} vertices", self.stats.arrow_vertices);
    }

    fn upload_windmill(&mut self, meshes: &WindmillMeshes) {
        self.stats.mesh_uploads += 1;
        self.stats.uploaded_bytes = meshes.body.vertex_bytes().len() + meshes.rotor.vertex_bytes().len();
        log::debug!(
            "Uploaded windmill: body {} verts / {} tris, rotor {} verts / {} tris",
            meshes.body.vertex_count(),
            meshes.body.triangle_count(),
            meshes.rotor.vertex_count(),
            meshes.rotor.triangle_count()
        );
    }

    fn draw_frame(&mut self, frame: &FrameOutput) {
        let mut instances: Vec<TransformRaw> = vec![
            frame.windmill.body_model.into(),
            frame.windmill.rotor_model.into(),
            frame.wind.arrow_model.into(),
        ];
        instances.extend(frame.light_markers.iter().map(|m| TransformRaw::from(m.model())));
        if let Some(path) = &frame.path {
            instances.extend(path.control_markers.iter().map(|m| TransformRaw::from(m.model())));
        }

        let stats = &mut self.stats;
        stats.instance_bytes = bytemuck::cast_slice::<TransformRaw, u8>(&instances).len();
        stats.frames += 1;
        stats.peak_particles = stats.peak_particles.max(frame.particles.positions.len());
        stats.path_vertices = frame.path.as_ref().map_or(0, |p| p.line_strip.len());
        stats.last_sun_intensity = frame.lighting.sun_intensity;
        stats.last_wind_strength = frame.wind.strength;

        if stats.frames % self.log_every == 0 {
            log::debug!(
                "Frame {}: {} particles, {} instance bytes, wind {:.2}, sun {:.2}, {} lights",
                stats.frames,
                frame.particles.positions.len(),
                stats.instance_bytes,
                frame.wind.strength,
                frame.lighting.sun_intensity,
                frame.lights.count
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animation::AnimationState;

    #[test]
    fn submit_uploads_only_rebuilt_meshes() {
        let mut state = AnimationState::new(3);
        let mut renderer = LogRenderer::new(1);

        for _ in 0..5 {
            state.tick(1.0 / 60.0);
            let frame = state.frame_output();
            renderer.submit(&frame);
        }
        assert_eq!(renderer.stats.frames, 5);
        assert_eq!(renderer.stats.mesh_uploads, 1);
        assert!(renderer.stats.uploaded_bytes > 0);
    }

    #[test]
    fn instance_data_covers_every_model() {
        let mut state = AnimationState::new(3);
        state.display.show_curve = true;
        state.display.show_control_points = true;
        let mut renderer = LogRenderer::default();
        renderer.upload_wind_arrow(&animation::ARROW_LINES);
        renderer.submit(&state.frame_output());
        // body, rotor, arrow, one light, ten control markers
        assert_eq!(renderer.stats.instance_bytes, 14 * 64);
        assert_eq!(renderer.stats.arrow_vertices, 6);
    }

    #[test]
    fn stats_track_frame_contents() {
        let mut state = AnimationState::new(3);
        state.display.show_curve = true;
        let mut renderer = LogRenderer::default();
        for _ in 0..60 {
            state.tick(1.0 / 30.0);
            renderer.submit(&state.frame_output());
        }
        assert_eq!(renderer.stats.path_vertices, state.path.samples().len());
        assert!(renderer.stats.peak_particles > 0);
        assert_eq!(renderer.stats.last_wind_strength, state.wind.strength());
    }
}
