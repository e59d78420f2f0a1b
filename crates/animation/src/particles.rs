//! Wind-visualization particles: emitted from a disk at the windmill's feet
//! and carried along the wind heading.

use crate::wind::WindSample;
use engine_core::{frame_blend, safe_normalize};
use glam::Vec3;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Radius of the emission disk.
pub const EMISSION_RADIUS: f32 = 0.9;
/// Emission height above the ground plane.
pub const EMISSION_LIFT: f32 = 0.15;
const UPWARD_ACCELERATION: Vec3 = Vec3::new(0.0, 0.25, 0.0);
/// Blend rate toward the wind-aligned velocity, per second.
const ALIGNMENT_RATE: f32 = 0.5;
const PARTICLE_COLOR: Vec3 = Vec3::new(0.8, 0.85, 0.9);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    /// Particles per second at wind strength 1.
    pub spawn_rate: f32,
    /// Mean lifetime in seconds; each particle gets 60% to 140% of it.
    pub lifetime: f32,
    /// Point size in pixels.
    pub size: f32,
    pub max_particles: usize,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            spawn_rate: 45.0,
            lifetime: 3.5,
            size: 8.0,
            max_particles: 400,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    pub lifetime: f32,
}

impl Particle {
    /// Whether the particle has reached its lifetime.
    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Point-sprite data handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleCloud {
    pub positions: Vec<Vec3>,
    pub point_size: f32,
    pub color: Vec3,
}

/// Live particle set plus the generator that seeds new particles.
pub struct WindParticles<R = StdRng> {
    pub settings: ParticleSettings,
    particles: Vec<Particle>,
    spawn_accumulator: f32,
    rng: R,
}

impl WindParticles<StdRng> {
    /// Reproducible particle field for a given seed.
    pub fn with_seed(settings: ParticleSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WindParticles<R> {
    /// Create an empty particle set drawing from `rng`.
    pub fn with_rng(settings: ParticleSettings, rng: R) -> Self {
        Self {
            settings,
            particles: Vec::with_capacity(settings.max_particles),
            spawn_accumulator: 0.0,
            rng,
        }
    }

    /// Get the live particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particles are alive.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Remove every particle and reset the spawn accumulator.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.spawn_accumulator = 0.0;
    }

    /// Spawn, integrate, and cull for one frame. Does nothing for `dt <= 0`.
    ///
    /// Spawns accumulate fractionally; whatever does not fit under the cap
    /// is dropped rather than carried over.
    pub fn tick(&mut self, dt: f32, wind: WindSample, ground_height: f32) {
        if dt <= 0.0 {
            return;
        }

        let spawn_rate = (self.settings.spawn_rate * wind.strength).max(0.0);
        self.spawn_accumulator += spawn_rate * dt;
        let spawn_count = self.spawn_accumulator as usize;
        self.spawn_accumulator -= spawn_count as f32;
        self.spawn_burst(spawn_count, wind, ground_height);

        let blend = frame_blend(dt, ALIGNMENT_RATE);
        let target_velocity = wind.heading * (1.5 * wind.strength);
        for particle in &mut self.particles {
            particle.age += dt;
            particle.velocity += UPWARD_ACCELERATION * dt;
            particle.velocity = particle.velocity.lerp(target_velocity, blend);
            particle.position += particle.velocity * dt;
        }

        self.particles.retain(|p| !p.is_expired());
    }

    /// Spawn up to `count` particles, stopping at the live-particle cap.
    /// Returns how many were actually spawned.
    pub fn spawn_burst(&mut self, count: usize, wind: WindSample, ground_height: f32) -> usize {
        let room = self.settings.max_particles.saturating_sub(self.particles.len());
        let count = count.min(room);
        for _ in 0..count {
            let particle = self.spawn_one(wind, ground_height);
            self.particles.push(particle);
        }
        count
    }

    fn spawn_one(&mut self, wind: WindSample, ground_height: f32) -> Particle {
        let rng = &mut self.rng;
        let lifetime = self.settings.lifetime.max(0.0) * (0.6 + 0.8 * rng.gen::<f32>());

        let angle = TAU * rng.gen::<f32>();
        let radius = rng.gen::<f32>().sqrt() * EMISSION_RADIUS;
        let offset = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
        let position = Vec3::new(0.0, ground_height + EMISSION_LIFT, 0.0) + offset;

        let lateral = safe_normalize(wind.heading.cross(Vec3::Y), Vec3::X);
        let lateral_scale = (rng.gen::<f32>() - 0.5) * 0.8;
        let gust_velocity = wind.heading * (1.2 + 1.6 * wind.strength);
        let upward = Vec3::new(0.0, 0.35 + 0.35 * rng.gen::<f32>(), 0.0);

        Particle {
            position,
            velocity: gust_velocity + lateral * lateral_scale + upward,
            age: 0.0,
            lifetime,
        }
    }

    /// Positions of the live particles.
    pub fn positions(&self) -> Vec<Vec3> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Point size in pixels, at least 1.
    pub fn point_size(&self) -> f32 {
        self.settings.size.max(1.0)
    }

    /// Point-sprite data for the renderer.
    pub fn cloud(&self) -> ParticleCloud {
        ParticleCloud {
            positions: self.positions(),
            point_size: self.point_size(),
            color: PARTICLE_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm_east() -> WindSample {
        WindSample {
            heading: Vec3::X,
            strength: 1.0,
        }
    }

    #[test]
    fn spawn_accumulates_fractionally() {
        let mut particles = WindParticles::with_seed(ParticleSettings::default(), 7);
        // 45/s at 1/60 s is 0.75 per frame
        particles.tick(1.0 / 60.0, calm_east(), 0.2);
        assert_eq!(particles.len(), 0);
        particles.tick(1.0 / 60.0, calm_east(), 0.2);
        assert_eq!(particles.len(), 1);
    }

    #[test]
    fn live_count_never_exceeds_cap() {
        let settings = ParticleSettings {
            spawn_rate: 1000.0,
            max_particles: 10,
            lifetime: 100.0,
            ..Default::default()
        };
        let mut particles = WindParticles::with_seed(settings, 1);
        for _ in 0..20 {
            particles.tick(0.25, calm_east(), 0.2);
            assert!(particles.len() <= 10);
        }
        assert_eq!(particles.len(), 10);
    }

    #[test]
    fn excess_spawns_are_dropped() {
        let settings = ParticleSettings {
            spawn_rate: 100.0,
            max_particles: 5,
            lifetime: 100.0,
            ..Default::default()
        };
        let mut particles = WindParticles::with_seed(settings, 3);
        particles.tick(1.0, calm_east(), 0.0);
        assert_eq!(particles.len(), 5);
        assert!(particles.spawn_accumulator < 1.0);
    }

    #[test]
    fn particle_reaching_lifetime_is_removed_same_tick() {
        let settings = ParticleSettings {
            spawn_rate: 0.0,
            ..Default::default()
        };
        let mut particles = WindParticles::with_seed(settings, 0);
        particles.particles.push(Particle {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            age: 0.0,
            lifetime: 0.5,
        });
        particles.particles.push(Particle {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            age: 0.0,
            lifetime: 0.75,
        });
        particles.tick(0.5, calm_east(), 0.0);
        assert_eq!(particles.len(), 1);
        assert_eq!(particles.particles()[0].lifetime, 0.75);
    }

    #[test]
    fn seeded_burst_dies_out_after_max_lifetime() {
        let settings = ParticleSettings {
            spawn_rate: 0.0,
            max_particles: 400,
            ..Default::default()
        };
        let mut particles = WindParticles::with_seed(settings, 1337);
        assert_eq!(particles.spawn_burst(100, calm_east(), 0.2), 100);
        assert_eq!(particles.len(), 100);

        let longest = particles
            .particles()
            .iter()
            .map(|p| p.lifetime)
            .fold(0.0_f32, f32::max);
        assert!(longest <= settings.lifetime * 1.4 + 1e-4);

        let mut elapsed = 0.0;
        while elapsed <= longest {
            particles.tick(0.1, calm_east(), 0.2);
            elapsed += 0.1;
        }
        particles.tick(0.1, calm_east(), 0.2);
        assert!(particles.is_empty());
    }

    #[test]
    fn spawns_inside_emission_disk() {
        let mut particles = WindParticles::with_seed(ParticleSettings::default(), 42);
        particles.spawn_burst(200, calm_east(), 0.2);
        for p in particles.particles() {
            let planar = Vec3::new(p.position.x, 0.0, p.position.z);
            assert!(planar.length() <= EMISSION_RADIUS + 1e-5);
            assert!((p.position.y - 0.35).abs() < 1e-6);
            assert!(p.lifetime >= 3.5 * 0.6 - 1e-4 && p.lifetime <= 3.5 * 1.4 + 1e-4);
            // Heading component is 1.2 + 1.6 * strength
            assert!((p.velocity.x - 2.8).abs() < 1e-5);
            assert!(p.velocity.y >= 0.35 && p.velocity.y <= 0.7 + 1e-6);
            assert!(p.velocity.z.abs() <= 0.4 + 1e-6);
        }
    }

    #[test]
    fn vertical_wind_uses_fallback_lateral_axis() {
        let mut particles = WindParticles::with_seed(ParticleSettings::default(), 5);
        let updraft = WindSample {
            heading: Vec3::Y,
            strength: 1.0,
        };
        particles.spawn_burst(20, updraft, 0.0);
        for p in particles.particles() {
            assert!(p.velocity.is_finite());
            assert_eq!(p.velocity.z, 0.0);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let mut a = WindParticles::with_seed(ParticleSettings::default(), 99);
        let mut b = WindParticles::with_seed(ParticleSettings::default(), 99);
        for _ in 0..120 {
            a.tick(1.0 / 30.0, calm_east(), 0.2);
            b.tick(1.0 / 30.0, calm_east(), 0.2);
        }
        assert!(!a.is_empty());
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn non_positive_dt_is_ignored() {
        let mut particles = WindParticles::with_seed(ParticleSettings::default(), 2);
        particles.spawn_burst(3, calm_east(), 0.0);
        let before = particles.positions();
        particles.tick(0.0, calm_east(), 0.0);
        particles.tick(-1.0, calm_east(), 0.0);
        assert_eq!(particles.positions(), before);
    }

    #[test]
    fn cloud_point_size_has_floor() {
        let particles = WindParticles::with_seed(
            ParticleSettings {
                size: 0.2,
                ..Default::default()
            },
            0,
        );
        let cloud = particles.cloud();
        assert_eq!(cloud.point_size, 1.0);
        assert_eq!(cloud.color, PARTICLE_COLOR);
        assert!(cloud.positions.is_empty());
    }
}
