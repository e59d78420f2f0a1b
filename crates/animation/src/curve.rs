//! Closed cubic Bezier loop with an arc-length lookup table.
//!
//! The table is rebuilt wholesale whenever a control point changes; queries
//! by distance interpolate between neighbouring samples, which gives
//! constant-speed traversal regardless of how the control points are spaced.

use engine_core::{safe_normalize, wrap_into};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Parameter steps per segment; each segment contributes `N + 1` samples
/// before junction de-duplication.
pub const SAMPLES_PER_SEGMENT: usize = 64;

/// Bracket lengths below this are treated as zero-length.
const BRACKET_EPSILON: f32 = 1e-6;

/// One cubic Bezier segment. `p0` of segment `i + 1` is expected to equal
/// `p3` of segment `i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierSegment {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

/// Which control point of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlPoint {
    P0,
    P1,
    P2,
    P3,
}

impl BezierSegment {
    /// Create a segment from its four control points.
    pub const fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Position at `t` in `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        let u2 = u * u;
        let t2 = t * t;
        u2 * u * self.p0 + 3.0 * u2 * t * self.p1 + 3.0 * u * t2 * self.p2 + t2 * t * self.p3
    }

    /// First derivative at `t`.
    pub fn derivative(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        3.0 * u * u * (self.p1 - self.p0)
            + 6.0 * u * t * (self.p2 - self.p1)
            + 3.0 * t * t * (self.p3 - self.p2)
    }

    /// Unit tangent at `t`; `+Y` at a cusp.
    pub fn tangent(&self, t: f32) -> Vec3 {
        safe_normalize(self.derivative(t), Vec3::Y)
    }

    /// Get one control point by name.
    pub fn control_point(&self, point: ControlPoint) -> Vec3 {
        match point {
            ControlPoint::P0 => self.p0,
            ControlPoint::P1 => self.p1,
            ControlPoint::P2 => self.p2,
            ControlPoint::P3 => self.p3,
        }
    }

    fn control_point_mut(&mut self, point: ControlPoint) -> &mut Vec3 {
        match point {
            ControlPoint::P0 => &mut self.p0,
            ControlPoint::P1 => &mut self.p1,
            ControlPoint::P2 => &mut self.p2,
            ControlPoint::P3 => &mut self.p3,
        }
    }
}

/// One entry of the arc-length table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub position: Vec3,
    pub tangent: Vec3,
    /// Distance along the curve from the first sample.
    pub cumulative_length: f32,
}

/// Result of a distance query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub position: Vec3,
    pub tangent: Vec3,
}

/// The three-segment loop the light and camera tours start on.
pub fn tour_loop_segments() -> Vec<BezierSegment> {
    vec![
        BezierSegment::new(
            Vec3::new(2.5, 1.5, -1.5),
            Vec3::new(3.5, 2.5, -0.5),
            Vec3::new(2.5, 1.0, 1.5),
            Vec3::new(1.5, 1.5, 2.5),
        ),
        BezierSegment::new(
            Vec3::new(1.5, 1.5, 2.5),
            Vec3::new(0.5, 2.5, 3.5),
            Vec3::new(-1.5, 1.0, 2.5),
            Vec3::new(-2.5, 1.5, 0.0),
        ),
        BezierSegment::new(
            Vec3::new(-2.5, 1.5, 0.0),
            Vec3::new(-3.0, 0.5, -2.0),
            Vec3::new(-0.5, 1.0, -3.0),
            Vec3::new(2.5, 1.5, -1.5),
        ),
    ]
}

/// A closed loop of Bezier segments plus its arc-length table.
#[derive(Debug, Clone, Default)]
pub struct CurvePath {
    segments: Vec<BezierSegment>,
    samples: Vec<PathSample>,
    total_length: f32,
}

impl CurvePath {
    /// Create a path and build its sample table.
    pub fn new(segments: Vec<BezierSegment>) -> Self {
        let mut path = Self {
            segments,
            samples: Vec::new(),
            total_length: 0.0,
        };
        path.rebuild_samples();
        path
    }

    /// The default three-segment tour loop, sampled.
    pub fn tour_loop() -> Self {
        Self::new(tour_loop_segments())
    }

    /// Get the Bezier segments.
    pub fn segments(&self) -> &[BezierSegment] {
        &self.segments
    }

    /// Get the arc-length table.
    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    /// Length of the closed loop.
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// A path can answer distance queries once it has two samples and a
    /// positive length.
    pub fn is_ready(&self) -> bool {
        self.samples.len() >= 2 && self.total_length > 0.0
    }

    /// Replace every segment and rebuild.
    pub fn set_segments(&mut self, segments: Vec<BezierSegment>) {
        self.segments = segments;
        self.rebuild_samples();
    }

    /// Rebuild the whole arc-length table from the current segments.
    pub fn rebuild_samples(&mut self) {
        self.samples.clear();
        self.total_length = 0.0;
        if self.segments.is_empty() {
            return;
        }

        self.samples
            .reserve(self.segments.len() * SAMPLES_PER_SEGMENT + 2);
        let mut previous: Option<Vec3> = None;

        for (segment_index, segment) in self.segments.iter().enumerate() {
            // Segment i > 0 starts where segment i - 1 ended
            let first_step = if segment_index > 0 { 1 } else { 0 };
            for step in first_step..=SAMPLES_PER_SEGMENT {
                let t = step as f32 / SAMPLES_PER_SEGMENT as f32;
                let position = segment.evaluate(t);
                if let Some(prev) = previous {
                    self.total_length += position.distance(prev);
                }
                self.samples.push(PathSample {
                    position,
                    tangent: segment.tangent(t),
                    cumulative_length: self.total_length,
                });
                previous = Some(position);
            }
        }

        // Close the loop back onto the first sample
        let first = self.samples[0];
        if let Some(last) = self.samples.last() {
            self.total_length += first.position.distance(last.position);
        }
        self.samples.push(PathSample {
            cumulative_length: self.total_length,
            ..first
        });

        log::debug!(
            "Rebuilt curve path: {} segments, {} samples, length {:.3}",
            self.segments.len(),
            self.samples.len(),
            self.total_length
        );
    }

    /// Wrap a distance into `[0, total_length)`; 0 when the path has no length.
    pub fn wrap_distance(&self, distance: f32) -> f32 {
        wrap_into(distance, self.total_length)
    }

    /// Position and unit tangent at arc-length `distance` (wrapped).
    ///
    /// Returns `None` while the path is not ready.
    pub fn sample_at_distance(&self, distance: f32) -> Option<PathPoint> {
        if !self.is_ready() {
            return None;
        }
        let distance = self.wrap_distance(distance);

        let upper = self
            .samples
            .partition_point(|sample| sample.cumulative_length < distance)
            .clamp(1, self.samples.len() - 1);
        let prev = &self.samples[upper - 1];
        let next = &self.samples[upper];

        let bracket = next.cumulative_length - prev.cumulative_length;
        let local_t = if bracket > BRACKET_EPSILON {
            (distance - prev.cumulative_length) / bracket
        } else {
            0.0
        };

        Some(PathPoint {
            position: prev.position.lerp(next.position, local_t),
            tangent: safe_normalize(prev.tangent.lerp(next.tangent, local_t), prev.tangent),
        })
    }

    /// Move one control point and rebuild.
    ///
    /// Shared endpoints are written on both sides so the loop stays closed:
    /// `P3` also moves the next segment's `P0`, `P0` the previous segment's
    /// `P3`. Returns `false` for an out-of-range segment.
    pub fn set_control_point(&mut self, segment: usize, point: ControlPoint, position: Vec3) -> bool {
        let count = self.segments.len();
        if segment >= count {
            return false;
        }

        *self.segments[segment].control_point_mut(point) = position;
        match point {
            ControlPoint::P0 => self.segments[(segment + count - 1) % count].p3 = position,
            ControlPoint::P3 => self.segments[(segment + 1) % count].p0 = position,
            ControlPoint::P1 | ControlPoint::P2 => {}
        }

        log::debug!("Control point {:?} of segment {} moved to {}", point, segment, position);
        self.rebuild_samples();
        true
    }

    /// Sample positions as a line strip, or `None` with fewer than 2 samples.
    pub fn line_strip(&self) -> Option<Vec<Vec3>> {
        if self.samples.len() < 2 {
            return None;
        }
        Some(self.samples.iter().map(|s| s.position).collect())
    }

    /// Loop corners: the first segment's `P0` and every segment's `P3`.
    pub fn corner_points(&self) -> Vec<Vec3> {
        self.segments
            .first()
            .map(|s| s.p0)
            .into_iter()
            .chain(self.segments.iter().map(|s| s.p3))
            .collect()
    }

    /// Tangent handles: every segment's `P1` and `P2`.
    pub fn handle_points(&self) -> Vec<Vec3> {
        self.segments.iter().flat_map(|s| [s.p1, s.p2]).collect()
    }
}
