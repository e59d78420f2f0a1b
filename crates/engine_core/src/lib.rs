//! Core types and utilities shared by the windmill scene crates.
//!
//! This crate provides the foundational pieces used across all systems:
//! - Degenerate-safe vector math and wrapping helpers
//! - Transform values and their matrix form
//! - Frame timing

pub mod math;
pub mod time;
pub mod transform;

pub use math::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
