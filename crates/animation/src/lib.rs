//! Time-varying scene state: the Bezier tour path and its followers, wind
//! and particles, the day-night cycle, and the spinning windmill.

pub mod curve;
pub mod day_night;
pub mod follow;
pub mod frame;
pub mod lights;
pub mod particles;
pub mod rotor;
pub mod state;
pub mod wind;

pub use curve::*;
pub use day_night::*;
pub use follow::*;
pub use frame::*;
pub use lights::*;
pub use particles::*;
pub use rotor::*;
pub use state::*;
pub use wind::*;
