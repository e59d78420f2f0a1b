//! Procedural geometry: box primitives, compound-mesh composition, and the
//! windmill built from them.

pub mod mesh;
pub mod windmill;

pub use mesh::*;
pub use windmill::*;
