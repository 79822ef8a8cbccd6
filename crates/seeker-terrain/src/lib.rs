//! Terrain for SEEKER.
//!
//! Procedural ground surface with voids and obstructions, and the
//! downward ray probe used for ground following, spawn snapping and
//! landing point selection.

pub use seeker_core as core;

pub mod ground;
pub mod probe;

// Re-export key types for convenience.
pub use ground::{Obstacle, Terrain};
pub use probe::{ground_height_below, GroundProbe, ProbeFilter, RayHit, SurfaceKind};
