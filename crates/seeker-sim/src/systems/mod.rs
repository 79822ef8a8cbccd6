//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only
//! passes). Mission-wide state they need is passed in by the engine.

pub mod flight;
pub mod landing;
pub mod movement;
pub mod sensor;
pub mod snapshot;
