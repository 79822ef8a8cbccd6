//! Flight control for SEEKER agents.
//!
//! Implements the shared steering primitive, the flight/search state
//! machine, and the precision landing state machine with inter-agent
//! separation. No ECS dependency: operates on plain component data.

pub mod landing;
pub mod registry;
pub mod search;
pub mod separation;
pub mod steering;

pub use seeker_core as core;
pub use registry::LandingRegistry;

#[cfg(test)]
mod tests;
