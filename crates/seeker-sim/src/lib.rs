//! Simulation engine for SEEKER.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate, hosts the
//! mission coordinator and the oracle contract, and produces
//! MissionSnapshots for presentation collaborators.

pub mod coordinator;
pub mod engine;
pub mod oracle;
pub mod systems;
pub mod world_setup;

pub use coordinator::{CommitError, MissionCoordinator};
pub use engine::{SimConfig, SimulationEngine};
pub use oracle::{KeywordOracle, Oracle, OracleError, Verdict};
pub use seeker_core as core;
