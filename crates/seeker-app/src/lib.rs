//! Seeker command-line application.
//!
//! This crate wires the simulation crates together behind a headless
//! runner: configuration loading, logging setup and the fixed-rate mission
//! loop thread.

pub mod cli;
pub mod mission_loop;
pub mod state;

pub use seeker_core as core;
