//! Kinematic integration system.
//!
//! Updates Position from Velocity each tick: position += velocity * dt.

use hecs::World;

use seeker_core::components::Agent;
use seeker_core::types::{Position, Velocity};

/// Integrate every agent's position over one tick.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (_agent, pos, vel)) in world.query_mut::<(&Agent, &mut Position, &Velocity)>() {
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
    }
}
