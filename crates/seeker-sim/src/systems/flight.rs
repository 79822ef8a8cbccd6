//! Flight system: steps the flight/search machine of self-controlled agents.
//!
//! Agents owned by a landing session or suspended by the coordinator are
//! skipped; the control owner tag is the only switch.

use hecs::World;
use tracing::debug;

use seeker_core::components::{Agent, FlightControl};
use seeker_core::enums::ControlOwner;
use seeker_core::types::{Orientation, Position, Velocity};

use seeker_flight::search;

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (agent, owner, pos, vel, orientation, flight)) in world.query_mut::<(
        &Agent,
        &ControlOwner,
        &Position,
        &mut Velocity,
        &mut Orientation,
        &mut FlightControl,
    )>() {
        if *owner != ControlOwner::SelfControlled {
            continue;
        }
        let update = search::step(flight, pos, vel, orientation, dt);
        if update.changed() {
            debug!(
                agent = %agent.id,
                from = ?update.previous,
                to = ?update.state,
                "flight phase changed"
            );
        }
    }
}
