//! Landing system: steps every active landing session.
//!
//! Separation reads agent positions captured before any session moves, so
//! the result does not depend on query order.

use std::collections::BTreeMap;

use hecs::World;

use seeker_core::components::{Agent, LandingSession};
use seeker_core::config::LandingConfig;
use seeker_core::enums::ControlOwner;
use seeker_core::events::MissionEvent;
use seeker_core::types::{AgentId, Orientation, Position, Velocity};

use seeker_flight::landing::{self, LandingContext};
use seeker_flight::LandingRegistry;
use seeker_terrain::GroundProbe;

use crate::coordinator::LandingFinished;

/// Step all sessions once. Returns the sessions that ended this tick.
pub fn run(
    world: &mut World,
    probe: &dyn GroundProbe,
    registry: &LandingRegistry,
    config: &LandingConfig,
    dt: f64,
    events: &mut Vec<MissionEvent>,
) -> Vec<LandingFinished> {
    if registry.is_empty() {
        return Vec::new();
    }

    let committed: BTreeMap<AgentId, Position> = world
        .query::<(&Agent, &Position)>()
        .iter()
        .filter(|(_, (agent, _))| registry.contains(agent.id))
        .map(|(_, (agent, pos))| (agent.id, *pos))
        .collect();

    let mut finished = Vec::new();
    for (_entity, (agent, owner, pos, vel, orientation, session)) in world.query_mut::<(
        &Agent,
        &ControlOwner,
        &mut Position,
        &mut Velocity,
        &mut Orientation,
        &mut LandingSession,
    )>() {
        if !matches!(owner, ControlOwner::ExternallyControlled { .. }) {
            continue;
        }
        let neighbours: Vec<Position> = registry
            .others(agent.id)
            .filter_map(|other| committed.get(&other).copied())
            .collect();

        let mut ctx = LandingContext {
            position: pos,
            velocity: vel,
            orientation,
            probe,
            neighbours: &neighbours,
            config,
            dt,
        };
        let update = landing::step(session, &mut ctx);

        if update.changed() {
            events.push(MissionEvent::LandingPhaseChanged {
                agent: agent.id,
                state: update.state,
            });
        }
        if let Some(outcome) = update.finished {
            finished.push(LandingFinished {
                agent: agent.id,
                outcome,
            });
        }
    }
    finished.sort_by_key(|f| f.agent);
    finished
}
