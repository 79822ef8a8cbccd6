//! Snapshot system: queries the ECS world and builds a complete MissionSnapshot.
//!
//! Read-only: it never modifies the world.

use hecs::World;

use seeker_core::components::{Agent, Candidate, FlightControl, LandingSession};
use seeker_core::enums::{ControlOwner, MissionPhase};
use seeker_core::events::MissionEvent;
use seeker_core::state::{AgentView, CandidateView, MissionSnapshot};
use seeker_core::types::{Orientation, Position, SimTime, Velocity};

use crate::coordinator::MissionCoordinator;

/// Build a complete MissionSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: MissionPhase,
    coordinator: Option<&MissionCoordinator>,
    events: Vec<MissionEvent>,
) -> MissionSnapshot {
    let mut snapshot = MissionSnapshot {
        time: *time,
        phase,
        agents: build_agents(world),
        candidates: build_candidates(world),
        events,
        ..MissionSnapshot::default()
    };

    if let Some(coordinator) = coordinator {
        let mission = coordinator.mission();
        snapshot.mission_state = mission.state;
        snapshot.roi_center = mission.roi_center;
        snapshot.roi_radius = mission.roi_radius;
        snapshot.mission_text = mission.mission_text.clone();
        snapshot.winner = coordinator.winner();
        snapshot.winner_candidate = coordinator.winner_candidate();
        snapshot.has_winner = coordinator.has_winner();
        snapshot.evaluating = coordinator.evaluating();
    }
    snapshot
}

/// Build AgentView list, sorted by id.
fn build_agents(world: &World) -> Vec<AgentView> {
    let mut agents: Vec<AgentView> = world
        .query::<(
            &Agent,
            &Position,
            &Velocity,
            &Orientation,
            &FlightControl,
            &ControlOwner,
            Option<&LandingSession>,
        )>()
        .iter()
        .map(
            |(_, (agent, pos, vel, orientation, flight, owner, session))| AgentView {
                id: agent.id,
                name: agent.name.clone(),
                position: *pos,
                velocity: *vel,
                yaw: orientation.yaw,
                flight_state: flight.state,
                control: *owner,
                landing_state: session.map(|s| s.state),
            },
        )
        .collect();

    agents.sort_by_key(|a| a.id);
    agents
}

/// Build CandidateView list, sorted by id.
fn build_candidates(world: &World) -> Vec<CandidateView> {
    let mut candidates: Vec<CandidateView> = world
        .query::<(&Candidate, &Position)>()
        .iter()
        .map(|(_, (candidate, pos))| CandidateView {
            id: candidate.id,
            kind: candidate.kind.clone(),
            position: *pos,
        })
        .collect();

    candidates.sort_by_key(|c| c.id);
    candidates
}
