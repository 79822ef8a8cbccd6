//! Mission snapshot: the read-only telemetry surface produced each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::MissionEvent;
use crate::types::{AgentId, CandidateId, Position, SimTime, Velocity};

/// Complete visible mission state after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionSnapshot {
    pub time: SimTime,
    pub phase: MissionPhase,
    pub mission_state: MissionState,
    pub roi_center: Position,
    pub roi_radius: f64,
    pub mission_text: String,
    pub agents: Vec<AgentView>,
    pub candidates: Vec<CandidateView>,
    /// Designated winner, if any.
    pub winner: Option<AgentId>,
    pub winner_candidate: Option<CandidateId>,
    pub has_winner: bool,
    /// Candidates with an oracle evaluation in flight.
    pub evaluating: Vec<CandidateId>,
    pub events: Vec<MissionEvent>,
}

/// One agent as seen by presentation collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub name: String,
    pub position: Position,
    pub velocity: Velocity,
    pub yaw: f64,
    pub flight_state: FlightState,
    pub control: ControlOwner,
    pub landing_state: Option<LandingState>,
}

/// One candidate as seen by presentation collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateView {
    pub id: CandidateId,
    pub kind: String,
    pub position: Position,
}

impl MissionSnapshot {
    /// Positions of all agents, in id order.
    pub fn agent_positions(&self) -> Vec<Position> {
        self.agents.iter().map(|a| a.position).collect()
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentView> {
        self.agents.iter().find(|a| a.id == id)
    }
}
