//! Events emitted by the simulation for presentation collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::{AbortReason, LandingState};
use crate::types::{AgentId, CandidateId, Position};

/// Mission events raised during a tick, drained into the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MissionEvent {
    MissionStarted {
        roi_center: Position,
        agents: u32,
        candidates: u32,
    },
    /// Mission start input was rejected; nothing changed.
    InputRejected { reason: String },
    CandidateSeen {
        agent: AgentId,
        candidate: CandidateId,
    },
    EvaluationStarted {
        agent: AgentId,
        candidate: CandidateId,
    },
    /// The oracle answered but the verdict was not accepted.
    EvaluationRejected {
        candidate: CandidateId,
        is_match: bool,
        confidence: f64,
    },
    /// The oracle produced no verdict.
    EvaluationFailed {
        candidate: CandidateId,
        error: String,
    },
    /// A verdict arrived after the mission was already committed.
    EvaluationDiscarded { candidate: CandidateId },
    WinnerCommitted {
        agent: AgentId,
        candidate: CandidateId,
        forced: bool,
    },
    /// The winner could not start a landing; the commit was undone.
    CommitRolledBack { agent: AgentId, reason: String },
    AgentSuspended { agent: AgentId },
    LandingPhaseChanged {
        agent: AgentId,
        state: LandingState,
    },
    LandingCompleted {
        agent: AgentId,
        position: Position,
    },
    LandingAborted {
        agent: AgentId,
        reason: AbortReason,
    },
    MissionReset,
}
