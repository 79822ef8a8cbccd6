//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::types::AgentId;

/// Flight/search state of a single agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightState {
    /// On the ground or halted. Reachable from any state via a hard halt.
    #[default]
    Idle,
    /// Vertical climb to clearance above the ROI ground.
    Takeoff,
    /// Flight to the search gate point at cruise altitude.
    Transit,
    /// Spiral search over the ROI.
    Search,
    /// Motion delegated to the landing state machine.
    ExternalControl,
}

/// Precision landing state of a single agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandingState {
    #[default]
    Idle,
    /// Sampling the ring around the target for a landing point.
    SelectPoint,
    /// Flying to the point above the landing point.
    PreHover,
    /// Vertical descent onto the landing point.
    Descent,
    /// Holding position on the ground.
    Touchdown,
    /// Landing finished successfully.
    Complete,
    /// Landing failed; climbing clear before releasing control.
    Abort,
}

impl LandingState {
    /// States in which the session still owns the agent's motion.
    pub fn is_active(self) -> bool {
        !matches!(self, LandingState::Idle | LandingState::Complete)
    }

    /// States during which separation forces apply.
    pub fn applies_separation(self) -> bool {
        matches!(self, LandingState::PreHover | LandingState::Descent)
    }
}

/// Which controller currently owns an agent's motion.
///
/// The tick dispatcher consults this tag instead of per-component enable flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlOwner {
    /// The flight/search state machine drives the agent.
    #[default]
    SelfControlled,
    /// A landing session drives the agent.
    ExternallyControlled { session: AgentId },
    /// Frozen by the coordinator after another agent won the mission.
    Suspended,
}

/// Lifecycle of the mission record owned by the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionState {
    /// Evaluations may be scheduled and a winner may be committed.
    #[default]
    Active,
    /// A winner has been committed. Sticky for the rest of the mission.
    Committed,
}

/// Top-level run phase of the simulation engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionPhase {
    /// No mission loaded.
    #[default]
    Standby,
    /// Mission running; systems tick.
    Running,
    /// Mission running but time is frozen.
    Paused,
    /// The winner landed; the mission is frozen terminally.
    Finished,
}

/// How a landing session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingOutcome {
    Completed,
    Aborted,
}

/// Why a landing session aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// No ground was found below the selected landing point.
    NoGround,
    /// Pre-hover did not arrive in time.
    PreHoverTimeout,
    /// Descent did not reach the ground in time.
    DescentTimeout,
    /// Touchdown could not be held in time.
    TouchdownTimeout,
}
