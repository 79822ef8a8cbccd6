//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behavior.
//! State machine logic lives in `seeker-flight`, orchestration in `seeker-sim`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{AgentId, CandidateId, Position};

/// Marks an entity as an aerial agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
}

/// Passive candidate descriptor. Immutable after spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub kind: String,
    pub description: String,
}

/// Marks an agent as carrying a landing controller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lander;

/// Parameters handed to `ArmAndSearch`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchPlan {
    /// ROI center on the ground.
    pub center: Position,
    /// ROI radius (m).
    pub radius: f64,
    /// Starting spiral angle (degrees).
    pub start_angle_deg: f64,
    /// Cruise altitude above ROI ground (m).
    pub altitude: f64,
}

/// Spiral search parameters: angle θ and radius r.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpiralPhase {
    /// Current spiral angle (radians).
    pub theta: f64,
    /// Current spiral radius (m).
    pub radius: f64,
    /// Radius the spiral wraps back to (m).
    pub r_min: f64,
    /// Radius beyond which the spiral wraps (m).
    pub r_max: f64,
    /// Angular rate (rad/s).
    pub angular_rate: f64,
    /// Radial rate (m/s).
    pub radial_rate: f64,
}

/// A bounded "fly to point" wait. Replaced (cancelled) by every new phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionTask {
    pub target: Position,
    pub stop_distance: f64,
    pub timeout_secs: f64,
    pub elapsed_secs: f64,
}

/// Per-agent flight/search state machine data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightControl {
    pub state: FlightState,
    pub plan: Option<SearchPlan>,
    pub spiral: SpiralPhase,
    /// Active waypoint task of Takeoff/Transit, if any.
    pub task: Option<MotionTask>,
    /// Timeout applied to each takeoff/transit task (s).
    pub phase_timeout_secs: f64,
    /// Distance of the transit gate from the ROI center (m).
    pub gate_offset: f64,
}

/// Per-agent proximity sensor.
#[derive(Debug, Clone, Default)]
pub struct ProximitySensor {
    /// Cleared when the coordinator freezes the agent.
    pub enabled: bool,
    pub radius: f64,
    pub margin: f64,
    pub cooldown_secs: f64,
    /// Detection volume computed on the last tick.
    pub volume: DetectionVolume,
    /// Candidate -> time of the last emitted event (s).
    pub last_seen: BTreeMap<CandidateId, f64>,
}

/// Vertical cylinder swept by a proximity sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionVolume {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub bottom: f64,
    pub top: f64,
}

impl DetectionVolume {
    pub fn contains(&self, p: &Position) -> bool {
        let dx = p.x - self.center_x;
        let dy = p.y - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius && p.z >= self.bottom && p.z <= self.top
    }
}

/// Vertical-progress monitor used to break control deadlocks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StuckMonitor {
    pub reference_altitude: f64,
    pub elapsed_secs: f64,
}

/// One precision landing attempt. Inserted when a winner commits,
/// removed on completion or after an abort finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingSession {
    pub agent: AgentId,
    pub target: Position,
    pub ring_min: f64,
    pub ring_max: f64,
    pub state: LandingState,
    pub landing_point: Option<Position>,
    pub pre_hover_point: Option<Position>,
    /// Time spent in the current state (s).
    pub state_elapsed_secs: f64,
    /// Timeout of the current state (s), if it has one.
    pub timeout_secs: Option<f64>,
    /// Continuous time inside the hold radius during touchdown (s).
    pub hold_elapsed_secs: f64,
    pub stuck: StuckMonitor,
    /// Altitude the abort climb aims for.
    pub abort_altitude: Option<f64>,
    pub abort_reason: Option<AbortReason>,
}
