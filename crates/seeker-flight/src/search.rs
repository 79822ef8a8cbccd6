//! Flight/search state machine.
//!
//! `Idle → Takeoff → Transit → Search`, with `ExternalControl` entered while a
//! landing session owns the agent and `Idle` reachable from anywhere via
//! [`halt`]. Takeoff and transit are bounded waits: when their timeout
//! expires the machine moves on to the next phase anyway.

use tracing::{debug, info};

use seeker_core::components::{FlightControl, MotionTask, SearchPlan, SpiralPhase};
use seeker_core::config::SearchConfig;
use seeker_core::constants::WAYPOINT_STOP_DISTANCE;
use seeker_core::enums::FlightState;
use seeker_core::types::{Orientation, Position, Velocity};

use crate::steering;

/// Result of one flight tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightUpdate {
    pub previous: FlightState,
    pub state: FlightState,
}

impl FlightUpdate {
    pub fn changed(&self) -> bool {
        self.previous != self.state
    }
}

/// Clamp the requested inner radius into `[1, radius - 2]`.
pub fn clamp_inner_radius(requested: f64, radius: f64) -> f64 {
    requested.min(radius - 2.0).max(1.0)
}

/// Reset the spiral, cancel any in-flight motion and begin takeoff.
pub fn arm_and_search(
    ctrl: &mut FlightControl,
    position: &Position,
    plan: SearchPlan,
    config: &SearchConfig,
) {
    let r_min = clamp_inner_radius(config.inner_radius, plan.radius);
    ctrl.spiral = SpiralPhase {
        theta: plan.start_angle_deg.to_radians(),
        radius: r_min,
        r_min,
        r_max: plan.radius,
        angular_rate: config.angular_rate_deg.to_radians(),
        radial_rate: config.radial_rate,
    };
    ctrl.plan = Some(plan);
    ctrl.phase_timeout_secs = config.phase_timeout_secs;
    ctrl.gate_offset = config.gate_offset.min(plan.radius);
    cancel_task(ctrl);

    let clearance = plan.center.z + config.takeoff_clearance;
    let takeoff_target = position.with_z(position.z.max(clearance));
    start_task(ctrl, takeoff_target, ctrl.phase_timeout_secs);
    ctrl.state = FlightState::Takeoff;
    debug!(
        start_angle_deg = plan.start_angle_deg,
        r_min,
        r_max = plan.radius,
        "armed for search"
    );
}

/// Hand motion over to an external controller.
pub fn begin_external_control(ctrl: &mut FlightControl) {
    cancel_task(ctrl);
    ctrl.state = FlightState::ExternalControl;
}

/// Take motion back. Resumes the spiral where it left off.
pub fn end_external_control(ctrl: &mut FlightControl) {
    if ctrl.state != FlightState::ExternalControl {
        return;
    }
    ctrl.state = if ctrl.plan.is_some() {
        FlightState::Search
    } else {
        FlightState::Idle
    };
}

/// Cancel all pending motion, zero velocity and force `Idle`.
pub fn halt(ctrl: &mut FlightControl, velocity: &mut Velocity) {
    cancel_task(ctrl);
    *velocity = Velocity::zero();
    ctrl.state = FlightState::Idle;
}

/// Advance the spiral by one tick.
///
/// The radius grows until it exceeds `r_max`; on the following tick it
/// resets to exactly `r_min`.
pub fn advance_spiral(spiral: &mut SpiralPhase, dt: f64) {
    spiral.theta += spiral.angular_rate * dt;
    if spiral.radius > spiral.r_max {
        spiral.radius = spiral.r_min;
    } else {
        spiral.radius += spiral.radial_rate * dt;
    }
}

/// Current spiral target point at cruise altitude.
pub fn spiral_target(plan: &SearchPlan, spiral: &SpiralPhase) -> Position {
    plan.center
        .offset_polar(spiral.theta, spiral.radius)
        .with_z(plan.center.z + plan.altitude)
}

/// Transit gate: `gate_offset` from the ROI center along the start angle,
/// at cruise altitude.
pub fn gate_point(plan: &SearchPlan, gate_offset: f64) -> Position {
    plan.center
        .offset_polar(plan.start_angle_deg.to_radians(), gate_offset)
        .with_z(plan.center.z + plan.altitude)
}

/// Run one tick of the flight state machine.
pub fn step(
    ctrl: &mut FlightControl,
    position: &Position,
    velocity: &mut Velocity,
    orientation: &mut Orientation,
    dt: f64,
) -> FlightUpdate {
    let previous = ctrl.state;
    match ctrl.state {
        FlightState::Idle | FlightState::ExternalControl => {}
        FlightState::Takeoff | FlightState::Transit => {
            step_waypoint(ctrl, position, velocity, orientation, dt);
        }
        FlightState::Search => {
            if let Some(plan) = ctrl.plan {
                advance_spiral(&mut ctrl.spiral, dt);
                let target = spiral_target(&plan, &ctrl.spiral);
                steering::steer_towards(position, velocity, orientation, &target, dt);
            }
        }
    }
    FlightUpdate {
        previous,
        state: ctrl.state,
    }
}

fn step_waypoint(
    ctrl: &mut FlightControl,
    position: &Position,
    velocity: &mut Velocity,
    orientation: &mut Orientation,
    dt: f64,
) {
    let Some(task) = ctrl.task.as_mut() else {
        advance_phase(ctrl);
        return;
    };
    task.elapsed_secs += dt;

    if position.range_to(&task.target) <= task.stop_distance {
        advance_phase(ctrl);
    } else if task.elapsed_secs >= task.timeout_secs {
        info!(
            phase = ?ctrl.state,
            timeout_secs = task.timeout_secs,
            "phase timed out, continuing"
        );
        advance_phase(ctrl);
    } else {
        let target = task.target;
        steering::steer_towards(position, velocity, orientation, &target, dt);
    }
}

fn advance_phase(ctrl: &mut FlightControl) {
    let Some(plan) = ctrl.plan else {
        cancel_task(ctrl);
        ctrl.state = FlightState::Idle;
        return;
    };
    let timeout = ctrl.phase_timeout_secs;
    match ctrl.state {
        FlightState::Takeoff => {
            let gate = gate_point(&plan, ctrl.gate_offset);
            cancel_task(ctrl);
            start_task(ctrl, gate, timeout);
            ctrl.state = FlightState::Transit;
        }
        FlightState::Transit => {
            cancel_task(ctrl);
            ctrl.state = FlightState::Search;
        }
        _ => {}
    }
}

fn start_task(ctrl: &mut FlightControl, target: Position, timeout_secs: f64) {
    ctrl.task = Some(MotionTask {
        target,
        stop_distance: WAYPOINT_STOP_DISTANCE,
        timeout_secs,
        elapsed_secs: 0.0,
    });
}

fn cancel_task(ctrl: &mut FlightControl) {
    ctrl.task = None;
}
