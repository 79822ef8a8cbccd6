//! Precision landing state machine.
//!
//! `Idle → SelectPoint → PreHover → Descent → Touchdown → Complete`, with
//! `Abort` reachable when the ground cannot be resolved or a phase times
//! out. While a session is active it owns the agent's motion and is listed
//! in the [`LandingRegistry`] so other landing agents keep their distance.

use glam::{DVec2, DVec3};
use tracing::{debug, info, warn};

use seeker_core::components::{FlightControl, LandingSession, StuckMonitor};
use seeker_core::config::LandingConfig;
use seeker_core::constants::*;
use seeker_core::enums::{AbortReason, LandingOutcome, LandingState};
use seeker_core::types::{AgentId, Orientation, Position, Velocity};
use seeker_terrain::{GroundProbe, ProbeFilter, SurfaceKind};

use crate::registry::LandingRegistry;
use crate::search;
use crate::separation;
use crate::steering;

/// Everything a landing tick reads or moves.
pub struct LandingContext<'a> {
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
    pub orientation: &'a mut Orientation,
    pub probe: &'a dyn GroundProbe,
    /// Other registered landing agents, as of the previous tick.
    pub neighbours: &'a [Position],
    pub config: &'a LandingConfig,
    pub dt: f64,
}

/// Output of one landing tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingUpdate {
    pub previous: LandingState,
    pub state: LandingState,
    /// Set once, on the tick the session ends.
    pub finished: Option<LandingOutcome>,
}

impl LandingUpdate {
    pub fn changed(&self) -> bool {
        self.previous != self.state
    }
}

/// Start a landing: take exclusive control of the agent's motion and
/// register for separation.
pub fn begin(
    agent: AgentId,
    target: Position,
    ring_min: f64,
    ring_max: f64,
    flight: &mut FlightControl,
    registry: &mut LandingRegistry,
) -> LandingSession {
    search::begin_external_control(flight);
    if !registry.register(agent) {
        warn!(%agent, "landing session already registered");
    }
    info!(%agent, x = target.x, y = target.y, "landing started");
    LandingSession {
        agent,
        target,
        ring_min,
        ring_max,
        state: LandingState::SelectPoint,
        landing_point: None,
        pre_hover_point: None,
        state_elapsed_secs: 0.0,
        timeout_secs: None,
        hold_elapsed_secs: 0.0,
        stuck: StuckMonitor::default(),
        abort_altitude: None,
        abort_reason: None,
    }
}

/// Hand control back to the flight machine and leave the registry.
pub fn release(session: &LandingSession, flight: &mut FlightControl, registry: &mut LandingRegistry) {
    search::end_external_control(flight);
    registry.deregister(session.agent);
}

/// Run one tick of the landing state machine.
pub fn step(session: &mut LandingSession, ctx: &mut LandingContext<'_>) -> LandingUpdate {
    let previous = session.state;
    session.state_elapsed_secs += ctx.dt;

    let finished = match session.state {
        LandingState::Idle | LandingState::Complete => None,
        LandingState::SelectPoint => {
            step_select_point(session, ctx);
            None
        }
        LandingState::PreHover => {
            step_pre_hover(session, ctx);
            None
        }
        LandingState::Descent => {
            step_descent(session, ctx);
            None
        }
        LandingState::Touchdown => step_touchdown(session, ctx),
        LandingState::Abort => step_abort(session, ctx),
    };

    LandingUpdate {
        previous,
        state: session.state,
        finished,
    }
}

/// Pick the landing point on the ring around `target`.
///
/// Samples are spread evenly at the ring's mid-radius; samples whose
/// clearance probe hits an obstruction (or nothing) are discarded. If no
/// sample survives, the ring point at angle 0 is returned and the ground
/// probe that follows decides whether the landing can proceed.
pub fn select_landing_point(
    target: &Position,
    ring_min: f64,
    ring_max: f64,
    samples: u32,
    pre_hover_height: f64,
    current: &Position,
    probe: &dyn GroundProbe,
) -> Position {
    let mid = (ring_min + ring_max) / 2.0;
    let fallback = target.offset_polar(0.0, mid);
    let mut best: Option<(f64, Position)> = None;

    for i in 0..samples {
        let angle = std::f64::consts::TAU * i as f64 / samples as f64;
        let sample = target.offset_polar(angle, mid);
        let origin = sample.with_z(target.z + pre_hover_height);
        let Some(hit) = probe.cast_down(&origin, GROUND_PROBE_DISTANCE, ProbeFilter::Any) else {
            continue;
        };
        if hit.kind != SurfaceKind::Ground {
            continue;
        }
        let score = SCORE_TARGET_WEIGHT * hit.point.horizontal_range_to(target)
            - SCORE_TRAVEL_WEIGHT * current.range_to(&origin);
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, hit.point));
        }
    }

    best.map_or(fallback, |(_, point)| point)
}

/// Pre-hover timeout from the estimated travel time, clamped to [10 s, 90 s].
pub fn pre_hover_timeout(from: &Position, to: &Position) -> f64 {
    let estimate = from.range_to(to) / STEER_SPEED;
    (estimate * PRE_HOVER_TIME_FACTOR + PRE_HOVER_TIME_ALLOWANCE)
        .clamp(PRE_HOVER_TIMEOUT_MIN, PRE_HOVER_TIMEOUT_MAX)
}

/// Descent rate after tapering near the ground.
pub fn descent_rate(height_above_ground: f64, config: &LandingConfig) -> f64 {
    if height_above_ground >= config.taper_altitude || config.taper_altitude <= 0.0 {
        return config.descent_rate;
    }
    let t = (height_above_ground / config.taper_altitude).clamp(0.0, 1.0);
    let fraction = config.taper_min_fraction + (1.0 - config.taper_min_fraction) * t;
    config.descent_rate * fraction
}

fn step_select_point(session: &mut LandingSession, ctx: &mut LandingContext<'_>) {
    let candidate = select_landing_point(
        &session.target,
        session.ring_min,
        session.ring_max,
        ctx.config.samples,
        ctx.config.pre_hover_height,
        ctx.position,
        ctx.probe,
    );

    let origin = candidate.with_z(session.target.z + GROUND_PROBE_HEIGHT);
    let Some(hit) = ctx
        .probe
        .cast_down(&origin, GROUND_PROBE_DISTANCE, ProbeFilter::GroundOnly)
    else {
        warn!(agent = %session.agent, "no ground below landing point");
        enter_abort(session, AbortReason::NoGround, ctx.position, ctx.config);
        return;
    };

    let landing_point = hit.point;
    let pre_hover_point = landing_point.with_z(landing_point.z + ctx.config.pre_hover_height);
    session.landing_point = Some(landing_point);
    session.pre_hover_point = Some(pre_hover_point);
    let timeout = pre_hover_timeout(ctx.position, &pre_hover_point);
    debug!(
        agent = %session.agent,
        x = landing_point.x,
        y = landing_point.y,
        z = landing_point.z,
        timeout_secs = timeout,
        "landing point selected"
    );
    enter(session, LandingState::PreHover, Some(timeout), ctx.position);
}

fn step_pre_hover(session: &mut LandingSession, ctx: &mut LandingContext<'_>) {
    let Some(pre_hover) = session.pre_hover_point else {
        enter_abort(session, AbortReason::NoGround, ctx.position, ctx.config);
        return;
    };

    if ctx.position.range_to(&pre_hover) <= PRE_HOVER_STOP_DISTANCE {
        let timeout = ctx.config.descent_timeout_secs;
        enter(session, LandingState::Descent, Some(timeout), ctx.position);
        return;
    }
    if timed_out(session) {
        warn!(agent = %session.agent, "pre-hover timed out");
        enter_abort(session, AbortReason::PreHoverTimeout, ctx.position, ctx.config);
        return;
    }

    let mut desired = steering::desired_velocity(ctx.position, &pre_hover);
    let push =
        separation::separation_velocity(ctx.position, ctx.neighbours, &session.target, ctx.config);
    desired += push.extend(0.0);
    steering::apply(ctx.velocity, ctx.orientation, desired, ctx.dt);
    check_stuck(session, ctx.position, desired.z, ctx.dt);
}

fn step_descent(session: &mut LandingSession, ctx: &mut LandingContext<'_>) {
    let Some(landing_point) = session.landing_point else {
        enter_abort(session, AbortReason::NoGround, ctx.position, ctx.config);
        return;
    };

    let height = ctx.position.z - landing_point.z;
    if height <= ctx.config.landing_tolerance {
        touch_down(session, ctx, &landing_point);
        return;
    }
    if timed_out(session) {
        warn!(agent = %session.agent, height, "descent timed out");
        enter_abort(session, AbortReason::DescentTimeout, ctx.position, ctx.config);
        return;
    }

    let from_target = ctx.position.horizontal() - session.target.horizontal();
    let mut desired = if from_target.length() < ctx.config.keep_out_radius {
        // Too close to the target: slide out along the tangent, hold altitude.
        let radial = from_target.try_normalize().unwrap_or(DVec2::X);
        let escape = (radial.perp() + radial).normalize() * STEER_SPEED * 0.5;
        escape.extend(0.0)
    } else {
        let planar = steering::planar_velocity(ctx.position, &landing_point);
        DVec3::new(planar.x, planar.y, -descent_rate(height, ctx.config))
    };
    let push =
        separation::separation_velocity(ctx.position, ctx.neighbours, &session.target, ctx.config);
    desired += push.extend(0.0);

    steering::apply(ctx.velocity, ctx.orientation, desired, ctx.dt);
    check_stuck(session, ctx.position, desired.z, ctx.dt);
}

fn touch_down(session: &mut LandingSession, ctx: &mut LandingContext<'_>, landing_point: &Position) {
    if ctx.config.snap_on_touchdown {
        ctx.position.x = landing_point.x;
        ctx.position.y = landing_point.y;
    }
    ctx.position.z = landing_point.z;
    if ctx.config.freeze_on_touchdown {
        *ctx.velocity = Velocity::zero();
    } else {
        ctx.velocity.z = 0.0;
    }
    session.hold_elapsed_secs = 0.0;
    let timeout = ctx.config.touchdown_timeout_secs;
    enter(session, LandingState::Touchdown, Some(timeout), ctx.position);
}

fn step_touchdown(
    session: &mut LandingSession,
    ctx: &mut LandingContext<'_>,
) -> Option<LandingOutcome> {
    let landing_point = session.landing_point?;

    if ctx.position.horizontal_range_to(&landing_point) <= ctx.config.hold_radius {
        session.hold_elapsed_secs += ctx.dt;
        if ctx.config.freeze_on_touchdown {
            *ctx.velocity = Velocity::zero();
        }
        if session.hold_elapsed_secs >= ctx.config.hold_secs {
            info!(agent = %session.agent, "landing complete");
            enter(session, LandingState::Complete, None, ctx.position);
            return Some(LandingOutcome::Completed);
        }
        return None;
    }

    // Excursion: restart the hold and slide back onto the point.
    session.hold_elapsed_secs = 0.0;
    if timed_out(session) {
        warn!(agent = %session.agent, "touchdown hold timed out");
        enter_abort(session, AbortReason::TouchdownTimeout, ctx.position, ctx.config);
        return None;
    }
    let planar = steering::planar_velocity(ctx.position, &landing_point);
    steering::apply(ctx.velocity, ctx.orientation, planar.extend(0.0), ctx.dt);
    None
}

fn step_abort(session: &mut LandingSession, ctx: &mut LandingContext<'_>) -> Option<LandingOutcome> {
    let climb_to = session
        .abort_altitude
        .unwrap_or(ctx.position.z + ctx.config.abort_climb);

    if ctx.position.z >= climb_to - WAYPOINT_STOP_DISTANCE * 0.5 || timed_out(session) {
        *ctx.velocity = Velocity::new(ctx.velocity.x, ctx.velocity.y, 0.0);
        info!(
            agent = %session.agent,
            reason = ?session.abort_reason,
            "landing aborted, releasing control"
        );
        return Some(LandingOutcome::Aborted);
    }

    let desired = DVec3::new(0.0, 0.0, steering::vertical_velocity(ctx.position, climb_to));
    steering::apply(ctx.velocity, ctx.orientation, desired, ctx.dt);
    check_stuck(session, ctx.position, desired.z, ctx.dt);
    None
}

fn enter(session: &mut LandingSession, state: LandingState, timeout: Option<f64>, position: &Position) {
    session.state = state;
    session.state_elapsed_secs = 0.0;
    session.timeout_secs = timeout;
    reset_stuck(session, position);
}

fn enter_abort(
    session: &mut LandingSession,
    reason: AbortReason,
    position: &Position,
    config: &LandingConfig,
) {
    session.abort_reason = Some(reason);
    session.abort_altitude = Some(position.z + config.abort_climb);
    enter(session, LandingState::Abort, Some(config.abort_timeout_secs), position);
}

fn timed_out(session: &LandingSession) -> bool {
    session
        .timeout_secs
        .is_some_and(|limit| session.state_elapsed_secs >= limit)
}

fn reset_stuck(session: &mut LandingSession, position: &Position) {
    session.stuck = StuckMonitor {
        reference_altitude: position.z,
        elapsed_secs: 0.0,
    };
}

/// Nudge the agent when a vertical command makes no progress for too long.
fn check_stuck(session: &mut LandingSession, position: &mut Position, commanded_vz: f64, dt: f64) {
    if commanded_vz.abs() < STUCK_MIN_COMMAND
        || (position.z - session.stuck.reference_altitude).abs() > STUCK_EPSILON
    {
        reset_stuck(session, position);
        return;
    }
    session.stuck.elapsed_secs += dt;
    if session.stuck.elapsed_secs > STUCK_TIME_SECS {
        position.z += STUCK_NUDGE * commanded_vz.signum();
        debug!(agent = %session.agent, z = position.z, "vertical stall, nudged");
        reset_stuck(session, position);
    }
}
