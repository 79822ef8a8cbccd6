//! Tests for steering, the flight/search machine and the landing machine.

use seeker_core::components::{FlightControl, LandingSession, SearchPlan, SpiralPhase, StuckMonitor};
use seeker_core::config::{LandingConfig, SearchConfig};
use seeker_core::constants::{DT, STUCK_NUDGE};
use seeker_core::enums::{AbortReason, FlightState, LandingOutcome, LandingState};
use seeker_core::types::{AgentId, Orientation, Position, Velocity};
use seeker_terrain::{Obstacle, Terrain};

use crate::landing::{self, LandingContext};
use crate::registry::LandingRegistry;
use crate::search;
use crate::separation;
use crate::steering;

fn integrate(position: &mut Position, velocity: &Velocity, dt: f64) {
    position.x += velocity.x * dt;
    position.y += velocity.y * dt;
    position.z += velocity.z * dt;
}

fn plan() -> SearchPlan {
    SearchPlan {
        center: Position::new(0.0, 0.0, 0.0),
        radius: 20.0,
        start_angle_deg: 90.0,
        altitude: 8.0,
    }
}

fn armed(position: &Position) -> FlightControl {
    let mut ctrl = FlightControl::default();
    search::arm_and_search(&mut ctrl, position, plan(), &SearchConfig::default());
    ctrl
}

fn session_in(state: LandingState, landing_point: Position) -> LandingSession {
    LandingSession {
        agent: AgentId(0),
        target: Position::new(0.0, 0.0, 0.0),
        ring_min: 2.5,
        ring_max: 4.0,
        state,
        landing_point: Some(landing_point),
        pre_hover_point: Some(landing_point.with_z(landing_point.z + 6.0)),
        state_elapsed_secs: 0.0,
        timeout_secs: Some(30.0),
        hold_elapsed_secs: 0.0,
        stuck: StuckMonitor::default(),
        abort_altitude: None,
        abort_reason: None,
    }
}

struct Rig {
    position: Position,
    velocity: Velocity,
    orientation: Orientation,
}

impl Rig {
    fn at(position: Position) -> Self {
        Self {
            position,
            velocity: Velocity::zero(),
            orientation: Orientation::default(),
        }
    }

    /// One landing tick, optionally integrating motion afterwards.
    fn tick(
        &mut self,
        session: &mut LandingSession,
        terrain: &Terrain,
        config: &LandingConfig,
        integrate_motion: bool,
    ) -> landing::LandingUpdate {
        let update = {
            let mut ctx = LandingContext {
                position: &mut self.position,
                velocity: &mut self.velocity,
                orientation: &mut self.orientation,
                probe: terrain,
                neighbours: &[],
                config,
                dt: DT,
            };
            landing::step(session, &mut ctx)
        };
        if integrate_motion {
            integrate(&mut self.position, &self.velocity, DT);
        }
        update
    }

    /// Tick until the session finishes or `max_secs` elapse.
    fn run(
        &mut self,
        session: &mut LandingSession,
        terrain: &Terrain,
        config: &LandingConfig,
        max_secs: f64,
    ) -> Option<LandingOutcome> {
        let ticks = (max_secs / DT) as usize;
        for _ in 0..ticks {
            if let Some(outcome) = self.tick(session, terrain, config, true).finished {
                return Some(outcome);
            }
        }
        None
    }
}

// ---- Steering ----

#[test]
fn test_steering_converges_on_target() {
    let target = Position::new(12.0, -7.0, 5.0);
    let mut rig = Rig::at(Position::new(0.0, 0.0, 0.0));
    let mut last_distance = f64::MAX;
    for second in 0..20 {
        for _ in 0..30 {
            steering::steer_towards(
                &rig.position,
                &mut rig.velocity,
                &mut rig.orientation,
                &target,
                DT,
            );
            integrate(&mut rig.position, &rig.velocity, DT);
        }
        let distance = rig.position.range_to(&target);
        if second < 2 {
            assert!(distance < last_distance, "should close in early on");
        }
        last_distance = distance;
    }
    assert!(
        last_distance < 0.1,
        "should settle on target, still {last_distance:.3} m away"
    );
}

#[test]
fn test_velocity_blends_instead_of_snapping() {
    let mut velocity = Velocity::zero();
    let mut orientation = Orientation::default();
    let target = Position::new(100.0, 0.0, 0.0);
    steering::steer_towards(
        &Position::default(),
        &mut velocity,
        &mut orientation,
        &target,
        DT,
    );
    // One tick moves only a fraction of the way to the 6 m/s command.
    assert!(velocity.x > 0.0 && velocity.x < 6.0 * 0.2);
    assert!(velocity.z.abs() < 1e-12);
}

#[test]
fn test_vertical_rate_is_clamped() {
    let p = Position::new(0.0, 0.0, 0.0);
    assert!((steering::vertical_velocity(&p, 50.0) - 3.0).abs() < 1e-12);
    assert!((steering::vertical_velocity(&p, -50.0) + 3.0).abs() < 1e-12);
    assert!((steering::vertical_velocity(&p, 1.0) - 1.0).abs() < 1e-12);
}

#[test]
fn test_orientation_turns_toward_velocity() {
    let mut orientation = Orientation { yaw: 0.0 };
    let velocity = Velocity::new(0.0, 5.0, 0.0);
    for _ in 0..60 {
        steering::align_orientation(&mut orientation, &velocity, DT);
    }
    assert!((orientation.yaw - std::f64::consts::FRAC_PI_2).abs() < 0.01);
}

#[test]
fn test_wrap_angle() {
    use std::f64::consts::PI;
    assert!((steering::wrap_angle(3.0 * PI) - PI).abs() < 1e-9);
    assert!((steering::wrap_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-9);
    assert!(steering::wrap_angle(7.0).abs() <= PI);
}

// ---- Flight / search ----

#[test]
fn test_inner_radius_clamp() {
    assert_eq!(search::clamp_inner_radius(2.0, 20.0), 2.0);
    assert_eq!(search::clamp_inner_radius(0.2, 20.0), 1.0);
    assert_eq!(search::clamp_inner_radius(30.0, 20.0), 18.0);
    assert_eq!(search::clamp_inner_radius(2.0, 2.5), 1.0);
}

#[test]
fn test_spiral_radius_wraps_to_exact_minimum() {
    let mut spiral = SpiralPhase {
        theta: 0.0,
        radius: 1.0,
        r_min: 1.0,
        r_max: 2.0,
        angular_rate: 0.3,
        radial_rate: 0.5,
    };
    let mut radii = vec![spiral.radius];
    for _ in 0..200 {
        search::advance_spiral(&mut spiral, DT);
        radii.push(spiral.radius);
    }

    let wrap_at = (1..radii.len())
        .find(|&i| radii[i] < radii[i - 1])
        .expect("radius should wrap within 200 ticks");
    for pair in radii[..wrap_at].windows(2) {
        assert!(pair[1] > pair[0], "radius must strictly increase before wrap");
    }
    assert!(radii[wrap_at - 1] > 2.0, "wrap only after exceeding r_max");
    assert!(radii[wrap_at - 2] <= 2.0, "wrap on the tick after exceeding");
    assert_eq!(radii[wrap_at], 1.0, "reset is exact, not clamped");
}

#[test]
fn test_spiral_sequence_is_reproducible() {
    let start = SpiralPhase {
        theta: 0.5,
        radius: 2.0,
        r_min: 2.0,
        r_max: 5.0,
        angular_rate: 0.35,
        radial_rate: 0.8,
    };
    let run = || {
        let mut s = start;
        (0..500)
            .map(|_| {
                search::advance_spiral(&mut s, DT);
                s.radius
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_arm_resets_spiral_and_starts_takeoff() {
    let ctrl = armed(&Position::new(-25.0, 0.0, 0.0));
    assert_eq!(ctrl.state, FlightState::Takeoff);
    assert!((ctrl.spiral.theta - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert_eq!(ctrl.spiral.radius, 2.0);
    assert_eq!(ctrl.spiral.r_max, 20.0);
    let task = ctrl.task.expect("takeoff task");
    assert!((task.target.z - 3.0).abs() < 1e-12);
    assert_eq!(task.target.x, -25.0);
}

#[test]
fn test_rearm_cancels_in_flight_task() {
    let position = Position::new(0.0, 0.0, 0.0);
    let mut ctrl = armed(&position);
    let mut velocity = Velocity::zero();
    let mut orientation = Orientation::default();
    for _ in 0..30 {
        search::step(&mut ctrl, &position, &mut velocity, &mut orientation, DT);
    }
    assert!(ctrl.task.expect("task").elapsed_secs > 0.9);

    let higher = Position::new(0.0, 0.0, 5.0);
    search::arm_and_search(&mut ctrl, &higher, plan(), &SearchConfig::default());
    let task = ctrl.task.expect("task");
    assert_eq!(task.elapsed_secs, 0.0, "new phase must replace the old task");
    assert_eq!(task.target, higher);
    assert_eq!(ctrl.state, FlightState::Takeoff);
}

#[test]
fn test_transit_heads_for_configured_gate() {
    let position = Position::new(0.0, 0.0, 0.0);
    let config = SearchConfig {
        gate_offset: 7.0,
        ..SearchConfig::default()
    };
    let mut ctrl = FlightControl::default();
    search::arm_and_search(&mut ctrl, &position, plan(), &config);
    let mut velocity = Velocity::zero();
    let mut orientation = Orientation::default();
    while ctrl.state == FlightState::Takeoff {
        search::step(&mut ctrl, &position, &mut velocity, &mut orientation, DT);
    }

    assert_eq!(ctrl.state, FlightState::Transit);
    let gate = ctrl.task.expect("transit task").target;
    // Start angle 90 degrees: the gate lies on +y.
    assert!(gate.x.abs() < 1e-9);
    assert!((gate.y - 7.0).abs() < 1e-9);
    assert_eq!(gate.z, 8.0);

    let capped = SearchConfig {
        gate_offset: 50.0,
        ..SearchConfig::default()
    };
    search::arm_and_search(&mut ctrl, &position, plan(), &capped);
    assert_eq!(ctrl.gate_offset, 20.0);
}

#[test]
fn test_phase_timeouts_advance_silently() {
    // The agent never moves, so takeoff and transit can only end by timeout.
    let position = Position::new(0.0, 0.0, 0.0);
    let mut ctrl = armed(&position);
    let mut velocity = Velocity::zero();
    let mut orientation = Orientation::default();

    let mut ticks = 0;
    while ctrl.state == FlightState::Takeoff && ticks < 1000 {
        search::step(&mut ctrl, &position, &mut velocity, &mut orientation, DT);
        ticks += 1;
    }
    assert_eq!(ctrl.state, FlightState::Transit);
    assert!((449..=452).contains(&ticks), "takeoff ended after {ticks} ticks");

    let mut ticks = 0;
    while ctrl.state == FlightState::Transit && ticks < 1000 {
        search::step(&mut ctrl, &position, &mut velocity, &mut orientation, DT);
        ticks += 1;
    }
    assert_eq!(ctrl.state, FlightState::Search);
    assert!(ctrl.task.is_none());
}

#[test]
fn test_flight_reaches_search_at_cruise_altitude() {
    let mut rig = Rig::at(Position::new(-25.0, 0.0, 0.0));
    let mut ctrl = armed(&rig.position);
    let mut seen = vec![ctrl.state];

    for _ in 0..(60.0 / DT) as usize {
        let update = search::step(
            &mut ctrl,
            &rig.position,
            &mut rig.velocity,
            &mut rig.orientation,
            DT,
        );
        if update.changed() {
            seen.push(update.state);
        }
        integrate(&mut rig.position, &rig.velocity, DT);
    }

    assert_eq!(
        seen,
        vec![
            FlightState::Takeoff,
            FlightState::Transit,
            FlightState::Search
        ]
    );
    assert!((rig.position.z - 8.0).abs() < 0.5, "z = {}", rig.position.z);
    assert!(rig.position.horizontal_range_to(&Position::default()) <= 22.5);
}

#[test]
fn test_external_control_is_noop_and_resumes_search() {
    let position = Position::new(0.0, 0.0, 8.0);
    let mut ctrl = armed(&position);
    ctrl.state = FlightState::Search;
    ctrl.spiral.radius = 7.5;
    ctrl.spiral.theta = 1.25;

    search::begin_external_control(&mut ctrl);
    assert_eq!(ctrl.state, FlightState::ExternalControl);

    let mut velocity = Velocity::new(1.0, 2.0, 3.0);
    let mut orientation = Orientation::default();
    let update = search::step(&mut ctrl, &position, &mut velocity, &mut orientation, DT);
    assert!(!update.changed());
    assert_eq!(velocity, Velocity::new(1.0, 2.0, 3.0));

    search::end_external_control(&mut ctrl);
    assert_eq!(ctrl.state, FlightState::Search);
    assert_eq!(ctrl.spiral.radius, 7.5, "spiral is not reset");
    assert_eq!(ctrl.spiral.theta, 1.25);
}

#[test]
fn test_halt_forces_idle() {
    let position = Position::new(0.0, 0.0, 0.0);
    let mut ctrl = armed(&position);
    let mut velocity = Velocity::new(4.0, -1.0, 2.0);
    search::halt(&mut ctrl, &mut velocity);
    assert_eq!(ctrl.state, FlightState::Idle);
    assert_eq!(velocity, Velocity::zero());
    assert!(ctrl.task.is_none());
}

// ---- Landing: point selection ----

#[test]
fn test_select_point_prefers_nearby_clear_ground() {
    let terrain = Terrain::flat(0.0);
    let current = Position::new(0.0, 20.0, 8.0);
    let point = landing::select_landing_point(
        &Position::default(),
        2.5,
        4.0,
        24,
        6.0,
        &current,
        &terrain,
    );
    assert!((point.horizontal_range_to(&Position::default()) - 3.25).abs() < 1e-9);
    assert!(point.y > 3.0, "should pick the ring point facing the agent");
    assert_eq!(point.z, 0.0);
}

#[test]
fn test_select_point_skips_obstructed_samples() {
    // A wall covers the half of the ring facing the agent.
    let terrain = Terrain::flat(0.0).with_obstacle(Obstacle::Cuboid {
        min_x: -10.0,
        min_y: 0.5,
        max_x: 10.0,
        max_y: 10.0,
        height: 2.0,
    });
    let current = Position::new(0.0, 20.0, 8.0);
    let point = landing::select_landing_point(
        &Position::default(),
        2.5,
        4.0,
        24,
        6.0,
        &current,
        &terrain,
    );
    assert!(point.y < 0.5, "picked an obstructed point: {point:?}");
}

#[test]
fn test_select_point_skips_obstruction_taller_than_pre_hover() {
    // Tower on the ring point facing the agent, taller than the probe origin.
    let terrain = Terrain::flat(0.0).with_obstacle(Obstacle::Cylinder {
        x: 3.25,
        y: 0.0,
        radius: 1.0,
        height: 10.0,
    });
    let point = landing::select_landing_point(
        &Position::default(),
        2.5,
        4.0,
        24,
        6.0,
        &Position::new(20.0, 0.0, 8.0),
        &terrain,
    );
    let dx = point.x - 3.25;
    assert!(
        (dx * dx + point.y * point.y).sqrt() > 1.0,
        "landing point inside the tower: {point:?}"
    );
    assert!((point.horizontal_range_to(&Position::default()) - 3.25).abs() < 1e-9);
}

#[test]
fn test_select_point_falls_back_to_angle_zero_when_all_obstructed() {
    let terrain = Terrain::flat(0.0).with_obstacle(Obstacle::Cylinder {
        x: 0.0,
        y: 0.0,
        radius: 10.0,
        height: 1.0,
    });
    let point = landing::select_landing_point(
        &Position::default(),
        2.5,
        4.0,
        24,
        6.0,
        &Position::new(0.0, 20.0, 8.0),
        &terrain,
    );
    assert!((point.x - 3.25).abs() < 1e-9);
    assert!(point.y.abs() < 1e-9);
}

#[test]
fn test_pre_hover_timeout_is_clamped() {
    let a = Position::default();
    assert_eq!(landing::pre_hover_timeout(&a, &a), 10.0);
    assert_eq!(
        landing::pre_hover_timeout(&a, &Position::new(10_000.0, 0.0, 0.0)),
        90.0
    );
    let mid = landing::pre_hover_timeout(&a, &Position::new(60.0, 0.0, 0.0));
    assert!(mid > 10.0 && mid < 90.0);
}

// ---- Landing: full sequence ----

#[test]
fn test_landing_completes_on_flat_ground() {
    let terrain = Terrain::flat(0.0);
    let config = LandingConfig::default();
    let mut registry = LandingRegistry::new();
    let mut rig = Rig::at(Position::new(10.0, 0.0, 8.0));
    let mut flight = armed(&rig.position);
    flight.state = FlightState::Search;

    let mut session = landing::begin(
        AgentId(0),
        Position::default(),
        config.ring_min,
        config.ring_max,
        &mut flight,
        &mut registry,
    );
    assert_eq!(flight.state, FlightState::ExternalControl);
    assert!(registry.contains(AgentId(0)));

    let mut states = vec![session.state];
    let mut outcome = None;
    for _ in 0..(60.0 / DT) as usize {
        let update = rig.tick(&mut session, &terrain, &config, true);
        if update.changed() {
            states.push(update.state);
        }
        if update.finished.is_some() {
            outcome = update.finished;
            break;
        }
    }

    assert_eq!(outcome, Some(LandingOutcome::Completed));
    assert_eq!(
        states,
        vec![
            LandingState::SelectPoint,
            LandingState::PreHover,
            LandingState::Descent,
            LandingState::Touchdown,
            LandingState::Complete
        ]
    );
    let landing_point = session.landing_point.expect("landing point");
    assert!(rig.position.range_to(&landing_point) < 1e-9);
    assert_eq!(rig.velocity, Velocity::zero());

    landing::release(&session, &mut flight, &mut registry);
    assert!(registry.is_empty());
    assert_eq!(flight.state, FlightState::Search);
}

#[test]
fn test_ground_snap_is_idempotent_across_approaches() {
    let terrain = Terrain::flat(0.5);
    let config = LandingConfig::default();
    let landing_point = Position::new(3.0, 0.0, 0.5);

    let mut finals = Vec::new();
    for start in [Position::new(10.0, 5.0, 8.0), Position::new(-6.0, -4.0, 9.5)] {
        let mut session = session_in(LandingState::PreHover, landing_point);
        session.timeout_secs = Some(60.0);
        let mut rig = Rig::at(start);
        let outcome = rig.run(&mut session, &terrain, &config, 90.0);
        assert_eq!(outcome, Some(LandingOutcome::Completed));
        finals.push(rig.position);
    }
    assert!(finals[0].range_to(&finals[1]) < 1e-9);
    assert!(finals[0].range_to(&landing_point) < 1e-9);
}

#[test]
fn test_ground_miss_aborts_and_releases_control() {
    let terrain = Terrain::flat(0.0).with_void(0.0, 0.0, 10.0);
    let config = LandingConfig::default();
    let mut registry = LandingRegistry::new();
    let mut rig = Rig::at(Position::new(10.0, 10.0, 8.0));
    let mut flight = armed(&rig.position);
    flight.state = FlightState::Search;

    let mut session = landing::begin(
        AgentId(3),
        Position::default(),
        config.ring_min,
        config.ring_max,
        &mut flight,
        &mut registry,
    );
    let update = rig.tick(&mut session, &terrain, &config, true);
    assert_eq!(update.state, LandingState::Abort, "abort is immediate");
    assert_eq!(session.abort_reason, Some(AbortReason::NoGround));

    let start_z = rig.position.z;
    let outcome = rig.run(&mut session, &terrain, &config, 10.0);
    assert_eq!(outcome, Some(LandingOutcome::Aborted));
    assert!(rig.position.z > start_z + 1.0, "abort climbs clear");

    landing::release(&session, &mut flight, &mut registry);
    assert!(!registry.contains(AgentId(3)));
    assert_eq!(flight.state, FlightState::Search);
}

#[test]
fn test_pre_hover_timeout_aborts() {
    let terrain = Terrain::flat(0.0);
    let config = LandingConfig::default();
    let mut session = session_in(LandingState::PreHover, Position::new(3.0, 0.0, 0.0));
    session.timeout_secs = Some(10.0);
    // Pinned agent at pre-hover altitude: never arrives.
    let mut rig = Rig::at(Position::new(40.0, 0.0, 6.0));

    let mut ticks = 0;
    while session.state == LandingState::PreHover && ticks < 1000 {
        rig.tick(&mut session, &terrain, &config, false);
        ticks += 1;
    }
    assert_eq!(session.state, LandingState::Abort);
    assert_eq!(session.abort_reason, Some(AbortReason::PreHoverTimeout));
    assert!((299..=301).contains(&ticks));
}

// ---- Landing: descent details ----

#[test]
fn test_descent_rate_tapers_near_ground() {
    let config = LandingConfig::default();
    assert_eq!(landing::descent_rate(10.0, &config), 1.5);
    assert!((landing::descent_rate(0.0, &config) - 1.5 * 0.25).abs() < 1e-12);
    let halfway = landing::descent_rate(1.0, &config);
    assert!((halfway - 1.5 * (0.25 + 0.75 * 0.5)).abs() < 1e-12);
}

#[test]
fn test_descent_escapes_keep_out_before_descending() {
    let terrain = Terrain::flat(0.0);
    let config = LandingConfig::default();
    let mut session = session_in(LandingState::Descent, Position::new(3.0, 0.0, 0.0));
    let mut rig = Rig::at(Position::new(0.5, 0.0, 4.0));

    let start_distance = rig.position.horizontal_range_to(&session.target);
    for _ in 0..5 {
        rig.tick(&mut session, &terrain, &config, true);
        assert!(rig.velocity.z.abs() < 1e-12, "no descent inside keep-out");
    }
    assert!(rig.position.horizontal_range_to(&session.target) > start_distance);
    assert!((rig.position.z - 4.0).abs() < 1e-12);
}

#[test]
fn test_stuck_descent_gets_nudged() {
    let terrain = Terrain::flat(0.0);
    let config = LandingConfig::default();
    let mut session = session_in(LandingState::Descent, Position::new(3.0, 0.0, 0.0));
    let mut rig = Rig::at(Position::new(3.0, 0.0, 5.0));

    // Motion is never integrated: the vertical command makes no progress.
    for _ in 0..30 {
        rig.tick(&mut session, &terrain, &config, false);
    }
    assert!(
        (rig.position.z - (5.0 - STUCK_NUDGE)).abs() < 1e-9,
        "expected exactly one nudge, z = {}",
        rig.position.z
    );
}

#[test]
fn test_touchdown_excursion_resets_hold() {
    let terrain = Terrain::flat(0.0);
    let config = LandingConfig::default();
    let landing_point = Position::new(3.0, 0.0, 0.0);
    let mut session = session_in(LandingState::Touchdown, landing_point);
    session.hold_elapsed_secs = 0.2;

    let mut rig = Rig::at(Position::new(4.0, 0.0, 0.0));
    rig.tick(&mut session, &terrain, &config, false);
    assert_eq!(session.hold_elapsed_secs, 0.0);
    assert!(rig.velocity.x < 0.0, "slides back toward the point");

    rig.position = Position::new(3.1, 0.0, 0.0);
    let mut completed_at = None;
    for tick in 1..=20 {
        if rig.tick(&mut session, &terrain, &config, false).finished
            == Some(LandingOutcome::Completed)
        {
            completed_at = Some(tick);
            break;
        }
    }
    let tick = completed_at.expect("hold should complete");
    assert!((12..=13).contains(&tick), "completed after {tick} ticks");
}

// ---- Separation & registry ----

#[test]
fn test_separation_repels_close_neighbours() {
    let config = LandingConfig::default();
    let push = separation::separation_velocity(
        &Position::new(0.0, 0.0, 5.0),
        &[Position::new(1.0, 0.0, 5.0), Position::new(50.0, 0.0, 5.0)],
        &Position::new(100.0, 100.0, 0.0),
        &config,
    );
    assert!((push.x + 3.0).abs() < 1e-12, "push = {push:?}");
    assert!(push.y.abs() < 1e-12);
}

#[test]
fn test_keep_out_repels_from_target() {
    let config = LandingConfig::default();
    let push = separation::keep_out_velocity(
        &Position::new(1.0, 0.0, 5.0),
        &Position::new(0.0, 0.0, 0.0),
        &config,
    );
    assert!((push.x - 0.75).abs() < 1e-12);
}

#[test]
fn test_registry_admits_each_agent_once() {
    let mut registry = LandingRegistry::new();
    assert!(registry.register(AgentId(1)));
    assert!(!registry.register(AgentId(1)));
    assert!(registry.register(AgentId(2)));
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.others(AgentId(1)).collect::<Vec<_>>(), vec![AgentId(2)]);
    assert!(registry.deregister(AgentId(1)));
    assert!(!registry.deregister(AgentId(1)));
    assert_eq!(registry.len(), 1);
}
