//! Entity spawn factories for setting up a mission world.
//!
//! Creates the agent fleet on a launch line outside the ROI and places
//! candidates on the ground inside it.

use std::collections::HashSet;

use hecs::{Entity, EntityBuilder, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, warn};

use seeker_core::components::*;
use seeker_core::config::{AgentSpec, CandidateSpec, MissionConfig};
use seeker_core::constants::*;
use seeker_core::enums::ControlOwner;
use seeker_core::types::{AgentId, CandidateId, Orientation, Position, Velocity};

use seeker_flight::search;
use seeker_terrain::{GroundProbe, ProbeFilter};

/// Entities created for one mission run.
#[derive(Debug, Default)]
pub struct MissionSetup {
    pub agents: Vec<(AgentId, Entity)>,
    pub candidates: Vec<(CandidateId, Entity)>,
}

/// Spawn the fleet and the candidates for a mission over `roi_center`.
pub fn setup_mission(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    probe: &dyn GroundProbe,
    config: &MissionConfig,
    roi_center: Position,
) -> MissionSetup {
    MissionSetup {
        agents: spawn_agents(world, probe, config, roi_center),
        candidates: spawn_candidates(
            world,
            rng,
            probe,
            &config.candidates,
            roi_center,
            config.roi_radius,
        ),
    }
}

/// Spawn one agent per spec and arm every agent that can search.
pub fn spawn_agents(
    world: &mut World,
    probe: &dyn GroundProbe,
    config: &MissionConfig,
    roi_center: Position,
) -> Vec<(AgentId, Entity)> {
    let count = config.agents.len();
    config
        .agents
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let id = AgentId(index as u32);
            let position = launch_position(probe, roi_center, config.roi_radius, index, count);
            let plan = SearchPlan {
                center: roi_center,
                radius: config.roi_radius,
                start_angle_deg: 360.0 * index as f64 / count as f64,
                altitude: config.cruise_altitude + index as f64 * config.altitude_step,
            };
            (id, spawn_agent(world, id, spec, position, plan, config))
        })
        .collect()
}

fn spawn_agent(
    world: &mut World,
    id: AgentId,
    spec: &AgentSpec,
    position: Position,
    plan: SearchPlan,
    config: &MissionConfig,
) -> Entity {
    let name = if spec.name.is_empty() {
        id.to_string()
    } else {
        spec.name.clone()
    };

    let mut flight = FlightControl::default();
    if spec.sensor {
        search::arm_and_search(&mut flight, &position, plan, &config.search);
    } else {
        error!(agent = %id, %name, "agent has no proximity sensor, not armed");
    }
    if !spec.lander {
        warn!(agent = %id, %name, "agent has no landing controller");
    }

    let mut builder = EntityBuilder::new();
    builder.add(Agent { id, name }).add_bundle((
        position,
        Velocity::zero(),
        Orientation::default(),
        flight,
        ControlOwner::SelfControlled,
    ));
    if spec.sensor {
        builder.add(ProximitySensor {
            enabled: true,
            radius: config.sensor.radius,
            margin: config.sensor.margin,
            cooldown_secs: config.sensor.cooldown_secs,
            ..ProximitySensor::default()
        });
    }
    if spec.lander {
        builder.add(Lander);
    }
    world.spawn(builder.build())
}

/// Launch line west of the ROI, agents spaced along y, on the ground.
fn launch_position(
    probe: &dyn GroundProbe,
    roi_center: Position,
    roi_radius: f64,
    index: usize,
    count: usize,
) -> Position {
    let offset = index as f64 - (count as f64 - 1.0) / 2.0;
    let x = roi_center.x - (roi_radius + LAUNCH_STANDOFF);
    let y = roi_center.y + offset * LAUNCH_SPACING;
    snap_to_ground(probe, x, y, roi_center.z).unwrap_or(Position::new(x, y, roi_center.z))
}

/// Place each candidate kind at most once on the ground inside the ROI.
pub fn spawn_candidates(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    probe: &dyn GroundProbe,
    specs: &[CandidateSpec],
    roi_center: Position,
    roi_radius: f64,
) -> Vec<(CandidateId, Entity)> {
    let mut kinds = HashSet::new();
    let mut spawned = Vec::new();

    for spec in specs {
        if spec.description.trim().is_empty() {
            warn!(kind = %spec.kind, "candidate without description skipped");
            continue;
        }
        if !kinds.insert(spec.kind.as_str()) {
            warn!(kind = %spec.kind, "candidate kind already placed, skipped");
            continue;
        }
        let Some(position) = place_on_ground(rng, probe, roi_center, roi_radius) else {
            warn!(kind = %spec.kind, "no ground found for candidate, skipped");
            continue;
        };

        let id = CandidateId(spawned.len() as u32);
        let entity = world.spawn((
            Candidate {
                id,
                kind: spec.kind.clone(),
                description: spec.description.clone(),
            },
            position,
        ));
        debug!(candidate = %id, kind = %spec.kind, x = position.x, y = position.y, "candidate placed");
        spawned.push((id, entity));
    }
    spawned
}

/// Uniform-by-area sample inside the ROI disc, snapped to the ground.
fn place_on_ground(
    rng: &mut ChaCha8Rng,
    probe: &dyn GroundProbe,
    center: Position,
    radius: f64,
) -> Option<Position> {
    (0..PLACEMENT_ATTEMPTS).find_map(|_| {
        let r = radius * rng.gen::<f64>().sqrt();
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let point = center.offset_polar(angle, r);
        snap_to_ground(probe, point.x, point.y, center.z)
    })
}

fn snap_to_ground(probe: &dyn GroundProbe, x: f64, y: f64, reference_z: f64) -> Option<Position> {
    let origin = Position::new(x, y, reference_z + SPAWN_PROBE_HEIGHT);
    probe
        .cast_down(&origin, 2.0 * SPAWN_PROBE_HEIGHT, ProbeFilter::GroundOnly)
        .map(|hit| hit.point)
}
