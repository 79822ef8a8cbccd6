//! Proximity sensor system.
//!
//! Each tick the sensor volume is rebuilt around the agent: a vertical
//! cylinder from just below the ground under the agent to just above the
//! agent. A candidate inside the volume is reported once, then ignored until
//! its cooldown expires.

use hecs::World;

use seeker_core::components::{Agent, Candidate, DetectionVolume, ProximitySensor};
use seeker_core::constants::GROUND_PROBE_DISTANCE;
use seeker_core::events::MissionEvent;
use seeker_core::types::{AgentId, CandidateId, Position};

use seeker_terrain::{ground_height_below, GroundProbe};

/// One "candidate seen" report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sighting {
    pub agent: AgentId,
    pub candidate: CandidateId,
}

/// Run every enabled sensor once at simulation time `now`.
pub fn run(
    world: &mut World,
    probe: &dyn GroundProbe,
    now: f64,
    events: &mut Vec<MissionEvent>,
) -> Vec<Sighting> {
    let candidates: Vec<(CandidateId, Position)> = world
        .query::<(&Candidate, &Position)>()
        .iter()
        .map(|(_, (candidate, pos))| (candidate.id, *pos))
        .collect();

    let mut sightings = Vec::new();
    for (_entity, (agent, pos, sensor)) in
        world.query_mut::<(&Agent, &Position, &mut ProximitySensor)>()
    {
        if !sensor.enabled {
            continue;
        }
        sensor.volume = detection_volume(sensor, pos, probe);

        let cooldown = sensor.cooldown_secs;
        sensor.last_seen.retain(|_, seen_at| now - *seen_at < cooldown);

        for (candidate, candidate_pos) in &candidates {
            if sensor.last_seen.contains_key(candidate) || !sensor.volume.contains(candidate_pos) {
                continue;
            }
            sensor.last_seen.insert(*candidate, now);
            events.push(MissionEvent::CandidateSeen {
                agent: agent.id,
                candidate: *candidate,
            });
            sightings.push(Sighting {
                agent: agent.id,
                candidate: *candidate,
            });
        }
    }

    sightings.sort_by_key(|s| (s.agent, s.candidate));
    sightings
}

/// Ground-following volume for an agent at `pos`. Without ground below,
/// the ground is assumed at z = 0.
pub fn detection_volume(
    sensor: &ProximitySensor,
    pos: &Position,
    probe: &dyn GroundProbe,
) -> DetectionVolume {
    let ground = ground_height_below(probe, pos, GROUND_PROBE_DISTANCE).unwrap_or(0.0);
    DetectionVolume {
        center_x: pos.x,
        center_y: pos.y,
        radius: sensor.radius,
        bottom: ground - sensor.margin,
        top: pos.z + sensor.margin,
    }
}
