//! Simulation engine: the core of a mission run.
//!
//! `SimulationEngine` owns the hecs ECS world, processes operator commands,
//! runs all systems, and produces `MissionSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use seeker_core::commands::{MissionCommand, MissionRequest};
use seeker_core::config::MissionConfig;
use seeker_core::constants::DT;
use seeker_core::enums::{LandingOutcome, MissionPhase, MissionState};
use seeker_core::error::InputError;
use seeker_core::events::MissionEvent;
use seeker_core::state::MissionSnapshot;
use seeker_core::types::SimTime;
use seeker_terrain::Terrain;

use crate::coordinator::{Mission, MissionCoordinator};
use crate::oracle::{KeywordOracle, Oracle};
use crate::systems;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Wall-clock pacing factor used by real-time runners (1.0 = normal).
    pub time_scale: f64,
    pub mission: MissionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            mission: MissionConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: MissionPhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    config: MissionConfig,
    terrain: Terrain,
    oracle: Arc<dyn Oracle>,
    coordinator: Option<MissionCoordinator>,
    command_queue: VecDeque<MissionCommand>,
    events: Vec<MissionEvent>,
}

impl SimulationEngine {
    /// Create an engine that evaluates candidates with the local keyword oracle.
    pub fn new(config: SimConfig) -> Self {
        Self::with_oracle(config, Arc::new(KeywordOracle::default()))
    }

    /// Create an engine with a specific oracle.
    pub fn with_oracle(config: SimConfig, oracle: Arc<dyn Oracle>) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: MissionPhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            terrain: Terrain::from_config(&config.mission.terrain),
            config: config.mission,
            oracle,
            coordinator: None,
            command_queue: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Queue an operator command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: MissionCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = MissionCommand>) {
        self.command_queue.extend(commands);
    }

    /// Validate raw mission input and queue a mission start.
    ///
    /// Rejected input changes nothing except an `InputRejected` event in
    /// the next snapshot.
    pub fn submit_mission_input(
        &mut self,
        x: &str,
        y: &str,
        z: &str,
        mission_text: &str,
    ) -> Result<(), InputError> {
        match MissionRequest::parse(x, y, z, mission_text) {
            Ok(request) => {
                self.queue_command(MissionCommand::StartMission { request });
                Ok(())
            }
            Err(error) => {
                self.reject_input(&error);
                Err(error)
            }
        }
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> MissionSnapshot {
        self.process_commands();

        if self.phase == MissionPhase::Running {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.coordinator.as_ref(),
            events,
        )
    }

    /// Get the current mission phase.
    pub fn phase(&self) -> MissionPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the wall-clock pacing factor.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The coordinator of the current mission run, if one is loaded.
    pub fn coordinator(&self) -> Option<&MissionCoordinator> {
        self.coordinator.as_ref()
    }

    /// Report a sighting directly, bypassing the sensors.
    #[cfg(test)]
    pub fn report_sighting(
        &mut self,
        agent: seeker_core::types::AgentId,
        candidate: seeker_core::types::CandidateId,
    ) -> bool {
        match self.coordinator.as_mut() {
            Some(coordinator) => {
                coordinator.on_candidate_seen(&self.world, agent, candidate, &mut self.events)
            }
            None => false,
        }
    }

    /// Move a candidate to a fixed position.
    #[cfg(test)]
    pub fn move_candidate(
        &mut self,
        candidate: seeker_core::types::CandidateId,
        position: seeker_core::types::Position,
    ) {
        let entity = self
            .coordinator
            .as_ref()
            .and_then(|c| c.candidate_entity(candidate));
        if let Some(entity) = entity {
            if let Ok(mut pos) = self.world.get::<&mut seeker_core::types::Position>(entity) {
                *pos = position;
            }
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single operator command.
    fn handle_command(&mut self, command: MissionCommand) {
        match command {
            MissionCommand::StartMission { request } => self.start_mission(request),
            MissionCommand::ForceLand => {
                if self.phase != MissionPhase::Running {
                    warn!(phase = ?self.phase, "force land ignored, no running mission");
                    return;
                }
                if let Some(coordinator) = self.coordinator.as_mut() {
                    if let Err(error) =
                        coordinator.force_land_nearest(&mut self.world, &mut self.events)
                    {
                        warn!(%error, "force land refused");
                    }
                }
            }
            MissionCommand::Reset => {
                self.world.clear();
                self.coordinator = None;
                self.phase = MissionPhase::Standby;
                self.time = SimTime::default();
                info!("mission reset");
                self.events.push(MissionEvent::MissionReset);
            }
            MissionCommand::Pause => {
                if self.phase == MissionPhase::Running {
                    self.phase = MissionPhase::Paused;
                }
            }
            MissionCommand::Resume => {
                if self.phase == MissionPhase::Paused {
                    self.phase = MissionPhase::Running;
                }
            }
        }
    }

    fn start_mission(&mut self, request: MissionRequest) {
        if self.phase != MissionPhase::Standby {
            warn!(phase = ?self.phase, "mission already loaded, start ignored");
            return;
        }
        let mission_text = request.mission_text.trim();
        if mission_text.is_empty() {
            self.reject_input(&InputError::EmptyMissionText);
            return;
        }

        let setup = world_setup::setup_mission(
            &mut self.world,
            &mut self.rng,
            &self.terrain,
            &self.config,
            request.roi_center,
        );
        let agents = setup.agents.len() as u32;
        let candidates = setup.candidates.len() as u32;

        let mission = Mission {
            roi_center: request.roi_center,
            roi_radius: self.config.roi_radius,
            mission_text: mission_text.to_string(),
            state: MissionState::Active,
        };
        self.coordinator = Some(MissionCoordinator::new(
            mission,
            &self.config,
            Arc::clone(&self.oracle),
            setup.agents,
            setup.candidates,
        ));
        self.phase = MissionPhase::Running;
        self.time = SimTime::default();

        info!(
            x = request.roi_center.x,
            y = request.roi_center.y,
            z = request.roi_center.z,
            agents,
            candidates,
            "mission started"
        );
        self.events.push(MissionEvent::MissionStarted {
            roi_center: request.roi_center,
            agents,
            candidates,
        });
    }

    fn reject_input(&mut self, error: &InputError) {
        warn!(%error, "mission input rejected");
        self.events.push(MissionEvent::InputRejected {
            reason: error.to_string(),
        });
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let Some(coordinator) = self.coordinator.as_mut() else {
            return;
        };

        // 1. Oracle answers and winner commitment
        coordinator.poll_evaluations(&mut self.world, &mut self.events);
        // 2. Proximity sensing and evaluation scheduling
        let sightings = systems::sensor::run(
            &mut self.world,
            &self.terrain,
            self.time.elapsed_secs,
            &mut self.events,
        );
        for sighting in sightings {
            coordinator.on_candidate_seen(
                &self.world,
                sighting.agent,
                sighting.candidate,
                &mut self.events,
            );
        }
        // 3. Flight/search for self-controlled agents
        systems::flight::run(&mut self.world, DT);
        // 4. Landing sessions
        let finished = systems::landing::run(
            &mut self.world,
            &self.terrain,
            coordinator.landing_registry(),
            &self.config.landing,
            DT,
            &mut self.events,
        );
        // 5. Movement integration
        systems::movement::run(&mut self.world, DT);
        // 6. Landing outcomes
        for done in finished {
            coordinator.finish_landing(&mut self.world, done, &mut self.events);
            if done.outcome == LandingOutcome::Completed {
                info!(agent = %done.agent, "mission finished");
                self.phase = MissionPhase::Finished;
            }
        }
    }
}
