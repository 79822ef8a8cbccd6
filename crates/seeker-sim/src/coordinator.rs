//! Mission coordinator: single-flight evaluations and single-winner commit.
//!
//! One coordinator exists per mission run. It owns the mission record, the
//! agent and candidate registries, the in-flight evaluations and the
//! landing-session registry used for separation. Agents are reached through
//! their hecs entities; the coordinator never owns them.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use hecs::{Entity, World};
use thiserror::Error;
use tracing::{debug, info, warn};

use seeker_core::components::{Candidate, FlightControl, Lander, LandingSession, ProximitySensor};
use seeker_core::config::MissionConfig;
use seeker_core::enums::{AbortReason, ControlOwner, LandingOutcome, LandingState, MissionState};
use seeker_core::events::MissionEvent;
use seeker_core::types::{AgentId, CandidateId, Position, Velocity};

use seeker_flight::{landing, search, LandingRegistry};

use crate::oracle::{EvaluationRequest, Oracle, OracleError, OracleFuture, Verdict};

/// Why a winner could not be committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("mission already committed")]
    AlreadyCommitted,

    #[error("a landing is already in progress")]
    LandingInProgress,

    #[error("{0} is not part of this mission")]
    UnknownAgent(AgentId),

    #[error("{0} is not part of this mission")]
    UnknownCandidate(CandidateId),

    #[error("{0} has no landing controller")]
    NoLander(AgentId),

    #[error("no candidate to land next to")]
    NoCandidates,

    #[error("no agent available to land")]
    NoAvailableAgent,
}

/// The mission record. Mutated only by the coordinator.
#[derive(Debug, Clone)]
pub struct Mission {
    pub roi_center: Position,
    pub roi_radius: f64,
    pub mission_text: String,
    pub state: MissionState,
}

/// An oracle call that has not answered yet.
struct PendingEvaluation {
    request: EvaluationRequest,
    future: OracleFuture,
}

/// How a finished landing left the mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingFinished {
    pub agent: AgentId,
    pub outcome: LandingOutcome,
}

pub struct MissionCoordinator {
    mission: Mission,
    accept_threshold: f64,
    ring_min: f64,
    ring_max: f64,
    oracle: Arc<dyn Oracle>,
    agents: BTreeMap<AgentId, Entity>,
    candidates: BTreeMap<CandidateId, Entity>,
    evaluating: BTreeSet<CandidateId>,
    pending: Vec<PendingEvaluation>,
    landing_in_progress: bool,
    winner: Option<(AgentId, CandidateId)>,
    registry: LandingRegistry,
}

impl MissionCoordinator {
    pub fn new(
        mission: Mission,
        config: &MissionConfig,
        oracle: Arc<dyn Oracle>,
        agents: impl IntoIterator<Item = (AgentId, Entity)>,
        candidates: impl IntoIterator<Item = (CandidateId, Entity)>,
    ) -> Self {
        Self {
            mission,
            accept_threshold: config.accept_threshold,
            ring_min: config.landing.ring_min,
            ring_max: config.landing.ring_max,
            oracle,
            agents: agents.into_iter().collect(),
            candidates: candidates.into_iter().collect(),
            evaluating: BTreeSet::new(),
            pending: Vec::new(),
            landing_in_progress: false,
            winner: None,
            registry: LandingRegistry::new(),
        }
    }

    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    pub fn winner(&self) -> Option<AgentId> {
        self.winner.map(|(agent, _)| agent)
    }

    pub fn winner_candidate(&self) -> Option<CandidateId> {
        self.winner.map(|(_, candidate)| candidate)
    }

    pub fn has_winner(&self) -> bool {
        self.winner.is_some()
    }

    pub fn landing_in_progress(&self) -> bool {
        self.landing_in_progress
    }

    pub fn is_evaluating(&self, candidate: CandidateId) -> bool {
        self.evaluating.contains(&candidate)
    }

    /// Candidates with an oracle call in flight, in id order.
    pub fn evaluating(&self) -> Vec<CandidateId> {
        self.evaluating.iter().copied().collect()
    }

    pub fn landing_registry(&self) -> &LandingRegistry {
        &self.registry
    }

    pub fn agent_entity(&self, agent: AgentId) -> Option<Entity> {
        self.agents.get(&agent).copied()
    }

    pub fn candidate_entity(&self, candidate: CandidateId) -> Option<Entity> {
        self.candidates.get(&candidate).copied()
    }

    /// A sensor reported a candidate. Starts an evaluation unless the
    /// mission is committed, a landing is running, or the candidate is
    /// already being evaluated. Returns whether an evaluation started.
    pub fn on_candidate_seen(
        &mut self,
        world: &World,
        agent: AgentId,
        candidate: CandidateId,
        events: &mut Vec<MissionEvent>,
    ) -> bool {
        if self.mission.state == MissionState::Committed || self.landing_in_progress {
            return false;
        }
        if self.evaluating.contains(&candidate) {
            debug!(%agent, %candidate, "evaluation already in flight");
            return false;
        }
        let Some(candidate_text) = self
            .candidates
            .get(&candidate)
            .and_then(|entity| world.get::<&Candidate>(*entity).ok())
            .map(|c| c.description.clone())
        else {
            warn!(%agent, %candidate, "sighting of unregistered candidate ignored");
            return false;
        };

        let request = EvaluationRequest {
            agent,
            candidate,
            mission_text: self.mission.mission_text.clone(),
            candidate_text,
        };
        let future = self.oracle.evaluate(&request);
        self.evaluating.insert(candidate);
        self.pending.push(PendingEvaluation { request, future });
        info!(%agent, %candidate, "evaluation started");
        events.push(MissionEvent::EvaluationStarted { agent, candidate });
        true
    }

    /// Poll every in-flight evaluation once and act on the answers.
    pub fn poll_evaluations(&mut self, world: &mut World, events: &mut Vec<MissionEvent>) {
        if self.pending.is_empty() {
            return;
        }
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        let mut still_pending = Vec::with_capacity(self.pending.len());
        let mut answered = Vec::new();

        for mut evaluation in std::mem::take(&mut self.pending) {
            match evaluation.future.poll_unpin(&mut cx) {
                Poll::Ready(result) => answered.push((evaluation.request, result)),
                Poll::Pending => still_pending.push(evaluation),
            }
        }
        self.pending = still_pending;

        for (request, result) in answered {
            self.evaluating.remove(&request.candidate);
            self.handle_verdict(world, request, result, events);
        }
    }

    fn handle_verdict(
        &mut self,
        world: &mut World,
        request: EvaluationRequest,
        result: Result<Verdict, OracleError>,
        events: &mut Vec<MissionEvent>,
    ) {
        let EvaluationRequest {
            agent, candidate, ..
        } = request;

        let verdict = match result {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(%agent, %candidate, %error, "evaluation abandoned");
                events.push(MissionEvent::EvaluationFailed {
                    candidate,
                    error: error.to_string(),
                });
                return;
            }
        };

        if self.mission.state == MissionState::Committed {
            if self.winner() == Some(agent) {
                debug!(%agent, %candidate, "late verdict from the winner");
            } else {
                debug!(%agent, %candidate, "verdict arrived after commit, discarded");
            }
            events.push(MissionEvent::EvaluationDiscarded { candidate });
            return;
        }

        if !verdict.accepts(self.accept_threshold) {
            info!(
                %agent,
                %candidate,
                is_match = verdict.is_match,
                confidence = verdict.confidence,
                reason = %verdict.reason,
                "verdict not accepted"
            );
            events.push(MissionEvent::EvaluationRejected {
                candidate,
                is_match: verdict.is_match,
                confidence: verdict.confidence,
            });
            return;
        }

        if self.landing_in_progress {
            events.push(MissionEvent::EvaluationDiscarded { candidate });
            return;
        }

        info!(
            %agent,
            %candidate,
            confidence = verdict.confidence,
            reason = %verdict.reason,
            "verdict accepted"
        );
        if let Err(error) = self.commit(world, agent, candidate, false, events) {
            warn!(%agent, %candidate, %error, "commit failed");
        }
    }

    /// Manual override: land the first available agent next to the
    /// candidate nearest the ROI center. Shares the single-winner guards
    /// with the oracle path.
    pub fn force_land_nearest(
        &mut self,
        world: &mut World,
        events: &mut Vec<MissionEvent>,
    ) -> Result<(), CommitError> {
        self.ensure_open()?;

        let center = self.mission.roi_center;
        let mut nearest: Option<(f64, CandidateId)> = None;
        for (id, entity) in &self.candidates {
            let Ok(position) = world.get::<&Position>(*entity) else {
                continue;
            };
            let range = position.horizontal_range_to(&center);
            if nearest.map_or(true, |(best, _)| range < best) {
                nearest = Some((range, *id));
            }
        }
        let (_, candidate) = nearest.ok_or(CommitError::NoCandidates)?;

        let agent = self
            .agents
            .iter()
            .find(|(_, entity)| {
                let has_lander = world.get::<&Lander>(**entity).is_ok();
                let self_controlled = world
                    .get::<&ControlOwner>(**entity)
                    .is_ok_and(|owner| *owner == ControlOwner::SelfControlled);
                has_lander && self_controlled
            })
            .map(|(id, _)| *id)
            .ok_or(CommitError::NoAvailableAgent)?;

        info!(%agent, %candidate, "forced landing requested");
        self.commit(world, agent, candidate, true, events)
    }

    /// Commit `agent` as the winner and start its landing.
    ///
    /// The latch is taken before the landing starts and released again if
    /// the agent cannot land, so a later verdict can still win.
    pub fn commit(
        &mut self,
        world: &mut World,
        agent: AgentId,
        candidate: CandidateId,
        forced: bool,
        events: &mut Vec<MissionEvent>,
    ) -> Result<(), CommitError> {
        self.ensure_open()?;
        let entity = self
            .agent_entity(agent)
            .ok_or(CommitError::UnknownAgent(agent))?;
        let target = self
            .candidate_entity(candidate)
            .and_then(|e| world.get::<&Position>(e).ok().map(|p| *p))
            .ok_or(CommitError::UnknownCandidate(candidate))?;

        self.landing_in_progress = true;
        self.mission.state = MissionState::Committed;

        if let Err(error) = self.begin_landing(world, agent, entity, target) {
            self.landing_in_progress = false;
            self.mission.state = MissionState::Active;
            warn!(%agent, %error, "commit rolled back");
            events.push(MissionEvent::CommitRolledBack {
                agent,
                reason: error.to_string(),
            });
            return Err(error);
        }

        self.winner = Some((agent, candidate));
        info!(%agent, %candidate, forced, "winner committed");
        events.push(MissionEvent::WinnerCommitted {
            agent,
            candidate,
            forced,
        });
        events.push(MissionEvent::LandingPhaseChanged {
            agent,
            state: LandingState::SelectPoint,
        });
        self.suspend_others(world, agent, events);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), CommitError> {
        if self.mission.state == MissionState::Committed {
            return Err(CommitError::AlreadyCommitted);
        }
        if self.landing_in_progress {
            return Err(CommitError::LandingInProgress);
        }
        Ok(())
    }

    fn begin_landing(
        &mut self,
        world: &mut World,
        agent: AgentId,
        entity: Entity,
        target: Position,
    ) -> Result<(), CommitError> {
        if world.get::<&Lander>(entity).is_err() {
            return Err(CommitError::NoLander(agent));
        }
        let (flight, owner) = world
            .query_one_mut::<(&mut FlightControl, &mut ControlOwner)>(entity)
            .map_err(|_| CommitError::UnknownAgent(agent))?;
        let session = landing::begin(
            agent,
            target,
            self.ring_min,
            self.ring_max,
            flight,
            &mut self.registry,
        );
        *owner = ControlOwner::ExternallyControlled { session: agent };
        world
            .insert_one(entity, session)
            .map_err(|_| CommitError::UnknownAgent(agent))
    }

    /// Freeze every agent except the winner: motion, sensor and pending
    /// motion tasks. The agents themselves stay in the world.
    fn suspend_others(&mut self, world: &mut World, winner: AgentId, events: &mut Vec<MissionEvent>) {
        for (&agent, &entity) in &self.agents {
            if agent == winner {
                continue;
            }
            if let Ok((flight, velocity, owner)) = world
                .query_one_mut::<(&mut FlightControl, &mut Velocity, &mut ControlOwner)>(entity)
            {
                search::halt(flight, velocity);
                *owner = ControlOwner::Suspended;
            }
            if let Ok(sensor) = world.query_one_mut::<&mut ProximitySensor>(entity) {
                sensor.enabled = false;
            }
            debug!(%agent, "suspended");
            events.push(MissionEvent::AgentSuspended { agent });
        }
    }

    /// Tear down a landing session that reported an outcome.
    ///
    /// The mission stays committed either way. A completed landing halts
    /// the winner on the ground; an aborted one hands it back to search.
    pub fn finish_landing(
        &mut self,
        world: &mut World,
        finished: LandingFinished,
        events: &mut Vec<MissionEvent>,
    ) {
        let LandingFinished { agent, outcome } = finished;
        self.landing_in_progress = false;
        let Some(entity) = self.agent_entity(agent) else {
            self.registry.deregister(agent);
            return;
        };

        let session = world.remove_one::<LandingSession>(entity).ok();
        let Ok((flight, position, velocity, owner)) = world
            .query_one_mut::<(&mut FlightControl, &Position, &mut Velocity, &mut ControlOwner)>(
                entity,
            )
        else {
            self.registry.deregister(agent);
            return;
        };

        match &session {
            Some(session) => landing::release(session, flight, &mut self.registry),
            None => {
                self.registry.deregister(agent);
            }
        }
        *owner = ControlOwner::SelfControlled;

        match outcome {
            LandingOutcome::Completed => {
                search::halt(flight, velocity);
                info!(%agent, x = position.x, y = position.y, z = position.z, "winner landed");
                events.push(MissionEvent::LandingCompleted {
                    agent,
                    position: *position,
                });
            }
            LandingOutcome::Aborted => {
                let reason = session
                    .and_then(|s| s.abort_reason)
                    .unwrap_or(AbortReason::NoGround);
                warn!(%agent, ?reason, "winner landing aborted, mission stays committed");
                events.push(MissionEvent::LandingAborted { agent, reason });
            }
        }
    }
}
