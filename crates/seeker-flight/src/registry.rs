//! Active landing sessions, shared for separation only.
//!
//! The registry does not own sessions. Any agent may read it; only a
//! session adds or removes its own agent.

use std::collections::BTreeSet;

use seeker_core::types::AgentId;

#[derive(Debug, Clone, Default)]
pub struct LandingRegistry {
    sessions: BTreeSet<AgentId>,
}

impl LandingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the agent was already registered.
    pub fn register(&mut self, agent: AgentId) -> bool {
        self.sessions.insert(agent)
    }

    /// Returns false if the agent was not registered.
    pub fn deregister(&mut self, agent: AgentId) -> bool {
        self.sessions.remove(&agent)
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.sessions.contains(&agent)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.sessions.iter().copied()
    }

    /// Registered agents other than `agent`.
    pub fn others(&self, agent: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.iter().filter(move |a| *a != agent)
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
