//! External oracle contract: "does this candidate match the mission text?"
//!
//! The coordinator never blocks on an oracle. `evaluate` hands back a boxed
//! future that the engine polls once per tick; a future that is still pending
//! is a suspended evaluation.

use futures::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use seeker_core::types::{AgentId, CandidateId};

/// One oracle round-trip. Lives only as long as the evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub agent: AgentId,
    pub candidate: CandidateId,
    /// Mission text as it was when the evaluation started.
    pub mission_text: String,
    pub candidate_text: String,
}

/// Oracle answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "match")]
    pub is_match: bool,
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

impl Verdict {
    /// A verdict is accepted only when it matches with confidence at or
    /// above the threshold.
    pub fn accepts(&self, threshold: f64) -> bool {
        self.is_match && self.confidence >= threshold
    }
}

/// No verdict. Never to be read as `match = false`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    #[error("oracle transport failed: {0}")]
    Transport(String),

    #[error("malformed oracle response: {0}")]
    Malformed(String),

    #[error("confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f64),
}

pub type OracleFuture = BoxFuture<'static, Result<Verdict, OracleError>>;

/// Free-text classifier consulted by the mission coordinator.
pub trait Oracle: Send + Sync {
    fn evaluate(&self, request: &EvaluationRequest) -> OracleFuture;
}

/// Parse a raw oracle payload.
///
/// Text models like to wrap their JSON in prose, so everything outside the
/// outermost braces is ignored.
pub fn parse_verdict(raw: &str) -> Result<Verdict, OracleError> {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(OracleError::Malformed("no JSON object in response".into()));
    };
    if end < start {
        return Err(OracleError::Malformed("no JSON object in response".into()));
    }

    let verdict: Verdict = serde_json::from_str(&raw[start..=end])
        .map_err(|e| OracleError::Malformed(e.to_string()))?;
    if !verdict.confidence.is_finite() || !(0.0..=1.0).contains(&verdict.confidence) {
        return Err(OracleError::ConfidenceOutOfRange(verdict.confidence));
    }
    Ok(verdict)
}

/// Words too common to say anything about a candidate.
const STOP_WORDS: &[&str] = &[
    "the", "and", "with", "for", "find", "look", "near", "that", "this", "from", "into", "onto",
    "who", "has", "are", "was", "any", "some",
];

/// Deterministic local oracle.
///
/// Confidence is the fraction of significant mission words that appear in
/// the candidate text. The answer travels through the same JSON path a
/// remote oracle response would.
#[derive(Debug, Clone)]
pub struct KeywordOracle {
    /// Minimum confidence reported as a match.
    pub match_threshold: f64,
}

impl Default for KeywordOracle {
    fn default() -> Self {
        Self {
            match_threshold: 0.5,
        }
    }
}

impl KeywordOracle {
    pub fn score(&self, mission_text: &str, candidate_text: &str) -> f64 {
        let wanted = significant_words(mission_text);
        if wanted.is_empty() {
            return 0.0;
        }
        let present = significant_words(candidate_text);
        let found = wanted.iter().filter(|w| present.contains(w)).count();
        found as f64 / wanted.len() as f64
    }
}

impl Oracle for KeywordOracle {
    fn evaluate(&self, request: &EvaluationRequest) -> OracleFuture {
        let confidence = self.score(&request.mission_text, &request.candidate_text);
        let raw = serde_json::json!({
            "match": confidence >= self.match_threshold,
            "confidence": confidence,
            "reason": format!("{:.0}% of mission keywords present", confidence * 100.0),
        })
        .to_string();
        future::ready(parse_verdict(&raw)).boxed()
    }
}

fn significant_words(text: &str) -> Vec<String> {
    let mut words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3)
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect();
    words.sort();
    words.dedup();
    words
}
