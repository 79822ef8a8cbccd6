//! Operator commands sent to the simulation.
//!
//! Commands are validated and queued for processing at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::types::Position;

/// All possible operator actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MissionCommand {
    /// Start a new mission over the given ROI.
    StartMission { request: MissionRequest },
    /// Manual override: land next to the candidate nearest the ROI center.
    ForceLand,
    /// End the current mission run and clear the world.
    Reset,
    /// Freeze simulation time.
    Pause,
    /// Resume simulation time.
    Resume,
}

/// Validated mission start input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRequest {
    pub roi_center: Position,
    pub mission_text: String,
}

impl MissionRequest {
    /// Parse raw operator input. Accepts both `.` and `,` as decimal separator.
    pub fn parse(x: &str, y: &str, z: &str, mission_text: &str) -> Result<Self, InputError> {
        let roi_center = Position::new(
            parse_coordinate("x", x)?,
            parse_coordinate("y", y)?,
            parse_coordinate("z", z)?,
        );
        let mission_text = mission_text.trim();
        if mission_text.is_empty() {
            return Err(InputError::EmptyMissionText);
        }
        Ok(Self {
            roi_center,
            mission_text: mission_text.to_string(),
        })
    }
}

/// Parse one coordinate, normalizing a decimal comma.
pub fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let normalized = raw.trim().replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| InputError::InvalidNumber {
            field,
            value: raw.to_string(),
        })?;
    if !value.is_finite() {
        return Err(InputError::NonFinite { field });
    }
    Ok(value)
}
