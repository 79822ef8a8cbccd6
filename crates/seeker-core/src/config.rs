//! Mission configuration.
//!
//! Every struct deserializes with `#[serde(default)]`, so a TOML file only
//! needs to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Top-level mission configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Minimum oracle confidence for a match to be accepted (inclusive).
    pub accept_threshold: f64,
    /// Radius of the region of interest (m).
    pub roi_radius: f64,
    /// Cruise altitude of the first agent above ROI ground (m).
    pub cruise_altitude: f64,
    /// Altitude added per agent index to stagger cruise layers (m).
    pub altitude_step: f64,
    pub search: SearchConfig,
    pub sensor: SensorConfig,
    pub landing: LandingConfig,
    pub terrain: TerrainConfig,
    pub agents: Vec<AgentSpec>,
    pub candidates: Vec<CandidateSpec>,
}

/// Flight/search tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Requested inner spiral radius, clamped into `[1, radius - 2]` on arm (m).
    pub inner_radius: f64,
    /// Spiral angular rate (deg/s).
    pub angular_rate_deg: f64,
    /// Spiral radial growth rate (m/s).
    pub radial_rate: f64,
    /// Timeout of the takeoff and transit phases (s).
    pub phase_timeout_secs: f64,
    /// Takeoff clearance above ROI ground (m).
    pub takeoff_clearance: f64,
    /// Distance of the transit gate from the ROI center, capped at the ROI radius (m).
    pub gate_offset: f64,
}

/// Proximity sensor tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Horizontal radius of the detection volume (m).
    pub radius: f64,
    /// Margin added below the ground and above the agent (m).
    pub margin: f64,
    /// Minimum time between two events for the same candidate (s).
    pub cooldown_secs: f64,
}

/// Precision landing tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    /// Inner radius of the landing ring around the target (m).
    pub ring_min: f64,
    /// Outer radius of the landing ring around the target (m).
    pub ring_max: f64,
    /// Number of points sampled around the ring.
    pub samples: u32,
    /// Height of the pre-hover point above the landing point (m).
    pub pre_hover_height: f64,
    /// Minimum horizontal clearance kept around the target (m).
    pub keep_out_radius: f64,
    /// Horizontal distance below which landing agents repel each other (m).
    pub separation_distance: f64,
    /// Repulsion gain (m/s per m of intrusion).
    pub separation_gain: f64,
    /// Nominal descent rate (m/s).
    pub descent_rate: f64,
    /// Height above ground below which descent tapers (m).
    pub taper_altitude: f64,
    /// Fraction of the descent rate reached at the ground.
    pub taper_min_fraction: f64,
    /// Height above ground at which descent terminates (m).
    pub landing_tolerance: f64,
    /// Radius the agent must stay within during touchdown (m).
    pub hold_radius: f64,
    /// Time the agent must hold within `hold_radius` (s).
    pub hold_secs: f64,
    /// Snap horizontal position onto the landing point at touchdown.
    pub snap_on_touchdown: bool,
    /// Zero horizontal and rotational motion at touchdown.
    pub freeze_on_touchdown: bool,
    /// Climb applied when a landing aborts (m).
    pub abort_climb: f64,
    /// Timeout of the abort climb (s).
    pub abort_timeout_secs: f64,
    /// Timeout of the descent phase (s).
    pub descent_timeout_secs: f64,
    /// Timeout of the touchdown hold (s).
    pub touchdown_timeout_secs: f64,
}

/// Procedural terrain description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Ground height at the origin (m).
    pub ground_height: f64,
    /// Ground slope along x (m per m).
    pub slope_x: f64,
    /// Ground slope along y (m per m).
    pub slope_y: f64,
    /// Discs with no ground at all (water, cliffs).
    pub voids: Vec<DiscSpec>,
    /// Obstructions standing on the ground.
    pub obstacles: Vec<ObstacleSpec>,
}

/// Horizontal disc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscSpec {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Obstruction footprint and height above local ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ObstacleSpec {
    Cylinder {
        x: f64,
        y: f64,
        radius: f64,
        height: f64,
    },
    Cuboid {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        height: f64,
    },
}

/// One agent of the fleet and the capabilities it is built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSpec {
    pub name: String,
    /// Carries a proximity sensor. Required to be armed.
    pub sensor: bool,
    /// Carries a landing controller. Required to win.
    pub lander: bool,
}

/// One candidate type placed in the ROI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateSpec {
    /// Candidate type. Each type is instantiated at most once per mission.
    pub kind: String,
    /// Free-text description evaluated against the mission text.
    pub description: String,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 0.70,
            roi_radius: 20.0,
            cruise_altitude: 8.0,
            altitude_step: 1.5,
            search: SearchConfig::default(),
            sensor: SensorConfig::default(),
            landing: LandingConfig::default(),
            terrain: TerrainConfig::default(),
            agents: (0..4)
                .map(|i| AgentSpec {
                    name: format!("scout-{i}"),
                    ..AgentSpec::default()
                })
                .collect(),
            candidates: default_candidates(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            inner_radius: 2.0,
            angular_rate_deg: 20.0,
            radial_rate: 0.5,
            phase_timeout_secs: 15.0,
            takeoff_clearance: 3.0,
            gate_offset: 2.0,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            margin: 0.5,
            cooldown_secs: 1.0,
        }
    }
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            ring_min: 2.5,
            ring_max: 4.0,
            samples: 24,
            pre_hover_height: 6.0,
            keep_out_radius: 1.5,
            separation_distance: 3.0,
            separation_gain: 1.5,
            descent_rate: 1.5,
            taper_altitude: 2.0,
            taper_min_fraction: 0.25,
            landing_tolerance: 0.15,
            hold_radius: 0.3,
            hold_secs: 0.4,
            snap_on_touchdown: true,
            freeze_on_touchdown: true,
            abort_climb: 2.0,
            abort_timeout_secs: 5.0,
            descent_timeout_secs: 30.0,
            touchdown_timeout_secs: 5.0,
        }
    }
}

impl Default for AgentSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            sensor: true,
            lander: true,
        }
    }
}

fn default_candidates() -> Vec<CandidateSpec> {
    [
        ("worker_yellow", "construction worker wearing a yellow helmet"),
        ("worker_blue", "person in a blue jacket carrying a ladder"),
        ("hiker_red", "hiker with a red backpack"),
        ("dog", "brown dog sitting on the grass"),
    ]
    .into_iter()
    .map(|(kind, description)| CandidateSpec {
        kind: kind.to_string(),
        description: description.to_string(),
    })
    .collect()
}

impl MissionConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: MissionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the state machines cannot operate with.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.accept_threshold) {
            return Err(invalid(format!(
                "accept_threshold must lie in [0, 1], got {}",
                self.accept_threshold
            )));
        }
        if self.roi_radius <= 0.0 {
            return Err(invalid("roi_radius must be positive"));
        }
        if self.cruise_altitude <= 0.0 {
            return Err(invalid("cruise_altitude must be positive"));
        }
        if self.search.radial_rate <= 0.0 || self.search.angular_rate_deg <= 0.0 {
            return Err(invalid("search rates must be positive"));
        }
        if self.search.gate_offset < 0.0 {
            return Err(invalid("search.gate_offset must not be negative"));
        }
        if self.search.phase_timeout_secs <= 0.0 {
            return Err(invalid("search.phase_timeout_secs must be positive"));
        }
        if self.sensor.radius <= 0.0 || self.sensor.cooldown_secs < 0.0 {
            return Err(invalid(
                "sensor.radius must be positive and cooldown non-negative",
            ));
        }
        let landing = &self.landing;
        if landing.ring_min <= 0.0 || landing.ring_min >= landing.ring_max {
            return Err(invalid(format!(
                "landing ring must satisfy 0 < ring_min < ring_max, got [{}, {}]",
                landing.ring_min, landing.ring_max
            )));
        }
        let ring_mid = (landing.ring_min + landing.ring_max) / 2.0;
        if landing.keep_out_radius >= ring_mid {
            return Err(invalid(format!(
                "landing.keep_out_radius must stay below the ring mid-radius {ring_mid}, got {}",
                landing.keep_out_radius
            )));
        }
        if landing.samples == 0 {
            return Err(invalid("landing.samples must be at least 1"));
        }
        if landing.descent_rate <= 0.0 || landing.landing_tolerance <= 0.0 {
            return Err(invalid(
                "landing descent rate and tolerance must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&landing.taper_min_fraction) {
            return Err(invalid("landing.taper_min_fraction must lie in [0, 1]"));
        }
        if self.agents.is_empty() {
            return Err(invalid("at least one agent is required"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}
