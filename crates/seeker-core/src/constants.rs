//! Simulation constants and tuning parameters.
//!
//! Values here are fixed at compile time. Mission-level knobs that an
//! operator may want to tune live in `config` instead.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Steering ---

/// Planar cruise speed used by the steering primitive (m/s).
pub const STEER_SPEED: f64 = 6.0;

/// Maximum commanded vertical rate (m/s).
pub const MAX_VERTICAL_RATE: f64 = 3.0;

/// Velocity blend rate (1/s). Each tick the velocity moves
/// `min(1, VELOCITY_SMOOTHING * dt)` of the way to the desired velocity.
pub const VELOCITY_SMOOTHING: f64 = 4.0;

/// Yaw blend rate (1/s) for aligning orientation with horizontal velocity.
pub const YAW_SMOOTHING: f64 = 6.0;

/// Horizontal speed below which orientation is left untouched (m/s).
pub const YAW_MIN_SPEED: f64 = 0.1;

/// Horizontal distance at which the planar command starts to scale down (m).
pub const ARRIVAL_SLOWDOWN_RADIUS: f64 = 2.0;

// --- Flight / search ---

/// Distance at which a flight waypoint counts as reached (m).
pub const WAYPOINT_STOP_DISTANCE: f64 = 0.75;

// --- Landing ---

/// Distance at which the pre-hover point counts as reached (m).
pub const PRE_HOVER_STOP_DISTANCE: f64 = 0.6;

/// Height above the candidate from which ground is resolved (m).
pub const GROUND_PROBE_HEIGHT: f64 = 50.0;

/// Maximum length of a ground resolution probe (m).
pub const GROUND_PROBE_DISTANCE: f64 = 200.0;

/// Safety factor applied to the estimated pre-hover travel time.
pub const PRE_HOVER_TIME_FACTOR: f64 = 2.0;

/// Fixed allowance added to the estimated pre-hover travel time (s).
pub const PRE_HOVER_TIME_ALLOWANCE: f64 = 4.0;

/// Lower bound of the pre-hover timeout (s).
pub const PRE_HOVER_TIMEOUT_MIN: f64 = 10.0;

/// Upper bound of the pre-hover timeout (s).
pub const PRE_HOVER_TIMEOUT_MAX: f64 = 90.0;

/// Weight of distance-from-target in landing point scoring.
pub const SCORE_TARGET_WEIGHT: f64 = 1.5;

/// Weight of travel distance in landing point scoring (subtracted).
pub const SCORE_TRAVEL_WEIGHT: f64 = 0.35;

// --- Stuck detection ---

/// Altitude change below which the agent counts as not moving vertically (m).
pub const STUCK_EPSILON: f64 = 0.01;

/// Time without vertical progress before a nudge is applied (s).
pub const STUCK_TIME_SECS: f64 = 0.75;

/// Commanded vertical rate above which stuck detection is armed (m/s).
pub const STUCK_MIN_COMMAND: f64 = 0.2;

/// Size of the positional nudge applied when stuck (m).
pub const STUCK_NUDGE: f64 = 0.25;

// --- Mission setup ---

/// Attempts to find ground for a candidate before it is skipped.
pub const PLACEMENT_ATTEMPTS: u32 = 16;

/// Distance of the launch line from the ROI edge (m).
pub const LAUNCH_STANDOFF: f64 = 5.0;

/// Spacing between agents on the launch line (m).
pub const LAUNCH_SPACING: f64 = 3.0;

/// Probe height used when snapping spawned entities to the ground (m).
pub const SPAWN_PROBE_HEIGHT: f64 = 500.0;
