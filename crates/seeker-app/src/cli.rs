//! Command-line runner: argument parsing, configuration, logging and the
//! two ways of driving a mission (as fast as possible, or paced in real time).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use seeker_core::commands::{MissionCommand, MissionRequest};
use seeker_core::config::MissionConfig;
use seeker_core::enums::MissionPhase;
use seeker_core::events::MissionEvent;
use seeker_core::state::MissionSnapshot;
use seeker_sim::engine::{SimConfig, SimulationEngine};

use crate::mission_loop;

/// How often the real-time runner samples the shared snapshot.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drone fleet search-and-land mission runner.
#[derive(Debug, Parser)]
#[command(name = "seeker", version, about)]
pub struct Args {
    /// TOML mission configuration. Defaults apply to missing keys.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// ROI center x (`.` or `,` as decimal separator).
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub x: String,

    /// ROI center y.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub y: String,

    /// ROI center z.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub z: String,

    /// What the fleet is looking for.
    #[arg(long, default_value = "find the construction worker wearing a yellow helmet")]
    pub mission: String,

    /// Give up after this many ticks.
    #[arg(long, default_value_t = 4500)]
    pub ticks: u64,

    /// RNG seed. Same seed, same mission.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Force a landing at this tick, skipping the oracle.
    #[arg(long)]
    pub force_land: Option<u64>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Pace the mission at wall-clock speed on the mission loop thread.
    #[arg(long)]
    pub realtime: bool,

    /// Wall-clock pacing factor for --realtime.
    #[arg(long)]
    pub time_scale: Option<f64>,
}

/// Install the global tracing subscriber.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter {level:?}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}

/// Read and validate a TOML mission configuration.
pub fn load_config(path: &Path) -> Result<MissionConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    MissionConfig::from_toml_str(&source)
        .with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Engine configuration assembled from the arguments.
pub fn sim_config(args: &Args) -> Result<SimConfig> {
    let mut config = SimConfig::default();
    if let Some(path) = &args.config {
        config.mission = load_config(path)?;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(time_scale) = args.time_scale {
        if !(time_scale.is_finite() && time_scale > 0.0) {
            bail!("time scale must be positive, got {time_scale}");
        }
        config.time_scale = time_scale;
    }
    Ok(config)
}

/// Run a mission to completion and return the final snapshot.
pub fn run(args: &Args) -> Result<MissionSnapshot> {
    let config = sim_config(args)?;
    info!(
        seed = config.seed,
        agents = config.mission.agents.len(),
        candidates = config.mission.candidates.len(),
        realtime = args.realtime,
        "configuration loaded"
    );
    if args.realtime {
        run_realtime(config, args)
    } else {
        run_headless(config, args)
    }
}

/// Tick the engine as fast as possible.
pub fn run_headless(config: SimConfig, args: &Args) -> Result<MissionSnapshot> {
    let mut engine = SimulationEngine::new(config);
    engine
        .submit_mission_input(&args.x, &args.y, &args.z, &args.mission)
        .context("mission input rejected")?;

    let mut last = engine.tick();
    while last.time.tick < args.ticks && last.phase == MissionPhase::Running {
        if args.force_land == Some(last.time.tick) {
            engine.queue_command(MissionCommand::ForceLand);
        }
        last = engine.tick();
        log_milestones(&last);
    }
    report_outcome(&last);
    Ok(last)
}

/// Run on the mission loop thread, paced by the configured time scale.
pub fn run_realtime(config: SimConfig, args: &Args) -> Result<MissionSnapshot> {
    let request = MissionRequest::parse(&args.x, &args.y, &args.z, &args.mission)
        .context("mission input rejected")?;
    let handle =
        mission_loop::spawn_mission_loop(config).context("failed to spawn mission loop")?;
    if !handle.send(MissionCommand::StartMission { request }) {
        bail!("mission loop exited before the mission started");
    }

    let mut forced = false;
    let mut last = None;
    loop {
        std::thread::sleep(POLL_INTERVAL);
        let Some(snapshot) = handle.snapshot() else {
            continue;
        };
        let tick = snapshot.time.tick;
        if !forced && args.force_land.is_some_and(|at| tick >= at) {
            forced = handle.send(MissionCommand::ForceLand);
        }
        let done = snapshot.phase == MissionPhase::Finished || tick >= args.ticks;
        last = Some(snapshot);
        if done {
            break;
        }
    }
    handle.shutdown();

    let last = last.context("mission loop produced no snapshot")?;
    report_outcome(&last);
    Ok(last)
}

fn log_milestones(snapshot: &MissionSnapshot) {
    for event in &snapshot.events {
        match event {
            MissionEvent::WinnerCommitted {
                agent,
                candidate,
                forced,
            } => info!(tick = snapshot.time.tick, %agent, %candidate, forced, "winner committed"),
            MissionEvent::LandingAborted { agent, reason } => {
                warn!(tick = snapshot.time.tick, %agent, ?reason, "landing aborted")
            }
            _ => {}
        }
    }
}

fn report_outcome(snapshot: &MissionSnapshot) {
    match (snapshot.phase, snapshot.winner) {
        (MissionPhase::Finished, Some(agent)) => info!(
            tick = snapshot.time.tick,
            %agent,
            "mission complete"
        ),
        (_, Some(agent)) => warn!(
            tick = snapshot.time.tick,
            %agent,
            "winner chosen but landing did not complete"
        ),
        _ => warn!(tick = snapshot.time.tick, "no winner chosen"),
    }
}
