//! Mission loop thread: runs the simulation engine at 30Hz.
//!
//! The engine is created inside the thread so it never has to be shared.
//! Commands arrive via `mpsc` channel. Snapshots are stored in shared state
//! for polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use seeker_core::constants::TICK_RATE;
use seeker_core::state::MissionSnapshot;
use seeker_sim::engine::{SimConfig, SimulationEngine};

use crate::state::{LoopCommand, MissionHandle};

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Wall-clock duration of one tick at the given pacing factor.
pub fn tick_interval(time_scale: f64) -> Duration {
    if time_scale > 0.001 {
        TICK_DURATION.div_f64(time_scale)
    } else {
        TICK_DURATION
    }
}

/// Spawn the mission loop in a new thread.
pub fn spawn_mission_loop(config: SimConfig) -> io::Result<MissionHandle> {
    let (command_tx, command_rx) = mpsc::channel::<LoopCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("seeker-mission-loop".into())
        .spawn(move || {
            run_mission_loop(SimulationEngine::new(config), command_rx, &shared);
        })?;

    Ok(MissionHandle {
        command_tx,
        latest_snapshot,
        thread: Some(thread),
    })
}

/// The mission loop. Runs until Shutdown or channel disconnect.
fn run_mission_loop(
    mut engine: SimulationEngine,
    command_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<MissionSnapshot>>,
) {
    let interval = tick_interval(engine.time_scale());
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match command_rx.try_recv() {
                Ok(LoopCommand::Mission(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    debug!(tick = engine.time().tick, "mission loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (the engine handles pause semantics)
        let snapshot = engine.tick();

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next tick
        next_tick_time += interval;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > interval * 2 {
            // Too far behind, reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seeker_core::commands::{MissionCommand, MissionRequest};
    use seeker_core::enums::MissionPhase;

    #[test]
    fn test_tick_duration_constant() {
        // 30Hz = 33.333ms per tick
        let expected_nanos = 1_000_000_000u64 / 30;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }

    #[test]
    fn test_tick_interval_scales() {
        assert_eq!(tick_interval(1.0), TICK_DURATION);
        assert_eq!(tick_interval(2.0), TICK_DURATION / 2);
        assert_eq!(tick_interval(0.0), TICK_DURATION);
    }

    #[test]
    fn test_loop_runs_mission_and_shuts_down() {
        let handle = spawn_mission_loop(SimConfig {
            time_scale: 10.0,
            ..Default::default()
        })
        .unwrap();

        let request = MissionRequest::parse("0", "0", "0", "find the hiker").unwrap();
        assert!(handle.send(MissionCommand::StartMission { request }));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut running = false;
        while Instant::now() < deadline {
            if let Some(snapshot) = handle.snapshot() {
                if snapshot.phase == MissionPhase::Running && snapshot.time.tick > 3 {
                    running = true;
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(running, "mission loop never started the mission");
        handle.shutdown();
    }
}
