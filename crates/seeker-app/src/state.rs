//! State shared between the runner and the mission loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use seeker_core::commands::MissionCommand;
use seeker_core::state::MissionSnapshot;

/// Commands sent from the runner to the mission loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// An operator command to forward to the simulation engine.
    Mission(MissionCommand),
    /// Shut down the mission loop thread gracefully.
    Shutdown,
}

/// Handle to a running mission loop.
///
/// The loop owns the engine; the handle only sends commands and reads the
/// latest snapshot, which the loop replaces after every tick.
pub struct MissionHandle {
    pub(crate) command_tx: mpsc::Sender<LoopCommand>,
    pub(crate) latest_snapshot: Arc<Mutex<Option<MissionSnapshot>>>,
    pub(crate) thread: Option<JoinHandle<()>>,
}

impl MissionHandle {
    /// Forward a command. Returns false once the loop has exited.
    pub fn send(&self, command: MissionCommand) -> bool {
        self.command_tx.send(LoopCommand::Mission(command)).is_ok()
    }

    /// Copy of the most recent snapshot, if a tick has run.
    pub fn snapshot(&self) -> Option<MissionSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }

    /// Stop the loop and wait for its thread.
    pub fn shutdown(mut self) {
        let _ = self.command_tx.send(LoopCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_reports_closed_loop() {
        let (tx, rx) = mpsc::channel();
        let handle = MissionHandle {
            command_tx: tx,
            latest_snapshot: Arc::new(Mutex::new(None)),
            thread: None,
        };
        assert!(handle.snapshot().is_none());
        assert!(handle.send(MissionCommand::Pause));
        drop(rx);
        assert!(!handle.send(MissionCommand::Resume));
        handle.shutdown();
    }
}
