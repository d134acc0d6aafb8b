//! # Worker: the task that drives one subsystem.
//!
//! Exactly one worker drains a subsystem's bus, dispatching messages until
//! the terminator surfaces. Hosts that prefer a cooperative model skip the
//! worker and call [`Subsystem::handle_bus_message`] from their own loop;
//! the two must not be mixed on the same subsystem.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::hooks::Hooks;

use super::core::Subsystem;

/// Handle to a spawned subsystem worker.
pub struct Worker {
    name: String,
    join: JoinHandle<()>,
}

impl Worker {
    /// Waits for the worker to exit.
    ///
    /// The worker exits after its subsystem commits DESTROY and the bus
    /// terminator is consumed. Hook panics are caught at dispatch, so a
    /// panicking join indicates a bug in the core itself.
    pub async fn join(self) {
        if let Err(err) = self.join.await {
            eprintln!("[subvisor] worker '{}' panicked: {err}", self.name);
        }
    }

    /// Whether the worker has already exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl<H: Hooks> Subsystem<H> {
    /// Spawns the worker task for this subsystem.
    ///
    /// # Panics
    /// Panics if a worker was already spawned; a subsystem's bus has exactly
    /// one consumer.
    pub fn spawn_worker(self: &Arc<Self>) -> Worker {
        assert!(
            self.claim_worker_seat(),
            "subsystem '{}' already has a worker",
            self.name()
        );
        let me = Arc::clone(self);
        let join = tokio::spawn(async move { while me.handle_bus_message().await {} });
        Worker {
            name: self.name().to_string(),
            join,
        }
    }
}
