//! # Broadcast channel for fault records.
//!
//! [`FaultBus`] is a wrapper around [`tokio::sync::broadcast`] that lets the
//! core report absorbed anomalies to any number of subscribers.
//!
//! ## Key characteristics:
//! - **Broadcast semantics**: all active subscribers receive a clone of each fault
//! - **Non-persistent**: faults are lost if there are no active subscribers
//! - **Bounded capacity**: old faults are dropped when the channel is full

use tokio::sync::broadcast;

use super::fault::Fault;

/// Broadcast channel for absorbed anomalies.
#[derive(Clone, Debug)]
pub(crate) struct FaultBus {
    tx: broadcast::Sender<Fault>,
}

impl FaultBus {
    /// Creates a new bus with the given channel capacity.
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes a fault to all active subscribers.
    ///
    /// If there are no active subscribers the fault is dropped silently; the
    /// core operates fine unobserved.
    pub(crate) fn publish(&self, fault: Fault) {
        let _ = self.tx.send(fault);
    }

    /// Creates a new subscriber that will receive all future faults.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Fault> {
        self.tx.subscribe()
    }
}
