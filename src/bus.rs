//! # Per-subsystem lifecycle channel.
//!
//! [`Bus`] is the FIFO mailbox of a single subsystem: any thread or task may
//! push, exactly one worker pops. A dedicated [`BusMessage::Terminator`]
//! variant closes the channel; the worker loop exits when it surfaces.
//!
//! ## Key characteristics:
//! - **Multi-producer, single-consumer**: peers and triggers push concurrently,
//!   only the owning worker receives
//! - **Strict FIFO**: messages are delivered in push order; there is no
//!   ordering across different buses
//! - **Explicit terminator**: a tagged variant, not an in-band null
//! - **Closed means closed**: pushes after [`Bus::terminate`] are dropped
//!
//! The channel itself never fails; delivery problems are absorbed.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, Mutex};

use crate::ipc::Ipc;

/// A message carried on a subsystem's bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusMessage {
    /// A lifecycle announcement.
    Ipc(Ipc),
    /// End of stream; the worker must stop reading.
    Terminator,
}

/// FIFO lifecycle mailbox of one subsystem.
///
/// The receiver half sits behind an async mutex so that the single consumer
/// seat can be taken both by a spawned worker and by a cooperative driver
/// calling [`handle_bus_message`](crate::Subsystem::handle_bus_message)
/// directly.
#[derive(Debug)]
pub struct Bus {
    tx: mpsc::UnboundedSender<BusMessage>,
    rx: Mutex<mpsc::UnboundedReceiver<BusMessage>>,
    terminated: AtomicBool,
}

impl Bus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
            terminated: AtomicBool::new(false),
        }
    }

    /// Enqueues a lifecycle message. Never blocks.
    ///
    /// Returns `false` if the bus has already been terminated; the message is
    /// dropped in that case.
    pub fn push(&self, event: Ipc) -> bool {
        if self.terminated.load(Ordering::Acquire) {
            return false;
        }
        self.tx.send(BusMessage::Ipc(event)).is_ok()
    }

    /// Pops the next message without waiting.
    ///
    /// Returns `None` when the bus is empty or the consumer seat is
    /// currently taken by a blocked worker.
    pub fn try_pop(&self) -> Option<BusMessage> {
        self.rx.try_lock().ok()?.try_recv().ok()
    }

    /// Waits for the next message in FIFO order.
    pub async fn wait_and_pop(&self) -> BusMessage {
        let mut rx = self.rx.lock().await;
        // The bus owns a sender for its whole lifetime, so the stream can
        // only end via the terminator; treat a closed channel the same way.
        rx.recv().await.unwrap_or(BusMessage::Terminator)
    }

    /// Closes the bus: drops all future pushes and enqueues the terminator.
    ///
    /// Idempotent; only the first call enqueues a terminator.
    pub fn terminate(&self) {
        if !self.terminated.swap(true, Ordering::AcqRel) {
            let _ = self.tx.send(BusMessage::Terminator);
        }
    }

    /// Discards queued messages. Returns how many were thrown away.
    ///
    /// Best-effort: if the consumer seat is taken the queue is left to the
    /// worker holding it.
    pub fn drain(&self) -> usize {
        let mut discarded = 0;
        while let Some(msg) = self.try_pop() {
            if msg == BusMessage::Terminator {
                // Put it back conceptually: the worker still needs to see it.
                let _ = self.tx.send(BusMessage::Terminator);
                break;
            }
            discarded += 1;
        }
        discarded
    }

    /// Whether [`Bus::terminate`] has been called.
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }
}
