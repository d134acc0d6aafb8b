//! # Fault records published on the diagnostic channel.
//!
//! A [`Fault`] describes one absorbed anomaly. Faults carry a globally unique
//! sequence number (`seq`) that increases monotonically, so subscribers can
//! order them even when delivered through separate channels.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::tag::Tag;

/// Global sequence counter for fault ordering.
static FAULT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of absorbed anomalies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    /// A user hook returned an error or panicked.
    HookFailed,
    /// A lifecycle message violated the wire protocol.
    Protocol,
    /// A message was dropped because its target was already destroyed or its
    /// bus already terminated.
    Discarded,
}

impl FaultKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            FaultKind::HookFailed => "hook_failed",
            FaultKind::Protocol => "protocol",
            FaultKind::Discarded => "discarded",
        }
    }
}

/// One absorbed anomaly.
#[derive(Clone, Debug)]
pub struct Fault {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp (may go backwards, use for logging only).
    pub at: SystemTime,
    /// What went wrong.
    pub kind: FaultKind,
    /// Tag of the subsystem the fault occurred on.
    pub tag: Tag,
    /// Name of that subsystem.
    pub subsystem: String,
    /// Human-readable description.
    pub detail: String,
}

impl Fault {
    /// Creates a new fault with current timestamp and next sequence number.
    pub(crate) fn new(kind: FaultKind, tag: Tag, subsystem: impl Into<String>) -> Self {
        Self {
            seq: FAULT_SEQ.fetch_add(1, Ordering::Relaxed),
            at: SystemTime::now(),
            kind,
            tag,
            subsystem: subsystem.into(),
            detail: String::new(),
        }
    }

    /// Attaches a description.
    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let tag = Tag::next();
        let a = Fault::new(FaultKind::Protocol, tag, "x");
        let b = Fault::new(FaultKind::Protocol, tag, "x");
        assert!(b.seq > a.seq);
    }
}
