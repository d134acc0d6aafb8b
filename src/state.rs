//! # Subsystem lifecycle states.
//!
//! [`State`] models the lifecycle of a single subsystem:
//!
//! ```text
//!              ┌──────────────────────────┐
//!              ▼                          │
//!   INIT ─► RUNNING ◄──► STOPPED ◄──► ERROR
//!     │        │            │           │
//!     └────────┴─────┬──────┴───────────┘
//!                    ▼
//!                 DESTROY (terminal)
//! ```
//!
//! ## Rules
//! - [`State::Init`] is the sole initial state and never a transition target.
//! - [`State::Destroy`] is terminal and absorbing: no transition leaves it.
//! - A transition onto the current state is a no-op and is dropped before any
//!   user hook runs.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a subsystem.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// Constructed but not yet started.
    Init = 0,
    /// Started; dependents may start too.
    Running,
    /// Stopped; may be restarted.
    Stopped,
    /// Failed; may be restarted or stopped.
    Error,
    /// Torn down permanently. Terminal.
    Destroy,
}

impl State {
    /// Whether a transition from `self` onto `target` is legal.
    ///
    /// Rejects self-transitions (idempotent no-ops), anything out of
    /// [`State::Destroy`], and [`State::Init`] as a target.
    pub fn admits(self, target: State) -> bool {
        self != State::Destroy && target != State::Init && target != self
    }

    /// True for the terminal state.
    pub fn is_terminal(self) -> bool {
        self == State::Destroy
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            State::Init => "init",
            State::Running => "running",
            State::Stopped => "stopped",
            State::Error => "error",
            State::Destroy => "destroy",
        }
    }

    fn from_raw(raw: u8) -> State {
        match raw {
            0 => State::Init,
            1 => State::Running,
            2 => State::Stopped,
            3 => State::Error,
            4 => State::Destroy,
            _ => unreachable!("state cell holds only State discriminants"),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Init => "INIT",
            State::Running => "RUNNING",
            State::Stopped => "STOPPED",
            State::Error => "ERROR",
            State::Destroy => "DESTROY",
        };
        f.write_str(name)
    }
}

/// Lock-free holder for the current state of a subsystem.
///
/// Written only inside the commit window (under the link mutex); read without
/// any lock by peers posting messages and by `state()` introspection, so
/// posting never has to take a peer's mutex.
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new(state: State) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn get(&self) -> State {
        State::from_raw(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: State) {
        self.0.store(state as u8, Ordering::Release);
    }
}
