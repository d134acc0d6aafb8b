//! # Lifecycle messages exchanged between subsystems.
//!
//! An [`Ipc`] names who the message is about ([`Origin`] relative to the
//! receiver), which subsystem originated it, and the state it announces.
//! Messages are value-copied into per-subsystem channels; there is no shared
//! payload and no cross-channel ordering.

use crate::state::State;
use crate::tag::Tag;

/// Originator of a lifecycle message, relative to the receiving subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Posted by one of the receiver's own triggers.
    Own,
    /// Posted by a direct dependency during its commit fan-out.
    Parent,
    /// Posted by a direct dependent during its commit fan-out.
    Child,
}

/// A single lifecycle announcement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ipc {
    /// Who the announcement is from, relative to the receiver.
    pub origin: Origin,
    /// Tag of the subsystem the announcement is about.
    pub tag: Tag,
    /// The state that subsystem is moving to.
    pub state: State,
}

impl Ipc {
    /// Announcement a subsystem posts to itself via a trigger.
    pub fn own(tag: Tag, state: State) -> Ipc {
        Ipc { origin: Origin::Own, tag, state }
    }

    /// Announcement a parent posts to its dependents.
    pub fn parent(tag: Tag, state: State) -> Ipc {
        Ipc { origin: Origin::Parent, tag, state }
    }

    /// Announcement a child posts to its dependencies.
    pub fn child(tag: Tag, state: State) -> Ipc {
        Ipc { origin: Origin::Child, tag, state }
    }
}
