//! # Type-erased subsystem handles.
//!
//! [`Node`] is the face one subsystem shows to its peers: identity, current
//! state, and a mailbox to post into. Concrete subsystems differ in their
//! hook type, so edges in the dependency graph and rows in the registry refer
//! to each other through `dyn Node`.
//!
//! ## Rules
//! - The registry holds nodes weakly; a dropped subsystem is observed as gone,
//!   never dangled into.
//! - Posting is lock-free at the receiver: an atomic state check, a channel
//!   send, and a wakeup. Peers may post while holding their own locks.

use std::sync::Arc;

use crate::ipc::Ipc;
use crate::state::State;
use crate::tag::Tag;

/// Shared handle to a subsystem, as seen by peers and the registry.
pub type NodeRef = Arc<dyn Node>;

/// A single node of the dependency graph.
///
/// Implemented by [`Subsystem`](crate::Subsystem); host code consumes this
/// trait but does not implement it.
pub trait Node: Send + Sync + 'static {
    /// Process-unique identifier of this subsystem.
    fn tag(&self) -> Tag;

    /// Diagnostic name of this subsystem.
    fn name(&self) -> &str;

    /// Current lifecycle state.
    fn state(&self) -> State;

    /// Posts a lifecycle message on this subsystem's bus.
    ///
    /// Never blocks. Messages posted to a destroyed subsystem are dropped and
    /// reported as `Discarded` faults.
    fn post(&self, event: Ipc);

    /// Records `child` as a direct dependent of this subsystem.
    ///
    /// Called by a dependent while it is being constructed against this node;
    /// not intended for host code.
    fn attach_child(&self, child: Tag);
}
