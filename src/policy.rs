//! # Reaction policy for parent announcements.
//!
//! [`ParentPolicy`] is returned by [`Hooks::on_parent`](crate::Hooks::on_parent)
//! and tells the core whether to apply the default cascade to a parent's state
//! change.
//!
//! - [`ParentPolicy::Cascade`] the subsystem follows the parent (default):
//!   a parent ERROR triggers `error()`, DESTROY triggers `destroy()`,
//!   STOPPED triggers `stop()`, RUNNING triggers `start()`.
//! - [`ParentPolicy::Ignore`] the hook handled the announcement itself; the
//!   core takes no further action.

/// Policy controlling how a subsystem reacts to a parent's state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentPolicy {
    /// Follow the parent's state (default).
    Cascade,
    /// Take no automatic action; the hook already reacted.
    Ignore,
}

impl Default for ParentPolicy {
    /// Returns [`ParentPolicy::Cascade`].
    fn default() -> Self {
        ParentPolicy::Cascade
    }
}
