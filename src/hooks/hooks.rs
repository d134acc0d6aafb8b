//! # The hook trait and its no-op implementation.
//!
//! All six operations are optional: lifecycle hooks default to doing nothing,
//! [`Hooks::on_parent`] defaults to following the parent (see
//! [`ParentPolicy`]), [`Hooks::on_child`] defaults to ignoring the child.
//!
//! ## Rules
//! - Hooks run on the subsystem's worker, outside any core lock; they may
//!   block and they may be slow, stalling only their own subsystem.
//! - Hooks must not call `destroy_now` on their own subsystem from inside
//!   themselves; re-posting triggers (`start()`, `stop()`, ...) is fine
//!   because posting never blocks.
//! - Errors and panics escaping a hook are caught, reported on the fault
//!   channel, and do not stop the state change that triggered the hook.
//!
//! # Example: custom hooks
//! ```no_run
//! use async_trait::async_trait;
//! use subvisor::{HookError, Hooks};
//!
//! struct CameraHooks;
//!
//! #[async_trait]
//! impl Hooks for CameraHooks {
//!     async fn on_start(&self) -> Result<(), HookError> {
//!         // open the device, begin streaming, ...
//!         Ok(())
//!     }
//!
//!     async fn on_stop(&self) -> Result<(), HookError> {
//!         // stop streaming
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::HookError;
use crate::ipc::Ipc;
use crate::policy::ParentPolicy;

/// Lifecycle callbacks of one subsystem.
///
/// Invoked by the worker while dispatching bus messages:
/// `on_start`/`on_stop`/`on_error`/`on_destroy` before the matching state is
/// committed, `on_parent`/`on_child` when a peer announces a state change.
#[async_trait]
pub trait Hooks: Send + Sync + 'static {
    /// Called before RUNNING is committed.
    async fn on_start(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Called before STOPPED is committed.
    async fn on_stop(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Called before ERROR is committed.
    async fn on_error(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Called before DESTROY is committed, after the bus stops accepting work.
    async fn on_destroy(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Called when a parent announces a state change.
    ///
    /// Return [`ParentPolicy::Cascade`] (the default) to follow the parent,
    /// or [`ParentPolicy::Ignore`] after handling the announcement yourself.
    async fn on_parent(&self, event: Ipc) -> Result<ParentPolicy, HookError> {
        let _ = event;
        Ok(ParentPolicy::Cascade)
    }

    /// Called when a child announces a state change.
    async fn on_child(&self, event: Ipc) -> Result<(), HookError> {
        let _ = event;
        Ok(())
    }
}

/// Hook set that does nothing; every operation keeps its default.
#[derive(Debug)]
pub struct NoHooks;

#[async_trait]
impl Hooks for NoHooks {}
