//! # Closure-backed hooks (`FnHooks`)
//!
//! [`FnHooks`] implements [`Hooks`] from registered closures, producing a
//! fresh future per invocation. Useful when a dedicated hook type is not
//! worth writing; unset operations keep their defaults.
//!
//! ## Example
//! ```
//! use subvisor::{FnHooks, HookError};
//!
//! let hooks = FnHooks::new()
//!     .on_start(|| async { Ok(()) })
//!     .on_error(|| async { Err(HookError::fail("sensor gone")) });
//! # let _ = hooks;
//! ```

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::HookError;
use crate::ipc::Ipc;
use crate::policy::ParentPolicy;

use super::Hooks;

/// Boxed future returned by a lifecycle closure.
type BoxHookFuture = Pin<Box<dyn Future<Output = Result<(), HookError>> + Send + 'static>>;

/// Boxed future returned by an `on_parent` closure.
type BoxParentFuture = Pin<Box<dyn Future<Output = Result<ParentPolicy, HookError>> + Send + 'static>>;

type LifecycleFn = Box<dyn Fn() -> BoxHookFuture + Send + Sync>;
type ParentFn = Box<dyn Fn(Ipc) -> BoxParentFuture + Send + Sync>;
type ChildFn = Box<dyn Fn(Ipc) -> BoxHookFuture + Send + Sync>;

/// Hook set assembled from closures.
///
/// Each closure *creates* a new future per invocation; share state across
/// invocations explicitly via `Arc` captured inside the closure.
#[derive(Default)]
pub struct FnHooks {
    start: Option<LifecycleFn>,
    stop: Option<LifecycleFn>,
    error: Option<LifecycleFn>,
    destroy: Option<LifecycleFn>,
    parent: Option<ParentFn>,
    child: Option<ChildFn>,
}

impl FnHooks {
    /// Creates an empty set; every operation keeps its default until set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the start hook.
    pub fn on_start<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.start = Some(Box::new(move || Box::pin(f())));
        self
    }

    /// Registers the stop hook.
    pub fn on_stop<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.stop = Some(Box::new(move || Box::pin(f())));
        self
    }

    /// Registers the error hook.
    pub fn on_error<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.error = Some(Box::new(move || Box::pin(f())));
        self
    }

    /// Registers the destroy hook.
    pub fn on_destroy<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.destroy = Some(Box::new(move || Box::pin(f())));
        self
    }

    /// Registers the parent-announcement hook.
    pub fn on_parent<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Ipc) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ParentPolicy, HookError>> + Send + 'static,
    {
        self.parent = Some(Box::new(move |event| Box::pin(f(event))));
        self
    }

    /// Registers the child-announcement hook.
    pub fn on_child<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Ipc) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        self.child = Some(Box::new(move |event| Box::pin(f(event))));
        self
    }
}

#[async_trait]
impl Hooks for FnHooks {
    async fn on_start(&self) -> Result<(), HookError> {
        match &self.start {
            Some(f) => f().await,
            None => Ok(()),
        }
    }

    async fn on_stop(&self) -> Result<(), HookError> {
        match &self.stop {
            Some(f) => f().await,
            None => Ok(()),
        }
    }

    async fn on_error(&self) -> Result<(), HookError> {
        match &self.error {
            Some(f) => f().await,
            None => Ok(()),
        }
    }

    async fn on_destroy(&self) -> Result<(), HookError> {
        match &self.destroy {
            Some(f) => f().await,
            None => Ok(()),
        }
    }

    async fn on_parent(&self, event: Ipc) -> Result<ParentPolicy, HookError> {
        match &self.parent {
            Some(f) => f(event).await,
            None => Ok(ParentPolicy::Cascade),
        }
    }

    async fn on_child(&self, event: Ipc) -> Result<(), HookError> {
        match &self.child {
            Some(f) => f(event).await,
            None => Ok(()),
        }
    }
}
