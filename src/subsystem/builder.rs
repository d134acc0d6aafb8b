//! # Builder for subsystems.
//!
//! [`SubsystemBuilder`] collects a name, a parent list, and a hook set, then
//! builds the subsystem against a registry, optionally spawning its worker in
//! the same breath.
//!
//! ## Example
//! ```no_run
//! use subvisor::{Config, NoHooks, Registry, SubsystemBuilder};
//!
//! # async fn demo() -> Result<(), subvisor::RuntimeError> {
//! let registry = Registry::new(Config::default());
//!
//! let (os, os_worker) = SubsystemBuilder::new("os").spawn(&registry)?;
//! let (camera, cam_worker) = SubsystemBuilder::new("camera")
//!     .parent(&*os)
//!     .spawn(&registry)?;
//!
//! os.start();
//! # let _ = (camera, os_worker, cam_worker);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::error::RuntimeError;
use crate::hooks::{Hooks, NoHooks};
use crate::registry::Registry;

use super::core::Subsystem;
use super::node::Node;
use super::worker::Worker;

/// Staged construction of a [`Subsystem`].
pub struct SubsystemBuilder<'a, H: Hooks = NoHooks> {
    name: String,
    hooks: H,
    parents: Vec<&'a dyn Node>,
}

impl<'a> SubsystemBuilder<'a, NoHooks> {
    /// Starts a builder for a subsystem named `name`, with no parents and
    /// no-op hooks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: NoHooks,
            parents: Vec::new(),
        }
    }
}

impl<'a, H: Hooks> SubsystemBuilder<'a, H> {
    /// Adds one direct dependency.
    pub fn parent(mut self, parent: &'a dyn Node) -> Self {
        self.parents.push(parent);
        self
    }

    /// Adds several direct dependencies.
    pub fn parents<I>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn Node>,
    {
        self.parents.extend(parents);
        self
    }

    /// Replaces the hook set.
    pub fn hooks<H2: Hooks>(self, hooks: H2) -> SubsystemBuilder<'a, H2> {
        SubsystemBuilder {
            name: self.name,
            hooks,
            parents: self.parents,
        }
    }

    /// Builds the subsystem without spawning a worker.
    ///
    /// Use this for cooperative drivers, or call
    /// [`spawn_worker`](Subsystem::spawn_worker) later.
    pub fn build(self, registry: &Arc<Registry>) -> Result<Arc<Subsystem<H>>, RuntimeError> {
        Subsystem::new(self.name, self.hooks, &self.parents, registry)
    }

    /// Builds the subsystem and spawns its worker.
    pub fn spawn(
        self,
        registry: &Arc<Registry>,
    ) -> Result<(Arc<Subsystem<H>>, Worker), RuntimeError> {
        let subsystem = self.build(registry)?;
        let worker = subsystem.spawn_worker();
        Ok((subsystem, worker))
    }
}
