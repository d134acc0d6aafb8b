//! # subvisor
//!
//! **Subvisor** is a lightweight subsystem coordination library.
//!
//! It composes named units of work into a directed acyclic dependency graph
//! where each node runs an independent lifecycle (INIT, RUNNING, STOPPED,
//! ERROR, DESTROY) and state changes propagate to dependents through
//! per-subsystem message buses. The crate is designed as a building block
//! for larger services and embedded control planes.
//!
//! ## Features
//!
//! | Area              | Description                                                        | Key types / traits                  |
//! |-------------------|--------------------------------------------------------------------|-------------------------------------|
//! | **Hooks API**     | Plug lifecycle callbacks into each subsystem.                      | [`Hooks`], [`FnHooks`], [`NoHooks`] |
//! | **Coordination**  | Parent gating, commit fan-out, cancel escape.                      | [`Subsystem`], [`SubsystemBuilder`] |
//! | **Registry**      | Shared tag-to-state table observed by all subsystems.              | [`Registry`], [`Config`]            |
//! | **Workers**       | One driver per subsystem, or cooperative single-thread driving.    | [`Worker`]                          |
//! | **Faults**        | Out-of-band reports for absorbed anomalies.                        | [`Fault`], [`FaultKind`]            |
//! | **Errors**        | Typed errors for the core and for user hooks.                      | [`RuntimeError`], [`HookError`]     |
//!
//! ## Guarantees
//!
//! - A subsystem never commits RUNNING while any of its dependencies still
//!   sits in INIT.
//! - A parent's ERROR, STOPPED, or DESTROY is observed by every live
//!   dependent and, by default, cascaded.
//! - DESTROY is terminal: no later trigger or message resurrects a subsystem,
//!   and its worker exits in finite time.
//! - Transitions are serialized per subsystem no matter how many threads
//!   fire triggers concurrently.
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] fault printer
//!   _(demo/reference only)_.
//!
//! ```no_run
//! use subvisor::{Config, Registry, SubsystemBuilder};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::new(Config::default());
//!
//!     // A tiny topology: the camera depends on the busdriver.
//!     let (bus, bus_worker) = SubsystemBuilder::new("busdriver").spawn(&registry)?;
//!     let (cam, cam_worker) = SubsystemBuilder::new("camera").parent(&*bus).spawn(&registry)?;
//!
//!     // Starting the root cascades to the camera once the bus is RUNNING.
//!     bus.start();
//!
//!     // Tearing down the root cascades too; workers exit on their own.
//!     bus.destroy();
//!     bus_worker.join().await;
//!     cam_worker.join().await;
//!
//!     registry.print();
//!     Ok(())
//! }
//! ```
//!
//! ---

mod bus;
mod config;
mod error;
mod faults;
mod hooks;
mod ipc;
mod policy;
mod registry;
mod state;
mod subsystem;
mod tag;

// ---- Public re-exports ----

pub use config::Config;
pub use error::{HookError, RuntimeError};
pub use faults::{Fault, FaultKind};
pub use hooks::{FnHooks, Hooks, NoHooks};
pub use ipc::{Ipc, Origin};
pub use policy::ParentPolicy;
pub use registry::Registry;
pub use state::State;
pub use subsystem::{Node, NodeRef, Subsystem, SubsystemBuilder, Worker};
pub use tag::Tag;

// Optional: expose a simple built-in fault printer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use faults::LogWriter;
