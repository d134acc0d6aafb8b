//! # Subsystems: dependency-gated lifecycle nodes.
//!
//! - [`Subsystem`] the state machine itself ([`core`](self) module docs cover
//!   the moving parts)
//! - [`SubsystemBuilder`] staged construction
//! - [`Worker`] the task driving one subsystem's bus
//! - [`Node`] / [`NodeRef`] type-erased peer handles

mod builder;
mod core;
mod node;
mod worker;

pub use builder::SubsystemBuilder;
pub use core::Subsystem;
pub use node::{Node, NodeRef};
pub use worker::Worker;
