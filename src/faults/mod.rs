//! # Out-of-band fault reporting.
//!
//! Lifecycle anomalies are absorbed, not propagated: a failing hook, a
//! malformed message, or a post landing on a destroyed subsystem never stops
//! the worker. Each such event is published as a [`Fault`] on a broadcast
//! channel owned by the [`Registry`](crate::Registry); hosts that care
//! subscribe, hosts that do not pay nothing.

mod bus;
mod fault;

#[cfg(feature = "logging")]
mod log;

pub(crate) use bus::FaultBus;
pub use fault::{Fault, FaultKind};

#[cfg(feature = "logging")]
pub use log::LogWriter;
