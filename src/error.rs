//! # Error types used by the coordination core and user hooks.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`] errors raised by the coordination core itself.
//! - [`HookError`] errors raised by user-supplied lifecycle hooks.
//!
//! Both types provide helper methods `as_label` for metrics.
//!
//! The core prefers absorption over propagation: stale or out-of-order
//! lifecycle messages are dropped and reported on the fault channel rather
//! than surfaced as errors, and triggers never fail. [`RuntimeError`] is
//! returned only from construction and registry lookups.

use thiserror::Error;

use crate::tag::Tag;

/// # Errors produced by the coordination core.
///
/// These represent failures in the coordination machinery itself, not in the
/// work performed by subsystems.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Registry lookup for a tag that was never inserted or already removed.
    #[error("subsystem {tag} not found in registry")]
    NotFound {
        /// The unknown tag.
        tag: Tag,
    },
    /// Attempted to register more subsystems than the registry admits.
    #[error("registry is full ({max} subsystems)")]
    CapacityExceeded {
        /// The configured bound.
        max: usize,
    },
    /// A lifecycle message that violates the wire protocol.
    #[error("protocol violation from {tag}: {detail}")]
    Protocol {
        /// Tag the offending message claims to be about.
        tag: Tag,
        /// What was wrong with it.
        detail: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NotFound { .. } => "runtime_not_found",
            RuntimeError::CapacityExceeded { .. } => "runtime_capacity_exceeded",
            RuntimeError::Protocol { .. } => "runtime_protocol",
        }
    }
}

/// # Errors produced by user-supplied hooks.
///
/// Hook failures are isolated: the commit that triggered the hook still
/// proceeds, and the failure is reported out-of-band on the fault channel.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HookError {
    /// The hook returned an error.
    #[error("hook failed: {reason}")]
    Fail { reason: String },

    /// The hook panicked; the panic was caught at the dispatch boundary.
    #[error("hook panicked: {detail}")]
    Panic { detail: String },
}

impl HookError {
    /// Convenience constructor for the common failure case.
    pub fn fail(reason: impl Into<String>) -> HookError {
        HookError::Fail { reason: reason.into() }
    }

    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            HookError::Fail { .. } => "hook_failed",
            HookError::Panic { .. } => "hook_panicked",
        }
    }
}
