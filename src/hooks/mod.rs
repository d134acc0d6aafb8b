//! # User-supplied lifecycle hooks.
//!
//! [`Hooks`] is the main **extension point** for end users: six optional
//! operations invoked by a subsystem's worker as lifecycle messages are
//! dispatched. Implement the trait on your own type, or register closures
//! through [`FnHooks`] when a dedicated type is not worth it.

mod hook_fns;
#[allow(clippy::module_inception)]
mod hooks;

pub use hook_fns::FnHooks;
pub use hooks::{Hooks, NoHooks};
