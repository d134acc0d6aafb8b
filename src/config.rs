//! # Core configuration.
//!
//! [`Config`] sizes the shared registry and the out-of-band fault channel and
//! selects how protocol violations are treated.
//!
//! # Example
//! ```
//! use subvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.max_subsystems = 64;
//!
//! assert_eq!(cfg.max_subsystems, 64);
//! assert!(!cfg.strict_protocol);
//! ```

/// Configuration for a [`Registry`](crate::Registry) and the subsystems
/// coordinated through it.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of subsystems the registry admits.
    pub max_subsystems: usize,
    /// Capacity of the broadcast fault channel.
    pub fault_capacity: usize,
    /// Panic on protocol violations instead of reporting and dropping them.
    pub strict_protocol: bool,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `max_subsystems = 16`
    /// - `fault_capacity = 1024`
    /// - `strict_protocol = false`
    fn default() -> Self {
        Self {
            max_subsystems: 16,
            fault_capacity: 1024,
            strict_protocol: false,
        }
    }
}
