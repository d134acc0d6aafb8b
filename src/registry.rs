//! # Shared subsystem registry.
//!
//! The [`Registry`] is the one piece of state all subsystems share: a bounded
//! table mapping each [`Tag`] to the subsystem's last committed [`State`], its
//! diagnostic name, and a weak back-reference used for peer posting.
//!
//! ## Architecture
//! ```text
//!   Subsystem A ── commit ──► Registry.put_state(tag_a, state)
//!        │                        │
//!        │  fan-out               │ read lock, parallel
//!        └── get(tag_b) ──► (state, NodeRef) ──► node.post(...)
//! ```
//!
//! ## Rules
//! - Readers proceed in parallel; writers are serialized (rw-lock).
//! - `get` returns a consistent row snapshot, never a torn pair.
//! - Registry operations are leaf operations: they never take a subsystem's
//!   lock, so a subsystem may call them while holding its own.
//! - Rows are retained after DESTROY for late lookups; they disappear when
//!   the owner removes them, at the latest when the subsystem is dropped.
//!
//! The registry is a value passed explicitly to each subsystem at
//! construction. Hosts that want a process-wide singleton can use
//! [`Registry::install`] / [`Registry::installed`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock, Weak};

use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::RuntimeError;
use crate::faults::{Fault, FaultBus};
use crate::state::State;
use crate::subsystem::{Node, NodeRef};
use crate::tag::Tag;

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

/// One row of the registry.
#[derive(Debug)]
struct Row {
    state: State,
    name: String,
    node: Weak<dyn Node>,
}

/// Bounded, shared tag-to-subsystem table.
#[derive(Debug)]
pub struct Registry {
    config: Config,
    rows: RwLock<HashMap<Tag, Row>>,
    faults: FaultBus,
}

impl Registry {
    /// Creates a registry for at most `config.max_subsystems` subsystems.
    pub fn new(config: Config) -> Arc<Self> {
        let faults = FaultBus::new(config.fault_capacity);
        Arc::new(Self {
            rows: RwLock::new(HashMap::with_capacity(config.max_subsystems)),
            config,
            faults,
        })
    }

    /// Installs (or returns the already installed) process-wide registry.
    ///
    /// Idempotent: the configuration of the first call wins.
    pub fn install(config: Config) -> Arc<Registry> {
        GLOBAL.get_or_init(|| Registry::new(config)).clone()
    }

    /// Returns the process-wide registry if one has been installed.
    pub fn installed() -> Option<Arc<Registry>> {
        GLOBAL.get().cloned()
    }

    /// Publishes a new subsystem row in its initial state.
    pub(crate) fn insert(
        &self,
        tag: Tag,
        name: &str,
        node: Weak<dyn Node>,
    ) -> Result<(), RuntimeError> {
        let mut rows = self.rows.write().expect("registry lock poisoned");
        if rows.len() >= self.config.max_subsystems && !rows.contains_key(&tag) {
            return Err(RuntimeError::CapacityExceeded {
                max: self.config.max_subsystems,
            });
        }
        rows.insert(
            tag,
            Row {
                state: State::Init,
                name: name.to_string(),
                node,
            },
        );
        Ok(())
    }

    /// Returns the row for `tag` by value: last committed state plus a live
    /// handle for posting.
    ///
    /// Fails with [`RuntimeError::NotFound`] for unknown tags and for rows
    /// whose backing subsystem is already gone.
    pub fn get(&self, tag: Tag) -> Result<(State, NodeRef), RuntimeError> {
        let rows = self.rows.read().expect("registry lock poisoned");
        let row = rows.get(&tag).ok_or(RuntimeError::NotFound { tag })?;
        let node = row.node.upgrade().ok_or(RuntimeError::NotFound { tag })?;
        Ok((row.state, node))
    }

    /// Returns the last committed state for `tag`.
    pub fn state_of(&self, tag: Tag) -> Result<State, RuntimeError> {
        let rows = self.rows.read().expect("registry lock poisoned");
        rows.get(&tag)
            .map(|row| row.state)
            .ok_or(RuntimeError::NotFound { tag })
    }

    /// Updates only the state of an existing row.
    pub(crate) fn put_state(&self, tag: Tag, state: State) -> Result<(), RuntimeError> {
        let mut rows = self.rows.write().expect("registry lock poisoned");
        let row = rows.get_mut(&tag).ok_or(RuntimeError::NotFound { tag })?;
        row.state = state;
        Ok(())
    }

    /// Removes the row for `tag`. Unknown tags are ignored.
    pub fn remove(&self, tag: Tag) {
        let mut rows = self.rows.write().expect("registry lock poisoned");
        rows.remove(&tag);
    }

    /// Number of registered subsystems.
    pub fn len(&self) -> usize {
        self.rows.read().expect("registry lock poisoned").len()
    }

    /// True if no subsystems are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `tag` currently has a row.
    pub fn contains(&self, tag: Tag) -> bool {
        self.rows.read().expect("registry lock poisoned").contains_key(&tag)
    }

    /// Creates a subscriber for the out-of-band fault channel.
    pub fn subscribe_faults(&self) -> broadcast::Receiver<Fault> {
        self.faults.subscribe()
    }

    /// Prints one `tag, state, name` line per row to stdout.
    pub fn print(&self) {
        print!("{self}");
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn faults(&self) -> &FaultBus {
        &self.faults
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows.read().expect("registry lock poisoned");
        let mut ordered: Vec<_> = rows.iter().collect();
        ordered.sort_by_key(|(tag, _)| **tag);
        for (tag, row) in ordered {
            writeln!(f, "{tag} {} {}", row.state, row.name)?;
        }
        Ok(())
    }
}
