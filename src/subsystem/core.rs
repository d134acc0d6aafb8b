//! # Subsystem: a dependency-gated lifecycle state machine.
//!
//! A [`Subsystem`] is one node of a directed acyclic dependency graph. Each
//! node owns a FIFO bus, a cancel flag, and a set of user [`Hooks`]; state
//! changes travel as [`Ipc`] messages and are serialized by the single worker
//! that drains the bus.
//!
//! ## Architecture
//! ```text
//!  start()/stop()/error()/destroy()          peers (via registry)
//!          │ post Own                            │ post Parent/Child
//!          ▼                                     ▼
//!        ┌──────────────────── Bus ────────────────────┐
//!        └──────────────────────┬─────────────────────-┘
//!                     worker: handle_bus_message()
//!                               │
//!              ┌────────────────┼───────────────────┐
//!              ▼                ▼                   ▼
//!        own event        parent event        child event
//!        run hook         update sets,        update sets,
//!        commit(state)    on_parent →         on_child
//!              │          cascade triggers
//!              ▼
//!        gate on parents ── registry reads ──► fan-out to peers
//! ```
//!
//! ## Rules
//! - A child never commits RUNNING while any parent still sits in INIT.
//! - DESTROY is absorbing: later triggers and messages are dropped and
//!   reported as `Discarded` faults.
//! - Hooks run on the worker, outside the link mutex; a hook failure never
//!   blocks the commit it precedes.
//! - The cancel flag is single-shot: consuming it re-arms the gate.

use std::collections::BTreeSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures::FutureExt;
use tokio::sync::Notify;

use crate::bus::{Bus, BusMessage};
use crate::error::{HookError, RuntimeError};
use crate::faults::{Fault, FaultKind};
use crate::hooks::{Hooks, NoHooks};
use crate::ipc::{Ipc, Origin};
use crate::policy::ParentPolicy;
use crate::registry::Registry;
use crate::state::{State, StateCell};
use crate::tag::Tag;

use super::node::Node;

const LINK_POISONED: &str = "subsystem link lock poisoned";

/// Graph edges of one subsystem, guarded by the link mutex.
#[derive(Debug)]
struct Link {
    /// Tags of direct dependencies. Fixed at construction, shrinks when a
    /// parent announces DESTROY.
    parents: BTreeSet<Tag>,
    /// Tags of direct dependents. Grows as dependents are constructed,
    /// shrinks when a child announces DESTROY.
    children: BTreeSet<Tag>,
}

/// Outcome of a single commit attempt.
enum Commit {
    /// State written, registry updated, peers notified.
    Done,
    /// Idempotent or post-DESTROY attempt; dropped.
    Skipped,
    /// The gate is not open yet; try again after a wakeup.
    Parked,
}

/// One node of the dependency graph; see the [module docs](self).
#[derive(Debug)]
pub struct Subsystem<H: Hooks = NoHooks> {
    tag: Tag,
    name: String,
    hooks: H,
    registry: Arc<Registry>,
    state: StateCell,
    link: Mutex<Link>,
    cancel: AtomicBool,
    proceed: Notify,
    bus: Bus,
    worker_seat: AtomicBool,
}

impl<H: Hooks> Subsystem<H> {
    /// Constructs a subsystem named `name` depending on `parents`.
    ///
    /// The new subsystem is registered in INIT state, records itself as a
    /// child of every listed parent, and stays inert until its worker runs
    /// (see [`spawn_worker`](Subsystem::spawn_worker)) or a cooperative
    /// driver calls [`handle_bus_message`](Subsystem::handle_bus_message).
    ///
    /// Every parent must still be registered. Parents always outdate their
    /// children, so the graph is acyclic by construction.
    pub fn new(
        name: impl Into<String>,
        hooks: H,
        parents: &[&dyn Node],
        registry: &Arc<Registry>,
    ) -> Result<Arc<Self>, RuntimeError> {
        let tag = Tag::next();

        let mut parent_tags = BTreeSet::new();
        for parent in parents {
            registry.state_of(parent.tag())?;
            parent_tags.insert(parent.tag());
        }

        let subsystem = Arc::new(Self {
            tag,
            name: name.into(),
            hooks,
            registry: Arc::clone(registry),
            state: StateCell::new(State::Init),
            link: Mutex::new(Link {
                parents: parent_tags,
                children: BTreeSet::new(),
            }),
            cancel: AtomicBool::new(false),
            proceed: Notify::new(),
            bus: Bus::new(),
            worker_seat: AtomicBool::new(false),
        });

        let node: Weak<dyn Node> = Arc::downgrade(&(Arc::clone(&subsystem) as Arc<dyn Node>));
        registry.insert(tag, &subsystem.name, node)?;
        for parent in parents {
            parent.attach_child(tag);
        }

        Ok(subsystem)
    }

    /// Process-unique identifier of this subsystem.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Diagnostic name of this subsystem.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state.get()
    }

    // ---- Triggers ----

    /// Requests RUNNING. Non-blocking; the worker decides whether to honor it.
    pub fn start(&self) {
        self.post(Ipc::own(self.tag, State::Running));
    }

    /// Requests STOPPED. Non-blocking.
    pub fn stop(&self) {
        self.post(Ipc::own(self.tag, State::Stopped));
    }

    /// Requests ERROR. Non-blocking.
    pub fn error(&self) {
        self.post(Ipc::own(self.tag, State::Error));
    }

    /// Requests DESTROY. Non-blocking.
    ///
    /// Also raises the cancel flag so a commit already parked on a slow
    /// parent escapes its gate and the queued DESTROY gets processed.
    pub fn destroy(&self) {
        self.cancel.store(true, Ordering::Release);
        self.proceed.notify_one();
        self.post(Ipc::own(self.tag, State::Destroy));
    }

    /// Destroys synchronously on the caller's thread.
    ///
    /// Commits DESTROY immediately (the raised cancel flag guarantees the
    /// gate opens without waiting), discards queued messages best-effort and
    /// terminates the bus so the worker exits. Does not run `on_destroy`;
    /// post [`destroy`](Subsystem::destroy) instead if the hook matters.
    pub fn destroy_now(&self) {
        loop {
            self.cancel.store(true, Ordering::Release);
            match self.try_commit(State::Destroy) {
                Commit::Done | Commit::Skipped => break,
                // A parked commit on the worker consumed the flag first;
                // re-arm and retry.
                Commit::Parked => std::hint::spin_loop(),
            }
        }
        self.bus.drain();
        self.bus.terminate();
        self.proceed.notify_one();
    }

    /// Raises the cancel flag and wakes a parked commit.
    ///
    /// The flag is single-shot: the next gate check consumes it and proceeds
    /// regardless of parent states.
    pub fn force_signal(&self) {
        self.cancel.store(true, Ordering::Release);
        self.proceed.notify_one();
    }

    // ---- Worker entry ----

    /// Handles the next bus message; the worker entry point.
    ///
    /// Returns `false` once the terminator surfaces; the caller must stop
    /// driving the bus at that point. Cooperative hosts call this in a loop
    /// instead of spawning a worker.
    pub async fn handle_bus_message(&self) -> bool {
        match self.bus.wait_and_pop().await {
            BusMessage::Terminator => {
                self.proceed.notify_one();
                false
            }
            BusMessage::Ipc(event) => {
                self.handle_event(event).await;
                true
            }
        }
    }

    pub(crate) fn claim_worker_seat(&self) -> bool {
        !self.worker_seat.swap(true, Ordering::AcqRel)
    }

    // ---- Event dispatch ----

    async fn handle_event(&self, event: Ipc) {
        match event.origin {
            Origin::Own => self.handle_own_event(event).await,
            Origin::Parent => self.handle_parent_event(event).await,
            Origin::Child => self.handle_child_event(event).await,
        }
        // Release a parked commit so it re-reads the world.
        self.proceed.notify_one();
    }

    async fn handle_own_event(&self, event: Ipc) {
        if event.state == State::Init {
            self.report_protocol(&event, "INIT is not a valid trigger target");
            return;
        }

        // Idempotent and post-DESTROY attempts are dropped before any hook
        // runs; a committed no-op must be invisible to the host.
        if !self.state.get().admits(event.state) {
            return;
        }

        match event.state {
            State::Running => {
                self.run_hook("on_start", self.hooks.on_start()).await;
            }
            State::Stopped => {
                self.run_hook("on_stop", self.hooks.on_stop()).await;
            }
            State::Error => {
                self.run_hook("on_error", self.hooks.on_error()).await;
            }
            State::Destroy => {
                self.cancel.store(true, Ordering::Release);
                self.run_hook("on_destroy", self.hooks.on_destroy()).await;
                self.stop_bus();
            }
            State::Init => return,
        }

        self.commit(event.state).await;
    }

    async fn handle_parent_event(&self, event: Ipc) {
        if event.state == State::Destroy {
            // The parent is gone: stop gating on it and let any parked
            // commit through.
            self.cancel.store(true, Ordering::Release);
            self.link.lock().expect(LINK_POISONED).parents.remove(&event.tag);
        }

        let policy = self
            .run_hook("on_parent", self.hooks.on_parent(event))
            .await
            .unwrap_or(ParentPolicy::Cascade);

        if policy == ParentPolicy::Cascade {
            match event.state {
                State::Running => self.start(),
                State::Stopped => self.stop(),
                State::Error => self.error(),
                State::Destroy => self.destroy(),
                State::Init => {}
            }
        }
    }

    async fn handle_child_event(&self, event: Ipc) {
        if event.state == State::Destroy {
            self.link.lock().expect(LINK_POISONED).children.remove(&event.tag);
        }
        self.run_hook("on_child", self.hooks.on_child(event)).await;
    }

    /// Runs one user hook, isolating errors and panics.
    ///
    /// Failures are reported on the fault channel and surface as `None`; the
    /// lifecycle machinery carries on either way.
    async fn run_hook<T, F>(&self, hook: &'static str, fut: F) -> Option<T>
    where
        F: Future<Output = Result<T, HookError>>,
    {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                self.report_hook_failure(hook, err);
                None
            }
            Err(payload) => {
                let err = HookError::Panic {
                    detail: panic_detail(payload),
                };
                self.report_hook_failure(hook, err);
                None
            }
        }
    }

    // ---- Commit path ----

    /// Commits `next`, waiting on the gate as long as necessary.
    ///
    /// The `Notified` future is armed before every attempt so a wakeup
    /// between the check and the await cannot be lost; stray wakeups just
    /// re-run the check.
    async fn commit(&self, next: State) {
        loop {
            let parked = self.proceed.notified();
            match self.try_commit(next) {
                Commit::Done | Commit::Skipped => return,
                Commit::Parked => parked.await,
            }
        }
    }

    /// Single gate check plus, if open, the atomic commit and fan-out.
    fn try_commit(&self, next: State) -> Commit {
        let link = self.link.lock().expect(LINK_POISONED);

        // Re-checked under the lock: a concurrent destroy_now may have won
        // the race since this event was dispatched.
        if !self.state.get().admits(next) {
            return Commit::Skipped;
        }
        if !self.ready_to_proceed(&link) {
            return Commit::Parked;
        }

        self.state.set(next);
        // A missing row means the host already removed it; peers can no
        // longer observe the change but the local state stands.
        let _ = self.registry.put_state(self.tag, next);

        // Parents first, then children; set order keeps sibling delivery
        // deterministic. Posting is lock-free at the peer, so holding the
        // link mutex here cannot deadlock.
        for parent in &link.parents {
            if let Ok((State::Running, node)) = self.registry.get(*parent) {
                node.post(Ipc::child(self.tag, next));
            }
        }
        for child in &link.children {
            if let Ok((state, node)) = self.registry.get(*child) {
                if state != State::Destroy {
                    node.post(Ipc::parent(self.tag, next));
                }
            }
        }

        Commit::Done
    }

    /// The gate: whether a commit may proceed right now.
    ///
    /// Open when the subsystem has no parents, is already on its way out,
    /// holds a cancel signal (consumed here), or every remaining parent has
    /// left INIT. A parent missing from the registry counts as gone and does
    /// not hold the gate.
    fn ready_to_proceed(&self, link: &MutexGuard<'_, Link>) -> bool {
        if link.parents.is_empty() {
            return true;
        }
        if self.state.get() == State::Destroy {
            return true;
        }
        if self.cancel.swap(false, Ordering::AcqRel) {
            return true;
        }
        link.parents.iter().all(|parent| {
            !matches!(self.registry.state_of(*parent), Ok(State::Init))
        })
    }

    /// Stops the bus: discard queued messages, then terminate.
    fn stop_bus(&self) {
        self.bus.drain();
        self.cancel.store(true, Ordering::Release);
        self.bus.terminate();
    }

    // ---- Fault reporting ----

    fn report_hook_failure(&self, hook: &'static str, err: HookError) {
        self.registry.faults().publish(
            Fault::new(FaultKind::HookFailed, self.tag, &self.name)
                .with_detail(format!("{hook}: {err}")),
        );
    }

    fn report_protocol(&self, event: &Ipc, why: &str) {
        if self.registry.config().strict_protocol {
            panic!("subsystem {} ({}): {why}", self.name, self.tag);
        }
        self.registry.faults().publish(
            Fault::new(FaultKind::Protocol, self.tag, &self.name).with_detail(format!(
                "{:?} {} from {}: {why}",
                event.origin, event.state, event.tag
            )),
        );
    }

    fn report_discarded(&self, event: &Ipc, why: &str) {
        self.registry.faults().publish(
            Fault::new(FaultKind::Discarded, self.tag, &self.name).with_detail(format!(
                "{:?} {} from {}: {why}",
                event.origin, event.state, event.tag
            )),
        );
    }
}

impl<H: Hooks> Node for Subsystem<H> {
    fn tag(&self) -> Tag {
        self.tag
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> State {
        self.state.get()
    }

    fn post(&self, event: Ipc) {
        if self.state.get() == State::Destroy {
            self.report_discarded(&event, "posted after destroy");
            return;
        }
        if self.bus.push(event) {
            self.proceed.notify_one();
        } else {
            self.report_discarded(&event, "posted after bus terminated");
        }
    }

    fn attach_child(&self, child: Tag) {
        self.link.lock().expect(LINK_POISONED).children.insert(child);
    }
}

impl<H: Hooks> Drop for Subsystem<H> {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Release);
        self.proceed.notify_one();
        self.registry.remove(self.tag);
    }
}

/// Extracts a readable message from a caught panic payload.
fn panic_detail(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
