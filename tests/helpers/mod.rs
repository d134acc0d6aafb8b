//! Shared fixtures for the scenario tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use subvisor::{HookError, Hooks, Ipc, ParentPolicy, Registry, State, Tag, Worker};

const WAIT: Duration = Duration::from_secs(5);

/// One recorded hook invocation: `(subsystem name, note)`.
pub type Entry = (String, String);

pub fn log_channel() -> (mpsc::UnboundedSender<Entry>, mpsc::UnboundedReceiver<Entry>) {
    mpsc::unbounded_channel()
}

/// Hook set that reports every invocation on a shared channel.
pub struct Recorder {
    name: &'static str,
    tx: mpsc::UnboundedSender<Entry>,
    start_delay: Option<Duration>,
}

impl Recorder {
    pub fn new(name: &'static str, tx: &mpsc::UnboundedSender<Entry>) -> Self {
        Self {
            name,
            tx: tx.clone(),
            start_delay: None,
        }
    }

    /// Makes `on_start` linger, holding back the RUNNING commit.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = Some(delay);
        self
    }

    fn note(&self, what: impl Into<String>) {
        let _ = self.tx.send((self.name.to_string(), what.into()));
    }
}

#[async_trait]
impl Hooks for Recorder {
    async fn on_start(&self) -> Result<(), HookError> {
        if let Some(delay) = self.start_delay {
            sleep(delay).await;
        }
        self.note("start");
        Ok(())
    }

    async fn on_stop(&self) -> Result<(), HookError> {
        self.note("stop");
        Ok(())
    }

    async fn on_error(&self) -> Result<(), HookError> {
        self.note("error");
        Ok(())
    }

    async fn on_destroy(&self) -> Result<(), HookError> {
        self.note("destroy");
        Ok(())
    }

    async fn on_parent(&self, event: Ipc) -> Result<ParentPolicy, HookError> {
        self.note(format!("parent {}", event.state));
        Ok(ParentPolicy::Cascade)
    }

    async fn on_child(&self, event: Ipc) -> Result<(), HookError> {
        self.note(format!("child {}", event.state));
        Ok(())
    }
}

/// Receives entries until `n` of them match `note`; returns the subsystem
/// names in arrival order. Panics if that takes longer than five seconds.
pub async fn take_note(
    rx: &mut mpsc::UnboundedReceiver<Entry>,
    note: &str,
    n: usize,
) -> Vec<String> {
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let (name, what) = timeout(WAIT, rx.recv())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for {n} '{note}' entries, got {out:?}"))
            .expect("log channel closed");
        if what == note {
            out.push(name);
        }
    }
    out
}

/// Discards everything already recorded.
pub fn drain_now(rx: &mut mpsc::UnboundedReceiver<Entry>) {
    while rx.try_recv().is_ok() {}
}

/// Asserts that nothing new is recorded for a little while.
pub async fn assert_silent(rx: &mut mpsc::UnboundedReceiver<Entry>) {
    sleep(Duration::from_millis(100)).await;
    if let Ok(entry) = rx.try_recv() {
        panic!("expected silence, recorded {entry:?}");
    }
}

/// Polls the registry until `tag` reaches `state`.
pub async fn wait_state(registry: &Arc<Registry>, tag: Tag, state: State) {
    timeout(WAIT, async {
        loop {
            if registry.state_of(tag).ok() == Some(state) {
                break;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| {
        panic!(
            "timed out waiting for {tag} to reach {state}, still {:?}",
            registry.state_of(tag)
        )
    });
}

/// Joins a worker, failing the test if it does not exit in time.
pub async fn join_within(worker: Worker) {
    timeout(WAIT, worker.join())
        .await
        .expect("worker did not exit in time");
}
