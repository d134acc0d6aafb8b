//! Startup ordering across chains and diamonds.

mod helpers;

use std::time::Duration;

use helpers::{assert_silent, drain_now, join_within, log_channel, take_note, wait_state, Recorder};
use subvisor::{Config, Node, Registry, State, SubsystemBuilder};

#[tokio::test]
async fn linear_chain_starts_in_dependency_order() {
    let registry = Registry::new(Config::default());
    let (tx, mut rx) = log_channel();

    let (a, wa) = SubsystemBuilder::new("a")
        .hooks(Recorder::new("a", &tx))
        .spawn(&registry)
        .unwrap();
    let (b, wb) = SubsystemBuilder::new("b")
        .parent(&*a)
        .hooks(Recorder::new("b", &tx))
        .spawn(&registry)
        .unwrap();
    let (c, wc) = SubsystemBuilder::new("c")
        .parent(&*b)
        .hooks(Recorder::new("c", &tx))
        .spawn(&registry)
        .unwrap();

    a.start();

    let started = take_note(&mut rx, "start", 3).await;
    assert_eq!(started, ["a", "b", "c"]);

    wait_state(&registry, c.tag(), State::Running).await;
    assert_eq!(a.state(), State::Running);
    assert_eq!(b.state(), State::Running);
    assert_eq!(c.state(), State::Running);

    a.destroy();
    join_within(wa).await;
    join_within(wb).await;
    join_within(wc).await;
}

#[tokio::test]
async fn diamond_gates_on_both_parents() {
    let registry = Registry::new(Config::default());
    let (tx, mut rx) = log_channel();

    let (a, wa) = SubsystemBuilder::new("a")
        .hooks(Recorder::new("a", &tx))
        .spawn(&registry)
        .unwrap();
    // B lingers in its start hook, so D must wait on B long after C is up.
    let (b, wb) = SubsystemBuilder::new("b")
        .parent(&*a)
        .hooks(Recorder::new("b", &tx).with_start_delay(Duration::from_millis(300)))
        .spawn(&registry)
        .unwrap();
    let (c, wc) = SubsystemBuilder::new("c")
        .parent(&*a)
        .hooks(Recorder::new("c", &tx))
        .spawn(&registry)
        .unwrap();
    let (d, wd) = SubsystemBuilder::new("d")
        .parents([&*b as &dyn Node, &*c as &dyn Node])
        .hooks(Recorder::new("d", &tx))
        .spawn(&registry)
        .unwrap();

    a.start();

    wait_state(&registry, c.tag(), State::Running).await;
    // C is up but B is still held in its hook: D must not be running yet.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(registry.state_of(b.tag()).unwrap(), State::Init);
    assert_eq!(registry.state_of(d.tag()).unwrap(), State::Init);

    wait_state(&registry, b.tag(), State::Running).await;
    wait_state(&registry, d.tag(), State::Running).await;

    let started = take_note(&mut rx, "start", 4).await;
    assert_eq!(started[0], "a");

    a.destroy();
    join_within(wa).await;
    join_within(wb).await;
    join_within(wc).await;
    join_within(wd).await;
}

#[tokio::test]
async fn committing_the_current_state_is_invisible() {
    let registry = Registry::new(Config::default());
    let (tx, mut rx) = log_channel();

    let (solo, worker) = SubsystemBuilder::new("solo")
        .hooks(Recorder::new("solo", &tx))
        .spawn(&registry)
        .unwrap();

    solo.start();
    assert_eq!(take_note(&mut rx, "start", 1).await, ["solo"]);
    wait_state(&registry, solo.tag(), State::Running).await;

    // A second start is a no-op: no hook, no fan-out, no state churn.
    solo.start();
    assert_silent(&mut rx).await;
    assert_eq!(solo.state(), State::Running);

    solo.destroy();
    join_within(worker).await;
}

#[tokio::test]
async fn commit_reaches_every_live_peer_exactly_once() {
    let registry = Registry::new(Config::default());
    let (tx, mut rx) = log_channel();

    let (a, wa) = SubsystemBuilder::new("a")
        .hooks(Recorder::new("a", &tx))
        .spawn(&registry)
        .unwrap();
    let (b, wb) = SubsystemBuilder::new("b")
        .parent(&*a)
        .hooks(Recorder::new("b", &tx))
        .spawn(&registry)
        .unwrap();
    let (c, wc) = SubsystemBuilder::new("c")
        .parent(&*a)
        .hooks(Recorder::new("c", &tx))
        .spawn(&registry)
        .unwrap();

    a.start();
    wait_state(&registry, b.tag(), State::Running).await;
    wait_state(&registry, c.tag(), State::Running).await;
    drain_now(&mut rx);

    a.stop();
    let mut told = take_note(&mut rx, "parent STOPPED", 2).await;
    told.sort();
    assert_eq!(told, ["b", "c"]);

    // Both children follow; no second announcement arrives.
    wait_state(&registry, b.tag(), State::Stopped).await;
    wait_state(&registry, c.tag(), State::Stopped).await;
    let leftover: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
        .filter(|(_, what)| what == "parent STOPPED")
        .collect();
    assert!(leftover.is_empty(), "duplicate announcements: {leftover:?}");

    a.destroy();
    join_within(wa).await;
    join_within(wb).await;
    join_within(wc).await;
}

#[tokio::test]
async fn cooperative_driver_runs_the_same_protocol() {
    let registry = Registry::new(Config::default());

    let a = SubsystemBuilder::new("a").build(&registry).unwrap();
    let b = SubsystemBuilder::new("b").parent(&*a).build(&registry).unwrap();

    a.start();
    assert!(a.handle_bus_message().await);
    assert_eq!(a.state(), State::Running);

    // B saw the announcement, cascades, then commits.
    assert!(b.handle_bus_message().await);
    assert!(b.handle_bus_message().await);
    assert_eq!(b.state(), State::Running);

    // A hears back from its child.
    assert!(a.handle_bus_message().await);

    a.destroy();
    assert!(a.handle_bus_message().await);
    assert!(!a.handle_bus_message().await);
    assert_eq!(a.state(), State::Destroy);

    assert!(b.handle_bus_message().await);
    assert!(b.handle_bus_message().await);
    assert!(!b.handle_bus_message().await);
    assert_eq!(b.state(), State::Destroy);
}
