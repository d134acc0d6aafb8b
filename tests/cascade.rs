//! Cascading of parent state changes to descendants.

mod helpers;

use helpers::{drain_now, join_within, log_channel, take_note, wait_state, Recorder};
use subvisor::{Config, FnHooks, HookError, ParentPolicy, Registry, State, SubsystemBuilder};

#[tokio::test]
async fn error_cascades_down_the_chain() {
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
    wait_state(&registry, c.tag(), State::Running).await;
    drain_now(&mut rx);

    a.error();

    let errored = take_note(&mut rx, "error", 3).await;
    assert_eq!(errored, ["a", "b", "c"]);
    wait_state(&registry, c.tag(), State::Error).await;
    assert_eq!(a.state(), State::Error);
    assert_eq!(b.state(), State::Error);
    assert_eq!(c.state(), State::Error);

    // Restart after the failure: the chain re-gates and comes back up.
    a.start();
    let restarted = take_note(&mut rx, "start", 3).await;
    assert_eq!(restarted, ["a", "b", "c"]);
    wait_state(&registry, c.tag(), State::Running).await;

    a.destroy();
    join_within(wa).await;
    join_within(wb).await;
    join_within(wc).await;
}

#[tokio::test]
async fn on_parent_can_refuse_the_cascade() {
    let registry = Registry::new(Config::default());
    let (tx, mut rx) = log_channel();

    let (a, wa) = SubsystemBuilder::new("a").spawn(&registry).unwrap();

    let seen = tx.clone();
    let hooks = FnHooks::new().on_parent(move |event| {
        let seen = seen.clone();
        async move {
            let _ = seen.send(("b".to_string(), format!("parent {}", event.state)));
            Ok::<_, HookError>(ParentPolicy::Ignore)
        }
    });
    let (b, wb) = SubsystemBuilder::new("b")
        .parent(&*a)
        .hooks(hooks)
        .spawn(&registry)
        .unwrap();

    a.start();
    wait_state(&registry, a.tag(), State::Running).await;

    // B heard the announcement but elected not to follow.
    assert_eq!(take_note(&mut rx, "parent RUNNING", 1).await, ["b"]);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert_eq!(b.state(), State::Init);

    a.destroy();
    // The destroy announcement still tears B down: cancel and parent removal
    // happen in the core, before the hook is consulted, and B's own destroy
    // is posted by the teardown below.
    b.destroy();
    join_within(wa).await;
    join_within(wb).await;
}

#[tokio::test]
async fn parents_hear_their_children() {
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

    a.start();
    wait_state(&registry, b.tag(), State::Running).await;
    drain_now(&mut rx);

    b.stop();

    assert_eq!(take_note(&mut rx, "child STOPPED", 1).await, ["a"]);
    assert_eq!(a.state(), State::Running);

    a.destroy();
    join_within(wa).await;
    join_within(wb).await;
}

#[tokio::test]
async fn stop_cascades_like_error() {
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

    a.start();
    wait_state(&registry, b.tag(), State::Running).await;
    drain_now(&mut rx);

    a.stop();
    assert_eq!(take_note(&mut rx, "stop", 2).await, ["a", "b"]);
    wait_state(&registry, b.tag(), State::Stopped).await;
    assert_eq!(a.state(), State::Stopped);

    a.destroy();
    join_within(wa).await;
    join_within(wb).await;
}

#[tokio::test]
async fn cascade_reaches_grandchildren_through_a_failed_hook() {
    let registry = Registry::new(Config::default());
    let (tx, mut rx) = log_channel();

    let (a, wa) = SubsystemBuilder::new("a")
        .hooks(Recorder::new("a", &tx))
        .spawn(&registry)
        .unwrap();

    // B's parent hook always fails; the default cascade must still apply.
    let hooks = FnHooks::new()
        .on_parent(|_| async { Err::<ParentPolicy, _>(HookError::fail("observer broke")) });
    let (b, wb) = SubsystemBuilder::new("b")
        .parent(&*a)
        .hooks(hooks)
        .spawn(&registry)
        .unwrap();
    let (c, wc) = SubsystemBuilder::new("c")
        .parent(&*b)
        .hooks(Recorder::new("c", &tx))
        .spawn(&registry)
        .unwrap();

    let mut faults = registry.subscribe_faults();
    a.start();

    wait_state(&registry, c.tag(), State::Running).await;
    assert_eq!(take_note(&mut rx, "start", 2).await, ["a", "c"]);

    let fault = faults.recv().await.unwrap();
    assert_eq!(fault.subsystem, "b");
    assert_eq!(fault.tag, b.tag());

    a.destroy();
    join_within(wa).await;
    join_within(wb).await;
    join_within(wc).await;
}
