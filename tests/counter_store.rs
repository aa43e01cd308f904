//! Dispatch ordering and effect scheduling on a single store.

mod common;

use std::sync::Arc;

use common::*;
use flowstate::StateAction;
use futures::StreamExt;

#[tokio::test]
async fn mutations_fold_in_send_order() {
    let store = counter_store("counter");
    store.send(StateAction::mutating(CounterAction::Increment));
    store.send(StateAction::mutating(CounterAction::Increment));
    store.send(StateAction::mutating(CounterAction::Increment));
    assert_eq!(store.with_state(|state| *state), 3);
}

#[tokio::test]
async fn sent_mutating_actions_observe_every_mutation_in_order() {
    let store = counter_store("counter");
    let observed = store.sent_mutating_actions();

    store.send(StateAction::mutating(CounterAction::Increment));
    store.send(StateAction::mutating(CounterAction::Increment));
    store.send(StateAction::mutating(CounterAction::Increment));
    drop(store);

    let actions: Vec<_> = observed.collect().await;
    assert_eq!(
        actions,
        vec![
            CounterAction::Increment,
            CounterAction::Increment,
            CounterAction::Increment,
        ]
    );
}

#[tokio::test]
async fn sent_actions_include_non_mutating_actions() {
    let store = counter_store("counter");
    let observed = store.sent_actions();

    store.send(StateAction::mutating(CounterAction::Increment));
    store.send(StateAction::NoAction);
    store.publish("done".to_owned());
    drop(store);

    let actions: Vec<_> = observed.collect().await;
    assert_eq!(actions.len(), 3);
    assert!(matches!(actions[0], StateAction::Mutating { .. }));
    assert!(matches!(actions[1], StateAction::NoAction));
    assert!(matches!(actions[2], StateAction::Publish(ref v) if v == "done"));
}

#[tokio::test]
async fn follow_up_effect_reenters_after_the_triggering_action() {
    let store = counter_store("counter");
    let mut observed = store.sent_mutating_actions();

    store.send(StateAction::mutating(CounterAction::IncrementThenAdd(5)));
    // The increment lands synchronously; the deferred add arrives through
    // the effect task.
    assert_eq!(store.with_state(|state| *state), 1);

    assert_eq!(
        observed.next().await,
        Some(CounterAction::IncrementThenAdd(5))
    );
    assert_eq!(observed.next().await, Some(CounterAction::Add(5)));
    assert_eq!(store.with_state(|state| *state), 6);
}

#[tokio::test]
async fn effect_actions_resolve_into_mutations() {
    let store = counter_store("counter");
    let mut observed = store.sent_mutating_actions();

    store.send(StateAction::effect(CounterEffect::AddLater(7)));
    assert_eq!(observed.next().await, Some(CounterAction::Add(7)));
    assert_eq!(store.with_state(|state| *state), 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sends_serialize_into_one_valid_fold() {
    let store = Arc::new(counter_store("counter"));
    let mut writers = Vec::new();
    for _ in 0..4 {
        let store = Arc::clone(&store);
        writers.push(tokio::spawn(async move {
            for _ in 0..250 {
                store.send(StateAction::mutating(CounterAction::Increment));
            }
        }));
    }
    for writer in writers {
        writer.await.expect("writer task panicked");
    }
    assert_eq!(store.with_state(|state| *state), 1000);
}

#[tokio::test]
async fn action_logging_toggle_is_transparent_to_dispatch() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("flowstate=debug")
        .with_test_writer()
        .try_init();

    let store = counter_store("counter");
    store.set_log_actions(true);
    store.send(StateAction::mutating(CounterAction::Increment));
    store.send(StateAction::NoAction);
    store.set_log_actions(false);
    store.send(StateAction::mutating(CounterAction::Increment));
    assert_eq!(store.with_state(|state| *state), 2);
}
