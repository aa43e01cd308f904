//! The store: single owner of state, serializer of mutations, runner of
//! effects.
//!
//! A store linearizes every action onto one dispatch path. The first
//! caller into [`Store::send`] drains the pending queue; contending and
//! re-entrant sends enqueue and return. Effects run concurrently as tasks
//! on the store's runtime handle, but each action they produce re-enters
//! the same dispatch path, so no two mutations ever interleave.

mod adapter;
mod bind;
mod object_state;
mod streams;

pub use adapter::{ConnectOnce, StateBinding};
pub use streams::{
    PublishedValueResults, PublishedValues, SentActions, SentMutatingActions, Updates,
};

use std::any::Any;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use futures::StreamExt;
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::action::StateAction;
use crate::reducer::{Reducer, ReducerAction, ReducerEffect};
use object_state::ObjectStateTable;
use streams::ValueChannel;

type StateWatcher<S> = Box<dyn FnMut(&S) -> bool + Send>;

struct DispatchQueue<R: Reducer> {
    pending: VecDeque<ReducerAction<R>>,
    draining: bool,
}

pub(crate) struct StoreCore<R: Reducer> {
    identifier: String,
    reducer: R,
    runtime: Handle,
    pub(crate) state: RwLock<R::State>,
    environment: RwLock<Option<R::Environment>>,
    dispatch: Mutex<DispatchQueue<R>>,
    state_watchers: Mutex<Vec<StateWatcher<R::State>>>,
    action_subscribers: Mutex<Vec<mpsc::UnboundedSender<ReducerAction<R>>>>,
    values: Mutex<ValueChannel<R::PublishedValue>>,
    object_state: Mutex<ObjectStateTable>,
    effect_tasks: Mutex<Vec<JoinHandle<()>>>,
    log_actions: AtomicBool,
}

impl<R: Reducer> StoreCore<R> {
    pub(crate) fn send(self: &Arc<Self>, action: ReducerAction<R>) {
        {
            let mut queue = self.dispatch.lock();
            queue.pending.push_back(action);
            if queue.draining {
                return;
            }
            queue.draining = true;
        }
        loop {
            let next = {
                let mut queue = self.dispatch.lock();
                match queue.pending.pop_front() {
                    Some(action) => action,
                    None => {
                        queue.draining = false;
                        return;
                    }
                }
            };
            self.process(next);
        }
    }

    fn process(self: &Arc<Self>, action: ReducerAction<R>) {
        if self.log_actions.load(Ordering::Relaxed) {
            let rendered = action
                .describe()
                .replace(&format!("{}.", self.identifier), "");
            tracing::debug!(store = %self.identifier, action = %rendered, "processing action");
        }

        let effect = match &action {
            StateAction::Mutating {
                action: mutating, ..
            } => {
                let effect = {
                    let mut state = self.state.write();
                    self.reducer.reduce(&mut state, mutating.clone())
                };
                self.notify_state_watchers();
                effect
            }
            StateAction::Effect(effect_action) => {
                let environment = self.environment.read();
                let state = self.state.read();
                Some(
                    self.reducer
                        .effect(environment.as_ref(), &state, effect_action.clone()),
                )
            }
            StateAction::NoAction => None,
            StateAction::Publish(value) => {
                if !self.values.lock().publish(value.clone()) {
                    tracing::trace!(store = %self.identifier, "publish after cancellation ignored");
                }
                None
            }
            StateAction::Cancel => {
                if !self.values.lock().cancel() {
                    tracing::trace!(store = %self.identifier, "output channel already terminated");
                }
                None
            }
        };

        if let Some(effect) = effect {
            self.add_effect(effect);
        }
        self.broadcast(action);
    }

    fn notify_state_watchers(&self) {
        let state = self.state.read();
        let mut watchers = self.state_watchers.lock();
        watchers.retain_mut(|watch| watch(&state));
    }

    fn broadcast(&self, action: ReducerAction<R>) {
        let mut subscribers = self.action_subscribers.lock();
        if subscribers.is_empty() {
            return;
        }
        subscribers.retain(|tx| tx.send(action.clone()).is_ok());
    }

    pub(crate) fn add_effect(self: &Arc<Self>, effect: ReducerEffect<R>) {
        let store = Arc::downgrade(self);
        let mut actions = effect.into_stream();
        let driver = self.runtime.spawn(async move {
            while let Some(action) = actions.next().await {
                // The upgraded reference lives only for one send, so a
                // long-running effect never keeps a released store alive.
                let Some(core) = store.upgrade() else { break };
                core.send(action);
            }
        });
        let mut tasks = self.effect_tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(driver);
    }

    fn shut_down(&self) {
        for task in self.effect_tasks.lock().drain(..) {
            task.abort();
        }
    }
}

/// A state container: owns one value, serializes mutations through its
/// reducer, runs effects, and publishes a terminal result.
///
/// A store has a single owner; dropping it tears the store down, aborting
/// every in-flight effect. Cheap [`StoreHandle`]s can feed actions in from
/// elsewhere without extending the store's lifetime.
pub struct Store<R: Reducer> {
    core: Arc<StoreCore<R>>,
}

impl<R: Reducer> Store<R> {
    /// Create a store whose effects run on the ambient tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics outside a runtime context; use [`Store::new_on`] to pass an
    /// explicit handle.
    pub fn new(identifier: impl Into<String>, initial_state: R::State, reducer: R) -> Self {
        Self::new_on(Handle::current(), identifier, initial_state, reducer)
    }

    /// Create a store whose effects run on an explicit runtime handle.
    pub fn new_on(
        runtime: Handle,
        identifier: impl Into<String>,
        initial_state: R::State,
        reducer: R,
    ) -> Self {
        Self {
            core: Arc::new(StoreCore {
                identifier: identifier.into(),
                reducer,
                runtime,
                state: RwLock::new(initial_state),
                environment: RwLock::new(None),
                dispatch: Mutex::new(DispatchQueue {
                    pending: VecDeque::new(),
                    draining: false,
                }),
                state_watchers: Mutex::new(Vec::new()),
                action_subscribers: Mutex::new(Vec::new()),
                values: Mutex::new(ValueChannel::new()),
                object_state: Mutex::new(ObjectStateTable::default()),
                effect_tasks: Mutex::new(Vec::new()),
                log_actions: AtomicBool::new(false),
            }),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.core.identifier
    }

    /// Install the external dependencies effects consult.
    ///
    /// The environment is shared read-only across effect invocations; any
    /// mutable resource inside it must be internally thread-safe.
    pub fn set_environment(&self, environment: R::Environment) {
        *self.core.environment.write() = Some(environment);
    }

    /// Feed one action into the store.
    ///
    /// Actions are processed in the exact order `send` is called. A
    /// follow-up effect is registered, never awaited inline, so `send`
    /// returns as soon as the action (and anything queued behind it) has
    /// been processed.
    pub fn send(&self, action: ReducerAction<R>) {
        self.core.send(action);
    }

    /// Shorthand for sending [`StateAction::Publish`].
    pub fn publish(&self, value: R::PublishedValue) {
        self.send(StateAction::Publish(value));
    }

    /// Shorthand for sending [`StateAction::Cancel`].
    pub fn cancel(&self) {
        self.send(StateAction::Cancel);
    }

    /// Register an effect directly, outside any reducer step.
    pub fn add_effect(&self, effect: ReducerEffect<R>) {
        self.core.add_effect(effect);
    }

    /// Read the current state under the store's read lock.
    pub fn with_state<T>(&self, read: impl FnOnce(&R::State) -> T) -> T {
        read(&self.core.state.read())
    }

    /// Clone of the current state.
    pub fn state_snapshot(&self) -> R::State
    where
        R::State: Clone,
    {
        self.core.state.read().clone()
    }

    /// Deduplicated stream of a projected sub-value's changes.
    ///
    /// The value present at subscription time is never emitted; each
    /// change that is not `compare`-equal to the previous emission arrives
    /// exactly once, in mutation order.
    pub fn updates<V>(
        &self,
        projection: impl Fn(&R::State) -> V + Send + 'static,
        compare: impl Fn(&V, &V) -> bool + Send + 'static,
    ) -> Updates<V>
    where
        V: Clone + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        // Holding the watcher lock while sampling keeps registration
        // atomic with respect to concurrent mutations.
        let mut watchers = self.core.state_watchers.lock();
        let mut last = projection(&self.core.state.read());
        watchers.push(Box::new(move |state| {
            let next = projection(state);
            if compare(&last, &next) {
                return !tx.is_closed();
            }
            last = next.clone();
            tx.send(next).is_ok()
        }));
        Updates { rx }
    }

    /// [`updates`](Store::updates) with `==` as the predicate.
    pub fn updates_eq<V>(&self, projection: impl Fn(&R::State) -> V + Send + 'static) -> Updates<V>
    where
        V: Clone + PartialEq + Send + 'static,
    {
        self.updates(projection, |previous, next| previous == next)
    }

    /// Published values; ends on cancellation or store teardown. No replay
    /// for late subscribers.
    pub fn values(&self) -> PublishedValues<R::PublishedValue> {
        PublishedValues {
            rx: self.core.values.lock().subscribe(),
        }
    }

    /// Published values with cancellation as an explicit `Err(Cancelled)`.
    pub fn value_results(&self) -> PublishedValueResults<R::PublishedValue> {
        PublishedValueResults {
            rx: self.core.values.lock().subscribe(),
        }
    }

    /// Every action after processing, in processing order.
    pub fn sent_actions(
        &self,
    ) -> SentActions<R::MutatingAction, R::EffectAction, R::PublishedValue> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.core.action_subscribers.lock().push(tx);
        SentActions { rx }
    }

    /// Mutating actions after processing, in processing order.
    pub fn sent_mutating_actions(
        &self,
    ) -> SentMutatingActions<R::MutatingAction, R::EffectAction, R::PublishedValue> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.core.action_subscribers.lock().push(tx);
        SentMutatingActions { rx }
    }

    /// Side-car object keyed by its type, created on first access and
    /// dropped with the store.
    pub fn object_state<T: Any + Send + Sync>(&self, init: impl FnOnce() -> T) -> Arc<T> {
        self.core.object_state.lock().typed(init)
    }

    /// Side-car object under an explicit key.
    ///
    /// # Panics
    ///
    /// Panics if the key already holds a value of a different type.
    pub fn keyed_object_state<T: Any + Send + Sync>(
        &self,
        key: &str,
        init: impl FnOnce() -> T,
    ) -> Arc<T> {
        self.core.object_state.lock().keyed(key, init)
    }

    /// Toggle human-readable tracing of dispatched actions.
    pub fn set_log_actions(&self, log: bool) {
        self.core.log_actions.store(log, Ordering::Relaxed);
    }

    /// Cheap cloneable dispatch handle that does not keep the store alive.
    pub fn handle(&self) -> StoreHandle<R> {
        StoreHandle {
            core: Arc::downgrade(&self.core),
        }
    }
}

impl<R: Reducer> Drop for Store<R> {
    fn drop(&mut self) {
        self.core.shut_down();
    }
}

/// Weak dispatch handle; sends become no-ops once the store is gone.
pub struct StoreHandle<R: Reducer> {
    core: Weak<StoreCore<R>>,
}

impl<R: Reducer> Clone for StoreHandle<R> {
    fn clone(&self) -> Self {
        Self {
            core: Weak::clone(&self.core),
        }
    }
}

impl<R: Reducer> StoreHandle<R> {
    pub fn send(&self, action: ReducerAction<R>) {
        match self.core.upgrade() {
            Some(core) => core.send(action),
            None => tracing::trace!("action dropped, store is gone"),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.core.strong_count() > 0
    }
}
