//! Hooks for a UI layer: two-way value bindings and one-shot connection.
//!
//! The core knows nothing about widgets. These are the seams a host UI
//! toolkit hangs on to: read a projected value, write a gesture back as a
//! mutating action, and run connect-style side effects exactly once per
//! attachment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{Store, StoreCore};
use crate::action::StateAction;
use crate::reducer::Reducer;

enum WriteKind<R: Reducer, V> {
    Mutating(Box<dyn Fn(V) -> R::MutatingAction + Send + Sync>),
    ReadOnly,
}

/// Two-way adapter between a projected state value and a mutating action.
///
/// `get` reads through the store's state lock; `set` dispatches a
/// mutating action. The binding keeps the store's state alive, mirroring
/// a UI widget holding its model, but effects still stop when the owning
/// [`Store`] is dropped.
pub struct StateBinding<R: Reducer, V> {
    core: Arc<StoreCore<R>>,
    projection: Box<dyn Fn(&R::State) -> V + Send + Sync>,
    write: WriteKind<R, V>,
}

impl<R: Reducer, V> StateBinding<R, V> {
    pub fn get(&self) -> V {
        (self.projection)(&self.core.state.read())
    }

    /// Dispatch the write as a mutating action.
    ///
    /// Writing through a read-only binding is a programmer error: debug
    /// builds panic, release builds dispatch [`StateAction::NoAction`].
    pub fn set(&self, value: V) {
        match &self.write {
            WriteKind::Mutating(to_action) => {
                self.core.send(StateAction::mutating(to_action(value)));
            }
            WriteKind::ReadOnly => {
                debug_assert!(false, "write through a read-only binding");
                self.core.send(StateAction::NoAction);
            }
        }
    }
}

impl<R: Reducer> Store<R> {
    /// Two-way binding: read via `projection`, write via `to_action`.
    pub fn binding<V>(
        &self,
        projection: impl Fn(&R::State) -> V + Send + Sync + 'static,
        to_action: impl Fn(V) -> R::MutatingAction + Send + Sync + 'static,
    ) -> StateBinding<R, V> {
        StateBinding {
            core: Arc::clone(&self.core),
            projection: Box::new(projection),
            write: WriteKind::Mutating(Box::new(to_action)),
        }
    }

    /// Binding whose writes are rejected as a programmer error.
    pub fn read_only_binding<V>(
        &self,
        projection: impl Fn(&R::State) -> V + Send + Sync + 'static,
    ) -> StateBinding<R, V> {
        StateBinding {
            core: Arc::clone(&self.core),
            projection: Box::new(projection),
            write: WriteKind::ReadOnly,
        }
    }
}

/// Runs a connect routine exactly once per UI-attachment lifetime.
///
/// Create one per attachment and call [`run`](ConnectOnce::run) from
/// every appearance hook; only the first call fires.
#[derive(Default)]
pub struct ConnectOnce {
    connected: AtomicBool,
}

impl ConnectOnce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&self, connect: impl FnOnce()) {
        if !self.connected.swap(true, Ordering::SeqCst) {
            connect();
        }
    }
}
