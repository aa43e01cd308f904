//! Cross-store composition.
//!
//! A binding derives effects on one store from what happens in another:
//! either its projected state changes or its published values. The
//! subscription is owned by the binding store; the source store has no
//! awareness of it. The dependency is strictly one-directional — binding
//! two stores to each other creates a feedback loop the library does not
//! detect, and is a caller error.

use futures::StreamExt;

use super::Store;
use crate::action::StateAction;
use crate::effect::Effect;
use crate::error::Cancelled;
use crate::reducer::{Reducer, ReducerAction};

impl<R: Reducer> Store<R> {
    /// Drive this store from another store's projected state changes.
    ///
    /// Registers an effect over `source.updates(projection, compare)`;
    /// each emitted change is mapped into one action on this store,
    /// exactly once per change.
    pub fn bind<S, V>(
        &self,
        source: &Store<S>,
        projection: impl Fn(&S::State) -> V + Send + 'static,
        compare: impl Fn(&V, &V) -> bool + Send + 'static,
        to_action: impl Fn(V) -> ReducerAction<R> + Send + 'static,
    ) where
        S: Reducer,
        V: Clone + Send + 'static,
    {
        let updates = source.updates(projection, compare);
        self.add_effect(Effect::from_stream(updates.map(to_action)));
    }

    /// [`bind`](Store::bind) with `==` as the predicate.
    pub fn bind_eq<S, V>(
        &self,
        source: &Store<S>,
        projection: impl Fn(&S::State) -> V + Send + 'static,
        to_action: impl Fn(V) -> ReducerAction<R> + Send + 'static,
    ) where
        S: Reducer,
        V: Clone + PartialEq + Send + 'static,
    {
        self.bind(source, projection, |previous, next| previous == next, to_action);
    }

    /// Drive this store from another store's published values.
    ///
    /// Cancellation of the source's output channel arrives here as a
    /// [`StateAction::Cancel`] on this store.
    pub fn bind_published_value<S>(
        &self,
        source: &Store<S>,
        to_action: impl Fn(S::PublishedValue) -> ReducerAction<R> + Send + 'static,
    ) where
        S: Reducer,
    {
        let results = source.value_results();
        self.add_effect(Effect::from_stream(results.map(
            move |result| match result {
                Ok(value) => to_action(value),
                Err(Cancelled) => StateAction::Cancel,
            },
        )));
    }
}
