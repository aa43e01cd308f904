//! Deferred producers of follow-up actions.

use std::future::Future;

use futures::stream::{self, BoxStream, StreamExt};
use futures_core::Stream;

use crate::action::StateAction;

/// A lazy, asynchronous, possibly-infinite sequence of follow-up actions.
///
/// An effect is subscribed to at most once, by the store that registered
/// it, and is not restartable. Effects run concurrently with each other;
/// their output is serialized back through the owning store's dispatch
/// path. Tearing the store down releases every in-flight effect.
pub struct Effect<M, E, P> {
    stream: BoxStream<'static, StateAction<M, E, P>>,
}

impl<M, E, P> Effect<M, E, P>
where
    M: Send + 'static,
    E: Send + 'static,
    P: Send + 'static,
{
    /// Effect resolving immediately to one action.
    pub fn action(action: StateAction<M, E, P>) -> Self {
        Self::from_stream(stream::iter([action]))
    }

    /// Effect resolving to one mutating action.
    pub fn mutating(action: M) -> Self {
        Self::action(StateAction::mutating(action))
    }

    /// Effect resolving to one effect action.
    pub fn effect(action: E) -> Self {
        Self::action(StateAction::effect(action))
    }

    /// Effect that computes its single action when the store subscribes.
    pub fn lazy(body: impl FnOnce() -> StateAction<M, E, P> + Send + 'static) -> Self {
        Self::from_stream(stream::once(async move { body() }))
    }

    /// Effect driven by a future resolving to one action.
    pub fn from_future(
        future: impl Future<Output = StateAction<M, E, P>> + Send + 'static,
    ) -> Self {
        Self::from_stream(stream::once(future))
    }

    /// Effect producing every action of a stream, in order.
    pub fn from_stream(actions: impl Stream<Item = StateAction<M, E, P>> + Send + 'static) -> Self {
        Self {
            stream: actions.boxed(),
        }
    }

    pub(crate) fn into_stream(self) -> BoxStream<'static, StateAction<M, E, P>> {
        self.stream
    }
}
