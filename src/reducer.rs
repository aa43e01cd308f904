//! Reducers: the only place domain logic lives.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::action::StateAction;
use crate::effect::Effect;

/// Action type dispatched to stores of reducer `R`.
pub type ReducerAction<R> = StateAction<
    <R as Reducer>::MutatingAction,
    <R as Reducer>::EffectAction,
    <R as Reducer>::PublishedValue,
>;

/// Effect type produced by reducer `R`.
pub type ReducerEffect<R> = Effect<
    <R as Reducer>::MutatingAction,
    <R as Reducer>::EffectAction,
    <R as Reducer>::PublishedValue,
>;

/// Pure state-transition logic for one store.
///
/// [`reduce`](Reducer::reduce) is the only place state changes: it must be
/// synchronous, total, and free of I/O. [`effect`](Reducer::effect) may
/// consult the environment and a state snapshot, but any state change it
/// wants must come back through a mutating action emitted by the returned
/// effect. Reducers hold no state of their own; all state lives in the
/// store.
///
/// A reducer without effect actions can set `EffectAction` to
/// [`std::convert::Infallible`] and implement `effect` as `match action {}`.
pub trait Reducer: Send + Sync + 'static {
    /// External dependencies effects may consult; shared read-only.
    type Environment: Send + Sync + 'static;
    type State: Send + Sync + 'static;
    type MutatingAction: Clone + Debug + Send + 'static;
    type EffectAction: Clone + Debug + Send + 'static;
    type PublishedValue: Clone + Debug + Send + 'static;

    /// Apply one mutating action, optionally scheduling a follow-up effect.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::MutatingAction,
    ) -> Option<ReducerEffect<Self>>;

    /// Resolve an effect action into a deferred sequence of further actions.
    fn effect(
        &self,
        environment: Option<&Self::Environment>,
        state: &Self::State,
        action: Self::EffectAction,
    ) -> ReducerEffect<Self>;
}

/// Reducer assembled from two closures, for stores defined inline.
pub struct FnReducer<Env, S, M, E, P, RF, EF> {
    reduce: RF,
    effect: EF,
    _types: PhantomData<fn(Env, S, M, E, P)>,
}

impl<Env, S, M, E, P, RF, EF> FnReducer<Env, S, M, E, P, RF, EF>
where
    RF: Fn(&mut S, M) -> Option<Effect<M, E, P>>,
    EF: Fn(Option<&Env>, &S, E) -> Effect<M, E, P>,
{
    pub fn new(reduce: RF, effect: EF) -> Self {
        Self {
            reduce,
            effect,
            _types: PhantomData,
        }
    }
}

impl<Env, S, M, E, P, RF, EF> Reducer for FnReducer<Env, S, M, E, P, RF, EF>
where
    Env: Send + Sync + 'static,
    S: Send + Sync + 'static,
    M: Clone + Debug + Send + 'static,
    E: Clone + Debug + Send + 'static,
    P: Clone + Debug + Send + 'static,
    RF: Fn(&mut S, M) -> Option<Effect<M, E, P>> + Send + Sync + 'static,
    EF: Fn(Option<&Env>, &S, E) -> Effect<M, E, P> + Send + Sync + 'static,
{
    type Environment = Env;
    type State = S;
    type MutatingAction = M;
    type EffectAction = E;
    type PublishedValue = P;

    fn reduce(&self, state: &mut S, action: M) -> Option<ReducerEffect<Self>> {
        (self.reduce)(state, action)
    }

    fn effect(&self, environment: Option<&Env>, state: &S, action: E) -> ReducerEffect<Self> {
        (self.effect)(environment, state, action)
    }
}
