//! Shared store fixtures for integration tests.

#![allow(dead_code)]

use std::convert::Infallible;

use flowstate::{Effect, Reducer, ReducerEffect, Store};

/// Counter store: mutating actions adjust an integer, effect actions echo
/// a deferred adjustment back through the dispatch path, and the
/// publication channel carries a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    Add(i64),
    /// Increments now and schedules a deferred `Add` as a follow-up effect.
    IncrementThenAdd(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEffect {
    AddLater(i64),
}

pub struct CounterReducer;

impl Reducer for CounterReducer {
    type Environment = ();
    type State = i64;
    type MutatingAction = CounterAction;
    type EffectAction = CounterEffect;
    type PublishedValue = String;

    fn reduce(&self, state: &mut i64, action: CounterAction) -> Option<ReducerEffect<Self>> {
        match action {
            CounterAction::Increment => {
                *state += 1;
                None
            }
            CounterAction::Add(amount) => {
                *state += amount;
                None
            }
            CounterAction::IncrementThenAdd(amount) => {
                *state += 1;
                Some(Effect::effect(CounterEffect::AddLater(amount)))
            }
        }
    }

    fn effect(
        &self,
        _environment: Option<&()>,
        _state: &i64,
        action: CounterEffect,
    ) -> ReducerEffect<Self> {
        match action {
            CounterEffect::AddLater(amount) => Effect::mutating(CounterAction::Add(amount)),
        }
    }
}

pub fn counter_store(identifier: &str) -> Store<CounterReducer> {
    Store::new(identifier, 0, CounterReducer)
}

/// Follower store driven purely through bindings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FollowerState {
    pub observed: Vec<i64>,
    pub finishes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerAction {
    Observe(i64),
    Finish,
}

pub struct FollowerReducer;

impl Reducer for FollowerReducer {
    type Environment = ();
    type State = FollowerState;
    type MutatingAction = FollowerAction;
    type EffectAction = Infallible;
    type PublishedValue = String;

    fn reduce(
        &self,
        state: &mut FollowerState,
        action: FollowerAction,
    ) -> Option<ReducerEffect<Self>> {
        match action {
            FollowerAction::Observe(value) => state.observed.push(value),
            FollowerAction::Finish => state.finishes += 1,
        }
        None
    }

    fn effect(
        &self,
        _environment: Option<&()>,
        _state: &FollowerState,
        action: Infallible,
    ) -> ReducerEffect<Self> {
        match action {}
    }
}

pub fn follower_store(identifier: &str) -> Store<FollowerReducer> {
    Store::new(identifier, FollowerState::default(), FollowerReducer)
}
