//! Unidirectional state containers.
//!
//! A [`Store`] owns one state value, accepts discrete actions, mutates
//! state synchronously through its [`Reducer`], and schedules asynchronous
//! [`Effect`]s whose output feeds back into the store as further actions.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Store ──→ Reducer ──→ State
//!    ↑          │
//!    └─ Effect ←┘
//! ```
//!
//! - **State**: a single value, exclusively owned by one store
//! - **Action**: mutation request, effect request, publication, or cancel
//! - **Reducer**: the only place domain logic lives
//! - **Effect**: a deferred async sequence of follow-up actions
//!
//! All state mutation is synchronous and funnels through
//! [`Reducer::reduce`]; all asynchrony funnels through effects that
//! re-enter the store as actions. Stores compose by binding one store's
//! state changes or published values to actions on another.

pub mod action;
pub mod effect;
pub mod error;
pub mod reducer;
pub mod store;

pub use action::{AnimationHint, StateAction};
pub use effect::Effect;
pub use error::Cancelled;
pub use reducer::{FnReducer, Reducer, ReducerAction, ReducerEffect};
pub use store::{
    ConnectOnce, PublishedValueResults, PublishedValues, SentActions, SentMutatingActions,
    StateBinding, Store, StoreHandle, Updates,
};
