//! Subscription streams handed out by a store.
//!
//! Each stream is backed by its own unbounded channel so every subscriber
//! sees every emission, in processing order, with no replay of anything
//! that happened before subscription.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::action::StateAction;
use crate::error::Cancelled;

/// Deduplicated changes of a projected sub-value of store state.
///
/// The value present at subscription time is never emitted; only genuine
/// changes arrive, exactly once each.
pub struct Updates<V> {
    pub(crate) rx: UnboundedReceiver<V>,
}

impl<V> Stream for Updates<V> {
    type Item = V;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<V>> {
        self.rx.poll_recv(cx)
    }
}

/// Values published by a store.
///
/// Ends when the store cancels its output or is torn down.
pub struct PublishedValues<P> {
    pub(crate) rx: UnboundedReceiver<Result<P, Cancelled>>,
}

impl<P> Stream for PublishedValues<P> {
    type Item = P;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<P>> {
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(Ok(value))) => Poll::Ready(Some(value)),
            Poll::Ready(Some(Err(Cancelled)) | None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Published values with cancellation surfaced as an explicit failure.
///
/// Yields `Err(Cancelled)` exactly once, then ends.
pub struct PublishedValueResults<P> {
    pub(crate) rx: UnboundedReceiver<Result<P, Cancelled>>,
}

impl<P> Stream for PublishedValueResults<P> {
    type Item = Result<P, Cancelled>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Every action processed by a store, in processing order.
pub struct SentActions<M, E, P> {
    pub(crate) rx: UnboundedReceiver<StateAction<M, E, P>>,
}

impl<M, E, P> Stream for SentActions<M, E, P> {
    type Item = StateAction<M, E, P>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Mutating actions processed by a store, in processing order.
pub struct SentMutatingActions<M, E, P> {
    pub(crate) rx: UnboundedReceiver<StateAction<M, E, P>>,
}

impl<M, E, P> Stream for SentMutatingActions<M, E, P> {
    type Item = M;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<M>> {
        loop {
            match self.rx.poll_recv(cx) {
                Poll::Ready(Some(StateAction::Mutating { action, .. })) => {
                    return Poll::Ready(Some(action))
                }
                Poll::Ready(Some(_)) => continue,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Fan-out channel for a store's published values.
///
/// Late subscribers see nothing published earlier; after cancellation a
/// new subscriber receives the terminal signal immediately.
pub(crate) struct ValueChannel<P> {
    subscribers: Vec<UnboundedSender<Result<P, Cancelled>>>,
    cancelled: bool,
}

impl<P: Clone> ValueChannel<P> {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            cancelled: false,
        }
    }

    pub(crate) fn subscribe(&mut self) -> UnboundedReceiver<Result<P, Cancelled>> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.cancelled {
            let _ = tx.send(Err(Cancelled));
        } else {
            self.subscribers.push(tx);
        }
        rx
    }

    pub(crate) fn publish(&mut self, value: P) -> bool {
        if self.cancelled {
            return false;
        }
        self.subscribers
            .retain(|tx| tx.send(Ok(value.clone())).is_ok());
        true
    }

    /// Returns false if the channel was already terminated.
    pub(crate) fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        for tx in self.subscribers.drain(..) {
            let _ = tx.send(Err(Cancelled));
        }
        true
    }
}
