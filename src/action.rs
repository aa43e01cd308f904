//! Actions: everything that can happen to a store.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque presentation hint attached to an animated mutating action.
///
/// The core threads hints through untouched; only a UI adapter that knows
/// the concrete type gives one meaning. An absent hint changes nothing.
#[derive(Clone)]
pub struct AnimationHint(Arc<dyn Any + Send + Sync>);

impl AnimationHint {
    pub fn new<T: Any + Send + Sync>(hint: T) -> Self {
        Self(Arc::new(hint))
    }

    /// Recover the concrete hint, if the type matches.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for AnimationHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnimationHint")
    }
}

/// A discrete request sent to a store.
///
/// `M` is the reducer's mutating action, `E` its effect action, `P` its
/// published value.
#[derive(Debug, Clone)]
pub enum StateAction<M, E, P> {
    /// Synchronous state transition, optionally marked for animated
    /// presentation.
    Mutating {
        action: M,
        animated: bool,
        animation: Option<AnimationHint>,
    },
    /// Request to run a side-effect-producing operation.
    Effect(E),
    /// Explicit no-op, used by defensive bindings.
    NoAction,
    /// Emit a terminal value on the publication channel; state untouched.
    Publish(P),
    /// Terminate the publication channel with a cancellation signal.
    Cancel,
}

impl<M, E, P> StateAction<M, E, P> {
    /// Wrap a plain mutating action.
    pub fn mutating(action: M) -> Self {
        Self::Mutating {
            action,
            animated: false,
            animation: None,
        }
    }

    /// Wrap a mutating action the UI layer should animate.
    pub fn mutating_animated(action: M, animation: Option<AnimationHint>) -> Self {
        Self::Mutating {
            action,
            animated: true,
            animation,
        }
    }

    /// Wrap a plain effect action.
    pub fn effect(action: E) -> Self {
        Self::Effect(action)
    }
}

impl<M, E, P> StateAction<M, E, P>
where
    M: fmt::Debug,
    E: fmt::Debug,
    P: fmt::Debug,
{
    /// Compact rendering for action tracing, without the enum scaffolding.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Mutating {
                action,
                animated: false,
                ..
            } => format!("{action:?}"),
            Self::Mutating {
                action,
                animated: true,
                ..
            } => format!("{action:?} (animated)"),
            Self::Effect(action) => format!("{action:?}"),
            Self::NoAction => "no action".to_owned(),
            Self::Publish(value) => format!("publish({value:?})"),
            Self::Cancel => "cancel".to_owned(),
        }
    }
}
