//! The single structured failure the core surfaces.

use thiserror::Error;

/// Terminal signal on a store's publication channel.
///
/// Cancellation is the only typed failure in the model. Domain failures
/// (a network call inside an effect failing, say) are the reducer's
/// responsibility to convert into ordinary actions; they never cross the
/// store boundary as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("store output cancelled")]
pub struct Cancelled;
