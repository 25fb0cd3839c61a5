//! Domain-level error type for internal failures.
//!
//! Player-facing rejections are not errors: they are advisory
//! [`ActionOutcome`](crate::session::ActionOutcome) values and never cross
//! the actor boundary as faults. `DomainError` is reserved for conditions
//! the session cannot recover from, such as the board engine refusing a
//! move drawn from its own legal-move set.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DomainError {
    /// An internal invariant was violated; the session must finish defensively.
    #[error("invariant violated: {0}")]
    Invariant(String),
    /// Configuration could not be applied.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }
}
