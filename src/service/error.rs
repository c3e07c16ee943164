use crate::core::{Action, PaymentState};
use crate::enforcement::TransitionError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Failures reported by persistence adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another writer saved the record first. Reload and retry with fresh
    /// state; replaying the stale request could act on outdated data.
    #[error("Concurrency conflict on payment {id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict { id: Uuid, expected: u64, actual: u64 },

    #[error("Payment {0} not found")]
    NotFound(Uuid),

    #[error("Payment {0} already exists")]
    AlreadyExists(Uuid),

    #[error("Payment {id} is {state} and can no longer be modified")]
    ImmutableRecord { id: Uuid, state: PaymentState },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Payment amount must be positive (got {0})")]
    InvalidAmount(Decimal),

    /// The idempotency key was first used for a different payment or action.
    #[error("Idempotency key '{key}' was already used to {action} payment {payment_id}")]
    IdempotencyKeyReused {
        key: String,
        payment_id: Uuid,
        action: Action,
    },
}

impl ServiceError {
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::ConcurrencyConflict { .. })
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound(_)))
    }
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
