//! Typed transition denials.

use crate::core::{Action, PaymentState};
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Why a `(state, action)` pair was rejected before any guard ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    /// The source state is terminal.
    TerminalState,
    /// The table holds no rule for the pair.
    NoRule,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerminalState => f.write_str("source state is terminal"),
            Self::NoRule => f.write_str("no such transition"),
        }
    }
}

/// Errors returned by the evaluator. Every variant is a deterministic business
/// denial: the same inputs always produce the same error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Illegal transition '{action}' from '{from}': {reason}")]
    IllegalStateTransition {
        from: PaymentState,
        action: Action,
        reason: IllegalReason,
    },

    #[error("Segregation of duties violated: '{actor_id}' submitted this payment and cannot approve it")]
    SodViolation { actor_id: String },

    #[error("Retry limit ({max}) exhausted (retries so far: {current})")]
    RetryLimitExceeded { max: u32, current: u32 },

    #[error("Amount {amount} exceeds the approval limit of {limit}")]
    AmountLimitExceeded { limit: Decimal, amount: Decimal },

    #[error("Role '{role}' may not perform '{action}'")]
    RoleNotPermitted { role: String, action: Action },

    #[error("Transition requires '{field}' in the context")]
    MissingContext { field: &'static str },

    #[error("Guard '{guard}' denied the transition: {message}")]
    Custom { guard: String, message: String },
}

impl TransitionError {
    /// Stable machine-readable identifier, suitable for API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IllegalStateTransition { .. } => "illegal_state_transition",
            Self::SodViolation { .. } => "sod_violation",
            Self::RetryLimitExceeded { .. } => "retry_limit_exceeded",
            Self::AmountLimitExceeded { .. } => "amount_limit_exceeded",
            Self::RoleNotPermitted { .. } => "role_not_permitted",
            Self::MissingContext { .. } => "missing_context",
            Self::Custom { .. } => "guard_denied",
        }
    }

    /// Denials caused by who the actor is rather than by the payment.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, Self::SodViolation { .. } | Self::RoleNotPermitted { .. })
    }
}
