//! Context provided to guard checks.

use crate::core::{Action, PaymentState};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of the user or service requesting a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub id: String,
    pub role: String,
    pub tenant: String,
}

impl ActorContext {
    pub fn new(id: impl Into<String>, role: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            tenant: tenant.into(),
        }
    }
}

/// Facts about the payment that guards need, supplied by the caller from the
/// persisted record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionContext {
    /// Identity that submitted the payment for approval, once known.
    pub submitter_id: Option<String>,
    /// Number of `retry` actions already applied to the payment.
    pub retry_count: u32,
    pub amount: Option<Decimal>,
}

impl TransitionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted_by(mut self, submitter_id: impl Into<String>) -> Self {
        self.submitter_id = Some(submitter_id.into());
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// Everything a guard may look at for one evaluation.
#[derive(Clone, Copy, Debug)]
pub struct GuardInput<'a> {
    pub from: PaymentState,
    pub action: Action,
    pub to: PaymentState,
    pub actor: &'a ActorContext,
    pub context: &'a TransitionContext,
}
