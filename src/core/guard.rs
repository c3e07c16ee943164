//! Guard predicates for controlling state transitions.
//!
//! Guards are pure functions that decide whether a transition may execute.
//! Each guard has a name, so a transition table can be printed and audited
//! without running anything.

use crate::enforcement::{ActorContext, GuardInput, TransitionContext, TransitionError};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

type GuardFn = dyn Fn(&GuardInput<'_>) -> Result<(), TransitionError> + Send + Sync;

/// Named, pure predicate that must pass for a transition to be legal.
///
/// Guards are cheap to clone; the predicate is shared.
///
/// # Example
///
/// ```rust
/// use payflow::core::{Action, Guard, PaymentState};
/// use payflow::enforcement::{ActorContext, GuardInput, TransitionContext};
///
/// let guard = Guard::segregation_of_duties();
/// let actor = ActorContext::new("alice", "approver", "acme");
/// let context = TransitionContext::new().submitted_by("alice");
/// let input = GuardInput {
///     from: PaymentState::PendingApproval,
///     action: Action::Approve,
///     to: PaymentState::Approved,
///     actor: &actor,
///     context: &context,
/// };
///
/// assert!(guard.check(&input).is_err());
/// ```
#[derive(Clone)]
pub struct Guard {
    name: String,
    predicate: Arc<GuardFn>,
}

impl Guard {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic: the evaluator promises identical
    /// verdicts for identical inputs.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&GuardInput<'_>) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        Guard {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Create a guard from a boolean check; a `false` result becomes a
    /// [`TransitionError::Custom`] carrying `message`.
    pub fn from_predicate<F>(name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ActorContext, &TransitionContext) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let message = message.into();
        let guard_name = name.clone();
        Self::new(name, move |input| {
            if predicate(input.actor, input.context) {
                Ok(())
            } else {
                Err(TransitionError::Custom {
                    guard: guard_name.clone(),
                    message: message.clone(),
                })
            }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the guard. Pure.
    pub fn check(&self, input: &GuardInput<'_>) -> Result<(), TransitionError> {
        (self.predicate)(input)
    }

    /// The approver must not be the identity that submitted the payment.
    pub fn segregation_of_duties() -> Self {
        Self::new("segregation_of_duties", |input| {
            let submitter = input
                .context
                .submitter_id
                .as_deref()
                .ok_or(TransitionError::MissingContext {
                    field: "submitter_id",
                })?;
            if submitter == input.actor.id {
                Err(TransitionError::SodViolation {
                    actor_id: input.actor.id.clone(),
                })
            } else {
                Ok(())
            }
        })
    }

    /// Fails once `retry_count` has reached `max_retries`.
    pub fn retry_limit(max_retries: u32) -> Self {
        Self::new("retry_limit", move |input| {
            if input.context.retry_count >= max_retries {
                Err(TransitionError::RetryLimitExceeded {
                    max: max_retries,
                    current: input.context.retry_count,
                })
            } else {
                Ok(())
            }
        })
    }

    /// Fails when the payment amount is above `limit`. A missing amount is
    /// treated as a missing context field.
    pub fn amount_limit(limit: Decimal) -> Self {
        Self::new("amount_limit", move |input| {
            let amount = input
                .context
                .amount
                .ok_or(TransitionError::MissingContext { field: "amount" })?;
            if amount > limit {
                Err(TransitionError::AmountLimitExceeded { limit, amount })
            } else {
                Ok(())
            }
        })
    }

    /// Only actors holding one of `roles` may perform the action.
    pub fn actor_role(roles: Vec<String>) -> Self {
        Self::new("actor_role", move |input| {
            if roles.iter().any(|r| *r == input.actor.role) {
                Ok(())
            } else {
                Err(TransitionError::RoleNotPermitted {
                    role: input.actor.role.clone(),
                    action: input.action,
                })
            }
        })
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("name", &self.name).finish()
    }
}
