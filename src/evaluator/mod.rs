//! Transition evaluation.
//!
//! The evaluator is the pure decision point of the workflow. Given a state, an
//! action and who is asking, it answers with the next state and the side
//! effects the caller must run, or with a typed denial. It holds no mutable
//! state and can be shared freely across threads.

mod outcome;

pub use outcome::{TransitionOutcome, TransitionResult};

use crate::core::{Action, PaymentState, State, TransitionTable};
use crate::enforcement::{
    ActorContext, GuardInput, GuardPolicies, IllegalReason, TransitionContext, TransitionError,
};
use tracing::debug;

/// Applies actions to payment states according to a [`TransitionTable`].
///
/// # Example
///
/// ```rust
/// use payflow::core::{Action, PaymentState};
/// use payflow::enforcement::{ActorContext, TransitionContext, TransitionError};
/// use payflow::TransitionEvaluator;
///
/// let evaluator = TransitionEvaluator::default();
/// let alice = ActorContext::new("alice", "clerk", "acme");
/// let ctx = TransitionContext::new().submitted_by("alice");
///
/// let outcome = evaluator
///     .apply(PaymentState::Draft, Action::Submit, &alice, &ctx)
///     .unwrap();
/// assert_eq!(outcome.to, PaymentState::PendingApproval);
///
/// let denied = evaluator.apply(PaymentState::PendingApproval, Action::Approve, &alice, &ctx);
/// assert!(matches!(denied, Err(TransitionError::SodViolation { .. })));
/// ```
#[derive(Clone, Debug)]
pub struct TransitionEvaluator {
    table: TransitionTable,
}

impl TransitionEvaluator {
    pub fn new(table: TransitionTable) -> Self {
        Self { table }
    }

    /// Evaluator over the standard lifecycle with the given policies.
    pub fn with_policies(policies: &GuardPolicies) -> Self {
        Self::new(TransitionTable::standard(policies))
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Decide a single transition request.
    ///
    /// 1. A terminal `from` is denied before the table is consulted.
    /// 2. A pair missing from the table is denied.
    /// 3. Guards run in declaration order; the first failure is returned.
    /// 4. Otherwise the rule's target and side effects are returned.
    pub fn apply(
        &self,
        from: PaymentState,
        action: Action,
        actor: &ActorContext,
        context: &TransitionContext,
    ) -> TransitionResult {
        if from.is_final() {
            debug!(%from, %action, actor = %actor.id, "denied: terminal state");
            return Err(TransitionError::IllegalStateTransition {
                from,
                action,
                reason: IllegalReason::TerminalState,
            });
        }

        let Some(rule) = self.table.lookup(from, action) else {
            debug!(%from, %action, actor = %actor.id, "denied: no rule");
            return Err(TransitionError::IllegalStateTransition {
                from,
                action,
                reason: IllegalReason::NoRule,
            });
        };

        let input = GuardInput {
            from,
            action,
            to: rule.to,
            actor,
            context,
        };
        for guard in &rule.guards {
            if let Err(denial) = guard.check(&input) {
                debug!(
                    %from,
                    %action,
                    actor = %actor.id,
                    guard = guard.name(),
                    kind = denial.kind(),
                    "denied by guard"
                );
                return Err(denial);
            }
        }

        debug!(%from, %action, to = %rule.to, actor = %actor.id, "transition granted");
        Ok(TransitionOutcome {
            from,
            action,
            to: rule.to,
            side_effects: rule.side_effects.clone(),
        })
    }

    /// Actions `actor` could successfully apply from `from` right now.
    pub fn permitted_actions(
        &self,
        from: PaymentState,
        actor: &ActorContext,
        context: &TransitionContext,
    ) -> Vec<Action> {
        self.table
            .available_actions(from)
            .into_iter()
            .filter(|action| self.apply(from, *action, actor, context).is_ok())
            .collect()
    }
}

impl Default for TransitionEvaluator {
    fn default() -> Self {
        Self::with_policies(&GuardPolicies::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Guard, SideEffect};
    use crate::builder::{TransitionBuilder, TransitionTableBuilder};

    fn alice() -> ActorContext {
        ActorContext::new("alice", "clerk", "acme")
    }

    fn bob() -> ActorContext {
        ActorContext::new("bob", "approver", "acme")
    }

    #[test]
    fn draft_submit_goes_to_pending_approval() {
        let ctx = TransitionContext::new().submitted_by("alice");
        let outcome = TransitionEvaluator::default()
            .apply(PaymentState::Draft, Action::Submit, &alice(), &ctx)
            .unwrap();

        assert_eq!(outcome.to, PaymentState::PendingApproval);
        assert!(outcome.has_effect(&SideEffect::RecordSubmitter));
        assert_eq!(
            outcome.webhook_events().collect::<Vec<_>>(),
            vec!["payment.submitted"]
        );
    }

    #[test]
    fn submitter_cannot_approve() {
        let ctx = TransitionContext::new().submitted_by("alice");
        let result = TransitionEvaluator::default().apply(
            PaymentState::PendingApproval,
            Action::Approve,
            &alice(),
            &ctx,
        );

        assert_eq!(
            result,
            Err(TransitionError::SodViolation {
                actor_id: "alice".into()
            })
        );
    }

    #[test]
    fn other_actor_can_approve() {
        let ctx = TransitionContext::new().submitted_by("alice");
        let outcome = TransitionEvaluator::default()
            .apply(PaymentState::PendingApproval, Action::Approve, &bob(), &ctx)
            .unwrap();

        assert_eq!(outcome.to, PaymentState::Approved);
    }

    #[test]
    fn terminal_state_denied() {
        let result = TransitionEvaluator::default().apply(
            PaymentState::Completed,
            Action::Fail,
            &alice(),
            &TransitionContext::new(),
        );

        assert_eq!(
            result,
            Err(TransitionError::IllegalStateTransition {
                from: PaymentState::Completed,
                action: Action::Fail,
                reason: IllegalReason::TerminalState,
            })
        );
    }

    #[test]
    fn missing_pair_denied_with_pair_named() {
        let result = TransitionEvaluator::default().apply(
            PaymentState::Approved,
            Action::Fail,
            &alice(),
            &TransitionContext::new(),
        );

        assert_eq!(
            result,
            Err(TransitionError::IllegalStateTransition {
                from: PaymentState::Approved,
                action: Action::Fail,
                reason: IllegalReason::NoRule,
            })
        );
    }

    #[test]
    fn first_failing_guard_wins() {
        let table = TransitionTableBuilder::new()
            .transition(
                TransitionBuilder::new()
                    .from(PaymentState::PendingApproval)
                    .on(Action::Approve)
                    .to(PaymentState::Approved)
                    .when("first", "first failed", |_, _| false)
                    .guard(Guard::segregation_of_duties()),
            )
            .and_then(TransitionTableBuilder::build)
            .unwrap();

        let ctx = TransitionContext::new().submitted_by("alice");
        let result = TransitionEvaluator::new(table).apply(
            PaymentState::PendingApproval,
            Action::Approve,
            &alice(),
            &ctx,
        );

        assert_eq!(
            result,
            Err(TransitionError::Custom {
                guard: "first".into(),
                message: "first failed".into(),
            })
        );
    }

    #[test]
    fn retry_denied_at_limit() {
        let evaluator = TransitionEvaluator::default();
        let ctx = TransitionContext::new().with_retry_count(3);

        assert_eq!(
            evaluator.apply(PaymentState::Failed, Action::Retry, &alice(), &ctx),
            Err(TransitionError::RetryLimitExceeded { max: 3, current: 3 })
        );
    }

    #[test]
    fn permitted_actions_respect_guards() {
        let evaluator = TransitionEvaluator::default();
        let ctx = TransitionContext::new().submitted_by("alice");

        assert_eq!(
            evaluator.permitted_actions(PaymentState::PendingApproval, &alice(), &ctx),
            vec![Action::Reject]
        );
        assert_eq!(
            evaluator.permitted_actions(PaymentState::PendingApproval, &bob(), &ctx),
            vec![Action::Approve, Action::Reject]
        );
    }

    #[test]
    fn configured_roles_apply_after_sod() {
        let policies = crate::enforcement::PolicyBuilder::new()
            .approver_role("approver")
            .build()
            .unwrap();
        let evaluator = TransitionEvaluator::with_policies(&policies);
        let ctx = TransitionContext::new().submitted_by("alice");
        let carol = ActorContext::new("carol", "clerk", "acme");

        assert_eq!(
            evaluator.apply(PaymentState::PendingApproval, Action::Approve, &carol, &ctx),
            Err(TransitionError::RoleNotPermitted {
                role: "clerk".into(),
                action: Action::Approve,
            })
        );
        assert!(evaluator
            .apply(PaymentState::PendingApproval, Action::Approve, &bob(), &ctx)
            .is_ok());
    }
}
