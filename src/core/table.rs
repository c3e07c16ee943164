//! Declarative transition table.
//!
//! Legal moves are data: a map keyed by `(state, action)`. Any pair missing
//! from the map is illegal, so nothing is implicitly allowed.

use super::action::Action;
use super::guard::Guard;
use super::state::{PaymentState, State};
use crate::enforcement::GuardPolicies;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Instruction returned to the caller alongside a successful transition.
/// The evaluator never performs these itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SideEffect {
    /// Persist the acting identity as the payment's submitter.
    RecordSubmitter,
    /// Persist `retry_count + 1`.
    IncrementRetryCount,
    /// Record an audit event for the transition.
    EmitAudit,
    /// Notify webhook subscribers.
    NotifyWebhooks { event: String },
}

impl SideEffect {
    pub fn notify(event: impl Into<String>) -> Self {
        Self::NotifyWebhooks {
            event: event.into(),
        }
    }
}

/// One legal move: `(from, action) -> to`, with its guards in evaluation order.
#[derive(Clone, Debug)]
pub struct TransitionRule {
    pub from: PaymentState,
    pub action: Action,
    pub to: PaymentState,
    pub guards: Vec<Guard>,
    pub side_effects: Vec<SideEffect>,
}

impl TransitionRule {
    pub fn guard_names(&self) -> Vec<&str> {
        self.guards.iter().map(Guard::name).collect()
    }
}

/// Closed-world map of every legal transition.
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    rules: HashMap<(PaymentState, Action), TransitionRule>,
}

impl TransitionTable {
    /// Build a table from rules that the caller has already validated.
    pub(crate) fn from_rules(rules: HashMap<(PaymentState, Action), TransitionRule>) -> Self {
        Self { rules }
    }

    /// The payment lifecycle, with guards configured from `policies`.
    ///
    /// ```text
    /// draft            --submit-->   pending_approval
    /// pending_approval --approve-->  approved
    /// pending_approval --reject-->   rejected
    /// approved         --process-->  processing
    /// processing       --complete--> completed
    /// processing       --fail-->     failed
    /// failed           --retry-->    pending_approval
    /// ```
    pub fn standard(policies: &GuardPolicies) -> Self {
        use Action::*;
        use PaymentState::*;

        let entries = [
            (
                Draft,
                Submit,
                PendingApproval,
                policies.submit_guards(),
                vec![
                    SideEffect::RecordSubmitter,
                    SideEffect::EmitAudit,
                    SideEffect::notify("payment.submitted"),
                ],
            ),
            (
                PendingApproval,
                Approve,
                Approved,
                policies.approve_guards(),
                vec![SideEffect::EmitAudit, SideEffect::notify("payment.approved")],
            ),
            (
                PendingApproval,
                Reject,
                Rejected,
                Vec::new(),
                vec![SideEffect::EmitAudit, SideEffect::notify("payment.rejected")],
            ),
            (
                Approved,
                Process,
                PaymentState::Processing,
                Vec::new(),
                vec![SideEffect::EmitAudit],
            ),
            (
                PaymentState::Processing,
                Complete,
                Completed,
                Vec::new(),
                vec![SideEffect::EmitAudit, SideEffect::notify("payment.completed")],
            ),
            (
                PaymentState::Processing,
                Fail,
                Failed,
                Vec::new(),
                vec![SideEffect::EmitAudit, SideEffect::notify("payment.failed")],
            ),
            (
                Failed,
                Retry,
                PendingApproval,
                policies.retry_guards(),
                vec![SideEffect::IncrementRetryCount, SideEffect::EmitAudit],
            ),
        ];

        let rules = entries
            .into_iter()
            .map(|(from, action, to, guards, side_effects)| {
                (
                    (from, action),
                    TransitionRule {
                        from,
                        action,
                        to,
                        guards,
                        side_effects,
                    },
                )
            })
            .collect();

        Self { rules }
    }

    pub fn lookup(&self, from: PaymentState, action: Action) -> Option<&TransitionRule> {
        self.rules.get(&(from, action))
    }

    /// Every rule, ordered by source state then action, for audit listings.
    pub fn rules(&self) -> Vec<&TransitionRule> {
        let mut rules: Vec<_> = self.rules.values().collect();
        rules.sort_by_key(|r| (r.from, r.action));
        rules
    }

    /// Actions that have a rule out of `state`. Empty for terminal states.
    pub fn available_actions(&self, state: PaymentState) -> BTreeSet<Action> {
        if state.is_final() {
            return BTreeSet::new();
        }
        self.rules
            .keys()
            .filter(|(from, _)| *from == state)
            .map(|(_, action)| *action)
            .collect()
    }

    /// States reachable from `start` by any sequence of legal actions,
    /// ignoring guards.
    pub fn reachable_from(&self, start: PaymentState) -> BTreeSet<PaymentState> {
        let mut seen = BTreeSet::from([start]);
        let mut frontier = vec![start];
        while let Some(state) = frontier.pop() {
            for rule in self.rules.values().filter(|r| r.from == state) {
                if seen.insert(rule.to) {
                    frontier.push(rule.to);
                }
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TransitionTable {
        TransitionTable::standard(&GuardPolicies::default())
    }

    #[test]
    fn standard_table_has_seven_rules() {
        assert_eq!(table().len(), 7);
    }

    #[test]
    fn lookup_returns_declared_target() {
        let table = table();
        let rule = table
            .lookup(PaymentState::PendingApproval, Action::Approve)
            .unwrap();
        assert_eq!(rule.to, PaymentState::Approved);
        assert_eq!(rule.guard_names(), vec!["segregation_of_duties"]);
    }

    #[test]
    fn approved_cannot_fail_directly() {
        assert!(table()
            .lookup(PaymentState::Approved, Action::Fail)
            .is_none());
    }

    #[test]
    fn no_rule_leaves_a_terminal_state() {
        let table = table();
        for rule in table.rules() {
            assert!(!rule.from.is_final(), "{:?}", rule);
        }
    }

    #[test]
    fn available_actions_from_processing() {
        let actions = table().available_actions(PaymentState::Processing);
        assert_eq!(
            actions.into_iter().collect::<Vec<_>>(),
            vec![Action::Complete, Action::Fail]
        );
        assert!(table()
            .available_actions(PaymentState::Completed)
            .is_empty());
    }

    #[test]
    fn every_state_is_reachable_from_draft() {
        assert_eq!(
            table().reachable_from(PaymentState::Draft),
            crate::core::StateRegistry::all_states()
        );
    }

    #[test]
    fn retry_increments_retry_count() {
        let table = table();
        let rule = table.lookup(PaymentState::Failed, Action::Retry).unwrap();
        assert_eq!(rule.to, PaymentState::PendingApproval);
        assert!(rule.side_effects.contains(&SideEffect::IncrementRetryCount));
        assert_eq!(rule.guard_names(), vec!["retry_limit"]);
    }

    #[test]
    fn rules_are_listed_in_stable_order() {
        let table = table();
        let listed: Vec<_> = table.rules().iter().map(|r| (r.from, r.action)).collect();
        let mut sorted = listed.clone();
        sorted.sort();
        assert_eq!(listed, sorted);
    }

    #[test]
    fn side_effect_serializes_with_tag() {
        let json = serde_json::to_string(&SideEffect::notify("payment.approved")).unwrap();
        assert_eq!(
            json,
            r#"{"type":"notify_webhooks","event":"payment.approved"}"#
        );
    }
}
