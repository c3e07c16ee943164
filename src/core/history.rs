//! Payment transition history.
//!
//! History is an append-only audit trail. `record` returns a new history and
//! leaves the original untouched.

use super::action::Action;
use super::state::PaymentState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use payflow::core::{Action, PaymentState, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: PaymentState::Draft,
///     action: Action::Submit,
///     to: PaymentState::PendingApproval,
///     actor_id: "alice".to_string(),
///     timestamp: Utc::now(),
///     attempt: 0,
/// };
/// assert_eq!(record.to, PaymentState::PendingApproval);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being transitioned from
    pub from: PaymentState,
    /// The action that was applied
    pub action: Action,
    /// The state being transitioned to
    pub to: PaymentState,
    /// Who requested the transition
    pub actor_id: String,
    /// When the transition was persisted
    pub timestamp: DateTime<Utc>,
    /// Retry count of the payment when the transition was applied
    pub attempt: u32,
}

/// Ordered history of applied transitions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentHistory {
    transitions: Vec<TransitionRecord>,
}

impl PaymentHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// ```rust
    /// use payflow::core::{Action, PaymentHistory, PaymentState, TransitionRecord};
    /// use chrono::Utc;
    ///
    /// let history = PaymentHistory::new();
    /// let next = history.record(TransitionRecord {
    ///     from: PaymentState::Draft,
    ///     action: Action::Submit,
    ///     to: PaymentState::PendingApproval,
    ///     actor_id: "alice".to_string(),
    ///     timestamp: Utc::now(),
    ///     attempt: 0,
    /// });
    /// assert_eq!(next.transitions().len(), 1);
    /// assert_eq!(history.transitions().len(), 0); // Original unchanged
    /// ```
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// States traversed: the first `from`, then each `to`.
    pub fn get_path(&self) -> Vec<PaymentState> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the first and last transition. `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Identities that applied `action`, in order.
    pub fn actors_for(&self, action: Action) -> Vec<&str> {
        self.transitions
            .iter()
            .filter(|t| t.action == action)
            .map(|t| t.actor_id.as_str())
            .collect()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.last()
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: PaymentState, action: Action, to: PaymentState, actor: &str) -> TransitionRecord {
        TransitionRecord {
            from,
            action,
            to,
            actor_id: actor.to_string(),
            timestamp: Utc::now(),
            attempt: 0,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = PaymentHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = PaymentHistory::new();
        let next = history.record(record(
            PaymentState::Draft,
            Action::Submit,
            PaymentState::PendingApproval,
            "alice",
        ));

        assert_eq!(history.len(), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = PaymentHistory::new()
            .record(record(
                PaymentState::Draft,
                Action::Submit,
                PaymentState::PendingApproval,
                "alice",
            ))
            .record(record(
                PaymentState::PendingApproval,
                Action::Approve,
                PaymentState::Approved,
                "bob",
            ));

        assert_eq!(
            history.get_path(),
            vec![
                PaymentState::Draft,
                PaymentState::PendingApproval,
                PaymentState::Approved
            ]
        );
        assert_eq!(history.actors_for(Action::Approve), vec!["bob"]);
        assert_eq!(history.last().map(|t| t.to), Some(PaymentState::Approved));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = PaymentHistory::new().record(record(
            PaymentState::Draft,
            Action::Submit,
            PaymentState::PendingApproval,
            "alice",
        ));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = PaymentHistory::new().record(record(
            PaymentState::Draft,
            Action::Submit,
            PaymentState::PendingApproval,
            "alice",
        ));

        let json = serde_json::to_string(&history).unwrap();
        let restored: PaymentHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(history, restored);
    }
}
