//! Results of evaluating a transition request.

use crate::core::{Action, PaymentState, SideEffect};
use crate::enforcement::TransitionError;
use serde::{Deserialize, Serialize};

/// A granted transition. The caller persists `to` and executes `side_effects`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: PaymentState,
    pub action: Action,
    pub to: PaymentState,
    pub side_effects: Vec<SideEffect>,
}

impl TransitionOutcome {
    pub fn has_effect(&self, effect: &SideEffect) -> bool {
        self.side_effects.contains(effect)
    }

    /// Webhook event names declared by the transition, in order.
    pub fn webhook_events(&self) -> impl Iterator<Item = &str> + '_ {
        self.side_effects.iter().filter_map(|e| match e {
            SideEffect::NotifyWebhooks { event } => Some(event.as_str()),
            _ => None,
        })
    }
}

/// Result of [`TransitionEvaluator::apply`](super::TransitionEvaluator::apply).
/// An `Err` is an authoritative, deterministic denial.
pub type TransitionResult = Result<TransitionOutcome, TransitionError>;
