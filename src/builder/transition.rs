//! Builder for constructing transition rules.

use crate::builder::error::BuildError;
use crate::core::{Action, Guard, PaymentState, SideEffect, TransitionRule};
use crate::enforcement::{ActorContext, TransitionContext};

/// Builder for constructing transition rules with a fluent API.
#[derive(Debug, Default)]
pub struct TransitionBuilder {
    from: Option<PaymentState>,
    action: Option<Action>,
    to: Option<PaymentState>,
    guards: Vec<Guard>,
    side_effects: Vec<SideEffect>,
}

impl TransitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source state (required).
    pub fn from(mut self, state: PaymentState) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the triggering action (required).
    pub fn on(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: PaymentState) -> Self {
        self.to = Some(state);
        self
    }

    /// Append a guard. Guards run in the order they are added.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Append a guard built from a boolean predicate.
    pub fn when<F>(self, name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ActorContext, &TransitionContext) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::from_predicate(name, message, predicate))
    }

    /// Append a side effect to return on success.
    pub fn effect(mut self, effect: SideEffect) -> Self {
        self.side_effects.push(effect);
        self
    }

    /// Build the rule.
    pub fn build(self) -> Result<TransitionRule, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let action = self.action.ok_or(BuildError::MissingAction)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(TransitionRule {
            from,
            action,
            to,
            guards: self.guards,
            side_effects: self.side_effects,
        })
    }
}
