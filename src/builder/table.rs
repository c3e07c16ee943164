//! Builder for constructing transition tables.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{State, TransitionRule, TransitionTable};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Builder for custom transition tables.
///
/// `build` enforces the closed-world invariants: one rule per
/// `(state, action)` and no rule out of a terminal state.
#[derive(Debug, Default)]
pub struct TransitionTableBuilder {
    rules: Vec<TransitionRule>,
}

impl TransitionTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder) -> Result<Self, BuildError> {
        self.rules.push(builder.build()?);
        Ok(self)
    }

    /// Add a pre-built rule.
    pub fn add_rule(mut self, rule: TransitionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Result<TransitionTable, BuildError> {
        if self.rules.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        let mut rules = HashMap::with_capacity(self.rules.len());
        for rule in self.rules {
            if rule.from.is_final() {
                return Err(BuildError::TransitionFromTerminal { from: rule.from });
            }
            match rules.entry((rule.from, rule.action)) {
                Entry::Occupied(_) => {
                    return Err(BuildError::DuplicateTransition {
                        from: rule.from,
                        action: rule.action,
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(rule);
                }
            }
        }

        Ok(TransitionTable::from_rules(rules))
    }
}
