//! Build errors for transition tables and rules.

use crate::core::{Action, PaymentState};
use thiserror::Error;

/// Errors that can occur when building transition tables and rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition action not specified. Call .on(action)")]
    MissingAction,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Duplicate transition for '{action}' from '{from}'")]
    DuplicateTransition { from: PaymentState, action: Action },

    #[error("Terminal state '{from}' cannot have outgoing transitions")]
    TransitionFromTerminal { from: PaymentState },
}
