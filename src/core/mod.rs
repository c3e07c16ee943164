//! Core payment workflow types and logic.
//!
//! This module contains the pure core of the workflow:
//! - States and the registry of their flags
//! - Actions
//! - Named guard predicates
//! - The declarative transition table
//! - Immutable history tracking
//!
//! Nothing in this module performs I/O.

mod action;
mod guard;
mod history;
mod state;
mod table;

pub use action::Action;
pub use guard::Guard;
pub use history::{PaymentHistory, TransitionRecord};
pub use state::{PaymentState, Severity, State, StateRegistry};
pub use table::{SideEffect, TransitionRule, TransitionTable};
