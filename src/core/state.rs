//! Payment states and the registry of their flags.
//!
//! The registry is the single source of truth for which states exist and
//! which of them are terminal or immutable. Everything here is pure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Debug};

/// Trait for workflow states.
///
/// All methods are pure - no side effects. States are plain values that
/// describe the current position of a record in its lifecycle.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records
/// - `PartialEq`: states are compared during table lookup
/// - `Debug`: states appear in diagnostics
/// - `Serialize` + `Deserialize`: states are persisted by the caller
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// No transition is ever legal out of a final state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if a persisted record in this state must no longer be edited.
    ///
    /// Enforcement belongs to the persistence layer; the evaluator only
    /// reports the flag.
    ///
    /// Default implementation returns `false`.
    fn is_immutable(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Lifecycle state of a payment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Draft,
    PendingApproval,
    Approved,
    Processing,
    Completed,
    Rejected,
    Failed,
}

/// Display severity attached to a state, used by presentation layers for badges.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Neutral,
    Info,
    Warning,
    Success,
    Danger,
}

impl PaymentState {
    /// Every state, in lifecycle order.
    pub const ALL: [PaymentState; 7] = [
        PaymentState::Draft,
        PaymentState::PendingApproval,
        PaymentState::Approved,
        PaymentState::Processing,
        PaymentState::Completed,
        PaymentState::Rejected,
        PaymentState::Failed,
    ];

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::PendingApproval => "Pending Approval",
            Self::Approved => "Approved",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
            Self::Failed => "Failed",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Draft => Severity::Neutral,
            Self::PendingApproval => Severity::Warning,
            Self::Approved | Self::Processing => Severity::Info,
            Self::Completed => Severity::Success,
            Self::Rejected | Self::Failed => Severity::Danger,
        }
    }
}

impl State for PaymentState {
    fn name(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    fn is_immutable(&self) -> bool {
        matches!(self, Self::Approved | Self::Processing | Self::Completed)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Rejected | Self::Failed)
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static registry of payment states.
///
/// A zero-sized facade over the flags carried by [`PaymentState`], so callers
/// that only need the registry contract do not depend on the trait.
#[derive(Clone, Copy, Debug, Default)]
pub struct StateRegistry;

impl StateRegistry {
    pub fn is_terminal(state: PaymentState) -> bool {
        state.is_final()
    }

    pub fn is_immutable(state: PaymentState) -> bool {
        state.is_immutable()
    }

    pub fn all_states() -> BTreeSet<PaymentState> {
        PaymentState::ALL.into_iter().collect()
    }

    /// States from which no transition can ever leave.
    pub fn terminal_states() -> BTreeSet<PaymentState> {
        PaymentState::ALL
            .into_iter()
            .filter(|s| s.is_final())
            .collect()
    }
}
