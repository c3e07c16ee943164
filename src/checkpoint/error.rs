//! Checkpoint error types.

use crate::core::{Action, PaymentState};
use thiserror::Error;

/// Errors raised while encoding, decoding or restoring a payment checkpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("Failed to encode checkpoint: {0}")]
    Encode(String),

    #[error("Failed to decode checkpoint: {0}")]
    Decode(String),

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The first recorded transition does not leave `draft`.
    #[error("History starts in '{state}' instead of 'draft'")]
    HistoryStartsOutsideDraft { state: PaymentState },

    /// The history ends somewhere other than the record's current state.
    #[error("History ends in '{history}' but the record is '{record}'")]
    StateMismatch {
        history: PaymentState,
        record: PaymentState,
    },

    /// Step `index` does not start where the previous step ended.
    #[error("History step {index} starts in '{found}' but the previous step ended in '{expected}'")]
    BrokenHistory {
        index: usize,
        expected: PaymentState,
        found: PaymentState,
    },

    /// A recorded step has no matching rule in the transition table.
    #[error("History step {index} ('{from}' --{action}--> '{to}') is not a legal transition")]
    IllegalStep {
        index: usize,
        from: PaymentState,
        action: Action,
        to: PaymentState,
    },

    #[error("History leaves terminal state '{state}'")]
    LeavesTerminalState { state: PaymentState },
}
