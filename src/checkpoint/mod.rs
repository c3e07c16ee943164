//! Versioned snapshots of payment records.
//!
//! Persistence adapters that store documents or blobs can checkpoint a
//! record, with its full history, as JSON or as a compact binary encoding,
//! and restore it later with consistency checks.

use crate::core::{PaymentState, State, TransitionTable};
use crate::enforcement::GuardPolicies;
use crate::service::PaymentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of one payment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub record: PaymentRecord,
}

impl Checkpoint {
    pub fn capture(record: &PaymentRecord) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            record: record.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::Decode(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::Decode(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Hand back the record after checking its history against the
    /// standard transition table.
    pub fn restore(self) -> Result<PaymentRecord, CheckpointError> {
        self.restore_with(&TransitionTable::standard(&GuardPolicies::default()))
    }

    /// Hand back the record after checking that its history is a connected
    /// walk from `draft` through `table` that ends in the record's state.
    pub fn restore_with(self, table: &TransitionTable) -> Result<PaymentRecord, CheckpointError> {
        let record = self.record;
        let mut current = PaymentState::Draft;

        for (index, step) in record.history.transitions().iter().enumerate() {
            if step.from != current {
                return Err(if index == 0 {
                    CheckpointError::HistoryStartsOutsideDraft { state: step.from }
                } else {
                    CheckpointError::BrokenHistory {
                        index,
                        expected: current,
                        found: step.from,
                    }
                });
            }
            if step.from.is_final() {
                return Err(CheckpointError::LeavesTerminalState { state: step.from });
            }
            let legal = table
                .lookup(step.from, step.action)
                .is_some_and(|rule| rule.to == step.to);
            if !legal {
                return Err(CheckpointError::IllegalStep {
                    index,
                    from: step.from,
                    action: step.action,
                    to: step.to,
                });
            }
            current = step.to;
        }

        if current != record.state {
            return Err(CheckpointError::StateMismatch {
                history: current,
                record: record.state,
            });
        }

        Ok(record)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, PaymentHistory, SideEffect, TransitionRecord};
    use crate::evaluator::TransitionOutcome;
    use rust_decimal_macros::dec;

    fn submitted() -> PaymentRecord {
        let record = PaymentRecord::new("acme", dec!(99.95), "GBP");
        let outcome = TransitionOutcome {
            from: PaymentState::Draft,
            action: Action::Submit,
            to: PaymentState::PendingApproval,
            side_effects: vec![SideEffect::RecordSubmitter],
        };
        record.advance(&outcome, "alice", Utc::now())
    }

    #[test]
    fn json_checkpoint_restores_record() {
        let record = submitted();
        let json = Checkpoint::capture(&record).to_json().unwrap();

        let restored = Checkpoint::from_json(&json).unwrap().restore().unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn binary_checkpoint_restores_record() {
        let record = submitted();
        let bytes = Checkpoint::capture(&record).to_binary().unwrap();

        let restored = Checkpoint::from_binary(&bytes).unwrap().restore().unwrap();
        assert_eq!(restored.amount, dec!(99.95));
        assert_eq!(restored.submitter_id.as_deref(), Some("alice"));
        assert_eq!(restored.history, record.history);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut checkpoint = Checkpoint::capture(&submitted());
        checkpoint.version = 99;
        let json = serde_json::to_string(&checkpoint).unwrap();

        assert!(matches!(
            Checkpoint::from_json(&json),
            Err(CheckpointError::UnsupportedVersion {
                found: 99,
                supported: CHECKPOINT_VERSION
            })
        ));
    }

    fn step(from: PaymentState, action: Action, to: PaymentState) -> TransitionRecord {
        TransitionRecord {
            from,
            action,
            to,
            actor_id: "ops".to_string(),
            timestamp: Utc::now(),
            attempt: 0,
        }
    }

    #[test]
    fn inconsistent_state_fails_validation() {
        let mut record = submitted();
        record.state = PaymentState::Approved;

        assert_eq!(
            Checkpoint::capture(&record).restore(),
            Err(CheckpointError::StateMismatch {
                history: PaymentState::PendingApproval,
                record: PaymentState::Approved
            })
        );
    }

    #[test]
    fn history_must_start_in_draft() {
        let mut record = PaymentRecord::new("acme", dec!(10), "GBP");
        record.history = PaymentHistory::new().record(step(
            PaymentState::Approved,
            Action::Process,
            PaymentState::Processing,
        ));
        record.state = PaymentState::Processing;

        assert_eq!(
            Checkpoint::capture(&record).restore(),
            Err(CheckpointError::HistoryStartsOutsideDraft {
                state: PaymentState::Approved
            })
        );
    }

    #[test]
    fn disconnected_history_is_rejected() {
        let mut record = submitted();
        record.history = record.history.record(step(
            PaymentState::Approved,
            Action::Process,
            PaymentState::Processing,
        ));
        record.state = PaymentState::Processing;

        assert_eq!(
            Checkpoint::capture(&record).restore(),
            Err(CheckpointError::BrokenHistory {
                index: 1,
                expected: PaymentState::PendingApproval,
                found: PaymentState::Approved
            })
        );
    }

    #[test]
    fn steps_outside_the_table_are_rejected() {
        let mut record = submitted();
        record.history = record.history.record(step(
            PaymentState::PendingApproval,
            Action::Complete,
            PaymentState::Completed,
        ));
        record.state = PaymentState::Completed;

        assert_eq!(
            Checkpoint::capture(&record).restore(),
            Err(CheckpointError::IllegalStep {
                index: 1,
                from: PaymentState::PendingApproval,
                action: Action::Complete,
                to: PaymentState::Completed
            })
        );
    }

    #[test]
    fn history_cannot_leave_a_terminal_state() {
        let mut record = submitted();
        record.history = record
            .history
            .record(step(
                PaymentState::PendingApproval,
                Action::Reject,
                PaymentState::Rejected,
            ))
            .record(step(
                PaymentState::Rejected,
                Action::Submit,
                PaymentState::PendingApproval,
            ));

        assert_eq!(
            Checkpoint::capture(&record).restore(),
            Err(CheckpointError::LeavesTerminalState {
                state: PaymentState::Rejected
            })
        );
    }

    #[test]
    fn garbage_fails_to_deserialize() {
        assert!(matches!(
            Checkpoint::from_json("{not json"),
            Err(CheckpointError::Decode(_))
        ));
    }
}
