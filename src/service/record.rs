//! Persisted payment records and the events derived from them.

use crate::core::{Action, PaymentHistory, PaymentState, SideEffect, TransitionRecord};
use crate::enforcement::TransitionContext;
use crate::evaluator::TransitionOutcome;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A payment as the persistence layer stores it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub tenant: String,
    pub state: PaymentState,
    /// Optimistic concurrency counter, incremented by every successful save.
    pub version: u64,
    pub amount: Decimal,
    pub currency: String,
    pub submitter_id: Option<String>,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: PaymentHistory,
}

impl PaymentRecord {
    /// A fresh draft at version 0.
    pub fn new(tenant: impl Into<String>, amount: Decimal, currency: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant: tenant.into(),
            state: PaymentState::Draft,
            version: 0,
            amount,
            currency: currency.into(),
            submitter_id: None,
            retry_count: 0,
            created_at: now,
            updated_at: now,
            history: PaymentHistory::new(),
        }
    }

    /// Guard-relevant facts for the evaluator.
    pub fn context(&self) -> TransitionContext {
        TransitionContext {
            submitter_id: self.submitter_id.clone(),
            retry_count: self.retry_count,
            amount: Some(self.amount),
        }
    }

    /// The record after `outcome`, with the record-level side effects applied.
    /// The version is left for the store to bump.
    pub fn advance(&self, outcome: &TransitionOutcome, actor_id: &str, at: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.history = self.history.record(TransitionRecord {
            from: outcome.from,
            action: outcome.action,
            to: outcome.to,
            actor_id: actor_id.to_string(),
            timestamp: at,
            attempt: self.retry_count,
        });
        for effect in &outcome.side_effects {
            match effect {
                SideEffect::RecordSubmitter => next.submitter_id = Some(actor_id.to_string()),
                SideEffect::IncrementRetryCount => next.retry_count += 1,
                SideEffect::EmitAudit | SideEffect::NotifyWebhooks { .. } => {}
            }
        }
        next.state = outcome.to;
        next.updated_at = at;
        next
    }
}

/// Audit trail entry emitted for a persisted transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub payment_id: Uuid,
    pub tenant: String,
    pub from: PaymentState,
    pub action: Action,
    pub to: PaymentState,
    pub actor_id: String,
    /// Version of the record after the transition.
    pub version: u64,
    pub timestamp: DateTime<Utc>,
}

/// Webhook notification for subscribers of a tenant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub payment_id: Uuid,
    pub tenant: String,
    pub state: PaymentState,
    pub timestamp: DateTime<Utc>,
}

/// What a caller gets back for a persisted transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionReceipt {
    pub payment_id: Uuid,
    pub outcome: TransitionOutcome,
    pub version: u64,
}
