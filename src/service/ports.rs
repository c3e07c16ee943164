use super::error::StoreError;
use super::record::{AuditEvent, PaymentRecord, TransitionReceipt, WebhookEvent};
use crate::core::Action;
use crate::enforcement::TransitionError;
use async_trait::async_trait;
use uuid::Uuid;

/// Result remembered for an idempotency key: the receipt of a granted
/// transition, or the denial.
pub type IdempotentResult = Result<TransitionReceipt, TransitionError>;

/// What an idempotency key was first used for, and what it produced.
#[derive(Clone, Debug, PartialEq)]
pub struct IdempotencyEntry {
    pub payment_id: Uuid,
    pub action: Action,
    pub result: IdempotentResult,
}

impl IdempotencyEntry {
    pub fn new(payment_id: Uuid, action: Action, result: IdempotentResult) -> Self {
        Self {
            payment_id,
            action,
            result,
        }
    }

    /// Whether a request for `payment_id` and `action` may replay this entry.
    pub fn matches(&self, payment_id: Uuid, action: Action) -> bool {
        self.payment_id == payment_id && self.action == action
    }
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord>, StoreError>;

    /// Store a new record. Fails with `AlreadyExists` if the id is taken.
    async fn insert(&self, record: PaymentRecord) -> Result<(), StoreError>;

    /// Replace the record if its stored version still equals
    /// `expected_version`, bumping the version. Returns the new version.
    async fn save(&self, record: PaymentRecord, expected_version: u64) -> Result<u64, StoreError>;
}

/// Durable destination for audit and webhook events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit_audit(&self, event: AuditEvent) -> Result<(), StoreError>;
    async fn notify_webhooks(&self, event: WebhookEvent) -> Result<(), StoreError>;
}

#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    async fn get(&self, tenant: &str, key: &str) -> Result<Option<IdempotencyEntry>, StoreError>;

    /// Remember `entry` for the key. The first entry stored for a key wins.
    async fn put(&self, tenant: &str, key: &str, entry: IdempotencyEntry)
        -> Result<(), StoreError>;
}
