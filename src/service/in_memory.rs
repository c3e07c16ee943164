use super::error::StoreError;
use super::ports::{EventSink, IdempotencyEntry, IdempotencyStore, PaymentStore};
use super::record::{AuditEvent, PaymentRecord, WebhookEvent};
use crate::core::State;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory payment store with optimistic version checks.
///
/// The version check and the write happen under one write lock, so two
/// racing saves with the same expected version cannot both succeed.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<Uuid, PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord>, StoreError> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }

    async fn insert(&self, record: PaymentRecord) -> Result<(), StoreError> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }
        payments.insert(record.id, record);
        Ok(())
    }

    async fn save(&self, mut record: PaymentRecord, expected_version: u64) -> Result<u64, StoreError> {
        let mut payments = self.payments.write().await;
        let stored = payments
            .get(&record.id)
            .ok_or(StoreError::NotFound(record.id))?;

        if stored.version != expected_version {
            return Err(StoreError::ConcurrencyConflict {
                id: record.id,
                expected: expected_version,
                actual: stored.version,
            });
        }

        let edits_payload = stored.amount != record.amount || stored.currency != record.currency;
        if edits_payload && (stored.state.is_immutable() || stored.state.is_final()) {
            return Err(StoreError::ImmutableRecord {
                id: record.id,
                state: stored.state,
            });
        }

        record.version = expected_version + 1;
        let version = record.version;
        payments.insert(record.id, record);
        Ok(version)
    }
}

/// Event sink that keeps everything it receives, in order.
#[derive(Default, Clone)]
pub struct RecordingEventSink {
    audit: Arc<RwLock<Vec<AuditEvent>>>,
    webhooks: Arc<RwLock<Vec<WebhookEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit.read().await.clone()
    }

    pub async fn webhook_events(&self) -> Vec<WebhookEvent> {
        self.webhooks.read().await.clone()
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn emit_audit(&self, event: AuditEvent) -> Result<(), StoreError> {
        self.audit.write().await.push(event);
        Ok(())
    }

    async fn notify_webhooks(&self, event: WebhookEvent) -> Result<(), StoreError> {
        self.webhooks.write().await.push(event);
        Ok(())
    }
}

/// Idempotency entries keyed by tenant and caller-supplied key.
#[derive(Default, Clone)]
pub struct InMemoryIdempotencyStore {
    entries: Arc<RwLock<HashMap<(String, String), IdempotencyEntry>>>,
}

impl InMemoryIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdempotencyStore for InMemoryIdempotencyStore {
    async fn get(&self, tenant: &str, key: &str) -> Result<Option<IdempotencyEntry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&(tenant.to_string(), key.to_string())).cloned())
    }

    async fn put(
        &self,
        tenant: &str,
        key: &str,
        entry: IdempotencyEntry,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries
            .entry((tenant.to_string(), key.to_string()))
            .or_insert(entry);
        Ok(())
    }
}
