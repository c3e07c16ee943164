//! Imperative shell around the evaluator.
//!
//! `PaymentService` is the reference caller: it loads a payment, honours
//! idempotency keys, asks the evaluator for a decision, saves the result
//! conditioned on the expected version and dispatches the declared side
//! effects. Collaborators are passed in explicitly as ports.

pub mod error;
pub mod in_memory;
pub mod ports;
pub mod record;

pub use error::{ServiceError, StoreError};
pub use in_memory::{InMemoryIdempotencyStore, InMemoryPaymentStore, RecordingEventSink};
pub use ports::{EventSink, IdempotencyEntry, IdempotencyStore, IdempotentResult, PaymentStore};
pub use record::{AuditEvent, PaymentRecord, TransitionReceipt, WebhookEvent};

use crate::core::{Action, SideEffect};
use crate::enforcement::ActorContext;
use crate::evaluator::TransitionEvaluator;
use chrono::Utc;
use error::Result;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

/// A request to move one payment through one action.
#[derive(Clone, Debug)]
pub struct TransitionRequest {
    pub payment_id: Uuid,
    pub action: Action,
    pub actor: ActorContext,
    /// Version the caller last read. The request is refused if it is stale.
    pub expected_version: u64,
    pub idempotency_key: Option<String>,
}

impl TransitionRequest {
    pub fn new(payment_id: Uuid, action: Action, actor: ActorContext, expected_version: u64) -> Self {
        Self {
            payment_id,
            action,
            actor,
            expected_version,
            idempotency_key: None,
        }
    }

    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

pub struct PaymentService<S, E, I> {
    evaluator: TransitionEvaluator,
    store: S,
    events: E,
    idempotency: I,
}

impl<S, E, I> PaymentService<S, E, I>
where
    S: PaymentStore,
    E: EventSink,
    I: IdempotencyStore,
{
    pub fn new(evaluator: TransitionEvaluator, store: S, events: E, idempotency: I) -> Self {
        Self {
            evaluator,
            store,
            events,
            idempotency,
        }
    }

    pub fn evaluator(&self) -> &TransitionEvaluator {
        &self.evaluator
    }

    /// Record a new draft payment in the actor's tenant.
    pub async fn create(
        &self,
        actor: &ActorContext,
        amount: Decimal,
        currency: &str,
    ) -> Result<PaymentRecord> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidAmount(amount));
        }
        let record = PaymentRecord::new(actor.tenant.clone(), amount, currency);
        self.store.insert(record.clone()).await?;
        info!(payment = %record.id, tenant = %record.tenant, "payment drafted");
        Ok(record)
    }

    /// Load a payment visible to `actor`. Payments of other tenants are
    /// reported as not found.
    pub async fn get(&self, id: Uuid, actor: &ActorContext) -> Result<PaymentRecord> {
        match self.store.get(id).await? {
            Some(record) if record.tenant == actor.tenant => Ok(record),
            _ => Err(StoreError::NotFound(id).into()),
        }
    }

    /// Apply one action to a persisted payment.
    pub async fn transition(&self, request: TransitionRequest) -> Result<TransitionReceipt> {
        let tenant = request.actor.tenant.as_str();

        if let Some(key) = request.idempotency_key.as_deref() {
            if let Some(previous) = self.idempotency.get(tenant, key).await? {
                if !previous.matches(request.payment_id, request.action) {
                    warn!(
                        payment = %request.payment_id,
                        key,
                        original = %previous.payment_id,
                        "idempotency key reused for a different request"
                    );
                    return Err(ServiceError::IdempotencyKeyReused {
                        key: key.to_string(),
                        payment_id: previous.payment_id,
                        action: previous.action,
                    });
                }
                info!(payment = %request.payment_id, key, "replaying idempotent result");
                return previous.result.map_err(ServiceError::from);
            }
        }

        let record = self.get(request.payment_id, &request.actor).await?;
        if record.version != request.expected_version {
            warn!(
                payment = %record.id,
                expected = request.expected_version,
                actual = record.version,
                "stale transition request"
            );
            return Err(StoreError::ConcurrencyConflict {
                id: record.id,
                expected: request.expected_version,
                actual: record.version,
            }
            .into());
        }

        let decision = self.evaluator.apply(
            record.state,
            request.action,
            &request.actor,
            &record.context(),
        );
        let outcome = match decision {
            Ok(outcome) => outcome,
            Err(denial) => {
                if let Some(key) = request.idempotency_key.as_deref() {
                    let entry =
                        IdempotencyEntry::new(record.id, request.action, Err(denial.clone()));
                    self.idempotency.put(tenant, key, entry).await?;
                }
                return Err(denial.into());
            }
        };

        let now = Utc::now();
        let next = record.advance(&outcome, &request.actor.id, now);
        let version = match self.store.save(next, request.expected_version).await {
            Ok(version) => version,
            Err(err) => {
                warn!(payment = %record.id, error = %err, "transition not persisted");
                return Err(err.into());
            }
        };

        let receipt = TransitionReceipt {
            payment_id: record.id,
            outcome,
            version,
        };
        if let Some(key) = request.idempotency_key.as_deref() {
            let entry = IdempotencyEntry::new(record.id, request.action, Ok(receipt.clone()));
            // The transition is committed; a lost key only costs a replay.
            if let Err(err) = self.idempotency.put(tenant, key, entry).await {
                warn!(payment = %record.id, key, error = %err, "idempotency result not stored");
            }
        }

        info!(
            payment = %record.id,
            from = %receipt.outcome.from,
            to = %receipt.outcome.to,
            actor = %request.actor.id,
            version,
            "transition persisted"
        );

        self.dispatch(&record.tenant, &receipt, &request.actor, now)
            .await;
        Ok(receipt)
    }

    /// Change the amount of a payment that is still editable.
    pub async fn amend_amount(
        &self,
        id: Uuid,
        actor: &ActorContext,
        amount: Decimal,
        expected_version: u64,
    ) -> Result<PaymentRecord> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidAmount(amount));
        }
        let mut record = self.get(id, actor).await?;
        record.amount = amount;
        record.updated_at = Utc::now();
        record.version = self.store.save(record.clone(), expected_version).await?;
        Ok(record)
    }

    /// Run the declared side effects. Delivery failures are logged, never
    /// surfaced: the transition is already persisted.
    async fn dispatch(
        &self,
        tenant: &str,
        receipt: &TransitionReceipt,
        actor: &ActorContext,
        at: chrono::DateTime<Utc>,
    ) {
        for effect in &receipt.outcome.side_effects {
            let delivered = match effect {
                SideEffect::EmitAudit => {
                    self.events
                        .emit_audit(AuditEvent {
                            payment_id: receipt.payment_id,
                            tenant: tenant.to_string(),
                            from: receipt.outcome.from,
                            action: receipt.outcome.action,
                            to: receipt.outcome.to,
                            actor_id: actor.id.clone(),
                            version: receipt.version,
                            timestamp: at,
                        })
                        .await
                }
                SideEffect::NotifyWebhooks { event } => {
                    self.events
                        .notify_webhooks(WebhookEvent {
                            event: event.clone(),
                            payment_id: receipt.payment_id,
                            tenant: tenant.to_string(),
                            state: receipt.outcome.to,
                            timestamp: at,
                        })
                        .await
                }
                SideEffect::RecordSubmitter | SideEffect::IncrementRetryCount => Ok(()),
            };
            if let Err(err) = delivered {
                warn!(payment = %receipt.payment_id, ?effect, error = %err, "side effect not delivered");
            }
        }
    }
}
